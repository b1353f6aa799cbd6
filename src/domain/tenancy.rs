//! Dealership groups, brands and agencies.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AgencyId, AgencyName, BrandId, BrandName, GroupId, GroupName};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgencyGroup {
    pub id: GroupId,
    pub name: GroupName,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Brand {
    pub id: BrandId,
    pub name: BrandName,
}

/// A single dealership. Its identifier scopes every other record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Agency {
    pub id: AgencyId,
    pub group_id: GroupId,
    pub brand_id: BrandId,
    pub name: AgencyName,
    pub city: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewAgency {
    pub group_id: GroupId,
    pub brand_id: BrandId,
    pub name: AgencyName,
    pub city: Option<String>,
}

impl NewAgency {
    #[must_use]
    pub fn new(group_id: GroupId, brand_id: BrandId, name: AgencyName, city: Option<String>) -> Self {
        Self {
            group_id,
            brand_id,
            name,
            city: city
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}
