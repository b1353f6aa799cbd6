use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AgencyId, UserEmail, UserId, UserName};

/// Salesperson or manager known to an agency.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub agency_id: AgencyId,
    pub name: UserName,
    pub email: UserEmail,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub agency_id: AgencyId,
    pub name: UserName,
    pub email: UserEmail,
}

impl NewUser {
    #[must_use]
    pub fn new(agency_id: AgencyId, name: UserName, email: UserEmail) -> Self {
        Self {
            agency_id,
            name,
            email,
        }
    }
}
