//! Diesel models for groups, brands and agencies.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::tenancy::{
    Agency as DomainAgency, AgencyGroup as DomainAgencyGroup, Brand as DomainBrand,
    NewAgency as DomainNewAgency,
};
use crate::domain::types::{
    AgencyId, AgencyName, BrandId, BrandName, GroupId, GroupName, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::agency_groups)]
pub struct AgencyGroup {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::agency_groups)]
pub struct NewAgencyGroup<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::brands)]
pub struct Brand {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::brands)]
pub struct NewBrand<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::agencies)]
pub struct Agency {
    pub id: i32,
    pub group_id: i32,
    pub brand_id: i32,
    pub name: String,
    pub city: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::agencies)]
pub struct NewAgency<'a> {
    pub group_id: i32,
    pub brand_id: i32,
    pub name: &'a str,
    pub city: Option<&'a str>,
}

impl TryFrom<AgencyGroup> for DomainAgencyGroup {
    type Error = TypeConstraintError;

    fn try_from(group: AgencyGroup) -> Result<Self, Self::Error> {
        Ok(Self {
            id: GroupId::new(group.id)?,
            name: GroupName::new(group.name)?,
            created_at: group.created_at,
        })
    }
}

impl TryFrom<Brand> for DomainBrand {
    type Error = TypeConstraintError;

    fn try_from(brand: Brand) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BrandId::new(brand.id)?,
            name: BrandName::new(brand.name)?,
        })
    }
}

impl TryFrom<Agency> for DomainAgency {
    type Error = TypeConstraintError;

    fn try_from(agency: Agency) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AgencyId::new(agency.id)?,
            group_id: GroupId::new(agency.group_id)?,
            brand_id: BrandId::new(agency.brand_id)?,
            name: AgencyName::new(agency.name)?,
            city: agency.city,
            created_at: agency.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewAgency> for NewAgency<'a> {
    fn from(agency: &'a DomainNewAgency) -> Self {
        Self {
            group_id: agency.group_id.get(),
            brand_id: agency.brand_id.get(),
            name: agency.name.as_str(),
            city: agency.city.as_deref(),
        }
    }
}
