//! Diesel models for prospects.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::prospect::{
    NewProspect as DomainNewProspect, Prospect as DomainProspect,
    UpdateProspect as DomainUpdateProspect,
};
use crate::domain::spcc::SpccClassification;
use crate::domain::types::{
    AgencyId, LeadSource, PhoneNumber, ProspectEmail, ProspectId, ProspectName,
    TypeConstraintError, UserId, VehicleId,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::prospects)]
/// Diesel model for [`crate::domain::prospect::Prospect`].
pub struct Prospect {
    pub id: i32,
    pub agency_id: i32,
    pub user_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: String,
    pub status: String,
    pub notes: Option<String>,
    pub spcc_score: Option<i32>,
    pub spcc_classification: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::prospects)]
/// Insertable form of [`Prospect`].
pub struct NewProspect<'a> {
    pub agency_id: i32,
    pub user_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub source: &'a str,
    pub status: &'a str,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::prospects)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Prospect`] record.
pub struct UpdateProspect<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub source: &'a str,
    pub status: &'a str,
    pub vehicle_id: Option<i32>,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Prospect> for DomainProspect {
    type Error = TypeConstraintError;

    fn try_from(prospect: Prospect) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProspectId::new(prospect.id)?,
            agency_id: AgencyId::new(prospect.agency_id)?,
            user_id: prospect.user_id.map(UserId::new).transpose()?,
            vehicle_id: prospect.vehicle_id.map(VehicleId::new).transpose()?,
            name: ProspectName::new(prospect.name)?,
            email: prospect.email.map(ProspectEmail::new).transpose()?,
            phone: prospect.phone.map(PhoneNumber::new).transpose()?,
            source: LeadSource::new(prospect.source)?,
            status: prospect.status.parse()?,
            notes: prospect.notes,
            spcc_score: prospect.spcc_score,
            spcc_classification: prospect
                .spcc_classification
                .as_deref()
                .map(str::parse::<SpccClassification>)
                .transpose()?,
            created_at: prospect.created_at,
            updated_at: prospect.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewProspect> for NewProspect<'a> {
    fn from(prospect: &'a DomainNewProspect) -> Self {
        Self {
            agency_id: prospect.agency_id.get(),
            user_id: prospect.user_id.map(UserId::get),
            vehicle_id: prospect.vehicle_id.map(VehicleId::get),
            name: prospect.name.as_str(),
            email: prospect.email.as_ref().map(ProspectEmail::as_str),
            phone: prospect.phone.as_ref().map(PhoneNumber::as_str),
            source: prospect.source.as_str(),
            status: prospect.status.as_str(),
            notes: prospect.notes.as_ref().map(|notes| notes.as_str()),
        }
    }
}

impl<'a> UpdateProspect<'a> {
    pub fn from_domain(prospect: &'a DomainUpdateProspect, updated_at: NaiveDateTime) -> Self {
        Self {
            name: prospect.name.as_str(),
            email: prospect.email.as_ref().map(ProspectEmail::as_str),
            phone: prospect.phone.as_ref().map(PhoneNumber::as_str),
            source: prospect.source.as_str(),
            status: prospect.status.as_str(),
            vehicle_id: prospect.vehicle_id.map(VehicleId::get),
            notes: prospect.notes.as_ref().map(|notes| notes.as_str()),
            updated_at,
        }
    }
}
