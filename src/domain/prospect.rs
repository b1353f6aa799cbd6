use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::spcc::SpccClassification;
use crate::domain::types::{
    AgencyId, LeadSource, PhoneNumber, ProspectEmail, ProspectId, ProspectName, SanitizedText,
    UserId, VehicleId,
};

text_enum!(
    /// Sales funnel stage of a prospect.
    ProspectStatus,
    "prospect status",
    { New, Contacted, Appointment, TestDrive, Negotiation, Sold, Lost }
);

impl ProspectStatus {
    /// Stages that still count toward a salesperson's load.
    pub const OPEN: &'static [ProspectStatus] = &[
        ProspectStatus::New,
        ProspectStatus::Contacted,
        ProspectStatus::Appointment,
        ProspectStatus::TestDrive,
        ProspectStatus::Negotiation,
    ];

    pub fn is_open(self) -> bool {
        !matches!(self, ProspectStatus::Sold | ProspectStatus::Lost)
    }
}

impl Default for ProspectStatus {
    fn default() -> Self {
        ProspectStatus::New
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Prospect {
    pub id: ProspectId,
    pub agency_id: AgencyId,
    pub user_id: Option<UserId>,
    pub vehicle_id: Option<VehicleId>,
    pub name: ProspectName,
    pub email: Option<ProspectEmail>,
    pub phone: Option<PhoneNumber>,
    pub source: LeadSource,
    pub status: ProspectStatus,
    pub notes: Option<String>,
    pub spcc_score: Option<i32>,
    pub spcc_classification: Option<SpccClassification>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewProspect {
    pub agency_id: AgencyId,
    pub user_id: Option<UserId>,
    pub vehicle_id: Option<VehicleId>,
    pub name: ProspectName,
    pub email: Option<ProspectEmail>,
    pub phone: Option<PhoneNumber>,
    pub source: LeadSource,
    pub status: ProspectStatus,
    pub notes: Option<SanitizedText>,
}

impl NewProspect {
    #[must_use]
    pub fn new(agency_id: AgencyId, name: ProspectName, source: LeadSource) -> Self {
        Self {
            agency_id,
            user_id: None,
            vehicle_id: None,
            name,
            email: None,
            phone: None,
            source,
            status: ProspectStatus::New,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_contact(mut self, email: Option<ProspectEmail>, phone: Option<PhoneNumber>) -> Self {
        self.email = email;
        self.phone = phone;
        self
    }

    #[must_use]
    pub fn assigned_to(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    #[must_use]
    pub fn interested_in(mut self, vehicle_id: Option<VehicleId>) -> Self {
        self.vehicle_id = vehicle_id;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: Option<SanitizedText>) -> Self {
        self.notes = notes;
        self
    }
}

/// Editable fields of a prospect.
#[derive(Clone, Debug)]
pub struct UpdateProspect {
    pub name: ProspectName,
    pub email: Option<ProspectEmail>,
    pub phone: Option<PhoneNumber>,
    pub source: LeadSource,
    pub status: ProspectStatus,
    pub vehicle_id: Option<VehicleId>,
    pub notes: Option<SanitizedText>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_statuses_are_not_open() {
        assert!(ProspectStatus::Negotiation.is_open());
        assert!(!ProspectStatus::Sold.is_open());
        assert!(!ProspectStatus::Lost.is_open());
        assert!(ProspectStatus::OPEN.iter().all(|status| status.is_open()));
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("TestDrive".parse::<ProspectStatus>(), Ok(ProspectStatus::TestDrive));
        assert!("Ganado".parse::<ProspectStatus>().is_err());
    }
}
