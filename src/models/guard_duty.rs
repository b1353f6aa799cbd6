//! Diesel model for the guard-duty roster.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::guard_duty::GuardDuty as DomainGuardDuty;
use crate::domain::types::{AgencyId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::guard_duties)]
pub struct GuardDuty {
    pub agency_id: i32,
    pub duty_date: NaiveDate,
    pub user_id: i32,
}

impl TryFrom<GuardDuty> for DomainGuardDuty {
    type Error = TypeConstraintError;

    fn try_from(duty: GuardDuty) -> Result<Self, Self::Error> {
        Ok(Self {
            agency_id: AgencyId::new(duty.agency_id)?,
            duty_date: duty.duty_date,
            user_id: UserId::new(duty.user_id)?,
        })
    }
}

impl From<&DomainGuardDuty> for GuardDuty {
    fn from(duty: &DomainGuardDuty) -> Self {
        Self {
            agency_id: duty.agency_id.get(),
            duty_date: duty.duty_date,
            user_id: duty.user_id.get(),
        }
    }
}
