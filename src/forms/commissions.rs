//! Commission rule, sale registration and reporting forms.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

use crate::domain::commission::{CommissionStatus, NewCommissionRule, SaleType};
use crate::domain::types::{AgencyId, BasisPoints, MoneyCents, ProspectId, UserId, VehicleId};
use crate::forms::{FormError, optional_id};
use crate::repository::DateRange;

#[derive(Debug, Deserialize)]
pub struct CommissionRuleForm {
    pub sale_type: SaleType,
    /// Basis points, `0..=10_000`.
    pub percent_bp: i32,
    /// Cents.
    #[serde(default)]
    pub fixed_bonus: i64,
}

impl CommissionRuleForm {
    pub fn into_domain(self, agency_id: AgencyId) -> Result<NewCommissionRule, FormError> {
        Ok(NewCommissionRule {
            agency_id,
            sale_type: self.sale_type,
            percent: BasisPoints::new(self.percent_bp)?,
            fixed_bonus: MoneyCents::new(self.fixed_bonus)?,
        })
    }
}

#[derive(Debug, Deserialize)]
/// A closed sale; the seller defaults to the caller.
pub struct RegisterSaleForm {
    pub user_id: Option<i32>,
    pub prospect_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    pub sale_type: SaleType,
    /// Cents.
    pub sale_amount: i64,
    pub sold_at: Option<NaiveDateTime>,
}

pub struct RegisterSalePayload {
    pub user_id: Option<UserId>,
    pub prospect_id: Option<ProspectId>,
    pub vehicle_id: Option<VehicleId>,
    pub sale_type: SaleType,
    pub sale_amount: MoneyCents,
    pub sold_at: NaiveDateTime,
}

impl TryFrom<RegisterSaleForm> for RegisterSalePayload {
    type Error = FormError;

    fn try_from(form: RegisterSaleForm) -> Result<Self, Self::Error> {
        let sale_amount = MoneyCents::new(form.sale_amount)?;
        if sale_amount == MoneyCents::ZERO {
            return Err(FormError::InvalidValue(
                "sale amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            user_id: optional_id(form.user_id, "user")?,
            prospect_id: optional_id(form.prospect_id, "prospect")?,
            vehicle_id: optional_id(form.vehicle_id, "vehicle")?,
            sale_type: form.sale_type,
            sale_amount,
            sold_at: form.sold_at.unwrap_or_else(|| Utc::now().naive_utc()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CommissionStatusForm {
    pub status: CommissionStatus,
}

#[derive(Debug, Default, Deserialize)]
/// `from`/`to` dates, both inclusive; defaults to the last 30 days.
pub struct DateRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Days covered when a report range is omitted.
pub const DEFAULT_REPORT_DAYS: u64 = 30;

impl DateRangeParams {
    pub fn into_range(self, today: NaiveDate) -> Result<DateRange, FormError> {
        let to = self.to.unwrap_or(today);
        let from = match self.from {
            Some(from) => from,
            None => to
                .checked_sub_days(Days::new(DEFAULT_REPORT_DAYS - 1))
                .ok_or_else(|| FormError::InvalidValue("range end is out of bounds".to_string()))?,
        };
        if from > to {
            return Err(FormError::InvalidValue(
                "range start is after its end".to_string(),
            ));
        }
        let end = to
            .succ_opt()
            .ok_or_else(|| FormError::InvalidValue("range end is out of bounds".to_string()))?;
        Ok(DateRange::new(from.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN)))
    }
}
