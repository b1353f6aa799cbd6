//! Diesel models for commission rules and commissions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::commission::{
    Commission as DomainCommission, CommissionRule as DomainCommissionRule,
    NewCommission as DomainNewCommission, NewCommissionRule as DomainNewCommissionRule,
};
use crate::domain::types::{
    AgencyId, BasisPoints, CommissionId, CommissionRuleId, MoneyCents, ProspectId,
    TypeConstraintError, UserId, VehicleId,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::commission_rules)]
pub struct CommissionRule {
    pub id: i32,
    pub agency_id: i32,
    pub sale_type: String,
    pub percent_bp: i32,
    pub fixed_bonus_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::commission_rules)]
pub struct NewCommissionRule<'a> {
    pub agency_id: i32,
    pub sale_type: &'a str,
    pub percent_bp: i32,
    pub fixed_bonus_cents: i64,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::commissions)]
pub struct Commission {
    pub id: i32,
    pub agency_id: i32,
    pub user_id: i32,
    pub prospect_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    pub sale_type: String,
    pub sale_amount_cents: i64,
    pub commission_cents: i64,
    pub status: String,
    pub sold_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::commissions)]
pub struct NewCommission<'a> {
    pub agency_id: i32,
    pub user_id: i32,
    pub prospect_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    pub sale_type: &'a str,
    pub sale_amount_cents: i64,
    pub commission_cents: i64,
    pub sold_at: NaiveDateTime,
}

impl TryFrom<CommissionRule> for DomainCommissionRule {
    type Error = TypeConstraintError;

    fn try_from(rule: CommissionRule) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommissionRuleId::new(rule.id)?,
            agency_id: AgencyId::new(rule.agency_id)?,
            sale_type: rule.sale_type.parse()?,
            percent: BasisPoints::new(rule.percent_bp)?,
            fixed_bonus: MoneyCents::new(rule.fixed_bonus_cents)?,
        })
    }
}

impl<'a> From<&'a DomainNewCommissionRule> for NewCommissionRule<'a> {
    fn from(rule: &'a DomainNewCommissionRule) -> Self {
        Self {
            agency_id: rule.agency_id.get(),
            sale_type: rule.sale_type.as_str(),
            percent_bp: rule.percent.get(),
            fixed_bonus_cents: rule.fixed_bonus.get(),
        }
    }
}

impl TryFrom<Commission> for DomainCommission {
    type Error = TypeConstraintError;

    fn try_from(commission: Commission) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommissionId::new(commission.id)?,
            agency_id: AgencyId::new(commission.agency_id)?,
            user_id: UserId::new(commission.user_id)?,
            prospect_id: commission.prospect_id.map(ProspectId::new).transpose()?,
            vehicle_id: commission.vehicle_id.map(VehicleId::new).transpose()?,
            sale_type: commission.sale_type.parse()?,
            sale_amount: MoneyCents::new(commission.sale_amount_cents)?,
            commission: MoneyCents::new(commission.commission_cents)?,
            status: commission.status.parse()?,
            sold_at: commission.sold_at,
            created_at: commission.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCommission> for NewCommission<'a> {
    fn from(commission: &'a DomainNewCommission) -> Self {
        Self {
            agency_id: commission.agency_id.get(),
            user_id: commission.user_id.get(),
            prospect_id: commission.prospect_id.map(ProspectId::get),
            vehicle_id: commission.vehicle_id.map(VehicleId::get),
            sale_type: commission.sale_type.as_str(),
            sale_amount_cents: commission.sale_amount.get(),
            commission_cents: commission.commission.get(),
            sold_at: commission.sold_at,
        }
    }
}
