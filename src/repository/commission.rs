//! Repository implementation for commission rules and earned commissions.

use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::domain::commission::{
    Commission, CommissionRule, CommissionStatus, NewCommission, NewCommissionRule, SaleType,
};
use crate::domain::types::{AgencyId, CommissionId, UserId};
use crate::models::commission::{
    Commission as DbCommission, CommissionRule as DbCommissionRule,
    NewCommission as DbNewCommission, NewCommissionRule as DbNewCommissionRule,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CommissionReader, CommissionWriter, DateRange, DieselRepository};

impl CommissionReader for DieselRepository {
    fn get_commission_rule(
        &self,
        agency_id: AgencyId,
        sale_type: SaleType,
    ) -> RepositoryResult<Option<CommissionRule>> {
        use crate::schema::commission_rules;

        let mut conn = self.conn()?;
        let db_rule = commission_rules::table
            .filter(commission_rules::agency_id.eq(agency_id.get()))
            .filter(commission_rules::sale_type.eq(sale_type.as_str()))
            .first::<DbCommissionRule>(&mut conn)
            .optional()?;

        db_rule
            .map(|rule| CommissionRule::try_from(rule).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_commission_rules(&self, agency_id: AgencyId) -> RepositoryResult<Vec<CommissionRule>> {
        use crate::schema::commission_rules;

        let mut conn = self.conn()?;
        let db_rules = commission_rules::table
            .filter(commission_rules::agency_id.eq(agency_id.get()))
            .order(commission_rules::sale_type.asc())
            .load::<DbCommissionRule>(&mut conn)?;

        db_rules
            .into_iter()
            .map(|rule| CommissionRule::try_from(rule).map_err(RepositoryError::from))
            .collect()
    }

    fn get_commission_by_id(
        &self,
        id: CommissionId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Commission>> {
        use crate::schema::commissions;

        let mut conn = self.conn()?;
        let db_commission = commissions::table
            .filter(commissions::id.eq(id.get()))
            .filter(commissions::agency_id.eq(agency_id.get()))
            .first::<DbCommission>(&mut conn)
            .optional()?;

        db_commission
            .map(|commission| Commission::try_from(commission).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_commissions(
        &self,
        agency_id: AgencyId,
        range: DateRange,
        user_id: Option<UserId>,
    ) -> RepositoryResult<Vec<Commission>> {
        use crate::schema::commissions;

        let mut conn = self.conn()?;
        let mut query = commissions::table
            .filter(commissions::agency_id.eq(agency_id.get()))
            .filter(commissions::sold_at.ge(range.from))
            .filter(commissions::sold_at.lt(range.to))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(user_id) = user_id {
            query = query.filter(commissions::user_id.eq(user_id.get()));
        }

        let db_commissions = query
            .order((commissions::sold_at.desc(), commissions::id.desc()))
            .load::<DbCommission>(&mut conn)?;

        db_commissions
            .into_iter()
            .map(|commission| Commission::try_from(commission).map_err(RepositoryError::from))
            .collect()
    }
}

impl CommissionWriter for DieselRepository {
    fn upsert_commission_rule(&self, rule: &NewCommissionRule) -> RepositoryResult<CommissionRule> {
        use crate::schema::commission_rules;

        let mut conn = self.conn()?;
        let db_new_rule: DbNewCommissionRule = rule.into();

        let db_rule = diesel::insert_into(commission_rules::table)
            .values(&db_new_rule)
            .on_conflict((commission_rules::agency_id, commission_rules::sale_type))
            .do_update()
            .set((
                commission_rules::percent_bp.eq(excluded(commission_rules::percent_bp)),
                commission_rules::fixed_bonus_cents
                    .eq(excluded(commission_rules::fixed_bonus_cents)),
            ))
            .get_result::<DbCommissionRule>(&mut conn)?;

        Ok(CommissionRule::try_from(db_rule)?)
    }

    fn create_commission(&self, commission: &NewCommission) -> RepositoryResult<Commission> {
        use crate::schema::commissions;

        let mut conn = self.conn()?;
        let db_new_commission: DbNewCommission = commission.into();

        let db_commission = diesel::insert_into(commissions::table)
            .values(&db_new_commission)
            .get_result::<DbCommission>(&mut conn)?;

        Ok(Commission::try_from(db_commission)?)
    }

    fn set_commission_status(
        &self,
        id: CommissionId,
        agency_id: AgencyId,
        status: CommissionStatus,
    ) -> RepositoryResult<Commission> {
        use crate::schema::commissions;

        let mut conn = self.conn()?;
        let db_commission = diesel::update(
            commissions::table
                .filter(commissions::id.eq(id.get()))
                .filter(commissions::agency_id.eq(agency_id.get())),
        )
        .set(commissions::status.eq(status.as_str()))
        .get_result::<DbCommission>(&mut conn)?;

        Ok(Commission::try_from(db_commission)?)
    }
}
