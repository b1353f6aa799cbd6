use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::guard_duty::GuardDuty;
use crate::domain::types::{AgencyId, UserId};
use crate::models::guard_duty::GuardDuty as DbGuardDuty;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, GuardDutyReader, GuardDutyWriter};

impl GuardDutyReader for DieselRepository {
    fn list_roster(&self, agency_id: AgencyId, date: NaiveDate) -> RepositoryResult<Vec<GuardDuty>> {
        use crate::schema::guard_duties;

        let mut conn = self.conn()?;
        let db_duties = guard_duties::table
            .filter(guard_duties::agency_id.eq(agency_id.get()))
            .filter(guard_duties::duty_date.eq(date))
            .order(guard_duties::user_id.asc())
            .load::<DbGuardDuty>(&mut conn)?;

        db_duties
            .into_iter()
            .map(|duty| GuardDuty::try_from(duty).map_err(RepositoryError::from))
            .collect()
    }
}

impl GuardDutyWriter for DieselRepository {
    fn replace_roster(
        &self,
        agency_id: AgencyId,
        date: NaiveDate,
        user_ids: &[UserId],
    ) -> RepositoryResult<usize> {
        use crate::schema::guard_duties;

        let mut conn = self.conn()?;

        let rows = user_ids
            .iter()
            .map(|user_id| DbGuardDuty {
                agency_id: agency_id.get(),
                duty_date: date,
                user_id: user_id.get(),
            })
            .collect::<Vec<_>>();

        conn.transaction::<usize, diesel::result::Error, _>(move |conn| {
            diesel::delete(
                guard_duties::table
                    .filter(guard_duties::agency_id.eq(agency_id.get()))
                    .filter(guard_duties::duty_date.eq(date)),
            )
            .execute(conn)?;

            if rows.is_empty() {
                return Ok(0);
            }

            diesel::insert_into(guard_duties::table)
                .values(rows)
                .execute(conn)
        })
        .map_err(RepositoryError::from)
    }
}
