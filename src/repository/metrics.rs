//! Aggregate queries backing dashboards and the health check.

use std::collections::BTreeMap;

use diesel::dsl::count_star;
use diesel::prelude::*;

use crate::domain::prospect::ProspectStatus;
use crate::domain::spcc::SpccClassification;
use crate::domain::types::{AgencyId, UserId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DateRange, DieselRepository, HealthReader, MetricsReader, SalespersonCounts};

impl MetricsReader for DieselRepository {
    fn count_prospects_by_status(
        &self,
        agency_id: AgencyId,
        range: DateRange,
    ) -> RepositoryResult<Vec<(ProspectStatus, i64)>> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let rows = prospects::table
            .filter(prospects::agency_id.eq(agency_id.get()))
            .filter(prospects::created_at.ge(range.from))
            .filter(prospects::created_at.lt(range.to))
            .group_by(prospects::status)
            .select((prospects::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        rows.into_iter()
            .map(|(status, count)| {
                let status = status.parse::<ProspectStatus>()?;
                Ok((status, count))
            })
            .collect()
    }

    fn count_prospects_by_classification(
        &self,
        agency_id: AgencyId,
        range: DateRange,
    ) -> RepositoryResult<Vec<(Option<SpccClassification>, i64)>> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let rows = prospects::table
            .filter(prospects::agency_id.eq(agency_id.get()))
            .filter(prospects::created_at.ge(range.from))
            .filter(prospects::created_at.lt(range.to))
            .group_by(prospects::spcc_classification)
            .select((prospects::spcc_classification, count_star()))
            .load::<(Option<String>, i64)>(&mut conn)?;

        rows.into_iter()
            .map(|(classification, count)| {
                let classification = classification
                    .as_deref()
                    .map(str::parse::<SpccClassification>)
                    .transpose()?;
                Ok((classification, count))
            })
            .collect()
    }

    fn count_prospects_by_source(
        &self,
        agency_id: AgencyId,
        range: DateRange,
    ) -> RepositoryResult<Vec<(String, i64)>> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let rows = prospects::table
            .filter(prospects::agency_id.eq(agency_id.get()))
            .filter(prospects::created_at.ge(range.from))
            .filter(prospects::created_at.lt(range.to))
            .group_by(prospects::source)
            .select((prospects::source, count_star()))
            .order(prospects::source.asc())
            .load::<(String, i64)>(&mut conn)?;

        Ok(rows)
    }

    fn count_recordings(&self, agency_id: AgencyId, range: DateRange) -> RepositoryResult<i64> {
        use crate::schema::recordings;

        let mut conn = self.conn()?;
        let total = recordings::table
            .filter(recordings::agency_id.eq(agency_id.get()))
            .filter(recordings::created_at.ge(range.from))
            .filter(recordings::created_at.lt(range.to))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total)
    }

    fn count_prospects_by_user(
        &self,
        agency_id: AgencyId,
        range: DateRange,
    ) -> RepositoryResult<Vec<SalespersonCounts>> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let rows = prospects::table
            .filter(prospects::agency_id.eq(agency_id.get()))
            .filter(prospects::created_at.ge(range.from))
            .filter(prospects::created_at.lt(range.to))
            .filter(prospects::user_id.is_not_null())
            .group_by((prospects::user_id, prospects::status))
            .select((prospects::user_id, prospects::status, count_star()))
            .load::<(Option<i32>, String, i64)>(&mut conn)?;

        let mut per_user: BTreeMap<i32, SalespersonCounts> = BTreeMap::new();
        for (user_id, status, count) in rows {
            let Some(user_id) = user_id else {
                continue;
            };
            let status = status.parse::<ProspectStatus>()?;
            let user_id = UserId::new(user_id)?;
            let entry = per_user.entry(user_id.get()).or_insert(SalespersonCounts {
                user_id,
                open: 0,
                sold: 0,
                total: 0,
            });
            entry.total += count;
            if status == ProspectStatus::Sold {
                entry.sold += count;
            } else if status.is_open() {
                entry.open += count;
            }
        }

        Ok(per_user.into_values().collect())
    }
}

impl HealthReader for DieselRepository {
    fn ping(&self) -> RepositoryResult<()> {
        use diesel::connection::SimpleConnection;

        let mut conn = self.conn()?;
        conn.batch_execute("SELECT 1")
            .map_err(RepositoryError::from)
    }
}
