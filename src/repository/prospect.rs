//! Repository implementation for prospects.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::prospect::{NewProspect, Prospect, ProspectStatus, UpdateProspect};
use crate::domain::types::{AgencyId, ProspectId, UserId};
use crate::models::prospect::{
    NewProspect as DbNewProspect, Prospect as DbProspect, UpdateProspect as DbUpdateProspect,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, ProspectListQuery, ProspectReader, ProspectWriter, like_pattern,
};

impl ProspectReader for DieselRepository {
    fn get_prospect_by_id(
        &self,
        id: ProspectId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Prospect>> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let db_prospect = prospects::table
            .filter(prospects::id.eq(id.get()))
            .filter(prospects::agency_id.eq(agency_id.get()))
            .first::<DbProspect>(&mut conn)
            .optional()?;

        db_prospect
            .map(|prospect| Prospect::try_from(prospect).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_prospects(&self, query: ProspectListQuery) -> RepositoryResult<(usize, Vec<Prospect>)> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = prospects::table
                .filter(prospects::agency_id.eq(query.agency_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(user_id) = query.user_id {
                items = items.filter(prospects::user_id.eq(user_id.get()));
            }

            if let Some(status) = query.status {
                items = items.filter(prospects::status.eq(status.as_str()));
            }

            if let Some(classification) = query.classification {
                items = items.filter(prospects::spcc_classification.eq(classification.as_str()));
            }

            if let Some(search) = query.search.as_deref().map(str::trim)
                && !search.is_empty()
            {
                let pattern = like_pattern(search);
                items = items.filter(
                    prospects::name
                        .like(pattern.clone())
                        .escape('\\')
                        .or(prospects::email.like(pattern.clone()).escape('\\'))
                        .or(prospects::phone.like(pattern).escape('\\')),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_prospects = items
            .order((prospects::created_at.desc(), prospects::id.desc()))
            .load::<DbProspect>(&mut conn)?;

        let prospects = db_prospects
            .into_iter()
            .map(|prospect| Prospect::try_from(prospect).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, prospects))
    }

    fn list_recent_open_prospects(
        &self,
        agency_id: AgencyId,
        user_id: UserId,
        limit: usize,
    ) -> RepositoryResult<Vec<Prospect>> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let open_statuses: Vec<&str> = ProspectStatus::OPEN.iter().map(|s| s.as_str()).collect();

        let db_prospects = prospects::table
            .filter(prospects::agency_id.eq(agency_id.get()))
            .filter(prospects::user_id.eq(user_id.get()))
            .filter(prospects::status.eq_any(open_statuses))
            .order((prospects::created_at.desc(), prospects::id.desc()))
            .limit(limit as i64)
            .load::<DbProspect>(&mut conn)?;

        db_prospects
            .into_iter()
            .map(|prospect| Prospect::try_from(prospect).map_err(RepositoryError::from))
            .collect()
    }
}

impl ProspectWriter for DieselRepository {
    fn create_prospect(&self, new_prospect: &NewProspect) -> RepositoryResult<Prospect> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let db_new_prospect: DbNewProspect = new_prospect.into();

        let db_prospect = diesel::insert_into(prospects::table)
            .values(&db_new_prospect)
            .get_result::<DbProspect>(&mut conn)?;

        Ok(Prospect::try_from(db_prospect)?)
    }

    fn create_prospects(&self, new_prospects: &[NewProspect]) -> RepositoryResult<usize> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewProspect> = new_prospects.iter().map(Into::into).collect();

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::insert_into(prospects::table)
                .values(&insertables)
                .execute(conn)
        })
        .map_err(RepositoryError::from)
    }

    fn update_prospect(
        &self,
        id: ProspectId,
        agency_id: AgencyId,
        updates: &UpdateProspect,
    ) -> RepositoryResult<Prospect> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProspect::from_domain(updates, Utc::now().naive_utc());

        let db_prospect = diesel::update(
            prospects::table
                .filter(prospects::id.eq(id.get()))
                .filter(prospects::agency_id.eq(agency_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbProspect>(&mut conn)?;

        Ok(Prospect::try_from(db_prospect)?)
    }

    fn set_prospect_status(
        &self,
        id: ProspectId,
        agency_id: AgencyId,
        status: ProspectStatus,
    ) -> RepositoryResult<Prospect> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let db_prospect = diesel::update(
            prospects::table
                .filter(prospects::id.eq(id.get()))
                .filter(prospects::agency_id.eq(agency_id.get())),
        )
        .set((
            prospects::status.eq(status.as_str()),
            prospects::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbProspect>(&mut conn)?;

        Ok(Prospect::try_from(db_prospect)?)
    }

    fn assign_prospects(
        &self,
        agency_id: AgencyId,
        user_id: Option<UserId>,
        prospect_ids: &[ProspectId],
    ) -> RepositoryResult<usize> {
        use crate::schema::prospects;

        if prospect_ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let ids: Vec<i32> = prospect_ids.iter().map(|id| id.get()).collect();

        let affected = diesel::update(
            prospects::table
                .filter(prospects::agency_id.eq(agency_id.get()))
                .filter(prospects::id.eq_any(ids)),
        )
        .set((
            prospects::user_id.eq(user_id.map(|id| id.get())),
            prospects::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_prospect(&self, id: ProspectId, agency_id: AgencyId) -> RepositoryResult<()> {
        use crate::schema::prospects;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            prospects::table
                .filter(prospects::id.eq(id.get()))
                .filter(prospects::agency_id.eq(agency_id.get())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
