use std::collections::{HashMap, HashSet};

use diesel::prelude::*;

use crate::domain::prospect_event::{NewProspectEvent, ProspectEvent};
use crate::domain::user::User;
use crate::models::prospect_event::{
    NewProspectEvent as DbNewProspectEvent, ProspectEvent as DbProspectEvent,
};
use crate::models::user::User as DbUser;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, ProspectEventListQuery, ProspectEventReader, ProspectEventWriter,
};

impl ProspectEventReader for DieselRepository {
    fn list_prospect_events(
        &self,
        query: ProspectEventListQuery,
    ) -> RepositoryResult<(usize, Vec<(ProspectEvent, User)>)> {
        use crate::schema::{prospect_events, users};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = prospect_events::table
                .filter(prospect_events::prospect_id.eq(query.prospect_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(event_type) = &query.event_type {
                items = items.filter(prospect_events::event_type.eq(event_type.as_str()));
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

        let db_events = items
            .order((prospect_events::created_at.desc(), prospect_events::id.desc()))
            .load::<DbProspectEvent>(&mut conn)?;

        let user_ids: Vec<i32> = db_events
            .iter()
            .map(|event| event.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let user_map: HashMap<i32, DbUser> = users::table
            .filter(users::id.eq_any(user_ids))
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let combined = db_events
            .into_iter()
            .filter_map(|event| {
                user_map
                    .get(&event.user_id)
                    .map(|user| (event, user.clone()))
            })
            .map(|(event, user)| {
                let event = ProspectEvent::try_from(event).map_err(RepositoryError::from)?;
                let user = User::try_from(user).map_err(RepositoryError::from)?;
                Ok((event, user))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, combined))
    }
}

impl ProspectEventWriter for DieselRepository {
    fn create_prospect_event(&self, event: &NewProspectEvent) -> RepositoryResult<ProspectEvent> {
        use crate::schema::prospect_events;

        let mut conn = self.conn()?;
        let db_new_event: DbNewProspectEvent = event.into();

        let db_event = diesel::insert_into(prospect_events::table)
            .values(&db_new_event)
            .get_result::<DbProspectEvent>(&mut conn)?;

        Ok(ProspectEvent::try_from(db_event)?)
    }
}
