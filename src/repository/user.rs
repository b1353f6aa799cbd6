//! Repository implementation for agency users.

use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::domain::guard_duty::UserLoad;
use crate::domain::prospect::ProspectStatus;
use crate::domain::types::{AgencyId, UserEmail, UserId};
use crate::domain::user::{NewUser, User};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserReader, UserWriter};

impl UserWriter for DieselRepository {
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_new_user: DbNewUser = new_user.into();

        let db_user = diesel::insert_into(users::table)
            .values(&db_new_user)
            .on_conflict((users::email, users::agency_id))
            .do_update()
            .set(users::name.eq(excluded(users::name)))
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(db_user)?)
    }

    fn set_user_active(
        &self,
        id: UserId,
        agency_id: AgencyId,
        is_active: bool,
    ) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = diesel::update(
            users::table
                .filter(users::id.eq(id.get()))
                .filter(users::agency_id.eq(agency_id.get())),
        )
        .set(users::is_active.eq(is_active))
        .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(db_user)?)
    }
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId, agency_id: AgencyId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::id.eq(id.get()))
            .filter(users::agency_id.eq(agency_id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_user_by_email(
        &self,
        email: &UserEmail,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::email.eq(email.as_str()))
            .filter(users::agency_id.eq(agency_id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_users(&self, agency_id: AgencyId) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_users = users::table
            .filter(users::agency_id.eq(agency_id.get()))
            .order(users::name.asc())
            .load::<DbUser>(&mut conn)?;

        db_users
            .into_iter()
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .collect()
    }

    fn list_user_loads(
        &self,
        agency_id: AgencyId,
        user_ids: Option<Vec<UserId>>,
    ) -> RepositoryResult<Vec<UserLoad>> {
        use crate::schema::{prospects, users};

        let mut conn = self.conn()?;

        let mut query = users::table
            .filter(users::agency_id.eq(agency_id.get()))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ids) = user_ids {
            let ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
            query = query.filter(users::id.eq_any(ids));
        }
        let db_users = query.order(users::id.asc()).load::<DbUser>(&mut conn)?;

        let open_statuses: Vec<&str> = ProspectStatus::OPEN.iter().map(|s| s.as_str()).collect();
        let user_ids: Vec<i32> = db_users.iter().map(|user| user.id).collect();
        let counts: HashMap<i32, i64> = prospects::table
            .filter(prospects::agency_id.eq(agency_id.get()))
            .filter(prospects::status.eq_any(open_statuses))
            .filter(prospects::user_id.eq_any(user_ids))
            .group_by(prospects::user_id)
            .select((prospects::user_id, count_star()))
            .load::<(Option<i32>, i64)>(&mut conn)?
            .into_iter()
            .filter_map(|(user_id, count)| user_id.map(|id| (id, count)))
            .collect();

        db_users
            .into_iter()
            .map(|db_user| {
                let open_prospects = counts.get(&db_user.id).copied().unwrap_or(0);
                let user = User::try_from(db_user).map_err(RepositoryError::from)?;
                Ok(UserLoad {
                    user,
                    open_prospects,
                })
            })
            .collect()
    }
}
