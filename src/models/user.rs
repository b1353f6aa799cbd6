//! Diesel models representing salespeople.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{AgencyId, TypeConstraintError, UserEmail, UserId, UserName};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub agency_id: i32,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`].
pub struct NewUser<'a> {
    pub agency_id: i32,
    pub name: &'a str,
    pub email: &'a str,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(user.id)?,
            agency_id: AgencyId::new(user.agency_id)?,
            name: UserName::new(user.name)?,
            email: UserEmail::new(user.email)?,
            is_active: user.is_active,
            created_at: user.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            agency_id: user.agency_id.get(),
            name: user.name.as_str(),
            email: user.email.as_str(),
        }
    }
}
