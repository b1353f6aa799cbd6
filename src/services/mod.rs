//! Business operations. Every function checks the caller's roles, scopes
//! reads and writes to the caller's agency and works against repository
//! traits so it can run on the Diesel repository or a mock.

use crate::domain::types::{AgencyId, UserId};
use crate::domain::user::{NewUser, User};
use crate::models::auth::AuthenticatedUser;
use crate::repository::UserWriter;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE, SERVICE_SALES_ROLE};

pub mod commissions;
pub mod errors;
pub mod guard_duty;
pub mod health;
pub mod metrics;
pub mod prospects;
pub mod recordings;
pub mod spcc;
pub mod tenancy;
pub mod training;
pub mod users;
pub mod vehicles;
pub mod zones;

pub use errors::{ServiceError, ServiceResult};

/// Default page size for paginated listings.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Fails with [`ServiceError::Unauthorized`] unless the caller holds `role`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if user.has_role(role) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

pub fn ensure_access(user: &AuthenticatedUser) -> ServiceResult<()> {
    ensure_role(user, SERVICE_ACCESS_ROLE)
}

pub fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    ensure_access(user)?;
    ensure_role(user, SERVICE_ADMIN_ROLE)
}

pub fn is_admin(user: &AuthenticatedUser) -> bool {
    user.has_role(SERVICE_ADMIN_ROLE)
}

/// Salespeople without the manager role only see records assigned to them.
pub fn is_restricted_to_own(user: &AuthenticatedUser) -> bool {
    user.has_role(SERVICE_SALES_ROLE) && !is_admin(user)
}

pub fn agency_of(user: &AuthenticatedUser) -> ServiceResult<AgencyId> {
    AgencyId::new(user.agency_id).map_err(|_| ServiceError::Unauthorized)
}

/// Registers the caller in the agency user table, refreshing the name.
pub fn upsert_current_user<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let new_user = NewUser::try_from(user).map_err(|err| {
        log::error!("Invalid identity for {}: {err}", user.email);
        ServiceError::Unauthorized
    })?;

    repo.create_or_update_user(&new_user).map_err(|err| {
        log::error!("Failed to upsert user {}: {err}", user.email);
        ServiceError::from(err)
    })
}

/// Parses a raw id coming from a path segment.
pub fn parse_user_id(id: i32) -> ServiceResult<UserId> {
    UserId::new(id).map_err(|_| ServiceError::NotFound)
}

#[cfg(all(test, feature = "test-mocks"))]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    use serde_json::Value;

    use crate::domain::prospect::{Prospect, ProspectStatus};
    use crate::domain::prospect_event::{NewProspectEvent, ProspectEvent};
    use crate::domain::types::{
        AgencyId, LeadSource, ProspectEventId, ProspectId, ProspectName, UserEmail, UserId,
        UserName,
    };
    use crate::domain::user::User;
    use crate::models::auth::AuthenticatedUser;

    pub fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 10)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    pub fn identity(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "7".into(),
            email: "seller@dealer.test".into(),
            agency_id: 1,
            name: "Seller".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 4_102_444_800,
        }
    }

    pub fn admin() -> AuthenticatedUser {
        identity(&["crm", "crm_admin"])
    }

    pub fn seller() -> AuthenticatedUser {
        identity(&["crm", "crm_sales"])
    }

    pub fn user(id: i32, name: &str) -> User {
        User {
            id: UserId::new(id).unwrap(),
            agency_id: AgencyId::new(1).unwrap(),
            name: UserName::new(name).unwrap(),
            email: UserEmail::new(format!("{}@dealer.test", name.to_lowercase())).unwrap(),
            is_active: true,
            created_at: timestamp(),
        }
    }

    pub fn prospect(id: i32, user_id: Option<i32>, status: ProspectStatus) -> Prospect {
        Prospect {
            id: ProspectId::new(id).unwrap(),
            agency_id: AgencyId::new(1).unwrap(),
            user_id: user_id.map(|uid| UserId::new(uid).unwrap()),
            vehicle_id: None,
            name: ProspectName::new(format!("Prospect {id}")).unwrap(),
            email: None,
            phone: None,
            source: LeadSource::new("web").unwrap(),
            status,
            notes: None,
            spcc_score: None,
            spcc_classification: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    /// Echoes a new event back as if it had been stored with id 1.
    pub fn stored_event(event: &NewProspectEvent) -> ProspectEvent {
        ProspectEvent {
            id: ProspectEventId::new(1).unwrap(),
            prospect_id: event.prospect_id,
            user_id: event.user_id,
            event_type: event.event_type,
            event_data: event.event_data.clone(),
            created_at: timestamp(),
        }
    }

    pub fn event_field<'a>(event: &'a NewProspectEvent, key: &str) -> &'a Value {
        &event.event_data[key]
    }
}
