//! Daily guard-duty roster and lead load balancing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AgencyId, UserId};
use crate::domain::user::User;

/// A salesperson on the roster of a given day.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuardDuty {
    pub agency_id: AgencyId,
    pub duty_date: NaiveDate,
    pub user_id: UserId,
}

/// Open prospect count of a salesperson.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UserLoad {
    pub user: User,
    pub open_prospects: i64,
}

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
pub struct LoadStats {
    pub min: i64,
    pub max: i64,
    pub average: f64,
}

impl LoadStats {
    /// All zeros for an empty roster.
    pub fn from_loads(loads: &[UserLoad]) -> Self {
        if loads.is_empty() {
            return Self::default();
        }

        let counts = loads.iter().map(|load| load.open_prospects);
        let min = counts.clone().min().unwrap_or_default();
        let max = counts.clone().max().unwrap_or_default();
        let total: i64 = counts.sum();

        Self {
            min,
            max,
            average: total as f64 / loads.len() as f64,
        }
    }
}

/// Least-loaded active user; ties go to the lowest user id.
pub fn pick_assignee(loads: &[UserLoad]) -> Option<UserId> {
    loads
        .iter()
        .filter(|load| load.user.is_active)
        .min_by_key(|load| (load.open_prospects, load.user.id))
        .map(|load| load.user.id)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{UserEmail, UserName};

    fn load(id: i32, open: i64, is_active: bool) -> UserLoad {
        UserLoad {
            user: User {
                id: UserId::new(id).unwrap(),
                agency_id: AgencyId::new(1).unwrap(),
                name: UserName::new(format!("Vendedor {id}")).unwrap(),
                email: UserEmail::new(format!("v{id}@agencia.mx")).unwrap(),
                is_active,
                created_at: Utc::now().naive_utc(),
            },
            open_prospects: open,
        }
    }

    #[test]
    fn stats_of_empty_roster_are_zero() {
        assert_eq!(LoadStats::from_loads(&[]), LoadStats::default());
    }

    #[test]
    fn stats_min_max_average() {
        let stats = LoadStats::from_loads(&[load(1, 2, true), load(2, 7, true), load(3, 3, true)]);
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 7);
        assert!((stats.average - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn picks_least_loaded_with_lowest_id_on_tie() {
        let loads = vec![load(5, 1, true), load(3, 1, true), load(2, 4, true)];
        assert_eq!(pick_assignee(&loads), Some(UserId::new(3).unwrap()));
    }

    #[test]
    fn skips_inactive_users() {
        let loads = vec![load(1, 0, false), load(2, 3, true)];
        assert_eq!(pick_assignee(&loads), Some(UserId::new(2).unwrap()));
        assert_eq!(pick_assignee(&[load(1, 0, false)]), None);
        assert_eq!(pick_assignee(&[]), None);
    }
}
