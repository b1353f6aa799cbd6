//! Guard duty roster and lead balancing forms.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{ProspectId, UserId};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Replaces the roster of `date`; an empty list clears it.
pub struct RosterForm {
    pub date: NaiveDate,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub user_ids: Vec<i32>,
}

pub struct RosterPayload {
    pub date: NaiveDate,
    pub user_ids: Vec<UserId>,
}

impl TryFrom<RosterForm> for RosterPayload {
    type Error = FormError;

    fn try_from(form: RosterForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let mut user_ids = form
            .user_ids
            .into_iter()
            .map(|id| UserId::new(id).map_err(|_| FormError::InvalidId("user")))
            .collect::<Result<Vec<_>, _>>()?;
        user_ids.sort_unstable();
        user_ids.dedup();
        Ok(Self {
            date: form.date,
            user_ids,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RosterDateParams {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct AutoAssignForm {
    pub prospect_id: i32,
    pub date: Option<NaiveDate>,
}

pub struct AutoAssignPayload {
    pub prospect_id: ProspectId,
    pub date: Option<NaiveDate>,
}

impl TryFrom<AutoAssignForm> for AutoAssignPayload {
    type Error = FormError;

    fn try_from(form: AutoAssignForm) -> Result<Self, Self::Error> {
        Ok(Self {
            prospect_id: ProspectId::new(form.prospect_id)
                .map_err(|_| FormError::InvalidId("prospect"))?,
            date: form.date,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransferForm {
    pub from_user_id: i32,
    pub to_user_id: i32,
    #[validate(range(min = 1, max = 500))]
    pub count: usize,
}

pub struct TransferPayload {
    pub from: UserId,
    pub to: UserId,
    pub count: usize,
}

impl TryFrom<TransferForm> for TransferPayload {
    type Error = FormError;

    fn try_from(form: TransferForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let from = UserId::new(form.from_user_id).map_err(|_| FormError::InvalidId("user"))?;
        let to = UserId::new(form.to_user_id).map_err(|_| FormError::InvalidId("user"))?;
        if from == to {
            return Err(FormError::InvalidValue(
                "cannot transfer prospects to the same salesperson".to_string(),
            ));
        }
        Ok(Self {
            from,
            to,
            count: form.count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_ids_are_deduplicated() {
        let form = RosterForm {
            date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            user_ids: vec![7, 2, 7],
        };
        let payload = RosterPayload::try_from(form).unwrap();
        assert_eq!(
            payload.user_ids.iter().map(|id| id.get()).collect::<Vec<_>>(),
            vec![2, 7]
        );
    }

    #[test]
    fn transfer_to_self_is_rejected() {
        let form = TransferForm {
            from_user_id: 3,
            to_user_id: 3,
            count: 2,
        };
        assert!(matches!(
            TransferPayload::try_from(form),
            Err(FormError::InvalidValue(_))
        ));
    }

    #[test]
    fn transfer_count_must_be_positive() {
        let form = TransferForm {
            from_user_id: 3,
            to_user_id: 4,
            count: 0,
        };
        assert!(matches!(
            TransferPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }
}
