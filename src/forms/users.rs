//! Forms for managing salespeople.

use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{AgencyId, UserEmail, UserName};
use crate::domain::user::NewUser;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Creates a salesperson or refreshes the name of an existing one.
pub struct AddUserForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

pub struct AddUserPayload {
    pub name: UserName,
    pub email: UserEmail,
}

impl TryFrom<AddUserForm> for AddUserPayload {
    type Error = FormError;

    fn try_from(form: AddUserForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: UserName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
        })
    }
}

impl AddUserPayload {
    pub fn into_domain(self, agency_id: AgencyId) -> NewUser {
        NewUser::new(agency_id, self.name, self.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct SetActiveForm {
    pub active: bool,
}
