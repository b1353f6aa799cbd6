//! Forms for dealership groups, brands and agencies.

use serde::Deserialize;
use validator::Validate;

use crate::domain::tenancy::NewAgency;
use crate::domain::types::{AgencyName, BrandId, BrandName, GroupId, GroupName};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct AddGroupForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl TryFrom<AddGroupForm> for GroupName {
    type Error = FormError;

    fn try_from(form: AddGroupForm) -> Result<Self, Self::Error> {
        form.validate()?;
        GroupName::new(form.name).map_err(|_| FormError::InvalidName)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddBrandForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl TryFrom<AddBrandForm> for BrandName {
    type Error = FormError;

    fn try_from(form: AddBrandForm) -> Result<Self, Self::Error> {
        form.validate()?;
        BrandName::new(form.name).map_err(|_| FormError::InvalidName)
    }
}

#[derive(Debug, Deserialize, Validate)]
/// New agency inside an existing group, selling an existing brand.
pub struct AddAgencyForm {
    pub group_id: Option<i32>,
    pub brand_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub city: Option<String>,
}

impl AddAgencyForm {
    /// Agencies default to the caller's own group.
    pub fn into_domain(self, default_group: GroupId) -> Result<NewAgency, FormError> {
        self.validate()?;
        let group_id = match self.group_id {
            Some(id) => GroupId::new(id).map_err(|_| FormError::InvalidId("group"))?,
            None => default_group,
        };
        let brand_id = BrandId::new(self.brand_id).map_err(|_| FormError::InvalidId("brand"))?;
        let name = AgencyName::new(self.name).map_err(|_| FormError::InvalidName)?;
        Ok(NewAgency::new(group_id, brand_id, name, non_blank(self.city)))
    }
}
