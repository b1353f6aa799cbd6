//! Repository implementation for agency groups, brands and agencies.

use diesel::prelude::*;

use crate::domain::tenancy::{Agency, AgencyGroup, Brand, NewAgency};
use crate::domain::types::{AgencyId, BrandId, BrandName, GroupId, GroupName};
use crate::models::tenancy::{
    Agency as DbAgency, AgencyGroup as DbAgencyGroup, Brand as DbBrand, NewAgency as DbNewAgency,
    NewAgencyGroup as DbNewAgencyGroup, NewBrand as DbNewBrand,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TenancyReader, TenancyWriter};

impl TenancyReader for DieselRepository {
    fn get_group_by_id(&self, id: GroupId) -> RepositoryResult<Option<AgencyGroup>> {
        use crate::schema::agency_groups;

        let mut conn = self.conn()?;
        let group = agency_groups::table
            .find(id.get())
            .first::<DbAgencyGroup>(&mut conn)
            .optional()?;

        group
            .map(|group| AgencyGroup::try_from(group).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_brand_by_id(&self, id: BrandId) -> RepositoryResult<Option<Brand>> {
        use crate::schema::brands;

        let mut conn = self.conn()?;
        let brand = brands::table
            .find(id.get())
            .first::<DbBrand>(&mut conn)
            .optional()?;

        brand
            .map(|brand| Brand::try_from(brand).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_agency_by_id(&self, id: AgencyId) -> RepositoryResult<Option<Agency>> {
        use crate::schema::agencies;

        let mut conn = self.conn()?;
        let agency = agencies::table
            .find(id.get())
            .first::<DbAgency>(&mut conn)
            .optional()?;

        agency
            .map(|agency| Agency::try_from(agency).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_brands(&self) -> RepositoryResult<Vec<Brand>> {
        use crate::schema::brands;

        let mut conn = self.conn()?;
        let brands = brands::table
            .order(brands::name.asc())
            .load::<DbBrand>(&mut conn)?;

        brands
            .into_iter()
            .map(|brand| Brand::try_from(brand).map_err(RepositoryError::from))
            .collect()
    }

    fn list_agencies_in_group(&self, group_id: GroupId) -> RepositoryResult<Vec<Agency>> {
        use crate::schema::agencies;

        let mut conn = self.conn()?;
        let agencies = agencies::table
            .filter(agencies::group_id.eq(group_id.get()))
            .order(agencies::name.asc())
            .load::<DbAgency>(&mut conn)?;

        agencies
            .into_iter()
            .map(|agency| Agency::try_from(agency).map_err(RepositoryError::from))
            .collect()
    }
}

impl TenancyWriter for DieselRepository {
    fn create_group(&self, name: &GroupName) -> RepositoryResult<AgencyGroup> {
        use crate::schema::agency_groups;

        let mut conn = self.conn()?;
        let group = diesel::insert_into(agency_groups::table)
            .values(&DbNewAgencyGroup {
                name: name.as_str(),
            })
            .get_result::<DbAgencyGroup>(&mut conn)?;

        Ok(AgencyGroup::try_from(group)?)
    }

    fn create_brand(&self, name: &BrandName) -> RepositoryResult<Brand> {
        use crate::schema::brands;

        let mut conn = self.conn()?;
        let brand = diesel::insert_into(brands::table)
            .values(&DbNewBrand {
                name: name.as_str(),
            })
            .get_result::<DbBrand>(&mut conn)?;

        Ok(Brand::try_from(brand)?)
    }

    fn create_agency(&self, new_agency: &NewAgency) -> RepositoryResult<Agency> {
        use crate::schema::agencies;

        let mut conn = self.conn()?;
        let db_new_agency: DbNewAgency = new_agency.into();
        let agency = diesel::insert_into(agencies::table)
            .values(&db_new_agency)
            .get_result::<DbAgency>(&mut conn)?;

        Ok(Agency::try_from(agency)?)
    }
}
