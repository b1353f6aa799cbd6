use chrono::{NaiveDate, NaiveDateTime};

use crate::db::{DbConnection, DbPool};
use crate::domain::commission::{
    Commission, CommissionRule, CommissionStatus, NewCommission, NewCommissionRule, SaleType,
};
use crate::domain::guard_duty::{GuardDuty, UserLoad};
use crate::domain::prospect::{NewProspect, Prospect, ProspectStatus, UpdateProspect};
use crate::domain::prospect_event::{NewProspectEvent, ProspectEvent, ProspectEventType};
use crate::domain::recording::{NewRecording, Recording, RecordingProgress, RecordingStatus};
use crate::domain::spcc::{NewSpccEvaluation, SpccClassification, SpccEvaluation};
use crate::domain::tenancy::{Agency, AgencyGroup, Brand, NewAgency};
use crate::domain::training::{
    NewScenario, NewTrainingSession, Scenario, TrainingSession, UpdateScenario,
};
use crate::domain::types::{
    AgencyId, BrandId, BrandName, CommissionId, GroupId, GroupName, ProspectId, RecordingId,
    ScenarioId, UserEmail, UserId, VehicleId, ZoneId,
};
use crate::domain::user::{NewUser, User};
use crate::domain::vehicle::{NewVehicle, UpdateVehicle, Vehicle};
use crate::domain::zone::{NewZone, UpdateZone, Zone};
use crate::repository::errors::RepositoryResult;

pub mod commission;
pub mod errors;
pub mod guard_duty;
pub mod metrics;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod prospect;
pub mod prospect_event;
pub mod recording;
pub mod spcc;
pub mod tenancy;
pub mod training;
pub mod user;
pub mod vehicle;
pub mod zone;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        i64::try_from((self.page.max(1) - 1).saturating_mul(self.per_page)).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Substring `LIKE` pattern with `\\` escaping the wildcards in `search`.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Half-open time window `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }
}

#[derive(Debug, Clone)]
pub struct ProspectListQuery {
    pub agency_id: AgencyId,
    pub user_id: Option<UserId>,
    pub search: Option<String>,
    pub status: Option<ProspectStatus>,
    pub classification: Option<SpccClassification>,
    pub pagination: Option<Pagination>,
}

impl ProspectListQuery {
    pub fn new(agency_id: AgencyId) -> Self {
        Self {
            agency_id,
            user_id: None,
            search: None,
            status: None,
            classification: None,
            pagination: None,
        }
    }

    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn status(mut self, status: ProspectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn classification(mut self, classification: SpccClassification) -> Self {
        self.classification = Some(classification);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct ProspectEventListQuery {
    pub prospect_id: ProspectId,
    pub event_type: Option<ProspectEventType>,
    pub pagination: Option<Pagination>,
}

impl ProspectEventListQuery {
    pub fn new(prospect_id: ProspectId) -> Self {
        Self {
            prospect_id,
            event_type: None,
            pagination: None,
        }
    }

    pub fn event_type(mut self, event_type: ProspectEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordingListQuery {
    pub agency_id: AgencyId,
    pub user_id: Option<UserId>,
    pub prospect_id: Option<ProspectId>,
    pub status: Option<RecordingStatus>,
    pub pagination: Option<Pagination>,
}

impl RecordingListQuery {
    pub fn new(agency_id: AgencyId) -> Self {
        Self {
            agency_id,
            user_id: None,
            prospect_id: None,
            status: None,
            pagination: None,
        }
    }

    pub fn owned_by(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn prospect(mut self, prospect_id: ProspectId) -> Self {
        self.prospect_id = Some(prospect_id);
        self
    }

    pub fn status(mut self, status: RecordingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Aggregated prospect counts for one salesperson in a time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalespersonCounts {
    pub user_id: UserId,
    pub open: i64,
    pub sold: i64,
    pub total: i64,
}

pub trait TenancyReader {
    fn get_group_by_id(&self, id: GroupId) -> RepositoryResult<Option<AgencyGroup>>;
    fn get_brand_by_id(&self, id: BrandId) -> RepositoryResult<Option<Brand>>;
    fn get_agency_by_id(&self, id: AgencyId) -> RepositoryResult<Option<Agency>>;
    fn list_brands(&self) -> RepositoryResult<Vec<Brand>>;
    fn list_agencies_in_group(&self, group_id: GroupId) -> RepositoryResult<Vec<Agency>>;
}

pub trait TenancyWriter {
    fn create_group(&self, name: &GroupName) -> RepositoryResult<AgencyGroup>;
    fn create_brand(&self, name: &BrandName) -> RepositoryResult<Brand>;
    fn create_agency(&self, new_agency: &NewAgency) -> RepositoryResult<Agency>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId, agency_id: AgencyId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(
        &self,
        email: &UserEmail,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<User>>;
    fn list_users(&self, agency_id: AgencyId) -> RepositoryResult<Vec<User>>;
    /// Open prospect counts for the given users, or for every user of the agency.
    fn list_user_loads(
        &self,
        agency_id: AgencyId,
        user_ids: Option<Vec<UserId>>,
    ) -> RepositoryResult<Vec<UserLoad>>;
}

pub trait UserWriter {
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn set_user_active(
        &self,
        id: UserId,
        agency_id: AgencyId,
        is_active: bool,
    ) -> RepositoryResult<User>;
}

pub trait ProspectReader {
    fn get_prospect_by_id(
        &self,
        id: ProspectId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Prospect>>;
    fn list_prospects(&self, query: ProspectListQuery) -> RepositoryResult<(usize, Vec<Prospect>)>;
    /// Most recently created open prospects of a salesperson.
    fn list_recent_open_prospects(
        &self,
        agency_id: AgencyId,
        user_id: UserId,
        limit: usize,
    ) -> RepositoryResult<Vec<Prospect>>;
}

pub trait ProspectWriter {
    fn create_prospect(&self, new_prospect: &NewProspect) -> RepositoryResult<Prospect>;
    fn create_prospects(&self, new_prospects: &[NewProspect]) -> RepositoryResult<usize>;
    fn update_prospect(
        &self,
        id: ProspectId,
        agency_id: AgencyId,
        updates: &UpdateProspect,
    ) -> RepositoryResult<Prospect>;
    fn set_prospect_status(
        &self,
        id: ProspectId,
        agency_id: AgencyId,
        status: ProspectStatus,
    ) -> RepositoryResult<Prospect>;
    /// Reassigns prospects of the agency; returns the number of rows touched.
    fn assign_prospects(
        &self,
        agency_id: AgencyId,
        user_id: Option<UserId>,
        prospect_ids: &[ProspectId],
    ) -> RepositoryResult<usize>;
    fn delete_prospect(&self, id: ProspectId, agency_id: AgencyId) -> RepositoryResult<()>;
}

pub trait ProspectEventReader {
    fn list_prospect_events(
        &self,
        query: ProspectEventListQuery,
    ) -> RepositoryResult<(usize, Vec<(ProspectEvent, User)>)>;
}

pub trait ProspectEventWriter {
    fn create_prospect_event(&self, event: &NewProspectEvent) -> RepositoryResult<ProspectEvent>;
}

pub trait SpccReader {
    fn list_spcc_evaluations(&self, prospect_id: ProspectId) -> RepositoryResult<Vec<SpccEvaluation>>;
}

pub trait SpccWriter {
    /// Stores the evaluation and caches its total on the prospect.
    fn create_spcc_evaluation(
        &self,
        evaluation: &NewSpccEvaluation,
    ) -> RepositoryResult<SpccEvaluation>;
}

pub trait VehicleReader {
    fn get_vehicle_by_id(
        &self,
        id: VehicleId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Vehicle>>;
    fn list_vehicles(
        &self,
        agency_id: AgencyId,
        search: Option<String>,
        include_inactive: bool,
    ) -> RepositoryResult<Vec<Vehicle>>;
}

pub trait VehicleWriter {
    fn create_vehicle(&self, new_vehicle: &NewVehicle) -> RepositoryResult<Vehicle>;
    fn update_vehicle(
        &self,
        id: VehicleId,
        agency_id: AgencyId,
        updates: &UpdateVehicle,
    ) -> RepositoryResult<Vehicle>;
    fn set_vehicle_active(
        &self,
        id: VehicleId,
        agency_id: AgencyId,
        is_active: bool,
    ) -> RepositoryResult<Vehicle>;
}

pub trait ZoneReader {
    fn get_zone_by_id(&self, id: ZoneId, agency_id: AgencyId) -> RepositoryResult<Option<Zone>>;
    fn list_zones(&self, agency_id: AgencyId, only_active: bool) -> RepositoryResult<Vec<Zone>>;
}

pub trait ZoneWriter {
    fn create_zone(&self, new_zone: &NewZone) -> RepositoryResult<Zone>;
    fn update_zone(
        &self,
        id: ZoneId,
        agency_id: AgencyId,
        updates: &UpdateZone,
    ) -> RepositoryResult<Zone>;
    fn delete_zone(&self, id: ZoneId, agency_id: AgencyId) -> RepositoryResult<()>;
}

pub trait RecordingReader {
    fn get_recording_by_id(
        &self,
        id: RecordingId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Recording>>;
    fn list_recordings(
        &self,
        query: RecordingListQuery,
    ) -> RepositoryResult<(usize, Vec<Recording>)>;
}

pub trait RecordingWriter {
    fn create_recording(&self, new_recording: &NewRecording) -> RepositoryResult<Recording>;
    /// Applies a processing update. Returns `None` when the stored status
    /// cannot move to the update's status.
    fn apply_recording_progress(
        &self,
        id: RecordingId,
        agency_id: AgencyId,
        progress: &RecordingProgress,
    ) -> RepositoryResult<Option<Recording>>;
    fn delete_recording(&self, id: RecordingId, agency_id: AgencyId) -> RepositoryResult<()>;
}

pub trait CommissionReader {
    fn get_commission_rule(
        &self,
        agency_id: AgencyId,
        sale_type: SaleType,
    ) -> RepositoryResult<Option<CommissionRule>>;
    fn list_commission_rules(&self, agency_id: AgencyId) -> RepositoryResult<Vec<CommissionRule>>;
    fn get_commission_by_id(
        &self,
        id: CommissionId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Commission>>;
    /// Commissions sold inside the range, optionally for one salesperson.
    fn list_commissions(
        &self,
        agency_id: AgencyId,
        range: DateRange,
        user_id: Option<UserId>,
    ) -> RepositoryResult<Vec<Commission>>;
}

pub trait CommissionWriter {
    fn upsert_commission_rule(&self, rule: &NewCommissionRule) -> RepositoryResult<CommissionRule>;
    fn create_commission(&self, commission: &NewCommission) -> RepositoryResult<Commission>;
    fn set_commission_status(
        &self,
        id: CommissionId,
        agency_id: AgencyId,
        status: CommissionStatus,
    ) -> RepositoryResult<Commission>;
}

pub trait TrainingReader {
    fn get_scenario_by_id(
        &self,
        id: ScenarioId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Scenario>>;
    fn list_scenarios(
        &self,
        agency_id: AgencyId,
        include_inactive: bool,
    ) -> RepositoryResult<Vec<Scenario>>;
    /// Sessions of the agency's scenarios, optionally for one salesperson.
    fn list_training_sessions(
        &self,
        agency_id: AgencyId,
        user_id: Option<UserId>,
    ) -> RepositoryResult<Vec<TrainingSession>>;
}

pub trait TrainingWriter {
    fn create_scenario(&self, new_scenario: &NewScenario) -> RepositoryResult<Scenario>;
    fn update_scenario(
        &self,
        id: ScenarioId,
        agency_id: AgencyId,
        updates: &UpdateScenario,
    ) -> RepositoryResult<Scenario>;
    fn set_scenario_active(
        &self,
        id: ScenarioId,
        agency_id: AgencyId,
        is_active: bool,
    ) -> RepositoryResult<Scenario>;
    fn create_training_session(
        &self,
        session: &NewTrainingSession,
    ) -> RepositoryResult<TrainingSession>;
}

pub trait GuardDutyReader {
    fn list_roster(&self, agency_id: AgencyId, date: NaiveDate) -> RepositoryResult<Vec<GuardDuty>>;
}

pub trait GuardDutyWriter {
    /// Replaces the roster of the day; returns the number of users on duty.
    fn replace_roster(
        &self,
        agency_id: AgencyId,
        date: NaiveDate,
        user_ids: &[UserId],
    ) -> RepositoryResult<usize>;
}

pub trait MetricsReader {
    /// Prospect counts grouped by status for prospects created inside the range.
    fn count_prospects_by_status(
        &self,
        agency_id: AgencyId,
        range: DateRange,
    ) -> RepositoryResult<Vec<(ProspectStatus, i64)>>;
    fn count_prospects_by_classification(
        &self,
        agency_id: AgencyId,
        range: DateRange,
    ) -> RepositoryResult<Vec<(Option<SpccClassification>, i64)>>;
    fn count_prospects_by_source(
        &self,
        agency_id: AgencyId,
        range: DateRange,
    ) -> RepositoryResult<Vec<(String, i64)>>;
    fn count_recordings(&self, agency_id: AgencyId, range: DateRange) -> RepositoryResult<i64>;
    fn count_prospects_by_user(
        &self,
        agency_id: AgencyId,
        range: DateRange,
    ) -> RepositoryResult<Vec<SalespersonCounts>>;
}

pub trait HealthReader {
    fn ping(&self) -> RepositoryResult<()>;
}
