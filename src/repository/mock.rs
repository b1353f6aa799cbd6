//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDate;
use mockall::mock;

use crate::domain::commission::{
    Commission, CommissionRule, CommissionStatus, NewCommission, NewCommissionRule, SaleType,
};
use crate::domain::guard_duty::{GuardDuty, UserLoad};
use crate::domain::prospect::{NewProspect, Prospect, ProspectStatus, UpdateProspect};
use crate::domain::prospect_event::{NewProspectEvent, ProspectEvent};
use crate::domain::recording::{NewRecording, Recording, RecordingProgress};
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
use crate::repository::{
    CommissionReader, CommissionWriter, DateRange, GuardDutyReader, GuardDutyWriter,
    HealthReader, MetricsReader, ProspectEventListQuery, ProspectEventReader,
    ProspectEventWriter, ProspectListQuery, ProspectReader, ProspectWriter, RecordingListQuery,
    RecordingReader, RecordingWriter, SalespersonCounts, SpccReader, SpccWriter, TenancyReader,
    TenancyWriter, TrainingReader, TrainingWriter, UserReader, UserWriter, VehicleReader,
    VehicleWriter, ZoneReader, ZoneWriter,
};

mock! {
    pub Repository {}

    impl TenancyReader for Repository {
        fn get_group_by_id(&self, id: GroupId) -> RepositoryResult<Option<AgencyGroup>>;
        fn get_brand_by_id(&self, id: BrandId) -> RepositoryResult<Option<Brand>>;
        fn get_agency_by_id(&self, id: AgencyId) -> RepositoryResult<Option<Agency>>;
        fn list_brands(&self) -> RepositoryResult<Vec<Brand>>;
        fn list_agencies_in_group(&self, group_id: GroupId) -> RepositoryResult<Vec<Agency>>;
    }

    impl TenancyWriter for Repository {
        fn create_group(&self, name: &GroupName) -> RepositoryResult<AgencyGroup>;
        fn create_brand(&self, name: &BrandName) -> RepositoryResult<Brand>;
        fn create_agency(&self, new_agency: &NewAgency) -> RepositoryResult<Agency>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId, agency_id: AgencyId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(
            &self,
            email: &UserEmail,
            agency_id: AgencyId,
        ) -> RepositoryResult<Option<User>>;
        fn list_users(&self, agency_id: AgencyId) -> RepositoryResult<Vec<User>>;
        fn list_user_loads(
            &self,
            agency_id: AgencyId,
            user_ids: Option<Vec<UserId>>,
        ) -> RepositoryResult<Vec<UserLoad>>;
    }

    impl UserWriter for Repository {
        fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn set_user_active(
            &self,
            id: UserId,
            agency_id: AgencyId,
            is_active: bool,
        ) -> RepositoryResult<User>;
    }

    impl ProspectReader for Repository {
        fn get_prospect_by_id(
            &self,
            id: ProspectId,
            agency_id: AgencyId,
        ) -> RepositoryResult<Option<Prospect>>;
        fn list_prospects(&self, query: ProspectListQuery) -> RepositoryResult<(usize, Vec<Prospect>)>;
        fn list_recent_open_prospects(
            &self,
            agency_id: AgencyId,
            user_id: UserId,
            limit: usize,
        ) -> RepositoryResult<Vec<Prospect>>;
    }

    impl ProspectWriter for Repository {
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
        fn assign_prospects(
            &self,
            agency_id: AgencyId,
            user_id: Option<UserId>,
            prospect_ids: &[ProspectId],
        ) -> RepositoryResult<usize>;
        fn delete_prospect(&self, id: ProspectId, agency_id: AgencyId) -> RepositoryResult<()>;
    }

    impl ProspectEventReader for Repository {
        fn list_prospect_events(
            &self,
            query: ProspectEventListQuery,
        ) -> RepositoryResult<(usize, Vec<(ProspectEvent, User)>)>;
    }

    impl ProspectEventWriter for Repository {
        fn create_prospect_event(&self, event: &NewProspectEvent) -> RepositoryResult<ProspectEvent>;
    }

    impl SpccReader for Repository {
        fn list_spcc_evaluations(&self, prospect_id: ProspectId) -> RepositoryResult<Vec<SpccEvaluation>>;
    }

    impl SpccWriter for Repository {
        fn create_spcc_evaluation(
            &self,
            evaluation: &NewSpccEvaluation,
        ) -> RepositoryResult<SpccEvaluation>;
    }

    impl VehicleReader for Repository {
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

    impl VehicleWriter for Repository {
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

    impl ZoneReader for Repository {
        fn get_zone_by_id(&self, id: ZoneId, agency_id: AgencyId) -> RepositoryResult<Option<Zone>>;
        fn list_zones(&self, agency_id: AgencyId, only_active: bool) -> RepositoryResult<Vec<Zone>>;
    }

    impl ZoneWriter for Repository {
        fn create_zone(&self, new_zone: &NewZone) -> RepositoryResult<Zone>;
        fn update_zone(
            &self,
            id: ZoneId,
            agency_id: AgencyId,
            updates: &UpdateZone,
        ) -> RepositoryResult<Zone>;
        fn delete_zone(&self, id: ZoneId, agency_id: AgencyId) -> RepositoryResult<()>;
    }

    impl RecordingReader for Repository {
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

    impl RecordingWriter for Repository {
        fn create_recording(&self, new_recording: &NewRecording) -> RepositoryResult<Recording>;
        fn apply_recording_progress(
            &self,
            id: RecordingId,
            agency_id: AgencyId,
            progress: &RecordingProgress,
        ) -> RepositoryResult<Option<Recording>>;
        fn delete_recording(&self, id: RecordingId, agency_id: AgencyId) -> RepositoryResult<()>;
    }

    impl CommissionReader for Repository {
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
        fn list_commissions(
            &self,
            agency_id: AgencyId,
            range: DateRange,
            user_id: Option<UserId>,
        ) -> RepositoryResult<Vec<Commission>>;
    }

    impl CommissionWriter for Repository {
        fn upsert_commission_rule(&self, rule: &NewCommissionRule) -> RepositoryResult<CommissionRule>;
        fn create_commission(&self, commission: &NewCommission) -> RepositoryResult<Commission>;
        fn set_commission_status(
            &self,
            id: CommissionId,
            agency_id: AgencyId,
            status: CommissionStatus,
        ) -> RepositoryResult<Commission>;
    }

    impl TrainingReader for Repository {
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
        fn list_training_sessions(
            &self,
            agency_id: AgencyId,
            user_id: Option<UserId>,
        ) -> RepositoryResult<Vec<TrainingSession>>;
    }

    impl TrainingWriter for Repository {
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

    impl GuardDutyReader for Repository {
        fn list_roster(&self, agency_id: AgencyId, date: NaiveDate) -> RepositoryResult<Vec<GuardDuty>>;
    }

    impl GuardDutyWriter for Repository {
        fn replace_roster(
            &self,
            agency_id: AgencyId,
            date: NaiveDate,
            user_ids: &[UserId],
        ) -> RepositoryResult<usize>;
    }

    impl MetricsReader for Repository {
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

    impl HealthReader for Repository {
        fn ping(&self) -> RepositoryResult<()>;
    }
}
