use diesel::prelude::*;

use crate::domain::training::{
    NewScenario, NewTrainingSession, Scenario, TrainingSession, UpdateScenario,
};
use crate::domain::types::{AgencyId, ScenarioId, UserId};
use crate::models::training::{
    NewScenario as DbNewScenario, NewTrainingSession as DbNewTrainingSession,
    Scenario as DbScenario, TrainingSession as DbTrainingSession,
    UpdateScenario as DbUpdateScenario,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TrainingReader, TrainingWriter};

impl TrainingReader for DieselRepository {
    fn get_scenario_by_id(
        &self,
        id: ScenarioId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Scenario>> {
        use crate::schema::scenarios;

        let mut conn = self.conn()?;
        let db_scenario = scenarios::table
            .filter(scenarios::id.eq(id.get()))
            .filter(scenarios::agency_id.eq(agency_id.get()))
            .first::<DbScenario>(&mut conn)
            .optional()?;

        db_scenario
            .map(|scenario| Scenario::try_from(scenario).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_scenarios(
        &self,
        agency_id: AgencyId,
        include_inactive: bool,
    ) -> RepositoryResult<Vec<Scenario>> {
        use crate::schema::scenarios;

        let mut conn = self.conn()?;
        let mut query = scenarios::table
            .filter(scenarios::agency_id.eq(agency_id.get()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !include_inactive {
            query = query.filter(scenarios::is_active.eq(true));
        }

        let db_scenarios = query
            .order(scenarios::title.asc())
            .load::<DbScenario>(&mut conn)?;

        db_scenarios
            .into_iter()
            .map(|scenario| Scenario::try_from(scenario).map_err(RepositoryError::from))
            .collect()
    }

    fn list_training_sessions(
        &self,
        agency_id: AgencyId,
        user_id: Option<UserId>,
    ) -> RepositoryResult<Vec<TrainingSession>> {
        use crate::schema::{scenarios, training_sessions};

        let mut conn = self.conn()?;
        let mut query = training_sessions::table
            .inner_join(scenarios::table)
            .filter(scenarios::agency_id.eq(agency_id.get()))
            .select(training_sessions::all_columns)
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(user_id) = user_id {
            query = query.filter(training_sessions::user_id.eq(user_id.get()));
        }

        let db_sessions = query
            .order(training_sessions::created_at.desc())
            .load::<DbTrainingSession>(&mut conn)?;

        db_sessions
            .into_iter()
            .map(|session| TrainingSession::try_from(session).map_err(RepositoryError::from))
            .collect()
    }
}

impl TrainingWriter for DieselRepository {
    fn create_scenario(&self, new_scenario: &NewScenario) -> RepositoryResult<Scenario> {
        use crate::schema::scenarios;

        let mut conn = self.conn()?;
        let db_new_scenario: DbNewScenario = new_scenario.into();

        let db_scenario = diesel::insert_into(scenarios::table)
            .values(&db_new_scenario)
            .get_result::<DbScenario>(&mut conn)?;

        Ok(Scenario::try_from(db_scenario)?)
    }

    fn update_scenario(
        &self,
        id: ScenarioId,
        agency_id: AgencyId,
        updates: &UpdateScenario,
    ) -> RepositoryResult<Scenario> {
        use crate::schema::scenarios;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateScenario = updates.into();

        let db_scenario = diesel::update(
            scenarios::table
                .filter(scenarios::id.eq(id.get()))
                .filter(scenarios::agency_id.eq(agency_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbScenario>(&mut conn)?;

        Ok(Scenario::try_from(db_scenario)?)
    }

    fn set_scenario_active(
        &self,
        id: ScenarioId,
        agency_id: AgencyId,
        is_active: bool,
    ) -> RepositoryResult<Scenario> {
        use crate::schema::scenarios;

        let mut conn = self.conn()?;
        let db_scenario = diesel::update(
            scenarios::table
                .filter(scenarios::id.eq(id.get()))
                .filter(scenarios::agency_id.eq(agency_id.get())),
        )
        .set(scenarios::is_active.eq(is_active))
        .get_result::<DbScenario>(&mut conn)?;

        Ok(Scenario::try_from(db_scenario)?)
    }

    fn create_training_session(
        &self,
        session: &NewTrainingSession,
    ) -> RepositoryResult<TrainingSession> {
        use crate::schema::training_sessions;

        let mut conn = self.conn()?;
        let db_new_session: DbNewTrainingSession = session.into();

        let db_session = diesel::insert_into(training_sessions::table)
            .values(&db_new_session)
            .get_result::<DbTrainingSession>(&mut conn)?;

        Ok(TrainingSession::try_from(db_session)?)
    }
}
