//! Diesel models for role-play scenarios and sessions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::training::{
    NewScenario as DomainNewScenario, NewTrainingSession as DomainNewTrainingSession,
    Scenario as DomainScenario, TrainingSession as DomainTrainingSession,
    UpdateScenario as DomainUpdateScenario,
};
use crate::domain::types::{
    AgencyId, ScenarioId, ScenarioTitle, TrainingScore, TrainingSessionId, TypeConstraintError,
    UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::scenarios)]
pub struct Scenario {
    pub id: i32,
    pub agency_id: i32,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub objections: String, // JSON array of strings
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::scenarios)]
pub struct NewScenario<'a> {
    pub agency_id: i32,
    pub title: &'a str,
    pub description: &'a str,
    pub difficulty: &'a str,
    pub objections: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::scenarios)]
pub struct UpdateScenario<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub difficulty: &'a str,
    pub objections: String,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::training_sessions)]
pub struct TrainingSession {
    pub id: i32,
    pub scenario_id: i32,
    pub user_id: i32,
    pub score: i32,
    pub feedback: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::training_sessions)]
pub struct NewTrainingSession<'a> {
    pub scenario_id: i32,
    pub user_id: i32,
    pub score: i32,
    pub feedback: Option<&'a str>,
}

fn objections_to_json(objections: &[String]) -> String {
    serde_json::to_string(objections).unwrap_or_else(|_| "[]".to_string())
}

impl TryFrom<Scenario> for DomainScenario {
    type Error = TypeConstraintError;

    fn try_from(scenario: Scenario) -> Result<Self, Self::Error> {
        let objections = serde_json::from_str(&scenario.objections).unwrap_or_default();

        Ok(Self {
            id: ScenarioId::new(scenario.id)?,
            agency_id: AgencyId::new(scenario.agency_id)?,
            title: ScenarioTitle::new(scenario.title)?,
            description: scenario.description,
            difficulty: scenario.difficulty.parse()?,
            objections,
            is_active: scenario.is_active,
            created_at: scenario.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewScenario> for NewScenario<'a> {
    fn from(scenario: &'a DomainNewScenario) -> Self {
        Self {
            agency_id: scenario.agency_id.get(),
            title: scenario.title.as_str(),
            description: scenario.description.as_str(),
            difficulty: scenario.difficulty.as_str(),
            objections: objections_to_json(&scenario.objections),
        }
    }
}

impl<'a> From<&'a DomainUpdateScenario> for UpdateScenario<'a> {
    fn from(scenario: &'a DomainUpdateScenario) -> Self {
        Self {
            title: scenario.title.as_str(),
            description: scenario.description.as_str(),
            difficulty: scenario.difficulty.as_str(),
            objections: objections_to_json(&scenario.objections),
        }
    }
}

impl TryFrom<TrainingSession> for DomainTrainingSession {
    type Error = TypeConstraintError;

    fn try_from(session: TrainingSession) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TrainingSessionId::new(session.id)?,
            scenario_id: ScenarioId::new(session.scenario_id)?,
            user_id: UserId::new(session.user_id)?,
            score: TrainingScore::new(session.score)?,
            feedback: session.feedback,
            created_at: session.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewTrainingSession> for NewTrainingSession<'a> {
    fn from(session: &'a DomainNewTrainingSession) -> Self {
        Self {
            scenario_id: session.scenario_id.get(),
            user_id: session.user_id.get(),
            score: i32::from(session.score.get()),
            feedback: session.feedback.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::training::Difficulty;

    #[test]
    fn objections_are_stored_as_json() {
        let domain = DomainNewScenario {
            agency_id: AgencyId::new(1).unwrap(),
            title: ScenarioTitle::new("Cliente indeciso").unwrap(),
            description: "Compara con la competencia".into(),
            difficulty: Difficulty::Intermediate,
            objections: vec!["Está muy caro".into(), "Lo voy a pensar".into()],
        };
        let new: NewScenario = (&domain).into();
        assert_eq!(new.objections, r#"["Está muy caro","Lo voy a pensar"]"#);
        assert_eq!(new.difficulty, "Intermediate");
    }
}
