//! Role-play scenario and session forms.

use serde::Deserialize;
use validator::Validate;

use crate::domain::training::{Difficulty, NewScenario, UpdateScenario};
use crate::domain::types::{AgencyId, ScenarioId, ScenarioTitle, TrainingScore};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct ScenarioForm {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    /// One objection per line.
    #[serde(default)]
    pub objections: String,
}

impl TryFrom<ScenarioForm> for UpdateScenario {
    type Error = FormError;

    fn try_from(form: ScenarioForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let objections = form
            .objections
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect();

        Ok(UpdateScenario {
            title: ScenarioTitle::new(form.title).map_err(|_| FormError::InvalidName)?,
            description: ammonia::clean(form.description.trim()),
            difficulty: form.difficulty,
            objections,
        })
    }
}

impl ScenarioForm {
    pub fn into_domain(self, agency_id: AgencyId) -> Result<NewScenario, FormError> {
        let scenario = UpdateScenario::try_from(self)?;
        Ok(NewScenario {
            agency_id,
            title: scenario.title,
            description: scenario.description,
            difficulty: scenario.difficulty,
            objections: scenario.objections,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TrainingSessionForm {
    pub scenario_id: i32,
    pub score: i32,
    pub feedback: Option<String>,
}

pub struct TrainingSessionPayload {
    pub scenario_id: ScenarioId,
    pub score: TrainingScore,
    pub feedback: Option<String>,
}

impl TryFrom<TrainingSessionForm> for TrainingSessionPayload {
    type Error = FormError;

    fn try_from(form: TrainingSessionForm) -> Result<Self, Self::Error> {
        Ok(Self {
            scenario_id: ScenarioId::new(form.scenario_id)
                .map_err(|_| FormError::InvalidId("scenario"))?,
            score: TrainingScore::new(form.score)?,
            feedback: non_blank(form.feedback).map(|text| ammonia::clean(&text)),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ScenarioListParams {
    #[serde(default)]
    pub include_inactive: bool,
}
