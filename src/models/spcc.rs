//! Diesel models for SPCC evaluations.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::spcc::{
    NewSpccEvaluation as DomainNewSpccEvaluation, SpccEvaluation as DomainSpccEvaluation,
    SpccPillars,
};
use crate::domain::types::{
    PillarScore, ProspectId, SpccEvaluationId, TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::spcc_evaluations)]
pub struct SpccEvaluation {
    pub id: i32,
    pub prospect_id: i32,
    pub user_id: i32,
    pub situation: i32,
    pub purchasing_power: i32,
    pub commitment: i32,
    pub clarity: i32,
    pub total: i32,
    pub classification: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::spcc_evaluations)]
pub struct NewSpccEvaluation {
    pub prospect_id: i32,
    pub user_id: i32,
    pub situation: i32,
    pub purchasing_power: i32,
    pub commitment: i32,
    pub clarity: i32,
    pub total: i32,
    pub classification: &'static str,
}

impl TryFrom<SpccEvaluation> for DomainSpccEvaluation {
    type Error = TypeConstraintError;

    fn try_from(evaluation: SpccEvaluation) -> Result<Self, Self::Error> {
        let pillars = SpccPillars::new(
            PillarScore::new(evaluation.situation)?,
            PillarScore::new(evaluation.purchasing_power)?,
            PillarScore::new(evaluation.commitment)?,
            PillarScore::new(evaluation.clarity)?,
        );
        let total = u8::try_from(evaluation.total)
            .map_err(|_| TypeConstraintError::OutOfRange("SPCC total"))?;

        Ok(Self {
            id: SpccEvaluationId::new(evaluation.id)?,
            prospect_id: ProspectId::new(evaluation.prospect_id)?,
            user_id: UserId::new(evaluation.user_id)?,
            pillars,
            total,
            classification: evaluation.classification.parse()?,
            created_at: evaluation.created_at,
        })
    }
}

impl From<&DomainNewSpccEvaluation> for NewSpccEvaluation {
    fn from(evaluation: &DomainNewSpccEvaluation) -> Self {
        let pillars = evaluation.pillars;
        Self {
            prospect_id: evaluation.prospect_id.get(),
            user_id: evaluation.user_id.get(),
            situation: i32::from(pillars.situation.get()),
            purchasing_power: i32::from(pillars.purchasing_power.get()),
            commitment: i32::from(pillars.commitment.get()),
            clarity: i32::from(pillars.clarity.get()),
            total: i32::from(pillars.total()),
            classification: pillars.classification().as_str(),
        }
    }
}
