//! SPCC lead scoring.
//!
//! A prospect is rated on four pillars, each scored `0..=10`. The pillars are
//! weighted (the weights add up to 100) to produce a total in `0..=100`, which
//! maps onto one of four classifications.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{PillarScore, ProspectId, SpccEvaluationId, UserId};

pub const SITUATION_WEIGHT: u32 = 25;
pub const PURCHASING_POWER_WEIGHT: u32 = 30;
pub const COMMITMENT_WEIGHT: u32 = 25;
pub const CLARITY_WEIGHT: u32 = 20;

pub const ELITE_THRESHOLD: u8 = 80;
pub const QUALIFIED_THRESHOLD: u8 = 60;
pub const MATURING_THRESHOLD: u8 = 40;

text_enum!(
    /// Bucket a prospect falls into according to its SPCC total.
    SpccClassification,
    "SPCC classification",
    { Elite, Calificado, AMadurar, Explorador }
);

impl SpccClassification {
    pub fn from_total(total: u8) -> Self {
        match total {
            t if t >= ELITE_THRESHOLD => SpccClassification::Elite,
            t if t >= QUALIFIED_THRESHOLD => SpccClassification::Calificado,
            t if t >= MATURING_THRESHOLD => SpccClassification::AMadurar,
            _ => SpccClassification::Explorador,
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            SpccClassification::Elite => "Elite",
            SpccClassification::Calificado => "Calificado",
            SpccClassification::AMadurar => "A Madurar",
            SpccClassification::Explorador => "Explorador",
        }
    }
}

/// Scores of the four SPCC pillars.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpccPillars {
    pub situation: PillarScore,
    pub purchasing_power: PillarScore,
    pub commitment: PillarScore,
    pub clarity: PillarScore,
}

impl SpccPillars {
    #[must_use]
    pub fn new(
        situation: PillarScore,
        purchasing_power: PillarScore,
        commitment: PillarScore,
        clarity: PillarScore,
    ) -> Self {
        Self {
            situation,
            purchasing_power,
            commitment,
            clarity,
        }
    }

    /// Weighted total in `0..=100`, rounded half up.
    pub fn total(&self) -> u8 {
        let weighted = u32::from(self.situation.get()) * SITUATION_WEIGHT
            + u32::from(self.purchasing_power.get()) * PURCHASING_POWER_WEIGHT
            + u32::from(self.commitment.get()) * COMMITMENT_WEIGHT
            + u32::from(self.clarity.get()) * CLARITY_WEIGHT;
        // max weighted value is 10 * 100, so the result always fits in u8
        ((weighted + 5) / 10) as u8
    }

    pub fn classification(&self) -> SpccClassification {
        SpccClassification::from_total(self.total())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpccEvaluation {
    pub id: SpccEvaluationId,
    pub prospect_id: ProspectId,
    pub user_id: UserId,
    pub pillars: SpccPillars,
    pub total: u8,
    pub classification: SpccClassification,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSpccEvaluation {
    pub prospect_id: ProspectId,
    pub user_id: UserId,
    pub pillars: SpccPillars,
}

impl NewSpccEvaluation {
    #[must_use]
    pub fn new(prospect_id: ProspectId, user_id: UserId, pillars: SpccPillars) -> Self {
        Self {
            prospect_id,
            user_id,
            pillars,
        }
    }
}
