//! Role-play training scenarios and scored sessions.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AgencyId, ScenarioId, ScenarioTitle, TrainingScore, TrainingSessionId, UserId,
};

text_enum!(
    Difficulty,
    "difficulty",
    { Basic, Intermediate, Advanced }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub id: ScenarioId,
    pub agency_id: AgencyId,
    pub title: ScenarioTitle,
    pub description: String,
    pub difficulty: Difficulty,
    /// Customer objections the salesperson has to handle.
    pub objections: Vec<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewScenario {
    pub agency_id: AgencyId,
    pub title: ScenarioTitle,
    pub description: String,
    pub difficulty: Difficulty,
    pub objections: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct UpdateScenario {
    pub title: ScenarioTitle,
    pub description: String,
    pub difficulty: Difficulty,
    pub objections: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainingSession {
    pub id: TrainingSessionId,
    pub scenario_id: ScenarioId,
    pub user_id: UserId,
    pub score: TrainingScore,
    pub feedback: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewTrainingSession {
    pub scenario_id: ScenarioId,
    pub user_id: UserId,
    pub score: TrainingScore,
    pub feedback: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TrainingStats {
    pub user_id: UserId,
    pub sessions: usize,
    pub average_score: f64,
    pub best_score: u8,
}

/// Aggregates sessions per salesperson, ordered by user id.
pub fn training_stats(sessions: &[TrainingSession]) -> Vec<TrainingStats> {
    let mut by_user: BTreeMap<UserId, (usize, u32, u8)> = BTreeMap::new();

    for session in sessions {
        let entry = by_user.entry(session.user_id).or_insert((0, 0, 0));
        entry.0 += 1;
        entry.1 += u32::from(session.score.get());
        entry.2 = entry.2.max(session.score.get());
    }

    by_user
        .into_iter()
        .map(|(user_id, (count, sum, best))| TrainingStats {
            user_id,
            sessions: count,
            average_score: f64::from(sum) / count as f64,
            best_score: best,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn session(id: i32, user: i32, score: i32) -> TrainingSession {
        TrainingSession {
            id: TrainingSessionId::new(id).unwrap(),
            scenario_id: ScenarioId::new(1).unwrap(),
            user_id: UserId::new(user).unwrap(),
            score: TrainingScore::new(score).unwrap(),
            feedback: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn stats_per_user() {
        let stats = training_stats(&[session(1, 3, 70), session(2, 3, 90), session(3, 1, 40)]);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].user_id.get(), 1);
        assert_eq!(stats[0].sessions, 1);
        assert_eq!(stats[1].sessions, 2);
        assert!((stats[1].average_score - 80.0).abs() < f64::EPSILON);
        assert_eq!(stats[1].best_score, 90);
    }

    #[test]
    fn no_sessions_no_stats() {
        assert!(training_stats(&[]).is_empty());
    }
}
