use chrono::Utc;
use diesel::prelude::*;

use crate::domain::spcc::{NewSpccEvaluation, SpccEvaluation};
use crate::domain::types::ProspectId;
use crate::models::spcc::{
    NewSpccEvaluation as DbNewSpccEvaluation, SpccEvaluation as DbSpccEvaluation,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, SpccReader, SpccWriter};

impl SpccReader for DieselRepository {
    fn list_spcc_evaluations(&self, prospect_id: ProspectId) -> RepositoryResult<Vec<SpccEvaluation>> {
        use crate::schema::spcc_evaluations;

        let mut conn = self.conn()?;
        let db_evaluations = spcc_evaluations::table
            .filter(spcc_evaluations::prospect_id.eq(prospect_id.get()))
            .order((
                spcc_evaluations::created_at.desc(),
                spcc_evaluations::id.desc(),
            ))
            .load::<DbSpccEvaluation>(&mut conn)?;

        db_evaluations
            .into_iter()
            .map(|evaluation| SpccEvaluation::try_from(evaluation).map_err(RepositoryError::from))
            .collect()
    }
}

impl SpccWriter for DieselRepository {
    fn create_spcc_evaluation(
        &self,
        evaluation: &NewSpccEvaluation,
    ) -> RepositoryResult<SpccEvaluation> {
        use crate::schema::{prospects, spcc_evaluations};

        let mut conn = self.conn()?;
        let db_new_evaluation: DbNewSpccEvaluation = evaluation.into();

        let db_evaluation = conn.transaction::<DbSpccEvaluation, diesel::result::Error, _>(
            |conn| {
                let stored = diesel::insert_into(spcc_evaluations::table)
                    .values(&db_new_evaluation)
                    .get_result::<DbSpccEvaluation>(conn)?;

                diesel::update(prospects::table.find(stored.prospect_id))
                    .set((
                        prospects::spcc_score.eq(Some(stored.total)),
                        prospects::spcc_classification.eq(Some(stored.classification.clone())),
                        prospects::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;

                Ok(stored)
            },
        )?;

        Ok(SpccEvaluation::try_from(db_evaluation)?)
    }
}
