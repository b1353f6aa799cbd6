use chrono::Utc;
use diesel::prelude::*;

use crate::domain::recording::{NewRecording, Recording, RecordingProgress, RecordingStatus};
use crate::domain::types::{AgencyId, RecordingId};
use crate::models::recording::{
    NewRecording as DbNewRecording, Recording as DbRecording, RecordingProgressChangeset,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, RecordingListQuery, RecordingReader, RecordingWriter};

impl RecordingReader for DieselRepository {
    fn get_recording_by_id(
        &self,
        id: RecordingId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Recording>> {
        use crate::schema::recordings;

        let mut conn = self.conn()?;
        let db_recording = recordings::table
            .filter(recordings::id.eq(id.get()))
            .filter(recordings::agency_id.eq(agency_id.get()))
            .first::<DbRecording>(&mut conn)
            .optional()?;

        db_recording
            .map(|recording| Recording::try_from(recording).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_recordings(
        &self,
        query: RecordingListQuery,
    ) -> RepositoryResult<(usize, Vec<Recording>)> {
        use crate::schema::recordings;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = recordings::table
                .filter(recordings::agency_id.eq(query.agency_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(user_id) = query.user_id {
                items = items.filter(recordings::user_id.eq(user_id.get()));
            }
            if let Some(prospect_id) = query.prospect_id {
                items = items.filter(recordings::prospect_id.eq(prospect_id.get()));
            }
            if let Some(status) = query.status {
                items = items.filter(recordings::status.eq(status.as_str()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_recordings = items
            .order((recordings::created_at.desc(), recordings::id.desc()))
            .load::<DbRecording>(&mut conn)?;

        let recordings = db_recordings
            .into_iter()
            .map(|recording| Recording::try_from(recording).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, recordings))
    }
}

impl RecordingWriter for DieselRepository {
    fn create_recording(&self, new_recording: &NewRecording) -> RepositoryResult<Recording> {
        use crate::schema::recordings;

        let mut conn = self.conn()?;
        let db_new_recording: DbNewRecording = new_recording.into();

        let db_recording = diesel::insert_into(recordings::table)
            .values(&db_new_recording)
            .get_result::<DbRecording>(&mut conn)?;

        Ok(Recording::try_from(db_recording)?)
    }

    fn apply_recording_progress(
        &self,
        id: RecordingId,
        agency_id: AgencyId,
        progress: &RecordingProgress,
    ) -> RepositoryResult<Option<Recording>> {
        use crate::schema::recordings;

        let mut conn = self.conn()?;
        let changeset = RecordingProgressChangeset::from_progress(progress, Utc::now().naive_utc());
        let next = progress.status();

        // Status check and update share one transaction.
        let updated = conn.transaction::<Option<DbRecording>, RepositoryError, _>(|conn| {
            let current = recordings::table
                .filter(recordings::id.eq(id.get()))
                .filter(recordings::agency_id.eq(agency_id.get()))
                .select(recordings::status)
                .first::<String>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let current: RecordingStatus = current.parse()?;
            if !current.can_transition_to(next) {
                return Ok(None);
            }

            let stored = diesel::update(recordings::table.find(id.get()))
                .set(&changeset)
                .get_result::<DbRecording>(conn)?;
            Ok(Some(stored))
        })?;

        updated
            .map(|recording| Recording::try_from(recording).map_err(RepositoryError::from))
            .transpose()
    }

    fn delete_recording(&self, id: RecordingId, agency_id: AgencyId) -> RepositoryResult<()> {
        use crate::schema::recordings;

        let mut conn = self.conn()?;
        let affected = diesel::delete(
            recordings::table
                .filter(recordings::id.eq(id.get()))
                .filter(recordings::agency_id.eq(agency_id.get())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
