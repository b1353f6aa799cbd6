//! Diesel models for storing prospect timeline events.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::prospect_event::{
    NewProspectEvent as DomainNewProspectEvent, ProspectEvent as DomainProspectEvent,
};
use crate::domain::types::{ProspectEventId, ProspectId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::prospect_events)]
pub struct ProspectEvent {
    pub id: i32,
    pub prospect_id: i32,
    pub user_id: i32,
    pub event_type: String,
    pub event_data: String, // store JSON text in the DB
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::prospect_events)]
pub struct NewProspectEvent {
    pub prospect_id: i32,
    pub user_id: i32,
    pub event_type: String,
    pub event_data: String,
}

impl TryFrom<ProspectEvent> for DomainProspectEvent {
    type Error = TypeConstraintError;

    fn try_from(event: ProspectEvent) -> Result<Self, Self::Error> {
        let event_data = serde_json::from_str(&event.event_data).unwrap_or_default();

        Ok(Self {
            id: ProspectEventId::new(event.id)?,
            prospect_id: ProspectId::new(event.prospect_id)?,
            user_id: UserId::new(event.user_id)?,
            event_type: event.event_type.parse()?,
            event_data,
            created_at: event.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewProspectEvent> for NewProspectEvent {
    fn from(event: &'a DomainNewProspectEvent) -> Self {
        Self {
            prospect_id: event.prospect_id.get(),
            user_id: event.user_id.get(),
            event_type: event.event_type.to_string(),
            event_data: event.event_data.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::prospect_event::ProspectEventType;

    #[test]
    fn malformed_json_becomes_null() {
        let db = ProspectEvent {
            id: 1,
            prospect_id: 2,
            user_id: 3,
            event_type: "Comment".into(),
            event_data: "{not json".into(),
            created_at: Utc::now().naive_utc(),
        };
        let domain = DomainProspectEvent::try_from(db).expect("valid event");
        assert_eq!(domain.event_type, ProspectEventType::Comment);
        assert_eq!(domain.event_data, Value::Null);
    }

    #[test]
    fn new_event_serializes_payload() {
        let domain = DomainNewProspectEvent::new(
            ProspectId::new(2).unwrap(),
            UserId::new(3).unwrap(),
            ProspectEventType::Call,
            json!({"text": "Sin respuesta"}),
        );
        let new: NewProspectEvent = (&domain).into();
        assert_eq!(new.event_type, "Call");
        assert_eq!(new.event_data, r#"{"text":"Sin respuesta"}"#);
    }
}
