//! Forms for creating, editing and importing prospects.

use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::prospect::{NewProspect, ProspectStatus, UpdateProspect};
use crate::domain::prospect_event::ProspectEventType;
use crate::domain::spcc::SpccClassification;
use crate::domain::types::{
    AgencyId, LeadSource, ProspectId, ProspectName, SanitizedText, UserId,
};
use crate::forms::{FormError, non_blank, optional_email, optional_id, optional_phone, optional_text};

/// Lead source used when a form leaves it blank.
pub const DEFAULT_SOURCE: &str = "walk-in";

#[derive(Debug, Deserialize, Validate)]
/// Payload for registering a single prospect.
pub struct AddProspectForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub vehicle_id: Option<i32>,
    pub user_id: Option<i32>,
    pub notes: Option<String>,
    /// Pick a salesperson from today's roster when `user_id` is absent.
    #[serde(default)]
    pub auto_assign: bool,
}

pub struct AddProspectPayload {
    pub prospect: NewProspect,
    pub auto_assign: bool,
}

impl AddProspectForm {
    pub fn into_payload(self, agency_id: AgencyId) -> Result<AddProspectPayload, FormError> {
        self.validate()?;

        let name = ProspectName::new(self.name).map_err(|_| FormError::InvalidName)?;
        let source = lead_source(self.source)?;
        let user_id: Option<UserId> = optional_id(self.user_id, "user")?;

        let prospect = NewProspect::new(agency_id, name, source)
            .with_contact(optional_email(self.email)?, optional_phone(self.phone)?)
            .assigned_to(user_id)
            .interested_in(optional_id(self.vehicle_id, "vehicle")?)
            .with_notes(optional_text(self.notes));

        Ok(AddProspectPayload {
            auto_assign: self.auto_assign && user_id.is_none(),
            prospect,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Full replacement of the editable prospect fields.
pub struct UpdateProspectForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: ProspectStatus,
    pub vehicle_id: Option<i32>,
    pub notes: Option<String>,
}

impl TryFrom<UpdateProspectForm> for UpdateProspect {
    type Error = FormError;

    fn try_from(form: UpdateProspectForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(UpdateProspect {
            name: ProspectName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: optional_email(form.email)?,
            phone: optional_phone(form.phone)?,
            source: lead_source(form.source)?,
            status: form.status,
            vehicle_id: optional_id(form.vehicle_id, "vehicle")?,
            notes: optional_text(form.notes),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Manual timeline entry.
pub struct AddEventForm {
    pub event_type: ProspectEventType,
    #[validate(length(min = 1, max = 4000))]
    pub text: String,
}

pub struct AddEventPayload {
    pub event_type: ProspectEventType,
    pub text: SanitizedText,
}

impl TryFrom<AddEventForm> for AddEventPayload {
    type Error = FormError;

    fn try_from(form: AddEventForm) -> Result<Self, Self::Error> {
        form.validate()?;
        // System events are written by the services themselves.
        if !matches!(
            form.event_type,
            ProspectEventType::Comment | ProspectEventType::Call | ProspectEventType::Other
        ) {
            return Err(FormError::InvalidValue(format!(
                "event type {} cannot be added manually",
                form.event_type
            )));
        }
        let text = SanitizedText::new(form.text)
            .map_err(|_| FormError::InvalidValue("event text is empty".to_string()))?;
        Ok(Self {
            event_type: form.event_type,
            text,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Reassign prospects to a salesperson, or unassign them with `user_id: null`.
pub struct AssignProspectsForm {
    pub user_id: Option<i32>,
    #[validate(length(min = 1, max = 500))]
    pub prospect_ids: Vec<i32>,
}

pub struct AssignProspectsPayload {
    pub user_id: Option<UserId>,
    pub prospect_ids: Vec<ProspectId>,
}

impl TryFrom<AssignProspectsForm> for AssignProspectsPayload {
    type Error = FormError;

    fn try_from(form: AssignProspectsForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let mut prospect_ids = form
            .prospect_ids
            .into_iter()
            .map(|id| ProspectId::new(id).map_err(|_| FormError::InvalidId("prospect")))
            .collect::<Result<Vec<_>, _>>()?;
        prospect_ids.sort_unstable();
        prospect_ids.dedup();

        Ok(Self {
            user_id: optional_id(form.user_id, "user")?,
            prospect_ids,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
/// Query string of the prospect list.
pub struct ProspectListParams {
    pub search: Option<String>,
    pub status: Option<ProspectStatus>,
    pub classification: Option<SpccClassification>,
    pub page: Option<usize>,
}

#[derive(MultipartForm)]
/// CSV upload with header `name,email,phone,source[,notes]`.
pub struct UploadProspectsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(Debug, Deserialize)]
struct ProspectCsvRow {
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl UploadProspectsForm {
    /// Parses the uploaded file; a single invalid row rejects the whole upload.
    pub fn parse(&mut self, agency_id: AgencyId) -> Result<Vec<NewProspect>, FormError> {
        let mut content = String::new();
        self.csv
            .file
            .read_to_string(&mut content)
            .map_err(|err| FormError::Upload(err.to_string()))?;
        parse_prospects_csv(&content, agency_id)
    }
}

pub fn parse_prospects_csv(content: &str, agency_id: AgencyId) -> Result<Vec<NewProspect>, FormError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| FormError::Csv(err.to_string()))?
        .clone();
    if !headers.iter().any(|header| header == "name") {
        return Err(FormError::Csv("missing name column".to_string()));
    }

    let mut prospects = Vec::new();
    for (index, record) in reader.deserialize::<ProspectCsvRow>().enumerate() {
        // header is line 1
        let row = index + 2;
        let record = record.map_err(|err| FormError::CsvRow {
            row,
            message: err.to_string(),
        })?;
        let prospect = prospect_from_row(record, agency_id).map_err(|err| FormError::CsvRow {
            row,
            message: err.to_string(),
        })?;
        prospects.push(prospect);
    }

    if prospects.is_empty() {
        return Err(FormError::Csv("file has no rows".to_string()));
    }
    Ok(prospects)
}

fn prospect_from_row(row: ProspectCsvRow, agency_id: AgencyId) -> Result<NewProspect, FormError> {
    let name = ProspectName::new(row.name).map_err(|_| FormError::InvalidName)?;
    Ok(NewProspect::new(agency_id, name, lead_source(row.source)?)
        .with_contact(optional_email(row.email)?, optional_phone(row.phone)?)
        .with_notes(optional_text(row.notes)))
}

fn lead_source(source: Option<String>) -> Result<LeadSource, FormError> {
    let source = non_blank(source).unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    LeadSource::new(source).map_err(FormError::from)
}
