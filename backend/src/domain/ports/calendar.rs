//! Driving port for calendar save and export.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domain::{Actor, Error, ServiceOutcome};

/// Export format used when the client does not name one.
pub const DEFAULT_EXPORT_FORMAT: &str = "csv";

fn default_export_format() -> String {
    DEFAULT_EXPORT_FORMAT.to_owned()
}

/// Request to persist a generated calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSaveRequest {
    /// Calendar being saved.
    #[serde(default)]
    pub calendar_id: Option<String>,
    /// Generation run that produced the calendar.
    #[serde(default)]
    pub run_id: Option<String>,
    /// Remaining fields, forwarded untouched.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Request to export a calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarExportRequest {
    /// Calendar being exported.
    #[serde(default)]
    pub calendar_id: Option<String>,
    /// Generation run that produced the calendar.
    #[serde(default)]
    pub run_id: Option<String>,
    /// Export format, `csv` unless given.
    #[serde(default = "default_export_format")]
    pub format: String,
    /// Remaining fields, forwarded untouched.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Calendar persistence and export.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// Save a calendar.
    async fn save(
        &self,
        actor: &Actor,
        request: CalendarSaveRequest,
    ) -> Result<ServiceOutcome, Error>;

    /// Export a calendar.
    async fn export(
        &self,
        actor: &Actor,
        request: CalendarExportRequest,
    ) -> Result<ServiceOutcome, Error>;
}

/// Local strategy: calendars are not persisted, inputs are echoed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCalendar;

#[async_trait]
impl CalendarPort for DisabledCalendar {
    async fn save(
        &self,
        _actor: &Actor,
        request: CalendarSaveRequest,
    ) -> Result<ServiceOutcome, Error> {
        Ok(ServiceOutcome::local(json!({
            "status": "disabled",
            "calendarId": request.calendar_id,
            "runId": request.run_id,
        })))
    }

    async fn export(
        &self,
        _actor: &Actor,
        request: CalendarExportRequest,
    ) -> Result<ServiceOutcome, Error> {
        Ok(ServiceOutcome::local(json!({
            "status": "disabled",
            "calendarId": request.calendar_id,
            "runId": request.run_id,
            "format": request.format,
        })))
    }
}
