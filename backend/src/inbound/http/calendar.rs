//! Calendar handlers.
//!
//! ```text
//! POST /api/v1/calendar/save   {"calendarId":"c1","runId":"r1"}
//! POST /api/v1/calendar/export {"calendarId":"c1","format":"ics"}
//! ```

use actix_web::{HttpResponse, post, web};

use crate::domain::Actor;
use crate::domain::ports::{CalendarExportRequest, CalendarSaveRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::respond::relay;
use crate::inbound::http::state::HttpState;

/// Save a generated calendar.
#[post("/calendar/save")]
pub async fn save_calendar(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<CalendarSaveRequest>,
) -> ApiResult<HttpResponse> {
    relay(state.calendar.save(&actor, payload.into_inner()).await?)
}

/// Export a calendar.
#[post("/calendar/export")]
pub async fn export_calendar(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<CalendarExportRequest>,
) -> ApiResult<HttpResponse> {
    relay(state.calendar.export(&actor, payload.into_inner()).await?)
}
