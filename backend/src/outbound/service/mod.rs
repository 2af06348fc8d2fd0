//! Forwarding to the external orchestration service.
//!
//! [`ServiceGateway`] performs the HTTP calls; the `Forwarded*` adapters
//! implement the capability ports on top of it.

mod capabilities;
mod client;
mod ideas;

pub use capabilities::{
    CALENDAR_EXPORT_FAILED, CALENDAR_SAVE_FAILED, ForwardedCalendar, ForwardedPlanChat,
    ForwardedPublish, PLAN_CHAT_FAILED, PUBLISH_FAILED,
};
pub use client::{ServiceCall, ServiceGateway, ServiceGatewayError, USER_ID_HEADER};
pub use ideas::ForwardedIdeas;
