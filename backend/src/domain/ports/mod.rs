//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Port`, [`LoginService`]) are what inbound adapters call.
//! Each capability port has a local strategy here and a forwarded strategy
//! in `outbound::service`; the choice is made once at start-up. Driven
//! ports ([`IdeaRepository`], [`TextGenerator`]) are implemented by
//! outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod calendar;
mod idea_repository;
mod ideas;
mod login_service;
mod plan_chat;
mod publish;
mod text_generator;

#[cfg(test)]
pub use calendar::MockCalendarPort;
pub use calendar::{
    CalendarExportRequest, CalendarPort, CalendarSaveRequest, DEFAULT_EXPORT_FORMAT,
    DisabledCalendar,
};
#[cfg(test)]
pub use idea_repository::MockIdeaRepository;
pub use idea_repository::{IdeaRepository, IdeaRepositoryError};
#[cfg(test)]
pub use ideas::MockIdeasPort;
pub use ideas::{IdeaDeleted, IdeaPlanLinks, IdeasPort, PlanIdeaLinks};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FIXTURE_USER_ID, FixtureLoginService, LoginService};
#[cfg(test)]
pub use plan_chat::MockPlanChatPort;
pub use plan_chat::{DisabledPlanChat, PlanChatPort, PlanChatRequest};
#[cfg(test)]
pub use publish::MockPublishPort;
pub use publish::{DisabledPublish, PublishPort};
#[cfg(test)]
pub use text_generator::MockTextGenerator;
pub use text_generator::{
    GENERATION_FAILED, TextGenerationError, TextGenerator, UnconfiguredTextGenerator,
};
