//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O. Which strategy
//! sits behind each capability port is decided before this state is built.

use std::sync::Arc;

use crate::domain::ClientFlags;
use crate::domain::ports::{
    CalendarPort, IdeasPort, LoginService, PlanChatPort, PublishPort, TextGenerator,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Credential check for `POST /login`.
    pub login: Arc<dyn LoginService>,
    /// Idea CRUD and idea/plan links.
    pub ideas: Arc<dyn IdeasPort>,
    /// Calendar save and export.
    pub calendar: Arc<dyn CalendarPort>,
    /// Plan chat.
    pub plan_chat: Arc<dyn PlanChatPort>,
    /// Publishing.
    pub publish: Arc<dyn PublishPort>,
    /// AI text generation.
    pub generator: Arc<dyn TextGenerator>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential check for `POST /login`.
    pub login: Arc<dyn LoginService>,
    /// Idea CRUD and idea/plan links.
    pub ideas: Arc<dyn IdeasPort>,
    /// Calendar save and export.
    pub calendar: Arc<dyn CalendarPort>,
    /// Plan chat.
    pub plan_chat: Arc<dyn PlanChatPort>,
    /// Publishing.
    pub publish: Arc<dyn PublishPort>,
    /// AI text generation.
    pub generator: Arc<dyn TextGenerator>,
    /// Flags exposed by `GET /client-config`.
    pub client_flags: ClientFlags,
}

impl HttpState {
    /// Construct state from a ports bundle and the client-visible flags.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use ireal_backend::domain::ports::{
    ///     DisabledCalendar, DisabledPlanChat, DisabledPublish, FixtureLoginService,
    ///     UnconfiguredTextGenerator,
    /// };
    /// use ireal_backend::domain::{ClientFlags, LocalIdeasService};
    /// use ireal_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use ireal_backend::outbound::memory::InMemoryIdeaRepository;
    ///
    /// let ports = HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService::default()),
    ///     ideas: Arc::new(LocalIdeasService::new(
    ///         Arc::new(InMemoryIdeaRepository::default()),
    ///         Arc::new(mockable::DefaultClock),
    ///     )),
    ///     calendar: Arc::new(DisabledCalendar),
    ///     plan_chat: Arc::new(DisabledPlanChat),
    ///     publish: Arc::new(DisabledPublish),
    ///     generator: Arc::new(UnconfiguredTextGenerator),
    /// };
    /// let state = HttpState::new(ports, ClientFlags::default());
    /// let _ideas = state.ideas.clone();
    /// ```
    #[must_use]
    pub fn new(ports: HttpStatePorts, client_flags: ClientFlags) -> Self {
        let HttpStatePorts {
            login,
            ideas,
            calendar,
            plan_chat,
            publish,
            generator,
        } = ports;
        Self {
            login,
            ideas,
            calendar,
            plan_chat,
            publish,
            generator,
            client_flags,
        }
    }
}
