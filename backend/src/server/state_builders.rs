//! Builders for HTTP state ports.
//!
//! Every capability gets exactly one strategy here; handlers never see the
//! flags that chose it.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use crate::domain::ports::{
    CalendarPort, DisabledCalendar, DisabledPlanChat, DisabledPublish, FixtureLoginService,
    IdeasPort, PlanChatPort, PublishPort, TextGenerationError, TextGenerator,
    UnconfiguredTextGenerator,
};
use crate::domain::{Capability, LocalIdeasService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::generation::OpenAiTextGenerator;
use crate::outbound::memory::InMemoryIdeaRepository;
use crate::outbound::persistence::{DbPool, DieselIdeaRepository};
use crate::outbound::service::{
    ForwardedCalendar, ForwardedIdeas, ForwardedPlanChat, ForwardedPublish, ServiceGateway,
};

use super::settings::{BackendConfig, GatewayConfig};

/// Errors raised while assembling handler state.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    /// The gateway HTTP client could not be built.
    #[error("failed to build service gateway client: {0}")]
    Gateway(#[from] reqwest::Error),
    /// A capability is forwarded but no gateway was configured.
    #[error("{capability} is forwarded but no service gateway is configured")]
    MissingGateway {
        /// Forwarded capability.
        capability: &'static str,
    },
    /// The text generation adapter could not be built.
    #[error("failed to build text generator: {0}")]
    Generator(#[from] TextGenerationError),
}

/// Pick the forwarded strategy when `capability` is flagged, otherwise the
/// local one.
fn select<P, Local, Remote>(
    capability: Capability,
    forwarded: bool,
    gateway: Option<&Arc<ServiceGateway>>,
    local: Local,
    remote: Remote,
) -> Result<Arc<P>, StateBuildError>
where
    P: ?Sized,
    Local: FnOnce() -> Arc<P>,
    Remote: FnOnce(Arc<ServiceGateway>) -> Arc<P>,
{
    if !forwarded {
        info!(%capability, strategy = "local", "capability strategy selected");
        return Ok(local());
    }
    let gateway = gateway.ok_or(StateBuildError::MissingGateway {
        capability: capability.as_str(),
    })?;
    info!(%capability, strategy = "forwarded", "capability strategy selected");
    Ok(remote(Arc::clone(gateway)))
}

fn local_ideas(pool: Option<DbPool>, clock: Arc<dyn Clock>) -> Arc<dyn IdeasPort> {
    match pool {
        Some(pool) => Arc::new(LocalIdeasService::new(
            Arc::new(DieselIdeaRepository::new(pool)),
            clock,
        )),
        None => {
            warn!("no database configured; ideas are kept in memory");
            Arc::new(LocalIdeasService::new(
                Arc::new(InMemoryIdeaRepository::new()),
                clock,
            ))
        }
    }
}

fn build_gateway(config: Option<GatewayConfig>) -> Result<Option<Arc<ServiceGateway>>, StateBuildError> {
    config
        .map(|GatewayConfig { base_url, timeout }| {
            ServiceGateway::new(base_url, timeout).map(Arc::new)
        })
        .transpose()
        .map_err(StateBuildError::from)
}

/// Assemble handler state from typed configuration.
///
/// The pool, when given, backs the local ideas store.
///
/// # Errors
/// Returns [`StateBuildError`] when an outbound client cannot be built or a
/// forwarded capability has no gateway.
pub fn build_http_state(
    config: BackendConfig,
    pool: Option<DbPool>,
) -> Result<HttpState, StateBuildError> {
    let BackendConfig {
        client_flags,
        gateway,
        generator,
        ..
    } = config;
    let flags = client_flags.capabilities;
    let gateway = build_gateway(gateway)?;
    let gateway = gateway.as_ref();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let ideas = select(
        Capability::Ideas,
        flags.ideas,
        gateway,
        || local_ideas(pool, clock),
        |gw| Arc::new(ForwardedIdeas::new(gw)) as Arc<dyn IdeasPort>,
    )?;
    let calendar = select(
        Capability::Calendar,
        flags.calendar,
        gateway,
        || Arc::new(DisabledCalendar) as Arc<dyn CalendarPort>,
        |gw| Arc::new(ForwardedCalendar::new(gw)) as Arc<dyn CalendarPort>,
    )?;
    let plan_chat = select(
        Capability::Plans,
        flags.plans,
        gateway,
        || Arc::new(DisabledPlanChat) as Arc<dyn PlanChatPort>,
        |gw| Arc::new(ForwardedPlanChat::new(gw)) as Arc<dyn PlanChatPort>,
    )?;
    let publish = select(
        Capability::Publish,
        flags.publish,
        gateway,
        || Arc::new(DisabledPublish) as Arc<dyn PublishPort>,
        |gw| Arc::new(ForwardedPublish::new(gw)) as Arc<dyn PublishPort>,
    )?;

    let generator: Arc<dyn TextGenerator> = match generator {
        Some(settings) => Arc::new(OpenAiTextGenerator::new(settings)?),
        None => {
            info!("no text generation provider configured");
            Arc::new(UnconfiguredTextGenerator)
        }
    };

    Ok(HttpState::new(
        HttpStatePorts {
            login: Arc::new(FixtureLoginService::default()),
            ideas,
            calendar,
            plan_chat,
            publish,
            generator,
        },
        client_flags,
    ))
}
