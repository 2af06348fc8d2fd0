//! Domain primitives, ports and services.
//!
//! Purpose: define the strongly typed vocabulary shared by the HTTP edge and
//! the outbound adapters. Nothing here depends on actix, diesel or reqwest.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures with stable codes.
//! - Envelope / EnvelopeMeta: the `{data, error, meta}` response contract.
//! - RequestId: task-local correlation identifier.
//! - CallerIdentity / Actor: who is calling, resolved without side effects.
//! - Idea, IdeaDraft, IdeaPatch, SearchTerm: the locally stored entity.
//! - GenerationRequest / ContentKind: AI passthrough input.
//! - ports: capability and persistence traits.

pub mod caller;
pub mod capability;
pub mod envelope;
pub mod error;
pub mod generation;
pub mod idea;
pub mod ideas_service;
pub mod ports;
pub mod request_id;
pub mod user;

pub use self::caller::{
    ANONYMOUS_CALLER, Actor, CallerIdentity, IdentitySources, VISITOR_PREFIX, resolve_caller,
};
pub use self::capability::{Capability, CapabilityFlags, ClientFlags, ServiceOutcome};
pub use self::envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use self::error::{Error, ErrorCode};
pub use self::generation::{
    ContentKind, GeneratedText, GenerationRequest, GenerationValidationError,
};
pub use self::idea::{
    CONTENT_MAX, Idea, IdeaDraft, IdeaPatch, IdeaValidationError, SearchTerm, TITLE_MAX,
    dedup_ids,
};
pub use self::ideas_service::LocalIdeasService;
pub use self::request_id::{REQUEST_ID_HEADER, RequestId, RequestIdError};
pub use self::user::{LoginCredentials, LoginValidationError, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ireal_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
