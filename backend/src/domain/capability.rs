//! Capabilities that may be served locally or by the external service.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A feature area whose implementation is selected at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Calendar save and export.
    Calendar,
    /// Plan chat.
    Plans,
    /// Idea CRUD and idea/plan links.
    Ideas,
    /// Publishing.
    Publish,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 4] = [Self::Calendar, Self::Plans, Self::Ideas, Self::Publish];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Plans => "plans",
            Self::Ideas => "ideas",
            Self::Publish => "publish",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which capabilities are forwarded to the external service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityFlags {
    /// Forward calendar operations.
    pub calendar: bool,
    /// Forward plan chat.
    pub plans: bool,
    /// Forward idea operations.
    pub ideas: bool,
    /// Forward publishing.
    pub publish: bool,
}

impl CapabilityFlags {
    /// Whether `capability` is forwarded.
    #[must_use]
    pub const fn is_forwarded(&self, capability: Capability) -> bool {
        match capability {
            Capability::Calendar => self.calendar,
            Capability::Plans => self.plans,
            Capability::Ideas => self.ideas,
            Capability::Publish => self.publish,
        }
    }

    /// Whether any capability is forwarded.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.calendar || self.plans || self.ideas || self.publish
    }
}

/// Client-visible configuration returned by `/api/v1/client-config`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFlags {
    /// Experimental navigation-state toggle.
    pub nav_state_experiment: bool,
    /// Forwarded capabilities.
    pub capabilities: CapabilityFlags,
}

/// Result of a capability call, ready to be wrapped in an envelope.
///
/// Forwarded calls relay the upstream status and metadata; local calls
/// answer `200` with no extra metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOutcome {
    /// HTTP status to answer with.
    pub status: u16,
    /// Envelope payload.
    pub data: Value,
    /// Metadata merged into the envelope meta.
    pub meta: Map<String, Value>,
}

impl ServiceOutcome {
    /// Locally produced `200` outcome.
    #[must_use]
    pub fn local(data: Value) -> Self {
        Self::with_status(200, data)
    }

    /// Outcome with an explicit status and no metadata.
    #[must_use]
    pub fn with_status(status: u16, data: Value) -> Self {
        Self {
            status,
            data,
            meta: Map::new(),
        }
    }

    /// Outcome that renders as a JSON envelope with a payload.
    ///
    /// `204` becomes `200` since a no-content response cannot carry the
    /// envelope, and a null payload becomes `{}` so `data` stays set.
    #[must_use]
    pub fn into_renderable(self) -> Self {
        let Self { status, data, meta } = self;
        Self {
            status: if status == 204 { 200 } else { status },
            data: if data.is_null() {
                Value::Object(Map::new())
            } else {
                data
            },
            meta,
        }
    }
}
