//! AI text generation request and result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content-type discriminator selecting the system instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Free-form marketing text.
    #[default]
    General,
    /// A content calendar.
    Calendar,
    /// A single content idea.
    Idea,
    /// A content strategy plan.
    Plan,
}

impl ContentKind {
    /// Wire name of the discriminator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Calendar => "calendar",
            Self::Idea => "idea",
            Self::Plan => "plan",
        }
    }

    /// System instruction sent to the provider for this kind.
    #[must_use]
    pub const fn system_instruction(self) -> &'static str {
        match self {
            Self::General => {
                "You are a helpful marketing assistant. Answer concisely and in plain language."
            }
            Self::Calendar => {
                "You are a content strategist. Produce a content calendar as a dated list of \
                 posts, each with a channel, a working title and a one-line angle."
            }
            Self::Idea => {
                "You are a creative copywriter. Produce a single content idea with a title, \
                 a hook and a short outline."
            }
            Self::Plan => {
                "You are a marketing planner. Produce a content plan with goals, audience, \
                 key messages and a sequence of deliverables."
            }
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for generation input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationValidationError {
    /// Prompt is empty or whitespace.
    #[error("prompt must not be empty")]
    EmptyPrompt,
}

/// Validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    kind: ContentKind,
}

impl GenerationRequest {
    /// Validate a prompt for the given kind.
    ///
    /// # Errors
    /// Returns [`GenerationValidationError::EmptyPrompt`] for blank prompts.
    pub fn new(prompt: &str, kind: ContentKind) -> Result<Self, GenerationValidationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationValidationError::EmptyPrompt);
        }
        Ok(Self {
            prompt: prompt.to_owned(),
            kind,
        })
    }

    /// Trimmed prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Requested content kind.
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }
}

/// Text returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    /// Generated content.
    pub content: String,
    /// Provider name reported in envelope metadata.
    pub provider: String,
    /// Model that produced the text, when reported.
    pub model: Option<String>,
}
