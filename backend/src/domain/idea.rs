//! Ideas: user-owned content notes that can be linked to plans.
//!
//! Serialisation keeps the relational row shape (`snake_case`) so the local
//! and forwarded strategies emit the same JSON for an idea.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 200;
/// Maximum content length in characters.
pub const CONTENT_MAX: usize = 20_000;

/// Validation errors for idea input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdeaValidationError {
    /// Title is blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeds [`TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Content exceeds [`CONTENT_MAX`].
    #[error("content must be at most {max} characters")]
    ContentTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// A patch that changes nothing.
    #[error("update must change title or content")]
    EmptyPatch,
}

fn validate_title(raw: &str) -> Result<String, IdeaValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(IdeaValidationError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX {
        return Err(IdeaValidationError::TitleTooLong { max: TITLE_MAX });
    }
    Ok(title.to_owned())
}

fn validate_content(raw: String) -> Result<String, IdeaValidationError> {
    if raw.chars().count() > CONTENT_MAX {
        return Err(IdeaValidationError::ContentTooLong { max: CONTENT_MAX });
    }
    Ok(raw)
}

/// A persisted idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    /// Primary key.
    pub id: Uuid,
    /// Owning user.
    pub user_id: UserId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Free-text body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    /// Apply a validated patch, stamping `updated_at`.
    #[must_use]
    pub fn patched(mut self, patch: IdeaPatch, now: DateTime<Utc>) -> Self {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = now;
        self
    }

    /// Case-insensitive substring match against title or content.
    #[must_use]
    pub fn matches(&self, term: &SearchTerm) -> bool {
        let needle = term.lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

/// Validated input for creating an idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdeaDraft {
    title: String,
    content: String,
}

impl IdeaDraft {
    /// Validate a title and content pair.
    ///
    /// # Errors
    /// Returns [`IdeaValidationError`] when the title is blank or either
    /// field is too long.
    pub fn new(title: &str, content: String) -> Result<Self, IdeaValidationError> {
        Ok(Self {
            title: validate_title(title)?,
            content: validate_content(content)?,
        })
    }

    /// Validated title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Validated content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Materialise the draft as a new idea owned by `owner`.
    #[must_use]
    pub fn into_idea(self, owner: UserId, now: DateTime<Utc>) -> Idea {
        Idea {
            id: Uuid::new_v4(),
            user_id: owner,
            title: self.title,
            content: self.content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdeaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl IdeaPatch {
    /// Validate optional replacement fields.
    ///
    /// # Errors
    /// Returns [`IdeaValidationError::EmptyPatch`] when neither field is set,
    /// or a field-level error for invalid values.
    pub fn new(title: Option<&str>, content: Option<String>) -> Result<Self, IdeaValidationError> {
        if title.is_none() && content.is_none() {
            return Err(IdeaValidationError::EmptyPatch);
        }
        Ok(Self {
            title: title.map(validate_title).transpose()?,
            content: content.map(validate_content).transpose()?,
        })
    }

    /// Replacement title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replacement content, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// Non-blank search term used to filter ideas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Build a term from raw query input; blank input means "no filter".
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| Self(term.to_owned()))
    }

    /// The trimmed term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    /// SQL `LIKE` pattern with wildcards in the term escaped.
    ///
    /// # Examples
    /// ```
    /// use ireal_backend::domain::SearchTerm;
    ///
    /// let term = SearchTerm::parse(Some("50%_off")).expect("term");
    /// assert_eq!(term.like_pattern(), r"%50\%\_off%");
    /// ```
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.0.len() + 2);
        escaped.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        escaped
    }
}

/// Deduplicate identifiers, keeping first-seen order.
#[must_use]
pub fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
