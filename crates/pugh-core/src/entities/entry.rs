use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One entry in the history of an option×criterion cell.
///
/// Cells keep their full history: a new rating appends an entry instead of
/// replacing the previous one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellEntry {
    pub id: String,
    pub option_id: String,
    pub criterion_id: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub body: EntryBody,
}

/// A cell entry is either a scored rating or a free-text comment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EntryBody {
    Rating {
        value: f64,
        /// Overrides the scale's label for this value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    },
    Comment {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_comment_id: Option<String>,
    },
}

impl CellEntry {
    /// The scored value, if this entry is a rating.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match &self.body {
            EntryBody::Rating { value, .. } => Some(*value),
            EntryBody::Comment { .. } => None,
        }
    }

    /// Free text attached to the entry (a rating's comment or a comment's text).
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        match &self.body {
            EntryBody::Rating { comment, .. } => comment.as_deref(),
            EntryBody::Comment { text, .. } => Some(text),
        }
    }

    /// The entry this one replies to, if any.
    #[must_use]
    pub fn parent_comment_id(&self) -> Option<&str> {
        match &self.body {
            EntryBody::Comment {
                parent_comment_id, ..
            } => parent_comment_id.as_deref(),
            EntryBody::Rating { .. } => None,
        }
    }

    #[must_use]
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id().is_some()
    }

    #[must_use]
    pub fn is_for(&self, option_id: &str, criterion_id: &str) -> bool {
        self.option_id == option_id && self.criterion_id == criterion_id
    }
}
