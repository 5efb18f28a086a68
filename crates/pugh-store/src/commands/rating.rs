//! Ratings and comments on option×criterion cells.

use pugh_core::ids::{PREFIX_COMMENT, PREFIX_RATING};
use pugh_core::{Event, EventKind};

use super::{require_criterion, require_option};
use crate::error::StoreError;
use crate::store::PughStore;

/// Input for [`PughStore::rate`].
///
/// With a value the draft becomes a rating (optionally annotated); with only a
/// comment it becomes a plain comment; with neither it is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingDraft {
    pub value: Option<f64>,
    pub label: Option<String>,
    pub comment: Option<String>,
}

impl RatingDraft {
    #[must_use]
    pub const fn value(value: f64) -> Self {
        Self {
            value: Some(value),
            label: None,
            comment: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl PughStore {
    /// Record a rating or comment for a cell.
    ///
    /// Returns `Ok(None)` without recording anything when the draft has
    /// neither a value nor a non-blank comment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown option or criterion or
    /// a non-finite value.
    pub fn rate(
        &mut self,
        option_id: &str,
        criterion_id: &str,
        draft: RatingDraft,
    ) -> Result<Option<Event>, StoreError> {
        self.catch_up();
        require_option(self.snapshot(), option_id)?;
        require_criterion(self.snapshot(), criterion_id)?;

        let comment = non_blank(draft.comment);
        let kind = match (draft.value, comment) {
            (Some(value), comment) => EventKind::rating_assigned(
                self.new_id(PREFIX_RATING),
                option_id,
                criterion_id,
                value,
                non_blank(draft.label),
                comment,
            )?,
            (None, Some(text)) => EventKind::comment_added(
                self.new_id(PREFIX_COMMENT),
                option_id,
                criterion_id,
                text,
                None,
            )?,
            (None, None) => {
                tracing::debug!(option_id, criterion_id, "empty rating draft ignored");
                return Ok(None);
            }
        };
        self.dispatch(kind).map(Some)
    }

    /// Clear every rating and comment of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown option or criterion.
    pub fn remove_rating(&mut self, option_id: &str, criterion_id: &str) -> Result<Event, StoreError> {
        self.catch_up();
        require_option(self.snapshot(), option_id)?;
        require_criterion(self.snapshot(), criterion_id)?;
        self.dispatch(EventKind::rating_removed(option_id, criterion_id)?)
    }

    /// Comment on a cell, or reply to one of its top-level entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for an unknown option or criterion,
    /// blank text, or a parent that is missing, in another cell, or itself a
    /// reply.
    pub fn add_comment(
        &mut self,
        option_id: &str,
        criterion_id: &str,
        text: &str,
        parent_comment_id: Option<&str>,
    ) -> Result<Event, StoreError> {
        self.catch_up();
        require_option(self.snapshot(), option_id)?;
        require_criterion(self.snapshot(), criterion_id)?;
        if let Some(parent_id) = parent_comment_id {
            let Some(parent) = self.snapshot().entry(parent_id) else {
                return Err(StoreError::invalid(format!(
                    "parent entry {parent_id} does not exist"
                )));
            };
            if !parent.is_for(option_id, criterion_id) {
                return Err(StoreError::invalid(format!(
                    "parent entry {parent_id} belongs to another cell"
                )));
            }
            if parent.is_reply() {
                return Err(StoreError::invalid(format!(
                    "parent entry {parent_id} is itself a reply"
                )));
            }
        }
        let kind = EventKind::comment_added(
            self.new_id(PREFIX_COMMENT),
            option_id,
            criterion_id,
            text,
            parent_comment_id.map(str::to_string),
        )?;
        self.dispatch(kind)
    }
}
