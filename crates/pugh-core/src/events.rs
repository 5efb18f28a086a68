//! Event envelope and the closed set of mutation kinds.
//!
//! Every change to a matrix is recorded as an [`Event`] appended to a branch
//! log. Events are never edited or deleted; later events supersede earlier
//! ones only in the projection.
//!
//! On the wire an event is a flat camelCase JSON object whose `type` field
//! names the kind:
//!
//! ```json
//! {"id":"evt_…","timestamp":"2026-02-08T12:00:00Z","author":"ana",
//!  "branchId":"br_…","type":"CriterionAdded","criterionId":"cri_…","label":"Cost"}
//! ```
//!
//! A payload that does not parse as a known [`EventKind`] (written by a newer
//! schema, or damaged) is kept verbatim as [`EventPayload::Unrecognized`] so
//! the log still loads and saves unchanged; the projector skips it. A known
//! event that arrives with fields this schema does not model keeps its
//! stored object too, and is written back exactly as it was read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::scale::Scale;

/// Structural events shape the matrix; content events fill its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    Structural,
    Content,
}

/// A single immutable entry in a branch log.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    /// Branch the event was originally recorded against. Forks copy events
    /// with this field untouched.
    pub branch_id: String,
    pub payload: EventPayload,
    /// The stored object, kept when the typed fields above do not reproduce
    /// it (extra fields, other number or timestamp spellings). Serialization
    /// writes it instead of the typed view.
    recorded: Option<Map<String, Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRef<'a> {
    id: &'a str,
    timestamp: &'a DateTime<Utc>,
    author: &'a str,
    branch_id: &'a str,
    #[serde(flatten)]
    payload: &'a EventPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Wire {
    id: String,
    timestamp: DateTime<Utc>,
    author: String,
    branch_id: String,
    #[serde(flatten)]
    payload: EventPayload,
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.recorded {
            Some(fields) => fields.serialize(serializer),
            None => self.wire().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::deserialize(deserializer)?;
        let wire: Wire = serde_json::from_value(Value::Object(fields.clone()))
            .map_err(serde::de::Error::custom)?;
        let mut event = Self {
            id: wire.id,
            timestamp: wire.timestamp,
            author: wire.author,
            branch_id: wire.branch_id,
            payload: wire.payload,
            recorded: None,
        };
        let typed = serde_json::to_value(event.wire()).map_err(serde::de::Error::custom)?;
        if typed.as_object() != Some(&fields) {
            event.recorded = Some(fields);
        }
        Ok(event)
    }
}

/// Event payload: a known kind, or raw fields this schema version cannot read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EventPayload {
    Known(EventKind),
    Unrecognized(Map<String, Value>),
}

/// Every mutation the system can record.
///
/// The set is closed: adding a kind is a schema change and every `match` over
/// it (the projector first) must handle the new kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum EventKind {
    MatrixCreated {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        allow_negative: bool,
        default_scale: Scale,
    },
    MatrixDefaultScaleSet {
        default_scale: Scale,
    },
    MatrixTitleChanged {
        title: String,
    },
    MatrixDescriptionChanged {
        description: String,
    },
    MatrixArchived,

    CriterionAdded {
        criterion_id: String,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scale: Option<Scale>,
    },
    CriterionRenamed {
        criterion_id: String,
        label: String,
    },
    CriterionRemoved {
        criterion_id: String,
    },
    CriterionScaleOverridden {
        criterion_id: String,
        scale: Scale,
    },
    CriterionDescriptionChanged {
        criterion_id: String,
        description: String,
    },
    CriterionReordered {
        criterion_id: String,
        position: i64,
    },
    CriterionWeightAdjusted {
        criterion_id: String,
        weight: i64,
    },

    OptionAdded {
        option_id: String,
        label: String,
    },
    OptionRenamed {
        option_id: String,
        label: String,
    },
    OptionRemoved {
        option_id: String,
    },
    OptionDescriptionChanged {
        option_id: String,
        description: String,
    },
    OptionReordered {
        option_id: String,
        position: i64,
    },

    RatingAssigned {
        rating_id: String,
        option_id: String,
        criterion_id: String,
        value: f64,
        /// Overrides the scale's label for this value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    },
    RatingRemoved {
        option_id: String,
        criterion_id: String,
    },
    CommentAdded {
        comment_id: String,
        option_id: String,
        criterion_id: String,
        comment: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_comment_id: Option<String>,
    },
}

impl Event {
    /// Wrap `kind` in an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `id` or `branch_id` is empty.
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        author: impl Into<String>,
        branch_id: impl Into<String>,
        kind: EventKind,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        let branch_id = branch_id.into();
        CoreError::require_id("event_id", &id)?;
        CoreError::require_id("branch_id", &branch_id)?;
        Ok(Self {
            id,
            timestamp,
            author: author.into(),
            branch_id,
            payload: EventPayload::Known(kind),
            recorded: None,
        })
    }

    /// Whether this event was loaded with fields the typed view drops.
    #[must_use]
    pub const fn has_recorded_fields(&self) -> bool {
        self.recorded.is_some()
    }

    fn wire(&self) -> WireRef<'_> {
        WireRef {
            id: &self.id,
            timestamp: &self.timestamp,
            author: &self.author,
            branch_id: &self.branch_id,
            payload: &self.payload,
        }
    }

    /// The parsed kind, or `None` for an unrecognized payload.
    #[must_use]
    pub const fn kind(&self) -> Option<&EventKind> {
        match &self.payload {
            EventPayload::Known(kind) => Some(kind),
            EventPayload::Unrecognized(_) => None,
        }
    }

    /// The wire `type` tag, as recorded.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match &self.payload {
            EventPayload::Known(kind) => kind.type_name(),
            EventPayload::Unrecognized(fields) => fields
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("<untyped>"),
        }
    }
}

fn owned_id(field: &'static str, value: impl Into<String>) -> Result<String, CoreError> {
    let value = value.into();
    CoreError::require_id(field, &value)?;
    Ok(value)
}

impl EventKind {
    #[must_use]
    pub fn matrix_created(
        title: impl Into<String>,
        description: Option<String>,
        allow_negative: bool,
        default_scale: Scale,
    ) -> Self {
        Self::MatrixCreated {
            title: title.into(),
            description,
            allow_negative,
            default_scale,
        }
    }

    #[must_use]
    pub const fn matrix_default_scale_set(default_scale: Scale) -> Self {
        Self::MatrixDefaultScaleSet { default_scale }
    }

    #[must_use]
    pub fn matrix_title_changed(title: impl Into<String>) -> Self {
        Self::MatrixTitleChanged {
            title: title.into(),
        }
    }

    #[must_use]
    pub fn matrix_description_changed(description: impl Into<String>) -> Self {
        Self::MatrixDescriptionChanged {
            description: description.into(),
        }
    }

    #[must_use]
    pub const fn matrix_archived() -> Self {
        Self::MatrixArchived
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `criterion_id` is empty.
    pub fn criterion_added(
        criterion_id: impl Into<String>,
        label: impl Into<String>,
        scale: Option<Scale>,
    ) -> Result<Self, CoreError> {
        Ok(Self::CriterionAdded {
            criterion_id: owned_id("criterion_id", criterion_id)?,
            label: label.into(),
            scale,
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `criterion_id` is empty.
    pub fn criterion_renamed(
        criterion_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self::CriterionRenamed {
            criterion_id: owned_id("criterion_id", criterion_id)?,
            label: label.into(),
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `criterion_id` is empty.
    pub fn criterion_removed(criterion_id: impl Into<String>) -> Result<Self, CoreError> {
        Ok(Self::CriterionRemoved {
            criterion_id: owned_id("criterion_id", criterion_id)?,
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `criterion_id` is empty.
    pub fn criterion_scale_overridden(
        criterion_id: impl Into<String>,
        scale: Scale,
    ) -> Result<Self, CoreError> {
        Ok(Self::CriterionScaleOverridden {
            criterion_id: owned_id("criterion_id", criterion_id)?,
            scale,
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `criterion_id` is empty.
    pub fn criterion_description_changed(
        criterion_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self::CriterionDescriptionChanged {
            criterion_id: owned_id("criterion_id", criterion_id)?,
            description: description.into(),
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `criterion_id` is empty.
    pub fn criterion_reordered(
        criterion_id: impl Into<String>,
        position: i64,
    ) -> Result<Self, CoreError> {
        Ok(Self::CriterionReordered {
            criterion_id: owned_id("criterion_id", criterion_id)?,
            position,
        })
    }

    /// Weight bounds are a command-level policy; any integer is accepted here.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `criterion_id` is empty.
    pub fn criterion_weight_adjusted(
        criterion_id: impl Into<String>,
        weight: i64,
    ) -> Result<Self, CoreError> {
        Ok(Self::CriterionWeightAdjusted {
            criterion_id: owned_id("criterion_id", criterion_id)?,
            weight,
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `option_id` is empty.
    pub fn option_added(
        option_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self::OptionAdded {
            option_id: owned_id("option_id", option_id)?,
            label: label.into(),
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `option_id` is empty.
    pub fn option_renamed(
        option_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self::OptionRenamed {
            option_id: owned_id("option_id", option_id)?,
            label: label.into(),
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `option_id` is empty.
    pub fn option_removed(option_id: impl Into<String>) -> Result<Self, CoreError> {
        Ok(Self::OptionRemoved {
            option_id: owned_id("option_id", option_id)?,
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `option_id` is empty.
    pub fn option_description_changed(
        option_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self::OptionDescriptionChanged {
            option_id: owned_id("option_id", option_id)?,
            description: description.into(),
        })
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if `option_id` is empty.
    pub fn option_reordered(option_id: impl Into<String>, position: i64) -> Result<Self, CoreError> {
        Ok(Self::OptionReordered {
            option_id: owned_id("option_id", option_id)?,
            position,
        })
    }

    /// A scored rating, optionally annotated with a label override and comment.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] for an empty id and
    /// [`CoreError::Validation`] for a NaN or infinite `value`.
    pub fn rating_assigned(
        rating_id: impl Into<String>,
        option_id: impl Into<String>,
        criterion_id: impl Into<String>,
        value: f64,
        label: Option<String>,
        comment: Option<String>,
    ) -> Result<Self, CoreError> {
        let rating_id = owned_id("rating_id", rating_id)?;
        let option_id = owned_id("option_id", option_id)?;
        let criterion_id = owned_id("criterion_id", criterion_id)?;
        if !value.is_finite() {
            return Err(CoreError::Validation(format!(
                "rating value must be a finite number, got {value}"
            )));
        }
        Ok(Self::RatingAssigned {
            rating_id,
            option_id,
            criterion_id,
            value,
            label,
            comment,
        })
    }

    /// Clears every entry of one cell.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] if either id is empty.
    pub fn rating_removed(
        option_id: impl Into<String>,
        criterion_id: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self::RatingRemoved {
            option_id: owned_id("option_id", option_id)?,
            criterion_id: owned_id("criterion_id", criterion_id)?,
        })
    }

    /// A comment on a cell, or a reply when `parent_comment_id` is set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`] for an empty id (including an empty
    /// parent id) and [`CoreError::Validation`] for blank text.
    pub fn comment_added(
        comment_id: impl Into<String>,
        option_id: impl Into<String>,
        criterion_id: impl Into<String>,
        comment: impl Into<String>,
        parent_comment_id: Option<String>,
    ) -> Result<Self, CoreError> {
        let comment_id = owned_id("comment_id", comment_id)?;
        let option_id = owned_id("option_id", option_id)?;
        let criterion_id = owned_id("criterion_id", criterion_id)?;
        if let Some(parent) = &parent_comment_id {
            CoreError::require_id("parent_comment_id", parent)?;
        }
        let comment = comment.into();
        if comment.trim().is_empty() {
            return Err(CoreError::Validation("comment text must not be empty".into()));
        }
        Ok(Self::CommentAdded {
            comment_id,
            option_id,
            criterion_id,
            comment,
            parent_comment_id,
        })
    }

    #[must_use]
    pub const fn class(&self) -> EventClass {
        match self {
            Self::RatingAssigned { .. } | Self::RatingRemoved { .. } | Self::CommentAdded { .. } => {
                EventClass::Content
            }
            Self::MatrixCreated { .. }
            | Self::MatrixDefaultScaleSet { .. }
            | Self::MatrixTitleChanged { .. }
            | Self::MatrixDescriptionChanged { .. }
            | Self::MatrixArchived
            | Self::CriterionAdded { .. }
            | Self::CriterionRenamed { .. }
            | Self::CriterionRemoved { .. }
            | Self::CriterionScaleOverridden { .. }
            | Self::CriterionDescriptionChanged { .. }
            | Self::CriterionReordered { .. }
            | Self::CriterionWeightAdjusted { .. }
            | Self::OptionAdded { .. }
            | Self::OptionRenamed { .. }
            | Self::OptionRemoved { .. }
            | Self::OptionDescriptionChanged { .. }
            | Self::OptionReordered { .. } => EventClass::Structural,
        }
    }

    /// The wire `type` tag of this kind.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::MatrixCreated { .. } => "MatrixCreated",
            Self::MatrixDefaultScaleSet { .. } => "MatrixDefaultScaleSet",
            Self::MatrixTitleChanged { .. } => "MatrixTitleChanged",
            Self::MatrixDescriptionChanged { .. } => "MatrixDescriptionChanged",
            Self::MatrixArchived => "MatrixArchived",
            Self::CriterionAdded { .. } => "CriterionAdded",
            Self::CriterionRenamed { .. } => "CriterionRenamed",
            Self::CriterionRemoved { .. } => "CriterionRemoved",
            Self::CriterionScaleOverridden { .. } => "CriterionScaleOverridden",
            Self::CriterionDescriptionChanged { .. } => "CriterionDescriptionChanged",
            Self::CriterionReordered { .. } => "CriterionReordered",
            Self::CriterionWeightAdjusted { .. } => "CriterionWeightAdjusted",
            Self::OptionAdded { .. } => "OptionAdded",
            Self::OptionRenamed { .. } => "OptionRenamed",
            Self::OptionRemoved { .. } => "OptionRemoved",
            Self::OptionDescriptionChanged { .. } => "OptionDescriptionChanged",
            Self::OptionReordered { .. } => "OptionReordered",
            Self::RatingAssigned { .. } => "RatingAssigned",
            Self::RatingRemoved { .. } => "RatingRemoved",
            Self::CommentAdded { .. } => "CommentAdded",
        }
    }
}
