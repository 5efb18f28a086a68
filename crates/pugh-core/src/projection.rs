//! The projector: a pure fold of an ordered event log into a snapshot.
//!
//! Log order is the only ordering key; event timestamps are carried into cell
//! entries as metadata but never consulted while folding.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CellEntry, Criterion, DecisionOption, EntryBody, MatrixConfig, MatrixMeta};
use crate::events::{Event, EventKind, EventPayload};

/// Weight a criterion carries until a weight adjustment says otherwise.
pub const DEFAULT_WEIGHT: i64 = 10;

/// Materialized matrix state derived from a branch log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatrixSnapshot {
    pub matrix: MatrixMeta,
    pub criteria: Vec<Criterion>,
    pub options: Vec<DecisionOption>,
    /// Ratings and comments in log order, full history.
    pub entries: Vec<CellEntry>,
    /// Criterion id to weight. Holds exactly the criteria present.
    pub weights: BTreeMap<String, i64>,
}

/// Fold `events` from an empty snapshot, strictly in slice order.
#[must_use]
pub fn project(events: &[Event]) -> MatrixSnapshot {
    let mut snapshot = MatrixSnapshot::default();
    for event in events {
        snapshot.apply(event);
    }
    snapshot
}

impl MatrixSnapshot {
    #[must_use]
    pub fn criterion(&self, id: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn option(&self, id: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.id == id)
    }

    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&CellEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Number of entries that carry a score.
    #[must_use]
    pub fn rating_count(&self) -> usize {
        self.entries.iter().filter(|e| e.value().is_some()).count()
    }

    #[must_use]
    pub fn weight(&self, criterion_id: &str) -> Option<i64> {
        self.weights.get(criterion_id).copied()
    }

    /// Apply a single event. Unknown payloads and events that reference
    /// absent entities leave the snapshot unchanged.
    pub fn apply(&mut self, event: &Event) {
        let kind = match &event.payload {
            EventPayload::Known(kind) => kind,
            EventPayload::Unrecognized(_) => {
                tracing::debug!(
                    event_id = %event.id,
                    event_type = event.type_name(),
                    "skipping unrecognized event"
                );
                return;
            }
        };

        match kind {
            EventKind::MatrixCreated {
                title,
                description,
                allow_negative,
                default_scale,
            } => {
                self.matrix = MatrixMeta {
                    title: Some(title.clone()),
                    description: description.clone(),
                    archived: false,
                    config: MatrixConfig {
                        default_scale: default_scale.clone(),
                        allow_negative: *allow_negative,
                    },
                };
            }
            EventKind::MatrixDefaultScaleSet { default_scale } => {
                self.matrix.config.default_scale = default_scale.clone();
            }
            EventKind::MatrixTitleChanged { title } => {
                self.matrix.title = Some(title.clone());
            }
            EventKind::MatrixDescriptionChanged { description } => {
                self.matrix.description = Some(description.clone());
            }
            EventKind::MatrixArchived => self.matrix.archived = true,

            EventKind::CriterionAdded {
                criterion_id,
                label,
                scale,
            } => {
                if self.criterion(criterion_id).is_some() {
                    tracing::debug!(%criterion_id, "criterion already present, skipping add");
                    return;
                }
                self.criteria.push(Criterion {
                    id: criterion_id.clone(),
                    label: label.clone(),
                    author: event.author.clone(),
                    scale: scale.clone(),
                    description: None,
                });
                self.weights.insert(criterion_id.clone(), DEFAULT_WEIGHT);
            }
            EventKind::CriterionRenamed {
                criterion_id,
                label,
            } => {
                if let Some(c) = self.criterion_mut(criterion_id) {
                    c.label.clone_from(label);
                }
            }
            EventKind::CriterionRemoved { criterion_id } => {
                self.criteria.retain(|c| &c.id != criterion_id);
                self.weights.remove(criterion_id);
                self.entries.retain(|e| &e.criterion_id != criterion_id);
            }
            EventKind::CriterionScaleOverridden {
                criterion_id,
                scale,
            } => {
                if let Some(c) = self.criterion_mut(criterion_id) {
                    c.scale = Some(scale.clone());
                }
            }
            EventKind::CriterionDescriptionChanged {
                criterion_id,
                description,
            } => {
                if let Some(c) = self.criterion_mut(criterion_id) {
                    c.description = Some(description.clone());
                }
            }
            EventKind::CriterionReordered {
                criterion_id,
                position,
            } => move_to(&mut self.criteria, |c| &c.id == criterion_id, *position),
            EventKind::CriterionWeightAdjusted {
                criterion_id,
                weight,
            } => {
                if self.criterion(criterion_id).is_some() {
                    self.weights.insert(criterion_id.clone(), *weight);
                }
            }

            EventKind::OptionAdded { option_id, label } => {
                if self.option(option_id).is_some() {
                    tracing::debug!(%option_id, "option already present, skipping add");
                    return;
                }
                self.options.push(DecisionOption {
                    id: option_id.clone(),
                    label: label.clone(),
                    author: event.author.clone(),
                    description: None,
                });
            }
            EventKind::OptionRenamed { option_id, label } => {
                if let Some(o) = self.option_mut(option_id) {
                    o.label.clone_from(label);
                }
            }
            EventKind::OptionRemoved { option_id } => {
                self.options.retain(|o| &o.id != option_id);
                self.entries.retain(|e| &e.option_id != option_id);
            }
            EventKind::OptionDescriptionChanged {
                option_id,
                description,
            } => {
                if let Some(o) = self.option_mut(option_id) {
                    o.description = Some(description.clone());
                }
            }
            EventKind::OptionReordered {
                option_id,
                position,
            } => move_to(&mut self.options, |o| &o.id == option_id, *position),

            EventKind::RatingAssigned {
                rating_id,
                option_id,
                criterion_id,
                value,
                label,
                comment,
            } => self.push_entry(
                event,
                rating_id,
                option_id,
                criterion_id,
                EntryBody::Rating {
                    value: *value,
                    label: label.clone(),
                    comment: comment.clone(),
                },
            ),
            EventKind::RatingRemoved {
                option_id,
                criterion_id,
            } => {
                self.entries.retain(|e| !e.is_for(option_id, criterion_id));
            }
            EventKind::CommentAdded {
                comment_id,
                option_id,
                criterion_id,
                comment,
                parent_comment_id,
            } => self.push_entry(
                event,
                comment_id,
                option_id,
                criterion_id,
                EntryBody::Comment {
                    text: comment.clone(),
                    parent_comment_id: parent_comment_id.clone(),
                },
            ),
        }
    }

    fn criterion_mut(&mut self, id: &str) -> Option<&mut Criterion> {
        self.criteria.iter_mut().find(|c| c.id == id)
    }

    fn option_mut(&mut self, id: &str) -> Option<&mut DecisionOption> {
        self.options.iter_mut().find(|o| o.id == id)
    }

    fn push_entry(
        &mut self,
        event: &Event,
        id: &str,
        option_id: &str,
        criterion_id: &str,
        body: EntryBody,
    ) {
        if self.option(option_id).is_none() || self.criterion(criterion_id).is_none() {
            tracing::debug!(
                event_id = %event.id,
                option_id,
                criterion_id,
                "entry references an absent option or criterion, skipping"
            );
            return;
        }
        self.entries.push(CellEntry {
            id: id.to_string(),
            option_id: option_id.to_string(),
            criterion_id: criterion_id.to_string(),
            timestamp: event.timestamp,
            author: event.author.clone(),
            body,
        });
    }
}

/// Move the first item matching `is_target` to `position`, clamped to the
/// valid range. No-op when nothing matches.
fn move_to<T>(items: &mut Vec<T>, is_target: impl Fn(&T) -> bool, position: i64) {
    let Some(from) = items.iter().position(is_target) else {
        return;
    };
    let item = items.remove(from);
    let last = items.len();
    let to = usize::try_from(position.max(0)).map_or(last, |p| p.min(last));
    items.insert(to, item);
}
