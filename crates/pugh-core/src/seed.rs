//! Build an initial event log from plain entity lists.
//!
//! Used when a store starts without persisted history but has fixture data
//! (criteria, options, ratings, weights) to start from. The events are
//! ordered so that projecting them yields exactly that data.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::events::EventKind;
use crate::projection::DEFAULT_WEIGHT;
use crate::scale::Scale;

/// Author recorded on weight events synthesized from the weight map.
pub const SEED_SYSTEM_AUTHOR: &str = "system";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub criteria: Vec<SeedCriterion>,
    #[serde(default)]
    pub options: Vec<SeedOption>,
    #[serde(default)]
    pub ratings: Vec<SeedRating>,
    /// Criterion id to weight; entries equal to the default are not emitted.
    #[serde(default)]
    pub weights: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedCriterion {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub scale: Option<Scale>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// A rating or, without a value, a plain comment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedRating {
    pub id: String,
    pub option_id: String,
    pub criterion_id: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// An event kind plus the envelope details the seed data fixes.
///
/// Missing author or timestamp are filled in by whoever stamps the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct SeededEvent {
    pub kind: EventKind,
    pub author: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl SeededEvent {
    const fn new(kind: EventKind, author: Option<String>) -> Self {
        Self {
            kind,
            author,
            timestamp: None,
        }
    }
}

impl SeedData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
            && self.options.is_empty()
            && self.ratings.is_empty()
            && self.weights.is_empty()
    }

    /// Criteria, then non-default weights, then options, then ratings and
    /// comments. Ratings with neither a value nor a comment are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [`CoreError`] raised by an event constructor (empty
    /// id, non-finite value).
    pub fn seed_events(&self) -> Result<Vec<SeededEvent>, CoreError> {
        let mut events = Vec::new();

        for c in &self.criteria {
            events.push(SeededEvent::new(
                EventKind::criterion_added(&c.id, &c.label, c.scale.clone())?,
                c.author.clone(),
            ));
        }

        for (criterion_id, weight) in &self.weights {
            if *weight != DEFAULT_WEIGHT {
                events.push(SeededEvent::new(
                    EventKind::criterion_weight_adjusted(criterion_id, *weight)?,
                    Some(SEED_SYSTEM_AUTHOR.to_string()),
                ));
            }
        }

        for o in &self.options {
            events.push(SeededEvent::new(
                EventKind::option_added(&o.id, &o.label)?,
                o.author.clone(),
            ));
        }

        for r in &self.ratings {
            let kind = match (r.value, &r.comment) {
                (Some(value), _) => EventKind::rating_assigned(
                    &r.id,
                    &r.option_id,
                    &r.criterion_id,
                    value,
                    r.label.clone(),
                    r.comment.clone(),
                )?,
                (None, Some(text)) if !text.trim().is_empty() => {
                    EventKind::comment_added(&r.id, &r.option_id, &r.criterion_id, text, None)?
                }
                (None, _) => {
                    tracing::debug!(rating_id = %r.id, "seed rating has no value or comment, skipping");
                    continue;
                }
            };
            events.push(SeededEvent {
                kind,
                author: r.author.clone(),
                timestamp: r.timestamp,
            });
        }

        Ok(events)
    }
}
