//! Read helpers over a projected snapshot: current ratings, cell history,
//! comment threads and weighted totals.
//!
//! None of these change the snapshot. "Current" is a presentation rule layered
//! on the full history the projector keeps.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CellEntry, Criterion, MatrixConfig};
use crate::projection::{DEFAULT_WEIGHT, MatrixSnapshot};
use crate::scale::Scale;

/// Scale a criterion is scored on: its own override, else the matrix default.
#[must_use]
pub fn effective_scale<'a>(criterion: &'a Criterion, config: &'a MatrixConfig) -> &'a Scale {
    criterion.scale.as_ref().unwrap_or(&config.default_scale)
}

/// Most recent scored entry of a cell by timestamp. Equal timestamps resolve
/// to the entry later in the log.
#[must_use]
pub fn current_rating<'a>(
    snapshot: &'a MatrixSnapshot,
    option_id: &str,
    criterion_id: &str,
) -> Option<&'a CellEntry> {
    snapshot
        .entries
        .iter()
        .filter(|e| e.is_for(option_id, criterion_id) && e.value().is_some())
        .max_by_key(|e| e.timestamp)
}

/// Every entry of a cell, newest first.
#[must_use]
pub fn cell_history<'a>(
    snapshot: &'a MatrixSnapshot,
    option_id: &str,
    criterion_id: &str,
) -> Vec<&'a CellEntry> {
    let mut history: Vec<&CellEntry> = snapshot
        .entries
        .iter()
        .filter(|e| e.is_for(option_id, criterion_id))
        .collect();
    history.reverse();
    history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    history
}

/// A top-level cell entry with the replies attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread<'a> {
    pub root: &'a CellEntry,
    pub replies: Vec<&'a CellEntry>,
}

/// Group a cell's entries into threads, oldest root first.
///
/// Threads are one level deep: a reply to a reply lands on the thread of its
/// top-level ancestor. A reply whose parent is not in the cell is shown as a
/// root of its own.
#[must_use]
pub fn threads<'a>(
    snapshot: &'a MatrixSnapshot,
    option_id: &str,
    criterion_id: &str,
) -> Vec<Thread<'a>> {
    let cell: Vec<&CellEntry> = snapshot
        .entries
        .iter()
        .filter(|e| e.is_for(option_id, criterion_id))
        .collect();

    let root_of = |entry: &'a CellEntry| -> &'a str {
        let mut current = entry;
        // Bounded walk so a malformed cycle cannot spin forever.
        for _ in 0..cell.len() {
            let Some(parent_id) = current.parent_comment_id() else {
                break;
            };
            match cell.iter().copied().find(|e| e.id == parent_id) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current.id.as_str()
    };

    let mut threads: Vec<Thread<'a>> = Vec::new();
    for &entry in &cell {
        let root_id = root_of(entry);
        if root_id == entry.id {
            threads.push(Thread {
                root: entry,
                replies: Vec::new(),
            });
        }
    }
    for &entry in &cell {
        let root_id = root_of(entry);
        if root_id == entry.id {
            continue;
        }
        if let Some(thread) = threads.iter_mut().find(|t| t.root.id == root_id) {
            thread.replies.push(entry);
        }
    }
    threads.sort_by(|a, b| a.root.timestamp.cmp(&b.root.timestamp));
    for thread in &mut threads {
        thread.replies.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    }
    threads
}

/// Weighted score of one option.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptionTotal {
    pub option_id: String,
    pub label: String,
    pub total: f64,
}

/// Per option, the sum of current rating times criterion weight, rounded to
/// one decimal. Unrated cells count as zero. Results follow option order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weighted_totals(snapshot: &MatrixSnapshot) -> Vec<OptionTotal> {
    snapshot
        .options
        .iter()
        .map(|option| {
            let raw: f64 = snapshot
                .criteria
                .iter()
                .map(|criterion| {
                    let score = current_rating(snapshot, &option.id, &criterion.id)
                        .and_then(CellEntry::value)
                        .unwrap_or(0.0);
                    let weight = snapshot.weight(&criterion.id).unwrap_or(DEFAULT_WEIGHT);
                    score * weight as f64
                })
                .sum();
            OptionTotal {
                option_id: option.id.clone(),
                label: option.label.clone(),
                total: (raw * 10.0).round() / 10.0,
            }
        })
        .collect()
}

/// First option holding the strictly highest total.
#[must_use]
pub fn winner(totals: &[OptionTotal]) -> Option<&OptionTotal> {
    let mut best: Option<&OptionTotal> = None;
    for total in totals {
        match best {
            Some(b) if total.total <= b.total => {}
            _ => best = Some(total),
        }
    }
    best
}
