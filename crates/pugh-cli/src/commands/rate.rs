use pugh_core::MatrixSnapshot;
use pugh_core::scoring::effective_scale;
use pugh_store::RatingDraft;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{CellArgs, RateArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `pugh rate`.
pub fn handle_rate(args: &RateArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.value.is_none() && args.comment.as_deref().is_none_or(|c| c.trim().is_empty()) {
        anyhow::bail!("nothing to record: pass --value, --comment, or both");
    }

    let mut draft = RatingDraft {
        value: args.value,
        label: args.label.clone(),
        comment: args.comment.clone(),
    };
    if let Some(value) = args.value {
        let scale_label = check_value(ctx.store.snapshot(), &args.criterion, value)?;
        if draft.label.is_none() {
            draft.label = scale_label;
        }
    }

    let event = ctx.store.rate(&args.option, &args.criterion, draft)?;
    output(&json!({ "event": event }), flags.format)
}

/// Handle `pugh unrate`.
pub fn handle_unrate(args: &CellArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let event = ctx.store.remove_rating(&args.option, &args.criterion)?;
    output(&event, flags.format)
}

/// Validate `value` against the criterion's effective scale and the matrix's
/// negative-score setting. Returns the scale's label for the value.
fn check_value(
    snapshot: &MatrixSnapshot,
    criterion_id: &str,
    value: f64,
) -> anyhow::Result<Option<String>> {
    // Unknown criteria are reported by the store with its own error.
    let Some(criterion) = snapshot.criterion(criterion_id) else {
        return Ok(None);
    };
    let config = &snapshot.matrix.config;
    let scale = effective_scale(criterion, config);

    if value < 0.0 && !config.allow_negative {
        anyhow::bail!("negative scores are disabled for this matrix (got {value})");
    }
    if !scale.accepts(value) {
        anyhow::bail!(
            "value {value} is not on the {} scale of criterion '{}'",
            scale.kind(),
            criterion.label
        );
    }
    Ok(scale.label_for(value).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use pugh_core::scale::{Scale, ScaleLabel};
    use pugh_store::{MemoryPersister, PughStore, StoreOptions};

    use super::check_value;

    fn store() -> PughStore {
        PughStore::open(Arc::new(MemoryPersister::new()), StoreOptions::default())
    }

    #[test]
    fn default_scale_bounds_values() {
        let mut store = store();
        let cost = store.add_criterion("Cost", None).expect("criterion");

        assert!(check_value(store.snapshot(), &cost, 7.0).is_ok());
        assert!(check_value(store.snapshot(), &cost, 11.0).is_err());
        assert!(check_value(store.snapshot(), &cost, 0.0).is_err());
    }

    #[test]
    fn values_between_steps_are_rejected() {
        let mut store = store();
        let cost = store.add_criterion("Cost", None).expect("criterion");

        let err = check_value(store.snapshot(), &cost, 7.3).expect_err("off step");
        assert!(err.to_string().contains("not on the numeric scale"));
    }

    #[test]
    fn negative_values_need_matrix_opt_in() {
        let mut store = store();
        let wide = Scale::Numeric {
            min: -5.0,
            max: 5.0,
            step: 1.0,
            labels: Vec::new(),
        };
        let risk = store.add_criterion("Risk", Some(wide.clone())).expect("criterion");
        let err = check_value(store.snapshot(), &risk, -2.0).expect_err("negatives disabled");
        assert!(err.to_string().contains("negative"));

        store
            .create_matrix("Frameworks", None, true, Scale::default())
            .expect("matrix");
        assert!(check_value(store.snapshot(), &risk, -2.0).is_ok());
    }

    #[test]
    fn binary_scale_only_takes_zero_or_one() {
        let mut store = store();
        let ssr = store.add_criterion("SSR", Some(Scale::Binary)).expect("criterion");
        assert!(check_value(store.snapshot(), &ssr, 1.0).is_ok());
        assert!(check_value(store.snapshot(), &ssr, 0.5).is_err());
    }

    #[test]
    fn scale_label_is_returned() {
        let mut store = store();
        let labelled = Scale::Numeric {
            min: 1.0,
            max: 5.0,
            step: 1.0,
            labels: vec![
                ScaleLabel {
                    value: 1.0,
                    label: "poor".into(),
                },
                ScaleLabel {
                    value: 4.0,
                    label: "good".into(),
                },
            ],
        };
        let ux = store.add_criterion("UX", Some(labelled)).expect("criterion");
        let label = check_value(store.snapshot(), &ux, 4.0).expect("in range");
        assert_eq!(label.as_deref(), Some("good"));
    }

    #[test]
    fn unknown_criterion_is_left_to_the_store() {
        let store = store();
        assert_eq!(check_value(store.snapshot(), "cri_missing", 3.0).expect("ok"), None);
    }
}
