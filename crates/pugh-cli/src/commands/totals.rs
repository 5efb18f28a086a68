use pugh_core::scoring::{OptionTotal, weighted_totals, winner};
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{self, output, print_table};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalsResponse {
    totals: Vec<OptionTotal>,
    winner: Option<String>,
}

/// Handle `pugh totals`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let totals = weighted_totals(ctx.store.snapshot());
    let leader = winner(&totals).map(|t| t.option_id.clone());

    if flags.format == OutputFormat::Table {
        let rows = totals
            .iter()
            .map(|t| {
                let mark = if leader.as_deref() == Some(t.option_id.as_str()) {
                    "winner"
                } else {
                    ""
                };
                vec![
                    t.label.clone(),
                    output::score(t.total),
                    mark.to_string(),
                    t.option_id.clone(),
                ]
            })
            .collect::<Vec<_>>();
        print_table(&["option", "total", "", "id"], &rows);
        return Ok(());
    }

    output(
        &TotalsResponse {
            totals,
            winner: leader,
        },
        flags.format,
    )
}
