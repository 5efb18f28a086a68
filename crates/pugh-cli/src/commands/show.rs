use pugh_core::entities::{Criterion, DecisionOption, EntryBody, MatrixMeta};
use pugh_core::projection::DEFAULT_WEIGHT;
use pugh_core::scale::Scale;
use pugh_core::scoring::{current_rating, effective_scale, weighted_totals};
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{self, output, print_table};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowResponse<'a> {
    branch_id: &'a str,
    branch_name: &'a str,
    matrix: &'a MatrixMeta,
    criteria: Vec<CriterionRow<'a>>,
    options: &'a [DecisionOption],
    cells: Vec<CellView<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CriterionRow<'a> {
    #[serde(flatten)]
    criterion: &'a Criterion,
    weight: i64,
    effective_scale: &'a Scale,
}

/// Current rating of one cell.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CellView<'a> {
    option_id: &'a str,
    criterion_id: &'a str,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    author: &'a str,
}

/// Handle `pugh show`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = &ctx.store;
    let snap = store.snapshot();
    let config = &snap.matrix.config;

    let criteria = snap
        .criteria
        .iter()
        .map(|criterion| CriterionRow {
            criterion,
            weight: snap.weight(&criterion.id).unwrap_or(DEFAULT_WEIGHT),
            effective_scale: effective_scale(criterion, config),
        })
        .collect::<Vec<_>>();

    let mut cells = Vec::new();
    for row in &criteria {
        for option in &snap.options {
            let Some(entry) = current_rating(snap, &option.id, &row.criterion.id) else {
                continue;
            };
            let Some(value) = entry.value() else {
                continue;
            };
            let label = match &entry.body {
                EntryBody::Rating {
                    label: Some(label), ..
                } => Some(label.as_str()),
                _ => row.effective_scale.label_for(value),
            };
            cells.push(CellView {
                option_id: &option.id,
                criterion_id: &row.criterion.id,
                value,
                label,
                author: &entry.author,
            });
        }
    }

    let response = ShowResponse {
        branch_id: store.active_branch_id(),
        branch_name: &store.active_branch().name,
        matrix: &snap.matrix,
        criteria,
        options: &snap.options,
        cells,
    };

    if flags.format == OutputFormat::Table {
        print_grid(&response, ctx);
        return Ok(());
    }
    output(&response, flags.format)
}

/// Criteria as rows, options as columns, totals as the last row.
fn print_grid(response: &ShowResponse<'_>, ctx: &AppContext) {
    let title = response.matrix.title.as_deref().unwrap_or("(untitled)");
    let archived = if response.matrix.archived { " [archived]" } else { "" };
    println!("{title}{archived}  on branch {}", response.branch_name);

    let mut headers = vec!["criterion", "weight"];
    headers.extend(response.options.iter().map(|o| o.label.as_str()));

    let mut rows: Vec<Vec<String>> = response
        .criteria
        .iter()
        .map(|row| {
            let mut line = vec![row.criterion.label.clone(), row.weight.to_string()];
            line.extend(response.options.iter().map(|option| {
                response
                    .cells
                    .iter()
                    .find(|c| c.option_id == option.id && c.criterion_id == row.criterion.id)
                    .map_or_else(|| String::from("-"), |c| output::score(c.value))
            }));
            line
        })
        .collect();

    let mut total_line = vec![String::from("total"), String::new()];
    total_line.extend(
        weighted_totals(ctx.store.snapshot())
            .iter()
            .map(|t| output::score(t.total)),
    );
    rows.push(total_line);

    print_table(&headers, &rows);
}
