use pugh_core::entities::CellEntry;
use pugh_core::scoring::{cell_history, current_rating, threads};
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::root_commands::{CellArgs, CommentArgs};
use crate::context::AppContext;
use crate::output::{self, output, print_table};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreadView<'a> {
    root: &'a CellEntry,
    replies: Vec<&'a CellEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CellResponse<'a> {
    option_id: &'a str,
    criterion_id: &'a str,
    current: Option<&'a CellEntry>,
    threads: Vec<ThreadView<'a>>,
    history: Vec<&'a CellEntry>,
}

/// Handle `pugh comment`.
pub fn handle_comment(
    args: &CommentArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let event = ctx.store.add_comment(
        &args.option,
        &args.criterion,
        &args.text,
        args.reply_to.as_deref(),
    )?;
    output(&event, flags.format)
}

/// Handle `pugh thread`.
pub fn handle_thread(args: &CellArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let snap = ctx.store.snapshot();
    if snap.option(&args.option).is_none() {
        anyhow::bail!("no option with id '{}'", args.option);
    }
    if snap.criterion(&args.criterion).is_none() {
        anyhow::bail!("no criterion with id '{}'", args.criterion);
    }

    let response = CellResponse {
        option_id: &args.option,
        criterion_id: &args.criterion,
        current: current_rating(snap, &args.option, &args.criterion),
        threads: threads(snap, &args.option, &args.criterion)
            .into_iter()
            .map(|t| ThreadView {
                root: t.root,
                replies: t.replies,
            })
            .collect(),
        history: cell_history(snap, &args.option, &args.criterion),
    };

    if flags.format == OutputFormat::Table {
        let mut rows = Vec::new();
        for thread in &response.threads {
            rows.push(thread_row(thread.root, 0));
            rows.extend(thread.replies.iter().map(|reply| thread_row(reply, 1)));
        }
        print_table(&["id", "when", "author", "score", "text"], &rows);
        return Ok(());
    }
    output(&response, flags.format)
}

fn thread_row(entry: &CellEntry, depth: usize) -> Vec<String> {
    let indent = "  ".repeat(depth);
    vec![
        format!("{indent}{}", entry.id),
        entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        entry.author.clone(),
        entry.value().map_or_else(|| String::from("-"), output::score),
        entry.comment().unwrap_or_default().to_string(),
    ]
}
