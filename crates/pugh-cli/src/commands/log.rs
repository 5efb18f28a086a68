use pugh_core::Event;
use serde::Serialize;

use crate::cli::root_commands::LogArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::resolve;
use crate::context::AppContext;
use crate::output::output;

/// One line of `pugh log --format table`.
#[derive(Debug, Serialize)]
struct LogRow<'a> {
    id: &'a str,
    timestamp: String,
    author: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
}

/// Handle `pugh log`.
pub fn handle(args: &LogArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = &ctx.store;
    let events: &[Event] = match &args.branch {
        Some(key) => {
            let id = resolve::branch_id(store, key)?;
            store
                .registry()
                .get(&id)
                .map(pugh_store::Branch::events)
                .unwrap_or_default()
        }
        None => store.events(),
    };
    let events = tail(events, args.tail);

    if flags.format == OutputFormat::Table {
        let rows = events
            .iter()
            .map(|event| LogRow {
                id: &event.id,
                timestamp: event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                author: &event.author,
                event_type: event.type_name(),
            })
            .collect::<Vec<_>>();
        return output(&rows, flags.format);
    }
    output(&events, flags.format)
}

fn tail<T>(items: &[T], count: Option<usize>) -> &[T] {
    match count {
        Some(n) => &items[items.len().saturating_sub(n)..],
        None => items,
    }
}
