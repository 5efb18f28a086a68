use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BranchCommands;
use crate::commands::shared::resolve;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BranchRow<'a> {
    id: &'a str,
    name: &'a str,
    active: bool,
    events: usize,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_branch_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fork_event_index: Option<usize>,
}

/// Handle `pugh branch`.
pub fn handle(action: &BranchCommands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = &mut ctx.store;
    match action {
        BranchCommands::List => {
            let active = store.active_branch_id();
            let rows = store
                .branches()
                .iter()
                .map(|b| BranchRow {
                    id: &b.id,
                    name: &b.name,
                    active: b.id == active,
                    events: b.events().len(),
                    created_at: b.created_at,
                    parent_branch_id: b.parent_branch_id.as_deref(),
                    fork_event_index: b.fork_event_index,
                })
                .collect::<Vec<_>>();
            output(&rows, flags.format)
        }
        BranchCommands::Create { name } => {
            let id = store.create_branch(name)?;
            output(&json!({ "id": id, "name": name, "active": true }), flags.format)
        }
        BranchCommands::Switch { id } => {
            let id = resolve::branch_id(store, id)?;
            store.switch_branch(&id);
            output(&json!({ "activeBranchId": store.active_branch_id() }), flags.format)
        }
        BranchCommands::Rename { id, name } => {
            let id = resolve::branch_id(store, id)?;
            store.rename_branch(&id, name)?;
            output(&json!({ "id": id, "name": name }), flags.format)
        }
        BranchCommands::Delete { id } => {
            let id = resolve::branch_id(store, id)?;
            if !store.delete_branch(&id) {
                anyhow::bail!("the main branch cannot be deleted");
            }
            output(
                &json!({ "deleted": id, "activeBranchId": store.active_branch_id() }),
                flags.format,
            )
        }
    }
}
