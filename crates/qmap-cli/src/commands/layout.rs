//! Layout command
//!
//! Usage: qmap layout <list|create|delete>

use clap::{Args, Subcommand};
use qmap_engine::commands::catalog;

use super::{print_json, CmdResult, Context};

#[derive(Debug, Args)]
pub struct LayoutArgs {
    #[command(subcommand)]
    pub command: LayoutCommand,
}

#[derive(Debug, Subcommand)]
pub enum LayoutCommand {
    /// List the layouts of a model
    List {
        /// Owning model ID
        model_id: String,
    },
    /// Add an alternative layout to a model
    Create {
        /// Owning model ID
        model_id: String,
        /// Layout label
        label: String,
    },
    /// Delete a layout and its positions (not a model's default layout)
    Delete {
        /// Layout ID
        layout_id: String,
    },
}

/// Execute layout command
pub fn execute(ctx: &Context, args: LayoutArgs) -> CmdResult {
    let mut store = ctx.open_store()?;

    match args.command {
        LayoutCommand::List { model_id } => {
            print_json(&catalog::list_layouts(&store, &model_id).map_err(|e| ctx.fail(e))?)
        }
        LayoutCommand::Create { model_id, label } => {
            let layout =
                catalog::create_layout(&mut store, &label, &model_id).map_err(|e| ctx.fail(e))?;
            print_json(&layout)
        }
        LayoutCommand::Delete { layout_id } => {
            catalog::delete_layout(&mut store, &layout_id).map_err(|e| ctx.fail(e))?;
            println!("Deleted layout {}", layout_id);
            Ok(())
        }
    }
}
