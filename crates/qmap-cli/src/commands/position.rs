//! Position command
//!
//! Usage: qmap position <list|create>

use clap::{Args, Subcommand};
use qmap_engine::commands::catalog;

use super::{print_json, CmdResult, Context};

#[derive(Debug, Args)]
pub struct PositionArgs {
    #[command(subcommand)]
    pub command: PositionCommand,
}

#[derive(Debug, Subcommand)]
pub enum PositionCommand {
    /// List the positions of a layout
    List {
        /// Layout ID
        layout_id: String,
    },
    /// Place an existing element in a layout
    Create {
        /// Layout ID
        layout_id: String,
        /// Element ID
        element_id: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
}

/// Execute position command
pub fn execute(ctx: &Context, args: PositionArgs) -> CmdResult {
    let mut store = ctx.open_store()?;

    match args.command {
        PositionCommand::List { layout_id } => {
            print_json(&catalog::list_positions(&store, &layout_id).map_err(|e| ctx.fail(e))?)
        }
        PositionCommand::Create {
            layout_id,
            element_id,
            x,
            y,
        } => {
            let position = catalog::create_position(&mut store, &layout_id, &element_id, x, y)
                .map_err(|e| ctx.fail(e))?;
            print_json(&position)
        }
    }
}
