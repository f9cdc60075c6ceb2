//! Element command
//!
//! Usage: qmap element <create|place|delete>

use clap::{Args, Subcommand};
use qmap_engine::commands::catalog;

use super::{print_json, CmdResult, Context};

#[derive(Debug, Args)]
pub struct ElementArgs {
    #[command(subcommand)]
    pub command: ElementCommand,
}

#[derive(Debug, Subcommand)]
pub enum ElementCommand {
    /// Create an element without placing it
    Create {
        /// Element label
        label: String,
    },
    /// Create an element and place it in a layout
    Place {
        /// Element label
        label: String,

        /// Layout to place the element in
        #[arg(short, long)]
        layout: Option<String>,
    },
    /// Delete an element and every position referencing it
    Delete {
        /// Element ID
        element_id: String,
    },
}

/// Execute element command
pub fn execute(ctx: &Context, args: ElementArgs) -> CmdResult {
    let mut store = ctx.open_store()?;

    match args.command {
        ElementCommand::Create { label } => {
            print_json(&catalog::create_element(&mut store, &label).map_err(|e| ctx.fail(e))?)
        }
        ElementCommand::Place { label, layout } => {
            let node = catalog::place_new_element(
                &mut store,
                &label,
                layout.as_deref(),
                &ctx.config.placement,
            )
            .map_err(|e| ctx.fail(e))?;
            print_json(&node)
        }
        ElementCommand::Delete { element_id } => {
            catalog::delete_element(&mut store, &element_id).map_err(|e| ctx.fail(e))?;
            println!("Deleted element {}", element_id);
            Ok(())
        }
    }
}
