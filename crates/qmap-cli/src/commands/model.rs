//! Model command
//!
//! Usage: qmap model <list|create|show|reconcile|delete>

use clap::{Args, Subcommand};
use qmap_engine::commands::catalog;
use serde::Serialize;

use super::{print_json, CmdResult, Context};

#[derive(Debug, Args)]
pub struct ModelArgs {
    #[command(subcommand)]
    pub command: ModelCommand,
}

#[derive(Debug, Subcommand)]
pub enum ModelCommand {
    /// List all models in creation order
    List,
    /// Create a model together with its default layout
    Create {
        /// Model label
        label: String,
    },
    /// Show a model with its layouts and active layout
    Show {
        /// Model ID
        model_id: String,
    },
    /// Give a model left without a default layout one
    Reconcile {
        /// Model ID
        model_id: String,
    },
    /// Delete a model, its layouts and their positions
    Delete {
        /// Model ID
        model_id: String,
    },
}

#[derive(Serialize)]
struct ModelReport {
    model: qmap_core::Model,
    #[serde(flatten)]
    resolution: qmap_core::Resolution,
}

/// Execute model command
pub fn execute(ctx: &Context, args: ModelArgs) -> CmdResult {
    let mut store = ctx.open_store()?;

    match args.command {
        ModelCommand::List => print_json(&catalog::list_models(&store).map_err(|e| ctx.fail(e))?),
        ModelCommand::Create { label } => {
            let model = catalog::create_model(&mut store, &label, &ctx.config.cascade)
                .map_err(|e| ctx.fail(e))?;
            print_json(&model)
        }
        ModelCommand::Show { model_id } => {
            let model = catalog::get_model(&store, &model_id).map_err(|e| ctx.fail(e))?;
            let resolution = catalog::resolve(&store, &model_id).map_err(|e| ctx.fail(e))?;
            print_json(&ModelReport { model, resolution })
        }
        ModelCommand::Reconcile { model_id } => {
            let model = catalog::reconcile_model(&mut store, &model_id, &ctx.config.cascade)
                .map_err(|e| ctx.fail(e))?;
            print_json(&model)
        }
        ModelCommand::Delete { model_id } => {
            catalog::delete_model(&mut store, &model_id).map_err(|e| ctx.fail(e))?;
            println!("Deleted model {}", model_id);
            Ok(())
        }
    }
}
