//! Render command
//!
//! Usage: qmap render <LAYOUT_ID> [--format nodes|cytoscape]

use clap::{Args, ValueEnum};
use qmap_core::render::cytoscape_elements;
use qmap_engine::commands::catalog;

use super::{print_json, CmdResult, Context};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RenderFormat {
    /// `[{element_id, label, x, y}]`
    #[default]
    Nodes,
    /// Cytoscape elements: `[{data: {id, label}, position: {x, y}}]`
    Cytoscape,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Layout ID to render
    pub layout_id: String,

    /// Output shape
    #[arg(short, long, value_enum, default_value_t = RenderFormat::Nodes)]
    pub format: RenderFormat,
}

/// Execute render command
pub fn execute(ctx: &Context, args: RenderArgs) -> CmdResult {
    let store = ctx.open_store()?;
    let nodes = catalog::compose(&store, &args.layout_id).map_err(|e| ctx.fail(e))?;

    match args.format {
        RenderFormat::Nodes => print_json(&nodes),
        RenderFormat::Cytoscape => print_json(&cytoscape_elements(&nodes)),
    }
}
