//! qmap CLI
//!
//! Command-line interface for qualitative maps

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "qmap")]
#[command(about = "qmap - Qualitative maps with alternative layouts", long_about = None)]
struct Cli {
    /// SQLite database (overrides `[store] path` from the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Model operations
    Model(commands::model::ModelArgs),
    /// Layout operations
    Layout(commands::layout::LayoutArgs),
    /// Element operations
    Element(commands::element::ElementArgs),
    /// Position operations
    Position(commands::position::PositionArgs),
    /// Compose a layout into render nodes (JSON)
    Render(commands::render::RenderArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = commands::Context::load(cli.config.as_deref(), cli.db).and_then(|ctx| {
        let _span =
            tracing::info_span!("request", request_id = %ctx.request.request_id).entered();
        match cli.command {
            Commands::Model(args) => commands::model::execute(&ctx, args),
            Commands::Layout(args) => commands::layout::execute(&ctx, args),
            Commands::Element(args) => commands::element::execute(&ctx, args),
            Commands::Position(args) => commands::position::execute(&ctx, args),
            Commands::Render(args) => commands::render::execute(&ctx, args),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
