//! CLI entry point for folio

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::feed::ViewMode;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = "0.1.0")]
#[command(about = "A personal publishing engine with a unified content feed", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the unified content feed
    #[command(alias = "f")]
    Feed {
        /// Only show entries carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Rendering density (grid, list, compact)
        #[arg(short, long, default_value = "list")]
        view: String,
    },

    /// Show a single content item
    Show {
        /// Collection directory name
        collection: String,

        /// Item slug
        slug: String,

        /// Render the body to HTML instead of raw markdown
        #[arg(long)]
        html: bool,
    },

    /// Inspect or change reader preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// List site information
    List {
        /// What to list (collections, tags, entries, or a content type
        /// such as blog or case-study)
        #[arg(default_value = "entries")]
        r#type: String,
    },

    /// Remove local state (persisted preferences)
    Clean,

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the current preferences
    Show,

    /// Update one or more preferences
    Set {
        /// Font scale multiplier (applied only within 0.8..=1.5)
        #[arg(long)]
        font_scale: Option<f64>,

        /// Color-vision mode (none, protanopia, deuteranopia, tritanopia, grayscale)
        #[arg(long)]
        color_vision: Option<String>,

        /// Theme mode (light, dark, high-contrast, grayscale-dark)
        #[arg(long)]
        theme: Option<String>,
    },

    /// Reset all preferences to defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Feed { tag, view } => {
            let folio = folio::Folio::new(&base_dir)?;
            let view = ViewMode::parse(&view)
                .ok_or_else(|| anyhow!("unknown view mode '{}' (grid, list, compact)", view))?;
            folio::commands::feed::run(&folio, tag.as_deref(), view).await?;
        }

        Commands::Show {
            collection,
            slug,
            html,
        } => {
            let folio = folio::Folio::new(&base_dir)?;
            folio::commands::show::run(&folio, &collection, &slug, html)?;
        }

        Commands::Prefs { action } => {
            let folio = folio::Folio::new(&base_dir)?;
            match action {
                PrefsAction::Show => folio::commands::prefs::show(&folio)?,
                PrefsAction::Set {
                    font_scale,
                    color_vision,
                    theme,
                } => {
                    folio::commands::prefs::set(
                        &folio,
                        font_scale,
                        color_vision.as_deref(),
                        theme.as_deref(),
                    )?;
                }
                PrefsAction::Reset => folio::commands::prefs::reset(&folio)?,
            }
        }

        Commands::List { r#type } => {
            let folio = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&folio, &r#type).await?;
        }

        Commands::Clean => {
            let folio = folio::Folio::new(&base_dir)?;
            tracing::info!("Cleaning local state...");
            folio::commands::clean::run(&folio)?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
