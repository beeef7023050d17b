//! CLI entry point for kielo-content

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kielo_content::commands::{self, new::NewPost};
use kielo_content::Site;

#[derive(Parser)]
#[command(name = "kielo-content")]
#[command(author = "Kielo Team")]
#[command(version)]
#[command(about = "Inspect and scaffold the Kielo blog collection", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
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
    /// List posts, newest first
    #[command(alias = "ls")]
    List {
        /// Print summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one post by identifier
    Show {
        /// File name of the post without its extension
        identifier: String,

        /// Print the document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report posts that fail to load or have incomplete headers
    Check,

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug used in the file name (derived from the title by default)
        #[arg(short, long)]
        slug: Option<String>,

        /// Publication date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Short description shown on the list page
        #[arg(long)]
        description: Option<String>,

        /// Tag to add (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Language level, e.g. A1 (defaults to A1-A2)
        #[arg(long)]
        level: Option<String>,

        /// Topic category (defaults to General)
        #[arg(long)]
        category: Option<String>,

        /// Header image file, linked as /blogs/images/<file name>
        #[arg(long)]
        image: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "kielo_content=debug,info"
    } else {
        "kielo_content=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { json } => {
            let site = Site::new(&base_dir)?;
            commands::list::run(&site, json)?;
        }

        Commands::Show { identifier, json } => {
            let site = Site::new(&base_dir)?;
            commands::show::run(&site, &identifier, json)?;
        }

        Commands::Check => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Checking {:?}", site.collection_dir);
            commands::check::run(&site)?;
        }

        Commands::New {
            title,
            slug,
            date,
            description,
            tags,
            level,
            category,
            image,
        } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            commands::new::run(
                &site,
                &NewPost {
                    title: &title,
                    slug: slug.as_deref(),
                    date: date.as_deref(),
                    description: description.as_deref(),
                    tags: &tags,
                    level: level.as_deref(),
                    category: category.as_deref(),
                    image: image.as_deref(),
                },
            )?;
        }

        Commands::Version => {
            println!("kielo-content version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
