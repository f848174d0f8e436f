//! CLI entry point for sanity-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sanity_blog::Blog;

#[derive(Parser)]
#[command(name = "sanity-blog")]
#[command(version)]
#[command(about = "A server-rendered blog backed by a Sanity dataset", long_about = None)]
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
    /// Start the blog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// List posts from the content host
    List {
        /// Which posts to list (recent, all)
        #[arg(default_value = "all")]
        r#type: String,
    },

    /// Print one post as plain text
    Show {
        /// Slug of the post
        slug: String,
    },

    /// Print the effective configuration
    Config,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "sanity_blog=debug,info"
    } else {
        "sanity_blog=info"
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
        Commands::Server { port, ip } => {
            let blog = Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!(
                "Serving dataset {} of project {}",
                blog.config.content.dataset,
                blog.config.content.project_id
            );
            sanity_blog::server::start(blog, &ip, port).await?;
        }

        Commands::List { r#type } => {
            let blog = Blog::new(&base_dir)?;
            sanity_blog::commands::list::run(&blog, &r#type).await?;
        }

        Commands::Show { slug } => {
            let blog = Blog::new(&base_dir)?;
            sanity_blog::commands::show::run(&blog, &slug).await?;
        }

        Commands::Config => {
            let blog = Blog::new(&base_dir)?;
            sanity_blog::commands::config::run(&blog)?;
        }

        Commands::Version => {
            println!("sanity-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
