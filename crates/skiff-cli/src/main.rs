mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "skiff", about = "Package and deploy serverless handlers to AWS Lambda")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package the build output and deploy discovered handlers
    Deploy {
        /// Deployment stage (default: $SKIFF_STAGE, else "staging")
        #[arg(long)]
        stage: Option<String>,
        /// Restrict the run to a single handler by name
        #[arg(long)]
        function: Option<String>,
        /// Allow deploying with uncommitted changes
        #[arg(long)]
        allow_dirty: bool,
    },
    /// Show which handlers would be created or updated, without deploying
    Plan {
        /// Restrict the plan to a single handler by name
        #[arg(long)]
        function: Option<String>,
    },
    /// List handlers discovered in the source tree
    Handlers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy {
            stage,
            function,
            allow_dirty,
        } => commands::deploy(stage, function, allow_dirty).await?,
        Commands::Plan { function } => commands::plan(function).await?,
        Commands::Handlers => commands::handlers()?,
    }

    Ok(())
}
