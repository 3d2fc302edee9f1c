pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use self::client::RevalidateClient;

#[derive(Parser)]
#[command(name = "revalidate")]
#[command(about = "Revalidate CLI - compute and trigger storefront page revalidation")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "REVALIDATE_SERVER",
        default_value = "http://localhost:3000",
        help = "Revalidate API base URL"
    )]
    pub server: String,

    #[arg(
        long,
        global = true,
        env = "REVALIDATION_SECRET",
        hide_env_values = true,
        help = "Shared secret sent with every request"
    )]
    pub secret: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compute path sets locally without contacting a server")]
    Paths {
        #[command(subcommand)]
        cmd: commands::paths::PathsCommands,
    },

    #[command(about = "Trigger revalidation on a running server")]
    Trigger {
        #[command(subcommand)]
        cmd: commands::trigger::TriggerCommands,
    },

    #[command(about = "Inspect a running server")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Paths { cmd } => commands::paths::handle(cmd, output_format),
        Commands::Trigger { cmd } => {
            let client = RevalidateClient::new(&cli.server, cli.secret)?;
            commands::trigger::handle(cmd, &client, output_format).await
        }
        Commands::Server { cmd } => {
            let client = RevalidateClient::new(&cli.server, cli.secret)?;
            commands::server::handle(cmd, &client, output_format).await
        }
    }
}
