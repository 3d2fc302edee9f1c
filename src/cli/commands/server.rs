use clap::Subcommand;
use serde_json::Value;

use crate::cli::client::RevalidateClient;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health from the /health endpoint")]
    Health,

    #[command(about = "Show server information from the root endpoint")]
    Info,
}

pub async fn handle(cmd: ServerCommands, client: &RevalidateClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let body = match cmd {
        ServerCommands::Health => client.get("health").await?,
        ServerCommands::Info => client.get("").await?,
    };

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
        OutputFormat::Text => {
            println!("Server: {}", client.base_url());
            if let Some(data) = body.get("data").and_then(Value::as_object) {
                for (key, value) in data {
                    match value {
                        Value::String(s) => println!("{}: {}", key, s),
                        other => println!("{}: {}", key, other),
                    }
                }
            }
        }
    }

    Ok(())
}
