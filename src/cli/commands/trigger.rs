use clap::Subcommand;
use serde_json::json;

use crate::cli::client::RevalidateClient;
use crate::cli::utils::{output_results, output_success};
use crate::cli::OutputFormat;
use crate::revalidation::ChangeEvent;

#[derive(Subcommand)]
pub enum TriggerCommands {
    #[command(about = "Revalidate a single literal path")]
    Path {
        #[arg(help = "Absolute path, e.g. /products/cbd-oil-500mg")]
        path: String,
    },

    #[command(about = "Revalidate several paths in one batch")]
    Batch {
        #[arg(required = true, help = "Absolute paths")]
        paths: Vec<String>,
    },

    #[command(about = "Revalidate the server's common paths in every locale")]
    Common,

    #[command(about = "Send a change notification as the database trigger would")]
    Webhook {
        #[arg(help = "Table name")]
        table: String,
        #[arg(long, help = "Slug of the changed row")]
        slug: Option<String>,
        #[arg(long, help = "Operation, e.g. INSERT, UPDATE, DELETE")]
        operation: Option<String>,
    },
}

pub async fn handle(cmd: TriggerCommands, client: &RevalidateClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TriggerCommands::Path { path } => {
            client.path(&path).await?;
            output_success(
                &output_format,
                &format!("Revalidated {}", path),
                Some(json!({ "path": path })),
            )
        }
        TriggerCommands::Batch { paths } => {
            let report = client.batch(&paths).await?;
            output_results(&output_format, &report)
        }
        TriggerCommands::Common => {
            let report = client.batch(&[]).await?;
            output_results(&output_format, &report)
        }
        TriggerCommands::Webhook { table, slug, operation } => {
            let mut event = ChangeEvent::new(table);
            if let Some(slug) = slug {
                event = event.with_slug(slug);
            }
            if let Some(operation) = operation {
                event = event.with_operation(operation);
            }
            let report = client.webhook(serde_json::to_value(&event)?).await?;
            output_results(&output_format, &report)
        }
    }
}
