use clap::Subcommand;

use crate::cli::utils::output_paths;
use crate::cli::OutputFormat;
use crate::revalidation::{build_paths, known_tables, Locales};

#[derive(Subcommand)]
pub enum PathsCommands {
    #[command(about = "Show the paths a change to a table row would revalidate")]
    Build {
        #[arg(help = "Table name (e.g. products, blog_posts)")]
        table: String,
        #[arg(long, help = "Slug of the changed row")]
        slug: Option<String>,
        #[arg(
            long,
            env = "REVALIDATE_LOCALES",
            default_value = "en,nl,de,fr",
            help = "Comma separated locale codes"
        )]
        locales: String,
    },

    #[command(about = "List tables with dedicated routes")]
    Tables,
}

pub fn handle(cmd: PathsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PathsCommands::Build { table, slug, locales } => {
            let paths = build_paths(&table, slug.as_deref(), &Locales::parse(&locales));
            output_paths(&output_format, paths.as_slice())
        }
        PathsCommands::Tables => {
            let tables: Vec<String> = known_tables().into_iter().map(str::to_string).collect();
            output_paths(&output_format, &tables)
        }
    }
}
