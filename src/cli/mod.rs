pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "coursework")]
#[command(about = "Coursework CLI - operator tasks for the coursework API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Print an Argon2id hash for seeding a student password")]
    HashPassword {
        #[arg(help = "Plaintext password (at least 8 characters)")]
        password: String,
    },

    #[command(about = "Print the effective configuration with secrets redacted")]
    CheckConfig,
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
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::HashPassword { password } => commands::password::handle(&password, output_format),
        Commands::CheckConfig => commands::config::handle(output_format),
    }
}
