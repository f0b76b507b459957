pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Job board CLI - backend diagnostics and site configuration")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check backend connectivity and probe tables")]
    Diagnose {
        #[arg(long, value_delimiter = ',', help = "Tables to probe (defaults to jobs,profiles)")]
        tables: Vec<String>,
    },

    #[command(about = "List protected path prefixes and their declared roles")]
    Routes,

    #[command(about = "Show effective site rules: headers, redirects, image domains, build toggles")]
    Site,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
        Commands::Diagnose { tables } => commands::diagnose::handle(tables, output_format).await,
        Commands::Routes => commands::routes::handle(output_format),
        Commands::Site => commands::site::handle(output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_diagnose_with_tables() {
        let cli = Cli::try_parse_from(["jobboard", "diagnose", "--tables", "jobs,applications", "--json"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Commands::Diagnose { tables } => assert_eq!(tables, vec!["jobs", "applications"]),
            _ => panic!("expected diagnose"),
        }
    }

    #[test]
    fn defaults_to_text_output() {
        let cli = Cli::try_parse_from(["jobboard", "routes"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }
}
