//! IntelliCourse CLI - Command-line interface
//!
//! Usage:
//!   intellicourse ask <question>
//!   intellicourse search <question>
//!   intellicourse check-key
//!   intellicourse catalog

use clap::{Parser, Subcommand};
use ic_core::config::{AppConfig, API_KEY_ENV};
use ic_core::Catalog;
use ic_rag::{init_llm_client, CourseAssistant, SearchTerms};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "intellicourse")]
#[command(about = "Ask questions about the Northwood University course catalog")]
#[command(version)]
struct Cli {
    /// TOML configuration file (defaults to $INTELLICOURSE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question using the catalog and the model
    Ask {
        /// Question to ask
        question: String,
    },
    /// Show search terms and retrieved context without calling the model
    Search {
        /// Question to retrieve context for
        question: String,
    },
    /// Report whether the API key was loaded
    CheckKey,
    /// List catalog chunks
    Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    // Logs go to stderr so answers can be piped
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{},ic_rag=warn", config.logging.level))),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = &dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "Failed to load .env file");
        }
    }

    match cli.command {
        Commands::Ask { question } => {
            let catalog = Catalog::load(&config.rag)?;
            let client = init_llm_client(&config.llm);
            let assistant = CourseAssistant::from_config(catalog, client, &config.llm, &config.rag);

            println!("{}", assistant.answer(&question).await);
        }
        Commands::Search { question } => {
            let catalog = Catalog::load(&config.rag)?;
            let assistant = CourseAssistant::from_config(catalog, None, &config.llm, &config.rag);

            let terms = SearchTerms::from_query(&question);
            println!("Search terms: {:?}", terms.iter().collect::<Vec<_>>());

            let context = assistant.retrieve(&question);
            if context.is_empty() {
                println!("No matching catalog chunks.");
            } else {
                println!("Matched {} chunk(s):", context.chunks().len());
                println!("{}", context.text());
            }
        }
        Commands::CheckKey => match config.llm.api_key.as_deref() {
            Some(key) => println!("{API_KEY_ENV} loaded: {}", redact(key)),
            None => println!("{API_KEY_ENV} not set"),
        },
        Commands::Catalog => {
            let catalog = Catalog::load(&config.rag)?;
            for (i, chunk) in catalog.iter().enumerate() {
                println!("[{}] {}", i + 1, chunk.as_str());
            }
        }
    }

    Ok(())
}

/// Show only the last four characters of a secret
fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["intellicourse", "ask", "What is CS 101?"]);
        assert!(matches!(cli.command, Commands::Ask { ref question } if question == "What is CS 101?"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::parse_from(["intellicourse", "check-key", "--config", "ic.toml"]);
        assert!(matches!(cli.command, Commands::CheckKey));
        assert_eq!(cli.config, Some(PathBuf::from("ic.toml")));
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("abcdefgh"), "****efgh");
        assert_eq!(redact("abc"), "***");
    }
}
