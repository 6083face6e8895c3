// ABOUTME: Command-line client for recipe lookups through the client entry point
// ABOUTME: Routes via the relay server or upstream directly, printing the payload and its source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Full information for one recipe
//! recipe-relay-cli info 715538
//!
//! # Search, through a running relay server
//! RECIPE_RELAY_USE_PROXY=true recipe-relay-cli search pasta --diet vegetarian --number 5
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipe_relay::{
    client::RecipeClient,
    config::ClientConfig,
    logging::{LogFormat, LoggingConfig},
    models::{RecipeId, RetrievalOutcome, SearchQuery},
};
use recipe_relay_upstream::{initialize_shared_client, ClientTimeouts};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "recipe-relay-cli",
    about = "Recipe Relay client",
    long_about = "Looks up recipe information or searches recipes using the same cache and fallback rules as the relay server."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Full information for one recipe
    Info {
        /// Recipe id
        id: String,
    },
    /// Search recipes
    Search {
        /// Free-text query
        query: String,
        /// Comma-separated ingredients that must be used
        #[arg(long)]
        include_ingredients: Option<String>,
        /// Diet filter
        #[arg(long)]
        diet: Option<String>,
        /// Comma-separated intolerances
        #[arg(long)]
        intolerances: Option<String>,
        /// Meal type
        #[arg(long = "type")]
        meal_type: Option<String>,
        /// Number of results
        #[arg(long)]
        number: Option<u32>,
        /// Maximum preparation time in minutes
        #[arg(long)]
        max_ready_time: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    LoggingConfig {
        level: if cli.verbose { "debug" } else { "warn" }.into(),
        format: LogFormat::Compact,
        ..LoggingConfig::default()
    }
    .init()?;

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    initialize_shared_client(
        config.upstream.timeout_secs,
        config.upstream.connect_timeout_secs,
    );
    let proxy_timeouts = ClientTimeouts {
        request: config.retrieval.request_deadline,
        connect: Duration::from_secs(config.upstream.connect_timeout_secs),
    };
    let client = RecipeClient::new(config)?.with_proxy_timeouts(proxy_timeouts);

    let outcome = match cli.command {
        Command::Info { id } => {
            let id = RecipeId::parse(&id)?;
            client.info(&id).await
        }
        Command::Search {
            query,
            include_ingredients,
            diet,
            intolerances,
            meal_type,
            number,
            max_ready_time,
        } => {
            let query = SearchQuery {
                include_ingredients: include_ingredients.unwrap_or_default(),
                diet: diet.unwrap_or_default(),
                intolerances: intolerances.unwrap_or_default(),
                meal_type: meal_type.unwrap_or_default(),
                number,
                max_ready_time,
                ..SearchQuery::text(query)
            };
            client.search(&query).await
        }
    };

    match outcome {
        RetrievalOutcome::Hit { payload, source } => {
            eprintln!("source: {source}");
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(ExitCode::SUCCESS)
        }
        RetrievalOutcome::Failure(failure) => {
            eprintln!("error: {failure}");
            Ok(ExitCode::FAILURE)
        }
    }
}
