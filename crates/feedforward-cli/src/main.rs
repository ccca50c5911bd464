//! FeedForward CLI - submit, browse, and vote on product feedback
//!
//! Terminal frontend for the shared feedback service.

use std::io;

use chrono::SecondsFormat;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use feedforward_core::config::resolve_api_url;
use feedforward_core::{Category, Feedback, FeedbackClient, FeedbackDraft, FeedbackGateway};
use serde::Serialize;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "ffwd")]
#[command(about = "Collect and vote on product feedback from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Optional base URL of the feedback service
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit new feedback
    #[command(alias = "new")]
    Add {
        /// Short summary of the problem or idea
        title: String,
        /// Longer description
        #[arg(short, long)]
        description: String,
        /// Category to file the feedback under
        #[arg(long, value_enum, default_value_t = CategoryArg::Bug)]
        category: CategoryArg,
    },
    /// List feedback, grouped by category
    List {
        /// Only show records whose title contains this text
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,
        /// Sort order within groups
        #[arg(long, value_enum, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upvote a feedback record
    Upvote {
        /// Record ID or unique ID prefix
        id: String,
    },
    /// Delete a feedback record
    Delete {
        /// Record ID or unique ID prefix
        id: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] feedforward_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Feedback ID cannot be empty")]
    EmptyFeedbackId,
    #[error("Feedback not found for id/prefix: {0}")]
    FeedbackNotFound(String),
    #[error("{0}")]
    AmbiguousFeedbackId(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum SortOrder {
    Newest,
    Oldest,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum CategoryArg {
    Bug,
    Feature,
    Improvement,
}

impl From<CategoryArg> for Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Bug => Category::Bug,
            CategoryArg::Feature => Category::Feature,
            CategoryArg::Improvement => Category::Improvement,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("feedforward_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let api_url = resolve_api_url(cli.api_url)?;
    tracing::debug!(%api_url, "resolved feedback service");

    match cli.command {
        Some(Commands::Add {
            title,
            description,
            category,
        }) => run_add(&title, &description, category.into(), &api_url).await?,
        Some(Commands::List { search, sort, json }) => {
            run_list(search.as_deref(), sort, json, &api_url).await?;
        }
        Some(Commands::Upvote { id }) => run_upvote(&id, &api_url).await?,
        Some(Commands::Delete { id }) => run_delete(&id, &api_url).await?,
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}

async fn run_add(
    title: &str,
    description: &str,
    category: Category,
    api_url: &str,
) -> Result<(), CliError> {
    // Validate before anything touches the network.
    let draft = FeedbackDraft::new(title, description, category)?;

    let client = build_client(api_url)?;
    let created = client.create(draft).await?;

    if let Some(id) = created.id.as_deref() {
        println!("{id}");
    } else {
        println!("{}", created.title);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct FeedbackListItem {
    id: String,
    title: String,
    preview: String,
    description: String,
    category: String,
    created_at: Option<String>,
    upvotes: u32,
}

async fn run_list(
    search: Option<&str>,
    sort: SortOrder,
    as_json: bool,
    api_url: &str,
) -> Result<(), CliError> {
    let client = build_client(api_url)?;
    client.fetch_all().await?;

    let records = filter_by_title(client.state().records, search);
    let records = apply_sort_order(records, sort);

    if as_json {
        let json_items = records
            .iter()
            .map(feedback_to_list_item)
            .collect::<Vec<FeedbackListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_feedback_lines(&records) {
            println!("{line}");
        }
    }

    Ok(())
}

async fn run_upvote(id: &str, api_url: &str) -> Result<(), CliError> {
    let normalized_id = normalize_feedback_identifier(id)?;
    let client = build_client(api_url)?;
    let record_id = resolve_feedback_id(&normalized_id, &client).await?;

    let confirmed = client.upvote(&record_id).await?;
    println!("{}", confirmed.upvotes);
    Ok(())
}

async fn run_delete(id: &str, api_url: &str) -> Result<(), CliError> {
    let normalized_id = normalize_feedback_identifier(id)?;
    let client = build_client(api_url)?;
    let record_id = resolve_feedback_id(&normalized_id, &client).await?;

    client.delete(&record_id).await?;
    println!("{record_id}");
    Ok(())
}

async fn resolve_feedback_id(query: &str, client: &FeedbackClient) -> Result<String, CliError> {
    client.fetch_all().await?;
    let records = client.state().records;

    if records
        .iter()
        .any(|record| record.id.as_deref() == Some(query))
    {
        return Ok(query.to_string());
    }

    let mut matching_ids = records
        .iter()
        .filter_map(|record| record.id.as_deref())
        .filter(|id| id.starts_with(query))
        .map(ToString::to_string)
        .collect::<Vec<String>>();

    match matching_ids.len() {
        0 => Err(CliError::FeedbackNotFound(query.to_string())),
        1 => Ok(matching_ids.remove(0)),
        _ => {
            let options = matching_ids
                .iter()
                .take(3)
                .map(|id| id.chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousFeedbackId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

fn format_feedback_lines(records: &[Feedback]) -> Vec<String> {
    if records.is_empty() {
        return vec!["No feedback found.".to_string()];
    }

    let mut lines = Vec::new();
    for category in Category::ALL {
        let group = records
            .iter()
            .filter(|record| record.category == category)
            .collect::<Vec<_>>();

        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("{category} ({})", group.len()));

        if group.is_empty() {
            lines.push(format!("  No {category} feedback yet."));
            continue;
        }

        for record in group {
            let id = record.id.clone().unwrap_or_default();
            let short_id = id.chars().take(13).collect::<String>();
            let title = feedback_preview(&record.title, 40);
            let date = format_created_date(record);
            lines.push(format!(
                "  {short_id:<13}  {title:<40}  {date:<10}  {} upvotes",
                record.upvotes
            ));
        }
    }
    lines
}

fn feedback_to_list_item(record: &Feedback) -> FeedbackListItem {
    FeedbackListItem {
        id: record.id.clone().unwrap_or_default(),
        title: record.title.clone(),
        preview: feedback_preview(&record.description, 80),
        description: record.description.clone(),
        category: record.category.as_str().to_string(),
        created_at: record
            .created_at
            .map(|created_at| created_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        upvotes: record.upvotes,
    }
}

fn feedback_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn format_created_date(record: &Feedback) -> String {
    record.created_at.map_or_else(
        || "-".to_string(),
        |created_at| created_at.format("%Y-%m-%d").to_string(),
    )
}

fn filter_by_title(records: Vec<Feedback>, search: Option<&str>) -> Vec<Feedback> {
    let Some(term) = normalize_search_term(search) else {
        return records;
    };

    records
        .into_iter()
        .filter(|record| record.title.to_lowercase().contains(&term))
        .collect()
}

fn apply_sort_order(mut records: Vec<Feedback>, sort: SortOrder) -> Vec<Feedback> {
    match sort {
        SortOrder::Newest => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => records.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
    records
}

fn normalize_search_term(search: Option<&str>) -> Option<String> {
    let trimmed = search?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn normalize_feedback_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyFeedbackId)
    } else {
        Ok(trimmed.to_string())
    }
}

fn build_client(api_url: &str) -> Result<FeedbackClient, CliError> {
    let gateway = FeedbackGateway::new(api_url)?;
    Ok(FeedbackClient::new(gateway))
}
