//! Command-line shell for the console engine.
//!
//! Drives the engine against a live gateway: loads the config and the
//! session context, applies the requested filters through the normal
//! mutation entry points, refreshes the relevant view, and prints it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use url::Url;
use uuid::Uuid;

use quaestor::auth::{SessionContext, resolve_role};
use quaestor::client::{ExportFormat, ExportScope, GatewayClient};
use quaestor::config::ConsoleConfig;
use quaestor::engine::ConsoleEngine;
use quaestor::filter::{DateRangeSelection, Mode, TeamSelection};
use quaestor::views::{SortDirection, SortField, ViewData};

#[derive(Parser)]
#[command(name = "quaestor", version, about = "Usage analytics console for a multi-tenant AI gateway")]
struct Args {
    /// Path to the console configuration file.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Path to a JSON session-context file (user id, IdP roles, managed
    /// team ids). Defaults to an unrestricted admin session.
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Date range in days, or `all`.
    #[arg(long)]
    range: Option<String>,

    /// Single-day drill-down (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Scope to one user (admin only).
    #[arg(long)]
    user: Option<Uuid>,

    /// Filter by agent.
    #[arg(long)]
    agent: Option<Uuid>,

    /// Filter by model.
    #[arg(long)]
    model: Option<String>,

    /// Switch to team mode and scope to a team id, or `all`.
    #[arg(long)]
    team: Option<String>,

    /// Scope to one consenting team member (team mode).
    #[arg(long)]
    member: Option<Uuid>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the usage overview and breakdowns.
    Usage {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List conversation summaries.
    Conversations {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = SortArg::UpdatedAt)]
        sort: SortArg,
        #[arg(long, value_enum, default_value_t = DirectionArg::Desc)]
        direction: DirectionArg,
    },
    /// Print the storage breakdown.
    Storage {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        dataset: Option<Uuid>,
    },
    /// Download an export of the current filter.
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
        /// Include transcript bodies.
        #[arg(long)]
        include_content: bool,
        /// Export everything in scope, keeping only the time window.
        #[arg(long)]
        all: bool,
        /// Export a single conversation.
        #[arg(long, conflicts_with = "all")]
        conversation: Option<Uuid>,
        /// Output path; defaults to the server-provided filename.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    UpdatedAt,
    CreatedAt,
    MessageCount,
    TotalTokens,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::UpdatedAt => SortField::UpdatedAt,
            SortArg::CreatedAt => SortField::CreatedAt,
            SortArg::MessageCount => SortField::MessageCount,
            SortArg::TotalTokens => SortField::TotalTokens,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Asc => SortDirection::Asc,
            DirectionArg::Desc => SortDirection::Desc,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(err) = run(args).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };

    init_tracing(&config.observability.log_filter);

    let session = load_session(args.session.as_deref())?;
    let principal = resolve_role(&session);
    tracing::info!(role = principal.role.as_str(), "session resolved");

    let base_url = Url::parse(&config.gateway.base_url)?;
    let client = GatewayClient::new(
        config.gateway.build_client()?,
        base_url.as_str(),
        config.gateway.api_key(),
    );
    client.health().await?;

    let mut engine = ConsoleEngine::new(principal, client, &config.display);

    match args.command {
        Command::Usage { filters } => {
            apply_filters(&mut engine, &filters)?;
            engine.refresh_usage().await?;
            print_usage(engine.usage.data());
        }
        Command::Conversations {
            filters,
            page,
            search,
            sort,
            direction,
        } => {
            apply_filters(&mut engine, &filters)?;
            engine.set_search(search)?;
            engine.set_sort(sort.into(), direction.into());
            engine.set_page(page);
            engine.refresh_conversations().await?;
            print_conversations(engine.conversations.data());
        }
        Command::Storage { filters, dataset } => {
            apply_filters(&mut engine, &filters)?;
            engine.storage.set_dataset(dataset);
            engine.refresh_storage().await?;
            print_storage(engine.storage.data());
        }
        Command::Export {
            filters,
            format,
            include_content,
            all,
            conversation,
            out,
        } => {
            apply_filters(&mut engine, &filters)?;
            engine.export.format = format.into();
            engine.export.include_content = include_content;
            let scope = match (conversation, all) {
                (Some(id), _) => ExportScope::Single(id),
                (None, true) => ExportScope::All,
                (None, false) => ExportScope::Filtered,
            };
            let download = engine.run_export(scope).await?;
            let path = out.unwrap_or_else(|| PathBuf::from(&download.filename));
            std::fs::write(&path, &download.bytes)?;
            println!("wrote {} ({} bytes)", path.display(), download.bytes.len());
        }
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_session(path: Option<&Path>) -> Result<SessionContext, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        // Local administration defaults to the unrestricted role.
        None => Ok(SessionContext {
            user_id: Uuid::new_v4(),
            roles: vec!["admin".to_string()],
            managed_team_ids: Vec::new(),
        }),
    }
}

fn apply_filters(
    engine: &mut ConsoleEngine,
    filters: &FilterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(team) = &filters.team {
        engine.set_mode(Mode::Team)?;
        engine.set_team(team.parse::<TeamSelection>()?)?;
        if let Some(member) = filters.member {
            engine.set_observable_member(Some(member))?;
        }
    }
    if let Some(range) = &filters.range {
        let selection = if range == "all" {
            DateRangeSelection::All
        } else {
            DateRangeSelection::days(range.parse()?)
        };
        engine.set_date_range(selection)?;
    }
    engine.set_specific_date(filters.date)?;
    if let Some(user) = filters.user {
        engine.set_user(Some(user))?;
    }
    engine.set_agent(filters.agent)?;
    engine.set_model(filters.model.clone())?;
    Ok(())
}

fn print_usage(data: &ViewData<quaestor::models::UsageReport>) {
    let Some(report) = data.current() else {
        println!("no usage data{}", error_suffix(data));
        return;
    };
    let o = &report.overview;
    println!(
        "conversations: {}  messages: {}  tokens: {} in / {} out ({} total)  active users: {}",
        o.conversation_count,
        o.message_count,
        o.input_tokens,
        o.output_tokens,
        o.total_tokens,
        o.active_user_count
    );
    for point in &report.time_series {
        println!(
            "  {}  {:>6} conv  {:>8} msg  {:>12} tok",
            point.date, point.conversation_count, point.message_count, point.total_tokens
        );
    }
    for slice in &report.breakdown_by_model {
        println!("  model {}  {:>12} tok", slice.model, slice.total_tokens);
    }
}

fn print_conversations(
    data: &ViewData<quaestor::models::Page<quaestor::models::ConversationSummary>>,
) {
    let Some(page) = data.current() else {
        println!("no conversations{}", error_suffix(data));
        return;
    };
    println!(
        "{} of {} conversations (skip {})",
        page.items.len(),
        page.total,
        page.skip
    );
    for item in &page.items {
        println!(
            "  {}  {:<40}  {:>5} msg  {:>10} tok  {}",
            item.updated_at.format("%Y-%m-%d %H:%M"),
            item.title,
            item.message_count,
            item.total_tokens,
            item.user_name.as_deref().unwrap_or("-")
        );
    }
}

fn print_storage(data: &ViewData<quaestor::models::StorageReport>) {
    let Some(report) = data.current() else {
        println!("no storage data{}", error_suffix(data));
        return;
    };
    let o = &report.overview;
    println!(
        "{} bytes across {} documents in {} datasets",
        o.total_bytes, o.document_count, o.dataset_count
    );
    for dataset in &report.by_dataset {
        println!(
            "  {}  {:>14} bytes  {:>6} docs",
            dataset.dataset_name, dataset.total_bytes, dataset.document_count
        );
    }
}

fn error_suffix<T>(data: &ViewData<T>) -> String {
    data.error()
        .map(|e| format!(" ({e})"))
        .unwrap_or_default()
}
