use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use newsdesk::api::BackendClient;
use newsdesk::app::{App, AppEvent};
use newsdesk::config::Config;
use newsdesk::dispatch::FetchDispatcher;
use newsdesk::query::{Category, LimitBounds, Mode, ModeController, Query, Transition};
use newsdesk::ui;
use newsdesk::util::{one_line, strip_control_chars};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Get the config directory path (~/.config/newsdesk/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdesk"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Trending,
    Topic,
    Favorite,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Trending => Mode::Trending,
            ModeArg::Topic => Mode::Topic,
            ModeArg::Favorite => Mode::Favorite,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "newsdesk",
    about = "Terminal news desk: trending, topic and category news with credibility scores"
)]
struct Args {
    /// Backend base URL (overrides config file and NEWSDESK_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Mode to open with
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Topic to search (implies --mode topic)
    #[arg(long)]
    topic: Option<String>,

    /// Favorite category (implies --mode favorite)
    #[arg(long)]
    category: Option<Category>,

    /// Number of articles to request
    #[arg(long)]
    limit: Option<u32>,

    /// Print the article list once and exit instead of starting the TUI
    #[arg(long)]
    once: bool,

    /// Config file (default: ~/.config/newsdesk/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file (default: ~/.config/newsdesk/newsdesk.log)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn initial_mode(&self) -> Option<Mode> {
        if self.topic.is_some() {
            Some(Mode::Topic)
        } else if self.category.is_some() {
            Some(Mode::Favorite)
        } else {
            self.mode.map(Mode::from)
        }
    }
}

/// Logs go to a file because the TUI owns the terminal. One-shot mode may
/// fall back to stderr.
fn init_tracing(log_path: &Path, once: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newsdesk=info"));
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path);

    match file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        Err(e) if once => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            tracing::warn!(path = %log_path.display(), error = %e, "Cannot open log file, logging to stderr");
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open log file '{}'", log_path.display()));
        }
    }
    Ok(())
}

/// Drive a bare controller to the selection given on the command line.
fn initial_query(controller: &mut ModeController, args: &Args) -> Option<Query> {
    let mode = args.initial_mode()?;
    let mut transition = controller.select_mode(mode);
    if let Some(topic) = &args.topic {
        controller.set_draft(topic.clone());
        transition = controller.submit_topic();
    }
    if let Some(category) = args.category {
        transition = controller.choose_category(category);
    }
    match transition {
        Transition::Reset { dispatch } => dispatch,
        Transition::Evaluate(query) => Some(query),
        Transition::None => None,
    }
}

/// Resolve one query and print the visible list.
async fn run_once(config: &Config, args: &Args) -> Result<()> {
    let client = BackendClient::new(config).context("Failed to create HTTP client")?;
    let mut controller = ModeController::new(
        LimitBounds::from_config(config),
        args.limit.unwrap_or(config.default_limit),
    );
    let Some(query) = initial_query(&mut controller, args) else {
        anyhow::bail!("--once needs a complete selection: --mode trending, --topic TEXT or --category NAME");
    };

    let mut dispatcher = FetchDispatcher::new();
    let series = query.series.clone();
    let articles = dispatcher
        .resolve(&client, query)
        .await
        .with_context(|| format!("Failed to load {series}"))?;

    if articles.is_empty() {
        println!("No results for {series}.");
        return Ok(());
    }

    println!("{series} ({} articles)", articles.len());
    for (i, article) in articles.iter().enumerate() {
        let score = article
            .credibility_score()
            .map(|s| format!(" [{s:.1}]"))
            .unwrap_or_default();
        println!(
            "{:>2}. {}{}",
            i + 1,
            one_line(&strip_control_chars(article.display_title())),
            score
        );
        println!("    {} | {}", article.publisher_name(), article.url);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| config_dir.join("newsdesk.log"));
    init_tracing(&log_path, args.once)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    config.apply_env();
    if let Some(url) = &args.api_url {
        config.api_base_url = url.clone();
    }
    tracing::info!(base_url = %config.api_base_url, "Starting newsdesk");

    if args.once {
        return run_once(&config, &args).await;
    }

    let mut app = App::new(&config).context("Failed to create application")?;
    if let Some(limit) = args.limit {
        let _ = app.set_limit(limit);
    }

    let initial = args
        .initial_mode()
        .and_then(|mode| app.start(mode, args.topic.as_deref(), args.category));

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, initial, event_tx, event_rx).await?;

    Ok(())
}
