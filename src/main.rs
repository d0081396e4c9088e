use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use presence_analyzer::api::{ApiError, HttpPresenceApi, PresenceApi, UserId};
use presence_analyzer::chart::text::DEFAULT_WIDTH;
use presence_analyzer::chart::{ChartRenderer, TextRenderer};
use presence_analyzer::config::{ConfigError, PresenceConfig};
use presence_analyzer::view::{SelectionChanged, ViewHandles};
use presence_analyzer::widgets::{
    MeanTimeWidget, TimelineWidget, UserSelector, WeekdayWidget, Widget, WidgetController, WidgetState,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("backend request failed: {0}")]
    Api(#[from] ApiError),
    #[error("reading selections failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("{widget} chart for user {user_id} was not rendered")]
    NotRendered { widget: &'static str, user_id: UserId },
}

#[derive(Parser, Debug)]
#[command(name = "presence", about = "Presence analyzer charts in the terminal")]
struct Cli {
    #[arg(long, help = "Overrides PRESENCE_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, help = "Overrides PRESENCE_REQUEST_TIMEOUT_SECS; unset means no timeout")]
    request_timeout_secs: Option<u64>,

    #[arg(long, help = "Overrides PRESENCE_CONNECT_TIMEOUT_SECS")]
    connect_timeout_secs: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_WIDTH, help = "Chart width in characters")]
    width: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the users the selector would offer.
    Users,
    /// Usual start and end of presence per weekday.
    Timeline { user_id: UserId },
    /// Share of total presence per weekday.
    Weekday { user_id: UserId },
    /// Mean presence time per weekday.
    MeanTime { user_id: UserId },
    /// Read one user id per stdin line and redraw the chosen charts.
    Watch(WatchArgs),
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[arg(long = "widget", value_enum, default_values_t = [WidgetKind::Timeline, WidgetKind::Weekday])]
    widgets: Vec<WidgetKind>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum WidgetKind {
    Timeline,
    Weekday,
    MeanTime,
}

impl WidgetKind {
    fn build(self, api: Arc<dyn PresenceApi>) -> Arc<dyn Widget> {
        match self {
            Self::Timeline => Arc::new(TimelineWidget::new(api)),
            Self::Weekday => Arc::new(WeekdayWidget::new(api)),
            Self::MeanTime => Arc::new(MeanTimeWidget::new(api)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PresenceConfig::from_env()?.with_overrides(
        cli.base_url,
        cli.request_timeout_secs,
        cli.connect_timeout_secs,
    );
    let api: Arc<dyn PresenceApi> = Arc::new(HttpPresenceApi::new(&config)?);
    let renderer: Arc<dyn ChartRenderer> = Arc::new(TextRenderer::new(cli.width));
    info!(base_url = %config.base_url, "presence client ready");

    match cli.command {
        Command::Users => run_users(api).await,
        Command::Timeline { user_id } => run_widget(api, renderer, WidgetKind::Timeline, user_id).await,
        Command::Weekday { user_id } => run_widget(api, renderer, WidgetKind::Weekday, user_id).await,
        Command::MeanTime { user_id } => run_widget(api, renderer, WidgetKind::MeanTime, user_id).await,
        Command::Watch(args) => run_watch(api, renderer, args).await,
    }
}

async fn run_users(api: Arc<dyn PresenceApi>) -> Result<(), CliError> {
    let view = ViewHandles::new();
    UserSelector::new(api, view.clone()).initialize().await?;
    for option in view.selector.options() {
        println!("{}\t{}", option.value, option.label);
    }
    Ok(())
}

async fn run_widget(
    api: Arc<dyn PresenceApi>,
    renderer: Arc<dyn ChartRenderer>,
    kind: WidgetKind,
    user_id: UserId,
) -> Result<(), CliError> {
    let controller = WidgetController::new(kind.build(api), renderer, ViewHandles::new());
    if let Some(handle) = controller.on_selection(SelectionChanged(Some(user_id))) {
        if let Err(e) = handle.await {
            warn!(widget = controller.name(), %user_id, error = %e, "widget task failed");
        }
    }
    if controller.state() != WidgetState::Rendered {
        return Err(CliError::NotRendered { widget: controller.name(), user_id });
    }
    Ok(())
}

async fn run_watch(
    api: Arc<dyn PresenceApi>,
    renderer: Arc<dyn ChartRenderer>,
    args: WatchArgs,
) -> Result<(), CliError> {
    let view = ViewHandles::new();
    let tasks: Vec<_> = args
        .widgets
        .iter()
        .map(|kind| {
            let page = ViewHandles::with_selector(view.selector.clone());
            WidgetController::new(kind.build(api.clone()), renderer.clone(), page).bind()
        })
        .collect();

    let initialized = UserSelector::new(api, view.clone()).initialize().await;
    let result = match initialized {
        Ok(_) => read_selections(&view).await,
        Err(e) => {
            warn!(error = %e, "user list unavailable; selector stays hidden");
            Err(e.into())
        }
    };

    view.selector.close();
    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "widget loop failed");
        }
    }
    result
}

async fn read_selections(view: &ViewHandles) -> Result<(), CliError> {
    let options = view.selector.options();
    for option in &options {
        eprintln!("{}\t{}", option.value, option.label);
    }
    eprintln!("enter a user id per line (blank clears the selection)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            view.selector.select(None);
            continue;
        }
        let Ok(user_id) = trimmed.parse::<UserId>() else {
            warn!(input = trimmed, "not a user id");
            continue;
        };
        if !options.iter().any(|option| option.value == user_id) {
            warn!(%user_id, "user not offered by the selector");
            continue;
        }
        view.selector.select(Some(user_id));
    }
    Ok(())
}
