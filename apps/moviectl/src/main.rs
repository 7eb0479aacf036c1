use std::{process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    Action, ClientState, DispatchConfig, Dispatcher, HttpInventoryClient, InventoryClientConfig,
    DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT,
};
use shared::{domain::DEFAULT_PAGE_SIZE, protocol::NoticeLevel};
use tracing::debug;

mod table;

use table::{notice_line, render_table};

#[derive(Parser, Debug)]
#[command(
    name = "moviectl",
    version,
    about = "Browse and edit the car movies inventory from the terminal"
)]
struct Args {
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,
    #[arg(
        long,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    page_size: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the first page, newest first.
    List,
    /// Create a placeholder movie.
    Add,
    /// Mark the movie at a row of `list` as updated.
    Update {
        #[arg(long)]
        row: usize,
    },
    /// Delete the movies at the given rows of `list`.
    Delete {
        #[arg(long = "row", required = true)]
        rows: Vec<usize>,
    },
    /// Filter the first page by name.
    Search { query: String },
}

impl Command {
    fn into_action(self) -> Option<Action> {
        match self {
            Command::List => None,
            Command::Add => Some(Action::Add),
            Command::Update { row } => Some(Action::Update {
                selection: vec![row],
            }),
            Command::Delete { rows } => Some(Action::Delete { selection: rows }),
            Command::Search { query } => Some(Action::Search { query }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(if args.verbose { "debug" } else { "warn" })
        .init();

    let config = InventoryClientConfig::new(&args.api_url)
        .context("invalid --api-url")?
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let client = HttpInventoryClient::new(config).context("failed to build http client")?;
    let dispatcher = Dispatcher::new(
        client,
        DispatchConfig::default().with_page_size(args.page_size),
    );

    let mut state = dispatcher.dispatch(ClientState::new(), Action::Refresh).await;
    if state.notice().is_none() {
        if let Some(action) = args.command.into_action() {
            debug!(action = action.name(), "running action");
            state = dispatcher.dispatch(state, action).await;
        }
    }

    if let Some(line) = notice_line(&state) {
        eprintln!("{line}");
    }
    print!("{}", render_table(&state));

    let failed = state
        .notice()
        .is_some_and(|notice| notice.level == NoticeLevel::Error);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
