use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use client_core::{
    Action, ClientState, DispatchConfig, Dispatcher, HttpInventoryClient, InventoryClientConfig,
    InventoryService,
};
use shared::{
    error::ApiError,
    protocol::{ActionRequest, DashboardView, SelectionRequest},
};
use tokio::sync::Mutex;
use tracing::{info, warn};

mod config;

use config::load_settings;

const MAX_ACTION_BODY_BYTES: usize = 64 * 1024;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// The single table snapshot and the dispatcher that advances it. The lock is
/// held for a whole action, so actions run one at a time.
struct AppState {
    dispatcher: Dispatcher<Arc<dyn InventoryService>>,
    table: Mutex<ClientState>,
}

impl AppState {
    fn new(dispatcher: Dispatcher<Arc<dyn InventoryService>>, table: ClientState) -> Self {
        Self {
            dispatcher,
            table: Mutex::new(table),
        }
    }

    async fn run(&self, action: Action) -> DashboardView {
        let mut table = self.table.lock().await;
        let next = self.dispatcher.dispatch(table.clone(), action).await;
        *table = next;
        table.view()
    }

    async fn run_triggers(&self, req: &ActionRequest) -> DashboardView {
        let mut table = self.table.lock().await;
        let next = self
            .dispatcher
            .dispatch_triggers(table.clone(), &req.triggers, &req.selected_rows)
            .await;
        *table = next;
        table.view()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = load_settings();
    let settings = loaded.settings;
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter())
        .init();
    for problem in &loaded.warnings {
        warn!("{problem}");
    }

    let client_config = InventoryClientConfig::new(&settings.api_base_url)
        .context("invalid inventory api url")?
        .with_timeout(settings.request_timeout());
    let client = HttpInventoryClient::new(client_config).context("failed to build http client")?;
    let service: Arc<dyn InventoryService> = Arc::new(client);
    let dispatcher = Dispatcher::new(
        service,
        DispatchConfig::default().with_page_size(settings.page_size),
    );

    let initial = dispatcher.dispatch(ClientState::new(), Action::Refresh).await;
    if let Some(notice) = initial.notice() {
        warn!(message = %notice.message, "initial table load incomplete");
    }
    info!(rows = initial.rows().len(), "initial table loaded");

    let app = build_router(Arc::new(AppState::new(dispatcher, initial)));

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    info!(%addr, api = %settings.api_base_url, debug = settings.debug, "dashboard listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/movies", get(current_view))
        .route("/actions", post(fire_triggers))
        .route("/actions/:action", post(fire_action))
        .layer(DefaultBodyLimit::max(MAX_ACTION_BODY_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn current_view(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.table.lock().await.view())
}

async fn fire_triggers(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActionRequest>,
) -> ApiResult<DashboardView> {
    if req.triggers.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation("no control fired")),
        ));
    }
    Ok(Json(state.run_triggers(&req).await))
}

async fn fire_action(
    State(state): State<Arc<AppState>>,
    Path(action): Path<String>,
    body: Bytes,
) -> ApiResult<DashboardView> {
    let req = selection_from_body(&body)?;
    let action = match action.as_str() {
        "add" => Action::Add,
        "update" => Action::Update {
            selection: req.selected_rows,
        },
        "delete" => Action::Delete {
            selection: req.selected_rows,
        },
        "search" => Action::Search {
            query: req.query.unwrap_or_default(),
        },
        "refresh" | "view" => Action::Refresh,
        other => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ApiError::not_found(format!("unknown action '{other}'"))),
            ))
        }
    };
    Ok(Json(state.run(action).await))
}

/// An empty body means "nothing selected"; anything else must decode.
fn selection_from_body(body: &[u8]) -> Result<SelectionRequest, (StatusCode, Json<ApiError>)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SelectionRequest::default());
    }
    Json::<SelectionRequest>::from_bytes(body)
        .map(|Json(req)| req)
        .map_err(|rejection| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError::validation(rejection.body_text())),
            )
        })
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
