//! Maps one fired control to the next `ClientState`.

use shared::{
    domain::{MovieDraft, MovieId, PageRequest},
    protocol::{Control, Notice, Trigger},
};
use tracing::{debug, error, info, warn};

use crate::{state::ClientState, InventoryService};

pub const PLACEHOLDER_NAME: &str = "Nueva Película";
pub const PLACEHOLDER_YEAR: i32 = 2025;
pub const PLACEHOLDER_DURATION: u32 = 100;
pub const UPDATE_SUFFIX: &str = " (Actualizado)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add,
    Update { selection: Vec<usize> },
    Delete { selection: Vec<usize> },
    Search { query: String },
    Refresh,
}

impl Action {
    pub fn from_trigger(trigger: &Trigger, selection: &[usize]) -> Self {
        match trigger.control {
            Control::AddButton => Action::Add,
            Control::UpdateButton => Action::Update {
                selection: selection.to_vec(),
            },
            Control::DeleteButton => Action::Delete {
                selection: selection.to_vec(),
            },
            Control::ViewButton => Action::Refresh,
            Control::SearchInput => Action::Search {
                query: trigger.query.clone().unwrap_or_default(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Update { .. } => "update",
            Action::Delete { .. } => "delete",
            Action::Search { .. } => "search",
            Action::Refresh => "refresh",
        }
    }
}

/// The trigger that fired first: lowest sequence, earliest in the slice on ties.
pub fn first_fired(triggers: &[Trigger]) -> Option<&Trigger> {
    triggers
        .iter()
        .enumerate()
        .min_by_key(|(index, trigger)| (trigger.sequence, *index))
        .map(|(_, trigger)| trigger)
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub page: PageRequest,
    pub placeholder: MovieDraft,
    pub update_suffix: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            page: PageRequest::default(),
            placeholder: MovieDraft::new(PLACEHOLDER_NAME, PLACEHOLDER_YEAR, PLACEHOLDER_DURATION),
            update_suffix: UPDATE_SUFFIX.to_string(),
        }
    }
}

impl DispatchConfig {
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page.size = size;
        self
    }
}

pub struct Dispatcher<S> {
    service: S,
    config: DispatchConfig,
}

impl<S: InventoryService> Dispatcher<S> {
    pub fn new(service: S, config: DispatchConfig) -> Self {
        Self { service, config }
    }

    /// Runs one action. Remote failures end up in the returned state's notice;
    /// nothing is retried.
    /// An Update or Delete with nothing selected returns the input as is,
    /// notice included.
    pub async fn dispatch(&self, state: ClientState, action: Action) -> ClientState {
        debug!(action = action.name(), "dispatching action");
        match action {
            Action::Add => self.add(state.clear_notice()).await,
            Action::Update { selection } => self.update(state, &selection).await,
            Action::Delete { selection } => self.delete(state, &selection).await,
            Action::Search { query } => state.clear_notice().searched(&query),
            Action::Refresh => self.refresh(state.clear_notice()).await,
        }
    }

    /// Dispatches only the first-fired trigger. With no triggers the state is
    /// returned untouched.
    pub async fn dispatch_triggers(
        &self,
        state: ClientState,
        triggers: &[Trigger],
        selection: &[usize],
    ) -> ClientState {
        let Some(trigger) = first_fired(triggers) else {
            return state;
        };
        if triggers.len() > 1 {
            debug!(
                winner = trigger.control.as_str(),
                fired = triggers.len(),
                "several controls fired; first one wins"
            );
        }
        self.dispatch(state, Action::from_trigger(trigger, selection))
            .await
    }

    pub async fn refresh(&self, state: ClientState) -> ClientState {
        match self.service.fetch_page(&self.config.page).await {
            Ok(records) => {
                info!(count = records.len(), "table refreshed from inventory");
                ClientState::from_fetch(records)
            }
            Err(err) => {
                error!(%err, "inventory fetch failed; keeping last known table");
                state.with_notice(Notice::error(format!(
                    "Could not reach the inventory; showing the last loaded table ({err})"
                )))
            }
        }
    }

    async fn add(&self, state: ClientState) -> ClientState {
        let draft = &self.config.placeholder;
        match self.service.create(draft).await {
            Ok(true) => {
                let refreshed = self.refresh(state).await;
                if refreshed.notice().is_some() {
                    return refreshed;
                }
                refreshed.with_notice(Notice::info(format!("Added \"{}\"", draft.name)))
            }
            Ok(false) => {
                let refreshed = self.refresh(state).await;
                if refreshed.notice().is_some() {
                    return refreshed;
                }
                refreshed.with_notice(Notice::warning("The inventory did not accept the new movie"))
            }
            Err(err) => {
                error!(%err, "movie create failed");
                state.with_notice(Notice::error(format!("Could not add a movie ({err})")))
            }
        }
    }

    async fn update(&self, state: ClientState, selection: &[usize]) -> ClientState {
        let Some(record) = state.row_for_selection(selection) else {
            debug!("update skipped: nothing selected");
            return state;
        };
        let id = record.id;
        let draft = record.draft().with_name_suffix(&self.config.update_suffix);
        let extra_selected = state.resolve_selection(selection).len() > 1;
        let state = state.clear_notice();

        match self.service.update(id, &draft).await {
            Ok(true) => {
                let refreshed = self.refresh(state).await;
                if refreshed.notice().is_some() {
                    return refreshed;
                }
                let message = if extra_selected {
                    format!("Updated movie {id}; only the first selected row is updated")
                } else {
                    format!("Updated movie {id}")
                };
                refreshed.with_notice(Notice::info(message))
            }
            Ok(false) => state.with_notice(Notice::warning(format!(
                "The inventory did not accept the update of movie {id}"
            ))),
            Err(err) => {
                error!(%err, movie_id = id.0, "movie update failed");
                state.with_notice(Notice::error(format!(
                    "Could not update movie {id} ({err})"
                )))
            }
        }
    }

    async fn delete(&self, state: ClientState, selection: &[usize]) -> ClientState {
        let ids = state.resolve_selection(selection);
        if ids.is_empty() {
            debug!("delete skipped: nothing selected");
            return state;
        }
        let state = state.clear_notice();

        let mut unconfirmed: Vec<MovieId> = Vec::new();
        let mut unreachable = false;
        for &id in &ids {
            match self.service.delete(id).await {
                Ok(true) => {}
                Ok(false) => unconfirmed.push(id),
                Err(err) => {
                    warn!(%err, movie_id = id.0, "movie delete failed");
                    unreachable = true;
                    unconfirmed.push(id);
                }
            }
        }

        let state = state.without_ids(&ids);
        if unconfirmed.is_empty() {
            return state.with_notice(Notice::info(format!("Deleted {} movie(s)", ids.len())));
        }

        let listed = unconfirmed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!("Delete not confirmed for movie(s) {listed}; refresh to reconcile");
        if unreachable {
            state.with_notice(Notice::error(message))
        } else {
            state.with_notice(Notice::warning(message))
        }
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
