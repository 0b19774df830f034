//! Session state for one user's todo list.
//!
//! Every intent from the presentation layer lands here. Local-only intents
//! (toggle, toggle all, clear completed, filter) mutate the list right away.
//! Remote intents mark the affected state as loading, await the provider and
//! then reconcile. Failures are returned to the caller and also pushed to the
//! [`ErrorChannel`], which is what the user sees.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use thiserror::Error;

use crate::{
    config::Config,
    error_channel::ErrorChannel,
    filter::{self, FilterMode},
    provider::{TodoProvider, TransportError},
    todo::{NewTodo, Todo},
};

pub type DynTodoProvider = Arc<dyn TodoProvider + Send + Sync>;

/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unable to load todos")]
    Load(#[source] TransportError),
    #[error("Unable to add todo")]
    Add(#[source] TransportError),
    #[error("Can't delete todo")]
    Delete {
        id: i64,
        #[source]
        source: TransportError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Todo),
    /// The title was empty after trimming.
    Rejected,
    /// Another add or the initial load is still waiting for the remote service.
    Busy,
}

/// Everything the presentation layer renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    pub todos: Vec<Todo>,
    pub filtered_todos: Vec<Todo>,
    pub filter_mode: FilterMode,
    pub is_loading: bool,
    pub error: Option<String>,
    pub all_completed: bool,
    pub active_count: usize,
    pub completed_count: usize,
    pub has_completed: bool,
    pub can_clear_completed: bool,
    pub show_footer: bool,
    pub draft: String,
}

#[derive(Default)]
struct State {
    todos: Vec<Todo>,
    filter_mode: FilterMode,
    draft: String,
    loading_list: bool,
    adding: bool,
}

impl State {
    fn find_mut(&mut self, id: i64) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    /// Appends `todo`, or replaces the entry that already has its id.
    fn upsert(&mut self, mut todo: Todo) {
        todo.is_loading = false;
        match self.find_mut(todo.id) {
            Some(existing) => {
                tracing::warn!(id = todo.id, "remote returned a duplicate id, replacing entry");
                *existing = todo;
            }
            None => self.todos.push(todo),
        }
    }

    fn is_loading(&self) -> bool {
        self.loading_list || self.adding
    }

    fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|todo| todo.completed)
    }

    fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }
}

pub struct TodoStore {
    provider: DynTodoProvider,
    user_id: i64,
    state: Mutex<State>,
    errors: ErrorChannel,
}

impl TodoStore {
    pub fn new(provider: DynTodoProvider, config: &Config) -> Self {
        TodoStore {
            provider,
            user_id: config.user_id,
            state: Mutex::new(State::default()),
            errors: ErrorChannel::new(config.error_timeout),
        }
    }

    /// Fetches the user's todos. Does nothing if the list already has items
    /// or a load or add is in progress.
    pub async fn load_initial(&self) -> Result<(), StoreError> {
        {
            let mut state = self.lock();
            if !state.todos.is_empty() || state.is_loading() {
                tracing::debug!("initial load skipped");
                return Ok(());
            }
            state.loading_list = true;
        }

        let result = self.provider.get_todos(self.user_id).await;

        let mut state = self.lock();
        state.loading_list = false;
        match result {
            Ok(todos) => {
                tracing::info!(count = todos.len(), "loaded todos");
                state.todos.clear();
                for todo in todos {
                    state.upsert(todo);
                }
                Ok(())
            }
            Err(err) => {
                drop(state);
                Err(self.fail(StoreError::Load(err)))
            }
        }
    }

    pub async fn add_todo(&self, title: &str) -> Result<AddOutcome, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!("ignoring empty title");
            return Ok(AddOutcome::Rejected);
        }

        {
            let mut state = self.lock();
            // a load finishing after this add would replace the list
            if state.is_loading() {
                tracing::debug!("list busy, add ignored");
                return Ok(AddOutcome::Busy);
            }
            state.adding = true;
        }

        let result = self
            .provider
            .add_todo(&NewTodo::new(self.user_id, title))
            .await;

        let mut state = self.lock();
        state.adding = false;
        match result {
            Ok(mut todo) => {
                tracing::info!(id = todo.id, "added todo");
                todo.is_loading = false;
                state.upsert(todo.clone());
                state.draft.clear();
                Ok(AddOutcome::Added(todo))
            }
            Err(err) => {
                drop(state);
                Err(self.fail(StoreError::Add(err)))
            }
        }
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        self.lock().draft = draft.into();
    }

    /// Adds a todo from the current draft.
    pub async fn submit_draft(&self) -> Result<AddOutcome, StoreError> {
        let draft = self.lock().draft.clone();
        self.add_todo(&draft).await
    }

    pub fn toggle(&self, id: i64) {
        if let Some(todo) = self.lock().find_mut(id) {
            todo.completed = !todo.completed;
        }
    }

    /// Completes every item, or reopens all of them when all are already done.
    pub fn toggle_all(&self) {
        let mut state = self.lock();
        let completed = !state.all_completed();
        for todo in &mut state.todos {
            todo.completed = completed;
        }
    }

    pub async fn delete_todo(&self, id: i64) -> Result<(), StoreError> {
        {
            let mut state = self.lock();
            let Some(todo) = state.find_mut(id) else {
                tracing::debug!(id, "delete for unknown todo");
                return Ok(());
            };
            if todo.is_loading {
                tracing::debug!(id, "delete already in flight");
                return Ok(());
            }
            todo.is_loading = true;
        }

        let result = self.provider.delete_todo(id).await;

        let mut state = self.lock();
        match result {
            Ok(()) => {
                tracing::info!(id, "deleted todo");
                state.todos.retain(|todo| todo.id != id);
                Ok(())
            }
            Err(err) => {
                if let Some(todo) = state.find_mut(id) {
                    todo.is_loading = false;
                }
                drop(state);
                Err(self.fail(StoreError::Delete { id, source: err }))
            }
        }
    }

    /// Drops completed items from the local list only.
    pub fn clear_completed(&self) {
        self.lock().todos.retain(|todo| !todo.completed);
    }

    /// Deletes every completed item on the remote service. Items whose delete
    /// fails stay in the list; the first failure is returned once all
    /// deletes have settled.
    pub async fn purge_completed(&self) -> Result<usize, StoreError> {
        let ids: Vec<i64> = self
            .lock()
            .todos
            .iter()
            .filter(|todo| todo.completed && !todo.is_loading)
            .map(|todo| todo.id)
            .collect();

        let results = join_all(ids.iter().map(|&id| self.delete_todo(id))).await;

        let mut deleted = 0;
        let mut first_error = None;
        for result in results {
            match result {
                Ok(()) => deleted += 1,
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(deleted),
        }
    }

    pub fn set_filter(&self, mode: FilterMode) {
        self.lock().filter_mode = mode;
    }

    pub fn dismiss_error(&self) {
        self.errors.dismiss();
    }

    pub fn error(&self) -> Option<String> {
        self.errors.message()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    pub fn all_completed(&self) -> bool {
        self.lock().all_completed()
    }

    pub fn active_count(&self) -> usize {
        self.lock()
            .todos
            .iter()
            .filter(|todo| !todo.completed)
            .count()
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    pub fn filtered_todos(&self) -> Vec<Todo> {
        let state = self.lock();
        filter::visible(&state.todos, state.filter_mode)
    }

    pub fn view(&self) -> TodoView {
        let error = self.errors.message();
        let state = self.lock();
        let completed_count = state.completed_count();
        let is_loading = state.is_loading();

        TodoView {
            filtered_todos: filter::visible(&state.todos, state.filter_mode),
            filter_mode: state.filter_mode,
            is_loading,
            error,
            all_completed: state.all_completed(),
            active_count: state.todos.len() - completed_count,
            completed_count,
            has_completed: completed_count > 0,
            can_clear_completed: completed_count > 0 && !is_loading,
            show_footer: !state.todos.is_empty(),
            draft: state.draft.clone(),
            todos: state.todos.clone(),
        }
    }

    fn fail(&self, err: StoreError) -> StoreError {
        tracing::warn!(error = ?err, "{}", err);
        self.errors.push(err.to_string());
        err
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
