//! In-process stand-in for the remote todo service.

use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use http::StatusCode;
use serde::Deserialize;
use tokio::net::TcpListener;
use todo_sync::{NewTodo, Todo};

#[derive(Default)]
struct Collection {
    todos: Vec<Todo>,
    next_id: i64,
}

#[derive(Default)]
pub struct FakeRemote {
    collection: Mutex<Collection>,
    failing: AtomicBool,
}

impl FakeRemote {
    pub fn with_todos(todos: Vec<Todo>) -> Arc<Self> {
        let next_id = todos.iter().map(|todo| todo.id).max().unwrap_or(0) + 1;
        Arc::new(FakeRemote {
            collection: Mutex::new(Collection { todos, next_id }),
            failing: AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Collection> {
        self.collection.lock().unwrap()
    }

    fn check(&self) -> Result<(), StatusCode> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            Ok(())
        }
    }
}

type RemoteState = State<Arc<FakeRemote>>;

#[derive(Deserialize)]
struct ListParams {
    #[serde(rename = "userId")]
    user_id: i64,
}

async fn get_todos(
    State(remote): RemoteState,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Todo>>, StatusCode> {
    remote.check()?;
    let todos = remote
        .lock()
        .todos
        .iter()
        .filter(|todo| todo.user_id == params.user_id)
        .cloned()
        .collect();

    Ok(Json(todos))
}

async fn add_todo(
    State(remote): RemoteState,
    Json(todo): Json<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    remote.check()?;
    let NewTodo {
        user_id,
        title,
        completed,
    } = todo;

    let mut collection = remote.lock();
    let todo = Todo {
        id: collection.next_id,
        user_id,
        title,
        completed,
        is_loading: false,
    };
    collection.next_id += 1;
    collection.todos.push(todo.clone());

    Ok((StatusCode::CREATED, Json(todo)))
}

async fn delete_todo(State(remote): RemoteState, Path(id): Path<i64>) -> StatusCode {
    if let Err(status) = remote.check() {
        return status;
    }

    let mut collection = remote.lock();
    let before = collection.todos.len();
    collection.todos.retain(|todo| todo.id != id);
    if collection.todos.len() < before {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

pub fn router(remote: Arc<FakeRemote>) -> Router {
    Router::new()
        .route("/todos", get(get_todos).post(add_todo))
        .route("/todos/:id", delete(delete_todo))
        .with_state(remote)
}

pub async fn spawn_server(remote: Arc<FakeRemote>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(remote)).await.unwrap();
    });

    address
}

pub fn todo(id: i64, user_id: i64, completed: bool) -> Todo {
    Todo {
        id,
        user_id,
        title: format!("test {id}"),
        completed,
        is_loading: false,
    }
}
