use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_sync::{http::HttpTodoProvider, Config, TodoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_sync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::debug!("Using todos at {} for user {}", config.api_url, config.user_id);

    let provider = HttpTodoProvider::new(&config)?;
    let store = TodoStore::new(Arc::new(provider), &config);

    if let Err(err) = store.load_initial().await {
        tracing::error!("{}", err);
    }

    let view = store.view();
    for todo in &view.filtered_todos {
        tracing::info!(id = todo.id, completed = todo.completed, "{}", todo.title);
    }
    tracing::info!("{} items left", view.active_count);

    Ok(())
}
