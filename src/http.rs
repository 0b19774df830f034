use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::{
    config::Config,
    provider::{TodoProvider, TransportError},
    todo::{NewTodo, Todo},
};

/// Talks to the remote `/todos` collection over HTTP.
#[derive(Clone)]
pub struct HttpTodoProvider {
    client: Client,
    api_url: String,
}

impl HttpTodoProvider {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;

        Ok(HttpTodoProvider {
            client,
            api_url: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

async fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl TodoProvider for HttpTodoProvider {
    async fn get_todos(&self, user_id: i64) -> Result<Vec<Todo>, TransportError> {
        let response = self
            .client
            .get(self.url("/todos"))
            .query(&[("userId", user_id)])
            .send()
            .await?;
        let todos = check_status(response).await?.json().await?;
        Ok(todos)
    }

    async fn add_todo(&self, todo: &NewTodo) -> Result<Todo, TransportError> {
        let response = self
            .client
            .post(self.url("/todos"))
            .json(todo)
            .send()
            .await?;
        let todo = check_status(response).await?.json().await?;
        Ok(todo)
    }

    async fn delete_todo(&self, id: i64) -> Result<(), TransportError> {
        let response = self
            .client
            .delete(self.url(&format!("/todos/{id}")))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
