use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
    /// Set while a delete for this item is in flight. Never sent to the remote service.
    #[serde(skip)]
    pub is_loading: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

impl NewTodo {
    pub fn new(user_id: i64, title: impl Into<String>) -> Self {
        NewTodo {
            user_id,
            title: title.into(),
            completed: false,
        }
    }
}
