use std::{convert::Infallible, fmt, str::FromStr};

use crate::todo::Todo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !todo.completed,
            FilterMode::Completed => todo.completed,
        }
    }
}

/// Anything that is not a known mode falls back to `All`.
impl FromStr for FilterMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_lowercase().as_str() {
            "active" => FilterMode::Active,
            "completed" => FilterMode::Completed,
            _ => FilterMode::All,
        };
        Ok(mode)
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterMode::All => "All",
            FilterMode::Active => "Active",
            FilterMode::Completed => "Completed",
        };
        f.write_str(name)
    }
}

/// The items shown for `mode`, in list order.
pub fn visible(todos: &[Todo], mode: FilterMode) -> Vec<Todo> {
    todos
        .iter()
        .filter(|todo| mode.matches(todo))
        .cloned()
        .collect()
}
