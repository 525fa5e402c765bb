use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the players table
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromRow, Serialize, Deserialize)]
pub struct PlayerModel {
    pub id: String, // UUID assigned by the store
    pub name: String,
}

impl PlayerModel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
