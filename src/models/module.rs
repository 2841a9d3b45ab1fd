// src/models/module.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents the 'modules' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Module {
    pub id: i64,
    pub title: String,
}
