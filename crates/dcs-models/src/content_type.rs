//! Content type classification labels.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coarse content category assigned to a detected moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Reaction,
    Gameplay,
    Tutorial,
    Vlog,
    Entertainment,
    News,
    /// Fallback when visual classification fails.
    #[serde(other)]
    Unknown,
}

impl ContentType {
    /// All classifiable categories (excludes the `Unknown` fallback).
    pub const CATEGORIES: [ContentType; 6] = [
        ContentType::Reaction,
        ContentType::Gameplay,
        ContentType::Tutorial,
        ContentType::Vlog,
        ContentType::Entertainment,
        ContentType::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Reaction => "reaction",
            ContentType::Gameplay => "gameplay",
            ContentType::Tutorial => "tutorial",
            ContentType::Vlog => "vlog",
            ContentType::Entertainment => "entertainment",
            ContentType::News => "news",
            ContentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Unknown
    }
}
