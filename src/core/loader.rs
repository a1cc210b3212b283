//! ES-001: Episode log loading.
//!
//! Reads one `*.game.json` file and flattens `tasks[].episodes[].interactions[]`
//! into document order. A missing `tasks` field is an error; missing
//! `episodes` or `interactions` arrays count as empty.

use super::types::{GameFile, Interaction};
use std::path::Path;
use thiserror::Error;

/// Why a single log file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: JSON parse error: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: missing `tasks` field")]
    MissingTasks { path: String },
}

/// Load and flatten a log file from disk.
pub fn load_file(path: &Path) -> Result<Vec<Interaction>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_log(&content, &path.display().to_string())
}

/// Parse log content. `origin` names the source in error messages.
pub fn parse_log(content: &str, origin: &str) -> Result<Vec<Interaction>, LoadError> {
    let parse_err = |source| LoadError::Parse {
        path: origin.to_string(),
        source,
    };
    let value: serde_json::Value = serde_json::from_str(content).map_err(parse_err)?;
    if value.get("tasks").is_none() {
        return Err(LoadError::MissingTasks {
            path: origin.to_string(),
        });
    }
    let game: GameFile = serde_json::from_value(value).map_err(parse_err)?;

    Ok(game
        .tasks
        .into_iter()
        .flat_map(|task| task.episodes)
        .flat_map(|episode| episode.interactions)
        .collect())
}
