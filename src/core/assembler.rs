//! ES-006: Per-file sequence assembly.
//!
//! load → order → translate (aggregator first, non-motion flushes) → final flush
//! → `{file, actions}`.

use super::loader::{self, LoadError};
use super::ordering;
use super::translator::Translator;
use super::types::{FileTranslation, Interaction, SequenceRecord};
use std::path::Path;
use tracing::debug;

/// Translate one log file from disk.
pub fn translate_file(path: &Path) -> Result<FileTranslation, LoadError> {
    let interactions = loader::load_file(path)?;
    Ok(translate_interactions(&path.display().to_string(), interactions))
}

/// Translate an already-loaded interaction list (document order).
pub fn translate_interactions(file: &str, interactions: Vec<Interaction>) -> FileTranslation {
    let mut translator = Translator::new();
    for interaction in &ordering::order(interactions) {
        translator.feed(interaction);
    }
    let (actions, stats) = translator.finish();

    debug!(
        file,
        interactions = stats.interactions,
        emitted = stats.emitted,
        failed = stats.failed,
        unknown = stats.unknown,
        unpaired = stats.unpaired,
        "translated"
    );

    FileTranslation {
        record: SequenceRecord {
            file: file.to_string(),
            actions,
        },
        stats,
    }
}
