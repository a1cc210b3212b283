//! ES-011: Annotation seams for downstream language-model passes.
//!
//! The passes themselves are external. This module fixes the text format they
//! exchange: one block per file (`File: <path>` followed by one action per
//! line), blocks separated by a blank line, comments appended as `// ...`,
//! goals as `# GOAL: ...`, and removal markers as `# REMOVE: <reason>`.
//! Action text is never altered.

use crate::core::types::SequenceRecord;
use tracing::warn;

/// Comment written when an annotator fails.
pub const UNAVAILABLE: &str = "Annotation unavailable";

const DIALOGUE_VERBS: [&str; 2] = ["Say", "Speech"];

/// Produces a short natural-language comment for one action.
pub trait ActionAnnotator {
    fn annotate(&self, action: &str, record: &SequenceRecord) -> Result<String, String>;
}

/// Rewrites a whole annotated block (goal line, removal markers).
pub trait BlockSimplifier {
    fn simplify(&self, block: &str) -> Result<String, String>;
}

/// Verb of an instruction line: `Driver.PickUp('Mug')` → `PickUp`.
pub fn verb_of(action: &str) -> Option<&str> {
    let (_, rest) = action.split_once('.')?;
    let end = rest.find('(')?;
    Some(&rest[..end])
}

pub fn is_dialogue(action: &str) -> bool {
    verb_of(action).is_some_and(|v| DIALOGUE_VERBS.contains(&v))
}

/// Render records as annotated blocks. Dialogue lines get no comment.
pub fn render_annotated(records: &[SequenceRecord], annotator: &dyn ActionAnnotator) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!("File: {}\n", record.file));
        for action in &record.actions {
            if is_dialogue(action) {
                out.push_str(&format!("{},\n", action));
                continue;
            }
            let comment = annotator.annotate(action, record).unwrap_or_else(|e| {
                warn!(action = %action, error = %e, "annotation failed");
                UNAVAILABLE.to_string()
            });
            out.push_str(&format!("{}, // {}\n", action, single_line(&comment)));
        }
        out.push('\n');
    }
    out
}

/// Collapse all whitespace runs (newlines included) to one space.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run a simplifier over each block, keeping the original block on failure.
pub fn simplify_blocks(text: &str, simplifier: &dyn BlockSimplifier) -> String {
    text.trim()
        .split("\n\n")
        .map(|block| match simplifier.simplify(block) {
            Ok(processed) => processed.trim().to_string(),
            Err(e) => {
                warn!(error = %e, "simplifier failed, keeping block");
                block.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One parsed line of an annotated block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotatedLine {
    File(String),
    Goal(String),
    Action {
        action: String,
        comment: Option<String>,
        remove: Option<String>,
    },
}

/// Parse one line of annotated output. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<AnnotatedLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(path) = line.strip_prefix("File:") {
        return Some(AnnotatedLine::File(path.trim().to_string()));
    }
    if let Some(goal) = line.strip_prefix("# GOAL:") {
        return Some(AnnotatedLine::Goal(goal.trim().to_string()));
    }

    let (body, remove) = match line.split_once("# REMOVE:") {
        Some((body, reason)) => (body, Some(reason.trim().to_string())),
        None => (line, None),
    };
    let close = action_end(body);
    let action = body[..close].trim().to_string();
    let comment = body[close..]
        .split_once("//")
        .map(|(_, c)| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Some(AnnotatedLine::Action {
        action,
        comment,
        remove,
    })
}

/// Byte offset just past the first `)` outside a quoted argument,
/// or the whole line when there is none.
fn action_end(body: &str) -> usize {
    let mut in_quote = false;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quote => escaped = true,
            '\'' => in_quote = !in_quote,
            ')' if !in_quote => return i + 1,
            _ => {}
        }
    }
    body.len()
}

/// Actions of a block that carry no removal marker, in order.
pub fn kept_actions(block: &str) -> Vec<String> {
    block
        .lines()
        .filter_map(parse_line)
        .filter_map(|line| match line {
            AnnotatedLine::Action {
                action,
                remove: None,
                ..
            } => Some(action),
            _ => None,
        })
        .collect()
}
