//! ES-001: Episode log and sequence record types.
//!
//! Input side mirrors the `*.game.json` layout (tasks → episodes → interactions).
//! Output side is the `{file, actions}` record written per translated file.
//! Unknown fields in the log are ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Episode logs (*.game.json)
// ============================================================================

/// Root of one episode file.
#[derive(Debug, Clone, Deserialize)]
pub struct GameFile {
    /// Tasks in document order
    pub tasks: Vec<Task>,
}

/// One task inside a game file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// One episode inside a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One logged event performed by an agent.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    /// 0 = Commander, anything else = Driver
    pub agent_id: i64,

    /// Environment action code
    pub action_id: i64,

    /// 1 = success, 0 = failure (`true`/`false` accepted)
    #[serde(default = "default_success", deserialize_with = "deserialize_success")]
    pub success: i64,

    /// Dialogue text for Say/Speech
    #[serde(default)]
    pub utterance: Option<String>,

    /// Pose change vector (index 0 = forward, index 5 = yaw)
    #[serde(default)]
    pub pose_delta: Vec<f64>,

    /// Raw environment object identifier (`Type|x|y|z`)
    #[serde(default)]
    pub oid: Option<String>,

    /// Simulated start time
    #[serde(default)]
    pub time_start: f64,

    /// Beep repeat count
    #[serde(default = "default_repeat")]
    pub repeat: serde_json::Number,
}

fn default_success() -> i64 {
    1
}

/// Accept integer, float and boolean success flags. Anything that is not
/// exactly one (`null` included) reads as failure.
fn deserialize_success<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => Ok(i64::from(b)),
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(n) => Ok(match n.as_i64() {
            Some(v) => v,
            None => i64::from(n.as_f64() == Some(1.0)),
        }),
        other => Err(serde::de::Error::custom(format!(
            "invalid success flag: {}",
            other
        ))),
    }
}

fn default_repeat() -> serde_json::Number {
    serde_json::Number::from(1)
}

impl Interaction {
    /// Whether the environment reported the action as successful.
    pub fn succeeded(&self) -> bool {
        self.success == 1
    }

    /// Component `index` of the pose delta, 0.0 when the vector is too short.
    pub fn pose_component(&self, index: usize) -> f64 {
        self.pose_delta.get(index).copied().unwrap_or(0.0)
    }

    pub fn agent(&self) -> Agent {
        Agent::from_id(self.agent_id)
    }
}

// ============================================================================
// Agents
// ============================================================================

/// The two roles in an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Agent {
    Commander,
    Driver,
}

impl Agent {
    pub fn from_id(agent_id: i64) -> Self {
        if agent_id == 0 {
            Self::Commander
        } else {
            Self::Driver
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commander => write!(f, "Commander"),
            Self::Driver => write!(f, "Driver"),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Translated instruction sequence for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Input path as given to the translator
    pub file: String,

    /// Instruction lines in timeline order
    pub actions: Vec<String>,
}

/// Counters for interactions that produced no instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    /// Interactions read from the file
    pub interactions: usize,

    /// Instruction lines emitted
    pub emitted: usize,

    /// Progress checks, panning, stop, look and elevation codes
    pub skipped_admin: usize,

    /// Commander locomotion
    pub skipped_commander_motion: usize,

    /// Object actions reported as failed
    pub failed: usize,

    /// Codes with no instruction template
    pub unknown: usize,

    /// Placements and pours with nothing held
    pub unpaired: usize,

    /// Move/turn events folded into the aggregator
    pub motion_events: usize,

    /// Aggregations whose net displacement was zero
    pub motion_cancelled: usize,
}

/// Result of translating one file.
#[derive(Debug, Clone)]
pub struct FileTranslation {
    pub record: SequenceRecord,
    pub stats: TranslationStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_es001_interaction_defaults() {
        let i: Interaction = serde_json::from_str(r#"{"agent_id": 1, "action_id": 200}"#).unwrap();
        assert_eq!(i.success, 1);
        assert!(i.succeeded());
        assert!(i.utterance.is_none());
        assert!(i.pose_delta.is_empty());
        assert!(i.oid.is_none());
        assert_eq!(i.time_start, 0.0);
        assert_eq!(i.repeat.to_string(), "1");
    }

    #[test]
    fn test_es001_interaction_ignores_unknown_fields() {
        let i: Interaction = serde_json::from_str(
            r#"{"agent_id": 0, "action_id": 100, "utterance": "hi", "duration": 1, "query": "x"}"#,
        )
        .unwrap();
        assert_eq!(i.agent(), Agent::Commander);
        assert_eq!(i.utterance.as_deref(), Some("hi"));
    }

    #[test]
    fn test_es001_success_accepts_bool_and_float() {
        let parse = |raw: &str| -> Interaction {
            serde_json::from_str(&format!(
                r#"{{"agent_id": 1, "action_id": 200, "success": {}}}"#,
                raw
            ))
            .unwrap()
        };
        assert!(parse("true").succeeded());
        assert!(!parse("false").succeeded());
        assert!(parse("1").succeeded());
        assert!(parse("1.0").succeeded());
        assert!(!parse("0").succeeded());
        assert!(!parse("0.5").succeeded());
        assert!(!parse("null").succeeded());

        let bad = serde_json::from_str::<Interaction>(
            r#"{"agent_id": 1, "action_id": 200, "success": "yes"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_es001_null_oid_is_absent() {
        let i: Interaction =
            serde_json::from_str(r#"{"agent_id": 1, "action_id": 202, "oid": null}"#).unwrap();
        assert!(i.oid.is_none());
    }

    #[test]
    fn test_es001_pose_component_defaults() {
        let i: Interaction = serde_json::from_str(
            r#"{"agent_id": 1, "action_id": 2, "pose_delta": [0.25, 0, 0]}"#,
        )
        .unwrap();
        assert_eq!(i.pose_component(0), 0.25);
        assert_eq!(i.pose_component(5), 0.0);
    }

    #[test]
    fn test_es001_agent_from_id() {
        assert_eq!(Agent::from_id(0), Agent::Commander);
        assert_eq!(Agent::from_id(1), Agent::Driver);
        assert_eq!(Agent::from_id(7), Agent::Driver);
        assert_eq!(Agent::Commander.to_string(), "Commander");
        assert_eq!(Agent::Driver.to_string(), "Driver");
    }

    #[test]
    fn test_es001_record_json_shape() {
        let record = SequenceRecord {
            file: "a.game.json".to_string(),
            actions: vec!["Driver.Navigation()".to_string()],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"file":"a.game.json","actions":["Driver.Navigation()"]}"#);
    }
}
