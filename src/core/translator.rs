//! ES-005: Action translation: filter, aggregate, dispatch.
//!
//! Per interaction, in timeline order:
//! skip set → Commander motion → Driver motion (aggregated) → flush → dispatch table.
//!
//! The held object threads PickUp into the next PutAOnB / PourFromAIntoB.
//! Failed and unknown actions are dropped without error; every drop is counted.

use super::actions::{self, ActionSpec, Template};
use super::instruction::{Arg, Instruction};
use super::motion::MotionAggregator;
use super::names::{ObjectNames, NONE};
use super::types::{Agent, Interaction, TranslationStats};
use tracing::debug;

/// Per-file translation state.
#[derive(Debug, Default)]
pub struct Translator {
    names: ObjectNames,
    motion: MotionAggregator,
    held: Option<String>,
    lines: Vec<String>,
    stats: TranslationStats,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one interaction, appending any resulting lines.
    pub fn feed(&mut self, interaction: &Interaction) {
        self.stats.interactions += 1;
        let code = interaction.action_id;

        if actions::is_skipped(code) {
            self.stats.skipped_admin += 1;
            return;
        }

        let agent = interaction.agent();
        if agent == Agent::Commander && actions::is_commander_motion(code) {
            self.stats.skipped_commander_motion += 1;
            return;
        }

        if agent == Agent::Driver {
            if let Some(motion) = actions::motion_of(code) {
                self.stats.motion_events += 1;
                let component = if motion == actions::Motion::Move { 0 } else { 5 };
                if let Some(line) = self.motion.push(motion, interaction.pose_component(component)) {
                    self.emit(line);
                }
                return;
            }
        }

        self.flush_motion();

        match actions::lookup(code) {
            Some(spec) => self.dispatch(agent, spec, interaction),
            None => {
                debug!(code, agent = %agent, "no instruction for action code");
                self.stats.unknown += 1;
            }
        }
    }

    fn dispatch(&mut self, agent: Agent, spec: &ActionSpec, interaction: &Interaction) {
        if spec.requires_success && !interaction.succeeded() {
            debug!(code = spec.code, verb = spec.verb, "dropping failed action");
            self.stats.failed += 1;
            return;
        }

        let args = match spec.template {
            Template::Bare => vec![],
            Template::Utterance => {
                vec![Arg::Text(interaction.utterance.clone().unwrap_or_default())]
            }
            Template::Repeat => vec![Arg::Count(interaction.repeat.clone())],
            Template::Object => vec![Arg::Text(self.object_name(interaction))],
            Template::PickUp => {
                let name = self.object_name(interaction);
                self.held = Some(name.clone());
                vec![Arg::Text(name)]
            }
            Template::Paired => {
                let target = self.object_name(interaction);
                // Cleared on every successful attempt, paired or not.
                match self.held.take().filter(|held| held != NONE) {
                    Some(held) => vec![Arg::Text(held), Arg::Text(target)],
                    None => {
                        debug!(verb = spec.verb, target = %target, "nothing held, dropping");
                        self.stats.unpaired += 1;
                        return;
                    }
                }
            }
        };

        self.emit(Instruction::new(agent, spec.verb, args));
    }

    fn object_name(&mut self, interaction: &Interaction) -> String {
        self.names.resolve(interaction.oid.as_deref())
    }

    fn flush_motion(&mut self) {
        if let Some(line) = self.motion.flush() {
            self.emit(line);
        }
    }

    fn emit(&mut self, instruction: Instruction) {
        self.stats.emitted += 1;
        self.lines.push(instruction.to_string());
    }

    /// Name currently held, if any.
    pub fn held(&self) -> Option<&str> {
        self.held.as_deref()
    }

    /// Flush any open aggregation and return the lines with their stats.
    pub fn finish(mut self) -> (Vec<String>, TranslationStats) {
        self.flush_motion();
        self.stats.motion_cancelled = self.motion.cancelled();
        (self.lines, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(agent_id: i64, action_id: i64) -> Interaction {
        serde_json::from_value(serde_json::json!({
            "agent_id": agent_id,
            "action_id": action_id,
        }))
        .unwrap()
    }

    fn object(agent_id: i64, action_id: i64, oid: &str, success: i64) -> Interaction {
        serde_json::from_value(serde_json::json!({
            "agent_id": agent_id,
            "action_id": action_id,
            "oid": oid,
            "success": success,
        }))
        .unwrap()
    }

    fn motion(action_id: i64, pose_delta: &[f64]) -> Interaction {
        serde_json::from_value(serde_json::json!({
            "agent_id": 1,
            "action_id": action_id,
            "pose_delta": pose_delta,
        }))
        .unwrap()
    }

    fn say(agent_id: i64, action_id: i64, text: &str) -> Interaction {
        serde_json::from_value(serde_json::json!({
            "agent_id": agent_id,
            "action_id": action_id,
            "utterance": text,
        }))
        .unwrap()
    }

    fn run(events: &[Interaction]) -> (Vec<String>, TranslationStats) {
        let mut t = Translator::new();
        for e in events {
            t.feed(e);
        }
        t.finish()
    }

    #[test]
    fn test_es005_pickup_then_place() {
        let (lines, _) = run(&[object(1, 200, "Mug|1", 1), object(1, 201, "Sink|1", 1)]);
        assert_eq!(lines, vec!["Driver.PickUp('Mug')", "Driver.PutAOnB('Mug', 'Sink')"]);
    }

    #[test]
    fn test_es005_place_without_pickup_suppressed() {
        let (lines, stats) = run(&[object(1, 201, "Sink|1", 1)]);
        assert!(lines.is_empty());
        assert_eq!(stats.unpaired, 1);
    }

    #[test]
    fn test_es005_held_cleared_after_place() {
        let (lines, stats) = run(&[
            object(1, 200, "Mug|1", 1),
            object(1, 201, "Sink|1", 1),
            object(1, 201, "Counter|1", 1),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(stats.unpaired, 1);
    }

    #[test]
    fn test_es005_failed_place_keeps_held() {
        let (lines, stats) = run(&[
            object(1, 200, "Mug|1", 1),
            object(1, 201, "Sink|1", 0),
            object(1, 201, "Counter|1", 1),
        ]);
        assert_eq!(
            lines,
            vec!["Driver.PickUp('Mug')", "Driver.PutAOnB('Mug', 'Counter')"]
        );
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_es005_failed_pickup_not_held() {
        let (lines, _) = run(&[object(1, 200, "Mug|1", 0), object(1, 201, "Sink|1", 1)]);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_es005_pour_pairs_and_clears() {
        let (lines, _) = run(&[
            object(1, 200, "Cup|1", 1),
            object(1, 211, "Pot|1", 1),
            object(1, 211, "Pot|1", 1),
        ]);
        assert_eq!(
            lines,
            vec!["Driver.PickUp('Cup')", "Driver.PourFromAIntoB('Cup', 'Pot')"]
        );
    }

    #[test]
    fn test_es005_unpaired_place_still_allocates_name() {
        let (lines, _) = run(&[
            object(1, 201, "Sink|1", 1),
            object(1, 200, "Mug|1", 1),
            object(1, 201, "Sink|2", 1),
        ]);
        assert_eq!(
            lines,
            vec!["Driver.PickUp('Mug')", "Driver.PutAOnB('Mug', 'Sink2')"]
        );
    }

    #[test]
    fn test_es005_pickup_of_missing_object_is_not_held() {
        let (lines, _) = run(&[event(1, 200), object(1, 201, "Sink|1", 1)]);
        assert_eq!(lines, vec!["Driver.PickUp('None')"]);
    }

    #[test]
    fn test_es005_object_verbs() {
        let verbs = [
            (202, "Open"),
            (203, "Close"),
            (204, "ToggleOn"),
            (205, "ToggleOff"),
            (206, "Slice"),
            (207, "Dirty"),
            (208, "Clean"),
            (209, "Fill"),
            (210, "Empty"),
            (212, "Break"),
        ];
        for (code, verb) in verbs {
            let (lines, _) = run(&[object(1, code, "Fridge|1", 1)]);
            assert_eq!(lines, vec![format!("Driver.{}('Fridge')", verb)]);
            let (failed, _) = run(&[object(1, code, "Fridge|1", 0)]);
            assert!(failed.is_empty(), "failed {} should be dropped", verb);
        }
    }

    #[test]
    fn test_es005_dialogue_is_unconditional() {
        let mut failed_say = say(0, 100, "hello");
        failed_say.success = 0;
        let (lines, _) = run(&[failed_say, say(1, 101, "on it")]);
        assert_eq!(lines, vec!["Commander.Say('hello')", "Driver.Speech('on it')"]);
    }

    #[test]
    fn test_es005_say_escapes_quotes() {
        let (lines, _) = run(&[say(1, 100, "I don't see it")]);
        assert_eq!(lines, vec![r"Driver.Say('I don\'t see it')"]);
    }

    #[test]
    fn test_es005_beep_repeat() {
        let mut beep = event(0, 102);
        beep.repeat = 3.into();
        let (lines, _) = run(&[event(0, 102), beep]);
        assert_eq!(lines, vec!["Commander.Beep(1)", "Commander.Beep(3)"]);
    }

    #[test]
    fn test_es005_bare_verbs() {
        let (lines, _) = run(&[event(0, 300), event(1, 400), event(1, 401)]);
        assert_eq!(
            lines,
            vec![
                "Commander.Navigation()",
                "Driver.BehindAboveOn()",
                "Driver.BehindAboveOff()"
            ]
        );
    }

    #[test]
    fn test_es005_admin_codes_skipped() {
        let events: Vec<_> = actions::SKIPPED.iter().map(|&c| event(1, c)).collect();
        let (lines, stats) = run(&events);
        assert!(lines.is_empty());
        assert_eq!(stats.skipped_admin, actions::SKIPPED.len());
    }

    #[test]
    fn test_es005_commander_motion_skipped() {
        let (lines, stats) = run(&[
            serde_json::from_value(serde_json::json!({
                "agent_id": 0, "action_id": 2, "pose_delta": [1.0]
            }))
            .unwrap(),
            serde_json::from_value(serde_json::json!({
                "agent_id": 0, "action_id": 4, "pose_delta": [0, 0, 0, 0, 0, 90.0]
            }))
            .unwrap(),
        ]);
        assert!(lines.is_empty());
        assert_eq!(stats.skipped_commander_motion, 2);
    }

    #[test]
    fn test_es005_motion_accumulation() {
        let (lines, _) = run(&[
            motion(2, &[2.0]),
            motion(2, &[1.0]),
            motion(3, &[-0.5]),
            event(1, 300),
        ]);
        assert_eq!(lines, vec!["Driver.Move(2.5)", "Driver.Navigation()"]);
    }

    #[test]
    fn test_es005_motion_cancellation() {
        let (lines, stats) = run(&[motion(2, &[1.0]), motion(3, &[-1.0])]);
        assert!(lines.is_empty());
        assert_eq!(stats.motion_cancelled, 1);
        assert_eq!(stats.motion_events, 2);
    }

    #[test]
    fn test_es005_turns() {
        let yaw = [0.0, 0.0, 0.0, 0.0, 0.0, 90.0];
        let (right, _) = run(&[motion(5, &yaw)]);
        assert_eq!(right, vec!["Driver.TurnRight(90.0)"]);
        let (left, _) = run(&[motion(4, &yaw)]);
        assert_eq!(left, vec!["Driver.TurnLeft(90.0)"]);
    }

    #[test]
    fn test_es005_turn_without_yaw_component() {
        let (lines, _) = run(&[motion(4, &[1.0, 2.0])]);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_es005_skipped_code_does_not_flush() {
        // Look-up (6) is dropped before the aggregator sees it.
        let (lines, _) = run(&[motion(2, &[1.0]), event(1, 6), motion(2, &[1.0])]);
        assert_eq!(lines, vec!["Driver.Move(2.0)"]);
    }

    #[test]
    fn test_es005_unknown_code_flushes_and_counts() {
        let (lines, stats) = run(&[motion(2, &[1.0]), event(1, 999), motion(2, &[1.0])]);
        assert_eq!(lines, vec!["Driver.Move(1.0)", "Driver.Move(1.0)"]);
        assert_eq!(stats.unknown, 1);
    }

    #[test]
    fn test_es005_held_accessor() {
        let mut t = Translator::new();
        t.feed(&object(1, 200, "Apple|1", 1));
        assert_eq!(t.held(), Some("Apple"));
        t.feed(&object(1, 201, "Plate|1", 1));
        assert_eq!(t.held(), None);
    }

    #[test]
    fn test_es005_stats_emitted_matches_lines() {
        let (lines, stats) = run(&[
            say(0, 100, "hi"),
            motion(2, &[1.0]),
            object(1, 200, "Mug|1", 1),
            object(1, 201, "Sink|1", 1),
        ]);
        assert_eq!(stats.emitted, lines.len());
        assert_eq!(stats.interactions, 4);
    }
}
