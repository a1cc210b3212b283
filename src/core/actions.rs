//! ES-005: Action code classification and instruction dispatch table.

/// Administrative codes dropped for every agent:
/// progress checks, panning, stop, move-to, look and elevation.
pub const SKIPPED: [i64; 11] = [500, 501, 502, 8, 9, 0, 1, 6, 7, 10, 11];

/// Locomotion codes dropped when the Commander performs them.
pub const COMMANDER_MOTION: [i64; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 10, 11, 12, 13];

/// Forward, backward, double forward, double backward.
pub const MOVE_CODES: [i64; 4] = [2, 3, 12, 13];

pub const TURN_LEFT: i64 = 4;
pub const TURN_RIGHT: i64 = 5;

/// A Driver motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Move,
    TurnLeft,
    TurnRight,
}

pub fn is_skipped(code: i64) -> bool {
    SKIPPED.contains(&code)
}

pub fn is_commander_motion(code: i64) -> bool {
    COMMANDER_MOTION.contains(&code)
}

pub fn motion_of(code: i64) -> Option<Motion> {
    if MOVE_CODES.contains(&code) {
        Some(Motion::Move)
    } else if code == TURN_LEFT {
        Some(Motion::TurnLeft)
    } else if code == TURN_RIGHT {
        Some(Motion::TurnRight)
    } else {
        None
    }
}

/// How an action's arguments are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// `Verb('utterance')`
    Utterance,
    /// `Verb(repeat)`
    Repeat,
    /// `Verb('object')`
    Object,
    /// `Verb('object')`, and the object becomes the held object
    PickUp,
    /// `Verb('held', 'object')`; emitted only while something is held
    Paired,
    /// `Verb()`
    Bare,
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub code: i64,
    pub verb: &'static str,
    pub template: Template,
    pub requires_success: bool,
}

const fn spec(code: i64, verb: &'static str, template: Template, requires_success: bool) -> ActionSpec {
    ActionSpec {
        code,
        verb,
        template,
        requires_success,
    }
}

/// Every code that produces an instruction. Codes not listed produce nothing.
pub const ACTION_TABLE: &[ActionSpec] = &[
    spec(100, "Say", Template::Utterance, false),
    spec(101, "Speech", Template::Utterance, false),
    spec(102, "Beep", Template::Repeat, false),
    spec(200, "PickUp", Template::PickUp, true),
    spec(201, "PutAOnB", Template::Paired, true),
    spec(202, "Open", Template::Object, true),
    spec(203, "Close", Template::Object, true),
    spec(204, "ToggleOn", Template::Object, true),
    spec(205, "ToggleOff", Template::Object, true),
    spec(206, "Slice", Template::Object, true),
    spec(207, "Dirty", Template::Object, true),
    spec(208, "Clean", Template::Object, true),
    spec(209, "Fill", Template::Object, true),
    spec(210, "Empty", Template::Object, true),
    spec(211, "PourFromAIntoB", Template::Paired, true),
    spec(212, "Break", Template::Object, true),
    spec(300, "Navigation", Template::Bare, false),
    spec(400, "BehindAboveOn", Template::Bare, false),
    spec(401, "BehindAboveOff", Template::Bare, false),
];

/// Look up the dispatch row for an action code.
pub fn lookup(code: i64) -> Option<&'static ActionSpec> {
    ACTION_TABLE.iter().find(|s| s.code == code)
}
