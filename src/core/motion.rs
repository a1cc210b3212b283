//! ES-004: Motion aggregation: runs of move or turn events collapse into one
//! net-displacement instruction.
//!
//! States: idle, accumulating move, accumulating turn. A class change, any
//! non-motion event, or end of stream flushes. A run that nets out to zero
//! (within `EPSILON`) emits nothing.

use super::actions::Motion;
use super::instruction::{Arg, Instruction};
use super::types::Agent;

/// Net totals at or below this magnitude are treated as cancelled.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    Move,
    Turn,
}

/// Single open aggregation plus its running total.
#[derive(Debug)]
pub struct MotionAggregator {
    mode: Mode,
    total: f64,
    cancelled: usize,
}

impl Default for MotionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionAggregator {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            total: 0.0,
            cancelled: 0,
        }
    }

    /// Feed one motion event. `value` is the raw pose component: forward
    /// displacement for moves, yaw for turns (right turns are negated here so
    /// left is positive). Returns the instruction flushed by a class change.
    pub fn push(&mut self, motion: Motion, value: f64) -> Option<Instruction> {
        let (mode, signed) = match motion {
            Motion::Move => (Mode::Move, value),
            Motion::TurnLeft => (Mode::Turn, value),
            Motion::TurnRight => (Mode::Turn, -value),
        };
        if self.mode == mode {
            self.total += signed;
            return None;
        }
        let flushed = self.flush();
        self.mode = mode;
        self.total = signed;
        flushed
    }

    /// Close the open aggregation, emitting its net instruction if non-zero.
    pub fn flush(&mut self) -> Option<Instruction> {
        let mode = std::mem::replace(&mut self.mode, Mode::Idle);
        let total = std::mem::take(&mut self.total);
        if mode == Mode::Idle {
            return None;
        }
        if total.abs() <= EPSILON {
            self.cancelled += 1;
            return None;
        }
        let instruction = match mode {
            Mode::Move => Instruction::new(Agent::Driver, "Move", vec![Arg::Float(total)]),
            Mode::Turn if total > 0.0 => {
                Instruction::new(Agent::Driver, "TurnLeft", vec![Arg::Float(total)])
            }
            Mode::Turn => Instruction::new(Agent::Driver, "TurnRight", vec![Arg::Float(-total)]),
            Mode::Idle => return None,
        };
        Some(instruction)
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    /// Aggregations flushed with a zero net total.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(out: impl IntoIterator<Item = Option<Instruction>>) -> Vec<String> {
        out.into_iter().flatten().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_es004_move_accumulates() {
        let mut agg = MotionAggregator::new();
        let out = lines([
            agg.push(Motion::Move, 2.0),
            agg.push(Motion::Move, 1.0),
            agg.push(Motion::Move, -0.5),
            agg.flush(),
        ]);
        assert_eq!(out, vec!["Driver.Move(2.5)"]);
        assert!(agg.is_idle());
    }

    #[test]
    fn test_es004_move_cancels() {
        let mut agg = MotionAggregator::new();
        let out = lines([agg.push(Motion::Move, 1.0), agg.push(Motion::Move, -1.0), agg.flush()]);
        assert!(out.is_empty());
        assert_eq!(agg.cancelled(), 1);
    }

    #[test]
    fn test_es004_backward_is_negative() {
        let mut agg = MotionAggregator::new();
        let out = lines([agg.push(Motion::Move, -0.25), agg.flush()]);
        assert_eq!(out, vec!["Driver.Move(-0.25)"]);
    }

    #[test]
    fn test_es004_turn_sign_convention() {
        let mut agg = MotionAggregator::new();
        let right = lines([agg.push(Motion::TurnRight, 90.0), agg.flush()]);
        assert_eq!(right, vec!["Driver.TurnRight(90.0)"]);
        let left = lines([agg.push(Motion::TurnLeft, 90.0), agg.flush()]);
        assert_eq!(left, vec!["Driver.TurnLeft(90.0)"]);
    }

    #[test]
    fn test_es004_left_right_cancel() {
        let mut agg = MotionAggregator::new();
        let out = lines([
            agg.push(Motion::TurnLeft, 90.0),
            agg.push(Motion::TurnRight, 90.0),
            agg.flush(),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_es004_net_turn_right() {
        let mut agg = MotionAggregator::new();
        let out = lines([
            agg.push(Motion::TurnLeft, 90.0),
            agg.push(Motion::TurnRight, 180.0),
            agg.flush(),
        ]);
        assert_eq!(out, vec!["Driver.TurnRight(90.0)"]);
    }

    #[test]
    fn test_es004_class_change_flushes() {
        let mut agg = MotionAggregator::new();
        let out = lines([
            agg.push(Motion::Move, 1.0),
            agg.push(Motion::TurnLeft, 45.0),
            agg.push(Motion::Move, 0.5),
            agg.flush(),
        ]);
        assert_eq!(
            out,
            vec!["Driver.Move(1.0)", "Driver.TurnLeft(45.0)", "Driver.Move(0.5)"]
        );
    }

    #[test]
    fn test_es004_flush_when_idle() {
        let mut agg = MotionAggregator::new();
        assert!(agg.flush().is_none());
        assert_eq!(agg.cancelled(), 0);
    }

    #[test]
    fn test_es004_zero_delta_discarded() {
        let mut agg = MotionAggregator::new();
        let out = lines([agg.push(Motion::Move, 0.0), agg.flush()]);
        assert!(out.is_empty());
    }
}
