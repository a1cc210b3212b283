//! ES-007: Instruction rendering: `Agent.Verb(arg1[, arg2])`.
//!
//! String arguments are single-quoted with `'` escaped as `\'`.
//! Numbers render as plain decimals: floats keep a fractional part
//! (`90.0`, `2.5`) and never use exponent notation.

use super::types::Agent;
use std::fmt;

/// One argument of an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Text(String),
    Float(f64),
    Count(serde_json::Number),
}

/// A rendered-on-demand instruction line.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub agent: Agent,
    pub verb: &'static str,
    pub args: Vec<Arg>,
}

impl Instruction {
    pub fn new(agent: Agent, verb: &'static str, args: Vec<Arg>) -> Self {
        Self { agent, verb, args }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.agent, self.verb)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match arg {
                Arg::Text(s) => write!(f, "'{}'", escape_single_quotes(s))?,
                Arg::Float(v) => write!(f, "{}", format_float(*v))?,
                Arg::Count(n) => write!(f, "{}", n)?,
            }
        }
        write!(f, ")")
    }
}

/// Escape `'` so the text can sit inside a single-quoted argument.
pub fn escape_single_quotes(text: &str) -> String {
    text.replace('\'', "\\'")
}

/// Shortest round-trip decimal, falling back to positional form
/// when the shortest form would use an exponent. Always has a `.`.
pub fn format_float(value: f64) -> String {
    let short = format!("{:?}", value);
    if !short.contains('e') {
        return short;
    }
    let positional = format!("{}", value);
    if positional.contains('.') {
        positional
    } else {
        format!("{}.0", positional)
    }
}
