//! Core translation logic: loading, ordering, naming, aggregation, dispatch, assembly.

pub mod actions;
pub mod assembler;
pub mod instruction;
pub mod loader;
pub mod motion;
pub mod names;
pub mod ordering;
pub mod translator;
pub mod types;
