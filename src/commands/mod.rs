//! Command-line command handlers for sunpredict.
//!
//! `predict` is the default action; `help` explains it.

pub mod help;
pub mod predict;
