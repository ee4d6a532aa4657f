//! `cstructinfo`: extracts struct/class and function declarations from
//! C/C++ translation units, and optionally builds a per-function
//! control-flow flowchart, emitting both as JSON.

pub mod ast;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod doxygen;
pub mod error;
pub mod extraction;
pub mod graph;
pub mod observability;
pub mod output;
