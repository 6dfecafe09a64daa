//! testcraft core library.
//!
//! Infers and enforces conventions for a corpus of JS/TS test files: scans
//! existing tests for structural and stylistic patterns, validates a file
//! against a configurable rule set, and instantiates templates in the same
//! style. Everything is bounded lexical heuristics over raw text; nothing
//! here parses JavaScript.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Config discovery, embedded defaults and the one-level merge.
//! - `sandbox`: Path resolution confined to the project root, bounded reads.
//! - `scan`: Test-file discovery, source lookup and the project tree.
//! - `analysis`: Per-file detectors, snippet extraction and aggregation.
//! - `validate`: Rule interpreter producing a `ValidationReport`.
//! - `template`: Template lookup and placeholder substitution.
//! - `runner`: External test command under a wall-clock timeout.
//! - `ops`: The operation surface used by the CLI.
//! - `models`: Rules, style records and report structs.
//! - `output`: Human/JSON renderers.
//! - `error`: Error taxonomy.
//! - `utils`: Supporting helpers.
pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod ops;
pub mod output;
pub mod runner;
pub mod sandbox;
pub mod scan;
pub mod template;
pub mod utils;
pub mod validate;
