//! # Ledger Replay
//!
//! Loads a [`LedgerConfig`](ledger_config::LedgerConfig), runs genesis into an
//! in-memory host, then applies a JSON-lines script of funding steps and
//! ledger messages, reporting each outcome with its status code.

pub mod replay;
pub mod script;

pub use replay::{bootstrap, report, run, ReplayReport, ReplaySummary};
pub use script::{load_script, parse_script, Funding, ScriptLine, Step};
