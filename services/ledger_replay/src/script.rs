//! JSON-lines replay scripts
//!
//! One step per line. Blank lines and lines starting with `#` are skipped.
//! Besides the ledger messages (`deposit`, `swap`, `withdraw`,
//! `update_params`) a script may `fund` an external account:
//!
//! ```text
//! {"op":"fund","account":"cosmos1...","coin":{"denom":"ETH","amount":100}}
//! {"op":"deposit","liquidity_provider":"cosmos1...","token":{"denom":"ETH","amount":100}}
//! ```

use anyhow::{Context, Result};
use pool_ledger::Msg;
use pool_types::Coin;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    pub account: String,
    pub coin: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Fund(Funding),
    Deliver(Msg),
}

/// A parsed step and the script line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

fn parse_step(text: &str) -> Result<Step> {
    let value: serde_json::Value = serde_json::from_str(text).context("Invalid JSON")?;
    let op = value
        .get("op")
        .and_then(serde_json::Value::as_str)
        .context("Missing \"op\" field")?
        .to_owned();

    if op == "fund" {
        let funding = serde_json::from_value(value).context("Invalid fund step")?;
        return Ok(Step::Fund(funding));
    }
    let msg = serde_json::from_value(value).with_context(|| format!("Invalid {op} step"))?;
    Ok(Step::Deliver(msg))
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptLine>> {
    content
        .lines()
        .enumerate()
        .map(|(index, text)| (index + 1, text.trim()))
        .filter(|(_, text)| !text.is_empty() && !text.starts_with('#'))
        .map(|(line, text)| {
            let step = parse_step(text).with_context(|| format!("Script line {line}"))?;
            Ok(ScriptLine { line, step })
        })
        .collect()
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptLine>> {
    info!("Loading replay script from {:?}", path);
    let content = fs::read_to_string(path).context("Failed to read replay script")?;
    let steps = parse_script(&content)?;
    info!("Parsed {} steps", steps.len());
    Ok(steps)
}
