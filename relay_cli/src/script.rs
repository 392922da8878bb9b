use std::{fs, path::Path};

use anyhow::Context;
use relay_core::input::events::Key;
use relay_schema::Millis;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("S1001: script has no steps")]
    Empty,

    #[error("S1002: step {index} at {at_ms}ms comes before the previous step at {previous_ms}ms")]
    OutOfOrder {
        index: usize,
        at_ms: Millis,
        previous_ms: Millis,
    },

    #[error("S1003: invalid script json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Record,
    Stop,
    Send,
    Play,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StepKind {
    Key {
        key: Key,
        #[serde(default = "default_pressed")]
        pressed: bool,
    },
    Action {
        action: Action,
    },
}

fn default_pressed() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Step {
    pub at_ms: Millis,
    #[serde(flatten)]
    pub kind: StepKind,
}

/// A timeline of button presses and key events, in time order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(json: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        if self.steps.is_empty() {
            return Err(ScriptError::Empty);
        }
        for (index, pair) in self.steps.windows(2).enumerate() {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(ScriptError::OutOfOrder {
                    index: index + 1,
                    at_ms: pair[1].at_ms,
                    previous_ms: pair[0].at_ms,
                });
            }
        }
        Ok(())
    }

    pub fn end_ms(&self) -> Millis {
        self.steps.last().map_or(0, |s| s.at_ms)
    }
}

pub fn load_script_from_path(path: impl AsRef<Path>) -> anyhow::Result<Script> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read script: {}", path.display()))?;
    let script = Script::parse(&text)
        .with_context(|| format!("failed to load script: {}", path.display()))?;
    Ok(script)
}
