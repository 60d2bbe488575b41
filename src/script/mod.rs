//! Declarative navigation scripts for the `navkeep replay` command.
//!
//! A script names a root screen, a list of interceptors and a list of steps:
//!
//! ```toml
//! root = "home"
//!
//! [[interceptors]]
//! kind = "block"
//! screen = "admin"
//! reason = "signed out"
//!
//! [[steps]]
//! action = "go_to"
//! screen = "admin"
//! ```

mod interceptor;
mod replay;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intercept::{InterceptError, NavigationIntent};
use crate::navigation::{PopResult, StateOptions};

pub use interceptor::InterceptorSpec;
pub use replay::{run_script, ReplayReport, StepReport};

/// Errors that can occur when loading or replaying a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse script '{origin}': {source}")]
    ParseError {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid script: {message}")]
    ValidationError { message: String },

    #[error("Step {step} failed: {source}")]
    Intercept {
        step: usize,
        #[source]
        source: InterceptError,
    },
}

/// A parsed replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub root: String,
    #[serde(default)]
    pub interceptors: Vec<InterceptorSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One navigation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    GoTo {
        screen: String,
    },
    Pop {
        #[serde(default)]
        result: Option<serde_json::Value>,
    },
    ResetRoot {
        screen: String,
        #[serde(default)]
        save: bool,
        #[serde(default)]
        restore: bool,
        #[serde(default)]
        clear: bool,
    },
}

impl Step {
    pub fn intent(&self) -> NavigationIntent<String> {
        match self {
            Step::GoTo { screen } => NavigationIntent::GoTo(screen.clone()),
            Step::Pop { result } => NavigationIntent::Pop(result.clone().map(PopResult::new)),
            Step::ResetRoot {
                screen,
                save,
                restore,
                clear,
            } => NavigationIntent::reset_root(
                screen.clone(),
                StateOptions::new(*save, *restore).with_clear(*clear),
            ),
        }
    }

    /// Short label for reports, e.g. `go_to detail`.
    pub fn label(&self) -> String {
        match self {
            Step::GoTo { screen } => format!("go_to {screen}"),
            Step::Pop { result: None } => "pop".to_string(),
            Step::Pop { result: Some(value) } => format!("pop {value}"),
            Step::ResetRoot { screen, .. } => format!("reset_root {screen}"),
        }
    }
}

impl Script {
    /// Loads and validates a script file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path).map_err(|e| ScriptError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parses and validates script text. `origin` names it in errors.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ScriptError> {
        let script: Script = toml::from_str(content).map_err(|e| ScriptError::ParseError {
            origin: origin.to_string(),
            source: e,
        })?;
        script.validate()?;
        Ok(script)
    }

    /// Checks that every screen name is non-blank.
    pub fn validate(&self) -> Result<(), ScriptError> {
        let blank = |name: &str| name.trim().is_empty();
        if blank(&self.root) {
            return Err(ScriptError::ValidationError {
                message: "root screen must not be empty".to_string(),
            });
        }
        for (index, spec) in self.interceptors.iter().enumerate() {
            if spec.screens().into_iter().any(blank) {
                return Err(ScriptError::ValidationError {
                    message: format!("interceptor {index} names an empty screen"),
                });
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            let screen = match step {
                Step::GoTo { screen } | Step::ResetRoot { screen, .. } => screen,
                Step::Pop { .. } => continue,
            };
            if blank(screen) {
                return Err(ScriptError::ValidationError {
                    message: format!("step {index} names an empty screen"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps_and_interceptors() {
        let script = Script::parse(
            r#"
root = "home"

[[interceptors]]
kind = "rewrite"
from = "legacy"
to = "detail"

[[steps]]
action = "go_to"
screen = "legacy"

[[steps]]
action = "pop"
result = "saved"

[[steps]]
action = "reset_root"
screen = "settings"
save = true
"#,
            "inline",
        )
        .unwrap();

        assert_eq!(script.root, "home");
        assert_eq!(
            script.interceptors,
            vec![InterceptorSpec::Rewrite {
                from: "legacy".into(),
                to: "detail".into()
            }]
        );
        assert_eq!(script.steps.len(), 3);
        assert_eq!(
            script.steps[2].intent(),
            NavigationIntent::reset_root("settings".to_string(), StateOptions::new(true, false))
        );
        assert_eq!(script.steps[1].label(), "pop \"saved\"");
    }

    #[test]
    fn blank_root_is_rejected() {
        let err = Script::parse("root = \" \"", "inline").unwrap_err();
        assert!(matches!(err, ScriptError::ValidationError { .. }));
    }

    #[test]
    fn unknown_action_is_a_parse_error() {
        let err = Script::parse(
            "root = \"home\"\n[[steps]]\naction = \"fly\"\n",
            "inline",
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::ParseError { .. }));
    }
}
