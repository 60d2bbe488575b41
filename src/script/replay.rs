use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Script, ScriptError};
use crate::config::NavigationConfig;
use crate::intercept::{InterceptingNavigator, NavOutcome};
use crate::navigation::{Navigator, PopResult, StackNavigator};

/// Result of one replayed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub index: usize,
    pub label: String,
    pub outcome: String,
    pub success: bool,
    /// Back stack after the step, top-first.
    pub back_stack: Vec<String>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}  {:<24} {:<36} [{}]",
            self.index,
            self.label,
            self.outcome,
            self.back_stack.join(", ")
        )
    }
}

/// Result of a whole replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    /// Results handed to the root-pop handler, one per pop at the root.
    pub root_pops: Vec<Option<PopResult>>,
    pub final_back_stack: Vec<String>,
}

/// Replay `script` against a fresh navigator configured from `config`.
pub fn run_script(script: &Script, config: &NavigationConfig) -> Result<ReplayReport, ScriptError> {
    let root_pops = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&root_pops);
    let stack = StackNavigator::with_root(script.root.clone(), move |result| {
        tracing::info!(has_result = result.is_some(), "Root pop requested");
        sink.lock().push(result);
    });

    let mut navigator = InterceptingNavigator::from_config(stack, config);
    for spec in &script.interceptors {
        navigator = navigator.with_interceptor(spec.clone());
    }
    navigator.publish_back_stack();

    let mut steps = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let outcome = navigator
            .navigate(step.intent())
            .map_err(|source| ScriptError::Intercept { step: index, source })?;
        tracing::debug!(step = index, label = %step.label(), success = outcome.is_success(), "Replayed step");
        steps.push(StepReport {
            index,
            label: step.label(),
            success: outcome.is_success(),
            outcome: describe(&outcome),
            back_stack: navigator.peek_back_stack(),
        });
    }

    let root_pops = std::mem::take(&mut *root_pops.lock());
    Ok(ReplayReport {
        steps,
        root_pops,
        final_back_stack: navigator.peek_back_stack(),
    })
}

fn describe(outcome: &NavOutcome<String>) -> String {
    match outcome {
        NavOutcome::WentTo(true) => "applied".to_string(),
        NavOutcome::WentTo(false) => "ignored (already on top)".to_string(),
        NavOutcome::Popped(Some(screen)) => format!("popped {screen}"),
        NavOutcome::Popped(None) => "root pop".to_string(),
        NavOutcome::Reset(screens) => format!("reset (returned {})", screens.join(", ")),
        NavOutcome::Consumed => "consumed by interceptor".to_string(),
        NavOutcome::Blocked(failure) => {
            let reason = failure
                .as_ref()
                .and_then(|failure| failure.reason.as_deref())
                .unwrap_or("no reason given");
            format!("blocked: {reason}")
        }
    }
}
