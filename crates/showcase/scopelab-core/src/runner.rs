//! Animation step runner.
//!
//! Drives one target through an ordered list of animations: apply marker, log
//! progress, wait, remove marker. Steps of one run never overlap. Runs against
//! different targets interleave freely at their delays; a second run against a
//! target whose run is still in flight is rejected.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationName;
use crate::clock::Clock;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::ScopelabError;
use crate::formatter::Severity;
use crate::ids::{IdAllocator, RunId};
use crate::result_log::ResultLog;
use crate::surface::UiSurface;
use crate::Result;

pub const COMPLETION_MESSAGE: &str = "Animation sequence completed!";

/// Completion signal of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run: RunId,
    pub target: String,
    pub steps_completed: usize,
}

/// Transient state of one run. `index` stays in `[0, steps.len()]`.
#[derive(Debug)]
struct SequenceRun<'a> {
    id: RunId,
    target: &'a str,
    steps: &'a [AnimationName],
    delay: Duration,
    index: usize,
}

impl<'a> SequenceRun<'a> {
    fn current(&self) -> Option<AnimationName> {
        self.steps.get(self.index).copied()
    }

    fn advance(&mut self) {
        if self.index < self.steps.len() {
            self.index += 1;
        }
    }

    fn progress_message(&self, step: AnimationName) -> String {
        format!("Animation {}/{}: {}", self.index + 1, self.steps.len(), step)
    }
}

/// Holds a target in the in-flight set until dropped.
struct ActiveTarget<'a> {
    active: &'a RefCell<HashSet<String>>,
    target: String,
}

impl Drop for ActiveTarget<'_> {
    fn drop(&mut self) {
        self.active.borrow_mut().remove(&self.target);
    }
}

pub struct StepRunner {
    surface: Rc<dyn UiSurface>,
    clock: Rc<dyn Clock>,
    log: Rc<ResultLog>,
    diagnostics: Diagnostics,
    default_delay: Duration,
    ids: RefCell<IdAllocator>,
    active: RefCell<HashSet<String>>,
}

impl StepRunner {
    pub fn new(
        surface: Rc<dyn UiSurface>,
        clock: Rc<dyn Clock>,
        log: Rc<ResultLog>,
        diagnostics: Diagnostics,
        cfg: &Config,
    ) -> Self {
        Self {
            surface,
            clock,
            log,
            diagnostics,
            default_delay: Duration::from_millis(cfg.step_delay_ms),
            ids: RefCell::new(IdAllocator::new()),
            active: RefCell::new(HashSet::new()),
        }
    }

    #[inline]
    pub fn default_delay(&self) -> Duration {
        self.default_delay
    }

    /// Whether a run against `target` is currently in flight.
    pub fn is_running(&self, target: &str) -> bool {
        self.active.borrow().contains(target)
    }

    fn acquire(&self, target: &str) -> Result<ActiveTarget<'_>> {
        if !self.surface.contains(target) {
            return Err(self
                .diagnostics
                .raise("runner.run", ScopelabError::not_found(target)));
        }
        if !self.active.borrow_mut().insert(target.to_string()) {
            return Err(self.diagnostics.raise(
                "runner.run",
                ScopelabError::RunInProgress {
                    target: target.to_string(),
                },
            ));
        }
        Ok(ActiveTarget {
            active: &self.active,
            target: target.to_string(),
        })
    }

    fn note(&self, message: &str, severity: Severity) {
        if let Err(err) = self.log.append(message, None, severity) {
            log::debug!("run entry not logged: {err}");
        }
    }

    fn clear_animation_markers(&self, target: &str) -> Result<()> {
        for name in AnimationName::ALL {
            self.surface.remove_marker(target, name.marker())?;
        }
        Ok(())
    }

    /// Run `steps` against `target`, waiting `delay` (default from config)
    /// between applying and removing each marker.
    pub async fn run(
        &self,
        target: &str,
        steps: &[AnimationName],
        delay: Option<Duration>,
    ) -> Result<RunSummary> {
        let _guard = self.acquire(target)?;
        let mut run = SequenceRun {
            id: self.ids.borrow_mut().alloc_run(),
            target,
            steps,
            delay: delay.unwrap_or(self.default_delay),
            index: 0,
        };
        log::info!(
            "{}: {} step(s) on '{}' every {:?}",
            run.id,
            steps.len(),
            run.target,
            run.delay
        );

        self.clear_animation_markers(target)
            .map_err(|e| self.diagnostics.raise("runner.run", e))?;

        while let Some(step) = run.current() {
            self.surface
                .add_marker(target, step.marker())
                .map_err(|e| self.diagnostics.raise("runner.run", e))?;
            self.note(&run.progress_message(step), Severity::Info);
            self.clock.sleep(run.delay).await;
            self.surface
                .remove_marker(target, step.marker())
                .map_err(|e| self.diagnostics.raise("runner.run", e))?;
            run.advance();
        }

        self.note(COMPLETION_MESSAGE, Severity::Success);
        log::debug!("{} complete", run.id);
        Ok(RunSummary {
            run: run.id,
            target: target.to_string(),
            steps_completed: run.index,
        })
    }
}
