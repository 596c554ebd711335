//! Session: one surface, one clock and the components wired onto them.
//!
//! Named user actions arrive as [`Trigger`]s and map 1:1 onto component
//! operations through [`Session::dispatch`]. All per-session state (animation
//! counter, run ids, visibility, log contents) lives here rather than in
//! globals, so two sessions never observe each other.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::animation::{random_animation, AnimationCounter, AnimationName, Animator};
use crate::clock::Clock;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::ScopelabError;
use crate::formatter::Severity;
use crate::lessons::{greet, rectangle_area, validate_and_process_input, ProcessResult};
use crate::result_log::ResultLog;
use crate::runner::{RunSummary, StepRunner};
use crate::surface::UiSurface;
use crate::visibility::{VisibilityState, VisibilityToggles};
use crate::Result;

/// User-initiated actions, as wired to the demo's buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Trigger {
    RunSequence {
        target: String,
        steps: Vec<AnimationName>,
        #[serde(default)]
        delay_ms: Option<u64>,
    },
    Animate {
        target: String,
        animation: AnimationName,
    },
    RandomAnimation {
        target: String,
    },
    ChangeColor {
        target: String,
        color: String,
    },
    OpenModal {
        modal: String,
    },
    CloseModal {
        modal: String,
    },
    ShowLoader {
        container: String,
        #[serde(default)]
        message: Option<String>,
    },
    HideLoader {
        container: String,
    },
    ClearLog {
        #[serde(default)]
        surface: Option<String>,
    },
    CalculateArea {
        width: f64,
        height: f64,
    },
    Greet {
        name: String,
        #[serde(default)]
        greeting: Option<String>,
    },
    ValidateInput {
        input: String,
        #[serde(default)]
        max_length: Option<usize>,
    },
}

/// What a dispatched trigger produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerOutcome {
    Sequence(RunSummary),
    Animated {
        target: String,
        animation: AnimationName,
        total: u32,
    },
    ColorChanged {
        target: String,
        color: String,
    },
    Visibility {
        id: String,
        state: VisibilityState,
    },
    LogCleared {
        surface: String,
    },
    Area {
        value: f64,
    },
    Greeting {
        text: String,
    },
    Processed(ProcessResult),
}

pub struct Session {
    cfg: Config,
    diagnostics: Diagnostics,
    log: Rc<ResultLog>,
    runner: StepRunner,
    animator: Animator,
    visibility: VisibilityToggles,
    counter: RefCell<AnimationCounter>,
    rng: RefCell<SmallRng>,
}

impl Session {
    pub fn new(surface: Rc<dyn UiSurface>, clock: Rc<dyn Clock>, cfg: Config) -> Self {
        let diagnostics = Diagnostics::default();
        let seed = cfg.rng_seed.unwrap_or_else(|| {
            clock
                .now()
                .timestamp_nanos_opt()
                .map_or(0, |n| n as u64)
        });
        let log = Rc::new(ResultLog::new(
            Rc::clone(&surface),
            Rc::clone(&clock),
            diagnostics.clone(),
            &cfg,
        ));
        let runner = StepRunner::new(
            Rc::clone(&surface),
            Rc::clone(&clock),
            Rc::clone(&log),
            diagnostics.clone(),
            &cfg,
        );
        let animator = Animator::new(Rc::clone(&surface), Rc::clone(&clock), diagnostics.clone());
        let visibility = VisibilityToggles::new(surface, clock, diagnostics.clone(), &cfg);
        Self {
            cfg,
            diagnostics,
            log,
            runner,
            animator,
            visibility,
            counter: RefCell::new(AnimationCounter::new()),
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    pub fn runner(&self) -> &StepRunner {
        &self.runner
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn visibility(&self) -> &VisibilityToggles {
        &self.visibility
    }

    pub fn counter(&self) -> AnimationCounter {
        self.counter.borrow().clone()
    }

    /// Pick a random animation from the session's generator.
    pub fn pick_random_animation(&self) -> AnimationName {
        random_animation(&mut *self.rng.borrow_mut())
    }

    fn note(&self, message: &str, severity: Severity) {
        if let Err(err) = self.log.append(message, None, severity) {
            log::debug!("session entry not logged: {err}");
        }
    }

    fn log_failure(&self, err: ScopelabError) -> ScopelabError {
        if matches!(err, ScopelabError::InvalidInput { .. }) {
            self.note(&format!("Error: {err}"), Severity::Error);
        }
        err
    }

    async fn animate(&self, target: &str, animation: AnimationName) -> Result<TriggerOutcome> {
        let duration = Duration::from_millis(self.cfg.animation_duration_ms);
        self.animator.trigger(target, animation, duration).await?;
        let total = self.counter.borrow_mut().record(animation);
        self.note(
            &format!("Applied {animation} to {target} (animations so far: {total})"),
            Severity::Info,
        );
        Ok(TriggerOutcome::Animated {
            target: target.to_string(),
            animation,
            total,
        })
    }

    /// Run the operation mapped to `trigger`.
    pub async fn dispatch(&self, trigger: Trigger) -> Result<TriggerOutcome> {
        log::debug!("dispatch {trigger:?}");
        match trigger {
            Trigger::RunSequence {
                target,
                steps,
                delay_ms,
            } => {
                let delay = delay_ms.map(Duration::from_millis);
                let summary = self.runner.run(&target, &steps, delay).await?;
                let mut counter = self.counter.borrow_mut();
                for step in &steps[..summary.steps_completed] {
                    counter.record(*step);
                }
                Ok(TriggerOutcome::Sequence(summary))
            }
            Trigger::Animate { target, animation } => self.animate(&target, animation).await,
            Trigger::RandomAnimation { target } => {
                let animation = self.pick_random_animation();
                self.note(&format!("Random animation: {animation}"), Severity::Info);
                self.animate(&target, animation).await
            }
            Trigger::ChangeColor { target, color } => {
                let duration = Duration::from_millis(self.cfg.color_transition_ms);
                self.animator
                    .transition_color(&target, &color, duration)
                    .await
                    .map_err(|e| self.log_failure(e))?;
                self.note(&format!("Color changed to {color}"), Severity::Success);
                Ok(TriggerOutcome::ColorChanged { target, color })
            }
            Trigger::OpenModal { modal } => {
                // Showing never yields a pending reset.
                let _ = self.visibility.set_modal_visible(&modal, true)?;
                Ok(self.visibility_outcome(modal))
            }
            Trigger::CloseModal { modal } => {
                if let Some(reset) = self.visibility.set_modal_visible(&modal, false)? {
                    reset.await?;
                }
                Ok(self.visibility_outcome(modal))
            }
            Trigger::ShowLoader { container, message } => {
                self.visibility
                    .set_loader_visible(&container, true, message.as_deref())?;
                Ok(self.visibility_outcome(container))
            }
            Trigger::HideLoader { container } => {
                self.visibility
                    .set_loader_visible(&container, false, None)?;
                Ok(self.visibility_outcome(container))
            }
            Trigger::ClearLog { surface } => {
                self.log.clear(surface.as_deref())?;
                let surface = surface.unwrap_or_else(|| self.log.default_surface().to_string());
                Ok(TriggerOutcome::LogCleared { surface })
            }
            Trigger::CalculateArea { width, height } => {
                let value = rectangle_area(width, height).map_err(|e| self.log_failure(e))?;
                self.note(
                    &format!("Area of {width} x {height} = {value:.2}"),
                    Severity::Success,
                );
                Ok(TriggerOutcome::Area { value })
            }
            Trigger::Greet { name, greeting } => {
                let text = greet(&name, greeting.as_deref());
                self.note(&text, Severity::Info);
                Ok(TriggerOutcome::Greeting { text })
            }
            Trigger::ValidateInput { input, max_length } => {
                let max = max_length.unwrap_or(self.cfg.max_input_length);
                let result = validate_and_process_input(&input, max);
                match (&result.data, &result.error) {
                    (Some(data), _) => {
                        self.note(
                            &format!("Processed {} characters, {} words", data.length, data.words),
                            Severity::Success,
                        );
                    }
                    (None, Some(error)) => {
                        self.note(error, Severity::Warning);
                    }
                    (None, None) => {}
                }
                Ok(TriggerOutcome::Processed(result))
            }
        }
    }

    fn visibility_outcome(&self, id: String) -> TriggerOutcome {
        let state = self.visibility.state(&id).unwrap_or_default();
        TriggerOutcome::Visibility { id, state }
    }
}
