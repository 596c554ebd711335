//! Scopelab Core (surface-agnostic)
//!
//! Engine behind the scopelab showcase: a bounded result log, a sequential
//! animation step runner, modal/loader visibility toggles and the small lesson
//! utilities the demo buttons call into. The UI (a DOM in the browser, an
//! in-memory element store in tests) and the clock are reached only through the
//! [`UiSurface`] and [`Clock`] traits; adapters (wasm) implement them.

pub mod animation;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod ids;
pub mod lessons;
pub mod result_log;
pub mod runner;
pub mod session;
pub mod surface;
pub mod visibility;

// Re-exports for consumers (adapters)
pub use animation::{
    parse_sequence, random_animation, AnimationCounter, AnimationName, Animator,
};
#[cfg(feature = "tokio")]
pub use clock::TokioClock;
pub use clock::{Clock, ImmediateClock, SleepFuture};
pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsCfg};
pub use error::ScopelabError;
pub use formatter::{format_at, format_message, Severity};
pub use ids::{IdAllocator, RunId};
pub use lessons::{
    circle_area, greet, rectangle_area, validate_and_process_input, Counter, ProcessResult,
    ProcessedInput,
};
pub use result_log::{LogEntry, ResultLog};
pub use runner::{RunSummary, StepRunner};
pub use session::{Session, Trigger, TriggerOutcome};
pub use surface::{InMemorySurface, UiSurface};
pub use visibility::{ModalReset, VisibilityState, VisibilityToggles};

/// Scopelab result type
pub type Result<T> = core::result::Result<T, ScopelabError>;
