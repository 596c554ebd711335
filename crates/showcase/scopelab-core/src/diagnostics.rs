//! Diagnostic channel for wiring problems (missing elements, rejected runs).
//!
//! Operations that fail softly still report here so a missing element never
//! turns into a silent no-op. Reports go to the `log` facade and, when enabled,
//! are retained for inspection by hosts and tests.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::ScopelabError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsCfg {
    pub enabled: bool,
}

impl Default for DiagnosticsCfg {
    fn default() -> Self {
        DiagnosticsCfg { enabled: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    NotFound,
    RunRejected,
    InvalidInput,
    Host,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Operation that raised it (e.g. `runner.run`).
    pub origin: String,
    pub message: String,
}

/// Cheaply clonable handle; clones share one record list.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    cfg: DiagnosticsCfg,
    records: Rc<RefCell<Vec<Diagnostic>>>,
}

impl Diagnostics {
    pub fn new(cfg: DiagnosticsCfg) -> Self {
        Self {
            cfg,
            records: Rc::default(),
        }
    }

    pub fn report(&self, kind: DiagnosticKind, origin: &str, message: impl Into<String>) {
        let message = message.into();
        log::warn!("[{origin}] {message}");
        if self.cfg.enabled {
            self.records.borrow_mut().push(Diagnostic {
                kind,
                origin: origin.to_string(),
                message,
            });
        }
    }

    /// Report an error and hand it back, for `return Err(diag.raise(..))`.
    pub fn raise(&self, origin: &str, err: ScopelabError) -> ScopelabError {
        let kind = match &err {
            ScopelabError::NotFound { .. } => DiagnosticKind::NotFound,
            ScopelabError::RunInProgress { .. } => DiagnosticKind::RunRejected,
            ScopelabError::Host { .. } => DiagnosticKind::Host,
            _ => DiagnosticKind::InvalidInput,
        };
        self.report(kind, origin, err.to_string());
        err
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.borrow().clone()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.records.borrow().iter().filter(|d| d.kind == kind).count()
    }
}
