//! Bounded result log.
//!
//! Each named log surface keeps at most `capacity` entries; appending past it
//! evicts the oldest entry. Entries are mirrored onto the UI surface as lines so
//! the host shows exactly what the log retains.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::NaiveTime;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::ScopelabError;
use crate::formatter::{format_at, Severity};
use crate::surface::UiSurface;
use crate::Result;

/// One immutable log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    pub timestamp: NaiveTime,
    /// `<icon> [HH:MM:SS] <message>` as shown on the surface.
    pub rendered: String,
}

pub struct ResultLog {
    surface: Rc<dyn UiSurface>,
    clock: Rc<dyn Clock>,
    diagnostics: Diagnostics,
    capacity: usize,
    default_surface: String,
    entries: RefCell<HashMap<String, VecDeque<LogEntry>>>,
}

impl ResultLog {
    pub fn new(
        surface: Rc<dyn UiSurface>,
        clock: Rc<dyn Clock>,
        diagnostics: Diagnostics,
        cfg: &Config,
    ) -> Self {
        Self {
            surface,
            clock,
            diagnostics,
            capacity: cfg.log_capacity.max(1),
            default_surface: cfg.default_log_surface.clone(),
            entries: RefCell::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn default_surface(&self) -> &str {
        &self.default_surface
    }

    fn resolve<'a>(&'a self, target: Option<&'a str>) -> &'a str {
        target.unwrap_or(&self.default_surface)
    }

    /// Append `message` to `target` (default surface when `None`).
    ///
    /// A missing surface is reported to diagnostics and returned as `NotFound`;
    /// nothing is mutated in that case.
    pub fn append(
        &self,
        message: &str,
        target: Option<&str>,
        severity: Severity,
    ) -> Result<LogEntry> {
        let target = self.resolve(target);
        if !self.surface.contains(target) {
            return Err(self
                .diagnostics
                .raise("result_log.append", ScopelabError::not_found(target)));
        }

        let timestamp = self.clock.now().time();
        let entry = LogEntry {
            message: message.to_string(),
            severity,
            timestamp,
            rendered: format_at(message, severity, timestamp),
        };

        let marker = format!("log-{}", severity.name());
        let mut len = self
            .surface
            .append_line(target, &entry.rendered, &marker)?;
        while len > self.capacity {
            self.surface.remove_first_line(target)?;
            len -= 1;
        }

        let mut entries = self.entries.borrow_mut();
        let kept = entries.entry(target.to_string()).or_default();
        kept.push_back(entry.clone());
        while kept.len() > self.capacity {
            kept.pop_front();
        }
        log::debug!("log[{target}] {}", entry.rendered);
        Ok(entry)
    }

    /// Append an `info` entry to the default surface.
    pub fn info(&self, message: &str) -> Result<LogEntry> {
        self.append(message, None, Severity::Info)
    }

    /// Remove every entry from `target`.
    pub fn clear(&self, target: Option<&str>) -> Result<()> {
        let target = self.resolve(target);
        if !self.surface.contains(target) {
            return Err(self
                .diagnostics
                .raise("result_log.clear", ScopelabError::not_found(target)));
        }
        self.surface.clear_lines(target)?;
        self.entries.borrow_mut().remove(target);
        Ok(())
    }

    /// Retained entries of `target`, oldest first.
    pub fn entries(&self, target: Option<&str>) -> Vec<LogEntry> {
        self.entries
            .borrow()
            .get(self.resolve(target))
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, target: Option<&str>) -> usize {
        self.entries
            .borrow()
            .get(self.resolve(target))
            .map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, target: Option<&str>) -> bool {
        self.len(target) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ImmediateClock;
    use crate::surface::InMemorySurface;

    fn setup() -> (Rc<InMemorySurface>, ResultLog, Diagnostics) {
        let surface = Rc::new(InMemorySurface::new().with_element("results"));
        let clock = Rc::new(ImmediateClock::at_time(
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        ));
        let diag = Diagnostics::default();
        let log = ResultLog::new(surface.clone(), clock, diag.clone(), &Config::default());
        (surface, log, diag)
    }

    #[test]
    fn append_renders_and_mirrors() {
        let (surface, log, _) = setup();
        let entry = log.append("hello", None, Severity::Success).unwrap();
        assert_eq!(entry.rendered, "✅ [12:00:00] hello");
        assert_eq!(surface.lines("results").unwrap(), vec![entry.rendered]);
        assert_eq!(
            surface.line_markers("results").unwrap(),
            vec!["log-success".to_string()]
        );
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let surface = Rc::new(InMemorySurface::new().with_element("results"));
        let cfg = Config {
            log_capacity: 0,
            ..Config::default()
        };
        let log = ResultLog::new(
            surface,
            Rc::new(ImmediateClock::new()),
            Diagnostics::default(),
            &cfg,
        );
        log.info("a").unwrap();
        log.info("b").unwrap();
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.entries(None)[0].message, "b");
    }

    #[test]
    fn clear_missing_surface_reports() {
        let (_, log, diag) = setup();
        assert!(log.clear(Some("nowhere")).is_err());
        assert_eq!(diag.records().len(), 1);
    }
}
