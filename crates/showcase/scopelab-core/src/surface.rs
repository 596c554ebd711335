//! UI surface collaborator and an in-memory implementation.
//!
//! A surface is a flat store of elements addressed by id. Elements carry
//! markers (CSS classes in the browser), text, inline styles, children that
//! are addressed by marker, and an ordered list of log lines. Adapters
//! implement [`UiSurface`]; the core never sees DOM types.

use std::cell::{Cell, RefCell};

use hashbrown::HashMap;

use crate::error::ScopelabError;
use crate::Result;

/// Element store the showcase mutates.
///
/// Methods take `&self`; implementors use interior mutability (the DOM already
/// does). Every id-addressed method returns `NotFound` for an unknown id.
pub trait UiSurface {
    fn contains(&self, id: &str) -> bool;

    fn add_marker(&self, id: &str, marker: &str) -> Result<()>;
    fn remove_marker(&self, id: &str, marker: &str) -> Result<()>;
    fn has_marker(&self, id: &str, marker: &str) -> Result<bool>;

    fn set_style(&self, id: &str, property: &str, value: &str) -> Result<()>;

    /// Set the text of the first child of `id` carrying `child_marker`.
    /// `Ok(false)` when the element exists but has no such child.
    fn set_child_text(&self, id: &str, child_marker: &str, text: &str) -> Result<bool>;
    /// Style counterpart of [`UiSurface::set_child_text`].
    fn set_child_style(
        &self,
        id: &str,
        child_marker: &str,
        property: &str,
        value: &str,
    ) -> Result<bool>;

    /// Append a line to `id`, tagged with `marker`. Returns the new line count.
    fn append_line(&self, id: &str, text: &str, marker: &str) -> Result<usize>;
    fn remove_first_line(&self, id: &str) -> Result<()>;
    fn clear_lines(&self, id: &str) -> Result<()>;

    /// Suppress (or restore) background scrolling of the whole surface.
    fn set_scroll_locked(&self, locked: bool);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildElement {
    pub markers: Vec<String>,
    pub text: String,
    pub styles: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
struct Element {
    markers: Vec<String>,
    styles: HashMap<String, String>,
    children: Vec<ChildElement>,
    lines: Vec<(String, String)>,
}

impl Element {
    fn child_mut(&mut self, marker: &str) -> Option<&mut ChildElement> {
        self.children
            .iter_mut()
            .find(|c| c.markers.iter().any(|m| m == marker))
    }
}

/// One effective marker change, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOp {
    pub id: String,
    pub marker: String,
    pub added: bool,
}

/// Headless surface used by tests and native hosts.
#[derive(Debug, Default)]
pub struct InMemorySurface {
    elements: RefCell<HashMap<String, Element>>,
    marker_ops: RefCell<Vec<MarkerOp>>,
    scroll_locked: Cell<bool>,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`InMemorySurface::insert_element`].
    pub fn with_element(self, id: &str) -> Self {
        self.insert_element(id);
        self
    }

    /// Builder form of [`InMemorySurface::insert_child`].
    pub fn with_child(self, parent: &str, marker: &str) -> Self {
        self.insert_child(parent, marker);
        self
    }

    pub fn insert_element(&self, id: &str) {
        self.elements
            .borrow_mut()
            .entry(id.to_string())
            .or_default();
    }

    /// Add a child tagged `marker` under `parent`, creating the parent if needed.
    pub fn insert_child(&self, parent: &str, marker: &str) {
        let mut elements = self.elements.borrow_mut();
        let el = elements.entry(parent.to_string()).or_default();
        el.children.push(ChildElement {
            markers: vec![marker.to_string()],
            ..ChildElement::default()
        });
    }

    pub fn remove_element(&self, id: &str) -> bool {
        self.elements.borrow_mut().remove(id).is_some()
    }

    pub fn markers(&self, id: &str) -> Option<Vec<String>> {
        self.elements.borrow().get(id).map(|e| e.markers.clone())
    }

    pub fn style(&self, id: &str, property: &str) -> Option<String> {
        self.elements
            .borrow()
            .get(id)
            .and_then(|e| e.styles.get(property).cloned())
    }

    pub fn child(&self, id: &str, marker: &str) -> Option<ChildElement> {
        self.elements.borrow().get(id).and_then(|e| {
            e.children
                .iter()
                .find(|c| c.markers.iter().any(|m| m == marker))
                .cloned()
        })
    }

    /// Line texts of `id`, oldest first.
    pub fn lines(&self, id: &str) -> Option<Vec<String>> {
        self.elements
            .borrow()
            .get(id)
            .map(|e| e.lines.iter().map(|(text, _)| text.clone()).collect())
    }

    /// Marker tags of the lines of `id`, oldest first.
    pub fn line_markers(&self, id: &str) -> Option<Vec<String>> {
        self.elements
            .borrow()
            .get(id)
            .map(|e| e.lines.iter().map(|(_, m)| m.clone()).collect())
    }

    pub fn marker_ops(&self) -> Vec<MarkerOp> {
        self.marker_ops.borrow().clone()
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked.get()
    }

    fn update<T>(&self, id: &str, f: impl FnOnce(&mut Element) -> T) -> Result<T> {
        let mut elements = self.elements.borrow_mut();
        let el = elements
            .get_mut(id)
            .ok_or_else(|| ScopelabError::not_found(id))?;
        Ok(f(el))
    }

    fn record(&self, id: &str, marker: &str, added: bool) {
        self.marker_ops.borrow_mut().push(MarkerOp {
            id: id.to_string(),
            marker: marker.to_string(),
            added,
        });
    }
}

impl UiSurface for InMemorySurface {
    fn contains(&self, id: &str) -> bool {
        self.elements.borrow().contains_key(id)
    }

    fn add_marker(&self, id: &str, marker: &str) -> Result<()> {
        let changed = self.update(id, |el| {
            if el.markers.iter().any(|m| m == marker) {
                false
            } else {
                el.markers.push(marker.to_string());
                true
            }
        })?;
        if changed {
            self.record(id, marker, true);
        }
        Ok(())
    }

    fn remove_marker(&self, id: &str, marker: &str) -> Result<()> {
        let changed = self.update(id, |el| {
            let before = el.markers.len();
            el.markers.retain(|m| m != marker);
            el.markers.len() != before
        })?;
        if changed {
            self.record(id, marker, false);
        }
        Ok(())
    }

    fn has_marker(&self, id: &str, marker: &str) -> Result<bool> {
        self.update(id, |el| el.markers.iter().any(|m| m == marker))
    }

    fn set_style(&self, id: &str, property: &str, value: &str) -> Result<()> {
        self.update(id, |el| {
            el.styles.insert(property.to_string(), value.to_string());
        })
    }

    fn set_child_text(&self, id: &str, child_marker: &str, text: &str) -> Result<bool> {
        self.update(id, |el| match el.child_mut(child_marker) {
            Some(child) => {
                child.text = text.to_string();
                true
            }
            None => false,
        })
    }

    fn set_child_style(
        &self,
        id: &str,
        child_marker: &str,
        property: &str,
        value: &str,
    ) -> Result<bool> {
        self.update(id, |el| match el.child_mut(child_marker) {
            Some(child) => {
                child.styles.insert(property.to_string(), value.to_string());
                true
            }
            None => false,
        })
    }

    fn append_line(&self, id: &str, text: &str, marker: &str) -> Result<usize> {
        self.update(id, |el| {
            el.lines.push((text.to_string(), marker.to_string()));
            el.lines.len()
        })
    }

    fn remove_first_line(&self, id: &str) -> Result<()> {
        self.update(id, |el| {
            if !el.lines.is_empty() {
                el.lines.remove(0);
            }
        })
    }

    fn clear_lines(&self, id: &str) -> Result<()> {
        self.update(id, |el| el.lines.clear())
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.scroll_locked.set(locked);
    }
}
