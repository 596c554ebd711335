//! `UiSurface` over the live DOM.
//!
//! Ids are element ids, markers are CSS classes, children are found with a
//! `.marker` selector and log lines are `<div class="log-entry ...">` children.
//! Other children of a log container are left alone.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList};

use scopelab_core::{Result, ScopelabError, UiSurface};

fn host_err(context: &str, err: JsValue) -> ScopelabError {
    ScopelabError::Host {
        reason: format!("{context}: {err:?}"),
    }
}

const LINE_CLASS: &str = "log-entry";
const LINE_SELECTOR: &str = ":scope > .log-entry";

pub struct DomSurface {
    document: Document,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Surface over `window.document`.
    pub fn from_window() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ScopelabError::Host {
                reason: "no window.document available".to_string(),
            })?;
        Ok(Self::new(document))
    }

    fn element(&self, id: &str) -> Result<Element> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| ScopelabError::not_found(id))
    }

    fn html_element(&self, id: &str) -> Result<HtmlElement> {
        self.element(id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ScopelabError::Host {
                reason: format!("#{id} is not an HTML element"),
            })
    }

    fn log_lines(&self, parent: &Element) -> Result<NodeList> {
        parent
            .query_selector_all(LINE_SELECTOR)
            .map_err(|e| host_err("querySelectorAll", e))
    }

    fn child(&self, id: &str, marker: &str) -> Result<Option<Element>> {
        self.element(id)?
            .query_selector(&format!(".{marker}"))
            .map_err(|e| host_err("querySelector", e))
    }
}

impl UiSurface for DomSurface {
    fn contains(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn add_marker(&self, id: &str, marker: &str) -> Result<()> {
        self.element(id)?
            .class_list()
            .add_1(marker)
            .map_err(|e| host_err("classList.add", e))
    }

    fn remove_marker(&self, id: &str, marker: &str) -> Result<()> {
        self.element(id)?
            .class_list()
            .remove_1(marker)
            .map_err(|e| host_err("classList.remove", e))
    }

    fn has_marker(&self, id: &str, marker: &str) -> Result<bool> {
        Ok(self.element(id)?.class_list().contains(marker))
    }

    fn set_style(&self, id: &str, property: &str, value: &str) -> Result<()> {
        self.html_element(id)?
            .style()
            .set_property(property, value)
            .map_err(|e| host_err("style.setProperty", e))
    }

    fn set_child_text(&self, id: &str, child_marker: &str, text: &str) -> Result<bool> {
        match self.child(id, child_marker)? {
            Some(child) => {
                child.set_text_content(Some(text));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn set_child_style(
        &self,
        id: &str,
        child_marker: &str,
        property: &str,
        value: &str,
    ) -> Result<bool> {
        let Some(child) = self.child(id, child_marker)? else {
            return Ok(false);
        };
        let child: HtmlElement = child.dyn_into().map_err(|_| ScopelabError::Host {
            reason: format!("#{id} .{child_marker} is not an HTML element"),
        })?;
        child
            .style()
            .set_property(property, value)
            .map_err(|e| host_err("style.setProperty", e))?;
        Ok(true)
    }

    fn append_line(&self, id: &str, text: &str, marker: &str) -> Result<usize> {
        let parent = self.element(id)?;
        let line = self
            .document
            .create_element("div")
            .map_err(|e| host_err("createElement", e))?;
        line.set_class_name(&format!("{LINE_CLASS} {marker}"));
        line.set_text_content(Some(text));
        parent
            .append_child(&line)
            .map_err(|e| host_err("appendChild", e))?;
        Ok(self.log_lines(&parent)?.length() as usize)
    }

    fn remove_first_line(&self, id: &str) -> Result<()> {
        let first = self
            .element(id)?
            .query_selector(LINE_SELECTOR)
            .map_err(|e| host_err("querySelector", e))?;
        if let Some(first) = first {
            first.remove();
        }
        Ok(())
    }

    fn clear_lines(&self, id: &str) -> Result<()> {
        // querySelectorAll returns a static list.
        let lines = self.log_lines(&self.element(id)?)?;
        for i in 0..lines.length() {
            if let Some(line) = lines.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                line.remove();
            }
        }
        Ok(())
    }

    fn set_scroll_locked(&self, locked: bool) {
        let Some(body) = self.document.body() else {
            log::warn!("scroll lock: document has no body");
            return;
        };
        let style = body.style();
        let res = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if let Err(err) = res {
            log::warn!("scroll lock failed: {err:?}");
        }
    }
}
