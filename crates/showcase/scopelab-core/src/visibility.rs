//! Modal and loader visibility toggles.
//!
//! Each container has an independent visible/hidden state that changes only
//! through its toggle. Hiding a modal hands back a [`ModalReset`] future that
//! restores the modal content to its pre-shown look once the close animation
//! has had time to play.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::ScopelabError;
use crate::surface::UiSurface;
use crate::Result;

pub const ACTIVE_MARKER: &str = "active";
pub const HIDDEN_MARKER: &str = "hidden";
pub const MODAL_CONTENT_MARKER: &str = "modal-content";
pub const LOADER_MESSAGE_MARKER: &str = "loader-message";

/// Transform/opacity the modal content returns to after hiding.
pub const RESET_TRANSFORM: &str = "scale(0.7)";
pub const RESET_OPACITY: &str = "0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState {
    pub visible: bool,
    /// Loader text; `None` for modals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Delayed modal-content reset. Not cancellable once the modal is hidden; the
/// host awaits or spawns it.
#[must_use = "the modal content is only reset when this future is driven"]
pub struct ModalReset {
    inner: LocalBoxFuture<'static, Result<()>>,
}

impl Future for ModalReset {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

pub struct VisibilityToggles {
    surface: Rc<dyn UiSurface>,
    clock: Rc<dyn Clock>,
    diagnostics: Diagnostics,
    modal_delay: Duration,
    loader_message: String,
    states: RefCell<HashMap<String, VisibilityState>>,
}

impl VisibilityToggles {
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
            modal_delay: Duration::from_millis(cfg.modal_animation_ms),
            loader_message: cfg.loader_message.clone(),
            states: RefCell::new(HashMap::new()),
        }
    }

    fn require(&self, origin: &str, id: &str) -> Result<()> {
        if self.surface.contains(id) {
            Ok(())
        } else {
            Err(self.diagnostics.raise(origin, ScopelabError::not_found(id)))
        }
    }

    /// Show or hide a modal.
    ///
    /// Showing adds the `active` marker and locks background scrolling; hiding
    /// removes it, unlocks scrolling and returns the pending content reset.
    pub fn set_modal_visible(&self, modal_id: &str, visible: bool) -> Result<Option<ModalReset>> {
        self.require("visibility.modal", modal_id)?;
        self.states.borrow_mut().insert(
            modal_id.to_string(),
            VisibilityState {
                visible,
                message: None,
            },
        );

        if visible {
            self.surface.add_marker(modal_id, ACTIVE_MARKER)?;
            self.surface.set_scroll_locked(true);
            log::debug!("modal '{modal_id}' shown");
            return Ok(None);
        }

        self.surface.remove_marker(modal_id, ACTIVE_MARKER)?;
        self.surface.set_scroll_locked(false);
        log::debug!("modal '{modal_id}' hidden, reset in {:?}", self.modal_delay);

        let sleep = self.clock.sleep(self.modal_delay);
        let surface = Rc::clone(&self.surface);
        let diagnostics = self.diagnostics.clone();
        let modal_id = modal_id.to_string();
        let inner = async move {
            sleep.await;
            let styles = [("transform", RESET_TRANSFORM), ("opacity", RESET_OPACITY)];
            for (property, value) in styles {
                let found = surface
                    .set_child_style(&modal_id, MODAL_CONTENT_MARKER, property, value)
                    .map_err(|e| diagnostics.raise("visibility.modal_reset", e))?;
                if !found {
                    let missing = format!("{modal_id} .{MODAL_CONTENT_MARKER}");
                    return Err(diagnostics.raise(
                        "visibility.modal_reset",
                        ScopelabError::not_found(missing),
                    ));
                }
            }
            Ok(())
        }
        .boxed_local();
        Ok(Some(ModalReset { inner }))
    }

    /// Show or hide a loader, updating its message child when present.
    pub fn set_loader_visible(
        &self,
        container_id: &str,
        visible: bool,
        message: Option<&str>,
    ) -> Result<()> {
        self.require("visibility.loader", container_id)?;
        let message = message.unwrap_or(&self.loader_message);

        if !self
            .surface
            .set_child_text(container_id, LOADER_MESSAGE_MARKER, message)?
        {
            log::debug!("loader '{container_id}' has no message element");
        }
        if visible {
            self.surface.remove_marker(container_id, HIDDEN_MARKER)?;
        } else {
            self.surface.add_marker(container_id, HIDDEN_MARKER)?;
        }

        self.states.borrow_mut().insert(
            container_id.to_string(),
            VisibilityState {
                visible,
                message: Some(message.to_string()),
            },
        );
        Ok(())
    }

    pub fn state(&self, id: &str) -> Option<VisibilityState> {
        self.states.borrow().get(id).cloned()
    }

    /// Recorded visibility; containers never toggled count as hidden.
    pub fn is_visible(&self, id: &str) -> bool {
        self.states.borrow().get(id).is_some_and(|s| s.visible)
    }
}
