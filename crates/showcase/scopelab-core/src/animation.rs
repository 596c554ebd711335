//! Animation names, single-shot animation helpers and the session counter.

use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use hashbrown::HashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::diagnostics::Diagnostics;
use crate::error::ScopelabError;
use crate::surface::UiSurface;
use crate::Result;

/// Named visual state applied to an element as a marker of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationName {
    Pulse,
    Bounce,
    Rotate,
    Shake,
    Flip,
}

impl AnimationName {
    pub const ALL: [AnimationName; 5] = [
        Self::Pulse,
        Self::Bounce,
        Self::Rotate,
        Self::Shake,
        Self::Flip,
    ];

    /// Marker applied to the target while this animation plays.
    #[inline]
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Pulse => "pulse",
            Self::Bounce => "bounce",
            Self::Rotate => "rotate",
            Self::Shake => "shake",
            Self::Flip => "flip",
        }
    }
}

impl std::fmt::Display for AnimationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker())
    }
}

impl FromStr for AnimationName {
    type Err = ScopelabError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.marker() == wanted)
            .ok_or_else(|| ScopelabError::invalid_input(format!("unknown animation '{s}'")))
    }
}

/// Parse a list of names, failing on the first unknown one.
pub fn parse_sequence<S: AsRef<str>>(names: &[S]) -> Result<Vec<AnimationName>> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

/// Uniform pick from [`AnimationName::ALL`].
pub fn random_animation<R: Rng>(rng: &mut R) -> AnimationName {
    AnimationName::ALL[rng.random_range(0..AnimationName::ALL.len())]
}

/// Count of animations started in one session.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AnimationCounter {
    total: u32,
    by_name: HashMap<AnimationName, u32>,
}

impl AnimationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one started animation; returns the new total.
    pub fn record(&mut self, name: AnimationName) -> u32 {
        self.total = self.total.saturating_add(1);
        *self.by_name.entry(name).or_insert(0) += 1;
        self.total
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn count(&self, name: AnimationName) -> u32 {
        self.by_name.get(&name).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Single-shot animation helpers bound to a surface and clock.
pub struct Animator {
    surface: Rc<dyn UiSurface>,
    clock: Rc<dyn Clock>,
    diagnostics: Diagnostics,
}

impl Animator {
    pub fn new(surface: Rc<dyn UiSurface>, clock: Rc<dyn Clock>, diagnostics: Diagnostics) -> Self {
        Self {
            surface,
            clock,
            diagnostics,
        }
    }

    fn require(&self, origin: &str, target: &str) -> Result<()> {
        if self.surface.contains(target) {
            Ok(())
        } else {
            Err(self
                .diagnostics
                .raise(origin, ScopelabError::not_found(target)))
        }
    }

    /// Apply `animation` to `target` for `duration`, then remove it.
    pub async fn trigger(
        &self,
        target: &str,
        animation: AnimationName,
        duration: Duration,
    ) -> Result<()> {
        self.require("animator.trigger", target)?;
        self.surface.add_marker(target, animation.marker())?;
        self.clock.sleep(duration).await;
        self.surface.remove_marker(target, animation.marker())
    }

    /// Transition `target`'s background to `color` over `duration`.
    pub async fn transition_color(
        &self,
        target: &str,
        color: &str,
        duration: Duration,
    ) -> Result<()> {
        self.require("animator.transition_color", target)?;
        let color = color.trim();
        if color.is_empty() {
            return Err(self.diagnostics.raise(
                "animator.transition_color",
                ScopelabError::invalid_input("color cannot be empty"),
            ));
        }
        let transition = format!("background-color {}ms ease", duration.as_millis());
        self.surface.set_style(target, "transition", &transition)?;
        self.surface.set_style(target, "background-color", color)?;
        self.clock.sleep(duration).await;
        Ok(())
    }
}
