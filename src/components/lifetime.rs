//! Tick-based lifetime tracking for generators.
//!
//! A [`LifetimeManager`] is the successor of a plain countdown: instead of
//! decrementing a counter every frame, the remaining life is always derived
//! from the shared clock, so reading it twice on the same tick gives the
//! same answer.
//!
//! # How It Works
//!
//! 1. A generator is built with `LifetimeManager::new(now, duration)` (or
//!    [`LifetimeManager::permanent`] for backdrop generators)
//! 2. The spawner registers one or more `on_death` callbacks
//! 3. The `lifetime_system` calls [`LifetimeManager::evaluate`] once per tick
//! 4. When the remaining life reaches zero, or [`LifetimeManager::force_kill`]
//!    is called, every callback runs once and the manager goes inert
//!
//! # Related
//!
//! - [`crate::systems::lifetime::lifetime_system`] – evaluates every live generator
//! - [`crate::resources::registry::Registry`] – removes generators whose death was posted

use std::fmt;

use crate::error::SimError;
use crate::resources::clock::Tick;

/// Callback fired exactly once when a lifetime ends.
pub type DeathCallback = Box<dyn FnOnce() + Send + Sync>;

/// Total length of a life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifespan {
    /// Dies after this many ticks.
    Ticks(u64),
    /// Never expires on its own.
    Unbounded,
}

impl Lifespan {
    /// Validate a signed tick count coming from configuration.
    pub fn from_ticks(ticks: i64) -> Result<Self, SimError> {
        if ticks < 0 {
            return Err(SimError::config(format!(
                "lifetime duration must not be negative (got {ticks})"
            )));
        }
        Ok(Lifespan::Ticks(ticks as u64))
    }
}

/// Computes the remaining life of one generator from the clock.
pub struct LifetimeManager {
    birth: Tick,
    lifespan: Lifespan,
    dead: bool,
    on_death: Vec<DeathCallback>,
}

impl fmt::Debug for LifetimeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifetimeManager")
            .field("birth", &self.birth)
            .field("lifespan", &self.lifespan)
            .field("dead", &self.dead)
            .field("pending_callbacks", &self.on_death.len())
            .finish()
    }
}

impl LifetimeManager {
    /// Create a manager born at `birth` that lives `duration` ticks.
    ///
    /// Negative durations are rejected. A duration of zero expires on the
    /// tick it was created.
    pub fn new(birth: Tick, duration: i64) -> Result<Self, SimError> {
        Ok(Self::with_lifespan(birth, Lifespan::from_ticks(duration)?))
    }

    /// Create a manager that never expires unless killed.
    pub fn permanent(birth: Tick) -> Self {
        Self::with_lifespan(birth, Lifespan::Unbounded)
    }

    pub fn with_lifespan(birth: Tick, lifespan: Lifespan) -> Self {
        LifetimeManager {
            birth,
            lifespan,
            dead: false,
            on_death: Vec::new(),
        }
    }

    pub fn birth(&self) -> Tick {
        self.birth
    }

    pub fn lifespan(&self) -> Lifespan {
        self.lifespan
    }

    /// Ticks left at `now`, or `None` for an unbounded life.
    ///
    /// Goes to zero and below once the life has run out.
    pub fn remaining_ticks(&self, now: Tick) -> Option<i64> {
        match self.lifespan {
            Lifespan::Ticks(duration) => {
                let elapsed = now.saturating_sub(self.birth);
                Some(duration as i64 - elapsed as i64)
            }
            Lifespan::Unbounded => None,
        }
    }

    /// Remaining life as a percentage in `[0, 100]`.
    ///
    /// Unbounded lives are always at 100. A zero-length life is at 0.
    pub fn remaining_percent(&self, now: Tick) -> f32 {
        match (self.lifespan, self.remaining_ticks(now)) {
            (Lifespan::Ticks(0), _) => 0.0,
            (Lifespan::Ticks(duration), Some(remaining)) => {
                (remaining as f32 / duration as f32 * 100.0).clamp(0.0, 100.0)
            }
            _ => 100.0,
        }
    }

    /// True when the clock says this life is over, whether or not the
    /// death has been announced yet.
    pub fn is_expired(&self, now: Tick) -> bool {
        self.dead || self.remaining_ticks(now).is_some_and(|r| r <= 0)
    }

    /// True once the death notification has fired.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Register a callback for the death of this lifetime.
    ///
    /// If the lifetime is already over at `now`, the death fires right away,
    /// so a late registration can never miss it.
    pub fn on_death<F>(&mut self, now: Tick, callback: F)
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        if self.dead {
            callback();
            return;
        }
        self.on_death.push(Box::new(callback));
        self.evaluate(now);
    }

    /// Check the clock and fire the death notification if the life ran out.
    ///
    /// Returns true only on the call that performed the transition.
    pub fn evaluate(&mut self, now: Tick) -> bool {
        if self.dead {
            return false;
        }
        if self.is_expired(now) {
            self.die();
            return true;
        }
        false
    }

    /// End the life early through the same notification path.
    ///
    /// Killing an already dead lifetime does nothing.
    pub fn force_kill(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.die();
        true
    }

    fn die(&mut self) {
        self.dead = true;
        for callback in std::mem::take(&mut self.on_death) {
            callback();
        }
    }
}
