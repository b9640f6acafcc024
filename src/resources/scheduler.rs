//! Spawn cadences.
//!
//! A [`SpawnPlan`] says which [`ItemRecipe`]s are due at a given number of
//! ticks since the plan started. Everything here is a pure function of that
//! elapsed count, so a plan can be asked about any tick in any order.
//!
//! ```text
//! Burst { every: 3, count: 2 }   fires at 3, 6
//! Periodic { every: 4 }          fires at 4, 8, 12, ...
//! Composite { period: 10, window: 7, .. }
//!                                inner plans see 0..7, idle 7..10,
//!                                then restart from 0 at 10, 20, ...
//! ```

use bevy_ecs::prelude::Resource;
use fastrand::Rng;

use crate::builders::item::ItemRecipe;
use crate::error::SimError;
use crate::resources::clock::{Tick, seconds_to_ticks};
use crate::resources::simconfig::SimConfig;

/// When a single stream of spawns fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    /// `count` spawns, one every `every` ticks, then nothing.
    Burst { every: u64, count: u64 },
    /// One spawn every `every` ticks, forever.
    Periodic { every: u64 },
}

impl Cadence {
    pub fn validate(&self) -> Result<(), SimError> {
        match *self {
            Cadence::Burst { every: 0, .. } | Cadence::Periodic { every: 0 } => {
                Err(SimError::config("cadence interval must be at least one tick"))
            }
            _ => Ok(()),
        }
    }

    /// Whether this cadence fires `elapsed` ticks after it started.
    pub fn fires_at(&self, elapsed: u64) -> bool {
        match *self {
            Cadence::Burst { every, count } => {
                every > 0 && elapsed > 0 && elapsed % every == 0 && elapsed / every <= count
            }
            Cadence::Periodic { every } => every > 0 && elapsed > 0 && elapsed % every == 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SpawnPlan {
    Single {
        cadence: Cadence,
        recipe: ItemRecipe,
    },
    /// Restarts `plans` every `period` ticks and keeps them active for the
    /// first `window` ticks of each period.
    Composite {
        period: u64,
        window: u64,
        plans: Vec<SpawnPlan>,
    },
}

impl SpawnPlan {
    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            SpawnPlan::Single { cadence, .. } => cadence.validate(),
            SpawnPlan::Composite {
                period,
                window,
                plans,
            } => {
                if *period == 0 {
                    return Err(SimError::config("composite period must be at least one tick"));
                }
                if window > period {
                    return Err(SimError::config(format!(
                        "composite window ({window}) is longer than its period ({period})"
                    )));
                }
                plans.iter().try_for_each(SpawnPlan::validate)
            }
        }
    }

    /// Append the recipes due `elapsed` ticks after the plan started.
    pub fn collect_due(&self, elapsed: u64, due: &mut Vec<ItemRecipe>) {
        match self {
            SpawnPlan::Single { cadence, recipe } => {
                if cadence.fires_at(elapsed) {
                    due.push(*recipe);
                }
            }
            SpawnPlan::Composite {
                period,
                window,
                plans,
            } => {
                if *period == 0 {
                    return;
                }
                let local = elapsed % period;
                if local < *window {
                    for plan in plans {
                        plan.collect_due(local, due);
                    }
                }
            }
        }
    }

    /// The standard composition: every cycle, a burst of fast standers, a
    /// burst of slow movers and a steady stream of flickers.
    pub fn default_for(config: &SimConfig) -> Result<SpawnPlan, SimError> {
        let ticks = |seconds| seconds_to_ticks(seconds, config.fps);
        let cycle = ticks(config.cycle_seconds);

        let plan = SpawnPlan::Composite {
            period: cycle,
            window: cycle,
            plans: vec![
                SpawnPlan::Single {
                    cadence: Cadence::Burst {
                        every: ticks(config.mover_interval_seconds),
                        count: config.mover_count as u64,
                    },
                    recipe: ItemRecipe::fast_stander(ticks(config.mover_life_seconds)),
                },
                SpawnPlan::Single {
                    cadence: Cadence::Burst {
                        every: ticks(config.slow_mover_interval_seconds),
                        count: config.slow_mover_count as u64,
                    },
                    recipe: ItemRecipe::slow_mover(ticks(config.slow_mover_life_seconds)),
                },
                SpawnPlan::Single {
                    cadence: Cadence::Periodic {
                        every: ticks(config.flicker_interval_seconds),
                    },
                    recipe: ItemRecipe::flicker(ticks(config.flicker_life_seconds)),
                },
            ],
        };
        plan.validate()?;
        Ok(plan)
    }
}

/// Resource driving item spawns from a [`SpawnPlan`].
#[derive(Resource, Clone, Debug)]
pub struct SpawnScheduler {
    plan: SpawnPlan,
    started_at: Tick,
    rng: Rng,
    unit: f32,
}

impl SpawnScheduler {
    /// Validate `plan` and start it at `now`.
    pub fn new(plan: SpawnPlan, now: Tick, unit: f32, rng: Rng) -> Result<Self, SimError> {
        plan.validate()?;
        Ok(SpawnScheduler {
            plan,
            started_at: now,
            rng,
            unit,
        })
    }

    /// Scheduler running the default plan built from `config`.
    pub fn from_config(config: &SimConfig, now: Tick, rng: Rng) -> Result<Self, SimError> {
        Self::new(SpawnPlan::default_for(config)?, now, config.grid_unit, rng)
    }

    pub fn plan(&self) -> &SpawnPlan {
        &self.plan
    }

    pub fn started_at(&self) -> Tick {
        self.started_at
    }

    pub fn unit(&self) -> f32 {
        self.unit
    }

    pub fn rng_mut(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Start the plan over from `now`.
    pub fn restart(&mut self, now: Tick) {
        self.started_at = now;
    }

    /// Recipes due at `now`, in plan order.
    pub fn due(&self, now: Tick) -> Vec<ItemRecipe> {
        let mut due = Vec::new();
        if let Some(elapsed) = now.checked_sub(self.started_at) {
            self.plan.collect_due(elapsed, &mut due);
        }
        due
    }
}
