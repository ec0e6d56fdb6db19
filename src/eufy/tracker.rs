//! Per-appliance state owner: reconciler plus dock debounce.
//!
//! The tracker keeps the state as computed from every update and hands out
//! a visible copy whose dock status is the debounced one. Later updates are
//! reconciled against the computed state.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use super::DpsMap;
use super::debounce::DockDebounce;
use super::dps::{Schema, SchemaGeneration};
use super::reconciler;
use super::state::{ApplianceState, Field};

#[derive(Debug, Clone, PartialEq)]
pub struct Visible {
    pub state: ApplianceState,
    pub changed: BTreeSet<Field>,
}

#[derive(Debug)]
pub struct ApplianceTracker {
    computed: ApplianceState,
    schema: Option<Schema>,
    debounce: DockDebounce,
}

impl ApplianceTracker {
    pub fn new(dock_delay: Duration) -> Self {
        Self {
            computed: ApplianceState::default(),
            schema: None,
            debounce: DockDebounce::new(dock_delay),
        }
    }

    /// Schema in use; novel until the first map says otherwise.
    pub fn schema(&self) -> Schema {
        self.schema.unwrap_or_default()
    }

    pub fn generation(&self) -> Option<SchemaGeneration> {
        self.schema.map(|s| s.generation)
    }

    fn detect(&mut self, dps: &DpsMap) -> Schema {
        *self.schema.get_or_insert_with(|| {
            let generation = SchemaGeneration::detect(dps);
            info!("Detected {:?} DPS schema", generation);
            Schema::new(generation)
        })
    }

    /// Applies a cached snapshot. The dock status is committed directly.
    pub fn seed(&mut self, dps: &DpsMap) -> Visible {
        let schema = self.detect(dps);
        let applied = reconciler::apply(&self.computed, dps, &schema);
        self.computed = applied.state;
        self.debounce.commit_now(self.computed.dock_status);
        Visible {
            state: self.visible(),
            changed: applied.changed,
        }
    }

    pub fn apply(&mut self, dps: &DpsMap, now: Instant) -> Visible {
        let schema = self.detect(dps);
        let applied = reconciler::apply(&self.computed, dps, &schema);
        self.computed = applied.state;
        if applied.changed.contains(&Field::DockStatus) {
            if let Some(status) = self.computed.dock_status {
                self.debounce.observe(status, now);
            }
        }
        Visible {
            state: self.visible(),
            changed: applied.changed,
        }
    }

    /// When the pending dock status is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Commits a due dock status and returns the new visible state.
    pub fn fire(&mut self, now: Instant) -> Option<ApplianceState> {
        self.debounce.fire(now).map(|_| self.visible())
    }

    pub fn visible(&self) -> ApplianceState {
        ApplianceState {
            dock_status: self.debounce.committed(),
            ..self.computed.clone()
        }
    }

    pub fn computed(&self) -> &ApplianceState {
        &self.computed
    }
}
