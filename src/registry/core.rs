use std::collections::BTreeMap;

use crate::error::{FigureError, Result};
use crate::layout::{Label, PanelSlot, Resolved};
use crate::render::Instruction;

/// Last known state of one panel: its resolved slot plus any styling
/// instructions queued while the panel was open.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub slot: PanelSlot,
    queued: Vec<Instruction>,
    pub is_dirty: bool,
}

impl PanelState {
    fn new(slot: PanelSlot) -> Self {
        Self {
            slot,
            queued: Vec::new(),
            is_dirty: false,
        }
    }
}

/// Registry mapping panel labels to their states.
///
/// Keyed by label in a sorted map, so iteration naturally follows the
/// resolved slot order. Instructions accumulate per panel and are drained in
/// that order at finalization.
#[derive(Debug, Default)]
pub struct PanelRegistry {
    entries: BTreeMap<Label, PanelState>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror a freshly resolved layout: new labels appear, regions of kept
    /// labels are refreshed, and labels no longer present drop out together
    /// with anything still queued on them.
    pub fn sync_slots(&mut self, resolved: &Resolved) {
        let mut entries = BTreeMap::new();
        for slot in &resolved.slots {
            let state = match self.entries.remove(&slot.label) {
                Some(mut existing) => {
                    existing.slot = slot.clone();
                    existing
                }
                None => PanelState::new(slot.clone()),
            };
            entries.insert(slot.label.clone(), state);
        }
        self.entries = entries;
    }

    /// Queue an instruction on a panel and mark it dirty.
    pub fn queue(&mut self, label: &Label, instruction: Instruction) -> Result<()> {
        let state = self
            .entries
            .get_mut(label)
            .ok_or_else(|| FigureError::PanelNotFound(label.to_string()))?;
        state.queued.push(instruction);
        state.is_dirty = true;
        Ok(())
    }

    /// Drain every queued instruction, panel by panel in label order.
    pub fn take_dirty(&mut self) -> Vec<Instruction> {
        let mut drained = Vec::new();
        for state in self.entries.values_mut() {
            if state.is_dirty {
                drained.append(&mut state.queued);
                state.is_dirty = false;
            }
        }
        drained
    }

    pub fn has_dirty(&self) -> bool {
        self.entries.values().any(|state| state.is_dirty)
    }

    pub fn state(&self, label: &Label) -> Option<&PanelState> {
        self.entries.get(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
