//! The shelf: ten numbered slots and their replacement bookkeeping.
//!
//! Each slot holds at most one live product and at most one pending
//! replacement. Pending changes are keyed by the transport token that was
//! armed for them, so a fired bar boundary can be routed back to the slot
//! that registered it.

use std::fmt;

use crate::clock::BoundaryToken;
use crate::product_parser::ProductRequest;
use crate::synth::VoiceId;

pub const SLOT_COUNT: usize = 10;

/// A validated slot index, 0 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u8);

impl SlotId {
    pub fn new(index: u8) -> Option<Self> {
        (index < SLOT_COUNT as u8).then_some(SlotId(index))
    }

    pub fn from_digit(digit: char) -> Option<Self> {
        digit.to_digit(10).and_then(|d| SlotId::new(d as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..SLOT_COUNT as u8).map(SlotId)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// A product occupying a slot: what was asked for plus the live voice.
#[derive(Debug, Clone)]
pub struct ProductInstance {
    pub request: ProductRequest,
    pub voice: VoiceId,
}

/// A replacement waiting for the next bar boundary.
#[derive(Debug, Clone)]
pub struct PendingChange {
    pub request: ProductRequest,
    pub token: BoundaryToken,
}

#[derive(Debug, Default)]
pub struct SlotStore {
    current: [Option<ProductInstance>; SLOT_COUNT],
    pending: [Option<PendingChange>; SLOT_COUNT],
}

impl SlotStore {
    pub fn new() -> Self {
        SlotStore::default()
    }

    pub fn current(&self, slot: SlotId) -> Option<&ProductInstance> {
        self.current[slot.index()].as_ref()
    }

    /// Install or clear the occupant; returns whatever was displaced.
    pub fn set_current(
        &mut self,
        slot: SlotId,
        instance: Option<ProductInstance>,
    ) -> Option<ProductInstance> {
        std::mem::replace(&mut self.current[slot.index()], instance)
    }

    pub fn pending(&self, slot: SlotId) -> Option<&PendingChange> {
        self.pending[slot.index()].as_ref()
    }

    pub fn set_pending(
        &mut self,
        slot: SlotId,
        change: Option<PendingChange>,
    ) -> Option<PendingChange> {
        std::mem::replace(&mut self.pending[slot.index()], change)
    }

    /// Claim the pending change registered under a fired boundary token.
    pub fn take_pending_for(&mut self, token: BoundaryToken) -> Option<(SlotId, PendingChange)> {
        for slot in SlotId::all() {
            let matches = self.pending[slot.index()]
                .as_ref()
                .is_some_and(|change| change.token == token);
            if matches {
                let change = self.pending[slot.index()].take();
                return change.map(|change| (slot, change));
            }
        }
        None
    }

    pub fn occupied(&self) -> impl Iterator<Item = (SlotId, &ProductInstance)> {
        SlotId::all().filter_map(|slot| self.current(slot).map(|instance| (slot, instance)))
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.iter().filter(|change| change.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Lowest-numbered slot currently holding the named product.
    pub fn find_product(&self, name: &str) -> Option<SlotId> {
        self.occupied()
            .find(|(_, instance)| instance.request.product == name)
            .map(|(slot, _)| slot)
    }
}
