//! The sound bank boundary: voice construction and teardown.
//!
//! The engine talks to audio through the `SoundBank` trait so the command
//! machinery can run headless. `SilentBank` is the headless implementation
//! used by script execution and the test suite; it keeps just enough
//! bookkeeping to answer what is currently ringing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::catalog::{ModifierEffect, VoiceFamily};
use crate::product_parser::SpecialParams;

/// Opaque handle to a constructed voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(u64);

/// Everything a bank needs to construct one product voice.
#[derive(Debug, Clone)]
pub struct VoiceSpec {
    pub product: String,
    pub family: VoiceFamily,
    pub note: String,
    pub rate: String,
    pub effects: Vec<ModifierEffect>,
    pub params: SpecialParams,
    pub volume_db: f32,
}

/// Where voices get built and torn down. Construction is immediate;
/// teardown fades over the given duration.
pub trait SoundBank {
    fn build(&mut self, spec: &VoiceSpec) -> VoiceId;
    fn teardown(&mut self, id: VoiceId, fade: Duration);
}

/// A bank that makes no sound. Records what was asked of it.
#[derive(Debug, Default)]
pub struct SilentBank {
    next_id: u64,
    live: HashMap<VoiceId, VoiceSpec>,
    built: usize,
    torn: usize,
}

impl SilentBank {
    pub fn new() -> Self {
        SilentBank::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: VoiceId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_product(&self, id: VoiceId) -> Option<&str> {
        self.live.get(&id).map(|spec| spec.product.as_str())
    }

    /// Lifetime totals; unlike `live_count` these survive teardown.
    pub fn built_total(&self) -> usize {
        self.built
    }

    pub fn torn_total(&self) -> usize {
        self.torn
    }
}

impl SoundBank for SilentBank {
    fn build(&mut self, spec: &VoiceSpec) -> VoiceId {
        self.next_id += 1;
        let id = VoiceId(self.next_id);
        debug!(
            product = %spec.product,
            family = spec.family.label(),
            note = %spec.note,
            rate = %spec.rate,
            volume_db = spec.volume_db,
            "voice up"
        );
        self.live.insert(id, spec.clone());
        self.built += 1;
        id
    }

    fn teardown(&mut self, id: VoiceId, fade: Duration) {
        if self.live.remove(&id).is_some() {
            debug!(?id, fade_ms = fade.as_millis() as u64, "voice down");
            self.torn += 1;
        }
    }
}

/// Shared handle over a bank. Lets a caller keep a probe on voice state
/// while the engine owns the boxed side.
impl SoundBank for Rc<RefCell<SilentBank>> {
    fn build(&mut self, spec: &VoiceSpec) -> VoiceId {
        self.borrow_mut().build(spec)
    }

    fn teardown(&mut self, id: VoiceId, fade: Duration) {
        self.borrow_mut().teardown(id, fade)
    }
}
