//! Command dispatch and slot coordination.
//!
//! `Engine` owns the whole store: slots, transport, scheduler, cart,
//! modes, features, and security. One call path mutates it:
//! [`Engine::execute_command`] parses a line, classifies it, and runs
//! the matching handler. Deferred work (settle delays, break timers,
//! bar-boundary swaps) runs from [`Engine::pump`] and
//! [`Engine::on_bar`], both driven by the caller's loop.
//!
//! Handlers validate before they mutate. A failed command emits exactly
//! one sink message and leaves the store untouched.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::autocomplete::{self, SuggestionItem};
use crate::catalog::{self, ProductCatalog};
use crate::clock::Transport;
use crate::command_parser::{
    self, BreakKind, Command, CommandError, ConveyorSpeed, FadeTarget, FeatureCommand,
    ShopliftCommand, TransitionKind,
};
use crate::config::StoreConfig;
use crate::features::{CouponCode, FeatureState, PerfProfile, Season};
use crate::modes::{self, Mode, ModeHandler, ModeSet};
use crate::product_parser::ProductRequest;
use crate::scheduler::{DeferredTask, Scheduler};
use crate::security::SecurityState;
use crate::slots::{self, PendingChange, ProductInstance, SlotId, SlotStore};
use crate::synth::{SoundBank, VoiceSpec};
use crate::wheels::CartState;

/// How long the checkout line holds before the register frees up.
const CHECKOUT_LINE_WAIT: Duration = Duration::from_secs(5);
/// Intermission length before the clock restarts.
const INTERMISSION_WAIT: Duration = Duration::from_secs(3);
/// Coffee and smoke breaks are over quickly.
const SHORT_BREAK_WAIT: Duration = Duration::from_secs(2);
/// Elevator music wears off on its own.
const ELEVATOR_RESTORE: Duration = Duration::from_secs(5);

/// Receives the user-facing lines handlers produce. The REPL prints
/// them; tests capture them. Diagnostics go through `tracing` instead.
pub trait LogSink {
    fn log(&mut self, message: &str);
}

/// Prints every message straight to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn log(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Collects messages behind a shared handle. Clone one half into the
/// engine and keep the other to inspect what was said.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Rc<RefCell<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.borrow().iter().any(|line| line.contains(needle))
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl LogSink for MemorySink {
    fn log(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Mutable store state, passed by reference into every handler.
#[derive(Debug)]
pub struct AppState {
    pub slots: SlotStore,
    pub transport: Transport,
    pub scheduler: Scheduler,
    pub modes: ModeSet,
    pub cart: CartState,
    pub features: FeatureState,
    pub security: SecurityState,
    pub perf_profile: PerfProfile,
}

impl AppState {
    pub fn new(config: &StoreConfig) -> Self {
        AppState {
            slots: SlotStore::new(),
            transport: Transport::new(config.clock.bpm, config.clock.beats_per_bar),
            scheduler: Scheduler::new(),
            modes: ModeSet::new(),
            cart: CartState::new(),
            features: FeatureState::new(),
            security: SecurityState::new(),
            perf_profile: PerfProfile::default(),
        }
    }
}

/// The command interpreter. One instance per store.
pub struct Engine {
    state: AppState,
    catalog: ProductCatalog,
    bank: Box<dyn SoundBank>,
    sink: Box<dyn LogSink>,
    config: StoreConfig,
    mode_handlers: HashMap<Mode, ModeHandler>,
    rng: StdRng,
}

impl Engine {
    pub fn new(config: StoreConfig, bank: Box<dyn SoundBank>, sink: Box<dyn LogSink>) -> Self {
        let state = AppState::new(&config);
        Engine {
            state,
            catalog: ProductCatalog::stocked(),
            bank,
            sink,
            config,
            mode_handlers: modes::handler_table(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic randomness for scripted runs and tests.
    pub fn with_seed(
        config: StoreConfig,
        bank: Box<dyn SoundBank>,
        sink: Box<dyn LogSink>,
        seed: u64,
    ) -> Self {
        let mut engine = Engine::new(config, bank, sink);
        engine.rng = StdRng::seed_from_u64(seed);
        engine
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run one raw line. Returns whether a handler actually did its
    /// thing; errors are reported through the sink, never raised.
    pub fn execute_command(&mut self, raw: &str) -> bool {
        self.execute_command_at(raw, Instant::now())
    }

    pub fn execute_command_at(&mut self, raw: &str, now: Instant) -> bool {
        let line = match command_parser::parse_line(raw) {
            Ok(Some(line)) => line,
            Ok(None) => return false,
            Err(err) => {
                self.sink.log(&err.to_string());
                return false;
            }
        };
        let command = match command_parser::classify(&line, self.config.product.max_modifiers) {
            Ok(command) => command,
            Err(err) => {
                self.sink.log(&err.to_string());
                return false;
            }
        };
        debug!(?command, "dispatch");
        match self.dispatch(command, now) {
            Ok(handled) => handled,
            Err(err) => {
                self.sink.log(&err.to_string());
                false
            }
        }
    }

    /// A bar boundary just passed: land every armed replacement.
    pub fn on_bar(&mut self) {
        self.on_bar_at(Instant::now());
    }

    pub fn on_bar_at(&mut self, now: Instant) {
        let fade = self.fade();
        let settle = self.settle();
        for token in self.state.transport.fire_bar() {
            match self.state.slots.take_pending_for(token) {
                Some((slot, change)) => {
                    if let Some(old) = self.state.slots.set_current(slot, None) {
                        self.bank.teardown(old.voice, fade);
                    }
                    self.state.scheduler.schedule_at(
                        now + settle,
                        DeferredTask::FinishSwap {
                            slot,
                            request: change.request,
                        },
                    );
                }
                // Registration outlived its pending entry; nothing to land.
                None => debug!(?token, "boundary fired for a cancelled registration"),
            }
        }
    }

    /// Run whatever deferred work has come due.
    pub fn pump(&mut self) {
        self.pump_at(Instant::now());
    }

    pub fn pump_at(&mut self, now: Instant) {
        for task in self.state.scheduler.run_due(now) {
            match task {
                DeferredTask::FinishSwap { slot, request } => self.place(slot, request),
                DeferredTask::ResumeClock => {
                    self.state.transport.start();
                    self.say("▶️ Shopping resumes!");
                }
                DeferredTask::Announce { message } => self.say(&message),
            }
        }
    }

    pub fn update_suggestions(&self, text: &str, cursor: usize) -> Vec<SuggestionItem> {
        autocomplete::suggest(text, cursor, &self.config.autocomplete, &self.catalog)
    }

    pub fn accept_suggestion(
        &self,
        text: &str,
        cursor: usize,
        item: &SuggestionItem,
    ) -> (String, usize) {
        autocomplete::accept(text, cursor, item)
    }

    fn say(&mut self, message: &str) {
        self.sink.log(message);
    }

    fn settle(&self) -> Duration {
        Duration::from_millis(self.config.product.settle_ms)
    }

    fn fade(&self) -> Duration {
        Duration::from_millis(self.config.product.fade_ms)
    }

    fn dispatch(&mut self, command: Command, now: Instant) -> Result<bool, CommandError> {
        match command {
            Command::Break(kind) => self.handle_break(kind, now),
            Command::Transition(kind) => self.handle_transition(kind, now),
            Command::ClosingTime => {
                let bpm = self.state.transport.nudge_bpm(10.0);
                debug!(bpm, "closing time");
                self.say("It's closing time! The music speeds up as customers rush to finish shopping...");
                Ok(true)
            }
            Command::OpeningTime => {
                let bpm = self.state.transport.nudge_bpm(-10.0);
                debug!(bpm, "opening time");
                self.say("It's opening time! The music slows down as the day begins calmly...");
                Ok(true)
            }
            Command::CartWheels { spec } => match self.state.cart.set_wheels(&spec) {
                Some(message) => {
                    self.say(&message);
                    Ok(true)
                }
                None => Err(CommandError::InvalidParameterValue {
                    what: "cart wheels",
                    given: spec,
                }),
            },
            Command::Add { slot, request } => self.handle_add(slot, request, now),
            Command::RemoveAll => self.handle_remove_all(),
            Command::RemoveSlot { slot } => self.handle_remove_slot(slot),
            Command::Mode { mode, enabled } => {
                if let Some(handler) = self.mode_handlers.get(&mode).copied() {
                    let message = handler(&mut self.state, enabled);
                    self.say(&message);
                }
                Ok(true)
            }
            Command::Feature(feature) => self.handle_feature(feature, now),
            Command::PerfStats => {
                self.handle_perf_stats();
                Ok(true)
            }
            Command::PerfMode { profile } => {
                self.state.perf_profile = profile;
                self.say(profile.activation_message());
                Ok(true)
            }
            Command::Shoplift(command) => self.handle_shoplift(command),
        }
    }

    // ---- add / replace / remove ------------------------------------

    fn handle_add(
        &mut self,
        slot: SlotId,
        request: ProductRequest,
        now: Instant,
    ) -> Result<bool, CommandError> {
        if !self.catalog.contains(&request.product) {
            return Err(CommandError::UnknownProduct {
                name: request.product,
            });
        }

        // Whatever was queued or mid-swap for this slot is obsolete now.
        self.cancel_outstanding(slot);

        let old_name = match self.state.slots.current(slot) {
            Some(instance) => instance.request.product.clone(),
            None => {
                self.place(slot, request);
                return Ok(true);
            }
        };

        if self.state.transport.is_running() {
            self.say(&format!(
                "🔄 Slot {slot} update queued: {old_name} → {} (on next bar)",
                request.product
            ));
            let token = self.state.transport.arm();
            self.state
                .slots
                .set_pending(slot, Some(PendingChange { request, token }));
        } else {
            self.say(&format!("🔄 Slot {slot}: {old_name} → {}", request.product));
            let fade = self.fade();
            if let Some(old) = self.state.slots.set_current(slot, None) {
                self.bank.teardown(old.voice, fade);
            }
            self.state
                .scheduler
                .schedule_at(now + self.settle(), DeferredTask::FinishSwap { slot, request });
        }
        Ok(true)
    }

    fn handle_remove_slot(&mut self, slot: SlotId) -> Result<bool, CommandError> {
        self.cancel_outstanding(slot);
        let fade = self.fade();
        match self.state.slots.set_current(slot, None) {
            Some(old) => {
                self.bank.teardown(old.voice, fade);
                self.say(&format!(
                    "🗑️ Slot {slot} cleared ({} removed)",
                    old.request.product
                ));
                Ok(true)
            }
            None => {
                self.say(&format!("❌ Slot {slot} is already empty"));
                Ok(false)
            }
        }
    }

    fn handle_remove_all(&mut self) -> Result<bool, CommandError> {
        if self.state.slots.is_empty() {
            self.say("No products to remove.");
            return Ok(false);
        }
        let cleared = self.clear_all_slots();
        self.say(&format!("🧹 All {cleared} slots cleared"));
        Ok(true)
    }

    /// Construct a voice and occupy the slot. The catalog was checked at
    /// dispatch; a miss here means the request outlived a restock, in
    /// which case it is dropped quietly.
    fn place(&mut self, slot: SlotId, request: ProductRequest) {
        let spec = match self.voice_spec(&request) {
            Some(spec) => spec,
            None => {
                debug!(product = %request.product, "placement dropped, no longer stocked");
                return;
            }
        };
        let voice = self.bank.build(&spec);
        self.log_added(&request);
        self.state
            .slots
            .set_current(slot, Some(ProductInstance { request, voice }));
    }

    /// Drop any queued replacement and any mid-settle construction so
    /// the slot has exactly one future again.
    fn cancel_outstanding(&mut self, slot: SlotId) {
        if let Some(stale) = self.state.slots.set_pending(slot, None) {
            self.state.transport.cancel(stale.token);
        }
        self.state.scheduler.cancel_swaps_for(slot);
    }

    fn clear_all_slots(&mut self) -> usize {
        let fade = self.fade();
        let mut cleared = 0;
        for slot in SlotId::all() {
            self.cancel_outstanding(slot);
            if let Some(old) = self.state.slots.set_current(slot, None) {
                self.bank.teardown(old.voice, fade);
                cleared += 1;
            }
        }
        cleared
    }

    fn voice_spec(&self, request: &ProductRequest) -> Option<VoiceSpec> {
        let def = self.catalog.get(&request.product)?;
        let effects = request
            .modifiers
            .iter()
            .filter_map(|name| catalog::modifier(name))
            .map(|def| def.effect)
            .collect();
        let rate = request
            .params
            .shelf_life
            .map(|life| life.rate())
            .unwrap_or(def.rate);
        Some(VoiceSpec {
            product: def.name.to_string(),
            family: def.family,
            note: def.note.to_string(),
            rate: rate.to_string(),
            effects,
            params: request.params.clone(),
            volume_db: request
                .params
                .volume_db
                .unwrap_or(self.config.product.base_volume_db),
        })
    }

    fn log_added(&mut self, request: &ProductRequest) {
        let name = &request.product;
        if request.modifiers.is_empty() {
            self.sink
                .log(&format!("Added regular {name} (as regular as anything can be here...)"));
        } else {
            let descriptions: Vec<&str> = request
                .modifiers
                .iter()
                .filter_map(|modifier| catalog::modifier(modifier))
                .map(|def| def.description)
                .collect();
            self.sink.log(&format!(
                "Added {} {name} ({})",
                request.modifiers.join(" "),
                descriptions.join(", ")
            ));
        }
        if let Some(grade) = request.params.nutriscore {
            self.sink.log(&format!(
                "🏷️ Nutriscore {} applied to {name}",
                grade.to_ascii_uppercase()
            ));
        }
        if let Some(life) = request.params.shelf_life {
            self.sink.log(&format!(
                "⏳ Shelf life set - product repetition: {}",
                life.rate()
            ));
        }
        if request.params.open {
            self.sink.log(&format!(
                "⚠️ Warning: This {name} has been opened... it behaves unpredictably!"
            ));
        }
        if let Some(escalator) = request.params.escalator {
            self.sink.log(&format!(
                "🛗 Escalator mode: {} at {} speed",
                escalator.pattern.word(),
                escalator.speed.word()
            ));
        }
        if let Some(db) = request.params.volume_db {
            self.sink.log(&format!("🔊 Volume set to {db:.0} dB"));
        }
    }

    // ---- breaks and transitions ------------------------------------

    fn handle_break(&mut self, kind: BreakKind, now: Instant) -> Result<bool, CommandError> {
        match kind {
            BreakKind::CheckoutLine => {
                self.say("🛒 Waiting in the checkout line... Everything fades to silence...");
                self.state.scheduler.schedule_at(
                    now + CHECKOUT_LINE_WAIT,
                    DeferredTask::Announce {
                        message: "✅ Your turn at the register! Music resumes...".to_string(),
                    },
                );
            }
            BreakKind::LunchBreak { on: true } => {
                self.state.cart.stop();
                self.say("🍕 Taking a lunch break... The drums stop, music softens...");
            }
            BreakKind::LunchBreak { on: false } => {
                self.state.cart.resume();
                self.say("🛒 Back to shopping! Full energy restored...");
            }
            BreakKind::StoreClosing => {
                let bpm = self.state.transport.nudge_bpm(-20.0);
                debug!(bpm, "store closing");
                self.say("🌙 The store is closing... Everything slowly fades away...");
            }
            BreakKind::Cleanup => {
                let cleared = self.clear_all_slots();
                debug!(cleared, "cleanup");
                self.say("🧹 Cleanup time... Only the store muzak remains...");
            }
            BreakKind::Intermission => {
                self.state.transport.stop();
                self.say("⏸️ Intermission... Time stands still in the aisles...");
                self.state
                    .scheduler
                    .schedule_at(now + INTERMISSION_WAIT, DeferredTask::ResumeClock);
            }
            BreakKind::Coffee => {
                self.say("☕ Quick coffee break...");
                self.state.scheduler.schedule_at(
                    now + SHORT_BREAK_WAIT,
                    DeferredTask::Announce {
                        message: "Back to shopping!".to_string(),
                    },
                );
            }
            BreakKind::Smoke => {
                self.say("🚬 Stepping outside for a moment...");
                self.state.scheduler.schedule_at(
                    now + SHORT_BREAK_WAIT,
                    DeferredTask::Announce {
                        message: "Back to shopping!".to_string(),
                    },
                );
            }
        }
        Ok(true)
    }

    fn handle_transition(
        &mut self,
        kind: TransitionKind,
        now: Instant,
    ) -> Result<bool, CommandError> {
        match kind {
            TransitionKind::Conveyor { speed } => {
                let pace = match speed {
                    ConveyorSpeed::Fast => " quickly",
                    ConveyorSpeed::Slow => " slowly",
                    ConveyorSpeed::Normal => "",
                };
                self.say(&format!("🛒 Products rolling on the conveyor belt{pace}..."));
            }
            TransitionKind::SlidingDoors => {
                self.say("🚪 Walking through the sliding doors... Sound sweeps across the space...");
            }
            TransitionKind::ElevatorMusic => {
                self.say("🎵 Elevator music mode... Everything sounds distant and muffled...");
                self.state.scheduler.schedule_at(
                    now + ELEVATOR_RESTORE,
                    DeferredTask::Announce {
                        message: "Back to normal audio quality!".to_string(),
                    },
                );
            }
            TransitionKind::Crossfade => {
                self.say("🔄 Smooth transition between product sections...");
            }
            TransitionKind::FadeTo { target } => {
                let message = match target {
                    FadeTarget::Silence => "🔇 Fading to silence...",
                    FadeTarget::Full => "🔊 Fading to full volume...",
                    FadeTarget::Soft => "🔉 Fading to soft background level...",
                };
                self.say(message);
            }
            TransitionKind::MorphTo { product } => return self.handle_morph(product, now),
        }
        Ok(true)
    }

    /// Replace every occupied slot with the same product, through the
    /// normal replacement path (so it lands on the bar when running).
    fn handle_morph(&mut self, product: String, now: Instant) -> Result<bool, CommandError> {
        if !self.catalog.contains(&product) {
            return Err(CommandError::UnknownProduct { name: product });
        }
        self.say(&format!("🔮 Morphing all products into {product}..."));
        let occupied: Vec<SlotId> = self.state.slots.occupied().map(|(slot, _)| slot).collect();
        for slot in occupied {
            self.handle_add(slot, ProductRequest::bare(&product), now)?;
        }
        Ok(true)
    }

    // ---- store features --------------------------------------------

    fn handle_feature(
        &mut self,
        feature: FeatureCommand,
        _now: Instant,
    ) -> Result<bool, CommandError> {
        match feature {
            FeatureCommand::StartCheckout => {
                if self.state.features.checkout_recording {
                    self.say("⏺️ Checkout already in progress.");
                    return Ok(false);
                }
                self.state.features.checkout_recording = true;
                self.say("⏺️ Checkout started - recording this visit to the store...");
            }
            FeatureCommand::FinishCheckout => {
                if !self.state.features.checkout_recording {
                    self.say("No checkout in progress.");
                    return Ok(false);
                }
                self.state.features.checkout_recording = false;
                self.say("⏹️ Checkout complete - take your receipt on the way out.");
            }
            FeatureCommand::ScanBarcode { code } => return self.handle_barcode(code),
            FeatureCommand::Season { name } => {
                let season = match Season::parse(&name) {
                    Some(season) => season,
                    None => {
                        return Err(CommandError::InvalidParameterValue {
                            what: "season",
                            given: name,
                        })
                    }
                };
                self.state.features.season = season;
                self.say(&format!("🗓️ Season set to {}. {}", season.word(), season.flavor()));
            }
            FeatureCommand::Announcement { message } => {
                if message.is_empty() {
                    self.say("📢 *ding* Attention shoppers!");
                } else {
                    self.say(&format!("📢 Attention shoppers: {message}"));
                }
            }
            FeatureCommand::RushHour { on } => return Ok(self.handle_rush_hour(on)),
            FeatureCommand::Coupon { code } => {
                let coupon = match CouponCode::parse(&code) {
                    Some(coupon) => coupon,
                    None => {
                        return Err(CommandError::InvalidParameterValue {
                            what: "coupon",
                            given: code,
                        })
                    }
                };
                let effect = match coupon {
                    CouponCode::Bogo => "buy one get one, every product doubles up",
                    CouponCode::HalfOff => "everything runs at half speed",
                    CouponCode::FreeShip => "spacious reverb on the house",
                    CouponCode::Vip => "luxury effects for a luxury shopper",
                };
                self.say(&format!("🎟️ Coupon {} applied - {effect}!", coupon.code()));
            }
            FeatureCommand::DecayOn => {
                self.state.features.decay = true;
                self.say("🦠 Product decay begins... everything detunes as it spoils.");
            }
            FeatureCommand::DecayOff => {
                self.state.features.decay = false;
                self.say("🧊 Decay halted. The preservatives kick in.");
            }
            FeatureCommand::SpoilAll => {
                if self.state.features.preserved.is_empty() {
                    self.say("🤢 Everything on the shelf spoils at once!");
                } else {
                    self.say("🤢 Everything spoils at once... except the preserved goods.");
                }
            }
            FeatureCommand::Preserve { product } => {
                if !self.catalog.contains(&product) {
                    return Err(CommandError::UnknownProduct { name: product });
                }
                self.state.features.preserved.insert(product.clone());
                self.say(&format!("🥫 {product} is preserved - it will never spoil."));
            }
            FeatureCommand::StoreLayout => {
                self.say("🗺️ STORE LAYOUT:");
                let lines: Vec<String> = self
                    .state
                    .slots
                    .occupied()
                    .map(|(slot, instance)| format!("  {slot} {}", instance.request.product))
                    .collect();
                if lines.is_empty() {
                    self.say("  (empty shelves)");
                }
                for line in lines {
                    self.say(&line);
                }
                let cart = self.state.cart.wheels.clone();
                self.say(&format!("  cart: {cart} wheels"));
            }
            FeatureCommand::MapCompose { on } => {
                self.state.features.map_compose = on;
                if on {
                    self.say("🗺️ Map compose on - walk the aisles to play the store.");
                } else {
                    self.say("🗺️ Map compose off.");
                }
            }
        }
        Ok(true)
    }

    fn handle_barcode(&mut self, code: String) -> Result<bool, CommandError> {
        let digits = if code.is_empty() {
            (0..8)
                .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
                .collect()
        } else {
            if !code.chars().all(|c| c.is_ascii_digit()) {
                return Err(CommandError::InvalidParameterValue {
                    what: "barcode",
                    given: code,
                });
            }
            code
        };
        self.say(&format!(
            "📟 *beep* Scanning barcode {digits}... each digit plays a note over the PA."
        ));
        Ok(true)
    }

    /// Edge-triggered so repeated calls never stack tempo shifts.
    fn handle_rush_hour(&mut self, on: bool) -> bool {
        match (on, self.state.features.rush_hour) {
            (true, false) => {
                self.state.features.rush_hour = true;
                let bpm = self.state.transport.nudge_bpm(15.0);
                self.say(&format!(
                    "🏃 RUSH HOUR! The aisles flood and the tempo climbs to {bpm:.0} BPM!"
                ));
                true
            }
            (false, true) => {
                self.state.features.rush_hour = false;
                let bpm = self.state.transport.nudge_bpm(-15.0);
                self.say(&format!("🏃 Rush hour ends. Tempo settles back to {bpm:.0} BPM."));
                true
            }
            (true, true) => {
                self.say("🏃 The aisles are already packed.");
                false
            }
            (false, false) => {
                self.say("🏃 No rush hour to call off.");
                false
            }
        }
    }

    // ---- performance and shoplifting --------------------------------

    fn handle_perf_stats(&mut self) {
        let occupied = self.state.slots.occupied_count();
        let pending = self.state.slots.pending_count();
        let deferred = self.state.scheduler.len();
        let bpm = self.state.transport.bpm();
        let running = if self.state.transport.is_running() {
            "running"
        } else {
            "stopped"
        };
        let modes = self.state.modes.active();
        let modes = if modes.is_empty() {
            "none".to_string()
        } else {
            modes
                .iter()
                .map(|mode| mode.key())
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.say("🎛️ PERFORMANCE STATISTICS:");
        self.say(&format!("Occupied Slots: {occupied}/{}", slots::SLOT_COUNT));
        self.say(&format!("Pending Changes: {pending}"));
        self.say(&format!("Deferred Tasks: {deferred}"));
        self.say(&format!("Tempo: {bpm:.0} BPM ({running})"));
        self.say(&format!("Active Modes: {modes}"));
        self.say(&format!("Audio Profile: {}", self.state.perf_profile.label()));
    }

    fn handle_shoplift(&mut self, command: ShopliftCommand) -> Result<bool, CommandError> {
        match command {
            ShopliftCommand::Steal { product } => {
                let slot = match self.state.slots.find_product(&product) {
                    Some(slot) => slot,
                    None => {
                        if !self.catalog.contains(&product) {
                            return Err(CommandError::UnknownProduct { name: product });
                        }
                        self.say(&format!("🚨 No {product} on the shelf to steal."));
                        return Ok(false);
                    }
                };
                let roll: f32 = self.rng.gen();
                if self.state.security.attempt(roll) {
                    self.cancel_outstanding(slot);
                    let fade = self.fade();
                    if let Some(old) = self.state.slots.set_current(slot, None) {
                        self.bank.teardown(old.voice, fade);
                    }
                    self.say(&format!(
                        "🏃💨 You pocket the {product} and slip out! Slot {slot} stands empty."
                    ));
                } else if self.state.security.chase {
                    self.say(&format!(
                        "🚔 BUSTED! Security chases you down the aisle and takes back the {product}."
                    ));
                } else {
                    self.say(&format!(
                        "🚔 BUSTED! Security catches you with the {product}. It goes back on the shelf."
                    ));
                }
                Ok(true)
            }
            ShopliftCommand::SecurityLevel { level } => {
                let message = self.state.security.set_level(level);
                self.say(&message);
                Ok(true)
            }
            ShopliftCommand::Chase { on } => {
                self.state.security.chase = on;
                if on {
                    self.say("🚨 Security chase ON - sirens between the aisles!");
                } else {
                    self.say("🚨 Security calls off the chase.");
                }
                Ok(true)
            }
            ShopliftCommand::Stats => {
                for line in self.state.security.stats_lines() {
                    self.say(&line);
                }
                Ok(true)
            }
        }
    }
}
