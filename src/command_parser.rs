//! Line tokenizer and the ordered command classifier.
//!
//! A raw line is stripped of its `//` comment, lowercased, trimmed, and
//! split into an optional `[d]` slot prefix plus a body. The classifier
//! then walks a fixed predicate list top to bottom; the first match decides
//! the command kind. Classification is pure: nothing here touches slots,
//! the clock, or the log.

use std::fmt;

use crate::features::PerfProfile;
use crate::modes::{self, Mode};
use crate::product_parser::{parse_product_request, ProductRequest};
use crate::security;
use crate::slots::SlotId;

/// Everything that can go wrong before a handler runs. Display text is the
/// user-facing register message.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    InvalidSlot(String),
    MissingSlotPrefix { verb: &'static str },
    UnknownProduct { name: String },
    UnknownCommand,
    InvalidParameterValue { what: &'static str, given: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidSlot(address) => {
                write!(f, "❌ Invalid slot [{address}]! Use [0] through [9]")
            }
            CommandError::MissingSlotPrefix { verb: "add" } => {
                write!(f, "❌ Slot required! Use [0] through [9], e.g.: [0] add beer")
            }
            CommandError::MissingSlotPrefix { .. } => {
                write!(f, "❌ Specify slot to remove, e.g.: [0] remove, or use: remove all")
            }
            CommandError::UnknownProduct { name } => {
                write!(
                    f,
                    "Unknown product: {name}. This market has been abandoned for decades."
                )
            }
            CommandError::UnknownCommand => {
                write!(f, "Unknown command - the register won't accept that.")
            }
            CommandError::InvalidParameterValue { what: "security level", .. } => {
                write!(f, "Invalid security level. Use: low, medium, high, paranoid, or 0-100")
            }
            CommandError::InvalidParameterValue { what: "performance mode", .. } => {
                write!(f, "Invalid performance mode. Use: performance, balanced, or quality")
            }
            CommandError::InvalidParameterValue { what: "remove", given } => {
                write!(f, "⚠️ To remove slot {given}, just use: {given} remove")
            }
            CommandError::InvalidParameterValue { what, given } => {
                write!(f, "Invalid {what}: {given}")
            }
        }
    }
}

impl std::error::Error for CommandError {}

/// A normalized line: optional slot address plus a non-empty body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub slot: Option<SlotId>,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    CheckoutLine,
    LunchBreak { on: bool },
    StoreClosing,
    Cleanup,
    Intermission,
    Coffee,
    Smoke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConveyorSpeed {
    Slow,
    Normal,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeTarget {
    Silence,
    Full,
    Soft,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionKind {
    Conveyor { speed: ConveyorSpeed },
    SlidingDoors,
    ElevatorMusic,
    Crossfade,
    FadeTo { target: FadeTarget },
    MorphTo { product: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureCommand {
    StartCheckout,
    FinishCheckout,
    ScanBarcode { code: String },
    Season { name: String },
    Announcement { message: String },
    RushHour { on: bool },
    Coupon { code: String },
    DecayOn,
    DecayOff,
    SpoilAll,
    Preserve { product: String },
    StoreLayout,
    MapCompose { on: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShopliftCommand {
    Steal { product: String },
    SecurityLevel { level: f32 },
    Chase { on: bool },
    Stats,
}

/// One classified command, arguments parsed, nothing executed yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Break(BreakKind),
    Transition(TransitionKind),
    ClosingTime,
    OpeningTime,
    CartWheels { spec: String },
    Add { slot: SlotId, request: ProductRequest },
    RemoveAll,
    RemoveSlot { slot: SlotId },
    Mode { mode: Mode, enabled: bool },
    Feature(FeatureCommand),
    PerfStats,
    PerfMode { profile: PerfProfile },
    Shoplift(ShopliftCommand),
}

/// Drop a trailing `//` comment, lowercase, and trim.
pub fn normalize(raw: &str) -> String {
    let without_comment = match raw.find("//") {
        Some(at) => &raw[..at],
        None => raw,
    };
    without_comment.to_lowercase().trim().to_string()
}

/// Normalize a raw line and split off the slot prefix.
/// `Ok(None)` means a blank line or blank remainder, which is a no-op.
pub fn parse_line(raw: &str) -> Result<Option<ParsedLine>, CommandError> {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return Ok(None);
    }
    let (slot, body) = split_slot_prefix(&normalized)?;
    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(ParsedLine {
        slot,
        body: body.to_string(),
    }))
}

/// A leading `[...]` is always an address attempt: anything inside other
/// than a single digit 0-9 is an invalid slot. A `[` with no closing
/// bracket is not a prefix and is left for the classifier.
fn split_slot_prefix(body: &str) -> Result<(Option<SlotId>, &str), CommandError> {
    let Some(after_open) = body.strip_prefix('[') else {
        return Ok((None, body));
    };
    let Some(close) = after_open.find(']') else {
        return Ok((None, body));
    };
    let inside = &after_open[..close];
    let rest = after_open[close + 1..].trim_start();

    let mut chars = inside.chars();
    match (chars.next(), chars.next()) {
        (Some(digit), None) => match SlotId::from_digit(digit) {
            Some(slot) => Ok((Some(slot), rest)),
            None => Err(CommandError::InvalidSlot(inside.to_string())),
        },
        _ => Err(CommandError::InvalidSlot(inside.to_string())),
    }
}

/// Strip a leading verb at a word boundary. `strip_verb("add beer", "add")`
/// gives `Some("beer")`; `strip_verb("addendum", "add")` gives `None`.
fn strip_verb<'a>(body: &'a str, verb: &str) -> Option<&'a str> {
    let rest = body.strip_prefix(verb)?;
    if rest.is_empty() {
        Some("")
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Route a parsed line to a command kind. Predicates run in a fixed order;
/// the first match wins.
pub fn classify(line: &ParsedLine, max_modifiers: usize) -> Result<Command, CommandError> {
    let body = line.body.as_str();

    if let Some(kind) = parse_break(body) {
        return Ok(Command::Break(kind));
    }

    if let Some(kind) = parse_transition(body)? {
        return Ok(Command::Transition(kind));
    }

    if body == "it's closing time" || body == "its closing time" {
        return Ok(Command::ClosingTime);
    }

    if body == "it's opening time" || body == "its opening time" {
        return Ok(Command::OpeningTime);
    }

    if let Some(spec) = strip_verb(body, "my cart has") {
        return Ok(Command::CartWheels {
            spec: spec.to_string(),
        });
    }

    if let Some(rest) = strip_verb(body, "add") {
        let slot = line
            .slot
            .ok_or(CommandError::MissingSlotPrefix { verb: "add" })?;
        return Ok(Command::Add {
            slot,
            request: parse_product_request(rest, max_modifiers),
        });
    }

    if let Some(rest) = strip_verb(body, "remove") {
        if rest == "all" {
            return Ok(Command::RemoveAll);
        }
        return match line.slot {
            Some(slot) if rest.is_empty() => Ok(Command::RemoveSlot { slot }),
            Some(slot) => Err(CommandError::InvalidParameterValue {
                what: "remove",
                given: slot.to_string(),
            }),
            None => Err(CommandError::MissingSlotPrefix { verb: "remove" }),
        };
    }

    if let Some((mode, enabled)) = modes::parse_mode_command(body) {
        return Ok(Command::Mode { mode, enabled });
    }

    if let Some(feature) = parse_feature(body) {
        return Ok(Command::Feature(feature));
    }

    if body == "performance stats" || body == "show performance" {
        return Ok(Command::PerfStats);
    }

    if let Some(rest) = strip_verb(body, "performance mode") {
        if rest.is_empty() {
            return Ok(Command::PerfMode {
                profile: PerfProfile::Performance,
            });
        }
        let profile = PerfProfile::parse(rest).ok_or(CommandError::InvalidParameterValue {
            what: "performance mode",
            given: rest.to_string(),
        })?;
        return Ok(Command::PerfMode { profile });
    }

    if body == "quality mode" {
        return Ok(Command::PerfMode {
            profile: PerfProfile::Quality,
        });
    }

    if body == "balanced mode" {
        return Ok(Command::PerfMode {
            profile: PerfProfile::Balanced,
        });
    }

    if let Some(shoplift) = parse_shoplift(body)? {
        return Ok(Command::Shoplift(shoplift));
    }

    Err(CommandError::UnknownCommand)
}

fn parse_break(body: &str) -> Option<BreakKind> {
    match body {
        "checkout line" | "checkout line break" => Some(BreakKind::CheckoutLine),
        "lunch break" | "lunch break on" => Some(BreakKind::LunchBreak { on: true }),
        "lunch break off" => Some(BreakKind::LunchBreak { on: false }),
        "store closing" | "store closing soon" => Some(BreakKind::StoreClosing),
        "cleanup time" | "cleaning time" => Some(BreakKind::Cleanup),
        "intermission" | "pause shopping" => Some(BreakKind::Intermission),
        "coffee break" => Some(BreakKind::Coffee),
        "smoke break" => Some(BreakKind::Smoke),
        _ => None,
    }
}

fn parse_transition(body: &str) -> Result<Option<TransitionKind>, CommandError> {
    if let Some(rest) = strip_verb(body, "conveyor belt").or_else(|| strip_verb(body, "conveyor")) {
        let speed = if rest.split_whitespace().any(|w| w == "fast") {
            ConveyorSpeed::Fast
        } else if rest.split_whitespace().any(|w| w == "slow") {
            ConveyorSpeed::Slow
        } else {
            ConveyorSpeed::Normal
        };
        return Ok(Some(TransitionKind::Conveyor { speed }));
    }

    if strip_verb(body, "sliding doors").is_some() || strip_verb(body, "doors").is_some() {
        return Ok(Some(TransitionKind::SlidingDoors));
    }

    if body == "elevator music" || body == "muzak" {
        return Ok(Some(TransitionKind::ElevatorMusic));
    }

    if strip_verb(body, "smooth transition").is_some() || strip_verb(body, "crossfade").is_some() {
        return Ok(Some(TransitionKind::Crossfade));
    }

    if let Some(rest) = strip_verb(body, "fade to") {
        let target = match rest {
            "silence" => FadeTarget::Silence,
            "full" => FadeTarget::Full,
            "soft" | "quiet" => FadeTarget::Soft,
            other => {
                return Err(CommandError::InvalidParameterValue {
                    what: "fade target",
                    given: other.to_string(),
                })
            }
        };
        return Ok(Some(TransitionKind::FadeTo { target }));
    }

    if let Some(rest) = strip_verb(body, "morph to") {
        return Ok(Some(TransitionKind::MorphTo {
            product: rest.to_string(),
        }));
    }

    Ok(None)
}

fn parse_feature(body: &str) -> Option<FeatureCommand> {
    match body {
        "checkout" | "start checkout" => return Some(FeatureCommand::StartCheckout),
        "finish checkout" | "stop checkout" => return Some(FeatureCommand::FinishCheckout),
        "rush hour on" => return Some(FeatureCommand::RushHour { on: true }),
        "rush hour off" => return Some(FeatureCommand::RushHour { on: false }),
        "decay on" => return Some(FeatureCommand::DecayOn),
        "decay off" => return Some(FeatureCommand::DecayOff),
        "spoil all" => return Some(FeatureCommand::SpoilAll),
        "store layout" | "show layout" | "view store" => return Some(FeatureCommand::StoreLayout),
        "map compose" | "map compose on" => return Some(FeatureCommand::MapCompose { on: true }),
        "map compose off" => return Some(FeatureCommand::MapCompose { on: false }),
        _ => {}
    }

    if let Some(code) = strip_verb(body, "scan barcode").or_else(|| strip_verb(body, "scan")) {
        return Some(FeatureCommand::ScanBarcode {
            code: code.to_string(),
        });
    }

    if let Some(name) = strip_verb(body, "season") {
        if !name.is_empty() {
            return Some(FeatureCommand::Season {
                name: name.to_string(),
            });
        }
    }

    // A bare "announcement" still rings the PA chime.
    if let Some(message) = strip_verb(body, "announcement").or_else(|| strip_verb(body, "announce"))
    {
        return Some(FeatureCommand::Announcement {
            message: message.to_string(),
        });
    }

    if let Some(code) = strip_verb(body, "apply coupon").or_else(|| strip_verb(body, "coupon")) {
        if !code.is_empty() {
            return Some(FeatureCommand::Coupon {
                code: code.to_string(),
            });
        }
    }

    if let Some(product) = strip_verb(body, "preserve") {
        if !product.is_empty() {
            return Some(FeatureCommand::Preserve {
                product: product.to_string(),
            });
        }
    }

    None
}

fn parse_shoplift(body: &str) -> Result<Option<ShopliftCommand>, CommandError> {
    for verb in ["shoplift", "steal", "pocket", "five finger discount"] {
        if let Some(product) = strip_verb(body, verb) {
            if product.is_empty() {
                continue;
            }
            return Ok(Some(ShopliftCommand::Steal {
                product: product.to_string(),
            }));
        }
    }

    if let Some(rest) = strip_verb(body, "security level") {
        if rest.is_empty() {
            return Ok(None);
        }
        let level = security::parse_level(rest).ok_or(CommandError::InvalidParameterValue {
            what: "security level",
            given: rest.to_string(),
        })?;
        return Ok(Some(ShopliftCommand::SecurityLevel { level }));
    }

    match body {
        "security chase" | "security chase on" => Ok(Some(ShopliftCommand::Chase { on: true })),
        "security chase off" => Ok(Some(ShopliftCommand::Chase { on: false })),
        "shoplifting stats" | "theft stats" => Ok(Some(ShopliftCommand::Stats)),
        _ => Ok(None),
    }
}
