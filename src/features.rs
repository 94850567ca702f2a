//! Store features: checkout, seasons, coupons, decay, and tuning profile.
//!
//! These are mostly flags and small vocabularies; the handlers in the
//! engine use them to color messages and, for a few codes, to touch the
//! tempo or the shelf.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Season {
    Halloween,
    Christmas,
    Summer,
    Winter,
    Easter,
    Valentines,
    #[default]
    Normal,
}

impl Season {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "halloween" => Some(Season::Halloween),
            "christmas" => Some(Season::Christmas),
            "summer" => Some(Season::Summer),
            "winter" => Some(Season::Winter),
            "easter" => Some(Season::Easter),
            "valentines" => Some(Season::Valentines),
            "normal" => Some(Season::Normal),
            _ => None,
        }
    }

    pub fn word(self) -> &'static str {
        match self {
            Season::Halloween => "halloween",
            Season::Christmas => "christmas",
            Season::Summer => "summer",
            Season::Winter => "winter",
            Season::Easter => "easter",
            Season::Valentines => "valentines",
            Season::Normal => "normal",
        }
    }

    pub fn flavor(self) -> &'static str {
        match self {
            Season::Halloween => "Spooky theremin wails drift through the aisles... 🎃",
            Season::Christmas => "Sleigh bells and forced cheer on the PA... 🎄",
            Season::Summer => "Bright marimba vibes roll off the freezer cases... ☀️",
            Season::Winter => "Cold crisp pads settle over the produce... ❄️",
            Season::Easter => "Bouncy spring plinks everywhere... 🐰",
            Season::Valentines => "Smooth saxophone romance near the flowers... 💘",
            Season::Normal => "Business as usual.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponCode {
    Bogo,
    HalfOff,
    FreeShip,
    Vip,
}

impl CouponCode {
    /// Codes arrive lowercased by the tokenizer.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "bogo" => Some(CouponCode::Bogo),
            "50off" => Some(CouponCode::HalfOff),
            "freeship" => Some(CouponCode::FreeShip),
            "vip" => Some(CouponCode::Vip),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            CouponCode::Bogo => "BOGO",
            CouponCode::HalfOff => "50OFF",
            CouponCode::FreeShip => "FREESHIP",
            CouponCode::Vip => "VIP",
        }
    }
}

/// Audio tuning profile. Purely advisory for a silent bank, but tracked
/// and reported like everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerfProfile {
    Performance,
    #[default]
    Balanced,
    Quality,
}

impl PerfProfile {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "performance" => Some(PerfProfile::Performance),
            "balanced" => Some(PerfProfile::Balanced),
            "quality" => Some(PerfProfile::Quality),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerfProfile::Performance => "performance",
            PerfProfile::Balanced => "balanced",
            PerfProfile::Quality => "quality",
        }
    }

    pub fn activation_message(self) -> &'static str {
        match self {
            PerfProfile::Performance => "🚀 Performance mode activated - optimized for stability",
            PerfProfile::Balanced => "⚖️ Balanced mode activated - good quality and performance",
            PerfProfile::Quality => "🎵 Quality mode activated - maximum audio fidelity",
        }
    }
}

#[derive(Debug, Default)]
pub struct FeatureState {
    pub checkout_recording: bool,
    pub rush_hour: bool,
    pub decay: bool,
    pub preserved: HashSet<String>,
    pub season: Season,
    pub map_compose: bool,
}

impl FeatureState {
    pub fn new() -> Self {
        FeatureState::default()
    }
}
