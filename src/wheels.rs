//! Cart wheels: the rhythm section.
//!
//! "my cart has <spec> wheels" picks a wheel type, optionally prefixed by a
//! material word. The type is the last known type word in the spec;
//! material words before it qualify it. "no wheels" parks the cart.

#[derive(Debug, Clone)]
pub struct WheelDef {
    pub name: &'static str,
    pub description: &'static str,
}

const fn wheel(name: &'static str, description: &'static str) -> WheelDef {
    WheelDef { name, description }
}

/// Wheel types in suggestion order.
pub static WHEEL_TYPES: &[WheelDef] = &[
    wheel("square", "Basic 4/4 beat"),
    wheel("broken", "Glitchy rhythm"),
    wheel("premium", "Smooth swing"),
    wheel("defective", "Chaotic poly"),
    wheel("bargain", "Simple minimal"),
    wheel("luxury", "Complex jazz"),
    wheel("heavy", "Kick-heavy techno"),
    wheel("chrome", "Crisp digital"),
    wheel("turbo", "Fast breakbeat"),
    wheel("plastic", "Synthetic drums"),
    wheel("wobbly", "Dubstep wobble"),
    wheel("squeaky", "Hi-hat shuffle"),
    wheel("rubber", "Bouncy funk"),
    wheel("smooth", "Liquid DnB"),
    wheel("rusty", "Industrial"),
    wheel("vintage", "Classic 808/909"),
    wheel("stolen", "Erratic pattern"),
    wheel("golden", "Trap hi-hats"),
    wheel("no", "No rhythm"),
];

/// Material qualifiers that may precede a wheel type.
pub const WHEEL_MATERIALS: [&str; 3] = ["heavy", "iron", "steel"];

pub fn wheel_type(name: &str) -> Option<&'static WheelDef> {
    WHEEL_TYPES
        .iter()
        .find(|def| def.name == name && def.name != "no")
}

/// The cart: which wheels are mounted and whether they are rolling.
#[derive(Debug, Clone)]
pub struct CartState {
    pub wheels: String,
    pub rolling: bool,
}

impl Default for CartState {
    fn default() -> Self {
        CartState {
            wheels: "none".to_string(),
            rolling: false,
        }
    }
}

impl CartState {
    pub fn new() -> Self {
        CartState::default()
    }

    /// Parse and mount a wheel spec. Returns the user-facing message, or
    /// `None` when the spec names no known wheel type.
    pub fn set_wheels(&mut self, spec: &str) -> Option<String> {
        let words: Vec<&str> = spec
            .split_whitespace()
            .filter(|w| *w != "wheels" && *w != "wheel")
            .collect();
        if words.is_empty() {
            return None;
        }

        if words.contains(&"no") {
            self.wheels = "none".to_string();
            self.rolling = false;
            return Some("🛒 The cart glides to a halt. No wheels, no rhythm.".to_string());
        }

        // Last known type word wins; "heavy square" is heavy-material
        // square wheels, bare "heavy" is the heavy type itself.
        let type_at = words.iter().rposition(|w| wheel_type(w).is_some())?;
        let kind = words[type_at];
        let def = wheel_type(kind)?;
        let material = words[..type_at]
            .iter()
            .rev()
            .find(|w| WHEEL_MATERIALS.contains(*w))
            .copied();

        self.wheels = match material {
            Some(material) => format!("{material} {kind}"),
            None => kind.to_string(),
        };
        self.rolling = true;
        Some(format!(
            "🛒 Cart rolling on {} wheels - {}",
            self.wheels, def.description
        ))
    }

    /// Park the cart without forgetting which wheels are mounted.
    pub fn stop(&mut self) {
        self.rolling = false;
    }

    /// Start rolling again on the mounted wheels, if any.
    pub fn resume(&mut self) -> bool {
        if self.wheels != "none" {
            self.rolling = true;
            true
        } else {
            false
        }
    }
}
