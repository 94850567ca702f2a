//! Store modes: global colorations toggled on and off by name.
//!
//! Mode commands are exact phrases ("discount mode on", "aisle 7 ambience
//! off"). Dispatch goes through a table built at startup that maps each
//! mode tag to its toggle function, so no behavior is resolved by string
//! gluing at runtime.

use std::collections::{HashMap, HashSet};

use crate::engine::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Discount,
    Inflation,
    Consumerism,
    BlackFriday,
    Aisle7,
    FluorescentLights,
    Apocalypse,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Discount,
        Mode::Inflation,
        Mode::Consumerism,
        Mode::BlackFriday,
        Mode::Aisle7,
        Mode::FluorescentLights,
        Mode::Apocalypse,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Mode::Discount => "discount",
            Mode::Inflation => "inflation",
            Mode::Consumerism => "consumerism",
            Mode::BlackFriday => "black_friday",
            Mode::Aisle7 => "aisle_7",
            Mode::FluorescentLights => "fluorescent_lights",
            Mode::Apocalypse => "apocalypse",
        }
    }
}

/// Accepted spellings, each followed by a literal " on" or " off".
const MODE_PHRASES: &[(&str, Mode)] = &[
    ("discount mode", Mode::Discount),
    ("inflation mode", Mode::Inflation),
    ("consumerism mode", Mode::Consumerism),
    ("black_friday mode", Mode::BlackFriday),
    ("black friday mode", Mode::BlackFriday),
    ("aisle_7 ambience", Mode::Aisle7),
    ("aisle 7 ambience", Mode::Aisle7),
    ("aisle_7 mode", Mode::Aisle7),
    ("aisle 7 mode", Mode::Aisle7),
    ("fluorescent_lights flicker", Mode::FluorescentLights),
    ("fluorescent lights flicker", Mode::FluorescentLights),
    ("fluorescent_lights mode", Mode::FluorescentLights),
    ("fluorescent lights mode", Mode::FluorescentLights),
    ("apocalypse mode", Mode::Apocalypse),
];

/// True when the text is exactly a mode phrase still waiting for its
/// "on" or "off". The completion detector uses this.
pub fn is_mode_phrase(text: &str) -> bool {
    MODE_PHRASES.iter().any(|(phrase, _)| *phrase == text)
}

/// Match a mode phrase with its explicit trailing state. Phrases without
/// "on" or "off" do not toggle anything.
pub fn parse_mode_command(body: &str) -> Option<(Mode, bool)> {
    for (phrase, mode) in MODE_PHRASES {
        if let Some(rest) = body.strip_prefix(phrase) {
            match rest {
                " on" => return Some((*mode, true)),
                " off" => return Some((*mode, false)),
                _ => {}
            }
        }
    }
    None
}

/// Which modes are currently active.
#[derive(Debug, Default)]
pub struct ModeSet {
    active: HashSet<Mode>,
}

impl ModeSet {
    pub fn new() -> Self {
        ModeSet::default()
    }

    /// Returns whether the flag actually changed.
    pub fn set(&mut self, mode: Mode, enabled: bool) -> bool {
        if enabled {
            self.active.insert(mode)
        } else {
            self.active.remove(&mode)
        }
    }

    pub fn is_active(&self, mode: Mode) -> bool {
        self.active.contains(&mode)
    }

    /// Active modes in declaration order, for stable display.
    pub fn active(&self) -> Vec<Mode> {
        Mode::ALL
            .into_iter()
            .filter(|mode| self.active.contains(mode))
            .collect()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

pub type ModeHandler = fn(&mut AppState, bool) -> String;

/// The dispatch table, built once at engine startup.
pub fn handler_table() -> HashMap<Mode, ModeHandler> {
    let mut table: HashMap<Mode, ModeHandler> = HashMap::new();
    table.insert(Mode::Discount, toggle_discount);
    table.insert(Mode::Inflation, toggle_inflation);
    table.insert(Mode::Consumerism, toggle_consumerism);
    table.insert(Mode::BlackFriday, toggle_black_friday);
    table.insert(Mode::Aisle7, toggle_aisle_7);
    table.insert(Mode::FluorescentLights, toggle_fluorescent_lights);
    table.insert(Mode::Apocalypse, toggle_apocalypse);
    table
}

fn toggle_discount(state: &mut AppState, enabled: bool) -> String {
    state.modes.set(Mode::Discount, enabled);
    if enabled {
        "🏷️ Discount mode: everything's 50% off and slightly detuned!".to_string()
    } else {
        "🏷️ Discount mode off - prices back to normal.".to_string()
    }
}

fn toggle_inflation(state: &mut AppState, enabled: bool) -> String {
    state.modes.set(Mode::Inflation, enabled);
    if enabled {
        "📈 Inflation mode: prices and pitches creep ever upward...".to_string()
    } else {
        "📈 Inflation mode off - the economy stabilizes.".to_string()
    }
}

fn toggle_consumerism(state: &mut AppState, enabled: bool) -> String {
    state.modes.set(Mode::Consumerism, enabled);
    if enabled {
        "🛍️ Consumerism mode: buy more! Buy MORE!".to_string()
    } else {
        "🛍️ Consumerism mode off - the urge subsides.".to_string()
    }
}

/// Black Friday drags discount and consumerism on with it. Turning it off
/// leaves them as they are.
fn toggle_black_friday(state: &mut AppState, enabled: bool) -> String {
    state.modes.set(Mode::BlackFriday, enabled);
    if enabled {
        state.modes.set(Mode::Discount, true);
        state.modes.set(Mode::Consumerism, true);
        "🖤 BLACK FRIDAY! Doorbuster chaos - discount and consumerism join in!".to_string()
    } else {
        "🖤 Black Friday is over. The aisles are trashed but quiet.".to_string()
    }
}

fn toggle_aisle_7(state: &mut AppState, enabled: bool) -> String {
    state.modes.set(Mode::Aisle7, enabled);
    if enabled {
        "👻 Aisle 7 ambience: something hums between the freezer cases...".to_string()
    } else {
        "👻 Aisle 7 falls silent again.".to_string()
    }
}

fn toggle_fluorescent_lights(state: &mut AppState, enabled: bool) -> String {
    state.modes.set(Mode::FluorescentLights, enabled);
    if enabled {
        "💡 The fluorescent lights start to flicker overhead...".to_string()
    } else {
        "💡 The lights steady.".to_string()
    }
}

/// Tempo moves only on an actual off-to-on or on-to-off edge, so repeated
/// toggles cannot drift the BPM.
fn toggle_apocalypse(state: &mut AppState, enabled: bool) -> String {
    let was_active = state.modes.is_active(Mode::Apocalypse);
    state.modes.set(Mode::Apocalypse, enabled);
    if enabled && !was_active {
        let bpm = state.transport.nudge_bpm(30.0);
        format!("☢️ APOCALYPSE MODE: panic buying at {bpm:.0} BPM!")
    } else if !enabled && was_active {
        let bpm = state.transport.nudge_bpm(-30.0);
        format!("☢️ The apocalypse passes. Tempo eases back to {bpm:.0} BPM.")
    } else if enabled {
        "☢️ The apocalypse is already here.".to_string()
    } else {
        "☢️ No apocalypse in progress.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    #[test]
    fn test_parse_requires_explicit_state() {
        assert_eq!(parse_mode_command("discount mode on"), Some((Mode::Discount, true)));
        assert_eq!(parse_mode_command("discount mode off"), Some((Mode::Discount, false)));
        assert_eq!(parse_mode_command("discount mode"), None);
        assert_eq!(parse_mode_command("discount mode maybe"), None);
        assert_eq!(parse_mode_command("discount modeon"), None);
    }

    #[test]
    fn test_parse_accepts_spelling_variants() {
        assert_eq!(
            parse_mode_command("black friday mode on"),
            Some((Mode::BlackFriday, true))
        );
        assert_eq!(
            parse_mode_command("black_friday mode on"),
            Some((Mode::BlackFriday, true))
        );
        assert_eq!(parse_mode_command("aisle 7 ambience off"), Some((Mode::Aisle7, false)));
        assert_eq!(parse_mode_command("aisle_7 mode on"), Some((Mode::Aisle7, true)));
        assert_eq!(
            parse_mode_command("fluorescent lights flicker on"),
            Some((Mode::FluorescentLights, true))
        );
    }

    #[test]
    fn test_mode_set_tracks_changes() {
        let mut modes = ModeSet::new();
        assert!(modes.set(Mode::Discount, true));
        assert!(!modes.set(Mode::Discount, true));
        assert!(modes.is_active(Mode::Discount));
        assert!(modes.set(Mode::Discount, false));
        assert!(!modes.is_active(Mode::Discount));
    }

    #[test]
    fn test_active_list_is_ordered() {
        let mut modes = ModeSet::new();
        modes.set(Mode::Apocalypse, true);
        modes.set(Mode::Discount, true);
        assert_eq!(modes.active(), vec![Mode::Discount, Mode::Apocalypse]);
    }

    #[test]
    fn test_handler_table_covers_every_mode() {
        let table = handler_table();
        for mode in Mode::ALL {
            assert!(table.contains_key(&mode), "no handler for {mode:?}");
        }
    }

    #[test]
    fn test_black_friday_drags_other_modes_on() {
        let mut state = AppState::new(&StoreConfig::default());
        let table = handler_table();
        table[&Mode::BlackFriday](&mut state, true);
        assert!(state.modes.is_active(Mode::BlackFriday));
        assert!(state.modes.is_active(Mode::Discount));
        assert!(state.modes.is_active(Mode::Consumerism));

        // Off leaves the dragged-in modes alone.
        table[&Mode::BlackFriday](&mut state, false);
        assert!(!state.modes.is_active(Mode::BlackFriday));
        assert!(state.modes.is_active(Mode::Discount));
    }

    #[test]
    fn test_apocalypse_moves_tempo_once() {
        let mut state = AppState::new(&StoreConfig::default());
        let table = handler_table();
        let base = state.transport.bpm();

        table[&Mode::Apocalypse](&mut state, true);
        assert_eq!(state.transport.bpm(), base + 30.0);

        // A second "on" must not drift the tempo further.
        table[&Mode::Apocalypse](&mut state, true);
        assert_eq!(state.transport.bpm(), base + 30.0);

        table[&Mode::Apocalypse](&mut state, false);
        assert_eq!(state.transport.bpm(), base);
    }
}
