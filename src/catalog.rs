//! The product catalog: everything this market stocks and how it sounds.
//!
//! Products map to one of four voice families in the sound bank. Modifiers
//! are grocery adjectives that translate to audio treatments; the engine
//! stores them by name and the bank interprets the effect descriptor.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Which synth pool a product draws its voice from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceFamily {
    Bass,
    Pad,
    Lead,
    Texture,
}

impl VoiceFamily {
    pub fn label(self) -> &'static str {
        match self {
            VoiceFamily::Bass => "bass",
            VoiceFamily::Pad => "pad",
            VoiceFamily::Lead => "lead",
            VoiceFamily::Texture => "texture",
        }
    }
}

/// One stocked product.
#[derive(Debug, Clone)]
pub struct ProductDef {
    pub name: &'static str,
    pub family: VoiceFamily,
    /// Base pitch the voice is built on.
    pub note: &'static str,
    /// Default repetition rate, overridden by a shelflife clause.
    pub rate: &'static str,
    pub description: &'static str,
}

/// The shelf inventory, keyed by product name.
pub struct ProductCatalog {
    defs: HashMap<&'static str, ProductDef>,
    order: Vec<&'static str>,
}

impl ProductCatalog {
    /// The standard inventory.
    pub fn stocked() -> Self {
        let mut catalog = ProductCatalog {
            defs: HashMap::new(),
            order: Vec::new(),
        };

        use VoiceFamily::*;

        // Bass: low, heavy items from the bottom shelf
        catalog.stock("oil", Bass, "c2", "2n", "Dark viscous bass");
        catalog.stock("ham", Bass, "e1", "2n", "Cured low-end thump");
        catalog.stock("soda", Bass, "g1", "4n", "Carbonated sub wobble");
        catalog.stock("huitsix", Bass, "f1", "8n", "Item 86: deleted stock");

        // Pads: sustained, warm items
        catalog.stock("wine", Pad, "a2", "1n", "Aged velvet pad");
        catalog.stock("cheese", Pad, "c3", "1n", "Ripened harmonic spread");
        catalog.stock("bread", Pad, "e2", "2n", "Warm crusty sustain");
        catalog.stock("butter", Pad, "g2", "1n", "Smooth spreadable drone");
        catalog.stock("pasta", Pad, "d3", "2n", "Al dente layered pad");

        // Leads: melodic, plucky items
        catalog.stock("beer", Lead, "c4", "4n", "Hoppy plucked lead");
        catalog.stock("pizza", Lead, "e4", "8n", "Cheesy melodic slice");
        catalog.stock("coffee", Lead, "a4", "16n", "Jittery espresso arp");
        catalog.stock("milk", Lead, "g3", "4n", "Smooth white lead");
        catalog.stock("energy_drink", Lead, "b4", "16n", "Overcaffeinated zipper");
        catalog.stock("chocolate", Lead, "d4", "8n", "Bittersweet melody");
        catalog.stock("eggs", Lead, "f4", "8n", "Fragile staccato cluck");

        // Textures: percussive, noisy items
        catalog.stock("salad", Texture, "c5", "8n", "Crisp leafy rustle");
        catalog.stock("chips", Texture, "d5", "16n", "Salty crackle burst");
        catalog.stock("candy", Texture, "a5", "16n", "Sugar-rush sparkle");
        catalog.stock("cereal", Texture, "g5", "8n", "Crunchy morning shaker");
        catalog.stock("rice", Texture, "e5", "16n", "Grainy noise wash");
        catalog.stock("rotting", Texture, "d2", "2n", "Left too long in aisle 7");

        catalog
    }

    fn stock(
        &mut self,
        name: &'static str,
        family: VoiceFamily,
        note: &'static str,
        rate: &'static str,
        description: &'static str,
    ) {
        self.order.push(name);
        self.defs.insert(
            name,
            ProductDef {
                name,
                family,
                note,
                rate,
                description,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ProductDef> {
        self.defs.get(name)
    }

    /// Product names in shelf order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// How a modifier shapes the sound, as far as the sound bank cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierEffect {
    OctaveUp,
    OctaveDown,
    LowPass,
    HighPass,
    /// A named effect-chain insert.
    Effect(&'static str),
}

/// One grocery adjective and its audio treatment.
#[derive(Debug, Clone)]
pub struct ModifierDef {
    pub name: &'static str,
    pub effect: ModifierEffect,
    pub description: &'static str,
}

const fn def(
    name: &'static str,
    effect: ModifierEffect,
    description: &'static str,
) -> ModifierDef {
    ModifierDef {
        name,
        effect,
        description,
    }
}

/// Every known modifier, in suggestion order.
pub static MODIFIERS: &[ModifierDef] = &[
    def("fresh", ModifierEffect::OctaveUp, "Higher pitch"),
    def("old", ModifierEffect::OctaveDown, "Lower pitch"),
    def("strong", ModifierEffect::LowPass, "Lowpass filter"),
    def("flavorless", ModifierEffect::HighPass, "Highpass filter"),
    def("cheap", ModifierEffect::Effect("bitcrusher"), "Bitcrusher"),
    def("expensive", ModifierEffect::Effect("reverb"), "Reverb"),
    def("processed", ModifierEffect::Effect("chorus"), "Chorus"),
    def("industrial", ModifierEffect::Effect("distortion"), "Distortion"),
    def("overpriced", ModifierEffect::Effect("phaser"), "Phaser"),
    def("vomit", ModifierEffect::Effect("fuzz"), "Extreme distortion"),
    def("artisanal", ModifierEffect::Effect("tremolo"), "Tremolo"),
    def("bargain", ModifierEffect::Effect("feedback_delay"), "Feedback delay"),
    def("luxury", ModifierEffect::Effect("long_reverb"), "Long reverb"),
    def("artificial", ModifierEffect::Effect("vibrato"), "Vibrato"),
    def("mass-produced", ModifierEffect::Effect("bitcrusher_stack"), "Heavy bitcrusher"),
    def("addictive", ModifierEffect::Effect("pingpong"), "Ping-pong delay"),
];

lazy_static! {
    static ref MODIFIER_INDEX: HashMap<&'static str, &'static ModifierDef> =
        MODIFIERS.iter().map(|m| (m.name, m)).collect();
}

/// Look up a modifier definition by name.
pub fn modifier(name: &str) -> Option<&'static ModifierDef> {
    MODIFIER_INDEX.get(name).copied()
}

pub fn is_modifier(name: &str) -> bool {
    MODIFIER_INDEX.contains_key(name)
}
