//! The add-command grammar: modifiers, product name, special parameters.
//!
//! The text after the add verb splits at the earliest special-parameter
//! keyword. Before that cutoff the last token names the product and earlier
//! tokens are modifiers, in order; from the cutoff onward each parameter is
//! scanned independently. Input is expected to be normalized (lowercased)
//! already. Unrecognized tokens are ignored, never an error.

/// Keywords that end the modifier/product section of an add command.
pub const PARAM_KEYWORDS: [&str; 5] = ["nutriscore", "shelflife", "open", "escalator", "volume"];

/// Volume words and their decibel values.
const VOLUME_WORDS: [(&str, f32); 7] = [
    ("max", 0.0),
    ("loud", -6.0),
    ("soft", -20.0),
    ("quiet", -25.0),
    ("whisper", -30.0),
    ("min", -35.0),
    ("mute", -60.0),
];

/// How long a product keeps before it expires; shorter life loops faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfLife {
    Today,
    Week,
    Month,
    Year,
    Decade,
    Forever,
}

impl ShelfLife {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "today" => Some(ShelfLife::Today),
            "week" => Some(ShelfLife::Week),
            "month" => Some(ShelfLife::Month),
            "year" => Some(ShelfLife::Year),
            "decade" => Some(ShelfLife::Decade),
            "forever" => Some(ShelfLife::Forever),
            _ => None,
        }
    }

    /// Repetition rate handed to the sound bank.
    pub fn rate(self) -> &'static str {
        match self {
            ShelfLife::Today => "32n",
            ShelfLife::Week => "16n",
            ShelfLife::Month => "8n",
            ShelfLife::Year => "4n",
            ShelfLife::Decade => "2n",
            ShelfLife::Forever => "1n",
        }
    }

    pub fn word(self) -> &'static str {
        match self {
            ShelfLife::Today => "today",
            ShelfLife::Week => "week",
            ShelfLife::Month => "month",
            ShelfLife::Year => "year",
            ShelfLife::Decade => "decade",
            ShelfLife::Forever => "forever",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscalatorPattern {
    #[default]
    Up,
    Down,
    Bounce,
    Zigzag,
    Express,
    Checkout,
}

impl EscalatorPattern {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "up" => Some(EscalatorPattern::Up),
            "down" => Some(EscalatorPattern::Down),
            "bounce" => Some(EscalatorPattern::Bounce),
            "zigzag" => Some(EscalatorPattern::Zigzag),
            "express" => Some(EscalatorPattern::Express),
            "checkout" => Some(EscalatorPattern::Checkout),
            _ => None,
        }
    }

    pub fn word(self) -> &'static str {
        match self {
            EscalatorPattern::Up => "up",
            EscalatorPattern::Down => "down",
            EscalatorPattern::Bounce => "bounce",
            EscalatorPattern::Zigzag => "zigzag",
            EscalatorPattern::Express => "express",
            EscalatorPattern::Checkout => "checkout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscalatorSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
    Rush,
    Broken,
}

impl EscalatorSpeed {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "slow" => Some(EscalatorSpeed::Slow),
            "normal" => Some(EscalatorSpeed::Normal),
            "fast" => Some(EscalatorSpeed::Fast),
            "rush" => Some(EscalatorSpeed::Rush),
            "broken" => Some(EscalatorSpeed::Broken),
            _ => None,
        }
    }

    pub fn word(self) -> &'static str {
        match self {
            EscalatorSpeed::Slow => "slow",
            EscalatorSpeed::Normal => "normal",
            EscalatorSpeed::Fast => "fast",
            EscalatorSpeed::Rush => "rush",
            EscalatorSpeed::Broken => "broken",
        }
    }
}

/// An arpeggiator ride: pattern and speed, both defaulted when unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Escalator {
    pub pattern: EscalatorPattern,
    pub speed: EscalatorSpeed,
}

/// Optional attributes parsed from the tail of an add command.
/// Mutually independent; any subset may be present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialParams {
    pub nutriscore: Option<char>,
    pub shelf_life: Option<ShelfLife>,
    pub open: bool,
    pub escalator: Option<Escalator>,
    pub volume_db: Option<f32>,
}

impl SpecialParams {
    pub fn any(&self) -> bool {
        self.nutriscore.is_some()
            || self.shelf_life.is_some()
            || self.open
            || self.escalator.is_some()
            || self.volume_db.is_some()
    }
}

/// A fully parsed add request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRequest {
    pub product: String,
    pub modifiers: Vec<String>,
    pub params: SpecialParams,
}

impl ProductRequest {
    /// A request with no modifiers or parameters, as morph and the
    /// improvise generator issue them.
    pub fn bare(product: &str) -> Self {
        ProductRequest {
            product: product.to_string(),
            modifiers: Vec::new(),
            params: SpecialParams::default(),
        }
    }
}

/// Parse the argument text of an add command.
pub fn parse_product_request(text: &str, max_modifiers: usize) -> ProductRequest {
    let words: Vec<&str> = text.split_whitespace().collect();

    // The cutoff is the earliest word that is a special-parameter keyword.
    let cutoff = words.iter().position(|w| PARAM_KEYWORDS.contains(w));
    let (head, tail) = match cutoff {
        Some(at) => (&words[..at], &words[at..]),
        None => (&words[..], &[][..]),
    };

    let (product, modifiers) = match head.split_last() {
        Some((name, mods)) => (
            (*name).to_string(),
            mods.iter()
                .take(max_modifiers)
                .map(|m| (*m).to_string())
                .collect(),
        ),
        None => (String::new(), Vec::new()),
    };

    ProductRequest {
        product,
        modifiers,
        params: parse_params(tail),
    }
}

/// Scan the post-cutoff words once per parameter.
fn parse_params(words: &[&str]) -> SpecialParams {
    SpecialParams {
        nutriscore: scan_nutriscore(words),
        shelf_life: scan_shelf_life(words),
        open: words.contains(&"open"),
        escalator: scan_escalator(words),
        volume_db: scan_volume(words),
    }
}

fn word_after<'a>(words: &[&'a str], keyword: &str) -> Option<&'a str> {
    let at = words.iter().position(|w| *w == keyword)?;
    words.get(at + 1).copied()
}

fn scan_nutriscore(words: &[&str]) -> Option<char> {
    let next = word_after(words, "nutriscore")?;
    let mut chars = next.chars();
    match (chars.next(), chars.next()) {
        (Some(grade @ 'a'..='e'), None) => Some(grade.to_ascii_uppercase()),
        _ => None,
    }
}

fn scan_shelf_life(words: &[&str]) -> Option<ShelfLife> {
    ShelfLife::parse(word_after(words, "shelflife")?)
}

fn scan_escalator(words: &[&str]) -> Option<Escalator> {
    let at = words.iter().position(|w| *w == "escalator")?;
    let mut ride = Escalator::default();
    let mut pattern_set = false;
    let mut speed_set = false;
    // First pattern word and first speed word after the keyword win.
    for word in &words[at + 1..] {
        if !pattern_set {
            if let Some(pattern) = EscalatorPattern::parse(word) {
                ride.pattern = pattern;
                pattern_set = true;
                continue;
            }
        }
        if !speed_set {
            if let Some(speed) = EscalatorSpeed::parse(word) {
                ride.speed = speed;
                speed_set = true;
            }
        }
    }
    Some(ride)
}

fn scan_volume(words: &[&str]) -> Option<f32> {
    let mut from_word = None;
    for (at, word) in words.iter().enumerate() {
        if *word != "volume" {
            continue;
        }
        if let Some(next) = words.get(at + 1) {
            // Numeric form wins over the word table.
            if let Ok(value) = next.parse::<i64>() {
                let value = value.clamp(0, 100) as f32;
                return Some((value / 100.0) * 40.0 - 40.0);
            }
            if from_word.is_none() {
                from_word = VOLUME_WORDS
                    .iter()
                    .find(|(name, _)| name == next)
                    .map(|(_, db)| *db);
            }
        }
    }
    from_word
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ProductRequest {
        parse_product_request(text, 3)
    }

    #[test]
    fn test_modifiers_in_order() {
        let request = parse("cheap old beer");
        assert_eq!(request.product, "beer");
        assert_eq!(request.modifiers, vec!["cheap", "old"]);
        assert!(!request.params.any());
    }

    #[test]
    fn test_bare_product() {
        let request = parse("beer");
        assert_eq!(request.product, "beer");
        assert!(request.modifiers.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let request = parse("");
        assert_eq!(request.product, "");
        assert!(request.modifiers.is_empty());
        assert!(!request.params.any());
    }

    #[test]
    fn test_nutriscore_uppercased() {
        let request = parse("beer nutriscore a");
        assert_eq!(request.product, "beer");
        assert!(request.modifiers.is_empty());
        assert_eq!(request.params.nutriscore, Some('A'));
    }

    #[test]
    fn test_nutriscore_rejects_long_words() {
        let request = parse("beer nutriscore apple");
        assert_eq!(request.params.nutriscore, None);
    }

    #[test]
    fn test_volume_numeric_mapping() {
        let request = parse("beer volume 75");
        assert_eq!(request.params.volume_db, Some(-10.0));
    }

    #[test]
    fn test_volume_clamped() {
        assert_eq!(parse("beer volume 150").params.volume_db, Some(0.0));
        assert_eq!(parse("beer volume 0").params.volume_db, Some(-40.0));
    }

    #[test]
    fn test_volume_words() {
        assert_eq!(parse("beer volume whisper").params.volume_db, Some(-30.0));
        assert_eq!(parse("beer volume mute").params.volume_db, Some(-60.0));
    }

    #[test]
    fn test_volume_numeric_beats_word() {
        let request = parse("beer volume loud volume 50");
        assert_eq!(request.params.volume_db, Some(-20.0));
    }

    #[test]
    fn test_volume_unknown_word_ignored() {
        assert_eq!(parse("beer volume banana").params.volume_db, None);
    }

    #[test]
    fn test_modifier_cap() {
        let request = parse("fresh old cheap strong beer");
        assert_eq!(request.product, "beer");
        assert_eq!(request.modifiers, vec!["fresh", "old", "cheap"]);
    }

    #[test]
    fn test_cutoff_takes_last_head_token_as_product() {
        // "open" cuts the head early, so "cheap" lands as the product name.
        let request = parse("cheap open beer");
        assert_eq!(request.product, "cheap");
        assert!(request.params.open);
    }

    #[test]
    fn test_cutoff_matches_whole_words_only() {
        let request = parse("openers beer");
        assert_eq!(request.product, "beer");
        assert_eq!(request.modifiers, vec!["openers"]);
        assert!(!request.params.open);
    }

    #[test]
    fn test_escalator_defaults() {
        let ride = parse("beer escalator").params.escalator.unwrap();
        assert_eq!(ride.pattern, EscalatorPattern::Up);
        assert_eq!(ride.speed, EscalatorSpeed::Normal);
    }

    #[test]
    fn test_escalator_pattern_and_speed() {
        let ride = parse("beer escalator down fast").params.escalator.unwrap();
        assert_eq!(ride.pattern, EscalatorPattern::Down);
        assert_eq!(ride.speed, EscalatorSpeed::Fast);

        // Order after the keyword does not matter.
        let ride = parse("beer escalator rush zigzag").params.escalator.unwrap();
        assert_eq!(ride.pattern, EscalatorPattern::Zigzag);
        assert_eq!(ride.speed, EscalatorSpeed::Rush);
    }

    #[test]
    fn test_shelf_life_rates() {
        let request = parse("milk shelflife week");
        assert_eq!(request.params.shelf_life, Some(ShelfLife::Week));
        assert_eq!(ShelfLife::Today.rate(), "32n");
        assert_eq!(ShelfLife::Forever.rate(), "1n");
    }

    #[test]
    fn test_all_params_together() {
        let request = parse("fresh beer nutriscore b shelflife today open escalator zigzag rush volume 50");
        assert_eq!(request.product, "beer");
        assert_eq!(request.modifiers, vec!["fresh"]);
        assert_eq!(request.params.nutriscore, Some('B'));
        assert_eq!(request.params.shelf_life, Some(ShelfLife::Today));
        assert!(request.params.open);
        let ride = request.params.escalator.unwrap();
        assert_eq!(ride.pattern, EscalatorPattern::Zigzag);
        assert_eq!(ride.speed, EscalatorSpeed::Rush);
        assert_eq!(request.params.volume_db, Some(-20.0));
    }

    #[test]
    fn test_trailing_garbage_ignored() {
        let request = parse("beer nutriscore z sideways");
        assert_eq!(request.product, "beer");
        assert_eq!(request.params.nutriscore, None);
    }
}
