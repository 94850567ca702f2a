//! Context-aware command completion.
//!
//! A parallel read-only path beside the command parser: every edit maps
//! (text, cursor) to a typed [`Context`], each context selects a
//! candidate pool, and the pool is filtered by the in-progress word
//! with prefix matches ranked ahead of substring matches. Nothing in
//! here touches slot state.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::catalog::{self, ProductCatalog};
use crate::config::AutocompleteConfig;
use crate::modes;
use crate::wheels;

/// One completion candidate: the literal to insert plus a short label
/// for the dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionItem {
    pub text: String,
    pub desc: String,
}

impl SuggestionItem {
    pub fn new(text: &str, desc: &str) -> Self {
        SuggestionItem {
            text: text.to_string(),
            desc: desc.to_string(),
        }
    }
}

/// What kind of word belongs at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextKind {
    None,
    Command,
    ModifierOrProduct { used: Vec<String> },
    Product,
    ProductOrAll,
    Parameter,
    Nutriscore,
    ShelfLife,
    Escalator,
    Wheel,
    CartCompletion { has_cart: bool },
    OnOff,
    Season,
    Coupon,
    Security,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub kind: ContextKind,
    pub filter: String,
}

impl Context {
    fn none() -> Self {
        Context {
            kind: ContextKind::None,
            filter: String::new(),
        }
    }

    fn new(kind: ContextKind, filter: &str) -> Self {
        Context {
            kind,
            filter: filter.to_string(),
        }
    }
}

/// Command starters, shown when no more specific context applies.
const COMMANDS: &[(&str, &str)] = &[
    ("add", "Add a product"),
    ("remove", "Remove products"),
    ("my cart has", "Set cart wheels"),
    ("discount mode", "Toggle detuning"),
    ("inflation mode", "Toggle pitch rise"),
    ("consumerism mode", "Toggle echo/delay"),
    ("black_friday mode", "Toggle chaos"),
    ("aisle_7 ambience", "Haunted aisle pads"),
    ("fluorescent_lights flicker", "Flicker stutter"),
    ("apocalypse mode", "Panic tempo"),
    ("checkout line", "Fade to silence"),
    ("lunch break", "Soften music"),
    ("store closing", "Fade everything"),
    ("cleanup time", "Muzak remains"),
    ("intermission", "Brief pause"),
    ("coffee break", "Quick fade"),
    ("smoke break", "Step outside"),
    ("conveyor belt", "Sequential fade"),
    ("sliding doors", "Stereo sweep"),
    ("elevator music", "Lowpass filter"),
    ("crossfade", "Smooth transition"),
    ("fade to silence", "Volume fade"),
    ("fade to soft", "Background level"),
    ("fade to full", "Full volume"),
    ("morph to", "Transform products"),
    ("it's closing time", "Speed up tempo"),
    ("it's opening time", "Slow down tempo"),
    ("checkout", "Start recording"),
    ("finish checkout", "Stop recording"),
    ("scan barcode", "Generate sequence"),
    ("season", "Set seasonal theme"),
    ("announcement", "PA announcement"),
    ("rush hour", "Tempo escalation"),
    ("apply coupon", "Apply effect coupon"),
    ("decay on", "Products expire"),
    ("decay off", "Stop decay"),
    ("preserve", "Preserve product"),
    ("spoil all", "Expire all"),
    ("store layout", "Open map view"),
    ("map compose", "Spatial sequencer"),
    ("shoplift", "Attempt theft"),
    ("steal", "Attempt theft"),
    ("security level", "Set security"),
    ("security chase", "Toggle chase"),
    ("shoplifting stats", "Theft report"),
    ("performance stats", "Show stats"),
    ("performance mode", "Set audio mode"),
];

const PARAMETERS: &[(&str, &str)] = &[
    ("nutriscore", "Key transposition"),
    ("shelflife", "Repetition rate"),
    ("open", "Random triggering"),
    ("escalator", "Arpeggiator"),
    ("volume", "Loudness 0-100"),
];

const NUTRISCORE_GRADES: &[(&str, &str)] = &[
    ("A", "Key of A"),
    ("B", "Key of B"),
    ("C", "Key of C"),
    ("D", "Key of D"),
    ("E", "Key of E"),
];

const SHELFLIFE_VALUES: &[(&str, &str)] = &[
    ("today", "Very short"),
    ("week", "Short"),
    ("month", "Medium"),
    ("year", "Long"),
    ("forever", "Infinite"),
];

const ESCALATOR_PATTERNS: &[(&str, &str)] = &[
    ("up", "Ascending"),
    ("down", "Descending"),
    ("bounce", "Up then down"),
    ("zigzag", "Alternating"),
    ("express", "Random fast"),
    ("checkout", "Barcode rhythm"),
];

const ESCALATOR_SPEEDS: &[(&str, &str)] = &[
    ("slow", "Slow speed"),
    ("normal", "Normal speed"),
    ("fast", "Fast speed"),
    ("rush", "Very fast"),
    ("broken", "Irregular"),
];

const ON_OFF: &[(&str, &str)] = &[("on", "Enable"), ("off", "Disable")];

const SEASONS: &[(&str, &str)] = &[
    ("halloween", "Spooky theme"),
    ("christmas", "Festive theme"),
    ("summer", "Bright vibes"),
    ("winter", "Cold crisp"),
    ("easter", "Bouncy spring"),
    ("valentines", "Romantic"),
    ("normal", "Regular theme"),
];

const COUPONS: &[(&str, &str)] = &[
    ("BOGO", "Duplicate products"),
    ("50OFF", "Half speed"),
    ("FREESHIP", "Spacious reverb"),
    ("VIP", "Luxury effects"),
];

const SECURITY_LEVELS: &[(&str, &str)] = &[
    ("low", "30% security"),
    ("medium", "50% security"),
    ("high", "70% security"),
    ("paranoid", "95% security"),
];

/// Full completion pass: detect the context, pick its pool, filter.
pub fn suggest(
    text: &str,
    cursor: usize,
    config: &AutocompleteConfig,
    catalog: &ProductCatalog,
) -> Vec<SuggestionItem> {
    let context = detect_context(text, cursor, config, catalog);
    suggestions_for_context(&context, config, catalog)
}

/// Classify what the cursor position is asking for.
pub fn detect_context(
    text: &str,
    cursor: usize,
    config: &AutocompleteConfig,
    catalog: &ProductCatalog,
) -> Context {
    let cursor = clamp_cursor(text, cursor);
    let before = &text[..cursor];
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let before_cursor = before[line_start..].to_lowercase();

    let (completed, current_word) = split_words(&before_cursor);
    let current = current_word.as_str();

    if before_cursor.trim().is_empty() {
        return Context::none();
    }
    // Let the user get a couple of characters in before popping up.
    if current.len() < config.min_chars_to_trigger && completed.is_empty() {
        return Context::none();
    }

    let trimmed = before_cursor.trim();
    let first = completed.first().copied();

    // The verb may sit behind a slot prefix, so scan rather than
    // anchor to the first word.
    if let Some(pos) = completed.iter().position(|word| *word == "add") {
        return detect_add_context(&completed[pos + 1..], current, catalog);
    }
    if trimmed == "add" {
        return detect_add_context(&[], current, catalog);
    }
    if completed.contains(&"remove") || trimmed == "remove" {
        return Context::new(ContextKind::ProductOrAll, current);
    }
    if before_cursor.contains("my cart has") {
        return Context::new(ContextKind::Wheel, current);
    }
    if trimmed == "my" || trimmed == "my cart" {
        return Context::new(
            ContextKind::CartCompletion {
                has_cart: trimmed == "my cart",
            },
            current,
        );
    }
    if ends_with_mode_phrase(&completed) {
        return Context::new(ContextKind::OnOff, current);
    }
    if first == Some("season") || completed.last().copied() == Some("season") {
        return Context::new(ContextKind::Season, current);
    }
    if completed.last().copied() == Some("coupon") {
        return Context::new(ContextKind::Coupon, current);
    }
    if tail_is(&completed, &["security", "level"]) {
        return Context::new(ContextKind::Security, current);
    }
    if tail_is(&completed, &["rush", "hour"]) {
        return Context::new(ContextKind::OnOff, current);
    }
    if tail_is(&completed, &["morph", "to"]) {
        return Context::new(ContextKind::Product, current);
    }
    if matches!(first, Some("preserve" | "shoplift" | "steal" | "pocket")) {
        return Context::new(ContextKind::Product, current);
    }

    Context::new(ContextKind::Command, current)
}

/// Finer detection inside an `add` line: walk the words after the verb
/// to find out whether a product has landed yet and which
/// special-parameter keyword, if any, is still waiting for its value.
/// Once a keyword has consumed its value the context falls back to
/// `Parameter`.
fn detect_add_context(args: &[&str], current: &str, catalog: &ProductCatalog) -> Context {
    let mut used_modifiers: Vec<String> = Vec::new();
    let mut after_product = false;
    let mut pending_keyword: Option<&str> = None;
    let mut escalator_values = 0usize;

    for &word in args {
        match pending_keyword {
            Some("escalator") if is_escalator_value(word) && escalator_values < 2 => {
                // Pattern then speed; two values close the clause.
                escalator_values += 1;
                if escalator_values == 2 {
                    pending_keyword = None;
                }
                continue;
            }
            Some("escalator") => pending_keyword = None,
            Some(_) => {
                pending_keyword = None;
                continue;
            }
            None => {}
        }
        if catalog.contains(word) {
            after_product = true;
            continue;
        }
        if catalog::is_modifier(word) {
            used_modifiers.push(word.to_string());
            continue;
        }
        match word {
            "nutriscore" | "shelflife" | "escalator" => {
                pending_keyword = Some(word);
                escalator_values = 0;
                after_product = true;
            }
            "open" => after_product = true,
            _ if is_escalator_value(word) => after_product = true,
            _ => {}
        }
    }

    match pending_keyword {
        Some("nutriscore") => Context::new(ContextKind::Nutriscore, current),
        Some("shelflife") => Context::new(ContextKind::ShelfLife, current),
        Some("escalator") => Context::new(ContextKind::Escalator, current),
        _ if after_product => Context::new(ContextKind::Parameter, current),
        _ => Context::new(
            ContextKind::ModifierOrProduct {
                used: used_modifiers,
            },
            current,
        ),
    }
}

/// Materialize the pool for a context and filter it.
pub fn suggestions_for_context(
    context: &Context,
    config: &AutocompleteConfig,
    catalog: &ProductCatalog,
) -> Vec<SuggestionItem> {
    let cap = config.max_suggestions;
    let filter = context.filter.as_str();
    match &context.kind {
        ContextKind::None => Vec::new(),
        ContextKind::Command => filter_suggestions(&items(COMMANDS), filter, cap),
        ContextKind::ModifierOrProduct { used } => {
            let mut pool: Vec<SuggestionItem> = modifier_items()
                .into_iter()
                .filter(|item| !used.contains(&item.text))
                .collect();
            pool.extend(product_items(catalog));
            filter_suggestions(&pool, filter, cap)
        }
        ContextKind::Product => filter_suggestions(&product_items(catalog), filter, cap),
        ContextKind::ProductOrAll => {
            let mut pool = vec![SuggestionItem::new("all", "Remove all products")];
            pool.extend(product_items(catalog));
            filter_suggestions(&pool, filter, cap)
        }
        ContextKind::Parameter => filter_suggestions(&items(PARAMETERS), filter, cap),
        ContextKind::Nutriscore => filter_suggestions(&items(NUTRISCORE_GRADES), filter, cap),
        ContextKind::ShelfLife => filter_suggestions(&items(SHELFLIFE_VALUES), filter, cap),
        ContextKind::Escalator => {
            let mut pool = items(ESCALATOR_PATTERNS);
            pool.extend(items(ESCALATOR_SPEEDS));
            filter_suggestions(&pool, filter, cap)
        }
        ContextKind::Wheel => filter_suggestions(&wheel_items(), filter, cap),
        ContextKind::CartCompletion { has_cart } => {
            let pool = if *has_cart {
                vec![SuggestionItem::new("has", "Set cart wheels")]
            } else {
                vec![SuggestionItem::new("cart has", "Set cart wheels")]
            };
            filter_suggestions(&pool, filter, cap)
        }
        ContextKind::OnOff => filter_suggestions(&items(ON_OFF), filter, cap),
        ContextKind::Season => filter_suggestions(&items(SEASONS), filter, cap),
        ContextKind::Coupon => filter_suggestions(&items(COUPONS), filter, cap),
        ContextKind::Security => filter_suggestions(&items(SECURITY_LEVELS), filter, cap),
    }
}

/// Two-pass rank: prefix matches in pool order, then substring matches
/// in pool order, truncated at the cap. An empty partial passes the
/// head of the pool through untouched.
pub fn filter_suggestions(
    pool: &[SuggestionItem],
    partial: &str,
    cap: usize,
) -> Vec<SuggestionItem> {
    if partial.is_empty() {
        return pool.iter().take(cap).cloned().collect();
    }
    let partial = partial.to_lowercase();
    let mut results: Vec<SuggestionItem> = Vec::new();
    for item in pool {
        if results.len() >= cap {
            break;
        }
        if item.text.to_lowercase().starts_with(&partial) {
            results.push(item.clone());
        }
    }
    if results.len() < cap {
        for item in pool {
            if results.len() >= cap {
                break;
            }
            let text = item.text.to_lowercase();
            if !text.starts_with(&partial) && text.contains(&partial) {
                results.push(item.clone());
            }
        }
    }
    results
}

/// Splice an accepted suggestion into the text: the in-progress word is
/// replaced from its start to the cursor, a trailing space is added
/// unless one is already there, and the new cursor lands after it.
pub fn accept(text: &str, cursor: usize, item: &SuggestionItem) -> (String, usize) {
    let cursor = clamp_cursor(text, cursor);
    let before = &text[..cursor];
    let last_space = before.rfind(' ').map(|i| i + 1).unwrap_or(0);
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let word_start = last_space.max(line_start);

    let after = &text[cursor..];
    let mut inserted = item.text.clone();
    if !after.starts_with(' ') {
        inserted.push(' ');
    }

    let mut result = String::with_capacity(word_start + inserted.len() + after.len());
    result.push_str(&text[..word_start]);
    result.push_str(&inserted);
    result.push_str(after);
    (result, word_start + inserted.len())
}

/// Holds suggestion recomputation until typing pauses.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    dirty_since: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Debounce {
            delay,
            dirty_since: None,
        }
    }

    /// The input changed at `now`; restart the quiet period.
    pub fn touch(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    /// True once the quiet period has elapsed; consumes the mark.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.dirty_since {
            Some(since) if now.duration_since(since) >= self.delay => {
                self.dirty_since = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.dirty_since.is_some()
    }
}

fn items(pairs: &[(&str, &str)]) -> Vec<SuggestionItem> {
    pairs
        .iter()
        .map(|(text, desc)| SuggestionItem::new(text, desc))
        .collect()
}

fn modifier_items() -> Vec<SuggestionItem> {
    catalog::MODIFIERS
        .iter()
        .map(|def| SuggestionItem::new(def.name, def.description))
        .collect()
}

fn product_items(catalog: &ProductCatalog) -> Vec<SuggestionItem> {
    catalog
        .names()
        .filter_map(|name| catalog.get(name))
        .map(|def| SuggestionItem::new(def.name, def.description))
        .collect()
}

fn wheel_items() -> Vec<SuggestionItem> {
    wheels::WHEEL_TYPES
        .iter()
        .map(|def| SuggestionItem::new(def.name, def.description))
        .collect()
}

/// (completed words, in-progress partial) for the text before the
/// cursor on the current line.
fn split_words(before_cursor: &str) -> (Vec<&str>, String) {
    match before_cursor.rfind(' ') {
        Some(i) => {
            let completed = before_cursor[..=i].split_whitespace().collect();
            (completed, before_cursor[i + 1..].to_string())
        }
        None => (Vec::new(), before_cursor.to_string()),
    }
}

fn tail_is(completed: &[&str], tail: &[&str]) -> bool {
    completed.len() >= tail.len() && completed[completed.len() - tail.len()..] == *tail
}

/// Mode phrases run two or three words before their on/off.
fn ends_with_mode_phrase(completed: &[&str]) -> bool {
    for take in 2..=3 {
        if completed.len() >= take {
            let tail = completed[completed.len() - take..].join(" ");
            if modes::is_mode_phrase(&tail) {
                return true;
            }
        }
    }
    false
}

fn is_escalator_value(word: &str) -> bool {
    ESCALATOR_PATTERNS.iter().any(|(text, _)| *text == word)
        || ESCALATOR_SPEEDS.iter().any(|(text, _)| *text == word)
}

fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while cursor > 0 && !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AutocompleteConfig {
        AutocompleteConfig::default()
    }

    fn catalog() -> ProductCatalog {
        ProductCatalog::stocked()
    }

    fn context_at_end(text: &str) -> Context {
        detect_context(text, text.len(), &config(), &catalog())
    }

    fn suggest_at_end(text: &str) -> Vec<String> {
        suggest(text, text.len(), &config(), &catalog())
            .into_iter()
            .map(|item| item.text)
            .collect()
    }

    fn pool(texts: &[&str]) -> Vec<SuggestionItem> {
        texts
            .iter()
            .map(|text| SuggestionItem::new(text, ""))
            .collect()
    }

    #[test]
    fn test_empty_line_yields_no_context() {
        assert_eq!(context_at_end("").kind, ContextKind::None);
        assert_eq!(detect_context("", 0, &config(), &catalog()).kind, ContextKind::None);
        assert_eq!(context_at_end("   ").kind, ContextKind::None);
    }

    #[test]
    fn test_single_char_partial_stays_silent() {
        assert_eq!(context_at_end("a").kind, ContextKind::None);
        assert_eq!(context_at_end("ad").kind, ContextKind::Command);
    }

    #[test]
    fn test_partial_after_completed_word_always_triggers() {
        // One typed char is enough once a word is already in.
        let context = context_at_end("add b");
        assert!(matches!(context.kind, ContextKind::ModifierOrProduct { .. }));
        assert_eq!(context.filter, "b");
    }

    #[test]
    fn test_prefix_ranks_before_substring() {
        let pool = pool(&["add", "addendum", "badge"]);
        let two = filter_suggestions(&pool, "ad", 2);
        let texts: Vec<&str> = two.iter().map(|item| item.text.as_str()).collect();
        assert_eq!(texts, ["add", "addendum"]);

        let all = filter_suggestions(&pool, "ad", 8);
        let texts: Vec<&str> = all.iter().map(|item| item.text.as_str()).collect();
        assert_eq!(texts, ["add", "addendum", "badge"]);
    }

    #[test]
    fn test_empty_partial_returns_pool_head() {
        let pool = pool(&["a", "b", "c", "d"]);
        let head = filter_suggestions(&pool, "", 3);
        assert_eq!(head.len(), 3);
        assert_eq!(head[0].text, "a");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let pool = pool(&["BOGO", "50OFF"]);
        let matched = filter_suggestions(&pool, "bo", 8);
        assert_eq!(matched[0].text, "BOGO");
    }

    #[test]
    fn test_add_offers_modifiers_and_products() {
        let suggestions = suggest_at_end("add ");
        assert!(suggestions.contains(&"fresh".to_string()));
        // Cap hides the products here, but the pool has them.
        let context = context_at_end("add ch");
        assert!(matches!(context.kind, ContextKind::ModifierOrProduct { .. }));
        let suggestions = suggest_at_end("add ch");
        assert!(suggestions.contains(&"cheap".to_string()));
        assert!(suggestions.contains(&"cheese".to_string()));
    }

    #[test]
    fn test_slot_prefix_does_not_hide_the_add_context() {
        let context = context_at_end("[0] add ");
        assert!(matches!(context.kind, ContextKind::ModifierOrProduct { .. }));
        assert_eq!(context_at_end("[3] add beer ").kind, ContextKind::Parameter);
        let suggestions = suggest_at_end("[0] add fre");
        assert!(suggestions.contains(&"fresh".to_string()));
    }

    #[test]
    fn test_used_modifiers_are_not_suggested_again() {
        let context = context_at_end("add cheap ");
        match &context.kind {
            ContextKind::ModifierOrProduct { used } => assert_eq!(used, &["cheap"]),
            other => panic!("wrong context: {other:?}"),
        }
        let suggestions = suggest_at_end("add cheap ch");
        assert!(!suggestions.contains(&"cheap".to_string()));
        assert!(suggestions.contains(&"cheese".to_string()));
    }

    #[test]
    fn test_parameters_after_a_recognized_product() {
        assert_eq!(context_at_end("add beer ").kind, ContextKind::Parameter);
        let suggestions = suggest_at_end("add beer ");
        assert!(suggestions.contains(&"nutriscore".to_string()));
        assert!(suggestions.contains(&"volume".to_string()));
    }

    #[test]
    fn test_nutriscore_keyword_opens_grade_context() {
        assert_eq!(context_at_end("add beer nutriscore ").kind, ContextKind::Nutriscore);
        let suggestions = suggest_at_end("add beer nutriscore ");
        assert_eq!(suggestions, ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_consumed_keyword_value_retires_the_context() {
        assert_eq!(context_at_end("add beer nutriscore a ").kind, ContextKind::Parameter);
        assert_eq!(context_at_end("add beer shelflife week ").kind, ContextKind::Parameter);
    }

    #[test]
    fn test_escalator_consumes_up_to_two_values() {
        assert_eq!(context_at_end("add beer escalator ").kind, ContextKind::Escalator);
        assert_eq!(context_at_end("add beer escalator up ").kind, ContextKind::Escalator);
        assert_eq!(
            context_at_end("add beer escalator up fast ").kind,
            ContextKind::Parameter
        );
    }

    #[test]
    fn test_remove_offers_all_before_products() {
        assert_eq!(context_at_end("remove ").kind, ContextKind::ProductOrAll);
        let suggestions = suggest_at_end("remove ");
        assert_eq!(suggestions[0], "all");
    }

    #[test]
    fn test_cart_completion_bridges_the_phrase() {
        assert_eq!(suggest_at_end("my "), ["cart has"]);
        assert_eq!(suggest_at_end("my cart "), ["has"]);
    }

    #[test]
    fn test_wheel_context_after_cart_phrase() {
        assert_eq!(context_at_end("my cart has ").kind, ContextKind::Wheel);
        let suggestions = suggest_at_end("my cart has sq");
        assert!(suggestions.contains(&"square".to_string()));
        assert!(suggestions.contains(&"squeaky".to_string()));
    }

    #[test]
    fn test_mode_phrase_offers_on_off() {
        assert_eq!(context_at_end("discount mode ").kind, ContextKind::OnOff);
        assert_eq!(suggest_at_end("discount mode "), ["on", "off"]);
        assert_eq!(suggest_at_end("discount mode o"), ["on", "off"]);
        assert_eq!(context_at_end("black friday mode ").kind, ContextKind::OnOff);
    }

    #[test]
    fn test_rush_hour_offers_on_off() {
        assert_eq!(context_at_end("rush hour ").kind, ContextKind::OnOff);
    }

    #[test]
    fn test_season_coupon_security_vocabularies() {
        assert_eq!(context_at_end("season ").kind, ContextKind::Season);
        assert!(suggest_at_end("season hal").contains(&"halloween".to_string()));

        assert_eq!(context_at_end("apply coupon ").kind, ContextKind::Coupon);
        assert_eq!(suggest_at_end("apply coupon bo"), ["BOGO"]);

        assert_eq!(context_at_end("security level ").kind, ContextKind::Security);
        assert_eq!(
            suggest_at_end("security level "),
            ["low", "medium", "high", "paranoid"]
        );
    }

    #[test]
    fn test_theft_verbs_offer_products() {
        assert_eq!(context_at_end("steal ").kind, ContextKind::Product);
        assert_eq!(context_at_end("morph to ").kind, ContextKind::Product);
        assert_eq!(context_at_end("preserve ").kind, ContextKind::Product);
        let suggestions = suggest_at_end("steal be");
        assert!(suggestions.contains(&"beer".to_string()));
    }

    #[test]
    fn test_default_context_is_commands() {
        let suggestions = suggest_at_end("che");
        assert!(suggestions.contains(&"checkout line".to_string()));
        assert!(suggestions.contains(&"checkout".to_string()));
    }

    #[test]
    fn test_cap_limits_results() {
        let suggestions = suggest_at_end("add ");
        assert_eq!(suggestions.len(), config().max_suggestions);
    }

    #[test]
    fn test_detection_uses_only_the_current_line() {
        let text = "add beer\nremove ";
        let context = detect_context(text, text.len(), &config(), &catalog());
        assert_eq!(context.kind, ContextKind::ProductOrAll);
    }

    #[test]
    fn test_accept_replaces_the_partial_word() {
        let item = SuggestionItem::new("cheese", "Pad");
        let (text, cursor) = accept("add che", 7, &item);
        assert_eq!(text, "add cheese ");
        assert_eq!(cursor, 11);
    }

    #[test]
    fn test_accept_keeps_text_after_the_cursor() {
        let item = SuggestionItem::new("cheese", "Pad");
        let (text, cursor) = accept("add che nutriscore a", 7, &item);
        assert_eq!(text, "add cheese nutriscore a");
        assert_eq!(cursor, 10);
    }

    #[test]
    fn test_accept_respects_line_starts() {
        let item = SuggestionItem::new("checkout", "Start recording");
        let (text, cursor) = accept("add beer\nche", 12, &item);
        assert_eq!(text, "add beer\ncheckout ");
        assert_eq!(cursor, 18);
    }

    #[test]
    fn test_accept_multi_word_suggestion() {
        let item = SuggestionItem::new("cart has", "Set cart wheels");
        let (text, cursor) = accept("my ", 3, &item);
        assert_eq!(text, "my cart has ");
        assert_eq!(cursor, 12);
    }

    #[test]
    fn test_debounce_fires_after_quiet_period() {
        let mut debounce = Debounce::new(Duration::from_millis(100));
        let start = Instant::now();
        debounce.touch(start);
        assert!(!debounce.ready(start + Duration::from_millis(50)));
        // A new keystroke restarts the clock.
        debounce.touch(start + Duration::from_millis(60));
        assert!(!debounce.ready(start + Duration::from_millis(120)));
        assert!(debounce.ready(start + Duration::from_millis(160)));
        assert!(!debounce.ready(start + Duration::from_millis(200)));
    }
}
