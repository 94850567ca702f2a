//! Integration tests for context detection and suggestion filtering,
//! exercised the way the prompt uses them: full lines, byte cursors,
//! accept-then-retype round trips.

use supermarket::autocomplete::{self, ContextKind, SuggestionItem};
use supermarket::catalog::ProductCatalog;
use supermarket::config::AutocompleteConfig;

fn suggest(text: &str) -> Vec<String> {
    let catalog = ProductCatalog::stocked();
    let config = AutocompleteConfig::default();
    autocomplete::suggest(text, text.len(), &config, &catalog)
        .into_iter()
        .map(|item| item.text)
        .collect()
}

fn kind(text: &str) -> ContextKind {
    let catalog = ProductCatalog::stocked();
    let config = AutocompleteConfig::default();
    autocomplete::detect_context(text, text.len(), &config, &catalog).kind
}

#[test]
fn test_empty_input_suggests_nothing() {
    assert!(suggest("").is_empty());
    assert!(suggest("   ").is_empty());
}

#[test]
fn test_short_partial_without_history_stays_quiet() {
    assert!(suggest("d").is_empty());
    // Two characters is enough.
    assert!(!suggest("di").is_empty());
}

#[test]
fn test_typing_a_full_add_line_walks_every_context() {
    assert!(matches!(kind("[0] add "), ContextKind::ModifierOrProduct { .. }));
    assert_eq!(kind("[0] add beer "), ContextKind::Parameter);
    assert_eq!(kind("[0] add beer nutriscore "), ContextKind::Nutriscore);
    assert_eq!(kind("[0] add beer nutriscore a "), ContextKind::Parameter);
    assert_eq!(kind("[0] add beer shelflife "), ContextKind::ShelfLife);
    assert_eq!(kind("[0] add beer escalator "), ContextKind::Escalator);
    assert_eq!(kind("[0] add beer escalator up fast "), ContextKind::Parameter);
}

#[test]
fn test_add_suggestions_mix_modifiers_and_products() {
    let items = suggest("[1] add ch");
    assert!(items.contains(&"cheap".to_string()));
    assert!(items.contains(&"cheese".to_string()));
}

#[test]
fn test_modifier_already_used_drops_out() {
    let items = suggest("[1] add cheap ch");
    assert!(!items.contains(&"cheap".to_string()));
    assert!(items.contains(&"cheese".to_string()));
}

#[test]
fn test_remove_leads_with_all() {
    let items = suggest("remove ");
    assert_eq!(items[0], "all");
    assert!(items.len() > 1);
}

#[test]
fn test_cart_phrase_builds_itself() {
    assert_eq!(suggest("my "), vec!["cart has".to_string()]);
    assert_eq!(suggest("my cart "), vec!["has".to_string()]);
    let wheels = suggest("my cart has ");
    assert!(wheels.contains(&"square".to_string()));
    assert!(wheels.contains(&"luxury".to_string()));
}

#[test]
fn test_mode_phrases_offer_on_off() {
    assert_eq!(suggest("discount mode "), vec!["on".to_string(), "off".to_string()]);
    assert_eq!(suggest("aisle_7 ambience o"), vec!["on".to_string(), "off".to_string()]);
    assert_eq!(suggest("rush hour "), vec!["on".to_string(), "off".to_string()]);
}

#[test]
fn test_value_vocabularies() {
    assert_eq!(suggest("season ")[0], "halloween");
    assert_eq!(suggest("apply coupon "), vec!["BOGO", "50OFF", "FREESHIP", "VIP"]);
    assert_eq!(suggest("security level "), vec!["low", "medium", "high", "paranoid"]);
}

#[test]
fn test_theft_and_morph_target_products() {
    assert_eq!(kind("shoplift "), ContextKind::Product);
    assert_eq!(kind("morph to "), ContextKind::Product);
    let items = suggest("steal che");
    assert_eq!(items, vec!["cheese".to_string()]);
}

#[test]
fn test_prefix_matches_rank_before_substring_matches() {
    let pool = vec![
        SuggestionItem::new("add", ""),
        SuggestionItem::new("badge", ""),
        SuggestionItem::new("addendum", ""),
    ];
    let narrow: Vec<String> = autocomplete::filter_suggestions(&pool, "ad", 2)
        .into_iter()
        .map(|item| item.text)
        .collect();
    assert_eq!(narrow, vec!["add", "addendum"]);

    // With room to spare, the substring match tails the list.
    let wide: Vec<String> = autocomplete::filter_suggestions(&pool, "ad", 8)
        .into_iter()
        .map(|item| item.text)
        .collect();
    assert_eq!(wide, vec!["add", "addendum", "badge"]);
}

#[test]
fn test_cap_applies_to_unfiltered_pools() {
    let items = suggest("[0] add ");
    assert_eq!(items.len(), AutocompleteConfig::default().max_suggestions);
}

#[test]
fn test_accept_round_trip_builds_a_runnable_line() {
    let catalog = ProductCatalog::stocked();
    let config = AutocompleteConfig::default();

    let text = "[0] add che";
    let items = autocomplete::suggest(text, text.len(), &config, &catalog);
    let cheese = items.iter().find(|item| item.text == "cheese").unwrap();
    let (text, cursor) = autocomplete::accept(text, text.len(), cheese);
    assert_eq!(text, "[0] add cheese ");
    assert_eq!(cursor, text.len());

    let items = autocomplete::suggest(&text, cursor, &config, &catalog);
    let nutri = items.iter().find(|item| item.text == "nutriscore").unwrap();
    let (text, cursor) = autocomplete::accept(&text, cursor, nutri);
    assert_eq!(text, "[0] add cheese nutriscore ");
    assert_eq!(cursor, text.len());
}

#[test]
fn test_accept_in_the_middle_of_a_line_keeps_the_tail() {
    let catalog = ProductCatalog::stocked();
    let config = AutocompleteConfig::default();

    let text = "[0] add che nutriscore a";
    let cursor = 11; // right after "che"
    let items = autocomplete::suggest(text, cursor, &config, &catalog);
    let cheese = items.iter().find(|item| item.text == "cheese").unwrap();
    let (text, cursor) = autocomplete::accept(text, cursor, cheese);
    assert_eq!(text, "[0] add cheese nutriscore a");
    assert_eq!(cursor, "[0] add cheese".len());
}

#[test]
fn test_only_the_last_line_counts() {
    let text = "[0] add beer\nremove ";
    let catalog = ProductCatalog::stocked();
    let config = AutocompleteConfig::default();
    let context = autocomplete::detect_context(text, text.len(), &config, &catalog);
    assert_eq!(context.kind, ContextKind::ProductOrAll);
}

#[test]
fn test_suggestions_carry_descriptions() {
    let catalog = ProductCatalog::stocked();
    let config = AutocompleteConfig::default();
    let items = autocomplete::suggest("[0] add bee", 11, &config, &catalog);
    let beer = items.iter().find(|item| item.text == "beer").unwrap();
    assert_eq!(beer.desc, "Hoppy plucked lead");
}
