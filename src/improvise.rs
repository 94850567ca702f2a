//! Random command generation for hands-free performance.
//!
//! Five command families get drawn with equal weight: cart wheels,
//! product adds, removals, mode toggles, and store-hours changes. Adds
//! carry modifiers and special parameters with the same odds a human
//! improviser tends to use them, so a long run sounds varied rather
//! than uniform.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{self, ProductCatalog};
use crate::slots::SLOT_COUNT;

const WHEEL_PICKS: &[&str] = &["square", "broken", "premium", "defective", "bargain", "luxury"];
const WHEEL_MATERIALS: &[&str] = &["", "heavy ", "iron ", "steel "];

const MODE_PHRASES: &[&str] = &[
    "discount mode",
    "inflation mode",
    "consumerism mode",
    "black_friday mode",
    "aisle_7 ambience",
    "fluorescent_lights flicker",
    "apocalypse mode",
];

const TIME_PHRASES: &[&str] = &["it's closing time", "it's opening time"];

const NUTRISCORE_GRADES: &[&str] = &["A", "B", "C", "D", "E"];
const SHELF_LIVES: &[&str] = &["today", "week", "month", "year", "decade", "forever"];

/// Draw one playable command line.
pub fn random_command<R: Rng>(rng: &mut R, catalog: &ProductCatalog) -> String {
    match rng.gen_range(0..5) {
        0 => cart_wheels(rng),
        1 => add_product(rng, catalog),
        2 => remove_product(rng),
        3 => toggle_mode(rng),
        _ => store_hours(rng),
    }
}

fn pick<'a, R: Rng>(rng: &mut R, choices: &[&'a str]) -> &'a str {
    choices.choose(rng).copied().unwrap_or_default()
}

fn random_slot<R: Rng>(rng: &mut R) -> usize {
    rng.gen_range(0..SLOT_COUNT)
}

fn cart_wheels<R: Rng>(rng: &mut R) -> String {
    format!(
        "my cart has {}{} wheels",
        pick(rng, WHEEL_MATERIALS),
        pick(rng, WHEEL_PICKS)
    )
}

fn add_product<R: Rng>(rng: &mut R, catalog: &ProductCatalog) -> String {
    let names: Vec<&str> = catalog.names().collect();
    let product = pick(rng, &names);
    let slot = random_slot(rng);

    // A bare add now and then keeps the texture honest.
    if rng.gen_bool(0.3) {
        return format!("[{slot}] add {product}");
    }

    let count = if rng.gen_bool(0.7) { 1 } else { 2 };
    let mut modifiers: Vec<&str> = Vec::new();
    while modifiers.len() < count {
        let name = pick_modifier(rng);
        if !modifiers.contains(&name) {
            modifiers.push(name);
        }
    }

    let mut params = String::new();
    if rng.gen_bool(0.2) {
        params.push_str(" nutriscore ");
        params.push_str(pick(rng, NUTRISCORE_GRADES));
    }
    if rng.gen_bool(0.2) {
        params.push_str(" shelflife ");
        params.push_str(pick(rng, SHELF_LIVES));
    }
    if rng.gen_bool(0.2) {
        params.push_str(" open");
    }

    format!("[{slot}] add {} {product}{params}", modifiers.join(" "))
}

fn pick_modifier<R: Rng>(rng: &mut R) -> &'static str {
    catalog::MODIFIERS
        .choose(rng)
        .map(|def| def.name)
        .unwrap_or("fresh")
}

fn remove_product<R: Rng>(rng: &mut R) -> String {
    // Mostly single-slot removals; the occasional full sweep resets the mix.
    if rng.gen_bool(0.8) {
        format!("[{}] remove", random_slot(rng))
    } else {
        "remove all".to_string()
    }
}

fn toggle_mode<R: Rng>(rng: &mut R) -> String {
    let phrase = pick(rng, MODE_PHRASES);
    let action = if rng.gen_bool(0.8) { "on" } else { "off" };
    format!("{phrase} {action}")
}

fn store_hours<R: Rng>(rng: &mut R) -> String {
    pick(rng, TIME_PHRASES).to_string()
}
