//! # Supermarket - Live Coding Grocery Store
//!
//! Supermarket is a live-performance command interpreter that turns plain
//! grocery-store sentences into a running musical arrangement. Products are
//! instruments, shelf slots are mixer channels, and store chatter like
//! "it's closing time" bends the tempo of the whole shop.
//!
//! ## Core Features
//!
//! - **Ten Shelf Slots**: Addressable channels `[0]`..`[9]`, each holding one product
//! - **Beat-Synchronized Swaps**: Replacing a product while the clock runs waits for the next bar
//! - **Grocery Grammar**: `[2] add fresh beer nutriscore A shelflife week`
//! - **Store Moods**: discount, inflation, consumerism, black_friday, aisle_7, apocalypse
//! - **Cart Physics**: wheel types recolor the groove, from square to luxury
//! - **Context-Aware Autocomplete**: suggestions track what the current word can legally be
//! - **Security Theater**: shoplifting attempts, security levels, and chase sequences
//! - **Improvised Performances**: a seeded generator that plays the store by itself
//!
//! ## Quick Start
//!
//! ```rust
//! use supermarket::config::StoreConfig;
//! use supermarket::engine::{Engine, MemorySink};
//! use supermarket::synth::SilentBank;
//!
//! let sink = MemorySink::new();
//! let mut engine = Engine::new(
//!     StoreConfig::default(),
//!     Box::new(SilentBank::new()),
//!     Box::new(sink.clone()),
//! );
//!
//! engine.execute_command("[0] add fresh beer");
//! engine.execute_command("my cart has square wheels");
//! assert!(sink.contains("Added fresh beer"));
//! ```
//!
//! ### Completing a Half-Typed Line
//!
//! ```rust
//! use supermarket::autocomplete;
//! use supermarket::catalog::ProductCatalog;
//! use supermarket::config::AutocompleteConfig;
//!
//! let catalog = ProductCatalog::stocked();
//! let config = AutocompleteConfig::default();
//! let items = autocomplete::suggest("[0] add fre", 11, &config, &catalog);
//! assert!(items.iter().any(|item| item.text == "fresh"));
//! ```
//!
//! ## Command Cheat Sheet
//!
//! - `[0] add beer` stocks slot 0; `[0] remove` clears it; `remove all` empties the store
//! - `it's closing time` / `it's opening time` drag the tempo down or back up
//! - `discount mode on`, `apocalypse mode on` flip store-wide moods
//! - `my cart has premium wheels` changes the cart's rhythm section
//! - `shoplift cheese` is a gamble; `security level high` changes the odds

pub mod autocomplete;
pub mod catalog;
pub mod clock;
pub mod command_parser;
pub mod config;
pub mod engine;
pub mod features;
pub mod improvise;
pub mod modes;
pub mod product_parser;
pub mod repl;
pub mod scheduler;
pub mod security;
pub mod slots;
pub mod synth;
pub mod wheels;
