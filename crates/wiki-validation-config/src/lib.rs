// crates/wiki-validation-config/src/lib.rs
// ============================================================================
// Module: Wiki Validation Config Library
// Description: Canonical config model and validation for the page harness.
// Purpose: Single source of truth for wiki-validation.toml semantics.
// Dependencies: regex, serde, toml, url
// ============================================================================

//! ## Overview
//! `wiki-validation-config` defines the configuration model consumed by the
//! suite builder. Configuration is loaded either from a TOML file or from a
//! flat property map keyed by the historical property names
//! (`urlsToTestAsAdmin`, `urlsToTestAsGuest`, ...). Both paths end in the same
//! strict validation.
//! Invariants:
//! - A validated config always carries both URL lists and an archive path.
//! - The document filter pattern, when present, compiles.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod filter;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use filter::DocumentFilter;
