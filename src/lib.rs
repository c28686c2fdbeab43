//! Edge-bleed repair for sprite images.
//!
//! Transparent pixels that keep a black RGB value produce grey halos when a
//! texture sampler interpolates across sprite edges. This crate rewrites the
//! color channels of those pixels to the color of their nearest opaque
//! neighbor, leaving alpha untouched, and ships a small batch shell for
//! running the fix across a directory of PNG sprites.

pub mod bleeder;
pub mod error;
pub mod runner;
pub mod walker;

pub use bleeder::{
    bleed_image, find_fix_targets, fix_sprite, nearest_opaque_color, preview_image, BleedOutcome,
    BleedSettings, FixStatus,
};
pub use error::{Result, SpriteError};
pub use runner::{run_batch, BatchReport, BatchSettings, FileReport};
pub use walker::collect_sprites;
