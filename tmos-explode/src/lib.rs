//! Explode F5 TMOS configuration dumps into per-application bundles.
//!
//! Parsing and digging live in `tmos-core`; this crate adds what a command
//! line tool needs around them:
//!
//! - [`settings`]: TOML settings with embedded defaults
//! - [`explode`]: the aggregate report envelope
//! - [`report`]: colored terminal rendering of stats and bundles
//! - [`inspect`]: config tree visualization

pub mod explode;
pub mod inspect;
pub mod report;
pub mod settings;
