// MyRent - core/mod.rs
//
// Core business logic layer.
// Dependencies: parsing and serialisation crates only.
// Must NOT depend on: platform, app, or the filesystem directly.

pub mod analytics;
pub mod dedup;
pub mod export;
pub mod fields;
pub mod header;
pub mod model;
pub mod normalize;
pub mod source;
pub mod store;
