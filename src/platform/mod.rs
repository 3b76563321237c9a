// MyRent - platform/mod.rs
//
// Platform abstraction layer: directories, config, filesystem, SQLite.
// Dependencies: core model and store trait, directories, toml, rusqlite.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
pub mod sqlite;
