// MyRent - app/mod.rs
//
// Application layer: import orchestration, dashboard, catalogue operations.
// Dependencies: core layer; platform only for bounded file reads.
// Every operation takes a caller-owned store handle.

pub mod catalogue;
pub mod dashboard;
pub mod import;
