// The binary entry point is main.rs; the module tree lives here so the
// integration tests under tests/ can drive the client and the plan store.

pub mod app;
pub mod config;
pub mod event;
pub mod plan;
pub mod store;
pub mod timer;
pub mod ui;
pub mod view;
