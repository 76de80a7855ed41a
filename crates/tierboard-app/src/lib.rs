// Library root: re-exports all modules so integration tests and the binary
// share the app's public API.

pub mod app;
pub mod cli;
pub mod config;
pub mod headshots;
pub mod protocol;
pub mod render;
pub mod seed;
