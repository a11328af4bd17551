pub mod config;
pub mod discover;
pub mod display;
pub mod errors;
pub mod launcher;
pub mod runner;
pub mod types;
