//! Radio 24h CLI Library
//!
//! Headless access to the player's pieces: configuration loading, a JSON file
//! snapshot store, and a simulated session driven by a virtual clock.
//!
//! This library exposes the components for testing purposes.

pub mod config;
pub mod simulate;
pub mod store;

// Re-export commonly used types for convenience
pub use config::load_config;
pub use simulate::{SimulationOptions, SimulationReport, Simulator};
pub use store::JsonFileStore;
