//! Configuration loaded from the tfat home directory.

pub mod settings;

pub use settings::{default_home, Settings};
