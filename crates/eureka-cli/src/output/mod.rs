//! Terminal output formatting and utilities.
//!
//! This module provides consistent output formatting across all commands,
//! including colors and error messages with suggestions.

pub mod colors;
pub mod errors;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print a step message with a marker
    pub fn step(&self, marker: &str, message: &str) {
        println!("{} {}", marker, message);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
