//! Utility functions for money and string formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_price, round_money, truncate};
