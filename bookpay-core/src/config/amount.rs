//! Deposit amount input configuration.

use crate::amount::CurrencyFormat;

/// Quick-pick presets and grouping for the deposit amount field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountConfig {
    /// Quick-pick amounts, in display order.
    pub presets: Vec<u64>,
    /// Thousands separator used when rendering amounts.
    pub group_separator: char,
}

impl AmountConfig {
    pub fn format(&self) -> CurrencyFormat {
        CurrencyFormat {
            group_separator: self.group_separator,
            group_size: 3,
        }
    }
}

impl Default for AmountConfig {
    fn default() -> Self {
        Self {
            presets: vec![50_000, 100_000, 200_000, 500_000, 1_000_000, 2_000_000],
            group_separator: '.',
        }
    }
}
