//! Deposit amount input model.
//!
//! Turns whatever the user typed into a digits-only amount plus a grouped
//! display string, and tracks whether the current value came from one of the
//! quick-pick presets (used only for highlighting).

use crate::config::AmountConfig;
use thiserror::Error;

/// Longest run of digits kept from the input. Anything past this is dropped,
/// the same way a length-limited text field would ignore it.
pub const MAX_DIGITS: usize = 15;

/// Errors raised by the amount model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The amount is zero (or nothing was typed).
    #[error("amount must be greater than zero")]
    NotPositive,

    /// A quick-pick index outside the preset list.
    #[error("no preset at index {0}")]
    UnknownPreset(usize),
}

/// Grouping rules for rendering an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub group_separator: char,
    pub group_size: usize,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            group_separator: '.',
            group_size: 3,
        }
    }
}

/// Result of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedAmount {
    /// Grouped digits, e.g. `100.000`. Never carries a currency suffix so the
    /// caret does not jump while typing.
    pub display_text: String,
    pub numeric_amount: u64,
}

/// Strip everything but digits from `raw` and render them grouped.
///
/// Leading zeros are dropped (`"007"` becomes `"7"`); an input of only zeros
/// renders as `"0"`; an input with no digits renders as the empty string.
pub fn normalize(raw: &str, format: CurrencyFormat) -> NormalizedAmount {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .take(MAX_DIGITS)
        .collect();

    if digits.is_empty() {
        let display_text = if raw.contains('0') {
            "0".to_string()
        } else {
            String::new()
        };
        return NormalizedAmount {
            display_text,
            numeric_amount: 0,
        };
    }

    // At most MAX_DIGITS ascii digits, always fits in a u64.
    let numeric_amount = digits.parse::<u64>().unwrap_or(0);

    NormalizedAmount {
        display_text: group_digits(&digits, format),
        numeric_amount,
    }
}

/// Render a non-negative amount with grouping.
pub fn format_amount(amount: u64, format: CurrencyFormat) -> String {
    group_digits(&amount.to_string(), format)
}

fn group_digits(digits: &str, format: CurrencyFormat) -> String {
    let size = format.group_size.max(1);
    let len = digits.len();
    let mut out = String::with_capacity(len + len / size);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(format.group_separator);
        }
        out.push(c);
    }
    out
}

pub fn is_valid(amount: u64) -> bool {
    amount > 0
}

/// Where the current value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSelection {
    /// Set by tapping the preset at this index.
    Preset(usize),
    /// Typed by hand (or nothing entered yet).
    FreeText,
}

/// State behind the deposit amount field and its quick-pick row.
#[derive(Debug, Clone)]
pub struct AmountInput {
    format: CurrencyFormat,
    presets: Vec<u64>,
    value: NormalizedAmount,
    selection: AmountSelection,
}

impl AmountInput {
    pub fn new(config: &AmountConfig) -> Self {
        Self {
            format: config.format(),
            presets: config.presets.clone(),
            value: NormalizedAmount::default(),
            selection: AmountSelection::FreeText,
        }
    }

    pub fn presets(&self) -> &[u64] {
        &self.presets
    }

    pub fn value(&self) -> &NormalizedAmount {
        &self.value
    }

    pub fn selection(&self) -> AmountSelection {
        self.selection
    }

    /// Index of the preset to highlight, if any.
    pub fn highlighted_preset(&self) -> Option<usize> {
        match self.selection {
            AmountSelection::Preset(i) => Some(i),
            AmountSelection::FreeText => None,
        }
    }

    /// Apply a manual edit. Always drops preset highlighting.
    pub fn edit(&mut self, raw: &str) -> &NormalizedAmount {
        self.value = normalize(raw, self.format);
        self.selection = AmountSelection::FreeText;
        &self.value
    }

    /// Select a quick-pick preset, setting both display and numeric value.
    pub fn pick_preset(&mut self, index: usize) -> Result<&NormalizedAmount, AmountError> {
        let amount = *self
            .presets
            .get(index)
            .ok_or(AmountError::UnknownPreset(index))?;
        self.value = NormalizedAmount {
            display_text: format_amount(amount, self.format),
            numeric_amount: amount,
        };
        self.selection = AmountSelection::Preset(index);
        Ok(&self.value)
    }

    pub fn is_valid(&self) -> bool {
        is_valid(self.value.numeric_amount)
    }

    /// The amount to pay, if it is valid.
    pub fn confirm(&self) -> Result<u64, AmountError> {
        if self.is_valid() {
            Ok(self.value.numeric_amount)
        } else {
            Err(AmountError::NotPositive)
        }
    }
}
