use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(hex.to_owned());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// matplotlib's ggplot cycle without its grey, followed by purple and orange
pub const GGPLOT_COLORS: &[Rgb] = &[
    Rgb(0xE2, 0x4A, 0x33),
    Rgb(0x34, 0x8A, 0xBD),
    Rgb(0x98, 0x8E, 0xD5),
    Rgb(0xFB, 0xC1, 0x5E),
    Rgb(0x8E, 0xBA, 0x42),
    Rgb(0xFF, 0xB5, 0xB8),
    Rgb(0x80, 0x00, 0x80),
    Rgb(0xFF, 0xA5, 0x00),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: GGPLOT_COLORS.to_vec(),
        }
    }
}

impl Palette {
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        let colors = colors
            .iter()
            .map(|c| Rgb::from_hex(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { colors })
    }

    /// Colour of the `index`-th series, cycling when there are more series than colours
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Digit grouping used for value labels and axis ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    pub thousands: String,
    pub decimal: String,
}

impl Default for NumberLocale {
    /// en_US
    fn default() -> Self {
        Self {
            thousands: ",".to_owned(),
            decimal: ".".to_owned(),
        }
    }
}

impl NumberLocale {
    pub fn format(&self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let formatted = format!("{:.*}", decimals, value.abs());
        let (integer, fraction) = match formatted.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (formatted.as_str(), None),
        };

        let grouped = integer
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(String::from_utf8_lossy)
            .join(&self.thousands);

        let sign = if value.is_sign_negative() && formatted.bytes().any(|b| b != b'0' && b != b'.')
        {
            "-"
        } else {
            ""
        };

        match fraction {
            Some(fraction) => format!("{sign}{grouped}{}{fraction}", self.decimal),
            None => format!("{sign}{grouped}"),
        }
    }
}
