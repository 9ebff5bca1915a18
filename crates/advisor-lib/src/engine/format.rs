//! Rendering of computed values into configuration strings

use serde::{Deserialize, Serialize};

/// Unit suffix of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "MB")]
    Megabytes,
    #[serde(rename = "kB")]
    Kilobytes,
    #[serde(rename = "unitless")]
    Unitless,
}

impl Unit {
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Megabytes => "MB",
            Unit::Kilobytes => "kB",
            Unit::Unitless => "",
        }
    }
}

/// A computed value before it is turned into a string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    /// Whole number of MB; fractional parts are truncated
    Megabytes(f64),
    Kilobytes(u64),
    Decimal(f64),
    Count(u32),
    Switch(bool),
}

impl RawValue {
    pub fn unit(&self) -> Unit {
        match self {
            RawValue::Megabytes(_) => Unit::Megabytes,
            RawValue::Kilobytes(_) => Unit::Kilobytes,
            RawValue::Decimal(_) | RawValue::Count(_) | RawValue::Switch(_) => Unit::Unitless,
        }
    }

    pub fn render(&self) -> String {
        match *self {
            RawValue::Megabytes(mb) => format!("{}{}", mb.trunc() as u64, Unit::Megabytes.suffix()),
            RawValue::Kilobytes(kb) => format!("{}{}", kb, Unit::Kilobytes.suffix()),
            RawValue::Decimal(v) => format_decimal(v),
            RawValue::Count(n) => n.to_string(),
            RawValue::Switch(true) => "ON".to_string(),
            RawValue::Switch(false) => "OFF".to_string(),
        }
    }
}

/// Shortest round-trip representation, keeping a fractional digit on whole numbers
fn format_decimal(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// Numeric part of a rendered value (`"16384kB"` -> 16384)
pub fn numeric_part(rendered: &str) -> Option<f64> {
    let end = rendered
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rendered.len());
    rendered[..end].parse().ok()
}
