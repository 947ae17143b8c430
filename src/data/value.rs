//! Cell Value Parser
//! Turns raw cell text ("1500", "1.5k") into a non-negative integer.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<whole>\d+)(?:\.(?P<frac>\d+))?(?P<suffix>k)?$").unwrap()
});

/// Fractional digits that can still affect the resolved integer ("k" scales by 10^3).
const KEPT_SCALE: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("empty value")]
    Empty,
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("value out of range: {0:?}")]
    Overflow(String),
}

/// A decimal number held exactly as `mantissa / 10^scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Number {
    mantissa: u128,
    scale: u32,
}

impl Number {
    /// Digits past `KEPT_SCALE` are dropped; truncation makes them irrelevant.
    fn parse(whole: &str, frac: Option<&str>, raw: &str) -> Result<Self, ValueError> {
        let frac = frac.unwrap_or("");
        let frac = &frac[..frac.len().min(KEPT_SCALE)];

        let digits = format!("{whole}{frac}");
        let mantissa = digits
            .parse::<u128>()
            .map_err(|_| ValueError::Overflow(raw.to_string()))?;

        Ok(Self {
            mantissa,
            scale: frac.len() as u32,
        })
    }

    /// Multiply by `factor`, then drop the fractional part.
    fn truncate_scaled(self, factor: u128) -> Option<u64> {
        let scaled = self.mantissa.checked_mul(factor)?;
        let divisor = 10u128.pow(self.scale);
        u64::try_from(scaled / divisor).ok()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let divisor = 10u128.pow(self.scale);
        write!(
            f,
            "{}.{:0width$}",
            self.mantissa / divisor,
            self.mantissa % divisor,
            width = self.scale as usize
        )
    }
}

/// A parsed cell: either a plain number or the "k" thousands shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue {
    Plain(Number),
    Thousands(Number),
}

impl CellValue {
    /// Parse a raw cell. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ValueError::Empty);
        }

        let caps = VALUE_RE
            .captures(text)
            .ok_or_else(|| ValueError::NotANumber(text.to_string()))?;

        let whole = caps.name("whole").map(|m| m.as_str()).unwrap_or("0");
        let frac = caps.name("frac").map(|m| m.as_str());
        let number = Number::parse(whole, frac, text)?;

        if caps.name("suffix").is_some() {
            Ok(CellValue::Thousands(number))
        } else {
            Ok(CellValue::Plain(number))
        }
    }

    /// Resolve to an integer, truncating any fraction left after scaling.
    pub fn resolve(&self) -> Result<u64, ValueError> {
        let resolved = match self {
            CellValue::Plain(n) => n.truncate_scaled(1),
            CellValue::Thousands(n) => n.truncate_scaled(1000),
        };
        resolved.ok_or_else(|| ValueError::Overflow(self.to_string()))
    }
}

impl FromStr for CellValue {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellValue::parse(s)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Plain(n) => write!(f, "{n}"),
            CellValue::Thousands(n) => write!(f, "{n}k"),
        }
    }
}

/// Parse and resolve in one step.
pub fn normalize_value(raw: &str) -> Result<u64, ValueError> {
    CellValue::parse(raw)?.resolve()
}
