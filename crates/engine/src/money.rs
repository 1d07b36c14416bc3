use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine to avoid
/// floating-point drift. Sums are exact; rounding only happens when parsing
/// user input with more than two fractional digits.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; extra
/// decimals are rounded half-up to cents):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert_eq!("12.345".parse::<MoneyCents>().unwrap().cents(), 1235);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Largest amount a single expense may hold (`DECIMAL(10, 2)`).
    pub const MAX_EXPENSE: MoneyCents = MoneyCents(99_999_999_99);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator, an optional leading `+`/`-`
    /// and an optional exponent (`1e3`, `2.5E-1`).
    ///
    /// Validation rules:
    /// - digits only around a single separator (rejects `NaN`, `1.2.3`, `1e`)
    /// - more than 2 fractional digits are rounded half-up on the third digit
    /// - rejects empty strings
    /// - a positive value too large for `i64` cents is reported as exceeding
    ///   [`MoneyCents::MAX_EXPENSE`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount;

        let trimmed = s.trim();
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.replace(',', ".");
        let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => {
                (mantissa, parse_exponent(exponent).ok_or_else(invalid)?)
            }
            None => (rest.as_str(), 0),
        };

        let mut parts = mantissa.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next().unwrap_or("");

        if parts.next().is_some() {
            return Err(invalid());
        }
        if units_str.is_empty() && frac_str.is_empty() {
            return Err(invalid());
        }
        if !units_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let (units_str, frac_str) = shift_point(units_str, frac_str, exponent);
        let overflow = || {
            if negative {
                EngineError::InvalidAmount
            } else {
                EngineError::Validation(vec![max_expense_violation()])
            }
        };

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| overflow())?
        };

        let digit = |idx: usize| -> i64 {
            frac_str
                .as_bytes()
                .get(idx)
                .map_or(0, |b| i64::from(b - b'0'))
        };
        let round_up = i64::from(digit(2) >= 5);
        let cents = digit(0) * 10 + digit(1) + round_up;

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Ok(MoneyCents(if negative { -total } else { total }))
    }
}

/// Store violation for amounts above [`MoneyCents::MAX_EXPENSE`].
pub(crate) fn max_expense_violation() -> String {
    format!("amount must not exceed {}", MoneyCents::MAX_EXPENSE)
}

/// Parses the digits after `e`/`E`. Exponents beyond `i32` saturate.
fn parse_exponent(s: &str) -> Option<i32> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let magnitude = digits.parse::<i32>().unwrap_or(i32::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Largest shift applied to the decimal point; anything further either
/// overflows `i64` or rounds to zero anyway.
const MAX_SHIFT: i64 = 64;

/// Moves the decimal point of `units.frac` by `exponent` places.
fn shift_point(units: &str, frac: &str, exponent: i32) -> (String, String) {
    if exponent == 0 {
        return (units.to_string(), frac.to_string());
    }

    let digits = format!("{units}{frac}");
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return (String::new(), String::new());
    }

    let skipped = (digits.len() - significant.len()) as i64;
    let len = significant.len() as i64;
    let point = (units.len() as i64 - skipped + i64::from(exponent))
        .clamp(-MAX_SHIFT, len + MAX_SHIFT);

    if point <= 0 {
        let zeros = "0".repeat((-point) as usize);
        (String::new(), format!("{zeros}{significant}"))
    } else if point >= len {
        let zeros = "0".repeat((point - len) as usize);
        (format!("{significant}{zeros}"), String::new())
    } else {
        let (units, frac) = significant.split_at(point as usize);
        (units.to_string(), frac.to_string())
    }
}

/// A share of a whole, stored as **tenths of a percent**.
///
/// `Percentage::share(MoneyCents::new(300), MoneyCents::new(400))` is 75.0%.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(i64);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);

    /// `part / whole`, rounded half-up to one decimal place; zero when `whole`
    /// is not positive.
    #[must_use]
    pub fn share(part: MoneyCents, whole: MoneyCents) -> Self {
        if !whole.is_positive() {
            return Self::ZERO;
        }
        let part = i128::from(part.cents());
        let whole = i128::from(whole.cents());
        let tenths = (part * 2000 + whole) / (2 * whole);
        Self(i64::try_from(tenths).unwrap_or(i64::MAX))
    }

    #[must_use]
    pub const fn tenths(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}
