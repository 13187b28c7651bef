use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FractionError {
    #[error("denominator must not be zero")]
    ZeroDenominator,
}

/// A numerator/denominator pair.
///
/// `Fraction::new` keeps the pair exactly as given so problem operands can be shown
/// unreduced. `reduce` produces the canonical form used for answers: positive
/// denominator, coprime terms, and zero as `0/1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFraction")]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

/// Wire shape of a `Fraction`, checked through `Fraction::new` on the way in.
#[derive(Deserialize)]
struct RawFraction {
    numerator: i64,
    denominator: i64,
}

impl TryFrom<RawFraction> for Fraction {
    type Error = FractionError;

    fn try_from(raw: RawFraction) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl Fraction {
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    /// Creates a fraction without reducing it.
    ///
    /// # Errors
    ///
    /// Returns `FractionError::ZeroDenominator` when `denominator` is 0.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, FractionError> {
        if denominator == 0 {
            return Err(FractionError::ZeroDenominator);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    #[must_use]
    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    #[must_use]
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    /// Renders the fraction as one term of a math-markup expression.
    ///
    /// A negative term that is not the first one in the expression is wrapped in
    /// parentheses, so a sum reads `+ (-\frac{3}{5})` rather than `+ -\frac{3}{5}`.
    #[must_use]
    pub fn format_term(&self, is_first: bool) -> String {
        let negative = self.numerator < 0;
        if self.is_integer() {
            if negative && !is_first {
                return format!("({})", self.numerator);
            }
            return self.numerator.to_string();
        }

        let body = format!(
            "\\frac{{{}}}{{{}}}",
            self.numerator.unsigned_abs(),
            self.denominator
        );
        match (negative, is_first) {
            (true, true) => format!("-{body}"),
            (true, false) => format!("(-{body})"),
            (false, _) => body,
        }
    }

    /// Markup used when revealing an answer: the sign stays on the numerator.
    #[must_use]
    pub fn to_latex(&self) -> String {
        format!("\\frac{{{}}}{{{}}}", self.numerator, self.denominator)
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Greatest common divisor by the Euclidean algorithm.
#[must_use]
pub fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Reduces `numerator / denominator` to canonical form.
///
/// A zero denominator is not expected here; it is logged and answered with `0/1`
/// so callers never see a panic.
#[must_use]
pub fn reduce(numerator: i64, denominator: i64) -> Fraction {
    if denominator == 0 {
        warn!(numerator, "attempted to reduce a fraction with a zero denominator");
        return Fraction::ZERO;
    }
    if numerator == 0 {
        return Fraction::ZERO;
    }

    // i128 keeps the sign flip of i64::MIN representable.
    let (mut n, mut d) = (i128::from(numerator), i128::from(denominator));
    if d < 0 {
        n = -n;
        d = -d;
    }

    let divisor = i128::from(gcd(numerator.unsigned_abs(), denominator.unsigned_abs()));
    let (n, d) = (n / divisor, d / divisor);

    match (i64::try_from(n), i64::try_from(d)) {
        (Ok(numerator), Ok(denominator)) => Fraction {
            numerator,
            denominator,
        },
        _ => {
            warn!(numerator, denominator, "reduced fraction does not fit in i64");
            Fraction::ZERO
        }
    }
}
