use std::str::FromStr;

use thiserror::Error;

use crate::model::Fraction;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerParseError {
    #[error("answer is empty")]
    Empty,
    #[error("invalid answer: {raw}")]
    Invalid { raw: String },
}

/// A learner's possibly incomplete answer. Either field may still be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct UserAnswer {
    pub numerator: Option<i64>,
    pub denominator: Option<i64>,
}

impl UserAnswer {
    #[must_use]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator: Some(numerator),
            denominator: Some(denominator),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_numerator(self, numerator: Option<i64>) -> Self {
        Self { numerator, ..self }
    }

    #[must_use]
    pub fn with_denominator(self, denominator: Option<i64>) -> Self {
        Self {
            denominator,
            ..self
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numerator.is_none() && self.denominator.is_none()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.numerator.is_some() && self.denominator.is_some()
    }

    /// Parses one input box. Blank or non-numeric text counts as missing.
    #[must_use]
    pub fn parse_field(raw: &str) -> Option<i64> {
        raw.trim().parse().ok()
    }
}

impl FromStr for UserAnswer {
    type Err = AnswerParseError;

    /// Accepts `n/d` or a bare integer `n` (read as `n/1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AnswerParseError::Empty);
        }
        let invalid = || AnswerParseError::Invalid {
            raw: trimmed.to_string(),
        };

        match trimmed.split_once('/') {
            Some((n, d)) => {
                let numerator = Self::parse_field(n).ok_or_else(invalid)?;
                let denominator = Self::parse_field(d).ok_or_else(invalid)?;
                Ok(Self::new(numerator, denominator))
            }
            None => {
                let numerator = Self::parse_field(trimmed).ok_or_else(invalid)?;
                Ok(Self::new(numerator, 1))
            }
        }
    }
}

/// Outcome of checking one problem.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CheckState {
    #[default]
    Unchecked,
    Correct,
    Incorrect,
}

impl CheckState {
    #[must_use]
    pub fn is_checked(self) -> bool {
        !matches!(self, Self::Unchecked)
    }
}

/// Cross-multiplication equivalence; the learner's fraction need not be reduced.
///
/// Missing fields and a zero denominator are never equivalent to anything.
#[must_use]
pub fn is_equivalent(user: &UserAnswer, answer: Fraction) -> bool {
    let (Some(numerator), Some(denominator)) = (user.numerator, user.denominator) else {
        return false;
    };
    if denominator == 0 {
        return false;
    }

    i128::from(answer.numerator()) * i128::from(denominator)
        == i128::from(numerator) * i128::from(answer.denominator())
}

#[must_use]
pub fn check_answer(user: &UserAnswer, answer: Fraction) -> CheckState {
    if is_equivalent(user, answer) {
        CheckState::Correct
    } else {
        CheckState::Incorrect
    }
}
