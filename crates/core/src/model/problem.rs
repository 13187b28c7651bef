use serde::{Deserialize, Serialize};

use crate::model::Fraction;

/// One generated practice problem: math markup plus its reduced answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    expression: String,
    answer: Fraction,
}

impl Problem {
    #[must_use]
    pub fn new(expression: impl Into<String>, answer: Fraction) -> Self {
        Self {
            expression: expression.into(),
            answer,
        }
    }

    /// Math markup without delimiters.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub fn answer(&self) -> Fraction {
        self.answer
    }
}
