use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level id must be between {min} and {max}, got {got}")]
    OutOfRange { min: u8, max: u8, got: u64 },
    #[error("invalid level id: {raw}")]
    Invalid { raw: String },
}

/// Identifier of one of the six practice levels.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LevelId(u8);

impl LevelId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Creates a `LevelId`
    ///
    /// # Errors
    ///
    /// Returns `LevelError::OutOfRange` for ids outside `1..=6`.
    pub fn new(id: u8) -> Result<Self, LevelError> {
        if (Self::MIN..=Self::MAX).contains(&id) {
            Ok(Self(id))
        } else {
            Err(LevelError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                got: u64::from(id),
            })
        }
    }

    /// Returns the underlying u8 value
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn info(&self) -> &'static LevelInfo {
        &LEVELS[usize::from(self.0 - Self::MIN)]
    }

    #[must_use]
    pub fn kind(&self) -> LevelKind {
        self.info().kind
    }

    /// All levels in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<u8> for LevelId {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LevelId> for u8 {
    fn from(value: LevelId) -> Self {
        value.0
    }
}

impl FromStr for LevelId {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed: u64 = trimmed.parse().map_err(|_| LevelError::Invalid {
            raw: trimmed.to_string(),
        })?;
        let id = u8::try_from(parsed).map_err(|_| LevelError::OutOfRange {
            min: Self::MIN,
            max: Self::MAX,
            got: parsed,
        })?;
        Self::new(id)
    }
}

impl fmt::Debug for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelId({})", self.0)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which problem family a level draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelKind {
    Simplification,
    SameDenominator,
    DifferentDenominator,
    Multiplication,
    Division,
    Mixed,
}

/// Static description of a level shown on the level selection screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelInfo {
    pub id: LevelId,
    pub kind: LevelKind,
    pub title: &'static str,
    pub description: &'static str,
    /// Math markup without delimiters.
    pub example: &'static str,
}

pub static LEVELS: [LevelInfo; 6] = [
    LevelInfo {
        id: LevelId(1),
        kind: LevelKind::Simplification,
        title: "等級一：等值分數與約分",
        description: "此等級練習分數的基本概念，包括找出等值分數以及將分數化為最簡分數。這是所有分數運算的基礎。",
        example: "\\frac{4}{8} = \\frac{1}{?} \\quad \\text{或將} \\quad \\frac{6}{9} \\quad \\text{約分}",
    },
    LevelInfo {
        id: LevelId(2),
        kind: LevelKind::SameDenominator,
        title: "等級二：同分母分數的加減",
        description: "當分母相同時，直接對分子進行加減運算。題目可能包含正負數。",
        example: "\\frac{1}{5} + \\frac{-3}{5} = ?",
    },
    LevelInfo {
        id: LevelId(3),
        kind: LevelKind::DifferentDenominator,
        title: "等級三：異分母分數的加減",
        description: "分母不同時，需要先通分，找到最小公分母，轉換成同分母分數後再進行加減運算。題目可能包含正負數。",
        example: "\\frac{1}{2} + \\frac{-1}{3} = ?",
    },
    LevelInfo {
        id: LevelId(4),
        kind: LevelKind::Multiplication,
        title: "等級四：分數的乘法",
        description: "將分子與分子相乘，分母與分母相乘。運算前可以先約分簡化計算。題目可能包含正負數。",
        example: "\\frac{-2}{3} \\times \\frac{3}{4} = ?",
    },
    LevelInfo {
        id: LevelId(5),
        kind: LevelKind::Division,
        title: "等級五：分數的除法",
        description: "將除數的分子和分母顛倒（取倒數），然後與被除數相乘。題目可能包含正負數。",
        example: "\\frac{1}{2} \\div \\frac{-3}{4} = ?",
    },
    LevelInfo {
        id: LevelId(6),
        kind: LevelKind::Mixed,
        title: "等級六：分數的四則混合運算",
        description: "綜合運用加、減、乘、除四種運算，並遵循運算規則。題目可能包含正負數。",
        example: "(\\frac{1}{2} + \\frac{-1}{3}) \\times \\frac{3}{5} = ?",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_line_up_with_positions() {
        for (idx, level) in LEVELS.iter().enumerate() {
            assert_eq!(usize::from(level.id.value()), idx + 1);
            assert_eq!(level.id.info(), level);
        }
        assert_eq!(LevelId::all().count(), LEVELS.len());
    }

    #[test]
    fn new_rejects_out_of_range_ids() {
        assert!(LevelId::new(0).is_err());
        assert!(LevelId::new(7).is_err());
        assert_eq!(LevelId::new(6).unwrap().kind(), LevelKind::Mixed);
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("3".parse::<LevelId>().unwrap().value(), 3);
        assert_eq!(" 5 ".parse::<LevelId>().unwrap().value(), 5);
        assert!(matches!(
            "300".parse::<LevelId>(),
            Err(LevelError::OutOfRange { got: 300, .. })
        ));
        assert!(matches!(
            "two".parse::<LevelId>(),
            Err(LevelError::Invalid { .. })
        ));
    }
}
