mod answer;
mod fraction;
mod level;
mod problem;

pub use answer::{AnswerParseError, CheckState, UserAnswer, check_answer, is_equivalent};
pub use fraction::{Fraction, FractionError, gcd, reduce};
pub use level::{LEVELS, LevelError, LevelId, LevelInfo, LevelKind};
pub use problem::Problem;
