use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::{debug, error};

use drill_core::model::{Fraction, LevelId, LevelKind, Problem, reduce};

use crate::error::GenerateError;

/// Number of problems in every batch.
pub const BATCH_SIZE: usize = 3;

/// Uniform integer source used by the level strategies.
pub trait RandomSource {
    /// Uniform integer in the closed range `[min, max]`.
    fn int_in(&mut self, min: i64, max: i64) -> i64;

    /// Fair coin flip.
    fn coin(&mut self) -> bool;
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn int_in(&mut self, min: i64, max: i64) -> i64 {
        (**self).int_in(min, max)
    }

    fn coin(&mut self) -> bool {
        (**self).coin()
    }
}

/// Adapts any `rand::Rng` into a `RandomSource`.
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<ThreadRng> {
    #[must_use]
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn int_in(&mut self, min: i64, max: i64) -> i64 {
        self.0.random_range(min..=max)
    }

    fn coin(&mut self) -> bool {
        self.0.random_bool(0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AddSub {
    Add,
    Sub,
}

impl AddSub {
    fn pick(source: &mut impl RandomSource) -> Self {
        if source.coin() { Self::Add } else { Self::Sub }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
        }
    }

    fn apply(self, level: LevelId, a: i64, b: i64) -> Result<i64, GenerateError> {
        match self {
            Self::Add => a.checked_add(b),
            Self::Sub => a.checked_sub(b),
        }
        .ok_or(GenerateError::Overflow { level })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MulDiv {
    Mul,
    Div,
}

impl MulDiv {
    fn pick(source: &mut impl RandomSource) -> Self {
        if source.coin() { Self::Mul } else { Self::Div }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Mul => "\\times",
            Self::Div => "\\div",
        }
    }
}

/// Builds batches of practice problems for a level.
///
/// Every answer is reduced exactly once, at the end of the computation, so the
/// intermediate values of mixed problems are never simplified early.
pub struct ProblemGenerator<S = RngSource<ThreadRng>> {
    source: S,
}

impl ProblemGenerator {
    /// Generator backed by the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(RngSource::thread())
    }
}

impl Default for ProblemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RandomSource> ProblemGenerator<S> {
    #[must_use]
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Generates a batch of `BATCH_SIZE` problems.
    ///
    /// A failing strategy is logged and yields an empty batch; callers treat that
    /// as "could not load".
    pub fn generate(&mut self, level: LevelId) -> Vec<Problem> {
        match self.try_generate(level) {
            Ok(problems) => {
                debug!(level = level.value(), count = problems.len(), "generated problem batch");
                problems
            }
            Err(err) => {
                error!(level = level.value(), %err, "failed to generate problems");
                Vec::new()
            }
        }
    }

    /// Like `generate`, for a raw level id. Unknown ids yield an empty batch.
    pub fn generate_for_id(&mut self, id: u8) -> Vec<Problem> {
        match LevelId::new(id) {
            Ok(level) => self.generate(level),
            Err(err) => {
                error!(id, %err, "unknown level requested");
                Vec::new()
            }
        }
    }

    /// # Errors
    ///
    /// Returns `GenerateError` if any problem in the batch cannot be built.
    pub fn try_generate(&mut self, level: LevelId) -> Result<Vec<Problem>, GenerateError> {
        (0..BATCH_SIZE).map(|_| self.problem(level)).collect()
    }

    fn problem(&mut self, level: LevelId) -> Result<Problem, GenerateError> {
        match level.kind() {
            LevelKind::Simplification => self.simplification(level),
            LevelKind::SameDenominator => self.same_denominator(level),
            LevelKind::DifferentDenominator => self.different_denominator(level),
            LevelKind::Multiplication => self.multiplication(level),
            LevelKind::Division => self.division(level),
            LevelKind::Mixed => self.mixed(level),
        }
    }

    fn simplification(&mut self, level: LevelId) -> Result<Problem, GenerateError> {
        let d = self.source.int_in(2, 10);
        let mut n = self.source.int_in(-10, 10);
        if n == 0 {
            n = 1;
        }
        let m = self.source.int_in(2, 5);

        let shown = Fraction::new(mul(level, n, m)?, mul(level, d, m)?)?;
        let expression = format!("\\text{{化簡：}} \\quad {}", shown.format_term(true));
        Ok(Problem::new(expression, reduce(n, d)))
    }

    fn same_denominator(&mut self, level: LevelId) -> Result<Problem, GenerateError> {
        let d = self.source.int_in(3, 15);
        let n1 = self.source.int_in(-12, 12);
        let n2 = self.source.int_in(-12, 12);
        let op = AddSub::pick(&mut self.source);

        let expression = binary(
            Fraction::new(n1, d)?,
            op.symbol(),
            Fraction::new(n2, d)?,
        );
        Ok(Problem::new(expression, reduce(op.apply(level, n1, n2)?, d)))
    }

    fn different_denominator(&mut self, level: LevelId) -> Result<Problem, GenerateError> {
        let d1 = self.source.int_in(2, 9);
        let mut d2 = self.source.int_in(2, 9);
        while d2 == d1 {
            d2 = self.source.int_in(2, 9);
        }
        let n1 = self.source.int_in(-10, 10);
        let n2 = self.source.int_in(-10, 10);
        let op = AddSub::pick(&mut self.source);

        let expression = binary(
            Fraction::new(n1, d1)?,
            op.symbol(),
            Fraction::new(n2, d2)?,
        );
        let numerator = op.apply(level, mul(level, n1, d2)?, mul(level, n2, d1)?)?;
        Ok(Problem::new(expression, reduce(numerator, mul(level, d1, d2)?)))
    }

    fn multiplication(&mut self, level: LevelId) -> Result<Problem, GenerateError> {
        let (n1, d1) = self.operand(-9, 9, 10);
        let (n2, d2) = self.operand(-9, 9, 10);

        let expression = binary(
            Fraction::new(n1, d1)?,
            MulDiv::Mul.symbol(),
            Fraction::new(n2, d2)?,
        );
        Ok(Problem::new(
            expression,
            reduce(mul(level, n1, n2)?, mul(level, d1, d2)?),
        ))
    }

    fn division(&mut self, level: LevelId) -> Result<Problem, GenerateError> {
        let (n1, d1) = self.operand(-9, 9, 10);
        let n2 = self.non_zero(-9, 9);
        let d2 = self.source.int_in(2, 10);

        let expression = binary(
            Fraction::new(n1, d1)?,
            MulDiv::Div.symbol(),
            Fraction::new(n2, d2)?,
        );
        Ok(Problem::new(
            expression,
            reduce(mul(level, n1, d2)?, mul(level, d1, n2)?),
        ))
    }

    fn mixed(&mut self, level: LevelId) -> Result<Problem, GenerateError> {
        let (n1, d1) = self.operand(-5, 5, 6);
        let (n2, d2) = self.operand(-5, 5, 6);
        // Non-zero even when the outer operator ends up being multiplication.
        let n3 = self.non_zero(-5, 5);
        let d3 = self.source.int_in(2, 6);
        let inner = AddSub::pick(&mut self.source);
        let outer = MulDiv::pick(&mut self.source);

        let expression = format!(
            "({} {} {}) {} {}",
            Fraction::new(n1, d1)?.format_term(true),
            inner.symbol(),
            Fraction::new(n2, d2)?.format_term(false),
            outer.symbol(),
            Fraction::new(n3, d3)?.format_term(false),
        );

        // Inner result stays at the common denominator d1·d2, unreduced.
        let inner_n = inner.apply(level, mul(level, n1, d2)?, mul(level, n2, d1)?)?;
        let inner_d = mul(level, d1, d2)?;
        let answer = match outer {
            MulDiv::Mul => reduce(mul(level, inner_n, n3)?, mul(level, inner_d, d3)?),
            MulDiv::Div => reduce(mul(level, inner_n, d3)?, mul(level, inner_d, n3)?),
        };
        Ok(Problem::new(expression, answer))
    }

    /// Draws a numerator in `[min_n, max_n]` and a denominator in `[2, max_d]`.
    fn operand(&mut self, min_n: i64, max_n: i64, max_d: i64) -> (i64, i64) {
        let n = self.source.int_in(min_n, max_n);
        let d = self.source.int_in(2, max_d);
        (n, d)
    }

    fn non_zero(&mut self, min: i64, max: i64) -> i64 {
        loop {
            let value = self.source.int_in(min, max);
            if value != 0 {
                return value;
            }
        }
    }
}

fn binary(left: Fraction, op: &str, right: Fraction) -> String {
    format!("{} {op} {}", left.format_term(true), right.format_term(false))
}

fn mul(level: LevelId, a: i64, b: i64) -> Result<i64, GenerateError> {
    a.checked_mul(b).ok_or(GenerateError::Overflow { level })
}
