//! Pattern-constrained phone number generation.
//!
//! Every number is `prefix + body` where the body is seven digits shaped by
//! the [`Mode`]. Candidates are drawn from an injected random source and
//! de-duplicated until the requested count is reached. Requests whose digit
//! space is smaller than the count fail up front instead of spinning.

use anyhow::{bail, Result};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use super::number::{PhoneNumber, LEN};
use super::pattern::{FixedPattern, MAX_LEN};
use super::prefix::Prefix;

pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 1_000_000;
pub const DEFAULT_COUNT: u32 = 1000;

const BODY_LEN: usize = LEN - 4;

/// Candidates drawn per requested number before giving up.
const ATTEMPTS_PER_NUMBER: u64 = 64;
const ATTEMPT_SLACK: u64 = 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Random,
    FixMiddle,
    FixEnd,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Random => write!(f, "random"),
            Mode::FixMiddle => write!(f, "fix-middle"),
            Mode::FixEnd => write!(f, "fix-end"),
        }
    }
}

impl Mode {
    pub const ALL: &[Mode] = &[Mode::Random, Mode::FixMiddle, Mode::FixEnd];

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(Mode::Random),
            "fix-middle" => Ok(Mode::FixMiddle),
            "fix-end" => Ok(Mode::FixEnd),
            _ => bail!("invalid mode: {} (expected random, fix-middle or fix-end)", s),
        }
    }

    /// Human label used by the form.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Random => "Completely random (after prefix)",
            Mode::FixMiddle => "Fix middle digits",
            Mode::FixEnd => "Fix last digits",
        }
    }

    pub fn uses_pattern(self) -> bool {
        !matches!(self, Mode::Random)
    }

    pub fn cycle(self, forward: bool) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        let next = if forward {
            (idx + 1) % Self::ALL.len()
        } else {
            (idx + Self::ALL.len() - 1) % Self::ALL.len()
        };
        Self::ALL[next]
    }

    /// Per-position template for the 7-digit body.
    fn body_template(self, pattern: &FixedPattern) -> [Option<u8>; BODY_LEN] {
        let mut body = [None; BODY_LEN];
        match self {
            Mode::Random => {}
            Mode::FixMiddle => body[..MAX_LEN].copy_from_slice(&pattern.left_aligned()),
            Mode::FixEnd => body[BODY_LEN - MAX_LEN..].copy_from_slice(&pattern.right_aligned()),
        }
        body
    }
}

/// Clamp a requested count into `[MIN_COUNT, MAX_COUNT]`.
pub fn clamp_count(n: i64) -> u32 {
    n.clamp(MIN_COUNT as i64, MAX_COUNT as i64) as u32
}

/// Parse free-form count input the way a numeric field would: leading
/// digits only, anything unparsable becomes the lower bound.
pub fn parse_count(input: &str) -> u32 {
    let s = input.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || negative {
        return MIN_COUNT;
    }
    match digits.parse::<u64>() {
        Ok(n) => clamp_count(n.min(MAX_COUNT as u64) as i64),
        Err(_) => MAX_COUNT,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub prefix: Prefix,
    pub mode: Mode,
    pub pattern: FixedPattern,
    pub count: u32,
}

impl Request {
    /// Number of fixed digits the mode actually honors.
    pub fn fixed_digits(&self) -> usize {
        if self.mode.uses_pattern() {
            self.pattern.len()
        } else {
            0
        }
    }

    /// How many distinct numbers this request can produce.
    pub fn available(&self) -> u64 {
        10u64.pow((BODY_LEN - self.fixed_digits()) as u32)
    }

    fn attempt_budget(&self) -> u64 {
        self.count as u64 * ATTEMPTS_PER_NUMBER + ATTEMPT_SLACK
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("requested count {requested} exceeds available space of {available} numbers")]
    Infeasible { requested: u32, available: u64 },
    #[error("gave up after {attempts} attempts with {produced} unique numbers")]
    Exhausted { attempts: u64, produced: usize },
}

/// De-duplicated numbers from one request, in generation order.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    numbers: Vec<PhoneNumber>,
}

impl ResultSet {
    pub fn as_slice(&self) -> &[PhoneNumber] {
        &self.numbers
    }

    pub fn numbers(&self) -> impl Iterator<Item = &PhoneNumber> {
        self.numbers.iter()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Generate `req.count` unique numbers using `rng`.
pub fn generate<R: Rng>(req: &Request, rng: &mut R) -> Result<ResultSet, GenerateError> {
    let available = req.available();
    if req.count as u64 > available {
        return Err(GenerateError::Infeasible {
            requested: req.count,
            available,
        });
    }

    let target = req.count as usize;
    let template = req.mode.body_template(&req.pattern);
    let prefix = req.prefix.digits();
    let budget = req.attempt_budget();

    let mut seen: HashSet<PhoneNumber> = HashSet::with_capacity(target);
    let mut numbers = Vec::with_capacity(target);
    let mut attempts = 0u64;

    while numbers.len() < target {
        if attempts == budget {
            return Err(GenerateError::Exhausted {
                attempts,
                produced: numbers.len(),
            });
        }
        attempts += 1;

        let mut digits = [0u8; LEN];
        digits[..4].copy_from_slice(&prefix);
        for (d, slot) in digits[4..].iter_mut().zip(template) {
            *d = slot.unwrap_or_else(|| rng.random_range(0..10));
        }

        let number = PhoneNumber::from_digits(digits);
        if seen.insert(number) {
            numbers.push(number);
        }
    }

    log::debug!(
        "generated {} numbers for {} {} '{}' in {} attempts",
        numbers.len(),
        req.prefix,
        req.mode,
        req.pattern,
        attempts
    );
    Ok(ResultSet { numbers })
}
