use anyhow::{bail, Result};
use std::fmt;

/// Number of selectable prefixes: `0301` through `0349`.
pub const PREFIX_COUNT: u8 = 49;

/// The default prefix offered by the form.
pub const DEFAULT: Prefix = Prefix(1);

/// A 4-digit leading segment, one of `0301`..`0349`.
///
/// Stored as its ordinal (1..=49) so it can only ever hold a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix(u8);

impl Prefix {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 4 || !s.starts_with("03") || !s.bytes().all(|b| b.is_ascii_digit()) {
            bail!("invalid prefix '{}': expected one of 0301..0349", s);
        }
        let n: u8 = s[2..].parse()?;
        if n == 0 || n > PREFIX_COUNT {
            bail!("invalid prefix '{}': expected one of 0301..0349", s);
        }
        Ok(Prefix(n))
    }

    /// All selectable prefixes in order.
    pub fn all() -> impl Iterator<Item = Prefix> {
        (1..=PREFIX_COUNT).map(Prefix)
    }

    pub fn digits(self) -> [u8; 4] {
        [0, 3, self.0 / 10, self.0 % 10]
    }

    /// Step to the neighbouring option, wrapping at both ends.
    pub fn cycle(self, forward: bool) -> Self {
        let idx = self.0 - 1;
        let next = if forward {
            (idx + 1) % PREFIX_COUNT
        } else {
            (idx + PREFIX_COUNT - 1) % PREFIX_COUNT
        };
        Prefix(next + 1)
    }
}

impl Default for Prefix {
    fn default() -> Self {
        DEFAULT
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "03{:02}", self.0)
    }
}
