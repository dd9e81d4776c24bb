use std::fmt;

/// Width of the fixed-digit window in both fix modes.
pub const MAX_LEN: usize = 5;

/// A partial digit string (0 to 5 digits) honored verbatim in generated
/// numbers. Always digits-only; construction strips everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedPattern(String);

impl FixedPattern {
    /// Keep only ASCII digits and truncate to the window width.
    pub fn sanitize(input: &str) -> Self {
        FixedPattern(
            input
                .chars()
                .filter(|c| c.is_ascii_digit())
                .take(MAX_LEN)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Window slots filled left to right; `None` slots are random.
    pub fn left_aligned(&self) -> [Option<u8>; MAX_LEN] {
        let mut slots = [None; MAX_LEN];
        for (slot, b) in slots.iter_mut().zip(self.0.bytes()) {
            *slot = Some(b - b'0');
        }
        slots
    }

    /// Window slots filled so the pattern ends the window.
    pub fn right_aligned(&self) -> [Option<u8>; MAX_LEN] {
        let mut slots = [None; MAX_LEN];
        let offset = MAX_LEN - self.0.len();
        for (slot, b) in slots[offset..].iter_mut().zip(self.0.bytes()) {
            *slot = Some(b - b'0');
        }
        slots
    }

    /// Hint shown next to the pattern input.
    pub fn remaining_hint(&self) -> String {
        let remaining = MAX_LEN - self.len();
        match remaining {
            0 => String::new(),
            1 => " (1 digit will be random)".to_string(),
            n => format!(" ({} digits will be random)", n),
        }
    }
}

impl fmt::Display for FixedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
