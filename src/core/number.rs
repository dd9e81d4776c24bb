use std::fmt;

pub const LEN: usize = 11;

/// An 11-digit phone number: 4-digit prefix followed by a 7-digit body.
///
/// Displays as `DDDD-DDD-DDDD`. Equality and hashing are on the digit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhoneNumber([u8; LEN]);

impl PhoneNumber {
    /// Build from digit values (each 0..=9).
    pub(crate) fn from_digits(digits: [u8; LEN]) -> Self {
        debug_assert!(digits.iter().all(|d| *d <= 9));
        PhoneNumber(digits)
    }

    /// Unformatted digit string.
    pub fn digits(&self) -> String {
        self.0.iter().map(|d| char::from(b'0' + d)).collect()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.digits();
        write!(f, "{}-{}-{}", &s[..4], &s[4..7], &s[7..])
    }
}
