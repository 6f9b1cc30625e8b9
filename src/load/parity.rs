use std::fmt;

pub const FACTOR: f64 = 42.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
        }
    }
}

/// `FACTOR * seconds` truncated toward zero. NaN maps to 0 and values
/// outside the `i32` range saturate.
pub fn derive(seconds: f64) -> i32 {
    (FACTOR * seconds) as i32
}

pub fn classify(value: i32) -> Parity {
    // `%` truncates like C, so an odd negative leaves -1 here; only 0 means even
    if value % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    }
}
