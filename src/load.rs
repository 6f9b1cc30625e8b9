mod delay;
mod parity;
mod parse;
pub(crate) mod error;

use std::io::Write;
use log::{debug, info};

pub use delay::{Sleeper, ThreadSleeper};
pub use error::{LoadError, USAGE};
pub use parity::Parity;
pub use parse::lenient_f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub delay_seconds: f64,
    pub derived: i32,
    pub parity: Parity,
}

/// Sleeps for the seconds given in the single argument, then reports the
/// parity of `42 * seconds`. `args` must not include the program name.
pub fn run<I, S, W, T>(args: I, out: &mut W, sleeper: &T) -> Result<Report, LoadError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    W: Write,
    T: Sleeper + ?Sized,
{
    let args: Vec<S> = args.into_iter().collect();
    if args.len() != 1 {
        writeln!(out, "{}", USAGE)?;
        out.flush()?;
        return Err(LoadError::Usage { count: args.len() });
    }

    let raw = args[0].as_ref();
    let delay_seconds = lenient_f64(raw);
    debug!("parsed {:?} as {}", raw, delay_seconds);

    let duration = delay::from_seconds(delay_seconds);
    debug!("sleeping for {:?}", duration);
    sleeper.sleep(duration);
    writeln!(out, "Slept {} seconds.", fixed6(delay_seconds))?;

    let derived = parity::derive(delay_seconds);
    let parity = parity::classify(derived);
    writeln!(out, "{} is {}.", derived, parity)?;
    out.flush()?;

    info!("slept {:?}, {} is {}", duration, derived, parity);
    Ok(Report { delay_seconds, derived, parity })
}

/// Six fractional digits the way printf's `%f` spells them.
pub fn fixed6(value: f64) -> String {
    if value.is_nan() {
        return String::from(if value.is_sign_negative() { "-nan" } else { "nan" });
    }
    if value.is_infinite() {
        return String::from(if value < 0.0 { "-inf" } else { "inf" });
    }
    format!("{:.6}", value)
}
