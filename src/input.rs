use log::debug;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::limits::{Limits, MONTHS_PER_YEAR};
use crate::loan::LoanTotals;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("value {value} is outside the accepted range {min} - {max}")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("could not read a number from {input:?}")]
    Unparseable { input: String },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl InputError {
    /// Both loan-input kinds are answered with a fresh prompt.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InputError::OutOfRange { .. } | InputError::Unparseable { .. }
        )
    }
}

/// A validated answer, or the sentinel asking to stop.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Entry<T> {
    Value(T),
    Quit,
}

pub fn check_years(years: i64, limits: &Limits) -> Result<u32, InputError> {
    if limits.years_ok(years) {
        // years_ok bounds the value inside u32 range
        Ok(years as u32)
    } else {
        Err(InputError::OutOfRange {
            value: years as f64,
            min: f64::from(limits.min_years),
            max: f64::from(limits.max_years),
        })
    }
}

pub fn check_rate(rate: f64, limits: &Limits) -> Result<f64, InputError> {
    if limits.rate_ok(rate) {
        Ok(rate)
    } else {
        Err(InputError::OutOfRange {
            value: rate,
            min: limits.min_rate,
            max: limits.max_rate,
        })
    }
}

pub fn check_principal(principal: f64, limits: &Limits) -> Result<f64, InputError> {
    if limits.principal_ok(principal) {
        Ok(principal)
    } else {
        Err(InputError::OutOfRange {
            value: principal,
            min: limits.min_principal,
            max: limits.max_principal,
        })
    }
}

/// Parses a whole number of years and returns the duration in months.
pub fn parse_duration(line: &str, limits: &Limits) -> Result<Entry<u32>, InputError> {
    let trimmed = line.trim();
    let years: i64 = trimmed.parse().map_err(|_| InputError::Unparseable {
        input: trimmed.to_string(),
    })?;
    if years == 0 {
        return Ok(Entry::Quit);
    }
    let years = check_years(years, limits)?;
    Ok(Entry::Value(years * MONTHS_PER_YEAR))
}

pub fn parse_rate(line: &str, limits: &Limits) -> Result<Entry<f64>, InputError> {
    let rate = parse_amount(line)?;
    if rate == 0. {
        return Ok(Entry::Quit);
    }
    Ok(Entry::Value(check_rate(rate, limits)?))
}

pub fn parse_principal(line: &str, limits: &Limits) -> Result<Entry<f64>, InputError> {
    let principal = parse_amount(line)?;
    if principal == 0. {
        return Ok(Entry::Quit);
    }
    Ok(Entry::Value(check_principal(principal, limits)?))
}

// f64::from_str accepts "NaN" and "inf", neither of which is an amount
fn parse_amount(line: &str) -> Result<f64, InputError> {
    let trimmed = line.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::Unparseable {
            input: trimmed.to_string(),
        }),
    }
}

/// Line-oriented prompt loop over any reader/writer pair.
///
/// Each question is asked until the answer is either in range or the
/// sentinel `0`. Malformed lines are discarded whole, so nothing left over
/// from a bad answer can leak into the next read. End of input counts as
/// the sentinel.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
    limits: Limits,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W, limits: Limits) -> Self {
        Self {
            reader,
            writer,
            limits,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    pub fn duration_months(&mut self) -> Result<Entry<u32>, InputError> {
        let prompt = format!(
            "Enter duration of loan in years({} - {}) or zero to quit: ",
            self.limits.min_years, self.limits.max_years
        );
        let retry = format!(
            "Please enter a valid loan duration between {} and {} years.",
            self.limits.min_years, self.limits.max_years
        );
        self.ask(&prompt, &retry, parse_duration)
    }

    pub fn annual_rate(&mut self) -> Result<Entry<f64>, InputError> {
        let prompt = format!(
            "Enter the annual interest rate as a decimal({:.3} - {:.3}) or zero to quit: ",
            self.limits.min_rate, self.limits.max_rate
        );
        let retry = format!(
            "Please enter a valid interest rate in decimal format ({:.3} - {:.3}).",
            self.limits.min_rate, self.limits.max_rate
        );
        self.ask(&prompt, &retry, parse_rate)
    }

    /// Asks for the principal and publishes the accepted amount into `totals`.
    pub fn principal(&mut self, totals: &mut LoanTotals) -> Result<Entry<f64>, InputError> {
        let prompt = format!(
            "Enter loan principal(${:.0} - ${:.0}) or zero to quit: $",
            self.limits.min_principal, self.limits.max_principal
        );
        let retry = format!(
            "Please enter a valid loan amount between (${:.2} and ${:.2}) or zero to quit.",
            self.limits.min_principal, self.limits.max_principal
        );
        let entry = self.ask(&prompt, &retry, parse_principal)?;
        if let Entry::Value(principal) = entry {
            totals.record_principal(principal);
        }
        Ok(entry)
    }

    fn ask<T>(
        &mut self,
        prompt: &str,
        retry: &str,
        parse: fn(&str, &Limits) -> Result<Entry<T>, InputError>,
    ) -> Result<Entry<T>, InputError> {
        let mut buf = Vec::new();
        loop {
            write!(self.writer, "{}", prompt)?;
            self.writer.flush()?;

            // raw bytes, so a line that is not UTF-8 is rejected like any other bad answer
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                debug!("end of input, treating as quit");
                writeln!(self.writer)?;
                return Ok(Entry::Quit);
            }

            let line = String::from_utf8_lossy(&buf);
            match parse(&line, &self.limits) {
                Ok(Entry::Quit) => {
                    writeln!(self.writer, "Quitting Program!")?;
                    return Ok(Entry::Quit);
                }
                Ok(entry) => return Ok(entry),
                Err(err) if err.is_recoverable() => {
                    debug!("rejected input: {}", err);
                    writeln!(self.writer, "{}", retry)?;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_duration, parse_principal, parse_rate, Entry, InputError, Prompter,
    };
    use crate::limits::Limits;
    use crate::loan::LoanTotals;
    use std::io::Cursor;
    use test_log::test;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            Limits::default(),
        )
    }

    #[test]
    fn test_parse_duration() {
        let limits = Limits::default();

        assert_eq!(parse_duration("30\n", &limits).unwrap(), Entry::Value(360));
        assert_eq!(parse_duration(" 3 ", &limits).unwrap(), Entry::Value(36));
        assert_eq!(parse_duration("40", &limits).unwrap(), Entry::Value(480));
        assert_eq!(parse_duration("0", &limits).unwrap(), Entry::Quit);

        assert!(matches!(
            parse_duration("2", &limits),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_duration("41", &limits),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_duration("-5", &limits),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_duration("12.5", &limits),
            Err(InputError::Unparseable { .. })
        ));
        assert!(matches!(
            parse_duration("thirty", &limits),
            Err(InputError::Unparseable { .. })
        ));
    }

    #[test]
    fn test_parse_rate() {
        let limits = Limits::default();

        assert_eq!(parse_rate("0.05", &limits).unwrap(), Entry::Value(0.05));
        assert_eq!(parse_rate("0.010", &limits).unwrap(), Entry::Value(0.010));
        assert_eq!(parse_rate("0.25", &limits).unwrap(), Entry::Value(0.25));
        assert_eq!(parse_rate("0", &limits).unwrap(), Entry::Quit);
        assert_eq!(parse_rate("0.000", &limits).unwrap(), Entry::Quit);

        // a percentage instead of a fraction
        assert!(matches!(
            parse_rate("5", &limits),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_rate("0.009", &limits),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_rate("NaN", &limits),
            Err(InputError::Unparseable { .. })
        ));
        assert!(matches!(
            parse_rate("5%", &limits),
            Err(InputError::Unparseable { .. })
        ));
    }

    #[test]
    fn test_parse_principal_boundaries() {
        let limits = Limits::default();

        assert_eq!(
            parse_principal("5000.01", &limits).unwrap(),
            Entry::Value(5000.01)
        );
        assert_eq!(
            parse_principal("5000", &limits).unwrap(),
            Entry::Value(5000.)
        );
        assert_eq!(
            parse_principal("2000000.00", &limits).unwrap(),
            Entry::Value(2000000.)
        );
        assert_eq!(parse_principal("0", &limits).unwrap(), Entry::Quit);

        assert!(matches!(
            parse_principal("4999.99", &limits),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_principal("inf", &limits),
            Err(InputError::Unparseable { .. })
        ));
        assert!(matches!(
            parse_principal("", &limits),
            Err(InputError::Unparseable { .. })
        ));
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let mut prompter = prompter("1\nabc\n45\n25\n");

        assert_eq!(prompter.duration_months().unwrap(), Entry::Value(300));

        let output = String::from_utf8(prompter.into_writer()).unwrap();
        assert_eq!(output.matches("Enter duration of loan").count(), 4);
        assert_eq!(
            output
                .matches("Please enter a valid loan duration between 3 and 40 years.")
                .count(),
            3
        );
    }

    #[test]
    fn test_prompt_survives_many_bad_lines() {
        let mut input = "x\n".repeat(10_000);
        input.push_str("0.07\n");
        let mut prompter = prompter(&input);

        assert_eq!(prompter.annual_rate().unwrap(), Entry::Value(0.07));
    }

    #[test]
    fn test_sentinel_quits() {
        let mut prompter = prompter("0\n");

        assert_eq!(prompter.annual_rate().unwrap(), Entry::Quit);
        let output = String::from_utf8(prompter.into_writer()).unwrap();
        assert!(output.ends_with("Quitting Program!\n"));
    }

    #[test]
    fn test_end_of_input_quits() {
        let mut prompter = prompter("");
        assert_eq!(prompter.duration_months().unwrap(), Entry::Quit);
    }

    #[test]
    fn test_principal_publishes_total() {
        let mut totals = LoanTotals::default();
        let mut prompter = prompter("4999.99\n250000\n");

        assert_eq!(
            prompter.principal(&mut totals).unwrap(),
            Entry::Value(250000.)
        );
        assert_eq!(totals.total_principal, 250000.);

        let output = String::from_utf8(prompter.into_writer()).unwrap();
        assert!(output.contains(
            "Please enter a valid loan amount between ($5000.00 and $2000000.00) or zero to quit."
        ));
    }

    #[test]
    fn test_principal_sentinel_leaves_totals_untouched() {
        let mut totals = LoanTotals::default();
        let mut prompter = prompter("0\n");

        assert_eq!(prompter.principal(&mut totals).unwrap(), Entry::Quit);
        assert!(totals.is_clear());
    }
}
