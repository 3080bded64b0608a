//! Assertion accumulator and suite runner.
//!
//! The accumulator is an explicit object rather than process-wide state so
//! the validator itself can be exercised from tests: each run owns its own
//! counters and record list.

use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, SecondsFormat, Utc};

/// Glyph printed for a passing assertion.
pub const PASS_GLYPH: &str = "✓";
/// Glyph printed for a failing assertion.
pub const FAIL_GLYPH: &str = "✗";

/// One named pass/fail check with its recorded expected/actual values.
#[derive(Debug, Clone)]
pub struct AssertionRecord {
    pub suite: String,
    pub name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub timestamp: DateTime<Utc>,
}

impl AssertionRecord {
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Accumulates assertion records and pass/fail counters for one run.
#[derive(Debug, Default)]
pub struct Accumulator {
    active_suite: String,
    records: Vec<AssertionRecord>,
    passed: u64,
    failed: u64,
    quiet: bool,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress per-assertion progress lines on stdout.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Record one check.
    ///
    /// Never fails the run: a failing condition is recorded and evaluation
    /// continues. Emits a progress line (glyph + description, and on failure
    /// the expected/actual values) to stdout unless quiet.
    pub fn check(
        &mut self,
        condition: bool,
        description: &str,
        expected: impl Display,
        actual: impl Display,
    ) -> &AssertionRecord {
        let record = AssertionRecord {
            suite: self.active_suite.clone(),
            name: description.to_string(),
            passed: condition,
            expected: expected.to_string(),
            actual: actual.to_string(),
            timestamp: Utc::now(),
        };
        if condition {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        if !self.quiet {
            let glyph = if condition { PASS_GLYPH } else { FAIL_GLYPH };
            println!("  {glyph} {description}");
            if !condition {
                println!("      expected: {}", record.expected);
                println!("      actual:   {}", record.actual);
            }
        }
        self.records.push(record);
        self.records.last().expect("record just pushed")
    }

    /// Run one named suite.
    ///
    /// Sets the active suite (suites do not nest; the context is simply
    /// overwritten), prints a suite header, and invokes the body. A panic
    /// inside the body is captured and converted into a synthetic failing
    /// assertion for this suite so the remaining suites still run.
    pub fn run_suite<F>(&mut self, name: &str, body: F)
    where
        F: FnOnce(&mut Self),
    {
        self.active_suite = name.to_string();
        if !self.quiet {
            println!("\n=== {name} ===");
        }

        // Silence the default panic hook while the body runs; a captured
        // panic is reported through the record, not stderr noise.
        let hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut *self)));
        panic::set_hook(hook);

        if let Err(payload) = outcome {
            let message = panic_message(payload.as_ref());
            self.active_suite = name.to_string();
            self.check(
                false,
                "Suite completed without internal errors",
                "no internal error",
                message,
            );
        }
    }

    pub fn total(&self) -> u64 {
        self.passed + self.failed
    }

    pub fn passed(&self) -> u64 {
        self.passed
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn records(&self) -> &[AssertionRecord] {
        &self.records
    }

    /// Failing records, in evaluation order.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionRecord> {
        self.records.iter().filter(|record| !record.passed)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Accumulator;

    #[test]
    fn counters_track_pass_and_fail() {
        let mut acc = Accumulator::new().quiet(true);
        acc.run_suite("Counting", |acc| {
            acc.check(true, "one", "x", "x");
            acc.check(false, "two", "x", "y");
            acc.check(true, "three", "x", "x");
        });
        assert_eq!(acc.total(), 3);
        assert_eq!(acc.passed(), 2);
        assert_eq!(acc.failed(), 1);
        let failing: Vec<_> = acc.failures().map(|r| r.name.as_str()).collect();
        assert_eq!(failing, ["two"]);
    }

    #[test]
    fn records_carry_suite_and_values() {
        let mut acc = Accumulator::new().quiet(true);
        acc.run_suite("Owning Suite", |acc| {
            acc.check(false, "named check", 4, 5);
        });
        let record = &acc.records()[0];
        assert_eq!(record.suite, "Owning Suite");
        assert_eq!(record.name, "named check");
        assert_eq!(record.expected, "4");
        assert_eq!(record.actual, "5");
        assert!(!record.passed);
    }

    #[test]
    fn panicking_suite_is_isolated() {
        let mut acc = Accumulator::new().quiet(true);
        acc.run_suite("Fragile", |acc| {
            acc.check(true, "before the panic", "x", "x");
            panic!("extractor returned nothing");
        });
        acc.run_suite("Later", |acc| {
            acc.check(true, "still runs", "x", "x");
        });

        assert_eq!(acc.total(), 3);
        assert_eq!(acc.failed(), 1);
        let synthetic = acc.failures().next().expect("synthetic failure");
        assert_eq!(synthetic.suite, "Fragile");
        assert!(synthetic.actual.contains("extractor returned nothing"));
        assert_eq!(acc.records().last().expect("record").suite, "Later");
    }

    #[test]
    fn counts_are_deterministic_across_runs() {
        let run = || {
            let mut acc = Accumulator::new().quiet(true);
            acc.run_suite("Suite", |acc| {
                acc.check(true, "a", "x", "x");
                acc.check(false, "b", "x", "y");
            });
            (acc.total(), acc.passed(), acc.failed())
        };
        assert_eq!(run(), run());
    }
}
