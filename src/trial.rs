//! Timed sequential-vs-threaded trials and the log they are written to.

use std::{
    io::{self, Write},
    ops::RangeInclusive,
    time::{Duration, Instant},
};

use rand::Rng;
use thiserror::Error;

use crate::{Config, Element, Matrix, multiply_sequential, multiply_with};

/// Sequential times below this are recorded as this value.
pub const MIN_RECORDED_TIME: Duration = Duration::from_millis(1);

/// Runs `f` and measures how long it took.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Parameters shared by every trial of a run.
#[derive(Clone, Debug)]
pub struct TrialSettings {
    /// Pool configuration for the threaded path.
    pub config: Config,
    /// Dimensions are `2 * d` with `d` uniform in `1..=max_half_dimension`.
    pub max_half_dimension: usize,
    /// Range entries of the random operands are drawn from.
    pub values: RangeInclusive<Element>,
    /// Compare both results and fail the trial if they differ.
    pub verify: bool,
}

impl Default for TrialSettings {
    fn default() -> Self {
        Self {
            config: Config::default(),
            max_half_dimension: 100,
            values: 1..=100,
            verify: false,
        }
    }
}

/// Outcome of a single trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialRecord {
    /// Side length of the square operands.
    pub dimension: usize,
    /// Wall-clock time of the sequential baseline, at least [`MIN_RECORDED_TIME`].
    pub sequential: Duration,
    /// Wall-clock time of the threaded path.
    pub threaded: Duration,
}

impl TrialRecord {
    /// How many times faster the threaded path was.
    pub fn speedup(&self) -> f64 {
        self.sequential.as_secs_f64() / self.threaded.as_secs_f64().max(f64::MIN_POSITIVE)
    }
}

/// Anything that can end a trial early.
#[derive(Debug, Error)]
pub enum TrialError {
    #[error(transparent)]
    Multiply(#[from] crate::Error),

    /// Raised with [`TrialSettings::verify`] when the two paths disagree.
    #[error("threaded result differs from sequential result for a {dimension}x{dimension} product")]
    Mismatch { dimension: usize },
}

/// Generates two random square matrices and times both multiplication paths.
pub fn run_trial<R: Rng + ?Sized>(
    settings: &TrialSettings,
    rng: &mut R,
) -> Result<TrialRecord, TrialError> {
    let dimension = rng.gen_range(1..=settings.max_half_dimension.max(1)) * 2;
    let a = Matrix::random(dimension, dimension, settings.values.clone(), rng);
    let b = Matrix::random(dimension, dimension, settings.values.clone(), rng);

    let (sequential, sequential_time) = timed(|| multiply_sequential(&a, &b));
    let sequential = sequential?;

    let (threaded, threaded_time) = timed(|| multiply_with(&a, &b, &settings.config));
    let threaded = threaded?;

    if settings.verify && sequential != threaded {
        return Err(TrialError::Mismatch { dimension });
    }

    log::debug!(
        "{dimension}x{dimension}: sequential {:?}, threaded {:?}",
        sequential_time,
        threaded_time
    );

    Ok(TrialRecord {
        dimension,
        sequential: sequential_time.max(MIN_RECORDED_TIME),
        threaded: threaded_time,
    })
}

/// Appends one human-readable record per trial to a text sink.
#[derive(Debug)]
pub struct TrialLog<W> {
    sink: W,
    written: usize,
}

impl<W: Write> TrialLog<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Writes `record` as the next numbered test.
    pub fn append(&mut self, record: &TrialRecord) -> io::Result<()> {
        self.written += 1;
        writeln!(self.sink, "Test #{}:", self.written)?;
        writeln!(self.sink, "Dimension: {0}x{0}", record.dimension)?;
        writeln!(self.sink, "Non-threaded time: {} ms", millis(record.sequential))?;
        writeln!(self.sink, "Threaded time: {} ms", millis(record.threaded))?;
        writeln!(self.sink)
    }

    /// Number of records written so far.
    pub fn len(&self) -> usize {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Flushes and returns the underlying sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

fn millis(d: Duration) -> String {
    significant(d.as_nanos() as f64 / 1e6)
}

/// Formats `value` with six significant digits and no trailing zeros,
/// switching to an exponent outside `1e-4..1e6` (printf's `%g`).
fn significant(value: f64) -> String {
    const DIGITS: i32 = 6;

    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }

    // Rounding first settles the exponent, e.g. 999999.5 becomes 1e6.
    let rounded = format!("{:.*e}", (DIGITS - 1) as usize, value);
    let (mantissa, exponent) = rounded.split_once('e').unwrap_or((rounded.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..DIGITS).contains(&exponent) {
        let decimals = (DIGITS - 1 - exponent) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_owned()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs())
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Mean timings over a set of trials.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub trials: usize,
    pub mean_sequential: Duration,
    pub mean_threaded: Duration,
}

impl Summary {
    pub fn from_records(records: &[TrialRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let sequential: Duration = records.iter().map(|r| r.sequential).sum();
        let threaded: Duration = records.iter().map(|r| r.threaded).sum();

        Self {
            trials: records.len(),
            mean_sequential: mean(sequential, records.len()),
            mean_threaded: mean(threaded, records.len()),
        }
    }
}

fn mean(total: Duration, count: usize) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;

    let nanos = total.as_nanos() / count as u128;
    Duration::new(
        (nanos / NANOS_PER_SEC) as u64,
        (nanos % NANOS_PER_SEC) as u32,
    )
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_log_format() {
        let mut log = TrialLog::new(Vec::new());
        let record = TrialRecord {
            dimension: 6,
            sequential: Duration::from_millis(3),
            threaded: Duration::from_micros(1500),
        };

        log.append(&record).unwrap();
        log.append(&record).unwrap();
        assert_eq!(log.len(), 2);

        let text = String::from_utf8(log.finish().unwrap()).unwrap();
        assert_eq!(
            text,
            "Test #1:\nDimension: 6x6\nNon-threaded time: 3 ms\nThreaded time: 1.5 ms\n\n\
             Test #2:\nDimension: 6x6\nNon-threaded time: 3 ms\nThreaded time: 1.5 ms\n\n"
        );
    }

    #[test]
    fn test_log_times_use_six_significant_digits() {
        let mut log = TrialLog::new(Vec::new());
        log.append(&TrialRecord {
            dimension: 100,
            sequential: Duration::from_nanos(1_234_567),
            threaded: Duration::from_nanos(987_654_321),
        })
        .unwrap();

        let text = String::from_utf8(log.finish().unwrap()).unwrap();
        assert!(text.contains("Non-threaded time: 1.23457 ms\n"), "{}", text);
        assert!(text.contains("Threaded time: 987.654 ms\n"), "{}", text);
    }

    #[test]
    fn test_significant() {
        assert_eq!(significant(0.0), "0");
        assert_eq!(significant(3.0), "3");
        assert_eq!(significant(1.5), "1.5");
        assert_eq!(significant(42.0001), "42.0001");
        assert_eq!(significant(0.000012), "1.2e-05");
        assert_eq!(significant(1_234_000.0), "1.234e+06");
        assert_eq!(significant(999_999.7), "1e+06");
    }

    #[test]
    fn test_run_trial_dimension_is_even_and_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let settings = TrialSettings {
            max_half_dimension: 8,
            verify: true,
            ..TrialSettings::default()
        };

        for _ in 0..10 {
            let record = run_trial(&settings, &mut rng).unwrap();
            assert_eq!(record.dimension % 2, 0);
            assert!((2..=16).contains(&record.dimension));
            assert!(record.sequential >= MIN_RECORDED_TIME);
        }
    }

    #[test]
    fn test_summary_means() {
        let records = [
            TrialRecord {
                dimension: 2,
                sequential: Duration::from_millis(4),
                threaded: Duration::from_millis(2),
            },
            TrialRecord {
                dimension: 4,
                sequential: Duration::from_millis(6),
                threaded: Duration::from_millis(4),
            },
        ];

        let summary = Summary::from_records(&records);
        assert_eq!(summary.trials, 2);
        assert_eq!(summary.mean_sequential, Duration::from_millis(5));
        assert_eq!(summary.mean_threaded, Duration::from_millis(3));
        assert_eq!(Summary::from_records(&[]), Summary::default());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_mean_of_more_than_u32_max_trials() {
        let count = u32::MAX as usize + 1;
        assert_eq!(mean(Duration::from_secs(8), count), Duration::from_nanos(1));
        assert_eq!(mean(Duration::from_millis(7), 2), Duration::from_micros(3500));
    }

    #[test]
    fn test_speedup() {
        let record = TrialRecord {
            dimension: 2,
            sequential: Duration::from_millis(8),
            threaded: Duration::from_millis(2),
        };
        assert!((record.speedup() - 4.0).abs() < 1e-9);
    }
}
