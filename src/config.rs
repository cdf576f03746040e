//! Pool sizing.

use std::{
    env::{self, VarError},
    num::NonZeroUsize,
};

use crate::error::{Error, Result};

/// Environment variable overriding the number of worker threads.
pub const WORKER_THREADS_VAR: &str = "MATMUL_WORKER_THREADS";

/// Worker count used when nothing else is configured.
pub const DEFAULT_THREADS: NonZeroUsize = NonZeroUsize::new(4).unwrap();

/// Settings for the parallel multiplication path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of worker threads spawned per multiplication call.
    pub threads: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
        }
    }
}

impl Config {
    /// Creates a configuration with an explicit worker count.
    ///
    /// Fails with [`Error::NoThreads`] when `threads` is zero.
    pub fn with_threads(threads: usize) -> Result<Self> {
        NonZeroUsize::new(threads)
            .map(|threads| Self { threads })
            .ok_or(Error::NoThreads)
    }

    /// Reads the worker count from `MATMUL_WORKER_THREADS`.
    ///
    /// Falls back to [`DEFAULT_THREADS`] when the variable is unset. A set
    /// but non-UTF-8 value is rejected like any other invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_var(env::var(WORKER_THREADS_VAR))
    }

    fn from_var(var: std::result::Result<String, VarError>) -> Result<Self> {
        match var {
            Ok(value) => Self::parse_threads(&value),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(_)) => Err(Error::BadConfiguration),
        }
    }

    fn parse_threads(value: &str) -> Result<Self> {
        value
            .trim()
            .parse::<NonZeroUsize>()
            .map(|threads| Self { threads })
            .map_err(|_| Error::BadConfiguration)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;

    #[test]
    fn test_default_is_four_threads() {
        assert_eq!(Config::default().threads.get(), 4);
    }

    #[test]
    fn test_parse_threads() {
        assert_eq!(Config::parse_threads("8").unwrap().threads.get(), 8);
        assert_eq!(Config::parse_threads(" 2\n").unwrap().threads.get(), 2);

        assert!(matches!(
            Config::parse_threads("0"),
            Err(Error::BadConfiguration)
        ));
        assert!(matches!(
            Config::parse_threads("-3"),
            Err(Error::BadConfiguration)
        ));
        assert!(matches!(
            Config::parse_threads("four"),
            Err(Error::BadConfiguration)
        ));
    }

    #[test]
    fn test_from_var() {
        assert_eq!(
            Config::from_var(Err(VarError::NotPresent)).unwrap(),
            Config::default()
        );
        assert_eq!(
            Config::from_var(Ok("6".to_owned())).unwrap().threads.get(),
            6
        );
        assert!(matches!(
            Config::from_var(Err(VarError::NotUnicode(OsString::from("8")))),
            Err(Error::BadConfiguration)
        ));
    }

    #[test]
    fn test_with_threads_rejects_zero() {
        assert!(matches!(Config::with_threads(0), Err(Error::NoThreads)));
        assert_eq!(Config::with_threads(3).unwrap().threads.get(), 3);
    }
}
