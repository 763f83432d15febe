//! Property-test run profile parsing for CI and local overrides.
//!
//! Every proptest suite in the workspace reads its case count and fork mode
//! through [`ProptestRunProfile`] so one pair of environment variables tunes
//! them all.

use std::{env, num::ParseIntError};

use thiserror::Error;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const PARIS_PBT_FORK_ENV_KEY: &str = "PARIS_PBT_FORK";

/// Reason an override was ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileOverrideError {
    /// The case count is not an unsigned integer.
    #[error("`{raw}` is not a case count: {source}")]
    InvalidCases {
        /// The rejected value.
        raw: String,
        /// Underlying parse failure.
        source: ParseIntError,
    },
    /// The case count is zero.
    #[error("case count must be greater than zero")]
    ZeroCases,
    /// The flag is not a recognised boolean spelling.
    #[error("`{raw}` is not one of true/false/1/0/yes/no/on/off")]
    InvalidFlag {
        /// The rejected value.
        raw: String,
    },
}

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads a profile from the process environment, falling back to the
    /// provided defaults for missing or invalid overrides.
    ///
    /// # Examples
    ///
    /// ```
    /// use paris_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::from_lookup(default_cases, default_fork, |key| env::var(key).ok())
    }

    /// Loads a profile using `lookup` to read variables.
    ///
    /// Invalid overrides are logged at `warn` and replaced by the default.
    ///
    /// # Examples
    ///
    /// ```
    /// use paris_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::from_lookup(64, false, |key| {
    ///     (key == "PROGTEST_CASES").then(|| "500".to_owned())
    /// });
    /// assert_eq!(profile.cases(), 500);
    /// assert!(!profile.fork());
    /// ```
    #[must_use]
    pub fn from_lookup(
        default_cases: u32,
        default_fork: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        Self {
            cases: override_or(&lookup, PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: override_or(&lookup, PARIS_PBT_FORK_ENV_KEY, default_fork, parse_flag),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn override_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    parse: fn(&str) -> Result<T, ProfileOverrideError>,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|error| {
        tracing::warn!(env = key, raw = %raw, %error, "ignoring invalid property-test override");
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, ProfileOverrideError> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(ProfileOverrideError::ZeroCases),
        Ok(cases) => Ok(cases),
        Err(source) => Err(ProfileOverrideError::InvalidCases {
            raw: raw.to_owned(),
            source,
        }),
    }
}

fn parse_flag(raw: &str) -> Result<bool, ProfileOverrideError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ProfileOverrideError::InvalidFlag {
            raw: raw.to_owned(),
        }),
    }
}
