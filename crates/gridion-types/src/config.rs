// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Extraction sampling frequency used when `--frequency` is omitted (hourly).
pub const DEFAULT_FREQUENCY: &str = "H";

// ============= Run Configuration =============

/// Everything the engine orchestrator needs to launch one simulation.
///
/// Built once per invocation from the command line and never mutated
/// afterwards. Date fields are passed through as the user typed them; the
/// orchestrator validates them against [`crate::timeframe`] before launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Length of each simulated interval, in hours.
    pub interval_hours: Option<u32>,
    /// Directory holding the grid, demand, hydro, solar and wind input files.
    pub input_dir: Option<PathBuf>,
    pub threads: Threads,
    /// Run the extraction pipeline after the engine finishes.
    pub extract_data: bool,
    /// Where extracted data lands; `None` means a folder under `input_dir`.
    /// Only consulted when `extract_data` is set.
    pub output_dir: Option<PathBuf>,
    /// Keep the engine's raw result files after extraction instead of
    /// deleting them. Only consulted when `extract_data` is set.
    pub keep_matlab: bool,
    /// Solver identifier; `None` defers to the engine's default solver.
    pub solver: Option<String>,
    /// Julia environment the engine runtime runs within.
    pub julia_env: Option<PathBuf>,
    /// Trailing positional kept for scenario-manager callers.
    pub scenario_id: Option<String>,
}

// ============= Extraction Configuration =============

/// Parameters for a standalone extraction pass over a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Where extracted data lands; `None` means a folder under the run's
    /// input directory.
    pub output_dir: Option<PathBuf>,
    /// Frequency code of the original profile data points. The extraction
    /// pipeline owns the frequency grammar, so any string is carried through.
    pub frequency: String,
    pub keep_matlab: bool,
    pub scenario_id: Option<String>,
}

// ============= Thread Count =============

/// Number of threads handed to the engine: an explicit positive count, or
/// `auto` to let the engine pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threads {
    Auto,
    Count(NonZeroU32),
}

const AUTO_THREADS: &str = "auto";

/// Raised when a thread-count value is neither `auto` nor a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a positive integer or 'auto', got '{0}'")]
pub struct InvalidThreadCount(String);

impl FromStr for Threads {
    type Err = InvalidThreadCount;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.eq_ignore_ascii_case(AUTO_THREADS) {
            return Ok(Threads::Auto);
        }

        raw.parse::<NonZeroU32>()
            .map(Threads::Count)
            .map_err(|_| InvalidThreadCount(raw.to_string()))
    }
}

impl fmt::Display for Threads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threads::Auto => f.write_str(AUTO_THREADS),
            Threads::Count(count) => write!(f, "{count}"),
        }
    }
}

// Serialized as the engine orchestrator expects it: the string "auto" or a
// plain number.
impl Serialize for Threads {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Threads::Auto => serializer.serialize_str(AUTO_THREADS),
            Threads::Count(count) => serializer.serialize_u32(count.get()),
        }
    }
}

impl<'de> Deserialize<'de> for Threads {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(count) => NonZeroU32::new(count)
                .map(Threads::Count)
                .ok_or_else(|| serde::de::Error::custom("thread count must be positive")),
            Raw::Label(label) => label.parse().map_err(serde::de::Error::custom),
        }
    }
}
