// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.

//! Command-line interface of the simulation launcher.

pub mod args;

pub use args::{
    Cli, Commands, ExtractArgs, RunArgs, command, extract_command, parse, run_command,
    try_parse_from,
};
