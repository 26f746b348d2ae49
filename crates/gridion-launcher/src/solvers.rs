// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.

//! Registry of the optimization backends available to the engine.

/// Solver the engine falls back to when `--solver` is left unset.
pub const DEFAULT_SOLVER: &str = "gurobi";

/// Source of truth for which optimization backends are currently installed.
///
/// Queried once, at parser construction, so help text can enumerate the
/// current solver set. The registry is injected into command construction
/// rather than read from global state, which keeps construction
/// side-effect-free and lets tests substitute a fake.
pub trait SolverRegistry {
    /// Solver identifiers usable by the engine, in preference order.
    fn available_solvers(&self) -> Vec<String>;
}

/// The engine backends this distribution is built against.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstalledSolvers;

impl SolverRegistry for InstalledSolvers {
    fn available_solvers(&self) -> Vec<String> {
        vec![DEFAULT_SOLVER.to_string(), "glpk".to_string()]
    }
}
