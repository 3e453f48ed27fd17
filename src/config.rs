//! Engine-wide constants and default constraints.

use crate::types::Constraints;

/// Thickness of a rail crossing the span axis, in meters. Fixed: rails are
/// not a user-configurable brace type.
pub const RAIL_THICKNESS: f64 = 0.05;

/// Default minimum setback, in meters.
pub const DEFAULT_MIN_SETBACK: f64 = 0.08;
/// Default maximum setback, in meters.
pub const DEFAULT_MAX_SETBACK: f64 = 0.25;
/// Default maximum per-column gap, in meters.
pub const DEFAULT_MAX_COLUMN_GAP: f64 = 0.39;

/// A minimum-setback value used only by literal scenario fixtures, never
/// the library default (see DESIGN.md, "Minimum-setback constant").
#[cfg(test)]
pub const TEST_MIN_SETBACK: f64 = 0.15;

/// Cap on the number of solutions kept per Pareto-set width bucket in the
/// column DP (C4).
pub const PARETO_SET_CAP: usize = 50;

/// Maximum number of named scenarios returned by the selector (C7).
pub const MAX_SCENARIOS: usize = 20;
/// Minimum number of scenarios the selector tries to reach via "Option k"
/// fill before giving up.
pub const MIN_SCENARIOS_TARGET: usize = 6;

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            min_setback: DEFAULT_MIN_SETBACK,
            max_setback: DEFAULT_MAX_SETBACK,
            max_column_gap: DEFAULT_MAX_COLUMN_GAP,
        }
    }
}
