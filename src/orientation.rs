//! Orientation driver (C6): runs the full column-enumeration / DP / sweep
//! pipeline once per tent axis acting as the rail axis, then merges both
//! pools. Lengthwise and widthwise runs are independent of each other and
//! embarrassingly parallel, though nothing here requires running them
//! concurrently.

use crate::column_enum;
use crate::config::RAIL_THICKNESS;
use crate::discretization::{to_cm, TOLERANCE_M};
use crate::dp::{self, QuantityLimits};
use crate::error::{Error, Result};
use crate::sweep;
use crate::types::{brace_key, Constraints, DPSolution, Inventory, Orientation, OrientedSolution, Tent};

fn build_quantity_limits(inventory: &Inventory) -> QuantityLimits {
    let mut limits = QuantityLimits::new();
    for b in &inventory.braces {
        *limits.entry(brace_key(b.length, b.width)).or_insert(0) += b.quantity;
    }
    limits
}

fn run_orientation(
    orientation: Orientation,
    rail_axis_len: f64,
    span_axis_len: f64,
    inventory: &Inventory,
    quantity_limits: &QuantityLimits,
    constraints: &Constraints,
) -> Result<Vec<OrientedSolution>> {
    log::debug!(
        "orientation {:?}: rail axis {:.3} m, span axis {:.3} m",
        orientation,
        rail_axis_len,
        span_axis_len
    );
    let usable_length = rail_axis_len - 2.0 * constraints.min_setback;
    if usable_length <= 0.0 {
        return Err(Error::NoFeasibleColumn);
    }
    let column_types = column_enum::enumerate(&inventory.braces, usable_length);
    if column_types.is_empty() {
        return Err(Error::NoFeasibleColumn);
    }

    let target_width = span_axis_len - 2.0 * constraints.min_setback;
    let raw = dp::search(&column_types, target_width, RAIL_THICKNESS, quantity_limits, constraints);
    if raw.is_empty() {
        return Err(Error::NoFeasibleLayout(format!(
            "no terminal column-dp state reached within the target span width ({:.3} m)",
            target_width
        )));
    }

    let swept: Vec<DPSolution> = raw
        .iter()
        .map(|s| sweep::sweep(s, rail_axis_len, constraints, quantity_limits))
        .collect();
    let filtered = filter_solutions(swept, constraints);
    if filtered.is_empty() {
        return Err(Error::NoFeasibleLayout(
            "every candidate was discarded by the setback/gap filters".to_string(),
        ));
    }

    Ok(filtered
        .into_iter()
        .map(|solution| OrientedSolution {
            solution,
            orientation,
            rail_axis_length: rail_axis_len,
            span_axis_length: span_axis_len,
        })
        .collect())
}

fn in_range(v: f64, lo: f64, hi: f64) -> bool {
    v >= lo - TOLERANCE_M && v <= hi + TOLERANCE_M
}

fn setback_within_bounds(s: &DPSolution, c: &Constraints) -> bool {
    let setback = c.min_setback + s.setback_excess / 2.0;
    if !in_range(setback, c.min_setback, c.max_setback) {
        return false;
    }
    s.open_end_setback_start
        .map(|v| in_range(v, c.min_setback, c.max_setback))
        .unwrap_or(true)
        && s.open_end_setback_end
            .map(|v| in_range(v, c.min_setback, c.max_setback))
            .unwrap_or(true)
}

fn gap_within_bounds(s: &DPSolution, c: &Constraints) -> bool {
    s.columns.iter().all(|col| col.gap <= c.max_column_gap + TOLERANCE_M)
}

/// Apply the setback filter, then the gap filter; if the gap filter would
/// remove every remaining candidate, waive it rather than return nothing.
fn filter_solutions(solutions: Vec<DPSolution>, constraints: &Constraints) -> Vec<DPSolution> {
    let setback_ok: Vec<DPSolution> = solutions
        .into_iter()
        .filter(|s| setback_within_bounds(s, constraints))
        .collect();

    let gap_ok: Vec<DPSolution> = setback_ok
        .iter()
        .filter(|s| gap_within_bounds(s, constraints))
        .cloned()
        .collect();

    if gap_ok.is_empty() && !setback_ok.is_empty() {
        log::warn!(
            "gap filter would remove all {} setback-valid candidates; waiving it",
            setback_ok.len()
        );
        setback_ok
    } else {
        gap_ok
    }
}

/// Run both orientations and merge their surviving solutions. The
/// widthwise run is skipped when the tent is square (length and width
/// within 1 cm), since it would reproduce the lengthwise pool.
pub fn run(tent: &Tent, inventory: &Inventory, constraints: &Constraints) -> Result<Vec<OrientedSolution>> {
    let quantity_limits = build_quantity_limits(inventory);

    let mut solutions = Vec::new();
    let mut diagnostics = Vec::new();

    match run_orientation(
        Orientation::Lengthwise,
        tent.length,
        tent.width,
        inventory,
        &quantity_limits,
        constraints,
    ) {
        Ok(mut sols) => solutions.append(&mut sols),
        Err(e) => diagnostics.push(format!("lengthwise: {}", e)),
    }

    if (to_cm(tent.length) - to_cm(tent.width)).abs() > 1 {
        match run_orientation(
            Orientation::Widthwise,
            tent.width,
            tent.length,
            inventory,
            &quantity_limits,
            constraints,
        ) {
            Ok(mut sols) => solutions.append(&mut sols),
            Err(e) => diagnostics.push(format!("widthwise: {}", e)),
        }
    }

    if solutions.is_empty() {
        return Err(Error::NoFeasibleLayout(diagnostics.join("; ")));
    }
    Ok(solutions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Brace, ColumnType, Rail};

    fn col(gap: f64) -> ColumnType {
        ColumnType {
            brace_length: 2.45,
            brace_width: 1.22,
            rotated: false,
            column_width: 1.22,
            fill_length: 2.45,
            brace_count: 4,
            gap,
            mixed: false,
            placements: Vec::new(),
        }
    }

    fn solution(setback_excess: f64, columns: Vec<ColumnType>) -> DPSolution {
        DPSolution {
            id: 0,
            setback_excess,
            total_gap: columns.iter().map(|c| c.gap).sum(),
            columns,
            brace_usage: Default::default(),
            distinct_brace_types: 1,
            optimized_usable_length: None,
            open_end_setback_start: None,
            open_end_setback_end: None,
        }
    }

    #[test]
    fn setback_within_bounds_accepts_the_nominal_midpoint() {
        let c = Constraints::default();
        let s = solution(0.0, vec![col(0.0)]);
        assert!(setback_within_bounds(&s, &c));
    }

    #[test]
    fn setback_within_bounds_rejects_excess_pushing_past_max() {
        let c = Constraints {
            min_setback: 0.08,
            max_setback: 0.10,
            max_column_gap: 2.0,
        };
        // excess/2 alone would push the setback past max_setback.
        let s = solution(1.0, vec![col(0.0)]);
        assert!(!setback_within_bounds(&s, &c));
    }

    #[test]
    fn setback_within_bounds_checks_open_end_setbacks_too() {
        let c = Constraints::default();
        let mut s = solution(0.0, vec![col(0.0)]);
        s.open_end_setback_start = Some(c.max_setback + 1.0);
        assert!(!setback_within_bounds(&s, &c));
    }

    #[test]
    fn gap_within_bounds_flags_any_column_over_the_limit() {
        let c = Constraints {
            min_setback: 0.08,
            max_setback: 0.4,
            max_column_gap: 0.2,
        };
        assert!(gap_within_bounds(&solution(0.0, vec![col(0.1), col(0.2)]), &c));
        assert!(!gap_within_bounds(&solution(0.0, vec![col(0.1), col(0.3)]), &c));
    }

    #[test]
    fn filter_solutions_waives_the_gap_filter_rather_than_empty_the_pool() {
        let c = Constraints {
            min_setback: 0.08,
            max_setback: 0.4,
            max_column_gap: 0.05,
        };
        let only = solution(0.0, vec![col(0.3)]);
        let out = filter_solutions(vec![only], &c);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn filter_solutions_drops_setback_invalid_candidates_even_when_waiving_gap() {
        let c = Constraints {
            min_setback: 0.08,
            max_setback: 0.10,
            max_column_gap: 2.0,
        };
        let bad_setback = solution(1.0, vec![col(0.0)]);
        let out = filter_solutions(vec![bad_setback], &c);
        assert!(out.is_empty());
    }

    #[test]
    fn square_tent_skips_the_widthwise_run() {
        let tent = Tent { length: 10.0, width: 10.0 };
        let inventory = Inventory {
            braces: vec![Brace {
                length: 2.45,
                width: 1.22,
                quantity: 100,
            }],
            rails: vec![Rail { length: 5.0, quantity: 50 }],
        };
        let constraints = Constraints::default();
        let solutions = run(&tent, &inventory, &constraints).unwrap();
        assert!(solutions.iter().all(|s| s.orientation == Orientation::Lengthwise));
    }

    #[test]
    fn non_square_tent_runs_both_orientations() {
        let tent = Tent { length: 10.0, width: 8.0 };
        let inventory = Inventory {
            braces: vec![Brace {
                length: 2.45,
                width: 1.22,
                quantity: 100,
            }],
            rails: vec![Rail { length: 5.0, quantity: 50 }],
        };
        let constraints = Constraints::default();
        let solutions = run(&tent, &inventory, &constraints).unwrap();
        assert!(solutions.iter().any(|s| s.orientation == Orientation::Lengthwise));
        assert!(solutions.iter().any(|s| s.orientation == Orientation::Widthwise));
    }
}
