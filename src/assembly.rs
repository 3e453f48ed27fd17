//! Scenario assembly (C8): turns a chosen, swept `DPSolution` into an
//! absolutely-positioned `Scenario` -- actual setback, column positions,
//! and a greedy longest-first rail track repeated across every boundary.

use crate::config::RAIL_THICKNESS;
use crate::discretization::round_mm;
use crate::types::{brace_key, ChosenSolution, Constraints, Orientation, PlacedColumn, Rail, RailSegment, Scenario};

fn build_rail_track(usable_length_m: f64, rails: &[Rail]) -> Vec<RailSegment> {
    let mut available: Vec<f64> = rails
        .iter()
        .flat_map(|r| std::iter::repeat(r.length).take(r.quantity as usize))
        .collect();
    available.sort_by(|a, b| b.partial_cmp(a).unwrap());

    let mut segments = Vec::new();
    let mut remaining = usable_length_m;
    let mut pos = 0.0;
    while remaining > 0.01 && !available.is_empty() {
        let idx = available
            .iter()
            .position(|&l| l <= remaining + 0.001)
            .unwrap_or(0);
        let length = available.remove(idx);
        segments.push(RailSegment {
            length: round_mm(length),
            position: round_mm(pos),
        });
        pos += length;
        remaining -= length;
    }
    segments
}

fn ordered_columns(chosen: &ChosenSolution) -> Vec<crate::types::ColumnType> {
    let mut columns = chosen.oriented.solution.columns.clone();
    columns.sort_by(|a, b| {
        let ka = (brace_key(a.brace_length, a.brace_width), a.rotated);
        let kb = (brace_key(b.brace_length, b.brace_width), b.rotated);
        ka.cmp(&kb)
    });
    columns
}

/// Assemble a final scenario from a chosen, swept solution.
pub fn assemble(chosen: ChosenSolution, inventory: &crate::types::Inventory, constraints: &Constraints) -> Scenario {
    let sol = &chosen.oriented.solution;
    let columns = ordered_columns(&chosen);
    let n_cols = columns.len();

    let total_column_width: f64 = columns.iter().map(|c| c.column_width).sum();
    let nominal_usable_width = chosen.oriented.span_axis_length - 2.0 * constraints.min_setback;
    let extra = (nominal_usable_width - total_column_width - (n_cols as f64 + 1.0) * RAIL_THICKNESS).max(0.0);
    let actual_setback = constraints.min_setback + extra / 2.0;

    let mut placed = Vec::with_capacity(n_cols);
    let mut pos = actual_setback + RAIL_THICKNESS;
    for column_type in columns.iter().cloned() {
        let width = column_type.column_width;
        placed.push(PlacedColumn {
            column_type,
            position: round_mm(pos),
        });
        pos += width + RAIL_THICKNESS;
    }

    let usable_length = sol
        .optimized_usable_length
        .unwrap_or(chosen.oriented.rail_axis_length - 2.0 * constraints.min_setback);
    let open_start = sol.open_end_setback_start.unwrap_or(constraints.min_setback);
    let open_end = sol.open_end_setback_end.unwrap_or(constraints.min_setback);

    let rail_track = build_rail_track(usable_length, &inventory.rails);
    let rails: Vec<Vec<RailSegment>> = (0..=n_cols).map(|_| rail_track.clone()).collect();

    let total_gap_area: f64 = columns.iter().map(|c| c.gap * c.column_width).sum();

    let (tent_length, tent_width) = match chosen.oriented.orientation {
        Orientation::Lengthwise => (chosen.oriented.rail_axis_length, chosen.oriented.span_axis_length),
        Orientation::Widthwise => (chosen.oriented.span_axis_length, chosen.oriented.rail_axis_length),
    };

    Scenario {
        name: chosen.name,
        rail_end_setback: round_mm(actual_setback),
        open_end_setback_start: round_mm(open_start),
        open_end_setback_end: round_mm(open_end),
        total_gap: round_mm(total_gap_area),
        columns: placed,
        rails,
        usable_width: round_mm(total_column_width),
        usable_length: round_mm(usable_length),
        tent_length: round_mm(tent_length),
        tent_width: round_mm(tent_width),
        distinct_brace_types: sol.distinct_brace_types,
    }
}
