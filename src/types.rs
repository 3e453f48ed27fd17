//! The data model shared across every component: inventory, constraints,
//! column types, DP solutions and the final scenario records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A rectangular tent footprint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tent {
    pub length: f64,
    pub width: f64,
}

/// One brace type available in inventory: a rectangular panel of fixed
/// natural dimensions and a bounded quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brace {
    pub length: f64,
    pub width: f64,
    pub quantity: u32,
}

/// One rail type available in inventory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rail {
    pub length: f64,
    pub quantity: u32,
}

/// The full physical inventory available to build a layout from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub braces: Vec<Brace>,
    pub rails: Vec<Rail>,
}

/// Layout constraints, all in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub min_setback: f64,
    pub max_setback: f64,
    pub max_column_gap: f64,
}

/// Constraint overrides as they arrive over the wire; unset fields fall
/// back to [`Constraints::default`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConstraints {
    pub min_setback: Option<f64>,
    pub max_setback: Option<f64>,
    pub max_column_gap: Option<f64>,
}

/// One brace placed within a mixed-fill column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracePlacement {
    pub brace_length: f64,
    pub brace_width: f64,
    pub rotated: bool,
    pub fill_length: f64,
    pub count: u32,
}

/// A column type: either pure (one brace type repeated down the rail axis)
/// or mixed (several brace types combined, see `placements`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnType {
    /// Natural dimensions of the dominant brace (largest fill length).
    pub brace_length: f64,
    pub brace_width: f64,
    /// Whether the dominant brace is rotated 90 degrees from its natural
    /// orientation.
    pub rotated: bool,
    /// Span this column occupies on the span axis.
    pub column_width: f64,
    /// Fill length of the dominant brace along the rail axis.
    pub fill_length: f64,
    /// Total number of braces used in this column.
    pub brace_count: u32,
    /// Leftover length along the rail axis, in meters.
    pub gap: f64,
    /// Whether this column mixes more than one brace type.
    pub mixed: bool,
    /// Non-empty only for mixed columns: one entry per brace type used.
    pub placements: Vec<BracePlacement>,
}

/// One (key, area, count) triple describing a physical brace type's
/// contribution to a column, independent of pure/mixed representation.
pub struct BraceUsageEntry {
    pub key: String,
    pub area: f64,
    pub count: u32,
}

/// Identify a physical brace type by its natural dimensions, rounded to
/// the nearest millimeter so floating-point noise never splits one brace
/// type into two inventory keys.
pub fn brace_key(length: f64, width: f64) -> String {
    let mm = |v: f64| (v * 1000.0).round() as i64;
    format!("{}x{}", mm(length), mm(width))
}

impl ColumnType {
    /// Per-brace-type (key, area, count) entries this column consumes.
    pub fn entries(&self) -> Vec<BraceUsageEntry> {
        if self.mixed {
            self.placements
                .iter()
                .map(|p| BraceUsageEntry {
                    key: brace_key(p.brace_length, p.brace_width),
                    area: p.brace_length * p.brace_width,
                    count: p.count,
                })
                .collect()
        } else {
            vec![BraceUsageEntry {
                key: brace_key(self.brace_length, self.brace_width),
                area: self.brace_length * self.brace_width,
                count: self.brace_count,
            }]
        }
    }

    /// (key, count) pairs, collapsing placements from the same brace type.
    pub fn usage(&self) -> Vec<(String, u32)> {
        self.entries().into_iter().map(|e| (e.key, e.count)).collect()
    }
}

/// Number of distinct physical brace types used across a set of columns.
pub fn distinct_brace_types(columns: &[ColumnType]) -> usize {
    let mut keys = std::collections::BTreeSet::new();
    for col in columns {
        for entry in col.entries() {
            keys.insert(entry.key);
        }
    }
    keys.len()
}

/// One terminal state of the column DP (C4): a run of columns spanning
/// some width at or below the target, plus the bookkeeping needed to
/// filter, sweep and rank it.
#[derive(Debug, Clone)]
pub struct DPSolution {
    /// Identity used for dedup across the merged orientation pool. Unique
    /// within a single `calculate()` call, not meaningful across calls.
    pub id: u64,
    /// `targetWidthCm - reachedWidthCm`, converted to meters: the slack
    /// the span-axis setback absorbs beyond the minimum.
    pub setback_excess: f64,
    /// Sum of each column's `gap`, in meters (linear, not area -- area is
    /// computed later during scenario assembly).
    pub total_gap: f64,
    pub columns: Vec<ColumnType>,
    /// Running brace usage by [`brace_key`], checked against inventory
    /// quantity during the DP.
    pub brace_usage: BTreeMap<String, u32>,
    pub distinct_brace_types: usize,
    /// Set by the open-end sweep (C5); `None` before it runs.
    pub optimized_usable_length: Option<f64>,
    pub open_end_setback_start: Option<f64>,
    pub open_end_setback_end: Option<f64>,
}

/// Which tent dimension plays the rail axis for a given DP run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Rails run along the tent's length; columns span its width.
    Lengthwise,
    /// Rails run along the tent's width; columns span its length.
    Widthwise,
}

/// A [`DPSolution`] tagged with which orientation produced it and the
/// physical tent dimensions that orientation used.
#[derive(Debug, Clone)]
pub struct OrientedSolution {
    pub solution: DPSolution,
    pub orientation: Orientation,
    /// Tent dimension along the rail axis, in meters.
    pub rail_axis_length: f64,
    /// Tent dimension along the span axis, in meters.
    pub span_axis_length: f64,
}

/// An [`OrientedSolution`] selected by the named-scenario selector (C7),
/// paired with the name it earned.
#[derive(Debug, Clone)]
pub struct ChosenSolution {
    pub oriented: OrientedSolution,
    pub name: String,
}

/// One column placed at an absolute position within a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedColumn {
    #[serde(flatten)]
    pub column_type: ColumnType,
    /// Distance from the rail-axis origin to this column's near edge, in
    /// meters.
    pub position: f64,
}

/// One physical rail segment within a track, positioned along the span
/// axis from the track's start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailSegment {
    pub length: f64,
    pub position: f64,
}

/// A fully assembled, named floor-plan layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    /// Setback applied at both rail ends, in meters.
    pub rail_end_setback: f64,
    pub open_end_setback_start: f64,
    pub open_end_setback_end: f64,
    /// Total gap area across all columns, in square meters.
    pub total_gap: f64,
    pub columns: Vec<PlacedColumn>,
    /// One rail track per column boundary (`columns.len() + 1` tracks).
    pub rails: Vec<Vec<RailSegment>>,
    /// Sum of column widths, in meters.
    pub usable_width: f64,
    /// Optimized rail-axis usable length, in meters.
    pub usable_length: f64,
    pub tent_length: f64,
    pub tent_width: f64,
    pub distinct_brace_types: usize,
}

/// Top-level request accepted by [`crate::calculate`] and the CLI binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CalculationRequest {
    pub tent: Tent,
    #[serde(default)]
    pub inventory: Option<Inventory>,
    #[serde(default)]
    pub constraints: Option<PartialConstraints>,
}

/// Top-level response returned by [`crate::calculate`] and the CLI binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub scenarios: Vec<Scenario>,
    pub tent: Tent,
}
