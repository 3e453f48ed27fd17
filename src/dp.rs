//! Pareto-pruned column DP (C4): walks the span axis from zero up to the
//! target width, at each reachable width keeping a capped Pareto frontier
//! of solutions over (totalGap, distinctBraceTypes, columnCount).

use std::collections::BTreeMap;

use crate::config::PARETO_SET_CAP;
use crate::discretization::{to_cm, to_m, TOLERANCE_M};
use crate::types::{distinct_brace_types, ColumnType, Constraints, DPSolution};

/// Quantity available per brace type, keyed by [`crate::types::brace_key`].
pub type QuantityLimits = BTreeMap<String, u32>;

/// `s` dominates `c` if it is at least as good on every axis.
fn dominates(s: &DPSolution, c: &DPSolution) -> bool {
    s.total_gap <= c.total_gap + TOLERANCE_M
        && s.distinct_brace_types <= c.distinct_brace_types
        && s.columns.len() <= c.columns.len()
}

fn pareto_insert(set: &mut Vec<DPSolution>, candidate: DPSolution) {
    if set.iter().any(|s| dominates(s, &candidate)) {
        return;
    }
    set.retain(|s| !dominates(&candidate, s));
    set.push(candidate);
    if set.len() > PARETO_SET_CAP {
        set.sort_by(|a, b| a.total_gap.partial_cmp(&b.total_gap).unwrap());
        log::warn!(
            "pareto set exceeded cap ({} > {}); truncating to the smallest-gap entries",
            set.len(),
            PARETO_SET_CAP
        );
        set.truncate(PARETO_SET_CAP);
    }
}

fn usage_within_limits(
    base: &BTreeMap<String, u32>,
    addition: &[(String, u32)],
    limits: &QuantityLimits,
) -> Option<BTreeMap<String, u32>> {
    let mut next = base.clone();
    for (key, count) in addition {
        let entry = next.entry(key.clone()).or_insert(0);
        *entry += count;
        let limit = limits.get(key).copied().unwrap_or(0);
        if *entry > limit {
            return None;
        }
    }
    Some(next)
}

/// Run the column DP over the span axis. `target_width_m` is the usable
/// span (tent dimension on that axis minus twice the minimum setback);
/// `rail_thickness_m` is the fixed rail thickness crossing that axis.
/// Returns every terminal solution within `2*(maxSetback - minSetback)` of
/// the target, i.e. every width the downstream setback filter could still
/// accept.
pub fn search(
    column_types: &[ColumnType],
    target_width_m: f64,
    rail_thickness_m: f64,
    quantity_limits: &QuantityLimits,
    constraints: &Constraints,
) -> Vec<DPSolution> {
    let target_cm = to_cm(target_width_m);
    let rail_cm = to_cm(rail_thickness_m);
    let max_setback_increase_cm = to_cm(2.0 * (constraints.max_setback - constraints.min_setback));

    let mut next_id: u64 = 1;
    let mut states: BTreeMap<i64, Vec<DPSolution>> = BTreeMap::new();
    states.insert(
        rail_cm,
        vec![DPSolution {
            id: 0,
            setback_excess: 0.0,
            total_gap: 0.0,
            columns: Vec::new(),
            brace_usage: BTreeMap::new(),
            distinct_brace_types: 0,
            optimized_usable_length: None,
            open_end_setback_start: None,
            open_end_setback_end: None,
        }],
    );

    let mut w = rail_cm;
    while w <= target_cm {
        if let Some(current) = states.get(&w).cloned() {
            for ct in column_types {
                let ct_width_cm = to_cm(ct.column_width);
                let new_w = w + ct_width_cm + rail_cm;
                if new_w > target_cm {
                    continue;
                }
                let addition = ct.usage();
                for base in &current {
                    let usage = match usage_within_limits(&base.brace_usage, &addition, quantity_limits) {
                        Some(u) => u,
                        None => continue,
                    };
                    let mut columns = base.columns.clone();
                    columns.push(ct.clone());
                    let distinct = distinct_brace_types(&columns);
                    let candidate = DPSolution {
                        id: next_id,
                        setback_excess: 0.0,
                        total_gap: base.total_gap + ct.gap,
                        columns,
                        brace_usage: usage,
                        distinct_brace_types: distinct,
                        optimized_usable_length: None,
                        open_end_setback_start: None,
                        open_end_setback_end: None,
                    };
                    next_id += 1;
                    pareto_insert(states.entry(new_w).or_default(), candidate);
                }
            }
        }
        w += 1;
    }

    let lower_bound = target_cm - max_setback_increase_cm;
    let mut out = Vec::new();
    for (&w2, sols) in states.range(lower_bound..=target_cm) {
        for s in sols {
            if s.columns.is_empty() {
                continue;
            }
            let mut s = s.clone();
            s.setback_excess = to_m(target_cm - w2);
            out.push(s);
        }
    }
    log::debug!(
        "column dp: {} terminal solutions in width range [{}, {}] cm",
        out.len(),
        lower_bound,
        target_cm
    );
    out
}
