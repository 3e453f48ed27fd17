//! Named-scenario selector (C7): picks a handful of solutions out of the
//! merged orientation pool, each under a fixed category name, deduping by
//! `DPSolution::id` (not structural equality -- two solutions can be
//! identical in every field yet come from different DP paths).

use std::collections::BTreeSet;

use crate::config::{MAX_SCENARIOS, MIN_SCENARIOS_TARGET};
use crate::discretization::TOLERANCE_M;
use crate::types::{ChosenSolution, OrientedSolution};

fn column_count(os: &OrientedSolution) -> usize {
    os.solution.columns.len()
}

fn total_braces(os: &OrientedSolution) -> u32 {
    os.solution.columns.iter().map(|c| c.brace_count).sum()
}

/// (area, coverage) of the largest single brace type present anywhere in
/// the solution. Coverage is the total area that brace type covers across
/// every column and placement it appears in.
fn biggest_brace_metrics(os: &OrientedSolution) -> (f64, f64) {
    let mut per_key: std::collections::BTreeMap<String, (f64, f64)> = std::collections::BTreeMap::new();
    for col in &os.solution.columns {
        for entry in col.entries() {
            let slot = per_key.entry(entry.key).or_insert((entry.area, 0.0));
            slot.1 += entry.area * f64::from(entry.count);
        }
    }
    per_key
        .into_values()
        .fold((0.0, 0.0), |best, (area, coverage)| {
            if area > best.0 || ((area - best.0).abs() <= TOLERANCE_M && coverage > best.1) {
                (area, coverage)
            } else {
                best
            }
        })
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn normalize(v: f64, lo: f64, hi: f64) -> f64 {
    if (hi - lo).abs() <= TOLERANCE_M {
        0.0
    } else {
        (v - lo) / (hi - lo)
    }
}

struct Selection {
    chosen: Vec<ChosenSolution>,
    seen: BTreeSet<u64>,
}

impl Selection {
    fn new() -> Self {
        Selection {
            chosen: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    fn take(&mut self, name: &str, candidate: Option<&OrientedSolution>) {
        if self.chosen.len() >= MAX_SCENARIOS {
            return;
        }
        if let Some(os) = candidate {
            if self.seen.insert(os.solution.id) {
                self.chosen.push(ChosenSolution {
                    oriented: os.clone(),
                    name: name.to_string(),
                });
            }
        }
    }

    fn unchosen<'a>(&self, pool: &'a [OrientedSolution]) -> Vec<&'a OrientedSolution> {
        pool.iter().filter(|os| !self.seen.contains(&os.solution.id)).collect()
    }
}

/// Select and name scenarios out of the merged orientation pool. Every
/// `DPSolution::id` is used at most once across the returned list.
pub fn select(pool: &[OrientedSolution]) -> Vec<ChosenSolution> {
    let mut sel = Selection::new();
    if pool.is_empty() {
        return sel.chosen;
    }

    sel.take(
        "Best Width Fit",
        pool.iter().min_by(|a, b| {
            (a.solution.setback_excess, a.solution.total_gap)
                .partial_cmp(&(b.solution.setback_excess, b.solution.total_gap))
                .unwrap()
        }),
    );

    sel.take(
        "Least Brace Kinds",
        pool.iter().min_by(|a, b| {
            (a.solution.distinct_brace_types, ordered(a.solution.total_gap))
                .cmp(&(b.solution.distinct_brace_types, ordered(b.solution.total_gap)))
        }),
    );

    {
        let mut by_gap: Vec<&OrientedSolution> = pool.iter().collect();
        by_gap.sort_by(|a, b| {
            (a.solution.total_gap, a.solution.setback_excess)
                .partial_cmp(&(b.solution.total_gap, b.solution.setback_excess))
                .unwrap()
        });
        for (i, os) in by_gap.into_iter().take(3).enumerate() {
            sel.take(&format!("Minimum Gaps {}", i + 1), Some(os));
        }
    }

    {
        let min_columns = pool.iter().map(column_count).min().unwrap_or(0);
        let mut candidates: Vec<&OrientedSolution> = pool
            .iter()
            .filter(|os| column_count(os) <= min_columns + 1)
            .collect();
        candidates.sort_by(|a, b| {
            (column_count(a), ordered(a.solution.total_gap)).cmp(&(column_count(b), ordered(b.solution.total_gap)))
        });
        for (i, os) in candidates.into_iter().take(3).enumerate() {
            sel.take(&format!("Least Rails {}", i + 1), Some(os));
        }
    }

    {
        let mut by_braces: Vec<&OrientedSolution> = pool.iter().collect();
        by_braces.sort_by_key(|os| total_braces(os));
        for (i, os) in by_braces.into_iter().take(2).enumerate() {
            sel.take(&format!("Least Braces {}", i + 1), Some(os));
        }
    }

    {
        let mut by_biggest: Vec<&OrientedSolution> = pool.iter().collect();
        by_biggest.sort_by(|a, b| {
            let (area_a, cov_a) = biggest_brace_metrics(a);
            let (area_b, cov_b) = biggest_brace_metrics(b);
            area_b
                .partial_cmp(&area_a)
                .unwrap()
                .then(cov_b.partial_cmp(&cov_a).unwrap())
                .then(a.solution.total_gap.partial_cmp(&b.solution.total_gap).unwrap())
        });
        for (i, os) in by_biggest.into_iter().take(3).enumerate() {
            sel.take(&format!("Biggest Braces {}", i + 1), Some(os));
        }
    }

    {
        let (min_sb, max_sb) = min_max(pool.iter().map(|os| os.solution.setback_excess));
        let (min_gap, max_gap) = min_max(pool.iter().map(|os| os.solution.total_gap));
        let best = pool.iter().min_by(|a, b| {
            let da = knee_distance(a, min_sb, max_sb, min_gap, max_gap);
            let db = knee_distance(b, min_sb, max_sb, min_gap, max_gap);
            da.partial_cmp(&db).unwrap()
        });
        sel.take("Balanced", best);
    }

    // Balanced 2.. : evenly sample the remaining pool sorted by gap.
    {
        let remaining = sel.unchosen(pool);
        let mut by_gap = remaining;
        by_gap.sort_by(|a, b| a.solution.total_gap.partial_cmp(&b.solution.total_gap).unwrap());
        let slots = MAX_SCENARIOS.saturating_sub(sel.chosen.len()).min(4);
        if !by_gap.is_empty() && slots > 0 {
            let stride = (by_gap.len() / (slots + 1)).max(1);
            let mut idx = stride;
            let mut n = 2;
            while idx < by_gap.len() && sel.chosen.len() < MAX_SCENARIOS {
                let candidate = by_gap[idx];
                sel.take(&format!("Balanced {}", n), Some(candidate));
                idx += stride;
                n += 1;
            }
        }
    }

    // Option k: fill up to the minimum scenario target with whatever is left.
    {
        let mut k = 1;
        loop {
            if sel.chosen.len() >= MIN_SCENARIOS_TARGET || sel.chosen.len() >= MAX_SCENARIOS {
                break;
            }
            let remaining = sel.unchosen(pool);
            let next = remaining.into_iter().min_by(|a, b| {
                (a.solution.setback_excess, a.solution.total_gap)
                    .partial_cmp(&(b.solution.setback_excess, b.solution.total_gap))
                    .unwrap()
            });
            if next.is_none() {
                break;
            }
            sel.take(&format!("Option {}", k), next);
            k += 1;
        }
    }

    sel.chosen
}

fn knee_distance(os: &OrientedSolution, min_sb: f64, max_sb: f64, min_gap: f64, max_gap: f64) -> f64 {
    let ns = normalize(os.solution.setback_excess, min_sb, max_sb);
    let ng = normalize(os.solution.total_gap, min_gap, max_gap);
    (ns * ns + ng * ng).sqrt()
}

/// Total ordering helper for f64 values known to be finite, so they can be
/// used inside tuple `.cmp()` comparisons alongside integer keys.
fn ordered(v: f64) -> i64 {
    (v * 1_000_000.0).round() as i64
}
