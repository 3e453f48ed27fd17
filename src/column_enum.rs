//! Column-type enumerator (C2): builds every pure column a brace inventory
//! supports at a given rail-axis usable length, then looks for mixed
//! columns that beat the best pure option at the same span width.

use std::collections::{BTreeMap, BTreeSet};

use crate::discretization::{to_cm, to_m, TOLERANCE_M};
use crate::knapsack::{self, FillOption};
use crate::types::{Brace, BracePlacement, ColumnType};

fn mm_key(meters: f64) -> i64 {
    (meters * 1000.0).round() as i64
}

/// Enumerate pure and mixed column types that fit within
/// `usable_length_m` of rail-axis span, for the given brace inventory.
/// Returned columns are sorted ascending by `column_width`.
pub fn enumerate(braces: &[Brace], usable_length_m: f64) -> Vec<ColumnType> {
    let mut candidates = Vec::new();
    for b in braces {
        for rotated in [false, true] {
            let (column_width, fill_length) = if rotated {
                (b.length, b.width)
            } else {
                (b.width, b.length)
            };
            let n = (usable_length_m / fill_length).floor();
            if n < 1.0 {
                continue;
            }
            let n = n as u32;
            let gap = usable_length_m - f64::from(n) * fill_length;
            candidates.push(ColumnType {
                brace_length: b.length,
                brace_width: b.width,
                rotated,
                column_width,
                fill_length,
                brace_count: n,
                gap,
                mixed: false,
                placements: Vec::new(),
            });
        }
    }

    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, c) in candidates.iter().enumerate() {
        groups.entry(mm_key(c.column_width)).or_default().push(i);
    }

    let mut removed = vec![false; candidates.len()];
    let mut mixed_additions = Vec::new();

    for idxs in groups.values() {
        let distinct_fills: BTreeSet<i64> = idxs
            .iter()
            .map(|&i| to_cm(candidates[i].fill_length))
            .collect();
        if distinct_fills.len() < 2 {
            continue;
        }

        let options: Vec<FillOption> = idxs
            .iter()
            .map(|&i| FillOption {
                fill_length_cm: to_cm(candidates[i].fill_length),
                max_count: None,
            })
            .collect();
        let target_cm = to_cm(usable_length_m);
        let result = knapsack::solve(&options, target_cm);
        if result.placements.len() < 2 {
            // Knapsack degenerated to a single fill length: not actually mixed.
            continue;
        }

        let reference = idxs
            .iter()
            .map(|&i| &candidates[i])
            .min_by(|a, b| {
                a.gap
                    .partial_cmp(&b.gap)
                    .unwrap()
                    .then(a.brace_count.cmp(&b.brace_count))
            })
            .unwrap();

        let mixed_gap = to_m(result.gap_cm);
        let mixed_brace_count: u32 = result.placements.iter().map(|p| p.count).sum();

        let strictly_better = mixed_gap + TOLERANCE_M < reference.gap;
        let tied_fewer_braces =
            (mixed_gap - reference.gap).abs() <= TOLERANCE_M && mixed_brace_count < reference.brace_count;
        if !strictly_better && !tied_fewer_braces {
            continue;
        }

        let placements: Vec<BracePlacement> = result
            .placements
            .iter()
            .map(|p| {
                let orig = &candidates[idxs[p.option_index]];
                BracePlacement {
                    brace_length: orig.brace_length,
                    brace_width: orig.brace_width,
                    rotated: orig.rotated,
                    fill_length: orig.fill_length,
                    count: p.count,
                }
            })
            .collect();
        let dominant = placements[0];
        let column_width = candidates[idxs[0]].column_width;
        mixed_additions.push(ColumnType {
            brace_length: dominant.brace_length,
            brace_width: dominant.brace_width,
            rotated: dominant.rotated,
            column_width,
            fill_length: dominant.fill_length,
            brace_count: mixed_brace_count,
            gap: mixed_gap,
            mixed: true,
            placements,
        });

        for &i in idxs {
            let c = &candidates[i];
            if c.gap + TOLERANCE_M >= mixed_gap && c.brace_count > mixed_brace_count {
                removed[i] = true;
            }
        }
    }

    let mut out: Vec<ColumnType> = candidates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !removed[*i])
        .map(|(_, c)| c)
        .collect();
    out.extend(mixed_additions);
    out.sort_by(|a, b| a.column_width.partial_cmp(&b.column_width).unwrap());
    out
}
