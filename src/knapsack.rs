//! Bounded mixed-fill knapsack (C3): pack a handful of fill lengths into a
//! target capacity, maximizing total fill and tie-breaking on the fewest
//! braces. Bounded counts are handled by binary splitting into 0/1 batches,
//! the same trick `column_planner`'s bisection step uses to keep the DP
//! transition itself a plain array scan.

use std::collections::BTreeMap;

/// One candidate fill length available to the knapsack, in centimeters.
#[derive(Debug, Clone, Copy)]
pub struct FillOption {
    pub fill_length_cm: i64,
    /// External cap on how many of this option may be used. `None` means
    /// unbounded, still implicitly capped by `target / fill_length_cm`.
    pub max_count: Option<u32>,
}

/// How many of one option the winning combination uses.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    /// Index into the `fill_options` slice passed to [`solve`].
    pub option_index: usize,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct KnapsackResult {
    /// Placements sorted by fill length descending. Empty if nothing fits.
    pub placements: Vec<Placement>,
    pub gap_cm: i64,
}

struct Item {
    option_index: usize,
    fill_length_cm: i64,
    batch: u32,
}

/// Split a bounded count into binary batches (1, 2, 4, ..., remainder) so
/// each batch can be treated as a single 0/1 item while still allowing any
/// count from 0 to `cap` to be reached by picking a subset of batches.
fn split_batches(cap: i64) -> Vec<u32> {
    let mut batches = Vec::new();
    let mut remaining = cap;
    let mut step = 1i64;
    while remaining > 0 {
        let b = step.min(remaining);
        batches.push(b as u32);
        remaining -= b;
        step *= 2;
    }
    batches
}

/// Solve the bounded mixed-fill knapsack: find the combination of
/// `fill_options` maximizing total fill without exceeding `target_cm`,
/// tie-broken by minimum total brace count. A non-positive target or an
/// empty option list yields an empty placement list.
pub fn solve(fill_options: &[FillOption], target_cm: i64) -> KnapsackResult {
    if fill_options.is_empty() || target_cm <= 0 {
        return KnapsackResult {
            placements: Vec::new(),
            gap_cm: target_cm,
        };
    }

    let mut order: Vec<usize> = (0..fill_options.len()).collect();
    order.sort_by(|&a, &b| {
        fill_options[b]
            .fill_length_cm
            .cmp(&fill_options[a].fill_length_cm)
    });

    let mut items: Vec<Item> = Vec::new();
    for &option_index in &order {
        let opt = fill_options[option_index];
        if opt.fill_length_cm <= 0 {
            continue;
        }
        let natural_cap = target_cm / opt.fill_length_cm;
        let cap = match opt.max_count {
            Some(m) => (m as i64).min(natural_cap),
            None => natural_cap,
        };
        for batch in split_batches(cap) {
            items.push(Item {
                option_index,
                fill_length_cm: opt.fill_length_cm,
                batch,
            });
        }
    }

    let target = target_cm as usize;
    // history[k] is the DP state after processing items[..k]; kept in full
    // so the backward pass can tell, for each capacity, which item's batch
    // actually changed it, rather than guessing from the final array alone.
    let mut history: Vec<Vec<(i64, u32)>> = Vec::with_capacity(items.len() + 1);
    history.push(vec![(0i64, 0u32); target + 1]);

    for item in &items {
        let prev = history.last().unwrap();
        let mut cur = prev.clone();
        let weight = (item.fill_length_cm * i64::from(item.batch)) as usize;
        if weight > 0 && weight <= target {
            for c in (weight..=target).rev() {
                let (prev_fill, prev_count) = prev[c - weight];
                let candidate_fill = prev_fill + weight as i64;
                let candidate_count = prev_count + item.batch;
                let (cur_fill, cur_count) = cur[c];
                let better = candidate_fill > cur_fill
                    || (candidate_fill == cur_fill && candidate_count < cur_count);
                if better {
                    cur[c] = (candidate_fill, candidate_count);
                }
            }
        }
        history.push(cur);
    }

    let best_fill = history.last().unwrap()[target].0;

    let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
    let mut c = target;
    for k in (0..items.len()).rev() {
        let after = history[k + 1][c];
        let before = history[k][c];
        if after != before {
            let item = &items[k];
            *counts.entry(item.option_index).or_insert(0) += item.batch;
            c -= (item.fill_length_cm * i64::from(item.batch)) as usize;
        }
    }

    let mut placements: Vec<Placement> = counts
        .into_iter()
        .map(|(option_index, count)| Placement {
            option_index,
            count,
        })
        .collect();
    placements.sort_by(|a, b| {
        fill_options[b.option_index]
            .fill_length_cm
            .cmp(&fill_options[a.option_index].fill_length_cm)
    });

    KnapsackResult {
        placements,
        gap_cm: target_cm - best_fill,
    }
}
