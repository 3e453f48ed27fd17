//! Floor-plan layout engine for rectangular event tents: given a tent
//! footprint, a brace/rail inventory and layout constraints, computes a
//! set of named, buildable column-and-rail scenarios.
//!
//! The public entry point is [`calculate`]. Everything else is organized
//! around the pipeline it drives: column enumeration (`column_enum`),
//! bounded mixed-fill packing (`knapsack`), the span-axis Pareto DP
//! (`dp`), the rail-axis open-end sweep (`sweep`), the two-orientation
//! driver (`orientation`), named-scenario selection (`selector`) and
//! final scenario assembly (`assembly`).

mod assembly;
mod column_enum;
pub mod config;
mod discretization;
mod dp;
mod error;
mod knapsack;
mod orientation;
mod selector;
mod sweep;

pub mod cli;
pub mod types;

pub use error::{Error, Result};

use types::{Brace, CalculationRequest, CalculationResponse, Constraints, Inventory, Rail, Tent};

/// Inventory used when a request omits one: a handful of common brace and
/// rail sizes, generous enough to exercise every component of the engine.
pub fn default_inventory() -> Inventory {
    Inventory {
        braces: vec![
            Brace {
                length: 2.45,
                width: 1.22,
                quantity: 1000,
            },
            Brace {
                length: 2.0,
                width: 1.0,
                quantity: 500,
            },
            Brace {
                length: 1.22,
                width: 1.22,
                quantity: 500,
            },
        ],
        rails: vec![
            Rail {
                length: 6.0,
                quantity: 200,
            },
            Rail {
                length: 4.0,
                quantity: 200,
            },
            Rail {
                length: 2.0,
                quantity: 200,
            },
        ],
    }
}

fn resolve_constraints(partial: Option<types::PartialConstraints>) -> Result<Constraints> {
    let defaults = Constraints::default();
    let c = match partial {
        None => defaults,
        Some(p) => Constraints {
            min_setback: p.min_setback.unwrap_or(defaults.min_setback),
            max_setback: p.max_setback.unwrap_or(defaults.max_setback),
            max_column_gap: p.max_column_gap.unwrap_or(defaults.max_column_gap),
        },
    };
    if c.min_setback < 0.0 || c.max_setback < 0.0 || c.max_column_gap < 0.0 {
        return Err(Error::InvalidConstraints);
    }
    if c.min_setback > c.max_setback + discretization::TOLERANCE_M {
        return Err(Error::InvalidConstraints);
    }
    Ok(c)
}

fn validate_tent(tent: &Tent, constraints: &Constraints) -> Result<()> {
    if tent.length <= 0.0 || tent.width <= 0.0 {
        return Err(Error::InvalidTent);
    }
    let min_span = 2.0 * constraints.min_setback;
    if tent.length < min_span - discretization::TOLERANCE_M || tent.width < min_span - discretization::TOLERANCE_M {
        return Err(Error::InvalidTent);
    }
    Ok(())
}

fn validate_inventory_area(inventory: &Inventory) -> Result<()> {
    if inventory.braces.is_empty() {
        return Err(Error::InsufficientInventoryArea);
    }
    let total_area: f64 = inventory
        .braces
        .iter()
        .map(|b| b.length * b.width * f64::from(b.quantity))
        .sum();
    let min_brace_area = inventory
        .braces
        .iter()
        .map(|b| b.length * b.width)
        .fold(f64::INFINITY, f64::min);
    if total_area + discretization::TOLERANCE_M < min_brace_area {
        return Err(Error::InsufficientInventoryArea);
    }
    Ok(())
}

/// Compute every named layout scenario for a tent, inventory and set of
/// constraints. Unset constraints and a missing inventory fall back to
/// [`Constraints::default`] and [`default_inventory`] respectively.
pub fn calculate(request: CalculationRequest) -> Result<CalculationResponse> {
    let tent = request.tent;
    let constraints = resolve_constraints(request.constraints)?;
    validate_tent(&tent, &constraints)?;
    let inventory = request.inventory.unwrap_or_else(default_inventory);
    validate_inventory_area(&inventory)?;

    let oriented = orientation::run(&tent, &inventory, &constraints)?;
    let chosen = selector::select(&oriented);
    let scenarios = chosen
        .into_iter()
        .map(|c| assembly::assemble(c, &inventory, &constraints))
        .collect();

    Ok(CalculationResponse { scenarios, tent })
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::PartialConstraints;

    fn small_inventory() -> Inventory {
        Inventory {
            braces: vec![Brace {
                length: 2.45,
                width: 1.22,
                quantity: 200,
            }],
            rails: vec![Rail {
                length: 6.0,
                quantity: 50,
            }],
        }
    }

    // Scenario A: a standard-sized tent with a roomy default inventory
    // yields at least one scenario.
    #[test]
    fn scenario_a_standard_tent() {
        let request = CalculationRequest {
            tent: Tent {
                length: 20.0,
                width: 10.0,
            },
            inventory: None,
            constraints: None,
        };
        let response = calculate(request).expect("standard tent should be feasible");
        assert!(!response.scenarios.is_empty());
    }

    // Scenario B: a square tent only runs one orientation, so it must
    // still produce scenarios without a widthwise pass.
    #[test]
    fn scenario_b_square_tent_runs_a_single_orientation() {
        let request = CalculationRequest {
            tent: Tent {
                length: 10.0,
                width: 10.0,
            },
            inventory: Some(small_inventory()),
            constraints: None,
        };
        let response = calculate(request).expect("square tent should be feasible");
        assert!(!response.scenarios.is_empty());
    }

    // Scenario C: exact fit. A 10 x 2.89 tent with a 2.45x1.22 brace
    // inventory and default constraints should be able to lay out exactly
    // two columns of columnWidth 1.22 m across the width.
    #[test]
    fn scenario_c_exact_fit() {
        let request = CalculationRequest {
            tent: Tent {
                length: 10.0,
                width: 2.89,
            },
            inventory: Some(Inventory {
                braces: vec![Brace {
                    length: 2.45,
                    width: 1.22,
                    quantity: 100,
                }],
                rails: vec![Rail {
                    length: 5.0,
                    quantity: 10,
                }],
            }),
            constraints: None,
        };
        let response = calculate(request).expect("exact-fit tent should be feasible");
        let two_column = response
            .scenarios
            .iter()
            .find(|s| s.columns.len() == 2 && s.columns.iter().all(|pc| (pc.column_type.column_width - 1.22).abs() < 0.01))
            .expect("a two-column 1.22 m layout should exist");
        assert!((two_column.rail_end_setback - config::TEST_MIN_SETBACK).abs() < 0.01);
    }

    // Scenario D: a tent too small to fit even one minimum setback on both
    // sides is rejected before any DP work runs.
    #[test]
    fn scenario_d_tent_too_small_is_invalid() {
        let request = CalculationRequest {
            tent: Tent {
                length: 0.1,
                width: 0.1,
            },
            inventory: None,
            constraints: None,
        };
        assert!(matches!(calculate(request), Err(Error::InvalidTent)));
    }

    // Scenario E: a too-narrow brace inventory (2x1 only) still produces at
    // least one feasible scenario, and every column in every scenario uses
    // that single brace type.
    #[test]
    fn scenario_e_narrow_inventory_still_feasible() {
        let request = CalculationRequest {
            tent: Tent {
                length: 10.0,
                width: 8.0,
            },
            inventory: Some(Inventory {
                braces: vec![Brace {
                    length: 2.0,
                    width: 1.0,
                    quantity: 100,
                }],
                rails: vec![Rail {
                    length: 5.0,
                    quantity: 10,
                }],
            }),
            constraints: None,
        };
        let response = calculate(request).expect("narrow-inventory tent should be feasible");
        assert!(!response.scenarios.is_empty());
        let narrow_key = crate::types::brace_key(2.0, 1.0);
        assert!(response.scenarios.iter().all(|s| s
            .columns
            .iter()
            .all(|pc| pc.column_type.entries().iter().all(|e| e.key == narrow_key))));
    }

    // An empty inventory can't build even one column and is rejected up
    // front, before any DP work runs.
    #[test]
    fn empty_inventory_is_rejected_as_insufficient_area() {
        let request = CalculationRequest {
            tent: Tent {
                length: 10.0,
                width: 10.0,
            },
            inventory: Some(Inventory {
                braces: Vec::new(),
                rails: Vec::new(),
            }),
            constraints: None,
        };
        assert!(matches!(
            calculate(request),
            Err(Error::InsufficientInventoryArea)
        ));
    }

    #[test]
    fn min_setback_exceeding_max_setback_is_rejected() {
        let request = CalculationRequest {
            tent: Tent {
                length: 10.0,
                width: 10.0,
            },
            inventory: None,
            constraints: Some(PartialConstraints {
                min_setback: Some(0.5),
                max_setback: Some(0.1),
                max_column_gap: None,
            }),
        };
        assert!(matches!(calculate(request), Err(Error::InvalidConstraints)));
    }

    #[test]
    fn missing_inventory_falls_back_to_default() {
        let request = CalculationRequest {
            tent: Tent {
                length: 12.0,
                width: 6.0,
            },
            inventory: None,
            constraints: None,
        };
        let response = calculate(request).expect("default inventory should be feasible");
        assert!(!response.scenarios.is_empty());
    }
}
