//! Proportional redistribution of sibling allocations
//!
//! Editing one slice of a sibling group moves the difference onto the other
//! slices in proportion to their current size, so untouched siblings keep their
//! relative weights. A final drift pass corrects accumulated floating-point
//! error so the group adds up to [`FULL_ALLOCATION`] again.

use tracing::{debug, trace, warn};

use crate::domain::{CategoryNode, FULL_ALLOCATION};

/// Changes smaller than this are ignored to avoid thrashing during drags.
pub const CHANGE_THRESHOLD: f64 = 0.001;

/// Maximum tolerated deviation of a group's total from 100.
pub const DRIFT_TOLERANCE: f64 = 0.005;

/// Result of [`adjust`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// The group was rewritten around the new value.
    Applied { normalization: Normalization },
    /// Nothing changed: negligible difference, bad index, non-finite input or
    /// a group too small to redistribute.
    Unchanged,
}

impl Adjustment {
    pub fn is_applied(&self) -> bool {
        matches!(self, Adjustment::Applied { .. })
    }
}

/// Result of [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// Total already within tolerance.
    Balanced,
    /// `drift` was spread over the adjustable siblings.
    Corrected { drift: f64 },
    /// No sibling besides the fixed one holds a positive share; the total
    /// stays off by `drift`.
    Unadjustable { drift: f64 },
}

/// Sum of all allocations in the group.
pub fn total(nodes: &[CategoryNode]) -> f64 {
    nodes.iter().map(|n| n.allocation).sum()
}

/// Set `nodes[changed]` to `new_value` (clamped to `[0, 100]`) and rebalance
/// the remaining siblings so the group still sums to 100.
pub fn adjust(nodes: &mut [CategoryNode], changed: usize, new_value: f64) -> Adjustment {
    if nodes.len() < 2 || changed >= nodes.len() || new_value.is_nan() {
        debug!(
            len = nodes.len(),
            changed, new_value, "adjust: degenerate request ignored"
        );
        return Adjustment::Unchanged;
    }

    let new_value = new_value.clamp(0.0, FULL_ALLOCATION);
    let old_value = nodes[changed].allocation;
    let diff = new_value - old_value;
    if diff.abs() < CHANGE_THRESHOLD {
        return Adjustment::Unchanged;
    }

    let sum_others = FULL_ALLOCATION - old_value;
    let others_empty = nodes
        .iter()
        .enumerate()
        .all(|(i, n)| i == changed || n.allocation <= 0.0);
    if sum_others <= 0.0 || others_empty {
        // the edited slice held everything (up to float residue), nothing to scale against
        let share = ((FULL_ALLOCATION - new_value) / (nodes.len() - 1) as f64).max(0.0);
        trace!(share, "adjust: equal split");
        for (i, node) in nodes.iter_mut().enumerate() {
            if i != changed {
                node.allocation = share;
            }
        }
    } else {
        for (i, node) in nodes.iter_mut().enumerate() {
            if i != changed {
                let current = node.allocation;
                node.allocation = (current - diff * (current / sum_others)).max(0.0);
            }
        }
    }

    nodes[changed].allocation = new_value;
    let normalization = normalize(nodes, changed);
    debug!(changed, old_value, new_value, ?normalization, "adjust");
    Adjustment::Applied { normalization }
}

/// Spread the deviation from 100 over every positive sibling except `fixed`.
pub fn normalize(nodes: &mut [CategoryNode], fixed: usize) -> Normalization {
    let drift = total(nodes) - FULL_ALLOCATION;
    if drift.abs() < DRIFT_TOLERANCE {
        return Normalization::Balanced;
    }

    let adjustable_sum: f64 = nodes
        .iter()
        .enumerate()
        .filter(|(i, n)| *i != fixed && n.allocation > 0.0)
        .map(|(_, n)| n.allocation)
        .sum();

    if adjustable_sum <= 0.0 {
        warn!(drift, "normalize: no adjustable siblings, total left off 100");
        return Normalization::Unadjustable { drift };
    }

    for (i, node) in nodes.iter_mut().enumerate() {
        if i != fixed && node.allocation > 0.0 {
            let fix = drift * (node.allocation / adjustable_sum);
            node.allocation = (node.allocation - fix).max(0.0);
        }
    }
    Normalization::Corrected { drift }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(values: &[f64]) -> Vec<CategoryNode> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| CategoryNode::new(i as i64 + 10, Some(1), format!("c{i}"), *v))
            .collect()
    }

    fn values(nodes: &[CategoryNode]) -> Vec<f64> {
        nodes.iter().map(|n| n.allocation).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn given_full_slice_when_lowering_then_splits_rest_equally() {
        let mut nodes = group(&[100.0, 0.0, 0.0]);

        let outcome = adjust(&mut nodes, 0, 40.0);

        assert!(outcome.is_applied());
        assert_eq!(nodes[0].allocation, 40.0);
        assert_close(nodes[1].allocation, 30.0);
        assert_close(nodes[2].allocation, 30.0);
    }

    #[test]
    fn given_slice_just_below_full_when_lowering_then_splits_rest_equally() {
        let mut nodes = group(&[100.0 - 1e-14, 0.0, 0.0]);

        let outcome = adjust(&mut nodes, 0, 40.0);

        assert!(matches!(
            outcome,
            Adjustment::Applied {
                normalization: Normalization::Balanced
            }
        ));
        assert_eq!(nodes[0].allocation, 40.0);
        assert_close(nodes[1].allocation, 30.0);
        assert_close(nodes[2].allocation, 30.0);
    }

    #[test]
    fn given_mixed_group_when_raising_then_others_shrink_proportionally() {
        let mut nodes = group(&[50.0, 30.0, 20.0]);

        adjust(&mut nodes, 0, 60.0);

        assert_eq!(nodes[0].allocation, 60.0);
        assert_close(nodes[1].allocation, 24.0);
        assert_close(nodes[2].allocation, 16.0);
        assert!((total(&nodes) - 100.0).abs() < DRIFT_TOLERANCE);
    }

    #[test]
    fn given_current_value_when_adjusting_then_nothing_changes() {
        let mut nodes = group(&[50.0, 30.0, 20.0]);

        let outcome = adjust(&mut nodes, 1, 30.0005);

        assert_eq!(outcome, Adjustment::Unchanged);
        assert_eq!(values(&nodes), vec![50.0, 30.0, 20.0]);
    }

    #[test]
    fn given_out_of_range_value_when_adjusting_then_clamps() {
        let mut nodes = group(&[50.0, 30.0, 20.0]);
        adjust(&mut nodes, 2, 250.0);
        assert_eq!(values(&nodes), vec![0.0, 0.0, 100.0]);

        let mut nodes = group(&[50.0, 30.0, 20.0]);
        adjust(&mut nodes, 0, -12.0);
        assert_eq!(nodes[0].allocation, 0.0);
        assert_close(nodes[1].allocation, 60.0);
        assert_close(nodes[2].allocation, 40.0);
    }

    #[test]
    fn given_degenerate_input_when_adjusting_then_unchanged() {
        let mut empty: Vec<CategoryNode> = Vec::new();
        assert_eq!(adjust(&mut empty, 0, 10.0), Adjustment::Unchanged);

        let mut single = group(&[100.0]);
        assert_eq!(adjust(&mut single, 0, 10.0), Adjustment::Unchanged);
        assert_eq!(single[0].allocation, 100.0);

        let mut nodes = group(&[50.0, 50.0]);
        assert_eq!(adjust(&mut nodes, 5, 10.0), Adjustment::Unchanged);
        assert_eq!(adjust(&mut nodes, 0, f64::NAN), Adjustment::Unchanged);
        assert_eq!(values(&nodes), vec![50.0, 50.0]);
    }

    #[test]
    fn given_zero_siblings_when_adjusting_then_zeros_stay_zero() {
        let mut nodes = group(&[60.0, 40.0, 0.0]);

        adjust(&mut nodes, 0, 80.0);

        assert_close(nodes[1].allocation, 20.0);
        assert_eq!(nodes[2].allocation, 0.0);
    }

    #[test]
    fn given_drifted_group_when_normalizing_then_fixed_index_untouched() {
        let mut nodes = group(&[40.0, 30.01, 30.02]);

        let outcome = normalize(&mut nodes, 0);

        assert!(matches!(outcome, Normalization::Corrected { .. }));
        assert_eq!(nodes[0].allocation, 40.0);
        assert!((total(&nodes) - 100.0).abs() < DRIFT_TOLERANCE);
    }

    #[test]
    fn given_balanced_group_when_normalizing_then_reports_balanced() {
        let mut nodes = group(&[33.333, 33.333, 33.334]);
        assert_eq!(normalize(&mut nodes, 1), Normalization::Balanced);
    }

    #[test]
    fn given_only_fixed_slice_positive_when_normalizing_then_drift_remains() {
        let mut nodes = group(&[90.0, 0.0, 0.0]);

        let outcome = normalize(&mut nodes, 0);

        assert_eq!(outcome, Normalization::Unadjustable { drift: -10.0 });
        assert_eq!(values(&nodes), vec![90.0, 0.0, 0.0]);
    }
}
