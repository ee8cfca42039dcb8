//! Render models derived from the view state
//!
//! Everything the screen needs is computed here, so renderers only draw.

use crate::domain::{slice_color, Breadcrumb, NodeId, SiblingGroup, FULL_ALLOCATION};

/// Deviation of the total from 100 above which the total is flagged.
pub const TOTAL_WARN_THRESHOLD: f64 = 0.1;

/// Label shown when the breadcrumb chain cannot be fetched.
pub const FALLBACK_CRUMB: &str = "National Budget";

/// One legend entry / pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub index: usize,
    pub id: NodeId,
    pub color: &'static str,
    pub name: String,
    pub description: Option<String>,
    /// Allocation with two decimals, as shown in the input field
    pub value: String,
    /// Allocation as a fraction of 100, for drawing the slice
    pub share: f64,
}

/// Legend and chart for one sibling group.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationView {
    pub rows: Vec<LegendRow>,
    pub total: String,
    /// Total deviates visibly from 100
    pub total_warning: bool,
    /// Inputs enabled (edit mode and logged in)
    pub editable: bool,
    pub save_visible: bool,
    pub back_visible: bool,
}

impl AllocationView {
    pub fn build(group: &SiblingGroup, editable: bool, at_root: bool) -> Self {
        let rows = group
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| LegendRow {
                index,
                id: node.id,
                color: slice_color(index),
                name: node.name.clone(),
                description: node.description.clone(),
                value: format!("{:.2}", node.allocation),
                share: (node.allocation / FULL_ALLOCATION).clamp(0.0, 1.0),
            })
            .collect();

        let total = group.total();
        Self {
            rows,
            total: format!("{total:.2}%"),
            total_warning: (total - FULL_ALLOCATION).abs() > TOTAL_WARN_THRESHOLD,
            editable,
            save_visible: editable,
            back_visible: !at_root,
        }
    }
}

/// A breadcrumb as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrumbView {
    pub name: String,
    /// Where clicking the crumb leads; `None` for the current level
    pub target: Option<NodeId>,
}

/// Root-to-current navigation chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreadcrumbTrail {
    pub crumbs: Vec<CrumbView>,
}

impl BreadcrumbTrail {
    /// The first crumb always leads to `root`; the last is the current level.
    pub fn build(chain: &[Breadcrumb], root: NodeId) -> Self {
        let last = chain.len().saturating_sub(1);
        let crumbs = chain
            .iter()
            .enumerate()
            .map(|(i, crumb)| CrumbView {
                name: crumb.name.clone(),
                target: match i {
                    _ if i == last => None,
                    0 => Some(root),
                    _ => Some(crumb.id),
                },
            })
            .collect();
        Self { crumbs }
    }

    pub fn fallback() -> Self {
        Self {
            crumbs: vec![CrumbView {
                name: FALLBACK_CRUMB.to_string(),
                target: None,
            }],
        }
    }

    pub fn target(&self, position: usize) -> Option<NodeId> {
        self.crumbs.get(position).and_then(|c| c.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryNode;

    fn group(values: &[f64]) -> SiblingGroup {
        SiblingGroup::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| CategoryNode::new(i as i64 + 2, Some(1), format!("n{i}"), *v))
                .collect(),
        )
    }

    #[test]
    fn given_balanced_group_when_building_view_then_formats_rows() {
        let view = AllocationView::build(&group(&[62.5, 37.5]), false, true);

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].value, "62.50");
        assert_eq!(view.rows[1].color, "#56B4E9");
        assert_eq!(view.rows[1].share, 0.375);
        assert_eq!(view.total, "100.00%");
        assert!(!view.total_warning);
        assert!(!view.save_visible);
        assert!(!view.back_visible);
    }

    #[test]
    fn given_off_total_when_building_view_then_warns() {
        let view = AllocationView::build(&group(&[50.0, 49.8]), true, false);
        assert!(view.total_warning);
        assert!(view.editable && view.save_visible && view.back_visible);

        let view = AllocationView::build(&group(&[50.0, 49.95]), true, false);
        assert!(!view.total_warning);
    }

    fn crumb(id: NodeId, name: &str) -> Breadcrumb {
        Breadcrumb {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn given_chain_when_building_trail_then_first_targets_root_and_last_is_current() {
        let chain = vec![
            crumb(1, "National Budget"),
            crumb(5, "Health"),
            crumb(9, "Hospitals"),
        ];

        let trail = BreadcrumbTrail::build(&chain, 1);

        assert_eq!(trail.target(0), Some(1));
        assert_eq!(trail.target(1), Some(5));
        assert_eq!(trail.target(2), None);
        assert_eq!(trail.target(7), None);
    }

    #[test]
    fn given_single_crumb_when_building_trail_then_it_is_current() {
        let trail = BreadcrumbTrail::build(&[crumb(1, "Root")], 1);
        assert_eq!(trail.crumbs[0].target, None);
        assert_eq!(BreadcrumbTrail::fallback().crumbs[0].name, FALLBACK_CRUMB);
    }
}
