//! Collaborator boundary traits for testability
//!
//! These traits abstract the remote budget service and the screen, allowing
//! the controller to be tested with in-memory implementations.

use crate::application::presentation::{AllocationView, BreadcrumbTrail};
use crate::domain::{Breadcrumb, CategoryNode, Mode, NodeId, Session, Stats, ToastKind};
use crate::infrastructure::ApiResult;

/// Read access to the category tree.
pub trait TreeApi: Send + Sync {
    /// Children of `parent`, i.e. one sibling group.
    fn children(&self, parent: NodeId, mode: Mode) -> ApiResult<Vec<CategoryNode>>;

    /// Single node; `None` if the server does not know it.
    fn node(&self, id: NodeId) -> ApiResult<Option<CategoryNode>>;

    /// Whether `id` has a sibling group below it.
    fn has_children(&self, id: NodeId) -> ApiResult<bool>;

    /// Chain from the root down to `id`, inclusive.
    fn breadcrumbs(&self, id: NodeId) -> ApiResult<Vec<Breadcrumb>>;
}

/// Session handling.
pub trait AuthApi: Send + Sync {
    fn session(&self) -> ApiResult<Session>;

    fn login(&self, username: &str, password: &str) -> ApiResult<()>;

    fn logout(&self) -> ApiResult<()>;
}

/// Persists the user's allocation of one sibling group.
pub trait AllocationStore: Send + Sync {
    fn allocate(&self, nodes: &[CategoryNode]) -> ApiResult<()>;
}

/// Participation counters.
pub trait StatsApi: Send + Sync {
    fn stats(&self) -> ApiResult<Stats>;
}

/// Output surface of the controller.
pub trait Renderer: Send + Sync {
    /// Legend and chart for the current sibling group.
    fn render_allocations(&self, view: &AllocationView);

    fn render_breadcrumbs(&self, trail: &BreadcrumbTrail);

    fn render_session(&self, session: &Session);

    fn render_stats(&self, line: &str);

    /// Transient, non-blocking notification.
    fn toast(&self, message: &str, kind: ToastKind);
}

/// Item for FZF-style selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    /// Display text shown in selector
    pub display: String,
    /// Position of the category in the current sibling group
    pub index: usize,
}

/// Interactive FZF-style selector abstraction.
pub trait Selector: Send + Sync {
    /// Present items to user and return selected one.
    /// Returns None if user cancels (Esc/Ctrl-C).
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real selector implementation using skim (FZF-like).
#[derive(Debug, Default)]
pub struct SkimSelector;

impl Selector for SkimSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        use skim::prelude::*;
        use std::io::Cursor;

        if items.is_empty() {
            return Ok(None);
        }

        // Build input as newline-separated display strings
        let input = items
            .iter()
            .map(|i| i.display.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let options = SkimOptionsBuilder::default()
            .prompt(Some(prompt))
            .height(Some("50%"))
            .multi(false)
            .build()
            .map_err(|e| format!("failed to build skim options: {e}"))?;

        let item_reader = SkimItemReader::default();
        let items_arc = item_reader.of_bufread(Cursor::new(input));

        match Skim::run_with(&options, Some(items_arc)) {
            Some(out) if out.is_abort => Ok(None),
            Some(out) => Ok(out.selected_items.first().and_then(|selected| {
                let display = selected.output().to_string();
                items.iter().find(|i| i.display == display).cloned()
            })),
            None => Ok(None),
        }
    }
}
