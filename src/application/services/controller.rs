//! View/navigation controller
//!
//! Owns the state of the current view (sibling group, parent, mode, session,
//! breadcrumbs) and turns user events into collaborator calls, engine runs and
//! re-renders. Network failures never escape as errors: they end up as toasts
//! and the view stays usable.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::presentation::{AllocationView, BreadcrumbTrail};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    parse_allocation, Adjustment, CategoryNode, Mode, NodeId, Session, SiblingGroup, Stats,
    ToastKind,
};
use crate::infrastructure::traits::{
    AllocationStore, AuthApi, Renderer, SelectionItem, StatsApi, TreeApi,
};
use crate::infrastructure::{ApiError, ApiResult};

const CONNECTION_ERROR: &str = "Connection error";
const LOAD_FAILED: &str = "Failed to load data";

/// Everything the current view is drawn from.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub group: SiblingGroup,
    /// Parent whose children are displayed
    pub parent_id: NodeId,
    pub mode: Mode,
    pub session: Session,
    pub trail: BreadcrumbTrail,
    generation: u64,
}

impl ViewState {
    pub fn new(root: NodeId) -> Self {
        Self {
            group: SiblingGroup::default(),
            parent_id: root,
            mode: Mode::View,
            session: Session::anonymous(),
            trail: BreadcrumbTrail::default(),
            generation: 0,
        }
    }

    /// Redistribution is only possible in edit mode with a live session.
    pub fn is_editable(&self) -> bool {
        self.mode == Mode::Edit && self.session.logged_in
    }
}

/// A load that has been requested but whose response is not applied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    pub parent_id: NodeId,
    pub mode: Mode,
    generation: u64,
}

/// What happened to a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The view now shows the requested level.
    Loaded,
    /// The requested level has no categories; the view is unchanged.
    Empty,
    /// The request failed; the view is unchanged.
    Failed,
    /// A newer request superseded this one; the response was dropped.
    Stale,
}

/// Result of [`ViewController::switch_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Switched(LoadOutcome),
    /// Edit mode was requested without a session.
    LoginRequired,
}

/// Result of [`ViewController::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The server refused the allocation.
    Rejected,
    /// The server could not be reached.
    Failed,
    /// Not in edit mode or not logged in; nothing was sent.
    NotEditable,
}

/// Controller behind the legend, chart and navigation.
pub struct ViewController {
    settings: Arc<Settings>,
    tree: Arc<dyn TreeApi>,
    auth: Arc<dyn AuthApi>,
    store: Arc<dyn AllocationStore>,
    stats: Arc<dyn StatsApi>,
    renderer: Arc<dyn Renderer>,
    state: ViewState,
}

impl ViewController {
    pub fn new(
        settings: Arc<Settings>,
        tree: Arc<dyn TreeApi>,
        auth: Arc<dyn AuthApi>,
        store: Arc<dyn AllocationStore>,
        stats: Arc<dyn StatsApi>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let state = ViewState::new(settings.root_id);
        Self {
            settings,
            tree,
            auth,
            store,
            stats,
            renderer,
            state,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn root(&self) -> NodeId {
        self.settings.root_id
    }

    /// Startup sequence: session, root level, stats.
    pub fn init(&mut self) -> LoadOutcome {
        self.check_auth();
        let outcome = self.load(self.root());
        self.load_stats();
        outcome
    }

    // ------------------------------------------------------------
    // session
    // ------------------------------------------------------------

    /// Refresh the session from the server. A failed lookup counts as logged out.
    #[instrument(skip(self))]
    pub fn check_auth(&mut self) -> &Session {
        let session = self.auth.session().unwrap_or_else(|e| {
            debug!("session lookup failed: {e}");
            Session::anonymous()
        });
        self.state.session = session;
        self.renderer.render_session(&self.state.session);

        if !self.state.session.logged_in && self.state.mode == Mode::Edit {
            info!("session gone, leaving edit mode");
            self.switch_mode(Mode::View);
        }
        &self.state.session
    }

    #[instrument(skip(self, password))]
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        match self.auth.login(username.trim(), password) {
            Ok(()) => {
                self.check_auth();
                self.renderer
                    .toast("Logged in successfully!", ToastKind::Success);
                true
            }
            Err(e) => {
                debug!("login failed: {e}");
                let message = if e.is_transport() {
                    CONNECTION_ERROR
                } else {
                    e.server_message().unwrap_or("Login failed")
                };
                self.renderer.toast(message, ToastKind::Error);
                false
            }
        }
    }

    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        if let Err(e) = self.auth.logout() {
            warn!("logout request failed: {e}");
        }
        self.state.session.logged_in = false;
        self.switch_mode(Mode::View);
        self.check_auth();
        self.renderer.toast("Logged out", ToastKind::Success);
    }

    // ------------------------------------------------------------
    // navigation
    // ------------------------------------------------------------

    /// Register a new load; any response to an older request becomes stale.
    pub fn request_load(&mut self, parent_id: NodeId) -> PendingLoad {
        self.state.generation += 1;
        PendingLoad {
            parent_id,
            mode: self.state.mode,
            generation: self.state.generation,
        }
    }

    pub fn fetch(&self, pending: &PendingLoad) -> ApiResult<Vec<CategoryNode>> {
        self.tree.children(pending.parent_id, pending.mode)
    }

    /// Install the response to `pending` unless a newer load was requested since.
    pub fn apply_load(
        &mut self,
        pending: PendingLoad,
        result: ApiResult<Vec<CategoryNode>>,
    ) -> LoadOutcome {
        if pending.generation != self.state.generation {
            debug!(
                parent = pending.parent_id,
                generation = pending.generation,
                latest = self.state.generation,
                "dropping stale response"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Err(e) => {
                warn!(parent = pending.parent_id, "load failed: {e}");
                self.renderer.toast(LOAD_FAILED, ToastKind::Error);
                LoadOutcome::Failed
            }
            Ok(nodes) if nodes.is_empty() => {
                self.renderer
                    .toast("No sub-categories at this level", ToastKind::Error);
                LoadOutcome::Empty
            }
            Ok(nodes) => {
                debug!(parent = pending.parent_id, count = nodes.len(), "loaded");
                self.state.group = SiblingGroup::new(nodes);
                self.state.parent_id = pending.parent_id;
                self.render();
                self.refresh_breadcrumbs();
                LoadOutcome::Loaded
            }
        }
    }

    /// Show the children of `parent_id`.
    #[instrument(skip(self))]
    pub fn load(&mut self, parent_id: NodeId) -> LoadOutcome {
        let pending = self.request_load(parent_id);
        let result = self.fetch(&pending);
        self.apply_load(pending, result)
    }

    /// Reload the level currently on screen.
    pub fn reload(&mut self) -> LoadOutcome {
        self.load(self.state.parent_id)
    }

    /// Open the sub-categories of the category at `index`.
    #[instrument(skip(self))]
    pub fn drill_into(&mut self, index: usize) -> ApplicationResult<LoadOutcome> {
        let node = self.state.group.get(index)?.clone();
        match self.tree.has_children(node.id) {
            Ok(true) => Ok(self.load(node.id)),
            Ok(false) => {
                self.renderer.toast(
                    &format!("\"{}\" has no sub-categories", node.name),
                    ToastKind::Error,
                );
                Ok(LoadOutcome::Empty)
            }
            Err(e) => {
                debug!("has_children failed, trying anyway: {e}");
                Ok(self.load(node.id))
            }
        }
    }

    /// Show the level containing the current parent. `None` at the root.
    #[instrument(skip(self))]
    pub fn go_up(&mut self) -> Option<LoadOutcome> {
        let parent = self.state.group.parent_id()?;
        match self.tree.node(parent) {
            Ok(node) => {
                let target = node.and_then(|n| n.parent_id).unwrap_or(self.root());
                Some(self.load(target))
            }
            Err(e) => {
                warn!(parent, "parent lookup failed: {e}");
                self.renderer.toast(LOAD_FAILED, ToastKind::Error);
                Some(LoadOutcome::Failed)
            }
        }
    }

    /// Jump to the breadcrumb at `position`. The current level is not a target.
    pub fn navigate_crumb(&mut self, position: usize) -> Option<LoadOutcome> {
        let target = self.state.trail.target(position)?;
        Some(self.load(target))
    }

    fn refresh_breadcrumbs(&mut self) {
        self.state.trail = match self.tree.breadcrumbs(self.state.parent_id) {
            Ok(chain) if !chain.is_empty() => BreadcrumbTrail::build(&chain, self.root()),
            Ok(_) => BreadcrumbTrail::fallback(),
            Err(e) => {
                debug!("breadcrumbs failed: {e}");
                BreadcrumbTrail::fallback()
            }
        };
        self.renderer.render_breadcrumbs(&self.state.trail);
    }

    /// Draw the legend/chart for the current state.
    pub fn render(&self) {
        let view = AllocationView::build(
            &self.state.group,
            self.state.is_editable(),
            self.state.parent_id == self.root(),
        );
        self.renderer.render_allocations(&view);
    }

    /// Candidates for the interactive category picker.
    pub fn selection_items(&self) -> Vec<SelectionItem> {
        self.state
            .group
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| SelectionItem {
                display: format!("{:>2}  {}  ({:.2}%)", index, node.name, node.allocation),
                index,
            })
            .collect()
    }

    // ------------------------------------------------------------
    // editing
    // ------------------------------------------------------------

    #[instrument(skip(self))]
    pub fn switch_mode(&mut self, mode: Mode) -> ModeChange {
        if mode == Mode::Edit && !self.state.session.logged_in {
            return ModeChange::LoginRequired;
        }
        self.state.mode = mode;
        ModeChange::Switched(self.reload())
    }

    /// Numeric legend input. Anything that is not a number is ignored.
    pub fn edit(&mut self, index: usize, raw: &str) -> Adjustment {
        match parse_allocation(raw) {
            Ok(value) => self.drag(index, value),
            Err(e) => {
                debug!("ignoring input: {e}");
                Adjustment::Unchanged
            }
        }
    }

    /// Chart drag of slice `index` to `value` percent.
    pub fn drag(&mut self, index: usize, value: f64) -> Adjustment {
        if !self.state.is_editable() {
            debug!(index, value, "edit ignored outside edit mode");
            return Adjustment::Unchanged;
        }
        let outcome = self.state.group.adjust(index, value);
        if outcome.is_applied() {
            self.render();
        }
        outcome
    }

    /// Submit the current group. On success the level is fetched again.
    #[instrument(skip(self))]
    pub fn save(&mut self) -> SaveOutcome {
        if !self.state.is_editable() {
            return SaveOutcome::NotEditable;
        }

        match self.store.allocate(self.state.group.nodes()) {
            Ok(()) => {
                info!(parent = self.state.parent_id, "allocation saved");
                self.renderer.toast("Allocation saved!", ToastKind::Success);
                self.reload();
                self.load_stats();
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!("save failed: {e}");
                let (message, outcome) = save_failure(&e);
                self.renderer.toast(message, ToastKind::Error);
                outcome
            }
        }
    }

    /// Refresh the stats line. Failures are ignored.
    pub fn load_stats(&self) -> Option<Stats> {
        match self.stats.stats() {
            Ok(stats) => {
                self.renderer.render_stats(&stats.summary());
                Some(stats)
            }
            Err(e) => {
                debug!("stats unavailable: {e}");
                None
            }
        }
    }
}

fn save_failure(e: &ApiError) -> (&str, SaveOutcome) {
    if e.is_transport() {
        (CONNECTION_ERROR, SaveOutcome::Failed)
    } else {
        (
            e.server_message().unwrap_or("Save failed"),
            SaveOutcome::Rejected,
        )
    }
}
