//! In-memory collaborators shared by the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use budgetctl::application::presentation::{AllocationView, BreadcrumbTrail};
use budgetctl::application::services::ViewController;
use budgetctl::config::Settings;
use budgetctl::domain::{Breadcrumb, CategoryNode, Mode, NodeId, Session, Stats, ToastKind};
use budgetctl::infrastructure::di::ServiceContainer;
use budgetctl::infrastructure::traits::{
    AllocationStore, AuthApi, Renderer, SelectionItem, Selector, StatsApi, TreeApi,
};
use budgetctl::infrastructure::{ApiError, ApiResult};

pub const USER: &str = "alice";
pub const PASSWORD: &str = "secret";

/// Budget service backed by a map of nodes.
#[derive(Default)]
pub struct FakeServer {
    pub nodes: Mutex<HashMap<NodeId, CategoryNode>>,
    pub logged_in: Mutex<bool>,
    /// Every group passed to `allocate`
    pub saved: Mutex<Vec<Vec<CategoryNode>>>,
    pub offline: Mutex<bool>,
    pub reject_save: Mutex<Option<String>>,
    pub breadcrumbs_broken: Mutex<bool>,
    /// Parents requested through `children`, in order
    pub requests: Mutex<Vec<(NodeId, Mode)>>,
}

impl FakeServer {
    /// Root 1 ("National Budget") with three children; Health (2) has two children.
    pub fn sample() -> Arc<Self> {
        let server = Self::default();
        {
            let mut nodes = server.nodes.lock().unwrap();
            for node in [
                CategoryNode::new(1, None, "National Budget", 100.0),
                CategoryNode::new(2, Some(1), "Health", 50.0).with_description("Hospitals"),
                CategoryNode::new(3, Some(1), "Education", 30.0),
                CategoryNode::new(4, Some(1), "Defense", 20.0),
                CategoryNode::new(5, Some(2), "Hospitals", 60.0),
                CategoryNode::new(6, Some(2), "Research", 40.0),
            ] {
                nodes.insert(node.id, node);
            }
        }
        Arc::new(server)
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    pub fn force_logout(&self) {
        *self.logged_in.lock().unwrap() = false;
    }

    fn reachable(&self) -> ApiResult<()> {
        if *self.offline.lock().unwrap() {
            Err(ApiError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }

    pub fn last_saved(&self) -> Option<Vec<CategoryNode>> {
        self.saved.lock().unwrap().last().cloned()
    }
}

impl TreeApi for FakeServer {
    fn children(&self, parent: NodeId, mode: Mode) -> ApiResult<Vec<CategoryNode>> {
        self.reachable()?;
        self.requests.lock().unwrap().push((parent, mode));
        let mut children: Vec<CategoryNode> = self
            .nodes
            .lock()
            .unwrap()
            .values()
            .filter(|n| n.parent_id == Some(parent))
            .cloned()
            .collect();
        children.sort_by_key(|n| n.id);
        Ok(children)
    }

    fn node(&self, id: NodeId) -> ApiResult<Option<CategoryNode>> {
        self.reachable()?;
        Ok(self.nodes.lock().unwrap().get(&id).cloned())
    }

    fn has_children(&self, id: NodeId) -> ApiResult<bool> {
        self.reachable()?;
        Ok(self
            .nodes
            .lock()
            .unwrap()
            .values()
            .any(|n| n.parent_id == Some(id)))
    }

    fn breadcrumbs(&self, id: NodeId) -> ApiResult<Vec<Breadcrumb>> {
        self.reachable()?;
        if *self.breadcrumbs_broken.lock().unwrap() {
            return Err(ApiError::Rejected {
                status: 500,
                message: None,
            });
        }
        let nodes = self.nodes.lock().unwrap();
        let mut chain = Vec::new();
        let mut cursor = nodes.get(&id);
        while let Some(node) = cursor {
            chain.push(Breadcrumb {
                id: node.id,
                name: node.name.clone(),
            });
            cursor = node.parent_id.and_then(|p| nodes.get(&p));
        }
        chain.reverse();
        Ok(chain)
    }
}

impl AuthApi for FakeServer {
    fn session(&self) -> ApiResult<Session> {
        self.reachable()?;
        if *self.logged_in.lock().unwrap() {
            Ok(Session::user(USER))
        } else {
            Ok(Session::anonymous())
        }
    }

    fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        self.reachable()?;
        if username == USER && password == PASSWORD {
            *self.logged_in.lock().unwrap() = true;
            Ok(())
        } else {
            Err(ApiError::Rejected {
                status: 401,
                message: Some("Invalid credentials".into()),
            })
        }
    }

    fn logout(&self) -> ApiResult<()> {
        self.reachable()?;
        *self.logged_in.lock().unwrap() = false;
        Ok(())
    }
}

impl AllocationStore for FakeServer {
    fn allocate(&self, nodes: &[CategoryNode]) -> ApiResult<()> {
        self.reachable()?;
        if let Some(message) = self.reject_save.lock().unwrap().clone() {
            return Err(ApiError::Rejected {
                status: 400,
                message: Some(message),
            });
        }
        self.saved.lock().unwrap().push(nodes.to_vec());
        Ok(())
    }
}

impl StatsApi for FakeServer {
    fn stats(&self) -> ApiResult<Stats> {
        self.reachable()?;
        Ok(Stats {
            participants: 3,
            votes: self.saved.lock().unwrap().len() as u64,
        })
    }
}

/// Renderer that keeps everything it was asked to draw.
#[derive(Default)]
pub struct RecordingRenderer {
    pub views: Mutex<Vec<AllocationView>>,
    pub trails: Mutex<Vec<BreadcrumbTrail>>,
    pub sessions: Mutex<Vec<Session>>,
    pub stats: Mutex<Vec<String>>,
    pub toasts: Mutex<Vec<(String, ToastKind)>>,
}

impl RecordingRenderer {
    pub fn last_view(&self) -> Option<AllocationView> {
        self.views.lock().unwrap().last().cloned()
    }

    pub fn last_trail(&self) -> Option<BreadcrumbTrail> {
        self.trails.lock().unwrap().last().cloned()
    }

    pub fn last_toast(&self) -> Option<(String, ToastKind)> {
        self.toasts.lock().unwrap().last().cloned()
    }

    pub fn has_toast(&self, message: &str) -> bool {
        self.toasts.lock().unwrap().iter().any(|(m, _)| m == message)
    }

    pub fn view_count(&self) -> usize {
        self.views.lock().unwrap().len()
    }
}

impl Renderer for RecordingRenderer {
    fn render_allocations(&self, view: &AllocationView) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn render_breadcrumbs(&self, trail: &BreadcrumbTrail) {
        self.trails.lock().unwrap().push(trail.clone());
    }

    fn render_session(&self, session: &Session) {
        self.sessions.lock().unwrap().push(session.clone());
    }

    fn render_stats(&self, line: &str) {
        self.stats.lock().unwrap().push(line.to_string());
    }

    fn toast(&self, message: &str, kind: ToastKind) {
        self.toasts.lock().unwrap().push((message.to_string(), kind));
    }
}

/// Selector that always picks the same position, or cancels with `None`.
pub struct FixedSelector(pub Option<usize>);

impl Selector for FixedSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        _prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        Ok(self.0.and_then(|i| items.get(i).cloned()))
    }
}

pub struct Harness {
    pub server: Arc<FakeServer>,
    pub renderer: Arc<RecordingRenderer>,
    pub container: ServiceContainer,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_selector(FixedSelector(None))
    }

    pub fn with_selector(selector: FixedSelector) -> Self {
        let server = FakeServer::sample();
        let renderer = Arc::new(RecordingRenderer::default());
        let container = ServiceContainer::with_deps(
            Settings::default(),
            server.clone(),
            server.clone(),
            server.clone(),
            server.clone(),
            renderer.clone(),
            Arc::new(selector),
        );
        Self {
            server,
            renderer,
            container,
        }
    }

    pub fn controller(&self) -> ViewController {
        self.container.controller()
    }

    /// Controller at the root level, logged in and in edit mode.
    pub fn editing_controller(&self) -> ViewController {
        let mut controller = self.controller();
        controller.init();
        assert!(controller.login(USER, PASSWORD));
        controller.switch_mode(Mode::Edit);
        controller
    }
}

pub fn allocations(controller: &ViewController) -> Vec<f64> {
    controller
        .state()
        .group
        .nodes()
        .iter()
        .map(|n| n.allocation)
        .collect()
}
