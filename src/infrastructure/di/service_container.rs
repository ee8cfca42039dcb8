//! Service container for dependency injection
//!
//! Wires up the controller with its collaborators.

use std::sync::Arc;

use crate::application::services::{CategoryTreeService, ViewController};
use crate::config::Settings;
use crate::infrastructure::http::HttpBudgetApi;
use crate::infrastructure::traits::{
    AllocationStore, AuthApi, Renderer, Selector, SkimSelector, StatsApi, TreeApi,
};
use crate::infrastructure::InfraResult;

/// Container holding all collaborators of the controller.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub tree: Arc<dyn TreeApi>,
    pub auth: Arc<dyn AuthApi>,
    pub store: Arc<dyn AllocationStore>,
    pub stats: Arc<dyn StatsApi>,

    /// Screen the controller draws on
    pub renderer: Arc<dyn Renderer>,

    /// Interactive category picker
    pub selector: Arc<dyn Selector>,
}

impl ServiceContainer {
    /// Create a container talking HTTP to the configured server.
    pub fn new(settings: Settings, renderer: Arc<dyn Renderer>) -> InfraResult<Self> {
        let api = Arc::new(HttpBudgetApi::new(&settings)?);
        Ok(Self::with_deps(
            settings,
            api.clone(),
            api.clone(),
            api.clone(),
            api,
            renderer,
            Arc::new(SkimSelector),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        tree: Arc<dyn TreeApi>,
        auth: Arc<dyn AuthApi>,
        store: Arc<dyn AllocationStore>,
        stats: Arc<dyn StatsApi>,
        renderer: Arc<dyn Renderer>,
        selector: Arc<dyn Selector>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            tree,
            auth,
            store,
            stats,
            renderer,
            selector,
        }
    }

    /// Fresh controller positioned at the configured root.
    pub fn controller(&self) -> ViewController {
        ViewController::new(
            self.settings.clone(),
            self.tree.clone(),
            self.auth.clone(),
            self.store.clone(),
            self.stats.clone(),
            self.renderer.clone(),
        )
    }

    pub fn tree_service(&self) -> CategoryTreeService {
        CategoryTreeService::new(self.tree.clone())
    }
}
