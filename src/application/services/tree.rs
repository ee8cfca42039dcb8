//! Depth-limited snapshot of the category tree

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApiResultExt, ApplicationResult};
use crate::domain::{Mode, NodeId};
use crate::infrastructure::traits::TreeApi;

/// A category with the sub-categories fetched below it.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTree {
    pub id: NodeId,
    pub name: String,
    /// Share of the parent; `None` for the requested root
    pub allocation: Option<f64>,
    pub children: Vec<CategoryTree>,
}

impl CategoryTree {
    /// Number of categories in the snapshot, root included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CategoryTree::size).sum::<usize>()
    }
}

/// Walks the tree API level by level.
pub struct CategoryTreeService {
    tree: Arc<dyn TreeApi>,
}

impl CategoryTreeService {
    pub fn new(tree: Arc<dyn TreeApi>) -> Self {
        Self { tree }
    }

    /// Fetch `root` and up to `depth` levels below it.
    #[instrument(level = "debug", skip(self))]
    pub fn snapshot(
        &self,
        root: NodeId,
        mode: Mode,
        depth: usize,
    ) -> ApplicationResult<CategoryTree> {
        let name = self
            .tree
            .node(root)
            .with_context(format!("look up category {root}"))?
            .map(|n| n.name)
            .unwrap_or_else(|| format!("#{root}"));

        let mut tree = CategoryTree {
            id: root,
            name,
            allocation: None,
            children: Vec::new(),
        };
        self.expand(&mut tree, mode, depth)?;
        debug!(root, depth, size = tree.size(), "snapshot complete");
        Ok(tree)
    }

    fn expand(&self, parent: &mut CategoryTree, mode: Mode, depth: usize) -> ApplicationResult<()> {
        if depth == 0 {
            return Ok(());
        }
        let children = self
            .tree
            .children(parent.id, mode)
            .with_context(format!("load children of {}", parent.id))?;

        for child in children {
            let mut subtree = CategoryTree {
                id: child.id,
                name: child.name,
                allocation: Some(child.allocation),
                children: Vec::new(),
            };
            let descend = depth > 1
                && self
                    .tree
                    .has_children(child.id)
                    .with_context(format!("check children of {}", child.id))?;
            if descend {
                self.expand(&mut subtree, mode, depth - 1)?;
            }
            parent.children.push(subtree);
        }
        Ok(())
    }
}
