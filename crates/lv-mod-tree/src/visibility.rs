//! Expansion, exclusive selection, search and type filtering over a launch tree.
//!
//! The controller keeps the canonical tree as built from the analyzer and a
//! display tree derived from it. All user transitions act on the display tree;
//! the canonical one is only read, to rebuild the display copy when the type
//! filter flips.

use lv_base::protocol::ViewMessage;

use crate::model::{LaunchTree, NodeId, TreeNode};

/// How a row was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Plain click: select or deselect
    Plain,
    /// Ctrl+click or context click: open the node's file
    Modified,
}

/// One line of the materialized tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    pub depth: usize,
    /// Guide columns inherited from ancestors (`│   ` or blanks)
    pub prefix: String,
    /// `├── `, `└── `, or empty for roots
    pub connector: &'static str,
}

pub struct VisibilityController {
    canonical: LaunchTree,
    display: LaunchTree,
    selected: Option<NodeId>,
    exclude_type: bool,
    excluded_type: String,
}

impl VisibilityController {
    pub fn new(tree: LaunchTree, excluded_type: impl Into<String>) -> Self {
        Self { display: tree.clone(), canonical: tree, selected: None, exclude_type: false, excluded_type: excluded_type.into() }
    }

    /// The tree as currently shown (filtered when the type filter is on).
    pub fn tree(&self) -> &LaunchTree {
        &self.display
    }

    pub fn canonical(&self) -> &LaunchTree {
        &self.canonical
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn excludes_type(&self) -> bool {
        self.exclude_type
    }

    pub fn excluded_type(&self) -> &str {
        &self.excluded_type
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.display.get(id)
    }

    /// Route a row activation.
    ///
    /// A modified gesture opens the file and leaves selection alone. A plain
    /// one toggles selection, but only when nothing is selected or the target
    /// is the selected node; otherwise it is ignored.
    pub fn click(&mut self, id: NodeId, gesture: Gesture) -> Option<ViewMessage> {
        match gesture {
            Gesture::Modified => self.open_file(id),
            Gesture::Plain => {
                if self.selected.is_none() || self.selected == Some(id) {
                    self.toggle_select(id);
                }
                None
            }
        }
    }

    /// Select `id` (collapsing everything but its path) or, when it is the
    /// selected node, deselect it and expand the whole tree.
    pub fn toggle_select(&mut self, id: NodeId) {
        let Some(node) = self.display.get(id) else { return };
        if node.selected {
            if let Some(node) = self.display.get_mut(id) {
                node.selected = false;
            }
            self.selected = None;
            self.expand_all();
            tracing::debug!(node = id.0, "deselected");
        } else if self.selected.is_none() {
            self.collapse_all();
            self.reveal_path(id);
            if let Some(node) = self.display.get_mut(id) {
                node.selected = true;
            }
            self.selected = Some(id);
            tracing::debug!(node = id.0, "selected");
        }
    }

    pub fn collapse_all(&mut self) {
        for node in self.display.nodes_mut() {
            node.expanded = false;
        }
    }

    pub fn expand_all(&mut self) {
        for node in self.display.nodes_mut() {
            node.expanded = true;
        }
    }

    /// Expand `id` and every ancestor.
    pub fn reveal_path(&mut self, id: NodeId) {
        if !self.display.contains(id) {
            return;
        }
        for a in std::iter::once(id).chain(self.display.ancestors(id)) {
            if let Some(node) = self.display.get_mut(a) {
                node.expanded = true;
            }
        }
    }

    /// Expand or collapse a single node. Collapsing the selected node or one
    /// of its ancestors is refused so the selection stays visible.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if !expanded
            && let Some(sel) = self.selected
            && (sel == id || self.display.ancestors(sel).contains(&id))
        {
            return;
        }
        if let Some(node) = self.display.get_mut(id) {
            node.expanded = expanded;
        }
    }

    /// Case-insensitive title match; an empty query matches nothing.
    pub fn is_match(&self, id: NodeId, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        self.display.get(id).is_some_and(|n| n.title.to_lowercase().contains(&query.to_lowercase()))
    }

    /// Matching nodes in pre-order. Expansion and selection are untouched.
    pub fn search(&self, query: &str) -> Vec<NodeId> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.display
            .preorder()
            .into_iter()
            .filter(|id| self.display.get(*id).is_some_and(|n| n.title.to_lowercase().contains(&needle)))
            .collect()
    }

    /// Show or hide nodes of the excluded type. The display tree is rebuilt
    /// from the canonical one, which drops any selection and expands everything.
    pub fn filter_by_type(&mut self, exclude: bool) {
        if exclude == self.exclude_type {
            return;
        }
        self.exclude_type = exclude;
        self.display =
            if exclude { self.canonical.without_type(&self.excluded_type) } else { self.canonical.clone() };
        self.selected = None;
        tracing::debug!(exclude, nodes = self.display.len(), "type filter changed");
    }

    /// The `openFile` request for `id`, or `None` when it has no path.
    pub fn open_file(&self, id: NodeId) -> Option<ViewMessage> {
        let node = self.display.get(id)?;
        if !node.has_path() {
            return None;
        }
        Some(ViewMessage::OpenFile { uri: node.path.clone() })
    }

    /// Rows to draw: pre-order, descending only into expanded nodes.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let tree = &self.display;
        let mut rows = Vec::new();
        // (id, depth, inherited prefix, connector, prefix handed to children)
        let mut stack: Vec<(NodeId, usize, String, &'static str, String)> =
            tree.roots().iter().rev().map(|r| (*r, 0, String::new(), "", String::new())).collect();

        while let Some((id, depth, prefix, connector, child_base)) = stack.pop() {
            let Some(node) = tree.get(id) else { continue };
            rows.push(VisibleRow { id, depth, prefix, connector });
            if !node.expanded {
                continue;
            }
            let count = node.children.len();
            for (i, child) in node.children.iter().enumerate().rev() {
                let is_last = i + 1 == count;
                let connector = if is_last { "└── " } else { "├── " };
                let guide = if is_last { "    " } else { "│   " };
                stack.push((*child, depth + 1, child_base.clone(), connector, format!("{}{}", child_base, guide)));
            }
        }
        rows
    }
}

/// Where the external opener should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub path: String,
    pub line: u32,
}

/// Strip one file-scheme prefix (first match in `prefixes` wins) from an
/// `openFile` uri. `None` for an empty uri.
pub fn resolve_open_target(uri: &str, prefixes: &[String], line: u32) -> Option<OpenRequest> {
    if uri.is_empty() {
        return None;
    }
    let path = prefixes.iter().find_map(|p| uri.strip_prefix(p.as_str())).unwrap_or(uri);
    Some(OpenRequest { path: path.to_string(), line })
}
