//! Launch tree model: the analyzer's nested JSON turned into an arena.
//!
//! Every node lives in `LaunchTree::nodes` and is addressed by a [`NodeId`].
//! Children are owned index lists; `parent` is a plain back-index.
//!
//! Analyzer responses can nest arbitrarily deep, so decoding never recurses
//! per level: the text is parsed into a `serde_json::Value` on a growable
//! stack and then unpacked with an explicit work stack.

use serde::Deserialize;
use serde::de::Error as _;
use serde_json::{Map, Value};

/// A node as the analyzer sends it. Every field may be missing or null.
#[derive(Debug, Clone, Default)]
pub struct RawNode {
    pub title: Option<String>,
    /// `type` on the wire
    pub node_type: Option<String>,
    pub path: Option<String>,
    pub children: Option<Vec<RawNode>>,
}

impl RawNode {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = Some(children);
        self
    }
}

/// Parse response: a single root object or an array of roots.
#[derive(Debug, Clone)]
pub enum RawTree {
    Forest(Vec<RawNode>),
    Single(RawNode),
}

/// A node whose children are still being unpacked.
struct Pending {
    node: RawNode,
    rest: std::vec::IntoIter<Value>,
    done: Option<Vec<RawNode>>,
}

impl RawTree {
    pub fn into_roots(self) -> Vec<RawNode> {
        match self {
            RawTree::Forest(roots) => roots,
            RawTree::Single(root) => vec![root],
        }
    }

    /// Decode an analyzer response body, whatever its depth.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(roots) => {
                roots.into_iter().map(unpack_node).collect::<Result<Vec<_>, _>>().map(RawTree::Forest)
            }
            other => unpack_node(other).map(RawTree::Single),
        }
    }
}

/// Split one JSON object into its own fields and its not yet decoded children.
fn split_node(value: Value) -> Result<(RawNode, Option<Vec<Value>>), serde_json::Error> {
    let Value::Object(mut map) = value else {
        return Err(serde_json::Error::custom("launch tree node is not an object"));
    };
    let node = RawNode {
        title: string_field(&mut map, "title")?,
        node_type: string_field(&mut map, "type")?,
        path: string_field(&mut map, "path")?,
        children: None,
    };
    let children = match map.remove("children") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items),
        Some(_) => return Err(serde_json::Error::custom("`children` is not an array")),
    };
    Ok((node, children))
}

fn string_field(map: &mut Map<String, Value>, key: &str) -> Result<Option<String>, serde_json::Error> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(serde_json::Error::custom(format!("`{key}` is not a string"))),
    }
}

fn pending(value: Value) -> Result<Pending, serde_json::Error> {
    let (node, children) = split_node(value)?;
    let done = children.as_ref().map(|c| Vec::with_capacity(c.len()));
    Ok(Pending { node, rest: children.unwrap_or_default().into_iter(), done })
}

/// Decode one root and its subtree with an explicit stack.
fn unpack_node(value: Value) -> Result<RawNode, serde_json::Error> {
    let mut stack = vec![pending(value)?];
    loop {
        let Some(top) = stack.last_mut() else {
            return Err(serde_json::Error::custom("empty launch tree stack"));
        };
        if let Some(child) = top.rest.next() {
            stack.push(pending(child)?);
            continue;
        }
        let Some(Pending { mut node, done, .. }) = stack.pop() else { continue };
        node.children = done;
        match stack.last_mut() {
            Some(parent) => parent.done.get_or_insert_with(Vec::new).push(node),
            None => return Ok(node),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub title: String,
    /// Empty when the node has no file target
    pub path: String,
    pub node_type: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub expanded: bool,
    pub selected: bool,
}

impl TreeNode {
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl LaunchTree {
    /// Build a fresh tree: everything expanded, nothing selected, children in
    /// input order, `fallback_type` for nodes without a type. Ids are assigned
    /// in pre-order.
    pub fn build(roots: Vec<RawNode>, fallback_type: &str) -> Self {
        let mut tree = LaunchTree::default();
        let mut stack: Vec<(RawNode, Option<NodeId>)> = roots.into_iter().rev().map(|r| (r, None)).collect();

        while let Some((raw, parent)) = stack.pop() {
            let id = NodeId(tree.nodes.len());
            let RawNode { title, node_type, path, children } = raw;
            tree.nodes.push(TreeNode {
                title: title.unwrap_or_default(),
                path: path.unwrap_or_default(),
                node_type: node_type.unwrap_or_else(|| fallback_type.to_string()),
                children: Vec::new(),
                parent,
                expanded: true,
                selected: false,
            });
            match parent {
                Some(p) => tree.nodes[p.0].children.push(id),
                None => tree.roots.push(id),
            }
            for child in children.unwrap_or_default().into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }
        tree
    }

    /// Parse an analyzer response body and build it.
    pub fn from_json(text: &str, fallback_type: &str) -> Result<Self, serde_json::Error> {
        let raw = RawTree::from_json(text)?;
        Ok(Self::build(raw.into_roots(), fallback_type))
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut TreeNode> {
        self.nodes.iter_mut()
    }

    /// All nodes in pre-order (roots in order, children in order).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Ancestors of `id`, nearest first. Empty for roots and unknown ids.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            out.push(p);
            current = self.get(p).and_then(|n| n.parent);
        }
        out
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Titles from the root down to `id`.
    pub fn breadcrumb(&self, id: NodeId) -> Vec<&str> {
        let mut chain: Vec<&str> = self.ancestors(id).iter().filter_map(|a| self.get(*a)).map(|n| n.title.as_str()).collect();
        chain.reverse();
        if let Some(node) = self.get(id) {
            chain.push(&node.title);
        }
        chain
    }

    /// A copy without nodes of `excluded_type` and their subtrees. Node state
    /// flags are copied as they are; ids are reassigned.
    pub fn without_type(&self, excluded_type: &str) -> LaunchTree {
        let mut out = LaunchTree::default();
        let mut stack: Vec<(NodeId, Option<NodeId>)> = self.roots.iter().rev().map(|r| (*r, None)).collect();

        while let Some((old, parent)) = stack.pop() {
            let Some(node) = self.get(old) else { continue };
            if node.node_type == excluded_type {
                continue;
            }
            let id = NodeId(out.nodes.len());
            out.nodes.push(TreeNode { children: Vec::new(), parent, ..node.clone() });
            match parent {
                Some(p) => out.nodes[p.0].children.push(id),
                None => out.roots.push(id),
            }
            stack.extend(node.children.iter().rev().map(|c| (*c, Some(id))));
        }
        out
    }
}
