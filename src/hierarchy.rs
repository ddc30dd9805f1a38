//! Arena of laid-out tree nodes.
//!
//! A `LayoutTree` is rebuilt from the caller's `TreeNode` on every render.
//! Ids are arena indices handed out in breadth-first order, so the root is
//! always id 0 and the same input always yields the same ids.

use std::collections::VecDeque;

use crate::data::TreeNode;
use crate::error::TreeError;
use crate::expansion::ExpansionPolicy;

/// Identifier of a node within one layout tree.
pub type NodeId = usize;

/// A tree node augmented with layout and animation state.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: NodeId,
    pub name: String,
    /// Distance from the root (root = 0).
    pub depth: usize,
    /// Longest path to a leaf in the full input, ignoring collapse state.
    pub height: usize,
    pub parent: Option<NodeId>,
    /// Visible children; `None` when collapsed or a leaf.
    children: Option<Vec<NodeId>>,
    /// Children stashed while the node is collapsed.
    collapsed_children: Option<Vec<NodeId>>,
    /// Breadth position.
    pub x: f32,
    /// Depth position.
    pub y: f32,
    /// Breadth position at the end of the previous update.
    pub x0: f32,
    /// Depth position at the end of the previous update.
    pub y0: f32,
}

impl LayoutNode {
    /// Children currently shown.
    pub fn children(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Returns true if the node hides children behind a collapse.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed_children.is_some()
    }

    /// Returns true if the node has children in the input data.
    pub fn is_internal(&self) -> bool {
        self.children.is_some() || self.collapsed_children.is_some()
    }
}

/// The node arena for one rendered tree.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    /// Builds the arena from validated input and applies the expansion policy.
    pub fn build(data: &TreeNode, policy: ExpansionPolicy) -> Self {
        let mut nodes: Vec<LayoutNode> = Vec::with_capacity(data.node_count());
        let mut queue: VecDeque<(&TreeNode, Option<NodeId>, usize)> = VecDeque::from([(data, None, 0)]);

        while let Some((source, parent, depth)) = queue.pop_front() {
            let id = nodes.len();
            if let Some(parent) = parent {
                nodes[parent].children.get_or_insert_with(Vec::new).push(id);
            }
            nodes.push(LayoutNode {
                id,
                name: source.name.clone(),
                depth,
                height: 0,
                parent,
                children: None,
                collapsed_children: None,
                x: 0.0,
                y: 0.0,
                x0: 0.0,
                y0: 0.0,
            });
            for child in &source.children {
                queue.push_back((child, Some(id), depth + 1));
            }
        }

        // Breadth-first order puts every child after its parent.
        for id in (1..nodes.len()).rev() {
            if let Some(parent) = nodes[id].parent {
                let height = nodes[id].height + 1;
                if height > nodes[parent].height {
                    nodes[parent].height = height;
                }
            }
        }

        for node in &mut nodes {
            if node.children.is_some() && !policy.starts_expanded(node.depth, &node.name) {
                node.collapsed_children = node.children.take();
            }
        }

        Self { nodes }
    }

    /// The root node.
    pub fn root(&self) -> &LayoutNode {
        &self.nodes[0]
    }

    /// Total number of nodes, visible or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a layout tree has at least a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(id)
    }

    /// Every node in id order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter()
    }

    /// Visible nodes in breadth-first order, root first.
    pub fn visible(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut queue = VecDeque::from([0]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.nodes[id].children().iter().copied());
        }
        order
    }

    /// Visible parent/child pairs, in the order of `visible()`.
    pub fn links(&self) -> Vec<(NodeId, NodeId)> {
        self.visible()
            .into_iter()
            .filter_map(|id| self.nodes[id].parent.map(|parent| (parent, id)))
            .collect()
    }

    /// Swaps a node's visible children with its stashed ones.
    ///
    /// Returns `Ok(false)` for leaves, which have nothing to swap.
    pub fn toggle(&mut self, id: NodeId) -> Result<bool, TreeError> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::UnknownNode(id))?;
        if !node.is_internal() {
            return Ok(false);
        }
        std::mem::swap(&mut node.children, &mut node.collapsed_children);
        Ok(true)
    }

    /// Sets the expansion state of a node directly.
    ///
    /// Returns `Ok(true)` if anything changed.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> Result<bool, TreeError> {
        let node = self.nodes.get(id).ok_or(TreeError::UnknownNode(id))?;
        let is_expanded = node.children.is_some();
        if !node.is_internal() || is_expanded == expanded {
            return Ok(false);
        }
        self.toggle(id)
    }

    /// Records current positions as the anchors for the next transition.
    pub fn commit_positions(&mut self) {
        for id in self.visible() {
            let node = &mut self.nodes[id];
            node.x0 = node.x;
            node.y0 = node.y;
        }
    }
}
