//! Tidy tree layout with a fixed node size.
//!
//! Implements the linear-time Buchheim, Jünger and Leipert refinement of
//! Walker's algorithm over the visible part of a `LayoutTree`:
//!
//! 1. **First walk (post-order):** assign preliminary breadth positions,
//!    merging subtree contours through threads and apportioning shifts.
//! 2. **Second walk (pre-order):** accumulate modifiers into final positions.
//! 3. **Sizing:** scale breadth by `dx` and place depth at `depth * dy`.
//!
//! Siblings are separated by one node width, cousins by two.

use crate::error::TreeError;
use crate::hierarchy::{LayoutTree, NodeId};

/// Work record for one visible node. Slot 0 is a virtual parent of the root.
#[derive(Debug)]
struct Slot {
    node: NodeId,
    parent: usize,
    children: Vec<usize>,
    /// Default ancestor handed to the next child's apportion.
    default_ancestor: Option<usize>,
    ancestor: usize,
    prelim: f32,
    modifier: f32,
    change: f32,
    shift: f32,
    thread: Option<usize>,
    /// Index among siblings.
    number: usize,
}

impl Slot {
    fn new(index: usize, node: NodeId, parent: usize, number: usize) -> Self {
        Self {
            node,
            parent,
            children: Vec::new(),
            default_ancestor: None,
            ancestor: index,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
            number,
        }
    }
}

/// Tidy tree layout engine with a fixed node size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TidyTree {
    /// Breadth allotted to one node.
    pub dx: f32,
    /// Distance between consecutive depths.
    pub dy: f32,
}

impl TidyTree {
    pub fn node_size(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Positions every visible node of `tree`. The root lands at `(0, 0)`.
    ///
    /// Hidden nodes keep whatever position they had.
    pub fn apply(&self, tree: &mut LayoutTree) -> Result<(), TreeError> {
        let mut slots = build_slots(tree);

        for v in post_order(&slots) {
            first_walk(&mut slots, v);
        }
        slots[0].modifier = -slots[1].prelim;
        for v in 1..slots.len() {
            // Slots are created breadth-first, so parents are already final.
            let parent_mod = slots[slots[v].parent].modifier;
            slots[v].modifier += parent_mod;
            let x = slots[v].prelim + parent_mod;

            let node = tree
                .get_mut(slots[v].node)
                .ok_or(TreeError::UnknownNode(slots[v].node))?;
            node.x = x * self.dx;
            node.y = node.depth as f32 * self.dy;
            if !node.x.is_finite() || !node.y.is_finite() {
                return Err(TreeError::NonFinite(node.id));
            }
        }
        Ok(())
    }
}

/// Breadth extremes of the visible nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub left: NodeId,
    pub right: NodeId,
    pub min_x: f32,
    pub max_x: f32,
}

impl Extent {
    /// Finds the visible nodes with the smallest and largest breadth.
    pub fn of(tree: &LayoutTree) -> Self {
        let root = tree.root();
        let mut extent = Extent {
            left: root.id,
            right: root.id,
            min_x: root.x,
            max_x: root.x,
        };
        for id in tree.visible() {
            let Some(node) = tree.get(id) else { continue };
            if node.x < extent.min_x {
                extent.left = id;
                extent.min_x = node.x;
            }
            if node.x > extent.max_x {
                extent.right = id;
                extent.max_x = node.x;
            }
        }
        extent
    }

    pub fn breadth(&self) -> f32 {
        self.max_x - self.min_x
    }
}

fn build_slots(tree: &LayoutTree) -> Vec<Slot> {
    let mut slots = vec![Slot::new(0, usize::MAX, 0, 0), Slot::new(1, tree.root().id, 0, 0)];
    slots[0].children.push(1);

    let mut next = 1;
    while next < slots.len() {
        let node = slots[next].node;
        if let Some(layout_node) = tree.get(node) {
            for (number, &child) in layout_node.children().iter().enumerate() {
                let index = slots.len();
                slots.push(Slot::new(index, child, next, number));
                slots[next].children.push(index);
            }
        }
        next += 1;
    }
    slots
}

/// Children before parents, siblings left to right.
fn post_order(slots: &[Slot]) -> Vec<usize> {
    let mut pending = vec![1];
    let mut visited = Vec::with_capacity(slots.len());
    while let Some(v) = pending.pop() {
        visited.push(v);
        pending.extend(slots[v].children.iter().copied());
    }
    visited.reverse();
    visited
}

fn separation(slots: &[Slot], a: usize, b: usize) -> f32 {
    if slots[a].parent == slots[b].parent {
        1.0
    } else {
        2.0
    }
}

fn next_left(slots: &[Slot], v: usize) -> Option<usize> {
    slots[v].children.first().copied().or(slots[v].thread)
}

fn next_right(slots: &[Slot], v: usize) -> Option<usize> {
    slots[v].children.last().copied().or(slots[v].thread)
}

fn first_walk(slots: &mut [Slot], v: usize) {
    let parent = slots[v].parent;
    let left_sibling = match slots[v].number {
        0 => None,
        n => Some(slots[parent].children[n - 1]),
    };

    if let (Some(&first), Some(&last)) = (slots[v].children.first(), slots[v].children.last()) {
        execute_shifts(slots, v);
        let midpoint = (slots[first].prelim + slots[last].prelim) / 2.0;
        match left_sibling {
            Some(w) => {
                slots[v].prelim = slots[w].prelim + separation(slots, v, w);
                slots[v].modifier = slots[v].prelim - midpoint;
            }
            None => slots[v].prelim = midpoint,
        }
    } else if let Some(w) = left_sibling {
        slots[v].prelim = slots[w].prelim + separation(slots, v, w);
    }

    let default_ancestor = slots[parent]
        .default_ancestor
        .unwrap_or(slots[parent].children[0]);
    slots[parent].default_ancestor = Some(apportion(slots, v, left_sibling, default_ancestor));
}

fn execute_shifts(slots: &mut [Slot], v: usize) {
    let mut shift = 0.0;
    let mut change = 0.0;
    for i in (0..slots[v].children.len()).rev() {
        let w = slots[v].children[i];
        slots[w].prelim += shift;
        slots[w].modifier += shift;
        change += slots[w].change;
        shift += slots[w].shift + change;
    }
}

fn move_subtree(slots: &mut [Slot], wm: usize, wp: usize, shift: f32) {
    let subtrees = slots[wp].number as f32 - slots[wm].number as f32;
    if subtrees > 0.0 {
        let change = shift / subtrees;
        slots[wp].change -= change;
        slots[wm].change += change;
    }
    slots[wp].shift += shift;
    slots[wp].prelim += shift;
    slots[wp].modifier += shift;
}

fn next_ancestor(slots: &[Slot], vim: usize, v: usize, ancestor: usize) -> usize {
    let candidate = slots[vim].ancestor;
    if slots[candidate].parent == slots[v].parent {
        candidate
    } else {
        ancestor
    }
}

fn apportion(slots: &mut [Slot], v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
    let Some(w) = left_sibling else {
        return ancestor;
    };

    // Inner/outer contours on the plus (v) and minus (w) sides.
    let mut vip = v;
    let mut vop = v;
    let mut vim = w;
    let mut vom = slots[slots[v].parent].children[0];
    let mut sip = slots[vip].modifier;
    let mut sop = slots[vop].modifier;
    let mut sim = slots[vim].modifier;
    let mut som = slots[vom].modifier;

    let (mut next_im, mut next_ip);
    loop {
        next_im = next_right(slots, vim);
        next_ip = next_left(slots, vip);
        let (Some(im), Some(ip)) = (next_im, next_ip) else {
            break;
        };
        vim = im;
        vip = ip;
        if let Some(om) = next_left(slots, vom) {
            vom = om;
        }
        if let Some(op) = next_right(slots, vop) {
            vop = op;
        }
        slots[vop].ancestor = v;

        let shift = slots[vim].prelim + sim - slots[vip].prelim - sip + separation(slots, vim, vip);
        if shift > 0.0 {
            let wm = next_ancestor(slots, vim, v, ancestor);
            move_subtree(slots, wm, v, shift);
            sip += shift;
            sop += shift;
        }

        sim += slots[vim].modifier;
        sip += slots[vip].modifier;
        som += slots[vom].modifier;
        sop += slots[vop].modifier;
    }

    if let Some(im) = next_im {
        if next_right(slots, vop).is_none() {
            slots[vop].thread = Some(im);
            slots[vop].modifier += sim - sop;
        }
    }
    if let Some(ip) = next_ip {
        if next_left(slots, vom).is_none() {
            slots[vom].thread = Some(ip);
            slots[vom].modifier += sip - som;
            ancestor = v;
        }
    }
    ancestor
}
