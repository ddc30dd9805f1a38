//! Hierarchical input records for the tree card.
//!
//! Input arrives either as a nested `{ "name": .., "children": [..] }` JSON
//! document or as flat id/parent records (one JSON object per line). Both
//! forms are validated up front so the renderer never sees a partial tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

use crate::error::TreeError;

/// Deepest tree accepted by the validators.
pub const MAX_DEPTH: usize = 512;

/// Bracket nesting allowed in a nested document: an object and a
/// `children` array per level, plus slack for unknown fields.
const MAX_NESTING: usize = 2 * MAX_DEPTH + 8;

/// One node of the input hierarchy, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Creates a leaf.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Creates an internal node with the given children.
    pub fn with_children(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Parses and validates a nested JSON document.
    ///
    /// serde_json's own recursion limit is lifted so that `MAX_DEPTH` is the
    /// real bound; documents nested deeper than it are refused before parsing.
    pub fn from_json_str(json: &str) -> Result<Self, TreeError> {
        if nesting_depth(json) > MAX_NESTING {
            return Err(TreeError::TooDeep { limit: MAX_DEPTH });
        }
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let value = Value::deserialize(&mut deserializer)?;
        deserializer.end()?;
        Self::from_value(&value)
    }

    /// Validates a JSON value and converts it into a tree.
    ///
    /// Unknown fields are ignored; `children` may be absent, `null` or an
    /// array of objects.
    pub fn from_value(value: &Value) -> Result<Self, TreeError> {
        node_from_value(value, "$".to_string(), 0)
    }

    /// Returns the number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Returns the length of the longest downward path to a leaf.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        height
    }

    /// Builds a tree from flat id/parent records.
    ///
    /// Children keep the order in which their records appear. Duplicate ids,
    /// dangling parents, missing or multiple roots and cycles are rejected.
    pub fn from_records(records: &[NodeRecord]) -> Result<Self, TreeError> {
        let mut index_by_id: HashMap<u64, usize> = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index_by_id.insert(record.id, i).is_some() {
                return Err(TreeError::DuplicateRecord(record.id));
            }
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        let mut root: Option<usize> = None;
        for (i, record) in records.iter().enumerate() {
            match record.parent_id {
                Some(parent_id) => {
                    let parent = *index_by_id.get(&parent_id).ok_or(TreeError::UnknownParent {
                        id: record.id,
                        parent_id,
                    })?;
                    children[parent].push(i);
                }
                None => {
                    if let Some(first) = root {
                        return Err(TreeError::MultipleRoots {
                            first: records[first].id,
                            second: record.id,
                        });
                    }
                    root = Some(i);
                }
            }
        }
        let root = root.ok_or(TreeError::NoRoot)?;

        // Anything unreachable from the root sits on a parent cycle.
        let mut depth: Vec<Option<usize>> = vec![None; records.len()];
        depth[root] = Some(0);
        let mut queue = VecDeque::from([root]);
        while let Some(i) = queue.pop_front() {
            let d = depth[i].unwrap_or(0);
            if d > MAX_DEPTH {
                return Err(TreeError::TooDeep { limit: MAX_DEPTH });
            }
            for &child in &children[i] {
                depth[child] = Some(d + 1);
                queue.push_back(child);
            }
        }
        if let Some(i) = depth.iter().position(Option::is_none) {
            return Err(TreeError::Cycle(records[i].id));
        }

        Ok(build_from_records(root, records, &children))
    }
}

fn build_from_records(index: usize, records: &[NodeRecord], children: &[Vec<usize>]) -> TreeNode {
    TreeNode {
        name: records[index].name.clone(),
        children: children[index]
            .iter()
            .map(|&child| build_from_records(child, records, children))
            .collect(),
    }
}

/// Deepest `{`/`[` nesting in `json`, ignoring brackets inside strings.
fn nesting_depth(json: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in json.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

fn node_from_value(value: &Value, path: String, depth: usize) -> Result<TreeNode, TreeError> {
    if depth > MAX_DEPTH {
        return Err(TreeError::TooDeep { limit: MAX_DEPTH });
    }

    let object = value
        .as_object()
        .ok_or_else(|| TreeError::NotAnObject { path: path.clone() })?;

    let name = match object.get("name") {
        None => return Err(TreeError::MissingName { path }),
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(TreeError::InvalidName {
                path: format!("{}.name", path),
            })
        }
    };

    let children = match object.get("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| node_from_value(item, format!("{}.children[{}]", path, i), depth + 1))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(TreeError::InvalidChildren {
                path: format!("{}.children", path),
            })
        }
    };

    Ok(TreeNode { name, children })
}

/// Flat form of a tree node: one line of a `.jsonl` tree file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u64,
    #[serde(default)]
    pub parent_id: Option<u64>,
    pub name: String,
}
