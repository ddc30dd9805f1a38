//! Errors raised while validating tree input or laying it out.

use thiserror::Error;

/// Validation and layout failures reported by the tree card.
///
/// Paths use a dotted notation rooted at `$`, e.g. `$.children[1].name`.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: expected an object")]
    NotAnObject { path: String },

    #[error("{path}: missing \"name\"")]
    MissingName { path: String },

    #[error("{path}: \"name\" must be a string")]
    InvalidName { path: String },

    #[error("{path}: \"children\" must be an array or null")]
    InvalidChildren { path: String },

    #[error("tree is deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("duplicate record id {0}")]
    DuplicateRecord(u64),

    #[error("record {id} references unknown parent {parent_id}")]
    UnknownParent { id: u64, parent_id: u64 },

    #[error("records contain no root")]
    NoRoot,

    #[error("records contain more than one root ({first} and {second})")]
    MultipleRoots { first: u64, second: u64 },

    #[error("records form a cycle through id {0}")]
    Cycle(u64),

    #[error("unknown node id {0}")]
    UnknownNode(usize),

    #[error("nothing has been rendered yet")]
    NotRendered,

    #[error("layout produced a non-finite position for node {0}")]
    NonFinite(usize),
}

/// A renderer configuration that cannot be laid out.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("width {width} leaves no room between margins left {left} and right {right}")]
    TooNarrow { width: f32, left: f32, right: f32 },

    #[error("\"{0}\" must be a finite, non-negative number")]
    NotFinite(&'static str),
}
