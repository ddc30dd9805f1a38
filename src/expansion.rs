//! Initial expansion state of freshly laid out trees.

use serde::{Deserialize, Serialize};

/// Decides which nodes start expanded when a tree is rendered.
///
/// The root is always expanded regardless of the policy. The default,
/// `LabelLength(7)`, expands exactly the nodes whose label is seven
/// characters long, which is how the card has always opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpansionPolicy {
    /// Only the root is expanded.
    Collapsed,
    /// Every node is expanded.
    Expanded,
    /// Nodes shallower than the given depth are expanded.
    MaxDepth(usize),
    /// Nodes whose label has exactly this many characters are expanded.
    LabelLength(usize),
}

impl Default for ExpansionPolicy {
    fn default() -> Self {
        ExpansionPolicy::LabelLength(7)
    }
}

impl ExpansionPolicy {
    /// Returns true if a node at `depth` labelled `name` starts expanded.
    pub fn starts_expanded(&self, depth: usize, name: &str) -> bool {
        if depth == 0 {
            return true;
        }
        match *self {
            ExpansionPolicy::Collapsed => false,
            ExpansionPolicy::Expanded => true,
            ExpansionPolicy::MaxDepth(max) => depth < max,
            ExpansionPolicy::LabelLength(len) => name.chars().count() == len,
        }
    }

    /// Parses the command-line spelling of a policy.
    ///
    /// Accepts `collapsed`, `expanded`, `depth:N` and `label:N`.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "collapsed" => Some(ExpansionPolicy::Collapsed),
            "expanded" => Some(ExpansionPolicy::Expanded),
            _ => {
                let (kind, value) = text.split_once(':')?;
                let value: usize = value.parse().ok()?;
                match kind {
                    "depth" => Some(ExpansionPolicy::MaxDepth(value)),
                    "label" => Some(ExpansionPolicy::LabelLength(value)),
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_always_expanded() {
        assert!(ExpansionPolicy::Collapsed.starts_expanded(0, "Root"));
        assert!(ExpansionPolicy::LabelLength(7).starts_expanded(0, "x"));
    }

    #[test]
    fn test_label_length_counts_characters() {
        let policy = ExpansionPolicy::default();
        assert!(policy.starts_expanded(1, "Child 1"));
        assert!(policy.starts_expanded(3, "größere"));
        assert!(!policy.starts_expanded(1, "Child 10"));
        assert!(!policy.starts_expanded(1, "A"));
    }

    #[test]
    fn test_max_depth() {
        let policy = ExpansionPolicy::MaxDepth(2);
        assert!(policy.starts_expanded(1, "a"));
        assert!(!policy.starts_expanded(2, "a"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(ExpansionPolicy::parse("expanded"), Some(ExpansionPolicy::Expanded));
        assert_eq!(ExpansionPolicy::parse("depth:3"), Some(ExpansionPolicy::MaxDepth(3)));
        assert_eq!(ExpansionPolicy::parse("label:7"), Some(ExpansionPolicy::LabelLength(7)));
        assert_eq!(ExpansionPolicy::parse("depth:x"), None);
        assert_eq!(ExpansionPolicy::parse("wide"), None);
    }
}
