use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const ACTION_PULL: &str = "pull";
pub const ACTION_PUSH: &str = "push";
pub const ACTION_DELETE: &str = "delete";

/// The classified purpose of a registry request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Pull,
    Push,
    Delete,
}

impl Intent {
    /// Classify an action list.
    ///
    /// Matching is done on the set of distinct actions, so `["push", "pull"]`
    /// and `["pull", "push", "pull"]` are both a push. Returns `None` for any
    /// action set that is not exactly one of the three known shapes.
    pub fn classify<S: AsRef<str>>(actions: &[S]) -> Option<Intent> {
        let set: BTreeSet<&str> = actions.iter().map(|a| a.as_ref()).collect();
        let has = |action: &str| set.contains(action);

        match set.len() {
            1 if has(ACTION_PULL) => Some(Intent::Pull),
            2 if has(ACTION_PULL) && has(ACTION_PUSH) => Some(Intent::Push),
            2 if has(ACTION_PULL) && has(ACTION_DELETE) => Some(Intent::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Pull => "pull",
            Intent::Push => "push",
            Intent::Delete => "delete",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_single_pull() {
        assert_eq!(Intent::classify(&["pull"]), Some(Intent::Pull));
    }

    #[test]
    fn test_classify_ignores_order() {
        assert_eq!(Intent::classify(&["pull", "push"]), Some(Intent::Push));
        assert_eq!(Intent::classify(&["push", "pull"]), Some(Intent::Push));
        assert_eq!(Intent::classify(&["pull", "delete"]), Some(Intent::Delete));
        assert_eq!(Intent::classify(&["delete", "pull"]), Some(Intent::Delete));
    }

    #[test]
    fn test_classify_ignores_duplicates() {
        assert_eq!(Intent::classify(&["pull", "pull"]), Some(Intent::Pull));
        assert_eq!(
            Intent::classify(&["push", "pull", "push"]),
            Some(Intent::Push)
        );
    }

    #[test]
    fn test_classify_rejects_unknown_shapes() {
        let empty: [&str; 0] = [];
        assert_eq!(Intent::classify(&empty), None);
        assert_eq!(Intent::classify(&["push"]), None);
        assert_eq!(Intent::classify(&["delete"]), None);
        assert_eq!(Intent::classify(&["pull", "push", "delete"]), None);
        assert_eq!(Intent::classify(&["push", "delete"]), None);
        assert_eq!(Intent::classify(&["*"]), None);
        assert_eq!(Intent::classify(&["PULL"]), None);
    }
}
