//! Canonical keys for stacks and duos.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::RoleSlot;

/// Number of tracked players that make up a stack.
pub const STACK_SIZE: usize = 5;

/// Identity of a group of players: their canonical names sorted and joined by `-`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StackKey(String);

impl StackKey {
    /// Build the key from names in any order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut sorted: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
        sorted.sort_unstable();
        Self(sorted.join("-"))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for StackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StackKey({})", self.0)
    }
}

/// Identity of an unordered pair of players.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DuoKey(String);

impl DuoKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{}-{}", first, second))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DuoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for DuoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DuoKey({})", self.0)
    }
}

/// Signature of the slots two players held together, e.g. `A#NA1-TOP:B#NA1-UTILITY`.
///
/// Both `name-slot` halves are sorted before joining, so the signature does
/// not depend on which player is considered first.
pub fn duo_role_signature(a: &str, a_slot: RoleSlot, b: &str, b_slot: RoleSlot) -> String {
    let left = format!("{}-{}", a, a_slot);
    let right = format!("{}-{}", b, b_slot);
    if left <= right {
        format!("{}:{}", left, right)
    } else {
        format!("{}:{}", right, left)
    }
}
