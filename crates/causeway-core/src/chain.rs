//! Chain walker: bounded, cycle-safe traversal of cause links.
//!
//! [`ErrorValue`] owns its cause, so its chains are acyclic by construction.
//! Foreign `std::error::Error` types can return themselves, or each other,
//! from `source()`; the identity guard below is what keeps those walks finite.

use std::error::Error;

use crate::types::ErrorValue;

/// Maximum number of nodes produced by a walk.
pub const MAX_CHAIN_DEPTH: usize = 10;

/// A node that may point at the node that caused it.
pub trait CauseLink {
    fn cause_link(&self) -> Option<&Self>;
}

impl CauseLink for ErrorValue {
    fn cause_link(&self) -> Option<&Self> {
        self.cause()
    }
}

impl CauseLink for dyn Error + 'static {
    fn cause_link(&self) -> Option<&Self> {
        self.source()
    }
}

/// Walk from `root` along cause links, at most [`MAX_CHAIN_DEPTH`] nodes.
pub fn walk<T: CauseLink + ?Sized>(root: &T) -> Vec<&T> {
    walk_with_depth(root, MAX_CHAIN_DEPTH)
}

/// Walk from `root` along cause links, at most `max_depth` nodes (minimum 1).
///
/// Stops at the first of: no further cause, `max_depth` reached, or a node
/// that is already in the sequence.
pub fn walk_with_depth<T: CauseLink + ?Sized>(root: &T, max_depth: usize) -> Vec<&T> {
    let max_depth = max_depth.max(1);
    let mut chain = vec![root];
    let mut current = root;
    while chain.len() < max_depth {
        let Some(next) = current.cause_link() else {
            break;
        };
        if chain.iter().any(|seen| same_node(*seen, next)) {
            break;
        }
        chain.push(next);
        current = next;
    }
    chain
}

/// Last node of [`walk`].
pub fn root_cause<T: CauseLink + ?Sized>(root: &T) -> &T {
    walk(root).last().copied().unwrap_or(root)
}

fn same_node<T: ?Sized>(a: &T, b: &T) -> bool {
    std::ptr::eq((a as *const T).cast::<()>(), (b as *const T).cast::<()>())
}
