//! Errors returned by fallible tree operations.
//!
//! A missing key is not an error; lookups report it as `None`.

use thiserror::Error;

/// An error from an operation whose precondition did not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RbTreeError {
    /// The operation needs at least one node, but the tree is empty.
    #[error("tree is empty")]
    EmptyTree,
    /// [`RbTree::try_insert`](crate::RbTree::try_insert) was given a key that is already present.
    #[error("key is already present in the tree")]
    DuplicateKey,
}
