//! Decision variable handles and domains.

/// Handle to a variable inside one [`SelectionModel`](super::SelectionModel).
///
/// Ids are dense indices assigned in declaration order; a handle is only
/// meaningful for the model that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of this variable in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A variable with an integer domain `[lo, hi]`.
///
/// Boolean variables are integer variables with domain `[0, 1]`; the flag
/// marks them as branching candidates for the reference solver.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Variable name (diagnostics only, not required to be unique).
    pub name: String,
    /// Minimum value.
    pub lo: i64,
    /// Maximum value.
    pub hi: i64,
    /// Whether this was declared as a boolean decision variable.
    pub is_bool: bool,
}
