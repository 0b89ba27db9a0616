//! Ordered parameter storage for one statement build.

use crate::value::Value;

/// Bound values in the order their placeholders appear in the SQL text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        self.params.push(value.into());
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Borrow the values in order.
    pub fn as_slice(&self) -> &[Value] {
        &self.params
    }

    /// Extend this list with another list's parameters.
    pub fn extend(&mut self, other: &ParamList) {
        self.params.extend(other.params.iter().cloned());
    }

    /// Move all parameters out, leaving the list empty.
    pub fn take(&mut self) -> ParamList {
        std::mem::take(self)
    }

    /// Clear all parameters.
    pub fn clear(&mut self) {
        self.params.clear();
    }

    /// Consume the list into its values.
    pub fn into_vec(self) -> Vec<Value> {
        self.params
    }
}

impl From<Vec<Value>> for ParamList {
    fn from(params: Vec<Value>) -> Self {
        Self { params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_one_based_index() {
        let mut params = ParamList::new();
        assert_eq!(params.push(1), 1);
        assert_eq!(params.push("a"), 2);
        assert_eq!(params.as_slice(), &[Value::Int(1), Value::text("a")]);
    }

    #[test]
    fn take_leaves_list_empty() {
        let mut params = ParamList::new();
        params.push(1);
        let taken = params.take();
        assert!(params.is_empty());
        assert_eq!(taken.len(), 1);
    }
}
