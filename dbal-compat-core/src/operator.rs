//! SQL comparison operators used by the expression builder

use std::fmt::{self, Display};

/// SQL operator rendered between two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator(&'static str);

impl Operator {
    pub const EQ: Self = Operator("=");
    pub const NEQ: Self = Operator("<>");
    pub const LT: Self = Operator("<");
    pub const LTE: Self = Operator("<=");
    pub const GT: Self = Operator(">");
    pub const GTE: Self = Operator(">=");
    pub const LIKE: Self = Operator("LIKE");
    pub const NOT_LIKE: Self = Operator("NOT LIKE");
    pub const IN: Self = Operator("IN");
    pub const NOT_IN: Self = Operator("NOT IN");

    /// Create a custom operator for database-specific comparisons
    ///
    /// # Examples
    /// ```
    /// use dbal_compat_core::Operator;
    ///
    /// // MySQL null-safe equality
    /// let null_safe = Operator::custom("<=>");
    /// assert_eq!(null_safe.as_str(), "<=>");
    /// ```
    pub const fn custom(op: &'static str) -> Self {
        Operator(op)
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Render `x OP y`
    pub fn apply(&self, x: &str, y: &str) -> String {
        format!("{} {} {}", x, self.0, y)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
