//! WHERE-clause fragments.
//!
//! [`Expression`] renders predicates as plain strings. Operands are inserted
//! exactly as given: quoting a literal, or binding it and passing the returned
//! placeholder, is up to the caller.

use std::fmt::{self, Display};
use std::sync::Arc;

use crate::platform::Platform;
use crate::{Error, Operator, Result};

/// Builder for WHERE-clause fragments of one connection
#[derive(Clone)]
pub struct Expression {
    platform: Arc<dyn Platform>,
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("platform", &self.platform.name())
            .finish()
    }
}

impl Expression {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }

    /// The dialect fragments are rendered for
    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    /// `x OP y` for an arbitrary operator
    pub fn comparison(&self, x: &str, op: Operator, y: impl Display) -> String {
        op.apply(x, &y.to_string())
    }

    pub fn eq(&self, x: &str, y: impl Display) -> String {
        self.comparison(x, Operator::EQ, y)
    }

    pub fn neq(&self, x: &str, y: impl Display) -> String {
        self.comparison(x, Operator::NEQ, y)
    }

    pub fn lt(&self, x: &str, y: impl Display) -> String {
        self.comparison(x, Operator::LT, y)
    }

    pub fn lte(&self, x: &str, y: impl Display) -> String {
        self.comparison(x, Operator::LTE, y)
    }

    pub fn gt(&self, x: &str, y: impl Display) -> String {
        self.comparison(x, Operator::GT, y)
    }

    pub fn gte(&self, x: &str, y: impl Display) -> String {
        self.comparison(x, Operator::GTE, y)
    }

    pub fn like(&self, column: &str, pattern: impl Display) -> String {
        self.comparison(column, Operator::LIKE, pattern)
    }

    pub fn not_like(&self, column: &str, pattern: impl Display) -> String {
        self.comparison(column, Operator::NOT_LIKE, pattern)
    }

    pub fn is_null(&self, column: &str) -> String {
        format!("{column} IS NULL")
    }

    pub fn is_not_null(&self, column: &str) -> String {
        format!("{column} IS NOT NULL")
    }

    /// `column IN (v1, v2, ...)`, values in the given order and unquoted
    ///
    /// # Examples
    /// ```
    /// use dbal_compat_core::{Expression, MySqlPlatform};
    /// use std::sync::Arc;
    ///
    /// let expr = Expression::new(Arc::new(MySqlPlatform));
    /// assert_eq!(expr.in_("pid", [1, 2, 3]), "pid IN (1, 2, 3)");
    /// ```
    pub fn in_<I>(&self, column: &str, values: I) -> String
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.comparison(column, Operator::IN, Self::value_list(values))
    }

    pub fn not_in<I>(&self, column: &str, values: I) -> String
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.comparison(column, Operator::NOT_IN, Self::value_list(values))
    }

    fn value_list<I>(values: I) -> String
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let items: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        format!("({})", items.join(", "))
    }

    /// Conjunction of the given constraints.
    ///
    /// A single constraint is returned as is. Two or more are each wrapped in
    /// parentheses and joined with `AND`. Empty constraints are skipped.
    pub fn and_x(&self, constraints: impl IntoConstraints) -> String {
        composite("AND", constraints.into_constraints())
    }

    /// Disjunction of the given constraints, same shape rules as [`Expression::and_x`]
    pub fn or_x(&self, constraints: impl IntoConstraints) -> String {
        composite("OR", constraints.into_constraints())
    }

    pub fn logical_and(&self, constraints: impl IntoConstraints) -> String {
        self.and_x(constraints)
    }

    pub fn logical_or(&self, constraints: impl IntoConstraints) -> String {
        self.or_x(constraints)
    }

    pub fn logical_not(&self, constraint: &str) -> String {
        format!("NOT ({constraint})")
    }

    pub fn lower(&self, value: &str) -> String {
        self.platform.lower_expression(value)
    }

    pub fn upper(&self, value: &str) -> String {
        self.platform.upper_expression(value)
    }

    /// `FIND_IN_SET('value','field')` with both arguments quoted as strings.
    ///
    /// `value` must not contain a comma since FIND_IN_SET cannot tell a comma
    /// inside a member from the list separator.
    pub fn find_in_set(&self, field: &str, value: &str) -> Result<String> {
        if value.contains(',') {
            return Err(Error::invalid_argument(
                "FIND_IN_SET value must not contain a comma",
            ));
        }
        Ok(format!(
            "FIND_IN_SET({},{})",
            self.platform.quote_string(value),
            self.platform.quote_string(field)
        ))
    }
}

/// Render a composite constraint the way singleton-collapse requires
pub(crate) fn composite(keyword: &str, parts: Vec<String>) -> String {
    let parts: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
    match parts.len() {
        0 => String::new(),
        1 => parts.into_iter().next().unwrap_or_default(),
        _ => format!("({})", parts.join(&format!(") {keyword} ("))),
    }
}

/// Anything that can stand for a list of constraints: one fragment, or a
/// sequence of fragments
pub trait IntoConstraints {
    fn into_constraints(self) -> Vec<String>;
}

impl IntoConstraints for &str {
    fn into_constraints(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoConstraints for String {
    fn into_constraints(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoConstraints for &String {
    fn into_constraints(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<T: Into<String>> IntoConstraints for Vec<T> {
    fn into_constraints(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<String>, const N: usize> IntoConstraints for [T; N] {
    fn into_constraints(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Clone + Into<String>> IntoConstraints for &[T] {
    fn into_constraints(self) -> Vec<String> {
        self.iter().cloned().map(Into::into).collect()
    }
}

macro_rules! impl_into_constraints_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: Into<String>),+> IntoConstraints for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_constraints(self) -> Vec<String> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

impl_into_constraints_for_tuple!(A, B);
impl_into_constraints_for_tuple!(A, B, C);
impl_into_constraints_for_tuple!(A, B, C, D);
impl_into_constraints_for_tuple!(A, B, C, D, E);
impl_into_constraints_for_tuple!(A, B, C, D, E, F);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MySqlPlatform, SqlitePlatform};

    fn expr() -> Expression {
        Expression::new(Arc::new(MySqlPlatform))
    }

    #[test]
    fn test_comparisons() {
        let e = expr();
        assert_eq!(e.eq("aField", 1), "aField = 1");
        assert_eq!(e.neq("aField", 1), "aField <> 1");
        assert_eq!(e.lt("aField", 1), "aField < 1");
        assert_eq!(e.lte("aField", 1), "aField <= 1");
        assert_eq!(e.gt("aField", 1), "aField > 1");
        assert_eq!(e.gte("aField", 1), "aField >= 1");
        assert_eq!(e.eq("pid", ":placeholder1"), "pid = :placeholder1");
    }

    #[test]
    fn test_null_checks() {
        let e = expr();
        assert_eq!(e.is_null("deleted"), "deleted IS NULL");
        assert_eq!(e.is_not_null("deleted"), "deleted IS NOT NULL");
    }

    #[test]
    fn test_like() {
        let e = expr();
        assert_eq!(e.like("title", "'%foo%'"), "title LIKE '%foo%'");
        assert_eq!(e.not_like("title", "'%foo%'"), "title NOT LIKE '%foo%'");
    }

    #[test]
    fn test_in_and_not_in() {
        let e = expr();
        assert_eq!(e.in_("p", [1, 2, 3]), "p IN (1, 2, 3)");
        assert_eq!(e.not_in("p", vec![1, 2, 3]), "p NOT IN (1, 2, 3)");
        assert_eq!(e.in_("ctype", ["'text'", "'image'"]), "ctype IN ('text', 'image')");
    }

    #[test]
    fn test_logical_and_singleton_is_returned_unchanged() {
        let e = expr();
        assert_eq!(e.logical_and("a = 1"), "a = 1");
        assert_eq!(e.logical_and(vec!["a = 1"]), "a = 1");
        assert_eq!(e.logical_or(["a = 1"]), "a = 1");
    }

    #[test]
    fn test_logical_combinators_wrap_each_part() {
        let e = expr();
        assert_eq!(
            e.logical_and(("a = 1", "b = 2")),
            "(a = 1) AND (b = 2)"
        );
        assert_eq!(
            e.logical_or(vec!["a = 1", "b = 2", "c = 3"]),
            "(a = 1) OR (b = 2) OR (c = 3)"
        );
        let nested = e.logical_or((e.lt("a", 5), e.eq("b", "y")));
        assert_eq!(nested, "(a < 5) OR (b = y)");
    }

    #[test]
    fn test_logical_combinators_skip_empty_parts() {
        let e = expr();
        assert_eq!(e.logical_and(vec!["a = 1", "", "b = 2"]), "(a = 1) AND (b = 2)");
        assert_eq!(e.logical_and(vec!["", "b = 2"]), "b = 2");
        assert_eq!(e.logical_or(Vec::<String>::new()), "");
    }

    #[test]
    fn test_logical_not() {
        assert_eq!(expr().logical_not("a = 1"), "NOT (a = 1)");
    }

    #[test]
    fn test_case_folding_delegates_to_platform() {
        let e = expr();
        assert_eq!(e.lower("title"), "LOWER(title)");
        assert_eq!(e.upper("title"), "UPPER(title)");
    }

    #[test]
    fn test_find_in_set() {
        let e = expr();
        assert_eq!(
            e.find_in_set("54,53,23,42", "treelist").unwrap(),
            "FIND_IN_SET('treelist','54,53,23,42')"
        );
        let e = Expression::new(Arc::new(SqlitePlatform));
        assert_eq!(
            e.find_in_set("tags", "it's").unwrap(),
            "FIND_IN_SET('it''s','tags')"
        );
    }

    #[test]
    fn test_find_in_set_rejects_comma() {
        let err = expr().find_in_set("treelist", "1,2").unwrap_err();
        assert_eq!(
            err.query_kind(),
            Some(crate::QueryErrorKind::InvalidArgument)
        );
    }
}
