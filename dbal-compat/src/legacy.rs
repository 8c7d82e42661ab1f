//! Legacy call shapes on top of the statement builders.
//!
//! [`LegacyDatabase`] keeps the old "table, where, fields" style API for code
//! that builds its SQL from strings. Field values are quoted as string
//! literals unless the field is listed as a no-quote field; WHERE, GROUP BY,
//! ORDER BY and LIMIT parts are raw SQL and are passed through untouched.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use dbal_compat_core::executor::Driver;
use dbal_compat_core::{
    ColumnInfo, Connection, Error, ExecutableModification, FetchMode, FetchedRow, IndexInfo,
    ParamKey, PreparedStatement, QueryBuilder, Result, Value,
};

/// The parts of a legacy SELECT. Empty clauses are left out when rendering.
///
/// # Examples
/// ```
/// use dbal_compat::legacy::SelectParts;
///
/// let parts = SelectParts::new("uid, title", "pages")
///     .where_clause("deleted = 0")
///     .order_by("sorting")
///     .limit("10");
/// assert_eq!(
///     parts.to_sql(),
///     "SELECT uid, title FROM pages WHERE deleted = 0 ORDER BY sorting LIMIT 10"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectParts<'a> {
    pub fields: &'a str,
    pub from: &'a str,
    pub where_clause: &'a str,
    pub group_by: &'a str,
    pub order_by: &'a str,
    pub limit: &'a str,
}

impl<'a> SelectParts<'a> {
    pub fn new(fields: &'a str, from: &'a str) -> Self {
        Self {
            fields,
            from,
            ..Self::default()
        }
    }

    pub fn where_clause(mut self, where_clause: &'a str) -> Self {
        self.where_clause = where_clause;
        self
    }

    pub fn group_by(mut self, group_by: &'a str) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn order_by(mut self, order_by: &'a str) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn limit(mut self, limit: &'a str) -> Self {
        self.limit = limit;
        self
    }

    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.fields, self.from);
        for (keyword, part) in [
            ("WHERE", self.where_clause),
            ("GROUP BY", self.group_by),
            ("ORDER BY", self.order_by),
            ("LIMIT", self.limit),
        ] {
            if !part.is_empty() {
                sql.push(' ');
                sql.push_str(keyword);
                sql.push(' ');
                sql.push_str(part);
            }
        }
        sql
    }
}

/// A trailing clause string split into its parts by
/// [`LegacyDatabase::split_group_order_limit`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClauseParts {
    /// Everything before GROUP BY, with its leading space
    pub where_clause: String,
    pub group_by: String,
    pub order_by: String,
    pub limit: String,
}

/// A SELECT stored as a query-parts record, keyed `SELECT`, `FROM`, `WHERE`,
/// `GROUPBY`, `ORDERBY` and `LIMIT`. Missing keys deserialize as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParts {
    #[serde(rename = "SELECT")]
    pub select: String,
    #[serde(rename = "FROM")]
    pub from: String,
    #[serde(rename = "WHERE")]
    pub where_clause: String,
    #[serde(rename = "GROUPBY")]
    pub group_by: String,
    #[serde(rename = "ORDERBY")]
    pub order_by: String,
    #[serde(rename = "LIMIT")]
    pub limit: String,
}

impl QueryParts {
    pub fn as_select(&self) -> SelectParts<'_> {
        SelectParts {
            fields: &self.select,
            from: &self.from,
            where_clause: &self.where_clause,
            group_by: &self.group_by,
            order_by: &self.order_by,
            limit: &self.limit,
        }
    }
}

/// Tables of a many-to-many relation select.
///
/// Rows are joined on `local.uid = mm.uid_local` and
/// `foreign.uid = mm.uid_foreign`; either outer table may be left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MmTables<'a> {
    pub local: &'a str,
    pub mm: &'a str,
    pub foreign: &'a str,
}

impl<'a> MmTables<'a> {
    pub fn new(local: &'a str, mm: &'a str, foreign: &'a str) -> Self {
        Self { local, mm, foreign }
    }

    /// FROM list and join condition. A foreign table equal to the local one
    /// is aliased as `<table>_join`.
    fn from_and_join(&self) -> (String, String) {
        let mut from = String::new();
        let mut join = String::new();
        if !self.local.is_empty() {
            from.push_str(self.local);
            from.push(',');
            join.push_str(&format!("{}.uid={}.uid_local", self.local, self.mm));
        }
        from.push_str(self.mm);

        if !self.foreign.is_empty() {
            if !self.local.is_empty() {
                join.push_str(" AND ");
            }
            if self.foreign == self.local {
                let alias = format!("{}_join", self.foreign);
                join.push_str(&format!("{alias}.uid={}.uid_foreign", self.mm));
                from.push_str(&format!(",{} AS {alias}", self.foreign));
            } else {
                join.push_str(&format!("{}.uid={}.uid_foreign", self.foreign, self.mm));
                from.push(',');
                from.push_str(self.foreign);
            }
        }
        (from, join)
    }
}

/// How [`LegacyDatabase::search_query`] combines the per-word conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchConstraint {
    #[default]
    And,
    Or,
}

impl SearchConstraint {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchConstraint::And => "AND",
            SearchConstraint::Or => "OR",
        }
    }
}

/// Legacy database API over a [`Connection`]
#[derive(Debug, Clone)]
pub struct LegacyDatabase<D: Driver> {
    connection: Connection<D>,
}

impl<D: Driver> LegacyDatabase<D> {
    pub fn new(connection: Connection<D>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection<D> {
        &self.connection
    }

    /// Id generated by the most recent INSERT, if the backend reported one
    pub fn sql_insert_id(&self) -> Option<i64> {
        self.connection.last_insert_id()
    }

    /// Text of the last query built or executed, when the configuration keeps it
    pub fn debug_last_built_query(&self) -> Option<String> {
        self.connection.last_statement()
    }

    /// INSERT statement text for one row
    pub fn insert_query<I, K, V>(
        &self,
        table: &str,
        fields: I,
        no_quote_fields: &[&str],
    ) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let sql = self.build_insert(table, fields, no_quote_fields)?.to_sql()?;
        self.connection.remember_statement(&sql);
        Ok(sql)
    }

    /// INSERT statement text for many rows; `None` when there are no rows
    pub fn insert_multiple_rows<R, V>(
        &self,
        table: &str,
        fields: &[&str],
        rows: R,
        no_quote_fields: &[&str],
    ) -> Result<Option<String>>
    where
        R: IntoIterator<Item = Vec<V>>,
        V: Into<Value>,
    {
        let no_quote = no_quote_list(no_quote_fields);
        let mut tuples = Vec::new();
        for row in rows {
            let row: Vec<Value> = row.into_iter().map(Into::into).collect();
            if row.len() != fields.len() {
                return Err(Error::arity_mismatch("INSERT", fields.len(), row.len()));
            }
            let quoted: Vec<String> = fields
                .iter()
                .zip(&row)
                .map(|(field, value)| self.quote_field(field, value, &no_quote, true))
                .collect();
            tuples.push(format!("({})", quoted.join(", ")));
        }
        if tuples.is_empty() {
            return Ok(None);
        }

        // Validates the table the same way the single-row builder does
        let table = self.connection.insert_query().insert_into(table)?;
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            table.table().unwrap_or_default(),
            fields.join(", "),
            tuples.join(", ")
        );
        self.connection.remember_statement(&sql);
        Ok(Some(sql))
    }

    /// UPDATE statement text; an empty `where_clause` updates every row
    pub fn update_query<I, K, V>(
        &self,
        table: &str,
        where_clause: &str,
        fields: I,
        no_quote_fields: &[&str],
    ) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let sql = self
            .build_update(table, where_clause, fields, no_quote_fields)?
            .to_sql()?;
        self.connection.remember_statement(&sql);
        Ok(sql)
    }

    /// DELETE statement text; an empty `where_clause` deletes every row
    pub fn delete_query(&self, table: &str, where_clause: &str) -> Result<String> {
        let sql = self.build_delete(table, where_clause)?.to_sql()?;
        self.connection.remember_statement(&sql);
        Ok(sql)
    }

    pub fn truncate_query(&self, table: &str) -> Result<String> {
        let sql = self.connection.truncate_query().truncate(table)?.to_sql()?;
        self.connection.remember_statement(&sql);
        Ok(sql)
    }

    pub fn select_query(&self, parts: SelectParts<'_>) -> String {
        let sql = parts.to_sql();
        self.connection.remember_statement(&sql);
        sql
    }

    /// SELECT text for use as a subquery inside another statement
    pub fn select_subquery(&self, fields: &str, from: &str, where_clause: &str) -> String {
        self.select_query(SelectParts::new(fields, from).where_clause(where_clause))
    }

    /// SELECT over a many-to-many relation. `clauses.where_clause` is appended
    /// after the join condition as given, so it starts with `AND` when used.
    pub fn select_mm_query(
        &self,
        fields: &str,
        tables: MmTables<'_>,
        clauses: &ClauseParts,
    ) -> String {
        let (from, join) = tables.from_and_join();
        let where_clause = format!("{join} {}", clauses.where_clause);
        self.select_query(mm_select(fields, &from, where_clause.trim_end(), clauses))
    }

    /// Insert one row and return the affected row count
    pub async fn exec_insert_query<I, K, V>(
        &self,
        table: &str,
        fields: I,
        no_quote_fields: &[&str],
    ) -> Result<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut query = self.build_insert(table, fields, no_quote_fields)?;
        query.execute(&self.connection).await
    }

    /// Insert many rows; zero rows executes nothing and affects nothing
    pub async fn exec_insert_multiple_rows<R, V>(
        &self,
        table: &str,
        fields: &[&str],
        rows: R,
        no_quote_fields: &[&str],
    ) -> Result<u64>
    where
        R: IntoIterator<Item = Vec<V>>,
        V: Into<Value>,
    {
        match self.insert_multiple_rows(table, fields, rows, no_quote_fields)? {
            Some(sql) => self.connection.execute_update(&sql, &[]).await,
            None => Ok(0),
        }
    }

    pub async fn exec_update_query<I, K, V>(
        &self,
        table: &str,
        where_clause: &str,
        fields: I,
        no_quote_fields: &[&str],
    ) -> Result<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut query = self.build_update(table, where_clause, fields, no_quote_fields)?;
        query.execute(&self.connection).await
    }

    pub async fn exec_delete_query(&self, table: &str, where_clause: &str) -> Result<u64> {
        let mut query = self.build_delete(table, where_clause)?;
        query.execute(&self.connection).await
    }

    pub async fn exec_truncate_query(&self, table: &str) -> Result<u64> {
        let mut query = self.connection.truncate_query().truncate(table)?;
        query.execute(&self.connection).await
    }

    /// Run a SELECT and hand back the executed statement for fetching
    pub async fn exec_select_query(&self, parts: SelectParts<'_>) -> Result<PreparedStatement<D>> {
        let mut statement = self.connection.prepare(&parts.to_sql())?;
        statement.execute().await?;
        Ok(statement)
    }

    /// Run a SELECT over a many-to-many relation, see [`Self::select_mm_query`]
    pub async fn exec_select_mm_query(
        &self,
        fields: &str,
        tables: MmTables<'_>,
        clauses: &ClauseParts,
    ) -> Result<PreparedStatement<D>> {
        let (from, join) = tables.from_and_join();
        let where_clause = format!("{join} {}", clauses.where_clause);
        self.exec_select_query(mm_select(fields, &from, where_clause.trim_end(), clauses))
            .await
    }

    /// Run a SELECT given as a query-parts record
    pub async fn exec_select_query_array(
        &self,
        parts: &QueryParts,
    ) -> Result<PreparedStatement<D>> {
        self.exec_select_query(parts.as_select()).await
    }

    /// All rows of a SELECT as column/value maps
    pub async fn exec_select_get_rows(&self, parts: SelectParts<'_>) -> Result<Vec<FetchedRow>> {
        let mut statement = self.exec_select_query(parts).await?;
        let rows = statement.fetch_all_with(FetchMode::Assoc);
        statement.free();
        Ok(rows)
    }

    /// All rows of a SELECT keyed by the text of `index_field`.
    ///
    /// A later row with the same key replaces the earlier one in place. Rows
    /// without the field are skipped.
    pub async fn exec_select_get_rows_by(
        &self,
        parts: SelectParts<'_>,
        index_field: &str,
    ) -> Result<Vec<(String, FetchedRow)>> {
        let rows = self.exec_select_get_rows(parts).await?;
        let mut indexed: Vec<(String, FetchedRow)> = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(key) = row.get(index_field).and_then(Value::as_text) else {
                tracing::warn!(
                    target: "dbal_compat",
                    index_field,
                    "row has no value for the index field, skipped"
                );
                continue;
            };
            match indexed.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = row,
                None => indexed.push((key, row)),
            }
        }
        Ok(indexed)
    }

    /// First row of a SELECT; the LIMIT of `parts` is replaced by 1
    pub async fn exec_select_get_single_row(
        &self,
        parts: SelectParts<'_>,
        numeric_index: bool,
    ) -> Result<Option<FetchedRow>> {
        let mut statement = self.exec_select_query(parts.limit("1")).await?;
        let mode = if numeric_index {
            FetchMode::Numeric
        } else {
            FetchMode::Assoc
        };
        let row = statement.fetch_with(mode);
        statement.free();
        Ok(row)
    }

    /// `COUNT(field)` over the rows matching `where_clause`
    pub async fn exec_select_count_rows(
        &self,
        field: &str,
        table: &str,
        where_clause: &str,
    ) -> Result<u64> {
        let count = format!("COUNT({field})");
        let row = self
            .exec_select_get_single_row(
                SelectParts::new(&count, table).where_clause(where_clause),
                true,
            )
            .await?;
        let count = row
            .as_ref()
            .and_then(|row| row.get_index(0))
            .map(|value| match value.as_i64() {
                Some(i) => i,
                None => value.as_text().map(|text| intval(&text)).unwrap_or(0),
            })
            .unwrap_or(0);
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Prepare a SELECT and bind `input`, without executing it. Positional
    /// keys are 0-based, named keys look like `:name`.
    pub fn prepare_select_query<I, K, V>(
        &self,
        parts: SelectParts<'_>,
        input: I,
    ) -> Result<PreparedStatement<D>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ParamKey>,
        V: Into<Value>,
    {
        let mut statement = self.connection.prepare(&parts.to_sql())?;
        statement.bind_values(input)?;
        Ok(statement)
    }

    /// Prepare a SELECT given as a query-parts record, see
    /// [`Self::prepare_select_query`]
    pub fn prepare_select_query_array<I, K, V>(
        &self,
        parts: &QueryParts,
        input: I,
    ) -> Result<PreparedStatement<D>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ParamKey>,
        V: Into<Value>,
    {
        self.prepare_select_query(parts.as_select(), input)
    }

    /// Quote a string literal. `None` renders as `NULL` when `allow_null` is
    /// set and as an empty literal otherwise.
    pub fn full_quote_str(&self, value: Option<&str>, allow_null: bool) -> String {
        match value {
            Some(value) => self.connection.quote(value),
            None if allow_null => "NULL".to_string(),
            None => self.connection.quote(""),
        }
    }

    /// Quote every value except those of the fields in `no_quote_fields`.
    /// Entries of `no_quote_fields` may themselves be comma separated lists.
    pub fn full_quote_array<I, K, V>(
        &self,
        values: I,
        no_quote_fields: &[&str],
        allow_null: bool,
    ) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let no_quote = no_quote_list(no_quote_fields);
        values
            .into_iter()
            .map(|(field, value)| {
                let field = field.into();
                let quoted = self.quote_field(&field, &value.into(), &no_quote, allow_null);
                (field, quoted)
            })
            .collect()
    }

    /// Escape a string for use inside a literal, without the surrounding quotes
    pub fn quote_str(&self, value: &str) -> String {
        let quoted = self.connection.quote(value);
        quoted
            .strip_prefix('\'')
            .and_then(|inner| inner.strip_suffix('\''))
            .map(str::to_string)
            .unwrap_or(quoted)
    }

    /// Escape the LIKE wildcards `%` and `_`
    pub fn escape_str_for_like(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for ch in value.chars() {
            if ch == '%' || ch == '_' {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped
    }

    /// Integer value of every entry; text is read like a leading integer
    pub fn clean_int_array<I, V>(&self, values: I) -> Vec<i64>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        values.into_iter().map(|v| int_value(&v.into())).collect()
    }

    /// Comma separated list with every entry reduced to an integer
    pub fn clean_int_list(&self, list: &str) -> String {
        list.split(',')
            .map(|item| intval(item).to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Remove a leading `ORDER BY` keyword (repeated or not) from a clause
    pub fn strip_order_by(&self, clause: &str) -> String {
        strip_leading(order_by_regex(), clause)
    }

    /// Remove a leading `GROUP BY` keyword (repeated or not) from a clause
    pub fn strip_group_by(&self, clause: &str) -> String {
        strip_leading(group_by_regex(), clause)
    }

    /// Peel trailing LIMIT, ORDER BY and GROUP BY clauses off a WHERE clause
    pub fn split_group_order_limit(&self, clause: &str) -> ClauseParts {
        let mut rest = format!(" {clause}");
        let mut parts = ClauseParts::default();
        for (regex, target) in [
            (trailing_limit_regex(), &mut parts.limit),
            (trailing_order_by_regex(), &mut parts.order_by),
            (trailing_group_by_regex(), &mut parts.group_by),
        ] {
            let split = regex
                .captures(&rest)
                .map(|captures| (captures[1].to_string(), captures[2].trim().to_string()));
            if let Some((head, clause)) = split {
                *target = clause;
                rest = head;
            }
        }
        parts.where_clause = rest;
        parts
    }

    /// Condition matching rows whose comma separated `field` contains `value`
    pub fn list_query(&self, field: &str, value: &str) -> Result<String> {
        if value.contains(',') {
            return Err(Error::invalid_argument(
                "List items must not contain a comma",
            ));
        }
        Ok(format!("FIND_IN_SET('{}',{field})", self.quote_str(value)))
    }

    /// Condition matching rows where every word (or any word, for
    /// [`SearchConstraint::Or`]) occurs in one of `fields`
    pub fn search_query(
        &self,
        words: &[&str],
        fields: &[&str],
        table: &str,
        constraint: SearchConstraint,
    ) -> String {
        let parts: Vec<String> = words
            .iter()
            .map(|word| {
                let like = format!(
                    " LIKE '%{}%'",
                    self.quote_str(&self.escape_str_for_like(word))
                );
                fields
                    .iter()
                    .map(|field| format!("{table}.{field}{like}"))
                    .collect::<Vec<_>>()
                    .join(" OR ")
            })
            .collect();
        let separator = format!(") {} (", constraint.as_str());
        format!("({})", parts.join(separator.as_str()))
    }

    pub async fn admin_get_tables(&self) -> Result<Vec<String>> {
        self.connection.list_tables().await
    }

    pub async fn admin_get_fields(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.connection.list_columns(table).await
    }

    pub async fn admin_get_keys(&self, table: &str) -> Result<Vec<IndexInfo>> {
        self.connection.list_indexes(table).await
    }

    /// Execute raw SQL and return the affected row count
    pub async fn admin_query(&self, sql: &str) -> Result<u64> {
        self.connection.admin_query(sql).await
    }

    fn build_insert<I, K, V>(
        &self,
        table: &str,
        fields: I,
        no_quote_fields: &[&str],
    ) -> Result<dbal_compat_core::InsertQuery>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let values = self.full_quote_array(fields, no_quote_fields, true);
        Ok(self
            .connection
            .insert_query()
            .insert_into(table)?
            .values(values))
    }

    fn build_update<I, K, V>(
        &self,
        table: &str,
        where_clause: &str,
        fields: I,
        no_quote_fields: &[&str],
    ) -> Result<dbal_compat_core::UpdateQuery>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let values = self.full_quote_array(fields, no_quote_fields, true);
        let query = self.connection.update_query().update(table)?.set_all(values);
        if where_clause.trim().is_empty() {
            Ok(query)
        } else {
            query.where_(where_clause)
        }
    }

    fn build_delete(&self, table: &str, where_clause: &str) -> Result<dbal_compat_core::DeleteQuery> {
        let query = self.connection.delete_query().delete(table)?;
        if where_clause.trim().is_empty() {
            Ok(query)
        } else {
            query.where_(where_clause)
        }
    }

    fn quote_field(&self, field: &str, value: &Value, no_quote: &[String], allow_null: bool) -> String {
        if no_quote.iter().any(|name| name == field) {
            return value.as_text().unwrap_or_else(|| "NULL".to_string());
        }
        self.full_quote_str(value.as_text().as_deref(), allow_null)
    }
}

fn mm_select<'a>(
    fields: &'a str,
    from: &'a str,
    where_clause: &'a str,
    clauses: &'a ClauseParts,
) -> SelectParts<'a> {
    SelectParts::new(fields, from)
        .where_clause(where_clause)
        .group_by(&clauses.group_by)
        .order_by(&clauses.order_by)
        .limit(&clauses.limit)
}

fn no_quote_list(fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading integer of a string: optional sign and digits, anything else is 0
fn intval(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end].bytes().fold(0i64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
    });
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn int_value(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::F64(f) => f.trunc() as i64,
        other => other
            .as_i64()
            .unwrap_or_else(|| other.as_text().map(|text| intval(&text)).unwrap_or(0)),
    }
}

fn strip_leading(regex: &Regex, clause: &str) -> String {
    regex.replace(clause.trim(), "").into_owned()
}

fn order_by_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:ORDER\s*BY\s*)+").expect("valid regex"))
}

fn group_by_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:GROUP\s*BY\s*)+").expect("valid regex"))
}

fn trailing_limit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(.*)\s+LIMIT\s+([[:alnum:][:space:],._]+)$").expect("valid regex")
    })
}

fn trailing_order_by_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(.*)\s+ORDER\s+BY\s+([[:alnum:][:space:],._]+)$").expect("valid regex")
    })
}

fn trailing_group_by_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(.*)\s+GROUP\s+BY\s+([[:alnum:][:space:],._]+)$").expect("valid regex")
    })
}
