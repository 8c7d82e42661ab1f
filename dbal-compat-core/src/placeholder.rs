//! Placeholder compilation.
//!
//! SQL handed to the connection may use `:name` and `?` markers. sqlx only
//! understands the driver's own positional syntax, so the text is split into
//! literal segments and parameter markers once, then rendered per platform.

use crate::platform::Platform;
use crate::value::{BoundParameter, ParamKey, Value};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Param(ParamKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Quoted(char),
    LineComment,
    BlockComment,
}

/// SQL text split into literal text and parameter markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSql {
    segments: Vec<Segment>,
}

impl CompiledSql {
    /// Find `:name` and `?` markers outside of quoted strings, quoted
    /// identifiers and comments.
    ///
    /// Inside string literals a backslash escapes the next character only on
    /// platforms that escape that way. `?` markers are numbered from 1 in order
    /// of appearance. `::` casts are left alone.
    pub fn parse(sql: &str, platform: &dyn Platform) -> Self {
        let backslash_escapes = platform.backslash_escapes();
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut positional = 0;
        let mut state = State::Normal;
        let mut chars = sql.chars().peekable();

        while let Some(ch) = chars.next() {
            match state {
                State::Quoted(quote) => {
                    text.push(ch);
                    if ch == '\\' && backslash_escapes && quote != '`' {
                        if let Some(escaped) = chars.next() {
                            text.push(escaped);
                        }
                    } else if ch == quote {
                        state = State::Normal;
                    }
                }
                State::LineComment => {
                    text.push(ch);
                    if ch == '\n' {
                        state = State::Normal;
                    }
                }
                State::BlockComment => {
                    text.push(ch);
                    if ch == '*' && chars.peek() == Some(&'/') {
                        text.push('/');
                        chars.next();
                        state = State::Normal;
                    }
                }
                State::Normal => match ch {
                    '\'' | '"' | '`' => {
                        text.push(ch);
                        state = State::Quoted(ch);
                    }
                    '-' if chars.peek() == Some(&'-') => {
                        text.push_str("--");
                        chars.next();
                        state = State::LineComment;
                    }
                    '/' if chars.peek() == Some(&'*') => {
                        text.push_str("/*");
                        chars.next();
                        state = State::BlockComment;
                    }
                    ':' if chars.peek() == Some(&':') => {
                        text.push_str("::");
                        chars.next();
                    }
                    ':' if chars
                        .peek()
                        .is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_') =>
                    {
                        let mut name = String::from(":");
                        while let Some(&c) = chars.peek() {
                            if c.is_ascii_alphanumeric() || c == '_' {
                                name.push(c);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                        segments.push(Segment::Param(ParamKey::Named(name)));
                    }
                    '?' => {
                        positional += 1;
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                        segments.push(Segment::Param(ParamKey::Positional(positional)));
                    }
                    _ => text.push(ch),
                },
            }
        }
        segments.push(Segment::Text(text));
        segments.retain(|s| !matches!(s, Segment::Text(t) if t.is_empty()));

        Self { segments }
    }

    /// Parameter markers in order of appearance; a repeated name appears twice
    pub fn keys(&self) -> Vec<&ParamKey> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(key) => Some(key),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Render with the platform's native placeholders
    pub fn render(&self, platform: &dyn Platform) -> String {
        let mut sql = String::new();
        let mut position = 0;
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => sql.push_str(text),
                Segment::Param(_) => {
                    position += 1;
                    sql.push_str(&platform.placeholder(position));
                }
            }
        }
        sql
    }

    /// Values in marker order. Every marker needs a bound value.
    pub fn arrange(&self, params: &[BoundParameter]) -> Result<Vec<Value>> {
        self.keys()
            .into_iter()
            .map(|key| {
                params
                    .iter()
                    .find(|p| &p.key == key)
                    .map(|p| p.value.clone())
                    .ok_or_else(|| {
                        Error::invalid_argument(format!("No value bound for parameter {key}"))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MySqlPlatform, PostgresPlatform, SqlitePlatform};

    #[test]
    fn test_named_markers() {
        let compiled = CompiledSql::parse(
            "SELECT * FROM pages WHERE pid = :pid AND uid = :uid",
            &MySqlPlatform,
        );
        assert_eq!(
            compiled.keys(),
            vec![
                &ParamKey::Named(":pid".to_string()),
                &ParamKey::Named(":uid".to_string())
            ]
        );
        assert_eq!(
            compiled.render(&MySqlPlatform),
            "SELECT * FROM pages WHERE pid = ? AND uid = ?"
        );
        assert_eq!(
            compiled.render(&PostgresPlatform),
            "SELECT * FROM pages WHERE pid = $1 AND uid = $2"
        );
    }

    #[test]
    fn test_positional_markers() {
        let compiled = CompiledSql::parse("UPDATE t SET a = ? WHERE b = ?", &SqlitePlatform);
        assert_eq!(
            compiled.keys(),
            vec![&ParamKey::Positional(1), &ParamKey::Positional(2)]
        );
    }

    #[test]
    fn test_quoted_text_is_skipped() {
        let compiled = CompiledSql::parse(
            "SELECT ':no', \"a?b\", `c:d`, 'it\\'s :x' FROM t WHERE a = :yes",
            &MySqlPlatform,
        );
        assert_eq!(compiled.keys(), vec![&ParamKey::Named(":yes".to_string())]);
        assert_eq!(
            compiled.render(&MySqlPlatform),
            "SELECT ':no', \"a?b\", `c:d`, 'it\\'s :x' FROM t WHERE a = ?"
        );
    }

    #[test]
    fn test_casts_and_lone_colons() {
        let compiled = CompiledSql::parse("SELECT a::text, 'x' || : FROM t", &PostgresPlatform);
        assert!(compiled.keys().is_empty());
        assert_eq!(compiled.render(&PostgresPlatform), "SELECT a::text, 'x' || : FROM t");
    }

    #[test]
    fn test_arrange_repeats_named_values() {
        let compiled = CompiledSql::parse("SELECT :a, :b, :a", &SqlitePlatform);
        let params = vec![
            BoundParameter::auto(ParamKey::from(":b"), Value::from(2)),
            BoundParameter::auto(ParamKey::from(":a"), Value::from(1)),
        ];
        assert_eq!(
            compiled.arrange(&params).unwrap(),
            vec![Value::I32(1), Value::I32(2), Value::I32(1)]
        );
    }

    #[test]
    fn test_arrange_missing_value() {
        let compiled = CompiledSql::parse("SELECT ?", &SqlitePlatform);
        let err = compiled.arrange(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: No value bound for parameter 1");
    }

    #[test]
    fn test_trailing_backslash_closes_literal_without_backslash_escapes() {
        let sql = r"UPDATE t SET path = 'C:\' WHERE uid = :placeholder1";
        let compiled = CompiledSql::parse(sql, &SqlitePlatform);
        assert_eq!(
            compiled.keys(),
            vec![&ParamKey::Named(":placeholder1".to_string())]
        );
        assert_eq!(
            compiled.render(&SqlitePlatform),
            r"UPDATE t SET path = 'C:\' WHERE uid = ?"
        );

        let compiled = CompiledSql::parse(r"SELECT 'C:\' || :a", &PostgresPlatform);
        assert_eq!(compiled.render(&PostgresPlatform), r"SELECT 'C:\' || $1");
    }

    #[test]
    fn test_backslash_escape_on_mysql() {
        let compiled = CompiledSql::parse(r"SELECT 'C:\\', 'it\'s :x', :a", &MySqlPlatform);
        assert_eq!(compiled.keys(), vec![&ParamKey::Named(":a".to_string())]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let compiled = CompiledSql::parse(
            "SELECT uid -- don't :skip ?\nFROM t /* it's :skipped ? */ WHERE a = :a",
            &SqlitePlatform,
        );
        assert_eq!(compiled.keys(), vec![&ParamKey::Named(":a".to_string())]);
        assert_eq!(
            compiled.render(&SqlitePlatform),
            "SELECT uid -- don't :skip ?\nFROM t /* it's :skipped ? */ WHERE a = ?"
        );
    }

    #[test]
    fn test_doubled_quotes_stay_inside_literal() {
        let compiled = CompiledSql::parse("SELECT 'O''Reily :x', :a", &SqlitePlatform);
        assert_eq!(compiled.keys(), vec![&ParamKey::Named(":a".to_string())]);
    }
}
