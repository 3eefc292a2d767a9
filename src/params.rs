// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The named-parameter compiler.
//!
//! A text-level rewriter that replaces `:name` placeholders with driver
//! placeholders and collects the bound values in order. Occurrences inside
//! single-quoted strings, double-quoted identifiers, dollar-quoted
//! strings, and comments are left alone, and the `::` cast operator is
//! never treated as a parameter.

use std::collections::HashMap;

use crate::cursor::CharCursor;
use crate::error::{Result, SqlError};

/// The target placeholder syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ... (PostgreSQL)
    PgIndexed,
    /// `?` (JDBC/ODBC style)
    Question,
}

/// The result of compiling named parameters: rewritten SQL, the positional
/// values, and the referenced names in order. A name referenced twice
/// binds twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery<V> {
    pub sql: String,
    pub values: Vec<V>,
    pub names: Vec<String>,
}

/// Rewrites `:name` placeholders in `sql` using `params` as the value
/// source.
///
/// Fails with [`MalformedInput`](crate::ErrorKind::MalformedInput) when a
/// referenced name has no value, or when the text references no named
/// parameter at all.
pub fn compile_named<V: Clone>(
    sql: &str,
    params: &HashMap<String, V>,
    style: PlaceholderStyle,
) -> Result<CompiledQuery<V>> {
    let mut cursor = CharCursor::new(sql);
    let mut out = String::with_capacity(sql.len());
    let mut values: Vec<V> = Vec::new();
    let mut names: Vec<String> = Vec::new();

    while let Some(ch) = cursor.peek() {
        match ch {
            '\'' => copy_quoted(&mut cursor, &mut out, '\''),
            '"' => copy_quoted(&mut cursor, &mut out, '"'),
            '-' if cursor.starts_with("--") => {
                out.push_str(&cursor.take_while(|ch| ch != '\n'));
            }
            '/' if cursor.starts_with("/*") => copy_block_comment(&mut cursor, &mut out),
            '$' => copy_dollar_quoted(&mut cursor, &mut out),
            ':' => {
                cursor.next();
                if cursor.consume(':') {
                    out.push_str("::");
                    continue;
                }
                if !cursor.peek().is_some_and(is_name_start) {
                    out.push(':');
                    continue;
                }
                let name = cursor.take_while(is_name_char);
                let Some(value) = params.get(&name) else {
                    return Err(SqlError::malformed(format!(
                        "no value bound for parameter :{name}"
                    )));
                };
                values.push(value.clone());
                names.push(name);
                match style {
                    PlaceholderStyle::PgIndexed => {
                        out.push('$');
                        out.push_str(&values.len().to_string());
                    }
                    PlaceholderStyle::Question => out.push('?'),
                }
            }
            _ => {
                cursor.next();
                out.push(ch);
            }
        }
    }

    if names.is_empty() {
        return Err(SqlError::malformed(
            "text references no named parameters",
        ));
    }
    Ok(CompiledQuery {
        sql: out,
        values,
        names,
    })
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Copies a quoted region verbatim, honoring doubled quotes and backslash
/// escapes.
fn copy_quoted(cursor: &mut CharCursor<'_>, out: &mut String, quote: char) {
    out.push(cursor.next().expect("caller saw the opening quote"));
    while let Some(ch) = cursor.next() {
        out.push(ch);
        if ch == '\\' {
            if let Some(escaped) = cursor.next() {
                out.push(escaped);
            }
        } else if ch == quote {
            if cursor.peek() == Some(quote) {
                out.push(cursor.next().unwrap());
            } else {
                break;
            }
        }
    }
}

fn copy_block_comment(cursor: &mut CharCursor<'_>, out: &mut String) {
    out.push(cursor.next().unwrap());
    out.push(cursor.next().unwrap());
    while !cursor.is_eof() {
        if cursor.starts_with("*/") {
            out.push(cursor.next().unwrap());
            out.push(cursor.next().unwrap());
            return;
        }
        out.push(cursor.next().unwrap());
    }
}

/// Copies `$$...$$` or `$tag$...$tag$` verbatim; a lone `$` passes
/// through.
fn copy_dollar_quoted(cursor: &mut CharCursor<'_>, out: &mut String) {
    let start = cursor.pos();
    cursor.next();
    let tag = cursor.take_while(is_name_char);
    if !cursor.consume('$') {
        cursor.set_pos(start);
        out.push(cursor.next().unwrap());
        return;
    }
    let delimiter = format!("${tag}$");
    out.push_str(&delimiter);
    while !cursor.is_eof() {
        if cursor.starts_with(&delimiter) {
            for _ in 0..delimiter.chars().count() {
                out.push(cursor.next().unwrap());
            }
            return;
        }
        out.push(cursor.next().unwrap());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn params() -> HashMap<String, i64> {
        HashMap::from([("id".to_string(), 7), ("age".to_string(), 30)])
    }

    #[test]
    fn rewrites_to_indexed_placeholders_in_order() {
        let compiled = compile_named(
            "select * from t where id = :id and age > :age",
            &params(),
            PlaceholderStyle::PgIndexed,
        )
        .unwrap();
        assert_eq!(compiled.sql, "select * from t where id = $1 and age > $2");
        assert_eq!(compiled.values, vec![7, 30]);
        assert_eq!(compiled.names, vec!["id", "age"]);
    }

    #[test]
    fn duplicate_names_bind_twice() {
        let compiled = compile_named(
            "select :id, :id",
            &params(),
            PlaceholderStyle::Question,
        )
        .unwrap();
        assert_eq!(compiled.sql, "select ?, ?");
        assert_eq!(compiled.values, vec![7, 7]);
        assert_eq!(compiled.names, vec!["id", "id"]);
    }

    #[test]
    fn quoted_and_commented_regions_are_untouched()  {
        let sql = "select ':id', \":id\", $$:id$$, $t$:id$t$ -- :id\n, /* :id */ :id";
        let compiled = compile_named(sql, &params(), PlaceholderStyle::PgIndexed).unwrap();
        assert_eq!(
            compiled.sql,
            "select ':id', \":id\", $$:id$$, $t$:id$t$ -- :id\n, /* :id */ $1"
        );
        assert_eq!(compiled.values, vec![7]);
    }

    #[test]
    fn cast_operator_is_not_a_parameter() {
        let compiled = compile_named(
            "select :id::int",
            &params(),
            PlaceholderStyle::PgIndexed,
        )
        .unwrap();
        assert_eq!(compiled.sql, "select $1::int");
    }

    #[test]
    fn missing_value_is_malformed() {
        let err = compile_named("select :missing", &params(), PlaceholderStyle::PgIndexed)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedInput);
    }

    #[test]
    fn reference_free_text_is_malformed() {
        let err =
            compile_named("select 1", &params(), PlaceholderStyle::PgIndexed).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedInput);
    }
}
