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

//! Recursive-descent SQL parsers.
//!
//! Every clause parser has the composable shape `(lexemes, index) ->
//! Result<(node, new_index)>` so tests can target any clause in isolation.
//! The from-text entry points in this module tokenize, delegate to the
//! lexeme-level parser, and require the whole input to be consumed.

use log::debug;

use crate::ast::{
    CommonTable, DeleteQuery, FetchClause, ForClause, GroupByClause, HavingClause, InsertQuery,
    LimitClause, OrderByClause, SelectQuery, SourceExpression, UpdateQuery, ValueComponent,
    WhereClause, WindowClause, WithClause,
};
use crate::error::{ErrorKind, Result, SqlError};
use crate::lexeme::{KindSet, Lexeme, LexemeKind};
use crate::tokenizer::tokenize;

pub(crate) mod clause;
pub(crate) mod dml;
pub(crate) mod select;
pub(crate) mod source;
pub(crate) mod value;

/// Parses a complete SELECT (or VALUES, or set-operation) statement.
pub fn parse_select(sql: &str) -> Result<SelectQuery> {
    debug!("parsing select statement");
    let lexemes = tokenize(sql)?;
    let (query, next) = select::parse_query(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(query)
}

/// Parses an INSERT statement.
pub fn parse_insert(sql: &str) -> Result<InsertQuery> {
    debug!("parsing insert statement");
    let lexemes = tokenize(sql)?;
    let (query, next) = dml::parse_insert(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(query)
}

/// Parses an UPDATE statement.
pub fn parse_update(sql: &str) -> Result<UpdateQuery> {
    debug!("parsing update statement");
    let lexemes = tokenize(sql)?;
    let (query, next) = dml::parse_update(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(query)
}

/// Parses a DELETE statement.
pub fn parse_delete(sql: &str) -> Result<DeleteQuery> {
    debug!("parsing delete statement");
    let lexemes = tokenize(sql)?;
    let (query, next) = dml::parse_delete(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(query)
}

/// Parses a standalone `values (...), (...)` query.
pub fn parse_values(sql: &str) -> Result<SelectQuery> {
    let lexemes = tokenize(sql)?;
    let (query, next) = select::parse_values(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(SelectQuery::Values(query))
}

/// Parses a value expression, e.g. for building WHERE fragments from text.
pub fn parse_value(sql: &str) -> Result<ValueComponent> {
    let lexemes = tokenize(sql)?;
    let (value, next) = value::parse(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(value)
}

/// Parses a source expression (`schema.table alias`, a subquery source, a
/// table function, ...).
pub fn parse_source(sql: &str) -> Result<SourceExpression> {
    let lexemes = tokenize(sql)?;
    let (source, next) = source::parse_source_expression(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(source)
}

/// Parses one common table: `name (cols)? as (query)`.
pub fn parse_common_table(sql: &str) -> Result<CommonTable> {
    let lexemes = tokenize(sql)?;
    let (table, next) = clause::parse_common_table(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(table)
}

/// Parses a `with ...` clause.
pub fn parse_with(sql: &str) -> Result<WithClause> {
    let lexemes = tokenize(sql)?;
    let (with, next) = clause::parse_with(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(with)
}

/// Parses a `where ...` clause.
pub fn parse_where(sql: &str) -> Result<WhereClause> {
    let lexemes = tokenize(sql)?;
    let (clause, next) = clause::parse_where(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(clause)
}

/// Parses a `group by ...` clause.
pub fn parse_group_by(sql: &str) -> Result<GroupByClause> {
    let lexemes = tokenize(sql)?;
    let (clause, next) = clause::parse_group_by(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(clause)
}

/// Parses a `having ...` clause.
pub fn parse_having(sql: &str) -> Result<HavingClause> {
    let lexemes = tokenize(sql)?;
    let (clause, next) = clause::parse_having(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(clause)
}

/// Parses an `order by ...` clause.
pub fn parse_order_by(sql: &str) -> Result<OrderByClause> {
    let lexemes = tokenize(sql)?;
    let (clause, next) = clause::parse_order_by(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(clause)
}

/// Parses a `window name as (...)` clause.
pub fn parse_window(sql: &str) -> Result<WindowClause> {
    let lexemes = tokenize(sql)?;
    let (clause, next) = clause::parse_window(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(clause)
}

/// Parses a `limit ... (offset ...)?` clause.
pub fn parse_limit(sql: &str) -> Result<LimitClause> {
    let lexemes = tokenize(sql)?;
    let (clause, next) = clause::parse_limit(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(clause)
}

/// Parses a `fetch {first|next} ...` clause.
pub fn parse_fetch(sql: &str) -> Result<FetchClause> {
    let lexemes = tokenize(sql)?;
    let (clause, next) = clause::parse_fetch(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(clause)
}

/// Parses a `for {update|share|...}` locking clause.
pub fn parse_for(sql: &str) -> Result<ForClause> {
    let lexemes = tokenize(sql)?;
    let (clause, next) = clause::parse_for(&lexemes, 0)?;
    assert_eof(&lexemes, next)?;
    Ok(clause)
}

/// Renders the ±2 lexemes around `index` with a caret under the offender.
pub(crate) fn context_window(lexemes: &[Lexeme], index: usize) -> String {
    let start = index.saturating_sub(2);
    let end = (index + 3).min(lexemes.len());
    let mut line = String::new();
    let mut caret_offset = None;
    for (offset, lexeme) in lexemes[start..end].iter().enumerate() {
        if offset > 0 {
            line.push(' ');
        }
        if start + offset == index {
            caret_offset = Some(line.len());
        }
        line.push_str(&lexeme.value);
    }
    let caret_offset = caret_offset.unwrap_or_else(|| {
        if line.is_empty() {
            0
        } else {
            line.len() + 1
        }
    });
    format!("{line}\n{}^", " ".repeat(caret_offset))
}

/// Builds the standard parser error for a lexeme that does not fit the
/// current state.
pub(crate) fn unexpected(lexemes: &[Lexeme], index: usize, expected: &str) -> SqlError {
    let found = match lexemes.get(index) {
        Some(lexeme) => format!("{lexeme}"),
        None => "end of input".to_string(),
    };
    SqlError::at(
        ErrorKind::UnexpectedToken,
        format!("Expected {expected}, found: {found}"),
        index,
    )
    .with_context(context_window(lexemes, index))
}

pub(crate) fn missing(lexemes: &[Lexeme], index: usize, what: &str) -> SqlError {
    SqlError::at(
        ErrorKind::MissingClauseElement,
        format!("Missing {what}"),
        index,
    )
    .with_context(context_window(lexemes, index))
}

pub(crate) fn assert_eof(lexemes: &[Lexeme], index: usize) -> Result<()> {
    if index < lexemes.len() {
        Err(unexpected(lexemes, index, "end of statement"))
    } else {
        Ok(())
    }
}

pub(crate) fn at_kind(lexemes: &[Lexeme], index: usize, kind: LexemeKind) -> bool {
    lexemes.get(index).is_some_and(|lexeme| lexeme.is(kind))
}

pub(crate) fn at_command(lexemes: &[Lexeme], index: usize, value: &str) -> bool {
    lexemes
        .get(index)
        .is_some_and(|lexeme| lexeme.matches(LexemeKind::Command, value))
}

pub(crate) fn at_operator(lexemes: &[Lexeme], index: usize, value: &str) -> bool {
    lexemes
        .get(index)
        .is_some_and(|lexeme| lexeme.matches(LexemeKind::Operator, value))
}

pub(crate) fn expect_command(lexemes: &[Lexeme], index: usize, value: &str) -> Result<usize> {
    if at_command(lexemes, index, value) {
        Ok(index + 1)
    } else {
        Err(unexpected(lexemes, index, &format!("`{value}`")))
    }
}

pub(crate) fn expect_operator(lexemes: &[Lexeme], index: usize, value: &str) -> Result<usize> {
    if at_operator(lexemes, index, value) {
        Ok(index + 1)
    } else {
        Err(unexpected(lexemes, index, &format!("`{value}`")))
    }
}

pub(crate) fn expect_open_paren(lexemes: &[Lexeme], index: usize) -> Result<usize> {
    if at_kind(lexemes, index, LexemeKind::OpenParen) {
        Ok(index + 1)
    } else {
        Err(unexpected(lexemes, index, "`(`"))
    }
}

/// A missing `)` at end of input is an unbalanced delimiter rather than a
/// plain unexpected token.
pub(crate) fn expect_close_paren(lexemes: &[Lexeme], index: usize) -> Result<usize> {
    if at_kind(lexemes, index, LexemeKind::CloseParen) {
        Ok(index + 1)
    } else if index >= lexemes.len() {
        Err(SqlError::at(
            ErrorKind::UnbalancedDelimiter,
            "Missing closing `)`",
            index,
        )
        .with_context(context_window(lexemes, index)))
    } else {
        Err(unexpected(lexemes, index, "`)`"))
    }
}

pub(crate) fn expect_close_bracket(lexemes: &[Lexeme], index: usize) -> Result<usize> {
    if at_kind(lexemes, index, LexemeKind::CloseBracket) {
        Ok(index + 1)
    } else if index >= lexemes.len() {
        Err(SqlError::at(
            ErrorKind::UnbalancedDelimiter,
            "Missing closing `]`",
            index,
        )
        .with_context(context_window(lexemes, index)))
    } else {
        Err(unexpected(lexemes, index, "`]`"))
    }
}

/// Lexeme kinds acceptable wherever a bare name is expected: plain or
/// quoted identifiers, type words doubling as names (the type reader
/// claims words like `text` right after `as`), and function lexemes (a
/// name immediately followed by `(`, as in `with t(x) as ...`).
pub(crate) const NAME_KINDS: KindSet = KindSet::of(&[
    LexemeKind::Identifier,
    LexemeKind::Type,
    LexemeKind::Function,
]);

/// Reads an identifier-like lexeme used as a name.
pub(crate) fn expect_name<'a>(
    lexemes: &'a [Lexeme],
    index: usize,
    expected: &str,
) -> Result<(&'a str, usize)> {
    match lexemes.get(index) {
        Some(lexeme) if lexeme.is_in(NAME_KINDS) => Ok((&lexeme.value, index + 1)),
        _ => Err(unexpected(lexemes, index, expected)),
    }
}

/// Reads a parenthesized, comma-separated list of identifiers, e.g. a
/// column alias list.
pub(crate) fn parse_name_list(lexemes: &[Lexeme], index: usize) -> Result<(Vec<String>, usize)> {
    let mut next = expect_open_paren(lexemes, index)?;
    let mut names = Vec::new();
    loop {
        let (name, after) = expect_name(lexemes, next, "identifier")?;
        names.push(name.to_string());
        next = after;
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    let next = expect_close_paren(lexemes, next)?;
    Ok((names, next))
}
