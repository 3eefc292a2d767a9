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

//! The SELECT-statement parser: simple selects, VALUES lists, and
//! left-associative set-operation chains.

use itertools::Itertools;

use crate::ast::{
    BinarySelectQuery, OverClause, SelectQuery, SimpleSelectQuery, TupleExpression, ValuesQuery,
    WithClause,
};
use crate::error::{ErrorKind, Result, SqlError};
use crate::lexeme::{Lexeme, LexemeKind};
use crate::parser::{
    at_command, at_kind, clause, context_window, expect_close_paren, expect_open_paren, source,
    unexpected, value,
};
use crate::visitor::{walk_function_call, Visitor};

const SET_OPERATORS: &[&str] = &[
    "union all",
    "union",
    "intersect all",
    "intersect",
    "except all",
    "except",
];

/// Parses a full query: an optional WITH, one operand, and a greedy chain
/// of set operators. Chained operators nest to the left by construction.
pub(crate) fn parse_query(lexemes: &[Lexeme], index: usize) -> Result<(SelectQuery, usize)> {
    let mut next = index;
    let mut with = None;
    if at_command(lexemes, next, "with") {
        let (parsed, after) = clause::parse_with(lexemes, next)?;
        with = Some(parsed);
        next = after;
    }
    let (mut query, mut next) = parse_operand(lexemes, next, with)?;
    loop {
        let Some(lexeme) = lexemes.get(next) else {
            break;
        };
        if !lexeme.is(LexemeKind::Command) || !SET_OPERATORS.contains(&lexeme.value.as_str()) {
            break;
        }
        let operator = lexeme.value.clone();
        let (right, after) = parse_operand(lexemes, next + 1, None)?;
        query = SelectQuery::Binary(BinarySelectQuery {
            left: Box::new(query),
            operator,
            right: Box::new(right),
        });
        next = after;
    }
    Ok((query, next))
}

/// One set-operation operand: a simple select, a VALUES list, or a
/// parenthesized query.
fn parse_operand(
    lexemes: &[Lexeme],
    index: usize,
    with: Option<WithClause>,
) -> Result<(SelectQuery, usize)> {
    if at_command(lexemes, index, "select") {
        let (query, next) = parse_simple(lexemes, index, with)?;
        return Ok((SelectQuery::Simple(query), next));
    }
    if at_command(lexemes, index, "values") {
        if with.is_some() {
            return Err(unexpected(lexemes, index, "a simple select after WITH"));
        }
        let (query, next) = parse_values(lexemes, index)?;
        return Ok((SelectQuery::Values(query), next));
    }
    if at_kind(lexemes, index, LexemeKind::OpenParen) {
        if with.is_some() {
            return Err(unexpected(lexemes, index, "a simple select after WITH"));
        }
        let inner = expect_open_paren(lexemes, index)?;
        let (query, next) = parse_query(lexemes, inner)?;
        let next = expect_close_paren(lexemes, next)?;
        return Ok((query, next));
    }
    Err(unexpected(lexemes, index, "`select` or `values`"))
}

/// The fixed clause sequence of a simple select.
pub(crate) fn parse_simple(
    lexemes: &[Lexeme],
    index: usize,
    with: Option<WithClause>,
) -> Result<(SimpleSelectQuery, usize)> {
    let (select, mut next) = clause::parse_select_clause(lexemes, index)?;
    let mut query = SimpleSelectQuery::new(select);
    query.with = with;

    if at_command(lexemes, next, "from") {
        let (from, after) = source::parse_from_clause(lexemes, next)?;
        query.from = Some(from);
        next = after;
    }
    if at_command(lexemes, next, "where") {
        let (clause, after) = clause::parse_where(lexemes, next)?;
        query.where_clause = Some(clause);
        next = after;
    }
    if at_command(lexemes, next, "group by") {
        let (clause, after) = clause::parse_group_by(lexemes, next)?;
        query.group_by = Some(clause);
        next = after;
    }
    if at_command(lexemes, next, "having") {
        if query.group_by.is_none() {
            return Err(unexpected(lexemes, next, "`group by` before `having`"));
        }
        let (clause, after) = clause::parse_having(lexemes, next)?;
        query.having = Some(clause);
        next = after;
    }
    if at_command(lexemes, next, "window") {
        let (clause, after) = clause::parse_window(lexemes, next)?;
        query.window = Some(clause);
        next = after;
    }
    if at_command(lexemes, next, "order by") {
        let (clause, after) = clause::parse_order_by(lexemes, next)?;
        query.order_by = Some(clause);
        next = after;
    }
    if at_command(lexemes, next, "limit") {
        let (clause, after) = clause::parse_limit(lexemes, next)?;
        query.limit = Some(clause);
        next = after;
    }
    if at_command(lexemes, next, "fetch") {
        let (clause, after) = clause::parse_fetch(lexemes, next)?;
        query.fetch = Some(clause);
        next = after;
    }
    if at_command(lexemes, next, "for") {
        let (clause, after) = clause::parse_for(lexemes, next)?;
        query.for_clause = Some(clause);
        next = after;
    }

    check_named_windows(&query, lexemes, next)?;
    Ok((query, next))
}

/// An ORDER BY item may reference a named window only when the WINDOW
/// clause defines it.
fn check_named_windows(
    query: &SimpleSelectQuery,
    lexemes: &[Lexeme],
    index: usize,
) -> Result<()> {
    let Some(order_by) = &query.order_by else {
        return Ok(());
    };
    let mut collector = NamedWindowRefs { names: Vec::new() };
    collector.visit_order_by_clause(order_by);
    for name in collector.names {
        let defined = query
            .window
            .as_ref()
            .is_some_and(|window| window.get(&name).is_some());
        if !defined {
            return Err(SqlError::new(
                ErrorKind::InvalidConfiguration,
                format!("ORDER BY references undefined window `{name}`"),
            )
            .with_context(context_window(lexemes, index)));
        }
    }
    Ok(())
}

struct NamedWindowRefs {
    names: Vec<String>,
}

impl Visitor for NamedWindowRefs {
    fn visit_function_call(&mut self, call: &crate::ast::FunctionCall) {
        if let Some(OverClause::Named(name)) = &call.over {
            self.names.push(name.clone());
        }
        walk_function_call(self, call);
    }
}

/// `values (a, b), (c, d)` — all rows must have the same arity.
pub(crate) fn parse_values(lexemes: &[Lexeme], index: usize) -> Result<(ValuesQuery, usize)> {
    let mut next = crate::parser::expect_command(lexemes, index, "values")?;
    let mut rows: Vec<TupleExpression> = Vec::new();
    loop {
        next = expect_open_paren(lexemes, next)?;
        let mut values = Vec::new();
        loop {
            let (item, after) = value::parse(lexemes, next)?;
            values.push(item);
            next = after;
            if at_kind(lexemes, next, LexemeKind::Comma) {
                next += 1;
            } else {
                break;
            }
        }
        next = expect_close_paren(lexemes, next)?;
        rows.push(TupleExpression { values });
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    if !rows.iter().map(|row| row.values.len()).all_equal() {
        return Err(SqlError::new(
            ErrorKind::MalformedInput,
            "VALUES rows have mismatched arity",
        )
        .with_context(context_window(lexemes, next.saturating_sub(1))));
    }
    Ok((
        ValuesQuery {
            rows,
            column_aliases: None,
        },
        next,
    ))
}
