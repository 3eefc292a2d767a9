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

//! INSERT, UPDATE, and DELETE entry points.

use crate::ast::{DeleteQuery, InsertQuery, SelectItem, SelectQuery, SetItem, UpdateQuery};
use crate::error::{Result, SqlError};
use crate::lexeme::{Lexeme, LexemeKind};
use crate::parser::{
    at_command, at_kind, clause, expect_command, expect_operator, parse_name_list, select, source,
    unexpected, value,
};

/// `with? insert into ns.table (cols)? <select-or-values> returning?`
///
/// A WITH written before INSERT is pushed into the source query when that
/// source is a simple select; anything else fails.
pub(crate) fn parse_insert(lexemes: &[Lexeme], index: usize) -> Result<(InsertQuery, usize)> {
    let mut next = index;
    let mut with = None;
    if at_command(lexemes, next, "with") {
        let (parsed, after) = clause::parse_with(lexemes, next)?;
        with = Some(parsed);
        next = after;
    }
    next = expect_command(lexemes, next, "insert into")?;
    let (namespaces, table, mut next) = parse_target_name(lexemes, next)?;

    let mut columns = Vec::new();
    if at_kind(lexemes, next, LexemeKind::OpenParen) && !value::is_query_start(lexemes, next + 1)
    {
        let (names, after) = parse_name_list(lexemes, next)?;
        columns = names;
        next = after;
    }

    let (mut query_source, mut next) = select::parse_query(lexemes, next)?;
    if let Some(with) = with {
        match &mut query_source {
            SelectQuery::Simple(simple) => simple.attach_with(with)?,
            _ => {
                return Err(SqlError::invalid(
                    "WITH before INSERT requires a simple select source",
                ))
            }
        }
    }

    let returning = parse_returning(lexemes, &mut next)?;
    Ok((
        InsertQuery {
            namespaces,
            table,
            columns,
            source: Box::new(query_source),
            returning,
        },
        next,
    ))
}

/// `update target set col = value, ... from? where? returning?`
pub(crate) fn parse_update(lexemes: &[Lexeme], index: usize) -> Result<(UpdateQuery, usize)> {
    let next = expect_command(lexemes, index, "update")?;
    let (target, next) = source::parse_source_expression(lexemes, next)?;
    let mut next = expect_command(lexemes, next, "set")?;

    let mut set = Vec::new();
    loop {
        let (column, after_column) = parse_column_name(lexemes, next)?;
        let after_eq = expect_operator(lexemes, after_column, "=")?;
        let (item_value, after_value) = value::parse(lexemes, after_eq)?;
        set.push(SetItem {
            column,
            value: item_value,
        });
        next = after_value;
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }

    let mut query = UpdateQuery {
        target,
        set,
        from: None,
        where_clause: None,
        returning: None,
    };
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
    query.returning = parse_returning(lexemes, &mut next)?;
    Ok((query, next))
}

/// `delete from target using? where? returning?`
pub(crate) fn parse_delete(lexemes: &[Lexeme], index: usize) -> Result<(DeleteQuery, usize)> {
    let next = expect_command(lexemes, index, "delete from")?;
    let (target, mut next) = source::parse_source_expression(lexemes, next)?;

    let mut query = DeleteQuery {
        target,
        using: None,
        where_clause: None,
        returning: None,
    };
    if at_command(lexemes, next, "using") {
        next += 1;
        let mut sources = Vec::new();
        loop {
            let (expression, after) = source::parse_source_expression(lexemes, next)?;
            sources.push(expression);
            next = after;
            if at_kind(lexemes, next, LexemeKind::Comma) {
                next += 1;
            } else {
                break;
            }
        }
        query.using = Some(sources);
    }
    if at_command(lexemes, next, "where") {
        let (clause, after) = clause::parse_where(lexemes, next)?;
        query.where_clause = Some(clause);
        next = after;
    }
    query.returning = parse_returning(lexemes, &mut next)?;
    Ok((query, next))
}

fn parse_returning(lexemes: &[Lexeme], next: &mut usize) -> Result<Option<Vec<SelectItem>>> {
    if !at_command(lexemes, *next, "returning") {
        return Ok(None);
    }
    let (items, after) = clause::parse_select_items(lexemes, *next + 1)?;
    *next = after;
    Ok(Some(items))
}

/// The insert target: a dot chain of identifiers. A name directly followed
/// by its column list lexes as a function lexeme and ends the chain.
fn parse_target_name(
    lexemes: &[Lexeme],
    index: usize,
) -> Result<(Vec<String>, String, usize)> {
    let mut segments = Vec::new();
    let mut next = index;
    loop {
        match lexemes.get(next) {
            Some(lexeme) if lexeme.is(LexemeKind::Identifier) => {
                segments.push(lexeme.value.clone());
                next += 1;
                if at_kind(lexemes, next, LexemeKind::Dot) {
                    next += 1;
                } else {
                    break;
                }
            }
            Some(lexeme) if lexeme.is(LexemeKind::Function) => {
                segments.push(lexeme.value.clone());
                next += 1;
                break;
            }
            _ => return Err(unexpected(lexemes, next, "table name")),
        }
    }
    let name = segments.pop().expect("target has at least one segment");
    Ok((segments, name, next))
}

/// A SET-list column: a dot chain kept as its joined text.
fn parse_column_name(lexemes: &[Lexeme], index: usize) -> Result<(String, usize)> {
    let mut segments = Vec::new();
    let mut next = index;
    loop {
        match lexemes.get(next) {
            Some(lexeme) if lexeme.is(LexemeKind::Identifier) => {
                segments.push(lexeme.value.clone());
                next += 1;
                if at_kind(lexemes, next, LexemeKind::Dot) {
                    next += 1;
                } else {
                    break;
                }
            }
            _ => return Err(unexpected(lexemes, next, "column name")),
        }
    }
    Ok((segments.join("."), next))
}
