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

//! Source expressions and joins: everything that can follow `from`.

use crate::ast::{
    FromClause, JoinClause, JoinCondition, Source, SourceAlias, SourceExpression,
};
use crate::error::Result;
use crate::keywords;
use crate::lexeme::{Lexeme, LexemeKind};
use crate::parser::{
    at_command, at_kind, expect_close_paren, expect_open_paren, parse_name_list, unexpected, value,
};

/// `from <source expression> <joins>*`
pub(crate) fn parse_from_clause(lexemes: &[Lexeme], index: usize) -> Result<(FromClause, usize)> {
    let next = crate::parser::expect_command(lexemes, index, "from")?;
    let (source, next) = parse_source_expression(lexemes, next)?;
    let (joins, next) = parse_joins(lexemes, next)?;
    Ok((FromClause { source, joins }, next))
}

/// A source optionally followed by `as? alias (columns)?`.
pub(crate) fn parse_source_expression(
    lexemes: &[Lexeme],
    index: usize,
) -> Result<(SourceExpression, usize)> {
    let (source, next) = parse_source(lexemes, index)?;
    let (alias, next) = parse_alias(lexemes, next)?;
    Ok((SourceExpression { source, alias }, next))
}

fn parse_source(lexemes: &[Lexeme], index: usize) -> Result<(Source, usize)> {
    match lexemes.get(index) {
        Some(lexeme) if lexeme.is(LexemeKind::OpenParen) => {
            let inner = index + 1;
            if value::is_query_start(lexemes, inner) {
                let (query, next) = crate::parser::select::parse_query(lexemes, inner)?;
                let next = expect_close_paren(lexemes, next)?;
                Ok((Source::Query(Box::new(query)), next))
            } else {
                let (nested, next) = parse_source_expression(lexemes, inner)?;
                let next = expect_close_paren(lexemes, next)?;
                Ok((Source::Paren(Box::new(nested)), next))
            }
        }
        Some(lexeme) if lexeme.is(LexemeKind::Function) => {
            parse_function_source(lexemes, index, Vec::new())
        }
        Some(lexeme) if lexeme.is(LexemeKind::Identifier) => {
            parse_qualified_source(lexemes, index)
        }
        _ => Err(unexpected(lexemes, index, "a source")),
    }
}

/// A dot chain naming a table, terminating on a function (table function)
/// or `*` (which must be the last segment).
fn parse_qualified_source(lexemes: &[Lexeme], index: usize) -> Result<(Source, usize)> {
    let mut segments = vec![lexemes[index].value.clone()];
    let mut next = index + 1;
    while at_kind(lexemes, next, LexemeKind::Dot) && segments.last().map(String::as_str) != Some("*")
    {
        match lexemes.get(next + 1) {
            Some(lexeme) if lexeme.is(LexemeKind::Identifier) => {
                segments.push(lexeme.value.clone());
                next += 2;
            }
            Some(lexeme) if lexeme.is(LexemeKind::Function) => {
                return parse_function_source(lexemes, next + 1, segments);
            }
            _ => return Err(unexpected(lexemes, next + 1, "identifier")),
        }
    }
    let name = segments.pop().expect("chain starts with one segment");
    Ok((
        Source::Table {
            namespaces: segments,
            name,
        },
        next,
    ))
}

fn parse_function_source(
    lexemes: &[Lexeme],
    index: usize,
    namespaces: Vec<String>,
) -> Result<(Source, usize)> {
    let name = lexemes[index].value.clone();
    let mut next = expect_open_paren(lexemes, index + 1)?;
    let mut args = Vec::new();
    if !at_kind(lexemes, next, LexemeKind::CloseParen) {
        loop {
            let (arg, after) = value::parse(lexemes, next)?;
            args.push(arg);
            next = after;
            if at_kind(lexemes, next, LexemeKind::Comma) {
                next += 1;
            } else {
                break;
            }
        }
    }
    let next = expect_close_paren(lexemes, next)?;
    Ok((
        Source::Function {
            namespaces,
            name,
            args,
        },
        next,
    ))
}

fn parse_alias(lexemes: &[Lexeme], index: usize) -> Result<(Option<SourceAlias>, usize)> {
    let explicit = at_command(lexemes, index, "as");
    let mut next = if explicit { index + 1 } else { index };
    // An alias directly followed by its column list lexes as a function.
    let name = match lexemes.get(next) {
        Some(lexeme)
            if matches!(
                lexeme.kind,
                LexemeKind::Identifier | LexemeKind::Type | LexemeKind::Function
            ) && lexeme.value != "*" =>
        {
            lexeme.value.clone()
        }
        _ if explicit => return Err(unexpected(lexemes, next, "alias")),
        _ => return Ok((None, index)),
    };
    next += 1;
    let columns = if at_kind(lexemes, next, LexemeKind::OpenParen) {
        let (names, after) = parse_name_list(lexemes, next)?;
        next = after;
        names
    } else {
        Vec::new()
    };
    Ok((Some(SourceAlias { name, columns }), next))
}

/// Greedily consumes join steps. A bare comma reads as a cross join.
pub(crate) fn parse_joins(lexemes: &[Lexeme], index: usize) -> Result<(Vec<JoinClause>, usize)> {
    let mut joins = Vec::new();
    let mut next = index;
    loop {
        let join_type = if at_kind(lexemes, next, LexemeKind::Comma) {
            "cross join".to_string()
        } else {
            match lexemes.get(next) {
                Some(lexeme)
                    if lexeme.is(LexemeKind::Command)
                        && keywords::joins().contains(&lexeme.value) =>
                {
                    lexeme.value.clone()
                }
                _ => break,
            }
        };
        next += 1;
        let lateral = at_command(lexemes, next, "lateral");
        if lateral {
            next += 1;
        }
        let (source, after_source) = parse_source_expression(lexemes, next)?;
        next = after_source;
        let condition = if at_command(lexemes, next, "on") {
            let (predicate, after) = value::parse(lexemes, next + 1)?;
            next = after;
            Some(JoinCondition::On(predicate))
        } else if at_command(lexemes, next, "using") {
            let (columns, after) = parse_name_list(lexemes, next + 1)?;
            next = after;
            Some(JoinCondition::Using(columns))
        } else {
            None
        };
        joins.push(JoinClause {
            join_type,
            lateral,
            source,
            condition,
        });
    }
    Ok((joins, next))
}
