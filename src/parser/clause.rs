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

//! Parsers for the individual clauses of a SELECT statement.

use crate::ast::{
    CommonTable, Distinct, FetchClause, FetchKind, FetchUnit, ForClause, FrameBound, FrameSpec,
    FrameUnit, GroupByClause, GroupByItem, HavingClause, LimitClause, LockMode, NullsPosition,
    OrderByClause, OrderByItem, PartitionByClause, SelectClause, SelectItem, SortDirection,
    TupleExpression, ValueComponent, WhereClause, WindowClause, WindowDefinition,
    WindowFrameExpression, WithClause,
};
use crate::error::Result;
use crate::lexeme::{Lexeme, LexemeKind};
use crate::parser::{
    at_command, at_kind, at_operator, expect_close_paren, expect_command, expect_name,
    expect_open_paren, expect_operator, missing, parse_name_list, select, unexpected, value,
};

/// `with recursive? name (cols)? as (query), ...`
pub(crate) fn parse_with(lexemes: &[Lexeme], index: usize) -> Result<(WithClause, usize)> {
    let mut next = expect_command(lexemes, index, "with")?;
    let recursive = at_command(lexemes, next, "recursive");
    if recursive {
        next += 1;
    }
    let mut tables = Vec::new();
    loop {
        let (table, after) = parse_common_table(lexemes, next)?;
        tables.push(table);
        next = after;
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    Ok((WithClause { recursive, tables }, next))
}

/// One common table: `name (cols)? as (not? materialized)? (query)`.
pub(crate) fn parse_common_table(
    lexemes: &[Lexeme],
    index: usize,
) -> Result<(CommonTable, usize)> {
    let (name, mut next) = expect_name(lexemes, index, "common table name")?;
    let name = name.to_string();
    let columns = if at_kind(lexemes, next, LexemeKind::OpenParen) {
        let (names, after) = parse_name_list(lexemes, next)?;
        next = after;
        Some(names)
    } else {
        None
    };
    next = expect_command(lexemes, next, "as")?;
    let materialized = if at_command(lexemes, next, "materialized") {
        next += 1;
        Some(true)
    } else if at_command(lexemes, next, "not materialized") {
        next += 1;
        Some(false)
    } else {
        None
    };
    next = expect_open_paren(lexemes, next)?;
    let (query, after_query) = select::parse_query(lexemes, next)?;
    next = expect_close_paren(lexemes, after_query)?;
    Ok((
        CommonTable {
            name,
            columns,
            materialized,
            query: Box::new(query),
        },
        next,
    ))
}

/// `select (distinct | distinct on (...))? item, ...`
pub(crate) fn parse_select_clause(
    lexemes: &[Lexeme],
    index: usize,
) -> Result<(SelectClause, usize)> {
    let mut next = expect_command(lexemes, index, "select")?;
    let comments = lexemes[index].comments.clone();
    let distinct = if at_command(lexemes, next, "distinct on") {
        next += 1;
        next = expect_open_paren(lexemes, next)?;
        let mut values = Vec::new();
        loop {
            let (value, after) = value::parse(lexemes, next)?;
            values.push(value);
            next = after;
            if at_kind(lexemes, next, LexemeKind::Comma) {
                next += 1;
            } else {
                break;
            }
        }
        next = expect_close_paren(lexemes, next)?;
        Some(Distinct::DistinctOn(values))
    } else if at_command(lexemes, next, "distinct") {
        next += 1;
        Some(Distinct::Distinct)
    } else {
        None
    };
    if next >= lexemes.len() || at_clause_boundary(lexemes, next) {
        return Err(missing(lexemes, next, "select items"));
    }
    let (items, next) = parse_select_items(lexemes, next)?;
    Ok((
        SelectClause {
            distinct,
            items,
            comments,
        },
        next,
    ))
}

/// True at a keyword that can only start the next clause of a select.
fn at_clause_boundary(lexemes: &[Lexeme], index: usize) -> bool {
    const BOUNDARIES: &[&str] = &[
        "from", "where", "group by", "having", "window", "order by", "limit", "offset", "fetch",
        "for",
    ];
    BOUNDARIES
        .iter()
        .any(|boundary| at_command(lexemes, index, boundary))
}

/// A comma-separated list of `value (as? alias)?` items, shared by SELECT
/// and RETURNING.
pub(crate) fn parse_select_items(
    lexemes: &[Lexeme],
    index: usize,
) -> Result<(Vec<SelectItem>, usize)> {
    let mut items = Vec::new();
    let mut next = index;
    loop {
        let (item_value, after_value) = value::parse(lexemes, next)?;
        next = after_value;
        let alias = if at_command(lexemes, next, "as") {
            let (name, after) = expect_name(lexemes, next + 1, "alias")?;
            let name = name.to_string();
            next = after;
            Some(name)
        } else {
            match lexemes.get(next) {
                Some(lexeme)
                    if matches!(lexeme.kind, LexemeKind::Identifier | LexemeKind::Type)
                        && lexeme.value != "*" =>
                {
                    next += 1;
                    Some(lexeme.value.clone())
                }
                _ => None,
            }
        };
        items.push(SelectItem {
            value: item_value,
            alias,
        });
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    Ok((items, next))
}

/// `where <predicate>`
pub(crate) fn parse_where(lexemes: &[Lexeme], index: usize) -> Result<(WhereClause, usize)> {
    let next = expect_command(lexemes, index, "where")?;
    let (condition, next) = value::parse(lexemes, next)?;
    Ok((WhereClause { condition }, next))
}

/// `group by item, ...` where an item is an expression or a
/// `grouping sets (...)` list.
pub(crate) fn parse_group_by(lexemes: &[Lexeme], index: usize) -> Result<(GroupByClause, usize)> {
    let mut next = expect_command(lexemes, index, "group by")?;
    let mut items = Vec::new();
    loop {
        let is_grouping_sets = lexemes.get(next).is_some_and(|lexeme| {
            lexeme.is(LexemeKind::Command) && crate::keywords::grouping_sets().contains(&lexeme.value)
        });
        if is_grouping_sets {
            let (sets, after) = parse_grouping_sets(lexemes, next + 1)?;
            items.push(GroupByItem::GroupingSets(sets));
            next = after;
        } else {
            let (value, after) = value::parse(lexemes, next)?;
            items.push(GroupByItem::Expression(value));
            next = after;
        }
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    Ok((GroupByClause { items }, next))
}

/// The parenthesized tuple list of `grouping sets ((a, b), (c), ())`.
fn parse_grouping_sets(
    lexemes: &[Lexeme],
    index: usize,
) -> Result<(Vec<TupleExpression>, usize)> {
    let mut next = expect_open_paren(lexemes, index)?;
    let mut sets = Vec::new();
    loop {
        next = expect_open_paren(lexemes, next)?;
        let mut values = Vec::new();
        if !at_kind(lexemes, next, LexemeKind::CloseParen) {
            loop {
                let (value, after) = value::parse(lexemes, next)?;
                values.push(value);
                next = after;
                if at_kind(lexemes, next, LexemeKind::Comma) {
                    next += 1;
                } else {
                    break;
                }
            }
        }
        next = expect_close_paren(lexemes, next)?;
        sets.push(TupleExpression { values });
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    let next = expect_close_paren(lexemes, next)?;
    Ok((sets, next))
}

/// `having <predicate>`
pub(crate) fn parse_having(lexemes: &[Lexeme], index: usize) -> Result<(HavingClause, usize)> {
    let next = expect_command(lexemes, index, "having")?;
    let (condition, next) = value::parse(lexemes, next)?;
    Ok((HavingClause { condition }, next))
}

/// `window name as (frame), ...`
pub(crate) fn parse_window(lexemes: &[Lexeme], index: usize) -> Result<(WindowClause, usize)> {
    let mut next = expect_command(lexemes, index, "window")?;
    let mut definitions = Vec::new();
    while at_kind(lexemes, next, LexemeKind::Identifier) {
        let name = lexemes[next].value.clone();
        next = expect_command(lexemes, next + 1, "as")?;
        next = expect_open_paren(lexemes, next)?;
        let (frame, after_frame) = parse_window_frame_expression(lexemes, next)?;
        next = expect_close_paren(lexemes, after_frame)?;
        definitions.push(WindowDefinition { name, frame });
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    if definitions.is_empty() {
        return Err(missing(lexemes, next, "window definitions"));
    }
    Ok((WindowClause { definitions }, next))
}

/// The body of `over (...)` or a window definition: optional
/// `partition by`, optional `order by`, optional frame spec.
pub(crate) fn parse_window_frame_expression(
    lexemes: &[Lexeme],
    index: usize,
) -> Result<(WindowFrameExpression, usize)> {
    let mut next = index;
    let partition = if at_command(lexemes, next, "partition by") {
        let (clause, after) = parse_partition_by(lexemes, next)?;
        next = after;
        Some(clause)
    } else {
        None
    };
    let order = if at_command(lexemes, next, "order by") {
        let (clause, after) = parse_order_by(lexemes, next)?;
        next = after;
        Some(clause)
    } else {
        None
    };
    let frame = if let Some(unit) = frame_unit(lexemes, next) {
        let (spec, after) = parse_frame_spec(lexemes, next + 1, unit)?;
        next = after;
        Some(spec)
    } else {
        None
    };
    Ok((
        WindowFrameExpression {
            partition,
            order,
            frame,
        },
        next,
    ))
}

fn frame_unit(lexemes: &[Lexeme], index: usize) -> Option<FrameUnit> {
    if at_command(lexemes, index, "rows") {
        Some(FrameUnit::Rows)
    } else if at_command(lexemes, index, "range") {
        Some(FrameUnit::Range)
    } else if at_command(lexemes, index, "groups") {
        Some(FrameUnit::Groups)
    } else {
        None
    }
}

fn parse_frame_spec(
    lexemes: &[Lexeme],
    index: usize,
    unit: FrameUnit,
) -> Result<(FrameSpec, usize)> {
    if at_operator(lexemes, index, "between") {
        let (start, next) = parse_frame_bound(lexemes, index + 1)?;
        let next = expect_operator(lexemes, next, "and")?;
        let (end, next) = parse_frame_bound(lexemes, next)?;
        Ok((
            FrameSpec {
                unit,
                start,
                end: Some(end),
            },
            next,
        ))
    } else {
        let (start, next) = parse_frame_bound(lexemes, index)?;
        Ok((
            FrameSpec {
                unit,
                start,
                end: None,
            },
            next,
        ))
    }
}

/// The window-boundary keyword at `index`, if any. Boundary keywords are
/// defined by their own trie; note `unbounded` itself lexes as a keyword
/// literal, so `unbounded preceding` arrives as two lexemes.
fn boundary_keyword(lexemes: &[Lexeme], index: usize) -> Option<&str> {
    lexemes
        .get(index)
        .filter(|lexeme| {
            lexeme.is(LexemeKind::Command)
                && crate::keywords::window_boundaries().contains(&lexeme.value)
        })
        .map(|lexeme| lexeme.value.as_str())
}

/// `unbounded preceding|following`, `current row`, or
/// `<value> preceding|following`.
fn parse_frame_bound(lexemes: &[Lexeme], index: usize) -> Result<(FrameBound, usize)> {
    if boundary_keyword(lexemes, index) == Some("current row") {
        return Ok((FrameBound::CurrentRow, index + 1));
    }
    if lexemes
        .get(index)
        .is_some_and(|l| l.is(LexemeKind::Literal) && l.value.eq_ignore_ascii_case("unbounded"))
    {
        return match boundary_keyword(lexemes, index + 1) {
            Some("preceding") => Ok((FrameBound::UnboundedPreceding, index + 2)),
            Some("following") => Ok((FrameBound::UnboundedFollowing, index + 2)),
            _ => Err(unexpected(lexemes, index + 1, "`preceding` or `following`")),
        };
    }
    let (offset, next) = value::parse_expr(lexemes, index, 0, value::BoolOps::DISABLED)?;
    match boundary_keyword(lexemes, next) {
        Some("preceding") => Ok((FrameBound::Preceding(offset), next + 1)),
        Some("following") => Ok((FrameBound::Following(offset), next + 1)),
        _ => Err(unexpected(lexemes, next, "`preceding` or `following`")),
    }
}

/// `partition by value, ...` — always represented as a list.
pub(crate) fn parse_partition_by(
    lexemes: &[Lexeme],
    index: usize,
) -> Result<(PartitionByClause, usize)> {
    let mut next = expect_command(lexemes, index, "partition by")?;
    let mut values = Vec::new();
    loop {
        let (value, after) = value::parse(lexemes, next)?;
        values.push(value);
        next = after;
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    Ok((PartitionByClause { values }, next))
}

/// `order by value (asc|desc)? (nulls first|nulls last)?, ...`
pub(crate) fn parse_order_by(lexemes: &[Lexeme], index: usize) -> Result<(OrderByClause, usize)> {
    let mut next = expect_command(lexemes, index, "order by")?;
    let mut items = Vec::new();
    loop {
        let (item_value, after) = value::parse(lexemes, next)?;
        next = after;
        let direction = if at_command(lexemes, next, "desc") {
            next += 1;
            SortDirection::Descending
        } else if at_command(lexemes, next, "asc") {
            next += 1;
            SortDirection::Ascending
        } else {
            SortDirection::Ascending
        };
        let nulls = if at_command(lexemes, next, "nulls first") {
            next += 1;
            Some(NullsPosition::First)
        } else if at_command(lexemes, next, "nulls last") {
            next += 1;
            Some(NullsPosition::Last)
        } else {
            None
        };
        items.push(OrderByItem {
            value: item_value,
            direction,
            nulls,
        });
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    Ok((OrderByClause { items }, next))
}

/// `limit <value> (offset <value>)?`
pub(crate) fn parse_limit(lexemes: &[Lexeme], index: usize) -> Result<(LimitClause, usize)> {
    let next = expect_command(lexemes, index, "limit")?;
    if next >= lexemes.len() {
        return Err(missing(lexemes, next, "LIMIT expression"));
    }
    let (limit, mut next) = value::parse(lexemes, next)?;
    let offset = if at_command(lexemes, next, "offset") {
        let (value, after) = value::parse(lexemes, next + 1)?;
        next = after;
        Some(value)
    } else {
        None
    };
    Ok((LimitClause { limit, offset }, next))
}

/// `fetch (first|next) (count)? (rows only | percent | percent with ties)`
pub(crate) fn parse_fetch(lexemes: &[Lexeme], index: usize) -> Result<(FetchClause, usize)> {
    let mut next = expect_command(lexemes, index, "fetch")?;
    let kind = if at_command(lexemes, next, "first") {
        FetchKind::First
    } else if at_command(lexemes, next, "next") {
        FetchKind::Next
    } else {
        return Err(unexpected(lexemes, next, "`first` or `next`"));
    };
    next += 1;
    let count = if fetch_unit(lexemes, next).is_some() {
        // An omitted count defaults to one row.
        ValueComponent::literal("1")
    } else {
        let (value, after) = value::parse(lexemes, next)?;
        next = after;
        value
    };
    let Some(unit) = fetch_unit(lexemes, next) else {
        return Err(unexpected(lexemes, next, "`rows only` or `percent`"));
    };
    Ok((FetchClause { kind, count, unit }, next + 1))
}

fn fetch_unit(lexemes: &[Lexeme], index: usize) -> Option<FetchUnit> {
    if at_command(lexemes, index, "rows only") || at_command(lexemes, index, "row only") {
        Some(FetchUnit::RowsOnly)
    } else if at_command(lexemes, index, "percent with ties") {
        Some(FetchUnit::PercentWithTies)
    } else if at_command(lexemes, index, "percent") {
        Some(FetchUnit::Percent)
    } else {
        None
    }
}

/// `for (update | share | key share | no key update)`
pub(crate) fn parse_for(lexemes: &[Lexeme], index: usize) -> Result<(ForClause, usize)> {
    let next = expect_command(lexemes, index, "for")?;
    let lock = if at_command(lexemes, next, "update") {
        LockMode::Update
    } else if at_command(lexemes, next, "share") {
        LockMode::Share
    } else if at_command(lexemes, next, "key share") {
        LockMode::KeyShare
    } else if at_command(lexemes, next, "no key update") {
        LockMode::NoKeyUpdate
    } else {
        return Err(unexpected(lexemes, next, "a lock mode"));
    };
    Ok((ForClause { lock }, next + 1))
}
