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

//! The value-expression parser: a hand-written precedence climber.

use crate::ast::{
    ArrayConstructor, BetweenExpression, BinaryExpression, CaseExpression, CastExpression,
    CastStyle, ColumnReference, FunctionArguments, FunctionCall, InlineQuery, KeywordArgument,
    LiteralValue, OverClause, ParameterValue, ParenExpression, StringSpecifierValue,
    TupleExpression, TypeValue, UnaryExpression, ValueComponent, ValueList, WhenBranch,
};
use crate::cursor::OPERATOR_CHARS;
use crate::error::Result;
use crate::lexeme::{Lexeme, LexemeKind};
use crate::parser::{
    at_command, at_kind, clause, expect_close_bracket, expect_close_paren, expect_command,
    expect_open_paren, expect_operator, missing, select, unexpected,
};

const PREC_OR: u8 = 1;
const PREC_AND: u8 = 2;
const PREC_NOT: u8 = 3;
const PREC_COMPARISON: u8 = 4;
const PREC_BETWEEN: u8 = 5;
const PREC_ADDITIVE: u8 = 6;
const PREC_MULTIPLICATIVE: u8 = 7;
const PREC_CAST: u8 = 8;
const PREC_UNARY: u8 = 9;

/// Whether `and`/`or` may be consumed at the current nesting level.
/// BETWEEN bounds disable both; parentheses re-enable them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoolOps {
    and: bool,
    or: bool,
}

impl BoolOps {
    pub(crate) const ENABLED: BoolOps = BoolOps {
        and: true,
        or: true,
    };
    pub(crate) const DISABLED: BoolOps = BoolOps {
        and: false,
        or: false,
    };
}

fn binary_precedence(operator: &str) -> Option<u8> {
    let precedence = match operator {
        "or" => PREC_OR,
        "and" => PREC_AND,
        "=" | "<>" | "!=" | "<" | "<=" | ">" | ">=" | "is" | "is not" | "like" | "not like"
        | "in" | "not in" | "is distinct from" | "is not distinct from" => PREC_COMPARISON,
        "between" | "not between" => PREC_BETWEEN,
        "+" | "-" => PREC_ADDITIVE,
        "*" | "/" | "%" => PREC_MULTIPLICATIVE,
        "::" => PREC_CAST,
        // Remaining symbolic operators (`||`, `->>`, `@>`, ...) bind like
        // the additive level.
        other if other.chars().all(|ch| OPERATOR_CHARS.contains(&ch)) => PREC_ADDITIVE,
        _ => return None,
    };
    Some(precedence)
}

/// Parses a value expression starting at `index`.
pub(crate) fn parse(lexemes: &[Lexeme], index: usize) -> Result<(ValueComponent, usize)> {
    parse_expr(lexemes, index, 0, BoolOps::ENABLED)
}

pub(crate) fn parse_expr(
    lexemes: &[Lexeme],
    index: usize,
    min_precedence: u8,
    bools: BoolOps,
) -> Result<(ValueComponent, usize)> {
    let (mut left, mut index) = parse_prefix(lexemes, index, bools)?;
    loop {
        let Some(lexeme) = lexemes.get(index) else {
            break;
        };
        if !lexeme.is(LexemeKind::Operator) {
            break;
        }
        let operator = lexeme.value.clone();
        if (operator == "and" && !bools.and) || (operator == "or" && !bools.or) {
            break;
        }
        let Some(precedence) = binary_precedence(&operator) else {
            break;
        };
        if precedence < min_precedence {
            break;
        }
        index += 1;
        match operator.as_str() {
            "between" | "not between" => {
                let (expression, next) = parse_between(lexemes, index, left, &operator)?;
                left = expression;
                index = next;
            }
            "::" => {
                let (target, next) = parse_type(lexemes, index)?;
                left = ValueComponent::Cast(CastExpression {
                    value: Box::new(left),
                    target,
                    style: CastStyle::DoubleColon,
                });
                index = next;
            }
            "in" | "not in" => {
                let (right, next) = parse_in_argument(lexemes, index)?;
                left = ValueComponent::Binary(BinaryExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                });
                index = next;
            }
            _ => {
                let (right, next) = parse_expr(lexemes, index, precedence + 1, bools)?;
                left = ValueComponent::Binary(BinaryExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                });
                index = next;
            }
        }
    }
    Ok((left, index))
}

/// Parses the bounds of `value [not] between lower and upper`.
///
/// Both `and` and `or` are disabled at the top level of the bounds so the
/// separating `and` is never absorbed; parentheses inside a bound restore
/// them.
fn parse_between(
    lexemes: &[Lexeme],
    index: usize,
    value: ValueComponent,
    operator: &str,
) -> Result<(ValueComponent, usize)> {
    let (lower, next) = parse_expr(lexemes, index, PREC_BETWEEN + 1, BoolOps::DISABLED)?;
    let next = expect_operator(lexemes, next, "and")?;
    let (upper, next) = parse_expr(lexemes, next, PREC_BETWEEN + 1, BoolOps::DISABLED)?;
    Ok((
        ValueComponent::Between(BetweenExpression {
            value: Box::new(value),
            negated: operator == "not between",
            lower: Box::new(lower),
            upper: Box::new(upper),
        }),
        next,
    ))
}

fn parse_prefix(
    lexemes: &[Lexeme],
    index: usize,
    bools: BoolOps,
) -> Result<(ValueComponent, usize)> {
    let Some(lexeme) = lexemes.get(index) else {
        return Err(unexpected(lexemes, index, "a value expression"));
    };
    match lexeme.kind {
        LexemeKind::Literal => Ok((
            ValueComponent::Literal(LiteralValue {
                text: lexeme.value.clone(),
                comments: lexeme.comments.clone(),
            }),
            index + 1,
        )),
        LexemeKind::Parameter => Ok((
            ValueComponent::Parameter(ParameterValue {
                name: lexeme.value.clone(),
                comments: lexeme.comments.clone(),
            }),
            index + 1,
        )),
        LexemeKind::StringSpecifier => match lexemes.get(index + 1) {
            Some(literal) if literal.is(LexemeKind::Literal) => Ok((
                ValueComponent::StringSpecifier(StringSpecifierValue {
                    specifier: lexeme.value.clone(),
                    literal: literal.value.clone(),
                }),
                index + 2,
            )),
            _ => Err(unexpected(lexemes, index + 1, "a string literal")),
        },
        LexemeKind::OpenParen => parse_paren(lexemes, index),
        LexemeKind::Command if lexeme.value == "case" => parse_case(lexemes, index),
        LexemeKind::Command if lexeme.value == "array" => parse_array(lexemes, index),
        LexemeKind::Function => parse_function_call(lexemes, index, Vec::new()),
        LexemeKind::Identifier => parse_column_or_function(lexemes, index),
        LexemeKind::Type => {
            let (ty, next) = parse_type(lexemes, index)?;
            Ok((ValueComponent::Type(ty), next))
        }
        LexemeKind::Operator => match lexeme.value.as_str() {
            "+" | "-" | "~" => {
                let (operand, next) = parse_expr(lexemes, index + 1, PREC_UNARY, bools)?;
                Ok((unary(&lexeme.value, operand), next))
            }
            "not" => {
                let (operand, next) = parse_expr(lexemes, index + 1, PREC_NOT + 1, bools)?;
                Ok((unary("not", operand), next))
            }
            "exists" | "not exists" => {
                let (operand, next) = parse_expr(lexemes, index + 1, PREC_UNARY, bools)?;
                Ok((unary(&lexeme.value, operand), next))
            }
            _ => Err(unexpected(lexemes, index, "a value expression")),
        },
        _ => Err(unexpected(lexemes, index, "a value expression")),
    }
}

fn unary(operator: &str, operand: ValueComponent) -> ValueComponent {
    ValueComponent::Unary(UnaryExpression {
        operator: operator.to_string(),
        operand: Box::new(operand),
    })
}

/// Reports whether the lexeme at `index` starts a subquery.
pub(crate) fn is_query_start(lexemes: &[Lexeme], index: usize) -> bool {
    at_command(lexemes, index, "select")
        || at_command(lexemes, index, "values")
        || at_command(lexemes, index, "with")
}

/// A parenthesized construct: a scalar `(expr)`, a tuple `(a, b)`, or an
/// inline subquery.
fn parse_paren(lexemes: &[Lexeme], index: usize) -> Result<(ValueComponent, usize)> {
    let inner = index + 1;
    if is_query_start(lexemes, inner) {
        let (query, next) = select::parse_query(lexemes, inner)?;
        let next = expect_close_paren(lexemes, next)?;
        return Ok((
            ValueComponent::Query(InlineQuery {
                query: Box::new(query),
            }),
            next,
        ));
    }
    let (first, mut next) = parse_expr(lexemes, inner, 0, BoolOps::ENABLED)?;
    if at_kind(lexemes, next, LexemeKind::Comma) {
        let mut values = vec![first];
        while at_kind(lexemes, next, LexemeKind::Comma) {
            let (value, after) = parse_expr(lexemes, next + 1, 0, BoolOps::ENABLED)?;
            values.push(value);
            next = after;
        }
        let next = expect_close_paren(lexemes, next)?;
        Ok((
            ValueComponent::Tuple(TupleExpression { values }),
            next,
        ))
    } else {
        let next = expect_close_paren(lexemes, next)?;
        Ok((
            ValueComponent::Paren(ParenExpression {
                inner: Box::new(first),
            }),
            next,
        ))
    }
}

/// The right-hand side of `in (...)`: an inline subquery or a value list.
fn parse_in_argument(lexemes: &[Lexeme], index: usize) -> Result<(ValueComponent, usize)> {
    let inner = expect_open_paren(lexemes, index)?;
    if is_query_start(lexemes, inner) {
        let (query, next) = select::parse_query(lexemes, inner)?;
        let next = expect_close_paren(lexemes, next)?;
        return Ok((
            ValueComponent::Query(InlineQuery {
                query: Box::new(query),
            }),
            next,
        ));
    }
    let mut values = Vec::new();
    let mut next = inner;
    loop {
        let (value, after) = parse_expr(lexemes, next, 0, BoolOps::ENABLED)?;
        values.push(value);
        next = after;
        if at_kind(lexemes, next, LexemeKind::Comma) {
            next += 1;
        } else {
            break;
        }
    }
    let next = expect_close_paren(lexemes, next)?;
    Ok((ValueComponent::List(ValueList { values }), next))
}

/// `case (operand)? when ... then ... (else ...)? end`
fn parse_case(lexemes: &[Lexeme], index: usize) -> Result<(ValueComponent, usize)> {
    let mut next = index + 1;
    let operand = if at_command(lexemes, next, "when") {
        None
    } else {
        let (value, after) = parse_expr(lexemes, next, 0, BoolOps::ENABLED)?;
        next = after;
        Some(Box::new(value))
    };
    let mut branches = Vec::new();
    while at_command(lexemes, next, "when") {
        let (condition, after_condition) = parse_expr(lexemes, next + 1, 0, BoolOps::ENABLED)?;
        let after_then = expect_command(lexemes, after_condition, "then")?;
        let (result, after_result) = parse_expr(lexemes, after_then, 0, BoolOps::ENABLED)?;
        branches.push(WhenBranch { condition, result });
        next = after_result;
    }
    if branches.is_empty() {
        return Err(missing(lexemes, next, "WHEN branch in CASE expression"));
    }
    let else_value = if at_command(lexemes, next, "else") {
        let (value, after) = parse_expr(lexemes, next + 1, 0, BoolOps::ENABLED)?;
        next = after;
        Some(Box::new(value))
    } else {
        None
    };
    let next = expect_command(lexemes, next, "end")?;
    Ok((
        ValueComponent::Case(CaseExpression {
            operand,
            branches,
            else_value,
        }),
        next,
    ))
}

/// `array[a, b, c]`
fn parse_array(lexemes: &[Lexeme], index: usize) -> Result<(ValueComponent, usize)> {
    let mut next = index + 1;
    if !at_kind(lexemes, next, LexemeKind::OpenBracket) {
        return Err(unexpected(lexemes, next, "`[`"));
    }
    next += 1;
    let mut values = Vec::new();
    if !at_kind(lexemes, next, LexemeKind::CloseBracket) {
        loop {
            let (value, after) = parse_expr(lexemes, next, 0, BoolOps::ENABLED)?;
            values.push(value);
            next = after;
            if at_kind(lexemes, next, LexemeKind::Comma) {
                next += 1;
            } else {
                break;
            }
        }
    }
    let next = expect_close_bracket(lexemes, next)?;
    Ok((ValueComponent::Array(ArrayConstructor { values }), next))
}

/// A dot-separated chain starting at an identifier: a column reference,
/// ending with `*`, or a namespaced function call.
fn parse_column_or_function(lexemes: &[Lexeme], index: usize) -> Result<(ValueComponent, usize)> {
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
                return parse_function_call(lexemes, next + 1, segments);
            }
            _ => return Err(unexpected(lexemes, next + 1, "identifier")),
        }
    }
    let name = segments.pop().expect("chain starts with one segment");
    Ok((
        ValueComponent::Column(ColumnReference {
            namespaces: segments,
            name,
            comments: lexemes[index].comments.clone(),
        }),
        next,
    ))
}

const LEADING_ARG_KEYWORDS: &[&str] = &["leading", "trailing", "both"];
const SEPARATOR_ARG_KEYWORDS: &[&str] = &["from", "for", "placing"];

fn at_any_command(lexemes: &[Lexeme], index: usize, values: &[&str]) -> bool {
    values.iter().any(|value| at_command(lexemes, index, value))
}

/// A function call. `cast` gets its dedicated `x as T` argument syntax;
/// `substring`/`overlay`/`trim` accept keyword-delimited arguments; other
/// calls take a comma-separated tuple and an optional `over` trailer.
pub(crate) fn parse_function_call(
    lexemes: &[Lexeme],
    index: usize,
    namespaces: Vec<String>,
) -> Result<(ValueComponent, usize)> {
    let name = lexemes[index].value.clone();
    let mut next = expect_open_paren(lexemes, index + 1)?;

    if namespaces.is_empty() && name == "cast" {
        let (value, after_value) = parse_expr(lexemes, next, 0, BoolOps::ENABLED)?;
        let after_as = expect_command(lexemes, after_value, "as")?;
        let (target, after_type) = parse_type(lexemes, after_as)?;
        let after = expect_close_paren(lexemes, after_type)?;
        return Ok((
            ValueComponent::Cast(CastExpression {
                value: Box::new(value),
                target,
                style: CastStyle::Function,
            }),
            after,
        ));
    }

    let keyword_capable =
        namespaces.is_empty() && matches!(name.as_str(), "substring" | "overlay" | "trim");

    let args;
    if at_kind(lexemes, next, LexemeKind::CloseParen) {
        args = FunctionArguments::List(Vec::new());
    } else if keyword_capable && at_any_command(lexemes, next, LEADING_ARG_KEYWORDS) {
        let (keyword_args, after) = parse_keyword_args(lexemes, next, None)?;
        args = FunctionArguments::KeywordDelimited(keyword_args);
        next = after;
    } else {
        let (first, after_first) = parse_expr(lexemes, next, 0, BoolOps::ENABLED)?;
        if keyword_capable && at_any_command(lexemes, after_first, SEPARATOR_ARG_KEYWORDS) {
            let (keyword_args, after) = parse_keyword_args(lexemes, after_first, Some(first))?;
            args = FunctionArguments::KeywordDelimited(keyword_args);
            next = after;
        } else {
            let mut values = vec![first];
            next = after_first;
            while at_kind(lexemes, next, LexemeKind::Comma) {
                let (value, after) = parse_expr(lexemes, next + 1, 0, BoolOps::ENABLED)?;
                values.push(value);
                next = after;
            }
            args = FunctionArguments::List(values);
        }
    }
    let mut next = expect_close_paren(lexemes, next)?;

    let over = if at_command(lexemes, next, "over") {
        let (over, after) = parse_over(lexemes, next + 1)?;
        next = after;
        Some(over)
    } else {
        None
    };

    Ok((
        ValueComponent::Function(FunctionCall {
            namespaces,
            name,
            args,
            over,
        }),
        next,
    ))
}

fn parse_keyword_args(
    lexemes: &[Lexeme],
    index: usize,
    first: Option<ValueComponent>,
) -> Result<(Vec<KeywordArgument>, usize)> {
    let mut args = Vec::new();
    if let Some(value) = first {
        args.push(KeywordArgument {
            keyword: None,
            value: Some(value),
        });
    }
    let mut next = index;
    while !at_kind(lexemes, next, LexemeKind::CloseParen) {
        if at_any_command(lexemes, next, LEADING_ARG_KEYWORDS)
            || at_any_command(lexemes, next, SEPARATOR_ARG_KEYWORDS)
        {
            let keyword = lexemes[next].value.clone();
            next += 1;
            let value = if at_kind(lexemes, next, LexemeKind::CloseParen)
                || at_any_command(lexemes, next, LEADING_ARG_KEYWORDS)
                || at_any_command(lexemes, next, SEPARATOR_ARG_KEYWORDS)
            {
                None
            } else {
                let (value, after) = parse_expr(lexemes, next, 0, BoolOps::ENABLED)?;
                next = after;
                Some(value)
            };
            args.push(KeywordArgument {
                keyword: Some(keyword),
                value,
            });
        } else {
            return Err(unexpected(lexemes, next, "argument keyword or `)`"));
        }
    }
    Ok((args, next))
}

/// The `over` trailer: a named window reference or an inline frame.
fn parse_over(lexemes: &[Lexeme], index: usize) -> Result<(OverClause, usize)> {
    if at_kind(lexemes, index, LexemeKind::OpenParen) {
        let inner = index + 1;
        // `over (w)` references a named window.
        if at_kind(lexemes, inner, LexemeKind::Identifier)
            && at_kind(lexemes, inner + 1, LexemeKind::CloseParen)
        {
            return Ok((
                OverClause::Named(lexemes[inner].value.clone()),
                inner + 2,
            ));
        }
        let (frame, next) = clause::parse_window_frame_expression(lexemes, inner)?;
        let next = expect_close_paren(lexemes, next)?;
        Ok((OverClause::Frame(Box::new(frame)), next))
    } else if at_kind(lexemes, index, LexemeKind::Identifier) {
        Ok((OverClause::Named(lexemes[index].value.clone()), index + 1))
    } else {
        Err(unexpected(lexemes, index, "window name or `(`"))
    }
}

/// A (possibly qualified, possibly parameterized) type value, after `::`
/// or `as` in a cast.
pub(crate) fn parse_type(lexemes: &[Lexeme], index: usize) -> Result<(TypeValue, usize)> {
    let mut segments: Vec<String> = Vec::new();
    let mut next = index;
    loop {
        let Some(lexeme) = lexemes.get(next) else {
            return Err(unexpected(lexemes, next, "type name"));
        };
        match lexeme.kind {
            LexemeKind::Type => {
                segments.push(lexeme.value.clone());
                next += 1;
                break;
            }
            LexemeKind::Function => {
                // A parameterized user-defined type lexes as a function
                // name; the argument list is read below.
                segments.push(lexeme.value.clone());
                next += 1;
                break;
            }
            LexemeKind::Identifier => {
                segments.push(lexeme.value.clone());
                next += 1;
                if at_kind(lexemes, next, LexemeKind::Dot) {
                    next += 1;
                } else {
                    break;
                }
            }
            _ => return Err(unexpected(lexemes, next, "type name")),
        }
    }
    let name = segments.pop().expect("type has at least one segment");

    let mut args = Vec::new();
    if at_kind(lexemes, next, LexemeKind::OpenParen) {
        next += 1;
        loop {
            let (value, after) = parse_expr(lexemes, next, 0, BoolOps::ENABLED)?;
            args.push(value);
            next = after;
            if at_kind(lexemes, next, LexemeKind::Comma) {
                next += 1;
            } else {
                break;
            }
        }
        next = expect_close_paren(lexemes, next)?;
    }
    Ok((
        TypeValue {
            namespaces: segments,
            name,
            args,
        },
        next,
    ))
}
