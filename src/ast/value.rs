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

//! Value components: every expression usable where a value is expected.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::{NodeKind, SelectQuery, SqlNode};

/// The closed sum of value expressions.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueComponent {
    Column(ColumnReference),
    Literal(LiteralValue),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Paren(ParenExpression),
    Function(FunctionCall),
    Cast(CastExpression),
    Between(BetweenExpression),
    Case(CaseExpression),
    Tuple(TupleExpression),
    List(ValueList),
    Array(ArrayConstructor),
    Query(InlineQuery),
    Parameter(ParameterValue),
    Type(TypeValue),
    StringSpecifier(StringSpecifierValue),
}

impl SqlNode for ValueComponent {
    fn kind(&self) -> NodeKind {
        match self {
            ValueComponent::Column(_) => NodeKind::ColumnReference,
            ValueComponent::Literal(_) => NodeKind::LiteralValue,
            ValueComponent::Unary(_) => NodeKind::UnaryExpression,
            ValueComponent::Binary(_) => NodeKind::BinaryExpression,
            ValueComponent::Paren(_) => NodeKind::ParenExpression,
            ValueComponent::Function(_) => NodeKind::FunctionCall,
            ValueComponent::Cast(_) => NodeKind::CastExpression,
            ValueComponent::Between(_) => NodeKind::BetweenExpression,
            ValueComponent::Case(_) => NodeKind::CaseExpression,
            ValueComponent::Tuple(_) => NodeKind::TupleExpression,
            ValueComponent::List(_) => NodeKind::ValueList,
            ValueComponent::Array(_) => NodeKind::ArrayConstructor,
            ValueComponent::Query(_) => NodeKind::InlineQuery,
            ValueComponent::Parameter(_) => NodeKind::ParameterValue,
            ValueComponent::Type(_) => NodeKind::TypeValue,
            ValueComponent::StringSpecifier(_) => NodeKind::StringSpecifierValue,
        }
    }
}

impl ValueComponent {
    /// Builds a bare (unqualified) column reference.
    pub fn column<S>(name: S) -> ValueComponent
    where
        S: Into<String>,
    {
        ValueComponent::Column(ColumnReference {
            namespaces: Vec::new(),
            name: name.into(),
            comments: Vec::new(),
        })
    }

    /// Builds a literal from its source text.
    pub fn literal<S>(text: S) -> ValueComponent
    where
        S: Into<String>,
    {
        ValueComponent::Literal(LiteralValue {
            text: text.into(),
            comments: Vec::new(),
        })
    }

    /// Combines two expressions with a binary operator.
    pub fn binary<S>(left: ValueComponent, operator: S, right: ValueComponent) -> ValueComponent
    where
        S: Into<String>,
    {
        ValueComponent::Binary(BinaryExpression {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
        })
    }

    /// Combines two predicates with `and`.
    pub fn and(left: ValueComponent, right: ValueComponent) -> ValueComponent {
        ValueComponent::binary(left, "and", right)
    }

    /// The column name when this value is a bare column reference. Used to
    /// derive a select item's implicit alias.
    pub fn bare_column_name(&self) -> Option<&str> {
        match self {
            ValueComponent::Column(column) if column.name != "*" => Some(&column.name),
            _ => None,
        }
    }
}

impl fmt::Display for ValueComponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&crate::printer::print_value_default(self))
    }
}

/// A possibly qualified column reference; `name` may be the `*` wildcard.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnReference {
    /// Qualifying path, e.g. `["db", "schema", "t"]` in `db.schema.t.c`.
    pub namespaces: Vec<String>,
    pub name: String,
    /// Comments the source attached to this reference.
    pub comments: Vec<String>,
}

/// A literal, kept as its original source text: numbers, quoted strings
/// (quotes included), booleans, `null`, and keyword literals such as
/// `current_timestamp`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LiteralValue {
    pub text: String,
    /// Comments the source attached to this literal.
    pub comments: Vec<String>,
}

/// A prefix operator applied to an operand, e.g. `-x` or `not found`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryExpression {
    /// Lower-cased canonical operator text.
    pub operator: String,
    pub operand: Box<ValueComponent>,
}

/// A binary operator expression. The operator is the lower-cased canonical
/// text (`=`, `and`, `not like`, `is not distinct from`, ...).
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinaryExpression {
    pub left: Box<ValueComponent>,
    pub operator: String,
    pub right: Box<ValueComponent>,
}

/// An explicitly parenthesized scalar expression.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParenExpression {
    pub inner: Box<ValueComponent>,
}

/// How a function's arguments were spelled.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FunctionArguments {
    /// The ordinary comma-separated tuple: `coalesce(a, b, c)`.
    List(Vec<ValueComponent>),
    /// Keyword-delimited arguments, as in `substring(x from 1 for 2)` or
    /// `trim(both ' ' from x)`.
    KeywordDelimited(Vec<KeywordArgument>),
}

/// One element of a keyword-delimited argument tuple. Either part may be
/// absent: `trim(both from x)` has a bare keyword, and the first argument
/// of `substring(x from 1)` has no keyword.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeywordArgument {
    pub keyword: Option<String>,
    pub value: Option<ValueComponent>,
}

/// A function call, optionally windowed with `OVER`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionCall {
    pub namespaces: Vec<String>,
    /// Lower-cased canonical function name.
    pub name: String,
    pub args: FunctionArguments,
    pub over: Option<OverClause>,
}

/// The `OVER` trailer of a windowed function call.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverClause {
    /// `over w`: a reference to a named window.
    Named(String),
    /// `over (partition by ... order by ... rows ...)`.
    Frame(Box<crate::ast::WindowFrameExpression>),
}

/// Which syntax a cast was written in. Printing preserves the spelling.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastStyle {
    /// `value::type`
    DoubleColon,
    /// `cast(value as type)`
    Function,
}

/// A cast, via either `::` or `CAST(x AS T)`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastExpression {
    pub value: Box<ValueComponent>,
    pub target: TypeValue,
    pub style: CastStyle,
}

/// `value [not] between lower and upper`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BetweenExpression {
    pub value: Box<ValueComponent>,
    pub negated: bool,
    pub lower: Box<ValueComponent>,
    pub upper: Box<ValueComponent>,
}

/// One `when ... then ...` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WhenBranch {
    pub condition: ValueComponent,
    pub result: ValueComponent,
}

/// A CASE expression, in either the simple form (with an operand) or the
/// searched form (without one).
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseExpression {
    pub operand: Option<Box<ValueComponent>>,
    pub branches: Vec<WhenBranch>,
    pub else_value: Option<Box<ValueComponent>>,
}

/// A parenthesized tuple: a VALUES row or a row constructor.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TupleExpression {
    pub values: Vec<ValueComponent>,
}

/// The parenthesized list on the right of `in (...)`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueList {
    pub values: Vec<ValueComponent>,
}

/// `array[a, b, c]`
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayConstructor {
    pub values: Vec<ValueComponent>,
}

/// A parenthesized subquery used as a value.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InlineQuery {
    pub query: Box<SelectQuery>,
}

/// A placeholder. The name is stored without its sigil; anonymous `?`
/// placeholders have an empty name. Printing uses the `:name` form.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterValue {
    pub name: String,
    /// Comments the source attached to this placeholder.
    pub comments: Vec<String>,
}

/// A (possibly parameterized, possibly qualified) type name, e.g.
/// `numeric(10, 2)` or `myschema.mood`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeValue {
    pub namespaces: Vec<String>,
    pub name: String,
    pub args: Vec<ValueComponent>,
}

impl TypeValue {
    pub fn named<S>(name: S) -> TypeValue
    where
        S: Into<String>,
    {
        TypeValue {
            namespaces: Vec::new(),
            name: name.into(),
            args: Vec::new(),
        }
    }
}

/// A prefixed string literal such as `e'...'` or `u&'...'`. The specifier
/// and the literal lex as adjacent lexemes and are fused here.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StringSpecifierValue {
    /// The lower-cased prefix: `e`, `x`, `b`, or `u&`.
    pub specifier: String,
    /// The quoted literal text, quotes included.
    pub literal: String,
}
