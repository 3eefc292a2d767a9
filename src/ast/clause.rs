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

//! Clause nodes: the structural parts of SELECT/INSERT/UPDATE/DELETE
//! statements.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::{NodeKind, SelectQuery, SqlNode, TupleExpression, ValueComponent};

/// The `distinct` modifier of a SELECT clause.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Distinct {
    Distinct,
    /// `distinct on (expr, ...)`
    DistinctOn(Vec<ValueComponent>),
}

/// One projected item: a value with an optional alias.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectItem {
    pub value: ValueComponent,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(value: ValueComponent) -> SelectItem {
        SelectItem { value, alias: None }
    }

    pub fn aliased<S>(value: ValueComponent, alias: S) -> SelectItem
    where
        S: Into<String>,
    {
        SelectItem {
            value,
            alias: Some(alias.into()),
        }
    }

    /// The explicit alias, or the implicit one when the value is a bare
    /// column reference.
    pub fn effective_alias(&self) -> Option<&str> {
        self.alias.as_deref().or_else(|| self.value.bare_column_name())
    }
}

impl SqlNode for SelectItem {
    fn kind(&self) -> NodeKind {
        NodeKind::SelectItem
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectClause {
    pub distinct: Option<Distinct>,
    pub items: Vec<SelectItem>,
    /// Comments attached to the `select` keyword, typically the leading
    /// comments of the whole statement.
    pub comments: Vec<String>,
}

impl SqlNode for SelectClause {
    fn kind(&self) -> NodeKind {
        NodeKind::SelectClause
    }
}

/// An unaliased source: a table, a table function, a subquery, or a
/// parenthesized nested source.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Source {
    Table {
        namespaces: Vec<String>,
        name: String,
    },
    Function {
        namespaces: Vec<String>,
        name: String,
        args: Vec<ValueComponent>,
    },
    Query(Box<SelectQuery>),
    Paren(Box<SourceExpression>),
}

/// `alias (col, col, ...)?` after a source.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceAlias {
    pub name: String,
    pub columns: Vec<String>,
}

/// A source plus its optional alias.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceExpression {
    pub source: Source,
    pub alias: Option<SourceAlias>,
}

impl SourceExpression {
    /// Builds a plain table source with no alias.
    pub fn table<S>(name: S) -> SourceExpression
    where
        S: Into<String>,
    {
        SourceExpression {
            source: Source::Table {
                namespaces: Vec::new(),
                name: name.into(),
            },
            alias: None,
        }
    }
}

impl SqlNode for SourceExpression {
    fn kind(&self) -> NodeKind {
        NodeKind::SourceExpression
    }
}

/// The join condition; ON and USING are mutually exclusive, and natural or
/// cross joins carry neither.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JoinCondition {
    On(ValueComponent),
    Using(Vec<String>),
}

/// One join step in a FROM clause.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JoinClause {
    /// The canonical join keyword as lexed (`inner join`,
    /// `left outer join`, ...). A bare comma parses as `cross join`.
    pub join_type: String,
    pub lateral: bool,
    pub source: SourceExpression,
    pub condition: Option<JoinCondition>,
}

impl SqlNode for JoinClause {
    fn kind(&self) -> NodeKind {
        NodeKind::JoinClause
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FromClause {
    pub source: SourceExpression,
    pub joins: Vec<JoinClause>,
}

impl SqlNode for FromClause {
    fn kind(&self) -> NodeKind {
        NodeKind::FromClause
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WhereClause {
    pub condition: ValueComponent,
}

impl WhereClause {
    /// Narrows the condition by AND-ing another predicate onto it.
    pub fn and(&mut self, predicate: ValueComponent) {
        let existing = std::mem::replace(
            &mut self.condition,
            ValueComponent::literal("true"),
        );
        self.condition = ValueComponent::and(existing, predicate);
    }
}

impl SqlNode for WhereClause {
    fn kind(&self) -> NodeKind {
        NodeKind::WhereClause
    }
}

/// One GROUP BY element.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GroupByItem {
    Expression(ValueComponent),
    /// `grouping sets ((a, b), (c), ())`
    GroupingSets(Vec<TupleExpression>),
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupByClause {
    pub items: Vec<GroupByItem>,
}

impl SqlNode for GroupByClause {
    fn kind(&self) -> NodeKind {
        NodeKind::GroupByClause
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HavingClause {
    pub condition: ValueComponent,
}

impl HavingClause {
    /// Narrows the condition by AND-ing another predicate onto it.
    pub fn and(&mut self, predicate: ValueComponent) {
        let existing = std::mem::replace(
            &mut self.condition,
            ValueComponent::literal("true"),
        );
        self.condition = ValueComponent::and(existing, predicate);
    }
}

impl SqlNode for HavingClause {
    fn kind(&self) -> NodeKind {
        NodeKind::HavingClause
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NullsPosition {
    First,
    Last,
}

/// One ORDER BY element. The direction defaults to ascending.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderByItem {
    pub value: ValueComponent,
    pub direction: SortDirection,
    pub nulls: Option<NullsPosition>,
}

impl OrderByItem {
    pub fn ascending(value: ValueComponent) -> OrderByItem {
        OrderByItem {
            value,
            direction: SortDirection::Ascending,
            nulls: None,
        }
    }
}

impl SqlNode for OrderByItem {
    fn kind(&self) -> NodeKind {
        NodeKind::OrderByItem
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderByClause {
    pub items: Vec<OrderByItem>,
}

impl SqlNode for OrderByClause {
    fn kind(&self) -> NodeKind {
        NodeKind::OrderByClause
    }
}

/// `partition by expr, ...`. A single expression is a one-item list.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartitionByClause {
    pub values: Vec<ValueComponent>,
}

impl SqlNode for PartitionByClause {
    fn kind(&self) -> NodeKind {
        NodeKind::PartitionByClause
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameUnit {
    Rows,
    Range,
    Groups,
}

/// A window frame endpoint.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(ValueComponent),
    Following(ValueComponent),
}

/// `{rows|range|groups} (bound | between bound and bound)`. A BETWEEN
/// frame has both endpoints; a single-bound frame has a start only.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameSpec {
    pub unit: FrameUnit,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
}

/// The parenthesized body of `over (...)` or a `window ... as (...)`
/// definition.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowFrameExpression {
    pub partition: Option<PartitionByClause>,
    pub order: Option<OrderByClause>,
    pub frame: Option<FrameSpec>,
}

impl SqlNode for WindowFrameExpression {
    fn kind(&self) -> NodeKind {
        NodeKind::WindowFrameExpression
    }
}

/// `name as (window-frame-expression)`
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowDefinition {
    pub name: String,
    pub frame: WindowFrameExpression,
}

impl SqlNode for WindowDefinition {
    fn kind(&self) -> NodeKind {
        NodeKind::WindowDefinition
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowClause {
    pub definitions: Vec<WindowDefinition>,
}

impl WindowClause {
    /// Looks up a named window definition.
    pub fn get(&self, name: &str) -> Option<&WindowDefinition> {
        self.definitions.iter().find(|def| def.name == name)
    }
}

impl SqlNode for WindowClause {
    fn kind(&self) -> NodeKind {
        NodeKind::WindowClause
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LimitClause {
    pub limit: ValueComponent,
    pub offset: Option<ValueComponent>,
}

impl SqlNode for LimitClause {
    fn kind(&self) -> NodeKind {
        NodeKind::LimitClause
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FetchKind {
    First,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FetchUnit {
    RowsOnly,
    Percent,
    PercentWithTies,
}

/// `fetch {first|next} (count)? {rows only | percent | percent with ties}`.
/// An omitted count defaults to 1.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FetchClause {
    pub kind: FetchKind,
    pub count: ValueComponent,
    pub unit: FetchUnit,
}

impl SqlNode for FetchClause {
    fn kind(&self) -> NodeKind {
        NodeKind::FetchClause
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LockMode {
    Update,
    Share,
    KeyShare,
    NoKeyUpdate,
}

/// `for {update | share | key share | no key update}`
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForClause {
    pub lock: LockMode,
}

impl SqlNode for ForClause {
    fn kind(&self) -> NodeKind {
        NodeKind::ForClause
    }
}

/// One named query of a WITH clause. CTEs refer to upstream CTEs by name,
/// a lookup relation rather than a pointer, so the tree stays acyclic.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CommonTable {
    pub name: String,
    pub columns: Option<Vec<String>>,
    /// `Some(true)` for `materialized`, `Some(false)` for
    /// `not materialized`, `None` when unspecified.
    pub materialized: Option<bool>,
    pub query: Box<SelectQuery>,
}

impl SqlNode for CommonTable {
    fn kind(&self) -> NodeKind {
        NodeKind::CommonTable
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WithClause {
    pub recursive: bool,
    pub tables: Vec<CommonTable>,
}

impl SqlNode for WithClause {
    fn kind(&self) -> NodeKind {
        NodeKind::WithClause
    }
}
