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

//! SQL Abstract Syntax Tree (AST) types.
//!
//! The tree has two top-level categories: **clauses** (the structural parts
//! of a statement) and **value components** (expressions usable wherever a
//! value is expected). Every node carries a stable [`NodeKind`] tag used
//! for visitor dispatch, and parents own their children exclusively; reuse
//! a subtree elsewhere by cloning it.

pub use self::clause::{
    CommonTable, Distinct, FetchClause, FetchKind, FetchUnit, ForClause, FrameBound, FrameSpec,
    FrameUnit, FromClause, GroupByClause, GroupByItem, HavingClause, JoinClause, JoinCondition,
    LimitClause, LockMode, NullsPosition, OrderByClause, OrderByItem, PartitionByClause,
    SelectClause, SelectItem, SortDirection, Source, SourceAlias, SourceExpression, WhereClause,
    WindowClause, WindowDefinition, WindowFrameExpression, WithClause,
};
pub use self::query::{
    BinarySelectQuery, DeleteQuery, InsertQuery, SelectQuery, SetItem, SimpleSelectQuery,
    UpdateQuery, ValuesQuery,
};
pub use self::value::{
    ArrayConstructor, BetweenExpression, BinaryExpression, CaseExpression, CastExpression,
    CastStyle, ColumnReference, FunctionArguments, FunctionCall, InlineQuery, KeywordArgument,
    LiteralValue, OverClause, ParameterValue, ParenExpression, StringSpecifierValue,
    TupleExpression, TypeValue, UnaryExpression, ValueComponent, ValueList, WhenBranch,
};

mod clause;
mod query;
mod value;

/// The stable kind tag every AST node advertises.
///
/// Kinds drive visitor dispatch without runtime type introspection; the
/// enum is closed, so matches over it stay exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    SimpleSelectQuery,
    BinarySelectQuery,
    ValuesQuery,
    InsertQuery,
    UpdateQuery,
    DeleteQuery,
    WithClause,
    CommonTable,
    SelectClause,
    SelectItem,
    FromClause,
    SourceExpression,
    JoinClause,
    WhereClause,
    GroupByClause,
    HavingClause,
    WindowClause,
    WindowDefinition,
    WindowFrameExpression,
    PartitionByClause,
    OrderByClause,
    OrderByItem,
    LimitClause,
    FetchClause,
    ForClause,
    SetItem,
    ColumnReference,
    LiteralValue,
    UnaryExpression,
    BinaryExpression,
    ParenExpression,
    FunctionCall,
    CastExpression,
    BetweenExpression,
    CaseExpression,
    TupleExpression,
    ValueList,
    ArrayConstructor,
    InlineQuery,
    ParameterValue,
    TypeValue,
    StringSpecifierValue,
}

/// Implemented by every AST node: the node's stable kind tag.
pub trait SqlNode {
    fn kind(&self) -> NodeKind;
}
