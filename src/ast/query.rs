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

//! Statement nodes and their mutation seams.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::{
    CommonTable, FetchClause, ForClause, FromClause, GroupByClause, HavingClause, JoinClause,
    LimitClause, NodeKind, OrderByClause, SelectClause, SelectItem, SourceExpression, SqlNode,
    TupleExpression, ValueComponent, WhereClause, WindowClause, WithClause,
};
use crate::error::{Result, SqlError};

/// Any query usable as a SELECT statement or subquery: a simple select, a
/// set operation, or a VALUES list.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SelectQuery {
    Simple(SimpleSelectQuery),
    Binary(BinarySelectQuery),
    Values(ValuesQuery),
}

impl SelectQuery {
    fn combine<S>(self, operator: S, right: SelectQuery) -> SelectQuery
    where
        S: Into<String>,
    {
        SelectQuery::Binary(BinarySelectQuery {
            left: Box::new(self),
            operator: operator.into(),
            right: Box::new(right),
        })
    }

    pub fn union(self, right: SelectQuery) -> SelectQuery {
        self.combine("union", right)
    }

    pub fn union_all(self, right: SelectQuery) -> SelectQuery {
        self.combine("union all", right)
    }

    pub fn intersect(self, right: SelectQuery) -> SelectQuery {
        self.combine("intersect", right)
    }

    pub fn intersect_all(self, right: SelectQuery) -> SelectQuery {
        self.combine("intersect all", right)
    }

    pub fn except(self, right: SelectQuery) -> SelectQuery {
        self.combine("except", right)
    }

    pub fn except_all(self, right: SelectQuery) -> SelectQuery {
        self.combine("except all", right)
    }

    pub fn as_simple(&self) -> Option<&SimpleSelectQuery> {
        match self {
            SelectQuery::Simple(simple) => Some(simple),
            _ => None,
        }
    }

    pub fn as_simple_mut(&mut self) -> Option<&mut SimpleSelectQuery> {
        match self {
            SelectQuery::Simple(simple) => Some(simple),
            _ => None,
        }
    }
}

impl SqlNode for SelectQuery {
    fn kind(&self) -> NodeKind {
        match self {
            SelectQuery::Simple(_) => NodeKind::SimpleSelectQuery,
            SelectQuery::Binary(_) => NodeKind::BinarySelectQuery,
            SelectQuery::Values(_) => NodeKind::ValuesQuery,
        }
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&crate::printer::print_default(self))
    }
}

/// A plain `select ... from ... where ...` query.
///
/// Invariants: HAVING requires GROUP BY, and an ORDER BY item may name a
/// window only when a WINDOW clause defines it.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimpleSelectQuery {
    pub with: Option<WithClause>,
    pub select: SelectClause,
    pub from: Option<FromClause>,
    pub where_clause: Option<WhereClause>,
    pub group_by: Option<GroupByClause>,
    pub having: Option<HavingClause>,
    pub window: Option<WindowClause>,
    pub order_by: Option<OrderByClause>,
    pub limit: Option<LimitClause>,
    pub fetch: Option<FetchClause>,
    pub for_clause: Option<ForClause>,
}

impl SimpleSelectQuery {
    /// Builds a minimal query from a SELECT clause.
    pub fn new(select: SelectClause) -> SimpleSelectQuery {
        SimpleSelectQuery {
            with: None,
            select,
            from: None,
            where_clause: None,
            group_by: None,
            having: None,
            window: None,
            order_by: None,
            limit: None,
            fetch: None,
            for_clause: None,
        }
    }

    /// Narrows the WHERE clause by AND-ing `predicate` onto it, creating
    /// the clause when absent.
    pub fn append_where_and(&mut self, predicate: ValueComponent) {
        match &mut self.where_clause {
            Some(clause) => clause.and(predicate),
            None => {
                self.where_clause = Some(WhereClause {
                    condition: predicate,
                })
            }
        }
    }

    /// Narrows the HAVING clause by AND-ing `predicate` onto it.
    ///
    /// Fails with [`InvalidConfiguration`](crate::ErrorKind::InvalidConfiguration)
    /// when the query has no GROUP BY: HAVING without GROUP BY would break
    /// the statement invariant.
    pub fn append_having_and(&mut self, predicate: ValueComponent) -> Result<()> {
        if self.group_by.is_none() {
            return Err(SqlError::invalid(
                "cannot append HAVING to a query without GROUP BY",
            ));
        }
        match &mut self.having {
            Some(clause) => clause.and(predicate),
            None => {
                self.having = Some(HavingClause {
                    condition: predicate,
                })
            }
        }
        Ok(())
    }

    /// Attaches a whole WITH clause. Fails when one is already present.
    pub fn attach_with(&mut self, with: WithClause) -> Result<()> {
        if self.with.is_some() {
            return Err(SqlError::invalid(
                "query already has a WITH clause; append common tables instead",
            ));
        }
        self.with = Some(with);
        Ok(())
    }

    /// Appends one common table, creating the WITH clause when absent.
    /// Fails when a common table of the same name already exists.
    pub fn append_common_table(&mut self, table: CommonTable) -> Result<()> {
        let with = self.with.get_or_insert_with(|| WithClause {
            recursive: false,
            tables: Vec::new(),
        });
        if with.tables.iter().any(|t| t.name == table.name) {
            return Err(SqlError::invalid(format!(
                "common table `{}` is already defined",
                table.name
            )));
        }
        with.tables.push(table);
        Ok(())
    }

    /// Appends a JOIN. Fails when the query has no FROM clause to join to.
    pub fn append_join(&mut self, join: JoinClause) -> Result<()> {
        match &mut self.from {
            Some(from) => {
                from.joins.push(join);
                Ok(())
            }
            None => Err(SqlError::invalid(
                "cannot append a JOIN to a query without FROM",
            )),
        }
    }

    /// Replaces the expression of the select item whose effective alias is
    /// `name`. Fails unless the name matches exactly one item.
    pub fn override_select_item(&mut self, name: &str, value: ValueComponent) -> Result<()> {
        let mut matches = self
            .select
            .items
            .iter_mut()
            .filter(|item| item.effective_alias() == Some(name));
        let Some(first) = matches.next() else {
            return Err(SqlError::invalid(format!(
                "no select item is named `{name}`"
            )));
        };
        if matches.next().is_some() {
            return Err(SqlError::invalid(format!(
                "select item name `{name}` is ambiguous"
            )));
        }
        // Keep the original output name when the item relied on its
        // implicit alias.
        if first.alias.is_none() {
            first.alias = Some(name.to_string());
        }
        first.value = value;
        Ok(())
    }
}

impl SqlNode for SimpleSelectQuery {
    fn kind(&self) -> NodeKind {
        NodeKind::SimpleSelectQuery
    }
}

/// A set operation. Chains are left-associative: `a union b union c`
/// nests as `(a union b) union c`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinarySelectQuery {
    pub left: Box<SelectQuery>,
    /// `union`, `union all`, `intersect`, `intersect all`, `except`, or
    /// `except all`.
    pub operator: String,
    pub right: Box<SelectQuery>,
}

impl SqlNode for BinarySelectQuery {
    fn kind(&self) -> NodeKind {
        NodeKind::BinarySelectQuery
    }
}

/// A `values (...), (...)` query. All rows have equal arity.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValuesQuery {
    pub rows: Vec<TupleExpression>,
    /// Column names applied when the VALUES list is wrapped into a simple
    /// select; they do not print as part of the VALUES itself.
    pub column_aliases: Option<Vec<String>>,
}

impl ValuesQuery {
    /// Wraps the VALUES list into `select * from (values ...) as
    /// alias(columns)`, using the stored column aliases when present.
    pub fn into_simple_select<S>(self, alias: S) -> SimpleSelectQuery
    where
        S: Into<String>,
    {
        use crate::ast::{Source, SourceAlias};

        let columns = self.column_aliases.clone().unwrap_or_default();
        let select = SelectClause {
            distinct: None,
            items: vec![SelectItem::new(ValueComponent::column("*"))],
            comments: Vec::new(),
        };
        let mut query = SimpleSelectQuery::new(select);
        query.from = Some(FromClause {
            source: SourceExpression {
                source: Source::Query(Box::new(SelectQuery::Values(self))),
                alias: Some(SourceAlias {
                    name: alias.into(),
                    columns,
                }),
            },
            joins: Vec::new(),
        });
        query
    }
}

impl SqlNode for ValuesQuery {
    fn kind(&self) -> NodeKind {
        NodeKind::ValuesQuery
    }
}

/// `insert into ns.table (columns) <select-or-values>`
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InsertQuery {
    pub namespaces: Vec<String>,
    pub table: String,
    pub columns: Vec<String>,
    pub source: Box<SelectQuery>,
    pub returning: Option<Vec<SelectItem>>,
}

impl SqlNode for InsertQuery {
    fn kind(&self) -> NodeKind {
        NodeKind::InsertQuery
    }
}

impl fmt::Display for InsertQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&crate::printer::print_insert_default(self))
    }
}

/// One `column = value` assignment of an UPDATE's SET list.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetItem {
    pub column: String,
    pub value: ValueComponent,
}

impl SqlNode for SetItem {
    fn kind(&self) -> NodeKind {
        NodeKind::SetItem
    }
}

/// `update target set ... from? where? returning?`
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UpdateQuery {
    pub target: SourceExpression,
    pub set: Vec<SetItem>,
    pub from: Option<FromClause>,
    pub where_clause: Option<WhereClause>,
    pub returning: Option<Vec<SelectItem>>,
}

impl UpdateQuery {
    /// Narrows the WHERE clause by AND-ing `predicate` onto it.
    pub fn append_where_and(&mut self, predicate: ValueComponent) {
        match &mut self.where_clause {
            Some(clause) => clause.and(predicate),
            None => {
                self.where_clause = Some(WhereClause {
                    condition: predicate,
                })
            }
        }
    }
}

impl SqlNode for UpdateQuery {
    fn kind(&self) -> NodeKind {
        NodeKind::UpdateQuery
    }
}

impl fmt::Display for UpdateQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&crate::printer::print_update_default(self))
    }
}

/// `delete from target using? where? returning?`
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeleteQuery {
    pub target: SourceExpression,
    pub using: Option<Vec<SourceExpression>>,
    pub where_clause: Option<WhereClause>,
    pub returning: Option<Vec<SelectItem>>,
}

impl DeleteQuery {
    /// Narrows the WHERE clause by AND-ing `predicate` onto it.
    pub fn append_where_and(&mut self, predicate: ValueComponent) {
        match &mut self.where_clause {
            Some(clause) => clause.and(predicate),
            None => {
                self.where_clause = Some(WhereClause {
                    condition: predicate,
                })
            }
        }
    }
}

impl SqlNode for DeleteQuery {
    fn kind(&self) -> NodeKind {
        NodeKind::DeleteQuery
    }
}

impl fmt::Display for DeleteQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&crate::printer::print_delete_default(self))
    }
}
