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

//! The read-only visitor protocol.
//!
//! A [`Visitor`] maps node kinds to handlers; every handler defaults to
//! walking the node's children, so an implementation overrides only the
//! kinds it cares about. Dispatch is an exhaustive `match` over the closed
//! AST enums. Transformers such as column collectors or schema extractors
//! are built on this protocol without knowing concrete node layouts.

use crate::ast::*;

/// A mapping from node kind to handler. Every method defaults to
/// structural descent via the matching `walk_*` function.
#[allow(unused_variables)]
pub trait Visitor {
    fn visit_query(&mut self, query: &SelectQuery) {
        walk_query(self, query)
    }

    fn visit_simple_select(&mut self, query: &SimpleSelectQuery) {
        walk_simple_select(self, query)
    }

    fn visit_binary_select(&mut self, query: &BinarySelectQuery) {
        walk_binary_select(self, query)
    }

    fn visit_values(&mut self, query: &ValuesQuery) {
        walk_values(self, query)
    }

    fn visit_insert(&mut self, query: &InsertQuery) {
        walk_insert(self, query)
    }

    fn visit_update(&mut self, query: &UpdateQuery) {
        walk_update(self, query)
    }

    fn visit_delete(&mut self, query: &DeleteQuery) {
        walk_delete(self, query)
    }

    fn visit_with_clause(&mut self, with: &WithClause) {
        walk_with_clause(self, with)
    }

    fn visit_common_table(&mut self, table: &CommonTable) {
        walk_common_table(self, table)
    }

    fn visit_select_clause(&mut self, select: &SelectClause) {
        walk_select_clause(self, select)
    }

    fn visit_select_item(&mut self, item: &SelectItem) {
        walk_select_item(self, item)
    }

    fn visit_from_clause(&mut self, from: &FromClause) {
        walk_from_clause(self, from)
    }

    fn visit_source_expression(&mut self, source: &SourceExpression) {
        walk_source_expression(self, source)
    }

    fn visit_join_clause(&mut self, join: &JoinClause) {
        walk_join_clause(self, join)
    }

    fn visit_where_clause(&mut self, clause: &WhereClause) {
        self.visit_value(&clause.condition)
    }

    fn visit_group_by_clause(&mut self, clause: &GroupByClause) {
        walk_group_by_clause(self, clause)
    }

    fn visit_having_clause(&mut self, clause: &HavingClause) {
        self.visit_value(&clause.condition)
    }

    fn visit_window_clause(&mut self, clause: &WindowClause) {
        walk_window_clause(self, clause)
    }

    fn visit_window_frame_expression(&mut self, frame: &WindowFrameExpression) {
        walk_window_frame_expression(self, frame)
    }

    fn visit_order_by_clause(&mut self, clause: &OrderByClause) {
        walk_order_by_clause(self, clause)
    }

    fn visit_limit_clause(&mut self, clause: &LimitClause) {
        walk_limit_clause(self, clause)
    }

    fn visit_fetch_clause(&mut self, clause: &FetchClause) {
        self.visit_value(&clause.count)
    }

    fn visit_for_clause(&mut self, clause: &ForClause) {}

    fn visit_value(&mut self, value: &ValueComponent) {
        walk_value(self, value)
    }

    fn visit_column_reference(&mut self, column: &ColumnReference) {}

    fn visit_literal(&mut self, literal: &LiteralValue) {}

    fn visit_parameter(&mut self, parameter: &ParameterValue) {}

    fn visit_function_call(&mut self, call: &FunctionCall) {
        walk_function_call(self, call)
    }

    fn visit_type_value(&mut self, ty: &TypeValue) {
        walk_type_value(self, ty)
    }
}

/// Dispatches a node to the matching visitor handler.
pub trait Accept {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V);
}

impl Accept for SelectQuery {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_query(self)
    }
}

impl Accept for InsertQuery {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_insert(self)
    }
}

impl Accept for UpdateQuery {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_update(self)
    }
}

impl Accept for DeleteQuery {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_delete(self)
    }
}

impl Accept for ValueComponent {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_value(self)
    }
}

pub fn walk_query<V: Visitor + ?Sized>(visitor: &mut V, query: &SelectQuery) {
    match query {
        SelectQuery::Simple(simple) => visitor.visit_simple_select(simple),
        SelectQuery::Binary(binary) => visitor.visit_binary_select(binary),
        SelectQuery::Values(values) => visitor.visit_values(values),
    }
}

pub fn walk_simple_select<V: Visitor + ?Sized>(visitor: &mut V, query: &SimpleSelectQuery) {
    if let Some(with) = &query.with {
        visitor.visit_with_clause(with);
    }
    visitor.visit_select_clause(&query.select);
    if let Some(from) = &query.from {
        visitor.visit_from_clause(from);
    }
    if let Some(clause) = &query.where_clause {
        visitor.visit_where_clause(clause);
    }
    if let Some(clause) = &query.group_by {
        visitor.visit_group_by_clause(clause);
    }
    if let Some(clause) = &query.having {
        visitor.visit_having_clause(clause);
    }
    if let Some(clause) = &query.window {
        visitor.visit_window_clause(clause);
    }
    if let Some(clause) = &query.order_by {
        visitor.visit_order_by_clause(clause);
    }
    if let Some(clause) = &query.limit {
        visitor.visit_limit_clause(clause);
    }
    if let Some(clause) = &query.fetch {
        visitor.visit_fetch_clause(clause);
    }
    if let Some(clause) = &query.for_clause {
        visitor.visit_for_clause(clause);
    }
}

pub fn walk_binary_select<V: Visitor + ?Sized>(visitor: &mut V, query: &BinarySelectQuery) {
    visitor.visit_query(&query.left);
    visitor.visit_query(&query.right);
}

pub fn walk_values<V: Visitor + ?Sized>(visitor: &mut V, query: &ValuesQuery) {
    for row in &query.rows {
        for value in &row.values {
            visitor.visit_value(value);
        }
    }
}

pub fn walk_insert<V: Visitor + ?Sized>(visitor: &mut V, query: &InsertQuery) {
    visitor.visit_query(&query.source);
    if let Some(returning) = &query.returning {
        for item in returning {
            visitor.visit_select_item(item);
        }
    }
}

pub fn walk_update<V: Visitor + ?Sized>(visitor: &mut V, query: &UpdateQuery) {
    visitor.visit_source_expression(&query.target);
    for item in &query.set {
        visitor.visit_value(&item.value);
    }
    if let Some(from) = &query.from {
        visitor.visit_from_clause(from);
    }
    if let Some(clause) = &query.where_clause {
        visitor.visit_where_clause(clause);
    }
    if let Some(returning) = &query.returning {
        for item in returning {
            visitor.visit_select_item(item);
        }
    }
}

pub fn walk_delete<V: Visitor + ?Sized>(visitor: &mut V, query: &DeleteQuery) {
    visitor.visit_source_expression(&query.target);
    if let Some(sources) = &query.using {
        for source in sources {
            visitor.visit_source_expression(source);
        }
    }
    if let Some(clause) = &query.where_clause {
        visitor.visit_where_clause(clause);
    }
    if let Some(returning) = &query.returning {
        for item in returning {
            visitor.visit_select_item(item);
        }
    }
}

pub fn walk_with_clause<V: Visitor + ?Sized>(visitor: &mut V, with: &WithClause) {
    for table in &with.tables {
        visitor.visit_common_table(table);
    }
}

pub fn walk_common_table<V: Visitor + ?Sized>(visitor: &mut V, table: &CommonTable) {
    visitor.visit_query(&table.query);
}

pub fn walk_select_clause<V: Visitor + ?Sized>(visitor: &mut V, select: &SelectClause) {
    if let Some(Distinct::DistinctOn(values)) = &select.distinct {
        for value in values {
            visitor.visit_value(value);
        }
    }
    for item in &select.items {
        visitor.visit_select_item(item);
    }
}

pub fn walk_select_item<V: Visitor + ?Sized>(visitor: &mut V, item: &SelectItem) {
    visitor.visit_value(&item.value);
}

pub fn walk_from_clause<V: Visitor + ?Sized>(visitor: &mut V, from: &FromClause) {
    visitor.visit_source_expression(&from.source);
    for join in &from.joins {
        visitor.visit_join_clause(join);
    }
}

pub fn walk_source_expression<V: Visitor + ?Sized>(visitor: &mut V, source: &SourceExpression) {
    match &source.source {
        Source::Table { .. } => {}
        Source::Function { args, .. } => {
            for arg in args {
                visitor.visit_value(arg);
            }
        }
        Source::Query(query) => visitor.visit_query(query),
        Source::Paren(inner) => visitor.visit_source_expression(inner),
    }
}

pub fn walk_join_clause<V: Visitor + ?Sized>(visitor: &mut V, join: &JoinClause) {
    visitor.visit_source_expression(&join.source);
    if let Some(JoinCondition::On(condition)) = &join.condition {
        visitor.visit_value(condition);
    }
}

pub fn walk_group_by_clause<V: Visitor + ?Sized>(visitor: &mut V, clause: &GroupByClause) {
    for item in &clause.items {
        match item {
            GroupByItem::Expression(value) => visitor.visit_value(value),
            GroupByItem::GroupingSets(sets) => {
                for set in sets {
                    for value in &set.values {
                        visitor.visit_value(value);
                    }
                }
            }
        }
    }
}

pub fn walk_window_clause<V: Visitor + ?Sized>(visitor: &mut V, clause: &WindowClause) {
    for definition in &clause.definitions {
        visitor.visit_window_frame_expression(&definition.frame);
    }
}

pub fn walk_window_frame_expression<V: Visitor + ?Sized>(
    visitor: &mut V,
    frame: &WindowFrameExpression,
) {
    if let Some(partition) = &frame.partition {
        for value in &partition.values {
            visitor.visit_value(value);
        }
    }
    if let Some(order) = &frame.order {
        visitor.visit_order_by_clause(order);
    }
    if let Some(spec) = &frame.frame {
        for bound in std::iter::once(&spec.start).chain(spec.end.as_ref()) {
            if let FrameBound::Preceding(value) | FrameBound::Following(value) = bound {
                visitor.visit_value(value);
            }
        }
    }
}

pub fn walk_order_by_clause<V: Visitor + ?Sized>(visitor: &mut V, clause: &OrderByClause) {
    for item in &clause.items {
        visitor.visit_value(&item.value);
    }
}

pub fn walk_limit_clause<V: Visitor + ?Sized>(visitor: &mut V, clause: &LimitClause) {
    visitor.visit_value(&clause.limit);
    if let Some(offset) = &clause.offset {
        visitor.visit_value(offset);
    }
}

pub fn walk_value<V: Visitor + ?Sized>(visitor: &mut V, value: &ValueComponent) {
    match value {
        ValueComponent::Column(column) => visitor.visit_column_reference(column),
        ValueComponent::Literal(literal) => visitor.visit_literal(literal),
        ValueComponent::Unary(unary) => visitor.visit_value(&unary.operand),
        ValueComponent::Binary(binary) => {
            visitor.visit_value(&binary.left);
            visitor.visit_value(&binary.right);
        }
        ValueComponent::Paren(paren) => visitor.visit_value(&paren.inner),
        ValueComponent::Function(call) => visitor.visit_function_call(call),
        ValueComponent::Cast(cast) => {
            visitor.visit_value(&cast.value);
            visitor.visit_type_value(&cast.target);
        }
        ValueComponent::Between(between) => {
            visitor.visit_value(&between.value);
            visitor.visit_value(&between.lower);
            visitor.visit_value(&between.upper);
        }
        ValueComponent::Case(case) => {
            if let Some(operand) = &case.operand {
                visitor.visit_value(operand);
            }
            for branch in &case.branches {
                visitor.visit_value(&branch.condition);
                visitor.visit_value(&branch.result);
            }
            if let Some(else_value) = &case.else_value {
                visitor.visit_value(else_value);
            }
        }
        ValueComponent::Tuple(tuple) => {
            for value in &tuple.values {
                visitor.visit_value(value);
            }
        }
        ValueComponent::List(list) => {
            for value in &list.values {
                visitor.visit_value(value);
            }
        }
        ValueComponent::Array(array) => {
            for value in &array.values {
                visitor.visit_value(value);
            }
        }
        ValueComponent::Query(inline) => visitor.visit_query(&inline.query),
        ValueComponent::Parameter(parameter) => visitor.visit_parameter(parameter),
        ValueComponent::Type(ty) => visitor.visit_type_value(ty),
        ValueComponent::StringSpecifier(_) => {}
    }
}

pub fn walk_function_call<V: Visitor + ?Sized>(visitor: &mut V, call: &FunctionCall) {
    match &call.args {
        FunctionArguments::List(args) => {
            for arg in args {
                visitor.visit_value(arg);
            }
        }
        FunctionArguments::KeywordDelimited(args) => {
            for arg in args {
                if let Some(value) = &arg.value {
                    visitor.visit_value(value);
                }
            }
        }
    }
    if let Some(OverClause::Frame(frame)) = &call.over {
        visitor.visit_window_frame_expression(frame);
    }
}

pub fn walk_type_value<V: Visitor + ?Sized>(visitor: &mut V, ty: &TypeValue) {
    for arg in &ty.args {
        visitor.visit_value(arg);
    }
}
