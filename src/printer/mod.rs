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

//! The SQL printer.
//!
//! A tree traversal converts the AST into a flat stream of print tokens
//! and append-newline events; the line printer then renders the stream
//! under the configured policies. Printing is deterministic: the output is
//! a pure function of (AST, options).

use std::collections::BTreeSet;

use crate::ast::*;

pub use self::token::{Container, PrintItem, PrintToken, PrintTokenType};

mod line;
mod token;

/// The indentation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentChar {
    None,
    Space,
    Tab,
}

impl IndentChar {
    fn as_str(self) -> &'static str {
        match self {
            IndentChar::None => "",
            IndentChar::Space => " ",
            IndentChar::Tab => "\t",
        }
    }
}

/// The physical line separator; `Space` renders everything on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newline {
    Space,
    Lf,
    CrLf,
}

impl Newline {
    fn as_str(self) -> &'static str {
        match self {
            Newline::Space => " ",
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
        }
    }
}

/// Where to break around commas and `and`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakStyle {
    None,
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordCase {
    None,
    Upper,
    Lower,
}

/// Formatting policies for [`print`].
#[derive(Debug, Clone)]
pub struct SqlPrintOptions {
    pub indent_char: IndentChar,
    pub indent_size: usize,
    pub newline: Newline,
    pub comma_break: BreakStyle,
    pub and_break: BreakStyle,
    pub keyword_case: KeywordCase,
    /// Containers that get an indent level and a line break on entry.
    pub indent_containers: BTreeSet<Container>,
}

impl SqlPrintOptions {
    /// The containers indented by default.
    pub fn default_indent_containers() -> BTreeSet<Container> {
        [
            Container::SelectClause,
            Container::FromClause,
            Container::WhereClause,
            Container::GroupByClause,
            Container::HavingClause,
            Container::OrderByClause,
            Container::WindowClause,
            Container::LimitClause,
            Container::Values,
            Container::CommonTable,
            Container::SubQuerySource,
        ]
        .into_iter()
        .collect()
    }

    /// A multi-line preset: four-space indent, breaks before commas.
    pub fn pretty() -> SqlPrintOptions {
        SqlPrintOptions {
            indent_char: IndentChar::Space,
            indent_size: 4,
            newline: Newline::Lf,
            comma_break: BreakStyle::Before,
            and_break: BreakStyle::Before,
            keyword_case: KeywordCase::None,
            indent_containers: Self::default_indent_containers(),
        }
    }

    fn indent_string(&self, level: usize) -> String {
        self.indent_char.as_str().repeat(self.indent_size * level)
    }
}

impl Default for SqlPrintOptions {
    /// Single-line canonical output: `print(parse(s), &default)` yields
    /// one-line SQL with lower-case keywords untouched.
    fn default() -> SqlPrintOptions {
        SqlPrintOptions {
            indent_char: IndentChar::Space,
            indent_size: 0,
            newline: Newline::Space,
            comma_break: BreakStyle::None,
            and_break: BreakStyle::None,
            keyword_case: KeywordCase::None,
            indent_containers: Self::default_indent_containers(),
        }
    }
}

/// Prints a SELECT (or VALUES, or set-operation) query.
pub fn print(query: &SelectQuery, options: &SqlPrintOptions) -> String {
    line::render(&query_items(query, options), options)
}

/// Prints an INSERT statement.
pub fn print_insert(query: &InsertQuery, options: &SqlPrintOptions) -> String {
    let mut writer = Writer::new(options);
    writer.write_insert(query);
    line::render(&writer.items, options)
}

/// Prints an UPDATE statement.
pub fn print_update(query: &UpdateQuery, options: &SqlPrintOptions) -> String {
    let mut writer = Writer::new(options);
    writer.write_update(query);
    line::render(&writer.items, options)
}

/// Prints a DELETE statement.
pub fn print_delete(query: &DeleteQuery, options: &SqlPrintOptions) -> String {
    let mut writer = Writer::new(options);
    writer.write_delete(query);
    line::render(&writer.items, options)
}

/// Prints a standalone value expression.
pub fn print_value(value: &ValueComponent, options: &SqlPrintOptions) -> String {
    let mut writer = Writer::new(options);
    writer.write_value(value);
    line::render(&writer.items, options)
}

/// The print-token stream for a query, mainly useful to tooling and tests.
pub fn print_tokens(query: &SelectQuery, options: &SqlPrintOptions) -> Vec<PrintItem> {
    query_items(query, options)
}

pub(crate) fn print_default(query: &SelectQuery) -> String {
    print(query, &SqlPrintOptions::default())
}

pub(crate) fn print_value_default(value: &ValueComponent) -> String {
    print_value(value, &SqlPrintOptions::default())
}

pub(crate) fn print_insert_default(query: &InsertQuery) -> String {
    print_insert(query, &SqlPrintOptions::default())
}

pub(crate) fn print_update_default(query: &UpdateQuery) -> String {
    print_update(query, &SqlPrintOptions::default())
}

pub(crate) fn print_delete_default(query: &DeleteQuery) -> String {
    print_delete(query, &SqlPrintOptions::default())
}

fn query_items(query: &SelectQuery, options: &SqlPrintOptions) -> Vec<PrintItem> {
    let mut writer = Writer::new(options);
    writer.write_query(query);
    writer.items
}

/// The tree traversal that flattens the AST into print items.
struct Writer<'a> {
    options: &'a SqlPrintOptions,
    items: Vec<PrintItem>,
    level: usize,
    containers: Vec<Container>,
}

impl<'a> Writer<'a> {
    fn new(options: &'a SqlPrintOptions) -> Writer<'a> {
        Writer {
            options,
            items: Vec::new(),
            level: 0,
            containers: Vec::new(),
        }
    }

    fn container(&self) -> Container {
        self.containers.last().copied().unwrap_or(Container::None)
    }

    fn token<S>(&mut self, token_type: PrintTokenType, text: S)
    where
        S: Into<String>,
    {
        self.items.push(PrintItem::Token(PrintToken {
            text: text.into(),
            token_type,
            container: self.container(),
        }));
    }

    fn newline(&mut self) {
        self.items.push(PrintItem::Newline(self.level));
    }

    fn keyword(&mut self, text: &str) {
        self.token(PrintTokenType::Keyword, text);
    }

    fn identifier(&mut self, text: &str) {
        self.token(PrintTokenType::Identifier, text);
    }

    fn operator(&mut self, text: &str) {
        self.token(PrintTokenType::Operator, text);
    }

    fn open_paren(&mut self) {
        self.token(PrintTokenType::OpenParen, "(");
    }

    fn close_paren(&mut self) {
        self.token(PrintTokenType::CloseParen, ")");
    }

    fn dot(&mut self) {
        self.token(PrintTokenType::Dot, ".");
    }

    fn comments(&mut self, comments: &[String]) {
        for comment in comments {
            self.token(PrintTokenType::Comment, format!("/* {comment} */"));
        }
    }

    /// A comma between clause-level list items, honoring `comma_break`.
    fn break_comma(&mut self) {
        match self.options.comma_break {
            BreakStyle::None => self.token(PrintTokenType::Comma, ","),
            BreakStyle::Before => {
                self.newline();
                self.token(PrintTokenType::Comma, ",");
            }
            BreakStyle::After => {
                self.token(PrintTokenType::Comma, ",");
                self.newline();
            }
        }
    }

    /// A comma inside argument tuples; never breaks.
    fn plain_comma(&mut self) {
        self.token(PrintTokenType::Comma, ",");
    }

    /// Emits one clause: a newline, the head (keywords), and the body,
    /// indented when the container is in the indent set.
    fn clause(
        &mut self,
        container: Container,
        head: impl FnOnce(&mut Self),
        body: impl FnOnce(&mut Self),
    ) {
        self.newline();
        self.containers.push(container);
        head(self);
        let indent = self.options.indent_containers.contains(&container);
        if indent {
            self.level += 1;
            self.newline();
        }
        body(self);
        if indent {
            self.level -= 1;
        }
        self.containers.pop();
    }

    fn write_query(&mut self, query: &SelectQuery) {
        match query {
            SelectQuery::Simple(simple) => self.write_simple(simple),
            SelectQuery::Binary(binary) => {
                self.write_query(&binary.left);
                self.containers.push(Container::BinarySelectQueryOperator);
                self.newline();
                self.keyword(&binary.operator);
                self.containers.pop();
                self.write_query(&binary.right);
            }
            SelectQuery::Values(values) => self.write_values(values),
        }
    }

    fn write_simple(&mut self, query: &SimpleSelectQuery) {
        if let Some(with) = &query.with {
            self.write_with(with);
        }
        self.clause(
            Container::SelectClause,
            |w| {
                w.comments(&query.select.comments);
                w.keyword("select");
                match &query.select.distinct {
                    Some(Distinct::Distinct) => w.keyword("distinct"),
                    Some(Distinct::DistinctOn(values)) => {
                        w.keyword("distinct on");
                        w.open_paren();
                        w.write_plain_list(values);
                        w.close_paren();
                    }
                    None => {}
                }
            },
            |w| {
                for (i, item) in query.select.items.iter().enumerate() {
                    if i > 0 {
                        w.break_comma();
                    }
                    w.write_select_item(item);
                }
            },
        );
        if let Some(from) = &query.from {
            self.write_from(from);
        }
        if let Some(clause) = &query.where_clause {
            self.clause(
                Container::WhereClause,
                |w| w.keyword("where"),
                |w| w.write_value(&clause.condition),
            );
        }
        if let Some(clause) = &query.group_by {
            self.clause(
                Container::GroupByClause,
                |w| w.keyword("group by"),
                |w| {
                    for (i, item) in clause.items.iter().enumerate() {
                        if i > 0 {
                            w.break_comma();
                        }
                        w.write_group_by_item(item);
                    }
                },
            );
        }
        if let Some(clause) = &query.having {
            self.clause(
                Container::HavingClause,
                |w| w.keyword("having"),
                |w| w.write_value(&clause.condition),
            );
        }
        if let Some(clause) = &query.window {
            self.clause(
                Container::WindowClause,
                |w| w.keyword("window"),
                |w| {
                    for (i, definition) in clause.definitions.iter().enumerate() {
                        if i > 0 {
                            w.break_comma();
                        }
                        w.identifier(&definition.name);
                        w.keyword("as");
                        w.open_paren();
                        w.write_window_frame(&definition.frame);
                        w.close_paren();
                    }
                },
            );
        }
        if let Some(clause) = &query.order_by {
            self.write_order_by(clause, Container::OrderByClause);
        }
        if let Some(clause) = &query.limit {
            self.clause(
                Container::LimitClause,
                |w| w.keyword("limit"),
                |w| w.write_value(&clause.limit),
            );
            if let Some(offset) = &clause.offset {
                self.clause(
                    Container::OffsetClause,
                    |w| w.keyword("offset"),
                    |w| w.write_value(offset),
                );
            }
        }
        if let Some(clause) = &query.fetch {
            self.clause(
                Container::FetchClause,
                |w| w.keyword("fetch"),
                |w| {
                    w.keyword(match clause.kind {
                        FetchKind::First => "first",
                        FetchKind::Next => "next",
                    });
                    w.write_value(&clause.count);
                    w.keyword(match clause.unit {
                        FetchUnit::RowsOnly => "rows only",
                        FetchUnit::Percent => "percent",
                        FetchUnit::PercentWithTies => "percent with ties",
                    });
                },
            );
        }
        if let Some(clause) = &query.for_clause {
            self.clause(
                Container::ForClause,
                |w| w.keyword("for"),
                |w| {
                    w.keyword(match clause.lock {
                        LockMode::Update => "update",
                        LockMode::Share => "share",
                        LockMode::KeyShare => "key share",
                        LockMode::NoKeyUpdate => "no key update",
                    })
                },
            );
        }
    }

    fn write_with(&mut self, with: &WithClause) {
        self.clause(
            Container::CommonTable,
            |w| {
                w.keyword("with");
                if with.recursive {
                    w.keyword("recursive");
                }
            },
            |w| {
                for (i, table) in with.tables.iter().enumerate() {
                    if i > 0 {
                        w.break_comma();
                    }
                    w.write_common_table(table);
                }
            },
        );
    }

    fn write_common_table(&mut self, table: &CommonTable) {
        match &table.columns {
            // The column list hugs the name, `t(x)`.
            Some(_) => self.token(PrintTokenType::FunctionName, table.name.clone()),
            None => self.identifier(&table.name),
        }
        if let Some(columns) = &table.columns {
            self.open_paren();
            self.write_name_list(columns);
            self.close_paren();
        }
        self.keyword("as");
        match table.materialized {
            Some(true) => self.keyword("materialized"),
            Some(false) => self.keyword("not materialized"),
            None => {}
        }
        self.write_subquery(&table.query);
    }

    /// A parenthesized subquery, indented in multi-line mode.
    fn write_subquery(&mut self, query: &SelectQuery) {
        self.containers.push(Container::SubQuerySource);
        self.open_paren();
        let indent = self.options.newline != Newline::Space
            && self
                .options
                .indent_containers
                .contains(&Container::SubQuerySource);
        if indent {
            self.level += 1;
            self.newline();
        }
        self.write_query(query);
        if indent {
            self.level -= 1;
            self.newline();
        }
        self.close_paren();
        self.containers.pop();
    }

    fn write_from(&mut self, from: &FromClause) {
        self.clause(
            Container::FromClause,
            |w| w.keyword("from"),
            |w| w.write_source_expression(&from.source),
        );
        for join in &from.joins {
            self.containers.push(Container::JoinClause);
            // Joins always start on a fresh line.
            self.newline();
            self.keyword(&join.join_type);
            if join.lateral {
                self.keyword("lateral");
            }
            self.write_source_expression(&join.source);
            match &join.condition {
                Some(JoinCondition::On(predicate)) => {
                    self.keyword("on");
                    self.write_value(predicate);
                }
                Some(JoinCondition::Using(columns)) => {
                    self.keyword("using");
                    self.open_paren();
                    self.write_name_list(columns);
                    self.close_paren();
                }
                None => {}
            }
            self.containers.pop();
        }
    }

    fn write_source_expression(&mut self, expression: &SourceExpression) {
        match &expression.source {
            Source::Table { namespaces, name } => {
                self.write_dotted(namespaces, name);
            }
            Source::Function {
                namespaces,
                name,
                args,
            } => {
                for namespace in namespaces {
                    self.identifier(namespace);
                    self.dot();
                }
                self.token(PrintTokenType::FunctionName, name.clone());
                self.open_paren();
                self.write_plain_list(args);
                self.close_paren();
            }
            Source::Query(query) => self.write_subquery(query),
            Source::Paren(inner) => {
                self.open_paren();
                self.write_source_expression(inner);
                self.close_paren();
            }
        }
        if let Some(alias) = &expression.alias {
            self.keyword("as");
            if alias.columns.is_empty() {
                self.identifier(&alias.name);
            } else {
                self.token(PrintTokenType::FunctionName, alias.name.clone());
                self.open_paren();
                self.write_name_list(&alias.columns);
                self.close_paren();
            }
        }
    }

    fn write_values(&mut self, values: &ValuesQuery) {
        self.clause(
            Container::Values,
            |w| w.keyword("values"),
            |w| {
                for (i, row) in values.rows.iter().enumerate() {
                    if i > 0 {
                        w.break_comma();
                    }
                    w.open_paren();
                    w.write_plain_list(&row.values);
                    w.close_paren();
                }
            },
        );
    }

    fn write_order_by(&mut self, clause: &OrderByClause, container: Container) {
        self.clause(
            container,
            |w| w.keyword("order by"),
            |w| w.write_order_by_items(clause),
        );
    }

    fn write_order_by_items(&mut self, clause: &OrderByClause) {
        for (i, item) in clause.items.iter().enumerate() {
            if i > 0 {
                self.break_comma();
            }
            self.write_value(&item.value);
            if item.direction == SortDirection::Descending {
                self.keyword("desc");
            }
            match item.nulls {
                Some(NullsPosition::First) => self.keyword("nulls first"),
                Some(NullsPosition::Last) => self.keyword("nulls last"),
                None => {}
            }
        }
    }

    fn write_group_by_item(&mut self, item: &GroupByItem) {
        match item {
            GroupByItem::Expression(value) => self.write_value(value),
            GroupByItem::GroupingSets(sets) => {
                self.keyword("grouping sets");
                self.open_paren();
                for (i, set) in sets.iter().enumerate() {
                    if i > 0 {
                        self.plain_comma();
                    }
                    self.open_paren();
                    self.write_plain_list(&set.values);
                    self.close_paren();
                }
                self.close_paren();
            }
        }
    }

    fn write_select_item(&mut self, item: &SelectItem) {
        self.write_value(&item.value);
        if let Some(alias) = &item.alias {
            self.keyword("as");
            self.identifier(alias);
        }
    }

    fn write_window_frame(&mut self, frame: &WindowFrameExpression) {
        self.containers.push(Container::WindowFrameExpression);
        if let Some(partition) = &frame.partition {
            self.containers.push(Container::PartitionByClause);
            self.keyword("partition by");
            self.write_plain_list(&partition.values);
            self.containers.pop();
        }
        if let Some(order) = &frame.order {
            self.keyword("order by");
            self.write_order_by_items(order);
        }
        if let Some(spec) = &frame.frame {
            self.keyword(match spec.unit {
                FrameUnit::Rows => "rows",
                FrameUnit::Range => "range",
                FrameUnit::Groups => "groups",
            });
            match &spec.end {
                Some(end) => {
                    self.operator("between");
                    self.write_frame_bound(&spec.start);
                    self.operator("and");
                    self.write_frame_bound(end);
                }
                None => self.write_frame_bound(&spec.start),
            }
        }
        self.containers.pop();
    }

    fn write_frame_bound(&mut self, bound: &FrameBound) {
        match bound {
            FrameBound::UnboundedPreceding => {
                self.token(PrintTokenType::Literal, "unbounded");
                self.keyword("preceding");
            }
            FrameBound::UnboundedFollowing => {
                self.token(PrintTokenType::Literal, "unbounded");
                self.keyword("following");
            }
            FrameBound::CurrentRow => self.keyword("current row"),
            FrameBound::Preceding(value) => {
                self.write_value(value);
                self.keyword("preceding");
            }
            FrameBound::Following(value) => {
                self.write_value(value);
                self.keyword("following");
            }
        }
    }

    fn write_dotted(&mut self, namespaces: &[String], name: &str) {
        for namespace in namespaces {
            self.identifier(namespace);
            self.dot();
        }
        self.identifier(name);
    }

    fn write_name_list(&mut self, names: &[String]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.plain_comma();
            }
            self.identifier(name);
        }
    }

    fn write_plain_list(&mut self, values: &[ValueComponent]) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.plain_comma();
            }
            self.write_value(value);
        }
    }

    fn write_value(&mut self, value: &ValueComponent) {
        match value {
            ValueComponent::Column(column) => {
                self.comments(&column.comments);
                self.write_dotted(&column.namespaces, &column.name);
            }
            ValueComponent::Literal(literal) => {
                self.comments(&literal.comments);
                self.token(PrintTokenType::Literal, literal.text.clone());
            }
            ValueComponent::Parameter(parameter) => {
                self.comments(&parameter.comments);
                let text = if parameter.name.is_empty() {
                    "?".to_string()
                } else {
                    format!(":{}", parameter.name)
                };
                self.token(PrintTokenType::Parameter, text);
            }
            ValueComponent::Unary(unary) => {
                self.token(PrintTokenType::Prefix, unary.operator.clone());
                self.write_value(&unary.operand);
            }
            ValueComponent::Binary(binary) => {
                self.write_value(&binary.left);
                self.write_binary_operator(&binary.operator);
                self.write_value(&binary.right);
            }
            ValueComponent::Paren(paren) => {
                self.open_paren();
                self.write_value(&paren.inner);
                self.close_paren();
            }
            ValueComponent::Function(call) => self.write_function_call(call),
            ValueComponent::Cast(cast) => match cast.style {
                CastStyle::DoubleColon => {
                    self.write_value(&cast.value);
                    self.operator("::");
                    self.write_type(&cast.target);
                }
                CastStyle::Function => {
                    self.token(PrintTokenType::FunctionName, "cast");
                    self.open_paren();
                    self.write_value(&cast.value);
                    self.keyword("as");
                    self.write_type(&cast.target);
                    self.close_paren();
                }
            },
            ValueComponent::Between(between) => {
                self.write_value(&between.value);
                self.operator(if between.negated {
                    "not between"
                } else {
                    "between"
                });
                self.write_value(&between.lower);
                self.operator("and");
                self.write_value(&between.upper);
            }
            ValueComponent::Case(case) => {
                self.keyword("case");
                if let Some(operand) = &case.operand {
                    self.write_value(operand);
                }
                for branch in &case.branches {
                    self.keyword("when");
                    self.write_value(&branch.condition);
                    self.keyword("then");
                    self.write_value(&branch.result);
                }
                if let Some(else_value) = &case.else_value {
                    self.keyword("else");
                    self.write_value(else_value);
                }
                self.keyword("end");
            }
            ValueComponent::Tuple(tuple) => {
                self.open_paren();
                self.write_plain_list(&tuple.values);
                self.close_paren();
            }
            ValueComponent::List(list) => {
                self.open_paren();
                self.write_plain_list(&list.values);
                self.close_paren();
            }
            ValueComponent::Array(array) => {
                self.keyword("array");
                self.token(PrintTokenType::OpenBracket, "[");
                self.write_plain_list(&array.values);
                self.token(PrintTokenType::CloseBracket, "]");
            }
            ValueComponent::Query(inline) => self.write_subquery(&inline.query),
            ValueComponent::Type(ty) => self.write_type(ty),
            ValueComponent::StringSpecifier(specifier) => {
                self.token(PrintTokenType::StringSpecifier, specifier.specifier.clone());
                self.token(PrintTokenType::Literal, specifier.literal.clone());
            }
        }
    }

    /// `and` inside WHERE, HAVING, and join conditions honors `and_break`.
    fn write_binary_operator(&mut self, operator: &str) {
        let breakable = operator == "and"
            && matches!(
                self.container(),
                Container::WhereClause | Container::HavingClause | Container::JoinClause
            );
        match self.options.and_break {
            BreakStyle::Before if breakable => {
                self.newline();
                self.operator(operator);
            }
            BreakStyle::After if breakable => {
                self.operator(operator);
                self.newline();
            }
            _ => self.operator(operator),
        }
    }

    fn write_function_call(&mut self, call: &FunctionCall) {
        for namespace in &call.namespaces {
            self.identifier(namespace);
            self.dot();
        }
        self.token(PrintTokenType::FunctionName, call.name.clone());
        self.open_paren();
        match &call.args {
            FunctionArguments::List(args) => self.write_plain_list(args),
            FunctionArguments::KeywordDelimited(args) => {
                for arg in args {
                    if let Some(keyword) = &arg.keyword {
                        self.keyword(keyword);
                    }
                    if let Some(value) = &arg.value {
                        self.write_value(value);
                    }
                }
            }
        }
        self.close_paren();
        if let Some(over) = &call.over {
            self.keyword("over");
            match over {
                OverClause::Named(name) => self.identifier(name),
                OverClause::Frame(frame) => {
                    self.open_paren();
                    self.write_window_frame(frame);
                    self.close_paren();
                }
            }
        }
    }

    fn write_type(&mut self, ty: &TypeValue) {
        for namespace in &ty.namespaces {
            self.identifier(namespace);
            self.dot();
        }
        self.token(PrintTokenType::TypeName, ty.name.clone());
        if !ty.args.is_empty() {
            self.open_paren();
            self.write_plain_list(&ty.args);
            self.close_paren();
        }
    }

    fn write_returning(&mut self, items: &[SelectItem]) {
        self.clause(
            Container::ReturningClause,
            |w| w.keyword("returning"),
            |w| {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        w.break_comma();
                    }
                    w.write_select_item(item);
                }
            },
        );
    }

    fn write_insert(&mut self, query: &InsertQuery) {
        self.containers.push(Container::InsertClause);
        self.keyword("insert into");
        if query.columns.is_empty() {
            self.write_dotted(&query.namespaces, &query.table);
        } else {
            for namespace in &query.namespaces {
                self.identifier(namespace);
                self.dot();
            }
            self.token(PrintTokenType::FunctionName, query.table.clone());
            self.open_paren();
            self.write_name_list(&query.columns);
            self.close_paren();
        }
        self.containers.pop();
        self.write_query(&query.source);
        if let Some(returning) = &query.returning {
            self.write_returning(returning);
        }
    }

    fn write_update(&mut self, query: &UpdateQuery) {
        self.containers.push(Container::UpdateClause);
        self.keyword("update");
        self.write_source_expression(&query.target);
        self.containers.pop();
        self.clause(
            Container::SetClause,
            |w| w.keyword("set"),
            |w| {
                for (i, item) in query.set.iter().enumerate() {
                    if i > 0 {
                        w.break_comma();
                    }
                    w.identifier(&item.column);
                    w.operator("=");
                    w.write_value(&item.value);
                }
            },
        );
        if let Some(from) = &query.from {
            self.write_from(from);
        }
        if let Some(clause) = &query.where_clause {
            self.clause(
                Container::WhereClause,
                |w| w.keyword("where"),
                |w| w.write_value(&clause.condition),
            );
        }
        if let Some(returning) = &query.returning {
            self.write_returning(returning);
        }
    }

    fn write_delete(&mut self, query: &DeleteQuery) {
        self.containers.push(Container::DeleteClause);
        self.keyword("delete from");
        self.write_source_expression(&query.target);
        self.containers.pop();
        if let Some(sources) = &query.using {
            self.clause(
                Container::UsingClause,
                |w| w.keyword("using"),
                |w| {
                    for (i, source) in sources.iter().enumerate() {
                        if i > 0 {
                            w.break_comma();
                        }
                        w.write_source_expression(source);
                    }
                },
            );
        }
        if let Some(clause) = &query.where_clause {
            self.clause(
                Container::WhereClause,
                |w| w.keyword("where"),
                |w| w.write_value(&clause.condition),
            );
        }
        if let Some(returning) = &query.returning {
            self.write_returning(returning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_select;

    #[test]
    fn select_tokens_carry_their_containers() {
        let query = parse_select("select a from t where a = 1").unwrap();
        let items = print_tokens(&query, &SqlPrintOptions::default());
        let containers: Vec<(String, Container)> = items
            .iter()
            .filter_map(|item| match item {
                PrintItem::Token(token) => Some((token.text.clone(), token.container)),
                PrintItem::Newline(_) => None,
            })
            .collect();
        assert!(containers.contains(&("select".to_string(), Container::SelectClause)));
        assert!(containers.contains(&("from".to_string(), Container::FromClause)));
        assert!(containers.contains(&("where".to_string(), Container::WhereClause)));
    }

    #[test]
    fn set_operator_token_has_its_own_container() {
        let query = parse_select("select 1 union all select 2").unwrap();
        let items = print_tokens(&query, &SqlPrintOptions::default());
        assert!(items.iter().any(|item| matches!(
            item,
            PrintItem::Token(token)
                if token.text == "union all"
                    && token.container == Container::BinarySelectQueryOperator
        )));
    }
}
