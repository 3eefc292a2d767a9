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

#![warn(clippy::all)]
//! SELECT parsing: clause coverage, operator precedence, and error shapes.

use matches::assert_matches;
use pretty_assertions::assert_eq;

use sqlcraft::ast::*;
use sqlcraft::{
    parse_common_table, parse_fetch, parse_for, parse_group_by, parse_having, parse_limit,
    parse_order_by, parse_select, parse_source, parse_value, parse_where, parse_window,
    parse_with, print, ErrorKind, SqlPrintOptions,
};

#[test]
fn parse_arithmetic_projection() {
    let query = verified("select 1 + 2 * 3 as x from t");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    assert_eq!(
        simple.select.items,
        vec![SelectItem::aliased(
            ValueComponent::binary(
                lit("1"),
                "+",
                ValueComponent::binary(lit("2"), "*", lit("3")),
            ),
            "x",
        )]
    );
    let from = simple.from.expect("from clause");
    assert_eq!(
        from.source.source,
        Source::Table {
            namespaces: vec![],
            name: "t".to_string(),
        }
    );
}

#[test]
fn parse_with_clause_over_a_set_operation() {
    let query = verified("with t(x) as (select 1 union all select 2) select * from t");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    let with = simple.with.expect("with clause");
    assert!(!with.recursive);
    assert_eq!(with.tables.len(), 1);
    let table = &with.tables[0];
    assert_eq!(table.name, "t");
    assert_eq!(table.columns, Some(vec!["x".to_string()]));
    match table.query.as_ref() {
        SelectQuery::Binary(binary) => {
            assert_eq!(binary.operator, "union all");
            assert_matches!(binary.left.as_ref(), SelectQuery::Simple(_));
            assert_matches!(binary.right.as_ref(), SelectQuery::Simple(_));
        }
        _ => unreachable!(),
    }
    assert_eq!(
        simple.select.items,
        vec![SelectItem::new(ValueComponent::column("*"))]
    );
}

#[test]
fn parse_windowed_aggregate() {
    let query = verified(
        "select sum(x) over (partition by g order by t rows \
         between unbounded preceding and current row) from s",
    );
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    let call = match &simple.select.items[0].value {
        ValueComponent::Function(call) => call,
        _ => unreachable!(),
    };
    assert_eq!(call.name, "sum");
    assert_eq!(call.args, FunctionArguments::List(vec![col("x")]));
    let frame = match call.over.as_ref().expect("over clause") {
        OverClause::Frame(frame) => frame,
        _ => unreachable!(),
    };
    assert_eq!(
        frame.partition.as_ref().expect("partition").values,
        vec![col("g")]
    );
    let order = frame.order.as_ref().expect("order");
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].value, col("t"));
    assert_eq!(order.items[0].direction, SortDirection::Ascending);
    assert_eq!(
        frame.frame,
        Some(FrameSpec {
            unit: FrameUnit::Rows,
            start: FrameBound::UnboundedPreceding,
            end: Some(FrameBound::CurrentRow),
        })
    );
}

#[test]
fn precedence_binds_tighter_operators_first() {
    assert_eq!(
        parse_value("1 + 2 * 3").unwrap(),
        ValueComponent::binary(
            lit("1"),
            "+",
            ValueComponent::binary(lit("2"), "*", lit("3")),
        )
    );
    assert_eq!(
        parse_value("1 * 2 + 3").unwrap(),
        ValueComponent::binary(
            ValueComponent::binary(lit("1"), "*", lit("2")),
            "+",
            lit("3"),
        )
    );
}

#[test]
fn equal_precedence_is_left_associative() {
    assert_eq!(
        parse_value("1 - 2 + 3").unwrap(),
        ValueComponent::binary(
            ValueComponent::binary(lit("1"), "-", lit("2")),
            "+",
            lit("3"),
        )
    );
}

#[test]
fn between_never_absorbs_the_following_and() {
    let expected = ValueComponent::binary(
        ValueComponent::Between(BetweenExpression {
            value: Box::new(col("x")),
            negated: false,
            lower: Box::new(lit("1")),
            upper: Box::new(lit("10")),
        }),
        "and",
        col("y"),
    );
    assert_eq!(parse_value("x between 1 and 10 and y").unwrap(), expected);
}

#[test]
fn boolean_operators_nest_by_precedence() {
    let query = verified("select * from t where a = 1 or b = 2 and c = 3");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    let condition = &simple.where_clause.expect("where").condition;
    match condition {
        ValueComponent::Binary(or) => {
            assert_eq!(or.operator, "or");
            match or.right.as_ref() {
                ValueComponent::Binary(and) => assert_eq!(and.operator, "and"),
                _ => unreachable!(),
            }
        }
        _ => unreachable!(),
    }
}

#[test]
fn set_operations_nest_to_the_left() {
    let query = verified("select 1 union select 2 union select 3");
    match query {
        SelectQuery::Binary(outer) => {
            assert_eq!(outer.operator, "union");
            match outer.left.as_ref() {
                SelectQuery::Binary(inner) => {
                    assert_eq!(inner.operator, "union");
                    assert_matches!(inner.left.as_ref(), SelectQuery::Simple(_));
                }
                _ => unreachable!(),
            }
            assert_matches!(outer.right.as_ref(), SelectQuery::Simple(_));
        }
        _ => unreachable!(),
    }
}

#[test]
fn keywords_canonicalize_while_identifiers_keep_case() {
    one_parses_to(
        "SELECT OrderId FROM Orders WHERE OrderId LIKE 'A%'",
        "select OrderId from Orders where OrderId like 'A%'",
    );
}

#[test]
fn parse_distinct_forms() {
    verified("select distinct a from t");
    let query = verified("select distinct on (a) a, b from t");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    assert_eq!(
        simple.select.distinct,
        Some(Distinct::DistinctOn(vec![col("a")]))
    );
}

#[test]
fn parse_join_variants() {
    let query = verified("select * from t left outer join u on t.id = u.id");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    let join = &simple.from.expect("from").joins[0];
    assert_eq!(join.join_type, "left outer join");
    assert!(!join.lateral);
    assert_matches!(join.condition, Some(JoinCondition::On(_)));

    verified("select * from t inner join u using (id, kind)");
    verified("select * from t natural join u");
    verified("select * from t inner join lateral (select 1) as x on true");

    // A bare comma reads as a cross join.
    let query = one_parses_to("select * from a, b", "select * from a cross join b");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    assert_eq!(simple.from.expect("from").joins[0].join_type, "cross join");
}

#[test]
fn parse_group_by_having_and_grouping_sets() {
    verified("select g, count(*) from t group by g having count(*) > 1");
    let query = verified("select a, b from t group by grouping sets ((a, b), (a), ())");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    match &simple.group_by.expect("group by").items[0] {
        GroupByItem::GroupingSets(sets) => {
            assert_eq!(sets.len(), 3);
            assert!(sets[2].values.is_empty());
        }
        _ => unreachable!(),
    }
}

#[test]
fn parse_order_limit_offset_fetch_for() {
    verified("select a from t order by a desc nulls last, b limit 10 offset 5");
    verified("select a from t fetch first 10 percent");
    verified("select a from t for update");
    verified("select a from t for no key update");
    // An omitted FETCH count materializes the default of one row.
    one_parses_to(
        "select a from t fetch first rows only",
        "select a from t fetch first 1 rows only",
    );
}

#[test]
fn parse_case_expressions() {
    verified("select case when a = 1 then 'one' else 'other' end from t");
    let query = verified("select case a when 1 then 'one' end from t");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    match &simple.select.items[0].value {
        ValueComponent::Case(case) => {
            assert!(case.operand.is_some());
            assert_eq!(case.branches.len(), 1);
            assert!(case.else_value.is_none());
        }
        _ => unreachable!(),
    }
}

#[test]
fn parse_cast_forms_keep_their_spelling() {
    let query = verified("select cast(a as int) from t");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    match &simple.select.items[0].value {
        ValueComponent::Cast(cast) => {
            assert_eq!(cast.style, CastStyle::Function);
            assert_eq!(cast.target, TypeValue::named("int"));
        }
        _ => unreachable!(),
    }

    let query = verified("select a::numeric(10, 2) from t");
    let simple = match query {
        SelectQuery::Simple(simple) => simple,
        _ => unreachable!(),
    };
    match &simple.select.items[0].value {
        ValueComponent::Cast(cast) => {
            assert_eq!(cast.style, CastStyle::DoubleColon);
            assert_eq!(cast.target.name, "numeric");
            assert_eq!(cast.target.args, vec![lit("10"), lit("2")]);
        }
        _ => unreachable!(),
    }
}

#[test]
fn parse_predicate_operators() {
    verified("select * from t where a in (1, 2, 3)");
    verified("select * from t where a not in (select b from u)");
    verified("select * from t where exists (select 1 from u)");
    verified("select * from t where a is not null");
    verified("select * from t where a is distinct from b");
    verified("select * from t where a not like 'x%'");
    verified("select * from t where not a");
}

#[test]
fn parse_keyword_delimited_function_arguments() {
    verified("select substring(a from 1 for 2) from t");
    verified("select trim(both ' ' from a) from t");
    verified("select overlay(a placing b from 2 for 3) from t");
    // The plain comma form stays a plain list.
    let value = parse_value("substring(a, 1, 2)").unwrap();
    match value {
        ValueComponent::Function(call) => {
            assert_matches!(call.args, FunctionArguments::List(_));
        }
        _ => unreachable!(),
    }
}

#[test]
fn parse_subqueries_parameters_and_specifiers() {
    verified("select (select max(x) from u) as m from t");
    verified("select * from t where id = :id");
    verified("select * from t where id = ?");
    verified("select e'a\\nb' from t");
    verified("select array[1, 2, 3] as xs");
    verified("select u&'d' from t");
}

#[test]
fn parse_quoted_identifiers() {
    verified("select \"First Name\" from \"Users\"");
    verified("select `col` from `tab`");
    one_parses_to("select [Order Total] from [Orders]", "select [Order Total] from [Orders]");
}

#[test]
fn named_windows_must_be_defined_for_order_by() {
    let err = parse_select("select a from t order by sum(b) over w").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);
    verified("select a from t window w as (order by b) order by sum(b) over w");
}

#[test]
fn select_without_items_is_missing_a_clause_element() {
    let err = parse_select("select from t").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingClauseElement);
    let err = parse_select("select").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingClauseElement);
}

#[test]
fn unbalanced_parens_are_reported_as_such() {
    let err = parse_select("select (1 + 2").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnbalancedDelimiter);
}

#[test]
fn having_requires_group_by() {
    let err = parse_select("select a from t having a = 1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
}

#[test]
fn trailing_input_is_rejected_with_context() {
    let err = parse_select("select 1 2").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert_eq!(
        err.message,
        "Expected end of statement, found: literal `2`"
    );
    assert!(err.context.is_some());
}

#[test]
fn standalone_clause_parsers_compose() {
    let clause = parse_where("where a = 1").unwrap();
    assert_eq!(
        clause.condition,
        ValueComponent::binary(col("a"), "=", lit("1"))
    );

    let clause = parse_order_by("order by a desc").unwrap();
    assert_eq!(clause.items[0].direction, SortDirection::Descending);

    let clause = parse_group_by("group by a, b").unwrap();
    assert_eq!(clause.items.len(), 2);

    let clause = parse_having("having count(*) > 0").unwrap();
    assert_matches!(clause.condition, ValueComponent::Binary(_));

    let clause = parse_limit("limit 10 offset 2").unwrap();
    assert_eq!(clause.limit, lit("10"));
    assert_eq!(clause.offset, Some(lit("2")));

    let clause = parse_fetch("fetch next 5 rows only").unwrap();
    assert_eq!(clause.kind, FetchKind::Next);
    assert_eq!(clause.unit, FetchUnit::RowsOnly);

    let clause = parse_for("for key share").unwrap();
    assert_eq!(clause.lock, LockMode::KeyShare);

    let clause = parse_window("window w as (partition by a)").unwrap();
    assert_eq!(clause.definitions[0].name, "w");

    let with = parse_with("with t as (select 1)").unwrap();
    assert_eq!(with.tables.len(), 1);

    let table = parse_common_table("t(a) as materialized (select 1)").unwrap();
    assert_eq!(table.materialized, Some(true));

    let source = parse_source("s.t as x").unwrap();
    assert_eq!(
        source.source,
        Source::Table {
            namespaces: vec!["s".to_string()],
            name: "t".to_string(),
        }
    );
    assert_eq!(source.alias.expect("alias").name, "x");
}

fn lit(text: &str) -> ValueComponent {
    ValueComponent::literal(text)
}

fn col(name: &str) -> ValueComponent {
    ValueComponent::column(name)
}

/// Parses `sql` and checks it reprints byte-identically with the default
/// (single-line) options.
fn verified(sql: &str) -> SelectQuery {
    init_logger();
    let query = parse_select(sql).unwrap_or_else(|err| panic!("parse failed: {err}\n{sql}"));
    assert_eq!(print(&query, &SqlPrintOptions::default()), sql);
    query
}

/// Parses `sql`, checks it prints as `canonical`, and that the canonical
/// form parses back to the same tree.
fn one_parses_to(sql: &str, canonical: &str) -> SelectQuery {
    init_logger();
    let query = parse_select(sql).unwrap_or_else(|err| panic!("parse failed: {err}\n{sql}"));
    assert_eq!(print(&query, &SqlPrintOptions::default()), canonical);
    assert_eq!(parse_select(canonical).unwrap(), query);
    query
}

/// Routes `log` output to stderr for debugging; `RUST_LOG` controls the
/// level.
fn init_logger() {
    let _ = simple_logger::SimpleLogger::new().env().init();
}
