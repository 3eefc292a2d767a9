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
//! Mutation seams and the visitor protocol.

use pretty_assertions::assert_eq;

use sqlcraft::ast::*;
use sqlcraft::visitor::{Accept, Visitor};
use sqlcraft::{parse_common_table, parse_select, parse_value, print, ErrorKind, SqlPrintOptions};

#[test]
fn append_where_and_narrows_an_existing_clause() {
    let mut query = parse_select("select a from t where a > 0").unwrap();
    query
        .as_simple_mut()
        .unwrap()
        .append_where_and(parse_value("b = 1").unwrap());
    assert_eq!(
        print(&query, &SqlPrintOptions::default()),
        "select a from t where a > 0 and b = 1"
    );
}

#[test]
fn append_where_and_creates_the_clause_when_absent() {
    let mut query = parse_select("select a from t").unwrap();
    query
        .as_simple_mut()
        .unwrap()
        .append_where_and(parse_value("b = 1").unwrap());
    assert_eq!(
        print(&query, &SqlPrintOptions::default()),
        "select a from t where b = 1"
    );
}

#[test]
fn append_having_requires_group_by() {
    let mut query = parse_select("select a from t").unwrap();
    let err = query
        .as_simple_mut()
        .unwrap()
        .append_having_and(parse_value("count(*) > 1").unwrap())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);

    let mut query = parse_select("select a from t group by a").unwrap();
    query
        .as_simple_mut()
        .unwrap()
        .append_having_and(parse_value("count(*) > 1").unwrap())
        .unwrap();
    assert_eq!(
        print(&query, &SqlPrintOptions::default()),
        "select a from t group by a having count(*) > 1"
    );
}

#[test]
fn append_common_table_rejects_duplicates() {
    let mut query = parse_select("with t as (select 1) select * from t").unwrap();
    let table = parse_common_table("u as (select 2)").unwrap();
    query
        .as_simple_mut()
        .unwrap()
        .append_common_table(table.clone())
        .unwrap();
    assert_eq!(
        print(&query, &SqlPrintOptions::default()),
        "with t as (select 1), u as (select 2) select * from t"
    );
    let err = query
        .as_simple_mut()
        .unwrap()
        .append_common_table(table)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);
}

#[test]
fn attach_with_rejects_a_second_with_clause() {
    let mut query = parse_select("with t as (select 1) select * from t").unwrap();
    let with = WithClause {
        recursive: false,
        tables: vec![parse_common_table("u as (select 2)").unwrap()],
    };
    let err = query
        .as_simple_mut()
        .unwrap()
        .attach_with(with)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);
}

#[test]
fn append_join_requires_a_from_clause() {
    let join = JoinClause {
        join_type: "inner join".to_string(),
        lateral: false,
        source: SourceExpression::table("u"),
        condition: Some(JoinCondition::On(parse_value("t.id = u.id").unwrap())),
    };

    let mut query = parse_select("select 1").unwrap();
    let err = query
        .as_simple_mut()
        .unwrap()
        .append_join(join.clone())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);

    let mut query = parse_select("select a from t").unwrap();
    query.as_simple_mut().unwrap().append_join(join).unwrap();
    assert_eq!(
        print(&query, &SqlPrintOptions::default()),
        "select a from t inner join u on t.id = u.id"
    );
}

#[test]
fn override_select_item_matches_exactly_one_name() {
    let mut query = parse_select("select a, b as total from t").unwrap();
    query
        .as_simple_mut()
        .unwrap()
        .override_select_item("total", parse_value("b * 2").unwrap())
        .unwrap();
    // The implicit alias survives an override of a bare column item.
    query
        .as_simple_mut()
        .unwrap()
        .override_select_item("a", parse_value("a + 1").unwrap())
        .unwrap();
    assert_eq!(
        print(&query, &SqlPrintOptions::default()),
        "select a + 1 as a, b * 2 as total from t"
    );

    let err = query
        .as_simple_mut()
        .unwrap()
        .override_select_item("missing", parse_value("1").unwrap())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);

    let mut ambiguous = parse_select("select a, 1 as a from t").unwrap();
    let err = ambiguous
        .as_simple_mut()
        .unwrap()
        .override_select_item("a", parse_value("2").unwrap())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);
}

#[test]
fn set_operation_builders_nest_left() {
    let a = parse_select("select 1").unwrap();
    let b = parse_select("select 2").unwrap();
    let c = parse_select("select 3").unwrap();
    let chained = a.union(b).union_all(c);
    assert_eq!(
        print(&chained, &SqlPrintOptions::default()),
        "select 1 union select 2 union all select 3"
    );
    match &chained {
        SelectQuery::Binary(outer) => {
            assert_eq!(outer.operator, "union all");
            match outer.left.as_ref() {
                SelectQuery::Binary(inner) => assert_eq!(inner.operator, "union"),
                _ => unreachable!(),
            }
        }
        _ => unreachable!(),
    }
}

#[test]
fn values_convert_into_an_aliased_select() {
    let query = sqlcraft::parse_values("values (1, 'a'), (2, 'b')").unwrap();
    let mut values = match query {
        SelectQuery::Values(values) => values,
        _ => unreachable!(),
    };
    values.column_aliases = Some(vec!["id".to_string(), "name".to_string()]);
    let simple = values.into_simple_select("v");
    assert_eq!(
        print(&SelectQuery::Simple(simple), &SqlPrintOptions::default()),
        "select * from (values (1, 'a'), (2, 'b')) as v(id, name)"
    );
}

#[test]
fn visitor_collects_columns_across_the_tree() {
    struct ColumnCollector {
        names: Vec<String>,
    }

    impl Visitor for ColumnCollector {
        fn visit_column_reference(&mut self, column: &ColumnReference) {
            if column.name != "*" {
                self.names.push(column.name.clone());
            }
        }
    }

    let query = parse_select(
        "select a, sum(b) over (partition by c) from t \
         where d in (select e from u) group by a, f",
    )
    .unwrap();
    let mut collector = ColumnCollector { names: Vec::new() };
    query.accept(&mut collector);
    collector.names.sort();
    assert_eq!(collector.names, vec!["a", "a", "b", "c", "d", "e", "f"]);
}
