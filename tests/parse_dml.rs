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
//! INSERT, UPDATE, DELETE, and VALUES parsing.

use matches::assert_matches;
use pretty_assertions::assert_eq;

use sqlcraft::ast::*;
use sqlcraft::{
    parse_delete, parse_insert, parse_update, parse_values, print, print_delete, print_insert,
    print_update, ErrorKind, SqlPrintOptions,
};

#[test]
fn parse_insert_with_values_rows() {
    let query = insert_parses_to(
        "insert into s.t(a,b) values (1,2),(3,4)",
        "insert into s.t(a, b) values (1, 2), (3, 4)",
    );
    assert_eq!(query.namespaces, vec!["s".to_string()]);
    assert_eq!(query.table, "t");
    assert_eq!(query.columns, vec!["a".to_string(), "b".to_string()]);
    match query.source.as_ref() {
        SelectQuery::Values(values) => {
            assert_eq!(values.rows.len(), 2);
            assert_eq!(
                values.rows[0].values,
                vec![ValueComponent::literal("1"), ValueComponent::literal("2")]
            );
        }
        _ => unreachable!(),
    }
}

#[test]
fn parse_insert_from_select() {
    let query = verified_insert("insert into t select a from u where a > 0");
    assert!(query.columns.is_empty());
    assert_matches!(query.source.as_ref(), SelectQuery::Simple(_));
}

#[test]
fn insert_pushes_a_leading_with_into_the_source() {
    let query = insert_parses_to(
        "with s as (select 1) insert into t select * from s",
        "insert into t with s as (select 1) select * from s",
    );
    match query.source.as_ref() {
        SelectQuery::Simple(simple) => {
            assert_eq!(simple.with.as_ref().expect("with").tables[0].name, "s");
        }
        _ => unreachable!(),
    }
}

#[test]
fn insert_with_before_values_fails() {
    let err = parse_insert("with s as (select 1) insert into t values (1)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);
}

#[test]
fn parse_insert_returning() {
    let query = verified_insert("insert into t(a) values (1) returning a as created");
    let returning = query.returning.expect("returning");
    assert_eq!(returning[0].alias.as_deref(), Some("created"));
}

#[test]
fn parse_update_statements() {
    let query = verified_update("update t set a = 1, b = b + 1 where id = 3");
    assert_eq!(query.set.len(), 2);
    assert_eq!(query.set[0].column, "a");
    assert_eq!(query.set[1].column, "b");
    assert!(query.from.is_none());
    assert!(query.where_clause.is_some());

    verified_update("update t set a = u.a from u where u.id = t.id");
    verified_update("update s.t as x set a = 1 returning x.a");
}

#[test]
fn parse_delete_statements() {
    let query = verified_delete("delete from t where id = 1");
    assert!(query.using.is_none());
    assert!(query.where_clause.is_some());

    let query = verified_delete("delete from t using u, v where u.id = t.id returning t.id");
    assert_eq!(query.using.expect("using").len(), 2);
}

#[test]
fn parse_standalone_values() {
    let query = parse_values("values (1, 2), (3, 4)").unwrap();
    assert_eq!(print(&query, &SqlPrintOptions::default()), "values (1, 2), (3, 4)");
    match &query {
        SelectQuery::Values(values) => assert_eq!(values.rows.len(), 2),
        _ => unreachable!(),
    }
}

#[test]
fn values_rows_must_have_equal_arity() {
    let err = parse_values("values (1, 2), (3)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedInput);
}

#[test]
fn update_without_set_is_rejected() {
    let err = parse_update("update t where id = 1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
}

/// Parses and reprints an INSERT, expecting byte-identical output.
fn verified_insert(sql: &str) -> InsertQuery {
    insert_parses_to(sql, sql)
}

fn insert_parses_to(sql: &str, canonical: &str) -> InsertQuery {
    let query = parse_insert(sql).unwrap_or_else(|err| panic!("parse failed: {err}\n{sql}"));
    assert_eq!(print_insert(&query, &SqlPrintOptions::default()), canonical);
    assert_eq!(parse_insert(canonical).unwrap(), query);
    query
}

fn verified_update(sql: &str) -> UpdateQuery {
    let query = parse_update(sql).unwrap_or_else(|err| panic!("parse failed: {err}\n{sql}"));
    assert_eq!(print_update(&query, &SqlPrintOptions::default()), sql);
    query
}

fn verified_delete(sql: &str) -> DeleteQuery {
    let query = parse_delete(sql).unwrap_or_else(|err| panic!("parse failed: {err}\n{sql}"));
    assert_eq!(print_delete(&query, &SqlPrintOptions::default()), sql);
    query
}
