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
//! The named-parameter compiler against realistic query texts.

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use sqlcraft::{compile_named, parse_select, ErrorKind, PlaceholderStyle};

#[test]
fn compile_preserves_everything_but_the_placeholders() {
    let sql = "SELECT a, b FROM t WHERE a = :id AND b BETWEEN 1 AND 10";
    // The text also parses; the compiler itself is purely text-level.
    parse_select(sql).unwrap();

    let params = HashMap::from([("id".to_string(), 7)]);
    let compiled = compile_named(sql, &params, PlaceholderStyle::PgIndexed).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT a, b FROM t WHERE a = $1 AND b BETWEEN 1 AND 10"
    );
    assert_eq!(compiled.values, vec![7]);
    assert_eq!(compiled.names, vec!["id"]);
}

#[test]
fn question_style_uses_anonymous_placeholders() {
    let params = HashMap::from([
        ("name".to_string(), "max".to_string()),
        ("limit".to_string(), "10".to_string()),
    ]);
    let compiled = compile_named(
        "select * from users where name = :name limit :limit",
        &params,
        PlaceholderStyle::Question,
    )
    .unwrap();
    assert_eq!(
        compiled.sql,
        "select * from users where name = ? limit ?"
    );
    assert_eq!(compiled.values, vec!["max".to_string(), "10".to_string()]);
    assert_eq!(compiled.names, vec!["name", "limit"]);
}

#[test]
fn repeated_names_produce_repeated_bindings() {
    let params = HashMap::from([("v".to_string(), 1)]);
    let compiled = compile_named(
        "select :v where :v > 0",
        &params,
        PlaceholderStyle::PgIndexed,
    )
    .unwrap();
    assert_eq!(compiled.sql, "select $1 where $2 > 0");
    assert_eq!(compiled.values, vec![1, 1]);
    assert_eq!(compiled.names, vec!["v", "v"]);
}

#[test]
fn protected_regions_keep_their_colons() {
    let params = HashMap::from([("id".to_string(), 1)]);
    let compiled = compile_named(
        "select ':id' as a, \":id\" as b, x::int, $tag$ :id $tag$ from t where id = :id",
        &params,
        PlaceholderStyle::PgIndexed,
    )
    .unwrap();
    assert_eq!(
        compiled.sql,
        "select ':id' as a, \":id\" as b, x::int, $tag$ :id $tag$ from t where id = $1"
    );
    assert_eq!(compiled.values, vec![1]);
}

#[test]
fn unbound_or_reference_free_texts_are_malformed() {
    let params: HashMap<String, i32> = HashMap::new();
    let err = compile_named("select :missing", &params, PlaceholderStyle::PgIndexed)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedInput);

    let err = compile_named("select 1", &params, PlaceholderStyle::Question).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedInput);
}
