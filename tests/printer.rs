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
//! Formatting policies, printing idempotence, and round-trip properties.

use pretty_assertions::assert_eq;

use sqlcraft::{
    parse_select, print, BreakStyle, IndentChar, KeywordCase, Newline, SqlPrintOptions,
};

#[test]
fn comma_break_before_with_two_space_indent() {
    let options = SqlPrintOptions {
        indent_char: IndentChar::Space,
        indent_size: 2,
        newline: Newline::Lf,
        comma_break: BreakStyle::Before,
        ..SqlPrintOptions::default()
    };
    let query = parse_select("select a,b,c from t").unwrap();
    assert_eq!(
        print(&query, &options),
        "select\n  a\n  , b\n  , c\nfrom\n  t"
    );
}

#[test]
fn comma_break_after_puts_items_on_their_own_lines() {
    let options = SqlPrintOptions {
        indent_char: IndentChar::Space,
        indent_size: 2,
        newline: Newline::Lf,
        comma_break: BreakStyle::After,
        ..SqlPrintOptions::default()
    };
    let query = parse_select("select a, b from t").unwrap();
    assert_eq!(print(&query, &options), "select\n  a,\n  b\nfrom\n  t");
}

#[test]
fn and_break_applies_inside_where() {
    let options = SqlPrintOptions {
        indent_char: IndentChar::Space,
        indent_size: 2,
        newline: Newline::Lf,
        and_break: BreakStyle::Before,
        ..SqlPrintOptions::default()
    };
    let query = parse_select("select a from t where a = 1 and b = 2 and c = 3").unwrap();
    assert_eq!(
        print(&query, &options),
        "select\n  a\nfrom\n  t\nwhere\n  a = 1\n  and b = 2\n  and c = 3"
    );
}

#[test]
fn and_break_leaves_between_bounds_alone() {
    let options = SqlPrintOptions {
        newline: Newline::Lf,
        indent_char: IndentChar::Space,
        indent_size: 2,
        and_break: BreakStyle::Before,
        ..SqlPrintOptions::default()
    };
    let query = parse_select("select a from t where b between 1 and 10").unwrap();
    assert_eq!(
        print(&query, &options),
        "select\n  a\nfrom\n  t\nwhere\n  b between 1 and 10"
    );
}

#[test]
fn keyword_case_upper_spares_identifiers_and_literals() {
    let options = SqlPrintOptions {
        keyword_case: KeywordCase::Upper,
        ..SqlPrintOptions::default()
    };
    let query = parse_select("select a as Total from t where a like 'x%' and b = 1").unwrap();
    assert_eq!(
        print(&query, &options),
        "SELECT a AS Total FROM t WHERE a LIKE 'x%' AND b = 1"
    );
}

#[test]
fn tab_indent_and_crlf_newlines() {
    let options = SqlPrintOptions {
        indent_char: IndentChar::Tab,
        indent_size: 1,
        newline: Newline::CrLf,
        ..SqlPrintOptions::default()
    };
    let query = parse_select("select a from t").unwrap();
    assert_eq!(print(&query, &options), "select\r\n\ta\r\nfrom\r\n\tt");
}

#[test]
fn joins_always_start_a_fresh_line() {
    let options = SqlPrintOptions {
        indent_char: IndentChar::Space,
        indent_size: 2,
        newline: Newline::Lf,
        ..SqlPrintOptions::default()
    };
    let query =
        parse_select("select * from t inner join u on t.id = u.id left join v on v.id = u.id")
            .unwrap();
    assert_eq!(
        print(&query, &options),
        "select\n  *\nfrom\n  t\ninner join u on t.id = u.id\nleft join v on v.id = u.id"
    );
}

#[test]
fn subqueries_indent_in_multi_line_mode() {
    let query = parse_select("select a from (select a from t) as s").unwrap();
    assert_eq!(
        print(&query, &SqlPrintOptions::pretty()),
        "select\n    a\nfrom\n    (\n        select\n            a\n        from\n            t\n    ) as s"
    );
}

#[test]
fn set_operators_sit_between_the_operands() {
    let options = SqlPrintOptions {
        indent_char: IndentChar::Space,
        indent_size: 2,
        newline: Newline::Lf,
        ..SqlPrintOptions::default()
    };
    let query = parse_select("select 1 union all select 2").unwrap();
    assert_eq!(
        print(&query, &options),
        "select\n  1\nunion all\nselect\n  2"
    );
}

#[test]
fn printing_is_idempotent_across_option_sets() {
    let inputs = [
        "select 1 + 2 * 3 as x from t",
        "with t(x) as (select 1 union all select 2) select * from t",
        "select sum(x) over (partition by g order by t rows between unbounded preceding and current row) from s",
        "select distinct on (a) a, b from t inner join u using (id) where a between 1 and 10 and b is not null group by a, b having count(*) > 1 order by a desc nulls last limit 10 offset 5",
        "values (1, 'a'), (2, 'b')",
    ];
    let option_sets = [
        SqlPrintOptions::default(),
        SqlPrintOptions::pretty(),
        SqlPrintOptions {
            comma_break: BreakStyle::After,
            and_break: BreakStyle::After,
            keyword_case: KeywordCase::Upper,
            newline: Newline::Lf,
            indent_char: IndentChar::Tab,
            indent_size: 1,
            ..SqlPrintOptions::default()
        },
    ];
    for sql in inputs {
        for options in &option_sets {
            let first = print(&parse_select(sql).unwrap(), options);
            let second = print(&parse_select(&first).unwrap(), options);
            assert_eq!(first, second, "printing not idempotent for: {sql}");
        }
    }
}

#[test]
fn round_trip_is_structurally_stable() {
    let inputs = [
        "select 1 + 2 * 3 as x from t",
        "with t(x) as (select 1 union all select 2) select * from t",
        "select case when a = 1 then 'x' else 'y' end from t where a in (1, 2)",
        "select cast(a as int), b::text from t",
    ];
    for sql in inputs {
        let query = parse_select(sql).unwrap();
        for options in [SqlPrintOptions::default(), SqlPrintOptions::pretty()] {
            let printed = print(&query, &options);
            let reparsed = parse_select(&printed)
                .unwrap_or_else(|err| panic!("reparse failed: {err}\n{printed}"));
            assert_eq!(reparsed, query, "round trip changed the tree for: {sql}");
        }
    }
}

#[test]
fn comments_survive_the_round_trip() {
    let query = parse_select("select /* keep */ a from t").unwrap();
    let printed = print(&query, &SqlPrintOptions::default());
    assert_eq!(printed, "/* keep */ select a from t");
    assert_eq!(parse_select(&printed).unwrap(), query);

    let query = parse_select("select a, -- tail\n b from t").unwrap();
    let printed = print(&query, &SqlPrintOptions::default());
    assert_eq!(printed, "select a, /* tail */ b from t");
    assert_eq!(parse_select(&printed).unwrap(), query);
}
