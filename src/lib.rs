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

//! SQL parsing, transformation, and formatting for the PostgreSQL dialect
//! (with MySQL and SQL Server quoting affordances).
//!
//! The pipeline is: tokenize SQL text into [`lexeme::Lexeme`]s, parse the
//! lexemes into a typed [`ast`], transform the tree programmatically if
//! needed, and print it back with configurable formatting.
//!
//! Example:
//!
//! ```
//! use sqlcraft::{parse_select, parse_value, print, SqlPrintOptions};
//!
//! let mut query = parse_select("select id, name from users")?;
//! query
//!     .as_simple_mut()
//!     .unwrap()
//!     .append_where_and(parse_value("active = true")?);
//! assert_eq!(
//!     print(&query, &SqlPrintOptions::default()),
//!     "select id, name from users where active = true"
//! );
//! # Ok::<(), sqlcraft::SqlError>(())
//! ```

#![warn(clippy::all)]

pub mod ast;
pub mod error;
pub mod keywords;
pub mod lexeme;
pub mod params;
pub mod parser;
pub mod printer;
pub mod tokenizer;
pub mod visitor;

mod cursor;

pub use error::{ErrorKind, Result, SqlError};
pub use params::{compile_named, CompiledQuery, PlaceholderStyle};
pub use parser::{
    parse_common_table, parse_delete, parse_fetch, parse_for, parse_group_by, parse_having,
    parse_insert, parse_limit, parse_order_by, parse_select, parse_source, parse_update,
    parse_value, parse_values, parse_where, parse_window, parse_with,
};
pub use printer::{
    print, print_delete, print_insert, print_update, print_value, BreakStyle, IndentChar,
    KeywordCase, Newline, SqlPrintOptions,
};
pub use tokenizer::tokenize;
