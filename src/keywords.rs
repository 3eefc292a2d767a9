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

//! Multi-word keyword recognition.
//!
//! SQL keywords such as `group by`, `left outer join`, or `is not distinct
//! from` span several whitespace-separated words. This module defines a
//! prefix tree over word sequences, a longest-match scanner over a
//! [`CharCursor`], and the process-wide tries used by the token readers and
//! the parsers. The tries are immutable after construction.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::cursor::CharCursor;
use crate::error::SqlError;

/// Classification of a word sequence against a trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordMatch {
    /// The path does not lead to any keyword.
    NotAKeyword,
    /// The path is a strict prefix of one or more keywords.
    PartialOnly,
    /// The path is a complete keyword with no longer extension.
    Final,
    /// The path is a complete keyword that a longer keyword extends.
    PartialOrFinal,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<String, TrieNode>,
    terminal: bool,
}

impl TrieNode {
    fn classify(&self) -> KeywordMatch {
        match (self.terminal, self.children.is_empty()) {
            (true, true) => KeywordMatch::Final,
            (true, false) => KeywordMatch::PartialOrFinal,
            (false, _) => KeywordMatch::PartialOnly,
        }
    }
}

/// A prefix tree over lower-cased word sequences.
#[derive(Debug, Default)]
pub struct KeywordTrie {
    root: TrieNode,
}

impl KeywordTrie {
    pub fn new(phrases: &[&str]) -> KeywordTrie {
        let mut trie = KeywordTrie::default();
        for phrase in phrases {
            let mut node = &mut trie.root;
            for word in phrase.split_whitespace() {
                node = node
                    .children
                    .entry(word.to_ascii_lowercase())
                    .or_default();
            }
            node.terminal = true;
        }
        trie
    }

    /// Classifies a space-separated phrase without touching any cursor.
    pub fn classify(&self, phrase: &str) -> KeywordMatch {
        let mut node = &self.root;
        for word in phrase.split_whitespace() {
            match node.children.get(&word.to_ascii_lowercase()) {
                Some(child) => node = child,
                None => return KeywordMatch::NotAKeyword,
            }
        }
        node.classify()
    }

    /// Reports whether `phrase` is a complete keyword in this trie.
    pub fn contains(&self, phrase: &str) -> bool {
        matches!(
            self.classify(phrase),
            KeywordMatch::Final | KeywordMatch::PartialOrFinal
        )
    }

    /// Scans the longest keyword starting at the cursor.
    ///
    /// Words are read one regular identifier at a time, separated by
    /// whitespace and comments. The longest path that reached a complete
    /// keyword wins; when a longer attempt fails, the cursor rewinds to the
    /// end of the last accepted keyword. Comments skipped inside the
    /// accepted span are appended to `comments_out`. Returns the canonical
    /// lower-cased phrase with single spaces, or `None` with the cursor
    /// restored when no keyword matches.
    pub fn read_keyword(
        &self,
        cursor: &mut CharCursor<'_>,
        comments_out: &mut Vec<String>,
    ) -> Result<Option<String>, SqlError> {
        let start = cursor.pos();
        let mut node = &self.root;
        let mut words: Vec<String> = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        let mut inner_comments: Vec<String> = Vec::new();
        let mut accepted: Option<(usize, usize, usize)> = None;

        loop {
            if !words.is_empty() {
                pending.append(&mut cursor.read_comments()?);
            }
            let word_start = cursor.pos();
            let Some(word) = cursor.read_regular_identifier() else {
                break;
            };
            let Some(child) = node.children.get(&word.to_ascii_lowercase()) else {
                cursor.set_pos(word_start);
                break;
            };
            node = child;
            words.push(word.to_ascii_lowercase());
            match node.classify() {
                KeywordMatch::Final => {
                    inner_comments.append(&mut pending);
                    accepted = Some((cursor.pos(), words.len(), inner_comments.len()));
                    break;
                }
                KeywordMatch::PartialOrFinal => {
                    inner_comments.append(&mut pending);
                    accepted = Some((cursor.pos(), words.len(), inner_comments.len()));
                }
                KeywordMatch::PartialOnly => {}
                KeywordMatch::NotAKeyword => unreachable!("trie nodes always classify"),
            }
        }

        match accepted {
            Some((end, word_count, comment_count)) => {
                cursor.set_pos(end);
                comments_out.extend(inner_comments.into_iter().take(comment_count));
                Ok(Some(words[..word_count].join(" ")))
            }
            None => {
                cursor.set_pos(start);
                Ok(None)
            }
        }
    }
}

/// Reserved command keywords, including every multi-word form the
/// tokenizer must fuse into a single lexeme.
const COMMAND_PHRASES: &[&str] = &[
    "with",
    "recursive",
    "materialized",
    "not materialized",
    "select",
    "distinct",
    "distinct on",
    "from",
    "where",
    "group by",
    "grouping sets",
    "having",
    "window",
    "order by",
    "partition by",
    "limit",
    "offset",
    "fetch",
    "first",
    "next",
    "row",
    "rows",
    "row only",
    "rows only",
    "percent",
    "percent with ties",
    "for",
    "update",
    "share",
    "key share",
    "no key update",
    "as",
    "on",
    "using",
    "lateral",
    "union",
    "union all",
    "intersect",
    "intersect all",
    "except",
    "except all",
    "values",
    "insert into",
    "set",
    "delete from",
    "returning",
    "case",
    "when",
    "then",
    "else",
    "end",
    "over",
    "range",
    "groups",
    "asc",
    "desc",
    "nulls first",
    "nulls last",
    "preceding",
    "following",
    "current row",
    "array",
    "placing",
    "leading",
    "trailing",
    "both",
    "join",
    "inner join",
    "left join",
    "left outer join",
    "right join",
    "right outer join",
    "full join",
    "full outer join",
    "cross join",
    "natural join",
    "natural inner join",
    "natural left join",
    "natural right join",
    "natural full join",
];

/// Logical keyword operators recognized by the operator reader.
const OPERATOR_PHRASES: &[&str] = &[
    "and",
    "or",
    "not",
    "is",
    "is not",
    "is distinct from",
    "is not distinct from",
    "like",
    "not like",
    "in",
    "not in",
    "exists",
    "not exists",
    "between",
    "not between",
];

/// Keyword literals recognized by the literal reader.
const LITERAL_PHRASES: &[&str] = &[
    "null",
    "true",
    "false",
    "current_date",
    "current_time",
    "current_timestamp",
    "localtime",
    "localtimestamp",
    "unbounded",
    "normalized",
    "nfc normalized",
    "nfd normalized",
    "nfkc normalized",
    "nfkd normalized",
];

/// Join introducers, consulted by the join parser. Every phrase is also a
/// command keyword so the tokenizer fuses it into one lexeme.
const JOIN_PHRASES: &[&str] = &[
    "join",
    "inner join",
    "left join",
    "left outer join",
    "right join",
    "right outer join",
    "full join",
    "full outer join",
    "cross join",
    "natural join",
    "natural inner join",
    "natural left join",
    "natural right join",
    "natural full join",
];

const GROUPING_SETS_PHRASES: &[&str] = &["grouping sets"];

/// Window frame boundary keywords, consulted by the frame parser. Note
/// `unbounded` lexes as a keyword literal, so a bound arrives as the pair
/// (`unbounded`, `preceding`) rather than as one lexeme.
const WINDOW_BOUNDARY_PHRASES: &[&str] = &[
    "current row",
    "preceding",
    "following",
    "unbounded preceding",
    "unbounded following",
];

/// Built-in type names the type reader recognizes in cast positions.
const TYPE_PHRASES: &[&str] = &[
    "int",
    "integer",
    "smallint",
    "bigint",
    "numeric",
    "decimal",
    "real",
    "float",
    "double precision",
    "boolean",
    "bool",
    "text",
    "char",
    "character",
    "varchar",
    "character varying",
    "date",
    "time",
    "timestamp",
    "timestamptz",
    "timestamp with time zone",
    "timestamp without time zone",
    "time with time zone",
    "time without time zone",
    "interval",
    "uuid",
    "json",
    "jsonb",
    "bytea",
    "serial",
    "bigserial",
    "oid",
    "regclass",
    "money",
    "bit",
    "bit varying",
    "inet",
    "cidr",
    "macaddr",
    "xml",
    "tsvector",
    "tsquery",
];

static COMMANDS: LazyLock<KeywordTrie> = LazyLock::new(|| KeywordTrie::new(COMMAND_PHRASES));
static OPERATORS: LazyLock<KeywordTrie> = LazyLock::new(|| KeywordTrie::new(OPERATOR_PHRASES));
static LITERALS: LazyLock<KeywordTrie> = LazyLock::new(|| KeywordTrie::new(LITERAL_PHRASES));
static JOINS: LazyLock<KeywordTrie> = LazyLock::new(|| KeywordTrie::new(JOIN_PHRASES));
static GROUPING_SETS: LazyLock<KeywordTrie> =
    LazyLock::new(|| KeywordTrie::new(GROUPING_SETS_PHRASES));
static WINDOW_BOUNDARIES: LazyLock<KeywordTrie> =
    LazyLock::new(|| KeywordTrie::new(WINDOW_BOUNDARY_PHRASES));
static TYPES: LazyLock<KeywordTrie> = LazyLock::new(|| KeywordTrie::new(TYPE_PHRASES));

pub fn commands() -> &'static KeywordTrie {
    &COMMANDS
}

pub fn operators() -> &'static KeywordTrie {
    &OPERATORS
}

pub fn literals() -> &'static KeywordTrie {
    &LITERALS
}

pub fn joins() -> &'static KeywordTrie {
    &JOINS
}

pub fn grouping_sets() -> &'static KeywordTrie {
    &GROUPING_SETS
}

pub fn window_boundaries() -> &'static KeywordTrie {
    &WINDOW_BOUNDARIES
}

pub fn types() -> &'static KeywordTrie {
    &TYPES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_reports_terminal_state() {
        let trie = KeywordTrie::new(&["order by", "order", "group by"]);
        assert_eq!(trie.classify("order"), KeywordMatch::PartialOrFinal);
        assert_eq!(trie.classify("order by"), KeywordMatch::Final);
        assert_eq!(trie.classify("group"), KeywordMatch::PartialOnly);
        assert_eq!(trie.classify("window"), KeywordMatch::NotAKeyword);
    }

    #[test]
    fn longest_match_wins() {
        let mut cursor = CharCursor::new("left outer join t");
        let mut comments = Vec::new();
        let phrase = commands().read_keyword(&mut cursor, &mut comments).unwrap();
        assert_eq!(phrase.as_deref(), Some("left outer join"));
        cursor.skip_whitespace();
        assert_eq!(cursor.peek(), Some('t'));
    }

    #[test]
    fn falls_back_to_last_accepted_keyword() {
        // `is not` matches, `is not thing` does not; the cursor must rewind
        // to just after `not`.
        let mut cursor = CharCursor::new("is not thing");
        let mut comments = Vec::new();
        let phrase = operators()
            .read_keyword(&mut cursor, &mut comments)
            .unwrap();
        assert_eq!(phrase.as_deref(), Some("is not"));
        cursor.skip_whitespace();
        assert_eq!(cursor.peek(), Some('t'));
    }

    #[test]
    fn rejects_non_keywords_and_restores_cursor() {
        let mut cursor = CharCursor::new("total from t");
        let mut comments = Vec::new();
        let phrase = commands().read_keyword(&mut cursor, &mut comments).unwrap();
        assert_eq!(phrase, None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn comments_between_keyword_words_are_collected() {
        let mut cursor = CharCursor::new("group /* split */ by x");
        let mut comments = Vec::new();
        let phrase = commands().read_keyword(&mut cursor, &mut comments).unwrap();
        assert_eq!(phrase.as_deref(), Some("group by"));
        assert_eq!(comments, vec!["split"]);
    }

    #[test]
    fn keyword_casing_is_canonicalized() {
        let mut cursor = CharCursor::new("GROUP   BY");
        let mut comments = Vec::new();
        let phrase = commands().read_keyword(&mut cursor, &mut comments).unwrap();
        assert_eq!(phrase.as_deref(), Some("group by"));
    }
}
