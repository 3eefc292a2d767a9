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

//! SQL tokenizer.
//!
//! The tokenizer drives a fixed-priority sequence of token readers across
//! the input. Each reader is responsible for one lexeme class; the first
//! reader to produce a lexeme wins. The priority order is part of the
//! dialect definition: the type reader runs before the function reader so
//! `numeric(10, 2)` lexes as a type, and the literal reader runs before the
//! operator reader so signed numbers lex as literals.

use itertools::Itertools;
use log::debug;

use crate::cursor::{CharCursor, OPERATOR_CHARS};
use crate::error::Result;
use crate::keywords;
use crate::lexeme::{Lexeme, LexemeKind};

/// Attempts to read one lexeme class at the cursor position.
///
/// A reader returns `Ok(None)` to pass; the manager restores the cursor
/// before trying the next reader.
trait TokenReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>>;
}

/// Readers in match priority order. Earlier readers have first refusal.
static READERS: [&(dyn TokenReader + Sync); 10] = [
    &EscapedIdentifierReader,
    &ParameterReader,
    &StringSpecifierReader,
    &LiteralReader,
    &SpecialSymbolReader,
    &CommandReader,
    &OperatorReader,
    &TypeReader,
    &FunctionReader,
    &IdentifierReader,
];

/// Converts SQL text into a lexeme sequence with attached comments.
///
/// A top-level `;` terminates tokenization; anything after it is ignored.
pub fn tokenize(sql: &str) -> Result<Vec<Lexeme>> {
    debug!("tokenizing {} bytes", sql.len());
    let mut cursor = CharCursor::new(sql);
    // Rough lexeme-count estimate; an optimization, not a contract.
    let mut lexemes: Vec<Lexeme> = Vec::with_capacity(sql.len() / 8 + 4);
    let mut pending = cursor.read_comments()?;

    loop {
        if cursor.is_eof() {
            break;
        }
        if cursor.consume(';') {
            break;
        }
        let mut lexeme = match read_one(&mut cursor, lexemes.last())? {
            Some(lexeme) => lexeme,
            None => {
                let pos = cursor.pos();
                return Err(cursor.err(pos, "cannot read a lexeme"));
            }
        };
        let trailing = cursor.read_comments()?;
        if matches!(lexeme.kind, LexemeKind::Comma | LexemeKind::Operator) {
            // Comments around a separator belong to the following operand.
            pending.append(&mut lexeme.comments);
            pending.extend(trailing);
        } else {
            let mut merged = std::mem::take(&mut pending);
            merged.append(&mut lexeme.comments);
            merged.extend(trailing);
            lexeme.comments = merged;
        }
        lexemes.push(lexeme);
    }

    if !pending.is_empty() {
        if let Some(last) = lexemes.last_mut() {
            last.comments.append(&mut pending);
        }
    }
    Ok(lexemes)
}

fn read_one(cursor: &mut CharCursor<'_>, prev: Option<&Lexeme>) -> Result<Option<Lexeme>> {
    for reader in READERS {
        let start = cursor.pos();
        match reader.try_read(cursor, prev)? {
            Some(lexeme) => return Ok(Some(lexeme)),
            None => cursor.set_pos(start),
        }
    }
    Ok(None)
}

fn is_parameter_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// `` `name` ``, `"name"`, and `[name]` quoted identifiers.
///
/// The SQL Server bracket form is suppressed right after the `array`
/// keyword so `array[1, 2]` lexes as an array constructor. Quotes are kept
/// in the lexeme value so the original spelling round-trips.
struct EscapedIdentifierReader;

impl TokenReader for EscapedIdentifierReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        let (close, doubled) = match cursor.peek() {
            Some('"') => ('"', true),
            Some('`') => ('`', true),
            Some('[') => {
                if prev.is_some_and(|p| p.matches(LexemeKind::Command, "array")) {
                    return Ok(None);
                }
                (']', false)
            }
            _ => return Ok(None),
        };
        let start = cursor.pos();
        cursor.next();
        loop {
            match cursor.next() {
                None => return Err(cursor.err(start, "unterminated quoted identifier")),
                Some(ch) if ch == close => {
                    if doubled && cursor.peek() == Some(close) {
                        cursor.next();
                    } else {
                        break;
                    }
                }
                Some(_) => {}
            }
        }
        let value = cursor.slice(start, cursor.pos()).to_string();
        Ok(Some(Lexeme::new(LexemeKind::Identifier, value)))
    }
}

/// `${name}`, `:name`, `@name`, `$name`, and anonymous `?` placeholders.
///
/// A sigil followed by an operator character is not a parameter, so the
/// `::` cast operator is left for the operator reader.
struct ParameterReader;

impl TokenReader for ParameterReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        _prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        match cursor.peek() {
            Some('$') if cursor.peek_second() == Some('{') => {
                let start = cursor.pos();
                cursor.next();
                cursor.next();
                let name = cursor.take_while(is_parameter_name_char);
                if !cursor.consume('}') {
                    return Err(cursor.err(start, "unterminated ${...} parameter"));
                }
                if name.is_empty() {
                    return Err(cursor.err(start, "empty parameter name"));
                }
                Ok(Some(Lexeme::new(LexemeKind::Parameter, name)))
            }
            Some(':' | '@' | '$') => {
                match cursor.peek_second() {
                    Some(next) if OPERATOR_CHARS.contains(&next) => return Ok(None),
                    _ => {}
                }
                cursor.next();
                let name = cursor.take_while(is_parameter_name_char);
                if name.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Lexeme::new(LexemeKind::Parameter, name)))
            }
            Some('?') => {
                cursor.next();
                Ok(Some(Lexeme::new(LexemeKind::Parameter, "")))
            }
            _ => Ok(None),
        }
    }
}

/// The `e'`, `x'`, `b'`, and `u&'` string prefixes.
///
/// The reader consumes only the prefix; the quoted literal itself is left
/// for the literal reader, so the pair stays adjacent in the lexeme
/// sequence.
struct StringSpecifierReader;

impl TokenReader for StringSpecifierReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        _prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        for prefix in ["e'", "x'", "b'"] {
            if cursor.starts_with_ci(prefix) {
                cursor.next();
                return Ok(Some(Lexeme::new(
                    LexemeKind::StringSpecifier,
                    &prefix[..1],
                )));
            }
        }
        if cursor.starts_with_ci("u&'") {
            cursor.next();
            cursor.next();
            return Ok(Some(Lexeme::new(LexemeKind::StringSpecifier, "u&")));
        }
        Ok(None)
    }
}

/// Keyword literals, numbers, and single-quoted strings.
struct LiteralReader;

impl TokenReader for LiteralReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        // Keyword literals (`null`, `true`, `current_date`, ...) keep their
        // original spelling; only internal whitespace is collapsed.
        let start = cursor.pos();
        let mut comments = Vec::new();
        if keywords::literals()
            .read_keyword(cursor, &mut comments)?
            .is_some()
        {
            let raw = cursor.slice(start, cursor.pos());
            let value: String = raw.split_whitespace().join(" ");
            let mut lexeme = Lexeme::new(LexemeKind::Literal, value);
            lexeme.comments = comments;
            return Ok(Some(lexeme));
        }

        if cursor.peek() == Some('\'') {
            return read_quoted_string(cursor).map(Some);
        }

        read_number(cursor, prev)
    }
}

fn read_quoted_string(cursor: &mut CharCursor<'_>) -> Result<Lexeme> {
    let start = cursor.pos();
    cursor.next();
    loop {
        match cursor.next() {
            None => return Err(cursor.err(start, "unterminated string literal")),
            Some('\\') => {
                cursor.next();
            }
            Some('\'') => {
                if cursor.peek() == Some('\'') {
                    cursor.next();
                } else {
                    break;
                }
            }
            Some(_) => {}
        }
    }
    let value = cursor.slice(start, cursor.pos()).to_string();
    Ok(Lexeme::new(LexemeKind::Literal, value))
}

/// A sign may start a numeric literal only where no value just ended.
fn sign_allowed(prev: Option<&Lexeme>) -> bool {
    match prev {
        None => true,
        Some(lexeme) => matches!(
            lexeme.kind,
            LexemeKind::Operator
                | LexemeKind::Comma
                | LexemeKind::OpenParen
                | LexemeKind::OpenBracket
                | LexemeKind::Command
        ),
    }
}

fn read_number(cursor: &mut CharCursor<'_>, prev: Option<&Lexeme>) -> Result<Option<Lexeme>> {
    let mut probe = cursor.clone();
    let start = probe.pos();
    let mut value = String::new();

    if matches!(probe.peek(), Some('+' | '-')) && sign_allowed(prev) {
        let sign = probe.peek().unwrap();
        let follows_number = match probe.peek_second() {
            Some(ch) if ch.is_ascii_digit() => true,
            Some('.') => {
                let mut ahead = probe.clone();
                ahead.next();
                ahead.next();
                ahead.peek().is_some_and(|ch| ch.is_ascii_digit())
            }
            _ => false,
        };
        if !follows_number {
            return Ok(None);
        }
        probe.next();
        value.push(sign);
    }

    // Radix-prefixed integers: 0x..., 0b..., 0o...
    if probe.peek() == Some('0') {
        if let Some(radix @ ('x' | 'X' | 'b' | 'B' | 'o' | 'O')) = probe.peek_second() {
            probe.next();
            probe.next();
            let digits = probe.take_while(|ch| match radix {
                'x' | 'X' => ch.is_ascii_hexdigit(),
                'b' | 'B' => ch == '0' || ch == '1',
                _ => ('0'..='7').contains(&ch),
            });
            if digits.is_empty() {
                return Err(probe.err(start, "malformed radix-prefixed number"));
            }
            value.push('0');
            value.push(radix);
            value.push_str(&digits);
            *cursor = probe;
            return Ok(Some(Lexeme::new(LexemeKind::Literal, value)));
        }
    }

    let integer = probe.take_while(|ch| ch.is_ascii_digit());
    let mut has_digits = !integer.is_empty();
    if has_digits {
        value.push_str(&integer);
    } else if probe.peek() == Some('.')
        && probe.peek_second().is_some_and(|ch| ch.is_ascii_digit())
    {
        // A leading-dot number normalizes to the `0.` form.
        value.push('0');
    } else {
        return Ok(None);
    }

    if probe.peek() == Some('.') {
        let fraction_follows = probe.peek_second().is_some_and(|ch| ch.is_ascii_digit());
        if fraction_follows || has_digits {
            probe.next();
            value.push('.');
            value.push_str(&probe.take_while(|ch| ch.is_ascii_digit()));
            has_digits = true;
        }
    }
    if !has_digits {
        return Ok(None);
    }

    if matches!(probe.peek(), Some('e' | 'E')) {
        let mut exponent = probe.clone();
        let marker = exponent.next().unwrap();
        let mut text = String::new();
        if matches!(exponent.peek(), Some('+' | '-')) {
            text.push(exponent.next().unwrap());
        }
        let digits = exponent.take_while(|ch| ch.is_ascii_digit());
        if !digits.is_empty() {
            value.push(marker);
            value.push_str(&text);
            value.push_str(&digits);
            probe = exponent;
        }
    }

    *cursor = probe;
    Ok(Some(Lexeme::new(LexemeKind::Literal, value)))
}

/// `.`, `,`, `(`, `)`, `[`, `]`.
struct SpecialSymbolReader;

impl TokenReader for SpecialSymbolReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        _prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        let kind = match cursor.peek() {
            Some('.') => LexemeKind::Dot,
            Some(',') => LexemeKind::Comma,
            Some('(') => LexemeKind::OpenParen,
            Some(')') => LexemeKind::CloseParen,
            Some('[') => LexemeKind::OpenBracket,
            Some(']') => LexemeKind::CloseBracket,
            _ => return Ok(None),
        };
        let ch = cursor.next().unwrap();
        Ok(Some(Lexeme::new(kind, ch.to_string())))
    }
}

/// Reserved command keywords, via the command trie.
struct CommandReader;

impl TokenReader for CommandReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        _prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        let mut comments = Vec::new();
        match keywords::commands().read_keyword(cursor, &mut comments)? {
            Some(phrase) => {
                let mut lexeme = Lexeme::new(LexemeKind::Command, phrase);
                lexeme.comments = comments;
                Ok(Some(lexeme))
            }
            None => Ok(None),
        }
    }
}

/// Symbolic operator runs and logical keyword operators.
struct OperatorReader;

impl TokenReader for OperatorReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        let run = cursor.take_while(|ch| OPERATOR_CHARS.contains(&ch));
        if !run.is_empty() {
            // A bare `*` where no value just ended is the wildcard, which
            // belongs to the identifier reader.
            if run == "*" && !value_ended(prev) {
                return Ok(None);
            }
            return Ok(Some(Lexeme::new(LexemeKind::Operator, run)));
        }
        let mut comments = Vec::new();
        match keywords::operators().read_keyword(cursor, &mut comments)? {
            Some(phrase) => {
                let mut lexeme = Lexeme::new(LexemeKind::Operator, phrase);
                lexeme.comments = comments;
                Ok(Some(lexeme))
            }
            None => Ok(None),
        }
    }
}

/// Reports whether the previous lexeme can end a value expression.
fn value_ended(prev: Option<&Lexeme>) -> bool {
    prev.is_some_and(|lexeme| {
        matches!(
            lexeme.kind,
            LexemeKind::Literal
                | LexemeKind::Identifier
                | LexemeKind::Parameter
                | LexemeKind::CloseParen
                | LexemeKind::CloseBracket
                | LexemeKind::Type
        )
    })
}

/// Built-in type names, recognized only in cast positions (after `::` or
/// the `as` keyword) so type words elsewhere remain ordinary identifiers.
struct TypeReader;

impl TokenReader for TypeReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        let in_cast_position = prev.is_some_and(|lexeme| {
            lexeme.matches(LexemeKind::Operator, "::") || lexeme.matches(LexemeKind::Command, "as")
        });
        if !in_cast_position {
            return Ok(None);
        }
        let mut comments = Vec::new();
        match keywords::types().read_keyword(cursor, &mut comments)? {
            Some(phrase) => {
                let mut lexeme = Lexeme::new(LexemeKind::Type, phrase);
                lexeme.comments = comments;
                Ok(Some(lexeme))
            }
            None => Ok(None),
        }
    }
}

/// A regular identifier whose next meaningful character is `(`.
struct FunctionReader;

impl TokenReader for FunctionReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        _prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        let Some(word) = cursor.read_regular_identifier() else {
            return Ok(None);
        };
        let mut probe = cursor.clone();
        probe.read_comments()?;
        if probe.peek() == Some('(') {
            Ok(Some(Lexeme::new(
                LexemeKind::Function,
                word.to_ascii_lowercase(),
            )))
        } else {
            Ok(None)
        }
    }
}

/// Any remaining regular identifier, plus the bare `*` wildcard.
struct IdentifierReader;

impl TokenReader for IdentifierReader {
    fn try_read(
        &self,
        cursor: &mut CharCursor<'_>,
        _prev: Option<&Lexeme>,
    ) -> Result<Option<Lexeme>> {
        if cursor.consume('*') {
            return Ok(Some(Lexeme::new(LexemeKind::Identifier, "*")));
        }
        match cursor.read_regular_identifier() {
            Some(word) => Ok(Some(Lexeme::new(LexemeKind::Identifier, word))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kinds(sql: &str) -> Vec<LexemeKind> {
        tokenize(sql).unwrap().iter().map(|l| l.kind).collect()
    }

    fn values(sql: &str) -> Vec<String> {
        tokenize(sql)
            .unwrap()
            .into_iter()
            .map(|l| l.value)
            .collect()
    }

    #[test]
    fn commands_are_fused_and_lowercased() {
        assert_eq!(
            values("SELECT a FROM t LEFT OUTER JOIN u ON true"),
            vec![
                "select",
                "a",
                "from",
                "t",
                "left outer join",
                "u",
                "on",
                "true"
            ]
        );
    }

    #[test]
    fn identifiers_keep_their_case() {
        let lexemes = tokenize("select OrderId from Orders").unwrap();
        assert_eq!(lexemes[1].value, "OrderId");
        assert_eq!(lexemes[3].value, "Orders");
    }

    #[test]
    fn wildcard_is_an_identifier_but_product_is_an_operator() {
        let lexemes = tokenize("select *, a.*, 2 * 3").unwrap();
        assert!(lexemes[1].matches(LexemeKind::Identifier, "*"));
        assert!(lexemes[5].matches(LexemeKind::Identifier, "*"));
        assert!(lexemes[8].matches(LexemeKind::Operator, "*"));
    }

    #[test]
    fn numbers_cover_radix_decimal_and_exponent_forms() {
        assert_eq!(
            values("select 0xFF, 0b101, 10.5, .5, 1e-3"),
            vec![
                "select", "0xFF", ",", "0b101", ",", "10.5", ",", "0.5", ",", "1e-3"
            ]
        );
    }

    #[test]
    fn signed_number_follows_operators_but_not_values() {
        let lexemes = tokenize("a - 1").unwrap();
        assert!(lexemes[1].matches(LexemeKind::Operator, "-"));
        let lexemes = tokenize("limit -1").unwrap();
        assert!(lexemes[1].matches(LexemeKind::Literal, "-1"));
    }

    #[test]
    fn parameters_strip_their_sigils() {
        let lexemes = tokenize("where a = :id and b = ${limit} and c = ?").unwrap();
        assert!(lexemes[3].matches(LexemeKind::Parameter, "id"));
        assert!(lexemes[7].matches(LexemeKind::Parameter, "limit"));
        assert!(lexemes[11].matches(LexemeKind::Parameter, ""));
    }

    #[test]
    fn double_colon_is_an_operator_not_a_parameter() {
        let lexemes = tokenize("a::int").unwrap();
        assert!(lexemes[1].matches(LexemeKind::Operator, "::"));
        assert!(lexemes[2].matches(LexemeKind::Type, "int"));
    }

    #[test]
    fn empty_braced_parameter_is_malformed() {
        let err = tokenize("where a = ${}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedInput);
    }

    #[test]
    fn string_specifier_stays_adjacent_to_its_literal() {
        let lexemes = tokenize(r"E'a\'b'").unwrap();
        assert!(lexemes[0].matches(LexemeKind::StringSpecifier, "e"));
        assert!(lexemes[1].matches(LexemeKind::Literal, r"'a\'b'"));
    }

    #[test]
    fn function_requires_a_following_paren() {
        let lexemes = tokenize("count (x), count").unwrap();
        assert!(lexemes[0].matches(LexemeKind::Function, "count"));
        assert!(lexemes[5].matches(LexemeKind::Identifier, "count"));
    }

    #[test]
    fn bracket_quoting_is_disabled_after_array() {
        let lexemes = tokenize("array[1, 2]").unwrap();
        assert!(lexemes[0].matches(LexemeKind::Command, "array"));
        assert!(lexemes[1].matches(LexemeKind::OpenBracket, "["));
        let lexemes = tokenize("select [Order Total]").unwrap();
        assert!(lexemes[1].matches(LexemeKind::Identifier, "[Order Total]"));
    }

    #[test]
    fn comments_attach_to_the_following_operand_after_separators() {
        let lexemes = tokenize("select a, -- next column\n b").unwrap();
        assert!(lexemes[2].comments.is_empty());
        assert_eq!(lexemes[3].comments, vec!["next column"]);
    }

    #[test]
    fn leading_comments_attach_to_the_first_lexeme() {
        let lexemes = tokenize("/* header */ select 1").unwrap();
        assert_eq!(lexemes[0].comments, vec!["header"]);
    }

    #[test]
    fn semicolon_terminates_tokenization() {
        assert_eq!(values("select 1; select 2"), vec!["select", "1"]);
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = tokenize("select 'abc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedInput);
        assert_eq!(err.position, Some(7));
        assert!(err.context.is_some());
    }
}
