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

//! The line printer: turns the print-token stream into text.
//!
//! One physical line is emitted per append-newline event, indented to the
//! event's level. In single-line mode (`newline = " "`) newline events
//! collapse to one space. Token spacing follows SQL conventions: nothing
//! after `(` or `.`, nothing before `)`, `,`, or `.`, no gap between a
//! function or type name and its argument list, and `::` binds tight.

use crate::printer::token::{PrintItem, PrintToken, PrintTokenType};
use crate::printer::{KeywordCase, Newline, SqlPrintOptions};

pub(crate) fn render(items: &[PrintItem], options: &SqlPrintOptions) -> String {
    let mut out = String::new();
    let mut pending: Option<usize> = None;
    let mut prev: Option<&PrintToken> = None;
    for item in items {
        match item {
            PrintItem::Newline(level) => {
                if !out.is_empty() {
                    pending = Some(*level);
                }
            }
            PrintItem::Token(token) => {
                match pending.take() {
                    // In single-line mode newline events degrade to the
                    // ordinary spacing rules.
                    Some(_) if options.newline == Newline::Space => {
                        if prev.is_some_and(|prev| needs_space(prev, token)) {
                            out.push(' ');
                        }
                    }
                    Some(level) => {
                        out.push_str(options.newline.as_str());
                        out.push_str(&options.indent_string(level));
                    }
                    None => {
                        if prev.is_some_and(|prev| needs_space(prev, token)) {
                            out.push(' ');
                        }
                    }
                }
                out.push_str(&styled(token, options));
                prev = Some(token);
            }
        }
    }
    out.trim_end().to_string()
}

fn needs_space(prev: &PrintToken, current: &PrintToken) -> bool {
    use PrintTokenType::*;

    if prev.text == "::" || current.text == "::" {
        return false;
    }
    match prev.token_type {
        OpenParen | OpenBracket | Dot | StringSpecifier => return false,
        Prefix => {
            return prev
                .text
                .chars()
                .last()
                .is_some_and(|ch| ch.is_ascii_alphanumeric())
        }
        _ => {}
    }
    match current.token_type {
        CloseParen | CloseBracket | Comma | Dot | OpenBracket => false,
        OpenParen => !matches!(prev.token_type, FunctionName | TypeName),
        _ => true,
    }
}

fn styled(token: &PrintToken, options: &SqlPrintOptions) -> String {
    let wordy_operator = token.token_type == PrintTokenType::Operator
        && token
            .text
            .chars()
            .all(|ch| ch.is_ascii_alphabetic() || ch == ' ');
    if token.token_type == PrintTokenType::Keyword || wordy_operator {
        match options.keyword_case {
            KeywordCase::None => token.text.clone(),
            KeywordCase::Upper => token.text.to_ascii_uppercase(),
            KeywordCase::Lower => token.text.to_ascii_lowercase(),
        }
    } else {
        token.text.clone()
    }
}
