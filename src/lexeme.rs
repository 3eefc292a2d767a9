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

//! The token model shared by the tokenizer and the parsers.

use core::fmt;

/// The closed set of lexeme classes produced by the tokenizer.
///
/// Each kind maps to a single bit so parsers can accept several kinds at
/// once through a [`KindSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum LexemeKind {
    /// Numbers, quoted strings, and keyword literals (`null`, `true`, ...).
    Literal,
    /// Symbolic operators (`+`, `::`, `||`) and logical keyword operators
    /// (`and`, `not in`, `is distinct from`, ...).
    Operator,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Dot,
    /// Plain or quoted identifiers, plus the bare `*` wildcard.
    Identifier,
    /// Reserved (possibly multi-word) command keywords: `select`,
    /// `group by`, `left outer join`, ...
    Command,
    /// A placeholder such as `:name`, `@name`, `$name`, `${name}`, or `?`.
    /// The value holds the name stripped of its sigil.
    Parameter,
    /// An identifier immediately followed by `(`.
    Function,
    /// A string literal prefix: `e`, `x`, `b`, or `u&`.
    StringSpecifier,
    /// A type name in a cast position, e.g. `numeric` in `x::numeric(10, 2)`.
    Type,
}

impl LexemeKind {
    pub const fn mask(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for LexemeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LexemeKind::Literal => "literal",
            LexemeKind::Operator => "operator",
            LexemeKind::OpenParen => "open paren",
            LexemeKind::CloseParen => "close paren",
            LexemeKind::OpenBracket => "open bracket",
            LexemeKind::CloseBracket => "close bracket",
            LexemeKind::Comma => "comma",
            LexemeKind::Dot => "dot",
            LexemeKind::Identifier => "identifier",
            LexemeKind::Command => "command",
            LexemeKind::Parameter => "parameter",
            LexemeKind::Function => "function",
            LexemeKind::StringSpecifier => "string specifier",
            LexemeKind::Type => "type",
        };
        f.write_str(name)
    }
}

/// A bit-testable set of [`LexemeKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSet(u16);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);

    pub const fn of(kinds: &[LexemeKind]) -> KindSet {
        let mut bits = 0u16;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].mask();
            i += 1;
        }
        KindSet(bits)
    }

    pub const fn single(kind: LexemeKind) -> KindSet {
        KindSet(kind.mask())
    }

    pub const fn contains(self, kind: LexemeKind) -> bool {
        self.0 & kind.mask() != 0
    }

    pub const fn union(self, other: KindSet) -> KindSet {
        KindSet(self.0 | other.0)
    }
}

/// A single token with a kind tag, canonical text, and attached comments.
///
/// Command, operator, function, string-specifier, and type values are
/// canonicalized to lower case at lex time; literal and identifier values
/// preserve their original spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub value: String,
    /// Comments owned by this lexeme, in source order.
    pub comments: Vec<String>,
}

impl Lexeme {
    pub fn new<S>(kind: LexemeKind, value: S) -> Lexeme
    where
        S: Into<String>,
    {
        Lexeme {
            kind,
            value: value.into(),
            comments: Vec::new(),
        }
    }

    pub fn is(&self, kind: LexemeKind) -> bool {
        self.kind == kind
    }

    pub fn is_in(&self, set: KindSet) -> bool {
        set.contains(self.kind)
    }

    /// Tests kind and canonical value at once. The comparison is exact:
    /// command/operator values are already lower-cased at lex time.
    pub fn matches(&self, kind: LexemeKind, value: &str) -> bool {
        self.kind == kind && self.value == value
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_set_membership() {
        const VALUEISH: KindSet = KindSet::of(&[
            LexemeKind::Literal,
            LexemeKind::Identifier,
            LexemeKind::Parameter,
        ]);
        assert!(VALUEISH.contains(LexemeKind::Literal));
        assert!(VALUEISH.contains(LexemeKind::Parameter));
        assert!(!VALUEISH.contains(LexemeKind::Operator));
        assert!(!KindSet::EMPTY.contains(LexemeKind::Literal));
    }

    #[test]
    fn lexeme_matches_canonical_value() {
        let lexeme = Lexeme::new(LexemeKind::Command, "group by");
        assert!(lexeme.matches(LexemeKind::Command, "group by"));
        assert!(!lexeme.matches(LexemeKind::Command, "order by"));
        assert!(!lexeme.matches(LexemeKind::Operator, "group by"));
    }
}
