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

//! The flat print-token stream the tree traversal produces.

/// The semantic class of a print token; drives spacing and keyword-case
/// decisions in the line printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintTokenType {
    Keyword,
    FunctionName,
    TypeName,
    Identifier,
    Literal,
    Parameter,
    StringSpecifier,
    Operator,
    /// A prefix operator; symbolic ones (`-`, `~`) attach to their operand
    /// without a space.
    Prefix,
    Comma,
    Dot,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comment,
}

/// The clause a print token belongs to. Containers named in the print
/// options' indent set get an indent level and a line break on entry.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum Container {
    None,
    SelectClause,
    FromClause,
    WhereClause,
    JoinClause,
    GroupByClause,
    HavingClause,
    WindowClause,
    OrderByClause,
    PartitionByClause,
    LimitClause,
    OffsetClause,
    FetchClause,
    ForClause,
    Values,
    CommonTable,
    SubQuerySource,
    WindowFrameExpression,
    BinarySelectQueryOperator,
    InsertClause,
    UpdateClause,
    DeleteClause,
    SetClause,
    UsingClause,
    ReturningClause,
}

/// One printable token with its semantic type and containing clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintToken {
    pub text: String,
    pub token_type: PrintTokenType,
    pub container: Container,
}

/// The stream element: a token, or an append-newline event carrying the
/// indent level of the line it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintItem {
    Token(PrintToken),
    Newline(usize),
}
