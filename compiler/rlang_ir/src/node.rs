//! Syntax node kinds, one per grammar production.

use std::fmt;

/// Kind tag for a syntax node.
///
/// One variant per grammar production of the R surface grammar. Operator
/// tokens are wrapped in their own operator nodes (`AssignOperator`,
/// `PlusminusOperator`, ...) so that an operator child of an
/// `OperatorExpression` is itself a typed node.
///
/// The set is closed: the parser can only ever build these kinds, so an
/// "unknown node kind" cannot occur at runtime.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    /// Whole-input node; always the tree root.
    Root,
    /// Recovery node wrapping skipped or unparsable tokens.
    Error,

    // Statement forms
    IfStatement,
    WhileStatement,
    ForStatement,
    RepeatStatement,
    BreakStatement,
    NextStatement,
    /// `<-`, `<<-`, `:=`, `->`, `->>` and `=` assignment.
    AssignmentStatement,

    // Expression forms
    BlockExpression,
    ParenthesizedExpression,
    FunctionExpression,
    CallExpression,
    SubscriptionExpression,
    MemberExpression,
    /// Binary operator application that has no more specific form.
    OperatorExpression,
    TildeExpression,
    UnaryTildeExpression,
    UnaryNotExpression,
    UnaryPlusminusExpression,
    NamespaceAccessExpression,
    HelpExpression,
    IdentifierExpression,
    /// Explicit empty slot: `x[, 1]`, `f(,)`, `x =`.
    EmptyExpression,

    // Literal forms
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NaLiteral,
    NullLiteral,
    /// `Inf` / `NaN`.
    BoundaryLiteral,

    // Operator wrappers
    AssignOperator,
    TildeOperator,
    OrOperator,
    AndOperator,
    NotOperator,
    CompareOperator,
    PlusminusOperator,
    MuldivOperator,
    InfixOperator,
    ColonOperator,
    ExpOperator,
    ListSubsetOperator,
    AtOperator,

    // List forms
    ArgumentList,
    NamedArgument,
    Parameter,
    ParameterList,
}

impl NodeKind {
    /// Check if this kind is a literal form.
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::StringLiteral
                | NodeKind::NumericLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::NaLiteral
                | NodeKind::NullLiteral
                | NodeKind::BoundaryLiteral
        )
    }

    /// Check if this kind is an operator wrapper node.
    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            NodeKind::AssignOperator
                | NodeKind::TildeOperator
                | NodeKind::OrOperator
                | NodeKind::AndOperator
                | NodeKind::NotOperator
                | NodeKind::CompareOperator
                | NodeKind::PlusminusOperator
                | NodeKind::MuldivOperator
                | NodeKind::InfixOperator
                | NodeKind::ColonOperator
                | NodeKind::ExpOperator
                | NodeKind::ListSubsetOperator
                | NodeKind::AtOperator
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_literal() {
        assert!(NodeKind::NaLiteral.is_literal());
        assert!(NodeKind::BoundaryLiteral.is_literal());
        assert!(!NodeKind::IfStatement.is_literal());
        assert!(!NodeKind::AssignOperator.is_literal());
    }

    #[test]
    fn test_is_operator() {
        assert!(NodeKind::PlusminusOperator.is_operator());
        assert!(NodeKind::AtOperator.is_operator());
        assert!(!NodeKind::OperatorExpression.is_operator());
        assert!(!NodeKind::EmptyExpression.is_operator());
    }
}
