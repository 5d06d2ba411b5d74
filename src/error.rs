/// Error type for selector parsing errors
#[derive(Debug, thiserror::Error)]
#[error("{err}")]
pub struct ParseError {
    err: Box<ErrorImpl>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: usize) -> Self {
        #[cfg(feature = "trace")]
        tracing::trace!(%kind, position, "selector parse error");
        Self {
            err: Box::new(ErrorImpl { position, kind }),
        }
    }

    /// Get the 0-indexed position, in tokens, at which the error was detected
    pub fn position(&self) -> usize {
        self.err.position
    }

    /// Get the kind of error
    pub fn kind(&self) -> ParseErrorKind {
        self.err.kind
    }
}

#[derive(Debug, thiserror::Error)]
#[error("at token {position}, {kind}")]
struct ErrorImpl {
    position: usize,
    kind: ParseErrorKind,
}

/// The structural problems a selector can have
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum ParseErrorKind {
    /// A bracketed filter appears before any segment of its chain
    #[error("filter has no preceding segment")]
    FilterWithoutSegment,
    /// A bracketed slice does not directly follow a property
    #[error("slice has no preceding property")]
    SliceWithoutProperty,
    /// A `(` is never closed
    #[error("expected ')' to close group")]
    UnclosedGroup,
    /// A token that cannot continue the expression before it
    #[error("unexpected token")]
    UnexpectedToken,
    /// Groups, negations or operators nest deeper than [`MAX_NESTING_DEPTH`][crate::MAX_NESTING_DEPTH]
    #[error("selector nests too deeply")]
    NestingTooDeep,
}
