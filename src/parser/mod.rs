use nom::IResult;

use crate::ast::{
    segment::{PropertyChain, Segment},
    Expr, LogicalOperator,
};
use crate::error::{ParseError, ParseErrorKind};

use self::filter::parse_filter;
use self::tokenizer::{tokenize, Token};

pub mod filter;
pub mod slice;
pub mod tokenizer;

type PResult<'a, O> = IResult<&'a str, O>;

/// The deepest a selector may nest, counting both groups and syntax tree levels
pub const MAX_NESTING_DEPTH: usize = 256;

/// An expression along with the height of its syntax tree
type Parsed = (Expr, usize);

/// Parse selector text into a syntax tree
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub fn parse_selector(input: &str) -> Result<Expr, ParseError> {
    Parser::new(tokenize(input)).parse()
}

/// Recursive descent over a token stream, with one token of lookahead
///
/// Both the recursion and the height of the tree being built are bounded by
/// [`MAX_NESTING_DEPTH`].
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Expr, ParseError> {
        let (expr, _) = self.parse_logical()?;
        if self.pos < self.tokens.len() {
            return Err(self.error(ParseErrorKind::UnexpectedToken));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.pos)
    }

    fn check_height(&self, height: usize) -> Result<usize, ParseError> {
        if height > MAX_NESTING_DEPTH {
            return Err(self.error(ParseErrorKind::NestingTooDeep));
        }
        Ok(height)
    }

    fn join(
        &self,
        operator: LogicalOperator,
        left: Parsed,
        right: Parsed,
    ) -> Result<Parsed, ParseError> {
        let height = self.check_height(left.1.max(right.1) + 1)?;
        let expr = Expr::Logical {
            operator,
            left: Box::new(left.0),
            right: Box::new(right.0),
        };
        Ok((expr, height))
    }

    /// Parse operands joined by `&` and `|`
    ///
    /// All `&` are folded first, left to right, then the remaining `|`, so `&` binds tighter
    /// and both are left-associative.
    fn parse_logical(&mut self) -> Result<Parsed, ParseError> {
        let mut operands = vec![self.parse_unary()?];
        let mut operators = Vec::new();
        loop {
            let operator = match self.peek() {
                Some(Token::And) => LogicalOperator::And,
                Some(Token::Or) => LogicalOperator::Or,
                _ => break,
            };
            self.pos += 1;
            operators.push(operator);
            operands.push(self.parse_unary()?);
        }

        let mut i = 0;
        while i < operators.len() {
            if operators[i] == LogicalOperator::And {
                let right = operands.remove(i + 1);
                let left = operands.remove(i);
                operands.insert(i, self.join(LogicalOperator::And, left, right)?);
                operators.remove(i);
            } else {
                i += 1;
            }
        }

        let mut operands = operands.into_iter();
        let mut expr = operands
            .next()
            .unwrap_or_else(|| (Expr::Chain(PropertyChain::default()), 1));
        for right in operands {
            expr = self.join(LogicalOperator::Or, expr, right)?;
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Parsed, ParseError> {
        if !matches!(self.peek(), Some(Token::Not | Token::LeftParen)) {
            return self.parse_chain().map(|chain| (Expr::Chain(chain), 1));
        }
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(ParseErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        let parsed = self.parse_nested();
        self.depth -= 1;
        parsed
    }

    /// Parse a negation or a group
    fn parse_nested(&mut self) -> Result<Parsed, ParseError> {
        if self.match_token(&Token::Not) {
            let (expr, height) = self.parse_unary()?;
            let height = self.check_height(height + 1)?;
            return Ok((Expr::Not(Box::new(expr)), height));
        }
        let open = self.pos;
        self.pos += 1;
        let parsed = self.parse_logical()?;
        if !self.match_token(&Token::RightParen) {
            return Err(ParseError::new(ParseErrorKind::UnclosedGroup, open));
        }
        Ok(parsed)
    }

    fn parse_chain(&mut self) -> Result<PropertyChain, ParseError> {
        let mut segments: Vec<Segment> = Vec::new();
        while let Some(token) = self.peek() {
            match token {
                Token::Property(_) | Token::Wildcard | Token::DeepWildcard => {
                    let segment = match self.advance() {
                        Some(Token::Property(name)) => Segment::property(name),
                        Some(Token::Wildcard) => Segment::Wildcard { filter: None },
                        _ => Segment::DeepWildcard { filter: None },
                    };
                    segments.push(segment);
                }
                Token::Filter(text) => {
                    let filter = parse_filter(text);
                    let Some(segment) = segments.last_mut() else {
                        return Err(self.error(ParseErrorKind::FilterWithoutSegment));
                    };
                    *segment.filter_mut() = Some(filter);
                    self.pos += 1;
                }
                Token::Slice(s) => {
                    let s = *s;
                    match segments.last_mut() {
                        Some(Segment::Property { slice, .. }) => *slice = Some(s),
                        _ => return Err(self.error(ParseErrorKind::SliceWithoutProperty)),
                    }
                    self.pos += 1;
                }
                Token::Dot => self.pos += 1,
                _ => break,
            }
        }
        Ok(PropertyChain { segments })
    }
}
