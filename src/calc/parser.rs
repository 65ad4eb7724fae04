use crate::calc::{CalcError, Token};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// A parsed calculator expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Evaluates the tree. Division by zero and non-finite intermediate results are errors.
    pub fn eval(&self) -> Result<f64, CalcError> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Neg(inner) => -inner.eval()?,
            Expr::Binary { op, lhs, rhs } => {
                let (l, r) = (lhs.eval()?, rhs.eval()?);
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div if r == 0.0 => return Err(CalcError::DivisionByZero),
                    BinaryOp::Div => l / r,
                }
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CalcError::NonFinite)
        }
    }
}

/// How deeply parentheses, signs and chained operators may nest in one expression.
pub const MAX_DEPTH: usize = 256;

/// Parses tokens produced by [`tokenize`](crate::calc::tokenize).
///
/// ```text
/// expr   := term (('+' | '-') term)*
/// term   := factor (('*' | '/') factor)*
/// factor := ('+' | '-') factor | number | '(' expr ')'
/// ```
///
/// Input nested deeper than [`MAX_DEPTH`] fails with [`CalcError::TooDeep`].
pub fn parse(tokens: &[(Token, usize)]) -> Result<Expr, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let (expr, _) = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some((token, position)) => Err(CalcError::UnexpectedToken { token, position }),
    }
}

/// A subtree and its height.
type Node = (Expr, usize);

fn checked_height(height: usize) -> Result<usize, CalcError> {
    if height > MAX_DEPTH {
        Err(CalcError::TooDeep)
    } else {
        Ok(height)
    }
}

struct Parser<'a> {
    tokens: &'a [(Token, usize)],
    pos: usize,
    // Current recursion depth through `nested`.
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<(Token, usize)> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<(Token, usize), CalcError> {
        let next = self.peek().ok_or(CalcError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(next)
    }

    fn nested(
        &mut self,
        rule: fn(&mut Self) -> Result<Node, CalcError>,
    ) -> Result<Node, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        self.depth += 1;
        let node = rule(self);
        self.depth -= 1;
        node
    }

    fn expr(&mut self) -> Result<Node, CalcError> {
        let (mut lhs, mut height) = self.term()?;
        while let Some((token, _)) = self.peek() {
            let op = match token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let (rhs, rhs_height) = self.term()?;
            height = checked_height(height.max(rhs_height) + 1)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok((lhs, height))
    }

    fn term(&mut self) -> Result<Node, CalcError> {
        let (mut lhs, mut height) = self.factor()?;
        while let Some((token, _)) = self.peek() {
            let op = match token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let (rhs, rhs_height) = self.factor()?;
            height = checked_height(height.max(rhs_height) + 1)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok((lhs, height))
    }

    fn factor(&mut self) -> Result<Node, CalcError> {
        match self.next()? {
            (Token::Number(n), _) => Ok((Expr::Number(n), 1)),
            (Token::Minus, _) => {
                let (inner, height) = self.nested(Self::factor)?;
                Ok((Expr::Neg(Box::new(inner)), checked_height(height + 1)?))
            }
            (Token::Plus, _) => self.nested(Self::factor),
            (Token::LParen, _) => {
                let inner = self.nested(Self::expr)?;
                match self.next()? {
                    (Token::RParen, _) => Ok(inner),
                    (token, position) => Err(CalcError::UnexpectedToken { token, position }),
                }
            }
            (token, position) => Err(CalcError::UnexpectedToken { token, position }),
        }
    }
}
