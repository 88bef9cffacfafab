//! Expression parser used by the generic `set_str`.
//!
//! Grammar, with the usual precedence:
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := '-' unary | '+' unary | power
//! power := atom ('^' '-'? integer)?
//! atom  := integer | identifier | '(' expr ')'
//! ```
//!
//! Identifiers resolve against the generator names of the context (nested
//! generators included), then `pi` and `i`. Every value is built with the
//! context's own operations, so the same parser serves every ring. The terms
//! of a sum are combined pairwise, which keeps intermediate results of long
//! polynomial sums small.

use dashu::integer::IBig;
use logos::Logos;

use crate::context::Context;
use crate::elem::Elem;
use crate::status::{GrError, GrResult};

#[derive(Logos, Clone, Debug, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r]+")]
enum Token {
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<IBig>().ok())]
    Int(IBig),
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

fn tokenize(s: &str) -> GrResult<Vec<Token>> {
    let mut lex = Token::lexer(s);
    let mut tokens = Vec::new();
    while let Some(res) = lex.next() {
        match res {
            Ok(token) => tokens.push(token),
            Err(()) => {
                log::trace!("unexpected input {:?} at {}", lex.slice(), lex.span().start);
                return Err(GrError::Unable);
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    ctx: &'a Context,
    generators: Vec<(String, Elem)>,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, ctx: &'a Context) -> Self {
        let names = ctx.generator_names();
        let mut generators = Vec::new();
        if !names.is_empty() {
            let mut gens = Vec::new();
            if ctx.gens_recursive(&mut gens).is_ok() && gens.len() == names.len() {
                generators = names.into_iter().zip(gens).collect();
            }
        }
        Self {
            tokens,
            pos: 0,
            ctx,
            generators,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> GrResult<Elem> {
        let mut terms = vec![self.term()?];
        loop {
            if self.eat(&Token::Plus) {
                terms.push(self.term()?);
            } else if self.eat(&Token::Minus) {
                let t = self.term()?;
                let mut neg = self.ctx.init();
                self.ctx.neg(&mut neg, &t)?;
                self.ctx.clear(t);
                terms.push(neg);
            } else {
                break;
            }
        }
        self.balanced_sum(terms)
    }

    fn balanced_sum(&self, mut terms: Vec<Elem>) -> GrResult<Elem> {
        while terms.len() > 1 {
            let mut next = Vec::with_capacity((terms.len() + 1) / 2);
            let mut it = terms.into_iter();
            while let Some(a) = it.next() {
                match it.next() {
                    Some(b) => {
                        let mut s = self.ctx.init();
                        self.ctx.add(&mut s, &a, &b)?;
                        self.ctx.clear(a);
                        self.ctx.clear(b);
                        next.push(s);
                    }
                    None => next.push(a),
                }
            }
            terms = next;
        }
        terms.pop().ok_or(GrError::Unable)
    }

    fn term(&mut self) -> GrResult<Elem> {
        let mut acc = self.unary()?;
        loop {
            let op: fn(&Context, &mut Elem, &Elem, &Elem) -> GrResult = if self.eat(&Token::Star) {
                Context::mul
            } else if self.eat(&Token::Slash) {
                Context::div
            } else {
                break;
            };
            let rhs = self.unary()?;
            let mut t = self.ctx.init();
            op(self.ctx, &mut t, &acc, &rhs)?;
            self.ctx.clear(rhs);
            self.ctx.swap(&mut acc, &mut t);
            self.ctx.clear(t);
        }
        Ok(acc)
    }

    fn unary(&mut self) -> GrResult<Elem> {
        if self.eat(&Token::Minus) {
            let x = self.unary()?;
            let mut res = self.ctx.init();
            self.ctx.neg(&mut res, &x)?;
            self.ctx.clear(x);
            return Ok(res);
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> GrResult<Elem> {
        let base = self.atom()?;
        if !self.eat(&Token::Caret) {
            return Ok(base);
        }

        let negative = self.eat(&Token::Minus);
        let e = match self.peek() {
            Some(Token::Int(e)) => e.clone(),
            _ => return Err(GrError::Unable),
        };
        self.pos += 1;
        let e = if negative { -e } else { e };

        let mut res = self.ctx.init();
        self.ctx.pow_integer(&mut res, &base, &e)?;
        self.ctx.clear(base);
        Ok(res)
    }

    fn atom(&mut self) -> GrResult<Elem> {
        let Some(token) = self.peek().cloned() else {
            return Err(GrError::Unable);
        };
        self.pos += 1;

        let mut res = self.ctx.init();
        match token {
            Token::Int(n) => self.ctx.set_integer(&mut res, &n)?,
            Token::Ident(name) => {
                // Later names belong to outer rings and shadow inner ones.
                if let Some((_, g)) = self.generators.iter().rev().find(|(n, _)| *n == name) {
                    self.ctx.set(&mut res, g)?;
                } else if name == "pi" {
                    self.ctx.pi(&mut res)?;
                } else if name == "i" || name == "I" {
                    self.ctx.i(&mut res)?;
                } else {
                    log::trace!("unknown identifier {name:?}");
                    return Err(GrError::Unable);
                }
            }
            Token::LParen => {
                let inner = self.expr()?;
                if !self.eat(&Token::RParen) {
                    return Err(GrError::Unable);
                }
                self.ctx.clear(res);
                return Ok(inner);
            }
            _ => return Err(GrError::Unable),
        }
        Ok(res)
    }
}

/// Parses `s` into `res` using only the operations of `ctx`.
pub(crate) fn set_str_balance_additions(res: &mut Elem, s: &str, ctx: &Context) -> GrResult {
    let tokens = tokenize(s)?;
    if tokens.is_empty() {
        return Err(GrError::Unable);
    }

    let mut parser = Parser::new(tokens, ctx);
    let mut value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        log::trace!("trailing input after position {}", parser.pos);
        return Err(GrError::Unable);
    }

    ctx.swap(res, &mut value);
    ctx.clear(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::truth::Truth;

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("12*x^-3").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Int(IBig::from(12)),
                Token::Star,
                Token::Ident("x".into()),
                Token::Caret,
                Token::Minus,
                Token::Int(IBig::from(3)),
            ]
        );
        assert_eq!(tokenize("2 $ 3"), Err(GrError::Unable));
        assert_eq!(
            tokenize(" y_1\t( 007 )"),
            Ok(vec![
                Token::Ident("y_1".into()),
                Token::LParen,
                Token::Int(IBig::from(7)),
                Token::RParen,
            ])
        );
    }

    #[test]
    fn test_precedence() {
        let zz = Context::integers();
        let v = zz.parse("2 + 3*4^2 - (1 - 5)").unwrap();
        assert_eq!(zz.equal(&v, &zz.elem_i64(54).unwrap()), Truth::True);

        let v = zz.parse("-2^2").unwrap();
        assert_eq!(zz.equal(&v, &zz.elem_i64(-4).unwrap()), Truth::True);
    }

    #[test]
    fn test_malformed_input() {
        let qq = Context::rationals();
        for s in ["", "1 +", "(2", "2)", "3 ^ x", "foo"] {
            assert_eq!(qq.parse(s), Err(GrError::Unable), "{s:?}");
        }
    }

    #[test]
    fn test_nested_generators() {
        let qq = Arc::new(Context::rationals());
        let mut qy = Context::polynomial(qq);
        qy.set_gen_name("y").unwrap();
        let qyx = Context::polynomial(Arc::new(qy));

        let p = qyx.parse("x*y + y^2").unwrap();
        let q = qyx.parse("y*(x + y)").unwrap();
        assert_eq!(qyx.equal(&p, &q), Truth::True);
    }

    #[test]
    fn test_rational_division() {
        let qq = Context::rationals();
        let v = qq.parse("1/2 + 1/3").unwrap();
        assert_eq!(qq.to_string_of(&v).unwrap(), "5/6");
    }
}
