//! Source-to-source operator rewriting for modifier functions.
//!
//! Turns every arithmetic operator expression into an explicit method call
//! on the left operand (`a + b` → `a.add(b)`, `x *= y` → `x = x.mult(y)`),
//! producing source that only relies on the method-call core API. The
//! rewrite is purely syntactic and type-agnostic; plain assignment and
//! non-arithmetic operators pass through untouched.

use proc_macro2::Span;
use quote::ToTokens;
use syn::fold::{self, Fold};
use syn::{BinOp, Expr, ExprParen, Ident, parse_quote};
use thiserror::Error;

/// The input could not be parsed as a function or closure.
#[derive(Clone, Debug, Error)]
#[error("parse error at {line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl From<syn::Error> for ParseError {
    fn from(err: syn::Error) -> Self {
        let start = err.span().start();
        Self {
            line: start.line,
            column: start.column,
            message: err.to_string(),
        }
    }
}

/// Rewrites the source text of a function (`fn` item or closure) so that
/// every binary `a OP b` with `OP ∈ {+, -, *, /, %}` becomes `a.method(b)`
/// and every compound assignment `x OP= y` becomes `x = x.method(y)`.
///
/// Grouping is preserved by the parsed tree: `a - b * c` rewrites to
/// `a.sub(b.mult(c))`.
pub fn rewrite_function(source: &str) -> Result<String, ParseError> {
    match syn::parse_str::<syn::ItemFn>(source) {
        Ok(function) => Ok(Rewriter.fold_item_fn(function).into_token_stream().to_string()),
        Err(item_err) => match syn::parse_str::<syn::ExprClosure>(source) {
            Ok(closure) => Ok(Rewriter.fold_expr_closure(closure).into_token_stream().to_string()),
            Err(closure_err) => {
                let looks_like_item = source.trim_start().starts_with("fn") || source.trim_start().starts_with("pub");
                Err(if looks_like_item { item_err } else { closure_err }.into())
            }
        },
    }
}

struct Rewriter;

fn method_for(op: BinOp) -> Option<&'static str> {
    match op {
        BinOp::Add(_) | BinOp::AddAssign(_) => Some("add"),
        BinOp::Sub(_) | BinOp::SubAssign(_) => Some("sub"),
        BinOp::Mul(_) | BinOp::MulAssign(_) => Some("mult"),
        BinOp::Div(_) | BinOp::DivAssign(_) => Some("div"),
        BinOp::Rem(_) | BinOp::RemAssign(_) => Some("modulo"),
        _ => None,
    }
}

fn is_compound(op: BinOp) -> bool {
    matches!(
        op,
        BinOp::AddAssign(_) | BinOp::SubAssign(_) | BinOp::MulAssign(_) | BinOp::DivAssign(_) | BinOp::RemAssign(_)
    )
}

/// Wraps receivers that would not survive a `.method(..)` trailer, so
/// `-a + b` becomes `(-a).add(b)` and `2 + b` becomes `(2).add(b)`.
fn receiver(expr: Expr) -> Expr {
    match expr {
        Expr::Path(_)
        | Expr::MethodCall(_)
        | Expr::Call(_)
        | Expr::Field(_)
        | Expr::Index(_)
        | Expr::Paren(_) => expr,
        other => Expr::Paren(ExprParen {
            attrs: Vec::new(),
            paren_token: Default::default(),
            expr: Box::new(other),
        }),
    }
}

impl Fold for Rewriter {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        let expr = fold::fold_expr(self, expr);

        let Expr::Binary(binary) = expr else {
            return expr;
        };
        let Some(method) = method_for(binary.op) else {
            return Expr::Binary(binary);
        };

        let method = Ident::new(method, Span::call_site());
        let right = &binary.right;

        if is_compound(binary.op) {
            let place = &binary.left;
            let left = receiver((*binary.left).clone());
            parse_quote!(#place = #left.#method(#right))
        } else {
            let left = receiver(*binary.left);
            parse_quote!(#left.#method(#right))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> String {
        source.parse::<proc_macro2::TokenStream>().unwrap().to_string()
    }

    fn check(source: &str, expected: &str) {
        assert_eq!(tokens(&rewrite_function(source).unwrap()), tokens(expected));
    }

    #[test]
    fn binary_operators_become_method_calls() {
        check(
            "fn f(a: Expr, b: Expr) -> Expr { a + b }",
            "fn f(a: Expr, b: Expr) -> Expr { a.add(b) }",
        );
        check(
            "fn f(a: Expr, b: Expr) -> Expr { a % b }",
            "fn f(a: Expr, b: Expr) -> Expr { a.modulo(b) }",
        );
    }

    #[test]
    fn precedence_is_preserved() {
        check(
            "fn f(a: Expr, b: Expr, c: Expr) -> Expr { a - b * c }",
            "fn f(a: Expr, b: Expr, c: Expr) -> Expr { a.sub(b.mult(c)) }",
        );
        check(
            "fn f(a: Expr, b: Expr, c: Expr) -> Expr { (a - b) * c }",
            "fn f(a: Expr, b: Expr, c: Expr) -> Expr { (a.sub(b)).mult(c) }",
        );
    }

    #[test]
    fn compound_assignment_expands() {
        check(
            "fn f(mut a: Expr, b: Expr) { a += b; }",
            "fn f(mut a: Expr, b: Expr) { a = a.add(b); }",
        );
        check(
            "fn f(mut a: Expr, b: Expr) { a *= b + b; }",
            "fn f(mut a: Expr, b: Expr) { a = a.mult(b.add(b)); }",
        );
    }

    #[test]
    fn plain_assignment_is_untouched() {
        check(
            "fn f(mut a: Expr, b: Expr, c: Expr) { a = b + c; }",
            "fn f(mut a: Expr, b: Expr, c: Expr) { a = b.add(c); }",
        );
    }

    #[test]
    fn non_arithmetic_operators_pass_through() {
        check(
            "fn f(a: i32, b: i32) -> bool { a + b < a * b }",
            "fn f(a: i32, b: i32) -> bool { a.add(b) < a.mult(b) }",
        );
    }

    #[test]
    fn closures_are_accepted() {
        check("|pos| pos + vec3(0.0, 1.0, 0.0)", "|pos| pos.add(vec3(0.0, 1.0, 0.0))");
    }

    #[test]
    fn awkward_receivers_are_parenthesized() {
        check(
            "fn f(a: Expr, b: Expr) -> Expr { -a + b }",
            "fn f(a: Expr, b: Expr) -> Expr { (-a).add(b) }",
        );
    }

    #[test]
    fn malformed_input_reports_a_location() {
        let err = rewrite_function("fn broken( {").unwrap_err();
        assert!(err.line >= 1);
        assert!(!err.message.is_empty());
    }
}
