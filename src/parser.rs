use chumsky::error::Simple;
use chumsky::prelude::*;

use plspm_weights::{PlsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOp {
    /// `=~`: reflective block.
    Reflective,
    /// `<~`: formative block.
    Formative,
    /// `~`: structural regression.
    Regress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Scale keyword written as `ord*x1`, if any.
    pub scale: Option<String>,
    pub var: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub lhs: String,
    pub op: ModelOp,
    pub terms: Vec<Term>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSpec {
    pub lines: Vec<Line>,
}

type Extra<'a> = chumsky::extra::Err<Simple<'a, char>>;

/// Variable names: a letter, `_` or `.` followed by alphanumerics, `_` or `.`.
fn name_parser<'a>() -> impl Parser<'a, &'a str, String, Extra<'a>> + Clone {
    let head = any::<&'a str, Extra<'a>>()
        .filter(|c: &char| c.is_ascii_alphabetic() || matches!(*c, '_' | '.'));
    let tail = any::<&'a str, Extra<'a>>()
        .filter(|c: &char| c.is_ascii_alphanumeric() || matches!(*c, '_' | '.'))
        .repeated();
    head.then(tail).to_slice().map(str::to_string).padded()
}

/// Parses PLS path model syntax.
///
/// Each statement is one of
/// - `LV =~ x1 + x2`: reflective (mode A) block,
/// - `LV <~ x1 + x2`: formative (mode B) block,
/// - `Y ~ X1 + X2`: structural paths `X1 -> Y` and `X2 -> Y`.
///
/// Block indicators may carry a measurement scale, as in `ord*x1`. A block
/// whose indicators are all latent variables declares a higher-order
/// construct. Statements are split on newlines and `;`; `#` and `//` start
/// comments.
pub fn parse_model(model: &str) -> Result<ModelSpec> {
    let lines = model
        .lines()
        .flat_map(|raw| strip_comments(raw).split(';'))
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(parse_statement)
        .collect::<Result<Vec<_>>>()?;
    Ok(ModelSpec { lines })
}

fn strip_comments(line: &str) -> &str {
    let end = [line.find('#'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

fn parse_statement(line: &str) -> Result<Line> {
    let ident = name_parser();

    let term = ident
        .clone()
        .then_ignore(just('*').padded())
        .then(ident.clone())
        .map(|(scale, var)| Term {
            scale: Some(scale),
            var,
        })
        .or(ident.clone().map(|var| Term { scale: None, var }));

    let terms = term
        .separated_by(just('+').padded())
        .at_least(1)
        .collect::<Vec<_>>();

    let op = choice((
        just("=~").to(ModelOp::Reflective),
        just("<~").to(ModelOp::Formative),
        just('~').to(ModelOp::Regress),
    ))
    .padded();

    let parser = ident
        .then(op)
        .then(terms)
        .map(|((lhs, op), terms)| Line { lhs, op, terms })
        .then_ignore(end());

    parser.parse(line).into_result().map_err(|errs| {
        let reasons = errs
            .iter()
            .map(|e| match e.found() {
                Some(c) => format!("unexpected {c:?} at {:?}", e.span()),
                None => format!("unexpected end of statement at {:?}", e.span()),
            })
            .collect::<Vec<_>>()
            .join("; ");
        PlsError::Parse(format!("invalid model statement `{line}`: {reasons}"))
    })
}
