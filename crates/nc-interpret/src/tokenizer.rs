//! Splits one program line into words.
//!
//! The grammar lives in `line.pest`:
//!
//! - words are separated by whitespace, `;` starts a comment that runs to the
//!   end of the line;
//! - an identifier is `[A-Za-z_][A-Za-z0-9_]*`;
//! - `IDENT=VALUE` assigns a number, a double-quoted string (no escapes), an
//!   arithmetic expression over numbers and variables (`R1*2+5`, operators
//!   `+ - * / DIV MOD`, unary minus, parentheses), an increment `IC(expr)`
//!   or a bare `[A-Za-z0-9_.]+` token;
//! - `IDENT(...)` is a call, recorded as written;
//! - a single letter directly followed by a number (`X-1.5`, `G01`, `M3`) is
//!   an address word;
//! - any other identifier on its own is a keyword (`CFC`, `STOPRE`).
//!
//! Address letters and assigned identifiers are upper-cased, so `x10` and
//! `x=20` both address `X`. Concatenated addresses such as `G1X10` are
//! rejected.

use pest::Parser;
use pest::error::{Error, ErrorVariant, LineColLocation};
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use crate::expr::{BinaryOp, Expr};

#[derive(Parser)]
#[grammar = "line.pest"]
struct LineParser;

/// Value part of a [`Word`].
#[derive(Debug, Clone, PartialEq)]
pub enum WordValue {
    /// Numeric value; `text` is the number exactly as written.
    Number { value: f64, text: String },
    Text(String),
    /// Lone identifier after `=`: a variable if one is defined, otherwise
    /// the identifier itself as text.
    Symbol(String),
    Expression(Expr),
    /// `IC(expr)`: added to the current value of the target.
    Increment(Expr),
    /// Bare identifier without a value.
    Keyword,
    /// Parenthesised argument list of a call, including the parentheses.
    Call(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Upper-case address letter or assigned identifier; keywords and calls
    /// keep the identifier as written.
    pub address: String,
    pub value: WordValue,
    /// Whether the word was written as `IDENT=VALUE`.
    pub assignment: bool,
    pub raw: String,
    /// 1-based character column of the first character.
    pub column: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenizedLine {
    pub words: Vec<Word>,
    pub comment: Option<String>,
}

impl TokenizedLine {
    /// True for blank and comment-only lines.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// A word that cannot be read or applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordError {
    pub column: usize,
    pub token: String,
    pub message: String,
}

impl WordError {
    pub(crate) fn at(word: &Word, message: impl Into<String>) -> Self {
        Self {
            column: word.column,
            token: word.raw.clone(),
            message: message.into(),
        }
    }

    fn new(token: &str, column: usize, message: impl Into<String>) -> Self {
        Self {
            column,
            token: token.to_string(),
            message: message.into(),
        }
    }
}

/// Tokenizes a single line.
///
/// # Errors
///
/// Returns the first malformed word of the line.
pub fn tokenize_line(line: &str) -> Result<TokenizedLine, WordError> {
    let mut tokenized = TokenizedLine::default();
    let Some(root) = LineParser::parse(Rule::line, line)
        .map_err(|err| line_error(line, &err))?
        .next()
    else {
        return Ok(tokenized);
    };
    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::chunk => {
                let (_, column) = pair.line_col();
                tokenized.words.push(parse_word(pair.as_str(), column)?);
            }
            Rule::comment => {
                let text = pair.as_str()[1..].trim();
                if !text.is_empty() {
                    tokenized.comment = Some(text.to_string());
                }
            }
            _ => {}
        }
    }
    Ok(tokenized)
}

fn parse_word(token: &str, column: usize) -> Result<Word, WordError> {
    let malformed = || WordError::new(token, column, "malformed word");
    let form = LineParser::parse(Rule::word, token)
        .map_err(|err| word_error(token, column, &err))?
        .next()
        .and_then(|word| word.into_inner().next())
        .ok_or_else(malformed)?;

    let (address, value, assignment) = match form.as_rule() {
        Rule::assignment => {
            let mut inner = form.into_inner();
            let ident = inner.next().ok_or_else(malformed)?;
            let value = inner
                .next()
                .and_then(assigned_value)
                .ok_or_else(malformed)?;
            (ident.as_str().to_ascii_uppercase(), value, true)
        }
        Rule::call => {
            let mut inner = form.into_inner();
            let ident = inner.next().ok_or_else(malformed)?;
            let args = inner.next().ok_or_else(malformed)?;
            (
                ident.as_str().to_string(),
                WordValue::Call(args.as_str().to_string()),
                false,
            )
        }
        Rule::address_word => {
            let mut inner = form.into_inner();
            let letter = inner.next().ok_or_else(malformed)?;
            let value = inner.next().and_then(number_value).ok_or_else(malformed)?;
            (letter.as_str().to_ascii_uppercase(), value, false)
        }
        Rule::keyword => (form.as_str().to_string(), WordValue::Keyword, false),
        _ => return Err(malformed()),
    };

    Ok(Word {
        address,
        value,
        assignment,
        raw: token.to_string(),
        column,
    })
}

fn assigned_value(pair: Pair<'_, Rule>) -> Option<WordValue> {
    match pair.as_rule() {
        Rule::string => {
            let text = pair.into_inner().next()?;
            Some(WordValue::Text(text.as_str().to_string()))
        }
        Rule::number => number_value(pair),
        Rule::symbol => Some(WordValue::Symbol(pair.as_str().to_string())),
        Rule::sum => build_sum(pair).map(WordValue::Expression),
        Rule::increment => {
            let sum = pair.into_inner().find(|p| p.as_rule() == Rule::sum)?;
            build_sum(sum).map(WordValue::Increment)
        }
        Rule::bare => Some(WordValue::Text(pair.as_str().to_string())),
        _ => None,
    }
}

fn number_value(pair: Pair<'_, Rule>) -> Option<WordValue> {
    let text = pair.as_str();
    let value = text.parse::<f64>().ok()?;
    Some(WordValue::Number {
        value,
        text: text.to_string(),
    })
}

fn build_sum(pair: Pair<'_, Rule>) -> Option<Expr> {
    fold_operations(pair.into_inner(), build_product)
}

fn build_product(pair: Pair<'_, Rule>) -> Option<Expr> {
    fold_operations(pair.into_inner(), build_unary)
}

/// Folds `operand (op operand)*` left to right.
fn fold_operations(
    mut pairs: Pairs<'_, Rule>,
    operand: fn(Pair<'_, Rule>) -> Option<Expr>,
) -> Option<Expr> {
    let mut expr = operand(pairs.next()?)?;
    while let Some(op) = pairs.next() {
        let op = match op.as_rule() {
            Rule::op_add => BinaryOp::Add,
            Rule::op_sub => BinaryOp::Sub,
            Rule::op_mul => BinaryOp::Mul,
            Rule::op_div => BinaryOp::Div,
            Rule::op_int_div => BinaryOp::IntDiv,
            Rule::op_mod => BinaryOp::Mod,
            _ => return None,
        };
        let right = operand(pairs.next()?)?;
        expr = Expr::binary(op, expr, right);
    }
    Some(expr)
}

fn build_unary(pair: Pair<'_, Rule>) -> Option<Expr> {
    let mut negate = false;
    let mut expr = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::neg => negate = true,
            Rule::decimal => expr = Some(Expr::Number(part.as_str().parse().ok()?)),
            Rule::variable => expr = Some(Expr::Variable(part.as_str().to_ascii_uppercase())),
            Rule::sum => expr = Some(build_sum(part)?),
            _ => {}
        }
    }
    let expr = expr?;
    Some(if negate { Expr::Neg(Box::new(expr)) } else { expr })
}

/// The line grammar accepts any text; this only fires on inputs pest itself
/// cannot read.
fn line_error(line: &str, err: &Error<Rule>) -> WordError {
    let column = match err.line_col {
        LineColLocation::Pos((_, column)) | LineColLocation::Span((_, column), _) => column,
    };
    let token: String = line.chars().skip(column.saturating_sub(1)).collect();
    WordError::new(token.trim_end(), column, err.variant.message())
}

fn word_error(token: &str, column: usize, err: &Error<Rule>) -> WordError {
    let message = match &err.variant {
        ErrorVariant::ParsingError { positives, .. } => expected(positives),
        ErrorVariant::CustomError { message } => message.clone(),
    };
    WordError::new(token, column, message)
}

fn expected(positives: &[Rule]) -> String {
    if positives.contains(&Rule::closing_quote) {
        return "unterminated string".to_string();
    }
    if positives.contains(&Rule::closing_paren) {
        return "unbalanced '('".to_string();
    }
    let mut wanted: Vec<&str> = Vec::new();
    for rule in positives {
        let description = describe(*rule);
        if !wanted.contains(&description) {
            wanted.push(description);
        }
    }
    match wanted.split_last() {
        None => "unexpected character".to_string(),
        Some((last, [])) => format!("expected {last}"),
        Some((last, rest)) => format!("expected {} or {last}", rest.join(", ")),
    }
}

fn describe(rule: Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of word",
        Rule::identifier | Rule::keyword => "an identifier",
        Rule::letter => "an address letter",
        Rule::number | Rule::decimal => "a number",
        Rule::arguments => "an argument list",
        Rule::op_add
        | Rule::op_sub
        | Rule::op_mul
        | Rule::op_div
        | Rule::op_int_div
        | Rule::op_mod => "an operator",
        _ => "a value",
    }
}
