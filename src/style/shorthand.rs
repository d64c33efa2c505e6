//! # `flex` Shorthand and Token Parsing
//!
//! Decomposes the `flex` shorthand into grow/shrink/basis and parses the
//! small set of value tokens the attribute model accepts: plain numbers,
//! `px` lengths, percentages, and the `auto`/`content` keywords.
//!
//! The single-token forms are pinned as follows:
//! - `initial` → `0 1 auto`, `auto` → `1 1 auto`, `none` → `0 0 auto`
//! - a unitless number `n` → `n 1 0`
//! - a length or percentage `L` → `1 1 L`
//! - `content` → `1 1 content`
//!
//! Anything else with one token is rejected.

use super::FlexBasis;
use crate::error::FlexError;

/// The three components a `flex` shorthand expands to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexShorthand {
    pub grow: f64,
    pub shrink: f64,
    pub basis: FlexBasis,
}

impl FlexShorthand {
    pub const INITIAL: FlexShorthand = FlexShorthand {
        grow: 0.0,
        shrink: 1.0,
        basis: FlexBasis::Auto,
    };
}

/// Parse a `flex` shorthand string.
pub fn parse_flex(value: &str) -> Result<FlexShorthand, FlexError> {
    let tokens: Vec<&str> = value.split_whitespace().collect();

    match tokens.as_slice() {
        [] => Err(FlexError::invalid("flex", value, "empty value")),
        ["initial"] => Ok(FlexShorthand::INITIAL),
        ["auto"] => Ok(FlexShorthand {
            grow: 1.0,
            shrink: 1.0,
            basis: FlexBasis::Auto,
        }),
        ["none"] => Ok(FlexShorthand {
            grow: 0.0,
            shrink: 0.0,
            basis: FlexBasis::Auto,
        }),
        [single] => {
            if let Some(grow) = parse_number(single) {
                return Ok(FlexShorthand {
                    grow: non_negative("flex", value, grow)?,
                    shrink: 1.0,
                    basis: FlexBasis::Length(0.0),
                });
            }
            match parse_basis_token(single) {
                Some(FlexBasis::Auto) | None => Err(FlexError::invalid(
                    "flex",
                    value,
                    "a single token must be a number, a length, or `content`",
                )),
                Some(basis) => Ok(FlexShorthand {
                    grow: 1.0,
                    shrink: 1.0,
                    basis: checked_basis("flex", value, basis)?,
                }),
            }
        }
        [first, second] => {
            let grow = parse_number(first).ok_or_else(|| {
                FlexError::invalid("flex", value, "the first token must be a grow factor")
            })?;
            let grow = non_negative("flex", value, grow)?;

            if let Some(shrink) = parse_number(second) {
                return Ok(FlexShorthand {
                    grow,
                    shrink: non_negative("flex", value, shrink)?,
                    basis: FlexBasis::Auto,
                });
            }
            let basis = parse_basis_token(second).ok_or_else(|| {
                FlexError::invalid("flex", value, "expected a shrink factor or a basis")
            })?;
            Ok(FlexShorthand {
                grow,
                shrink: 1.0,
                basis: checked_basis("flex", value, basis)?,
            })
        }
        [first, second, third] => {
            let grow = parse_number(first).ok_or_else(|| {
                FlexError::invalid("flex", value, "the first token must be a grow factor")
            })?;
            let shrink = parse_number(second).ok_or_else(|| {
                FlexError::invalid("flex", value, "the second token must be a shrink factor")
            })?;
            let basis = parse_basis_token(third)
                .ok_or_else(|| FlexError::invalid("flex", value, "unrecognized basis"))?;
            Ok(FlexShorthand {
                grow: non_negative("flex", value, grow)?,
                shrink: non_negative("flex", value, shrink)?,
                basis: checked_basis("flex", value, basis)?,
            })
        }
        _ => Err(FlexError::invalid("flex", value, "too many tokens")),
    }
}

/// Parse a standalone `flex-basis` value.
pub fn parse_basis(value: &str) -> Result<FlexBasis, FlexError> {
    let basis = parse_basis_token(value.trim())
        .ok_or_else(|| FlexError::invalid("flex-basis", value, "unrecognized basis"))?;
    checked_basis("flex-basis", value, basis)
}

/// Parse a length in pixels: `120`, `120px`, `12.5px`.
pub fn parse_length(property: &str, value: &str) -> Result<f64, FlexError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix("px").unwrap_or(trimmed);
    parse_number(digits).ok_or_else(|| FlexError::invalid(property, value, "expected a length"))
}

/// A basis token in shorthand position: keyword, unitless number, `px` or `%`.
fn parse_basis_token(token: &str) -> Option<FlexBasis> {
    match token {
        "auto" => Some(FlexBasis::Auto),
        "content" => Some(FlexBasis::Content),
        _ => {
            if let Some(p) = token.strip_suffix('%') {
                return parse_number(p).map(FlexBasis::Percent);
            }
            let digits = token.strip_suffix("px").unwrap_or(token);
            parse_number(digits).map(FlexBasis::Length)
        }
    }
}

/// Plain decimal numbers only. `inf`, `NaN` and exponent forms are not numbers here.
pub(crate) fn parse_number(token: &str) -> Option<f64> {
    let body = token.strip_prefix(['-', '+']).unwrap_or(token);
    if body.is_empty()
        || !body.chars().any(|c| c.is_ascii_digit())
        || !body.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    token.parse::<f64>().ok()
}

fn checked_basis(property: &str, value: &str, basis: FlexBasis) -> Result<FlexBasis, FlexError> {
    match basis {
        FlexBasis::Length(n) => Ok(FlexBasis::Length(non_negative(property, value, n)?)),
        FlexBasis::Percent(p) => Ok(FlexBasis::Percent(non_negative(property, value, p)?)),
        other => Ok(other),
    }
}

fn non_negative(property: &str, value: &str, n: f64) -> Result<f64, FlexError> {
    if n < 0.0 {
        Err(FlexError::invalid(property, value, "must not be negative"))
    } else {
        Ok(n)
    }
}
