use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref NUMBER_TOKEN: Regex = Regex::new(r"[-+]?[0-9][0-9,.]*").unwrap();
}

/// A numeric token lifted out of free text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Integral values that fit exactly become `Int`
    pub fn from_f64(value: f64) -> Self {
        const EXACT: f64 = 9_007_199_254_740_992.0;
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= EXACT {
            Number::Int(value as i64)
        } else {
            Number::Float(value)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

/// Extract every numeric token from `text`.
///
/// Thousands separators are dropped (`1,234` is `1234`), a trailing sentence
/// period is ignored, and tokens that are not valid numbers after cleanup
/// (`1.2.3`, a bare sign) are discarded.
pub fn extract_numbers(text: &str) -> Vec<Number> {
    NUMBER_TOKEN
        .find_iter(text)
        .filter_map(|m| parse_token(m.as_str()))
        .collect()
}

fn parse_token(raw: &str) -> Option<Number> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim_end_matches('.');

    if matches!(cleaned, "" | "-" | "+" | ".") {
        return None;
    }

    if cleaned.contains('.') {
        return cleaned.parse::<f64>().ok().map(Number::Float);
    }

    match cleaned.parse::<i64>() {
        Ok(n) => Some(Number::Int(n)),
        // Too large for i64
        Err(_) => cleaned.parse::<f64>().ok().map(Number::Float),
    }
}

/// Sum a list of numbers, staying integral while every term is integral.
///
/// Returns `None` for an empty list.
pub fn sum(numbers: &[Number]) -> Option<Number> {
    if numbers.is_empty() {
        return None;
    }

    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0;

    for n in numbers {
        float_total += n.as_f64();
        int_total = match (int_total, n) {
            (Some(acc), Number::Int(v)) => acc.checked_add(*v),
            _ => None,
        };
    }

    Some(match int_total {
        Some(total) => Number::Int(total),
        None => Number::Float(float_total),
    })
}

/// Convenience wrapper: extract and sum in one step
pub fn sum_numbers_in(text: &str) -> Option<(Number, usize)> {
    let numbers = extract_numbers(text);
    sum(&numbers).map(|total| (total, numbers.len()))
}
