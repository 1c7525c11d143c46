//! Flat parameter map access.
//!
//! A parameter counts as missing when it is absent or "empty": null, false,
//! zero, an empty string, an empty list or an empty object.

use alloy::primitives::{Address, B256};
use serde_json::{Map, Value};

use crate::actions::error::ActionError;
use crate::blockchain::to_checksummed;

/// Flat parameter map an action is invoked with.
pub type Params = Map<String, Value>;

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn required<'a>(params: &'a Params, name: &'static str) -> Result<&'a Value, ActionError> {
    params
        .get(name)
        .filter(|v| is_present(v))
        .ok_or(ActionError::MissingParam(name))
}

/// Required text parameter. Numbers are accepted in their JSON form.
pub fn required_str(params: &Params, name: &'static str) -> Result<String, ActionError> {
    match required(params, name)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ActionError::Validation(format!("{} must be a string", name))),
    }
}

/// Required decimal amount, given as a number or numeric string.
pub fn required_amount(params: &Params, name: &'static str) -> Result<f64, ActionError> {
    let amount = match required(params, name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount
        .filter(|a| a.is_finite())
        .ok_or_else(|| ActionError::Validation(format!("{} must be a number", name)))
}

/// Required address list: a JSON array of strings or a comma-separated string.
pub fn required_list(params: &Params, name: &'static str) -> Result<Vec<String>, ActionError> {
    match required(params, name)? {
        Value::String(s) => Ok(s.split(',').map(|a| a.trim().to_string()).collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(ActionError::invalid_address(&other.to_string())),
            })
            .collect(),
        _ => Err(ActionError::Validation(format!(
            "{} must be a list or a comma-separated string",
            name
        ))),
    }
}

pub fn parse_address(input: &str) -> Result<Address, ActionError> {
    to_checksummed(input).ok_or_else(|| ActionError::invalid_address(input))
}

/// 32-byte payment id: 64 hex digits, optional `0x` prefix.
pub fn parse_payment_id(input: &str) -> Result<B256, ActionError> {
    let body = input.strip_prefix("0x").unwrap_or(input);
    if body.len() != 64 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ActionError::Validation(format!("Invalid payment id: {}", input)));
    }
    body.parse::<B256>()
        .map_err(|_| ActionError::Validation(format!("Invalid payment id: {}", input)))
}
