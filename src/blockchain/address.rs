//! Address validation, checksumming and content hashing.

use alloy::primitives::{keccak256, Address, B256};

/// Returns true if `input` is a 20-byte hex address.
///
/// Accepts an optional `0x` prefix. All-lowercase and all-uppercase forms are
/// accepted as-is; mixed case must be a valid EIP-55 checksum.
pub fn is_valid_address(input: &str) -> bool {
    let body = input.strip_prefix("0x").unwrap_or(input);
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    match body.parse::<Address>() {
        Ok(address) => address.to_checksum(None)[2..] == *body,
        Err(_) => false,
    }
}

/// Parse and normalize an address. `None` if [`is_valid_address`] rejects it.
pub fn to_checksummed(input: &str) -> Option<Address> {
    if !is_valid_address(input) {
        return None;
    }
    input.strip_prefix("0x").unwrap_or(input).parse().ok()
}

/// EIP-55 display form of an address.
pub fn checksum_string(address: &Address) -> String {
    address.to_checksum(None)
}

/// Keccak-256 content hash of caller-supplied text.
pub fn content_hash(text: &str) -> B256 {
    keccak256(text.as_bytes())
}
