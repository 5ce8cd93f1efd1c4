//! Proptest strategies shared by in-crate property tests.

use proptest::prelude::*;

/// Password-like strings mixing every character class the validators look at.
pub fn arb_password() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9!@#%&*() _-]{0,24}").unwrap()
}

/// Strings without any ASCII digit.
pub fn arb_digit_free() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z!@# ]{1,24}").unwrap()
}
