#![forbid(unsafe_code)]
//! Identifier validation and display formatting.
//!
//! Leaf crate: pure functions over strings, no I/O. The CNPJ routines
//! implement the standard modulo-11 check-digit scheme used by the
//! Brazilian company registry.

mod cnpj;
mod phone;

pub use cnpj::{format_cnpj, strip_digits, validate_cnpj, CNPJ_DIGITS, CNPJ_DISPLAY_LEN};
pub use phone::format_phone;

pub const CRATE_NAME: &str = "cadastro-core";
