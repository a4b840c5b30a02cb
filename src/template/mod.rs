//! Offer email templating.
//!
//! This module provides:
//! - `PlaceholderMap`, the set of known `{TOKEN}` values for one email
//! - Tolerant substitution that leaves unknown or malformed tokens untouched
//! - `format_email`, which wraps the substituted body in greeting and closing
//!
//! # Example
//!
//! ```ignore
//! let placeholders = PlaceholderMap::new()
//!     .with("USER_EMAIL", "johndoe@unknown.com")
//!     .with("CODE", "GIL7RUEOU7VHBH7Q");
//!
//! let email = format_email(
//!     "Login: {USER_EMAIL}\nCode: {CODE}\n{NOT_A_TOKEN}",
//!     &placeholders,
//!     Some("Hi,"),
//!     None,
//! );
//! ```

mod placeholders;
mod substitution;

pub use placeholders::PlaceholderMap;
pub use substitution::{format_email, placeholder_names, substitute};
