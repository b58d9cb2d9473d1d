//! Numeric helpers shared by the overlay and pointer code.

pub mod safe_cast;
