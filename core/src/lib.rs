//! Core of the abacus calculator.
//! See [`expr::run`] to evaluate source text.
pub mod expr;
pub mod utils;
