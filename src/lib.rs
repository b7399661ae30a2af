pub mod access;
pub mod expression;
pub mod types;
