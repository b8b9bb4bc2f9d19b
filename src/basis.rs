pub mod base;
pub mod linear;
pub mod polynomial;
