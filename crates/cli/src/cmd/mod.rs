pub mod simulate;
pub mod tokens;
