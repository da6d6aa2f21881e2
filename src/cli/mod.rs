pub mod check;
pub mod reset;
