pub mod entities;
pub mod lifecycle;
pub mod use_cases;
