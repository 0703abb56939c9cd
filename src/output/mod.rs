pub mod cards;
pub mod json;
pub mod table;
