pub mod item;
pub mod recipe;
pub mod types;
