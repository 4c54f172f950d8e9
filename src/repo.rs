mod item;
mod item_table;
mod recipe;
mod recipe_table;
mod source;
mod table;

pub use item_table::ItemRepository;
pub use recipe_table::RecipeRepository;
pub use source::{Source, resolve_source};
pub use table::TableRepository;

pub use item::ItemRepo;
pub use recipe::RecipeRepo;

/// Logical sheet names, as known to the remote spreadsheet
pub const ITEMS_SHEET: &str = "Items";
pub const RECIPES_SHEET: &str = "Recipes";
