mod item;
mod recipe;

pub use item::ItemService;
pub use recipe::RecipeService;
