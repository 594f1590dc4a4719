//! SeaORM entities, one module per table.

pub mod favorite;
pub mod follow;
pub mod ingredient;
pub mod ingredient_amount;
pub mod recipe;
pub mod recipe_tag;
pub mod shopping_cart;
pub mod tag;
pub mod user;
