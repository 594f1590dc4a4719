use crate::contract::model::{Ingredient, RecipeIngredient, RecipeSummary, Tag, UserProfile};
use crate::domain::repo::RecipeRecord;
use crate::infra::storage::entity::{ingredient, recipe, tag, user};

impl From<tag::Model> for Tag {
    fn from(m: tag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
        }
    }
}

impl From<ingredient::Model> for Ingredient {
    fn from(m: ingredient::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            measurement_unit: m.measurement_unit,
        }
    }
}

/// `is_subscribed` is viewer-relative and filled in by the domain.
impl From<user::Model> for UserProfile {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            username: m.username,
            first_name: m.first_name,
            last_name: m.last_name,
            avatar: m.avatar,
            is_subscribed: false,
        }
    }
}

impl From<recipe::Model> for RecipeRecord {
    fn from(m: recipe::Model) -> Self {
        Self {
            id: m.id,
            author_id: m.author_id,
            name: m.name,
            text: m.text,
            image: m.image,
            cooking_time: m.cooking_time,
            created_at: m.created_at,
        }
    }
}

impl From<recipe::Model> for RecipeSummary {
    fn from(m: recipe::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            image: m.image,
            cooking_time: m.cooking_time,
        }
    }
}

pub fn ingredient_line(amount: i32, ingredient: ingredient::Model) -> RecipeIngredient {
    RecipeIngredient {
        id: ingredient.id,
        name: ingredient.name,
        measurement_unit: ingredient.measurement_unit,
        amount,
    }
}
