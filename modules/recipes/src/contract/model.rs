//! Pure models for inter-module communication (no serde, no schema).

use chrono::{DateTime, Utc};

pub type UserId = i32;
pub type RecipeId = i32;
pub type TagId = i32;
pub type IngredientId = i32;

/// The caller of an operation, as resolved by the auth collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer(Option<UserId>);

impl Viewer {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(id: UserId) -> Self {
        Self(Some(id))
    }

    pub fn id(&self) -> Option<UserId> {
        self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Public user profile; `is_subscribed` is relative to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub is_subscribed: bool,
}

/// An ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe projection with viewer-relative flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Minified projection returned by relation toggles and subscription listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmountInput {
    pub ingredient_id: IngredientId,
    pub amount: i32,
}

/// Data for creating a recipe. `image` is an inline `data:image/..;base64,` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientAmountInput>,
}

/// Partial update. `tags` and `ingredients` replace the whole set when present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<String>,
    pub tags: Option<Vec<TagId>>,
    pub ingredients: Option<Vec<IngredientAmountInput>>,
}

/// Listing filters. Relation flags only apply to authenticated viewers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    /// Any-match across the given tag slugs.
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

/// 1-based page request; missing values fall back to configured defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page.saturating_mul(self.limit) < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// A followed author with their newest recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub author: UserProfile,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: u64,
}

/// User-to-recipe relations sharing the toggle protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeRelation {
    Favorite,
    ShoppingCart,
}

impl RecipeRelation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping_cart",
        }
    }
}

impl std::fmt::Display for RecipeRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aggregated line of a shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_navigation_flags() {
        let page = Page {
            items: vec![1, 2],
            total: 5,
            page: 2,
            limit: 2,
        };
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page {
            items: vec![5],
            total: 5,
            page: 3,
            limit: 2,
        };
        assert!(!last.has_next());

        let first = Page::<i32> {
            items: vec![],
            total: 0,
            page: 1,
            limit: 6,
        };
        assert!(!first.has_next());
        assert!(!first.has_previous());
    }

    #[test]
    fn viewer_identity() {
        assert!(Viewer::anonymous().is_anonymous());
        assert_eq!(Viewer::user(7).id(), Some(7));
        assert_eq!(Viewer::default(), Viewer::anonymous());
    }
}
