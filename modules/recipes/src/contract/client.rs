use async_trait::async_trait;

use crate::contract::{
    error::RecipesError,
    model::{
        Ingredient, IngredientId, NewRecipe, Page, PageRequest, Recipe, RecipeFilter, RecipeId,
        RecipePatch, RecipeRelation, RecipeSummary, Subscription, Tag, TagId, UserId, UserProfile,
        Viewer,
    },
};

/// Public API of the recipes module for in-process consumers.
#[async_trait]
pub trait RecipesApi: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<Tag>, RecipesError>;

    async fn get_tag(&self, id: TagId) -> Result<Tag, RecipesError>;

    /// Case-insensitive name-prefix search, ordered by name.
    async fn list_ingredients(&self, name: Option<String>)
        -> Result<Vec<Ingredient>, RecipesError>;

    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, RecipesError>;

    async fn list_recipes(
        &self,
        viewer: Viewer,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesError>;

    async fn get_recipe(&self, viewer: Viewer, id: RecipeId) -> Result<Recipe, RecipesError>;

    async fn create_recipe(&self, viewer: Viewer, new: NewRecipe) -> Result<Recipe, RecipesError>;

    async fn update_recipe(
        &self,
        viewer: Viewer,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, RecipesError>;

    async fn delete_recipe(&self, viewer: Viewer, id: RecipeId) -> Result<(), RecipesError>;

    async fn add_relation(
        &self,
        viewer: Viewer,
        relation: RecipeRelation,
        id: RecipeId,
    ) -> Result<RecipeSummary, RecipesError>;

    async fn remove_relation(
        &self,
        viewer: Viewer,
        relation: RecipeRelation,
        id: RecipeId,
    ) -> Result<(), RecipesError>;

    /// Rendered plain-text shopping list for the viewer's cart.
    async fn shopping_list(&self, viewer: Viewer) -> Result<String, RecipesError>;

    /// Absolute short URL for a recipe.
    async fn short_link(&self, id: RecipeId) -> Result<String, RecipesError>;

    async fn get_user(&self, viewer: Viewer, id: UserId) -> Result<UserProfile, RecipesError>;

    async fn list_users(
        &self,
        viewer: Viewer,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, RecipesError>;

    async fn subscriptions(
        &self,
        viewer: Viewer,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Page<Subscription>, RecipesError>;

    async fn subscribe(
        &self,
        viewer: Viewer,
        author: UserId,
        recipes_limit: Option<u64>,
    ) -> Result<Subscription, RecipesError>;

    async fn unsubscribe(&self, viewer: Viewer, author: UserId) -> Result<(), RecipesError>;
}
