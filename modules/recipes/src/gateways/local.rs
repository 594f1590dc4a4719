use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::RecipesApi,
    error::RecipesError,
    model::{
        Ingredient, IngredientId, NewRecipe, Page, PageRequest, Recipe, RecipeFilter, RecipeId,
        RecipePatch, RecipeRelation, RecipeSummary, Subscription, Tag, TagId, UserId, UserProfile,
        Viewer,
    },
};
use crate::domain::service::Service;

/// Local implementation of the RecipesApi trait that delegates to the domain service
pub struct RecipesLocalClient {
    service: Arc<Service>,
}

impl RecipesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RecipesApi for RecipesLocalClient {
    async fn list_tags(&self) -> Result<Vec<Tag>, RecipesError> {
        self.service.list_tags().await.map_err(Into::into)
    }

    async fn get_tag(&self, id: TagId) -> Result<Tag, RecipesError> {
        self.service.get_tag(id).await.map_err(Into::into)
    }

    async fn list_ingredients(
        &self,
        name: Option<String>,
    ) -> Result<Vec<Ingredient>, RecipesError> {
        self.service
            .list_ingredients(name.as_deref())
            .await
            .map_err(Into::into)
    }

    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, RecipesError> {
        self.service.get_ingredient(id).await.map_err(Into::into)
    }

    async fn list_recipes(
        &self,
        viewer: Viewer,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesError> {
        self.service
            .list_recipes(viewer, filter, page)
            .await
            .map_err(Into::into)
    }

    async fn get_recipe(&self, viewer: Viewer, id: RecipeId) -> Result<Recipe, RecipesError> {
        self.service.get_recipe(viewer, id).await.map_err(Into::into)
    }

    async fn create_recipe(&self, viewer: Viewer, new: NewRecipe) -> Result<Recipe, RecipesError> {
        self.service
            .create_recipe(viewer, new)
            .await
            .map_err(Into::into)
    }

    async fn update_recipe(
        &self,
        viewer: Viewer,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, RecipesError> {
        self.service
            .update_recipe(viewer, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_recipe(&self, viewer: Viewer, id: RecipeId) -> Result<(), RecipesError> {
        self.service
            .delete_recipe(viewer, id)
            .await
            .map_err(Into::into)
    }

    async fn add_relation(
        &self,
        viewer: Viewer,
        relation: RecipeRelation,
        id: RecipeId,
    ) -> Result<RecipeSummary, RecipesError> {
        self.service
            .add_relation(viewer, relation, id)
            .await
            .map_err(Into::into)
    }

    async fn remove_relation(
        &self,
        viewer: Viewer,
        relation: RecipeRelation,
        id: RecipeId,
    ) -> Result<(), RecipesError> {
        self.service
            .remove_relation(viewer, relation, id)
            .await
            .map_err(Into::into)
    }

    async fn shopping_list(&self, viewer: Viewer) -> Result<String, RecipesError> {
        self.service.shopping_list(viewer).await.map_err(Into::into)
    }

    async fn short_link(&self, id: RecipeId) -> Result<String, RecipesError> {
        self.service.short_link(id).await.map_err(Into::into)
    }

    async fn get_user(&self, viewer: Viewer, id: UserId) -> Result<UserProfile, RecipesError> {
        self.service.get_user(viewer, id).await.map_err(Into::into)
    }

    async fn list_users(
        &self,
        viewer: Viewer,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, RecipesError> {
        self.service
            .list_users(viewer, page)
            .await
            .map_err(Into::into)
    }

    async fn subscriptions(
        &self,
        viewer: Viewer,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Page<Subscription>, RecipesError> {
        self.service
            .subscriptions(viewer, page, recipes_limit)
            .await
            .map_err(Into::into)
    }

    async fn subscribe(
        &self,
        viewer: Viewer,
        author: UserId,
        recipes_limit: Option<u64>,
    ) -> Result<Subscription, RecipesError> {
        self.service
            .subscribe(viewer, author, recipes_limit)
            .await
            .map_err(Into::into)
    }

    async fn unsubscribe(&self, viewer: Viewer, author: UserId) -> Result<(), RecipesError> {
        self.service
            .unsubscribe(viewer, author)
            .await
            .map_err(Into::into)
    }
}
