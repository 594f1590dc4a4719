use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{
    Ingredient, IngredientId, RecipeId, RecipeIngredient, RecipeRelation, RecipeSummary,
    ShoppingListItem, Tag, TagId, UserId, UserProfile,
};

/// A recipe row without its associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Membership constraint on a user-to-recipe relation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipFilter {
    pub user_id: UserId,
    /// `true` keeps only members, `false` keeps only non-members.
    pub member: bool,
}

/// Resolved listing query; relation constraints are already tied to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub author: Option<UserId>,
    pub tag_slugs: Vec<String>,
    pub favorites: Option<MembershipFilter>,
    pub shopping_cart: Option<MembershipFilter>,
}

/// Fully validated data for a new recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub author_id: UserId,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<(IngredientId, i32)>,
}

/// Validated changes; `None` leaves the column or association untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<TagId>>,
    pub ingredients: Option<Vec<(IngredientId, i32)>>,
}

/// Outcome of an insert into a uniquely-keyed relation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    Created,
    /// The unique constraint rejected the row; a concurrent writer got there first.
    Duplicate,
}

/// Persistence port for the recipes domain. Multi-row writes are atomic
/// inside a single call.
#[async_trait]
pub trait RecipesRepository: Send + Sync {
    // --- catalog ---
    async fn list_tags(&self) -> anyhow::Result<Vec<Tag>>;
    async fn find_tag(&self, id: TagId) -> anyhow::Result<Option<Tag>>;
    /// Subset of `ids` present in the catalog.
    async fn existing_tag_ids(&self, ids: &[TagId]) -> anyhow::Result<HashSet<TagId>>;
    async fn list_ingredients(&self, name_prefix: Option<&str>) -> anyhow::Result<Vec<Ingredient>>;
    async fn find_ingredient(&self, id: IngredientId) -> anyhow::Result<Option<Ingredient>>;
    async fn existing_ingredient_ids(
        &self,
        ids: &[IngredientId],
    ) -> anyhow::Result<HashSet<IngredientId>>;

    // --- users ---
    /// Profiles come back with `is_subscribed = false`.
    async fn find_user(&self, id: UserId) -> anyhow::Result<Option<UserProfile>>;
    async fn users_by_ids(&self, ids: &[UserId]) -> anyhow::Result<Vec<UserProfile>>;
    /// One page of all users ordered by id, plus the total.
    async fn list_users(
        &self,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<(Vec<UserProfile>, u64)>;
    /// Replaces the avatar reference. `false` when the user does not exist.
    async fn set_avatar(&self, id: UserId, avatar: Option<String>) -> anyhow::Result<bool>;

    // --- recipes ---
    async fn find_recipe(&self, id: RecipeId) -> anyhow::Result<Option<RecipeRecord>>;
    /// One page of matching ids, newest first, plus the total match count.
    async fn list_recipe_ids(
        &self,
        query: &RecipeQuery,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<(Vec<RecipeId>, u64)>;
    async fn recipes_by_ids(&self, ids: &[RecipeId]) -> anyhow::Result<Vec<RecipeRecord>>;
    async fn tags_for_recipes(&self, ids: &[RecipeId]) -> anyhow::Result<Vec<(RecipeId, Tag)>>;
    async fn ingredients_for_recipes(
        &self,
        ids: &[RecipeId],
    ) -> anyhow::Result<Vec<(RecipeId, RecipeIngredient)>>;
    /// Summaries of all recipes by the given authors, newest first.
    async fn summaries_by_authors(
        &self,
        author_ids: &[UserId],
    ) -> anyhow::Result<Vec<(UserId, RecipeSummary)>>;

    async fn create_recipe(&self, draft: RecipeDraft) -> anyhow::Result<RecipeId>;
    async fn update_recipe(&self, id: RecipeId, changes: RecipeChanges) -> anyhow::Result<()>;
    /// Deletes the recipe and every row referencing it. Returns false if absent.
    async fn delete_recipe(&self, id: RecipeId) -> anyhow::Result<bool>;

    // --- user-to-recipe relations ---
    async fn relation_exists(
        &self,
        relation: RecipeRelation,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> anyhow::Result<bool>;
    async fn add_relation(
        &self,
        relation: RecipeRelation,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> anyhow::Result<Inserted>;
    /// Returns false if the pair was absent.
    async fn remove_relation(
        &self,
        relation: RecipeRelation,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> anyhow::Result<bool>;
    /// Subset of `recipe_ids` related to `user_id`.
    async fn related_recipe_ids(
        &self,
        relation: RecipeRelation,
        user_id: UserId,
        recipe_ids: &[RecipeId],
    ) -> anyhow::Result<HashSet<RecipeId>>;

    // --- follows ---
    async fn follow_exists(&self, user_id: UserId, author_id: UserId) -> anyhow::Result<bool>;
    async fn add_follow(&self, user_id: UserId, author_id: UserId) -> anyhow::Result<Inserted>;
    async fn remove_follow(&self, user_id: UserId, author_id: UserId) -> anyhow::Result<bool>;
    /// Subset of `author_ids` followed by `user_id`.
    async fn followed_author_ids(
        &self,
        user_id: UserId,
        author_ids: &[UserId],
    ) -> anyhow::Result<HashSet<UserId>>;
    /// One page of authors followed by `user_id`, ordered by author id, plus the total.
    async fn list_followed_authors(
        &self,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<(Vec<UserProfile>, u64)>;

    // --- shopping list ---
    async fn cart_size(&self, user_id: UserId) -> anyhow::Result<u64>;
    /// Amounts summed per (name, unit) over the user's cart, ordered by name then unit.
    async fn shopping_list(&self, user_id: UserId) -> anyhow::Result<Vec<ShoppingListItem>>;
}
