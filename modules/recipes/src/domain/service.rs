use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::config::RecipesConfig;
use crate::contract::model::{
    Ingredient, IngredientAmountInput, IngredientId, NewRecipe, Page, PageRequest, Recipe,
    RecipeFilter, RecipeId, RecipePatch, RecipeRelation, RecipeSummary, ShoppingListItem,
    Subscription, Tag, TagId, UserId, UserProfile, Viewer,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{ImageKind, ImageStore, ImageUpload};
use crate::domain::projection;
use crate::domain::repo::{
    Inserted, MembershipFilter, RecipeChanges, RecipeDraft, RecipeQuery, RecipeRecord,
    RecipesRepository,
};
use crate::domain::{shopping_list, shortlink};

/// Domain service owning the recipe aggregate, the relation toggles and
/// the read-side projections. Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn RecipesRepository>,
    images: Arc<dyn ImageStore>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub min_cooking_time: i32,
    pub max_cooking_time: i32,
    pub min_amount: i32,
    pub max_amount: i32,
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// Without trailing slash.
    pub public_base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&RecipesConfig::default())
    }
}

impl From<&RecipesConfig> for ServiceConfig {
    fn from(cfg: &RecipesConfig) -> Self {
        Self {
            max_name_length: cfg.max_name_length,
            min_cooking_time: cfg.min_cooking_time,
            max_cooking_time: cfg.max_cooking_time,
            min_amount: cfg.min_amount,
            max_amount: cfg.max_amount,
            default_page_size: cfg.default_page_size.max(1),
            max_page_size: cfg.max_page_size.max(1),
            public_base_url: cfg.public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

const MAX_OFFSET: u64 = i64::MAX as u64;

fn db_err(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

fn authenticated(viewer: Viewer) -> Result<UserId, DomainError> {
    viewer.id().ok_or_else(DomainError::unauthorized)
}

fn relation_label(relation: RecipeRelation) -> &'static str {
    match relation {
        RecipeRelation::Favorite => "favorites",
        RecipeRelation::ShoppingCart => "the shopping cart",
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn RecipesRepository>,
        images: Arc<dyn ImageStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            images,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // --- catalog ---

    #[instrument(name = "recipes.service.list_tags", skip(self))]
    pub async fn list_tags(&self) -> Result<Vec<Tag>, DomainError> {
        self.repo.list_tags().await.map_err(db_err)
    }

    #[instrument(name = "recipes.service.get_tag", skip(self), fields(tag_id = id))]
    pub async fn get_tag(&self, id: TagId) -> Result<Tag, DomainError> {
        self.repo
            .find_tag(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::tag_not_found(id))
    }

    #[instrument(name = "recipes.service.list_ingredients", skip(self))]
    pub async fn list_ingredients(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, DomainError> {
        let prefix = name_prefix.map(str::trim).filter(|p| !p.is_empty());
        let found = self.repo.list_ingredients(prefix).await.map_err(db_err)?;
        debug!(count = found.len(), "Listed ingredients");
        Ok(found)
    }

    #[instrument(name = "recipes.service.get_ingredient", skip(self), fields(ingredient_id = id))]
    pub async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, DomainError> {
        self.repo
            .find_ingredient(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::ingredient_not_found(id))
    }

    // --- recipe reads ---

    #[instrument(
        name = "recipes.service.list_recipes",
        skip(self, filter),
        fields(viewer = ?viewer.id(), page = ?page.page)
    )]
    pub async fn list_recipes(
        &self,
        viewer: Viewer,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, DomainError> {
        let (page_no, limit, offset) = self.resolve_page(page);

        if viewer.is_anonymous()
            && (filter.is_favorited.is_some() || filter.is_in_shopping_cart.is_some())
        {
            debug!("Ignoring relation filters for anonymous viewer");
        }
        let membership = |flag: Option<bool>| {
            viewer
                .id()
                .zip(flag)
                .map(|(user_id, member)| MembershipFilter { user_id, member })
        };

        let mut tag_slugs: Vec<String> = filter
            .tags
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        tag_slugs.sort();
        tag_slugs.dedup();

        let query = RecipeQuery {
            author: filter.author,
            tag_slugs,
            favorites: membership(filter.is_favorited),
            shopping_cart: membership(filter.is_in_shopping_cart),
        };

        let (ids, total) = self
            .repo
            .list_recipe_ids(&query, offset, limit)
            .await
            .map_err(db_err)?;
        let records = self.repo.recipes_by_ids(&ids).await.map_err(db_err)?;
        let items = projection::project_recipes(
            self.repo.as_ref(),
            viewer,
            projection::in_id_order(&ids, records),
        )
        .await
        .map_err(db_err)?;

        debug!(total, returned = items.len(), "Listed recipes");
        Ok(Page {
            items,
            total,
            page: page_no,
            limit,
        })
    }

    #[instrument(
        name = "recipes.service.get_recipe",
        skip(self),
        fields(recipe_id = id, viewer = ?viewer.id())
    )]
    pub async fn get_recipe(&self, viewer: Viewer, id: RecipeId) -> Result<Recipe, DomainError> {
        let record = self.load_recipe(id).await?;
        self.project_one(viewer, record).await
    }

    // --- recipe writes ---

    #[instrument(
        name = "recipes.service.create_recipe",
        skip(self, new),
        fields(viewer = ?viewer.id(), name = %new.name)
    )]
    pub async fn create_recipe(
        &self,
        viewer: Viewer,
        new: NewRecipe,
    ) -> Result<Recipe, DomainError> {
        info!("Creating recipe");
        let author_id = self.ensure_actor(viewer).await?;

        let name = self.validate_name(&new.name)?;
        let text = validate_text(&new.text)?;
        self.validate_cooking_time(new.cooking_time)?;
        if new.image.trim().is_empty() {
            return Err(DomainError::validation("image", "This field is required"));
        }
        let upload = ImageUpload::from_data_uri(&new.image)?;

        self.validate_associations(Some(new.tags.as_slice()), Some(new.ingredients.as_slice()))
            .await?;

        let image = self.images.save(ImageKind::Recipe, upload).await?;
        let draft = RecipeDraft {
            author_id,
            name,
            text,
            image,
            cooking_time: new.cooking_time,
            created_at: Utc::now(),
            tags: new.tags,
            ingredients: amounts(&new.ingredients),
        };
        let id = self.repo.create_recipe(draft).await.map_err(db_err)?;

        info!(recipe_id = id, "Successfully created recipe");
        self.get_recipe(viewer, id).await
    }

    #[instrument(
        name = "recipes.service.update_recipe",
        skip(self, patch),
        fields(recipe_id = id, viewer = ?viewer.id())
    )]
    pub async fn update_recipe(
        &self,
        viewer: Viewer,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, DomainError> {
        info!("Updating recipe");
        let actor = authenticated(viewer)?;
        let current = self.load_recipe(id).await?;
        ensure_owner(actor, &current)?;

        let name = patch
            .name
            .as_deref()
            .map(|n| self.validate_name(n))
            .transpose()?;
        let text = patch.text.as_deref().map(validate_text).transpose()?;
        if let Some(minutes) = patch.cooking_time {
            self.validate_cooking_time(minutes)?;
        }
        let upload = match patch.image.as_deref() {
            Some(raw) if raw.trim().is_empty() => {
                return Err(DomainError::validation("image", "Image cannot be empty"));
            }
            Some(raw) => Some(ImageUpload::from_data_uri(raw)?),
            None => None,
        };

        self.validate_associations(patch.tags.as_deref(), patch.ingredients.as_deref())
            .await?;

        let image = match upload {
            Some(upload) => Some(self.images.save(ImageKind::Recipe, upload).await?),
            None => None,
        };
        let changes = RecipeChanges {
            name,
            text,
            image,
            cooking_time: patch.cooking_time,
            tags: patch.tags,
            ingredients: patch.ingredients.as_deref().map(amounts),
        };
        self.repo.update_recipe(id, changes).await.map_err(db_err)?;

        info!("Successfully updated recipe");
        self.get_recipe(viewer, id).await
    }

    #[instrument(
        name = "recipes.service.delete_recipe",
        skip(self),
        fields(recipe_id = id, viewer = ?viewer.id())
    )]
    pub async fn delete_recipe(&self, viewer: Viewer, id: RecipeId) -> Result<(), DomainError> {
        info!("Deleting recipe");
        let actor = authenticated(viewer)?;
        let current = self.load_recipe(id).await?;
        ensure_owner(actor, &current)?;

        if !self.repo.delete_recipe(id).await.map_err(db_err)? {
            return Err(DomainError::recipe_not_found(id));
        }
        info!("Successfully deleted recipe");
        Ok(())
    }

    // --- favorite / shopping cart toggles ---

    #[instrument(
        name = "recipes.service.add_relation",
        skip(self),
        fields(relation = %relation, recipe_id = id, viewer = ?viewer.id())
    )]
    pub async fn add_relation(
        &self,
        viewer: Viewer,
        relation: RecipeRelation,
        id: RecipeId,
    ) -> Result<RecipeSummary, DomainError> {
        let user_id = self.ensure_actor(viewer).await?;
        let record = self.load_recipe(id).await?;
        let already = || {
            DomainError::already_exists(format!(
                "Recipe {id} is already in {}",
                relation_label(relation)
            ))
        };

        if self
            .repo
            .relation_exists(relation, user_id, id)
            .await
            .map_err(db_err)?
        {
            return Err(already());
        }
        match self
            .repo
            .add_relation(relation, user_id, id)
            .await
            .map_err(db_err)?
        {
            Inserted::Created => {
                info!("Relation added");
                Ok(projection::summary_of(&record))
            }
            Inserted::Duplicate => {
                debug!("Concurrent insert lost the race on the unique constraint");
                Err(already())
            }
        }
    }

    #[instrument(
        name = "recipes.service.remove_relation",
        skip(self),
        fields(relation = %relation, recipe_id = id, viewer = ?viewer.id())
    )]
    pub async fn remove_relation(
        &self,
        viewer: Viewer,
        relation: RecipeRelation,
        id: RecipeId,
    ) -> Result<(), DomainError> {
        let user_id = authenticated(viewer)?;
        self.load_recipe(id).await?;

        if !self
            .repo
            .remove_relation(relation, user_id, id)
            .await
            .map_err(db_err)?
        {
            return Err(DomainError::relation_not_found(format!(
                "Recipe {id} is not in {}",
                relation_label(relation)
            )));
        }
        info!("Relation removed");
        Ok(())
    }

    // --- shopping list ---

    #[instrument(name = "recipes.service.shopping_list_items", skip(self), fields(viewer = ?viewer.id()))]
    pub async fn shopping_list_items(
        &self,
        viewer: Viewer,
    ) -> Result<Vec<ShoppingListItem>, DomainError> {
        let user_id = self.ensure_actor(viewer).await?;
        if self.repo.cart_size(user_id).await.map_err(db_err)? == 0 {
            return Err(DomainError::empty_shopping_cart());
        }
        let items = self.repo.shopping_list(user_id).await.map_err(db_err)?;
        debug!(lines = items.len(), "Aggregated shopping list");
        Ok(items)
    }

    /// Plain-text shopping list document for the viewer's cart.
    pub async fn shopping_list(&self, viewer: Viewer) -> Result<String, DomainError> {
        let items = self.shopping_list_items(viewer).await?;
        Ok(shopping_list::render(&items))
    }

    // --- short links ---

    #[instrument(name = "recipes.service.short_link", skip(self), fields(recipe_id = id))]
    pub async fn short_link(&self, id: RecipeId) -> Result<String, DomainError> {
        self.load_recipe(id).await?;
        Ok(format!(
            "{}/s/{}/",
            self.config.public_base_url,
            shortlink::encode(id)
        ))
    }

    /// Decode a short-link token. Does not check that the recipe exists.
    pub fn resolve_short_link(&self, token: &str) -> Result<RecipeId, DomainError> {
        let decoded = shortlink::decode(token);
        if decoded.is_err() {
            debug!(token, "Rejected short-link token");
        }
        decoded
    }

    // --- users & subscriptions ---

    #[instrument(name = "recipes.service.get_user", skip(self), fields(user_id = id, viewer = ?viewer.id()))]
    pub async fn get_user(&self, viewer: Viewer, id: UserId) -> Result<UserProfile, DomainError> {
        let profile = self
            .repo
            .find_user(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        let mut annotated = projection::annotate_profiles(self.repo.as_ref(), viewer, vec![profile])
            .await
            .map_err(db_err)?;
        annotated.pop().ok_or_else(|| DomainError::user_not_found(id))
    }

    /// Profile of the caller. An identity without a user row is treated as unauthenticated.
    #[instrument(name = "recipes.service.me", skip(self), fields(viewer = ?viewer.id()))]
    pub async fn me(&self, viewer: Viewer) -> Result<UserProfile, DomainError> {
        let user_id = authenticated(viewer)?;
        self.actor_profile(user_id).await
    }

    #[instrument(name = "recipes.service.list_users", skip(self), fields(viewer = ?viewer.id(), page = ?page.page))]
    pub async fn list_users(
        &self,
        viewer: Viewer,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, DomainError> {
        let (page_no, limit, offset) = self.resolve_page(page);
        let (users, total) = self
            .repo
            .list_users(offset, limit)
            .await
            .map_err(db_err)?;
        let items = projection::annotate_profiles(self.repo.as_ref(), viewer, users)
            .await
            .map_err(db_err)?;
        Ok(Page {
            items,
            total,
            page: page_no,
            limit,
        })
    }

    /// Stores a new avatar for the caller and returns its reference.
    #[instrument(name = "recipes.service.set_avatar", skip(self, raw), fields(viewer = ?viewer.id()))]
    pub async fn set_avatar(&self, viewer: Viewer, raw: &str) -> Result<String, DomainError> {
        let user_id = authenticated(viewer)?;
        let current = self.actor_profile(user_id).await?;
        if raw.trim().is_empty() {
            return Err(DomainError::validation("avatar", "This field is required"));
        }
        let upload = ImageUpload::from_data_uri_field("avatar", raw)?;

        let avatar = self.images.save(ImageKind::Avatar, upload).await?;
        if !self
            .repo
            .set_avatar(user_id, Some(avatar.clone()))
            .await
            .map_err(db_err)?
        {
            return Err(DomainError::unauthorized());
        }
        if let Some(previous) = current.avatar {
            self.images.remove(&previous).await?;
        }
        info!("Avatar updated");
        Ok(avatar)
    }

    #[instrument(name = "recipes.service.delete_avatar", skip(self), fields(viewer = ?viewer.id()))]
    pub async fn delete_avatar(&self, viewer: Viewer) -> Result<(), DomainError> {
        let user_id = authenticated(viewer)?;
        let current = self.actor_profile(user_id).await?;
        let Some(previous) = current.avatar else {
            debug!("No avatar to delete");
            return Ok(());
        };
        self.repo
            .set_avatar(user_id, None)
            .await
            .map_err(db_err)?;
        self.images.remove(&previous).await?;
        info!("Avatar deleted");
        Ok(())
    }

    #[instrument(name = "recipes.service.subscriptions", skip(self), fields(viewer = ?viewer.id()))]
    pub async fn subscriptions(
        &self,
        viewer: Viewer,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Page<Subscription>, DomainError> {
        let user_id = authenticated(viewer)?;
        let (page_no, limit, offset) = self.resolve_page(page);

        let (authors, total) = self
            .repo
            .list_followed_authors(user_id, offset, limit)
            .await
            .map_err(db_err)?;
        let items = projection::subscriptions_for(self.repo.as_ref(), authors, recipes_limit)
            .await
            .map_err(db_err)?;

        Ok(Page {
            items,
            total,
            page: page_no,
            limit,
        })
    }

    #[instrument(name = "recipes.service.subscribe", skip(self), fields(author_id = author_id, viewer = ?viewer.id()))]
    pub async fn subscribe(
        &self,
        viewer: Viewer,
        author_id: UserId,
        recipes_limit: Option<u64>,
    ) -> Result<Subscription, DomainError> {
        let user_id = self.ensure_actor(viewer).await?;
        if user_id == author_id {
            return Err(DomainError::validation(
                "author",
                "You cannot subscribe to yourself",
            ));
        }
        let author = self
            .repo
            .find_user(author_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::user_not_found(author_id))?;
        let already =
            || DomainError::already_exists(format!("Already subscribed to user {author_id}"));

        if self
            .repo
            .follow_exists(user_id, author_id)
            .await
            .map_err(db_err)?
        {
            return Err(already());
        }
        if self
            .repo
            .add_follow(user_id, author_id)
            .await
            .map_err(db_err)?
            == Inserted::Duplicate
        {
            return Err(already());
        }
        info!("Subscribed");

        projection::subscriptions_for(self.repo.as_ref(), vec![author], recipes_limit)
            .await
            .map_err(db_err)?
            .pop()
            .ok_or_else(|| DomainError::user_not_found(author_id))
    }

    #[instrument(name = "recipes.service.unsubscribe", skip(self), fields(author_id = author_id, viewer = ?viewer.id()))]
    pub async fn unsubscribe(&self, viewer: Viewer, author_id: UserId) -> Result<(), DomainError> {
        let user_id = authenticated(viewer)?;
        if user_id == author_id {
            return Err(DomainError::validation(
                "author",
                "You cannot unsubscribe from yourself",
            ));
        }
        if self
            .repo
            .find_user(author_id)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(DomainError::user_not_found(author_id));
        }
        if !self
            .repo
            .remove_follow(user_id, author_id)
            .await
            .map_err(db_err)?
        {
            return Err(DomainError::relation_not_found(format!(
                "Not subscribed to user {author_id}"
            )));
        }
        info!("Unsubscribed");
        Ok(())
    }

    // --- helpers ---

    async fn load_recipe(&self, id: RecipeId) -> Result<RecipeRecord, DomainError> {
        self.repo
            .find_recipe(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::recipe_not_found(id))
    }

    async fn project_one(&self, viewer: Viewer, record: RecipeRecord) -> Result<Recipe, DomainError> {
        let id = record.id;
        projection::project_recipes(self.repo.as_ref(), viewer, vec![record])
            .await
            .map_err(db_err)?
            .pop()
            .ok_or_else(|| DomainError::recipe_not_found(id))
    }

    /// (page, limit, offset) with the page 1-based and the limit clamped.
    /// SQL offsets are signed 64-bit, so the offset never exceeds `i64::MAX`.
    fn resolve_page(&self, req: PageRequest) -> (u64, u64, u64) {
        let limit = req
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(self.config.default_page_size)
            .min(self.config.max_page_size);
        let page = req.page.unwrap_or(1).max(1);
        let offset = (page - 1).saturating_mul(limit).min(MAX_OFFSET);
        (page, limit, offset)
    }

    /// Resolves the caller to an existing user row.
    async fn ensure_actor(&self, viewer: Viewer) -> Result<UserId, DomainError> {
        let user_id = authenticated(viewer)?;
        self.actor_profile(user_id).await?;
        Ok(user_id)
    }

    async fn actor_profile(&self, user_id: UserId) -> Result<UserProfile, DomainError> {
        self.repo
            .find_user(user_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                debug!(user_id, "Identity does not match any user");
                DomainError::unauthorized()
            })
    }

    fn validate_name(&self, name: &str) -> Result<String, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name", "This field may not be blank"));
        }
        let len = name.chars().count();
        if len > self.config.max_name_length {
            return Err(DomainError::validation(
                "name",
                format!(
                    "Ensure this field has no more than {} characters (got {len})",
                    self.config.max_name_length
                ),
            ));
        }
        Ok(name.to_string())
    }

    fn validate_cooking_time(&self, minutes: i32) -> Result<(), DomainError> {
        let (min, max) = (self.config.min_cooking_time, self.config.max_cooking_time);
        if !(min..=max).contains(&minutes) {
            return Err(DomainError::validation(
                "cooking_time",
                format!("Cooking time must be between {min} and {max} minutes"),
            ));
        }
        Ok(())
    }

    /// Checks run in a fixed order over whichever sets are present:
    /// existence, then duplicates, then emptiness and amount bounds.
    async fn validate_associations(
        &self,
        tags: Option<&[TagId]>,
        ingredients: Option<&[IngredientAmountInput]>,
    ) -> Result<(), DomainError> {
        let ingredient_ids: Option<Vec<IngredientId>> =
            ingredients.map(|lines| lines.iter().map(|l| l.ingredient_id).collect());

        if let Some(tags) = tags {
            let found = self.repo.existing_tag_ids(tags).await.map_err(db_err)?;
            if let Some(missing) = first_missing(tags, &found) {
                return Err(DomainError::validation(
                    "tags",
                    format!("Tag {missing} does not exist"),
                ));
            }
        }
        if let Some(ids) = ingredient_ids.as_deref() {
            let found = self
                .repo
                .existing_ingredient_ids(ids)
                .await
                .map_err(db_err)?;
            if let Some(missing) = first_missing(ids, &found) {
                return Err(DomainError::validation(
                    "ingredients",
                    format!("Ingredient {missing} does not exist"),
                ));
            }
        }

        if let Some(dup) = tags.and_then(first_duplicate) {
            return Err(DomainError::validation(
                "tags",
                format!("Tag {dup} is listed more than once"),
            ));
        }
        if let Some(dup) = ingredient_ids.as_deref().and_then(first_duplicate) {
            return Err(DomainError::validation(
                "ingredients",
                format!("Ingredient {dup} is listed more than once"),
            ));
        }

        if tags.is_some_and(<[TagId]>::is_empty) {
            return Err(DomainError::validation("tags", "At least one tag is required"));
        }
        if let Some(lines) = ingredients {
            if lines.is_empty() {
                return Err(DomainError::validation(
                    "ingredients",
                    "At least one ingredient is required",
                ));
            }
            let (min, max) = (self.config.min_amount, self.config.max_amount);
            if let Some(bad) = lines.iter().find(|l| !(min..=max).contains(&l.amount)) {
                return Err(DomainError::validation(
                    "ingredients",
                    format!(
                        "Amount of ingredient {} must be between {min} and {max}",
                        bad.ingredient_id
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn validate_text(text: &str) -> Result<String, DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::validation("text", "This field may not be blank"));
    }
    Ok(text.to_string())
}

fn ensure_owner(actor: UserId, recipe: &RecipeRecord) -> Result<(), DomainError> {
    if recipe.author_id != actor {
        return Err(DomainError::forbidden(
            "Only the author can modify this recipe",
        ));
    }
    Ok(())
}

fn amounts(lines: &[IngredientAmountInput]) -> Vec<(IngredientId, i32)> {
    lines.iter().map(|l| (l.ingredient_id, l.amount)).collect()
}

fn first_missing(ids: &[i32], found: &HashSet<i32>) -> Option<i32> {
    ids.iter().copied().find(|id| !found.contains(id))
}

fn first_duplicate(ids: &[i32]) -> Option<i32> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_and_missing_helpers() {
        assert_eq!(first_duplicate(&[1, 2, 3]), None);
        assert_eq!(first_duplicate(&[1, 2, 1, 2]), Some(1));

        let found: HashSet<i32> = [1, 3].into_iter().collect();
        assert_eq!(first_missing(&[1, 3], &found), None);
        assert_eq!(first_missing(&[1, 2, 3, 4], &found), Some(2));
    }

    #[test]
    fn service_config_trims_base_url() {
        let cfg = RecipesConfig {
            public_base_url: "https://food.example/".into(),
            default_page_size: 0,
            ..Default::default()
        };
        let sc = ServiceConfig::from(&cfg);
        assert_eq!(sc.public_base_url, "https://food.example");
        assert_eq!(sc.default_page_size, 1);
    }
}
