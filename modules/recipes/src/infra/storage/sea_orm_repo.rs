//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over the connection so it can run on a `DatabaseConnection` or
//! inside an outer `DatabaseTransaction`. Every multi-row write opens its own
//! transaction and only talks to that transaction until it commits; dropping
//! it on an error path rolls back.

use std::collections::HashSet;

use anyhow::Context;
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, Query, SelectStatement},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, DbErr,
    EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, SqlErr, TransactionTrait,
};

use crate::contract::model::{
    Ingredient, IngredientId, RecipeId, RecipeIngredient, RecipeRelation, RecipeSummary,
    ShoppingListItem, Tag, TagId, UserId, UserProfile,
};
use crate::domain::repo::{
    Inserted, MembershipFilter, RecipeChanges, RecipeDraft, RecipeQuery, RecipeRecord,
    RecipesRepository,
};
use crate::infra::storage::entity::{
    favorite, follow, ingredient, ingredient_amount, recipe, recipe_tag, shopping_cart, tag, user,
};
use crate::infra::storage::mapper;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmRecipesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmRecipesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[derive(Debug, FromQueryResult)]
struct ShoppingListRow {
    name: String,
    measurement_unit: String,
    amount: i64,
}

/// Unique-constraint violations become `Inserted::Duplicate`.
fn insert_outcome(res: Result<(), DbErr>) -> Result<Inserted, DbErr> {
    match res {
        Ok(()) => Ok(Inserted::Created),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Ok(Inserted::Duplicate)
        }
        Err(e) => Err(e),
    }
}

/// `SELECT recipe_id FROM <relation table> WHERE user_id = ?`
fn related_recipes_query(relation: RecipeRelation, user_id: UserId) -> SelectStatement {
    match relation {
        RecipeRelation::Favorite => Query::select()
            .column((favorite::Entity, favorite::Column::RecipeId))
            .from(favorite::Entity)
            .and_where(Expr::col((favorite::Entity, favorite::Column::UserId)).eq(user_id))
            .to_owned(),
        RecipeRelation::ShoppingCart => Query::select()
            .column((shopping_cart::Entity, shopping_cart::Column::RecipeId))
            .from(shopping_cart::Entity)
            .and_where(
                Expr::col((shopping_cart::Entity, shopping_cart::Column::UserId)).eq(user_id),
            )
            .to_owned(),
    }
}

fn membership(
    select: sea_orm::Select<recipe::Entity>,
    relation: RecipeRelation,
    filter: Option<MembershipFilter>,
) -> sea_orm::Select<recipe::Entity> {
    match filter {
        Some(MembershipFilter { user_id, member }) => {
            let sub = related_recipes_query(relation, user_id);
            if member {
                select.filter(recipe::Column::Id.in_subquery(sub))
            } else {
                select.filter(recipe::Column::Id.not_in_subquery(sub))
            }
        }
        None => select,
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Lower-cases a search term the way the backend's `LOWER()` does.
/// SQLite only folds ASCII, so non-ASCII prefixes match case-sensitively there.
fn fold_case(backend: DbBackend, raw: &str) -> String {
    match backend {
        DbBackend::Sqlite => raw.to_ascii_lowercase(),
        _ => raw.to_lowercase(),
    }
}

async fn insert_tags(
    txn: &DatabaseTransaction,
    recipe_id: RecipeId,
    tags: &[TagId],
) -> anyhow::Result<()> {
    if tags.is_empty() {
        return Ok(());
    }
    let rows = tags.iter().map(|tag_id| recipe_tag::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(*tag_id),
        ..Default::default()
    });
    recipe_tag::Entity::insert_many(rows)
        .exec_without_returning(txn)
        .await
        .context("insert recipe tags failed")?;
    Ok(())
}

async fn insert_amounts(
    txn: &DatabaseTransaction,
    recipe_id: RecipeId,
    lines: &[(IngredientId, i32)],
) -> anyhow::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let rows = lines
        .iter()
        .map(|(ingredient_id, amount)| ingredient_amount::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(*ingredient_id),
            amount: Set(*amount),
            ..Default::default()
        });
    ingredient_amount::Entity::insert_many(rows)
        .exec_without_returning(txn)
        .await
        .context("insert ingredient amounts failed")?;
    Ok(())
}

#[async_trait::async_trait]
impl<C> RecipesRepository for SeaOrmRecipesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn list_tags(&self) -> anyhow::Result<Vec<Tag>> {
        let rows = tag::Entity::find()
            .order_by_asc(tag::Column::Id)
            .all(&self.conn)
            .await
            .context("list_tags failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_tag(&self, id: TagId) -> anyhow::Result<Option<Tag>> {
        let found = tag::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_tag failed")?;
        Ok(found.map(Into::into))
    }

    async fn existing_tag_ids(&self, ids: &[TagId]) -> anyhow::Result<HashSet<TagId>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<TagId> = tag::Entity::find()
            .select_only()
            .column(tag::Column::Id)
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("existing_tag_ids failed")?;
        Ok(found.into_iter().collect())
    }

    async fn list_ingredients(&self, name_prefix: Option<&str>) -> anyhow::Result<Vec<Ingredient>> {
        let mut select = ingredient::Entity::find();
        if let Some(prefix) = name_prefix {
            let folded = fold_case(self.conn.get_database_backend(), prefix);
            let pattern = format!("{}%", escape_like(&folded));
            select = select.filter(
                Expr::expr(Func::lower(Expr::col((
                    ingredient::Entity,
                    ingredient::Column::Name,
                ))))
                .like(LikeExpr::new(pattern).escape('\\')),
            );
        }
        let rows = select
            .order_by_asc(ingredient::Column::Name)
            .order_by_asc(ingredient::Column::Id)
            .all(&self.conn)
            .await
            .context("list_ingredients failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_ingredient(&self, id: IngredientId) -> anyhow::Result<Option<Ingredient>> {
        let found = ingredient::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_ingredient failed")?;
        Ok(found.map(Into::into))
    }

    async fn existing_ingredient_ids(
        &self,
        ids: &[IngredientId],
    ) -> anyhow::Result<HashSet<IngredientId>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<IngredientId> = ingredient::Entity::find()
            .select_only()
            .column(ingredient::Column::Id)
            .filter(ingredient::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("existing_ingredient_ids failed")?;
        Ok(found.into_iter().collect())
    }

    async fn find_user(&self, id: UserId) -> anyhow::Result<Option<UserProfile>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_user failed")?;
        Ok(found.map(Into::into))
    }

    async fn users_by_ids(&self, ids: &[UserId]) -> anyhow::Result<Vec<UserProfile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("users_by_ids failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_users(
        &self,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<(Vec<UserProfile>, u64)> {
        let total = user::Entity::find()
            .count(&self.conn)
            .await
            .context("count users failed")?;
        let rows = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("list_users failed")?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn set_avatar(&self, id: UserId, avatar: Option<String>) -> anyhow::Result<bool> {
        let res = user::Entity::update_many()
            .col_expr(user::Column::Avatar, Expr::value(avatar))
            .filter(user::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("set_avatar failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn find_recipe(&self, id: RecipeId) -> anyhow::Result<Option<RecipeRecord>> {
        let found = recipe::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_recipe failed")?;
        Ok(found.map(Into::into))
    }

    async fn list_recipe_ids(
        &self,
        query: &RecipeQuery,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<(Vec<RecipeId>, u64)> {
        let mut select = recipe::Entity::find();
        if let Some(author) = query.author {
            select = select.filter(recipe::Column::AuthorId.eq(author));
        }
        if !query.tag_slugs.is_empty() {
            let tagged = Query::select()
                .column((recipe_tag::Entity, recipe_tag::Column::RecipeId))
                .from(recipe_tag::Entity)
                .inner_join(
                    tag::Entity,
                    Expr::col((tag::Entity, tag::Column::Id))
                        .equals((recipe_tag::Entity, recipe_tag::Column::TagId)),
                )
                .and_where(
                    Expr::col((tag::Entity, tag::Column::Slug))
                        .is_in(query.tag_slugs.iter().cloned()),
                )
                .to_owned();
            select = select.filter(recipe::Column::Id.in_subquery(tagged));
        }
        select = membership(select, RecipeRelation::Favorite, query.favorites);
        select = membership(select, RecipeRelation::ShoppingCart, query.shopping_cart);

        let total = select
            .clone()
            .count(&self.conn)
            .await
            .context("count recipes failed")?;
        let ids: Vec<RecipeId> = select
            .select_only()
            .column(recipe::Column::Id)
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .offset(offset)
            .limit(limit)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("list_recipe_ids failed")?;
        Ok((ids, total))
    }

    async fn recipes_by_ids(&self, ids: &[RecipeId]) -> anyhow::Result<Vec<RecipeRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = recipe::Entity::find()
            .filter(recipe::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("recipes_by_ids failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn tags_for_recipes(&self, ids: &[RecipeId]) -> anyhow::Result<Vec<(RecipeId, Tag)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = recipe_tag::Entity::find()
            .filter(recipe_tag::Column::RecipeId.is_in(ids.iter().copied()))
            .find_also_related(tag::Entity)
            .order_by_asc(tag::Column::Id)
            .all(&self.conn)
            .await
            .context("tags_for_recipes failed")?;
        Ok(rows
            .into_iter()
            .filter_map(|(link, tag)| tag.map(|t| (link.recipe_id, t.into())))
            .collect())
    }

    async fn ingredients_for_recipes(
        &self,
        ids: &[RecipeId],
    ) -> anyhow::Result<Vec<(RecipeId, RecipeIngredient)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = ingredient_amount::Entity::find()
            .filter(ingredient_amount::Column::RecipeId.is_in(ids.iter().copied()))
            .find_also_related(ingredient::Entity)
            .order_by_asc(ingredient_amount::Column::Id)
            .all(&self.conn)
            .await
            .context("ingredients_for_recipes failed")?;
        Ok(rows
            .into_iter()
            .filter_map(|(line, ing)| {
                ing.map(|i| (line.recipe_id, mapper::ingredient_line(line.amount, i)))
            })
            .collect())
    }

    async fn summaries_by_authors(
        &self,
        author_ids: &[UserId],
    ) -> anyhow::Result<Vec<(UserId, RecipeSummary)>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = recipe::Entity::find()
            .filter(recipe::Column::AuthorId.is_in(author_ids.iter().copied()))
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .all(&self.conn)
            .await
            .context("summaries_by_authors failed")?;
        Ok(rows.into_iter().map(|m| (m.author_id, m.into())).collect())
    }

    async fn create_recipe(&self, draft: RecipeDraft) -> anyhow::Result<RecipeId> {
        let txn = self
            .conn
            .begin()
            .await
            .context("begin create_recipe failed")?;

        let created = recipe::ActiveModel {
            author_id: Set(draft.author_id),
            name: Set(draft.name),
            text: Set(draft.text),
            image: Set(draft.image),
            cooking_time: Set(draft.cooking_time),
            created_at: Set(draft.created_at),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("insert recipe failed")?;

        insert_tags(&txn, created.id, &draft.tags).await?;
        insert_amounts(&txn, created.id, &draft.ingredients).await?;

        txn.commit().await.context("commit create_recipe failed")?;
        Ok(created.id)
    }

    async fn update_recipe(&self, id: RecipeId, changes: RecipeChanges) -> anyhow::Result<()> {
        let txn = self
            .conn
            .begin()
            .await
            .context("begin update_recipe failed")?;

        let mut am = recipe::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        let mut dirty = false;
        if let Some(name) = changes.name {
            am.name = Set(name);
            dirty = true;
        }
        if let Some(text) = changes.text {
            am.text = Set(text);
            dirty = true;
        }
        if let Some(image) = changes.image {
            am.image = Set(image);
            dirty = true;
        }
        if let Some(cooking_time) = changes.cooking_time {
            am.cooking_time = Set(cooking_time);
            dirty = true;
        }
        if dirty {
            am.update(&txn).await.context("update recipe failed")?;
        }

        if let Some(tags) = changes.tags {
            recipe_tag::Entity::delete_many()
                .filter(recipe_tag::Column::RecipeId.eq(id))
                .exec(&txn)
                .await
                .context("clear recipe tags failed")?;
            insert_tags(&txn, id, &tags).await?;
        }
        if let Some(lines) = changes.ingredients {
            ingredient_amount::Entity::delete_many()
                .filter(ingredient_amount::Column::RecipeId.eq(id))
                .exec(&txn)
                .await
                .context("clear ingredient amounts failed")?;
            insert_amounts(&txn, id, &lines).await?;
        }

        txn.commit().await.context("commit update_recipe failed")?;
        Ok(())
    }

    async fn delete_recipe(&self, id: RecipeId) -> anyhow::Result<bool> {
        let txn = self
            .conn
            .begin()
            .await
            .context("begin delete_recipe failed")?;

        // Explicit cleanup; FK cascades are not enabled on every SQLite connection.
        ingredient_amount::Entity::delete_many()
            .filter(ingredient_amount::Column::RecipeId.eq(id))
            .exec(&txn)
            .await
            .context("delete ingredient amounts failed")?;
        recipe_tag::Entity::delete_many()
            .filter(recipe_tag::Column::RecipeId.eq(id))
            .exec(&txn)
            .await
            .context("delete recipe tags failed")?;
        favorite::Entity::delete_many()
            .filter(favorite::Column::RecipeId.eq(id))
            .exec(&txn)
            .await
            .context("delete favorites failed")?;
        shopping_cart::Entity::delete_many()
            .filter(shopping_cart::Column::RecipeId.eq(id))
            .exec(&txn)
            .await
            .context("delete shopping cart rows failed")?;
        let res = recipe::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete recipe failed")?;

        txn.commit().await.context("commit delete_recipe failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn relation_exists(
        &self,
        relation: RecipeRelation,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> anyhow::Result<bool> {
        let count = match relation {
            RecipeRelation::Favorite => {
                favorite::Entity::find()
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.eq(recipe_id))
                    .count(&self.conn)
                    .await
            }
            RecipeRelation::ShoppingCart => {
                shopping_cart::Entity::find()
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
                    .count(&self.conn)
                    .await
            }
        }
        .with_context(|| format!("{relation} lookup failed"))?;
        Ok(count > 0)
    }

    async fn add_relation(
        &self,
        relation: RecipeRelation,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> anyhow::Result<Inserted> {
        let res = match relation {
            RecipeRelation::Favorite => favorite::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .map(|_| ()),
            RecipeRelation::ShoppingCart => shopping_cart::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .map(|_| ()),
        };
        insert_outcome(res).with_context(|| format!("{relation} insert failed"))
    }

    async fn remove_relation(
        &self,
        relation: RecipeRelation,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> anyhow::Result<bool> {
        let res = match relation {
            RecipeRelation::Favorite => {
                favorite::Entity::delete_many()
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.eq(recipe_id))
                    .exec(&self.conn)
                    .await
            }
            RecipeRelation::ShoppingCart => {
                shopping_cart::Entity::delete_many()
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
                    .exec(&self.conn)
                    .await
            }
        }
        .with_context(|| format!("{relation} delete failed"))?;
        Ok(res.rows_affected > 0)
    }

    async fn related_recipe_ids(
        &self,
        relation: RecipeRelation,
        user_id: UserId,
        recipe_ids: &[RecipeId],
    ) -> anyhow::Result<HashSet<RecipeId>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<RecipeId> = match relation {
            RecipeRelation::Favorite => {
                favorite::Entity::find()
                    .select_only()
                    .column(favorite::Column::RecipeId)
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                    .into_tuple()
                    .all(&self.conn)
                    .await
            }
            RecipeRelation::ShoppingCart => {
                shopping_cart::Entity::find()
                    .select_only()
                    .column(shopping_cart::Column::RecipeId)
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                    .into_tuple()
                    .all(&self.conn)
                    .await
            }
        }
        .with_context(|| format!("{relation} bulk lookup failed"))?;
        Ok(found.into_iter().collect())
    }

    async fn follow_exists(&self, user_id: UserId, author_id: UserId) -> anyhow::Result<bool> {
        let count = follow::Entity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .count(&self.conn)
            .await
            .context("follow_exists failed")?;
        Ok(count > 0)
    }

    async fn add_follow(&self, user_id: UserId, author_id: UserId) -> anyhow::Result<Inserted> {
        let res = follow::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map(|_| ());
        insert_outcome(res).context("add_follow failed")
    }

    async fn remove_follow(&self, user_id: UserId, author_id: UserId) -> anyhow::Result<bool> {
        let res = follow::Entity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .exec(&self.conn)
            .await
            .context("remove_follow failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn followed_author_ids(
        &self,
        user_id: UserId,
        author_ids: &[UserId],
    ) -> anyhow::Result<HashSet<UserId>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<UserId> = follow::Entity::find()
            .select_only()
            .column(follow::Column::AuthorId)
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.is_in(author_ids.iter().copied()))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("followed_author_ids failed")?;
        Ok(found.into_iter().collect())
    }

    async fn list_followed_authors(
        &self,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<(Vec<UserProfile>, u64)> {
        let followed = Query::select()
            .column((follow::Entity, follow::Column::AuthorId))
            .from(follow::Entity)
            .and_where(Expr::col((follow::Entity, follow::Column::UserId)).eq(user_id))
            .to_owned();
        let select = user::Entity::find().filter(user::Column::Id.in_subquery(followed));

        let total = select
            .clone()
            .count(&self.conn)
            .await
            .context("count followed authors failed")?;
        let rows = select
            .order_by_asc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("list_followed_authors failed")?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn cart_size(&self, user_id: UserId) -> anyhow::Result<u64> {
        shopping_cart::Entity::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("cart_size failed")
    }

    async fn shopping_list(&self, user_id: UserId) -> anyhow::Result<Vec<ShoppingListItem>> {
        let rows = ingredient_amount::Entity::find()
            .select_only()
            .column(ingredient::Column::Name)
            .column(ingredient::Column::MeasurementUnit)
            .column_as(ingredient_amount::Column::Amount.sum(), "amount")
            .join(
                JoinType::InnerJoin,
                ingredient_amount::Relation::Ingredient.def(),
            )
            .filter(
                ingredient_amount::Column::RecipeId
                    .in_subquery(related_recipes_query(RecipeRelation::ShoppingCart, user_id)),
            )
            .group_by(ingredient::Column::Name)
            .group_by(ingredient::Column::MeasurementUnit)
            .order_by_asc(ingredient::Column::Name)
            .order_by_asc(ingredient::Column::MeasurementUnit)
            .into_model::<ShoppingListRow>()
            .all(&self.conn)
            .await
            .context("shopping_list failed")?;

        Ok(rows
            .into_iter()
            .map(|r| ShoppingListItem {
                name: r.name,
                measurement_unit: r.measurement_unit,
                amount: r.amount,
            })
            .collect())
    }
}
