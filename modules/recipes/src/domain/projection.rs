//! Viewer-relative read models, assembled with one query per association
//! kind for a whole page of rows.

use std::collections::{HashMap, HashSet};

use anyhow::anyhow;

use crate::contract::model::{
    Recipe, RecipeId, RecipeIngredient, RecipeRelation, RecipeSummary, Subscription, Tag, UserId,
    UserProfile, Viewer,
};
use crate::domain::repo::{RecipeRecord, RecipesRepository};

/// Project recipe rows for `viewer`, keeping the input order.
///
/// Anonymous viewers get all flags `false` and the relation tables are not queried.
pub async fn project_recipes(
    repo: &dyn RecipesRepository,
    viewer: Viewer,
    records: Vec<RecipeRecord>,
) -> anyhow::Result<Vec<Recipe>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<RecipeId> = records.iter().map(|r| r.id).collect();
    let author_ids = unique(records.iter().map(|r| r.author_id));

    let mut tags: HashMap<RecipeId, Vec<Tag>> = HashMap::new();
    for (recipe_id, tag) in repo.tags_for_recipes(&ids).await? {
        tags.entry(recipe_id).or_default().push(tag);
    }

    let mut ingredients: HashMap<RecipeId, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, line) in repo.ingredients_for_recipes(&ids).await? {
        ingredients.entry(recipe_id).or_default().push(line);
    }

    let authors: HashMap<UserId, UserProfile> = repo
        .users_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let (favorited, in_cart, followed) = match viewer.id() {
        Some(user_id) => (
            repo.related_recipe_ids(RecipeRelation::Favorite, user_id, &ids)
                .await?,
            repo.related_recipe_ids(RecipeRelation::ShoppingCart, user_id, &ids)
                .await?,
            repo.followed_author_ids(user_id, &author_ids).await?,
        ),
        None => (HashSet::new(), HashSet::new(), HashSet::new()),
    };

    records
        .into_iter()
        .map(|r| {
            let mut author = authors
                .get(&r.author_id)
                .cloned()
                .ok_or_else(|| anyhow!("author {} of recipe {} is missing", r.author_id, r.id))?;
            author.is_subscribed = followed.contains(&author.id);

            Ok(Recipe {
                id: r.id,
                tags: tags.remove(&r.id).unwrap_or_default(),
                author,
                ingredients: ingredients.remove(&r.id).unwrap_or_default(),
                is_favorited: favorited.contains(&r.id),
                is_in_shopping_cart: in_cart.contains(&r.id),
                name: r.name,
                image: r.image,
                text: r.text,
                cooking_time: r.cooking_time,
                created_at: r.created_at,
            })
        })
        .collect()
}

/// Set `is_subscribed` on each profile relative to `viewer`.
pub async fn annotate_profiles(
    repo: &dyn RecipesRepository,
    viewer: Viewer,
    mut profiles: Vec<UserProfile>,
) -> anyhow::Result<Vec<UserProfile>> {
    let Some(user_id) = viewer.id() else {
        return Ok(profiles);
    };
    if profiles.is_empty() {
        return Ok(profiles);
    }

    let ids = unique(profiles.iter().map(|p| p.id));
    let followed = repo.followed_author_ids(user_id, &ids).await?;
    for p in &mut profiles {
        p.is_subscribed = followed.contains(&p.id);
    }
    Ok(profiles)
}

/// Attach each author's newest recipes (truncated to `recipes_limit`) and total count.
/// Authors are assumed to be followed by the viewer.
pub async fn subscriptions_for(
    repo: &dyn RecipesRepository,
    authors: Vec<UserProfile>,
    recipes_limit: Option<u64>,
) -> anyhow::Result<Vec<Subscription>> {
    if authors.is_empty() {
        return Ok(Vec::new());
    }

    let ids = unique(authors.iter().map(|a| a.id));
    let mut by_author: HashMap<UserId, Vec<RecipeSummary>> = HashMap::new();
    for (author_id, summary) in repo.summaries_by_authors(&ids).await? {
        by_author.entry(author_id).or_default().push(summary);
    }

    Ok(authors
        .into_iter()
        .map(|mut author| {
            author.is_subscribed = true;
            let mut recipes = by_author.remove(&author.id).unwrap_or_default();
            let recipes_count = recipes.len() as u64;
            if let Some(limit) = recipes_limit {
                recipes.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            }
            Subscription {
                author,
                recipes,
                recipes_count,
            }
        })
        .collect())
}

pub fn summary_of(record: &RecipeRecord) -> RecipeSummary {
    RecipeSummary {
        id: record.id,
        name: record.name.clone(),
        image: record.image.clone(),
        cooking_time: record.cooking_time,
    }
}

/// Reorder `records` to follow `ids`; ids without a record are skipped.
pub fn in_id_order(ids: &[RecipeId], records: Vec<RecipeRecord>) -> Vec<RecipeRecord> {
    let mut by_id: HashMap<RecipeId, RecipeRecord> =
        records.into_iter().map(|r| (r.id, r)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

fn unique<I: Iterator<Item = i32>>(ids: I) -> Vec<i32> {
    let mut v: Vec<i32> = ids.collect();
    v.sort_unstable();
    v.dedup();
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: RecipeId) -> RecipeRecord {
        RecipeRecord {
            id,
            author_id: 1,
            name: format!("r{id}"),
            text: String::new(),
            image: String::new(),
            cooking_time: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reorders_records_by_requested_ids() {
        let out = in_id_order(&[3, 1, 9, 2], vec![record(1), record(2), record(3)]);
        let ids: Vec<_> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn unique_sorts_and_dedups() {
        assert_eq!(unique([4, 1, 4, 2, 1].into_iter()), vec![1, 2, 4]);
    }
}
