use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use utoipa::ToSchema;

use crate::contract::model::{
    Ingredient, IngredientAmountInput, NewRecipe, Page, Recipe, RecipeFilter, RecipeIngredient,
    RecipePatch, RecipeSummary, Subscription, Tag, UserProfile,
};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngredientDto {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Public user profile as seen by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientDto {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe projection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeDto {
    pub id: i32,
    pub tags: Vec<TagDto>,
    pub author: UserDto,
    pub ingredients: Vec<RecipeIngredientDto>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Minified recipe returned by the favorite and cart endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeSummaryDto {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// A followed author together with their newest recipes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub recipes: Vec<RecipeSummaryDto>,
    pub recipes_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipePageDto {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<RecipeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionPageDto {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<SubscriptionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserPageDto {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<UserDto>,
}

/// Body of `PUT /api/users/me/avatar`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AvatarReq {
    /// `data:image/<type>;base64,<payload>`
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvatarDto {
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShortLinkDto {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct IngredientAmountReq {
    /// Ingredient id.
    pub id: i32,
    pub amount: i32,
}

/// Body of `POST /api/recipes`. Missing fields surface as field validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateRecipeReq {
    pub ingredients: Vec<IngredientAmountReq>,
    pub tags: Vec<i32>,
    /// `data:image/<type>;base64,<payload>`
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Body of `PATCH /api/recipes/{id}`; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateRecipeReq {
    pub ingredients: Option<Vec<IngredientAmountReq>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct IngredientSearchQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UsersQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubscriptionsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub recipes_limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubscribeQuery {
    pub recipes_limit: Option<u64>,
}

/// Recipe listing parameters. Parsed by hand because `tags` may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListParams {
    pub filter: RecipeFilter,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl RecipeListParams {
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        let mut out = Self::default();
        let Some(raw) = raw else {
            return Ok(out);
        };
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let value = value.trim();
            match &*key {
                "author" => out.filter.author = Some(parse_number(&key, value)?),
                "tags" => out.filter.tags.push(value.to_string()),
                "is_favorited" => out.filter.is_favorited = Some(parse_flag(&key, value)?),
                "is_in_shopping_cart" => {
                    out.filter.is_in_shopping_cart = Some(parse_flag(&key, value)?)
                }
                "page" => out.page = Some(parse_number(&key, value)?),
                "limit" => out.limit = Some(parse_number(&key, value)?),
                _ => {}
            }
        }
        Ok(out)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value
        .parse()
        .map_err(|_| DomainError::validation(key, format!("'{value}' is not a valid number")))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, DomainError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(DomainError::validation(
            key,
            format!("'{value}' is not a valid boolean"),
        )),
    }
}

/// Absolute URL of another page of the same listing. Page 1 drops the parameter.
pub fn page_link(base_url: &str, path: &str, raw_query: Option<&str>, page: u64) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(raw_query.unwrap_or_default().as_bytes()) {
        if key != "page" {
            query.append_pair(&key, &value);
        }
    }
    if page > 1 {
        query.append_pair("page", &page.to_string());
    }
    let query = query.finish();
    if query.is_empty() {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}{path}?{query}")
    }
}

/// Builds `(next, previous)` links for a page.
pub fn envelope_links<T>(
    page: &Page<T>,
    base_url: &str,
    path: &str,
    raw_query: Option<&str>,
) -> (Option<String>, Option<String>) {
    let next = page
        .has_next()
        .then(|| page_link(base_url, path, raw_query, page.page + 1));
    let previous = page
        .has_previous()
        .then(|| page_link(base_url, path, raw_query, page.page - 1));
    (next, previous)
}

// Conversion implementations between REST DTOs and contract models

impl From<Tag> for TagDto {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            slug: t.slug,
        }
    }
}

impl From<Ingredient> for IngredientDto {
    fn from(i: Ingredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            measurement_unit: i.measurement_unit,
        }
    }
}

impl From<UserProfile> for UserDto {
    fn from(u: UserProfile) -> Self {
        Self {
            email: u.email,
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            is_subscribed: u.is_subscribed,
            avatar: u.avatar,
        }
    }
}

impl From<RecipeIngredient> for RecipeIngredientDto {
    fn from(i: RecipeIngredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            measurement_unit: i.measurement_unit,
            amount: i.amount,
        }
    }
}

impl From<Recipe> for RecipeDto {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            tags: r.tags.into_iter().map(Into::into).collect(),
            author: r.author.into(),
            ingredients: r.ingredients.into_iter().map(Into::into).collect(),
            is_favorited: r.is_favorited,
            is_in_shopping_cart: r.is_in_shopping_cart,
            name: r.name,
            image: r.image,
            text: r.text,
            cooking_time: r.cooking_time,
        }
    }
}

impl From<RecipeSummary> for RecipeSummaryDto {
    fn from(r: RecipeSummary) -> Self {
        Self {
            id: r.id,
            name: r.name,
            image: r.image,
            cooking_time: r.cooking_time,
        }
    }
}

impl From<Subscription> for SubscriptionDto {
    fn from(s: Subscription) -> Self {
        Self {
            user: s.author.into(),
            recipes: s.recipes.into_iter().map(Into::into).collect(),
            recipes_count: s.recipes_count,
        }
    }
}

impl From<IngredientAmountReq> for IngredientAmountInput {
    fn from(req: IngredientAmountReq) -> Self {
        Self {
            ingredient_id: req.id,
            amount: req.amount,
        }
    }
}

impl From<CreateRecipeReq> for NewRecipe {
    fn from(req: CreateRecipeReq) -> Self {
        Self {
            name: req.name,
            text: req.text,
            cooking_time: req.cooking_time,
            image: req.image,
            tags: req.tags,
            ingredients: req.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<UpdateRecipeReq> for RecipePatch {
    fn from(req: UpdateRecipeReq) -> Self {
        Self {
            name: req.name,
            text: req.text,
            cooking_time: req.cooking_time,
            image: req.image,
            tags: req.tags,
            ingredients: req
                .ingredients
                .map(|lines| lines.into_iter().map(Into::into).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_accept_repeated_tags_and_flag_spellings() {
        let p = RecipeListParams::parse(Some(
            "tags=breakfast&tags=lunch&is_favorited=1&is_in_shopping_cart=false&author=3&page=2&limit=10",
        ))
        .unwrap();
        assert_eq!(p.filter.tags, vec!["breakfast", "lunch"]);
        assert_eq!(p.filter.is_favorited, Some(true));
        assert_eq!(p.filter.is_in_shopping_cart, Some(false));
        assert_eq!(p.filter.author, Some(3));
        assert_eq!(p.page, Some(2));
        assert_eq!(p.limit, Some(10));
    }

    #[test]
    fn list_params_reject_garbage() {
        let err = RecipeListParams::parse(Some("is_favorited=maybe")).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "is_favorited"));
        assert!(RecipeListParams::parse(Some("page=two")).is_err());
        assert_eq!(RecipeListParams::parse(None).unwrap(), RecipeListParams::default());
    }

    #[test]
    fn page_links_replace_the_page_parameter() {
        let base = "http://localhost:8000";
        assert_eq!(
            page_link(base, "/api/recipes", Some("tags=a&page=2"), 3),
            "http://localhost:8000/api/recipes?tags=a&page=3"
        );
        assert_eq!(
            page_link(base, "/api/recipes", Some("page=2"), 1),
            "http://localhost:8000/api/recipes"
        );
    }

    #[test]
    fn envelope_links_follow_page_position() {
        let page = Page {
            items: vec![1],
            total: 3,
            page: 2,
            limit: 1,
        };
        let (next, previous) = envelope_links(&page, "", "/api/recipes", None);
        assert_eq!(next.as_deref(), Some("/api/recipes?page=3"));
        assert_eq!(previous.as_deref(), Some("/api/recipes"));
    }

    #[test]
    fn short_link_uses_hyphenated_key() {
        let v = serde_json::to_value(ShortLinkDto {
            short_link: "http://x/s/MQ/".into(),
        })
        .unwrap();
        assert_eq!(v["short-link"], "http://x/s/MQ/");
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let req: CreateRecipeReq = serde_json::from_str(r#"{"name":"Soup"}"#).unwrap();
        assert_eq!(req.name, "Soup");
        assert!(req.ingredients.is_empty());
        assert_eq!(req.cooking_time, 0);
    }

    #[test]
    fn subscription_flattens_the_author() {
        let dto = SubscriptionDto {
            user: UserDto {
                email: "a@b.c".into(),
                id: 1,
                username: "a".into(),
                first_name: "A".into(),
                last_name: "B".into(),
                is_subscribed: true,
                avatar: None,
            },
            recipes: vec![],
            recipes_count: 0,
        };
        let v = serde_json::to_value(dto).unwrap();
        assert_eq!(v["username"], "a");
        assert_eq!(v["recipes_count"], 0);
    }
}
