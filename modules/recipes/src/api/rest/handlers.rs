use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, RawQuery,
    },
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Extension,
};
use tracing::{error, info};

use crate::api::rest::dto::{
    envelope_links, AvatarDto, AvatarReq, CreateRecipeReq, IngredientDto, IngredientSearchQuery,
    RecipeDto, RecipeListParams, RecipePageDto, RecipeSummaryDto, ShortLinkDto, SubscribeQuery,
    SubscriptionDto, SubscriptionPageDto, SubscriptionsQuery, TagDto, UpdateRecipeReq, UserDto,
    UserPageDto, UsersQuery,
};
use crate::api::rest::error::{json_rejection, map_domain_error, path_rejection, query_rejection};
use crate::api::rest::identity::CurrentViewer;
use crate::api::rest::problem::ProblemResponse;
use crate::contract::model::{
    IngredientId, PageRequest, RecipeId, RecipeRelation, TagId, UserId,
};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

type ApiResult<T> = Result<T, ProblemResponse>;

const SHOPPING_LIST_DISPOSITION: &str = "attachment; filename=\"shopping_list.txt\"";

fn fail(op: &str, uri: &Uri, e: DomainError) -> ProblemResponse {
    if e.is_client_error() {
        info!(error = %e, "{op} rejected");
    } else {
        error!(error = %e, "{op} failed");
    }
    map_domain_error(&e, uri.path())
}

fn path_id<T>(path: Result<Path<T>, PathRejection>, uri: &Uri) -> ApiResult<T> {
    path.map(|Path(id)| id)
        .map_err(|r| path_rejection(&r, uri.path()))
}

// --- tags & ingredients ---

/// List all tags
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses((status = 200, description = "All tags", body = [TagDto]))
)]
pub async fn list_tags(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
) -> ApiResult<Json<Vec<TagDto>>> {
    match svc.list_tags().await {
        Ok(tags) => Ok(Json(tags.into_iter().map(TagDto::from).collect())),
        Err(e) => Err(fail("list_tags", &uri, e)),
    }
}

/// Get a tag by id
#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag found", body = TagDto),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn get_tag(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<TagId>, PathRejection>,
    uri: Uri,
) -> ApiResult<Json<TagDto>> {
    let id = path_id(path, &uri)?;
    match svc.get_tag(id).await {
        Ok(tag) => Ok(Json(tag.into())),
        Err(e) => Err(fail("get_tag", &uri, e)),
    }
}

/// List ingredients, optionally filtered by name prefix
#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(("name" = Option<String>, Query, description = "Case-insensitive name prefix")),
    responses((status = 200, description = "Matching ingredients", body = [IngredientDto]))
)]
pub async fn list_ingredients(
    Extension(svc): Extension<Arc<Service>>,
    query: Result<Query<IngredientSearchQuery>, QueryRejection>,
    uri: Uri,
) -> ApiResult<Json<Vec<IngredientDto>>> {
    let Query(query) = query.map_err(|r| query_rejection(&r, uri.path()))?;
    match svc.list_ingredients(query.name.as_deref()).await {
        Ok(items) => Ok(Json(items.into_iter().map(IngredientDto::from).collect())),
        Err(e) => Err(fail("list_ingredients", &uri, e)),
    }
}

/// Get an ingredient by id
#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(("id" = i32, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient found", body = IngredientDto),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn get_ingredient(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<IngredientId>, PathRejection>,
    uri: Uri,
) -> ApiResult<Json<IngredientDto>> {
    let id = path_id(path, &uri)?;
    match svc.get_ingredient(id).await {
        Ok(item) => Ok(Json(item.into())),
        Err(e) => Err(fail("get_ingredient", &uri, e)),
    }
}

// --- recipes ---

/// List recipes, newest first
#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(
        ("author" = Option<i32>, Query, description = "Author id"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs, repeatable; any match"),
        ("is_favorited" = Option<String>, Query, description = "1/0/true/false"),
        ("is_in_shopping_cart" = Option<String>, Query, description = "1/0/true/false"),
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Page of recipes", body = RecipePageDto),
        (status = 400, description = "Bad Request", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn list_recipes(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    RawQuery(raw): RawQuery,
    uri: Uri,
) -> ApiResult<Json<RecipePageDto>> {
    let params =
        RecipeListParams::parse(raw.as_deref()).map_err(|e| fail("list_recipes", &uri, e))?;
    info!(viewer = ?viewer.id(), "Listing recipes");

    let page = PageRequest {
        page: params.page,
        limit: params.limit,
    };
    match svc.list_recipes(viewer, params.filter, page).await {
        Ok(page) => {
            let (next, previous) = envelope_links(
                &page,
                &svc.config().public_base_url,
                uri.path(),
                raw.as_deref(),
            );
            Ok(Json(RecipePageDto {
                count: page.total,
                next,
                previous,
                results: page.items.into_iter().map(RecipeDto::from).collect(),
            }))
        }
        Err(e) => Err(fail("list_recipes", &uri, e)),
    }
}

/// Get a recipe by id
#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe found", body = RecipeDto),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn get_recipe(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    path: Result<Path<RecipeId>, PathRejection>,
    uri: Uri,
) -> ApiResult<Json<RecipeDto>> {
    let id = path_id(path, &uri)?;
    match svc.get_recipe(viewer, id).await {
        Ok(recipe) => Ok(Json(recipe.into())),
        Err(e) => Err(fail("get_recipe", &uri, e)),
    }
}

/// Create a recipe
#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeReq,
    responses(
        (status = 201, description = "Created recipe", body = RecipeDto),
        (status = 400, description = "Bad Request", body = crate::api::rest::problem::Problem),
        (status = 401, description = "Unauthorized", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn create_recipe(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    body: Result<Json<CreateRecipeReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RecipeDto>)> {
    // Anonymous callers are turned away before the body is looked at.
    if viewer.is_anonymous() {
        return Err(fail("create_recipe", &uri, DomainError::unauthorized()));
    }
    let Json(req_body) = body.map_err(|r| json_rejection(&r, uri.path()))?;
    info!(viewer = ?viewer.id(), name = %req_body.name, "Creating recipe");

    match svc.create_recipe(viewer, req_body.into()).await {
        Ok(recipe) => Ok((StatusCode::CREATED, Json(recipe.into()))),
        Err(e) => Err(fail("create_recipe", &uri, e)),
    }
}

/// Partially update a recipe
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    request_body = UpdateRecipeReq,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDto),
        (status = 400, description = "Bad Request", body = crate::api::rest::problem::Problem),
        (status = 401, description = "Unauthorized", body = crate::api::rest::problem::Problem),
        (status = 403, description = "Forbidden", body = crate::api::rest::problem::Problem),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn update_recipe(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    path: Result<Path<RecipeId>, PathRejection>,
    body: Result<Json<UpdateRecipeReq>, JsonRejection>,
) -> ApiResult<Json<RecipeDto>> {
    if viewer.is_anonymous() {
        return Err(fail("update_recipe", &uri, DomainError::unauthorized()));
    }
    let id = path_id(path, &uri)?;
    let Json(req_body) = body.map_err(|r| json_rejection(&r, uri.path()))?;
    info!(recipe_id = id, viewer = ?viewer.id(), "Updating recipe");

    match svc.update_recipe(viewer, id, req_body.into()).await {
        Ok(recipe) => Ok(Json(recipe.into())),
        Err(e) => Err(fail("update_recipe", &uri, e)),
    }
}

/// Delete a recipe
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 403, description = "Forbidden", body = crate::api::rest::problem::Problem),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn delete_recipe(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    path: Result<Path<RecipeId>, PathRejection>,
    uri: Uri,
) -> ApiResult<StatusCode> {
    let id = path_id(path, &uri)?;
    info!(recipe_id = id, viewer = ?viewer.id(), "Deleting recipe");

    match svc.delete_recipe(viewer, id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(fail("delete_recipe", &uri, e)),
    }
}

async fn add_relation(
    svc: &Service,
    viewer: CurrentViewer,
    relation: RecipeRelation,
    path: Result<Path<RecipeId>, PathRejection>,
    uri: &Uri,
) -> ApiResult<(StatusCode, Json<RecipeSummaryDto>)> {
    let id = path_id(path, uri)?;
    match svc.add_relation(viewer.0, relation, id).await {
        Ok(summary) => Ok((StatusCode::CREATED, Json(summary.into()))),
        Err(e) => Err(fail("add_relation", uri, e)),
    }
}

async fn remove_relation(
    svc: &Service,
    viewer: CurrentViewer,
    relation: RecipeRelation,
    path: Result<Path<RecipeId>, PathRejection>,
    uri: &Uri,
) -> ApiResult<StatusCode> {
    let id = path_id(path, uri)?;
    match svc.remove_relation(viewer.0, relation, id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(fail("remove_relation", uri, e)),
    }
}

/// Add a recipe to favorites
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryDto),
        (status = 400, description = "Already in favorites", body = crate::api::rest::problem::Problem),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn add_favorite(
    Extension(svc): Extension<Arc<Service>>,
    viewer: CurrentViewer,
    path: Result<Path<RecipeId>, PathRejection>,
    uri: Uri,
) -> ApiResult<(StatusCode, Json<RecipeSummaryDto>)> {
    add_relation(&svc, viewer, RecipeRelation::Favorite, path, &uri).await
}

/// Remove a recipe from favorites
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not in favorites", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn remove_favorite(
    Extension(svc): Extension<Arc<Service>>,
    viewer: CurrentViewer,
    path: Result<Path<RecipeId>, PathRejection>,
    uri: Uri,
) -> ApiResult<StatusCode> {
    remove_relation(&svc, viewer, RecipeRelation::Favorite, path, &uri).await
}

/// Add a recipe to the shopping cart
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryDto),
        (status = 400, description = "Already in the cart", body = crate::api::rest::problem::Problem),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn add_to_cart(
    Extension(svc): Extension<Arc<Service>>,
    viewer: CurrentViewer,
    path: Result<Path<RecipeId>, PathRejection>,
    uri: Uri,
) -> ApiResult<(StatusCode, Json<RecipeSummaryDto>)> {
    add_relation(&svc, viewer, RecipeRelation::ShoppingCart, path, &uri).await
}

/// Remove a recipe from the shopping cart
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not in the cart", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn remove_from_cart(
    Extension(svc): Extension<Arc<Service>>,
    viewer: CurrentViewer,
    path: Result<Path<RecipeId>, PathRejection>,
    uri: Uri,
) -> ApiResult<StatusCode> {
    remove_relation(&svc, viewer, RecipeRelation::ShoppingCart, path, &uri).await
}

/// Download the aggregated shopping list as a text file
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Shopping list", content_type = "text/plain", body = String),
        (status = 400, description = "Cart is empty", body = crate::api::rest::problem::Problem),
        (status = 401, description = "Unauthorized", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn download_shopping_cart(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    uri: Uri,
) -> ApiResult<Response> {
    match svc.shopping_list(viewer).await {
        Ok(text) => Ok((
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::CONTENT_DISPOSITION, SHOPPING_LIST_DISPOSITION),
            ],
            text,
        )
            .into_response()),
        Err(e) => Err(fail("download_shopping_cart", &uri, e)),
    }
}

/// Get the short link of a recipe
#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Short link", body = ShortLinkDto),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn get_link(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<RecipeId>, PathRejection>,
    uri: Uri,
) -> ApiResult<Json<ShortLinkDto>> {
    let id = path_id(path, &uri)?;
    match svc.short_link(id).await {
        Ok(short_link) => Ok(Json(ShortLinkDto { short_link })),
        Err(e) => Err(fail("get_link", &uri, e)),
    }
}

/// Resolve a short link. Unknown tokens go to the site root.
#[utoipa::path(
    get,
    path = "/s/{token}",
    tag = "recipes",
    params(("token" = String, Path, description = "Short-link token")),
    responses((status = 302, description = "Redirect to the recipe page or to /"))
)]
pub async fn follow_short_link(
    Extension(svc): Extension<Arc<Service>>,
    Path(token): Path<String>,
) -> Response {
    let location = match svc.resolve_short_link(&token) {
        Ok(id) => format!("/recipes/{id}/"),
        Err(_) => "/".to_string(),
    };
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

// --- users & subscriptions ---

/// Get the caller's own profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Own profile", body = UserDto),
        (status = 401, description = "Unauthorized", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn me(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    uri: Uri,
) -> ApiResult<Json<UserDto>> {
    match svc.me(viewer).await {
        Ok(profile) => Ok(Json(profile.into())),
        Err(e) => Err(fail("me", &uri, e)),
    }
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Page of users", body = UserPageDto))
)]
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    query: Result<Query<UsersQuery>, QueryRejection>,
    RawQuery(raw): RawQuery,
    uri: Uri,
) -> ApiResult<Json<UserPageDto>> {
    let Query(query) = query.map_err(|r| query_rejection(&r, uri.path()))?;
    let page = PageRequest {
        page: query.page,
        limit: query.limit,
    };

    match svc.list_users(viewer, page).await {
        Ok(page) => {
            let (next, previous) = envelope_links(
                &page,
                &svc.config().public_base_url,
                uri.path(),
                raw.as_deref(),
            );
            Ok(Json(UserPageDto {
                count: page.total,
                next,
                previous,
                results: page.items.into_iter().map(UserDto::from).collect(),
            }))
        }
        Err(e) => Err(fail("list_users", &uri, e)),
    }
}

/// Replace the caller's avatar
#[utoipa::path(
    put,
    path = "/api/users/me/avatar",
    tag = "users",
    request_body = AvatarReq,
    responses(
        (status = 200, description = "Avatar stored", body = AvatarDto),
        (status = 400, description = "Bad Request", body = crate::api::rest::problem::Problem),
        (status = 401, description = "Unauthorized", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn set_avatar(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    body: Result<Json<AvatarReq>, JsonRejection>,
) -> ApiResult<Json<AvatarDto>> {
    if viewer.is_anonymous() {
        return Err(fail("set_avatar", &uri, DomainError::unauthorized()));
    }
    let Json(req_body) = body.map_err(|r| json_rejection(&r, uri.path()))?;

    let raw = req_body.avatar.unwrap_or_default();
    match svc.set_avatar(viewer, &raw).await {
        Ok(avatar) => Ok(Json(AvatarDto { avatar })),
        Err(e) => Err(fail("set_avatar", &uri, e)),
    }
}

/// Remove the caller's avatar
#[utoipa::path(
    delete,
    path = "/api/users/me/avatar",
    tag = "users",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorized", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn delete_avatar(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    uri: Uri,
) -> ApiResult<StatusCode> {
    match svc.delete_avatar(viewer).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(fail("delete_avatar", &uri, e)),
    }
}

/// Get a user profile
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    path: Result<Path<UserId>, PathRejection>,
    uri: Uri,
) -> ApiResult<Json<UserDto>> {
    let id = path_id(path, &uri)?;
    match svc.get_user(viewer, id).await {
        Ok(profile) => Ok(Json(profile.into())),
        Err(e) => Err(fail("get_user", &uri, e)),
    }
}

/// List followed authors with their newest recipes
#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("recipes_limit" = Option<u64>, Query, description = "Recipes shown per author")
    ),
    responses(
        (status = 200, description = "Page of subscriptions", body = SubscriptionPageDto),
        (status = 401, description = "Unauthorized", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn subscriptions(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    query: Result<Query<SubscriptionsQuery>, QueryRejection>,
    RawQuery(raw): RawQuery,
    uri: Uri,
) -> ApiResult<Json<SubscriptionPageDto>> {
    let Query(query) = query.map_err(|r| query_rejection(&r, uri.path()))?;
    let page = PageRequest {
        page: query.page,
        limit: query.limit,
    };

    match svc.subscriptions(viewer, page, query.recipes_limit).await {
        Ok(page) => {
            let (next, previous) = envelope_links(
                &page,
                &svc.config().public_base_url,
                uri.path(),
                raw.as_deref(),
            );
            Ok(Json(SubscriptionPageDto {
                count: page.total,
                next,
                previous,
                results: page.items.into_iter().map(SubscriptionDto::from).collect(),
            }))
        }
        Err(e) => Err(fail("subscriptions", &uri, e)),
    }
}

/// Follow an author
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author id"),
        ("recipes_limit" = Option<u64>, Query, description = "Recipes shown in the response")
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionDto),
        (status = 400, description = "Bad Request", body = crate::api::rest::problem::Problem),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn subscribe(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    path: Result<Path<UserId>, PathRejection>,
    query: Result<Query<SubscribeQuery>, QueryRejection>,
    uri: Uri,
) -> ApiResult<(StatusCode, Json<SubscriptionDto>)> {
    let author_id = path_id(path, &uri)?;
    let Query(query) = query.map_err(|r| query_rejection(&r, uri.path()))?;
    info!(author_id, viewer = ?viewer.id(), "Subscribing");

    match svc.subscribe(viewer, author_id, query.recipes_limit).await {
        Ok(sub) => Ok((StatusCode::CREATED, Json(sub.into()))),
        Err(e) => Err(fail("subscribe", &uri, e)),
    }
}

/// Unfollow an author
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(("id" = i32, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = crate::api::rest::problem::Problem),
        (status = 404, description = "Not Found", body = crate::api::rest::problem::Problem)
    )
)]
pub async fn unsubscribe(
    Extension(svc): Extension<Arc<Service>>,
    CurrentViewer(viewer): CurrentViewer,
    path: Result<Path<UserId>, PathRejection>,
    uri: Uri,
) -> ApiResult<StatusCode> {
    let author_id = path_id(path, &uri)?;
    info!(author_id, viewer = ?viewer.id(), "Unsubscribing");

    match svc.unsubscribe(viewer, author_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(fail("unsubscribe", &uri, e)),
    }
}
