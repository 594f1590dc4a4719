use std::sync::Arc;

use axum::{
    routing::{get, post, put, MethodRouter},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::rest::identity::IdentityHeader;
use crate::api::rest::{dto, handlers, problem};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    info(title = "Foodgram API", description = "Recipes, favorites, shopping lists and subscriptions"),
    paths(
        handlers::list_tags,
        handlers::get_tag,
        handlers::list_ingredients,
        handlers::get_ingredient,
        handlers::list_recipes,
        handlers::create_recipe,
        handlers::get_recipe,
        handlers::update_recipe,
        handlers::delete_recipe,
        handlers::add_favorite,
        handlers::remove_favorite,
        handlers::add_to_cart,
        handlers::remove_from_cart,
        handlers::download_shopping_cart,
        handlers::get_link,
        handlers::follow_short_link,
        handlers::me,
        handlers::list_users,
        handlers::set_avatar,
        handlers::delete_avatar,
        handlers::get_user,
        handlers::subscriptions,
        handlers::subscribe,
        handlers::unsubscribe,
    ),
    components(schemas(
        dto::TagDto,
        dto::IngredientDto,
        dto::UserDto,
        dto::RecipeIngredientDto,
        dto::RecipeDto,
        dto::RecipeSummaryDto,
        dto::SubscriptionDto,
        dto::RecipePageDto,
        dto::SubscriptionPageDto,
        dto::UserPageDto,
        dto::AvatarReq,
        dto::AvatarDto,
        dto::ShortLinkDto,
        dto::IngredientAmountReq,
        dto::CreateRecipeReq,
        dto::UpdateRecipeReq,
        problem::Problem,
        problem::ValidationError,
    )),
    tags(
        (name = "tags", description = "Recipe tags"),
        (name = "ingredients", description = "Ingredient catalog"),
        (name = "recipes", description = "Recipes and per-user recipe lists"),
        (name = "users", description = "Profiles and subscriptions"),
    )
)]
pub struct RecipesApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(RecipesApiDoc::openapi())
}

const API_PREFIX: &str = "/api";

/// Registers `path` and its trailing-slash twin.
fn route_both(router: Router, path: &str, method_router: MethodRouter) -> Router {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

/// Same as [`route_both`] under the API prefix. Routes are not nested so that
/// handlers see the full request path.
fn api_route(router: Router, path: &str, method_router: MethodRouter) -> Router {
    route_both(router, &format!("{API_PREFIX}{path}"), method_router)
}

/// Mounts the API under `/api` plus the short-link redirect under `/s`.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    identity: IdentityHeader,
) -> Router {
    let mut api = router;

    api = api_route(api, "/tags", get(handlers::list_tags));
    api = api_route(api, "/tags/{id}", get(handlers::get_tag));
    api = api_route(api, "/ingredients", get(handlers::list_ingredients));
    api = api_route(api, "/ingredients/{id}", get(handlers::get_ingredient));

    api = api_route(
        api,
        "/recipes",
        get(handlers::list_recipes).post(handlers::create_recipe),
    );
    api = api_route(
        api,
        "/recipes/download_shopping_cart",
        get(handlers::download_shopping_cart),
    );
    api = api_route(
        api,
        "/recipes/{id}",
        get(handlers::get_recipe)
            .patch(handlers::update_recipe)
            .delete(handlers::delete_recipe),
    );
    api = api_route(
        api,
        "/recipes/{id}/favorite",
        post(handlers::add_favorite).delete(handlers::remove_favorite),
    );
    api = api_route(
        api,
        "/recipes/{id}/shopping_cart",
        post(handlers::add_to_cart).delete(handlers::remove_from_cart),
    );
    api = api_route(api, "/recipes/{id}/get-link", get(handlers::get_link));

    api = api_route(api, "/users", get(handlers::list_users));
    api = api_route(api, "/users/me", get(handlers::me));
    api = api_route(
        api,
        "/users/me/avatar",
        put(handlers::set_avatar).delete(handlers::delete_avatar),
    );
    api = api_route(api, "/users/subscriptions", get(handlers::subscriptions));
    api = api_route(api, "/users/{id}", get(handlers::get_user));
    api = api_route(
        api,
        "/users/{id}/subscribe",
        post(handlers::subscribe).delete(handlers::unsubscribe),
    );

    api = api.route(&format!("{API_PREFIX}/openapi.json"), get(openapi_json));
    api = route_both(api, "/s/{token}", get(handlers::follow_short_link));

    api.layer(Extension(identity))
        .layer(Extension(service))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = serde_json::to_value(RecipesApiDoc::openapi()).unwrap();
        for path in [
            "/api/tags",
            "/api/recipes",
            "/api/recipes/{id}",
            "/api/recipes/{id}/favorite",
            "/api/recipes/{id}/shopping_cart",
            "/api/recipes/download_shopping_cart",
            "/api/recipes/{id}/get-link",
            "/api/users",
            "/api/users/me/avatar",
            "/api/users/subscriptions",
            "/api/users/{id}/subscribe",
            "/s/{token}",
        ] {
            assert!(
                doc.pointer(&format!("/paths/{}", path.replace('/', "~1")))
                    .is_some(),
                "missing {path}"
            );
        }
        assert!(doc.pointer("/components/schemas/RecipeDto").is_some());
        assert!(doc.pointer("/components/schemas/Problem").is_some());
    }
}
