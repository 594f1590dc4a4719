//! The in-process client exposes service results through the public contract.

mod fixtures;

use recipes::contract::client::RecipesApi;
use recipes::contract::error::RecipesError;
use recipes::contract::model::{PageRequest, RecipeFilter, RecipeRelation, Viewer};
use recipes::gateways::local::RecipesLocalClient;

use fixtures::{create_as, kitchen, new_recipe, test_env};

#[tokio::test]
async fn local_client_round_trips_through_the_service() {
    let env = test_env().await;
    let k = kitchen(&env.db).await;
    let client = RecipesLocalClient::new(env.service.clone());

    let recipe = client
        .create_recipe(
            Viewer::user(k.alice),
            new_recipe("Pancakes", &[k.breakfast], &[(k.flour, 200), (k.milk, 300)]),
        )
        .await
        .unwrap();
    assert_eq!(recipe.author.id, k.alice);

    let summary = client
        .add_relation(Viewer::user(k.bob), RecipeRelation::Favorite, recipe.id)
        .await
        .unwrap();
    assert_eq!(summary.name, "Pancakes");

    let page = client
        .list_recipes(
            Viewer::user(k.bob),
            RecipeFilter {
                is_favorited: Some(true),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert!(page.items[0].is_favorited);

    let link = client.short_link(recipe.id).await.unwrap();
    assert!(link.starts_with("http://localhost:8000/s/"), "{link}");

    let users = client
        .list_users(Viewer::anonymous(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(users.total, 2);
    assert_eq!(
        client.add_relation(Viewer::user(4242), RecipeRelation::ShoppingCart, recipe.id).await,
        Err(RecipesError::Unauthorized)
    );
}

#[tokio::test]
async fn local_client_maps_domain_errors() {
    let env = test_env().await;
    let k = kitchen(&env.db).await;
    let id = create_as(&env.service, k.alice, "Toast", &[k.breakfast], &[(k.flour, 50)]).await;
    let client = RecipesLocalClient::new(env.service.clone());

    assert_eq!(
        client.delete_recipe(Viewer::anonymous(), id).await,
        Err(RecipesError::Unauthorized)
    );
    assert!(matches!(
        client.delete_recipe(Viewer::user(k.bob), id).await,
        Err(RecipesError::Forbidden { .. })
    ));
    assert_eq!(
        client.get_recipe(Viewer::anonymous(), 4242).await,
        Err(RecipesError::not_found("Recipe 4242"))
    );
    assert!(matches!(
        client.subscribe(Viewer::user(k.bob), k.bob, None).await,
        Err(RecipesError::Validation { ref field, .. }) if field == "author"
    ));
    assert!(matches!(
        client
            .remove_relation(Viewer::user(k.bob), RecipeRelation::ShoppingCart, id)
            .await,
        Err(RecipesError::RelationNotFound { .. })
    ));
    assert_eq!(
        client.shopping_list(Viewer::user(k.bob)).await,
        Err(RecipesError::validation("shopping_cart", "Shopping cart is empty"))
    );
}
