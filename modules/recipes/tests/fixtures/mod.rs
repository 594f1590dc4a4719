//! Shared helpers for the recipes integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;

use recipes::contract::model::{IngredientAmountInput, NewRecipe, RecipeId, TagId, UserId, Viewer};
use recipes::domain::service::{Service, ServiceConfig};
use recipes::infra::media::FsImageStore;
use recipes::infra::storage::entity::{ingredient, tag, user};
use recipes::infra::storage::{migrations::Migrator, SeaOrmRecipesRepository};

/// A tiny but valid inline image payload.
pub const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

/// Create a fresh test database for each test (in-memory SQLite) and run migrations.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Service wired to a SeaORM repository and a temporary media directory.
pub struct TestEnv {
    pub db: DatabaseConnection,
    pub service: Arc<Service>,
    pub media_root: PathBuf,
    _media: TempDir,
}

pub async fn test_env() -> TestEnv {
    test_env_with(ServiceConfig::default()).await
}

pub async fn test_env_with(config: ServiceConfig) -> TestEnv {
    let db = create_test_db().await;
    let media = tempfile::tempdir().expect("tempdir");
    let media_root = media.path().to_path_buf();

    let repo = SeaOrmRecipesRepository::new(db.clone());
    let images = FsImageStore::new(&media_root, "/media");
    let service = Arc::new(Service::new(Arc::new(repo), Arc::new(images), config));

    TestEnv {
        db,
        service,
        media_root,
        _media: media,
    }
}

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> UserId {
    user::ActiveModel {
        email: Set(format!("{username}@example.com")),
        username: Set(username.to_string()),
        first_name: Set(format!("{username}-first")),
        last_name: Set(format!("{username}-last")),
        avatar: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed user")
    .id
}

pub async fn seed_tag(db: &DatabaseConnection, name: &str, slug: &str) -> TagId {
    tag::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed tag")
    .id
}

pub async fn seed_ingredient(db: &DatabaseConnection, name: &str, unit: &str) -> i32 {
    ingredient::ActiveModel {
        name: Set(name.to_string()),
        measurement_unit: Set(unit.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed ingredient")
    .id
}

pub fn new_recipe(name: &str, tags: &[TagId], ingredients: &[(i32, i32)]) -> NewRecipe {
    NewRecipe {
        name: name.to_string(),
        text: format!("How to cook {name}"),
        cooking_time: 15,
        image: PNG.to_string(),
        tags: tags.to_vec(),
        ingredients: ingredients
            .iter()
            .map(|&(ingredient_id, amount)| IngredientAmountInput {
                ingredient_id,
                amount,
            })
            .collect(),
    }
}

/// A small catalog plus two users.
pub struct Kitchen {
    pub alice: UserId,
    pub bob: UserId,
    pub breakfast: TagId,
    pub lunch: TagId,
    pub dinner: TagId,
    pub egg: i32,
    pub flour: i32,
    pub milk: i32,
    pub sugar: i32,
}

pub async fn kitchen(db: &DatabaseConnection) -> Kitchen {
    Kitchen {
        alice: seed_user(db, "alice").await,
        bob: seed_user(db, "bob").await,
        breakfast: seed_tag(db, "Breakfast", "breakfast").await,
        lunch: seed_tag(db, "Lunch", "lunch").await,
        dinner: seed_tag(db, "Dinner", "dinner").await,
        egg: seed_ingredient(db, "egg", "pcs").await,
        flour: seed_ingredient(db, "flour", "g").await,
        milk: seed_ingredient(db, "milk", "ml").await,
        sugar: seed_ingredient(db, "sugar", "g").await,
    }
}

/// Creates a recipe as `author` and returns its id.
pub async fn create_as(
    service: &Service,
    author: UserId,
    name: &str,
    tags: &[TagId],
    ingredients: &[(i32, i32)],
) -> RecipeId {
    service
        .create_recipe(Viewer::user(author), new_recipe(name, tags, ingredients))
        .await
        .expect("create recipe")
        .id
}
