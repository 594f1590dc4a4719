use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(ColumnDef::new(Users::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Users::Username).string_len(150).not_null())
                    .col(ColumnDef::new(Users::FirstName).string_len(150).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(150).not_null())
                    .col(ColumnDef::new(Users::Avatar).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(pk(Tags::Id))
                    .col(ColumnDef::new(Tags::Name).string_len(32).not_null())
                    .col(ColumnDef::new(Tags::Slug).string_len(32).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(pk(Ingredients::Id))
                    .col(ColumnDef::new(Ingredients::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Ingredients::MeasurementUnit)
                            .string_len(64)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(pk(Recipes::Id))
                    .col(ColumnDef::new(Recipes::AuthorId).integer().not_null())
                    .col(ColumnDef::new(Recipes::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Recipes::Text).text().not_null())
                    .col(ColumnDef::new(Recipes::Image).string().not_null())
                    .col(
                        ColumnDef::new(Recipes::CookingTime)
                            .integer()
                            .not_null()
                            .check(Expr::col(Recipes::CookingTime).gte(1)),
                    )
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut cascade(
                        "fk_recipes_author",
                        (Recipes::Table, Recipes::AuthorId),
                        (Users::Table, Users::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeTags::Table)
                    .if_not_exists()
                    .col(pk(RecipeTags::Id))
                    .col(ColumnDef::new(RecipeTags::RecipeId).integer().not_null())
                    .col(ColumnDef::new(RecipeTags::TagId).integer().not_null())
                    .foreign_key(&mut cascade(
                        "fk_recipe_tags_recipe",
                        (RecipeTags::Table, RecipeTags::RecipeId),
                        (Recipes::Table, Recipes::Id),
                    ))
                    .foreign_key(&mut cascade(
                        "fk_recipe_tags_tag",
                        (RecipeTags::Table, RecipeTags::TagId),
                        (Tags::Table, Tags::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IngredientAmounts::Table)
                    .if_not_exists()
                    .col(pk(IngredientAmounts::Id))
                    .col(
                        ColumnDef::new(IngredientAmounts::RecipeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IngredientAmounts::IngredientId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IngredientAmounts::Amount)
                            .integer()
                            .not_null()
                            .check(Expr::col(IngredientAmounts::Amount).gte(1)),
                    )
                    .foreign_key(&mut cascade(
                        "fk_ingredient_amounts_recipe",
                        (IngredientAmounts::Table, IngredientAmounts::RecipeId),
                        (Recipes::Table, Recipes::Id),
                    ))
                    .foreign_key(&mut cascade(
                        "fk_ingredient_amounts_ingredient",
                        (IngredientAmounts::Table, IngredientAmounts::IngredientId),
                        (Ingredients::Table, Ingredients::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Favorites::Table)
                    .if_not_exists()
                    .col(pk(Favorites::Id))
                    .col(ColumnDef::new(Favorites::UserId).integer().not_null())
                    .col(ColumnDef::new(Favorites::RecipeId).integer().not_null())
                    .foreign_key(&mut cascade(
                        "fk_favorites_user",
                        (Favorites::Table, Favorites::UserId),
                        (Users::Table, Users::Id),
                    ))
                    .foreign_key(&mut cascade(
                        "fk_favorites_recipe",
                        (Favorites::Table, Favorites::RecipeId),
                        (Recipes::Table, Recipes::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShoppingCarts::Table)
                    .if_not_exists()
                    .col(pk(ShoppingCarts::Id))
                    .col(ColumnDef::new(ShoppingCarts::UserId).integer().not_null())
                    .col(ColumnDef::new(ShoppingCarts::RecipeId).integer().not_null())
                    .foreign_key(&mut cascade(
                        "fk_shopping_carts_user",
                        (ShoppingCarts::Table, ShoppingCarts::UserId),
                        (Users::Table, Users::Id),
                    ))
                    .foreign_key(&mut cascade(
                        "fk_shopping_carts_recipe",
                        (ShoppingCarts::Table, ShoppingCarts::RecipeId),
                        (Recipes::Table, Recipes::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Follows::Table)
                    .if_not_exists()
                    .col(pk(Follows::Id))
                    .col(ColumnDef::new(Follows::UserId).integer().not_null())
                    .col(ColumnDef::new(Follows::AuthorId).integer().not_null())
                    .check(Expr::col(Follows::UserId).ne(Expr::col(Follows::AuthorId)))
                    .foreign_key(&mut cascade(
                        "fk_follows_user",
                        (Follows::Table, Follows::UserId),
                        (Users::Table, Users::Id),
                    ))
                    .foreign_key(&mut cascade(
                        "fk_follows_author",
                        (Follows::Table, Follows::AuthorId),
                        (Users::Table, Users::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        let unique_indexes: Vec<IndexCreateStatement> = vec![
            unique("ux_users_email", Users::Table, &[Users::Email]),
            unique("ux_users_username", Users::Table, &[Users::Username]),
            unique("ux_tags_name", Tags::Table, &[Tags::Name]),
            unique("ux_tags_slug", Tags::Table, &[Tags::Slug]),
            unique(
                "ux_ingredients_name_unit",
                Ingredients::Table,
                &[Ingredients::Name, Ingredients::MeasurementUnit],
            ),
            unique(
                "ux_recipe_tags_pair",
                RecipeTags::Table,
                &[RecipeTags::RecipeId, RecipeTags::TagId],
            ),
            unique(
                "ux_ingredient_amounts_pair",
                IngredientAmounts::Table,
                &[IngredientAmounts::RecipeId, IngredientAmounts::IngredientId],
            ),
            unique(
                "ux_favorites_pair",
                Favorites::Table,
                &[Favorites::UserId, Favorites::RecipeId],
            ),
            unique(
                "ux_shopping_carts_pair",
                ShoppingCarts::Table,
                &[ShoppingCarts::UserId, ShoppingCarts::RecipeId],
            ),
            unique(
                "ux_follows_pair",
                Follows::Table,
                &[Follows::UserId, Follows::AuthorId],
            ),
        ];
        for index in unique_indexes {
            manager.create_index(index).await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("ix_recipes_created_at")
                    .table(Recipes::Table)
                    .col(Recipes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Follows::Table.into_iden(),
            ShoppingCarts::Table.into_iden(),
            Favorites::Table.into_iden(),
            IngredientAmounts::Table.into_iden(),
            RecipeTags::Table.into_iden(),
            Recipes::Table.into_iden(),
            Ingredients::Table.into_iden(),
            Tags::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

fn pk<T: IntoIden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn cascade<T, C, RT, RC>(name: &str, from: (T, C), to: (RT, RC)) -> ForeignKeyCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
    RT: IntoIden + 'static,
    RC: IntoIden + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(from.0, from.1)
        .to(to.0, to.1)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

fn unique<T, C>(name: &str, table: T, cols: &[C]) -> IndexCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + Copy + 'static,
{
    let mut index = Index::create();
    index.name(name).table(table).unique();
    for col in cols {
        index.col(*col);
    }
    index.to_owned()
}

#[derive(DeriveIden, Clone, Copy)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    FirstName,
    LastName,
    Avatar,
}

#[derive(DeriveIden, Clone, Copy)]
enum Tags {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(DeriveIden, Clone, Copy)]
enum Ingredients {
    Table,
    Id,
    Name,
    MeasurementUnit,
}

#[derive(DeriveIden, Clone, Copy)]
enum Recipes {
    Table,
    Id,
    AuthorId,
    Name,
    Text,
    Image,
    CookingTime,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum RecipeTags {
    Table,
    Id,
    RecipeId,
    TagId,
}

#[derive(DeriveIden, Clone, Copy)]
enum IngredientAmounts {
    Table,
    Id,
    RecipeId,
    IngredientId,
    Amount,
}

#[derive(DeriveIden, Clone, Copy)]
enum Favorites {
    Table,
    Id,
    UserId,
    RecipeId,
}

#[derive(DeriveIden, Clone, Copy)]
enum ShoppingCarts {
    Table,
    Id,
    UserId,
    RecipeId,
}

#[derive(DeriveIden, Clone, Copy)]
enum Follows {
    Table,
    Id,
    UserId,
    AuthorId,
}
