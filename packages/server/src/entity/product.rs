use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StringList;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    /// UUIDv4 primary key, generated on create.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,
    pub price: f64,
    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,

    /// Natural lookup key. Lowercase, no spaces or apostrophes.
    #[sea_orm(unique)]
    pub slug: String,

    pub stock: i32,
    #[sea_orm(column_type = "Json")]
    pub sizes: StringList,
    pub gender: String,
    #[sea_orm(column_type = "Json")]
    pub tags: StringList,

    /// Principal that last created or edited the product.
    pub user_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "SetNull")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub images: HasMany<super::product_image::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
