use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;
use uuid::Uuid;

use super::images::build_images;
use super::{
    NewProduct, Product, ProductChanges, ProductWithImages, ServiceError, normalize_slug,
    parse_product_id,
};
use crate::entity::{product, product_image};

/// Create, read, update and delete for the product aggregate.
///
/// Holds only a borrowed connection; construct one per request.
pub struct ProductService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C> ProductService<'a, C>
where
    C: ConnectionTrait + TransactionTrait<Transaction = DatabaseTransaction>,
{
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Persist a product and its images as one unit of work.
    ///
    /// The returned images are exactly `images`, in the given order.
    pub async fn create(
        &self,
        attributes: NewProduct,
        images: Vec<String>,
        owner: Option<Uuid>,
    ) -> Result<Product, ServiceError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let slug = normalize_slug(attributes.slug.as_deref().unwrap_or(&attributes.title));

        let new_product = product::ActiveModel {
            id: Set(id),
            title: Set(attributes.title),
            price: Set(attributes.price),
            description: Set(attributes.description),
            slug: Set(slug),
            stock: Set(attributes.stock),
            sizes: Set(attributes.sizes.into()),
            gender: Set(attributes.gender),
            tags: Set(attributes.tags.into()),
            user_id: Set(owner),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let new_images = build_images(id, &images);

        let txn = self.conn.begin().await?;
        let outcome = insert_aggregate(&txn, new_product, new_images).await;
        let model = settle(txn, outcome).await?;

        Ok(Product::from_parts(model, images))
    }

    /// Resolve `term` as a surrogate id if it is a hyphenated UUID, otherwise
    /// as a title or slug. Images are loaded with the product.
    pub async fn find_one(&self, term: &str) -> Result<ProductWithImages, ServiceError> {
        let found = match parse_product_id(term) {
            Some(id) => product::Entity::find_by_id(id).one(self.conn).await?,
            None => self.find_by_natural_key(term).await?,
        };
        let product = found
            .ok_or_else(|| ServiceError::NotFound(format!("Product with term '{term}' not found")))?;

        let images = product
            .find_related(product_image::Entity)
            .order_by_asc(product_image::Column::Position)
            .all(self.conn)
            .await?;

        Ok(ProductWithImages { product, images })
    }

    /// [`find_one`](Self::find_one) with images reduced to URLs.
    pub async fn find_one_plain(&self, term: &str) -> Result<Product, ServiceError> {
        Ok(self.find_one(term).await?.flatten())
    }

    /// One page of products in storage order.
    pub async fn find_all(&self, limit: u64, offset: u64) -> Result<Vec<Product>, ServiceError> {
        let products = product::Entity::find()
            .limit(Some(limit))
            .offset(Some(offset))
            .all(self.conn)
            .await?;
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let images = products
            .load_many(product_image::Entity, self.conn)
            .await?;

        Ok(products
            .into_iter()
            .zip(images)
            .map(|(product, images)| ProductWithImages { product, images }.flatten())
            .collect())
    }

    /// Merge `changes` onto the stored product and, when `images` is given,
    /// replace the whole image list. All writes commit or roll back together.
    pub async fn update(
        &self,
        id: Uuid,
        changes: ProductChanges,
        images: Option<Vec<String>>,
        owner: Uuid,
    ) -> Result<Product, ServiceError> {
        let existing = product::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with id '{id}' not found")))?;

        let mut candidate: product::ActiveModel = existing.into();
        changes.apply(&mut candidate);

        let txn = self.conn.begin().await?;
        let outcome = replace_aggregate(&txn, id, candidate, images, owner).await;
        settle(txn, outcome).await?;

        self.find_one_plain(&id.to_string()).await
    }

    /// Delete the product matching `term`. Image rows go with it via the
    /// foreign key cascade.
    pub async fn remove(&self, term: &str) -> Result<(), ServiceError> {
        let found = self.find_one(term).await?;
        product::Entity::delete_by_id(found.product.id)
            .exec(self.conn)
            .await?;
        Ok(())
    }

    /// Delete every product. Returns the number of product rows removed.
    pub async fn remove_all(&self) -> Result<u64, ServiceError> {
        let result = product::Entity::delete_many().exec(self.conn).await?;
        tracing::info!("Removed {} products", result.rows_affected);
        Ok(result.rows_affected)
    }

    async fn find_by_natural_key(&self, term: &str) -> Result<Option<product::Model>, ServiceError> {
        let mut matches = product::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::upper(Expr::col(product::Column::Title)))
                            .eq(term.to_uppercase()),
                    )
                    .add(product::Column::Slug.eq(term.to_lowercase())),
            )
            .limit(Some(2))
            .all(self.conn)
            .await?;

        if matches.len() > 1 {
            tracing::error!(term, "Natural key matched more than one product");
            return Err(ServiceError::Internal);
        }
        Ok(matches.pop())
    }
}

async fn insert_aggregate(
    txn: &DatabaseTransaction,
    new_product: product::ActiveModel,
    new_images: Vec<product_image::ActiveModel>,
) -> Result<product::Model, DbErr> {
    let model = new_product.insert(txn).await?;
    if !new_images.is_empty() {
        product_image::Entity::insert_many(new_images)
            .exec(txn)
            .await?;
    }
    Ok(model)
}

async fn replace_aggregate(
    txn: &DatabaseTransaction,
    id: Uuid,
    mut candidate: product::ActiveModel,
    images: Option<Vec<String>>,
    owner: Uuid,
) -> Result<(), DbErr> {
    if images.is_some() {
        product_image::Entity::delete_many()
            .filter(product_image::Column::ProductId.eq(id))
            .exec(txn)
            .await?;
    }

    candidate.user_id = Set(Some(owner));
    candidate.updated_at = Set(Utc::now());
    candidate.update(txn).await?;

    if let Some(urls) = images {
        let new_images = build_images(id, &urls);
        if !new_images.is_empty() {
            product_image::Entity::insert_many(new_images)
                .exec(txn)
                .await?;
        }
    }
    Ok(())
}

/// Commit on success, roll back on failure. Consumes the transaction either way.
async fn settle<T>(txn: DatabaseTransaction, outcome: Result<T, DbErr>) -> Result<T, ServiceError> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(error = ?rollback_err, "Transaction rollback failed: {rollback_err}");
            }
            Err(err.into())
        }
    }
}
