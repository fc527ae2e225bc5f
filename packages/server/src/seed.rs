use chrono::Utc;
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::entity::user;
use crate::models::seed::SeedResponse;
use crate::products::{NewProduct, ProductService, ServiceError};
use crate::utils::hash;

struct DemoProduct {
    title: &'static str,
    price: f64,
    description: &'static str,
    slug: &'static str,
    stock: i32,
    sizes: &'static [&'static str],
    gender: &'static str,
    tags: &'static [&'static str],
    images: &'static [&'static str],
}

impl DemoProduct {
    fn to_parts(&self) -> (NewProduct, Vec<String>) {
        let owned = |values: &[&str]| values.iter().map(|v| ToString::to_string(v)).collect();
        let attributes = NewProduct {
            title: self.title.to_string(),
            price: self.price,
            description: Some(self.description.to_string()),
            slug: Some(self.slug.to_string()),
            stock: self.stock,
            sizes: owned(self.sizes),
            gender: self.gender.to_string(),
            tags: owned(self.tags),
        };
        (attributes, owned(self.images))
    }
}

const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        title: "Men's Chill Crew Neck Sweatshirt",
        price: 75.0,
        description: "Introducing the Tesla Chill Collection. The Men's Chill Crew Neck Sweatshirt has a premium, heavyweight exterior and soft fleece interior for comfort in any season.",
        slug: "mens_chill_crew_neck_sweatshirt",
        stock: 7,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        gender: "men",
        tags: &["sweatshirt"],
        images: &["1740176-00-A_0_2000.jpg", "1740176-00-A_1.jpg"],
    },
    DemoProduct {
        title: "Men's Quilted Shirt Jacket",
        price: 200.0,
        description: "The Men's Quilted Shirt Jacket features a uniquely fit, quilted design for warmth and mobility in cold weather seasons.",
        slug: "men_quilted_shirt_jacket",
        stock: 5,
        sizes: &["XS", "S", "M", "XL", "XXL"],
        gender: "men",
        tags: &["jacket"],
        images: &["1740507-00-A_0_2000.jpg", "1740507-00-A_1.jpg"],
    },
    DemoProduct {
        title: "Women's Cropped Puffer Jacket",
        price: 225.0,
        description: "The Women's Cropped Puffer Jacket features a uniquely cropped silhouette for the perfect, modern style while on the go.",
        slug: "women_cropped_puffer_jacket",
        stock: 85,
        sizes: &["XS", "S", "M"],
        gender: "women",
        tags: &["hoodie"],
        images: &["1740535-00-A_0_2000.jpg", "1740535-00-A_1.jpg"],
    },
    DemoProduct {
        title: "Kids Cybertruck Long Sleeve Tee",
        price: 30.0,
        description: "The Kids Cybertruck Long Sleeve Tee features a relaxed fit with a Cybertruck graphic on the front.",
        slug: "kids_cybertruck_long_sleeve_tee",
        stock: 10,
        sizes: &["XS", "S", "M"],
        gender: "kid",
        tags: &["shirt"],
        images: &["1742694-00-A_1_2000.jpg", "1742694-00-A_3.jpg"],
    },
    DemoProduct {
        title: "Chill Pullover Hoodie",
        price: 130.0,
        description: "The Chill Pullover Hoodie has a premium, heavyweight exterior and soft fleece interior.",
        slug: "chill_pullover_hoodie",
        stock: 10,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        gender: "unisex",
        tags: &["hoodie"],
        images: &["1740245-00-A_0_2000.jpg", "1740245-00-A_1.jpg"],
    },
];

/// Wipe the catalog and insert the demo products, owned by `owner`.
pub async fn reset_catalog<C>(db: &C, owner: Uuid) -> Result<SeedResponse, ServiceError>
where
    C: ConnectionTrait + TransactionTrait<Transaction = DatabaseTransaction>,
{
    let service = ProductService::new(db);
    let removed = service.remove_all().await?;

    let mut inserted = 0u64;
    for demo in DEMO_PRODUCTS {
        let (attributes, images) = demo.to_parts();
        service.create(attributes, images, Some(owner)).await?;
        inserted += 1;
    }

    info!("Seeded {} demo products", inserted);
    Ok(SeedResponse { removed, inserted })
}

/// Create the configured admin account if it does not exist yet.
pub async fn ensure_admin(db: &DatabaseConnection, config: &AuthConfig) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    let hash = hash::hash_password(password)
        .map_err(|e| anyhow::anyhow!("Password hash error: {e}"))?;

    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.trim().to_lowercase()),
        password: Set(hash),
        full_name: Set("Administrator".to_string()),
        is_active: Set(true),
        roles: Set(vec![user::ADMIN_ROLE.to_string()].into()),
        created_at: Set(Utc::now()),
    };

    let result = user::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(user::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(0) | Err(DbErr::RecordNotInserted) => {}
        Ok(_) => info!("Created admin account {}", email),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
