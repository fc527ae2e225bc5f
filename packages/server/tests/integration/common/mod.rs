use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use serde_json::Value;
use tempfile::TempDir;
use uuid::Uuid;

use shop_server::config::{
    AppConfig, AppSection, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig,
};
use shop_server::entity::{product, product_image, user};
use shop_server::state::AppState;
use shop_server::utils::{hash, jwt};

pub const TEST_PASSWORD: &str = "Abc123";

pub mod routes {
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const CHECK_STATUS: &str = "/api/v1/auth/check-status";
    pub const PRODUCTS: &str = "/api/v1/products";
    pub const PRODUCT_IMAGES: &str = "/api/v1/files/product";
    pub const SEED: &str = "/api/v1/seed";

    pub fn product(term: &str) -> String {
        format!("/api/v1/products/{term}")
    }

    pub fn product_image(name: &str) -> String {
        format!("/api/v1/files/product/{name}")
    }
}

/// Fresh in-memory database with the schema synced.
///
/// A single pooled connection keeps every query on the same in-memory file.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    shop_server::database::connect_with(opts)
        .await
        .expect("Failed to initialize test database")
}

/// Insert an active user directly, bypassing registration.
pub async fn insert_user(db: &DatabaseConnection, email: &str, roles: &[&str]) -> user::Model {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password: Set(hash::hash_password(TEST_PASSWORD).expect("hash password")),
        full_name: Set("Test User".to_string()),
        is_active: Set(true),
        roles: Set(roles
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .into()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn product_count(db: &DatabaseConnection) -> u64 {
    product::Entity::find().count(db).await.expect("count products")
}

pub async fn image_count(db: &DatabaseConnection) -> u64 {
    product_image::Entity::find()
        .count(db)
        .await
        .expect("count images")
}

pub async fn image_count_for(db: &DatabaseConnection, product_id: Uuid) -> u64 {
    product_image::Entity::find()
        .filter(product_image::Column::ProductId.eq(product_id))
        .count(db)
        .await
        .expect("count images")
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    _uploads: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_in("test").await
    }

    /// Spawn with `app.environment` set to `environment`.
    pub async fn spawn_in(environment: &str) -> Self {
        let db = test_db().await;
        let uploads = tempfile::tempdir().expect("Failed to create uploads dir");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        let config = Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_hours: 1,
                admin_email: None,
                admin_password: None,
            },
            storage: StorageConfig {
                uploads_dir: uploads.path().to_path_buf(),
                public_url: format!("http://{addr}"),
            },
            app: AppSection {
                environment: environment.to_string(),
            },
        });

        let state = AppState {
            db: db.clone(),
            config: config.clone(),
        };
        let app = shop_server::build_router(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            config,
            _uploads: uploads,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn product_images_dir(&self) -> PathBuf {
        self.config.storage.uploads_dir.join("products")
    }

    /// Insert a user with `roles` and return a signed token for it.
    pub async fn create_user_with_roles(&self, email: &str, roles: &[&str]) -> String {
        let user = insert_user(&self.db, email, roles).await;
        jwt::sign(&self.config.auth, &user).expect("sign token")
    }

    pub async fn admin_token(&self) -> String {
        self.create_user_with_roles("admin@shop.test", &[user::ADMIN_ROLE])
            .await
    }

    pub async fn user_token(&self) -> String {
        self.create_user_with_roles("user@shop.test", &[user::DEFAULT_ROLE])
            .await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// GET returning raw bytes and the `Content-Type` header.
    pub async fn get_bytes(&self, path: &str) -> (u16, Option<String>, Vec<u8>) {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.bytes().await.expect("Failed to read body").to_vec();
        (status, content_type, bytes)
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn upload_with_token(
        &self,
        path: &str,
        file_name: &str,
        file_bytes: Vec<u8>,
        token: &str,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Create a product via the API and return the response body.
    pub async fn create_product(&self, token: &str, title: &str, images: &[&str]) -> Value {
        let res = self
            .post_with_token(
                routes::PRODUCTS,
                &serde_json::json!({
                    "title": title,
                    "price": 25.5,
                    "sizes": ["S", "M"],
                    "gender": "unisex",
                    "tags": ["shirt"],
                    "images": images,
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_product failed: {}", res.text);
        res.body
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    /// Extract the `id` field as a string.
    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .unwrap_or_else(|| panic!("Response should contain an id: {}", self.text))
            .to_string()
    }
}
