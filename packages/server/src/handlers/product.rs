use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::entity::user::{ADMIN_ROLE, SUPER_USER_ROLE};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::product::*;
use crate::products::{ProductService, parse_product_id};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Products",
    operation_id = "createProduct",
    summary = "Create a new product",
    description = "Creates a product together with its images. Any authenticated user may create products; the caller is recorded as the owner. The slug is derived from the title when omitted.",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Slug already in use (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_product(&payload)?;

    let (attributes, images) = payload.into_parts();
    let product = ProductService::new(&state.db)
        .create(attributes, images, Some(auth_user.user_id))
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Products",
    operation_id = "listProducts",
    summary = "List products",
    description = "Returns one page of products with their image URLs. `limit` defaults to 10 and `offset` to 0.",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of products", body = Vec<ProductResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    validate_pagination(&query)?;
    let (limit, offset) = query.bounds();

    let products = ProductService::new(&state.db)
        .find_all(limit, offset)
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();

    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/{term}",
    tag = "Products",
    operation_id = "getProduct",
    summary = "Get a product by id, title or slug",
    description = "A UUID term is looked up by id. Any other term matches the title case-insensitively or the slug after lowercasing.",
    params(("term" = String, Path, description = "Product id, title or slug")),
    responses(
        (status = 200, description = "Product details", body = ProductResponse),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(term))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = ProductService::new(&state.db).find_one_plain(&term).await?;
    Ok(Json(product.into()))
}

#[utoipa::path(
    patch,
    path = "/{term}",
    tag = "Products",
    operation_id = "updateProduct",
    summary = "Update an existing product",
    description = "Partially updates a product using PATCH semantics. Supplying `images` replaces the full image list atomically. Requires the `admin` or `super-user` role.",
    params(("term" = String, Path, description = "Product id (UUID)")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Slug already in use (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(term))]
pub async fn update_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(term): Path<String>,
    AppJson(payload): AppJson<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    auth_user.require_role(&[ADMIN_ROLE, SUPER_USER_ROLE])?;
    let id = parse_product_id(&term)
        .ok_or_else(|| AppError::Validation("Product id must be a UUID".into()))?;
    validate_update_product(&payload)?;

    let (changes, images) = payload.into_parts();
    let product = ProductService::new(&state.db)
        .update(id, changes, images, auth_user.user_id)
        .await?;

    Ok(Json(product.into()))
}

#[utoipa::path(
    delete,
    path = "/{term}",
    tag = "Products",
    operation_id = "deleteProduct",
    summary = "Delete a product",
    description = "Deletes the product resolved from the term (id, title or slug) and all of its images. Requires the `admin` or `super-user` role.",
    params(("term" = String, Path, description = "Product id, title or slug")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(term))]
pub async fn delete_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(&[ADMIN_ROLE, SUPER_USER_ROLE])?;

    ProductService::new(&state.db).remove(&term).await?;
    Ok(StatusCode::NO_CONTENT)
}
