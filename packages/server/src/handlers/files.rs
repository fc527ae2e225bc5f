use std::path::PathBuf;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::config::StorageConfig;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::files::FileUploadResponse;
use crate::state::AppState;
use crate::utils::filename::{generate_image_name, image_extension, validate_flat_filename};

pub fn image_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(10 * 1024 * 1024) // 10 MB
}

fn product_images_dir(storage: &StorageConfig) -> PathBuf {
    storage.uploads_dir.join("products")
}

fn public_image_url(storage: &StorageConfig, name: &str) -> String {
    format!(
        "{}/api/v1/files/product/{}",
        storage.public_url.trim_end_matches('/'),
        name
    )
}

#[utoipa::path(
    post,
    path = "/product",
    tag = "Files",
    operation_id = "uploadProductImage",
    summary = "Upload a product image",
    description = "Stores the `file` multipart field under a generated name and returns the URL it is served from. Only jpg, jpeg, png and gif files are accepted.",
    request_body(content_type = "multipart/form-data", description = "Image upload"),
    responses(
        (status = 201, description = "Image stored", body = FileUploadResponse),
        (status = 400, description = "Missing or non-image file (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, multipart))]
pub async fn upload_product_image(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
        let extension =
            image_extension(&original).map_err(|e| AppError::Validation(e.message().into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
        upload = Some((extension, bytes));
        break;
    }

    let (extension, bytes) =
        upload.ok_or_else(|| AppError::Validation("Make sure that the file is an image".into()))?;

    let dir = product_images_dir(&state.config.storage);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create {}: {e}", dir.display())))?;

    let name = generate_image_name(&extension);
    let path = dir.join(&name);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write {}: {e}", path.display())))?;

    tracing::info!(name = %name, size = bytes.len(), "Stored product image");

    let secure_url = public_image_url(&state.config.storage, &name);
    Ok((StatusCode::CREATED, Json(FileUploadResponse { secure_url })))
}

#[utoipa::path(
    get,
    path = "/product/{image_name}",
    tag = "Files",
    operation_id = "getProductImage",
    summary = "Download a product image",
    params(("image_name" = String, Path, description = "Stored image name")),
    responses(
        (status = 200, description = "Image content", content_type = "application/octet-stream"),
        (status = 400, description = "Unknown image (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(image_name))]
pub async fn get_product_image(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> Result<Response, AppError> {
    let missing = || AppError::Validation(format!("No product found with image {image_name}"));

    let name = validate_flat_filename(&image_name).map_err(|_| missing())?;
    let path = product_images_dir(&state.config.storage).join(name);

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(missing()),
        Err(e) => {
            return Err(AppError::Internal(format!(
                "Failed to open {}: {e}",
                path.display()
            )));
        }
    };

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();
    let body = Body::from_stream(ReaderStream::new(file));

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}
