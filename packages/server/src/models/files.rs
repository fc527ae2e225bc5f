use serde::{Deserialize, Serialize};

/// Response for a successful image upload.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct FileUploadResponse {
    /// Public URL under which the stored image is served.
    #[schema(example = "http://localhost:3000/api/v1/files/product/0b9c0d0e-8f4a-4c65-9a4e-1d7f2b8e5a11.png")]
    pub secure_url: String,
}
