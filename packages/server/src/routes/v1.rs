use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/files", file_routes())
        .nest("/seed", seed_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::check_status))
}

fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::product::list_products,
            handlers::product::create_product
        ))
        .routes(routes!(
            handlers::product::get_product,
            handlers::product::update_product,
            handlers::product::delete_product
        ))
}

fn file_routes() -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::files::upload_product_image))
        .layer(handlers::files::image_upload_body_limit());

    OpenApiRouter::new()
        .routes(routes!(handlers::files::get_product_image))
        .merge(upload)
}

fn seed_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::seed::run_seed))
}
