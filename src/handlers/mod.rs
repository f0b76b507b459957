pub mod diagnostics;
pub mod health;
pub mod images;
pub mod pages;

use axum::http::Uri;

use crate::error::ApiError;

pub use diagnostics::test_connection;
pub use health::health;
pub use images::proxy_image;
pub use pages::{index, test_dropdown};

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
