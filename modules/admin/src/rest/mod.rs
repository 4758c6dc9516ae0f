pub mod banners;
pub mod console;
pub mod upload;

use crate::services::media::MediaClient;
use framework::sqlx::DatabaseProcessor;

/// Shared state for the back-office routers.
#[derive(Clone)]
pub struct AdminRest {
    pub db: DatabaseProcessor,
    pub media: MediaClient,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct MessageResponse {
    pub message: &'static str,
}
