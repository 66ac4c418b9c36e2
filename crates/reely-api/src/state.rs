//! Application state shared by all handlers.

use crate::pipeline::UploadPipeline;
use reely_core::Config;
use reely_db::VideoRepository;
use sqlx::PgPool;

/// Main application state: configuration, repositories, and the upload
/// pipeline. Cloned freely; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub videos: VideoRepository,
    pub pipeline: UploadPipeline,
    pub config: Config,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
