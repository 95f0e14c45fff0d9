pub mod app;
pub mod avatar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod ui;
pub mod views;

pub use app::router;
pub use config::Config;
pub use errors::{AppError, DiaryError};
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{Change, DiaryStore};
