pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod uploads;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::{start_ocr_worker, AppState};
pub use uploads::UploadStore;
