pub mod app;
pub mod chart;
pub mod config;
pub mod errors;
pub mod exchange;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod render;
pub mod source;
pub mod state;
pub mod store;
pub mod ui;
pub mod view;
pub mod viewer;

pub use app::router;
pub use config::Config;
pub use source::DataSource;
pub use state::AppState;
