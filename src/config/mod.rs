// Environment-driven configuration and startup routines

pub mod app;
pub mod bootstrap;
pub mod database;

pub use app::{AppConfig, BootstrapConfig, SmtpConfig};
pub use bootstrap::create_initial_admin;
pub use database::{run_migrations, DatabaseConfig};
