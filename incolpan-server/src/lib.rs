//! Incolpan Distribution Server
//!
//! HTTP JSON API for a bakery distribution operation: sellers, products,
//! daily orders and returns, dispatch slips, consolidated daily sales,
//! settlements, change adjustments and the crate loan ledger.
//!
//! # Module structure
//!
//! ```text
//! incolpan-server/src/
//! ├── core/          # Config, ServerState, Server
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── api/           # HTTP routes and handlers (one module per resource)
//! ├── services/      # Message bus (resource sync push)
//! ├── routes/        # Router assembly + tower-http middleware
//! └── utils/         # Errors, logging, result aliases
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export the common types
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger;

/// Load .env, ensure the work directory exists and initialize logging.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_dir = format!("{work_dir}/logs");
    std::fs::create_dir_all(&log_dir)?;
    utils::logger::init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        Some(&log_dir),
    );

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____                 __
   /  _/___  _________  / /___  ____ _____
   / // __ \/ ___/ __ \/ / __ \/ __ `/ __ \
 _/ // / / / /__/ /_/ / / /_/ / /_/ / / / /
/___/_/ /_/\___/\____/_/ .___/\__,_/_/ /_/
                      /_/
    "#
    );
}
