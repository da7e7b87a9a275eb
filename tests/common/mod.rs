// SPDX-License-Identifier: MIT

use postboard::config::Config;
use postboard::db::MongoDb;
use postboard::routes::create_router;
use postboard::AppState;
use std::sync::Arc;

/// Check if a test MongoDB is available via environment variable.
#[allow(dead_code)]
pub fn mongo_available() -> bool {
    std::env::var("MONGODB_URI").is_ok()
}

/// Skip test with message if no MongoDB is available.
#[macro_export]
macro_rules! require_mongo {
    () => {
        if !crate::common::mongo_available() {
            eprintln!("⚠️  Skipping: MONGODB_URI not set");
            return;
        }
    };
}

/// Connect to the test MongoDB, using a database name unique to this
/// process so parallel test runs do not interfere.
#[allow(dead_code)]
pub async fn test_db() -> MongoDb {
    let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let db_name = format!("postboard_test_{}", std::process::id());
    MongoDb::connect(&uri, &db_name)
        .await
        .expect("Failed to connect to test MongoDB")
}

/// Build app state over a database handle, keeping the handle for
/// direct document inspection.
#[allow(dead_code)]
pub fn state_with(db: MongoDb) -> Arc<AppState> {
    let config = Config::default();
    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload dir");
    Arc::new(AppState::new(config, db))
}

/// Create a test app with an offline mock database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let db = MongoDb::new_mock();
    let state = Arc::new(AppState::new(config, db));

    (create_router(state.clone()), state)
}

/// Create a test app backed by a real MongoDB (gated on MONGODB_URI).
#[allow(dead_code)]
pub async fn create_mongo_app() -> (axum::Router, Arc<AppState>) {
    let state = state_with(test_db().await);
    (create_router(state.clone()), state)
}

/// Unique email per test run.
#[allow(dead_code)]
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, uuid::Uuid::new_v4())
}
