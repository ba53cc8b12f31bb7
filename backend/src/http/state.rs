//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::scheduler::TimetableGenerator;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Shared generator; owns the per-department locks.
    pub generator: Arc<TimetableGenerator>,
}

impl AppState {
    /// Create application state with the default generator configuration.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            generator: Arc::new(TimetableGenerator::default()),
        }
    }

    /// Create application state with a custom generator.
    pub fn with_generator(repository: Arc<dyn FullRepository>, generator: TimetableGenerator) -> Self {
        Self {
            repository,
            generator: Arc::new(generator),
        }
    }
}
