use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::content::ContentProvider;
use crate::error::AppServicesError;
use crate::progress_store::ProgressStore;

/// Assembles the services the presentation layer talks to.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressStore>,
    content: Arc<ContentProvider>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        content: ContentProvider,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, content))
    }

    /// Build services over a volatile in-memory slot.
    #[must_use]
    pub fn in_memory(clock: Clock, content: ContentProvider) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, content)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, content: ContentProvider) -> Self {
        Self {
            progress: Arc::new(ProgressStore::new(clock, Arc::clone(&storage.progress))),
            content: Arc::new(content),
        }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn content(&self) -> Arc<ContentProvider> {
        Arc::clone(&self.content)
    }
}
