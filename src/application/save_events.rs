//! Adapter between the platform's save hooks and the recomputation handler.
//!
//! The platform announces a save twice: once before the revision is stored
//! and once after. Both carry nearly the same payload; only the second one
//! is forwarded.

use std::sync::Arc;

use tracing::debug;

use crate::application::error::AppError;
use crate::application::opinions::{OpinionCountService, RecomputeOutcome};
use crate::domain::entities::ContentSaved;

#[derive(Debug, Clone)]
pub enum SaveHook {
    BeforeSave(ContentSaved),
    AfterSave(ContentSaved),
}

pub struct SaveEventAdapter {
    opinions: Arc<OpinionCountService>,
}

impl SaveEventAdapter {
    pub fn new(opinions: Arc<OpinionCountService>) -> Self {
        Self { opinions }
    }

    pub async fn dispatch(&self, hook: SaveHook) -> Result<RecomputeOutcome, AppError> {
        match hook {
            SaveHook::BeforeSave(event) => {
                debug!(page_id = ?event.page_id, title = %event.title, "Ignoring pre-save hook");
                Ok(RecomputeOutcome::default())
            }
            SaveHook::AfterSave(event) => self.opinions.on_content_saved(&event).await,
        }
    }
}
