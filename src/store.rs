// src/store.rs
use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{ResponseDraft, ResponseRow, TemplateDraft, TemplateRow};

/// One open database session. "Current template" always means the row with
/// the highest id.
#[async_trait]
pub trait QuizStore: Send {
    async fn latest_template(&mut self) -> AppResult<Option<TemplateRow>>;
    async fn latest_template_id(&mut self) -> AppResult<Option<i32>>;
    async fn insert_template(&mut self, draft: &TemplateDraft) -> AppResult<TemplateRow>;
    async fn update_template(
        &mut self,
        id: i32,
        draft: &TemplateDraft,
    ) -> AppResult<Option<TemplateRow>>;
    async fn delete_latest_template(&mut self) -> AppResult<Option<i32>>;
    async fn insert_response(&mut self, draft: &ResponseDraft) -> AppResult<i32>;
    /// Most recently completed first.
    async fn list_responses(&mut self) -> AppResult<Vec<ResponseRow>>;
    async fn close(self: Box<Self>) -> AppResult<()>;
}

/// Opens a fresh session per invocation.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, database_url: &str) -> AppResult<Box<dyn QuizStore>>;
}
