#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quiz_api::{
    error::AppResult,
    models::{ApiRequest, ResponseDraft, ResponseRow, TemplateDraft, TemplateRow},
    store::{Connector, QuizStore},
};

#[derive(Default)]
pub struct Tables {
    pub templates: Vec<TemplateRow>,
    pub responses: Vec<ResponseRow>,
    next_template_id: i32,
    next_response_id: i32,
    pub opened: usize,
    pub closed: usize,
}

/// Shared in-memory database; every `connect` hands out a session over it.
#[derive(Clone, Default)]
pub struct InMemoryConnector {
    pub tables: Arc<RwLock<Tables>>,
    pub refuse_connections: bool,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self {
            refuse_connections: true,
            ..Self::default()
        }
    }

    pub async fn seed_response(&self, mut row: ResponseRow) {
        let mut tables = self.tables.write().await;
        tables.next_response_id += 1;
        row.id = tables.next_response_id;
        tables.responses.push(row);
    }

    pub async fn open_connections(&self) -> usize {
        let tables = self.tables.read().await;
        tables.opened - tables.closed
    }

    pub async fn opened(&self) -> usize {
        self.tables.read().await.opened
    }
}

#[async_trait]
impl Connector for InMemoryConnector {
    async fn connect(&self, _database_url: &str) -> AppResult<Box<dyn QuizStore>> {
        if self.refuse_connections {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        self.tables.write().await.opened += 1;
        Ok(Box::new(InMemoryStore {
            tables: self.tables.clone(),
        }))
    }
}

struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl QuizStore for InMemoryStore {
    async fn latest_template(&mut self) -> AppResult<Option<TemplateRow>> {
        let tables = self.tables.read().await;
        Ok(tables.templates.iter().max_by_key(|t| t.id).cloned())
    }

    async fn latest_template_id(&mut self) -> AppResult<Option<i32>> {
        let tables = self.tables.read().await;
        Ok(tables.templates.iter().map(|t| t.id).max())
    }

    async fn insert_template(&mut self, draft: &TemplateDraft) -> AppResult<TemplateRow> {
        let mut tables = self.tables.write().await;
        tables.next_template_id += 1;
        let now = Utc::now();
        let row = TemplateRow {
            id: tables.next_template_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            welcome_title: draft.welcome_title.clone(),
            welcome_subtitle: draft.welcome_subtitle.clone(),
            questions: draft.questions.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        tables.templates.push(row.clone());
        Ok(row)
    }

    async fn update_template(
        &mut self,
        id: i32,
        draft: &TemplateDraft,
    ) -> AppResult<Option<TemplateRow>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.templates.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        row.title = draft.title.clone();
        row.description = draft.description.clone();
        row.welcome_title = draft.welcome_title.clone();
        row.welcome_subtitle = draft.welcome_subtitle.clone();
        row.questions = draft.questions.clone();
        row.updated_at = Some(Utc::now());
        Ok(Some(row.clone()))
    }

    async fn delete_latest_template(&mut self) -> AppResult<Option<i32>> {
        let mut tables = self.tables.write().await;
        let Some(id) = tables.templates.iter().map(|t| t.id).max() else {
            return Ok(None);
        };
        tables.templates.retain(|t| t.id != id);
        Ok(Some(id))
    }

    async fn insert_response(&mut self, draft: &ResponseDraft) -> AppResult<i32> {
        let mut tables = self.tables.write().await;
        tables.next_response_id += 1;
        let id = tables.next_response_id;
        tables.responses.push(ResponseRow {
            id,
            template_id: draft.template_id,
            name: Some(draft.name.clone()),
            phone: Some(draft.phone.clone()),
            email: Some(draft.email.clone()),
            answers: Some(draft.answers.clone()),
            completed_at: Some(Utc::now()),
        });
        Ok(id)
    }

    async fn list_responses(&mut self) -> AppResult<Vec<ResponseRow>> {
        let tables = self.tables.read().await;
        let mut rows = tables.responses.clone();
        // Postgres puts NULL first in a descending sort
        rows.sort_by(|a, b| {
            let by_completion = match (a.completed_at, b.completed_at) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => y.cmp(&x),
            };
            by_completion.then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn close(self: Box<Self>) -> AppResult<()> {
        self.tables.write().await.closed += 1;
        Ok(())
    }
}

pub fn event(method: &str, path: &str, body: Option<&str>) -> ApiRequest {
    ApiRequest {
        http_method: Some(method.to_string()),
        path: Some(path.to_string()),
        body: body.map(str::to_string),
        ..ApiRequest::default()
    }
}
