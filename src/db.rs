// src/db.rs
use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

use crate::error::AppResult;
use crate::models::{ResponseDraft, ResponseRow, TemplateDraft, TemplateRow};
use crate::store::{Connector, QuizStore};

const TEMPLATE_COLUMNS: &str = "id, title, description, welcome_title, welcome_subtitle, \
     questions, created_at, updated_at";

/// Connects straight to Postgres, one connection per invocation.
#[derive(Debug, Default, Clone)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, database_url: &str) -> AppResult<Box<dyn QuizStore>> {
        let conn = PgConnection::connect(database_url).await?;
        Ok(Box::new(PgStore::new(conn)))
    }
}

/// Auto-commit session: every statement commits on its own.
pub struct PgStore {
    conn: PgConnection,
}

impl PgStore {
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl QuizStore for PgStore {
    async fn latest_template(&mut self) -> AppResult<Option<TemplateRow>> {
        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM quiz_templates ORDER BY id DESC LIMIT 1");
        let row = sqlx::query_as::<_, TemplateRow>(&sql)
            .fetch_optional(&mut self.conn)
            .await?;
        Ok(row)
    }

    async fn latest_template_id(&mut self) -> AppResult<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM quiz_templates ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&mut self.conn)
        .await?;
        Ok(id)
    }

    async fn insert_template(&mut self, draft: &TemplateDraft) -> AppResult<TemplateRow> {
        let sql = format!(
            r#"
            INSERT INTO quiz_templates
                (title, description, welcome_title, welcome_subtitle, questions, name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, TemplateRow>(&sql)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.welcome_title)
            .bind(&draft.welcome_subtitle)
            .bind(&draft.questions)
            .bind(&draft.name)
            .fetch_one(&mut self.conn)
            .await?;
        Ok(row)
    }

    async fn update_template(
        &mut self,
        id: i32,
        draft: &TemplateDraft,
    ) -> AppResult<Option<TemplateRow>> {
        let sql = format!(
            r#"
            UPDATE quiz_templates
            SET title = $1,
                description = $2,
                welcome_title = $3,
                welcome_subtitle = $4,
                questions = $5,
                name = $6,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $7
            RETURNING {TEMPLATE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, TemplateRow>(&sql)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.welcome_title)
            .bind(&draft.welcome_subtitle)
            .bind(&draft.questions)
            .bind(&draft.name)
            .bind(id)
            .fetch_optional(&mut self.conn)
            .await?;
        Ok(row)
    }

    async fn delete_latest_template(&mut self) -> AppResult<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            DELETE FROM quiz_templates
            WHERE id IN (SELECT id FROM quiz_templates ORDER BY id DESC LIMIT 1)
            RETURNING id
            "#,
        )
        .fetch_optional(&mut self.conn)
        .await?;
        Ok(id)
    }

    async fn insert_response(&mut self, draft: &ResponseDraft) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO quiz_responses
                (template_id, contact_name, contact_phone, contact_email, answers, name, phone, email)
            VALUES ($1, $2, $3, $4, $5, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(draft.template_id)
        .bind(&draft.name)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.answers)
        .fetch_one(&mut self.conn)
        .await?;
        Ok(id)
    }

    async fn list_responses(&mut self) -> AppResult<Vec<ResponseRow>> {
        let rows = sqlx::query_as::<_, ResponseRow>(
            r#"
            SELECT id,
                   template_id,
                   COALESCE(contact_name, name) AS name,
                   COALESCE(contact_phone, phone) AS phone,
                   COALESCE(contact_email, email) AS email,
                   answers,
                   completed_at
            FROM quiz_responses
            ORDER BY completed_at DESC, id DESC
            "#,
        )
        .fetch_all(&mut self.conn)
        .await?;
        Ok(rows)
    }

    async fn close(self: Box<Self>) -> AppResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}
