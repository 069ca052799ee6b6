//! Database repository for CRUD operations.
//!
//! No business logic beyond filtering and ordering lives here.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Category, ChatMessage, ChatRole, Concern, ConcernFilters, ConcernStatus,
    CreateConcernRequest, InsertChatMessage, InsertUser, UpdateConcernRequest, UpsertUser, User,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Get a user by ID.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, username, email, is_admin, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, username, email, is_admin, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create a new user. Duplicate usernames surface as `Conflict`.
    pub async fn create_user(&self, request: &InsertUser) -> Result<User, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (username, email, is_admin, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(&request.username)
        .bind(&request.email)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("Username {} is already taken", request.username))
            }
            other => other,
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: request.username.clone(),
            email: request.email.clone(),
            is_admin: false,
            created_at: now,
        })
    }

    /// Insert or merge an identity-provider-linked user, keyed by id.
    pub async fn upsert_user(&self, request: &UpsertUser) -> Result<User, AppError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO users (id, username, email, is_admin, created_at)
               VALUES (?, ?, ?, 0, ?)
               ON CONFLICT(id) DO UPDATE SET
                   username = excluded.username,
                   email = excluded.email"#,
        )
        .bind(request.id)
        .bind(&request.username)
        .bind(&request.email)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_user(request.id)
            .await?
            .ok_or_else(|| AppError::Storage(format!("Upserted user {} missing", request.id)))
    }

    // ==================== CONCERN OPERATIONS ====================

    /// List concerns matching all provided filters, newest-first.
    pub async fn list_concerns(
        &self,
        filters: &ConcernFilters,
    ) -> Result<Vec<Concern>, AppError> {
        let mut sql = String::from(
            "SELECT id, title, content, category, author_id, response, status, upvotes, created_at
             FROM concerns WHERE 1 = 1",
        );
        if filters.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if filters.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if filters.search.is_some() {
            sql.push_str(" AND LOWER(title) LIKE '%' || LOWER(?) || '%'");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query = sqlx::query(&sql);
        if let Some(category) = filters.category {
            query = query.bind(category.as_str());
        }
        if let Some(status) = filters.status {
            query = query.bind(status.as_str());
        }
        if let Some(search) = &filters.search {
            query = query.bind(search);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(concern_from_row).collect()
    }

    /// Get a concern by ID. Absent ids are `Ok(None)`, never a store error.
    pub async fn get_concern(&self, id: i64) -> Result<Option<Concern>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, content, category, author_id, response, status, upvotes, created_at
             FROM concerns WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(concern_from_row).transpose()
    }

    /// Create a new concern with default status `open` and zero upvotes.
    pub async fn create_concern(
        &self,
        request: &CreateConcernRequest,
    ) -> Result<Concern, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"INSERT INTO concerns (title, content, category, author_id, status, upvotes, created_at)
               VALUES (?, ?, ?, ?, 'open', 0, ?)"#,
        )
        .bind(&request.title)
        .bind(&request.content)
        .bind(request.category.as_str())
        .bind(request.author_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Concern {
            id: result.last_insert_rowid(),
            title: request.title.clone(),
            content: request.content.clone(),
            category: request.category,
            author_id: request.author_id,
            response: None,
            status: ConcernStatus::Open,
            upvotes: 0,
            created_at: now,
        })
    }

    /// Apply a partial update (used for staff responses).
    pub async fn update_concern(
        &self,
        id: i64,
        updates: &UpdateConcernRequest,
    ) -> Result<Concern, AppError> {
        let existing = self
            .get_concern(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Concern {} not found", id)))?;

        let response = updates.response.clone().or(existing.response.clone());
        let status = updates.status.unwrap_or(existing.status);

        sqlx::query("UPDATE concerns SET response = ?, status = ? WHERE id = ?")
            .bind(&response)
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Concern {
            response,
            status,
            ..existing
        })
    }

    /// Atomically increment a concern's upvote counter by one.
    ///
    /// The increment is a single UPDATE statement so concurrent upvotes on
    /// the same id never lose updates.
    pub async fn upvote_concern(&self, id: i64) -> Result<Concern, AppError> {
        let result = sqlx::query("UPDATE concerns SET upvotes = upvotes + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Concern {} not found", id)));
        }

        self.get_concern(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Concern {} not found", id)))
    }

    // ==================== CHAT OPERATIONS ====================

    /// Insert a chat turn.
    pub async fn create_chat_message(
        &self,
        message: &InsertChatMessage,
    ) -> Result<ChatMessage, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO chat_messages (user_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(message.user_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(ChatMessage {
            id: result.last_insert_rowid(),
            user_id: message.user_id,
            role: message.role,
            content: message.content.clone(),
            created_at: now,
        })
    }

    /// Get chat history for a user in chronological order.
    ///
    /// Guest sessions (no user id) have no persisted history and get an
    /// empty sequence.
    pub async fn get_chat_history(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let Some(user_id) = user_id else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            "SELECT id, user_id, role, content, created_at FROM chat_messages
             WHERE user_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(chat_message_from_row).collect()
    }
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        is_admin: row.get::<i64, _>("is_admin") != 0,
        created_at: row.get("created_at"),
    }
}

fn concern_from_row(row: &SqliteRow) -> Result<Concern, AppError> {
    let category: String = row.get("category");
    let status: String = row.get("status");

    Ok(Concern {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        category: Category::from_str(&category)
            .ok_or_else(|| AppError::Storage(format!("Unknown category in store: {}", category)))?,
        author_id: row.get("author_id"),
        response: row.get("response"),
        status: ConcernStatus::from_str(&status)
            .ok_or_else(|| AppError::Storage(format!("Unknown status in store: {}", status)))?,
        upvotes: row.get("upvotes"),
        created_at: row.get("created_at"),
    })
}

fn chat_message_from_row(row: &SqliteRow) -> Result<ChatMessage, AppError> {
    let role: String = row.get("role");

    Ok(ChatMessage {
        id: row.get("id"),
        user_id: row.get("user_id"),
        role: ChatRole::from_str(&role)
            .ok_or_else(|| AppError::Storage(format!("Unknown role in store: {}", role)))?,
        content: row.get("content"),
        created_at: row.get("created_at"),
    })
}
