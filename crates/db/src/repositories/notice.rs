//! Notice repository for database operations.
//!
//! Implements the `bulletin-core` persistence traits using SeaORM. Mutations
//! that touch the notice row and its attachment rows together run inside an
//! explicit transaction; an early return on the error path drops the
//! transaction, which rolls back.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait, Unchanged,
};
use tracing::debug;

use crate::entities::{notice_files, notices};
use bulletin_core::notice::{
    CreateNoticeInput, FileAttachment, FileMetadataRepository, NewAttachment, Notice,
    NoticeRepository, RepositoryError, SearchType, UpdateNoticeInput,
};
use bulletin_shared::PageRequest;

/// Notice repository implementation.
#[derive(Debug, Clone)]
pub struct PgNoticeRepository {
    db: DatabaseConnection,
}

impl PgNoticeRepository {
    /// Create a new notice repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn insert_files(
        txn: &DatabaseTransaction,
        notice_id: i64,
        files: Vec<NewAttachment>,
    ) -> Result<Vec<notice_files::Model>, sea_orm::DbErr> {
        let mut models = Vec::with_capacity(files.len());
        for file in files {
            let model = notice_files::ActiveModel {
                notice_id: Set(notice_id),
                file_name: Set(file.file_name),
                file_path: Set(file.file_path),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            models.push(model);
        }
        Ok(models)
    }
}

impl NoticeRepository for PgNoticeRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Notice>, RepositoryError> {
        let Some(model) = notices::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?
        else {
            return Ok(None);
        };

        let files = model
            .find_related(notice_files::Entity)
            .order_by_asc(notice_files::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        Ok(Some(to_domain(model, files)))
    }

    async fn create(
        &self,
        input: CreateNoticeInput,
        files: Vec<NewAttachment>,
    ) -> Result<Notice, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        let now = Utc::now();
        let model = notices::ActiveModel {
            title: Set(input.title),
            content: Set(input.content),
            user_id: Set(input.user_id),
            views: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| RepositoryError::new(e.to_string()))?;

        let file_models = Self::insert_files(&txn, model.id, files)
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        Ok(to_domain(model, file_models))
    }

    async fn update(
        &self,
        input: UpdateNoticeInput,
        files: Vec<NewAttachment>,
    ) -> Result<Notice, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        let model = notices::ActiveModel {
            id: Unchanged(input.notice_id),
            title: Set(input.title),
            content: Set(input.content),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| RepositoryError::new(e.to_string()))?;

        let file_models = Self::insert_files(&txn, model.id, files)
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        Ok(to_domain(model, file_models))
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        // Attachment rows are covered by ON DELETE CASCADE.
        let result = notices::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        debug!(notice_id = id, rows = result.rows_affected, "notice row deleted");
        Ok(())
    }

    async fn save_views(&self, id: i64, views: i64) -> Result<(), RepositoryError> {
        notices::Entity::update_many()
            .col_expr(notices::Column::Views, Expr::value(views))
            .filter(notices::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        search_type: SearchType,
        keyword: &str,
        page: PageRequest,
    ) -> Result<(Vec<Notice>, u64), RepositoryError> {
        let paginator = notices::Entity::find()
            .filter(search_condition(search_type, keyword))
            .order_by_desc(notices::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator
            .num_items()
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        let models = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        // Attachments are not loaded for search results; summaries do not
        // show them.
        let notices = models
            .into_iter()
            .map(|m| to_domain(m, Vec::new()))
            .collect();

        Ok((notices, total))
    }
}

/// Attachment-row repository implementation.
#[derive(Debug, Clone)]
pub struct PgNoticeFileRepository {
    db: DatabaseConnection,
}

impl PgNoticeFileRepository {
    /// Create a new attachment-row repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl FileMetadataRepository for PgNoticeFileRepository {
    async fn delete_all(&self, files: &[FileAttachment]) -> Result<(), RepositoryError> {
        if files.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = files.iter().map(|f| f.id).collect();
        let result = notice_files::Entity::delete_many()
            .filter(notice_files::Column::Id.is_in(ids))
            .exec(&self.db)
            .await
            .map_err(|e| RepositoryError::new(e.to_string()))?;

        debug!(rows = result.rows_affected, "attachment rows deleted");
        Ok(())
    }
}

/// Build the filter for a keyword search.
fn search_condition(search_type: SearchType, keyword: &str) -> Condition {
    match search_type {
        SearchType::Title => Condition::all().add(notices::Column::Title.contains(keyword)),
        SearchType::Content => Condition::all().add(notices::Column::Content.contains(keyword)),
        SearchType::TitleContent => Condition::any()
            .add(notices::Column::Title.contains(keyword))
            .add(notices::Column::Content.contains(keyword)),
        SearchType::Writer => Condition::all().add(notices::Column::UserId.contains(keyword)),
    }
}

/// Convert database models to the domain model.
fn to_domain(model: notices::Model, files: Vec<notice_files::Model>) -> Notice {
    Notice {
        id: model.id,
        title: model.title,
        content: model.content,
        user_id: model.user_id,
        views: model.views,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
        files: files
            .into_iter()
            .map(|f| FileAttachment {
                id: f.id,
                notice_id: f.notice_id,
                file_name: f.file_name,
                file_path: f.file_path,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn search_sql(search_type: SearchType, keyword: &str) -> String {
        notices::Entity::find()
            .filter(search_condition(search_type, keyword))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_title_search_matches_title_only() {
        let sql = search_sql(SearchType::Title, "outage");
        assert!(sql.contains(r#""title" LIKE '%outage%'"#));
        assert!(!sql.contains(r#""content" LIKE"#));
    }

    #[test]
    fn test_title_content_search_matches_either() {
        let sql = search_sql(SearchType::TitleContent, "outage");
        assert!(sql.contains(r#""title" LIKE '%outage%'"#));
        assert!(sql.contains(r#""content" LIKE '%outage%'"#));
        assert!(sql.contains("OR"));
    }

    #[test]
    fn test_writer_search_matches_author() {
        let sql = search_sql(SearchType::Writer, "alice");
        assert!(sql.contains(r#""user_id" LIKE '%alice%'"#));
    }
}
