use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::DocumentRepository;
use crate::models::document::{Document, DocumentOwner, NewDocument, VehicleDocumentRow};
use crate::utils::errors::{map_db_error, not_found_error, AppResult};

pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn create(&self, document: NewDocument) -> AppResult<Document> {
        let owner = document.owner;
        sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (
                id, driver_id, vehicle_id, document_type, file_name, file_path,
                file_url, file_size, expiry_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner.driver_id())
        .bind(owner.vehicle_id())
        .bind(document.document_type)
        .bind(document.file_name)
        .bind(document.file_path)
        .bind(document.file_url)
        .bind(document.file_size)
        .bind(document.expiry_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Document", owner.entity()))
    }

    async fn list_for_owner(&self, owner: DocumentOwner) -> AppResult<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            WHERE driver_id IS NOT DISTINCT FROM $1 AND vehicle_id IS NOT DISTINCT FROM $2
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(owner.driver_id())
        .bind(owner.vehicle_id())
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    async fn update_expiry(
        &self,
        owner: DocumentOwner,
        id: Uuid,
        expiry_date: Option<DateTime<Utc>>,
    ) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET expiry_date = $4
            WHERE id = $1
              AND driver_id IS NOT DISTINCT FROM $2
              AND vehicle_id IS NOT DISTINCT FROM $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner.driver_id())
        .bind(owner.vehicle_id())
        .bind(expiry_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Document"))
    }

    async fn find_for_owner(&self, owner: DocumentOwner, id: Uuid) -> AppResult<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            WHERE id = $1
              AND driver_id IS NOT DISTINCT FROM $2
              AND vehicle_id IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(id)
        .bind(owner.driver_id())
        .bind(owner.vehicle_id())
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    async fn delete(&self, owner: DocumentOwner, id: Uuid) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            r#"
            DELETE FROM documents
            WHERE id = $1
              AND driver_id IS NOT DISTINCT FROM $2
              AND vehicle_id IS NOT DISTINCT FROM $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner.driver_id())
        .bind(owner.vehicle_id())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Document"))
    }

    async fn vehicle_documents(&self) -> AppResult<Vec<VehicleDocumentRow>> {
        let rows = sqlx::query_as::<_, VehicleDocumentRow>(
            r#"
            SELECT d.id AS document_id, d.vehicle_id AS vehicle_id, d.document_type,
                   d.file_name, d.expiry_date, v.make, v.model, v.license_plate
            FROM documents d
            JOIN vehicles v ON v.id = d.vehicle_id
            ORDER BY d.uploaded_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
