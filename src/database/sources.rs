use sqlx::any::AnyRow;
use sqlx::Row;

use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::{now_rfc3339, Database};
use crate::models::{CreateSourceRequest, Source, SourceOperatorWeight, UpdateSourceRequest};

fn map_source(row: &AnyRow) -> Result<Source, sqlx::Error> {
    Ok(Source {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_weight(row: &AnyRow) -> Result<SourceOperatorWeight, sqlx::Error> {
    Ok(SourceOperatorWeight {
        id: row.try_get("id")?,
        source_id: row.try_get("source_id")?,
        operator_id: row.try_get("operator_id")?,
        weight: row.try_get("weight")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn create_source(&self, request: &CreateSourceRequest) -> ApiResult<Source> {
        let now = now_rfc3339();
        let row = sqlx::query(
            "INSERT INTO sources (name, description, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool())
        .await?;

        Ok(Source {
            id: row.try_get("id")?,
            name: request.name.clone(),
            description: request.description.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn get_source_by_id(&self, id: i64) -> ApiResult<Option<Source>> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at, updated_at
             FROM sources
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_source).transpose().map_err(Into::into)
    }

    pub async fn list_sources(&self, skip: i64, limit: i64) -> ApiResult<Vec<Source>> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at, updated_at
             FROM sources
             ORDER BY id
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(map_source)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub async fn update_source(
        &self,
        id: i64,
        request: &UpdateSourceRequest,
    ) -> ApiResult<Option<Source>> {
        sqlx::query(
            "UPDATE sources
             SET name = COALESCE(?, name),
                 description = COALESCE(?, description),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(now_rfc3339())
        .bind(id)
        .execute(self.pool())
        .await?;

        self.get_source_by_id(id).await
    }

    /// Deletes the source. Weight rows and contacts referencing it go with it
    /// (ON DELETE CASCADE).
    pub async fn delete_source(&self, id: i64) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM sources WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Weight operations
    pub async fn get_weight(
        &self,
        source_id: i64,
        operator_id: i64,
    ) -> ApiResult<Option<SourceOperatorWeight>> {
        let row = sqlx::query(
            "SELECT id, source_id, operator_id, weight, created_at, updated_at
             FROM source_operator_weights
             WHERE source_id = ? AND operator_id = ?",
        )
        .bind(source_id)
        .bind(operator_id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_weight).transpose().map_err(Into::into)
    }

    pub async fn weights_for_source(&self, source_id: i64) -> ApiResult<Vec<SourceOperatorWeight>> {
        let rows = sqlx::query(
            "SELECT id, source_id, operator_id, weight, created_at, updated_at
             FROM source_operator_weights
             WHERE source_id = ?",
        )
        .bind(source_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(map_weight)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Set the weight for a (source, operator) pair: updates the existing row
    /// in place or inserts a new one. Runs in a transaction so the
    /// check-then-write cannot race itself into the UNIQUE constraint.
    pub async fn upsert_weight(
        &self,
        source_id: i64,
        operator_id: i64,
        weight: i64,
    ) -> ApiResult<SourceOperatorWeight> {
        let now = now_rfc3339();
        let mut tx = self.pool().begin().await?;

        let existing = sqlx::query(
            "SELECT id FROM source_operator_weights WHERE source_id = ? AND operator_id = ?",
        )
        .bind(source_id)
        .bind(operator_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = existing {
            let id: i64 = row.try_get("id")?;
            sqlx::query("UPDATE source_operator_weights SET weight = ?, updated_at = ? WHERE id = ?")
                .bind(weight)
                .bind(&now)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query(
                "INSERT INTO source_operator_weights (source_id, operator_id, weight, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(source_id)
            .bind(operator_id)
            .bind(weight)
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_weight(source_id, operator_id).await?.ok_or_else(|| {
            ApiError::Internal(format!(
                "Weight row missing after upsert: source_id={}, operator_id={}",
                source_id, operator_id
            ))
        })
    }

    pub async fn delete_weight(&self, source_id: i64, operator_id: i64) -> ApiResult<bool> {
        let result =
            sqlx::query("DELETE FROM source_operator_weights WHERE source_id = ? AND operator_id = ?")
                .bind(source_id)
                .bind(operator_id)
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
