use sqlx::any::AnyRow;
use sqlx::Row;

use crate::api::middleware::error::ApiResult;
use crate::database::{now_rfc3339, Database};
use crate::models::{CreateOperatorRequest, Operator, UpdateOperatorRequest};

fn map_operator(row: &AnyRow) -> Result<Operator, sqlx::Error> {
    Ok(Operator {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        is_active: row.try_get::<i32, _>("is_active")? != 0,
        load_limit: row.try_get("load_limit")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn create_operator(&self, request: &CreateOperatorRequest) -> ApiResult<Operator> {
        let now = now_rfc3339();
        let row = sqlx::query(
            "INSERT INTO operators (name, is_active, load_limit, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&request.name)
        .bind(request.is_active)
        .bind(request.load_limit)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool())
        .await?;

        Ok(Operator {
            id: row.try_get("id")?,
            name: request.name.clone(),
            is_active: request.is_active,
            load_limit: request.load_limit,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn get_operator_by_id(&self, id: i64) -> ApiResult<Option<Operator>> {
        let row = sqlx::query(
            "SELECT id, name, is_active, load_limit, created_at, updated_at
             FROM operators
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_operator).transpose().map_err(Into::into)
    }

    pub async fn list_operators(&self, skip: i64, limit: i64) -> ApiResult<Vec<Operator>> {
        let rows = sqlx::query(
            "SELECT id, name, is_active, load_limit, created_at, updated_at
             FROM operators
             ORDER BY id
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(map_operator)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub async fn update_operator(
        &self,
        id: i64,
        request: &UpdateOperatorRequest,
    ) -> ApiResult<Option<Operator>> {
        sqlx::query(
            "UPDATE operators
             SET name = COALESCE(?, name),
                 is_active = COALESCE(?, is_active),
                 load_limit = COALESCE(?, load_limit),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(&request.name)
        .bind(request.is_active)
        .bind(request.load_limit)
        .bind(now_rfc3339())
        .bind(id)
        .execute(self.pool())
        .await?;

        self.get_operator_by_id(id).await
    }

    pub async fn delete_operator(&self, id: i64) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM operators WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of active contacts currently assigned to the operator, counted
    /// live from the contacts table.
    pub async fn operator_load(&self, operator_id: i64) -> ApiResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM contacts WHERE operator_id = ? AND is_active = 1",
        )
        .bind(operator_id)
        .fetch_one(self.pool())
        .await?;

        Ok(row.try_get("count")?)
    }

    /// Operators eligible to take a contact from the source: linked to it via
    /// a weight row, active, and with live load strictly under their cap. The
    /// per-operator load counts come from a single grouped subquery so one
    /// statement sees one consistent snapshot across all candidates. Rows
    /// come back in id order, which keeps the selection walk reproducible
    /// under a seeded generator.
    pub async fn available_operators(&self, source_id: i64) -> ApiResult<Vec<Operator>> {
        let rows = sqlx::query(
            "SELECT o.id, o.name, o.is_active, o.load_limit, o.created_at, o.updated_at
             FROM operators o
             JOIN source_operator_weights w ON w.operator_id = o.id
             LEFT JOIN (
                 SELECT operator_id, COUNT(id) AS current_load
                 FROM contacts
                 WHERE is_active = 1 AND operator_id IS NOT NULL
                 GROUP BY operator_id
             ) l ON l.operator_id = o.id
             WHERE w.source_id = ?
               AND o.is_active = 1
               AND COALESCE(l.current_load, 0) < o.load_limit
             ORDER BY o.id",
        )
        .bind(source_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(map_operator)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}
