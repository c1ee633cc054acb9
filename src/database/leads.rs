use sqlx::any::AnyRow;
use sqlx::Row;

use crate::api::middleware::error::ApiResult;
use crate::database::{now_rfc3339, Database};
use crate::models::lead::has_value;
use crate::models::{Lead, LeadIdentity, UpdateLeadRequest};

fn map_lead(row: &AnyRow) -> Result<Lead, sqlx::Error> {
    Ok(Lead {
        id: row.try_get("id")?,
        external_id: row.try_get("external_id")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn create_lead(&self, identity: &LeadIdentity) -> ApiResult<Lead> {
        let now = now_rfc3339();
        let row = sqlx::query(
            "INSERT INTO leads (external_id, phone, email, name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&identity.external_id)
        .bind(&identity.phone)
        .bind(&identity.email)
        .bind(&identity.name)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool())
        .await?;

        Ok(Lead {
            id: row.try_get("id")?,
            external_id: identity.external_id.clone(),
            phone: identity.phone.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn get_lead_by_id(&self, id: i64) -> ApiResult<Option<Lead>> {
        let row = sqlx::query(
            "SELECT id, external_id, phone, email, name, created_at, updated_at
             FROM leads
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_lead).transpose().map_err(Into::into)
    }

    pub async fn list_leads(&self, skip: i64, limit: i64) -> ApiResult<Vec<Lead>> {
        let rows = sqlx::query(
            "SELECT id, external_id, phone, email, name, created_at, updated_at
             FROM leads
             ORDER BY id
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(map_lead)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Find any lead matching one of the supplied identifiers (OR semantics).
    /// No identifiers means no match is attempted.
    pub async fn find_lead_by_identifiers(
        &self,
        identity: &LeadIdentity,
    ) -> ApiResult<Option<Lead>> {
        let mut conditions = Vec::new();
        if has_value(&identity.external_id) {
            conditions.push("external_id = ?");
        }
        if has_value(&identity.phone) {
            conditions.push("phone = ?");
        }
        if has_value(&identity.email) {
            conditions.push("email = ?");
        }
        if conditions.is_empty() {
            return Ok(None);
        }

        let sql = format!(
            "SELECT id, external_id, phone, email, name, created_at, updated_at
             FROM leads
             WHERE {}",
            conditions.join(" OR ")
        );

        let mut query = sqlx::query(&sql);
        if has_value(&identity.external_id) {
            query = query.bind(&identity.external_id);
        }
        if has_value(&identity.phone) {
            query = query.bind(&identity.phone);
        }
        if has_value(&identity.email) {
            query = query.bind(&identity.email);
        }

        let row = query.fetch_optional(self.pool()).await?;
        row.as_ref().map(map_lead).transpose().map_err(Into::into)
    }

    pub async fn update_lead(
        &self,
        id: i64,
        request: &UpdateLeadRequest,
    ) -> ApiResult<Option<Lead>> {
        sqlx::query(
            "UPDATE leads
             SET external_id = COALESCE(?, external_id),
                 phone = COALESCE(?, phone),
                 email = COALESCE(?, email),
                 name = COALESCE(?, name),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(&request.external_id)
        .bind(&request.phone)
        .bind(&request.email)
        .bind(&request.name)
        .bind(now_rfc3339())
        .bind(id)
        .execute(self.pool())
        .await?;

        self.get_lead_by_id(id).await
    }
}
