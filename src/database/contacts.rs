use std::collections::HashMap;

use sqlx::any::AnyRow;
use sqlx::Row;

use crate::api::middleware::error::ApiResult;
use crate::database::{now_rfc3339, Database};
use crate::models::{
    Contact, ContactDetailResponse, Lead, Operator, Source, UpdateContactRequest,
};

fn map_contact(row: &AnyRow) -> Result<Contact, sqlx::Error> {
    Ok(Contact {
        id: row.try_get("id")?,
        lead_id: row.try_get("lead_id")?,
        source_id: row.try_get("source_id")?,
        operator_id: row.try_get("operator_id")?,
        is_active: row.try_get::<i32, _>("is_active")? != 0,
        message: row.try_get("message")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

// Column list for the contact + lead + source + operator join. The operator
// side is a LEFT JOIN: unassigned contacts still produce a detail row.
const DETAIL_COLUMNS: &str = "c.id, c.lead_id, c.source_id, c.operator_id, c.is_active, c.message, \
     c.created_at, c.updated_at, \
     l.external_id AS lead_external_id, l.phone AS lead_phone, l.email AS lead_email, \
     l.name AS lead_name, l.created_at AS lead_created_at, l.updated_at AS lead_updated_at, \
     s.name AS source_name, s.description AS source_description, \
     s.created_at AS source_created_at, s.updated_at AS source_updated_at, \
     o.id AS joined_operator_id, o.name AS operator_name, o.is_active AS operator_is_active, \
     o.load_limit AS operator_load_limit, o.created_at AS operator_created_at, \
     o.updated_at AS operator_updated_at";

fn map_contact_detail(row: &AnyRow) -> Result<ContactDetailResponse, sqlx::Error> {
    let contact = map_contact(row)?;

    let lead = Lead {
        id: contact.lead_id,
        external_id: row.try_get("lead_external_id")?,
        phone: row.try_get("lead_phone")?,
        email: row.try_get("lead_email")?,
        name: row.try_get("lead_name")?,
        created_at: row.try_get("lead_created_at")?,
        updated_at: row.try_get("lead_updated_at")?,
    };

    let source = Source {
        id: contact.source_id,
        name: row.try_get("source_name")?,
        description: row.try_get("source_description")?,
        created_at: row.try_get("source_created_at")?,
        updated_at: row.try_get("source_updated_at")?,
    };

    let operator = match row.try_get::<Option<i64>, _>("joined_operator_id")? {
        Some(operator_id) => Some(Operator {
            id: operator_id,
            name: row.try_get("operator_name")?,
            is_active: row.try_get::<i32, _>("operator_is_active")? != 0,
            load_limit: row.try_get("operator_load_limit")?,
            created_at: row.try_get("operator_created_at")?,
            updated_at: row.try_get("operator_updated_at")?,
        }),
        None => None,
    };

    Ok(ContactDetailResponse {
        id: contact.id,
        lead_id: contact.lead_id,
        source_id: contact.source_id,
        operator_id: contact.operator_id,
        is_active: contact.is_active,
        message: contact.message,
        created_at: contact.created_at,
        updated_at: contact.updated_at,
        lead,
        source,
        operator,
    })
}

impl Database {
    pub async fn create_contact(
        &self,
        lead_id: i64,
        source_id: i64,
        operator_id: Option<i64>,
        message: Option<&str>,
    ) -> ApiResult<Contact> {
        let now = now_rfc3339();
        let row = sqlx::query(
            "INSERT INTO contacts (lead_id, source_id, operator_id, is_active, message, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(lead_id)
        .bind(source_id)
        .bind(operator_id)
        .bind(true)
        .bind(message)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool())
        .await?;

        Ok(Contact {
            id: row.try_get("id")?,
            lead_id,
            source_id,
            operator_id,
            is_active: true,
            message: message.map(str::to_string),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn get_contact_by_id(&self, id: i64) -> ApiResult<Option<Contact>> {
        let row = sqlx::query(
            "SELECT id, lead_id, source_id, operator_id, is_active, message, created_at, updated_at
             FROM contacts
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_contact).transpose().map_err(Into::into)
    }

    pub async fn list_contacts(&self, skip: i64, limit: i64) -> ApiResult<Vec<Contact>> {
        let rows = sqlx::query(
            "SELECT id, lead_id, source_id, operator_id, is_active, message, created_at, updated_at
             FROM contacts
             ORDER BY id
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(map_contact)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Contact with lead, source and operator populated in one query.
    pub async fn get_contact_detail(&self, id: i64) -> ApiResult<Option<ContactDetailResponse>> {
        let sql = format!(
            "SELECT {DETAIL_COLUMNS}
             FROM contacts c
             JOIN leads l ON l.id = c.lead_id
             JOIN sources s ON s.id = c.source_id
             LEFT JOIN operators o ON o.id = c.operator_id
             WHERE c.id = ?"
        );

        let row = sqlx::query(&sql).bind(id).fetch_optional(self.pool()).await?;

        row.as_ref()
            .map(map_contact_detail)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn contacts_for_lead(&self, lead_id: i64) -> ApiResult<Vec<Contact>> {
        let rows = sqlx::query(
            "SELECT id, lead_id, source_id, operator_id, is_active, message, created_at, updated_at
             FROM contacts
             WHERE lead_id = ?
             ORDER BY id",
        )
        .bind(lead_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(map_contact)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub async fn update_contact(
        &self,
        id: i64,
        request: &UpdateContactRequest,
    ) -> ApiResult<Option<Contact>> {
        sqlx::query(
            "UPDATE contacts
             SET is_active = COALESCE(?, is_active),
                 message = COALESCE(?, message),
                 operator_id = COALESCE(?, operator_id),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(request.is_active)
        .bind(&request.message)
        .bind(request.operator_id)
        .bind(now_rfc3339())
        .bind(id)
        .execute(self.pool())
        .await?;

        self.get_contact_by_id(id).await
    }

    /// Contact counts grouped by (source, operator) over the whole table.
    /// Unassigned contacts appear under the "null" operator key.
    pub async fn contact_distribution(&self) -> ApiResult<HashMap<i64, HashMap<String, i64>>> {
        let rows = sqlx::query(
            "SELECT source_id, operator_id, COUNT(id) as count
             FROM contacts
             GROUP BY source_id, operator_id",
        )
        .fetch_all(self.pool())
        .await?;

        let mut stats: HashMap<i64, HashMap<String, i64>> = HashMap::new();
        for row in &rows {
            let source_id: i64 = row.try_get("source_id")?;
            let operator_id: Option<i64> = row.try_get("operator_id")?;
            let count: i64 = row.try_get("count")?;

            let operator_key = match operator_id {
                Some(id) => id.to_string(),
                None => "null".to_string(),
            };
            stats.entry(source_id).or_default().insert(operator_key, count);
        }

        Ok(stats)
    }
}
