use serde::{Deserialize, Serialize};

use crate::models::Contact;

/// A lead is the person behind one or more contacts. All identifying fields
/// are optional; deduplication matches on any one of external_id/phone/email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub external_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Identifying fields consumed by the lead resolver, carried separately from
/// the create-contact request so the resolver has no HTTP-facing surface.
#[derive(Debug, Clone, Default)]
pub struct LeadIdentity {
    pub external_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl LeadIdentity {
    /// True when no matchable identifier was supplied.
    pub fn is_anonymous(&self) -> bool {
        !has_value(&self.external_id) && !has_value(&self.phone) && !has_value(&self.email)
    }
}

pub(crate) fn has_value(field: &Option<String>) -> bool {
    field.as_deref().map_or(false, |s| !s.is_empty())
}

// DTOs for API requests/responses
#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    pub external_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeadWithContactsResponse {
    pub id: i64,
    pub external_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub contacts: Vec<Contact>,
}

impl LeadWithContactsResponse {
    pub fn new(lead: Lead, contacts: Vec<Contact>) -> Self {
        Self {
            id: lead.id,
            external_id: lead.external_id,
            phone: lead.phone,
            email: lead.email,
            name: lead.name,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
            contacts,
        }
    }
}
