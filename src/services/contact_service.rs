use std::collections::HashMap;

use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    models::{
        Contact, ContactDetailResponse, CreateContactRequest, LeadIdentity, UpdateContactRequest,
    },
    services::{AssignmentService, LeadService},
};

#[derive(Clone)]
pub struct ContactService {
    db: Database,
    lead_service: LeadService,
    assignment_service: AssignmentService,
}

impl ContactService {
    pub fn new(
        db: Database,
        lead_service: LeadService,
        assignment_service: AssignmentService,
    ) -> Self {
        Self {
            db,
            lead_service,
            assignment_service,
        }
    }

    /// Contact intake: validate the source, resolve the lead, run operator
    /// selection, insert the contact, and return it with relations populated.
    pub async fn create_contact(
        &self,
        request: &CreateContactRequest,
    ) -> ApiResult<ContactDetailResponse> {
        // Source must exist before any row is written.
        if self.db.get_source_by_id(request.source_id).await?.is_none() {
            tracing::warn!("Source not found: source_id={}", request.source_id);
            return Err(ApiError::NotFound("Source not found".to_string()));
        }

        let identity = LeadIdentity {
            external_id: request.external_id.clone(),
            phone: request.phone.clone(),
            email: request.email.clone(),
            name: request.name.clone(),
        };
        let lead = self.lead_service.find_or_create(&identity).await?;

        // May legitimately be None: the contact is then created unassigned.
        let operator_id = self
            .assignment_service
            .select_operator(request.source_id)
            .await?;

        let contact = self
            .db
            .create_contact(
                lead.id,
                request.source_id,
                operator_id,
                request.message.as_deref(),
            )
            .await?;

        match self.db.get_contact_detail(contact.id).await? {
            Some(detail) => Ok(detail),
            None => {
                // The row we just inserted has vanished: internal fault, not
                // a client error.
                tracing::error!("Contact created but not found: contact_id={}", contact.id);
                Err(ApiError::Internal("Contact not found".to_string()))
            }
        }
    }

    pub async fn get_contact(&self, contact_id: i64) -> ApiResult<ContactDetailResponse> {
        match self.db.get_contact_detail(contact_id).await? {
            Some(detail) => Ok(detail),
            None => {
                tracing::warn!("Contact not found: contact_id={}", contact_id);
                Err(ApiError::NotFound("Contact not found".to_string()))
            }
        }
    }

    pub async fn list_contacts(&self, skip: i64, limit: i64) -> ApiResult<Vec<Contact>> {
        self.db.list_contacts(skip, limit).await
    }

    pub async fn update_contact(
        &self,
        contact_id: i64,
        request: &UpdateContactRequest,
    ) -> ApiResult<Contact> {
        if self.db.get_contact_by_id(contact_id).await?.is_none() {
            tracing::warn!("Contact not found for update: contact_id={}", contact_id);
            return Err(ApiError::NotFound("Contact not found".to_string()));
        }

        self.db
            .update_contact(contact_id, request)
            .await?
            .ok_or_else(|| ApiError::Internal("Contact not found".to_string()))
    }

    /// Contact counts per (source, operator) over the full table.
    pub async fn distribution(&self) -> ApiResult<HashMap<i64, HashMap<String, i64>>> {
        self.db.contact_distribution().await
    }
}
