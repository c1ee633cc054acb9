use crate::{
    api::middleware::error::ApiResult,
    database::Database,
    models::{Lead, LeadIdentity},
};

#[derive(Clone)]
pub struct LeadService {
    db: Database,
}

impl LeadService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Find an existing lead by any one of the supplied identifiers, or create
    /// a new one carrying all given fields.
    ///
    /// Matching is a disjunction: a lead matching any single identifier wins,
    /// even if its other fields differ from the request. Two different people
    /// can therefore be merged by one coincidentally shared identifier (a
    /// recycled phone number, say). Known trade-off, kept as-is.
    pub async fn find_or_create(&self, identity: &LeadIdentity) -> ApiResult<Lead> {
        if !identity.is_anonymous() {
            if let Some(lead) = self.db.find_lead_by_identifiers(identity).await? {
                tracing::debug!("Matched existing lead: lead_id={}", lead.id);
                return Ok(lead);
            }
        }

        let lead = self.db.create_lead(identity).await?;
        tracing::debug!("Created new lead: lead_id={}", lead.id);
        Ok(lead)
    }
}
