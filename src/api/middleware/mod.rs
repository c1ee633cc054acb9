pub mod error;

pub use error::*;

use std::sync::Arc;

use crate::{
    database::Database,
    services::{AssignmentService, ContactService, LeadService, RandomSource, ThreadRngSource},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub lead_service: LeadService,
    pub assignment_service: AssignmentService,
    pub contact_service: ContactService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self::with_random_source(db, Arc::new(ThreadRngSource))
    }

    /// State wired with a caller-supplied randomness source (tests pass a
    /// seeded generator here).
    pub fn with_random_source(db: Database, random: Arc<dyn RandomSource>) -> Self {
        let lead_service = LeadService::new(db.clone());
        let assignment_service = AssignmentService::new(db.clone(), random);
        let contact_service = ContactService::new(
            db.clone(),
            lead_service.clone(),
            assignment_service.clone(),
        );

        Self {
            db,
            lead_service,
            assignment_service,
            contact_service,
        }
    }
}
