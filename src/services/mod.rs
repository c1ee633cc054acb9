pub mod assignment_service;
pub mod contact_service;
pub mod lead_service;

pub use assignment_service::*;
pub use contact_service::*;
pub use lead_service::*;
