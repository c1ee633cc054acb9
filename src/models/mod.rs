pub mod lead;
pub mod source;
pub mod operator;
pub mod contact;

pub use lead::*;
pub use source::*;
pub use operator::*;
pub use contact::*;
