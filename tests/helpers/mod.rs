#![allow(unused_imports)]
pub mod intake_helpers;
pub mod test_db;

pub use intake_helpers::*;
pub use test_db::*;
