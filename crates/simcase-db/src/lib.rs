//! Simcase DB - Database layer using native_db
//!
//! Provides persistent storage for the full scenario entity graph:
//! - Root scenario rows and variant extension rows
//! - Patient state, vascular accesses and their link rows
//! - Key actions, materials and supplies (join rows over shared catalogs)
//! - Timeline steps with additional parameters, exams and reports
//!
//! Scenario creation and deletion each run as one transaction over a fixed,
//! named step sequence; shared rows (vascular accesses, key actions) are
//! removed only when a derived query shows no remaining reference.

mod deleter;
mod deletion;
mod error;
pub mod models;
mod queries;
mod store;

pub use deleter::ScenarioDeleter;
pub use deletion::DeleteReport;
pub use error::{Error, Result};
pub use queries::ScenarioCounts;
pub use store::Store;
