//! Audit logging for committed ledger commands
//!
//! Every committed create and delete can be recorded as one line of JSON in
//! an append-only log, with the record's state attached. Records removed by a
//! cascade are written as a single batch and point back at their parent.
//!
//! ```rust,ignore
//! use ledger_engine::audit::AuditLogger;
//! use ledger_engine::Ledger;
//!
//! let ledger = Ledger::new().with_audit(AuditLogger::new(paths.audit_log()));
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
