//! Financial records and the entities that produce them.

pub mod category;
pub mod entities;
pub mod types;
pub mod validation;

pub use category::{Category, CategoryCatalog};
pub use entities::{
    Building, Lease, OrderLine, Project, Punch, PurchaseOrder, SubcontractorInvoice,
};
pub use types::{AttachmentRef, FinancialRecord, RecordKind, RecordOwner, RecordSource};
pub use validation::RecordIssue;
