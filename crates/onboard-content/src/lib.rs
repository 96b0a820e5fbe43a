//! # Onboard Content
//!
//! Learning-plan content source. The plan lives in a SharePoint list (one
//! row per task, labelled with the week it should be completed by); this
//! crate reads it through Microsoft Graph with an app-only token.
//!
//! ```text
//! SharePointContentSource.learning_plan()
//!   ├── GraphTokenClient: client-credentials token (cached until expiry)
//!   └── GET /v1.0/sites/{site}/lists/{list}/items?expand=fields
//!         → Vec<LearningPlanItem>
//! ```

pub mod graph;
pub mod sharepoint;

pub use graph::GraphTokenClient;
pub use sharepoint::SharePointContentSource;
