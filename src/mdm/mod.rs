//! MDM system collaborators: structured query construction, the fetch and
//! lookup client, and the blob upload of the final entity file.

pub mod client;
pub mod query;
pub mod upload;

pub use client::{MdmClient, MdmCredentials};
pub use query::{EntityQuerySpec, FieldSpec, QueryPayload};
pub use upload::EntityUploader;
