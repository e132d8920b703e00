pub mod config;
pub mod error;
pub mod issuer;
pub mod mdm;
pub mod model;
pub mod remap;
pub mod runner;
pub mod store;
pub mod switch;

pub use config::{CloneConfig, Config};
pub use error::{MdmCloneError, Result};
pub use issuer::{IdentityIssuer, SapIssuer};
pub use model::Entity;
pub use remap::{remap, IdMapping, RemapOutcome};
pub use switch::{switch_supplier, ResolvedSupplier, SupplierDirectory};
