//! remodel core library
//!
//! Schema-driven synchronization between an in-memory record store and a
//! JSON REST resource. Entity types declare their attributes, associations
//! and a wrapper (remote field map plus the relations to resolve); the
//! [`Syncer`] fetches, saves and destroys records over a [`Transport`].
//!
//! # Quick Start
//!
//! ```text
//! let schema = Schema::load(Path::new("schema.toml"))?;
//! let transport = HttpTransport::new(&Config::load()?)?;
//! let mut syncer = Syncer::new(schema, transport);
//!
//! let user = syncer.schema().lookup("User").unwrap();
//! let outcome = syncer.fetch(user, None, &Value::Null).await?;
//! for record in outcome.records() {
//!     println!("{:?}", record.value("name"));
//! }
//! ```
//!
//! # Modules
//!
//! - `schema`: Entity types, wrappers and the registry
//! - `mapping`: JSON to record (and back), including relations
//! - `sync`: Fetch/save/destroy orchestration (main entry point)
//! - `transport`: HTTP and mock transports
//! - `store`: In-memory record store
//! - `outcome`: Operation results
//! - `config`: Process configuration

pub mod config;
pub mod error;
pub mod mapping;
pub mod naming;
pub mod outcome;
pub mod record;
pub mod schema;
pub mod stamp;
pub mod store;
pub mod sync;
pub mod transport;
pub mod value;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{SchemaError, WrapperError, WrapperResult};
pub use mapping::build_payload;
pub use outcome::{EmptyReason, Models, Outcome, RelationIssue};
pub use record::{Record, RecordKey};
pub use schema::{Cardinality, EntityDef, EntityId, EntityType, Schema, SchemaBuilder, Wrapper};
pub use store::MemoryStore;
pub use sync::{DestroyOptions, Destroyed, SaveAction, SaveOptions, Saved, Syncer};
pub use transport::{HttpTransport, Method, MockTransport, Request, Response, Transport, TransportError};
pub use value::{AttrKind, Scalar};
