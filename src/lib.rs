//! Typed client for the Zenodo deposition API.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! Covers the full deposit lifecycle: create, upload files, edit metadata,
//! publish, new version.
//!
//! The draft/published distinction is carried in the types: operations that
//! the service only accepts against a draft take a [`Deposit<Draft>`], and
//! [`ZenodoClient::publish`] consumes the draft and hands back a
//! [`Deposit<Published>`]. The service still has the final word, but a
//! wrong-state call no longer typechecks.
//!
//! ```no_run
//! use zenodozen::{load_token, UploadTag, ZenodoClient};
//!
//! # fn main() -> Result<(), zenodozen::ZenodoError> {
//! let token = load_token("/path/to/.zenodo-sandbox")?;
//! let client = ZenodoClient::sandbox(token);
//!
//! let draft = client.create_deposit()?;
//! let tag = UploadTag::new("IGWN", "GWTC2", "1");
//! client.upload_file(&draft, "./samples/GW150914.json", &tag)?;
//! let draft = client.set_publication_metadata(&draft, Some("Posterior samples"))?;
//! let published = client.publish(draft)?;
//! # let _ = published;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod deposit;

pub use auth::load_token;
pub use client::{ZenodoClient, ZenodoError, PRODUCTION_API_BASE, SANDBOX_API_BASE};
pub use deposit::{
    AnyDeposit, Deposit, DepositFile, DepositLinks, DepositMetadata, Draft, FileLinks, Published,
    UploadTag, UploadedFile,
};
