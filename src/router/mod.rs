//! Request routing.
//!
//! [`RequestRouter`] validates inputs, dispatches blocking model calls to a bounded
//! [`WorkerPool`], and turns every collaborator failure into a [`RouterError`] the HTTP
//! layer can map to a status code.

mod error;
mod pool;
mod request;
mod types;


pub use error::RouterError;
pub use pool::{PoolError, WorkerPool};
pub use request::RequestRouter;
pub use types::{
    ClassificationResult, EMPTY_FILE, EMPTY_TEXT, FILE_PROCESSED, FILE_UNPROCESSED, Probe,
    TEXT_PROCESSED, VerifyRequest,
};
