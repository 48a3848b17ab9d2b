use std::path::PathBuf;
use std::sync::Arc;

use crate::router::RequestRouter;

#[derive(Clone)]
pub struct HandlerState {
    pub router: Arc<RequestRouter>,

    pub storage_path: PathBuf,

    /// Upper bound on a request body, uploads included.
    pub max_upload_bytes: usize,
}

impl HandlerState {
    pub fn new(router: Arc<RequestRouter>, storage_path: PathBuf, max_upload_bytes: usize) -> Self {
        Self {
            router,
            storage_path,
            max_upload_bytes,
        }
    }
}
