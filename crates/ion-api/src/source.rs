//! The seam between the collector and the upstream API.

use std::future::Future;

use serde_json::Value;

use crate::error::ApiResult;
use crate::session::ApiSession;

/// Anything that can answer "give me the `elements` of this collection".
///
/// [`ApiSession`] is the production implementation; tests substitute
/// canned fixtures.
pub trait ElementSource {
    fn elements(&mut self, path: &str) -> impl Future<Output = ApiResult<Vec<Value>>> + Send;
}

impl ElementSource for ApiSession {
    fn elements(&mut self, path: &str) -> impl Future<Output = ApiResult<Vec<Value>>> + Send {
        self.fetch_elements(path)
    }
}
