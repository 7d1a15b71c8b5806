use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::AccessCode;
use crate::error::GateError;

/// Future returned by a [`CodeStore::transact`] closure. Borrows the
/// transaction handle for `'c`.
pub type TxnFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, GateError>> + Send + 'c>>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Reads and writes staged inside one [`CodeStore::transact`] call.
pub trait CodeTxn: Send {
    fn get(
        &mut self,
        id: &str,
    ) -> impl Future<Output = Result<Option<AccessCode>, GateError>> + Send;

    /// Insert or overwrite the record keyed by `code.id`.
    fn put(&mut self, code: &AccessCode) -> impl Future<Output = Result<(), GateError>> + Send;

    /// Remove the record. Deleting a missing key is not an error.
    fn delete(&mut self, id: &str) -> impl Future<Output = Result<(), GateError>> + Send;
}

/// Transactional persistence for access codes.
///
/// `transact` applies everything the closure did atomically or nothing at
/// all. When another transaction touching the same key committed first it
/// fails with [`GateError::Conflict`]; callers wrap it in
/// [`photofind_core::retry::with_retry`], which is safe because the closure
/// re-reads state on every attempt. An `Err` from the closure rolls back.
pub trait CodeStore: Clone + Send + Sync + 'static {
    type Txn: CodeTxn;

    /// Store-assigned key for a new record. Random UUIDs, so issuers never
    /// collide.
    fn allocate_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Non-transactional read.
    fn get(&self, id: &str) -> impl Future<Output = Result<Option<AccessCode>, GateError>> + Send;

    fn put(&self, code: &AccessCode) -> impl Future<Output = Result<(), GateError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), GateError>> + Send;

    fn transact<T, F>(&self, f: F) -> impl Future<Output = Result<T, GateError>> + Send
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut Self::Txn) -> TxnFuture<'c, T> + Send;

    /// Ids of unused codes created before `cutoff`.
    fn stale_unused(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<String>, GateError>> + Send;

    /// Cheap round trip used by the readiness probe.
    fn ping(&self) -> impl Future<Output = Result<(), GateError>> + Send;
}

/// Deferred, at-least-once cleanup of unredeemed codes.
pub trait CleanupScheduler: Clone + Send + Sync + 'static {
    /// Arrange for the cleanup job for `id` to run once `delay` has elapsed.
    /// An `Err` means nothing was scheduled.
    fn schedule_cleanup(&self, id: &str, delay: Duration) -> Result<(), GateError>;
}

/// Remote image annotation (text detection). One response per input image,
/// in input order.
pub trait Annotator: Send + Sync {
    fn annotate(
        &self,
        images: Vec<Vec<u8>>,
    ) -> BoxFuture<'_, Result<Vec<serde_json::Value>, GateError>>;
}
