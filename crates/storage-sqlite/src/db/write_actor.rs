use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use giveaway_core::errors::{DatabaseError, Error, Result};
use log::{debug, warn};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A write job runs against the actor's connection inside an open IMMEDIATE
// transaction and returns a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type AnyBox = Box<dyn Any + Send + 'static>;
type Envelope = (Job<AnyBox>, oneshot::Sender<Result<AnyBox>>);

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

fn actor_gone() -> Error {
    Error::Database(DatabaseError::TransactionFailed(
        "database writer is no longer running".to_string(),
    ))
}

impl WriteHandle {
    /// Executes `job` on the writer actor's dedicated connection.
    ///
    /// Jobs run one at a time, each inside its own `BEGIN IMMEDIATE`
    /// transaction: the transaction commits when the job returns `Ok` and rolls
    /// back when it returns `Err`. Errors produced by the job come back
    /// unchanged.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as AnyBox)),
                ret_tx,
            ))
            .await
            .map_err(|_| actor_gone())?;

        let boxed = ret_rx.await.map_err(|_| actor_gone())??;
        boxed.downcast::<T>().map(|value| *value).map_err(|_| {
            Error::Unexpected("writer returned a value of the wrong type".to_string())
        })
    }
}

/// Spawns a background Tokio task that acts as the single writer to the
/// database.
///
/// The actor owns one pooled connection for its whole lifetime and processes
/// jobs serially, so every write in the process is serialised. SQLite's
/// reserved lock, taken by `BEGIN IMMEDIATE`, serialises writers across
/// processes.
pub fn spawn_writer(pool: &DbPool) -> Result<WriteHandle> {
    let mut conn = pool.get().map_err(StorageError::from)?;
    let (tx, mut rx) = mpsc::channel::<Envelope>(1024);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<AnyBox> = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(Error::from);

            if reply_tx.send(result).is_err() {
                // The caller went away; the transaction outcome stands.
                warn!("Write job finished after its caller was dropped");
            }
        }
        debug!("Database writer stopped");
    });

    Ok(WriteHandle { tx })
}
