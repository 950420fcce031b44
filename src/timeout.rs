//! Timeout guard: race a unit of work against a deadline.

use crate::retry::QueryError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Races `op` against `budget`.
///
/// The operation receives its own cancellation token, cancelled exactly once
/// when the deadline fires first; a second, independent token guards the
/// internal timer and is cancelled when the operation settles first, so no
/// timer outlives the guard. Completion (ok or err) before the deadline is
/// returned unchanged; a deadline hit yields [`QueryError::Timeout`].
///
/// The guard never waits for a cancelled operation to acknowledge its token:
/// the operation future is dropped along with the race. Safe with
/// `budget == 0` and with operations that ignore their token.
pub async fn with_timeout<T, F, Fut>(op: F, budget: Duration) -> Result<T, QueryError>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, QueryError>>,
{
    let op_token = CancellationToken::new();
    let timer_token = CancellationToken::new();

    let work = op(op_token.clone());
    let timer = timer_token.run_until_cancelled(tokio::time::sleep(budget));
    tokio::pin!(work, timer);

    tokio::select! {
        res = &mut work => {
            timer_token.cancel();
            res
        }
        // `Some` means the sleep elapsed; a cancelled timer disables this arm.
        Some(()) = &mut timer => {
            op_token.cancel();
            Err(QueryError::Timeout { budget })
        }
    }
}
