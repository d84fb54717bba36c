//! RPC dispatch and futures.
//!
//! `rpc(target, closure)` ships a closure to `target`'s inbox and returns a
//! future. The closure only ever runs when `target`'s own thread calls
//! [`Runtime::progress`](super::Runtime::progress): directly, via
//! [`RpcFuture::wait`], or via [`Runtime::barrier`](super::Runtime::barrier).
//! Nothing here blocks the caller; the boxed job sits in a lock-free queue
//! until the owning rank gets around to it.

use super::runtime::Runtime;
use super::RankId;
use crossbeam::channel::{bounded, Receiver, TryRecvError};

/// A boxed unit of work destined for one rank's own thread, closed over the
/// per-rank payload type `T` (here always the table's `RankCell`).
pub type Job<T> = Box<dyn FnOnce(&T) + Send>;

/// A future fulfilled once the target rank's progress engine has run the
/// dispatched closure. Ordering between independent futures to the same
/// target is not guaranteed.
pub struct RpcFuture<R> {
    rx: Receiver<R>,
}

impl<R: Send + 'static> RpcFuture<R> {
    /// Blocks the caller until the response arrives, making progress on this
    /// rank's own inbox while it waits so that a remote peer blocked on an
    /// RPC to *this* rank can still be served.
    pub fn wait<T: super::RankState>(self, runtime: &Runtime<T>, me: RankId, my_state: &T) -> R {
        loop {
            match self.rx.try_recv() {
                Ok(value) => return value,
                Err(TryRecvError::Empty) => {
                    runtime.progress(me, my_state);
                    std::thread::yield_now();
                }
                Err(TryRecvError::Disconnected) => {
                    panic!("RPC future dropped before a response was produced")
                }
            }
        }
    }
}

impl<T: super::RankState> Runtime<T> {
    /// Dispatches `f` to execute on `target`'s own thread the next time it
    /// reaches a progress point, returning a future for its result.
    ///
    /// Fire-and-forget use (the insert batcher's flush path) simply drops
    /// the returned future without calling `wait`; correctness then rests on
    /// the end-of-phase barrier, which guarantees every dispatched RPC has
    /// been drained by the time all ranks have passed it.
    pub fn rpc<R, F>(&self, target: RankId, f: F) -> RpcFuture<R>
    where
        R: Send + 'static,
        F: FnOnce(&T) -> R + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let job: Job<T> = Box::new(move |state: &T| {
            let result = f(state);
            // The caller may have already dropped the future (fire-and-forget);
            // a disconnected receiver here is not an error.
            let _ = tx.send(result);
        });
        self.push_job(target, job);
        RpcFuture { rx }
    }
}
