//! Lazy, pull-based sequences built from a step function
//!
//! A step function maps a cursor to either a value plus the next cursor, or
//! to [`Step::Done`]. The resulting stream evaluates one step per poll, so a
//! consumer that stops pulling never triggers further steps.
//!
//! # Example
//!
//! ```
//! use cumulus_cli::unfold::{unfold, Step};
//! use futures::TryStreamExt;
//!
//! # tokio_test::block_on(async {
//! let evens = unfold(10i32, |x| async move {
//!     Ok::<_, std::convert::Infallible>(if x >= 0 {
//!         Step::Continue { output: x, next: x - 2 }
//!     } else {
//!         Step::Done
//!     })
//! });
//! let values: Vec<i32> = evens.try_collect().await.unwrap();
//! assert_eq!(values, vec![10, 8, 6, 4, 2, 0]);
//! # });
//! ```

use futures::stream::{self, Stream};
use std::future::Future;

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T, C> {
    /// Yield `output`, then call the step function again with `next`
    Continue { output: T, next: C },
    /// Stop producing values
    Done,
}

impl<T, C> Step<T, C> {
    fn into_pair(self) -> Option<(T, C)> {
        match self {
            Step::Continue { output, next } => Some((output, next)),
            Step::Done => None,
        }
    }
}

impl<T, C> From<Option<(T, C)>> for Step<T, C> {
    fn from(value: Option<(T, C)>) -> Self {
        match value {
            Some((output, next)) => Step::Continue { output, next },
            None => Step::Done,
        }
    }
}

/// Build a lazy stream from `seed` and an asynchronous step function.
///
/// The first error returned by `step` is yielded once and terminates the
/// stream; later polls return `None`.
pub fn unfold<C, T, E, F, Fut>(seed: C, mut step: F) -> impl Stream<Item = Result<T, E>>
where
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<Step<T, C>, E>>,
{
    stream::try_unfold(seed, move |cursor| {
        let pending = step(cursor);
        async move { pending.await.map(Step::into_pair) }
    })
}
