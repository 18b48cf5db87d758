//! Task variants accepted by the batch queue
//!
//! A task is one of three things:
//! - a value that is already computed,
//! - a zero-argument callable producing either a value or a pending operation,
//! - a pending operation (a boxed future resolving to `Result<T, E>`).
//!
//! Every variant is normalized into [`Pending`] exactly once, when its batch is
//! admitted, so the executor never inspects task kinds itself.

use std::fmt;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt};

/// Boxed future for an in-flight task
pub type PendingFuture<T, E> = BoxFuture<'static, Result<T, E>>;

/// Callable task body
pub type TaskFn<T, E> = Box<dyn FnOnce() -> Pending<T, E> + Send + 'static>;

/// Normalized view of a task
pub enum Pending<T, E> {
    /// Result is available immediately
    Ready(T),
    /// Result arrives when the future completes
    InFlight(PendingFuture<T, E>),
}

impl<T, E> Pending<T, E> {
    /// Wrap an immediately-available result
    pub fn ready(value: T) -> Self {
        Pending::Ready(value)
    }

    /// Wrap a future resolving to the task result
    pub fn in_flight<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Pending::InFlight(future.boxed())
    }

    /// Whether the result is already available
    pub fn is_ready(&self) -> bool {
        matches!(self, Pending::Ready(_))
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Pending<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pending::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Pending::InFlight(_) => f.debug_tuple("InFlight").field(&"PendingFuture").finish(),
        }
    }
}

/// A unit of work submitted to the queue
pub enum Task<T, E> {
    /// Literal value
    Value(T),
    /// Deferred computation, invoked when its batch is admitted
    Callable(TaskFn<T, E>),
    /// Pending operation
    Pending(PendingFuture<T, E>),
}

impl<T, E> Task<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Task that resolves to `value` without doing any work
    pub fn value(value: T) -> Self {
        Task::Value(value)
    }

    /// Task backed by a future
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Task::Pending(future.boxed())
    }

    /// Task backed by a callable that decides between a value and a pending operation
    pub fn call<F>(callable: F) -> Self
    where
        F: FnOnce() -> Pending<T, E> + Send + 'static,
    {
        Task::Callable(Box::new(callable))
    }

    /// Task backed by a callable returning a future, e.g. one request per record
    pub fn call_async<F, Fut>(callable: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Task::call(move || Pending::in_flight(callable()))
    }

    /// Normalize into a pending operation.
    ///
    /// Callables are invoked here. A panicking callable is not caught: the
    /// panic unwinds out of whoever admitted the task.
    pub fn into_pending(self) -> Pending<T, E> {
        match self {
            Task::Value(value) => Pending::Ready(value),
            Task::Callable(callable) => callable(),
            Task::Pending(future) => Pending::InFlight(future),
        }
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Task::Value(_) => "value",
            Task::Callable(_) => "callable",
            Task::Pending(_) => "pending",
        }
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Task<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Task::Callable(_) => f.debug_tuple("Callable").field(&"TaskFn").finish(),
            Task::Pending(_) => f.debug_tuple("Pending").field(&"PendingFuture").finish(),
        }
    }
}

impl<T, E> From<Pending<T, E>> for Task<T, E> {
    fn from(pending: Pending<T, E>) -> Self {
        match pending {
            Pending::Ready(value) => Task::Value(value),
            Pending::InFlight(future) => Task::Pending(future),
        }
    }
}
