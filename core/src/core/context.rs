// core/src/core/context.rs

//! Handler type aliases for pipeline steps and abort hooks.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A step handler.
///
/// Takes a clone of the pipeline's `ContextData<TData>` and resolves to
/// `Result<PipelineControl, Err>`. Handlers must drop every lock guard before
/// their first `.await`; the guards are blocking `parking_lot` guards.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// An abort hook, run after a step handler fails.
///
/// Receives the context and the name of the step that failed. Abort hooks
/// cannot fail: cleanup errors are logged by the hook and swallowed so the
/// original step error is what the caller sees.
pub type AbortHandler<TData> =
  Box<dyn Fn(ContextData<TData>, String) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;
