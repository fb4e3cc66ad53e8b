// core/src/pipeline/hooks.rs

//! Registration of `before`, `on`, `after` and abort handlers.

use tracing::{event, Level};

use crate::core::context::{AbortHandler, Handler};
use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use std::future::Future;

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn wrap_handler<F, UserProvidedErr>(
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Handler<TData, Err>
  where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    Box::new(move |ctx_data| {
      let user_fut = handler_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    })
  }

  /// Registers a `before` handler for a step. The handler's error type only
  /// needs to convert into the pipeline's `Err`.
  pub fn before_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .before
      .entry(step_name.to_string())
      .or_default()
      .push(Self::wrap_handler(handler_fn));
  }

  /// Registers an `on` handler for a step.
  pub fn on_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .on
      .entry(step_name.to_string())
      .or_default()
      .push(Self::wrap_handler(handler_fn));
  }

  /// Registers an `after` handler for a step.
  pub fn after_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .after
      .entry(step_name.to_string())
      .or_default()
      .push(Self::wrap_handler(handler_fn));
  }

  /// Registers an abort hook.
  ///
  /// Abort hooks run, in registration order, after any handler returns an
  /// error and before that error leaves `run`. They get the context and the
  /// name of the failed step. A `Stop` is not a failure and does not trigger
  /// them.
  pub fn on_abort<F>(&mut self, abort_fn: impl Fn(ContextData<TData>, String) -> F + Send + Sync + 'static)
  where
    F: Future<Output = ()> + Send + 'static,
  {
    let hook: AbortHandler<TData> = Box::new(move |ctx_data, failed_step| Box::pin(abort_fn(ctx_data, failed_step)));
    self.abort.push(hook);
    event!(Level::DEBUG, abort_hooks = self.abort.len(), "Abort hook registered.");
  }
}
