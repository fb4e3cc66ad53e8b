// core/src/lib.rs

//! giftline-core: async named-step pipelines for webhook-driven workflows.
//!
//! A pipeline is an ordered list of named steps. Each step carries
//! `before`/`on`/`after` handler phases that operate on a shared
//! [`ContextData`]. Handlers either continue, stop the run early, or fail.
//! When a handler fails, the pipeline's abort handlers run before the error
//! is returned, which gives multi-call remote transactions a place to undo
//! whatever they staged.
//!
//! Pipelines are registered in a [`FlowRegistry`] keyed by their context
//! data type, so an HTTP handler only needs to build the context and call
//! `registry.run(ctx)`.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::{AbortHandler, Handler};
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::FlowRegistry;

/*
    Typical wiring:
    1. Define a context struct `MyCtx` holding the request inputs and the
       state each step fills in.
    2. Build a `Pipeline<MyCtx, MyError>` from `(name, optional, skip_if)`
       step tuples and attach handlers with `.on_root()` and friends.
    3. Attach `.on_abort()` hooks for anything that must be undone when a
       later step fails.
    4. Register the pipeline with a `FlowRegistry<MyError>` at startup.
    5. Per request: `registry.run(ContextData::new(ctx)).await`.
*/
