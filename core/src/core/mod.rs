pub mod context;
pub mod context_data;
pub mod control;
pub mod step;

pub use context::{AbortHandler, Handler};
pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use step::StepDef;
