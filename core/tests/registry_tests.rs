// core/tests/registry_tests.rs
mod common;

use common::*;
use giftline_core::{ContextData, FlowError, FlowRegistry, Pipeline, PipelineControl, PipelineResult};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct CartFlowContext {
  cart_id: String,
}
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct OrderFlowContext {
  edits: i32,
}

#[tokio::test]
async fn test_registry_runs_pipeline_for_context_type() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();

  let mut cart = Pipeline::<CartFlowContext, TestError>::new(&[("cart_task", false, None)]);
  cart.on_root("cart_task", |ctx: ContextData<CartFlowContext>| {
    Box::pin(async move {
      ctx.write().cart_id = "gid://shopify/Cart/c1".to_string();
      Ok::<PipelineControl, FlowError>(PipelineControl::Continue)
    })
  });
  registry.register_pipeline(cart);

  let mut order = Pipeline::<OrderFlowContext, TestError>::new(&[("order_task", false, None)]);
  order.on_root("order_task", |ctx: ContextData<OrderFlowContext>| {
    Box::pin(async move {
      ctx.write().edits = 3;
      Ok::<PipelineControl, FlowError>(PipelineControl::Continue)
    })
  });
  registry.register_pipeline(order);

  let cart_ctx = ContextData::new(CartFlowContext::default());
  assert_eq!(registry.run(cart_ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(cart_ctx.read().cart_id, "gid://shopify/Cart/c1");

  let order_ctx = ContextData::new(OrderFlowContext::default());
  assert_eq!(registry.run(order_ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(order_ctx.read().edits, 3);

  assert_eq!(
    registry.step_names::<OrderFlowContext>(),
    Some(vec!["order_task".to_string()])
  );
}

#[tokio::test]
async fn test_registry_pipeline_not_found() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();

  #[derive(Clone, Debug, Default)]
  struct UnregisteredContext;

  let result = registry.run(ContextData::new(UnregisteredContext)).await;

  match result {
    Err(TestError::Flow(s)) => {
      assert!(s.contains("ConfigurationError"));
      assert!(s.contains("No pipeline registered"));
      assert!(s.contains("UnregisteredContext"));
    }
    other => panic!("Expected FlowError::ConfigurationError, got {:?}", other),
  }
  assert!(registry.step_names::<UnregisteredContext>().is_none());
}

#[tokio::test]
async fn test_registry_pipeline_itself_errors() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();

  let mut cart = Pipeline::<CartFlowContext, TestError>::new(&[("cart_fail", false, None)]);
  cart.on_root("cart_fail", |_ctx: ContextData<CartFlowContext>| {
    Box::pin(async move { Err(TestError::Handler("cart pipeline failed".to_string())) })
  });
  registry.register_pipeline(cart);

  let result = registry.run(ContextData::new(CartFlowContext::default())).await;
  assert_eq!(result.unwrap_err(), TestError::Handler("cart pipeline failed".to_string()));
}

#[tokio::test]
async fn test_registry_with_flow_error_default() {
  setup_tracing();
  let registry: FlowRegistry = FlowRegistry::new();

  #[derive(Clone, Debug, Default)]
  struct SimpleCtx {
    count: i32,
  }

  let mut pipeline = Pipeline::<SimpleCtx, FlowError>::new(&[("task", false, None)]);
  pipeline.on_root("task", |ctx: ContextData<SimpleCtx>| {
    Box::pin(async move {
      ctx.write().count = 1;
      Ok::<PipelineControl, FlowError>(PipelineControl::Continue)
    })
  });
  registry.register_pipeline(pipeline);

  let ctx = ContextData::new(SimpleCtx::default());
  assert!(registry.run(ctx.clone()).await.is_ok());
  assert_eq!(ctx.read().count, 1);
}
