//! Name → (schema, handler) dispatch table.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use tracing::debug;

use super::{ToolArgs, ToolError, ToolSpec};
use crate::ToolDefinition;

/// A callable tool body. Receives arguments already validated against the
/// tool's schema.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError>;
}

struct SyncFn<F>(F);

#[async_trait]
impl<F> ToolHandler for SyncFn<F>
where
    F: Fn(ToolArgs) -> Result<String, ToolError> + Send + Sync,
{
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError> {
        (self.0)(args)
    }
}

/// Wrap a plain function as a [`ToolHandler`].
pub fn sync_handler<F>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(ToolArgs) -> Result<String, ToolError> + Send + Sync + 'static,
{
    Arc::new(SyncFn(f))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
    #[error("tool '{tool}' declares parameter '{param}' more than once")]
    DuplicateParameter { tool: String, param: String },
    #[error("tool name must not be empty")]
    EmptyName,
}

/// A registered tool: its schema plus the handler that implements it.
pub struct RegisteredTool {
    spec: ToolSpec,
    handler: Arc<dyn ToolHandler>,
}

impl RegisteredTool {
    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    /// Validate `arguments` and run the handler.
    ///
    /// Panics inside the handler are caught and reported as
    /// [`ToolError::Panicked`].
    pub async fn invoke(&self, arguments: &serde_json::Value) -> Result<String, ToolError> {
        let args = self.spec.validate(arguments)?;
        AssertUnwindSafe(self.handler.call(args))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(ToolError::Panicked(self.spec.name.clone())))
    }
}

/// The canonical set of callable tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a tool. Fails if the name is taken or the schema repeats a
    /// parameter name.
    pub fn register(
        &mut self,
        spec: ToolSpec,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), RegistryError> {
        if spec.name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.index.contains_key(&spec.name) {
            return Err(RegistryError::DuplicateTool(spec.name));
        }
        for (i, param) in spec.parameters.iter().enumerate() {
            if spec.parameters[..i].iter().any(|p| p.name == param.name) {
                return Err(RegistryError::DuplicateParameter {
                    tool: spec.name.clone(),
                    param: param.name.clone(),
                });
            }
        }

        debug!(tool = %spec.name, params = spec.parameters.len(), "registered tool");
        self.index.insert(spec.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool { spec, handler });
        Ok(())
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Declarations for every tool, in registration order.
    pub fn declarations(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.spec.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.spec.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
