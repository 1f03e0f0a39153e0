use std::sync::Arc;

use crate::{
    canvas::{DrawingBackend, VelloBackend},
    config::ToolboxConfig,
    foundation::error::{ToolboxError, ToolboxResult},
};

/// Everything an operation needs besides its inputs.
pub struct OperationContext {
    pub config: ToolboxConfig,
    backend: Arc<dyn DrawingBackend>,
    pool: Option<rayon::ThreadPool>,
}

impl OperationContext {
    /// Validate `config` and build the worker pool it asks for.
    pub fn new(config: ToolboxConfig) -> ToolboxResult<Self> {
        config.validate()?;
        let pool = match config.threads {
            Some(n) => Some(build_thread_pool(Some(n))?),
            None => None,
        };
        Ok(Self {
            config,
            backend: Arc::new(VelloBackend),
            pool,
        })
    }

    /// Replace the drawing backend used by generators.
    pub fn with_backend(mut self, backend: Arc<dyn DrawingBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn backend(&self) -> &dyn DrawingBackend {
        self.backend.as_ref()
    }

    /// Run `f` on the dedicated pool when one is configured, else on the caller's pool.
    pub fn install<R, F>(&self, f: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self {
            config: ToolboxConfig::default(),
            backend: Arc::new(VelloBackend),
            pool: None,
        }
    }
}

impl std::fmt::Debug for OperationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationContext")
            .field("config", &self.config)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}

fn build_thread_pool(threads: Option<usize>) -> ToolboxResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ToolboxError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ToolboxError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/command/context.rs"]
mod tests;
