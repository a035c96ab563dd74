//! Resolver chain.
//!
//! An ordered list of named stages. Each stage receives a [`Next`] continuation
//! and decides itself whether resolution continues:
//!
//! ```text
//! resolve(component)
//!   └─ setup.transform(component, ctx, next)
//!        └─ next.run ─▶ components.transform(...)
//!                          └─ next.run ─▶ styles.transform(...)
//!                                            └─ next.run ─▶ dataAttribs ...
//! ```
//!
//! A stage that returns without calling `next.run` ends resolution for that
//! component. A stage that fails before calling `next.run` is recorded on the
//! component and the chain carries on with the stage after it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use compact_str::CompactString;
use futures::future::{BoxFuture, FutureExt};
use mural_relief::{Component, ComponentEvent};

use crate::context::ResolveContext;
use crate::errors::{ChainError, ChainResult, StageResult};
use crate::stages::{ComponentsStage, DataAttribsStage, SetupStage, StylesStage};

/// One resolver stage.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Unique stage name.
    fn name(&self) -> &str;

    /// Transform the component, then call `next.run` to continue.
    async fn transform(
        &self,
        component: &mut Component,
        ctx: &ResolveContext<'_>,
        next: Next<'_>,
    ) -> StageResult;
}

/// Continuation handed to a stage.
pub struct Next<'a> {
    chain: &'a ResolverChain,
    index: usize,
    called: &'a AtomicBool,
}

impl Next<'_> {
    /// Run the remaining stages.
    pub async fn run(self, component: &mut Component, ctx: &ResolveContext<'_>) {
        self.called.store(true, Ordering::Release);
        self.chain.run_from(self.index, component, ctx).await;
    }
}

#[derive(Clone)]
struct StageEntry {
    stage: Arc<dyn Stage>,
    internal: bool,
    enabled: bool,
}

impl StageEntry {
    fn name(&self) -> &str {
        self.stage.name()
    }
}

/// Ordered stage registry and interpreter.
#[derive(Clone, Default)]
pub struct ResolverChain {
    stages: Vec<StageEntry>,
}

impl ResolverChain {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard `setup → components → styles → dataAttribs` chain.
    ///
    /// `setup` is internal: every other stage relies on the reader it installs.
    pub fn standard() -> Self {
        let mut chain = Self::new();
        chain.push(Arc::new(SetupStage), true);
        chain.push(Arc::new(ComponentsStage), false);
        chain.push(Arc::new(StylesStage), false);
        chain.push(Arc::new(DataAttribsStage), false);
        chain
    }

    fn push(&mut self, stage: Arc<dyn Stage>, internal: bool) {
        self.stages.push(StageEntry {
            stage,
            internal,
            enabled: true,
        });
    }

    fn register(&mut self, stage: Arc<dyn Stage>, internal: bool) -> ChainResult<&mut Self> {
        if self.position(stage.name()).is_some() {
            return Err(ChainError::DuplicateStage(CompactString::new(stage.name())));
        }
        self.push(stage, internal);
        Ok(self)
    }

    /// Append a stage.
    pub fn use_stage(&mut self, stage: impl Stage + 'static) -> ChainResult<&mut Self> {
        self.register(Arc::new(stage), false)
    }

    /// Append a stage that cannot be removed or disabled.
    pub fn use_internal(&mut self, stage: impl Stage + 'static) -> ChainResult<&mut Self> {
        self.register(Arc::new(stage), true)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|entry| entry.name() == name)
    }

    fn entry_mut(&mut self, name: &str) -> ChainResult<&mut StageEntry> {
        let entry = self
            .stages
            .iter_mut()
            .find(|entry| entry.name() == name)
            .ok_or_else(|| ChainError::UnknownStage(CompactString::new(name)))?;
        if entry.internal {
            return Err(ChainError::InternalStage(CompactString::new(name)));
        }
        Ok(entry)
    }

    /// Remove a stage by name.
    pub fn remove(&mut self, name: &str) -> ChainResult<()> {
        self.entry_mut(name)?;
        self.stages.retain(|entry| entry.name() != name);
        Ok(())
    }

    /// Enable or disable a stage by name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> ChainResult<()> {
        self.entry_mut(name)?.enabled = enabled;
        Ok(())
    }

    /// Whether a stage is registered and enabled.
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.position(name).map(|i| self.stages[i].enabled)
    }

    /// Registered stage names in order.
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(StageEntry::name).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run a component through the chain.
    pub async fn resolve(&self, component: Option<&mut Component>, ctx: &ResolveContext<'_>) {
        let Some(component) = component else {
            tracing::warn!("resolver chain invoked without a component");
            return;
        };
        if component.kind().as_str().is_empty() {
            tracing::warn!(id = component.id, "component has an empty type; skipping");
            return;
        }
        self.run_from(0, component, ctx).await;
    }

    fn run_from<'f, 'c: 'f>(
        &'f self,
        index: usize,
        component: &'f mut Component,
        ctx: &'f ResolveContext<'c>,
    ) -> BoxFuture<'f, ()> {
        async move {
            let Some((position, entry)) = self
                .stages
                .iter()
                .enumerate()
                .skip(index)
                .find(|(_, entry)| entry.enabled)
            else {
                return;
            };

            let called = AtomicBool::new(false);
            let next = Next {
                chain: self,
                index: position + 1,
                called: &called,
            };

            if let Err(err) = entry.stage.transform(component, ctx, next).await {
                tracing::error!(
                    stage = entry.name(),
                    id = component.id,
                    kind = %component.kind(),
                    "stage failed: {err}"
                );
                component.raise(ComponentEvent::StageFailed {
                    stage: CompactString::new(entry.name()),
                    message: err.to_string(),
                });
                if !called.load(Ordering::Acquire) {
                    self.run_from(position + 1, component, ctx).await;
                }
            }
        }
        .boxed()
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|entry| {
                (entry.name().to_string(), entry.internal, entry.enabled)
            }))
            .finish()
    }
}
