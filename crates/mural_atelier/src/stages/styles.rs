//! Styles stage.

use async_trait::async_trait;
use mural_relief::Component;

use crate::chain::{Next, Stage};
use crate::context::ResolveContext;
use crate::errors::StageResult;
use crate::style::compute_style;

/// Replaces the component's style with one computed from its blueprint.
pub struct StylesStage;

#[async_trait]
impl Stage for StylesStage {
    fn name(&self) -> &str {
        "styles"
    }

    async fn transform(
        &self,
        component: &mut Component,
        ctx: &ResolveContext<'_>,
        next: Next<'_>,
    ) -> StageResult {
        component.style = compute_style(component, ctx);
        next.run(component, ctx).await;
        Ok(())
    }
}
