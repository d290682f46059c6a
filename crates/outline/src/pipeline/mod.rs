pub mod builder;

use std::time::Instant;

use tracing::{debug, info};

use crate::{
    algorithms::{classify_exterior, extract_boundary, AlphaThreshold, OutlineCompositor},
    cache::{BoundaryCache, MaskKey},
    error::{OutlineError, Result},
    traits::MaskFilter,
    types::{EditMask, MaskSource, OutlineStyleConfig, RasterBuffer},
};

/// Mask-to-outline pipeline.
///
/// [`prepare`](Self::prepare) runs the per-mask stages once (threshold,
/// filters, exterior classification, boundary extraction) and
/// [`render`](Self::render) runs the per-style stages (distance field and
/// compositing) against that cache.
pub struct OutlinePipeline {
    threshold: AlphaThreshold,
    filters: Vec<Box<dyn MaskFilter>>,
}

impl OutlinePipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(threshold: AlphaThreshold, filters: Vec<Box<dyn MaskFilter>>) -> Self {
        Self { threshold, filters }
    }

    /// Build the boundary cache for a mask, fingerprinting its content
    pub fn prepare(&self, source: &MaskSource) -> Result<BoundaryCache> {
        self.prepare_keyed(source, MaskKey::of(source))
    }

    /// Build the boundary cache for a mask under an explicit key
    pub fn prepare_keyed(&self, source: &MaskSource, key: MaskKey) -> Result<BoundaryCache> {
        let started = Instant::now();

        // Step 1: Binarize alpha
        let mut foreground = self.threshold.apply(source)?;

        // Step 2: Clean up (largest component by default)
        for filter in &self.filters {
            filter.filter(&mut foreground)?;
        }

        // Step 3: Separate exterior background from holes
        let exterior = classify_exterior(&foreground);

        // Step 4: Zero-distance frontier
        let boundary = extract_boundary(&foreground, &exterior);

        info!(
            width = key.width,
            height = key.height,
            foreground = foreground.count_set(),
            boundary = boundary.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "boundary cache built"
        );

        Ok(BoundaryCache {
            key,
            foreground,
            exterior,
            boundary,
        })
    }

    /// Render the outline onto `image`. The image must match the cached mask.
    pub fn render(
        &self,
        cache: &BoundaryCache,
        image: &RasterBuffer,
        config: &OutlineStyleConfig,
        edits: EditMask<'_>,
    ) -> Result<RasterBuffer> {
        if image.dimensions() != cache.dimensions() {
            return Err(OutlineError::DimensionMismatch {
                image: image.dimensions(),
                mask: cache.dimensions(),
            });
        }
        Ok(composite_cached(cache, image, config, edits))
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        let filters: Vec<&str> = self.filters.iter().map(|f| f.name()).collect();
        format!(
            "OutlinePipeline: alpha > {}, filters [{}]",
            self.threshold.threshold,
            filters.join(", ")
        )
    }
}

impl Default for OutlinePipeline {
    fn default() -> Self {
        builder::PipelineBuilder::new().build()
    }
}

/// Distance field plus compositing against an already validated cache
pub(crate) fn composite_cached(
    cache: &BoundaryCache,
    image: &RasterBuffer,
    config: &OutlineStyleConfig,
    edits: EditMask<'_>,
) -> RasterBuffer {
    if !config.enabled || !cache.has_foreground() {
        debug!(enabled = config.enabled, "outline skipped, passing image through");
        return image.clone();
    }

    let field = cache.distance_field(config.clamped_thickness());
    OutlineCompositor {
        exterior: &cache.exterior,
        field: &field,
        edits,
    }
    .composite(image, config.color, config.style)
}
