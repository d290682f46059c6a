use crate::{
    algorithms::{AlphaThreshold, LargestComponentFilter},
    pipeline::OutlinePipeline,
    traits::MaskFilter,
};

/// Builder for outline pipelines with a fluent API
pub struct PipelineBuilder {
    threshold: AlphaThreshold,
    filters: Vec<Box<dyn MaskFilter>>,
    keep_all_components: bool,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            threshold: AlphaThreshold::default(),
            filters: Vec::new(),
            keep_all_components: false,
        }
    }

    /// Alpha above which a pixel is foreground (default 128)
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = AlphaThreshold { threshold };
        self
    }

    /// Add a mask filter. Filters run in insertion order.
    pub fn add_filter<F>(mut self, filter: F) -> Self
    where
        F: MaskFilter + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// Skip the default largest-component noise filter
    pub fn keep_all_components(mut self) -> Self {
        self.keep_all_components = true;
        self
    }

    /// Build the pipeline. Without explicit filters the largest-component
    /// filter is installed.
    pub fn build(self) -> OutlinePipeline {
        let mut filters = self.filters;
        if filters.is_empty() && !self.keep_all_components {
            filters.push(Box::new(LargestComponentFilter));
        }
        OutlinePipeline::new(self.threshold, filters)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
