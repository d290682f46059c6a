use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};
use tracing::{debug, info};

use crate::{
    algorithms::{connected_segment, OutlineCompositor},
    cache::{BoundaryCache, MaskKey},
    error::{OutlineError, Result},
    pipeline::{composite_cached, OutlinePipeline},
    types::{EditMask, ErasedStroke, ExcludedRegion, MaskSource, OutlineStyleConfig, RasterBuffer},
};

/// Which interactive tool is armed. At most one at a time.
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolMode {
    #[default]
    Idle,
    Erase,
    Exclude,
}

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum EditCommand {
    /// Arm a tool (arming one disarms the other)
    #[serde(rename = "set_tool")]
    SetTool { mode: ToolMode },

    /// Erase outline paint within a circle
    #[serde(rename = "erase")]
    Erase {
        x: f32,
        y: f32,
        #[schemars(range(min = 0.0))]
        radius: f32,
    },

    /// Remove the connected outline segment under a point
    #[serde(rename = "exclude")]
    Exclude { x: f32, y: f32 },

    /// Forget all erase strokes
    #[serde(rename = "clear_erase")]
    ClearErase,

    /// Forget all excluded segments
    #[serde(rename = "clear_exclude")]
    ClearExclude,

    /// Replace the current outline style
    #[serde(rename = "set_style")]
    SetStyle { config: OutlineStyleConfig },
}

impl EditCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EditCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SetTool { .. } => "Arm the erase or exclude tool, or return to idle",
            Self::Erase { .. } => "Erase outline pixels within a radius of a point",
            Self::Exclude { .. } => "Remove the connected outline segment under a point",
            Self::ClearErase => "Remove all erase strokes",
            Self::ClearExclude => "Restore all excluded outline segments",
            Self::SetStyle { .. } => "Change outline color, thickness or style",
        }
    }
}

/// Interactive editing state for one image.
///
/// Holds the boundary cache for the current mask, the current outline style,
/// and the erase/exclude edits made against that mask. Independent sessions
/// share nothing mutable and can render on different threads.
#[derive(Clone)]
pub struct EditSession {
    image: RasterBuffer,
    pipeline: Arc<OutlinePipeline>,
    cache: Option<BoundaryCache>,
    config: OutlineStyleConfig,
    tool: ToolMode,
    strokes: Vec<ErasedStroke>,
    excluded: ExcludedRegion,
}

impl EditSession {
    /// Session over `image` with no mask yet; renders pass the image through
    pub fn new(image: RasterBuffer) -> Self {
        Self::with_pipeline(image, OutlinePipeline::default())
    }

    pub fn with_pipeline(image: RasterBuffer, pipeline: OutlinePipeline) -> Self {
        Self {
            image,
            pipeline: Arc::new(pipeline),
            cache: None,
            config: OutlineStyleConfig::default(),
            tool: ToolMode::Idle,
            strokes: Vec::new(),
            excluded: ExcludedRegion::default(),
        }
    }

    /// Session over `image` with `mask` already prepared
    pub fn with_mask(image: RasterBuffer, mask: impl Into<MaskSource>) -> Result<Self> {
        let mut session = Self::new(image);
        session.set_mask(mask)?;
        Ok(session)
    }

    /// Supply a mask, fingerprinting its content.
    ///
    /// Returns `true` when the mask differs from the current one, in which
    /// case the boundary cache is rebuilt and all edits are dropped.
    pub fn set_mask(&mut self, mask: impl Into<MaskSource>) -> Result<bool> {
        let mask = mask.into();
        let key = MaskKey::of(&mask);
        self.replace_mask(&mask, key)
    }

    /// Supply a mask identified by a caller revision token instead of a hash
    pub fn set_mask_with_revision(&mut self, mask: impl Into<MaskSource>, revision: u64) -> Result<bool> {
        let mask = mask.into();
        let key = MaskKey::with_revision(&mask, revision);
        self.replace_mask(&mask, key)
    }

    fn replace_mask(&mut self, mask: &MaskSource, key: MaskKey) -> Result<bool> {
        if mask.dimensions() != self.image.dimensions() {
            return Err(OutlineError::DimensionMismatch {
                image: self.image.dimensions(),
                mask: mask.dimensions(),
            });
        }

        if self.cache.as_ref().is_some_and(|c| c.key == key) {
            debug!(?key, "mask unchanged, keeping boundary cache");
            return Ok(false);
        }

        let cache = self.pipeline.prepare_keyed(mask, key)?;
        self.cache = Some(cache);
        self.strokes.clear();
        self.excluded.clear();
        info!(?key, "mask replaced, edits cleared");
        Ok(true)
    }

    /// Apply one edit command
    pub fn apply(&mut self, command: EditCommand) {
        match command {
            EditCommand::SetTool { mode } => self.set_tool(mode),
            EditCommand::Erase { x, y, radius } => self.apply_erase(x, y, radius),
            EditCommand::Exclude { x, y } => {
                self.apply_exclude(x, y);
            }
            EditCommand::ClearErase => self.clear_erase(),
            EditCommand::ClearExclude => self.clear_exclude(),
            EditCommand::SetStyle { config } => self.set_style(config),
        }
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    pub fn set_tool(&mut self, mode: ToolMode) {
        self.tool = mode;
    }

    /// Arm `mode`, or disarm it if it is already armed
    pub fn toggle_tool(&mut self, mode: ToolMode) {
        self.tool = if self.tool == mode { ToolMode::Idle } else { mode };
    }

    pub fn style(&self) -> &OutlineStyleConfig {
        &self.config
    }

    /// Set the style used by [`render_current`](Self::render_current) and by
    /// exclusion clicks
    pub fn set_style(&mut self, config: OutlineStyleConfig) {
        self.config = config;
    }

    /// Record an eraser stroke centred at `(x, y)`. Points off the image are
    /// ignored.
    pub fn apply_erase(&mut self, x: f32, y: f32, radius: f32) {
        if !self.contains_point(x, y) {
            debug!(x, y, "erase outside image ignored");
            return;
        }
        self.strokes.push(ErasedStroke::new(x, y, radius.max(0.0)));
    }

    /// Exclude the connected outline segment under `(x, y)` at the current
    /// thickness. Returns how many pixels the segment covers. Nothing is
    /// excluded while the outline is disabled or the point misses it.
    pub fn apply_exclude(&mut self, x: f32, y: f32) -> usize {
        let Some(cache) = &self.cache else {
            debug!("exclude before any mask, nothing to do");
            return 0;
        };
        if !self.config.enabled {
            debug!("exclude while outline disabled, nothing painted to hit");
            return 0;
        }
        if !self.contains_point(x, y) {
            debug!(x, y, "exclude outside image ignored");
            return 0;
        }

        // The last render may have used another thickness
        let field = cache.distance_field(self.config.clamped_thickness());
        let segment = connected_segment(&cache.exterior, &field, x.floor() as u32, y.floor() as u32);
        let count = segment.len();
        self.excluded.extend(segment);
        debug!(x, y, count, total = self.excluded.len(), "outline segment excluded");
        count
    }

    pub fn clear_erase(&mut self) {
        self.strokes.clear();
    }

    pub fn clear_exclude(&mut self) {
        self.excluded.clear();
    }

    /// Render with an explicit style. Reads session state only.
    pub fn render(&self, config: &OutlineStyleConfig) -> RasterBuffer {
        match &self.cache {
            Some(cache) => composite_cached(cache, &self.image, config, self.edits()),
            None => self.image.clone(),
        }
    }

    /// Render with the session's current style
    pub fn render_current(&self) -> RasterBuffer {
        self.render(&self.config)
    }

    /// Indices the given style would recolor, after edits
    pub fn painted_pixels(&self, config: &OutlineStyleConfig) -> Vec<usize> {
        let Some(cache) = &self.cache else {
            return Vec::new();
        };
        if !config.enabled || !cache.has_foreground() {
            return Vec::new();
        }
        let field = cache.distance_field(config.clamped_thickness());
        OutlineCompositor {
            exterior: &cache.exterior,
            field: &field,
            edits: self.edits(),
        }
        .painted(config.style)
    }

    pub fn image(&self) -> &RasterBuffer {
        &self.image
    }

    pub fn cache(&self) -> Option<&BoundaryCache> {
        self.cache.as_ref()
    }

    pub fn has_foreground(&self) -> bool {
        self.cache.as_ref().is_some_and(BoundaryCache::has_foreground)
    }

    pub fn boundary_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.boundary.len())
    }

    pub fn strokes(&self) -> &[ErasedStroke] {
        &self.strokes
    }

    pub fn excluded(&self) -> &ExcludedRegion {
        &self.excluded
    }

    fn edits(&self) -> EditMask<'_> {
        EditMask {
            strokes: &self.strokes,
            excluded: &self.excluded,
        }
    }

    fn contains_point(&self, x: f32, y: f32) -> bool {
        let (w, h) = self.image.dimensions();
        x >= 0.0 && y >= 0.0 && x < w as f32 && y < h as f32
    }
}
