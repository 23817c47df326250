use crate::animate::AnimationConfig;

/// Construction parameters of a diagram.
///
/// Geometry and behavior live here; purely visual styling (styles, glyph
/// strings, the surrounding block) is configured on the
/// [`Diagram`](crate::Diagram) widget itself.
#[derive(Debug, Clone)]
pub struct DiagramConfig {
    pub(crate) indent_unit: u16,
    pub(crate) row_height: u16,
    pub(crate) minimum_height: u16,
    pub(crate) tooltip_field: Option<String>,
    pub(crate) animation: AnimationConfig,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            indent_unit: 2,
            row_height: 1,
            minimum_height: 0,
            tooltip_field: None,
            animation: AnimationConfig::default(),
        }
    }
}

impl DiagramConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal cells per depth level.
    #[must_use]
    pub fn indent_unit(mut self, cells: u16) -> Self {
        self.indent_unit = cells.max(1);
        self
    }

    /// Vertical cells per row.
    #[must_use]
    pub fn row_height(mut self, cells: u16) -> Self {
        self.row_height = cells.max(1);
        self
    }

    /// Floor on [`required_height`](crate::DiagramState::required_height),
    /// regardless of how few rows are visible.
    #[must_use]
    pub fn minimum_height(mut self, cells: u16) -> Self {
        self.minimum_height = cells;
        self
    }

    /// Payload field presented as tooltip on the hovered row.
    ///
    /// Without a field name tooltips are fully disabled and hover updates
    /// are ignored altogether.
    #[must_use]
    pub fn tooltip_field<S: Into<String>>(mut self, field: S) -> Self {
        self.tooltip_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }
}
