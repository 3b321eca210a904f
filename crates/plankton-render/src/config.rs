/// Geometry and style knobs for one generation run.
///
/// Label sizes derive from `font_size` unless overridden: operator labels at
/// 1.25x, detail/edge labels at 0.875x.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramConfig {
    pub box_width: f64,
    pub box_height: f64,
    pub vertical_spacing: f64,
    pub horizontal_spacing: f64,
    pub font_size: f64,
    pub operator_font_size: Option<f64>,
    pub detail_font_size: Option<f64>,
    pub box_stroke_color: String,
    pub arrow_stroke_color: String,
    /// Color of edge-label columns the plan knows to be sorted.
    pub highlight_color: String,
    pub background_color: String,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            box_width: 200.0,
            box_height: 80.0,
            vertical_spacing: 100.0,
            horizontal_spacing: 50.0,
            font_size: 16.0,
            operator_font_size: None,
            detail_font_size: None,
            box_stroke_color: "#1e1e1e".to_string(),
            arrow_stroke_color: "#1971c2".to_string(),
            highlight_color: "#e8590c".to_string(),
            background_color: "#ffffff".to_string(),
        }
    }
}

impl DiagramConfig {
    pub fn operator_label_size(&self) -> f64 {
        self.operator_font_size.unwrap_or(self.font_size * 1.25)
    }

    pub fn detail_label_size(&self) -> f64 {
        self.detail_font_size.unwrap_or(self.font_size * 0.875)
    }

    /// Gap between a box bottom and the top of a stacked child, kept shorter
    /// than the configured spacing so chain arrows stay compact.
    pub fn chain_gap(&self) -> f64 {
        self.vertical_spacing * 3.0 / 5.0
    }
}
