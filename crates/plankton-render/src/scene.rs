//! Whiteboard scene model.
//!
//! The element shape follows the Excalidraw file format closely enough that
//! generated documents open in any compatible viewer. Only the fields the
//! layout engine populates are modelled; everything else is left to viewer
//! defaults.

use crate::config::DiagramConfig;
use serde::Serialize;

pub const SCENE_TYPE: &str = "excalidraw";
pub const SCENE_VERSION: u32 = 2;
pub const SCENE_SOURCE: &str = "plankton";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Text,
    Arrow,
}

/// Arrow endpoint attachment. The bound shape records the arrow id in its
/// `boundElements` in return; the factory keeps the two sides consistent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowBinding {
    pub element_id: String,
    pub focus: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Roundness {
    #[serde(rename = "type")]
    pub kind: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: String,
    pub stroke_width: f64,
    pub stroke_style: String,
    pub roughness: u8,
    pub opacity: f64,
    pub group_ids: Vec<String>,
    pub frame_id: Option<String>,
    pub roundness: Option<Roundness>,
    pub seed: u64,
    pub version: u64,
    pub is_deleted: bool,
    pub bound_elements: Vec<BoundElement>,
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_binding: Option<ArrowBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_binding: Option<ArrowBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_arrowhead: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_arrowhead: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub view_background_color: String,
    pub grid_size: Option<u32>,
}

/// The document envelope consumers load into a whiteboard viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub source: String,
    pub elements: Vec<Element>,
    #[serde(rename = "appState")]
    pub app_state: AppState,
}

impl SceneDocument {
    pub fn from_elements(elements: Vec<Element>, config: &DiagramConfig) -> Self {
        Self {
            kind: SCENE_TYPE.to_string(),
            version: SCENE_VERSION,
            source: SCENE_SOURCE.to_string(),
            elements,
            app_state: AppState {
                view_background_color: config.background_color.clone(),
                grid_size: None,
            },
        }
    }

    /// The empty-but-valid document produced for empty input.
    pub fn empty(config: &DiagramConfig) -> Self {
        Self::from_elements(Vec::new(), config)
    }
}
