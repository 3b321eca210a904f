#![forbid(unsafe_code)]

//! `plankton` turns physical-plan text (DataFusion `EXPLAIN` style) into a
//! fully positioned whiteboard diagram.
//!
//! The pipeline is parse → layout → document:
//!
//! ```
//! use plankton::{scene_from_plan, ParseOptions};
//! use plankton::render::DiagramConfig;
//!
//! let text = "\
//! SortExec: expr=[a@0 ASC]
//!   DataSourceExec: file_groups={1 group: [[data.csv]]}, projection=[a, b], file_type=csv
//! ";
//! let doc = scene_from_plan(text, ParseOptions::default(), &DiagramConfig::default())
//!     .expect("layout ok")
//!     .expect("plan detected");
//! assert!(!doc.elements.is_empty());
//! ```

pub use plankton_core::*;

pub mod render {
    pub use plankton_render::{
        generate, layout_plan, DiagramConfig, Element, ElementKind, Error, LayoutedPlan,
        NodeLayout, Result, SceneDocument,
    };
}

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Parse(#[from] plankton_core::Error),
    #[error(transparent)]
    Render(#[from] plankton_render::Error),
}

pub type HeadlessResult<T> = std::result::Result<T, HeadlessError>;

/// One-call pipeline: parse the plan text and generate the scene document.
/// Returns `Ok(None)` when the input contains no plan.
pub fn scene_from_plan(
    text: &str,
    parse_options: ParseOptions,
    config: &render::DiagramConfig,
) -> HeadlessResult<Option<render::SceneDocument>> {
    let Some(root) = parse_plan(text, parse_options)? else {
        return Ok(None);
    };
    Ok(Some(plankton_render::generate(Some(&root), config)?))
}

/// Parse + layout without the document envelope, for callers that want the
/// structured layout (extents, cardinalities) rather than a scene file.
pub fn layout_from_plan(
    text: &str,
    parse_options: ParseOptions,
    config: &render::DiagramConfig,
) -> HeadlessResult<Option<render::LayoutedPlan>> {
    let Some(root) = parse_plan(text, parse_options)? else {
        return Ok(None);
    };
    Ok(Some(plankton_render::layout_plan(&root, config)?))
}
