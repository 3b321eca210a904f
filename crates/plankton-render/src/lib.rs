#![forbid(unsafe_code)]

//! Headless layout + whiteboard-scene generation for physical plans.
//!
//! The engine walks a parsed operator tree once, depth first. Every operator
//! family has a layout strategy that sizes the node's box, places its
//! children (stacked for pipelines, side by side for joins, spread and
//! centered for unions) and draws the data-flow arrows between them; the
//! result is a flat element list wrapped into an Excalidraw-compatible
//! document.
//!
//! Generation is synchronous and pure: all mutable state (identity counter,
//! z-order stamp, element buffer) lives in a per-call session, so concurrent
//! calls never share anything.

pub mod config;
pub mod geom;
pub mod model;
pub mod scene;
pub mod text;

mod arrows;
mod ops;
mod session;

pub use config::DiagramConfig;
pub use model::NodeLayout;
pub use scene::{Element, ElementKind, SceneDocument};

use plankton_core::PlanNode;
use session::Session;

pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors: plans a diagram cannot represent even partially.
/// Unknown operators and missing properties are not errors; they only
/// degrade the rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{operator} expects exactly 2 inputs, found {found}")]
    JoinArity { operator: String, found: usize },

    #[error("sort-merge join sides disagree on partition count: left={left}, right={right}")]
    MergeJoinPartitionMismatch { left: usize, right: usize },
}

/// A fully positioned plan: the root's layout result plus every element the
/// walk emitted, in paint order.
#[derive(Debug, Clone)]
pub struct LayoutedPlan {
    pub root: NodeLayout,
    pub elements: Vec<Element>,
}

/// Lays out the whole tree with the root box at the origin.
pub fn layout_plan(root: &PlanNode, config: &DiagramConfig) -> Result<LayoutedPlan> {
    let mut session = Session::new(config);
    let layout = ops::layout_node(&mut session, root, 0.0, 0.0, true)?;
    Ok(LayoutedPlan {
        root: layout,
        elements: session.finish(),
    })
}

/// Wraps a layout run into the document envelope. `None` (empty input)
/// produces an empty but valid document.
pub fn generate(root: Option<&PlanNode>, config: &DiagramConfig) -> Result<SceneDocument> {
    match root {
        Some(root) => {
            let laid = layout_plan(root, config)?;
            Ok(SceneDocument::from_elements(laid.elements, config))
        }
        None => Ok(SceneDocument::empty(config)),
    }
}
