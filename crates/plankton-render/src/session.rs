//! Per-generation element factory.
//!
//! One `Session` exists per `generate` call and owns the identity counter,
//! the z-order stamp and the element buffer. The counters are session state,
//! not globals, so independent generations can never interleave ids.

use crate::config::DiagramConfig;
use crate::geom::Point;
use crate::scene::{ArrowBinding, BoundElement, Element, ElementKind, Roundness};
use crate::text::{estimate_text_width, text_block_height};
use rustc_hash::FxHashMap;

const BINDING_GAP: f64 = 4.0;

pub(crate) struct Session<'a> {
    pub cfg: &'a DiagramConfig,
    elements: Vec<Element>,
    index: FxHashMap<String, usize>,
    next_id: u64,
    next_stamp: u64,
}

impl<'a> Session<'a> {
    pub fn new(cfg: &'a DiagramConfig) -> Self {
        Self {
            cfg,
            elements: Vec::new(),
            index: FxHashMap::default(),
            next_id: 0,
            next_stamp: 0,
        }
    }

    fn issue_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Monotonic z-order stamp; element order in the buffer is the paint
    /// order, the stamp additionally survives into `version`/`seed`.
    fn stamp(&mut self) -> u64 {
        self.next_stamp += 1;
        self.next_stamp
    }

    fn base_element(&mut self, prefix: &str, kind: ElementKind) -> Element {
        let id = self.issue_id(prefix);
        let stamp = self.stamp();
        Element {
            id,
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            stroke_color: self.cfg.box_stroke_color.clone(),
            background_color: "transparent".to_string(),
            fill_style: "solid".to_string(),
            stroke_width: 1.0,
            stroke_style: "solid".to_string(),
            roughness: 1,
            opacity: 100.0,
            group_ids: Vec::new(),
            frame_id: None,
            roundness: None,
            seed: stamp.wrapping_mul(0x9e37_79b9_7f4a_7c15),
            version: stamp,
            is_deleted: false,
            bound_elements: Vec::new(),
            locked: false,
            text: None,
            font_size: None,
            font_family: None,
            text_align: None,
            vertical_align: None,
            points: None,
            start_binding: None,
            end_binding: None,
            start_arrowhead: None,
            end_arrowhead: None,
        }
    }

    fn push(&mut self, element: Element) -> String {
        let id = element.id.clone();
        self.index.insert(id.clone(), self.elements.len());
        self.elements.push(element);
        id
    }

    pub fn add_box(&mut self, x: f64, y: f64, width: f64, height: f64) -> String {
        let mut el = self.base_element("box", ElementKind::Rectangle);
        el.x = x;
        el.y = y;
        el.width = width;
        el.height = height;
        el.roundness = Some(Roundness { kind: 3 });
        self.push(el)
    }

    pub fn add_ellipse(&mut self, x: f64, y: f64, width: f64, height: f64) -> String {
        let mut el = self.base_element("ellipse", ElementKind::Ellipse);
        el.x = x;
        el.y = y;
        el.width = width;
        el.height = height;
        self.push(el)
    }

    pub fn add_text(&mut self, x: f64, y: f64, text: &str, font_size: f64, color: &str) -> String {
        let mut el = self.base_element("text", ElementKind::Text);
        el.x = x;
        el.y = y;
        el.width = estimate_text_width(text, font_size);
        el.height = text_block_height(text, font_size);
        el.stroke_color = color.to_string();
        el.text = Some(text.to_string());
        el.font_size = Some(font_size);
        el.font_family = Some(1);
        el.text_align = Some("center".to_string());
        el.vertical_align = Some("top".to_string());
        self.push(el)
    }

    /// Text placed by its horizontal center.
    pub fn add_centered_text(
        &mut self,
        center_x: f64,
        y: f64,
        text: &str,
        font_size: f64,
        color: &str,
    ) -> String {
        let width = estimate_text_width(text, font_size);
        self.add_text(center_x - width / 2.0, y, text, font_size, color)
    }

    /// An arrow from `start` to `end`, bound on both ends when anchor ids
    /// are supplied. Bindings are symmetric: each bound shape records the
    /// arrow in its `boundElements`.
    pub fn add_arrow(
        &mut self,
        start: Point,
        end: Point,
        start_anchor: Option<&str>,
        end_anchor: Option<&str>,
    ) -> String {
        let mut el = self.base_element("arrow", ElementKind::Arrow);
        el.x = start.x;
        el.y = start.y;
        el.width = (end.x - start.x).abs();
        el.height = (end.y - start.y).abs();
        el.stroke_color = self.cfg.arrow_stroke_color.clone();
        el.points = Some(vec![[0.0, 0.0], [end.x - start.x, end.y - start.y]]);
        el.end_arrowhead = Some("arrow".to_string());
        el.start_binding = start_anchor.map(|anchor| ArrowBinding {
            element_id: anchor.to_string(),
            focus: 0.0,
            gap: BINDING_GAP,
        });
        el.end_binding = end_anchor.map(|anchor| ArrowBinding {
            element_id: anchor.to_string(),
            focus: 0.0,
            gap: BINDING_GAP,
        });
        let id = self.push(el);

        for anchor in [start_anchor, end_anchor].into_iter().flatten() {
            if let Some(&idx) = self.index.get(anchor) {
                self.elements[idx].bound_elements.push(BoundElement {
                    id: id.clone(),
                    kind: ElementKind::Arrow,
                });
            }
        }
        id
    }

    /// Watermark for a subtree about to be generated; everything appended
    /// after it belongs to that subtree.
    pub fn mark(&self) -> usize {
        self.elements.len()
    }

    /// Shifts every element emitted since `mark` horizontally. Arrow point
    /// deltas are deliberately left alone: endpoints are defined relative to
    /// the base coordinate, so a uniform base shift keeps bindings true.
    pub fn translate_x(&mut self, mark: usize, dx: f64) {
        if dx == 0.0 {
            return;
        }
        for el in &mut self.elements[mark..] {
            el.x += dx;
        }
    }

    pub fn finish(self) -> Vec<Element> {
        self.elements
    }
}
