//! Frame batching
//!
//! `QuadBatch` is the `Surface` the scene draws into: sprites become colored
//! triangles, text is collected for the DOM HUD.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::assets::Resources;
use crate::scene::{Surface, canvas_rect};
use crate::sim::{Rect, Sprite};

/// A line of text requested by the scene
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub pos: Vec2,
    pub font: String,
}

/// Vertices and text for one frame
pub struct QuadBatch<'a> {
    resources: &'a Resources,
    vertices: Vec<Vertex>,
    texts: Vec<TextItem>,
}

impl<'a> QuadBatch<'a> {
    pub fn new(resources: &'a Resources) -> Self {
        Self {
            resources,
            vertices: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn texts(&self) -> &[TextItem] {
        &self.texts
    }
}

impl Surface for QuadBatch<'_> {
    fn clear(&mut self, rect: Rect) {
        if rect == canvas_rect() {
            self.vertices.clear();
            self.texts.clear();
        } else {
            self.vertices.extend(shapes::quad(rect, colors::BACKGROUND));
        }
    }

    fn draw_image(&mut self, sprite: Sprite, rect: Rect) {
        match self.resources.get(sprite) {
            Ok(def) => self.vertices.extend(shapes::sprite(def, rect)),
            Err(e) => {
                log::warn!("{e}");
                self.vertices.extend(shapes::quad(rect, colors::MISSING_SPRITE));
            }
        }
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, font: &str) {
        self.texts.push(TextItem {
            text: text.to_string(),
            pos,
            font: font.to_string(),
        });
    }
}
