use serde::{Deserialize, Serialize};

use crate::model::Rectangle;

/// Ordered list of committed rectangles. Append-only apart from `undo`
/// (drops the newest) and `clear`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationHistory {
    rects: Vec<Rectangle>,
}

impl AnnotationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rect: Rectangle) {
        self.rects.push(rect);
    }

    /// Removes and returns the most recent rectangle, if any.
    pub fn undo(&mut self) -> Option<Rectangle> {
        self.rects.pop()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn as_slice(&self) -> &[Rectangle] {
        &self.rects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rectangle> {
        self.rects.iter()
    }

    pub fn from_json(data: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

impl From<Vec<Rectangle>> for AnnotationHistory {
    fn from(rects: Vec<Rectangle>) -> Self {
        Self { rects }
    }
}

impl<'a> IntoIterator for &'a AnnotationHistory {
    type Item = &'a Rectangle;
    type IntoIter = std::slice::Iter<'a, Rectangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
