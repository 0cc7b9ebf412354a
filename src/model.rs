use serde::{Deserialize, Serialize};

// ── Colors ──────────────────────────────────────────────────────────────────

/// Annotation label. Each label maps to one fixed stroke color; serialized as
/// the CSS color string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelColor {
    #[default]
    #[serde(rename = "black")]
    Black,
    #[serde(rename = "red")]
    MainStatement,
    #[serde(rename = "green")]
    ChildStatement,
    #[serde(rename = "blue")]
    Question,
    #[serde(rename = "#8B4513")]
    Image,
    #[serde(rename = "#C71585")]
    MarkingScheme,
    #[serde(rename = "yellow")]
    MarkingSchemeImage,
}

impl LabelColor {
    /// The selectable palette, in toolbar order. `Black` is only the initial
    /// selection and has no button.
    pub const PALETTE: [LabelColor; 6] = [
        LabelColor::MainStatement,
        LabelColor::ChildStatement,
        LabelColor::Question,
        LabelColor::Image,
        LabelColor::MarkingScheme,
        LabelColor::MarkingSchemeImage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LabelColor::Black => "Default",
            LabelColor::MainStatement => "Main Statement",
            LabelColor::ChildStatement => "Child Statement",
            LabelColor::Question => "Question",
            LabelColor::Image => "Image",
            LabelColor::MarkingScheme => "Marking Scheme",
            LabelColor::MarkingSchemeImage => "Marking Scheme Image",
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            LabelColor::Black => "black",
            LabelColor::MainStatement => "red",
            LabelColor::ChildStatement => "green",
            LabelColor::Question => "blue",
            LabelColor::Image => "#8B4513",
            LabelColor::MarkingScheme => "#C71585",
            LabelColor::MarkingSchemeImage => "yellow",
        }
    }

    /// Straight (non-premultiplied) RGBA, matching the CSS named colors.
    pub fn rgba(self) -> [u8; 4] {
        match self {
            LabelColor::Black => [0, 0, 0, 255],
            LabelColor::MainStatement => [255, 0, 0, 255],
            LabelColor::ChildStatement => [0, 128, 0, 255],
            LabelColor::Question => [0, 0, 255, 255],
            LabelColor::Image => [0x8B, 0x45, 0x13, 255],
            LabelColor::MarkingScheme => [0xC7, 0x15, 0x85, 255],
            LabelColor::MarkingSchemeImage => [255, 255, 0, 255],
        }
    }

    pub fn to_egui(self) -> egui::Color32 {
        let [r, g, b, a] = self.rgba();
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

// ── Geometry ────────────────────────────────────────────────────────────────

/// A committed annotation in overlay-canvas pixel space. Width and height are
/// signed: dragging up or left yields negative extents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub start_x: f32,
    pub start_y: f32,
    pub width: f32,
    pub height: f32,
    pub color: LabelColor,
}

impl Rectangle {
    /// Rectangle spanning from `origin` to `current`, as a drag produces it.
    pub fn from_drag(origin: (f32, f32), current: (f32, f32), color: LabelColor) -> Self {
        Self {
            start_x: origin.0,
            start_y: origin.1,
            width: current.0 - origin.0,
            height: current.1 - origin.1,
            color,
        }
    }

    /// `(min_x, min_y, max_x, max_y)` with negative extents folded in.
    pub fn normalized(&self) -> (f32, f32, f32, f32) {
        let x1 = self.start_x + self.width;
        let y1 = self.start_y + self.height;
        (
            self.start_x.min(x1),
            self.start_y.min(y1),
            self.start_x.max(x1),
            self.start_y.max(y1),
        )
    }
}

/// Pixel dimensions shared by the background, freehand and overlay layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn to_vec2(self) -> egui::Vec2 {
        egui::vec2(self.width as f32, self.height as f32)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(300, 300)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_serializes_with_page_field_names() {
        let rect = Rectangle::from_drag((10.0, 10.0), (60.0, 40.0), LabelColor::MainStatement);
        let json = serde_json::to_value(rect).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "startX": 10.0,
                "startY": 10.0,
                "width": 50.0,
                "height": 30.0,
                "color": "red"
            })
        );
    }

    #[test]
    fn colors_parse_from_css_strings() {
        let parsed: Vec<LabelColor> =
            serde_json::from_str(r##"["black", "#8B4513", "#C71585", "yellow"]"##).unwrap();
        assert_eq!(
            parsed,
            vec![
                LabelColor::Black,
                LabelColor::Image,
                LabelColor::MarkingScheme,
                LabelColor::MarkingSchemeImage
            ]
        );
    }

    #[test]
    fn palette_labels_match_toolbar() {
        let labels: Vec<&str> = LabelColor::PALETTE.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            [
                "Main Statement",
                "Child Statement",
                "Question",
                "Image",
                "Marking Scheme",
                "Marking Scheme Image"
            ]
        );
        assert_eq!(LabelColor::default(), LabelColor::Black);
    }

    #[test]
    fn drag_up_left_gives_negative_extents() {
        let rect = Rectangle::from_drag((60.0, 40.0), (10.0, 10.0), LabelColor::Question);
        assert_eq!(rect.width, -50.0);
        assert_eq!(rect.height, -30.0);
        assert_eq!(rect.normalized(), (10.0, 10.0, 60.0, 40.0));
    }
}
