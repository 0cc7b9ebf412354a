use std::io::Cursor;

use annotate_rects::freehand::FreehandSurface;
use annotate_rects::{AnnotationPage, CanvasSize, LabelColor, PageSettings, Rectangle};
use image::{ImageFormat, Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn png_bytes(w: u32, h: u32, fill: Rgba<u8>) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(w, h, fill)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn drag(page: &mut AnnotationPage, from: (f32, f32), to: (f32, f32)) {
    page.begin_rect(from);
    page.update_rect(to);
    page.end_rect(to);
}

#[test]
fn upload_then_drag_records_rectangle() {
    let mut page = AnnotationPage::new(PageSettings::default());
    assert!(page.load_background_now(png_bytes(300, 300, WHITE)));
    assert_eq!(page.size(), CanvasSize::new(300, 300));

    page.select_color(LabelColor::MainStatement);
    drag(&mut page, (10.0, 10.0), (60.0, 40.0));

    let json = serde_json::to_value(page.history()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"startX": 10.0, "startY": 10.0, "width": 50.0, "height": 30.0, "color": "red"}
        ])
    );
}

#[test]
fn each_drag_appends_one_rectangle() {
    let mut page = AnnotationPage::new(PageSettings::default());
    for n in 1..=12 {
        let offset = n as f32 * 3.0;
        drag(&mut page, (offset, offset), (offset + 20.0, offset - 5.0));
        assert_eq!(page.history().len(), n);
    }
}

#[test]
fn undo_drops_the_most_recent_drag() {
    let mut page = AnnotationPage::new(PageSettings::default());
    page.select_color(LabelColor::ChildStatement);
    drag(&mut page, (0.0, 0.0), (10.0, 10.0));
    page.select_color(LabelColor::Question);
    drag(&mut page, (20.0, 20.0), (40.0, 40.0));

    let removed = page.undo().unwrap();
    assert_eq!(page.history().len(), 1);
    assert_eq!(removed.start_x, 20.0);
    assert_eq!(removed.color, LabelColor::Question);
    assert_eq!(page.history().as_slice()[0].color, LabelColor::ChildStatement);
}

#[test]
fn undo_then_clear_on_empty_page() {
    let mut page = AnnotationPage::new(PageSettings::default());
    assert!(page.undo().is_none());
    page.clear();
    assert!(page.history().is_empty());
}

#[test]
fn export_composites_background_strokes_and_rectangles() {
    let mut page = AnnotationPage::new(PageSettings {
        default_size: CanvasSize::default(),
        brush_radius: 2.0,
    });
    assert!(page.load_background_now(png_bytes(100, 100, WHITE)));
    page.begin_stroke((80.0, 80.0));
    page.extend_stroke((90.0, 80.0));
    page.end_stroke();
    page.add_rectangle(Rectangle {
        start_x: 0.0,
        start_y: 0.0,
        width: 50.0,
        height: 50.0,
        color: LabelColor::Question,
    });

    let out = page.export().unwrap();
    assert_eq!(out.dimensions(), (100, 100));
    assert_eq!(*out.get_pixel(25, 25), WHITE);
    assert_eq!(*out.get_pixel(85, 80), Rgba([0, 0, 0, 255]));
    for (x, y) in [(0, 25), (25, 0), (50, 25), (25, 50)] {
        assert_eq!(*out.get_pixel(x, y), BLUE, "outline pixel ({x}, {y})");
    }
    assert_eq!(*out.get_pixel(2, 25), WHITE);
}

#[test]
fn export_without_background_produces_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drawing.png");
    let mut page = AnnotationPage::new(PageSettings::default());
    drag(&mut page, (0.0, 0.0), (50.0, 50.0));

    assert!(page.export().is_none());
    assert!(!page.save_png(&path).unwrap());
    assert!(!path.exists());
}

#[test]
fn saved_png_matches_canvas_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drawing.png");
    let mut page = AnnotationPage::new(PageSettings::default());
    page.load_background_now(png_bytes(64, 40, WHITE));
    drag(&mut page, (5.0, 5.0), (30.0, 30.0));

    assert!(page.save_png(&path).unwrap());
    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (64, 40));
}

#[test]
fn new_upload_clears_freehand_but_keeps_rectangles() {
    let mut page = AnnotationPage::new(PageSettings::default());
    page.load_background_now(png_bytes(50, 50, WHITE));
    drag(&mut page, (5.0, 5.0), (20.0, 20.0));
    page.begin_stroke((30.0, 30.0));
    page.end_stroke();

    page.load_background_now(png_bytes(80, 60, WHITE));
    assert_eq!(page.size(), CanvasSize::new(80, 60));
    assert!(page.freehand().is_empty());
    assert_eq!(page.history().len(), 1);
    assert_eq!(page.overlay().surface().dimensions(), (80, 60));
}
