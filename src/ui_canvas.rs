// ui_canvas.rs
use egui::{Color32, Pos2, Rect, Response, Ui, Stroke, Vec2};

use crate::capture::CameraStream;
use crate::pose::{self, PoseKeypoint};
use crate::skeleton::{self, OverlayShapes};

const KEYPOINT_RADIUS: f32 = 5.0;
const KEYPOINT_FILL: Color32 = Color32::from_rgb(102, 126, 234);
const BONE_STROKE: f32 = 3.0;

/// Camera pane: simulated feed backdrop, pose skeleton overlay, stats readout
/// and the status toast. Redrawn from scratch every frame.
pub fn draw_overlay_canvas(
    ui: &mut Ui,
    size: Vec2,
    stream: Option<&CameraStream>,
    keypoints: Option<&[PoseKeypoint]>,
    hint: Option<&str>,
    status_message: &str,
    status_timer: f32,
) -> Response {
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, 0.0,
        if ui.visuals().dark_mode { Color32::from_gray(15) } else { Color32::from_gray(35) });

    match stream {
        None => {
            painter.text(rect.center(), egui::Align2::CENTER_CENTER, "📷",
                egui::FontId::proportional(42.0), Color32::from_gray(90));
            painter.text(rect.center() + Vec2::new(0.0, 38.0), egui::Align2::CENTER_CENTER,
                "摄像头未启动", egui::FontId::proportional(14.0), Color32::from_gray(120));
        }
        Some(stream) => {
            draw_feed_backdrop(&painter, rect);
            draw_live_badge(&painter, rect);

            let shapes = skeleton::overlay_shapes(keypoints);
            draw_shapes(&painter, rect, &shapes);

            let stats = match keypoints {
                Some(points) => format!(
                    "置信度 {}% · 关键点 {}/{} · {}x{}",
                    pose::confidence_percent(points),
                    pose::detected_count(points),
                    pose::KEYPOINT_COUNT,
                    stream.width, stream.height,
                ),
                None => format!("置信度 0% · 关键点 0/{}", pose::KEYPOINT_COUNT),
            };
            painter.text(Pos2::new(rect.min.x + 8.0, rect.max.y - 8.0), egui::Align2::LEFT_BOTTOM,
                stats, egui::FontId::proportional(11.0), Color32::from_gray(170));

            if let Some(hint) = hint {
                painter.text(Pos2::new(rect.center().x, rect.max.y - 28.0), egui::Align2::CENTER_BOTTOM,
                    hint, egui::FontId::proportional(13.0),
                    Color32::from_rgba_premultiplied(255, 255, 255, 170));
            }
        }
    }

    draw_status_toast(&painter, rect, status_message, status_timer);
    response
}

/// There is no real decoder behind the stream; a soft vignette stands in for
/// the camera image so the skeleton reads against something.
fn draw_feed_backdrop(painter: &egui::Painter, rect: Rect) {
    let steps = 5;
    for i in 0..steps {
        let inset = i as f32 * 14.0;
        let level = 26 + i * 4;
        painter.rect_filled(rect.shrink(inset), 4.0, Color32::from_gray(level as u8));
    }
}

fn draw_live_badge(painter: &egui::Painter, rect: Rect) {
    let pos = Pos2::new(rect.min.x + 10.0, rect.min.y + 10.0);
    painter.circle_filled(pos + Vec2::new(5.0, 6.0), 4.0, Color32::from_rgb(220, 50, 50));
    painter.text(pos + Vec2::new(14.0, 0.0), egui::Align2::LEFT_TOP, "LIVE",
        egui::FontId::proportional(11.0), Color32::from_rgb(230, 120, 120));
}

fn draw_shapes(painter: &egui::Painter, rect: Rect, shapes: &OverlayShapes) {
    let at = |x: f32, y: f32| Pos2::new(rect.min.x + x, rect.min.y + y);
    for &((ax, ay), (bx, by)) in &shapes.bones {
        painter.line_segment([at(ax, ay), at(bx, by)], Stroke::new(BONE_STROKE, KEYPOINT_FILL));
    }
    for &(x, y) in &shapes.markers {
        painter.circle_filled(at(x, y), KEYPOINT_RADIUS, KEYPOINT_FILL);
        painter.circle_stroke(at(x, y), KEYPOINT_RADIUS, Stroke::new(2.0, Color32::WHITE));
    }
}

fn draw_status_toast(painter: &egui::Painter, rect: Rect, status_message: &str, status_timer: f32) {
    if status_message.is_empty() || status_timer <= 0.0 {
        return;
    }
    let is_ok = status_message.starts_with('✅');
    let is_err = status_message.starts_with('❌');
    let alpha = ((status_timer / 0.5).min(1.0) * 230.0) as u8;
    let rgba = |r, g, b| Color32::from_rgba_premultiplied(r, g, b, alpha);

    let (bg_col, border_col, text_col) = if is_ok {
        (rgba(20, 60, 20), rgba(60, 200, 60), rgba(140, 255, 140))
    } else if is_err {
        (rgba(60, 20, 20), rgba(200, 60, 60), rgba(255, 140, 140))
    } else {
        (rgba(30, 30, 50), rgba(120, 140, 220), rgba(200, 210, 255))
    };

    let galley = painter.layout_no_wrap(status_message.to_string(),
        egui::FontId::proportional(13.0), text_col);
    let pad = egui::vec2(14.0, 8.0);
    let toast_size = galley.size() + pad * 2.0;
    let toast_pos = Pos2::new(rect.max.x - toast_size.x - 16.0, rect.min.y + 16.0);
    let toast_rect = Rect::from_min_size(toast_pos, toast_size);

    painter.rect_filled(toast_rect.translate(Vec2::new(2.0, 3.0)), 8.0,
        Color32::from_rgba_premultiplied(0, 0, 0, alpha / 3));
    painter.rect_filled(toast_rect, 8.0, bg_col);
    painter.rect_stroke(toast_rect, 8.0, Stroke::new(1.5, border_col), egui::StrokeKind::Inside);
    painter.galley(toast_pos + pad, galley, text_col);
}
