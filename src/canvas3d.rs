// canvas3d.rs
use egui::{Color32, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

use crate::sequence::{AnimationFrame, Vec3};

/// Remote positions arrive in centimetre-ish units; the rig lives in metres.
pub const POSITION_SCALE: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvatarStyle { Classic, Festive, Silhouette }

impl AvatarStyle {
    pub const ALL: [AvatarStyle; 3] = [AvatarStyle::Classic, AvatarStyle::Festive, AvatarStyle::Silhouette];

    pub fn label(self) -> &'static str {
        match self {
            AvatarStyle::Classic    => "经典",
            AvatarStyle::Festive    => "节日",
            AvatarStyle::Silhouette => "剪影",
        }
    }

    /// (head, body) palette.
    fn colors(self) -> (Color32, Color32) {
        match self {
            AvatarStyle::Classic    => (Color32::from_rgb(255, 219, 172), Color32::from_rgb(102, 126, 234)),
            AvatarStyle::Festive    => (Color32::from_rgb(255, 219, 172), Color32::from_rgb(231,  76,  60)),
            AvatarStyle::Silhouette => (Color32::from_gray(70), Color32::from_gray(50)),
        }
    }
}

// ── Camera ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Camera3D {
    pub focus: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub scale: f32,
}

impl Default for Camera3D {
    fn default() -> Self { Self { focus: [0.0, -0.9, 0.0], yaw: 0.0, pitch: 0.0, radius: 6.0, scale: 130.0 } }
}

impl Camera3D {
    fn eye(&self) -> [f32; 3] {
        let ((sy, cy), (sp, cp)) = (self.yaw.sin_cos(), self.pitch.sin_cos());
        [self.focus[0] + self.radius * cp * sy,
         self.focus[1] + self.radius * sp,
         self.focus[2] + self.radius * cp * cy]
    }

    /// Orthographic projection into the canvas rect; `None` behind the eye.
    /// The returned depth drives painter's-algorithm sorting.
    pub fn project(&self, p: [f32; 3], r: Rect) -> Option<(Pos2, f32)> {
        let eye = self.eye();
        let ((sy, cy), (sp, cp)) = (self.yaw.sin_cos(), self.pitch.sin_cos());
        let (fwd, right, up) = ([-cp * sy, -sp, -cp * cy], [cy, 0., -sy], [sp * sy, cp, sp * cy]);
        let d = [p[0] - eye[0], p[1] - eye[1], p[2] - eye[2]];
        let z = d[0] * fwd[0] + d[1] * fwd[1] + d[2] * fwd[2];
        if z < 0.01 { return None; }
        let (x, y) = (d[0] * right[0] + d[1] * right[1] + d[2] * right[2],
                      d[0] * up[0] + d[1] * up[1] + d[2] * up[2]);
        Some((Pos2::new(r.center().x + x * self.scale, r.center().y + y * self.scale), z))
    }
}

// ── Rig ───────────────────────────────────────────────────────────────────────

/// Primitive dancer: a ball head and five thick segments (trunk plus four
/// limbs), in metres, y-up, feet near the origin.
enum RigPart {
    Ball { center: Vec3, radius: f32 },
    Segment { a: Vec3, b: Vec3, width: f32 },
}

fn rotate_z(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
}

fn rotate_x(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

fn limb(center: Vec3, tilt_z: f32, half_len: f32, width: f32) -> RigPart {
    let axis = rotate_z(Vec3::new(0.0, half_len, 0.0), tilt_z);
    RigPart::Segment {
        a: Vec3::new(center.x - axis.x, center.y - axis.y, center.z - axis.z),
        b: Vec3::new(center.x + axis.x, center.y + axis.y, center.z + axis.z),
        width,
    }
}

fn rig_parts() -> [RigPart; 6] {
    use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};
    [
        RigPart::Ball { center: Vec3::new(0.0, 1.5, 0.0), radius: 0.3 },
        RigPart::Segment { a: Vec3::new(0.0, 0.3, 0.0), b: Vec3::new(0.0, 1.3, 0.0), width: 0.6 },
        limb(Vec3::new(-0.4, 1.2, 0.0), FRAC_PI_4, 0.4, 0.16),
        limb(Vec3::new(0.4, 1.2, 0.0), -FRAC_PI_4, 0.4, 0.16),
        limb(Vec3::new(-0.2, 0.2, 0.0), FRAC_PI_6, 0.4, 0.16),
        limb(Vec3::new(0.2, 0.2, 0.0), -FRAC_PI_6, 0.4, 0.16),
    ]
}

/// Applies the current animation frame to the rig transform and renders it.
/// The render loop itself never stops; `reset` only zeroes the transform.
pub struct AvatarController {
    pub position: Vec3,
    /// Radians, applied X then Y then Z about the rig origin.
    pub rotation: Vec3,
    pub camera: Camera3D,
    pub style: AvatarStyle,
}

impl AvatarController {
    pub fn new() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO, camera: Camera3D::default(), style: AvatarStyle::Classic }
    }

    pub fn apply(&mut self, frame: &AnimationFrame) {
        self.position = frame.position.scaled(POSITION_SCALE);
        self.rotation = frame.rotation.to_radians();
    }

    pub fn reset(&mut self) {
        self.position = Vec3::ZERO;
        self.rotation = Vec3::ZERO;
    }

    fn transform(&self, p: Vec3) -> Vec3 {
        let r = rotate_z(rotate_y(rotate_x(p, self.rotation.x), self.rotation.y), self.rotation.z);
        Vec3::new(r.x + self.position.x, r.y + self.position.y, r.z + self.position.z)
    }

    /// Rig-local point → canvas world (projection space is y-down).
    fn world(&self, p: Vec3) -> [f32; 3] {
        let t = self.transform(p);
        [t.x, -t.y, t.z]
    }
}

impl Default for AvatarController {
    fn default() -> Self { Self::new() }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

pub fn draw_avatar_canvas(ui: &mut Ui, avatar: &mut AvatarController, size: Vec2) -> Response {
    let (resp, p) = ui.allocate_painter(size, Sense::click_and_drag());
    p.rect_filled(resp.rect, 0.0, if ui.visuals().dark_mode { Color32::from_gray(18) } else { Color32::from_gray(245) });

    let button_area = draw_view_buttons(ui, &mut avatar.camera, resp.rect);

    if resp.dragged() {
        let on_buttons = resp.interact_pointer_pos().is_some_and(|pos| button_area.contains(pos));
        if !on_buttons {
            avatar.camera.yaw -= resp.drag_delta().x * 0.008;
        }
    }
    if resp.hovered() {
        let s = ui.input(|i| i.smooth_scroll_delta.y);
        if s != 0.0 {
            avatar.camera.scale = (avatar.camera.scale * (1.0 + s * 0.001)).clamp(40.0, 400.0);
        }
    }

    draw_ground_grid(&p, &avatar.camera, resp.rect, ui.visuals().dark_mode);

    let (head_color, body_color) = avatar.style.colors();

    struct Draw { a: Pos2, b: Pos2, z: f32, color: Color32, is_ball: bool, r: f32 }
    let mut draws: Vec<Draw> = Vec::new();

    for part in rig_parts() {
        match part {
            RigPart::Ball { center, radius } => {
                if let Some((pos, z)) = avatar.camera.project(avatar.world(center), resp.rect) {
                    draws.push(Draw { a: pos, b: pos, z, color: head_color, is_ball: true, r: radius * avatar.camera.scale });
                }
            }
            RigPart::Segment { a, b, width } => {
                let (pa, pb) = (avatar.camera.project(avatar.world(a), resp.rect),
                                avatar.camera.project(avatar.world(b), resp.rect));
                if let (Some((pa, za)), Some((pb, zb))) = (pa, pb) {
                    draws.push(Draw { a: pa, b: pb, z: (za + zb) * 0.5, color: body_color, is_ball: false, r: width * avatar.camera.scale });
                }
            }
        }
    }
    draws.sort_by(|a, b| b.z.partial_cmp(&a.z).unwrap_or(std::cmp::Ordering::Equal));

    for d in draws {
        if d.is_ball {
            p.circle_filled(d.a + Vec2::new(1.5, 2.0), d.r + 1.0, Color32::from_black_alpha(50));
            p.circle_filled(d.a, d.r, d.color);
            p.circle_stroke(d.a, d.r, Stroke::new(1.5, Color32::from_rgba_premultiplied(255, 255, 255, 80)));
        } else {
            p.line_segment([d.a + Vec2::new(1.5, 2.0), d.b + Vec2::new(1.5, 2.0)],
                Stroke::new(d.r, Color32::from_black_alpha(50)));
            p.line_segment([d.a, d.b], Stroke::new(d.r, d.color));
        }
    }

    p.text(resp.rect.min + Vec2::new(8., 6.), egui::Align2::LEFT_TOP,
        "拖动: 旋转视角   滚轮: 缩放",
        egui::FontId::proportional(11.0), Color32::from_rgba_premultiplied(160, 160, 160, 140));
    resp
}

fn draw_ground_grid(p: &egui::Painter, cam: &Camera3D, rect: Rect, dark: bool) {
    let grid_color = if dark { Color32::from_gray(50) } else { Color32::from_gray(210) };
    let (grid_size, grid_step, grid_y) = (1.5f32, 0.3f32, 0.05f32);

    let mut x = -grid_size;
    while x <= grid_size {
        let (p1, p2) = (cam.project([x, grid_y, -grid_size], rect), cam.project([x, grid_y, grid_size], rect));
        if let (Some((p1, _)), Some((p2, _))) = (p1, p2) {
            p.line_segment([p1, p2], Stroke::new(1.0, grid_color));
        }
        x += grid_step;
    }
    let mut z = -grid_size;
    while z <= grid_size {
        let (p1, p2) = (cam.project([-grid_size, grid_y, z], rect), cam.project([grid_size, grid_y, z], rect));
        if let (Some((p1, _)), Some((p2, _))) = (p1, p2) {
            p.line_segment([p1, p2], Stroke::new(1.0, grid_color));
        }
        z += grid_step;
    }
}

fn draw_view_buttons(ui: &mut Ui, cam: &mut Camera3D, rect: Rect) -> Rect {
    use std::f32::consts::{FRAC_PI_2, PI};
    let btn_size = Vec2::new(48.0, 24.0);
    let spacing = 6.0;

    let views = [
        ("正面", 0.0, Color32::from_rgb(100, 180, 255)),
        ("背面", PI, Color32::from_rgb(0, 200, 220)),
        ("右侧", -FRAC_PI_2, Color32::from_rgb(255, 160, 0)),
        ("左侧", FRAC_PI_2, Color32::from_rgb(80, 200, 80)),
    ];

    let total_width = (btn_size.x + spacing) * views.len() as f32 - spacing;
    let start_x = rect.center().x - total_width / 2.0;
    let y = rect.min.y + 12.0;

    let button_area = Rect::from_min_size(
        Pos2::new(start_x - spacing, y - spacing),
        Vec2::new(total_width + spacing * 2.0, btn_size.y + spacing * 2.0),
    );

    for (i, (label, yaw, color)) in views.iter().enumerate() {
        let btn_rect = Rect::from_min_size(Pos2::new(start_x + (btn_size.x + spacing) * i as f32, y), btn_size);
        let hovered = ui.rect_contains_pointer(btn_rect);
        let clicked = hovered && ui.input(|i| i.pointer.primary_clicked());
        let is_active = (cam.yaw - yaw).abs() < 0.1;

        if clicked {
            cam.yaw = *yaw;
            cam.pitch = 0.0;
        }

        let opacity = if is_active { 0.55 } else if hovered { 0.4 } else { 0.25 };
        let painter = ui.painter();
        painter.rect_filled(btn_rect, 5.0, color.linear_multiply(opacity));
        painter.rect_stroke(btn_rect, 5.0,
            Stroke::new(if is_active { 2.0 } else { 1.0 }, color.linear_multiply(0.8)),
            egui::StrokeKind::Outside);
        painter.text(btn_rect.center(), egui::Align2::CENTER_CENTER, label,
            egui::FontId::proportional(12.0),
            Color32::from_rgba_premultiplied(255, 255, 255, if is_active { 240 } else { 180 }));
    }

    button_area
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(position: Vec3, rotation: Vec3) -> AnimationFrame {
        AnimationFrame { index: 0, position, rotation, timestamp_seconds: 0.0 }
    }

    #[test]
    fn apply_scales_position_and_converts_rotation() {
        let mut avatar = AvatarController::new();
        avatar.apply(&frame(Vec3::new(20.0, 5.0, 10.0), Vec3::new(0.0, 180.0, 90.0)));
        assert!((avatar.position.x - 0.2).abs() < 1e-6);
        assert!((avatar.position.y - 0.05).abs() < 1e-6);
        assert!((avatar.rotation.y - std::f32::consts::PI).abs() < 1e-6);
        assert!((avatar.rotation.z - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn reset_zeroes_the_transform() {
        let mut avatar = AvatarController::new();
        avatar.apply(&frame(Vec3::new(5.0, 5.0, 5.0), Vec3::new(10.0, 10.0, 10.0)));
        avatar.reset();
        assert_eq!(avatar.position, Vec3::ZERO);
        assert_eq!(avatar.rotation, Vec3::ZERO);
    }

    #[test]
    fn focus_projects_to_the_rect_center() {
        let cam = Camera3D::default();
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0));
        let (pos, depth) = cam.project(cam.focus, rect).unwrap();
        assert!((pos.x - 200.0).abs() < 1e-3);
        assert!((pos.y - 150.0).abs() < 1e-3);
        assert!((depth - cam.radius).abs() < 1e-3);
    }

    #[test]
    fn points_behind_the_eye_are_culled() {
        let cam = Camera3D::default();
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0));
        // Default eye sits at +z; a point far beyond it is behind the camera.
        assert!(cam.project([0.0, -0.9, 100.0], rect).is_none());
    }

    #[test]
    fn yaw_spins_the_rig_around_the_vertical_axis() {
        let mut avatar = AvatarController::new();
        avatar.apply(&frame(Vec3::ZERO, Vec3::new(0.0, 180.0, 0.0)));
        let w = avatar.world(Vec3::new(0.5, 0.0, 0.0));
        assert!((w[0] + 0.5).abs() < 1e-5);
        assert!(w[2].abs() < 1e-5);
    }

    #[test]
    fn rig_has_a_head_and_five_segments() {
        let parts = rig_parts();
        let balls = parts.iter().filter(|p| matches!(p, RigPart::Ball { .. })).count();
        assert_eq!(balls, 1);
        assert_eq!(parts.len() - balls, 5);
    }
}
