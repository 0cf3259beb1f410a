// ui_panels.rs
use egui::{Color32, ComboBox, Pos2, ProgressBar, RichText, ScrollArea, Stroke, Ui, Vec2};

use crate::app::DanceMirrorApp;
use crate::catalog::{self, Difficulty};
use crate::score::ScoreResult;
use crate::session::{SessionEvent, SessionPhase};
use crate::timer;
use crate::video::{SEEK_STEP_SECONDS, SPEED_STEPS};

// ── Catalog browser ───────────────────────────────────────────────────────────

pub fn render_catalog_panel(app: &mut DanceMirrorApp, ui: &mut Ui) {
    ui.add_space(4.0);
    ui.heading("舞蹈列表");
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut app.filter.query)
            .hint_text("搜索舞蹈…")
            .desired_width(ui.available_width() - 30.0));
        if ui.button("✖").on_hover_text("清除筛选").clicked() {
            app.filter.clear();
        }
    });

    ui.horizontal(|ui| {
        ComboBox::from_id_salt("difficulty_filter")
            .selected_text(app.filter.difficulty.map_or("全部难度", Difficulty::label))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut app.filter.difficulty, None, "全部难度");
                for d in Difficulty::ALL {
                    ui.selectable_value(&mut app.filter.difficulty, Some(d), d.label());
                }
            });
        let ethnicity_label = app.filter.ethnicity.clone().unwrap_or_else(|| "全部民族".into());
        ComboBox::from_id_salt("ethnicity_filter")
            .selected_text(ethnicity_label)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut app.filter.ethnicity, None, "全部民族");
                for e in app.catalog.ethnicities() {
                    let label = e.clone();
                    ui.selectable_value(&mut app.filter.ethnicity, Some(e), label);
                }
            });
    });
    ui.separator();

    let hits: Vec<u32> = app.catalog.filtered(&app.filter).iter().map(|t| t.id).collect();
    if hits.is_empty() {
        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("没有找到匹配的舞蹈").color(ui.visuals().weak_text_color()));
        });
        return;
    }

    let mut clicked: Option<u32> = None;
    ScrollArea::vertical().show(ui, |ui| {
        for id in hits {
            let Some(track) = app.catalog.get(id) else { continue };
            let selected = app.selected == Some(id);
            let resp = ui.vertical(|ui| {
                let r = ui.selectable_label(selected, RichText::new(&track.title).strong().size(14.0));
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&track.ethnicity).small()
                        .color(ui.visuals().weak_text_color()));
                    ui.label(RichText::new(track.difficulty.label()).small()
                        .color(track.difficulty.badge_color()));
                    ui.label(RichText::new(catalog::format_duration(track.duration_seconds)).small()
                        .color(ui.visuals().weak_text_color()));
                });
                ui.label(RichText::new(&track.description).small()
                    .color(ui.visuals().weak_text_color()));
                r
            });
            if resp.inner.clicked() {
                clicked = Some(id);
            }
            ui.separator();
        }
    });
    if let Some(id) = clicked {
        app.select_track(id);
    }
}

// ── Practice controls ─────────────────────────────────────────────────────────

pub fn render_controls_bar(app: &mut DanceMirrorApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.add_space(8.0);

        // Reference video transport.
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 6.0;
                if ui.button("⏪ 10s").clicked() { app.video.seek_by(-SEEK_STEP_SECONDS); }
                let play_label = if app.video.is_playing() { "⏸" } else { "▶" };
                if ui.button(play_label).clicked() { app.video.toggle(); }
                if ui.button("10s ⏩").clicked() { app.video.seek_by(SEEK_STEP_SECONDS); }
                ui.label(RichText::new(app.video.clock()).monospace().size(12.0));
                let mut speed = app.video.speed();
                ComboBox::from_id_salt("speed_select")
                    .selected_text(format!("{speed}x"))
                    .width(64.0)
                    .show_ui(ui, |ui| {
                        for &s in SPEED_STEPS {
                            if ui.selectable_value(&mut speed, s, format!("{s}x")).changed() {
                                app.video.set_speed(speed);
                            }
                        }
                    });
            });
        });
        if let Some(err) = app.video.error() {
            ui.label(RichText::new(err.to_string()).small().color(Color32::from_rgb(220, 90, 90)));
        }

        ui.add_space(8.0);

        // Camera and avatar.
        ui.group(|ui| {
            ui.horizontal(|ui| {
                let cam_label = if app.camera.is_active() { "📷 关闭摄像头" } else { "📷 开启摄像头" };
                if ui.button(cam_label).clicked() { app.toggle_camera(); }
                let mut style = app.avatar.style;
                ComboBox::from_id_salt("avatar_style")
                    .selected_text(format!("小人: {}", style.label()))
                    .show_ui(ui, |ui| {
                        for s in crate::canvas3d::AvatarStyle::ALL {
                            if ui.selectable_value(&mut style, s, s.label()).changed() {
                                app.avatar.style = style;
                            }
                        }
                    });
                if ui.button("🔄 重置小人").clicked() { app.reset_avatar(); }
            });
        });

        ui.add_space(8.0);

        // Session.
        ui.group(|ui| {
            ui.horizontal(|ui| {
                match app.session.phase() {
                    SessionPhase::Idle | SessionPhase::Ready => {
                        if ui.button(RichText::new("▶ 开始练习").strong()).clicked() {
                            app.send_session_event(SessionEvent::StartPractice);
                        }
                    }
                    SessionPhase::CameraStarting => {
                        ui.spinner();
                        if ui.button("取消").clicked() {
                            app.send_session_event(SessionEvent::CancelCamera);
                        }
                    }
                    SessionPhase::Practicing => {
                        if ui.button(RichText::new("⏹ 结束练习").strong()).clicked() {
                            app.send_session_event(SessionEvent::StopPractice);
                        }
                    }
                    SessionPhase::Ending => { ui.spinner(); }
                }
                ui.label(RichText::new(app.session.phase().label()).small());
                ui.label(RichText::new(timer::format_clock(app.session.elapsed_seconds())).monospace());
                let cap = app.session.cap_seconds() as f32;
                let frac = (app.session.elapsed_seconds() as f32 / cap).min(1.0);
                ui.add(ProgressBar::new(frac).desired_width(90.0));
            });
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(8.0);
            if ui.button(if app.dark_mode { "☀" } else { "🌙" }).clicked() {
                app.dark_mode = !app.dark_mode;
                ui.ctx().set_theme(if app.dark_mode { egui::Theme::Dark } else { egui::Theme::Light });
            }
            if ui.button("🔗 分享").clicked() { app.share_open = true; }
        });
    });
}

// ── Score panel ───────────────────────────────────────────────────────────────

pub fn render_score_panel(app: &mut DanceMirrorApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.set_min_width(130.0);
            ui.label(RichText::new("综合评分").small());
            let overall = app.live_score.as_ref().map_or(0.0, |s| s.overall);
            ui.label(RichText::new(format!("{overall:.1}")).size(34.0).strong()
                .color(Color32::from_rgb(231, 76, 60)));
        });
        ui.separator();
        ui.vertical(|ui| {
            ui.set_min_width(280.0);
            let dimensions = app.live_score.as_ref().map(|s| s.dimensions).unwrap_or_default();
            for (label, value) in dimensions.labeled() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).small());
                    ui.add(ProgressBar::new(value / 100.0)
                        .desired_width(160.0)
                        .text(RichText::new(format!("{value:.1}")).small()));
                });
            }
        });
        ui.separator();
        ui.vertical(|ui| {
            ui.label(RichText::new("实时反馈").small());
            let lines: Vec<String> = app.session.feedback().map(str::to_string).collect();
            if lines.is_empty() {
                ui.label(RichText::new("请站在摄像头前，开始跳舞")
                    .small().color(ui.visuals().weak_text_color()));
            }
            ScrollArea::vertical().id_salt("feedback_scroll").max_height(90.0).show(ui, |ui| {
                for line in lines {
                    ui.label(RichText::new(format!("💬 {line}")).small());
                }
            });
        });
    });
}

// ── Radar chart ───────────────────────────────────────────────────────────────

/// Four-axis radar over the score dimensions, painted the same way the pose
/// canvases are.
pub fn draw_radar_chart(ui: &mut Ui, result: &ScoreResult, size: f32) {
    let (resp, painter) = ui.allocate_painter(Vec2::splat(size), egui::Sense::hover());
    let center = resp.rect.center();
    let radius = size / 2.0 - 36.0;
    let data = result.dimensions.labeled();
    let axis_angle = |i: usize| {
        (2.0 * std::f32::consts::PI * i as f32) / data.len() as f32 - std::f32::consts::FRAC_PI_2
    };

    for ring in 1..=5 {
        let r = radius * ring as f32 / 5.0;
        painter.circle_stroke(center, r, Stroke::new(1.0, Color32::from_gray(200)));
    }
    for (i, _) in data.iter().enumerate() {
        let a = axis_angle(i);
        painter.line_segment(
            [center, center + Vec2::new(a.cos(), a.sin()) * radius],
            Stroke::new(1.0, Color32::from_gray(180)),
        );
    }

    let vertex = |i: usize, value: f32| {
        let a = axis_angle(i);
        center + Vec2::new(a.cos(), a.sin()) * (radius * value / 100.0)
    };
    let points: Vec<Pos2> = data.iter().enumerate().map(|(i, &(_, v))| vertex(i, v)).collect();
    painter.add(egui::Shape::convex_polygon(
        points.clone(),
        Color32::from_rgba_premultiplied(231, 76, 60, 60),
        Stroke::new(2.0, Color32::from_rgb(231, 76, 60)),
    ));
    for p in &points {
        painter.circle_filled(*p, 4.0, Color32::from_rgb(231, 76, 60));
        painter.circle_stroke(*p, 4.0, Stroke::new(1.5, Color32::WHITE));
    }

    for (i, (label, value)) in data.iter().enumerate() {
        let a = axis_angle(i);
        let pos = center + Vec2::new(a.cos(), a.sin()) * (radius + 20.0);
        painter.text(pos, egui::Align2::CENTER_CENTER, *label,
            egui::FontId::proportional(12.0), ui.visuals().text_color());
        painter.text(pos + Vec2::new(0.0, 14.0), egui::Align2::CENTER_CENTER, format!("{value:.1}"),
            egui::FontId::proportional(11.0), Color32::from_rgb(231, 76, 60));
    }
}
