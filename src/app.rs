// app.rs
use std::time::Instant;

use egui::{CentralPanel, Context, Key, RichText, ScrollArea, SidePanel, TopBottomPanel};
use tracing::warn;

use crate::canvas3d::{draw_avatar_canvas, AvatarController};
use crate::capture::CameraAdapter;
use crate::catalog::{Catalog, TrackFilter};
use crate::json_loader::AppConfig;
use crate::pose::{PoseKeypoint, PoseSource, SimulatedPoseSource};
use crate::remote::ApiClient;
use crate::score::{self, ScoreResult};
use crate::sequence::{SequenceLoader, SequencePlayer};
use crate::session::{PracticeSession, SessionEvent, SessionPhase};
use crate::ui_canvas::draw_overlay_canvas;
use crate::ui_panels;
use crate::video::VideoPlayer;

pub struct DanceMirrorApp {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub filter: TrackFilter,
    pub selected: Option<u32>,
    pub video: VideoPlayer,
    pub camera: CameraAdapter,
    pub avatar: AvatarController,
    pub session: PracticeSession,
    pub live_score: Option<ScoreResult>,
    pub share_open: bool,
    pub results_open: bool,
    pub dark_mode: bool,
    player: SequencePlayer,
    loader: SequenceLoader,
    pose_source: Box<dyn PoseSource>,
    last_pose: Option<Vec<PoseKeypoint>>,
    overlay_size: egui::Vec2,
    prev_phase: SessionPhase,
    score_accum: f32,
    status_message: String,
    status_timer: f32,
}

impl DanceMirrorApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load();
        let client = config.api_base_url.as_deref().and_then(|url| match ApiClient::new(url) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("scoring backend unavailable, running simulated: {e}");
                None
            }
        });

        let mut app = Self {
            catalog: Catalog::load(),
            filter: TrackFilter::default(),
            selected: None,
            video: VideoPlayer::new(),
            camera: CameraAdapter::simulated(config.deny_capture),
            avatar: AvatarController::new(),
            session: PracticeSession::new(&config, client.clone()),
            live_score: None,
            share_open: false,
            results_open: false,
            dark_mode: true,
            player: SequencePlayer::default(),
            loader: SequenceLoader::new(client),
            pose_source: Box::new(SimulatedPoseSource::new()),
            last_pose: None,
            overlay_size: egui::Vec2::new(640.0, 360.0),
            prev_phase: SessionPhase::Idle,
            score_accum: 0.0,
            status_message: String::new(),
            status_timer: 0.0,
            config,
        };
        cc.egui_ctx.set_theme(if app.dark_mode { egui::Theme::Dark } else { egui::Theme::Light });
        if let Some(first) = app.catalog.tracks().first().map(|t| t.id) {
            app.select_track(first);
            app.status_timer = 0.0; // no toast for the initial selection
        }
        app
    }

    pub fn set_status(&mut self, msg: &str, dur: f32) {
        self.status_message = msg.to_string();
        self.status_timer = dur;
    }

    /// Track switch: new media, fresh sequence (synthetic until the remote
    /// fetch lands), rig at rest, scores cleared.
    pub fn select_track(&mut self, id: u32) {
        let Some(track) = self.catalog.get(id).cloned() else { return };
        self.selected = Some(id);
        self.video.load(&track);
        self.player.replace(Vec::new());
        self.loader.request(&track);
        self.avatar.reset();
        self.session.select_track(track.clone());
        self.live_score = None;
        self.results_open = false;
        self.set_status(&format!("✅ {}", track.title), 2.0);
    }

    pub fn toggle_camera(&mut self) {
        if self.camera.is_active() {
            self.camera.stop();
            self.last_pose = None;
            self.set_status("摄像头已关闭", 2.0);
        } else {
            match self.camera.start() {
                Ok(_) => self.set_status("✅ 摄像头已启动", 2.0),
                Err(e) => self.set_status(&format!("❌ {e}"), 3.0),
            }
        }
    }

    pub fn reset_avatar(&mut self) {
        self.avatar.reset();
        self.player.reset();
        self.set_status("✅ 小人已重置", 2.0);
    }

    pub fn send_session_event(&mut self, event: SessionEvent) {
        self.session.handle(event, &mut self.camera, Instant::now());
    }

    fn share_link(&self) -> String {
        format!("{}/{}", self.config.share_base_url, self.selected.unwrap_or(0))
    }

    // ── Frame pump ────────────────────────────────────────────────────────────

    fn pump(&mut self, dt: f32) {
        let now = Instant::now();
        self.session.tick(&mut self.camera, now, dt);

        if let Some(frames) = self.loader.poll() {
            self.player.replace(frames);
        }

        self.video.advance(dt);

        // The avatar follows the player on every render tick; the loop is the
        // only place the cursor moves.
        let frame = self.player.advance();
        self.avatar.apply(&frame);

        self.last_pose = if self.camera.is_active() {
            self.pose_source.estimate(self.overlay_size.x, self.overlay_size.y)
        } else {
            None
        };

        // Live score refresh, once a second while the reference video runs.
        if self.video.is_playing() {
            self.score_accum += dt;
            if self.score_accum >= 1.0 {
                self.score_accum = 0.0;
                self.live_score = Some(score::simulated_result(&mut rand::thread_rng()));
            }
        }

        let phase = self.session.phase();
        if phase != self.prev_phase {
            match (self.prev_phase, phase) {
                (_, SessionPhase::Practicing) => {
                    self.video.play();
                    self.set_status("✅ 练习开始", 2.0);
                }
                (SessionPhase::Practicing, SessionPhase::Ending) => self.video.pause(),
                (SessionPhase::Ending, SessionPhase::Ready) => {
                    if let Some(result) = self.session.result().cloned() {
                        self.live_score = Some(result);
                        self.results_open = true;
                    }
                }
                _ => {}
            }
            self.prev_phase = phase;
        }

        if let Some(err) = self.session.take_error() {
            self.set_status(&format!("❌ {err}"), 4.0);
        }

        if self.status_timer > 0.0 {
            self.status_timer -= dt;
            if self.status_timer <= 0.0 {
                self.status_message.clear();
            }
        }
    }
}

// ── Dialogs ───────────────────────────────────────────────────────────────────

fn dialog_frame(dark: bool) -> egui::Frame {
    egui::Frame::window(&egui::Style::default())
        .fill(if dark { egui::Color32::from_rgb(22, 22, 35) } else { egui::Color32::from_rgb(250, 242, 240) })
        .stroke(egui::Stroke::new(1.5, egui::Color32::from_rgb(231, 76, 60)))
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::same(20))
}

fn accent_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(RichText::new(label).color(egui::Color32::WHITE).size(13.0))
        .fill(egui::Color32::from_rgb(231, 76, 60)).corner_radius(egui::CornerRadius::same(6)))
}

fn ghost_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(RichText::new(label).size(13.0))
        .fill(egui::Color32::TRANSPARENT).corner_radius(egui::CornerRadius::same(6)))
}

enum ShareAction { Copy, Close }

fn show_share_dialog(ctx: &Context, dark: bool, link: &str) -> Option<ShareAction> {
    let mut action = None;
    let muted = if dark { egui::Color32::from_gray(160) } else { egui::Color32::from_gray(90) };
    egui::Window::new("🔗  分享练习成绩").collapsible(false).resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0]).frame(dialog_frame(dark))
        .show(ctx, |ui| {
            ui.set_min_width(360.0);
            ui.label(RichText::new("复制链接，邀请朋友观看你的练习成绩:").color(muted).size(13.0));
            ui.add_space(8.0);
            ui.add(egui::TextEdit::singleline(&mut link.to_string())
                .desired_width(f32::INFINITY).interactive(false));
            ui.add_space(14.0);
            ui.horizontal(|ui| {
                if accent_btn(ui, "  复制链接  ").clicked() { action = Some(ShareAction::Copy); }
                ui.add_space(8.0);
                if ghost_btn(ui, "关闭").clicked() { action = Some(ShareAction::Close); }
            });
            if ui.input(|i| i.key_pressed(Key::Escape)) { action = Some(ShareAction::Close); }
        });
    action
}

// ── Main loop ─────────────────────────────────────────────────────────────────

impl eframe::App for DanceMirrorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt).min(0.1);
        self.pump(dt);

        if self.share_open {
            match show_share_dialog(ctx, self.dark_mode, &self.share_link()) {
                Some(ShareAction::Copy) => {
                    ctx.copy_text(self.share_link());
                    self.set_status("✅ 已复制链接", 2.0);
                }
                Some(ShareAction::Close) => self.share_open = false,
                None => {}
            }
        }

        if self.results_open {
            if let Some(result) = self.session.result().cloned() {
                let mut open = true;
                let mut share = false;
                egui::Window::new("🎉  练习结果").collapsible(false).resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0]).frame(dialog_frame(self.dark_mode))
                    .show(ctx, |ui| {
                        ui.set_min_width(360.0);
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new(format!("{:.1}", result.overall)).size(44.0).strong()
                                .color(egui::Color32::from_rgb(231, 76, 60)));
                            ui.label(RichText::new("综合评分").small());
                        });
                        ui.add_space(6.0);
                        ui.vertical_centered(|ui| {
                            ui_panels::draw_radar_chart(ui, &result, 240.0);
                        });
                        ui.add_space(6.0);
                        for line in &result.feedback {
                            ui.label(RichText::new(format!("💬 {line}")).size(12.5));
                        }
                        ui.add_space(12.0);
                        ui.horizontal(|ui| {
                            if accent_btn(ui, "  分享成绩  ").clicked() { share = true; }
                            ui.add_space(8.0);
                            if ghost_btn(ui, "关闭").clicked() { open = false; }
                        });
                        if ui.input(|i| i.key_pressed(Key::Escape)) { open = false; }
                    });
                if share {
                    self.share_open = true;
                    open = false;
                }
                self.results_open = open;
            } else {
                self.results_open = false;
            }
        }

        TopBottomPanel::top("controls_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui_panels::render_controls_bar(self, ui);
            ui.add_space(4.0);
        });

        SidePanel::left("catalog").min_width(270.0).max_width(360.0).show(ctx, |ui| {
            ui_panels::render_catalog_panel(self, ui);
        });

        TopBottomPanel::bottom("score_panel").min_height(150.0).show(ctx, |ui| {
            ui.add_space(6.0);
            ScrollArea::horizontal().show(ui, |ui| {
                ui_panels::render_score_panel(self, ui);
            });
            ui.add_space(4.0);
        });

        CentralPanel::default().show(ctx, |ui| {
            let size = ui.available_size();
            let half = egui::Vec2::new(((size.x - 8.0) / 2.0).max(120.0), size.y.max(120.0));
            let hint = (self.camera.is_active()
                && self.session.phase() != SessionPhase::Practicing)
                .then_some("点击\"开始练习\"按钮开始舞蹈模仿");
            ui.horizontal(|ui| {
                draw_avatar_canvas(ui, &mut self.avatar, half);
                let resp = draw_overlay_canvas(
                    ui,
                    half,
                    self.camera.stream(),
                    self.last_pose.as_deref(),
                    hint,
                    &self.status_message,
                    self.status_timer,
                );
                self.overlay_size = resp.rect.size();
            });
        });

        // The avatar and overlay animate every frame; keep the loop hot.
        ctx.request_repaint();
    }
}
