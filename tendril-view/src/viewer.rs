//! Interactive 2D plant garden viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the current [`GameState`]
//! and implements [`eframe::App`] to render the plant and environment
//! and to drive the engine through its public entry points (advance a
//! turn, allocate powers, direct-grow a clicked tip).

use eframe::App;
use glam::Vec2;
use log::warn;
use tendril_core::{
    config::Config,
    environment::{Environment, ZoneKind},
    phases,
    powers::PowerKind,
    state::{self, GameState},
    types::NodeId,
};

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: one [`GameState`] plus the [`Config`] tuning.
/// - UI configuration (pan/zoom, timing).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Render the zones, the plant, and the tip highlights.
///
/// ### Fields
/// - `state` - Current game state; replaced wholesale after each engine call.
/// - `cfg` - Global growth-rule tuning.
///
/// - `rng` - Random number generator feeding the engine's draws.
///
/// - `running` - Whether turns currently auto-advance.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `last_new_ids` - Node ids created in the last turn (for highlighting).
///
/// - `step_interval` - Target time between automatic turns (seconds).
/// - `last_step_time` - Time stamp of the last turn (egui time).
/// - `last_step_dt` - Actual time delta between the last two turns (display only).
pub struct Viewer {
    state: GameState,
    cfg: Config,

    rng: rand::rngs::ThreadRng,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    last_new_ids: Vec<NodeId>,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a new viewer with a freshly initialized game.
    ///
    /// The default setup is the engine's default environment (a 200x200
    /// plane with a fertile center and a rocky northern strip), a single
    /// root tip at the origin, and zero allocated powers. The camera
    /// starts with a moderate zoom and no pan.
    ///
    /// ### Returns
    /// A fully-initialized [`Viewer`] ready to be passed to `eframe::run_native`.
    pub fn new() -> Self {
        let mut rng = rand::rng();
        let cfg = Config::default();
        let state = state::initialize(Environment::default(), &cfg, &mut rng);

        Self {
            state,
            cfg,
            rng,
            running: false,
            zoom: 3.0,
            pan: egui::vec2(0.0, 0.0),
            last_new_ids: Vec::with_capacity(16),
            step_interval: 0.5,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        }
    }

    /// Starts a new game: fresh root, zero powers, turn 1.
    ///
    /// Keeps the camera and timing settings, clears the highlight list,
    /// and stops auto-running.
    fn new_game(&mut self) {
        self.state = state::initialize(Environment::default(), &self.cfg, &mut self.rng);
        self.last_new_ids.clear();
        self.running = false;
    }

    /// Advances the game by one full turn.
    ///
    /// Runs growth, thickening, and branching through
    /// [`state::advance_turn`] with the next turn number, then records
    /// the ids of nodes created this turn so they can be highlighted.
    fn step_once(&mut self) {
        let before = self.state.plant.len();
        let next = state::advance_turn(&self.state, self.state.turn + 1, &self.cfg, &mut self.rng);
        self.last_new_ids = (before..next.plant.len()).collect();
        self.state = next;
    }

    /// Spends one earned point on the named power.
    ///
    /// A rejected allocation (no spendable point) leaves the state
    /// untouched; the engine's reason is logged.
    fn allocate_power(&mut self, kind: PowerKind) {
        match state::allocate(&self.state, kind) {
            Ok(next) => self.state = next,
            Err(err) => warn!("allocation rejected: {err}"),
        }
    }

    /// Grows the growing tip nearest to a clicked world position.
    ///
    /// A miss (no tip within the pick radius) does nothing; a directed
    /// growth failure (for example a proposed position outside the
    /// bounds) leaves the state untouched and logs the engine's reason.
    fn directed_grow(&mut self, world: Vec2) {
        let pick_radius = 12.0 / self.zoom;
        let Some(tip_id) = self.nearest_tip(world, pick_radius) else {
            return;
        };
        match state::grow_tip(&self.state, tip_id, self.state.turn, &self.cfg, &mut self.rng) {
            Ok(next) => {
                self.last_new_ids = (self.state.plant.len()..next.plant.len()).collect();
                self.state = next;
            }
            Err(err) => warn!("directed growth failed: {err}"),
        }
    }

    /// The growing tip closest to `world`, within `radius`.
    fn nearest_tip(&self, world: Vec2, radius: f32) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for &id in &self.state.plant.growing_tips {
            let Some(node) = self.state.plant.get(id) else {
                continue;
            };
            let d2 = (node.pos - world).length_squared();
            if d2 <= radius * radius && best.map_or(true, |(_, bd2)| d2 < bd2) {
                best = Some((id, d2));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive y goes up in world space.
    ///
    /// ### Parameters
    /// - `p` - World-space position.
    /// - `rect` - Screen-space rectangle representing the drawing area.
    ///
    /// ### Returns
    /// The corresponding egui position in screen-space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding), using the same `zoom`, `pan`, and `rect` center.
    ///
    /// ### Parameters
    /// - `p` - Screen-space position in egui coordinates.
    /// - `rect` - Screen-space rectangle representing the drawing area.
    ///
    /// ### Returns
    /// The corresponding position in world-space.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Fill color for a zone underlay.
    fn zone_color(kind: ZoneKind) -> egui::Color32 {
        match kind {
            ZoneKind::Fertile => egui::Color32::from_rgb(0x86, 0xef, 0xac),
            ZoneKind::Rocky => egui::Color32::from_rgb(0xd1, 0xd5, 0xdb),
            ZoneKind::Dry => egui::Color32::from_rgb(0xfd, 0xe6, 0x8a),
            ZoneKind::Water => egui::Color32::from_rgb(0x93, 0xc5, 0xfd),
            ZoneKind::Shaded => egui::Color32::from_rgb(0xcb, 0xd5, 0xe1),
        }
    }

    /// Builds the top panel UI (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.05..=5.0)
                        .speed(0.01),
                );

                if ui.button("Grow Tendril").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("New Game").clicked() {
                    self.new_game();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (turn, node count, tips, total length).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let stats = state::stats(&self.state);
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("turn = {}", stats.turn));
                ui.label(format!("nodes = {}", stats.total_nodes));
                ui.label(format!("tips = {}", stats.growing_tip_count));
                ui.label(format!("total length = {:.1}", stats.total_length));
            });
        });
    }

    /// Builds the right-hand panel for power allocation and readouts.
    fn ui_power_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("power_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Powers");

                let spendable = self.state.powers.spendable(self.state.turn);
                ui.label(format!("Points available: {spendable}"));
                ui.separator();

                for kind in PowerKind::ALL {
                    let count = self.state.powers.get(kind);
                    let button = egui::Button::new(format!("Upgrade {kind} ({count})"));
                    if ui.add_enabled(spendable > 0, button).clicked() {
                        self.allocate_power(kind);
                    }
                }

                ui.separator();
                ui.label("Current effects");
                let powers = &self.state.powers;
                ui.label(format!(
                    "growth distance: {:.1} units",
                    phases::growth_distance(powers, &self.cfg)
                ));
                ui.label(format!(
                    "branch chance: {:.0}%",
                    100.0
                        * (self.cfg.base_branch_chance
                            + self.cfg.branch_chance_per_point * powers.branchiness as f32)
                ));
                ui.label(format!(
                    "thickening factor: {:.2}",
                    self.cfg.base_resilience_factor
                        + self.cfg.resilience_per_point * powers.resilience as f32
                ));

                ui.separator();
                ui.small("Click a growing tip to grow it directly.");
            });
    }

    /// Builds the central panel where the garden is drawn and interacted with.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                let delta = response.drag_delta();
                self.pan += delta;
            }

            let hover_world = response.hover_pos().map(|p| self.screen_to_world(p, rect));

            // Click: direct-grow the nearest growing tip.
            if response.clicked()
                && let Some(world) = hover_world
            {
                self.directed_grow(world);
            }

            // Zoom around the mouse cursor.
            if ui.ctx().input(|i| i.raw_scroll_delta.y != 0.0) {
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());

                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    let new_zoom = (self.zoom * factor).clamp(0.1, 10.0);
                    self.zoom = new_zoom;

                    let screen_after = self.world_to_screen(world_before, rect);

                    let delta = pointer_screen - screen_after;
                    self.pan += delta;
                }
            }

            // Zone underlays first, so the plant draws on top.
            for zone in &self.state.environment.zones {
                let top_left =
                    self.world_to_screen(Vec2::new(zone.bounds.min.x, zone.bounds.max.y), rect);
                let bottom_right =
                    self.world_to_screen(Vec2::new(zone.bounds.max.x, zone.bounds.min.y), rect);
                painter.rect_filled(
                    egui::Rect::from_two_pos(top_left, bottom_right),
                    egui::CornerRadius::ZERO,
                    Self::zone_color(zone.kind),
                );
            }

            // World boundary.
            let bounds = self.state.environment.bounds;
            let corners = [
                Vec2::new(bounds.min.x, bounds.min.y),
                Vec2::new(bounds.max.x, bounds.min.y),
                Vec2::new(bounds.max.x, bounds.max.y),
                Vec2::new(bounds.min.x, bounds.max.y),
            ];
            let boundary: Vec<egui::Pos2> = corners
                .iter()
                .map(|&c| self.world_to_screen(c, rect))
                .collect();
            painter.add(egui::Shape::closed_line(
                boundary,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
            ));

            // Segments first (so they appear behind the nodes), with the
            // child node's thickness and color.
            for node in &self.state.plant.nodes {
                let Some(parent_id) = node.parent else {
                    continue;
                };
                let Some(parent) = self.state.plant.get(parent_id) else {
                    continue;
                };
                let a = self.world_to_screen(parent.pos, rect);
                let b = self.world_to_screen(node.pos, rect);
                let width = (node.thickness * self.zoom * 0.5).max(1.0);
                let [r, g, bl] = node.color;
                painter.line_segment(
                    [a, b],
                    egui::Stroke::new(width, egui::Color32::from_rgb(r, g, bl)),
                );
            }

            // Nodes, with growing tips highlighted by a white ring and
            // the freshest nodes drawn in red.
            for (id, node) in self.state.plant.nodes.iter().enumerate() {
                let p = self.world_to_screen(node.pos, rect);
                let r = (node.thickness * 0.6 * self.zoom).max(2.0);

                let color = if self.last_new_ids.contains(&id) {
                    egui::Color32::RED
                } else if node.is_growing_tip {
                    let [cr, cg, cb] = node.color;
                    egui::Color32::from_rgb(cr, cg, cb)
                } else {
                    egui::Color32::from_rgb(0x16, 0x65, 0x34)
                };
                painter.circle_filled(p, r, color);

                if node.is_growing_tip {
                    painter.circle_stroke(
                        p,
                        r + 2.0,
                        egui::Stroke::new(1.5, egui::Color32::WHITE),
                    );
                }
            }

            // Auto-run simulation if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    ///
    /// This method:
    /// - Renders the top control bar and status bar.
    /// - Renders the power allocation side panel.
    /// - Draws the central garden view and handles interactions.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_power_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = Viewer::new();
        // Use non-trivial zoom and pan to exercise the math.
        viewer.zoom = 2.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let world_points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, -5.0),
            Vec2::new(-3.5, 8.25),
        ];

        let eps = 1e-4;

        for p in world_points {
            let screen = viewer.world_to_screen(p, rect);
            let back = viewer.screen_to_world(screen, rect);

            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
    }

    #[test]
    fn step_once_advances_one_turn_and_highlights_the_new_node() {
        let mut viewer = Viewer::new();
        assert_eq!(viewer.state.turn, 1);
        assert_eq!(viewer.state.plant.len(), 1);

        viewer.step_once();

        // The lone root tip always has room for its first 1.5-unit step
        // inside the default 200x200 bounds.
        assert_eq!(viewer.state.turn, 2);
        assert_eq!(viewer.state.plant.len(), 2);
        assert_eq!(viewer.state.plant.growing_tips, vec![1]);
        assert_eq!(viewer.last_new_ids, vec![1]);
    }

    #[test]
    fn new_game_restores_a_fresh_state() {
        let mut viewer = Viewer::new();
        viewer.step_once();
        viewer.step_once();
        viewer.running = true;
        assert!(viewer.state.plant.len() > 1);

        viewer.new_game();

        assert_eq!(viewer.state.turn, 1);
        assert_eq!(viewer.state.plant.len(), 1);
        assert_eq!(viewer.state.plant.growing_tips, vec![0]);
        assert!(viewer.last_new_ids.is_empty());
        assert!(!viewer.running);
    }

    #[test]
    fn allocate_power_is_rejected_before_any_points_are_earned() {
        let mut viewer = Viewer::new();
        viewer.allocate_power(PowerKind::Growth);
        assert_eq!(viewer.state.powers.growth, 0);

        viewer.step_once();
        viewer.allocate_power(PowerKind::Growth);
        assert_eq!(viewer.state.powers.growth, 1);
    }

    #[test]
    fn nearest_tip_picks_within_radius_only() {
        let viewer = Viewer::new();
        // The root tip sits at the origin.
        assert_eq!(viewer.nearest_tip(Vec2::new(0.5, 0.5), 2.0), Some(0));
        assert_eq!(viewer.nearest_tip(Vec2::new(50.0, 50.0), 2.0), None);
    }

    #[test]
    fn directed_grow_extends_the_clicked_tip() {
        let mut viewer = Viewer::new();
        viewer.directed_grow(Vec2::ZERO);

        assert_eq!(viewer.state.plant.len(), 2);
        assert_eq!(viewer.state.plant.growing_tips, vec![1]);
        // A directed action does not advance the turn counter.
        assert_eq!(viewer.state.turn, 1);
        assert_eq!(viewer.last_new_ids, vec![1]);
    }
}
