//! Tree card panel: paints the current frame and routes clicks.
//!
//! The renderer works in viewBox units; `ViewTransform` maps them onto the
//! panel, scaled to fit and centered horizontally.

use eframe::egui;
use egui::epaint::CubicBezierShape;
use egui::{pos2, Pos2, Rect};
use std::time::Instant;
use treecard::hierarchy::NodeId;
use treecard::transition::{Frame, LabelSide, Point, Viewport};
use treecard::{CardPalette, Modifiers, RendererConfig, ThemeColors};

use crate::app::AppState;
use crate::io::AsyncLoader;
use crate::presentation::color_mapping::{fade, link_color};
use crate::utils::{format_memory_mb, get_current_memory_mb};

/// Result of user interaction with the card
pub enum CardInteraction {
    /// A node was clicked
    NodeClicked { id: NodeId, modifiers: Modifiers },
    /// The panel changed width
    Resized,
}

/// Maps viewBox coordinates to screen positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    origin: Pos2,
    scale: f32,
    viewport: Viewport,
}

impl ViewTransform {
    /// Fits `viewport` into `rect` keeping its aspect ratio.
    pub fn fit(viewport: Viewport, rect: Rect) -> Self {
        let sx = rect.width() / viewport.width.max(1.0);
        let sy = rect.height() / viewport.height.max(1.0);
        let scale = sx.min(sy).max(0.01);
        let used_width = viewport.width * scale;
        Self {
            origin: pos2(rect.min.x + (rect.width() - used_width).max(0.0) / 2.0, rect.min.y),
            scale,
            viewport,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_screen(&self, p: Point) -> Pos2 {
        pos2(
            self.origin.x + (p.x - self.viewport.x) * self.scale,
            self.origin.y + (p.y - self.viewport.y) * self.scale,
        )
    }

    pub fn to_view(&self, pos: Pos2) -> Point {
        Point::new(
            self.viewport.x + (pos.x - self.origin.x) / self.scale,
            self.viewport.y + (pos.y - self.origin.y) / self.scale,
        )
    }
}

/// Renders the card and returns its interactions.
pub fn render_card_panel(
    ui: &mut egui::Ui,
    state: &mut AppState,
    loader: &AsyncLoader,
    theme_colors: &ThemeColors,
) -> Vec<CardInteraction> {
    let rect = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(rect, egui::Sense::click());
    let mut interactions = Vec::new();

    if state.card.renderer_mut().container_mut().set_width(rect.width()) {
        interactions.push(CardInteraction::Resized);
    }

    if loader.is_loading() {
        render_loading_indicator(ui, rect, theme_colors);
        return interactions;
    }

    let now = Instant::now();
    let Some(frame) = state.card.renderer().frame(now) else {
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Open a tree file or generate a random tree",
            egui::FontId::proportional(18.0),
            theme_colors.text_dim,
        );
        return interactions;
    };

    let renderer = state.card.renderer();
    let palette = *renderer.palette();
    let config = renderer.config().clone();
    let transform = ViewTransform::fit(frame.viewport, rect);

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::from(palette.background));
    paint_frame(&painter, &frame, &transform, &config, &palette, state.card.hovered());

    let hovered = response
        .hover_pos()
        .and_then(|pos| frame.hit_test(transform.to_view(pos), &config));
    state.card.set_hovered(hovered);
    if hovered.is_some() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    if response.clicked() {
        let hit = response
            .interact_pointer_pos()
            .and_then(|pos| frame.hit_test(transform.to_view(pos), &config));
        if let Some(id) = hit {
            let held = ui.input(|i| i.modifiers);
            let modifiers = Modifiers {
                alt: held.alt,
                ctrl: held.ctrl,
                shift: held.shift,
            };
            interactions.push(CardInteraction::NodeClicked { id, modifiers });
        }
    }

    if state.card.renderer_mut().tick(now) {
        ui.ctx().request_repaint();
    }

    interactions
}

fn paint_frame(
    painter: &egui::Painter,
    frame: &Frame,
    transform: &ViewTransform,
    config: &RendererConfig,
    palette: &CardPalette,
    hovered: Option<NodeId>,
) {
    let scale = transform.scale();

    for link in &frame.links {
        let points = link.shape.bezier().map(|p| transform.to_screen(p));
        painter.add(CubicBezierShape::from_points_stroke(
            points,
            false,
            egui::Color32::TRANSPARENT,
            egui::Stroke::new(1.5 * scale, link_color(palette, 1.0)),
        ));
    }

    let font_id = egui::FontId::proportional(config.font_size * scale);
    for node in &frame.nodes {
        let center = transform.to_screen(node.position);
        let mut radius = config.node_radius * scale;
        if hovered == Some(node.id) && !node.exiting {
            radius *= 1.6;
        }
        painter.circle_filled(center, radius, fade(node.fill, node.opacity));

        let (dx, align) = match node.label_side {
            LabelSide::Left => (-config.label_offset, egui::Align2::RIGHT_CENTER),
            LabelSide::Right => (config.label_offset, egui::Align2::LEFT_CENTER),
        };
        let anchor = center + egui::vec2(dx * scale, 0.0);

        // egui has no stroked text, so the halo is the label drawn offset
        // around its anchor.
        let halo = fade(palette.halo, node.opacity);
        let spread = 1.5 * scale.min(2.0);
        for offset in [egui::vec2(-spread, 0.0), egui::vec2(spread, 0.0), egui::vec2(0.0, -spread), egui::vec2(0.0, spread)] {
            painter.text(anchor + offset, align, &node.label, font_id.clone(), halo);
        }
        painter.text(anchor, align, &node.label, font_id.clone(), fade(palette.text, node.opacity));
    }
}

/// Renders a loading indicator when a tree is being loaded.
fn render_loading_indicator(ui: &mut egui::Ui, rect: Rect, theme_colors: &ThemeColors) {
    let center_pos = rect.center();
    let color = theme_colors.text_dim;

    ui.painter().text(
        center_pos,
        egui::Align2::CENTER_CENTER,
        "Loading...",
        egui::FontId::proportional(48.0),
        color,
    );
    ui.painter().text(
        pos2(center_pos.x, center_pos.y + 60.0),
        egui::Align2::CENTER_CENTER,
        format_memory_mb(get_current_memory_mb()),
        egui::FontId::proportional(24.0),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            x: -40.0,
            y: -15.0,
            width: 628.0,
            height: 30.0,
        }
    }

    #[test]
    fn test_fit_is_limited_by_height() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(628.0, 15.0));
        let transform = ViewTransform::fit(viewport(), rect);
        assert_eq!(transform.scale(), 0.5);
        // Centered horizontally in the spare width.
        assert_eq!(transform.to_screen(Point::new(-40.0, -15.0)), pos2(157.0, 0.0));
    }

    #[test]
    fn test_screen_and_view_are_inverse() {
        let rect = Rect::from_min_size(pos2(10.0, 20.0), egui::vec2(1256.0, 600.0));
        let transform = ViewTransform::fit(viewport(), rect);
        assert_eq!(transform.scale(), 2.0);
        let p = Point::new(100.0, 5.0);
        let back = transform.to_view(transform.to_screen(p));
        assert!((back.x - p.x).abs() < 1e-3 && (back.y - p.y).abs() < 1e-3);
    }
}
