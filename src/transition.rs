//! Enter/update/exit transitions between two drawn states.
//!
//! A `Frame` is what is on screen at one instant. `Transition::between`
//! matches the displayed frame against the next target frame by node id and
//! records, per element, where it starts and where it ends. Sampling a
//! transition at a progress value yields the intermediate frame.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::color::Rgb;
use crate::config::RendererConfig;
use crate::hierarchy::NodeId;

/// A point in viewBox coordinates (x grows right, y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Point, t: f32) -> Point {
        Point::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t))
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

/// The visible window of the drawing, as an SVG viewBox.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn lerp(self, to: Viewport, t: f32) -> Viewport {
        Viewport {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            width: lerp(self.width, to.width, t),
            height: lerp(self.height, to.height, t),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Time curve applied to transition progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Apply easing to progress (0.0 to 1.0).
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// Which side of the circle a label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSide {
    Left,
    Right,
}

/// Endpoints of a horizontal diagonal link.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinkShape {
    pub source: Point,
    pub target: Point,
}

impl LinkShape {
    /// A degenerate link sitting on a single point.
    pub fn collapsed_at(p: Point) -> Self {
        Self { source: p, target: p }
    }

    pub fn lerp(self, to: LinkShape, t: f32) -> LinkShape {
        LinkShape {
            source: self.source.lerp(to.source, t),
            target: self.target.lerp(to.target, t),
        }
    }

    /// Cubic Bézier control points: the curve leaves and enters horizontally.
    pub fn bezier(&self) -> [Point; 4] {
        let mid = (self.source.x + self.target.x) / 2.0;
        [
            self.source,
            Point::new(mid, self.source.y),
            Point::new(mid, self.target.y),
            self.target,
        ]
    }
}

/// Role of an element within a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Update,
    Exit,
}

/// A node as drawn at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGlyph {
    pub id: NodeId,
    pub label: String,
    pub fill: Rgb,
    pub label_side: LabelSide,
    pub position: Point,
    pub opacity: f32,
    /// Set while the node fades out; it is gone once the transition ends.
    pub exiting: bool,
}

/// A link as drawn at one instant, keyed by its child node.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkGlyph {
    pub target: NodeId,
    pub shape: LinkShape,
    pub exiting: bool,
}

/// Everything on screen at one instant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub viewport: Viewport,
    /// Nodes in paint order.
    pub nodes: Vec<NodeGlyph>,
    pub links: Vec<LinkGlyph>,
}

impl Frame {
    pub fn node(&self, id: NodeId) -> Option<&NodeGlyph> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn link(&self, target: NodeId) -> Option<&LinkGlyph> {
        self.links.iter().find(|l| l.target == target)
    }

    /// Finds the topmost live node whose circle or label covers `p`.
    ///
    /// Label widths are estimated from the character count.
    pub fn hit_test(&self, p: Point, config: &RendererConfig) -> Option<NodeId> {
        // The circle is stroked 10 units wide with a transparent stroke.
        let reach = config.node_radius + 5.0;
        let char_width = config.font_size * 0.6;
        let half_line = config.font_size / 2.0;

        self.nodes.iter().rev().find_map(|node| {
            if node.exiting || node.opacity <= 0.0 {
                return None;
            }
            let dx = p.x - node.position.x;
            let dy = p.y - node.position.y;
            if dx * dx + dy * dy <= reach * reach {
                return Some(node.id);
            }
            let label_width = node.label.chars().count() as f32 * char_width;
            let (min_x, max_x) = match node.label_side {
                LabelSide::Right => (config.label_offset, config.label_offset + label_width),
                LabelSide::Left => (-config.label_offset - label_width, -config.label_offset),
            };
            (dx >= min_x && dx <= max_x && dy.abs() <= half_line).then_some(node.id)
        })
    }
}

/// Start and end state of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTrack {
    pub id: NodeId,
    pub phase: Phase,
    pub label: String,
    pub fill: Rgb,
    pub label_side: LabelSide,
    pub from: Point,
    pub to: Point,
    pub from_opacity: f32,
    pub to_opacity: f32,
}

/// Start and end state of one link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTrack {
    pub target: NodeId,
    pub phase: Phase,
    pub from: LinkShape,
    pub to: LinkShape,
}

/// The animated delta between the displayed frame and a new target frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub easing: Easing,
    pub viewport_from: Viewport,
    pub viewport_to: Viewport,
    pub nodes: Vec<NodeTrack>,
    pub links: Vec<LinkTrack>,
}

impl Transition {
    /// Diffs `displayed` against `target`.
    ///
    /// Entering nodes and links grow out of `enter_from`; exiting ones shrink
    /// into `exit_to`. Persisting elements move from where they are shown now.
    /// `displayed` is `None` when nothing has been drawn yet, in which case
    /// the viewport does not animate.
    pub fn between(
        displayed: Option<&Frame>,
        target: Frame,
        enter_from: Point,
        exit_to: Point,
        duration: Duration,
    ) -> Self {
        let empty = Frame::default();
        let previous = displayed.unwrap_or(&empty);
        let viewport_from = displayed.map_or(target.viewport, |f| f.viewport);

        let shown_nodes: HashMap<NodeId, &NodeGlyph> = previous.nodes.iter().map(|n| (n.id, n)).collect();
        let shown_links: HashMap<NodeId, &LinkGlyph> = previous.links.iter().map(|l| (l.target, l)).collect();

        let mut nodes = Vec::with_capacity(target.nodes.len());
        for glyph in &target.nodes {
            let (phase, from, from_opacity) = match shown_nodes.get(&glyph.id) {
                Some(shown) => (Phase::Update, shown.position, shown.opacity),
                None => (Phase::Enter, enter_from, 0.0),
            };
            nodes.push(NodeTrack {
                id: glyph.id,
                phase,
                label: glyph.label.clone(),
                fill: glyph.fill,
                label_side: glyph.label_side,
                from,
                to: glyph.position,
                from_opacity,
                to_opacity: 1.0,
            });
        }
        let live: HashSet<NodeId> = target.nodes.iter().map(|n| n.id).collect();
        for shown in &previous.nodes {
            if !live.contains(&shown.id) {
                nodes.push(NodeTrack {
                    id: shown.id,
                    phase: Phase::Exit,
                    label: shown.label.clone(),
                    fill: shown.fill,
                    label_side: shown.label_side,
                    from: shown.position,
                    to: exit_to,
                    from_opacity: shown.opacity,
                    to_opacity: 0.0,
                });
            }
        }

        let mut links = Vec::with_capacity(target.links.len());
        for glyph in &target.links {
            let (phase, from) = match shown_links.get(&glyph.target) {
                Some(shown) => (Phase::Update, shown.shape),
                None => (Phase::Enter, LinkShape::collapsed_at(enter_from)),
            };
            links.push(LinkTrack {
                target: glyph.target,
                phase,
                from,
                to: glyph.shape,
            });
        }
        let live_links: HashSet<NodeId> = target.links.iter().map(|l| l.target).collect();
        for shown in &previous.links {
            if !live_links.contains(&shown.target) {
                links.push(LinkTrack {
                    target: shown.target,
                    phase: Phase::Exit,
                    from: shown.shape,
                    to: LinkShape::collapsed_at(exit_to),
                });
            }
        }

        Self {
            duration,
            easing: Easing::default(),
            viewport_from,
            viewport_to: target.viewport,
            nodes,
            links,
        }
    }

    /// Number of node tracks in the given phase.
    pub fn count(&self, phase: Phase) -> usize {
        self.nodes.iter().filter(|n| n.phase == phase).count()
    }

    /// Number of link tracks in the given phase.
    pub fn link_count(&self, phase: Phase) -> usize {
        self.links.iter().filter(|l| l.phase == phase).count()
    }

    /// The frame at `progress` (0.0 to 1.0, before easing).
    ///
    /// Exiting elements are removed once progress reaches 1.
    pub fn sample(&self, progress: f32) -> Frame {
        let done = progress >= 1.0;
        let t = self.easing.apply(progress);

        let nodes = self
            .nodes
            .iter()
            .filter(|track| !(done && track.phase == Phase::Exit))
            .map(|track| NodeGlyph {
                id: track.id,
                label: track.label.clone(),
                fill: track.fill,
                label_side: track.label_side,
                position: track.from.lerp(track.to, t),
                opacity: lerp(track.from_opacity, track.to_opacity, t),
                exiting: track.phase == Phase::Exit,
            })
            .collect();

        let links = self
            .links
            .iter()
            .filter(|track| !(done && track.phase == Phase::Exit))
            .map(|track| LinkGlyph {
                target: track.target,
                shape: track.from.lerp(track.to, t),
                exiting: track.phase == Phase::Exit,
            })
            .collect();

        Frame {
            viewport: self.viewport_from.lerp(self.viewport_to, t),
            nodes,
            links,
        }
    }

    /// The frame once the transition has finished.
    pub fn settled(&self) -> Frame {
        self.sample(1.0)
    }

    /// Progress after `elapsed`; zero-length transitions are complete at once.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(id: NodeId, x: f32, y: f32) -> NodeGlyph {
        NodeGlyph {
            id,
            label: format!("n{id}"),
            fill: Rgb::new(0, 0, 0),
            label_side: LabelSide::Right,
            position: Point::new(x, y),
            opacity: 1.0,
            exiting: false,
        }
    }

    fn link(target: NodeId, from: Point, to: Point) -> LinkGlyph {
        LinkGlyph {
            target,
            shape: LinkShape { source: from, target: to },
            exiting: false,
        }
    }

    fn frame(nodes: Vec<NodeGlyph>, links: Vec<LinkGlyph>) -> Frame {
        Frame {
            viewport: Viewport { x: -40.0, y: -10.0, width: 628.0, height: 30.0 },
            nodes,
            links,
        }
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::CubicInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert_eq!(Easing::CubicInOut.apply(0.5), 0.5);
        assert!(Easing::CubicInOut.apply(0.25) < 0.25);
    }

    #[test]
    fn test_first_frame_enters_everything() {
        let origin = Point::new(0.0, 5.0);
        let target = frame(
            vec![glyph(1, 100.0, 0.0), glyph(0, 0.0, 0.0)],
            vec![link(1, Point::new(0.0, 0.0), Point::new(100.0, 0.0))],
        );
        let transition = Transition::between(None, target.clone(), origin, origin, Duration::from_millis(250));

        assert_eq!(transition.count(Phase::Enter), 2);
        assert_eq!(transition.viewport_from, target.viewport);

        let start = transition.sample(0.0);
        assert_eq!(start.node(1).unwrap().position, origin);
        assert_eq!(start.node(1).unwrap().opacity, 0.0);
        assert_eq!(start.link(1).unwrap().shape, LinkShape::collapsed_at(origin));

        assert_eq!(transition.settled(), target);
    }

    #[test]
    fn test_exit_shrinks_into_source_then_disappears() {
        let shown = frame(
            vec![glyph(2, 200.0, 10.0), glyph(1, 100.0, 0.0), glyph(0, 0.0, 0.0)],
            vec![
                link(1, Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
                link(2, Point::new(100.0, 0.0), Point::new(200.0, 10.0)),
            ],
        );
        let target = frame(
            vec![glyph(1, 100.0, 0.0), glyph(0, 0.0, 0.0)],
            vec![link(1, Point::new(0.0, 0.0), Point::new(100.0, 0.0))],
        );
        let sink = Point::new(100.0, 0.0);
        let transition = Transition::between(Some(&shown), target, sink, sink, Duration::from_millis(250));

        assert_eq!(transition.count(Phase::Exit), 1);
        assert_eq!(transition.count(Phase::Update), 2);
        assert_eq!(transition.link_count(Phase::Exit), 1);

        let mid = transition.sample(0.5);
        let exiting = mid.node(2).unwrap();
        assert!(exiting.exiting);
        assert_eq!(exiting.opacity, 0.5);
        assert_eq!(exiting.position, Point::new(150.0, 5.0));

        let end = transition.settled();
        assert!(end.node(2).is_none());
        assert!(end.link(2).is_none());
    }

    #[test]
    fn test_update_starts_from_displayed_state() {
        let mut moving = glyph(1, 50.0, 0.0);
        moving.opacity = 0.4;
        let shown = frame(vec![moving], vec![]);
        let target = frame(vec![glyph(1, 150.0, 0.0)], vec![]);
        let transition =
            Transition::between(Some(&shown), target, Point::default(), Point::default(), Duration::from_millis(100));

        let track = &transition.nodes[0];
        assert_eq!(track.phase, Phase::Update);
        assert_eq!(track.from, Point::new(50.0, 0.0));
        assert_eq!(track.from_opacity, 0.4);
    }

    #[test]
    fn test_progress() {
        let transition = Transition::between(
            None,
            Frame::default(),
            Point::default(),
            Point::default(),
            Duration::from_millis(200),
        );
        assert_eq!(transition.progress(Duration::from_millis(100)), 0.5);
        assert_eq!(transition.progress(Duration::from_secs(5)), 1.0);

        let instant = Transition { duration: Duration::ZERO, ..transition };
        assert_eq!(instant.progress(Duration::ZERO), 1.0);
    }

    #[test]
    fn test_bezier_leaves_horizontally() {
        let shape = LinkShape {
            source: Point::new(0.0, 0.0),
            target: Point::new(100.0, 40.0),
        };
        let [_, c1, c2, _] = shape.bezier();
        assert_eq!(c1, Point::new(50.0, 0.0));
        assert_eq!(c2, Point::new(50.0, 40.0));
    }

    #[test]
    fn test_hit_test_circle_and_label() {
        let config = RendererConfig::default();
        let mut left = glyph(1, 100.0, 0.0);
        left.label_side = LabelSide::Left;
        let shown = frame(vec![glyph(0, 0.0, 0.0), left], vec![]);

        assert_eq!(shown.hit_test(Point::new(3.0, 3.0), &config), Some(0));
        assert_eq!(shown.hit_test(Point::new(10.0, 1.0), &config), Some(0));
        assert_eq!(shown.hit_test(Point::new(90.0, 0.0), &config), Some(1));
        assert_eq!(shown.hit_test(Point::new(50.0, 0.0), &config), None);
    }
}
