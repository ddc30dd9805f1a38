//! The tree card renderer.
//!
//! `TreeRenderer` owns the layout tree and the transition currently on
//! screen. It is driven synchronously: `render` and `toggle` compute the new
//! layout before returning, and the host samples the animation with
//! `frame(now)` from its own frame loop.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use treecard::data::TreeNode;
//! use treecard::renderer::{Detached, TreeRenderer};
//! use treecard::config::RendererConfig;
//!
//! let data = TreeNode::with_children("Root", vec![TreeNode::leaf("A"), TreeNode::leaf("B")]);
//! let mut renderer = TreeRenderer::new(Detached, RendererConfig::default());
//! renderer.render(&data).unwrap();
//! let frame = renderer.frame(Instant::now() + Duration::from_secs(1)).unwrap();
//! assert_eq!(frame.nodes.len(), 3);
//! ```

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use serde_json::Value;

use crate::color::DepthColorScale;
use crate::config::RendererConfig;
use crate::data::{TreeNode, MAX_DEPTH};
use crate::error::TreeError;
use crate::hierarchy::{LayoutTree, NodeId};
use crate::layout::{Extent, TidyTree};
use crate::svg::render_svg;
use crate::theme::CardPalette;
use crate::transition::{
    Frame, LabelSide, LinkGlyph, LinkShape, NodeGlyph, Phase, Point, Transition, Viewport,
};

/// The surface a renderer draws into.
///
/// Every method has a default so a host only implements what it supports.
pub trait Container {
    /// Current drawable width, if the host knows it.
    fn width(&self) -> Option<f32> {
        None
    }

    /// Whether the host notices size changes on its own.
    ///
    /// When false, `layout_changed` is called on every tick of a running
    /// transition instead of once per update.
    fn observes_resize(&self) -> bool {
        true
    }

    /// Called when the viewport changes.
    fn layout_changed(&mut self, _viewport: &Viewport) {}

    /// Diagnostic channel for render failures.
    fn report(&mut self, _error: &TreeError) {}
}

/// A container with no host behind it, for headless rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Container for Detached {}

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

/// A click on a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickEvent {
    pub modifiers: Modifiers,
}

impl ClickEvent {
    pub fn with_alt() -> Self {
        Self {
            modifiers: Modifiers {
                alt: true,
                ..Modifiers::default()
            },
        }
    }
}

/// Counts from the most recent update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub nodes: usize,
    pub links: usize,
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

struct Active {
    transition: Transition,
    started: Instant,
}

impl Active {
    fn sample(&self, now: Instant) -> Frame {
        let elapsed = now.saturating_duration_since(self.started);
        self.transition.sample(self.transition.progress(elapsed))
    }

    fn running(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started);
        self.transition.progress(elapsed) < 1.0
    }
}

pub struct TreeRenderer<C: Container> {
    container: C,
    config: RendererConfig,
    updates: Option<Receiver<TreeNode>>,
    data: Option<TreeNode>,
    tree: Option<LayoutTree>,
    colors: DepthColorScale,
    width: f32,
    dy: f32,
    palette: CardPalette,
    active: Option<Active>,
    stats: RenderStats,
}

impl<C: Container> TreeRenderer<C> {
    pub fn new(container: C, config: RendererConfig) -> Self {
        if !container.observes_resize() {
            log::warn!("container does not observe resizes; notifying layout changes on every tick");
        }
        let width = config.width;
        Self {
            container,
            config,
            updates: None,
            data: None,
            tree: None,
            colors: DepthColorScale::new(0),
            width,
            dy: 0.0,
            palette: CardPalette::default(),
            active: None,
            stats: RenderStats::default(),
        }
    }

    /// Creates a renderer that also accepts new trees from `updates`.
    ///
    /// Trees queued on the channel are rendered by `pump_updates`.
    pub fn with_updates(container: C, config: RendererConfig, updates: Receiver<TreeNode>) -> Self {
        let mut renderer = Self::new(container, config);
        renderer.updates = Some(updates);
        renderer
    }

    /// Lays out `data` from scratch and animates towards it.
    ///
    /// Expansion state is reset according to the configured policy. On error
    /// the previously drawn tree stays on screen.
    pub fn render(&mut self, data: &TreeNode) -> Result<(), TreeError> {
        self.render_at(data, Instant::now())
    }

    fn render_at(&mut self, data: &TreeNode, now: Instant) -> Result<(), TreeError> {
        if data.height() > MAX_DEPTH {
            return Err(self.fail(TreeError::TooDeep { limit: MAX_DEPTH }));
        }

        let width = self
            .container
            .width()
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(self.config.width);
        let mut tree = LayoutTree::build(data, self.config.expansion);
        let height = tree.root().height;
        let dy = self.config.depth_spacing(width, height);

        let root = tree.root().id;
        if let Some(node) = tree.get_mut(root) {
            node.x0 = dy / 2.0;
            node.y0 = 0.0;
        }

        let previous = (self.width, self.dy, self.colors);
        self.width = width;
        self.dy = dy;
        self.colors = DepthColorScale::new(height);
        log::info!("rendering tree of {} nodes, height {}", tree.len(), height);

        match self.transition_to(&mut tree, root, false, now) {
            Ok(()) => {
                self.data = Some(data.clone());
                self.tree = Some(tree);
                Ok(())
            }
            Err(err) => {
                (self.width, self.dy, self.colors) = previous;
                Err(self.fail(err))
            }
        }
    }

    /// Renders the last tree again from scratch, e.g. after a config change.
    pub fn rerender(&mut self) -> Result<(), TreeError> {
        let Some(data) = self.data.clone() else {
            return Err(self.fail(TreeError::NotRendered));
        };
        self.render(&data)
    }

    /// Validates a JSON value and renders it.
    pub fn render_value(&mut self, value: &Value) -> Result<(), TreeError> {
        let data = TreeNode::from_value(value).map_err(|err| self.fail(err))?;
        self.render(&data)
    }

    /// Parses JSON text and renders it.
    pub fn render_json(&mut self, json: &str) -> Result<(), TreeError> {
        let data = TreeNode::from_json_str(json).map_err(|err| self.fail(err))?;
        self.render(&data)
    }

    /// Re-runs layout over the visible nodes and animates from `source`.
    ///
    /// Entering elements grow out of the source's previous position and
    /// exiting ones shrink into its new position. Alt slows the animation.
    pub fn update(&mut self, event: Option<&ClickEvent>, source: NodeId) -> Result<(), TreeError> {
        let slow = event.is_some_and(|e| e.modifiers.alt);
        self.update_at(source, slow, Instant::now(), |_| Ok(false))
            .map(|_| ())
    }

    /// Expands or collapses a node and animates the change.
    ///
    /// Returns `Ok(false)` when the node is a leaf; the layout is still
    /// refreshed, which moves nothing.
    pub fn toggle(&mut self, id: NodeId, event: &ClickEvent) -> Result<bool, TreeError> {
        self.toggle_at(id, event, Instant::now())
    }

    fn toggle_at(&mut self, id: NodeId, event: &ClickEvent, now: Instant) -> Result<bool, TreeError> {
        self.update_at(id, event.modifiers.alt, now, |tree| tree.toggle(id))
    }

    fn update_at<F>(&mut self, source: NodeId, slow: bool, now: Instant, edit: F) -> Result<bool, TreeError>
    where
        F: FnOnce(&mut LayoutTree) -> Result<bool, TreeError>,
    {
        // Work on a copy so a failed layout leaves the drawn tree untouched.
        let Some(mut tree) = self.tree.clone() else {
            return Err(self.fail(TreeError::NotRendered));
        };
        if tree.get(source).is_none() {
            return Err(self.fail(TreeError::UnknownNode(source)));
        }
        let changed = edit(&mut tree).map_err(|err| self.fail(err))?;
        self.transition_to(&mut tree, source, slow, now)
            .map_err(|err| self.fail(err))?;
        self.tree = Some(tree);
        Ok(changed)
    }

    fn transition_to(&mut self, tree: &mut LayoutTree, source: NodeId, slow: bool, now: Instant) -> Result<(), TreeError> {
        TidyTree::node_size(self.config.node_spacing, self.dy).apply(tree)?;

        let origin = tree.get(source).ok_or(TreeError::UnknownNode(source))?;
        let enter_from = Point::new(origin.y0, origin.x0);
        let exit_to = Point::new(origin.y, origin.x);

        let target = self.target_frame(tree);
        let viewport = target.viewport;
        let displayed = self.active.as_ref().map(|active| active.sample(now));
        let transition = Transition::between(
            displayed.as_ref(),
            target,
            enter_from,
            exit_to,
            self.config.transition(slow),
        );

        self.stats = RenderStats {
            nodes: transition.nodes.len() - transition.count(Phase::Exit),
            links: transition.links.len() - transition.link_count(Phase::Exit),
            entered: transition.count(Phase::Enter),
            updated: transition.count(Phase::Update),
            exited: transition.count(Phase::Exit),
        };
        log::debug!(
            "update from node {}: {} entered, {} updated, {} exited over {:?}",
            source,
            self.stats.entered,
            self.stats.updated,
            self.stats.exited,
            transition.duration
        );

        tree.commit_positions();
        self.active = Some(Active {
            transition,
            started: now,
        });
        if self.container.observes_resize() {
            self.container.layout_changed(&viewport);
        }
        Ok(())
    }

    /// The settled drawing for the current layout.
    fn target_frame(&self, tree: &LayoutTree) -> Frame {
        let visible = tree.visible();
        let extent = Extent::of(tree);
        let margins = self.config.margins;
        let viewport = Viewport {
            x: -margins.left,
            y: extent.min_x - margins.top,
            width: self.width,
            height: extent.breadth() + margins.top + margins.bottom,
        };

        // Reverse breadth-first order paints the root last.
        let nodes = visible
            .iter()
            .rev()
            .filter_map(|&id| tree.get(id))
            .map(|node| NodeGlyph {
                id: node.id,
                label: node.name.clone(),
                fill: if node.is_collapsed() {
                    self.palette.collapsed
                } else {
                    self.colors.color(node.depth)
                },
                label_side: if node.is_internal() {
                    LabelSide::Left
                } else {
                    LabelSide::Right
                },
                position: Point::new(node.y, node.x),
                opacity: 1.0,
                exiting: false,
            })
            .collect();

        let links = tree
            .links()
            .into_iter()
            .filter_map(|(parent, child)| Some((tree.get(parent)?, tree.get(child)?)))
            .map(|(parent, child)| LinkGlyph {
                target: child.id,
                shape: LinkShape {
                    source: Point::new(parent.y, parent.x),
                    target: Point::new(child.y, child.x),
                },
                exiting: false,
            })
            .collect();

        Frame {
            viewport,
            nodes,
            links,
        }
    }

    /// Toggles whichever node is drawn under `point` at `now`.
    pub fn click_at(&mut self, point: Point, event: &ClickEvent, now: Instant) -> Result<Option<NodeId>, TreeError> {
        match self.hit_test(point, now) {
            Some(id) => {
                self.toggle_at(id, event, now)?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    /// The node drawn under `point` (viewBox coordinates) at `now`.
    pub fn hit_test(&self, point: Point, now: Instant) -> Option<NodeId> {
        self.frame(now)?.hit_test(point, &self.config)
    }

    /// The drawing at `now`; `None` before the first render.
    pub fn frame(&self, now: Instant) -> Option<Frame> {
        self.active.as_ref().map(|active| active.sample(now))
    }

    /// The drawing once the running transition completes.
    pub fn settled_frame(&self) -> Option<Frame> {
        self.active.as_ref().map(|active| active.transition.settled())
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.active.as_ref().is_some_and(|active| active.running(now))
    }

    /// Advances time. Returns true while a transition is running.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(active) = self.active.as_ref() else {
            return false;
        };
        let running = active.running(now);
        if running && !self.container.observes_resize() {
            let viewport = active.sample(now).viewport;
            self.container.layout_changed(&viewport);
        }
        running
    }

    /// Recomputes the layout, e.g. after the container width changed.
    pub fn relayout(&mut self) -> Result<(), TreeError> {
        let Some(tree) = self.tree.as_ref() else {
            return Err(self.fail(TreeError::NotRendered));
        };
        let root = tree.root().id;
        let height = tree.root().height;
        let previous = (self.width, self.dy);
        if let Some(width) = self.container.width().filter(|w| w.is_finite() && *w > 0.0) {
            self.width = width;
        }
        self.dy = self.config.depth_spacing(self.width, height);
        let result = self.update_at(root, false, Instant::now(), |_| Ok(false));
        if result.is_err() {
            (self.width, self.dy) = previous;
        }
        result.map(|_| ())
    }

    /// Renders the newest tree waiting on the update stream, if any.
    pub fn pump_updates(&mut self) -> Result<bool, TreeError> {
        let Some(updates) = self.updates.as_ref() else {
            return Ok(false);
        };
        let mut latest = None;
        loop {
            match updates.try_recv() {
                Ok(data) => latest = Some(data),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("update stream closed");
                    self.updates = None;
                    break;
                }
            }
        }
        match latest {
            Some(data) => self.render(&data).map(|_| true),
            None => Ok(false),
        }
    }

    /// Serializes the drawing at `now` as an SVG document.
    pub fn to_svg(&self, now: Instant) -> Option<String> {
        self.frame(now)
            .map(|frame| render_svg(&frame, &self.config, &self.palette))
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn tree(&self) -> Option<&LayoutTree> {
        self.tree.as_ref()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Replaces the configuration; takes effect on the next render.
    pub fn set_config(&mut self, config: RendererConfig) {
        self.config = config;
    }

    pub fn palette(&self) -> &CardPalette {
        &self.palette
    }

    /// Changes the colors; takes effect on the next update.
    pub fn set_palette(&mut self, palette: CardPalette) {
        self.palette = palette;
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    fn fail(&mut self, err: TreeError) -> TreeError {
        log::error!("tree card: {err}");
        self.container.report(&err);
        err
    }
}
