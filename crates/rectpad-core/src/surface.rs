//! Canvas surface: the pointer gesture lifecycle over the rectangle store.

use crate::config::SurfaceConfig;
use crate::input::{MouseButton, PointerEvent};
use crate::selection::{Corner, Edge, Handle, HandleKind, Selection, get_handles, hit_test_handles};
use crate::shapes::{RectId, Rectangle, StrokeColor};
use crate::store::{DiscardReason, RectStore};
use crate::transform::Transformer;
use kurbo::{Point, Rect, Vec2};
use thiserror::Error;

/// What a pointer position resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas.
    Background,
    /// Body of a rectangle.
    Rectangle(RectId),
    /// Transform handle of the selected rectangle.
    Handle(RectId, HandleKind),
}

/// Non-fatal condition the host should show to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SurfaceWarning {
    #[error("select a color")]
    MissingColor,
}

/// Signals the surface sends back to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The host should clear its selected color.
    ClearColor,
    /// A blocking alert should be shown.
    Alert(SurfaceWarning),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("unknown rectangle {0}")]
    UnknownRectangle(RectId),
}

/// Cursor the host should show for a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Default,
    Crosshair,
    Move,
    Pointer,
    ResizeNwSe,
    ResizeNeSw,
    ResizeNs,
    ResizeEw,
}

impl From<HandleKind> for CursorKind {
    fn from(kind: HandleKind) -> Self {
        match kind {
            HandleKind::Corner(Corner::TopLeft | Corner::BottomRight) => CursorKind::ResizeNwSe,
            HandleKind::Corner(Corner::TopRight | Corner::BottomLeft) => CursorKind::ResizeNeSw,
            HandleKind::Edge(Edge::Top | Edge::Bottom) => CursorKind::ResizeNs,
            HandleKind::Edge(Edge::Left | Edge::Right) => CursorKind::ResizeEw,
        }
    }
}

/// Render state of the rectangle being dragged or transformed.
///
/// Overlaid on the stored geometry until drag-end or transform-end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveNode {
    pub id: RectId,
    pub position: Point,
    pub scale: Vec2,
}

#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    /// A new rectangle follows the pointer from `anchor`.
    Drawing { id: RectId, anchor: Point },
    /// Press ignored by the duplicate-color guard.
    Suppressed,
    /// Press on an unselected rectangle while another one is selected.
    Pressed,
    /// The selected rectangle follows the pointer.
    Dragging { id: RectId, grab: Vec2 },
    Transforming(Transformer),
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    target: PointerTarget,
}

/// Pick the rectangle tagged with `color`, or keep `current`.
///
/// The scan runs in ascending id order and the last match wins.
pub fn reconcile_selection(
    store: &RectStore,
    color: Option<StrokeColor>,
    current: Option<RectId>,
) -> Option<RectId> {
    color.and_then(|color| store.find_by_stroke(color)).or(current)
}

/// The drawing surface. Owns the store, the selection and the gesture state.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    config: SurfaceConfig,
    store: RectStore,
    selection: Selection,
    color: Option<StrokeColor>,
    gesture: Gesture,
    press: Option<Press>,
    live: Option<LiveNode>,
    touch: bool,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasSurface {
    pub fn new() -> Self {
        Self::with_config(SurfaceConfig::default())
    }

    pub fn with_config(config: SurfaceConfig) -> Self {
        Self {
            config,
            store: RectStore::new(),
            selection: Selection::default(),
            color: None,
            gesture: Gesture::Idle,
            press: None,
            live: None,
            touch: false,
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn store(&self) -> &RectStore {
        &self.store
    }

    pub fn selected(&self) -> Option<RectId> {
        self.selection.get()
    }

    pub fn color(&self) -> Option<StrokeColor> {
        self.color
    }

    pub fn live(&self) -> Option<&LiveNode> {
        self.live.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, Gesture::Drawing { .. })
    }

    /// Whether the current press was swallowed by the duplicate-color guard.
    pub fn duplicate_guard_engaged(&self) -> bool {
        matches!(self.gesture, Gesture::Suppressed)
    }

    /// Switch handle hit-testing between mouse and touch tolerance.
    pub fn set_touch_input(&mut self, touch: bool) {
        self.touch = touch;
    }

    /// Store the host's current color and re-derive the selection from it.
    pub fn set_color(&mut self, color: Option<StrokeColor>) -> Option<RectId> {
        self.color = color;
        let selected = reconcile_selection(&self.store, color, self.selection.get());
        self.selection.set(selected);
        selected
    }

    /// Handle hit radius at `point`. Inside the body the radius shrinks to
    /// the drawn handle square and to a quarter of the shorter side, so
    /// small rectangles keep a draggable interior.
    fn hit_tolerance(&self, bounds: Rect, point: Point) -> f64 {
        let tolerance = if self.touch {
            self.config.touch_hit_tolerance
        } else {
            self.config.handle_hit_tolerance
        };
        if bounds.contains(point) {
            let inner = (self.config.handle_size / 2.0).min(bounds.width().min(bounds.height()) / 4.0);
            tolerance.min(inner)
        } else {
            tolerance
        }
    }

    /// Resolve what lies under `point`: handles of the selection first, then
    /// the topmost rectangle, then the background.
    pub fn target_at(&self, point: Point) -> PointerTarget {
        let point = self.config.clamp(point);
        if !self.is_drawing() {
            if let Some((id, rect)) = self.selected_rect() {
                let bounds = self.display_rect(rect);
                if let Some(kind) = hit_test_handles(bounds, point, self.hit_tolerance(bounds, point)) {
                    return PointerTarget::Handle(id, kind);
                }
            }
        }
        self.store
            .rect_at(point, 0.0)
            .map_or(PointerTarget::Background, PointerTarget::Rectangle)
    }

    pub fn cursor_at(&self, point: Point) -> CursorKind {
        if self.duplicate_guard_engaged() {
            return CursorKind::Default;
        }
        match &self.gesture {
            Gesture::Drawing { .. } => return CursorKind::Crosshair,
            Gesture::Dragging { .. } => return CursorKind::Move,
            Gesture::Transforming(transformer) => return transformer.handle().into(),
            Gesture::Idle | Gesture::Suppressed | Gesture::Pressed => {}
        }
        match self.target_at(point) {
            PointerTarget::Handle(_, kind) => kind.into(),
            PointerTarget::Rectangle(id) if self.selection.is_selected(id) => CursorKind::Move,
            PointerTarget::Rectangle(_) => CursorKind::Pointer,
            PointerTarget::Background => CursorKind::Crosshair,
        }
    }

    /// Route a unified pointer event. Only the primary button draws.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> Vec<SurfaceEvent> {
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(position),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => self.pointer_up(position),
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                Vec::new()
            }
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => Vec::new(),
        }
    }

    pub fn pointer_down(&mut self, point: Point) -> Vec<SurfaceEvent> {
        if !matches!(self.gesture, Gesture::Idle) {
            return Vec::new();
        }
        let point = self.config.clamp(point);
        let target = self.target_at(point);
        self.press = Some(Press {
            origin: point,
            target,
        });

        let mut events = Vec::new();
        match target {
            PointerTarget::Background => {
                self.selection.clear();
                events.push(SurfaceEvent::ClearColor);
                self.begin_drawing(point);
            }
            PointerTarget::Handle(id, kind) => {
                if let Some(rect) = self.store.get(id) {
                    log::debug!("Transforming rectangle {id} via {kind:?}");
                    self.gesture = Gesture::Transforming(Transformer::begin(id, kind, rect.as_rect(), point));
                }
            }
            PointerTarget::Rectangle(id) if self.selection.is_selected(id) => {
                if let Some(rect) = self.store.get(id) {
                    log::debug!("Dragging rectangle {id}");
                    self.gesture = Gesture::Dragging {
                        id,
                        grab: rect.position - point,
                    };
                    self.live = Some(LiveNode {
                        id,
                        position: rect.position,
                        scale: Vec2::new(1.0, 1.0),
                    });
                }
            }
            PointerTarget::Rectangle(_) if !self.selection.is_empty() => {
                self.gesture = Gesture::Pressed;
            }
            PointerTarget::Rectangle(_) => self.begin_drawing(point),
        }
        events
    }

    fn begin_drawing(&mut self, anchor: Point) {
        if self.store.uses_stroke(self.color) {
            log::debug!("Color already in use, ignoring press");
            self.gesture = Gesture::Suppressed;
            return;
        }
        let id = self.store.create(anchor, self.color);
        log::debug!("Drawing rectangle {id} at ({}, {})", anchor.x, anchor.y);
        self.selection.select(id);
        self.gesture = Gesture::Drawing { id, anchor };
    }

    pub fn pointer_move(&mut self, point: Point) {
        let point = self.config.clamp(point);
        match &mut self.gesture {
            Gesture::Drawing { id, anchor } => {
                if let Some(rect) = self.store.get_mut(*id) {
                    rect.width = point.x - anchor.x;
                    rect.height = point.y - anchor.y;
                }
            }
            Gesture::Dragging { id, grab } => {
                self.live = Some(LiveNode {
                    id: *id,
                    position: point + *grab,
                    scale: Vec2::new(1.0, 1.0),
                });
            }
            Gesture::Transforming(transformer) => {
                if !transformer.update(point) {
                    log::trace!("Resize below minimum size rejected");
                }
                self.live = Some(LiveNode {
                    id: transformer.id(),
                    position: transformer.position(),
                    scale: transformer.scale(),
                });
            }
            Gesture::Idle | Gesture::Suppressed | Gesture::Pressed => {}
        }
    }

    pub fn pointer_up(&mut self, point: Point) -> Vec<SurfaceEvent> {
        let Some(press) = self.press.take() else {
            return Vec::new();
        };
        let point = self.config.clamp(point);
        self.pointer_move(point);

        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drawing { id, .. } => self.finalize_drawn(id),
            Gesture::Dragging { id, .. } => {
                if let Some(live) = self.live {
                    if let Err(err) = self.commit_drag(id, live.position) {
                        log::warn!("Drag end failed: {err}");
                    }
                }
            }
            Gesture::Transforming(transformer) => {
                let end = transformer.finish();
                if let Err(err) = self.commit_transform(end.id, end.position, end.scale) {
                    log::warn!("Transform end failed: {err}");
                }
            }
            Gesture::Idle | Gesture::Suppressed | Gesture::Pressed => {}
        }
        self.live = None;

        let events = self.sweep();

        if press.origin.distance(point) <= self.config.click_tolerance {
            if let PointerTarget::Rectangle(id) = press.target {
                if self.store.contains(id) {
                    self.selection.select(id);
                }
            }
        }
        events
    }

    /// Abort the current gesture. A half-drawn rectangle is finalized.
    pub fn cancel(&mut self) -> Vec<SurfaceEvent> {
        self.press = None;
        self.live = None;
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drawing { id, .. } => {
                self.finalize_drawn(id);
                self.sweep()
            }
            _ => Vec::new(),
        }
    }

    /// Normalize a just-drawn rectangle and lift a thin side to the minimum.
    fn finalize_drawn(&mut self, id: RectId) {
        let Some(rect) = self.store.get_mut(id) else {
            return;
        };
        rect.normalize();
        if !rect.is_undersized() {
            rect.width = rect.width.max(Rectangle::MIN_SIZE);
            rect.height = rect.height.max(Rectangle::MIN_SIZE);
            // A raised side may cross the far edge; shift back inside.
            rect.position.x = rect.position.x.min(self.config.width - rect.width).max(0.0);
            rect.position.y = rect.position.y.min(self.config.height - rect.height).max(0.0);
        }
    }

    /// Replace the store with its swept copy and report what was dropped.
    fn sweep(&mut self) -> Vec<SurfaceEvent> {
        let outcome = self.store.sweep();
        self.store = outcome.kept;

        let mut events = Vec::new();
        for discarded in outcome.discarded {
            if self.selection.is_selected(discarded.id) {
                self.selection.clear();
            }
            match discarded.reason {
                DiscardReason::MissingColor => {
                    log::info!("Discarded rectangle {} without a color", discarded.id);
                    events.push(SurfaceEvent::Alert(SurfaceWarning::MissingColor));
                }
                DiscardReason::Undersized => {
                    log::debug!("Discarded undersized rectangle {}", discarded.id);
                }
            }
        }
        events
    }

    /// Select a rectangle and activate its transform handles.
    pub fn select(&mut self, id: RectId) -> Result<(), SurfaceError> {
        if !self.store.contains(id) {
            return Err(SurfaceError::UnknownRectangle(id));
        }
        self.selection.select(id);
        Ok(())
    }

    /// Drag-end: write the new top-left into the store.
    pub fn commit_drag(&mut self, id: RectId, position: Point) -> Result<(), SurfaceError> {
        let rect = self.store.get_mut(id).ok_or(SurfaceError::UnknownRectangle(id))?;
        rect.position = position;
        log::debug!("Moved rectangle {id} to ({}, {})", position.x, position.y);
        self.drop_live(id);
        Ok(())
    }

    /// Transform-end: fold the node scale into the stored size and reset it to 1.
    pub fn commit_transform(&mut self, id: RectId, position: Point, scale: Vec2) -> Result<(), SurfaceError> {
        let rect = self.store.get_mut(id).ok_or(SurfaceError::UnknownRectangle(id))?;
        rect.position = position;
        rect.width = (rect.width * scale.x).abs().max(Rectangle::MIN_SIZE);
        rect.height = (rect.height * scale.y).abs().max(Rectangle::MIN_SIZE);
        log::debug!("Resized rectangle {id} to {}x{}", rect.width, rect.height);
        self.drop_live(id);
        Ok(())
    }

    fn drop_live(&mut self, id: RectId) {
        if self.live.is_some_and(|live| live.id == id) {
            self.live = None;
        }
    }

    fn selected_rect(&self) -> Option<(RectId, &Rectangle)> {
        let id = self.selection.get()?;
        self.store.get(id).map(|rect| (id, rect))
    }

    /// Geometry to draw for `rect`, with the live node applied.
    pub fn display_rect(&self, rect: &Rectangle) -> Rect {
        match self.live {
            Some(live) if live.id == rect.id() => rect.scaled_rect(live.position, live.scale),
            _ => rect.as_rect(),
        }
    }

    /// Bounds of the selected rectangle as drawn.
    pub fn selected_bounds(&self) -> Option<Rect> {
        self.selected_rect().map(|(_, rect)| self.display_rect(rect))
    }

    /// Transform handles to draw. None while a rectangle is being drawn.
    pub fn handles(&self) -> Vec<Handle> {
        if self.is_drawing() {
            return Vec::new();
        }
        self.selected_bounds().map(get_handles).unwrap_or_default()
    }
}
