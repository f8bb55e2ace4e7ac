//! Pointer-driven interaction sessions
//!
//! A session starts on a press, is fed pointer positions while the button is
//! held, and ends in exactly one of two ways: `commit` hands back at most one
//! [`Action`] for the caller to run, `cancel` hands back none. Sessions never
//! touch the model themselves.
//!
//! A [`SessionSlot`] holds the one live session. Starting another replaces it,
//! and the token of the replaced session stops working, so late events from a
//! stale press are ignored.

use tracing::debug;

use crate::error::ActionError;
use crate::layout::{
    border_resize_snapshot, calculate_split, splitter_snapshot, BorderResizeSnapshot,
    SplitterBar, SplitterSnapshot, SplitterTarget,
};
use crate::messages::Action;
use crate::model::{Model, NodeId, NodeRef, Orientation, Rect, WindowId};
use crate::view::{compute_drop, DragSubject, DropInfo, DropTuning};

/// Smallest width or height a floating window can be resized to
pub const MIN_FLOAT_WINDOW_SIZE: f64 = 50.0;

/// Pointer position, in the coordinate space of `window`
#[derive(Debug, Clone, PartialEq)]
pub struct Pointer {
    pub window: WindowId,
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(window: WindowId, x: f64, y: f64) -> Self {
        Self { window, x, y }
    }

    /// A pointer over the main window
    pub fn main(x: f64, y: f64) -> Self {
        Self::new(WindowId::main(), x, y)
    }

    fn along(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }
}

/// Why a session ended without committing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    EscapeKey,
    PointerCancel,
    FocusLost,
    /// Another session started
    Superseded,
    Programmatic,
}

/// Which edge or corner of a floating window is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    /// (moves left edge, moves right edge, moves top edge, moves bottom edge)
    fn edges(self) -> (bool, bool, bool, bool) {
        match self {
            ResizeHandle::Top => (false, false, true, false),
            ResizeHandle::Bottom => (false, false, false, true),
            ResizeHandle::Left => (true, false, false, false),
            ResizeHandle::Right => (false, true, false, false),
            ResizeHandle::TopLeft => (true, false, true, false),
            ResizeHandle::TopRight => (false, true, true, false),
            ResizeHandle::BottomLeft => (true, false, false, true),
            ResizeHandle::BottomRight => (false, true, false, true),
        }
    }

    fn apply(self, start: Rect, dx: f64, dy: f64) -> Rect {
        let (left, right, top, bottom) = self.edges();
        let (mut x0, mut x1) = (start.x, start.right());
        let (mut y0, mut y1) = (start.y, start.bottom());
        if left {
            x0 = (x0 + dx).min(x1 - MIN_FLOAT_WINDOW_SIZE);
        }
        if right {
            x1 = (x1 + dx).max(x0 + MIN_FLOAT_WINDOW_SIZE);
        }
        if top {
            y0 = (y0 + dy).min(y1 - MIN_FLOAT_WINDOW_SIZE);
        }
        if bottom {
            y1 = (y1 + dy).max(y0 + MIN_FLOAT_WINDOW_SIZE);
        }
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// What the caller should draw for the current pointer position
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Drop(Option<DropInfo>),
    Weights { row: NodeId, weights: Vec<f64> },
    BorderSize { border: NodeId, size: f64 },
    WindowRect { window: WindowId, rect: Rect },
}

#[derive(Debug, Clone, PartialEq)]
enum SessionKind {
    NodeDrag {
        subject: DragSubject,
        drop: Option<DropInfo>,
    },
    Splitter {
        snapshot: SplitterSnapshot,
        origin: f64,
        weights: Option<Vec<f64>>,
    },
    BorderResize {
        snapshot: BorderResizeSnapshot,
        orientation: Orientation,
        origin: f64,
        size: Option<f64>,
    },
    WindowMove {
        window: WindowId,
        start: Rect,
        origin: (f64, f64),
        rect: Option<Rect>,
    },
    WindowResize {
        window: WindowId,
        handle: ResizeHandle,
        start: Rect,
        origin: (f64, f64),
        rect: Option<Rect>,
    },
}

/// One press-drag-release gesture
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSession {
    kind: SessionKind,
}

impl InteractionSession {
    /// Start dragging a tab, a tabset or a not-yet-created tab
    pub fn begin_drag(model: &Model, subject: DragSubject) -> Result<Self, ActionError> {
        let draggable = match &subject {
            DragSubject::Tab(id) | DragSubject::TabSet(id) => match model.node_by_id(id) {
                Some(NodeRef::Tab(tab)) => tab.can_drag(&model.global),
                Some(NodeRef::TabSet(ts)) => ts.can_drag(&model.global),
                Some(other) => {
                    return Err(ActionError::wrong_kind(id, "tab or tabset", other.kind()))
                }
                None => return Err(ActionError::UnknownNode(id.clone())),
            },
            DragSubject::External(_) => true,
        };
        if !draggable {
            let node = match &subject {
                DragSubject::Tab(id) | DragSubject::TabSet(id) => id.clone(),
                DragSubject::External(_) => NodeId::default(),
            };
            return Err(ActionError::Disabled {
                node,
                operation: "drag",
            });
        }
        Ok(Self {
            kind: SessionKind::NodeDrag {
                subject,
                drop: None,
            },
        })
    }

    /// Start dragging a splitter bar from the last layout pass
    pub fn begin_splitter(
        model: &Model,
        bar: &SplitterBar,
        pointer: &Pointer,
    ) -> Result<Self, ActionError> {
        let kind = match &bar.target {
            SplitterTarget::Row { row, .. } => {
                let snapshot = splitter_snapshot(model, bar)
                    .ok_or_else(|| ActionError::UnknownNode(row.clone()))?;
                SessionKind::Splitter {
                    origin: pointer.along(snapshot.orientation),
                    snapshot,
                    weights: None,
                }
            }
            SplitterTarget::Border(location) => {
                let snapshot = border_resize_snapshot(model, *location).ok_or_else(|| {
                    ActionError::UnknownNode(crate::model::Border::id_for(*location))
                })?;
                SessionKind::BorderResize {
                    snapshot,
                    orientation: bar.orientation,
                    origin: pointer.along(bar.orientation),
                    size: None,
                }
            }
        };
        Ok(Self { kind })
    }

    /// Start moving a floating window by its title area
    pub fn begin_window_move(
        model: &Model,
        window: &WindowId,
        pointer: &Pointer,
    ) -> Result<Self, ActionError> {
        let start = floating_rect(model, window, "move")?;
        Ok(Self {
            kind: SessionKind::WindowMove {
                window: window.clone(),
                start,
                origin: (pointer.x, pointer.y),
                rect: None,
            },
        })
    }

    pub fn begin_window_resize(
        model: &Model,
        window: &WindowId,
        handle: ResizeHandle,
        pointer: &Pointer,
    ) -> Result<Self, ActionError> {
        let start = floating_rect(model, window, "resize")?;
        Ok(Self {
            kind: SessionKind::WindowResize {
                window: window.clone(),
                handle,
                start,
                origin: (pointer.x, pointer.y),
                rect: None,
            },
        })
    }

    /// Feed a pointer position; returns what to draw
    pub fn update(&mut self, model: &Model, pointer: &Pointer, tuning: &DropTuning) -> Preview {
        match &mut self.kind {
            SessionKind::NodeDrag { subject, drop } => {
                *drop = compute_drop(model, &pointer.window, subject, pointer.x, pointer.y, tuning);
                Preview::Drop(drop.clone())
            }
            SessionKind::Splitter {
                snapshot,
                origin,
                weights,
            } => {
                let delta = pointer.along(snapshot.orientation) - *origin;
                let new = calculate_split(snapshot, snapshot.position() + delta);
                *weights = Some(new.clone());
                Preview::Weights {
                    row: snapshot.row.clone(),
                    weights: new,
                }
            }
            SessionKind::BorderResize {
                snapshot,
                orientation,
                origin,
                size,
            } => {
                let requested = snapshot.requested_size(pointer.along(*orientation) - *origin);
                *size = Some(requested);
                Preview::BorderSize {
                    border: snapshot.border.clone(),
                    size: requested,
                }
            }
            SessionKind::WindowMove {
                window,
                start,
                origin,
                rect,
            } => {
                let moved = Rect::new(
                    start.x + pointer.x - origin.0,
                    start.y + pointer.y - origin.1,
                    start.width,
                    start.height,
                );
                *rect = Some(moved);
                Preview::WindowRect {
                    window: window.clone(),
                    rect: moved,
                }
            }
            SessionKind::WindowResize {
                window,
                handle,
                start,
                origin,
                rect,
            } => {
                let resized = handle.apply(*start, pointer.x - origin.0, pointer.y - origin.1);
                *rect = Some(resized);
                Preview::WindowRect {
                    window: window.clone(),
                    rect: resized,
                }
            }
        }
    }

    /// End the gesture; `None` when the pointer never produced a target
    pub fn commit(self) -> Option<Action> {
        match self.kind {
            SessionKind::NodeDrag { subject, drop } => drop.map(|d| d.action_for(&subject)),
            SessionKind::Splitter {
                snapshot, weights, ..
            } => weights.map(|weights| Action::AdjustWeights {
                node_id: snapshot.row,
                weights,
            }),
            SessionKind::BorderResize { snapshot, size, .. } => {
                size.map(|size| Action::AdjustBorderSplit {
                    node: snapshot.border,
                    size,
                })
            }
            SessionKind::WindowMove { window, rect, .. }
            | SessionKind::WindowResize { window, rect, .. } => rect.map(|rect| Action::MoveWindow {
                window_id: window,
                rect,
            }),
        }
    }

    pub fn cancel(self, reason: CancelReason) {
        debug!(?reason, "interaction cancelled");
    }
}

fn floating_rect(model: &Model, id: &WindowId, operation: &'static str) -> Result<Rect, ActionError> {
    if id.is_main() {
        return Err(ActionError::MainWindow { operation });
    }
    model
        .windows
        .get(id)
        .map(|w| w.rect)
        .ok_or_else(|| ActionError::UnknownWindow(id.clone()))
}

/// Identifies the session a caller started; goes stale once replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(u64);

/// Holder of the single live session
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: Option<(SessionToken, InteractionSession)>,
    generation: u64,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session, cancelling any live one
    pub fn begin(&mut self, session: InteractionSession) -> SessionToken {
        if let Some((_, stale)) = self.current.take() {
            stale.cancel(CancelReason::Superseded);
        }
        self.generation += 1;
        let token = SessionToken(self.generation);
        self.current = Some((token, session));
        token
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_current(&self, token: SessionToken) -> bool {
        matches!(&self.current, Some((live, _)) if *live == token)
    }

    /// Feed the live session; `None` for a stale token
    pub fn update(
        &mut self,
        token: SessionToken,
        model: &Model,
        pointer: &Pointer,
        tuning: &DropTuning,
    ) -> Option<Preview> {
        match &mut self.current {
            Some((live, session)) if *live == token => Some(session.update(model, pointer, tuning)),
            _ => None,
        }
    }

    /// Finish the live session, yielding its action
    pub fn commit(&mut self, token: SessionToken) -> Option<Action> {
        if !self.is_current(token) {
            return None;
        }
        let (_, session) = self.current.take()?;
        session.commit()
    }

    pub fn cancel(&mut self, token: SessionToken, reason: CancelReason) {
        if self.is_current(token) {
            if let Some((_, session)) = self.current.take() {
                session.cancel(reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayoutWindow, Row, RowChild, Tab, TabSet};

    fn model_with_float() -> Model {
        let mut model = Model::default();
        let root = Row::new("float_root").with_children(vec![RowChild::Tabset(
            TabSet::new("float_ts").with_tabs(vec![Tab::new("f", "F")]),
        )]);
        let id = WindowId::new("w1");
        model.windows.insert(
            id.clone(),
            LayoutWindow::new(id.clone(), Rect::new(100.0, 100.0, 300.0, 200.0), root),
        );
        model.float_z_order = vec![id];
        model.relink();
        model
    }

    #[test]
    fn test_window_move_commits_one_action() {
        let model = model_with_float();
        let w1 = WindowId::new("w1");
        let mut session =
            InteractionSession::begin_window_move(&model, &w1, &Pointer::main(110.0, 110.0))
                .unwrap();
        session.update(&model, &Pointer::main(160.0, 90.0), &DropTuning::default());
        assert_eq!(
            session.commit(),
            Some(Action::MoveWindow {
                window_id: w1,
                rect: Rect::new(150.0, 80.0, 300.0, 200.0),
            })
        );
    }

    #[test]
    fn test_resize_respects_minimum() {
        let start = Rect::new(0.0, 0.0, 200.0, 100.0);
        let rect = ResizeHandle::BottomRight.apply(start, -500.0, -500.0);
        assert_eq!(rect, Rect::new(0.0, 0.0, MIN_FLOAT_WINDOW_SIZE, MIN_FLOAT_WINDOW_SIZE));
        let rect = ResizeHandle::Left.apply(start, -20.0, 0.0);
        assert_eq!(rect, Rect::new(-20.0, 0.0, 220.0, 100.0));
    }

    #[test]
    fn test_main_window_cannot_be_moved() {
        let model = model_with_float();
        let err =
            InteractionSession::begin_window_move(&model, &WindowId::main(), &Pointer::main(0.0, 0.0))
                .unwrap_err();
        assert!(matches!(err, ActionError::MainWindow { .. }));
    }

    #[test]
    fn test_new_session_invalidates_old_token() {
        let model = model_with_float();
        let w1 = WindowId::new("w1");
        let mut slot = SessionSlot::new();
        let pointer = Pointer::main(110.0, 110.0);
        let first = slot.begin(InteractionSession::begin_window_move(&model, &w1, &pointer).unwrap());
        let second = slot.begin(InteractionSession::begin_window_move(&model, &w1, &pointer).unwrap());

        assert!(!slot.is_current(first));
        assert_eq!(
            slot.update(first, &model, &pointer, &DropTuning::default()),
            None
        );
        assert_eq!(slot.commit(first), None);
        assert!(slot.is_current(second));
    }

    #[test]
    fn test_cancel_yields_no_action() {
        let model = model_with_float();
        let mut slot = SessionSlot::new();
        let session = InteractionSession::begin_drag(&model, DragSubject::Tab("f".into())).unwrap();
        let token = slot.begin(session);
        slot.cancel(token, CancelReason::EscapeKey);
        assert!(!slot.is_active());
        assert_eq!(slot.commit(token), None);
    }

    #[test]
    fn test_drag_requires_enable_drag() {
        let mut model = model_with_float();
        model.global.tab_enable_drag = false;
        let err =
            InteractionSession::begin_drag(&model, DragSubject::Tab("f".into())).unwrap_err();
        assert!(matches!(err, ActionError::Disabled { .. }));
    }
}
