//! Pointer state machine: selection clicks, relocate and resize drags,
//! pan and zoom.

use crate::config::CanvasConfig;
use crate::geometry::{resized_frame, union_bounds};
use crate::handles::{CursorHint, SelectionHandle, hit_test_handles};
use crate::input::{InputEvent, Modifiers};
use crate::layers::{Layer, LayerId};
use crate::scene::Scene;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};

/// Transient state of the current pointer gesture.
///
/// Frames are captured in canvas space when the gesture starts and every
/// drag update is computed from them, never from the live frames.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Inactive,
    Resizing {
        handle: SelectionHandle,
        initial_mouse: Point,
        initial_frames: Vec<(LayerId, Rect)>,
    },
    Relocating {
        initial_mouse: Point,
        initial_frames: Vec<(LayerId, Rect)>,
    },
}

impl DragState {
    pub fn is_active(&self) -> bool {
        !matches!(self, DragState::Inactive)
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            DragState::Inactive => "Inactive",
            DragState::Resizing { .. } => "Resizing",
            DragState::Relocating { .. } => "Relocating",
        }
    }
}

/// Result of feeding one event to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputResponse {
    /// Suggested pointer affordance.
    pub cursor: CursorHint,
    /// Whether anything visible changed.
    pub needs_redraw: bool,
}

impl InputResponse {
    fn new(cursor: CursorHint, needs_redraw: bool) -> Self {
        Self {
            cursor,
            needs_redraw,
        }
    }
}

/// Drives the scene and viewport from input events.
#[derive(Debug, Clone)]
pub struct InteractionController {
    drag: DragState,
    handle_hit_size: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl InteractionController {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            drag: DragState::Inactive,
            handle_hit_size: config.handle_hit_size,
        }
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Dispatch one event.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        scene: &mut Scene,
        viewport: &mut Viewport,
    ) -> InputResponse {
        match *event {
            InputEvent::PointerDown {
                position,
                modifiers,
            } => self.pointer_down(position, modifiers, scene, viewport),
            InputEvent::PointerDragged { position } => self.pointer_dragged(position, scene, viewport),
            InputEvent::PointerUp { position } => self.pointer_up(position, scene, viewport),
            InputEvent::PointerMoved { position } => {
                InputResponse::new(self.hover(position, scene, viewport), false)
            }
            InputEvent::Magnify {
                position,
                magnification,
            } => InputResponse::new(
                CursorHint::Arrow,
                viewport.magnify(position, magnification),
            ),
            InputEvent::Scroll { delta } => {
                viewport.pan(delta);
                InputResponse::new(CursorHint::Arrow, delta != Vec2::ZERO)
            }
            InputEvent::Cancel => self.cancel(scene),
        }
    }

    /// Select under the pointer and arm a resize or relocate gesture.
    pub fn pointer_down(
        &mut self,
        position: Point,
        modifiers: Modifiers,
        scene: &mut Scene,
        viewport: &Viewport,
    ) -> InputResponse {
        let canvas_point = viewport.screen_to_canvas(position);
        let hit = scene.intersect(canvas_point).map(Layer::id);

        if let Some(id) = hit {
            if modifiers.shift {
                scene.multi_select(id);
            } else if modifiers.toggles() {
                scene.toggle_selection(id);
            } else if scene.is_selected(id) {
                // Keep the selection so it can be dragged as a whole.
                scene.focus_selection(id);
            } else {
                scene.single_select(id);
            }
        }

        let screen_frame = scene
            .selection_frame()
            .map(|frame| viewport.canvas_rect_to_screen(frame));

        let next = match screen_frame {
            Some(frame) => {
                if let Some(handle) = hit_test_handles(frame, self.handle_hit_size, position) {
                    DragState::Resizing {
                        handle,
                        initial_mouse: position,
                        initial_frames: capture_frames(scene),
                    }
                } else if frame.contains(position) {
                    DragState::Relocating {
                        initial_mouse: position,
                        initial_frames: capture_frames(scene),
                    }
                } else {
                    DragState::Inactive
                }
            }
            None => DragState::Inactive,
        };

        if hit.is_none() && !next.is_active() {
            scene.clear_selection();
        }

        self.transition(next);
        let cursor = match &self.drag {
            DragState::Resizing { handle, .. } => handle.cursor(),
            DragState::Relocating { .. } => CursorHint::ClosedHand,
            DragState::Inactive => CursorHint::Arrow,
        };
        InputResponse::new(cursor, true)
    }

    /// Apply the active gesture for the current pointer position.
    pub fn pointer_dragged(
        &mut self,
        position: Point,
        scene: &mut Scene,
        viewport: &Viewport,
    ) -> InputResponse {
        match &self.drag {
            DragState::Inactive => InputResponse::new(CursorHint::Arrow, false),
            DragState::Relocating {
                initial_mouse,
                initial_frames,
            } => {
                let delta = viewport.screen_delta_to_canvas(position - *initial_mouse);
                for (id, frame) in initial_frames {
                    let target = frame.origin() + delta;
                    scene.update_layer(*id, |layer| layer.set_position(target));
                }
                InputResponse::new(CursorHint::ClosedHand, true)
            }
            DragState::Resizing {
                handle,
                initial_mouse,
                initial_frames,
            } => {
                let cursor = handle.cursor();
                let Some(selection) = union_bounds(initial_frames.iter().map(|(_, frame)| *frame))
                else {
                    return InputResponse::new(cursor, false);
                };
                let delta = viewport.screen_delta_to_canvas(position - *initial_mouse);

                let mut resized = Vec::with_capacity(initial_frames.len());
                for (id, frame) in initial_frames {
                    match resized_frame(*frame, selection, delta, *handle) {
                        Some(new_frame) => resized.push((*id, new_frame)),
                        None => return InputResponse::new(cursor, false),
                    }
                }
                for (id, new_frame) in resized {
                    scene.update_layer(id, |layer| {
                        if let Some(resizable) = layer.as_resizable_mut() {
                            resizable.set_frame(new_frame);
                        }
                    });
                }
                InputResponse::new(cursor, true)
            }
        }
    }

    /// End the gesture, re-arming a relocate if the pointer is still over
    /// the selection.
    pub fn pointer_up(
        &mut self,
        position: Point,
        scene: &mut Scene,
        viewport: &Viewport,
    ) -> InputResponse {
        let over_selection = scene
            .selection_frame()
            .map(|frame| viewport.canvas_rect_to_screen(frame))
            .is_some_and(|frame| frame.contains(position));

        let next = if over_selection {
            DragState::Relocating {
                initial_mouse: position,
                initial_frames: capture_frames(scene),
            }
        } else {
            DragState::Inactive
        };
        self.transition(next);
        InputResponse::new(self.hover(position, scene, viewport), false)
    }

    /// Abort the active gesture, restoring every captured frame.
    pub fn cancel(&mut self, scene: &mut Scene) -> InputResponse {
        let frames = match std::mem::take(&mut self.drag) {
            DragState::Inactive => return InputResponse::default(),
            DragState::Resizing { initial_frames, .. }
            | DragState::Relocating { initial_frames, .. } => initial_frames,
        };
        for (id, frame) in frames {
            scene.update_layer(id, |layer| match layer.as_resizable_mut() {
                Some(resizable) => resizable.set_frame(frame),
                None => layer.set_position(frame.origin()),
            });
        }
        log::debug!("Drag cancelled");
        InputResponse::new(CursorHint::Arrow, true)
    }

    /// Cursor for a pointer hovering at `position`. Handles take priority
    /// over the selection body, which takes priority over other layers.
    pub fn hover(&self, position: Point, scene: &Scene, viewport: &Viewport) -> CursorHint {
        if let Some(frame) = scene
            .selection_frame()
            .map(|frame| viewport.canvas_rect_to_screen(frame))
        {
            if let Some(handle) = hit_test_handles(frame, self.handle_hit_size, position) {
                return handle.cursor();
            }
            if frame.contains(position) {
                return CursorHint::OpenHand;
            }
        }
        match scene.intersect(viewport.screen_to_canvas(position)) {
            Some(layer) if scene.is_selected(layer.id()) => CursorHint::OpenHand,
            Some(_) => CursorHint::PointingHand,
            None => CursorHint::Arrow,
        }
    }

    fn transition(&mut self, next: DragState) {
        if self.drag.label() != next.label() {
            log::debug!("Drag state: {} -> {}", self.drag.label(), next.label());
        }
        self.drag = next;
    }
}

/// Bounds of every selected layer, in z-order.
fn capture_frames(scene: &Scene) -> Vec<(LayerId, Rect)> {
    scene
        .selected_layers()
        .filter_map(|layer| layer.bounds().map(|bounds| (layer.id(), bounds)))
        .collect()
}
