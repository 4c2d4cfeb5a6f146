//! Canvas: the scene, its viewport and the interaction controller.

use crate::config::CanvasConfig;
use crate::handles::{HandleFrame, handle_frames};
use crate::input::InputEvent;
use crate::interaction::{InputResponse, InteractionController};
use crate::layers::{GroupLayer, Layer, LayerId};
use crate::scene::Scene;
use crate::viewport::Viewport;
use kurbo::{Rect, Size};

/// Padding used by [`Canvas::fit_to_content`], in screen pixels.
const FIT_PADDING: f64 = 50.0;

/// An editable canvas.
#[derive(Debug)]
pub struct Canvas {
    /// Layers and selection.
    pub scene: Scene,
    /// Pan and zoom.
    pub viewport: Viewport,
    /// Size of the visible area in screen pixels.
    pub viewport_size: Size,
    controller: InteractionController,
    config: CanvasConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            scene: Scene::new(),
            viewport: Viewport::from_config(&config),
            viewport_size: Size::new(800.0, 600.0),
            controller: InteractionController::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    /// Feed one input event through the interaction controller.
    pub fn handle_input(&mut self, event: &InputEvent) -> InputResponse {
        self.controller
            .handle_event(event, &mut self.scene, &mut self.viewport)
    }

    /// The selection frame in screen space.
    pub fn selection_screen_frame(&self) -> Option<Rect> {
        self.scene
            .selection_frame()
            .map(|frame| self.viewport.canvas_rect_to_screen(frame))
    }

    /// Screen-space handles of the current selection, empty when nothing is
    /// selected.
    pub fn handle_frames(&self) -> Vec<HandleFrame> {
        self.selection_screen_frame()
            .map(|frame| handle_frames(frame, self.config.handle_size, self.config.handle_hit_size))
            .unwrap_or_default()
    }

    /// Zoom and pan so that every layer is visible.
    pub fn fit_to_content(&mut self) {
        match crate::geometry::union_bounds(self.scene.layers().iter().filter_map(Layer::bounds)) {
            Some(bounds) => self
                .viewport
                .fit_to_bounds(bounds, self.viewport_size, FIT_PADDING),
            None => self.viewport.reset(),
        }
    }

    /// Remove every selected layer.
    pub fn delete_selected(&mut self) -> Vec<Layer> {
        let ids = self.scene.selected_ids();
        self.scene.remove_layers(&ids)
    }

    /// Replace the selected layers with a group of them, placed at the
    /// z-position of the topmost member. Needs at least two layers.
    pub fn group_selected(&mut self) -> Option<LayerId> {
        let ids = self.scene.selected_ids();
        if ids.len() < 2 {
            return None;
        }
        let top = ids.iter().filter_map(|id| self.scene.index_of(*id)).max()?;
        let insert_at = top + 1 - ids.len();

        let children = self.scene.remove_layers(&ids);
        let group_id = self.scene.add_layer(GroupLayer::new("Group", children));
        let from = self.scene.len() - 1;
        for _ in insert_at..from {
            self.scene.send_backward(group_id);
        }
        self.scene.single_select(group_id);
        log::debug!("Grouped {} layers into {}", ids.len(), group_id);
        Some(group_id)
    }

    /// Dissolve the selected groups in place, selecting their children.
    pub fn ungroup_selected(&mut self) -> Vec<LayerId> {
        let groups: Vec<LayerId> = self
            .scene
            .selected_layers()
            .filter(|layer| layer.is_group())
            .map(Layer::id)
            .collect();

        let mut released = Vec::new();
        for group_id in groups {
            let Some(index) = self.scene.index_of(group_id) else {
                continue;
            };
            let removed = self.scene.remove_layers(&[group_id]);
            for layer in removed {
                let Layer::Group(group) = layer else {
                    continue;
                };
                let children = group.ungroup();
                let count = children.len();
                for child in children {
                    released.push(self.scene.add_layer(child));
                }
                // Sink the children back to the group's z-position.
                let first_new = self.scene.len() - count;
                for (offset, id) in released[released.len() - count..].iter().enumerate() {
                    for _ in index + offset..first_new + offset {
                        self.scene.send_backward(*id);
                    }
                }
            }
        }

        if !released.is_empty() {
            self.scene.clear_selection();
            for id in &released {
                self.scene.add_selection(*id);
            }
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::SelectionHandle;
    use crate::input::Modifiers;
    use crate::layers::ShapeLayer;
    use kurbo::Point;

    fn rect(x: f64, y: f64) -> ShapeLayer {
        ShapeLayer::new("Rectangle", Rect::new(x, y, x + 10.0, y + 10.0))
    }

    #[test]
    fn test_handle_frames_follow_zoom() {
        let mut canvas = Canvas::default();
        let id = canvas.scene.add_layer(rect(0.0, 0.0));
        assert!(canvas.handle_frames().is_empty());

        canvas.scene.single_select(id);
        canvas.viewport.zoom = 4.0;
        let handles = canvas.handle_frames();

        assert_eq!(handles.len(), 8);
        let bottom_right = handles
            .iter()
            .find(|h| h.handle == SelectionHandle::BottomRight)
            .unwrap();
        assert_eq!(bottom_right.visible, Rect::new(38.0, 38.0, 42.0, 42.0));
    }

    #[test]
    fn test_handle_input_routes_to_controller() {
        let mut canvas = Canvas::default();
        let id = canvas.scene.add_layer(rect(0.0, 0.0));
        let response = canvas.handle_input(&InputEvent::PointerDown {
            position: Point::new(5.0, 5.0),
            modifiers: Modifiers::NONE,
        });
        assert!(response.needs_redraw);
        assert!(canvas.scene.is_selected(id));
        assert!(canvas.controller().drag_state().is_active());
    }

    #[test]
    fn test_group_and_ungroup_keep_z_position() {
        let mut canvas = Canvas::default();
        let bottom = canvas.scene.add_layer(rect(0.0, 0.0));
        let a = canvas.scene.add_layer(rect(20.0, 0.0));
        let b = canvas.scene.add_layer(rect(40.0, 0.0));
        let top = canvas.scene.add_layer(rect(60.0, 0.0));

        canvas.scene.single_select(a);
        canvas.scene.add_selection(b);
        let group = canvas.group_selected().unwrap();

        assert_eq!(canvas.scene.len(), 3);
        assert_eq!(canvas.scene.index_of(bottom), Some(0));
        assert_eq!(canvas.scene.index_of(group), Some(1));
        assert_eq!(canvas.scene.index_of(top), Some(2));
        assert_eq!(canvas.scene.selected_ids(), vec![group]);

        let released = canvas.ungroup_selected();
        assert_eq!(released, vec![a, b]);
        assert_eq!(canvas.scene.index_of(a), Some(1));
        assert_eq!(canvas.scene.index_of(b), Some(2));
        assert_eq!(canvas.scene.index_of(top), Some(3));
        assert_eq!(canvas.scene.selected_ids(), vec![a, b]);
    }

    #[test]
    fn test_group_needs_two_layers() {
        let mut canvas = Canvas::default();
        let id = canvas.scene.add_layer(rect(0.0, 0.0));
        canvas.scene.single_select(id);
        assert!(canvas.group_selected().is_none());
    }

    #[test]
    fn test_delete_selected() {
        let mut canvas = Canvas::default();
        let a = canvas.scene.add_layer(rect(0.0, 0.0));
        canvas.scene.add_layer(rect(20.0, 0.0));
        canvas.scene.single_select(a);

        assert_eq!(canvas.delete_selected().len(), 1);
        assert_eq!(canvas.scene.len(), 1);
        assert!(!canvas.scene.has_selection());
    }

    #[test]
    fn test_fit_to_content() {
        let mut canvas = Canvas::default();
        canvas.set_viewport_size(300.0, 300.0);
        canvas.scene.add_layer(ShapeLayer::new("Wide", Rect::new(0.0, 0.0, 100.0, 50.0)));
        canvas.fit_to_content();
        assert!((canvas.viewport.zoom - 2.0).abs() < 1e-9);
    }
}
