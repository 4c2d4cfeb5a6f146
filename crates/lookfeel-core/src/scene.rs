//! Scene store: ordered layers, selection and change notification.

use crate::geometry::union_bounds;
use crate::layers::{Capability, Colorable, Layer, LayerId, Resizable, Traceable, Typographic};
use crate::notify::{ChangeNotifier, SubscriptionId};
use kurbo::{Point, Rect};
use std::collections::{HashMap, HashSet};

/// The authoritative list of layers and the current selection.
///
/// Layers are kept in z-order (later = on top) in a single vector, with an
/// id -> index map rebuilt on every structural change.
///
/// Selection invariants:
/// - every selected id is a layer in the scene;
/// - `first_selection` and `recent_selection`, when set, are selected.
#[derive(Debug, Default)]
pub struct Scene {
    layers: Vec<Layer>,
    index: HashMap<LayerId, usize>,
    selection: HashSet<LayerId>,
    first_selection: Option<LayerId>,
    recent_selection: Option<LayerId>,
    notifier: ChangeNotifier,
    layer_notifiers: HashMap<LayerId, ChangeNotifier>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Layers ---

    /// Append a layer on top of the z-order. Returns its id.
    ///
    /// A layer whose id is already present is not added again.
    pub fn add_layer(&mut self, layer: impl Into<Layer>) -> LayerId {
        let layer = layer.into();
        let id = layer.id();
        if self.index.contains_key(&id) {
            log::warn!("Layer {} is already in the scene", id);
            return id;
        }
        self.index.insert(id, self.layers.len());
        self.layers.push(layer);
        self.layer_notifiers.insert(id, ChangeNotifier::new());
        self.notifier.notify();
        id
    }

    /// Remove the given layers, deselecting them. Unknown ids are ignored.
    /// Returns the removed layers in z-order.
    pub fn remove_layers(&mut self, ids: &[LayerId]) -> Vec<Layer> {
        let doomed: HashSet<LayerId> = ids
            .iter()
            .copied()
            .filter(|id| self.index.contains_key(id))
            .collect();
        if doomed.is_empty() {
            return Vec::new();
        }

        let (removed, kept): (Vec<Layer>, Vec<Layer>) = std::mem::take(&mut self.layers)
            .into_iter()
            .partition(|layer| doomed.contains(&layer.id()));
        self.layers = kept;
        self.rebuild_index();

        for id in &doomed {
            self.layer_notifiers.remove(id);
            self.deselect(*id);
        }

        log::debug!("Removed {} layer(s)", removed.len());
        self.notifier.notify();
        removed
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.index.get(&id).and_then(|&i| self.layers.get(i))
    }

    /// Layers in z-order, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Position of a layer in the z-order.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Mutate a layer, then notify the layer's and the scene's listeners.
    /// Returns `None` if the layer does not exist.
    pub fn update_layer<R>(&mut self, id: LayerId, f: impl FnOnce(&mut Layer) -> R) -> Option<R> {
        let index = *self.index.get(&id)?;
        let layer = self.layers.get_mut(index)?;
        let result = f(layer);
        if let Some(notifier) = self.layer_notifiers.get_mut(&id) {
            notifier.notify();
        }
        self.notifier.notify();
        Some(result)
    }

    /// Topmost layer whose frame contains `point` (canvas space), honouring
    /// rotation. Layers without a frame are never hit.
    pub fn intersect(&self, point: Point) -> Option<&Layer> {
        self.layers.iter().rev().find(|layer| layer.hit_test(point))
    }

    // --- Notification ---

    /// Listen for any change to the scene or one of its layers.
    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Listen for changes to a single layer. `None` if the layer does not
    /// exist. The subscription ends when the layer is removed.
    pub fn subscribe_layer(
        &mut self,
        layer: LayerId,
        listener: impl FnMut() + 'static,
    ) -> Option<SubscriptionId> {
        self.layer_notifiers
            .get_mut(&layer)
            .map(|notifier| notifier.subscribe(listener))
    }

    pub fn unsubscribe_layer(&mut self, layer: LayerId, id: SubscriptionId) -> bool {
        self.layer_notifiers
            .get_mut(&layer)
            .is_some_and(|notifier| notifier.unsubscribe(id))
    }

    // --- Z-order ---

    /// Move a layer to the top. Returns false if unknown or already there.
    pub fn bring_to_front(&mut self, id: LayerId) -> bool {
        let last = self.layers.len().saturating_sub(1);
        self.move_layer(id, |_| last)
    }

    /// Move a layer to the bottom.
    pub fn send_to_back(&mut self, id: LayerId) -> bool {
        self.move_layer(id, |_| 0)
    }

    /// Move a layer one step up.
    pub fn bring_forward(&mut self, id: LayerId) -> bool {
        let last = self.layers.len().saturating_sub(1);
        self.move_layer(id, |i| (i + 1).min(last))
    }

    /// Move a layer one step down.
    pub fn send_backward(&mut self, id: LayerId) -> bool {
        self.move_layer(id, |i| i.saturating_sub(1))
    }

    fn move_layer(&mut self, id: LayerId, target: impl FnOnce(usize) -> usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let to = target(from);
        if to == from {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.rebuild_index();
        self.notifier.notify();
        true
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (layer.id(), i))
            .collect();
    }

    // --- Selection ---

    pub fn selection(&self) -> &HashSet<LayerId> {
        &self.selection
    }

    /// The anchor of the current multi-selection, used for property editing.
    pub fn first_selection(&self) -> Option<LayerId> {
        self.first_selection
    }

    /// The last touched member, pivot of range selection.
    pub fn recent_selection(&self) -> Option<LayerId> {
        self.recent_selection
    }

    pub fn is_selected(&self, id: LayerId) -> bool {
        self.selection.contains(&id)
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Selected ids in z-order.
    pub fn selected_ids(&self) -> Vec<LayerId> {
        self.selected_layers().map(Layer::id).collect()
    }

    /// Selected layers in z-order.
    pub fn selected_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers
            .iter()
            .filter(|layer| self.selection.contains(&layer.id()))
    }

    /// Canvas-space union of the selected layers' bounds.
    pub fn selection_frame(&self) -> Option<Rect> {
        union_bounds(self.selected_layers().filter_map(Layer::bounds))
    }

    /// Select exactly `id`.
    pub fn single_select(&mut self, id: LayerId) {
        if !self.index.contains_key(&id) {
            return;
        }
        let unchanged = self.selection.len() == 1
            && self.selection.contains(&id)
            && self.first_selection == Some(id)
            && self.recent_selection == Some(id);
        if unchanged {
            return;
        }
        self.selection.clear();
        self.selection.insert(id);
        self.first_selection = Some(id);
        self.recent_selection = Some(id);
        self.notifier.notify();
    }

    /// Add `id` to the selection and make it the recent selection.
    pub fn add_selection(&mut self, id: LayerId) {
        if !self.index.contains_key(&id) {
            return;
        }
        let inserted = self.selection.insert(id);
        if self.first_selection.is_none() {
            self.first_selection = Some(id);
        }
        let moved = self.recent_selection != Some(id);
        self.recent_selection = Some(id);
        if inserted || moved {
            self.notifier.notify();
        }
    }

    /// Make a selected `id` both the first and recent selection, keeping
    /// the rest of the selection. Unselected is a no-op.
    pub fn focus_selection(&mut self, id: LayerId) {
        if !self.selection.contains(&id) {
            return;
        }
        if self.first_selection == Some(id) && self.recent_selection == Some(id) {
            return;
        }
        self.first_selection = Some(id);
        self.recent_selection = Some(id);
        self.notifier.notify();
    }

    /// Remove `id` from the selection, reassigning the anchors if needed.
    /// Not selected is a no-op.
    pub fn remove_selection(&mut self, id: LayerId) {
        if self.deselect(id) {
            self.notifier.notify();
        }
    }

    pub fn toggle_selection(&mut self, id: LayerId) {
        if self.is_selected(id) {
            self.remove_selection(id);
        } else {
            self.add_selection(id);
        }
    }

    /// Range-select from the recent selection to `id` in z-order.
    ///
    /// Without a usable recent selection this toggles `id`. The first
    /// selection is left alone.
    pub fn multi_select(&mut self, id: LayerId) {
        let Some(target) = self.index_of(id) else {
            return;
        };
        let Some(pivot) = self.recent_selection.and_then(|recent| self.index_of(recent)) else {
            self.toggle_selection(id);
            return;
        };

        let (start, end) = (pivot.min(target), pivot.max(target));
        for layer in &self.layers[start..=end] {
            self.selection.insert(layer.id());
        }
        if self.first_selection.is_none() {
            self.first_selection = Some(id);
        }
        self.recent_selection = Some(id);
        self.notifier.notify();
    }

    pub fn select_all(&mut self) {
        if self.layers.is_empty() || self.selection.len() == self.layers.len() {
            return;
        }
        self.selection = self.layers.iter().map(Layer::id).collect();
        if self.first_selection.is_none() {
            self.first_selection = self.layers.first().map(Layer::id);
        }
        if self.recent_selection.is_none() {
            self.recent_selection = self.layers.last().map(Layer::id);
        }
        self.notifier.notify();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.first_selection = None;
        self.recent_selection = None;
        log::debug!("Selection cleared");
        self.notifier.notify();
    }

    /// Remove `id` from the selection without notifying. Returns whether it
    /// was selected.
    fn deselect(&mut self, id: LayerId) -> bool {
        if !self.selection.remove(&id) {
            return false;
        }
        if self.selection.is_empty() {
            self.first_selection = None;
            self.recent_selection = None;
            return true;
        }
        if self.recent_selection == Some(id) {
            self.recent_selection = self.pick_member(self.first_selection);
        }
        if self.first_selection == Some(id) {
            self.first_selection = self.pick_member(self.recent_selection);
        }
        true
    }

    /// A selected layer other than `avoid` (bottom-most first), falling back
    /// to `avoid` itself if it is the only member.
    fn pick_member(&self, avoid: Option<LayerId>) -> Option<LayerId> {
        let mut members = self
            .layers
            .iter()
            .map(Layer::id)
            .filter(|id| self.selection.contains(id));
        let first = members.next()?;
        if Some(first) != avoid {
            return Some(first);
        }
        members.next().or(Some(first))
    }

    // --- First-selection bindings ---

    pub fn first_selected(&self) -> Option<&Layer> {
        self.first_selection.and_then(|id| self.layer(id))
    }

    /// Whether the first selection implements `capability`. False when
    /// nothing is selected.
    pub fn first_selection_supports(&self, capability: Capability) -> bool {
        self.first_selected()
            .is_some_and(|layer| layer.supports(capability))
    }

    pub fn first_resizable(&self) -> Option<&dyn Resizable> {
        self.first_selected()?.as_resizable()
    }

    pub fn first_colorable(&self) -> Option<&dyn Colorable> {
        self.first_selected()?.as_colorable()
    }

    pub fn first_typographic(&self) -> Option<&dyn Typographic> {
        self.first_selected()?.as_typographic()
    }

    pub fn first_traceable(&self) -> Option<&dyn Traceable> {
        self.first_selected()?.as_traceable()
    }

    /// Edit the first-selected layer in place. `None` when nothing is
    /// selected.
    pub fn update_first_selection<R>(&mut self, f: impl FnOnce(&mut Layer) -> R) -> Option<R> {
        let id = self.first_selection?;
        self.update_layer(id, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{GroupLayer, LayerColor, ShapeLayer, Transformable};
    use kurbo::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> ShapeLayer {
        ShapeLayer::new("Rectangle", Rect::new(x, y, x + w, y + h))
    }

    fn scene_with(n: usize) -> (Scene, Vec<LayerId>) {
        let mut scene = Scene::new();
        let ids = (0..n)
            .map(|i| scene.add_layer(rect(i as f64 * 20.0, 0.0, 10.0, 10.0)))
            .collect();
        (scene, ids)
    }

    fn counter(scene: &mut Scene) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        scene.subscribe(move || c.set(c.get() + 1));
        count
    }

    #[test]
    fn test_add_and_lookup() {
        let (scene, ids) = scene_with(3);
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.index_of(ids[2]), Some(2));
        assert_eq!(scene.layer(ids[1]).map(Layer::id), Some(ids[1]));
    }

    #[test]
    fn test_duplicate_add_is_ignored() {
        let mut scene = Scene::new();
        let layer = rect(0.0, 0.0, 1.0, 1.0);
        scene.add_layer(layer.clone());
        scene.add_layer(layer);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_remove_keeps_index_in_sync() {
        let (mut scene, ids) = scene_with(4);
        let removed = scene.remove_layers(&[ids[1], ids[3]]);

        assert_eq!(removed.len(), 2);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.index_of(ids[2]), Some(1));
        assert!(scene.layer(ids[1]).is_none());
        for (i, layer) in scene.layers().iter().enumerate() {
            assert_eq!(scene.index_of(layer.id()), Some(i));
        }
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (mut scene, _) = scene_with(2);
        let count = counter(&mut scene);
        assert!(scene.remove_layers(&[uuid::Uuid::new_v4()]).is_empty());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_remove_deselects() {
        let (mut scene, ids) = scene_with(3);
        scene.single_select(ids[0]);
        scene.add_selection(ids[2]);

        scene.remove_layers(&[ids[0]]);

        assert!(!scene.is_selected(ids[0]));
        assert_eq!(scene.first_selection(), Some(ids[2]));
        assert_eq!(scene.recent_selection(), Some(ids[2]));
    }

    #[test]
    fn test_single_select_idempotent() {
        let (mut scene, ids) = scene_with(2);
        let count = counter(&mut scene);

        scene.single_select(ids[1]);
        scene.single_select(ids[1]);

        assert_eq!(scene.selected_ids(), vec![ids[1]]);
        assert_eq!(scene.first_selection(), Some(ids[1]));
        assert_eq!(scene.recent_selection(), Some(ids[1]));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_add_selection_keeps_first() {
        let (mut scene, ids) = scene_with(3);
        scene.add_selection(ids[1]);
        scene.add_selection(ids[2]);

        assert_eq!(scene.first_selection(), Some(ids[1]));
        assert_eq!(scene.recent_selection(), Some(ids[2]));
    }

    #[test]
    fn test_remove_recent_prefers_non_first() {
        let (mut scene, ids) = scene_with(3);
        scene.single_select(ids[0]);
        scene.add_selection(ids[1]);
        scene.add_selection(ids[2]);

        scene.remove_selection(ids[2]);

        assert_eq!(scene.first_selection(), Some(ids[0]));
        assert_eq!(scene.recent_selection(), Some(ids[1]));
    }

    #[test]
    fn test_remove_first_prefers_non_recent() {
        let (mut scene, ids) = scene_with(3);
        scene.single_select(ids[0]);
        scene.add_selection(ids[1]);
        scene.add_selection(ids[2]);

        scene.remove_selection(ids[0]);

        assert_eq!(scene.first_selection(), Some(ids[1]));
        assert_eq!(scene.recent_selection(), Some(ids[2]));
    }

    #[test]
    fn test_remove_last_member_clears_anchors() {
        let (mut scene, ids) = scene_with(1);
        scene.single_select(ids[0]);
        scene.remove_selection(ids[0]);
        assert!(!scene.has_selection());
        assert_eq!(scene.first_selection(), None);
        assert_eq!(scene.recent_selection(), None);
    }

    #[test]
    fn test_remove_unselected_is_silent() {
        let (mut scene, ids) = scene_with(2);
        let count = counter(&mut scene);
        scene.remove_selection(ids[0]);
        assert!(!scene.has_selection());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_focus_selection_moves_anchors() {
        let (mut scene, ids) = scene_with(3);
        scene.single_select(ids[0]);
        scene.add_selection(ids[1]);
        let count = counter(&mut scene);

        scene.focus_selection(ids[1]);
        assert_eq!(scene.selected_ids(), vec![ids[0], ids[1]]);
        assert_eq!(scene.first_selection(), Some(ids[1]));
        assert_eq!(scene.recent_selection(), Some(ids[1]));
        assert_eq!(count.get(), 1);

        scene.focus_selection(ids[1]);
        scene.focus_selection(ids[2]);
        assert_eq!(scene.first_selection(), Some(ids[1]));
        assert!(!scene.is_selected(ids[2]));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_toggle() {
        let (mut scene, ids) = scene_with(2);
        scene.toggle_selection(ids[0]);
        assert!(scene.is_selected(ids[0]));
        scene.toggle_selection(ids[0]);
        assert!(!scene.is_selected(ids[0]));
    }

    #[test]
    fn test_multi_select_range() {
        let (mut scene, ids) = scene_with(5);
        scene.single_select(ids[3]);
        scene.multi_select(ids[1]);

        assert_eq!(scene.selected_ids(), vec![ids[1], ids[2], ids[3]]);
        assert_eq!(scene.first_selection(), Some(ids[3]));
        assert_eq!(scene.recent_selection(), Some(ids[1]));
    }

    #[test]
    fn test_multi_select_without_pivot_toggles() {
        let (mut scene, ids) = scene_with(3);
        scene.multi_select(ids[1]);
        assert_eq!(scene.selected_ids(), vec![ids[1]]);
        assert_eq!(scene.first_selection(), Some(ids[1]));
    }

    #[test]
    fn test_select_all_and_clear() {
        let (mut scene, ids) = scene_with(3);
        scene.select_all();
        assert_eq!(scene.selected_ids(), ids);
        assert_eq!(scene.first_selection(), Some(ids[0]));

        scene.clear_selection();
        assert!(!scene.has_selection());
        assert_eq!(scene.recent_selection(), None);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let (mut scene, _) = scene_with(2);
        let stranger = uuid::Uuid::new_v4();
        scene.single_select(stranger);
        scene.add_selection(stranger);
        scene.multi_select(stranger);
        assert!(!scene.has_selection());
    }

    #[test]
    fn test_intersect_topmost_wins() {
        let mut scene = Scene::new();
        let bottom = scene.add_layer(rect(0.0, 0.0, 100.0, 100.0));
        let top = scene.add_layer(rect(50.0, 50.0, 100.0, 100.0));

        assert_eq!(scene.intersect(Point::new(75.0, 75.0)).map(Layer::id), Some(top));
        assert_eq!(scene.intersect(Point::new(10.0, 10.0)).map(Layer::id), Some(bottom));
        assert!(scene.intersect(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_intersect_skips_groups() {
        let mut scene = Scene::new();
        scene.add_layer(GroupLayer::new("Group", vec![rect(0.0, 0.0, 10.0, 10.0).into()]));
        assert!(scene.intersect(Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_selection_frame() {
        let (mut scene, ids) = scene_with(3);
        assert_eq!(scene.selection_frame(), None);
        scene.single_select(ids[0]);
        scene.add_selection(ids[2]);
        assert_eq!(scene.selection_frame(), Some(Rect::new(0.0, 0.0, 50.0, 10.0)));
    }

    #[test]
    fn test_z_order_operations() {
        let (mut scene, ids) = scene_with(3);

        assert!(scene.bring_to_front(ids[0]));
        assert_eq!(scene.index_of(ids[0]), Some(2));
        assert!(!scene.bring_to_front(ids[0]));

        assert!(scene.send_to_back(ids[0]));
        assert_eq!(scene.index_of(ids[0]), Some(0));

        assert!(scene.bring_forward(ids[0]));
        assert_eq!(scene.index_of(ids[0]), Some(1));
        assert!(scene.send_backward(ids[0]));
        assert!(!scene.send_backward(ids[0]));

        for (i, layer) in scene.layers().iter().enumerate() {
            assert_eq!(scene.index_of(layer.id()), Some(i));
        }
    }

    #[test]
    fn test_update_layer_notifies_layer_then_scene() {
        let (mut scene, ids) = scene_with(2);
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));

        let o = order.clone();
        scene.subscribe_layer(ids[0], move || o.borrow_mut().push("layer"));
        let o = order.clone();
        scene.subscribe(move || o.borrow_mut().push("scene"));

        scene.update_layer(ids[0], |layer| layer.translate(Vec2::new(1.0, 0.0)));
        assert_eq!(*order.borrow(), vec!["layer", "scene"]);

        order.borrow_mut().clear();
        scene.update_layer(ids[1], |layer| layer.translate(Vec2::new(1.0, 0.0)));
        assert_eq!(*order.borrow(), vec!["scene"]);
    }

    #[test]
    fn test_layer_subscription_ends_on_remove() {
        let (mut scene, ids) = scene_with(1);
        assert!(scene.subscribe_layer(ids[0], || {}).is_some());
        scene.remove_layers(&ids);
        assert!(scene.subscribe_layer(ids[0], || {}).is_none());
        assert!(scene.update_layer(ids[0], |_| ()).is_none());
    }

    #[test]
    fn test_first_selection_bindings() {
        let mut scene = Scene::new();
        let group = scene.add_layer(GroupLayer::new("Group", Vec::new()));
        let shape = scene.add_layer(rect(0.0, 0.0, 10.0, 10.0));

        assert!(!scene.first_selection_supports(Capability::Colorable));
        assert!(scene.first_colorable().is_none());

        scene.single_select(group);
        assert!(!scene.first_selection_supports(Capability::Colorable));
        assert!(scene.first_colorable().is_none());
        assert!(scene.first_typographic().is_none());

        scene.single_select(shape);
        assert!(scene.first_selection_supports(Capability::Traceable));
        scene.update_first_selection(|layer| {
            if let Some(colorable) = layer.as_colorable_mut() {
                colorable.paint_mut().fill = LayerColor::new(255, 0, 0, 255);
            }
        });
        assert_eq!(
            scene.first_colorable().map(|c| c.paint().fill),
            Some(LayerColor::new(255, 0, 0, 255))
        );
    }
}
