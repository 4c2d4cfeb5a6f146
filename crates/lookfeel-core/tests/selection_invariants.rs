//! Selection invariants under long pseudo-random operation sequences.

use kurbo::Rect;
use lookfeel_core::{Layer, LayerId, Scene, ShapeLayer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn check_invariants(scene: &Scene) {
    let ids: HashSet<LayerId> = scene.layers().iter().map(Layer::id).collect();

    assert!(scene.selection().is_subset(&ids), "selection has stale ids");
    for anchor in [scene.first_selection(), scene.recent_selection()]
        .into_iter()
        .flatten()
    {
        assert!(scene.is_selected(anchor), "anchor {} not selected", anchor);
    }
    if scene.has_selection() {
        assert!(scene.first_selection().is_some());
        assert!(scene.recent_selection().is_some());
    } else {
        assert!(scene.first_selection().is_none());
        assert!(scene.recent_selection().is_none());
    }
    for (i, layer) in scene.layers().iter().enumerate() {
        assert_eq!(scene.index_of(layer.id()), Some(i), "index out of sync");
    }
}

fn pick(rng: &mut StdRng, scene: &Scene, graveyard: &[LayerId]) -> LayerId {
    // Mostly live ids, sometimes removed ones.
    if !graveyard.is_empty() && (scene.is_empty() || rng.random_range(0..5) == 0) {
        return graveyard[rng.random_range(0..graveyard.len())];
    }
    if scene.is_empty() {
        return uuid::Uuid::new_v4();
    }
    scene.layers()[rng.random_range(0..scene.len())].id()
}

#[test]
fn test_invariants_hold_for_random_sequences() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scene = Scene::new();
        let mut graveyard = Vec::new();

        for _ in 0..400 {
            match rng.random_range(0..13) {
                0 | 1 => {
                    let x = rng.random_range(0..500) as f64;
                    scene.add_layer(ShapeLayer::new("Layer", Rect::new(x, 0.0, x + 20.0, 20.0)));
                }
                2 => {
                    let id = pick(&mut rng, &scene, &graveyard);
                    scene.remove_layers(&[id]);
                    graveyard.push(id);
                }
                3 => scene.single_select(pick(&mut rng, &scene, &graveyard)),
                4 => scene.add_selection(pick(&mut rng, &scene, &graveyard)),
                5 => scene.remove_selection(pick(&mut rng, &scene, &graveyard)),
                6 => scene.toggle_selection(pick(&mut rng, &scene, &graveyard)),
                7 => scene.multi_select(pick(&mut rng, &scene, &graveyard)),
                8 => {
                    if rng.random_range(0..4) == 0 {
                        scene.clear_selection();
                    } else {
                        scene.select_all();
                    }
                }
                9 => {
                    let id = pick(&mut rng, &scene, &graveyard);
                    match rng.random_range(0..4) {
                        0 => scene.bring_to_front(id),
                        1 => scene.send_to_back(id),
                        2 => scene.bring_forward(id),
                        _ => scene.send_backward(id),
                    };
                }
                10 => {
                    let ids = scene.selected_ids();
                    scene.remove_layers(&ids);
                    graveyard.extend(ids);
                }
                11 => scene.focus_selection(pick(&mut rng, &scene, &graveyard)),
                _ => {
                    let id = pick(&mut rng, &scene, &graveyard);
                    scene.update_layer(id, |_| ());
                }
            }
            check_invariants(&scene);
        }
    }
}

#[test]
fn test_multi_select_keeps_first_anchor() {
    let mut scene = Scene::new();
    let ids: Vec<LayerId> = (0..3)
        .map(|i| {
            let x = i as f64 * 30.0;
            scene.add_layer(ShapeLayer::new("Layer", Rect::new(x, 0.0, x + 20.0, 20.0)))
        })
        .collect();

    scene.single_select(ids[0]);
    scene.multi_select(ids[2]);

    assert_eq!(scene.selected_ids(), ids);
    assert_eq!(scene.first_selection(), Some(ids[0]));
    assert_eq!(scene.recent_selection(), Some(ids[2]));
}

#[test]
fn test_removing_anchor_layers_reassigns() {
    let mut scene = Scene::new();
    let ids: Vec<LayerId> = (0..4)
        .map(|i| {
            let x = i as f64 * 30.0;
            scene.add_layer(ShapeLayer::new("Layer", Rect::new(x, 0.0, x + 20.0, 20.0)))
        })
        .collect();
    scene.select_all();
    scene.multi_select(ids[3]);
    assert_eq!(scene.first_selection(), Some(ids[0]));
    assert_eq!(scene.recent_selection(), Some(ids[3]));

    scene.remove_layers(&[ids[0], ids[3]]);

    assert_eq!(scene.selected_ids(), vec![ids[1], ids[2]]);
    check_invariants(&scene);
    assert_ne!(scene.first_selection(), scene.recent_selection());
}
