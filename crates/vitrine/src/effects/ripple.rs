//! Button click ripples.

use vitrine_core::{ElementId, Rect, Scene};

/// Class carried by ripple elements.
pub const RIPPLE_CLASS: &str = "btn-ripple";

/// Spawn a ripple inside `button` at the click position (viewport
/// coordinates).
///
/// Any previous ripple child is destroyed first, so a button carries at most
/// one ripple. The ripple is sized to the button's larger dimension and
/// centered on the click. Returns `None` when the button is gone or has no
/// layout rect.
pub fn spawn_ripple(scene: &mut Scene, button: ElementId, click_x: f32, click_y: f32) -> Option<ElementId> {
    let rect = scene.rect(button).ok().flatten()?;

    let previous: Vec<ElementId> = scene
        .children(button)
        .ok()?
        .iter()
        .copied()
        .filter(|&child| scene.has_class(child, RIPPLE_CLASS))
        .collect();
    for child in previous {
        let _ = scene.destroy(child);
    }

    let size = rect.width.max(rect.height);
    let ripple = scene.create_child(button, "span").ok()?;
    scene.add_class(ripple, RIPPLE_CLASS);
    scene.set_rect(
        ripple,
        Rect::new(click_x - size / 2.0, click_y - size / 2.0, size, size),
    );
    Some(ripple)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(scene: &mut Scene) -> ElementId {
        let button = scene.create_element("button");
        scene.set_rect(button, Rect::new(100.0, 200.0, 120.0, 40.0));
        button
    }

    #[test]
    fn test_ripple_sized_and_centered() {
        let mut scene = Scene::new();
        let button = button(&mut scene);

        let ripple = spawn_ripple(&mut scene, button, 150.0, 220.0).unwrap();
        assert!(scene.has_class(ripple, RIPPLE_CLASS));

        let rect = scene.rect(ripple).unwrap().unwrap();
        assert_eq!(rect.width, 120.0);
        assert_eq!(rect.height, 120.0);
        assert_eq!(rect.x, 150.0 - 60.0);
        assert_eq!(rect.y, 220.0 - 60.0);
    }

    #[test]
    fn test_previous_ripple_replaced() {
        let mut scene = Scene::new();
        let button = button(&mut scene);
        let label = scene.create_child(button, "span").unwrap();

        let first = spawn_ripple(&mut scene, button, 110.0, 210.0).unwrap();
        let second = spawn_ripple(&mut scene, button, 190.0, 230.0).unwrap();

        assert!(!scene.contains(first));
        assert!(scene.contains(second));
        // Non-ripple children are untouched.
        assert!(scene.contains(label));
        assert_eq!(scene.children(button).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_button_or_rect() {
        let mut scene = Scene::new();
        let bare = scene.create_element("button"); // no rect
        assert!(spawn_ripple(&mut scene, bare, 0.0, 0.0).is_none());

        let button = button(&mut scene);
        scene.destroy(button).unwrap();
        assert!(spawn_ripple(&mut scene, button, 0.0, 0.0).is_none());
    }
}
