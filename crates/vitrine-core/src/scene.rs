//! Scene model for Vitrine.
//!
//! The scene is a slotmap-backed registry of UI elements standing in for the
//! page the interactivity layer manipulates. Elements form a tree with
//! document-ordered children and carry the handful of facets the behavior
//! components consume: string attributes, classes, text content, visual style
//! (opacity and transform), and a layout rectangle used for visibility math.
//!
//! # Key Types
//!
//! - [`ElementId`] - Opaque handle to an element
//! - [`Scene`] - The element registry itself
//! - [`Rect`] - Axis-aligned rectangle with intersection helpers
//! - [`Transform`] - Translate/scale/rotate presentation state
//!
//! # Example
//!
//! ```
//! use vitrine_core::Scene;
//!
//! let mut scene = Scene::new();
//! let section = scene.create_element("section");
//! let heading = scene.create_element("h2");
//! scene.set_parent(heading, Some(section)).unwrap();
//! scene.set_attribute(heading, "data-reveal", "fade-up");
//!
//! assert_eq!(scene.children(section).unwrap(), &[heading]);
//! ```

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::error::{SceneError, SceneResult};

new_key_type! {
    /// A unique identifier for a scene element.
    ///
    /// IDs are stable for the lifetime of the element and are never reused
    /// while the element is alive. After [`Scene::destroy`] the ID becomes
    /// invalid and lookups return [`SceneError::ElementNotFound`].
    pub struct ElementId;
}

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// The area of this rectangle. Degenerate rectangles have zero area.
    pub fn area(&self) -> f32 {
        (self.width.max(0.0)) * (self.height.max(0.0))
    }

    /// The fraction of this rectangle's area that lies inside `other`.
    ///
    /// Returns a value in `0.0..=1.0`. A zero-area rectangle intersects
    /// nothing (ratio 0.0), mirroring how a collapsed element is never
    /// considered visible.
    pub fn intersection_ratio(&self, other: &Rect) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }

        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);

        if right <= left || bottom <= top {
            return 0.0;
        }

        ((right - left) * (bottom - top) / area).clamp(0.0, 1.0)
    }
}

/// Presentation transform applied to an element.
///
/// Mirrors the subset of CSS transforms the interactivity layer mutates:
/// translation in pixels, uniform scale, and rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Horizontal translation in pixels.
    pub translate_x: f32,
    /// Vertical translation in pixels.
    pub translate_y: f32,
    /// Uniform scale factor.
    pub scale: f32,
    /// Rotation in degrees.
    pub rotation: f32,
}

impl Transform {
    /// The identity transform (no translation, scale 1.0, no rotation).
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotation: 0.0,
    };

    /// Check whether this transform is the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Visual style state the behavior components mutate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Opacity from 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
    /// The element's transform.
    pub transform: Transform,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            transform: Transform::IDENTITY,
        }
    }
}

/// Internal per-element data.
#[derive(Debug, Default)]
struct ElementData {
    /// Tag name ("div", "section", ...). Informational only.
    tag: String,
    /// Parent element, if any.
    parent: Option<ElementId>,
    /// Children in document order.
    children: Vec<ElementId>,
    /// String attributes (the `data-*` configuration contract lives here).
    attributes: HashMap<String, String>,
    /// CSS-style classes, insertion ordered, no duplicates.
    classes: Vec<String>,
    /// Text content.
    text: String,
    /// Visual style.
    style: Style,
    /// Layout rectangle in viewport coordinates, if known.
    rect: Option<Rect>,
}

/// Registry of all elements in a page.
///
/// Single-threaded by design: the whole interactivity layer runs on one
/// thread (see the concurrency model in the crate docs), so the scene hands
/// out plain mutable references rather than locking.
#[derive(Debug, Default)]
pub struct Scene {
    elements: SlotMap<ElementId, ElementData>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
        }
    }

    /// Create a new root element with the given tag name.
    pub fn create_element(&mut self, tag: impl Into<String>) -> ElementId {
        let id = self.elements.insert(ElementData {
            tag: tag.into(),
            ..ElementData::default()
        });
        tracing::trace!(target: "vitrine_core::scene", ?id, "element created");
        id
    }

    /// Check whether an element exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Get the number of live elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Destroy an element and all of its descendants.
    pub fn destroy(&mut self, id: ElementId) -> SceneResult<()> {
        if !self.elements.contains_key(id) {
            return Err(SceneError::ElementNotFound);
        }

        // Detach from the parent's child list first.
        if let Some(parent) = self.elements[id].parent
            && let Some(parent_data) = self.elements.get_mut(parent)
        {
            parent_data.children.retain(|&c| c != id);
        }

        // Collect the subtree, then remove bottom-up.
        let subtree = self.collect_subtree(id);
        for element in subtree.into_iter().rev() {
            self.elements.remove(element);
        }

        tracing::trace!(target: "vitrine_core::scene", ?id, "element destroyed");
        Ok(())
    }

    /// Set or clear an element's parent.
    ///
    /// The element is appended at the end of the new parent's child list.
    /// Fails with [`SceneError::WouldCreateCycle`] if `new_parent` is the
    /// element itself or one of its descendants.
    pub fn set_parent(&mut self, id: ElementId, new_parent: Option<ElementId>) -> SceneResult<()> {
        if !self.elements.contains_key(id) {
            return Err(SceneError::ElementNotFound);
        }

        if let Some(parent) = new_parent {
            if !self.elements.contains_key(parent) {
                return Err(SceneError::ElementNotFound);
            }
            if parent == id || self.is_descendant_of(parent, id) {
                return Err(SceneError::WouldCreateCycle);
            }
        }

        // Detach from the current parent.
        if let Some(old_parent) = self.elements[id].parent
            && let Some(old_data) = self.elements.get_mut(old_parent)
        {
            old_data.children.retain(|&c| c != id);
        }

        self.elements[id].parent = new_parent;
        if let Some(parent) = new_parent {
            self.elements[parent].children.push(id);
        }

        Ok(())
    }

    /// Convenience for creating an element directly under a parent.
    pub fn create_child(&mut self, parent: ElementId, tag: impl Into<String>) -> SceneResult<ElementId> {
        if !self.elements.contains_key(parent) {
            return Err(SceneError::ElementNotFound);
        }
        let id = self.create_element(tag);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Get an element's parent.
    pub fn parent(&self, id: ElementId) -> SceneResult<Option<ElementId>> {
        self.data(id).map(|d| d.parent)
    }

    /// Get an element's children in document order.
    pub fn children(&self, id: ElementId) -> SceneResult<&[ElementId]> {
        self.data(id).map(|d| d.children.as_slice())
    }

    /// Get an element's tag name.
    pub fn tag(&self, id: ElementId) -> SceneResult<&str> {
        self.data(id).map(|d| d.tag.as_str())
    }

    /// Get an attribute value.
    ///
    /// Returns `Ok(None)` when the attribute is absent.
    pub fn attribute(&self, id: ElementId, name: &str) -> SceneResult<Option<&str>> {
        self.data(id).map(|d| d.attributes.get(name).map(String::as_str))
    }

    /// Check whether an attribute is present, regardless of value.
    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|d| d.attributes.contains_key(name))
    }

    /// Set an attribute value.
    pub fn set_attribute(
        &mut self,
        id: ElementId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        if let Some(data) = self.elements.get_mut(id) {
            data.attributes.insert(name.into(), value.into());
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(data) = self.elements.get_mut(id) {
            data.attributes.remove(name);
        }
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(data) = self.elements.get_mut(id)
            && !data.classes.iter().any(|c| c == class)
        {
            data.classes.push(class.to_string());
        }
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(data) = self.elements.get_mut(id) {
            data.classes.retain(|c| c != class);
        }
    }

    /// Check whether an element carries a class.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|d| d.classes.iter().any(|c| c == class))
    }

    /// Get an element's text content.
    pub fn text(&self, id: ElementId) -> SceneResult<&str> {
        self.data(id).map(|d| d.text.as_str())
    }

    /// Set an element's text content.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(data) = self.elements.get_mut(id) {
            data.text = text.into();
        }
    }

    /// Get an element's visual style.
    pub fn style(&self, id: ElementId) -> SceneResult<Style> {
        self.data(id).map(|d| d.style)
    }

    /// Set an element's opacity.
    pub fn set_opacity(&mut self, id: ElementId, opacity: f32) {
        if let Some(data) = self.elements.get_mut(id) {
            data.style.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Set an element's transform.
    pub fn set_transform(&mut self, id: ElementId, transform: Transform) {
        if let Some(data) = self.elements.get_mut(id) {
            data.style.transform = transform;
        }
    }

    /// Get an element's layout rectangle, if one has been assigned.
    pub fn rect(&self, id: ElementId) -> SceneResult<Option<Rect>> {
        self.data(id).map(|d| d.rect)
    }

    /// Assign an element's layout rectangle (viewport coordinates).
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(data) = self.elements.get_mut(id) {
            data.rect = Some(rect);
        }
    }

    /// All root elements (elements without a parent).
    pub fn roots(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .filter(|(_, d)| d.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Depth-first preorder traversal of a subtree (document order).
    pub fn depth_first_preorder(&self, id: ElementId) -> SceneResult<Vec<ElementId>> {
        if !self.elements.contains_key(id) {
            return Err(SceneError::ElementNotFound);
        }
        Ok(self.collect_subtree(id))
    }

    /// All elements in document order, across every root.
    pub fn document_order(&self) -> Vec<ElementId> {
        let mut roots: Vec<ElementId> = self.roots().collect();
        // SlotMap iteration order is unspecified; sort roots for stability.
        roots.sort_unstable();
        roots
            .into_iter()
            .flat_map(|root| self.collect_subtree(root))
            .collect()
    }

    fn data(&self, id: ElementId) -> SceneResult<&ElementData> {
        self.elements.get(id).ok_or(SceneError::ElementNotFound)
    }

    fn is_descendant_of(&self, candidate: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.elements.get(candidate).and_then(|d| d.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(id).and_then(|d| d.parent);
        }
        false
    }

    fn collect_subtree(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            if let Some(data) = self.elements.get(current) {
                // Push in reverse so children pop in document order.
                for &child in data.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_count() {
        let mut scene = Scene::new();
        assert_eq!(scene.element_count(), 0);
        let a = scene.create_element("div");
        let b = scene.create_element("span");
        assert_eq!(scene.element_count(), 2);
        assert!(scene.contains(a));
        assert_eq!(scene.tag(b).unwrap(), "span");
    }

    #[test]
    fn test_parent_child_document_order() {
        let mut scene = Scene::new();
        let parent = scene.create_element("ul");
        let c1 = scene.create_child(parent, "li").unwrap();
        let c2 = scene.create_child(parent, "li").unwrap();
        let c3 = scene.create_child(parent, "li").unwrap();

        assert_eq!(scene.children(parent).unwrap(), &[c1, c2, c3]);
        assert_eq!(scene.parent(c2).unwrap(), Some(parent));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut scene = Scene::new();
        let a = scene.create_element("div");
        let b = scene.create_child(a, "div").unwrap();

        assert_eq!(scene.set_parent(a, Some(b)), Err(SceneError::WouldCreateCycle));
        assert_eq!(scene.set_parent(a, Some(a)), Err(SceneError::WouldCreateCycle));
    }

    #[test]
    fn test_destroy_subtree() {
        let mut scene = Scene::new();
        let root = scene.create_element("section");
        let child = scene.create_child(root, "div").unwrap();
        let grandchild = scene.create_child(child, "span").unwrap();

        scene.destroy(child).unwrap();
        assert!(scene.contains(root));
        assert!(!scene.contains(child));
        assert!(!scene.contains(grandchild));
        assert!(scene.children(root).unwrap().is_empty());

        assert_eq!(scene.destroy(child), Err(SceneError::ElementNotFound));
    }

    #[test]
    fn test_attributes_and_classes() {
        let mut scene = Scene::new();
        let el = scene.create_element("div");

        scene.set_attribute(el, "data-stagger", "150");
        assert_eq!(scene.attribute(el, "data-stagger").unwrap(), Some("150"));
        assert!(scene.has_attribute(el, "data-stagger"));
        scene.remove_attribute(el, "data-stagger");
        assert!(!scene.has_attribute(el, "data-stagger"));

        scene.add_class(el, "stat-number");
        scene.add_class(el, "stat-number");
        assert!(scene.has_class(el, "stat-number"));
        scene.remove_class(el, "stat-number");
        assert!(!scene.has_class(el, "stat-number"));
    }

    #[test]
    fn test_style_mutation() {
        let mut scene = Scene::new();
        let el = scene.create_element("div");
        assert_eq!(scene.style(el).unwrap().opacity, 1.0);

        scene.set_opacity(el, 0.25);
        scene.set_transform(
            el,
            Transform {
                translate_y: 30.0,
                ..Transform::IDENTITY
            },
        );
        let style = scene.style(el).unwrap();
        assert_eq!(style.opacity, 0.25);
        assert_eq!(style.transform.translate_y, 30.0);

        // Opacity is clamped.
        scene.set_opacity(el, 3.0);
        assert_eq!(scene.style(el).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_preorder_traversal() {
        let mut scene = Scene::new();
        let root = scene.create_element("main");
        let a = scene.create_child(root, "section").unwrap();
        let a1 = scene.create_child(a, "div").unwrap();
        let b = scene.create_child(root, "section").unwrap();

        assert_eq!(scene.depth_first_preorder(root).unwrap(), vec![root, a, a1, b]);
    }

    #[test]
    fn test_intersection_ratio() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);

        // Fully inside.
        assert_eq!(Rect::new(10.0, 10.0, 20.0, 20.0).intersection_ratio(&viewport), 1.0);
        // Half visible (sticking out the bottom).
        let half = Rect::new(0.0, 90.0, 10.0, 20.0).intersection_ratio(&viewport);
        assert!((half - 0.5).abs() < f32::EPSILON);
        // Fully outside.
        assert_eq!(Rect::new(0.0, 200.0, 10.0, 10.0).intersection_ratio(&viewport), 0.0);
        // Degenerate.
        assert_eq!(Rect::new(0.0, 0.0, 0.0, 10.0).intersection_ratio(&viewport), 0.0);
    }
}
