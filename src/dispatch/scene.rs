//! Visual element model owned by the dispatch gate.
//!
//! The scene holds one canvas per peg. Each canvas is an ordered list of
//! disc elements, bottom to top. A renderer draws from it, and pegs mutate it
//! only through [`DispatchGate::invoke`](super::DispatchGate::invoke).

use crate::core::{Disc, PegId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Color state of a drawn disc.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DiscColor {
    /// Disc at rest on a peg.
    Resting,
    /// Disc being lifted off or dropped onto a peg.
    InMotion,
}

/// Handle of a drawn disc, unique within the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a fresh id. Ids can be handed out before the element exists,
    /// so a peg can name an element in work it has not yet submitted.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A disc as drawn on a canvas.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DiscElement {
    pub id: ElementId,
    pub disc: Disc,
    /// Vertical slot; 1 is the bottom resting position.
    pub offset: u32,
    pub color: DiscColor,
}

#[derive(Debug, Default)]
pub struct Scene {
    canvases: [Vec<DiscElement>; 3],
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a disc on top of the peg's canvas.
    pub fn add_disc(
        &mut self,
        peg: PegId,
        disc: Disc,
        offset: u32,
        color: DiscColor,
    ) -> ElementId {
        let id = ElementId::next();
        self.place(
            peg,
            DiscElement {
                id,
                disc,
                offset,
                color,
            },
        );
        id
    }

    /// Add an element whose id was allocated by the caller.
    pub fn place(&mut self, peg: PegId, element: DiscElement) {
        self.canvases[peg.index()].push(element);
    }

    /// The most recently added element of the peg's canvas.
    pub fn top_element(&self, peg: PegId) -> Option<ElementId> {
        self.canvases[peg.index()].last().map(|e| e.id)
    }

    pub fn remove(&mut self, peg: PegId, id: ElementId) -> bool {
        let canvas = &mut self.canvases[peg.index()];
        let before = canvas.len();
        canvas.retain(|e| e.id != id);
        canvas.len() != before
    }

    pub fn set_color(&mut self, peg: PegId, id: ElementId, color: DiscColor) -> bool {
        self.element_mut(peg, id).map(|e| e.color = color).is_some()
    }

    pub fn set_offset(&mut self, peg: PegId, id: ElementId, offset: u32) -> bool {
        self.element_mut(peg, id).map(|e| e.offset = offset).is_some()
    }

    pub fn clear(&mut self, peg: PegId) {
        self.canvases[peg.index()].clear();
    }

    pub fn elements(&self, peg: PegId) -> &[DiscElement] {
        &self.canvases[peg.index()]
    }

    pub fn element(&self, peg: PegId, id: ElementId) -> Option<&DiscElement> {
        self.canvases[peg.index()].iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, peg: PegId, id: ElementId) -> Option<&mut DiscElement> {
        self.canvases[peg.index()].iter_mut().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(size: u8) -> Disc {
        Disc::new(size).unwrap()
    }

    #[test]
    fn elements_stack_per_peg() {
        let mut scene = Scene::new();
        let a = scene.add_disc(PegId::Left, disc(2), 1, DiscColor::Resting);
        let b = scene.add_disc(PegId::Left, disc(1), 2, DiscColor::Resting);
        let c = scene.add_disc(PegId::Right, disc(3), 1, DiscColor::InMotion);

        assert_ne!(a, b);
        assert_eq!(scene.top_element(PegId::Left), Some(b));
        assert_eq!(scene.top_element(PegId::Right), Some(c));
        assert_eq!(scene.top_element(PegId::Middle), None);
        assert_eq!(scene.elements(PegId::Left).len(), 2);
    }

    #[test]
    fn mutations_address_a_single_element() {
        let mut scene = Scene::new();
        let id = scene.add_disc(PegId::Middle, disc(4), 12, DiscColor::InMotion);

        assert!(scene.set_offset(PegId::Middle, id, 3));
        assert!(scene.set_color(PegId::Middle, id, DiscColor::Resting));
        let element = scene.element(PegId::Middle, id).unwrap();
        assert_eq!(element.offset, 3);
        assert_eq!(element.color, DiscColor::Resting);

        // wrong canvas
        assert!(!scene.set_offset(PegId::Left, id, 5));
    }

    #[test]
    fn placed_elements_keep_their_ids() {
        let mut scene = Scene::new();
        let id = ElementId::next();
        scene.place(
            PegId::Right,
            DiscElement {
                id,
                disc: disc(3),
                offset: 1,
                color: DiscColor::Resting,
            },
        );
        let other = scene.add_disc(PegId::Right, disc(2), 2, DiscColor::Resting);

        assert_ne!(id, other);
        assert_eq!(scene.element(PegId::Right, id).map(|e| e.disc), Some(disc(3)));
    }

    #[test]
    fn remove_and_clear_drop_elements() {
        let mut scene = Scene::new();
        let id = scene.add_disc(PegId::Left, disc(1), 1, DiscColor::Resting);
        scene.add_disc(PegId::Left, disc(2), 2, DiscColor::Resting);

        assert!(scene.remove(PegId::Left, id));
        assert!(!scene.remove(PegId::Left, id));
        assert_eq!(scene.elements(PegId::Left).len(), 1);

        scene.clear(PegId::Left);
        assert!(scene.elements(PegId::Left).is_empty());
    }
}
