//! Nested registration scopes.
//!
//! Layouts are created when a layout scope mounts and destroyed when it unmounts. Each owns a
//! registry of its own and points at its parent through a [`LayoutId`] handle. The parent does
//! not know its children, and destroying a parent leaves children with a dangling handle that
//! simply stops the ancestor walk.
//!
//! [`LayoutId`]: struct.LayoutId.html

use std::rc::Rc;

use crate::path::concat_paths;
use crate::registry::RouteRegistry;
use crate::route::Route;

/// Handle to a layout stored in a router.
///
/// Handles carry a generation, so a handle to a destroyed layout never resolves to a newer
/// layout reusing its slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayoutId {
    index: usize,
    generation: u32,
}

impl LayoutId {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        LayoutId { index, generation }
    }
}

/// A registration scope nested under an optional parent.
pub struct Layout<P> {
    parent: Option<LayoutId>,
    path: String,
    joined_path: String,
    payload: Option<P>,
    registry: RouteRegistry<P>,
    not_found_route: Option<Rc<Route<P>>>,
}

impl<P> Layout<P> {
    pub fn parent(&self) -> Option<LayoutId> {
        self.parent
    }

    /// The prefix this layout was mounted with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All ancestor prefixes joined with this one, always starting with `/`.
    pub fn joined_path(&self) -> &str {
        &self.joined_path
    }

    /// Rendering payload for the layout shell.
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub fn registry(&self) -> &RouteRegistry<P> {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut RouteRegistry<P> {
        &mut self.registry
    }

    /// The not-found route registered most recently in this layout, if it is still registered.
    pub fn not_found_route(&self) -> Option<&Rc<Route<P>>> {
        self.not_found_route.as_ref()
    }

    pub(crate) fn set_not_found_route(&mut self, route: Option<Rc<Route<P>>>) {
        self.not_found_route = route;
    }
}

struct Slot<P> {
    generation: u32,
    layout: Option<Layout<P>>,
}

/// Arena of live layouts.
pub struct Layouts<P> {
    slots: Vec<Slot<P>>,
    free: Vec<usize>,
}

impl<P> Default for Layouts<P> {
    fn default() -> Self {
        Layouts {
            slots: vec![],
            free: vec![],
        }
    }
}

impl<P> Layouts<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout under `parent`. Returns `None` if the parent is not live.
    pub(crate) fn insert(&mut self, parent: Option<LayoutId>, path: &str, payload: Option<P>) -> Option<LayoutId> {
        let parent_path = match parent {
            Some(id) => self.get(id)?.joined_path.clone(),
            None => String::new(),
        };

        let layout = Layout {
            parent,
            path: path.to_string(),
            joined_path: format!("/{}", concat_paths(&parent_path, &[path])),
            payload,
            registry: RouteRegistry::new(),
            not_found_route: None,
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.layout = Some(layout);
                LayoutId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    layout: Some(layout),
                });
                LayoutId::new(self.slots.len() - 1, 0)
            }
        };

        Some(id)
    }

    /// Remove a layout, invalidating every handle to it.
    pub(crate) fn remove(&mut self, id: LayoutId) -> Option<Layout<P>> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }

        let layout = slot.layout.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(layout)
    }

    pub fn get(&self, id: LayoutId) -> Option<&Layout<P>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.layout.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: LayoutId) -> Option<&mut Layout<P>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.layout.as_mut())
    }

    pub fn contains(&self, id: LayoutId) -> bool {
        self.get(id).is_some()
    }

    /// Live layouts with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (LayoutId, &Layout<P>)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.layout
                .as_ref()
                .map(|layout| (LayoutId::new(index, slot.generation), layout))
        })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Layout<P>> {
        self.slots.iter_mut().filter_map(|slot| slot.layout.as_mut())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The live chain of layouts ending at `id`, outermost first.
    ///
    /// The walk stops at the first ancestor that has been destroyed.
    pub fn chain(&self, id: LayoutId) -> Vec<LayoutId> {
        let mut chain = vec![];
        let mut next = Some(id);
        while let Some(id) = next {
            match self.get(id) {
                Some(layout) => {
                    chain.push(id);
                    next = layout.parent;
                }
                None => break,
            }
        }
        chain.reverse();
        chain
    }
}
