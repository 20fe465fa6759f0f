//! Element tags and tag sets.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The closed set of elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Ice,
    Thunder,
    Wood,
}

impl Element {
    /// Every element, in declaration order.
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Water,
        Element::Ice,
        Element::Thunder,
        Element::Wood,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Ice => "ice",
            Element::Thunder => "thunder",
            Element::Wood => "wood",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Insertion-ordered set of element tags.
///
/// Used both for the tags carried by a combatant and for residue left on a
/// tile. Oldest tags come first, which is what cap eviction removes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementSet(SmallVec<[Element; 5]>);

impl ElementSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `element`, keeping at most `cap` tags.
    ///
    /// Re-adding an element already present refreshes nothing and evicts
    /// nothing. When the set is full the oldest tag is evicted and returned.
    pub fn insert(&mut self, element: Element, cap: usize) -> Option<Element> {
        if self.contains(element) || cap == 0 {
            return None;
        }
        let evicted = if self.0.len() >= cap {
            Some(self.0.remove(0))
        } else {
            None
        };
        self.0.push(element);
        evicted
    }

    /// Remove `element`. Returns true if it was present.
    pub fn remove(&mut self, element: Element) -> bool {
        match self.0.iter().position(|&e| e == element) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, element: Element) -> bool {
        self.0.contains(&element)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Element> for ElementSet {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut set = ElementSet::new();
        for element in iter {
            set.insert(element, Element::ALL.len());
        }
        set
    }
}
