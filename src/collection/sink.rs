//! Result sink: writes completions into the slot of their original item

use crate::collection::{Collection, Keyed, Shape};

/// Result container for one batch, shaped like its input.
#[derive(Debug)]
pub struct ResultSink<V> {
    shape: Shape,
    slots: Vec<Option<V>>,
}

impl<V> ResultSink<V> {
    pub fn new(shape: Shape) -> Self {
        let slots = std::iter::repeat_with(|| None).take(shape.len()).collect();
        Self { shape, slots }
    }

    /// Store `value` for the item at `slot`; arrival order does not matter
    pub fn insert(&mut self, slot: usize, value: V) {
        if let Some(cell) = self.slots.get_mut(slot) {
            *cell = Some(value);
        }
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|cell| cell.is_some()).count()
    }

    /// Filled slots in enumeration order, gaps removed
    pub fn into_ordered(self) -> Vec<V> {
        self.slots.into_iter().flatten().collect()
    }

    /// Container mirroring the input shape. Unfilled slots take `fill()`.
    pub fn into_collection<F>(self, mut fill: F) -> Collection<V>
    where
        F: FnMut() -> V,
    {
        let values: Vec<V> = self
            .slots
            .into_iter()
            .map(|cell| cell.unwrap_or_else(&mut fill))
            .collect();
        match self.shape {
            Shape::Sequence(_) => Collection::Sequence(values),
            Shape::Keyed(keys) => Collection::Keyed(Keyed::from_parts(keys, values)),
        }
    }
}
