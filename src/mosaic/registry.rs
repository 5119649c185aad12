//! Identifier to aggregate mapping used while fanning tiles out

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::io::error::{Result, invalid_argument};
use crate::mosaic::aggregate::ImageAggregate;

/// Aggregates keyed by identifier, iterated in first-seen order
///
/// Identifiers are compared exactly; `"abc"` and `"abcdef"` are distinct.
#[derive(Debug)]
pub struct ImageRegistry<H> {
    entries: IndexMap<String, ImageAggregate<H>>,
}

impl<H> Default for ImageRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ImageRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Return the aggregate for `id`, creating it on first reference
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `id` is empty
    pub fn get_or_create(&mut self, id: &str) -> Result<&mut ImageAggregate<H>> {
        if id.is_empty() {
            return Err(invalid_argument("id", &id, &"must not be empty"));
        }

        match self.entries.entry(id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!(image = id, "new image");
                let aggregate = ImageAggregate::new(entry.key())?;
                Ok(entry.insert(aggregate))
            }
        }
    }

    /// Aggregate for `id`, if seen
    pub fn get(&self, id: &str) -> Option<&ImageAggregate<H>> {
        self.entries.get(id)
    }

    /// All aggregates in first-seen order
    pub fn all(&self) -> impl Iterator<Item = &ImageAggregate<H>> {
        self.entries.values()
    }

    /// All aggregates in first-seen order, mutably
    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut ImageAggregate<H>> {
        self.entries.values_mut()
    }

    /// Number of distinct identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no identifier has been seen
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Post-process every aggregate in registry order
    ///
    /// # Errors
    ///
    /// Stops at and returns the first aggregate's failure
    pub fn finalize_all(&mut self) -> Result<()> {
        for aggregate in self.entries.values_mut() {
            aggregate.finalize()?;
        }
        Ok(())
    }
}
