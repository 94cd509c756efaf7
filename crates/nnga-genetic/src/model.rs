//! Boundary between the engine and the model whose parameters are evolved.
//!
//! The engine only sees flat, tagged gene vectors. A [`Model`] flattens its parameters
//! into [`Gene`]s in a fixed structural order and accepts updated values back; a
//! [`ModelBuilder`] knows the topology, so it can derive the tag sequence once per run
//! and construct fresh model instances.

use std::fmt;

use rand::Rng;

/// A single evolvable parameter and its structural tag.
///
/// The tag is opaque to the engine: it only identifies where the value lives inside
/// the external model (e.g. layer/neuron/input indices of a network weight).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gene<T> {
    pub tag: T,
    pub value: f64,
}

impl<T> Gene<T> {
    #[must_use]
    pub fn new(tag: T, value: f64) -> Self {
        Self { tag, value }
    }
}

/// A model instance bound to one candidate.
pub trait Model: fmt::Debug {
    /// Structural tag identifying a gene's location inside the model.
    type Tag: Clone + PartialEq + fmt::Debug;

    /// Returns every parameter of the model, flattened in structural order.
    ///
    /// The order must be the same for every instance built from the same topology.
    fn genes(&self) -> Vec<Gene<Self::Tag>>;

    /// Writes `values` back into the model, one per tag.
    ///
    /// `tags` is the sequence previously returned by [`ModelBuilder::gene_tags`], and
    /// `values` has the same length.
    fn apply_genes(&mut self, tags: &[Self::Tag], values: &[f64]);
}

/// Constructs model instances for a fixed topology.
pub trait ModelBuilder {
    type Model: Model;

    /// Derives the tag sequence shared by every model this builder produces.
    fn gene_tags(&self) -> Vec<TagOf<Self>>;

    /// Builds a fresh model instance with newly initialized parameters.
    fn build<R>(&self, rng: &mut R) -> Self::Model
    where
        R: Rng + ?Sized;
}

/// Tag type of the models produced by builder `B`.
pub type TagOf<B> = <<B as ModelBuilder>::Model as Model>::Tag;
