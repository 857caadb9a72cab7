use crate::{Point, Result};
use rand::Rng;
use std::collections::HashMap;
use std::hash::Hash;

/// A layout engine that can compute positions for graph nodes
///
/// This trait is generic over the graph type `G`, so engines can state the
/// graph capabilities they need through petgraph's visitor traits. It runs a
/// complete layout in one call, for callers that don't animate it.
pub trait LayoutEngine<G> {
    /// The type used to identify nodes in the graph
    type NodeId: Copy + Ord + Hash;

    /// Compute node positions for the given graph
    ///
    /// `rng` drives any randomized initial placement, so a seeded generator
    /// gives reproducible layouts.
    ///
    /// # Errors
    /// Returns an error if the graph or the engine settings cannot produce a
    /// layout (e.g. an empty graph)
    fn layout<R>(&mut self, graph: G, rng: &mut R) -> Result<HashMap<Self::NodeId, Point>>
    where
        R: Rng + ?Sized;
}
