//! Force-directed graph layout
//!
//! This crate lays out directed graphs on a 2D canvas with the
//! Fruchterman-Reingold spring model. It works with the bundled
//! [`DirectedGraph`] and with any graph implementing petgraph's visitor
//! traits.
//!
//! # Layout Engines
//!
//! - [`ForceDirectedLayout`]: iterative simulation, one step per frame
//!
//! # Example
//!
//! ```
//! use islands_layout::{DirectedGraph, ForceDirectedLayout, LayoutEngine, Point, Vec2};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! // Create a graph
//! let mut graph = DirectedGraph::new();
//! graph.add_edge(1, 2);
//! graph.add_edge(1, 3);
//!
//! let mut layout: ForceDirectedLayout = ForceDirectedLayout::new(Vec2::new(800.0, 600.0));
//! let mut rng = StdRng::seed_from_u64(0);
//!
//! // Use the LayoutEngine trait (run until frozen):
//! let positions = layout.layout(&graph, &mut rng).unwrap();
//! assert_eq!(positions.len(), 3);
//!
//! // Or step the simulation yourself, e.g. once per rendered frame
//! layout.reset(&graph, &mut rng).unwrap();
//! while layout.update() {
//!     for vertex in layout.vertices() {
//!         let _ = (vertex.id(), vertex.position());
//!     }
//! }
//! let picked = layout.vertex_at(Point::new(400.0, 300.0));
//! # let _ = picked;
//! ```

mod engine;
mod error;
mod geometry;
mod graph;

pub mod force;

// Re-export core types and traits
pub use engine::LayoutEngine;
pub use error::{LayoutError, Result};
pub use geometry::{Point, Vec2};
pub use graph::{DirectedGraph, NodeId};

// Re-export petgraph visitor traits for graph abstraction
pub use petgraph::visit::{GraphBase, IntoNeighbors, IntoNodeIdentifiers};

// Re-export force-directed layout types
pub use force::{ForceDirectedConfig, ForceDirectedLayout, LayoutState, VertexKind, VertexView};
