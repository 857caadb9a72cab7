//! Fruchterman-Reingold force-directed layout
//!
//! Every pair of nodes repels with `k² / (d·n)` and every edge pulls its
//! endpoints together with `d² / (k·n)`, where `d` is their distance, `n` the
//! number of nodes and `k = sqrt(area / n)` the ideal distance between nodes.
//! The displacement of a step is capped by a temperature that cools
//! geometrically, until the layout freezes.

mod step;
mod vertex;

pub use vertex::{VertexKind, VertexView};

use crate::{LayoutEngine, LayoutError, NodeId, Point, Result, Vec2};
use petgraph::visit::{GraphBase, IntoNeighbors, IntoNodeIdentifiers};
use rand::Rng;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, warn};
use vertex::Vertex;

/// Tunables of the force-directed layout
#[derive(Debug, Clone, PartialEq)]
pub struct ForceDirectedConfig {
    /// Distance kept free along each canvas edge. The vertical border also
    /// leaves room for a status bar drawn over the canvas.
    pub border: Vec2,

    /// Factor applied to the temperature after every step, in (0, 1)
    pub cooling_factor: f32,

    /// Below this temperature the layout is frozen and updates do nothing
    pub freeze_temperature: f32,

    /// Floor of the distance used in force computations
    pub min_distance: f32,

    /// Radius around a vertex that counts as a hit
    pub hit_radius: f32,
}

impl Default for ForceDirectedConfig {
    fn default() -> Self {
        Self {
            border: Vec2::new(5.0, 30.0),
            cooling_factor: 0.98,
            freeze_temperature: 0.1,
            min_distance: 0.001,
            hit_radius: 4.0,
        }
    }
}

/// Lifecycle of a [`ForceDirectedLayout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// No vertex yet, or the last reset failed
    Uninitialized,
    /// Freshly reset, no step taken
    Built,
    /// Hot: every update moves the vertices
    Active,
    /// Cold: updates are no-ops until the next reset
    Frozen,
}

/// Force-directed simulation over a snapshot of a graph
///
/// [`reset`](Self::reset) snapshots the graph into a vertex array with random
/// positions, then each [`update`](Self::update) advances the simulation by
/// one step while the layout is hot. The array is only rebuilt by `reset`.
#[derive(Debug, Clone)]
pub struct ForceDirectedLayout<N = NodeId> {
    config: ForceDirectedConfig,
    canvas: Vec2,
    vertices: Vec<Vertex<N>>,
    lookup: HashMap<N, usize>,
    temperature: f32,
    ideal_distance: f32,
    steps: usize,
}

impl<N> ForceDirectedLayout<N>
where
    N: Copy + Ord + Hash + Send + Sync,
{
    /// Create a layout for a canvas of the given size, with default tunables
    pub fn new(canvas: Vec2) -> Self {
        Self::with_config(canvas, ForceDirectedConfig::default())
    }

    pub fn with_config(canvas: Vec2, config: ForceDirectedConfig) -> Self {
        Self {
            config,
            canvas,
            vertices: Vec::new(),
            lookup: HashMap::new(),
            temperature: 0.0,
            ideal_distance: 0.0,
            steps: 0,
        }
    }

    /// Rebuild the vertex array from `graph` with random initial positions.
    ///
    /// Previous positions are discarded. Neighbor links are made symmetric for
    /// the physics, `graph` itself is only read.
    ///
    /// # Errors
    /// Returns an error, and leaves the layout uninitialized, if the graph has
    /// no node or if the canvas or cooling factor cannot produce a layout.
    pub fn reset<G, R>(&mut self, graph: G, rng: &mut R) -> Result<()>
    where
        G: IntoNodeIdentifiers + IntoNeighbors + GraphBase<NodeId = N>,
        R: Rng + ?Sized,
    {
        self.vertices.clear();
        self.lookup.clear();
        self.temperature = 0.0;
        self.ideal_distance = 0.0;
        self.steps = 0;

        self.validate()?;

        let nodes: Vec<N> = graph.node_identifiers().collect();
        if nodes.is_empty() {
            return Err(LayoutError::EmptyGraph);
        }

        let Vec2 {
            x: width,
            y: height,
        } = self.canvas;
        let count = nodes.len() as f32;
        let ideal_distance = (width * height / count).sqrt();
        let temperature = width + height;
        if !(ideal_distance.is_normal() && temperature.is_finite()) {
            return Err(LayoutError::InvalidCanvas { width, height });
        }
        self.ideal_distance = ideal_distance;
        self.temperature = temperature;

        self.vertices = nodes
            .iter()
            .map(|&id| {
                let x = rng.random::<f32>();
                let y = rng.random::<f32>();
                Vertex::new(id, Point::new(x * width, y * height))
            })
            .collect();

        self.lookup = self
            .vertices
            .iter()
            .enumerate()
            .map(|(index, vertex)| (vertex.id, index))
            .collect();

        // Directed links first, in graph order
        for vertex in &mut self.vertices {
            let mut successors = 0;
            for neighbor in graph.neighbors(vertex.id) {
                successors += 1;
                match self.lookup.get(&neighbor) {
                    Some(&index) => vertex.neighbors.push(index),
                    None => warn!("Dropping an edge to a node outside of the graph"),
                }
            }
            vertex.successors = vertex.neighbors.len();
            if successors > 0 {
                vertex.kind = VertexKind::Interior;
            }
        }

        // Then the reverse links, so attraction works both ways
        for index in 0..self.vertices.len() {
            for slot in 0..self.vertices[index].successors {
                let other = self.vertices[index].neighbors[slot];
                if other != index && !self.vertices[other].neighbors.contains(&index) {
                    self.vertices[other].neighbors.push(index);
                }
            }
        }

        debug!(
            nodes = self.vertices.len(),
            ideal_distance = self.ideal_distance,
            temperature = self.temperature,
            "Force-directed layout reset"
        );

        Ok(())
    }

    /// Advance the simulation by one step unless the layout is frozen.
    ///
    /// Returns whether a step was taken.
    pub fn update(&mut self) -> bool {
        if self.vertices.is_empty() || self.is_frozen() {
            return false;
        }

        self.step();

        if self.is_frozen() {
            debug!(steps = self.steps, "Force-directed layout frozen");
        }
        true
    }

    pub fn state(&self) -> LayoutState {
        if self.vertices.is_empty() {
            LayoutState::Uninitialized
        } else if self.is_frozen() {
            LayoutState::Frozen
        } else if self.steps == 0 {
            LayoutState::Built
        } else {
            LayoutState::Active
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.temperature < self.config.freeze_temperature
    }

    /// Upper bound of the distance a vertex moves during the next step
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Ideal distance between two nodes, `sqrt(area / n)`
    pub fn ideal_distance(&self) -> f32 {
        self.ideal_distance
    }

    /// Number of steps taken since the last reset
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn canvas(&self) -> Vec2 {
        self.canvas
    }

    pub fn config(&self) -> &ForceDirectedConfig {
        &self.config
    }

    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexView<'_, N>> + '_ {
        self.vertices
            .iter()
            .map(|vertex| VertexView::new(vertex, &self.vertices))
    }

    pub fn position_of(&self, id: N) -> Option<Point> {
        self.lookup
            .get(&id)
            .map(|&index| self.vertices[index].position)
    }

    /// Closest vertex within the hit radius of `point`
    pub fn vertex_at(&self, point: Point) -> Option<N> {
        let threshold = self.config.hit_radius * self.config.hit_radius;
        self.vertices
            .iter()
            .map(|vertex| (vertex.id, vertex.position.distance_squared(point)))
            .filter(|&(_, distance)| distance < threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn validate(&self) -> Result<()> {
        let Vec2 {
            x: width,
            y: height,
        } = self.canvas;
        let border = self.config.border;
        let fits = width.is_finite()
            && height.is_finite()
            && border.x >= 0.0
            && border.y >= 0.0
            && width > 2.0 * border.x
            && height > 2.0 * border.y;
        if !fits {
            return Err(LayoutError::InvalidCanvas { width, height });
        }

        let cooling = self.config.cooling_factor;
        if !(cooling > 0.0 && cooling < 1.0) {
            return Err(LayoutError::InvalidCoolingFactor(cooling));
        }

        // The temperature must cool below the freeze threshold in finite time,
        // and distances are divided by `min_distance`.
        for (name, value) in [
            ("min_distance", self.config.min_distance),
            ("freeze_temperature", self.config.freeze_temperature),
            ("hit_radius", self.config.hit_radius),
        ] {
            if !(value.is_normal() && value > 0.0) {
                return Err(LayoutError::InvalidParameter { name, value });
            }
        }

        Ok(())
    }

    /// Lowest and highest position a vertex may take
    fn bounds(&self) -> (Point, Point) {
        let border = self.config.border;
        (
            Point::new(border.x, border.y),
            Point::new(self.canvas.x - border.x, self.canvas.y - border.y),
        )
    }
}

impl<G> LayoutEngine<G> for ForceDirectedLayout<G::NodeId>
where
    G: IntoNodeIdentifiers + IntoNeighbors,
    G::NodeId: Copy + Ord + Hash + Send + Sync,
{
    type NodeId = G::NodeId;

    fn layout<R>(&mut self, graph: G, rng: &mut R) -> Result<HashMap<Self::NodeId, Point>>
    where
        R: Rng + ?Sized,
    {
        self.reset(graph, rng)?;
        while self.update() {}

        Ok(self
            .vertices
            .iter()
            .map(|vertex| (vertex.id, vertex.position))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DirectedGraph;
    use petgraph::graphmap::DiGraphMap;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_log::test;

    fn canvas() -> Vec2 {
        Vec2::new(1000.0, 1000.0)
    }

    fn tree() -> DirectedGraph {
        [(0, 0), (0, 1), (0, 2), (1, 3), (1, 4), (2, 5)]
            .into_iter()
            .collect()
    }

    #[test]
    fn reset_builds_one_vertex_per_node() {
        let graph = tree();
        let mut layout = ForceDirectedLayout::new(canvas());
        assert_eq!(layout.state(), LayoutState::Uninitialized);

        layout.reset(&graph, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(layout.state(), LayoutState::Built);
        assert_eq!(layout.len(), 6);
        assert_eq!(layout.temperature(), 2000.0);
        let expected_k = (1000.0f32 * 1000.0 / 6.0).sqrt();
        assert!((layout.ideal_distance() - expected_k).abs() < 1e-3);

        let ids: Vec<_> = layout.vertices().map(|v| v.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        for vertex in layout.vertices() {
            let p = vertex.position();
            assert!((0.0..1000.0).contains(&p.x) && (0.0..1000.0).contains(&p.y));
        }
    }

    #[test]
    fn links_are_symmetric_but_successors_follow_edges() {
        let graph = tree();
        let mut layout = ForceDirectedLayout::new(canvas());
        layout.reset(&graph, &mut StdRng::seed_from_u64(1)).unwrap();

        let links = |id: NodeId| {
            let vertex = layout.vertices().find(|v| v.id() == id).unwrap();
            let neighbors: Vec<_> = vertex.neighbors().map(|(n, _)| n).collect();
            let successors: Vec<_> = vertex.successors().map(|(n, _)| n).collect();
            (neighbors, successors, vertex.kind())
        };

        assert_eq!(links(0), (vec![1, 2], vec![1, 2], VertexKind::Interior));
        assert_eq!(links(1), (vec![3, 4, 0], vec![3, 4], VertexKind::Interior));
        assert_eq!(links(5), (vec![2], vec![], VertexKind::Leaf));
    }

    #[test]
    fn neighbor_positions_are_live() {
        let graph = tree();
        let mut layout = ForceDirectedLayout::new(canvas());
        layout.reset(&graph, &mut StdRng::seed_from_u64(9)).unwrap();
        layout.update();

        for vertex in layout.vertices() {
            for (id, position) in vertex.neighbors() {
                assert_eq!(Some(position), layout.position_of(id));
            }
        }
    }

    #[test]
    fn reverse_links_are_not_duplicated() {
        let graph: DirectedGraph = [(1, 2), (1, 2), (2, 1)].into_iter().collect();
        let mut layout = ForceDirectedLayout::new(canvas());
        layout.reset(&graph, &mut StdRng::seed_from_u64(3)).unwrap();

        let neighbors = |id: NodeId| {
            layout
                .vertices()
                .find(|v| v.id() == id)
                .unwrap()
                .neighbors()
                .map(|(n, _)| n)
                .collect::<Vec<_>>()
        };
        assert_eq!(neighbors(1), vec![2, 2]);
        assert_eq!(neighbors(2), vec![1]);
    }

    #[test]
    fn same_seed_same_initial_layout() {
        let graph = tree();
        let positions = |seed| {
            let mut layout = ForceDirectedLayout::new(canvas());
            layout.reset(&graph, &mut StdRng::seed_from_u64(seed)).unwrap();
            layout.vertices().map(|v| v.position()).collect::<Vec<_>>()
        };

        assert_eq!(positions(42), positions(42));
        assert_ne!(positions(42), positions(43));
    }

    #[test]
    fn reset_discards_previous_run() {
        let graph = tree();
        let mut layout = ForceDirectedLayout::new(canvas());
        let mut rng = StdRng::seed_from_u64(5);
        layout.reset(&graph, &mut rng).unwrap();
        for _ in 0..10 {
            layout.update();
        }
        assert_eq!(layout.state(), LayoutState::Active);

        layout.reset(&graph, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(layout.state(), LayoutState::Built);
        assert_eq!(layout.steps(), 0);
        assert_eq!(layout.temperature(), 2000.0);
    }

    #[test]
    fn empty_graph_leaves_layout_uninitialized() {
        let graph = DirectedGraph::new();
        let mut layout = ForceDirectedLayout::new(canvas());
        let err = layout.reset(&graph, &mut StdRng::seed_from_u64(0));

        assert_eq!(err, Err(LayoutError::EmptyGraph));
        assert_eq!(layout.state(), LayoutState::Uninitialized);
        assert_eq!(layout.vertices().len(), 0);
        assert!(layout.ideal_distance().is_finite());
        assert!(layout.temperature().is_finite());
        assert!(!layout.update());
        assert_eq!(layout.vertex_at(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn empty_graph_after_a_run_clears_vertices() {
        let mut layout = ForceDirectedLayout::new(canvas());
        layout.reset(&tree(), &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(layout.reset(&DirectedGraph::new(), &mut StdRng::seed_from_u64(0)).is_err());
        assert!(layout.is_empty());
    }

    #[test]
    fn invalid_canvas_is_rejected() {
        let graph = tree();
        let mut rng = StdRng::seed_from_u64(0);

        let mut layout = ForceDirectedLayout::new(Vec2::new(8.0, 1000.0));
        assert_eq!(
            layout.reset(&graph, &mut rng),
            Err(LayoutError::InvalidCanvas {
                width: 8.0,
                height: 1000.0
            })
        );

        let mut layout = ForceDirectedLayout::new(Vec2::new(f32::NAN, 1000.0));
        assert!(matches!(
            layout.reset(&graph, &mut rng),
            Err(LayoutError::InvalidCanvas { .. })
        ));
        assert_eq!(layout.state(), LayoutState::Uninitialized);
    }

    #[test]
    fn invalid_cooling_is_rejected() {
        let config = ForceDirectedConfig {
            cooling_factor: 1.0,
            ..Default::default()
        };
        let mut layout = ForceDirectedLayout::with_config(canvas(), config);
        assert_eq!(
            layout.reset(&tree(), &mut StdRng::seed_from_u64(0)),
            Err(LayoutError::InvalidCoolingFactor(1.0))
        );
    }

    #[test]
    fn non_positive_tunables_are_rejected() {
        let cases = [
            (
                ForceDirectedConfig {
                    min_distance: 0.0,
                    ..Default::default()
                },
                "min_distance",
            ),
            (
                ForceDirectedConfig {
                    freeze_temperature: 0.0,
                    ..Default::default()
                },
                "freeze_temperature",
            ),
            (
                ForceDirectedConfig {
                    freeze_temperature: f32::NAN,
                    ..Default::default()
                },
                "freeze_temperature",
            ),
            (
                ForceDirectedConfig {
                    hit_radius: -4.0,
                    ..Default::default()
                },
                "hit_radius",
            ),
            (
                ForceDirectedConfig {
                    min_distance: f32::INFINITY,
                    ..Default::default()
                },
                "min_distance",
            ),
        ];

        for (config, expected) in cases {
            let mut layout = ForceDirectedLayout::with_config(canvas(), config);
            let result = layout.reset(&tree(), &mut StdRng::seed_from_u64(0));
            assert!(
                matches!(result, Err(LayoutError::InvalidParameter { name, .. }) if name == expected),
                "{result:?}"
            );
            assert_eq!(layout.state(), LayoutState::Uninitialized);
            assert!(!layout.update());
        }
    }

    #[test]
    fn overflowing_canvas_is_rejected() {
        let mut layout = ForceDirectedLayout::new(Vec2::new(1e20, 1e20));
        let result = layout.reset(&tree(), &mut StdRng::seed_from_u64(0));

        assert_eq!(
            result,
            Err(LayoutError::InvalidCanvas {
                width: 1e20,
                height: 1e20
            })
        );
        assert_eq!(layout.state(), LayoutState::Uninitialized);
        assert!(layout.ideal_distance().is_finite());
        assert!(!layout.update());
    }

    #[test]
    fn coincident_vertices_stay_finite() {
        let graph: DirectedGraph = [(1, 2)].into_iter().collect();
        let mut layout = ForceDirectedLayout::new(canvas());
        layout.reset(&graph, &mut StdRng::seed_from_u64(0)).unwrap();
        for vertex in &mut layout.vertices {
            vertex.position = Point::new(500.0, 500.0);
        }

        while layout.update() {
            assert!(layout.vertices().all(|v| v.position().is_finite()));
        }
        assert_eq!(layout.state(), LayoutState::Frozen);
    }

    #[test]
    fn hit_test_picks_the_nearest_vertex_in_range() {
        let graph = tree();
        let mut layout = ForceDirectedLayout::new(canvas());
        layout.reset(&graph, &mut StdRng::seed_from_u64(2)).unwrap();
        for vertex in &mut layout.vertices {
            vertex.position = Point::new(900.0, 900.0);
        }
        layout.vertices[0].position = Point::new(100.0, 100.0);
        layout.vertices[1].position = Point::new(103.0, 100.0);

        assert_eq!(layout.vertex_at(Point::new(100.5, 100.0)), Some(0));
        assert_eq!(layout.vertex_at(Point::new(102.5, 100.0)), Some(1));
        // squared distance 16 is outside the radius
        assert_eq!(layout.vertex_at(Point::new(96.0, 100.0)), None);
    }

    #[test]
    fn layout_engine_runs_until_frozen() {
        let graph = tree();
        let mut layout: ForceDirectedLayout = ForceDirectedLayout::new(canvas());
        let positions = layout
            .layout(&graph, &mut StdRng::seed_from_u64(11))
            .unwrap();

        assert_eq!(layout.state(), LayoutState::Frozen);
        assert_eq!(positions.len(), 6);
        for id in 0..6 {
            assert_eq!(positions.get(&id).copied(), layout.position_of(id));
        }
    }

    #[test]
    fn works_with_petgraph_graphs() {
        let mut graph = DiGraphMap::<u32, ()>::new();
        graph.add_edge(10, 20, ());
        graph.add_edge(10, 30, ());
        graph.add_node(40);

        let mut layout = ForceDirectedLayout::new(canvas());
        layout.reset(&graph, &mut StdRng::seed_from_u64(4)).unwrap();

        assert_eq!(layout.len(), 4);
        let kinds: HashMap<_, _> = layout.vertices().map(|v| (v.id(), v.kind())).collect();
        assert_eq!(kinds[&10], VertexKind::Interior);
        assert_eq!(kinds[&40], VertexKind::Leaf);
    }
}
