use crate::{Point, Vec2};

/// Whether a node has children in the directed graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// No outgoing edge (a bookmark, in a bookmark tree)
    Leaf,
    /// At least one outgoing edge (a folder)
    Interior,
}

/// Physical state of one graph node
#[derive(Debug, Clone)]
pub(crate) struct Vertex<N> {
    pub(crate) id: N,
    pub(crate) position: Point,
    /// Sum of the forces of the current step, zero between steps
    pub(crate) displacement: Vec2,
    /// Indices into the vertex array. The first `successors` entries mirror the
    /// directed edges, the rest are reverse links added for symmetric physics.
    pub(crate) neighbors: Vec<usize>,
    pub(crate) successors: usize,
    pub(crate) kind: VertexKind,
}

impl<N> Vertex<N> {
    pub(crate) fn new(id: N, position: Point) -> Self {
        Self {
            id,
            position,
            displacement: Vec2::zero(),
            neighbors: Vec::new(),
            successors: 0,
            kind: VertexKind::Leaf,
        }
    }
}

/// Read-only view of a vertex, valid until the next reset or update
#[derive(Debug, Clone, Copy)]
pub struct VertexView<'a, N> {
    vertex: &'a Vertex<N>,
    vertices: &'a [Vertex<N>],
}

impl<'a, N: Copy> VertexView<'a, N> {
    pub(crate) fn new(vertex: &'a Vertex<N>, vertices: &'a [Vertex<N>]) -> Self {
        Self { vertex, vertices }
    }

    pub fn id(&self) -> N {
        self.vertex.id
    }

    pub fn position(&self) -> Point {
        self.vertex.position
    }

    pub fn kind(&self) -> VertexKind {
        self.vertex.kind
    }

    /// Every node this vertex is attracted to, as `(id, current position)`.
    ///
    /// Links are symmetric: an edge `a -> b` shows up in both `a` and `b`.
    pub fn neighbors(&self) -> impl ExactSizeIterator<Item = (N, Point)> + 'a {
        let (vertex, vertices) = (self.vertex, self.vertices);
        vertex
            .neighbors
            .iter()
            .map(move |&index| (vertices[index].id, vertices[index].position))
    }

    /// Destinations of the directed edges leaving this vertex, so each edge
    /// can be drawn once.
    pub fn successors(&self) -> impl ExactSizeIterator<Item = (N, Point)> + 'a {
        let (vertex, vertices) = (self.vertex, self.vertices);
        vertex.neighbors[..vertex.successors]
            .iter()
            .map(move |&index| (vertices[index].id, vertices[index].position))
    }
}
