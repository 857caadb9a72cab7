use super::vertex::Vertex;
use super::ForceDirectedLayout;
use crate::{Point, Vec2};
use std::f32::consts::FRAC_1_SQRT_2;
use std::hash::Hash;
use tracing::trace;

/// Constants of the force formulas for one step
#[derive(Debug, Clone, Copy)]
struct Forces {
    ideal_distance: f32,
    count: f32,
    min_distance: f32,
}

impl Forces {
    fn repulsive(&self, distance: f32) -> f32 {
        self.ideal_distance * self.ideal_distance / (distance * self.count)
    }

    fn attractive(&self, distance: f32) -> f32 {
        distance * distance / (self.ideal_distance * self.count)
    }

    /// Unit direction from `other` to `this`, and their floored distance.
    ///
    /// Coincident vertices get a diagonal whose sign depends on their order in
    /// the array, so the two of them are pushed in opposite directions.
    fn direction(&self, this: (usize, Point), other: (usize, Point)) -> (Vec2, f32) {
        let delta = this.1 - other.1;
        let length = delta.length();
        let distance = length.max(self.min_distance);
        if length > 0.0 {
            (delta / distance, distance)
        } else {
            let sign = if this.0 < other.0 { -1.0 } else { 1.0 };
            (Vec2::new(sign, sign) * FRAC_1_SQRT_2, distance)
        }
    }

    /// Sum of the forces applied to the vertex at `index`
    fn displacement<N>(&self, index: usize, vertex: &Vertex<N>, positions: &[Point]) -> Vec2 {
        let this = (index, positions[index]);
        let mut displacement = Vec2::zero();

        for (other, &position) in positions.iter().enumerate() {
            if other == index {
                continue;
            }
            let (direction, distance) = self.direction(this, (other, position));
            displacement += direction * self.repulsive(distance);
        }

        for &other in &vertex.neighbors {
            if other == index {
                continue;
            }
            let (direction, distance) = self.direction(this, (other, positions[other]));
            displacement -= direction * self.attractive(distance);
        }

        displacement
    }
}

/// How a pass over the vertex array is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Pass {
    #[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
    Sequential,
    #[cfg(feature = "parallel")]
    Parallel,
}

#[cfg(feature = "parallel")]
const DEFAULT_PASS: Pass = Pass::Parallel;
#[cfg(not(feature = "parallel"))]
const DEFAULT_PASS: Pass = Pass::Sequential;

impl Pass {
    /// Run `f` on every vertex. Each call is a full pass: it returns once every
    /// vertex has been visited.
    fn for_each_vertex<N, F>(self, vertices: &mut [Vertex<N>], f: F)
    where
        N: Send,
        F: Fn(usize, &mut Vertex<N>) + Send + Sync,
    {
        match self {
            Pass::Sequential => vertices
                .iter_mut()
                .enumerate()
                .for_each(|(index, vertex)| f(index, vertex)),
            #[cfg(feature = "parallel")]
            Pass::Parallel => {
                use rayon::prelude::*;
                vertices
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(index, vertex)| f(index, vertex));
            }
        }
    }
}

impl<N> ForceDirectedLayout<N>
where
    N: Copy + Ord + Hash + Send + Sync,
{
    /// One simulation step
    ///
    /// Forces are evaluated against the positions at the start of the step,
    /// and vertices only move once every displacement is known.
    pub(super) fn step(&mut self) {
        self.step_with(DEFAULT_PASS);
    }

    pub(super) fn step_with(&mut self, pass: Pass) {
        let forces = Forces {
            ideal_distance: self.ideal_distance,
            count: self.vertices.len() as f32,
            min_distance: self.config.min_distance,
        };
        let positions: Vec<Point> = self.vertices.iter().map(|v| v.position).collect();

        pass.for_each_vertex(&mut self.vertices, |index, vertex| {
            vertex.displacement = forces.displacement(index, vertex, &positions);
        });

        let temperature = self.temperature;
        let (min, max) = self.bounds();
        pass.for_each_vertex(&mut self.vertices, |_, vertex| {
            let length = vertex.displacement.length();
            let displacement = if length > temperature {
                vertex.displacement * (temperature / length)
            } else {
                vertex.displacement
            };
            vertex.position = (vertex.position + displacement).clamp(min, max);
            vertex.displacement = Vec2::zero();
        });

        self.temperature *= self.config.cooling_factor;
        self.steps += 1;
        trace!(
            step = self.steps,
            temperature = self.temperature,
            "Force-directed step"
        );
    }
}
