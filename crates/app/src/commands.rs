use crate::CanvasArgs;
use anyhow::{bail, Context, Result};
use islands_data::{Bookmarks, NodeKind};
use islands_layout::{DirectedGraph, ForceDirectedLayout, LayoutEngine, NodeId, Point, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct PlacedNode<'a> {
    id: NodeId,
    kind: Option<NodeKind>,
    title: Option<&'a str>,
    x: f32,
    y: f32,
}

fn load(file: &Path) -> Result<(Bookmarks, DirectedGraph)> {
    let bookmarks = Bookmarks::from_path(file)
        .with_context(|| format!("Failed to load bookmarks from {}", file.display()))?;
    let graph = bookmarks.to_graph();
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Bookmark graph built"
    );
    Ok((bookmarks, graph))
}

fn rng_for(canvas: &CanvasArgs) -> StdRng {
    let seed = canvas.seed.unwrap_or_else(rand::random);
    info!(seed, "Seeding the initial placement");
    StdRng::seed_from_u64(seed)
}

/// Run the simulation until it freezes or hits the step cap
fn simulate(graph: &DirectedGraph, canvas: &CanvasArgs) -> Result<ForceDirectedLayout> {
    let mut layout = ForceDirectedLayout::new(Vec2::new(canvas.width, canvas.height));
    layout
        .reset(graph, &mut rng_for(canvas))
        .context("Failed to start the layout")?;

    let max_steps = canvas.max_steps.unwrap_or(usize::MAX);
    while layout.steps() < max_steps && layout.update() {}

    info!(
        steps = layout.steps(),
        temperature = layout.temperature(),
        "Layout {:?}",
        layout.state()
    );
    Ok(layout)
}

fn positions(graph: &DirectedGraph, canvas: &CanvasArgs) -> Result<BTreeMap<NodeId, Point>> {
    if canvas.max_steps.is_some() {
        let layout = simulate(graph, canvas)?;
        return Ok(layout
            .vertices()
            .map(|vertex| (vertex.id(), vertex.position()))
            .collect());
    }

    let mut layout: ForceDirectedLayout =
        ForceDirectedLayout::new(Vec2::new(canvas.width, canvas.height));
    let positions = layout
        .layout(graph, &mut rng_for(canvas))
        .context("Failed to lay out the bookmarks")?;
    Ok(positions.into_iter().collect())
}

pub fn graph(file: &Path, out: &mut impl Write) -> Result<()> {
    let (_, graph) = load(file)?;
    write!(out, "{graph}")?;
    Ok(())
}

pub fn layout(file: &Path, canvas: &CanvasArgs, out: &mut impl Write) -> Result<()> {
    let (bookmarks, graph) = load(file)?;
    write_positions(&bookmarks, &positions(&graph, canvas)?, out)
}

fn write_positions(
    bookmarks: &Bookmarks,
    positions: &BTreeMap<NodeId, Point>,
    out: &mut impl Write,
) -> Result<()> {
    let nodes: Vec<_> = positions
        .iter()
        .map(|(&id, position)| PlacedNode {
            id,
            kind: bookmarks.kind(id),
            title: bookmarks.title(id),
            x: position.x,
            y: position.y,
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &nodes)?;
    writeln!(out)?;
    Ok(())
}

pub fn pick(
    file: &Path,
    x: f32,
    y: f32,
    canvas: &CanvasArgs,
    out: &mut impl Write,
) -> Result<()> {
    let (bookmarks, graph) = load(file)?;
    let layout = simulate(&graph, canvas)?;
    write_pick(&bookmarks, &graph, &layout, Point::new(x, y), out)
}

fn write_pick(
    bookmarks: &Bookmarks,
    graph: &DirectedGraph,
    layout: &ForceDirectedLayout,
    point: Point,
    out: &mut impl Write,
) -> Result<()> {
    let Some(id) = layout.vertex_at(point) else {
        bail!("No node near ({}, {})", point.x, point.y);
    };

    match (bookmarks.folder(id), bookmarks.bookmark(id)) {
        (Some(folder), _) => writeln!(out, "{folder}")?,
        (None, Some(bookmark)) => writeln!(out, "{bookmark}")?,
        (None, None) => writeln!(out, "Node {id}")?,
    }
    for url in bookmarks.urls_under(graph, id) {
        writeln!(out, "{url}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const BACKUP: &str = r#"{
        "title": "root", "id": 1, "type": "text/x-moz-place-container",
        "children": [
            { "title": "docs", "id": 2, "type": "text/x-moz-place", "uri": "https://docs.rs/" },
            { "title": "std", "id": 3, "type": "text/x-moz-place", "uri": "https://doc.rust-lang.org/std/" }
        ]
    }"#;

    fn canvas(max_steps: Option<usize>) -> CanvasArgs {
        CanvasArgs {
            width: 800.0,
            height: 600.0,
            seed: Some(7),
            max_steps,
        }
    }

    #[test]
    fn same_seed_same_positions() {
        let bookmarks = Bookmarks::from_firefox_json(BACKUP).unwrap();
        let graph = bookmarks.to_graph();

        let first = positions(&graph, &canvas(None)).unwrap();
        let second = positions(&graph, &canvas(None)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn step_cap_stops_early() {
        let bookmarks = Bookmarks::from_firefox_json(BACKUP).unwrap();
        let graph = bookmarks.to_graph();

        let layout = simulate(&graph, &canvas(Some(3))).unwrap();
        assert_eq!(layout.steps(), 3);
        assert!(!layout.is_frozen());
    }

    #[test]
    fn positions_are_written_as_json() {
        let bookmarks = Bookmarks::from_firefox_json(BACKUP).unwrap();
        let positions = BTreeMap::from([(1, Point::new(10.0, 20.0)), (3, Point::new(5.0, 6.0))]);

        let mut out = Vec::new();
        write_positions(&bookmarks, &positions, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["kind"], "folder");
        assert_eq!(json[0]["title"], "root");
        assert_eq!(json[1]["kind"], "bookmark");
        assert_eq!(json[1]["x"], 5.0);
    }

    #[test]
    fn pick_prints_the_urls_of_the_hit_node() {
        let bookmarks = Bookmarks::from_firefox_json(BACKUP).unwrap();
        let graph = bookmarks.to_graph();
        let layout = simulate(&graph, &canvas(None)).unwrap();
        let root = layout.position_of(1).unwrap();

        let mut out = Vec::new();
        write_pick(&bookmarks, &graph, &layout, root, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Folder root (parent: 1)\nhttps://docs.rs/\nhttps://doc.rust-lang.org/std/\n"
        );
    }

    #[test]
    fn pick_outside_every_node_fails() {
        let bookmarks = Bookmarks::from_firefox_json(BACKUP).unwrap();
        let graph = bookmarks.to_graph();
        let layout = simulate(&graph, &canvas(None)).unwrap();

        let mut out = Vec::new();
        // outside the canvas borders, no vertex can be there
        let outside = Point::new(-100.0, -100.0);
        let result = write_pick(&bookmarks, &graph, &layout, outside, &mut out);
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
