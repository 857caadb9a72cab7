mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the bookmark graph, one node and its children per line
    Graph {
        /// Firefox bookmark backup (JSON)
        file: PathBuf,
    },
    /// Lay out the bookmarks and print every node position as JSON
    Layout {
        /// Firefox bookmark backup (JSON)
        file: PathBuf,
        #[command(flatten)]
        canvas: CanvasArgs,
    },
    /// Lay out the bookmarks and print the URLs under a point of the canvas
    Pick {
        /// Firefox bookmark backup (JSON)
        file: PathBuf,
        #[arg(long)]
        x: f32,
        #[arg(long)]
        y: f32,
        #[command(flatten)]
        canvas: CanvasArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct CanvasArgs {
    /// Canvas width
    #[arg(long, default_value_t = 1920.0, env = "ISLANDS_WIDTH")]
    pub width: f32,

    /// Canvas height
    #[arg(long, default_value_t = 1080.0, env = "ISLANDS_HEIGHT")]
    pub height: f32,

    /// Seed of the initial placement, random when omitted
    #[arg(long, env = "ISLANDS_SEED")]
    pub seed: Option<u64>,

    /// Stop after this many steps even if the layout is still hot
    #[arg(long)]
    pub max_steps: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let mut out = std::io::stdout().lock();
    match args.command {
        Command::Graph { file } => commands::graph(&file, &mut out),
        Command::Layout { file, canvas } => commands::layout(&file, &canvas, &mut out),
        Command::Pick { file, x, y, canvas } => commands::pick(&file, x, y, &canvas, &mut out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn parses_pick_with_canvas() {
        let args = Args::try_parse_from([
            "islands", "pick", "b.json", "--x", "10", "--y", "20.5", "--width", "800", "--seed",
            "3",
        ])
        .unwrap();

        let Command::Pick { file, x, y, canvas } = args.command else {
            panic!("expected pick");
        };
        assert_eq!(file, PathBuf::from("b.json"));
        assert_eq!((x, y), (10.0, 20.5));
        assert_eq!(canvas.width, 800.0);
        assert_eq!(canvas.seed, Some(3));
        assert_eq!(canvas.max_steps, None);
    }

    #[test]
    fn pick_requires_coordinates() {
        assert!(Args::try_parse_from(["islands", "pick", "b.json", "--x", "1"]).is_err());
    }
}
