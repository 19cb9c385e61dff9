use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use foldref::api::*;
use nalgebra::Vector2;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "foldref")]
#[command(about = "Find origami reference folds and the sequences that make them")]
struct Cmd {
    #[command(flatten)]
    opts: ConfigOpts,

    #[command(subcommand)]
    action: Action,
}

/// Closure configuration; flags override values from `--config`.
#[derive(Args, Debug, Default)]
struct ConfigOpts {
    /// JSON FinderConfig; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    width: Option<f64>,
    #[arg(long, global = true)]
    height: Option<f64>,
    /// Height follows width
    #[arg(long, global = true)]
    square: bool,
    #[arg(long, global = true)]
    max_rank: Option<usize>,
    /// Enabled axioms, e.g. `1,2,3`
    #[arg(long, global = true, value_delimiter = ',')]
    axioms: Option<Vec<u8>>,
}

#[derive(Subcommand)]
enum Action {
    /// Print the references nearest a point as JSON
    Points {
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Print the references nearest the line through two points as JSON
    Lines {
        #[arg(long)]
        x1: f64,
        #[arg(long)]
        y1: f64,
        #[arg(long)]
        x2: f64,
        #[arg(long)]
        y2: f64,
    },
    /// Build the fold sequence for the best match of a point (or, with
    /// --x2/--y2, of the line through both points)
    Fold {
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        #[arg(long, requires = "y2")]
        x2: Option<f64>,
        #[arg(long, requires = "x2")]
        y2: Option<f64>,
        /// JSON list of `[x1, y1, x2, y2]` segments drawn on every diagram
        #[arg(long)]
        segments: Option<PathBuf>,
        /// Write the steps here (plus a provenance sidecar) instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print per-rank reference counts
    Stats,
    /// Print the effective configuration
    ShowConfig,
}

impl ConfigOpts {
    fn resolve(&self) -> Result<FinderConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let bytes = fs::read(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_slice(&bytes)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => FinderConfig::default(),
        };
        if let Some(w) = self.width {
            cfg.paper.width = w;
        }
        if let Some(h) = self.height {
            cfg.paper.height = h;
        }
        if self.square {
            cfg.paper.square = true;
        }
        if let Some(r) = self.max_rank {
            cfg.max_rank = r;
        }
        if let Some(numbers) = &self.axioms {
            cfg.axioms = AxiomSet::from_numbers(numbers)?;
        }
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }
}

#[derive(Serialize)]
struct PointOut {
    id: usize,
    x: f64,
    y: f64,
    rank: usize,
    derivation: String,
    distance_error: f64,
}

#[derive(Serialize)]
struct LineOut {
    id: usize,
    equation: String,
    rank: usize,
    derivation: String,
    shift_error: f64,
    angle_error: f64,
}

fn point_derivation(store: &RefStore, id: PointId) -> String {
    match store.point(id).origin {
        PointOrigin::Corner(c) => c.name().to_string(),
        PointOrigin::Intersection(..) => "intersection".to_string(),
    }
}

fn line_derivation(store: &RefStore, id: LineId) -> String {
    match store.line(id).origin {
        LineOrigin::Edge(e) => e.name().to_string(),
        LineOrigin::Fold(axiom) => format!("A{}", axiom.number()),
    }
}

fn read_segments(path: &Path) -> Result<Vec<Segment>> {
    let bytes = fs::read(path).with_context(|| format!("reading segments {}", path.display()))?;
    let raw: Vec<[f64; 4]> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing segments {}", path.display()))?;
    Ok(raw
        .into_iter()
        .map(|[x1, y1, x2, y2]| Segment::new(Vector2::new(x1, y1), Vector2::new(x2, y2)))
        .collect())
}

fn open_sheet(cfg: FinderConfig) -> Result<Sheet> {
    let mut sheet = Sheet::new();
    sheet.rebuild(cfg);
    let stats = sheet.wait().context("building the closure")?.stats();
    tracing::info!(
        points = stats.total_points(),
        lines = stats.total_lines(),
        truncated = stats.truncated,
        "closure"
    );
    Ok(sheet)
}

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn run(cmd: Cmd, out: &mut impl Write) -> Result<()> {
    let cfg = cmd.opts.resolve()?;
    match cmd.action {
        Action::ShowConfig => print_json(out, &cfg),
        Action::Stats => {
            let mut sheet = open_sheet(cfg)?;
            let closure = sheet.wait()?;
            print_json(out, closure.stats())
        }
        Action::Points { x, y } => {
            let mut sheet = open_sheet(cfg)?;
            let matches = sheet.find_matching_points(x, y)?;
            let store = sheet.wait()?.store();
            let rows: Vec<PointOut> = matches
                .iter()
                .map(|m| PointOut {
                    id: m.id.0,
                    x: m.point.x,
                    y: m.point.y,
                    rank: m.rank,
                    derivation: point_derivation(store, m.id),
                    distance_error: m.distance_error,
                })
                .collect();
            tracing::info!(x, y, found = rows.len(), "points");
            print_json(out, &rows)
        }
        Action::Lines { x1, y1, x2, y2 } => {
            let target = Line::through(Vector2::new(x1, y1), Vector2::new(x2, y2))
                .context("the two points coincide")?;
            let mut sheet = open_sheet(cfg)?;
            let matches = sheet.find_matching_lines(&target)?;
            let store = sheet.wait()?.store();
            let rows: Vec<LineOut> = matches
                .iter()
                .map(|m| LineOut {
                    id: m.id.0,
                    equation: m.line.to_string(),
                    rank: m.rank,
                    derivation: line_derivation(store, m.id),
                    shift_error: m.shift_error,
                    angle_error: m.angle_error,
                })
                .collect();
            tracing::info!(line = %target, found = rows.len(), "lines");
            print_json(out, &rows)
        }
        Action::Fold {
            x,
            y,
            x2,
            y2,
            segments,
            out: out_path,
        } => {
            let mut sheet = open_sheet(cfg)?;
            if let Some(path) = &segments {
                sheet.set_detected_segments(read_segments(path)?);
            }
            let target: Option<RefId> = match (x2, y2) {
                (Some(x2), Some(y2)) => {
                    let line = Line::through(Vector2::new(x, y), Vector2::new(x2, y2))
                        .context("the two points coincide")?;
                    sheet.find_matching_lines(&line)?.first().map(|m| m.id.into())
                }
                _ => sheet.find_matching_points(x, y)?.first().map(|m| m.id.into()),
            };
            let target = target.context("no reference within tolerance of the target")?;
            let count = sheet.build_instructions(target)?.len();
            let described = sheet.wait()?.store().describe(target);
            tracing::info!(reference = %described, steps = count, "fold");
            let doc = json!({
                "target": described,
                "steps": sheet.rendered_steps(),
            });

            let Some(path) = out_path else {
                return print_json(out, &doc);
            };
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            fs::write(&path, serde_json::to_vec_pretty(&doc)?)
                .with_context(|| format!("writing {}", path.display()))?;
            let payload = provenance::Payload::new(
                "fold",
                json!({ "x": x, "y": y, "x2": x2, "y2": y2, "segments": segments }),
            )
            .with_config(serde_json::to_value(cfg)?);
            let sidecar = provenance::write_sidecar(&path, payload)?;
            tracing::info!(out = %path.display(), sidecar = %sidecar.display(), "wrote");
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    let stdout = std::io::stdout();
    run(cmd, &mut stdout.lock())
}
