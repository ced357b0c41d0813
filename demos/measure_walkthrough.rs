//! Measurement and placement walkthrough
//!
//! Stages a session against the simulated tracker: a floor plane is
//! detected, two models are placed, a few distances are measured, and the
//! session is interrupted and resumed. Framework callbacks travel through the
//! event queue exactly as they would from a render thread.

use anyhow::Context;
use arscene_core::{Point3f, Transform3D, TriangleMesh, Vector3f};
use arscene_io::ModelLibrary;
use arscene_session::sim::SimulatedTracker;
use arscene_session::{
    channel, AppConfig, Control, FrameworkEvent, HitResult, HitTestKind, LimitedReason, MainQueue,
    PresentationAdapter, TrackingState,
};
use clap::Parser;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Walk through placing models and measuring distances")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the configured model paths are relative to. Without it,
    /// placeholder boxes stand in for the models.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Measurement points as x,y,z triples (meters)
    #[arg(long = "point", value_parser = parse_point)]
    points: Vec<Point3f>,
}

fn parse_point(text: &str) -> Result<Point3f, String> {
    let coords: Vec<f32> = text
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|e| format!("{}: {}", part, e)))
        .collect::<Result<_, _>>()?;
    match coords.as_slice() {
        [x, y, z] => Ok(Point3f::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {:?}", text)),
    }
}

/// Axis-aligned box standing in for a model asset
fn placeholder_box(size: f32) -> anyhow::Result<TriangleMesh> {
    let s = size / 2.0;
    let vertices = vec![
        Point3f::new(-s, 0.0, -s),
        Point3f::new(s, 0.0, -s),
        Point3f::new(s, 0.0, s),
        Point3f::new(-s, 0.0, s),
        Point3f::new(-s, size, -s),
        Point3f::new(s, size, -s),
        Point3f::new(s, size, s),
        Point3f::new(-s, size, s),
    ];
    let faces = vec![
        [0, 2, 1], [0, 3, 2],
        [4, 5, 6], [4, 6, 7],
        [0, 1, 5], [0, 5, 4],
        [1, 2, 6], [1, 6, 5],
        [2, 3, 7], [2, 7, 6],
        [3, 0, 4], [3, 4, 7],
    ];
    Ok(TriangleMesh::from_vertices_and_faces(vertices, faces)?)
}

fn pump(adapter: &mut PresentationAdapter<SimulatedTracker>, queue: &MainQueue) -> anyhow::Result<()> {
    while !queue.is_empty() {
        adapter.pump(queue, Instant::now())?;
    }
    Ok(())
}

/// Aim the reticle at a point on the floor and tap
fn tap_floor(
    adapter: &mut PresentationAdapter<SimulatedTracker>,
    queue: &MainQueue,
    at: Point3f,
) -> anyhow::Result<()> {
    let tracker = adapter.tracker_mut();
    tracker.clear_hits();
    tracker.set_hits(
        HitTestKind::ExistingPlaneUsingExtent,
        vec![HitResult {
            distance: at.coords.norm(),
            world_transform: Transform3D::at(at),
        }],
    );
    adapter.handle(FrameworkEvent::TouchConfirmed, Instant::now())?;
    pump(adapter, queue)
}

fn report(step: &str, adapter: &PresentationAdapter<SimulatedTracker>) {
    let presentation = adapter.presentation();
    info!(step, mode = %adapter.mode(), placed = adapter.registry().len(), "walkthrough step");
    println!("{}", step);
    println!("   mode:      {}", adapter.mode());
    println!("   placed:    {} nodes", adapter.registry().len());
    println!("   tracking:  {:?}", presentation.tracking());
    println!("   message:   {:?}", presentation.message());
    println!("   reticle:   {:?}", presentation.reticle());
    if presentation.distance().is_visible() {
        println!("   readout:   {}", presentation.distance().text());
    } else {
        println!("   readout:   (hidden)");
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path).with_context(|| format!("reading {}", path.display()))?,
        None => AppConfig::default(),
    };

    let models = match &args.assets {
        Some(dir) => {
            info!(assets = %dir.display(), "loading models");
            config.load_models(dir)?
        }
        None => {
            let mut models = ModelLibrary::new();
            models.insert(config.models.primary.id.clone(), placeholder_box(0.1)?);
            models.insert(config.models.secondary.id.clone(), placeholder_box(0.5)?);
            info!("no asset directory given, using placeholder boxes");
            models
        }
    };

    let points = if args.points.is_empty() {
        vec![
            Point3f::new(0.0, 0.0, -1.0),
            Point3f::new(1.5, 0.0, -1.0),
            Point3f::new(0.0, 0.0, -2.0),
        ]
    } else {
        args.points.clone()
    };

    println!("=== Measurement Walkthrough ===\n");

    let (events, queue) = channel();
    let tracker = SimulatedTracker::with_events(events.clone());
    let mut adapter = PresentationAdapter::new(tracker, config, models)?;
    adapter.start()?;

    adapter
        .tracker_mut()
        .set_tracking_state(Some(TrackingState::Limited(LimitedReason::Initializing)));
    events.send(FrameworkEvent::FrameAdvanced);
    pump(&mut adapter, &queue)?;
    report("1. Session started", &adapter);

    // The framework reports the floor from its own thread
    let floor_events = events.clone();
    adapter.tracker_mut().set_tracking_state(Some(TrackingState::Normal));
    adapter.tracker_mut().add_plane(
        Transform3D::identity(),
        Point3f::new(0.0, 0.0, -1.5),
        Vector3f::new(4.0, 0.0, 3.0),
    )?;
    thread::spawn(move || {
        floor_events.send(FrameworkEvent::FrameAdvanced);
    })
    .join()
    .map_err(|_| anyhow::anyhow!("render thread panicked"))?;
    pump(&mut adapter, &queue)?;
    report("2. Floor detected", &adapter);

    adapter.select(Control::PlaceModelA, Instant::now())?;
    tap_floor(&mut adapter, &queue, Point3f::new(-0.5, 0.0, -1.0))?;
    adapter.select(Control::PlaceModelB, Instant::now())?;
    tap_floor(&mut adapter, &queue, Point3f::new(0.5, 0.0, -2.0))?;
    report("3. Two models placed", &adapter);

    adapter.select(Control::Measure, Instant::now())?;
    for (i, point) in points.iter().enumerate() {
        tap_floor(&mut adapter, &queue, *point)?;
        report(
            &format!("4.{} Measured point ({:.2}, {:.2}, {:.2})", i + 1, point.x, point.y, point.z),
            &adapter,
        );
    }

    adapter.tracker_mut().interrupt();
    pump(&mut adapter, &queue)?;
    report("5. Session interrupted", &adapter);

    adapter.tracker_mut().end_interruption();
    pump(&mut adapter, &queue)?;
    report("6. Session resumed", &adapter);

    // Let the resume message run out before resetting
    thread::sleep(adapter.config().ui.message_duration() + Duration::from_millis(10));
    events.send(FrameworkEvent::FrameAdvanced);
    pump(&mut adapter, &queue)?;
    adapter.select(Control::Reset, Instant::now())?;
    report("7. Reset", &adapter);

    Ok(())
}
