use glam::Vec3;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, log_report, LoggingInstantiator};

/// A ridge that rises steeply along +x.
fn ridge(x: f32, z: f32) -> f32 {
    let ramp = (x / 3.0).clamp(0.0, 1.0);
    ramp * ramp * 6.0 + (z * 0.3).sin() * 0.2
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut terrain = HeightfieldSurface::from_fn(Vec3::new(-16.0, 0.0, -16.0), 0.25, 129, 129, ridge)?;
    let library = AssetLibrary::new().with_set(AssetSet::new("shrubs").with_entry("props/shrub", 1.0));
    let config = BrushConfig::new(4.0, 64)
        .with_max_slope_degrees(35.0)
        .with_display_slope_degrees(20.0);

    let mut session = PlacementSession::new(config, library, 7);
    let mut instantiator = LoggingInstantiator::new();
    let mut events = VecSink::new();

    let hover = InputEvent::PointerMoved {
        ray: Ray::new(Vec3::new(1.0, 30.0, 0.0), Vec3::NEG_Y),
        view_up: Vec3::Z,
    };
    let mut target = CommitTarget::new(&mut instantiator);
    session.update_with_events(&[hover], &mut terrain, &mut target, &mut events);

    let display = session.config().display_slope_degrees;
    let (mut flat, mut tinted, mut steep, mut missed) = (0, 0, 0, 0);
    for result in session.results() {
        match result.surface {
            None => missed += 1,
            Some(_) if !result.commit_eligible => steep += 1,
            Some(surface) if surface.is_display_steep(display) => tinted += 1,
            Some(_) => flat += 1,
        }
    }
    println!("flat {flat}, tinted {tinted}, too steep {steep}, missed {missed}");

    let report = session.update_with_events(
        &[InputEvent::CommitKey],
        &mut terrain,
        &mut target,
        &mut events,
    );
    log_report("commit", &report);
    let max_slope = report
        .committed
        .iter()
        .map(|c| c.slope_degrees)
        .fold(0.0_f32, f32::max);
    println!("placed {} shrubs, steepest {:.1}°", report.committed.len(), max_slope);

    for event in events.as_slice() {
        println!("{event:?}");
    }
    Ok(())
}
