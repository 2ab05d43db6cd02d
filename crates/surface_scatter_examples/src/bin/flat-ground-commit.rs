use glam::Vec3;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, log_report, log_results, LoggingInstantiator};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let library = AssetLibrary::new().with_set(
        AssetSet::new("meadow")
            .with_entry("props/grass_tuft", 0.6)
            .with_entry("props/flower", 0.3)
            .with_entry("props/stone", 0.1),
    );
    let config = BrushConfig::new(2.0, 8);
    config.validate()?;

    let mut session = PlacementSession::new(config, library, 42);
    let mut ground = PlaneSurface::horizontal(0.0);
    let mut instantiator = LoggingInstantiator::new();

    let hover = InputEvent::PointerMoved {
        ray: Ray::new(Vec3::new(3.0, 20.0, -1.0), Vec3::NEG_Y),
        view_up: Vec3::Z,
    };

    let mut target = CommitTarget::new(&mut instantiator);
    let report = session.update(&[hover], &mut ground, &mut target);
    log_report("hover", &report);
    log_results(session.results());

    let report = session.update(&[InputEvent::CommitKey], &mut ground, &mut target);
    log_report("commit", &report);

    // A second stroke at the same spot uses freshly drawn samples.
    let report = session.update(&[InputEvent::CommitKey], &mut ground, &mut target);
    log_report("commit again", &report);

    for (asset, count) in instantiator.counts() {
        println!("{asset}: {count}");
    }
    Ok(())
}
