use glam::Vec3;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, LoggingInstantiator};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let library = AssetLibrary::new()
        .with_set(AssetSet::new("rocks").with_entry("props/rock", 1.0))
        .with_set(AssetSet::new("trees").with_entry("props/pine", 0.8).with_entry("props/oak", 0.2));
    let mut session = PlacementSession::new(BrushConfig::default(), library, 1234);
    let mut ground = PlaneSurface::horizontal(0.0);
    let mut instantiator = LoggingInstantiator::new();
    let mut target = CommitTarget::new(&mut instantiator);

    let mut events = Vec::new();
    let mut sink = FnSink::new(|event| events.push(event));

    let hover = InputEvent::PointerMoved {
        ray: Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y),
        view_up: Vec3::Z,
    };
    session.update_with_events(&[hover], &mut ground, &mut target, &mut sink);

    // Scroll down three notches: the brush shrinks by 5% each.
    let notch = InputEvent::Scroll {
        delta: 1.0,
        modifier: false,
    };
    session.update_with_events(&[notch, notch, notch], &mut ground, &mut target, &mut sink);
    println!("radius after scrolling: {:.4}", session.config().radius);

    // Growing the spawn count keeps the first samples in place.
    let before = session.samples().to_vec();
    session.set_config(session.config().clone().with_spawn_count(16));
    let kept = before
        .iter()
        .zip(session.samples())
        .filter(|(a, b)| a == b)
        .count();
    println!("kept {kept} of {} samples after growing to 16", before.len());

    session.select_asset_set(1);
    session.update_with_events(&[InputEvent::Refresh], &mut ground, &mut target, &mut sink);
    session.update_with_events(&[InputEvent::CommitKey], &mut ground, &mut target, &mut sink);
    drop(sink);

    for event in &events {
        println!("{event:?}");
    }
    for (asset, count) in instantiator.counts() {
        println!("{asset}: {count}");
    }
    Ok(())
}
