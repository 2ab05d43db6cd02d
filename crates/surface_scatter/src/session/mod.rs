//! Event-driven placement session.
//!
//! A [`PlacementSession`] owns the brush config, the asset library, the sample set and a
//! seeded generator. The host feeds it one ordered batch of [`InputEvent`]s per cycle
//! through [`PlacementSession::update`]; each cycle runs the same fixed phases:
//!
//! 1. pointer events (remember the pointer ray, request a redraw)
//! 2. scroll events (resize the brush while hovering)
//! 3. commit and refresh requests (recorded, samples resized or regenerated)
//! 4. layout raycast from the pointer, new [`TangentFrame`], state transition
//! 5. projection of every sample, then materialization of a pending commit
//!
//! The phases run in this order regardless of the order of events in the batch, so no
//! event observes a half-updated cycle.
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::brush::assets::{AssetLibrary, AssetSet};
use crate::brush::{BrushConfig, MIN_RADIUS};
use crate::geometry::frame::TangentFrame;
use crate::geometry::Ray;
use crate::projection::{PlacementResult, SpatialQuery, SurfaceProjector};
use crate::sampling::samples::{PlacementSample, SampleGenerator};

pub mod commit;
pub mod events;

use commit::{commit_results, CommitTarget, CommittedInstance, Instantiator};
use events::{EventSink, SessionEvent};

/// Resting states of the brush. Committing is an action, not a state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No pointer over the viewport, or the brush is hidden.
    #[default]
    Idle,
    /// The pointer is over a surface matching the brush mask.
    HoveringValid,
    /// The pointer is over nothing usable.
    HoveringInvalid,
}

impl SessionState {
    pub fn is_hovering(self) -> bool {
        matches!(self, Self::HoveringValid | Self::HoveringInvalid)
    }

    /// State after a layout raycast.
    pub fn after_raycast(self, surface_hit: bool) -> Self {
        if surface_hit {
            Self::HoveringValid
        } else {
            Self::HoveringInvalid
        }
    }

    /// State after the pointer left the viewport or the brush was hidden.
    pub fn after_pointer_left(self) -> Self {
        Self::Idle
    }
}

/// Input consumed by [`PlacementSession::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// The pointer moved; `ray` is the world-space pick ray, `view_up` the viewer's up
    /// vector used as the tangent frame reference.
    PointerMoved { ray: Ray, view_up: Vec3 },
    /// The pointer left the viewport.
    PointerLeft,
    /// Scroll wheel; `modifier` is true when a modifier key was held.
    Scroll { delta: f32, modifier: bool },
    /// The commit key was released.
    CommitKey,
    /// Discard and regenerate every sample.
    Refresh,
}

/// What one cycle did.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport<H> {
    pub state: SessionState,
    /// The host should repaint the viewport.
    pub redraw: bool,
    /// A scroll event was used to resize the brush.
    pub scroll_consumed: bool,
    /// A commit key was seen (consumed even when nothing was placed).
    pub commit_consumed: bool,
    pub committed: Vec<CommittedInstance<H>>,
    /// Commit-eligible samples skipped because no asset was available.
    pub skipped: usize,
}

impl<H> CycleReport<H> {
    fn new(state: SessionState) -> Self {
        Self {
            state,
            redraw: false,
            scroll_consumed: false,
            commit_consumed: false,
            committed: Vec::new(),
            skipped: 0,
        }
    }
}

/// The placement state machine and the single owner of brush state.
pub struct PlacementSession<R: Rng = StdRng> {
    config: BrushConfig,
    library: AssetLibrary,
    generator: SampleGenerator,
    rng: R,
    state: SessionState,
    pointer: Option<(Ray, Vec3)>,
    frame: Option<TangentFrame>,
    results: Vec<PlacementResult>,
    outline: Vec<Vec3>,
    pending_commit: bool,
    /// Events raised by host commands, delivered at the start of the next cycle.
    queued: Vec<SessionEvent>,
}

impl PlacementSession<StdRng> {
    /// Creates a session whose samples replay deterministically from `seed`.
    pub fn new(config: BrushConfig, library: AssetLibrary, seed: u64) -> Self {
        Self::with_rng(config, library, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PlacementSession<R> {
    pub fn with_rng(config: BrushConfig, library: AssetLibrary, mut rng: R) -> Self {
        let config = config.sanitized();
        let mut generator = SampleGenerator::new();
        generator.generate_or_resize(config.spawn_count, true, library.active(), &mut rng);
        Self {
            config,
            library,
            generator,
            rng,
            state: SessionState::Idle,
            pointer: None,
            frame: None,
            results: Vec::new(),
            outline: Vec::new(),
            pending_commit: false,
            queued: Vec::new(),
        }
    }

    pub fn config(&self) -> &BrushConfig {
        &self.config
    }

    /// Replaces the brush config. Radius and spawn count are clamped; a new spawn count
    /// resizes the sample set without disturbing existing samples.
    pub fn set_config(&mut self, config: BrushConfig) {
        let radius = self.config.radius;
        self.config = config.sanitized();
        if self.config.radius != radius {
            self.queue_radius_changed();
        }
        self.sync_samples(false, &mut ());
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Frame of the last successful layout raycast.
    pub fn frame(&self) -> Option<&TangentFrame> {
        self.frame.as_ref()
    }

    /// Per-sample results of the last layout pass, in sample order.
    pub fn results(&self) -> &[PlacementResult] {
        &self.results
    }

    /// Projected footprint outline of the last layout pass.
    pub fn outline(&self) -> &[Vec3] {
        &self.outline
    }

    pub fn samples(&self) -> &[PlacementSample] {
        self.generator.samples()
    }

    pub fn library(&self) -> &AssetLibrary {
        &self.library
    }

    /// Mutable access for editing sets and weights. Existing samples keep their asset
    /// indices; call [`PlacementSession::request_refresh`] to redraw them.
    pub fn library_mut(&mut self) -> &mut AssetLibrary {
        &mut self.library
    }

    pub fn active_assets(&self) -> Option<&AssetSet> {
        self.library.active()
    }

    /// Switches the active asset set and redraws every sample's asset index.
    pub fn select_asset_set(&mut self, index: usize) -> bool {
        if !self.library.select(index) {
            return false;
        }
        self.generator
            .reassign_assets(self.library.active(), &mut self.rng);
        true
    }

    /// Adds `delta` to the radius, clamped to [`MIN_RADIUS`]. Returns the new radius.
    pub fn adjust_radius(&mut self, delta: f32) -> f32 {
        if delta.is_finite() {
            let radius = (self.config.radius + delta).max(MIN_RADIUS);
            if radius != self.config.radius {
                self.config.radius = radius;
                self.queue_radius_changed();
            }
        }
        self.config.radius
    }

    /// Queues a commit for the next cycle.
    pub fn request_commit(&mut self) {
        self.pending_commit = true;
    }

    /// Regenerates all samples now. Results follow on the next cycle.
    pub fn request_refresh(&mut self) {
        self.sync_samples(true, &mut ());
        self.queued.push(SessionEvent::SamplesRegenerated {
            count: self.config.spawn_count,
        });
    }

    fn queue_radius_changed(&mut self) {
        self.queued.push(SessionEvent::RadiusChanged {
            radius: self.config.radius,
        });
    }

    /// Runs one cycle over `events`.
    pub fn update<Q, I>(
        &mut self,
        events: &[InputEvent],
        query: &mut Q,
        target: &mut CommitTarget<'_, I>,
    ) -> CycleReport<I::Handle>
    where
        Q: SpatialQuery + ?Sized,
        I: Instantiator + ?Sized,
    {
        self.update_with_events(events, query, target, &mut ())
    }

    /// Runs one cycle over `events`, reporting what happened to `sink`.
    pub fn update_with_events<Q, I>(
        &mut self,
        events: &[InputEvent],
        query: &mut Q,
        target: &mut CommitTarget<'_, I>,
        sink: &mut dyn EventSink,
    ) -> CycleReport<I::Handle>
    where
        Q: SpatialQuery + ?Sized,
        I: Instantiator + ?Sized,
    {
        let mut report = CycleReport::new(self.state);
        for event in self.queued.drain(..) {
            sink.send(event);
        }

        // Pointer.
        for event in events {
            match *event {
                InputEvent::PointerMoved { ray, view_up } => {
                    self.pointer = Some((ray, view_up));
                    report.redraw = true;
                }
                InputEvent::PointerLeft => {
                    self.pointer = None;
                    report.redraw = true;
                }
                _ => {}
            }
        }

        let refresh = events.iter().any(|e| matches!(e, InputEvent::Refresh));

        if !self.config.show_brush {
            // Refresh still applies while the brush is hidden.
            self.sync_samples(refresh, sink);
            self.pending_commit = false;
            self.set_state(self.state.after_pointer_left(), sink);
            self.clear_layout();
            report.state = self.state;
            return report;
        }

        // Scroll, gated on the state the cycle started in.
        if self.state.is_hovering() {
            for event in events {
                if let InputEvent::Scroll {
                    delta,
                    modifier: false,
                } = *event
                {
                    self.apply_scroll(delta, sink);
                    report.scroll_consumed = true;
                }
            }
        }

        // Commit and refresh requests.
        let commit = std::mem::take(&mut self.pending_commit)
            || events.iter().any(|e| matches!(e, InputEvent::CommitKey));
        report.commit_consumed = commit;
        self.sync_samples(refresh, sink);

        // Layout raycast and projection.
        self.layout(query, sink);
        report.redraw |= self.state != report.state;

        if commit {
            if self.state == SessionState::HoveringValid {
                let (placed, skipped) = commit_results(
                    &self.results,
                    self.generator.samples(),
                    self.library.active(),
                    target,
                    sink,
                );
                let origin = self.frame.map(|f| f.origin).unwrap_or(Vec3::ZERO);
                info!(
                    "Committed {} placements ({} skipped) at {}.",
                    placed.len(),
                    skipped,
                    origin
                );
                sink.send(SessionEvent::Committed {
                    placed: placed.len(),
                    skipped,
                    origin,
                });
                report.committed = placed;
                report.skipped = skipped;

                self.sync_samples(true, sink);
                self.project(query);
                report.redraw = true;
            } else {
                debug!("Commit ignored in state {:?}.", self.state);
            }
        }

        report.state = self.state;
        report
    }

    fn set_state(&mut self, next: SessionState, sink: &mut dyn EventSink) {
        if next == self.state {
            return;
        }
        debug!("Brush state {:?} -> {:?}.", self.state, next);
        sink.send(SessionEvent::StateChanged {
            from: self.state,
            to: next,
        });
        self.state = next;
    }

    fn apply_scroll(&mut self, delta: f32, sink: &mut dyn EventSink) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        let factor = 1.0 - delta.signum() * self.config.scroll_step;
        self.config.radius = (self.config.radius * factor).max(MIN_RADIUS);
        sink.send(SessionEvent::RadiusChanged {
            radius: self.config.radius,
        });
    }

    fn sync_samples(&mut self, refresh: bool, sink: &mut dyn EventSink) {
        let count = self.config.spawn_count;
        self.generator
            .generate_or_resize(count, refresh, self.library.active(), &mut self.rng);
        if refresh {
            sink.send(SessionEvent::SamplesRegenerated { count });
        }
    }

    fn clear_layout(&mut self) {
        self.frame = None;
        self.results.clear();
        self.outline.clear();
    }

    fn layout<Q: SpatialQuery + ?Sized>(&mut self, query: &mut Q, sink: &mut dyn EventSink) {
        let Some((ray, view_up)) = self.pointer else {
            self.set_state(self.state.after_pointer_left(), sink);
            self.clear_layout();
            return;
        };

        let mask = self.config.surface_mask;
        let hit = query
            .raycast(&ray, f32::INFINITY, mask)
            .filter(|h| mask.contains(h.category));
        let Some(hit) = hit else {
            self.set_state(self.state.after_raycast(false), sink);
            self.clear_layout();
            return;
        };

        let frame =
            match TangentFrame::from_up_with_fallbacks(hit.point, hit.normal, &[view_up, Vec3::X, Vec3::Z]) {
                Ok(frame) => frame,
                Err(err) => {
                    warn!("Brush frame unavailable this cycle: {}.", err);
                    sink.send(SessionEvent::Warning {
                        context: "frame".into(),
                        message: err.to_string(),
                    });
                    self.set_state(self.state.after_raycast(false), sink);
                    self.clear_layout();
                    return;
                }
            };

        self.frame = Some(frame);
        self.project(query);
        self.set_state(self.state.after_raycast(true), sink);
    }

    fn project<Q: SpatialQuery + ?Sized>(&mut self, query: &mut Q) {
        let Some(frame) = self.frame else {
            return;
        };
        self.results =
            SurfaceProjector::project_all(&frame, self.generator.samples(), &self.config, query);
        self.outline = SurfaceProjector::project_outline(
            &frame,
            &self.config,
            query,
            self.config.outline_segments,
        );
    }
}
