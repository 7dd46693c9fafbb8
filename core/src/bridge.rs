use crate::catalog::{overlay_placement, CatalogOverlay, GestureDescriptor, OverlayPlacement};
use crate::config::WidgetConfig;
use crate::dock::DockWidget;
use crate::holds::{Hold, Recognizer, RecognizerHolds};
use crate::trail::{ClearTicket, TrailRenderer, TrailSurface};
use crate::{DockOffset, Size, TouchSample, ViewportPoint};

/// Signals published on the recognizer's event bus.
#[derive(Clone, Debug, PartialEq)]
pub enum RecognizerEvent {
    GestureStart(Vec<TouchSample>),
    GestureMotion(Vec<TouchSample>),
    GestureEnd,
    Help,
}

impl RecognizerEvent {
    pub const NAMES: [&'static str; 4] = ["gesturestart", "gesturemotion", "gestureend", "HELP"];

    pub fn from_name(name: &str, touches: Vec<TouchSample>) -> Option<Self> {
        match name {
            "gesturestart" => Some(Self::GestureStart(touches)),
            "gesturemotion" => Some(Self::GestureMotion(touches)),
            "gestureend" => Some(Self::GestureEnd),
            "HELP" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Pointer phases observed on the dock element itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Host geometry sampled at the time an event is handled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub viewport: Size,
    pub container_width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionTicket(u64);

/// Effects the host applies to the page, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum HostCommand {
    /// Move the dock; `transition_ms` animates the move with ease-in-out.
    PlaceDock {
        offset: DockOffset,
        transition_ms: Option<u32>,
    },
    ClearDockTransition,
    ScheduleTransitionReset {
        ticket: TransitionTicket,
        delay_ms: u32,
    },
    ScheduleTrailClear {
        ticket: ClearTicket,
        delay_ms: u32,
    },
    ShowCatalog(OverlayPlacement),
    HideCatalog,
    SetDockVisible(bool),
}

/// Routes recognizer events and dock pointer input into the widget parts.
/// It is the only caller of the recognizer's `enable()`/`disable()`.
pub struct GestureEventBridge<R, S> {
    recognizer: R,
    holds: RecognizerHolds,
    trail: TrailRenderer<S>,
    dock: DockWidget,
    catalog: CatalogOverlay,
    transition_generation: u64,
    transition_pending: Option<TransitionTicket>,
    trail_clear_delay_ms: u32,
    snap_duration_ms: u32,
}

impl<R: Recognizer, S: TrailSurface> GestureEventBridge<R, S> {
    pub fn new(recognizer: R, surface: S, config: &WidgetConfig) -> Self {
        let side = config.side();
        Self {
            recognizer,
            holds: RecognizerHolds::default(),
            trail: TrailRenderer::new(surface, side),
            dock: DockWidget::new(
                config.initial_offset,
                Size::square(side),
                config.margin,
                config.drag,
                config.snap,
            ),
            catalog: CatalogOverlay::default(),
            transition_generation: 0,
            transition_pending: None,
            trail_clear_delay_ms: config.trail_clear_delay_ms,
            snap_duration_ms: config.snap_duration_ms,
        }
    }

    pub fn dock(&self) -> &DockWidget {
        &self.dock
    }

    pub fn trail(&self) -> &TrailRenderer<S> {
        &self.trail
    }

    pub fn catalog(&self) -> &CatalogOverlay {
        &self.catalog
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub fn handle_event(&mut self, event: RecognizerEvent, metrics: Metrics) -> Vec<HostCommand> {
        match event {
            RecognizerEvent::GestureStart(touches) | RecognizerEvent::GestureMotion(touches) => {
                if metrics.viewport.is_degenerate() {
                    log::warn!(
                        "dropping {} touch samples, viewport is {:?}",
                        touches.len(),
                        metrics.viewport
                    );
                    return Vec::new();
                }
                self.trail.on_samples(&touches, metrics.viewport);
                Vec::new()
            }
            RecognizerEvent::GestureEnd => {
                let ticket = self.trail.on_gesture_end();
                vec![HostCommand::ScheduleTrailClear {
                    ticket,
                    delay_ms: self.trail_clear_delay_ms,
                }]
            }
            RecognizerEvent::Help => self.show_catalog(metrics),
        }
    }

    pub fn handle_contact(
        &mut self,
        phase: ContactPhase,
        point: ViewportPoint,
        metrics: Metrics,
    ) -> Vec<HostCommand> {
        if !self.dock.is_visible() || !self.dock.is_drag_enabled() {
            return Vec::new();
        }
        match phase {
            ContactPhase::Start => self.begin_drag(point),
            ContactPhase::Move => match self.dock.drag_to(point) {
                Some(offset) => vec![HostCommand::PlaceDock {
                    offset,
                    transition_ms: None,
                }],
                None => Vec::new(),
            },
            ContactPhase::End => self.end_drag(metrics),
            ContactPhase::Cancel => {
                if self.dock.cancel_drag() {
                    self.holds.release(Hold::Drag, &mut self.recognizer);
                }
                Vec::new()
            }
        }
    }

    fn begin_drag(&mut self, point: ViewportPoint) -> Vec<HostCommand> {
        if !self.dock.begin_drag(point) {
            return Vec::new();
        }
        log::debug!("drag started at {point:?}");
        self.holds.acquire(Hold::Drag, &mut self.recognizer);
        let mut commands = Vec::new();
        if self.transition_pending.take().is_some() {
            commands.push(HostCommand::ClearDockTransition);
        }
        commands.extend(self.hide_catalog());
        commands
    }

    fn end_drag(&mut self, metrics: Metrics) -> Vec<HostCommand> {
        let Some(release) = self.dock.end_drag(metrics.viewport) else {
            return Vec::new();
        };
        log::debug!("drag released {release:?}");
        let mut commands = Vec::new();
        if release.snapped {
            self.transition_generation += 1;
            let ticket = TransitionTicket(self.transition_generation);
            self.transition_pending = Some(ticket);
            commands.push(HostCommand::PlaceDock {
                offset: release.offset,
                transition_ms: Some(self.snap_duration_ms),
            });
            commands.push(HostCommand::ScheduleTransitionReset {
                ticket,
                delay_ms: self.snap_duration_ms,
            });
        }
        if release.tapped {
            // Catalog hold is taken before the drag hold goes, so the
            // recognizer is not re-enabled in between.
            commands.extend(self.show_catalog(metrics));
        }
        self.holds.release(Hold::Drag, &mut self.recognizer);
        commands
    }

    /// Clears the trail if `ticket` is still the latest gesture end.
    pub fn finish_trail_clear(&mut self, ticket: ClearTicket) -> bool {
        self.trail.finish_clear(ticket)
    }

    pub fn finish_transition(&mut self, ticket: TransitionTicket) -> Vec<HostCommand> {
        if self.transition_pending != Some(ticket) {
            return Vec::new();
        }
        self.transition_pending = None;
        vec![HostCommand::ClearDockTransition]
    }

    pub fn show_catalog(&mut self, metrics: Metrics) -> Vec<HostCommand> {
        if !self.catalog.set_visible(true) {
            return Vec::new();
        }
        self.holds.acquire(Hold::Catalog, &mut self.recognizer);
        let placement = overlay_placement(self.dock.rect(), metrics.container_width);
        log::debug!("catalog shown {placement:?}");
        vec![HostCommand::ShowCatalog(placement)]
    }

    pub fn hide_catalog(&mut self) -> Vec<HostCommand> {
        if !self.catalog.set_visible(false) {
            return Vec::new();
        }
        self.holds.release(Hold::Catalog, &mut self.recognizer);
        vec![HostCommand::HideCatalog]
    }

    pub fn show_dock(&mut self) -> Vec<HostCommand> {
        self.dock.set_visible(true);
        vec![HostCommand::SetDockVisible(true)]
    }

    pub fn hide_dock(&mut self) -> Vec<HostCommand> {
        if self.dock.cancel_drag() {
            self.holds.release(Hold::Drag, &mut self.recognizer);
        }
        self.dock.set_visible(false);
        vec![HostCommand::SetDockVisible(false)]
    }

    /// Stores loaded catalog entries, returning the ones to render.
    pub fn add_gestures(&mut self, descriptors: Vec<GestureDescriptor>) -> &[GestureDescriptor] {
        self.catalog.extend(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PanelSide;
    use crate::holds::tests::{Call, RecordingRecognizer};
    use crate::trail::tests::RecordingSurface;

    type TestBridge = GestureEventBridge<RecordingRecognizer, RecordingSurface>;

    fn metrics() -> Metrics {
        Metrics {
            viewport: Size::new(800.0, 400.0),
            container_width: 800.0,
        }
    }

    fn bridge() -> TestBridge {
        GestureEventBridge::new(
            RecordingRecognizer::default(),
            RecordingSurface::default(),
            &WidgetConfig::default(),
        )
    }

    fn at(x: f64, y: f64) -> ViewportPoint {
        ViewportPoint { x, y }
    }

    fn has_show(commands: &[HostCommand]) -> bool {
        commands
            .iter()
            .any(|command| matches!(command, HostCommand::ShowCatalog(_)))
    }

    #[test]
    fn test_path_off_dock_paints_without_moving_dock() {
        let mut bridge = bridge();
        let before = bridge.dock().offset();
        assert_eq!(before, DockOffset { x: 2.0, y: 60.0 });

        bridge.handle_event(
            RecognizerEvent::GestureStart(vec![TouchSample::new(0, 100.0, 100.0)]),
            metrics(),
        );
        bridge.handle_event(
            RecognizerEvent::GestureMotion(vec![TouchSample::new(0, 150.0, 100.0)]),
            metrics(),
        );
        bridge.handle_event(
            RecognizerEvent::GestureMotion(vec![TouchSample::new(0, 150.0, 150.0)]),
            metrics(),
        );

        let surface = bridge.trail().surface();
        assert_eq!(surface.dots(), 1);
        assert_eq!(surface.segments().len(), 2);
        assert_eq!(bridge.trail().active_touches(), 1);
        assert_eq!(bridge.dock().offset(), before);
        assert!(bridge.recognizer().calls.is_empty());
    }

    #[test]
    fn test_drag_to_right_edge_snaps_and_animates() {
        let mut bridge = bridge();
        let start = bridge.handle_contact(ContactPhase::Start, at(2.0, 60.0), metrics());
        assert!(start.is_empty());
        assert_eq!(bridge.recognizer().calls, vec![Call::Disable]);

        let moved = bridge.handle_contact(ContactPhase::Move, at(790.0, 60.0), metrics());
        assert_eq!(
            moved,
            vec![HostCommand::PlaceDock {
                offset: DockOffset { x: 790.0, y: 60.0 },
                transition_ms: None,
            }]
        );

        let end = bridge.handle_contact(ContactPhase::End, at(790.0, 60.0), metrics());
        assert_eq!(
            end[0],
            HostCommand::PlaceDock {
                offset: DockOffset { x: 738.0, y: 60.0 },
                transition_ms: Some(200),
            }
        );
        let HostCommand::ScheduleTransitionReset { ticket, delay_ms } = end[1] else {
            panic!("expected transition reset, got {end:?}");
        };
        assert_eq!(delay_ms, 200);
        assert!(!has_show(&end));
        assert_eq!(bridge.dock().offset().x, 738.0);
        assert_eq!(bridge.recognizer().calls, vec![Call::Disable, Call::Enable]);

        assert_eq!(
            bridge.finish_transition(ticket),
            vec![HostCommand::ClearDockTransition]
        );
        assert!(bridge.finish_transition(ticket).is_empty());
    }

    #[test]
    fn test_tap_opens_catalog_and_keeps_recognizer_off() {
        let mut bridge = bridge();
        bridge.handle_contact(ContactPhase::Start, at(20.0, 80.0), metrics());
        let end = bridge.handle_contact(ContactPhase::End, at(20.0, 80.0), metrics());

        assert!(has_show(&end));
        assert!(bridge.catalog().is_visible());
        assert_eq!(bridge.recognizer().calls, vec![Call::Disable]);

        let hide = bridge.hide_catalog();
        assert_eq!(hide, vec![HostCommand::HideCatalog]);
        assert_eq!(bridge.recognizer().calls, vec![Call::Disable, Call::Enable]);
    }

    #[test]
    fn test_gesture_end_after_tap_does_not_reopen() {
        let mut bridge = bridge();
        bridge.handle_contact(ContactPhase::Start, at(20.0, 80.0), metrics());
        bridge.handle_contact(ContactPhase::End, at(20.0, 80.0), metrics());

        let commands = bridge.handle_event(RecognizerEvent::GestureEnd, metrics());
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], HostCommand::ScheduleTrailClear { delay_ms: 10, .. }));
        assert_eq!(bridge.recognizer().calls, vec![Call::Disable]);
    }

    #[test]
    fn test_closed_catalog_stays_closed_after_later_gesture() {
        let mut bridge = bridge();
        bridge.handle_contact(ContactPhase::Start, at(20.0, 80.0), metrics());
        bridge.handle_contact(ContactPhase::End, at(20.0, 80.0), metrics());
        bridge.hide_catalog();

        bridge.handle_event(
            RecognizerEvent::GestureStart(vec![TouchSample::new(0, 300.0, 300.0)]),
            metrics(),
        );
        bridge.handle_event(
            RecognizerEvent::GestureMotion(vec![TouchSample::new(0, 400.0, 300.0)]),
            metrics(),
        );
        let commands = bridge.handle_event(RecognizerEvent::GestureEnd, metrics());

        assert!(!has_show(&commands));
        assert!(!bridge.catalog().is_visible());
        assert_eq!(bridge.recognizer().calls, vec![Call::Disable, Call::Enable]);
    }

    #[test]
    fn test_drag_disabled_dock_ignores_contacts() {
        let config = WidgetConfig {
            drag: false,
            ..WidgetConfig::default()
        };
        let mut bridge = GestureEventBridge::new(
            RecordingRecognizer::default(),
            RecordingSurface::default(),
            &config,
        );
        for phase in [ContactPhase::Start, ContactPhase::Move, ContactPhase::End] {
            assert!(bridge
                .handle_contact(phase, at(20.0, 80.0), metrics())
                .is_empty());
        }

        assert!(!bridge.dock().is_dragging());
        assert!(!bridge.catalog().is_visible());
        assert_eq!(bridge.dock().offset(), DockOffset { x: 2.0, y: 60.0 });
        assert!(bridge.recognizer().calls.is_empty());
        assert!(has_show(&bridge.handle_event(RecognizerEvent::Help, metrics())));
    }

    #[test]
    fn test_place_dock_commands_follow_every_offset_change() {
        let mut bridge = bridge();
        let mut placed = bridge.dock().offset();
        let contacts = [
            (ContactPhase::Start, at(20.0, 80.0)),
            (ContactPhase::Move, at(300.0, 120.0)),
            (ContactPhase::Move, at(650.0, 90.0)),
            (ContactPhase::End, at(650.0, 90.0)),
            (ContactPhase::Start, at(760.0, 80.0)),
            (ContactPhase::Move, at(100.0, 300.0)),
            (ContactPhase::Cancel, at(100.0, 300.0)),
        ];
        for (phase, point) in contacts {
            for command in bridge.handle_contact(phase, point, metrics()) {
                if let HostCommand::PlaceDock { offset, .. } = command {
                    placed = offset;
                }
            }
            assert_eq!(placed, bridge.dock().offset());
        }
    }

    #[test]
    fn test_help_opens_catalog_next_to_dock() {
        let mut bridge = bridge();
        let commands = bridge.handle_event(RecognizerEvent::Help, metrics());
        let [HostCommand::ShowCatalog(placement)] = commands.as_slice() else {
            panic!("expected a single show, got {commands:?}");
        };
        assert_eq!(placement.side, PanelSide::Right);
        assert_eq!(placement.top, 60.0);
        assert!(bridge.handle_event(RecognizerEvent::Help, metrics()).is_empty());
        assert_eq!(bridge.recognizer().calls, vec![Call::Disable]);
    }

    #[test]
    fn test_drag_start_hides_open_catalog() {
        let mut bridge = bridge();
        bridge.handle_event(RecognizerEvent::Help, metrics());
        let start = bridge.handle_contact(ContactPhase::Start, at(20.0, 80.0), metrics());

        assert_eq!(start, vec![HostCommand::HideCatalog]);
        assert!(!bridge.catalog().is_visible());
        bridge.handle_contact(ContactPhase::Move, at(300.0, 200.0), metrics());
        bridge.handle_contact(ContactPhase::End, at(300.0, 200.0), metrics());

        bridge.recognizer().assert_paired();
        assert_eq!(bridge.recognizer().calls, vec![Call::Disable, Call::Enable]);
    }

    #[test]
    fn test_new_drag_drops_stale_transition_reset() {
        let mut bridge = bridge();
        bridge.handle_contact(ContactPhase::Start, at(2.0, 60.0), metrics());
        bridge.handle_contact(ContactPhase::Move, at(500.0, 60.0), metrics());
        let end = bridge.handle_contact(ContactPhase::End, at(500.0, 60.0), metrics());
        let HostCommand::ScheduleTransitionReset { ticket, .. } = end[1] else {
            panic!("expected transition reset, got {end:?}");
        };

        let start = bridge.handle_contact(ContactPhase::Start, at(760.0, 80.0), metrics());
        assert_eq!(start, vec![HostCommand::ClearDockTransition]);
        assert!(bridge.finish_transition(ticket).is_empty());
    }

    #[test]
    fn test_stale_trail_clear_is_ignored_after_new_gesture() {
        let mut bridge = bridge();
        bridge.handle_event(
            RecognizerEvent::GestureStart(vec![TouchSample::new(1, 10.0, 10.0)]),
            metrics(),
        );
        let end = bridge.handle_event(RecognizerEvent::GestureEnd, metrics());
        let HostCommand::ScheduleTrailClear { ticket, .. } = end[0] else {
            panic!("expected trail clear, got {end:?}");
        };
        bridge.handle_event(
            RecognizerEvent::GestureStart(vec![TouchSample::new(2, 40.0, 40.0)]),
            metrics(),
        );

        assert!(!bridge.finish_trail_clear(ticket));
        assert_eq!(bridge.trail().active_touches(), 1);
    }

    #[test]
    fn test_degenerate_viewport_drops_samples() {
        let mut bridge = bridge();
        let flat = Metrics {
            viewport: Size::new(0.0, 400.0),
            container_width: 0.0,
        };
        bridge.handle_event(
            RecognizerEvent::GestureStart(vec![TouchSample::new(1, 10.0, 10.0)]),
            flat,
        );
        assert!(bridge.trail().surface().strokes.is_empty());
    }

    #[test]
    fn test_cancel_and_hide_release_drag_hold() {
        let mut bridge = bridge();
        bridge.handle_contact(ContactPhase::Start, at(20.0, 80.0), metrics());
        bridge.handle_contact(ContactPhase::Cancel, at(20.0, 80.0), metrics());
        assert!(!bridge.dock().is_dragging());

        bridge.handle_contact(ContactPhase::Start, at(20.0, 80.0), metrics());
        assert_eq!(bridge.hide_dock(), vec![HostCommand::SetDockVisible(false)]);
        assert!(bridge
            .handle_contact(ContactPhase::End, at(20.0, 80.0), metrics())
            .is_empty());

        bridge.recognizer().assert_paired();
        assert_eq!(bridge.recognizer().calls.len(), 4);
        assert_eq!(bridge.show_dock(), vec![HostCommand::SetDockVisible(true)]);
    }

    #[test]
    fn test_enable_disable_pair_across_interleavings() {
        #[derive(Clone, Copy)]
        enum Step {
            Press,
            Drag,
            Release,
            Help,
            Hide,
            End,
        }
        let steps = [
            Step::Press,
            Step::Drag,
            Step::Release,
            Step::Help,
            Step::Hide,
            Step::End,
        ];
        for code in 0..steps.len().pow(5) {
            let mut bridge = bridge();
            let mut rest = code;
            for _ in 0..5 {
                match steps[rest % steps.len()] {
                    Step::Press => {
                        bridge.handle_contact(ContactPhase::Start, at(20.0, 80.0), metrics());
                    }
                    Step::Drag => {
                        bridge.handle_contact(ContactPhase::Move, at(400.0, 200.0), metrics());
                    }
                    Step::Release => {
                        bridge.handle_contact(ContactPhase::End, at(400.0, 200.0), metrics());
                    }
                    Step::Help => {
                        bridge.handle_event(RecognizerEvent::Help, metrics());
                    }
                    Step::Hide => {
                        bridge.hide_catalog();
                    }
                    Step::End => {
                        bridge.handle_event(RecognizerEvent::GestureEnd, metrics());
                    }
                }
                rest /= steps.len();
                let held = bridge.dock().is_dragging() || bridge.catalog().is_visible();
                assert_eq!(bridge.recognizer().enabled(), !held);
            }
            bridge.handle_contact(ContactPhase::End, at(400.0, 200.0), metrics());
            bridge.hide_catalog();
            bridge.recognizer().assert_paired();
            assert!(bridge.recognizer().enabled());
        }
    }
}
