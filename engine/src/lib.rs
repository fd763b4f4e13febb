#[macro_use]
extern crate tracing;

pub mod error;
pub mod event;
mod render;
pub mod scene;
pub mod ser;
pub mod session;

pub use error::{ExportError, Notice};
pub use event::{EventConsumer, MeasureEvent};
pub use geodesy::Geodetic;
pub use scene::{LabelPlacement, Overlay, OverlayId, OverlayKind, OverlayScene, Style};
pub use session::{
    AreaMeasure, DistanceMeasure, MeasureMode, MeasureResult, Progress, Session,
};

/// Interactive distance/area measurement over a globe viewer.
///
/// The engine owns the session state machine, the live preview cursor and
/// the overlay scene, and keeps the scene in sync with the session after
/// every operation. All operations are synchronous; rejected ones leave the
/// last valid state untouched and only record a [`Notice`].
#[derive(Debug, Default)]
pub struct MeasureEngine {
    session: Session,
    preview: Option<Geodetic>,
    scene: OverlayScene,
    status: Option<Notice>,
}

impl MeasureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session, dropping any previous one.
    pub fn start_measurement(&mut self, mode: MeasureMode) {
        debug!(?mode, "starting measurement");
        self.session.start(mode);
        self.preview = None;
        self.status = None;
        self.sync();
    }

    /// Feeds a globe pick into the session. `None` means the viewer had no
    /// globe intersection for the click.
    pub fn add_point(&mut self, pick: Option<Geodetic>) -> Option<Notice> {
        let Some(position) = pick else {
            return self.reject(Notice::MissingViewerContext);
        };
        match self.session.add_point(position) {
            Ok(Progress::Added) => {
                debug!(lon = position.lon, lat = position.lat, "point added");
            }
            Ok(Progress::Locked) => {
                self.preview = None;
            }
            Err(notice) => return self.reject(notice),
        }
        self.status = None;
        self.sync();
        None
    }

    /// Tracks the cursor while exactly one distance point is fixed; any
    /// other state clears a stale preview instead.
    pub fn update_preview(&mut self, cursor: Option<Geodetic>) {
        let armed = matches!(
            &self.session,
            Session::Collecting {
                mode: MeasureMode::Distance,
                points,
            } if points.len() == 1
        );
        self.preview = match (armed, cursor) {
            (true, Some(position)) => Some(position),
            _ => None,
        };
        self.sync();
    }

    pub fn finalize_area(&mut self) -> Option<Notice> {
        match self.session.finalize_area() {
            Ok(()) => {
                self.preview = None;
                self.status = None;
                self.sync();
                None
            }
            Err(notice) => self.reject(notice),
        }
    }

    /// Removes every rendered entity and all collected points. An
    /// in-progress mode stays armed.
    pub fn clear_measurements(&mut self) {
        self.session.clear();
        self.preview = None;
        self.status = None;
        self.sync();
    }

    /// Total reset to idle, valid from any state.
    pub fn cancel_measurement(&mut self) {
        debug!("measurement cancelled");
        self.session.cancel();
        self.preview = None;
        self.status = None;
        self.sync();
    }

    pub fn mode(&self) -> Option<MeasureMode> {
        self.session.mode()
    }

    pub fn points(&self) -> &[Geodetic] {
        self.session.points()
    }

    pub fn result(&self) -> Option<&MeasureResult> {
        self.session.result()
    }

    pub fn scene(&self) -> &OverlayScene {
        &self.scene
    }

    /// Feedback from the last rejected operation, if any.
    pub fn status(&self) -> Option<Notice> {
        self.status
    }

    fn reject(&mut self, notice: Notice) -> Option<Notice> {
        warn!(%notice, "operation ignored");
        self.status = Some(notice);
        self.sync();
        Some(notice)
    }

    fn sync(&mut self) {
        render::sync(&mut self.scene, &self.session, self.preview.as_ref());
    }
}
