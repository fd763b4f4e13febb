use geodesy::Geodetic;

use crate::{error::Notice, session::MeasureMode, MeasureEngine};

/// Host-facing interaction messages. Picks and cursor positions are
/// optional because the viewer may fail to intersect the globe; an absent
/// position is a no-op, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureEvent {
    Start { mode: MeasureMode },
    Pick { position: Option<Geodetic> },
    Cursor { position: Option<Geodetic> },
    FinalizeArea,
    Clear,
    Cancel,
}

pub trait EventConsumer {
    fn on_event(&mut self, event: MeasureEvent) -> Option<Notice>;
}

impl EventConsumer for MeasureEngine {
    fn on_event(&mut self, event: MeasureEvent) -> Option<Notice> {
        match event {
            MeasureEvent::Start { mode } => {
                self.start_measurement(mode);
                None
            }
            MeasureEvent::Pick { position } => self.add_point(position),
            MeasureEvent::Cursor { position } => {
                self.update_preview(position);
                None
            }
            MeasureEvent::FinalizeArea => self.finalize_area(),
            MeasureEvent::Clear => {
                self.clear_measurements();
                None
            }
            MeasureEvent::Cancel => {
                self.cancel_measurement();
                None
            }
        }
    }
}
