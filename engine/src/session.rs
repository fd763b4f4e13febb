use geodesy::Geodetic;
use serde::{Deserialize, Serialize};

use crate::error::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureMode {
    Distance,
    Area,
}

/// Finalized two-point measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMeasure {
    pub from: Geodetic,
    pub to: Geodetic,
    pub meters: f64,
    pub feet: f64,
    pub bearing_deg: f64,
    pub rotation_deg: f64,
    pub midpoint: Geodetic,
}

/// Finalized polygon measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaMeasure {
    pub ring: Vec<Geodetic>,
    pub square_meters: f64,
    pub square_feet: f64,
    pub centroid: Geodetic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MeasureResult {
    Distance(DistanceMeasure),
    Area(AreaMeasure),
}

/// Measurement session state machine.
///
/// A session is either empty, collecting points for one mode, or locked
/// behind a finalized result. Point-count invariants are structural: a
/// distance session locks on its second valid point, so `Collecting` can
/// never hold an over-populated distance pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Idle,
    Collecting {
        mode: MeasureMode,
        points: Vec<Geodetic>,
    },
    Locked {
        points: Vec<Geodetic>,
        result: MeasureResult,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Added,
    Locked,
}

impl Session {
    /// Observable mode: `Some` only while collecting. A locked session
    /// reports `None` so further picks fall through as no-ops.
    pub fn mode(&self) -> Option<MeasureMode> {
        match self {
            Session::Collecting { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    pub fn points(&self) -> &[Geodetic] {
        match self {
            Session::Idle => &[],
            Session::Collecting { points, .. } | Session::Locked { points, .. } => points,
        }
    }

    pub fn result(&self) -> Option<&MeasureResult> {
        match self {
            Session::Locked { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Session::Locked { .. })
    }

    /// Drops whatever was in progress and starts collecting for `mode`.
    pub fn start(&mut self, mode: MeasureMode) {
        *self = Session::Collecting {
            mode,
            points: Vec::new(),
        };
    }

    pub fn add_point(&mut self, position: Geodetic) -> Result<Progress, Notice> {
        match self {
            Session::Idle | Session::Locked { .. } => Err(Notice::NoActiveSession),
            Session::Collecting {
                mode: MeasureMode::Area,
                points,
            } => {
                points.push(position);
                Ok(Progress::Added)
            }
            Session::Collecting {
                mode: MeasureMode::Distance,
                points,
            } => {
                if points.is_empty() {
                    points.push(position);
                    return Ok(Progress::Added);
                }

                let first = points[0];
                let meters = geodesy::distance_meters(first, position);
                if meters < geodesy::MIN_SEPARATION_METERS {
                    // Roll back: the first point stays, the pick is dropped.
                    return Err(Notice::DegenerateInput);
                }

                let bearing_deg = geodesy::initial_bearing(first, position);
                let result = MeasureResult::Distance(DistanceMeasure {
                    from: first,
                    to: position,
                    meters,
                    feet: geodesy::meters_to_feet(meters),
                    bearing_deg,
                    rotation_deg: geodesy::label_rotation(bearing_deg),
                    midpoint: geodesy::midpoint(first, position),
                });
                debug!(meters, bearing_deg, "distance pair locked");
                *self = Session::Locked {
                    points: vec![first, position],
                    result,
                };
                Ok(Progress::Locked)
            }
        }
    }

    pub fn finalize_area(&mut self) -> Result<(), Notice> {
        match self {
            Session::Collecting {
                mode: MeasureMode::Area,
                points,
            } if points.len() >= 3 => {
                let Some(centroid) = geodesy::ring_centroid(points) else {
                    return Err(Notice::NoActiveSession);
                };
                let ring = std::mem::take(points);
                let square_meters = geodesy::ring_area_square_meters(&ring);
                let result = MeasureResult::Area(AreaMeasure {
                    square_meters,
                    square_feet: geodesy::square_meters_to_square_feet(square_meters),
                    centroid,
                    ring: ring.clone(),
                });
                debug!(square_meters, vertices = ring.len(), "area locked");
                *self = Session::Locked {
                    points: ring,
                    result,
                };
                Ok(())
            }
            _ => Err(Notice::NoActiveSession),
        }
    }

    /// Unconditional reset, valid from any state.
    pub fn cancel(&mut self) {
        *self = Session::Idle;
    }

    /// Drops points and result but keeps an in-progress mode armed.
    pub fn clear(&mut self) {
        *self = match std::mem::take(self) {
            Session::Collecting { mode, .. } => Session::Collecting {
                mode,
                points: Vec::new(),
            },
            _ => Session::Idle,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> Geodetic {
        Geodetic::on_surface(148.0, -23.0)
    }

    fn b() -> Geodetic {
        Geodetic::on_surface(148.001, -23.0)
    }

    #[test]
    fn distance_pair_locks_and_reverts_mode() {
        let mut session = Session::default();
        session.start(MeasureMode::Distance);
        assert_eq!(session.mode(), Some(MeasureMode::Distance));

        assert_eq!(session.add_point(a()), Ok(Progress::Added));
        assert_eq!(session.add_point(b()), Ok(Progress::Locked));

        assert_eq!(session.mode(), None);
        assert!(session.is_locked());
        assert_eq!(session.points().len(), 2);

        let Some(MeasureResult::Distance(measure)) = session.result() else {
            panic!("expected a distance result");
        };
        assert!((measure.feet - measure.meters * geodesy::FEET_PER_METER).abs() < 0.01);
        assert!((measure.bearing_deg - 90.0).abs() < 0.1);
    }

    #[test]
    fn degenerate_second_point_rolls_back() {
        let mut session = Session::default();
        session.start(MeasureMode::Distance);
        session.add_point(a()).unwrap();

        let nearby = Geodetic::on_surface(148.0 + 1e-9, -23.0);
        assert_eq!(session.add_point(nearby), Err(Notice::DegenerateInput));

        assert_eq!(session.points(), &[a()]);
        assert_eq!(session.mode(), Some(MeasureMode::Distance));
        assert!(!session.is_locked());
    }

    #[test]
    fn picks_outside_a_session_are_rejected() {
        let mut session = Session::default();
        assert_eq!(session.add_point(a()), Err(Notice::NoActiveSession));

        session.start(MeasureMode::Distance);
        session.add_point(a()).unwrap();
        session.add_point(b()).unwrap();
        assert_eq!(session.add_point(a()), Err(Notice::NoActiveSession));
        assert_eq!(session.points().len(), 2);
    }

    #[test]
    fn area_needs_three_points_to_finalize() {
        let mut session = Session::default();
        assert_eq!(session.finalize_area(), Err(Notice::NoActiveSession));

        session.start(MeasureMode::Area);
        session.add_point(a()).unwrap();
        session.add_point(b()).unwrap();
        assert_eq!(session.finalize_area(), Err(Notice::NoActiveSession));
        assert_eq!(session.mode(), Some(MeasureMode::Area));

        session
            .add_point(Geodetic::on_surface(148.0, -22.999))
            .unwrap();
        assert_eq!(session.finalize_area(), Ok(()));
        assert!(session.is_locked());
        assert_eq!(session.mode(), None);

        let Some(MeasureResult::Area(measure)) = session.result() else {
            panic!("expected an area result");
        };
        let expected = 0.5 * 0.001 * 0.001 * geodesy::METERS_PER_DEGREE.powi(2);
        assert!((measure.square_meters - expected).abs() < 1e-6);
        assert!(
            (measure.square_feet - measure.square_meters * geodesy::SQUARE_FEET_PER_SQUARE_METER)
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn area_never_auto_locks() {
        let mut session = Session::default();
        session.start(MeasureMode::Area);
        for i in 0..6 {
            let p = Geodetic::on_surface(148.0 + f64::from(i) * 0.001, -23.0 + 0.0005);
            assert_eq!(session.add_point(p), Ok(Progress::Added));
        }
        assert_eq!(session.points().len(), 6);
        assert_eq!(session.mode(), Some(MeasureMode::Area));
    }

    #[test]
    fn cancel_is_total_from_any_state() {
        let mut session = Session::default();
        session.cancel();
        assert_eq!(session, Session::Idle);

        session.start(MeasureMode::Area);
        session.add_point(a()).unwrap();
        session.cancel();
        assert_eq!(session, Session::Idle);

        session.start(MeasureMode::Distance);
        session.add_point(a()).unwrap();
        session.add_point(b()).unwrap();
        session.cancel();
        assert_eq!(session, Session::Idle);
    }

    #[test]
    fn clear_keeps_an_armed_mode() {
        let mut session = Session::default();
        session.start(MeasureMode::Area);
        session.add_point(a()).unwrap();
        session.clear();
        assert_eq!(session.mode(), Some(MeasureMode::Area));
        assert!(session.points().is_empty());

        session.add_point(a()).unwrap();
        session.add_point(b()).unwrap();
        session
            .add_point(Geodetic::on_surface(148.0, -22.999))
            .unwrap();
        session.finalize_area().unwrap();
        session.clear();
        assert_eq!(session, Session::Idle);
    }
}
