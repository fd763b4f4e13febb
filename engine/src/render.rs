use geodesy::Geodetic;

use crate::{
    scene::{LabelPlacement, OverlayKind, OverlayScene, Style},
    session::{MeasureMode, MeasureResult, Session},
};

/// Projects a session snapshot onto the scene.
///
/// Stale entities are dropped wholesale and the scene is regenerated, so
/// the visuals always match the snapshot exactly and nothing survives a
/// state transition by accident.
pub(crate) fn sync(scene: &mut OverlayScene, session: &Session, preview: Option<&Geodetic>) {
    scene.clear();

    for &position in session.points() {
        scene.spawn(OverlayKind::Marker { position }, Style::Final);
    }

    match session {
        Session::Idle => {}
        Session::Collecting {
            mode: MeasureMode::Distance,
            points,
        } => {
            if let (&[fixed], Some(&cursor)) = (points.as_slice(), preview) {
                preview_line(scene, fixed, cursor);
            }
        }
        Session::Collecting {
            mode: MeasureMode::Area,
            points,
        } => {
            if points.len() >= 2 {
                scene.spawn(
                    OverlayKind::Polygon {
                        ring: points.clone(),
                    },
                    Style::Preview,
                );
            }
        }
        Session::Locked {
            result: MeasureResult::Distance(measure),
            ..
        } => {
            scene.spawn(
                OverlayKind::Line {
                    from: measure.from,
                    to: measure.to,
                },
                Style::Final,
            );
            scene.spawn(
                OverlayKind::Label {
                    anchor: measure.midpoint,
                    text: format!("{:.2} m", measure.meters),
                    rotation_deg: measure.rotation_deg,
                    placement: LabelPlacement::Above,
                },
                Style::Final,
            );
            scene.spawn(
                OverlayKind::Label {
                    anchor: measure.midpoint,
                    text: format!("{:.2} ft", measure.feet),
                    rotation_deg: measure.rotation_deg,
                    placement: LabelPlacement::Below,
                },
                Style::Final,
            );
        }
        Session::Locked {
            result: MeasureResult::Area(measure),
            ..
        } => {
            scene.spawn(
                OverlayKind::Polygon {
                    ring: measure.ring.clone(),
                },
                Style::Final,
            );
            scene.spawn(
                OverlayKind::Label {
                    anchor: measure.centroid,
                    text: format!(
                        "{:.2} m\u{b2} ({:.2} ft\u{b2})",
                        measure.square_meters, measure.square_feet
                    ),
                    rotation_deg: 0.0,
                    placement: LabelPlacement::Center,
                },
                Style::Final,
            );
        }
    }
}

fn preview_line(scene: &mut OverlayScene, fixed: Geodetic, cursor: Geodetic) {
    let meters = geodesy::distance_meters(fixed, cursor);
    let rotation_deg = geodesy::label_rotation(geodesy::initial_bearing(fixed, cursor));
    scene.spawn(
        OverlayKind::Line {
            from: fixed,
            to: cursor,
        },
        Style::Preview,
    );
    scene.spawn(
        OverlayKind::Label {
            anchor: geodesy::midpoint(fixed, cursor),
            text: format!("{meters:.2} m"),
            rotation_deg,
            placement: LabelPlacement::Above,
        },
        Style::Preview,
    );
}
