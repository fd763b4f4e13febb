use thiserror::Error;

/// Non-fatal operation rejections.
///
/// These never propagate as panics or hard errors: the session stays in its
/// last valid state and the notice is surfaced as status feedback for the
/// host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Notice {
    #[error("points are closer than 1 cm apart, pick a more distant point")]
    DegenerateInput,
    #[error("no active measurement accepts this operation")]
    NoActiveSession,
    #[error("viewer returned no globe intersection")]
    MissingViewerContext,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write scene: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize scene: {0}")]
    GeoJson(#[from] geojson::Error),
}
