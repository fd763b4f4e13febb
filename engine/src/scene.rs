use std::collections::HashMap;

use geodesy::Geodetic;
use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OverlayId(u64);

impl std::fmt::Debug for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OverlayId")
            .field(&format!("{:#x}", self.0))
            .finish()
    }
}

impl OverlayId {
    fn generate() -> Self {
        // zero is reserved as the null id
        loop {
            let id = fastrand::u64(..);
            if id != 0 {
                return Self(id);
            }
        }
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Final,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPlacement {
    Above,
    Below,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OverlayKind {
    Marker {
        position: Geodetic,
    },
    Line {
        from: Geodetic,
        to: Geodetic,
    },
    Polygon {
        ring: Vec<Geodetic>,
    },
    Label {
        anchor: Geodetic,
        text: String,
        rotation_deg: f64,
        placement: LabelPlacement,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub id: OverlayId,
    pub style: Style,
    pub kind: OverlayKind,
}

/// Retained store of the transient visual entities owned by the active
/// measurement session. Spawn/remove counters are cumulative so hosts can
/// assert nothing leaked across state transitions.
#[derive(Debug, Default)]
pub struct OverlayScene {
    entities: slab::Slab<Overlay>,
    index: HashMap<OverlayId, usize>,
    spawned: u64,
    removed: u64,
}

impl OverlayScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, kind: OverlayKind, style: Style) -> OverlayId {
        let id = OverlayId::generate();
        let key = self.entities.insert(Overlay { id, style, kind });
        self.index.insert(id, key);
        self.spawned += 1;
        id
    }

    pub fn remove(&mut self, id: OverlayId) -> Option<Overlay> {
        let key = self.index.remove(&id)?;
        let overlay = self.entities.try_remove(key)?;
        self.removed += 1;
        Some(overlay)
    }

    pub fn clear(&mut self) {
        let ids: Vec<OverlayId> = self.index.keys().copied().collect();
        for id in ids {
            self.remove(id);
        }
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.index.get(&id).and_then(|key| self.entities.get(*key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.entities.iter().map(|(_, overlay)| overlay)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Overlay> {
        self.iter()
            .filter(|o| matches!(o.kind, OverlayKind::Marker { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &Overlay> {
        self.iter()
            .filter(|o| matches!(o.kind, OverlayKind::Line { .. }))
    }

    pub fn polygons(&self) -> impl Iterator<Item = &Overlay> {
        self.iter()
            .filter(|o| matches!(o.kind, OverlayKind::Polygon { .. }))
    }

    pub fn labels(&self) -> impl Iterator<Item = &Overlay> {
        self.iter()
            .filter(|o| matches!(o.kind, OverlayKind::Label { .. }))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Total entities ever spawned.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Total entities ever removed.
    pub fn removed(&self) -> u64 {
        self.removed
    }
}
