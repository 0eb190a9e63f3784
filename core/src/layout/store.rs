use crate::layout::position::{MarkerPosition, PercentPoint};
use crate::prelude::FlowResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Marker family a layout record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Gateway,
    Corridor,
}

/// Which of the two independent layouts is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Normal,
    Fullscreen,
}

/// Persisted marker layouts, one set per marker family and display mode.
///
/// The four sets never alias; dragging a marker in fullscreen leaves the
/// normal layout untouched and vice versa. The whole document is rewritten
/// on every mutation that gets saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionStore {
    #[serde(rename = "gatewayPositions")]
    gateway: Vec<MarkerPosition>,
    #[serde(rename = "gatewayPositionsFullscreen")]
    gateway_fullscreen: Vec<MarkerPosition>,
    #[serde(rename = "corridorPositions")]
    corridor: Vec<MarkerPosition>,
    #[serde(rename = "corridorPositionsFullscreen")]
    corridor_fullscreen: Vec<MarkerPosition>,
}

impl PositionStore {
    /// Default layout: 6 gateways and 12 upper corridor screens spread
    /// around the stadium bowl. Both display modes start identical.
    pub fn seeded() -> Self {
        let gateway = vec![
            MarkerPosition::new("1", 10.0, 20.0),
            MarkerPosition::new("2", 10.0, 75.0),
            MarkerPosition::new("3", 45.0, 5.0),
            MarkerPosition::new("4", 45.0, 90.0),
            MarkerPosition::new("5", 80.0, 20.0),
            MarkerPosition::new("6", 80.0, 75.0),
        ];
        let corridor_spots = [
            (15.0, 35.0),
            (15.0, 60.0),
            (30.0, 15.0),
            (30.0, 80.0),
            (45.0, 35.0),
            (45.0, 60.0),
            (60.0, 15.0),
            (60.0, 80.0),
            (75.0, 35.0),
            (75.0, 60.0),
            (90.0, 45.0),
            (5.0, 45.0),
        ];
        let corridor = corridor_spots
            .iter()
            .enumerate()
            .map(|(index, (top, left))| {
                let gate = index / 2 + 1;
                let panel = index % 2 + 1;
                MarkerPosition::new(format!("Upper_Gate_{gate}_{panel}"), *top, *left)
            })
            .collect::<Vec<_>>();

        Self {
            gateway_fullscreen: gateway.clone(),
            corridor_fullscreen: corridor.clone(),
            gateway,
            corridor,
        }
    }

    fn set(&self, kind: MarkerKind, mode: DisplayMode) -> &Vec<MarkerPosition> {
        match (kind, mode) {
            (MarkerKind::Gateway, DisplayMode::Normal) => &self.gateway,
            (MarkerKind::Gateway, DisplayMode::Fullscreen) => &self.gateway_fullscreen,
            (MarkerKind::Corridor, DisplayMode::Normal) => &self.corridor,
            (MarkerKind::Corridor, DisplayMode::Fullscreen) => &self.corridor_fullscreen,
        }
    }

    fn set_mut(&mut self, kind: MarkerKind, mode: DisplayMode) -> &mut Vec<MarkerPosition> {
        match (kind, mode) {
            (MarkerKind::Gateway, DisplayMode::Normal) => &mut self.gateway,
            (MarkerKind::Gateway, DisplayMode::Fullscreen) => &mut self.gateway_fullscreen,
            (MarkerKind::Corridor, DisplayMode::Normal) => &mut self.corridor,
            (MarkerKind::Corridor, DisplayMode::Fullscreen) => &mut self.corridor_fullscreen,
        }
    }

    pub fn positions(&self, kind: MarkerKind, mode: DisplayMode) -> &[MarkerPosition] {
        self.set(kind, mode)
    }

    pub fn position(&self, kind: MarkerKind, mode: DisplayMode, id: &str) -> Option<PercentPoint> {
        self.set(kind, mode)
            .iter()
            .find(|record| record.id == id)
            .map(|record| record.point)
    }

    /// Replace one record's coordinates; unknown ids are appended so a drag
    /// never silently drops a marker.
    pub fn set_position(
        &mut self,
        kind: MarkerKind,
        mode: DisplayMode,
        id: &str,
        point: PercentPoint,
    ) {
        let records = self.set_mut(kind, mode);
        match records.iter_mut().find(|record| record.id == id) {
            Some(record) => record.point = point,
            None => records.push(MarkerPosition {
                id: id.to_string(),
                point,
            }),
        }
    }

    /// Read the persisted document; a missing file yields the seeded layout.
    pub fn load<P: AsRef<Path>>(path: P) -> FlowResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::seeded());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Rewrite the whole document.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> FlowResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_layout_counts() {
        let store = PositionStore::seeded();
        assert_eq!(store.positions(MarkerKind::Gateway, DisplayMode::Normal).len(), 6);
        assert_eq!(store.positions(MarkerKind::Corridor, DisplayMode::Normal).len(), 12);
        assert_eq!(
            store.positions(MarkerKind::Gateway, DisplayMode::Normal),
            store.positions(MarkerKind::Gateway, DisplayMode::Fullscreen)
        );
    }

    #[test]
    fn display_modes_do_not_alias() {
        let mut store = PositionStore::seeded();
        store.set_position(
            MarkerKind::Gateway,
            DisplayMode::Fullscreen,
            "1",
            PercentPoint::new(33.0, 44.0),
        );
        let normal = store
            .position(MarkerKind::Gateway, DisplayMode::Normal, "1")
            .unwrap();
        let fullscreen = store
            .position(MarkerKind::Gateway, DisplayMode::Fullscreen, "1")
            .unwrap();
        assert_eq!(normal.top.value(), 10.0);
        assert_eq!(fullscreen.top.value(), 33.0);
    }

    #[test]
    fn document_round_trips_with_storage_keys() {
        let store = PositionStore::seeded();
        let json = serde_json::to_string(&store).unwrap();
        for key in [
            "gatewayPositions",
            "gatewayPositionsFullscreen",
            "corridorPositions",
            "corridorPositionsFullscreen",
        ] {
            assert!(json.contains(key), "missing key {key}");
        }
        let parsed: PositionStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, store);
    }

    #[test]
    fn load_missing_file_yields_seeded_layout() {
        let path = std::env::temp_dir().join(format!(
            "crowdcore-positions-missing-{}.json",
            std::process::id()
        ));
        let store = PositionStore::load(&path).unwrap();
        assert_eq!(store, PositionStore::seeded());
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = std::env::temp_dir().join(format!(
            "crowdcore-positions-{}.json",
            std::process::id()
        ));
        let mut store = PositionStore::seeded();
        store.set_position(
            MarkerKind::Corridor,
            DisplayMode::Normal,
            "Upper_Gate_3_1",
            PercentPoint::new(12.0, 13.0),
        );
        store.save(&path).unwrap();
        let loaded = PositionStore::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, store);
    }
}
