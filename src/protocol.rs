use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

// --- RESOURCES ---

/// Counters are kept as raw JSON numbers so the panel shows exactly what the
/// backend sent.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Resources {
    pub money: Number,
    pub power: Number,
    pub sun: Number,
}

// --- CATALOG ---

/// Each amount is shown as sent; absent or `null` reads as zero.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Cost {
    #[serde(default)]
    pub money: Option<Number>,
    #[serde(default)]
    pub power: Option<Number>,
    #[serde(default)]
    pub sun: Option<Number>,
}

fn amount(value: &Option<Number>) -> String {
    value.as_ref().map_or_else(|| "0".to_string(), Number::to_string)
}

impl Cost {
    pub fn money(&self) -> String {
        amount(&self.money)
    }

    pub fn power(&self) -> String {
        amount(&self.power)
    }

    pub fn sun(&self) -> String {
        amount(&self.sun)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    #[serde(default)]
    pub cost: Cost,
    #[serde(default)]
    pub description: String,
}

/// Placeable entity types in the order the backend listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub entries: Vec<(String, CatalogEntry)>,
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of entity name to catalog entry")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
        let mut entries: Vec<(String, CatalogEntry)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, entry)) = access.next_entry::<String, CatalogEntry>()? {
            // Later duplicates replace earlier ones but keep the first position.
            if let Some(slot) = entries.iter_mut().find(|slot| slot.0 == name) {
                slot.1 = entry;
            } else {
                entries.push((name, entry));
            }
        }
        Ok(Catalog { entries })
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Catalog, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

// --- MAP ---

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MapData {
    pub width: u32,
    pub height: u32,
    pub grid: Vec<Vec<i64>>,
}

impl MapData {
    /// Cells actually sent, clipped to the declared `width` x `height`.
    /// Rows or cells the grid lacks are skipped, never invented.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, i64)> + '_ {
        self.grid
            .iter()
            .take(self.height as usize)
            .zip(0u32..)
            .flat_map(move |(row, y)| {
                row.iter()
                    .take(self.width as usize)
                    .zip(0u32..)
                    .map(move |(&code, x)| (x, y, code))
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    Plain,
    Deposit,
    StrategicPoint,
}

impl TileKind {
    pub fn from_code(code: i64) -> TileKind {
        match code {
            1 => TileKind::Deposit,
            2 => TileKind::StrategicPoint,
            _ => TileKind::Plain,
        }
    }
}

// --- ENTITIES ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlacedEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub health: Number,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EntitySnapshot {
    #[serde(default)]
    pub buildings: Vec<PlacedEntity>,
    #[serde(default)]
    pub units: Vec<PlacedEntity>,
}

// --- PLACEMENT ---

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PlaceRequest {
    pub entity_type: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlaceResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// --- GAME STATE ---

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameStatus {
    #[serde(alias = "game_state")]
    pub state: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub fn outcome(&self) -> Outcome {
        match self.state.as_str() {
            "running" => Outcome::Running,
            "win" => Outcome::Won,
            _ => Outcome::Lost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keeps_backend_order_and_defaults_missing_cost() {
        let json = r#"{
            "TeslaCoilPlant": {"type": "building", "cost": {"money": 250, "power": 25}, "description": "coil"},
            "BasicPlant": {"cost": {"money": 75, "sun": 75}, "description": "plant"},
            "Wall": {"description": "no cost at all"}
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = catalog.entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["TeslaCoilPlant", "BasicPlant", "Wall"]);

        let coil = &catalog.entries[0].1.cost;
        assert_eq!((coil.money(), coil.power(), coil.sun()), ("250".into(), "25".into(), "0".into()));
        assert_eq!(catalog.entries[2].1.cost, Cost::default());
    }

    #[test]
    fn float_and_null_costs_keep_the_catalog() {
        let json = r#"{
            "Odd": {"cost": {"money": 12.5, "sun": null}, "description": "fractional"},
            "BasicPlant": {"cost": {"money": 75, "sun": 75}, "description": "plant"}
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.entries.len(), 2);
        let odd = &catalog.entries[0].1.cost;
        assert_eq!(odd.money(), "12.5");
        assert_eq!(odd.power(), "0");
        assert_eq!(odd.sun(), "0");
    }

    #[test]
    fn resources_keep_number_text() {
        let r: Resources = serde_json::from_str(r#"{"money": 1000, "power": 12.5, "sun": 0}"#).unwrap();
        assert_eq!(r.money.to_string(), "1000");
        assert_eq!(r.power.to_string(), "12.5");
        assert_eq!(r.sun.to_string(), "0");
    }

    #[test]
    fn unknown_tile_codes_are_plain() {
        assert_eq!(TileKind::from_code(0), TileKind::Plain);
        assert_eq!(TileKind::from_code(1), TileKind::Deposit);
        assert_eq!(TileKind::from_code(2), TileKind::StrategicPoint);
        assert_eq!(TileKind::from_code(7), TileKind::Plain);
        assert_eq!(TileKind::from_code(-1), TileKind::Plain);
    }

    #[test]
    fn cells_follow_the_grid_not_the_header() {
        let ragged = MapData { width: 3, height: 2, grid: vec![vec![1, 2]] };
        assert_eq!(ragged.cells().collect::<Vec<_>>(), vec![(0, 0, 1), (1, 0, 2)]);

        let oversized = MapData { width: 1, height: 1, grid: vec![vec![2, 1], vec![1, 1]] };
        assert_eq!(oversized.cells().collect::<Vec<_>>(), vec![(0, 0, 2)]);

        let huge = MapData { width: u32::MAX, height: u32::MAX, grid: Vec::new() };
        assert_eq!(huge.cells().count(), 0);
    }

    #[test]
    fn entities_accept_extra_fields_and_missing_lists() {
        let json = r#"{"buildings": [{"type": "Headquarters", "x": 1, "y": 2, "health": 500, "attack": 0, "defense": 20}]}"#;
        let snap: EntitySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.buildings.len(), 1);
        assert_eq!(snap.buildings[0].kind, "Headquarters");
        assert_eq!(snap.buildings[0].health.to_string(), "500");
        assert!(snap.units.is_empty());
    }

    #[test]
    fn game_status_reads_either_field_name() {
        let a: GameStatus = serde_json::from_str(r#"{"state": "running"}"#).unwrap();
        let b: GameStatus = serde_json::from_str(r#"{"game_state": "win", "game_time": 12}"#).unwrap();
        let c: GameStatus = serde_json::from_str(r#"{"state": "lose"}"#).unwrap();
        let d: GameStatus = serde_json::from_str(r#"{"state": "paused"}"#).unwrap();
        assert_eq!(a.outcome(), Outcome::Running);
        assert_eq!(b.outcome(), Outcome::Won);
        assert_eq!(c.outcome(), Outcome::Lost);
        assert_eq!(d.outcome(), Outcome::Lost);
    }

    #[test]
    fn place_request_wire_shape() {
        let req = PlaceRequest { entity_type: "BasicPlant".into(), x: -1, y: 3 };
        let v: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert_eq!(v, serde_json::json!({"entity_type": "BasicPlant", "x": -1, "y": 3}));

        let rejected: PlaceResponse = serde_json::from_str(r#"{"success": false, "message": "Insufficient resources."}"#).unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.message, "Insufficient resources.");
    }
}
