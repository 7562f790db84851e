use crate::config::TILE_SIZE;
use crate::protocol::{EntitySnapshot, MapData, PlacedEntity, TileKind};

// --- PALETTE ---

pub const PLAIN: &str = "#00FF00";
pub const DEPOSIT: &str = "#8B4513";
pub const STRATEGIC_POINT: &str = "#FFD700";
pub const GRID_LINE: &str = "#333";
pub const OUTLINE: &str = "#FFF";
pub const LABEL: &str = "#FFF";
pub const LABEL_FONT: &str = "10px Arial";
pub const FRIENDLY_DEFAULT: &str = "#0000FF";
pub const HOSTILE_DEFAULT: &str = "#800080";
pub const GHOST: &str = "rgba(255, 255, 255, 0.5)";

pub fn tile_color(kind: TileKind) -> &'static str {
    match kind {
        TileKind::Plain => PLAIN,
        TileKind::Deposit => DEPOSIT,
        TileKind::StrategicPoint => STRATEGIC_POINT,
    }
}

pub fn building_color(kind: &str) -> &'static str {
    match kind {
        "Headquarters" => "#FF0000",
        "TeslaCoilPlant" => "#FFFF00",
        "BasicPlant" => "#008000",
        _ => FRIENDLY_DEFAULT,
    }
}

pub fn unit_color(kind: &str) -> &'static str {
    match kind {
        "EngineerZombie" => "#FFA500",
        "FastZombie" => "#ADD8E6",
        _ => HOSTILE_DEFAULT,
    }
}

// --- DRAW OPS ---

/// One canvas primitive, in world space (before the camera translation).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Square { x: f64, y: f64, size: f64, fill: &'static str, stroke: Option<&'static str> },
    Disc { cx: f64, cy: f64, radius: f64, fill: &'static str, stroke: &'static str },
    Label { text: String, x: f64, y: f64 },
}

/// Canvas size in pixels for a map.
pub fn canvas_size(map: &MapData) -> (u32, u32) {
    let tile = TILE_SIZE as u32;
    (map.width.saturating_mul(tile), map.height.saturating_mul(tile))
}

/// One square per cell the backend actually sent; a header larger than the
/// grid does not produce extra work.
pub fn terrain(map: &MapData) -> Vec<DrawOp> {
    map.cells()
        .map(|(x, y, code)| DrawOp::Square {
            x: x as f64 * TILE_SIZE,
            y: y as f64 * TILE_SIZE,
            size: TILE_SIZE,
            fill: tile_color(TileKind::from_code(code)),
            stroke: Some(GRID_LINE),
        })
        .collect()
}

fn health_label(e: &PlacedEntity) -> DrawOp {
    DrawOp::Label {
        text: e.health.to_string(),
        x: e.x * TILE_SIZE + TILE_SIZE / 4.0,
        y: e.y * TILE_SIZE + TILE_SIZE / 2.0,
    }
}

/// Buildings first, then units, each followed by its health label.
pub fn entities(snapshot: &EntitySnapshot) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity((snapshot.buildings.len() + snapshot.units.len()) * 2);
    for b in &snapshot.buildings {
        ops.push(DrawOp::Square {
            x: b.x * TILE_SIZE,
            y: b.y * TILE_SIZE,
            size: TILE_SIZE,
            fill: building_color(&b.kind),
            stroke: Some(OUTLINE),
        });
        ops.push(health_label(b));
    }
    for u in &snapshot.units {
        ops.push(DrawOp::Disc {
            cx: u.x * TILE_SIZE + TILE_SIZE / 2.0,
            cy: u.y * TILE_SIZE + TILE_SIZE / 2.0,
            radius: TILE_SIZE / 2.0 - 2.0,
            fill: unit_color(&u.kind),
            stroke: OUTLINE,
        });
        ops.push(health_label(u));
    }
    ops
}

pub fn ghost(cell: (i32, i32)) -> DrawOp {
    DrawOp::Square {
        x: cell.0 as f64 * TILE_SIZE,
        y: cell.1 as f64 * TILE_SIZE,
        size: TILE_SIZE,
        fill: GHOST,
        stroke: None,
    }
}
