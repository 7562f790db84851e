use crate::api::ClientError;
use crate::config::TILE_SIZE;
use crate::protocol::{PlaceRequest, PlaceResponse};

pub const PLACE_EFFECT: &str = "place_building";
pub const PLACE_FAILED_ALERT: &str = "Something went wrong while placing the entity.";

/// Grid cell under a canvas-space point once the camera offset is undone.
/// Not clamped to the map.
pub fn cell_at(pointer: (f64, f64), offset: (f64, f64), tile: f64) -> (i32, i32) {
    (
        ((pointer.0 - offset.0) / tile).floor() as i32,
        ((pointer.1 - offset.1) / tile).floor() as i32,
    )
}

/// Work the page has to do after an input transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Redraw,
    RefreshResources,
    ClearSelectionStyle,
    Alert(String),
    PlaySound(&'static str),
    Log(String),
    Report(String),
}

// --- UI STATE ---

#[derive(Debug, Clone, Default)]
pub struct UiState {
    selected: Option<String>,
    camera_x: f64,
    camera_y: f64,
    pointer: Option<(f64, f64)>,
    dragging: bool,
    last_drag_x: f64,
    last_drag_y: f64,
}

impl UiState {
    pub fn new() -> UiState {
        UiState::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn camera(&self) -> (f64, f64) {
        (self.camera_x, self.camera_y)
    }

    /// Clicking the selected type again clears the selection; any other type
    /// replaces it. Always redraws so the ghost follows.
    pub fn toggle_selection(&mut self, name: &str) -> Effect {
        if self.selected.as_deref() == Some(name) {
            self.selected = None;
        } else {
            self.selected = Some(name.to_string());
        }
        Effect::Redraw
    }

    /// The pointer is remembered even mid-drag so a click right after a pan
    /// targets where the cursor actually is.
    pub fn hover(&mut self, x: f64, y: f64) -> Option<Effect> {
        self.pointer = Some((x, y));
        if self.selected.is_some() && !self.dragging {
            Some(Effect::Redraw)
        } else {
            None
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.dragging = true;
        self.last_drag_x = x;
        self.last_drag_y = y;
    }

    pub fn drag_move(&mut self, x: f64, y: f64) -> Option<Effect> {
        if !self.dragging {
            return None;
        }
        self.camera_x += x - self.last_drag_x;
        self.camera_y += y - self.last_drag_y;
        self.last_drag_x = x;
        self.last_drag_y = y;
        Some(Effect::Redraw)
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn leave(&mut self) -> Option<Effect> {
        self.pointer = None;
        if self.selected.is_some() && !self.dragging {
            Some(Effect::Redraw)
        } else {
            None
        }
    }

    /// Cell the ghost preview covers, if one should be drawn at all.
    pub fn ghost_cell(&self) -> Option<(i32, i32)> {
        if self.dragging || self.selected.is_none() {
            return None;
        }
        self.pointer.map(|p| cell_at(p, self.camera(), TILE_SIZE))
    }

    /// Placement request for a click, using the same cell math as the ghost.
    pub fn commit(&self) -> Option<PlaceRequest> {
        let entity_type = self.selected.clone()?;
        let (x, y) = cell_at(self.pointer?, self.camera(), TILE_SIZE);
        Some(PlaceRequest { entity_type, x, y })
    }

    pub fn placement_result(&mut self, result: Result<PlaceResponse, ClientError>) -> Vec<Effect> {
        match result {
            Ok(resp) if resp.success => {
                self.selected = None;
                vec![
                    Effect::Log(resp.message),
                    Effect::PlaySound(PLACE_EFFECT),
                    Effect::ClearSelectionStyle,
                    Effect::Redraw,
                    Effect::RefreshResources,
                ]
            }
            Ok(resp) => vec![Effect::Alert(resp.message)],
            Err(err) => vec![
                Effect::Report(format!("Error placing entity: {}", err)),
                Effect::Alert(PLACE_FAILED_ALERT.to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(effects: &[Effect], wanted: &Effect) -> usize {
        effects.iter().filter(|e| *e == wanted).count()
    }

    #[test]
    fn cell_math_floors_including_negatives() {
        assert_eq!(cell_at((0.0, 0.0), (0.0, 0.0), 32.0), (0, 0));
        assert_eq!(cell_at((31.9, 32.0), (0.0, 0.0), 32.0), (0, 1));
        assert_eq!(cell_at((70.0, 40.0), (10.0, 10.0), 32.0), (1, 0));
        assert_eq!(cell_at((5.0, 5.0), (40.0, 6.0), 32.0), (-2, -1));
        assert_eq!(cell_at((0.0, 0.0), (32.0, 32.0), 32.0), (-1, -1));
    }

    #[test]
    fn double_toggle_deselects_and_hides_ghost() {
        let mut ui = UiState::new();
        assert_eq!(ui.toggle_selection("BasicPlant"), Effect::Redraw);
        assert_eq!(ui.selected(), Some("BasicPlant"));
        assert_eq!(ui.toggle_selection("BasicPlant"), Effect::Redraw);
        assert_eq!(ui.selected(), None);

        assert_eq!(ui.hover(40.0, 40.0), None);
        assert_eq!(ui.ghost_cell(), None);
    }

    #[test]
    fn selecting_another_type_replaces() {
        let mut ui = UiState::new();
        ui.toggle_selection("BasicPlant");
        ui.toggle_selection("TeslaCoilPlant");
        assert_eq!(ui.selected(), Some("TeslaCoilPlant"));
    }

    #[test]
    fn hover_redraws_only_with_selection() {
        let mut ui = UiState::new();
        assert_eq!(ui.hover(10.0, 10.0), None);
        ui.toggle_selection("BasicPlant");
        assert_eq!(ui.ghost_cell(), Some((0, 0)));
        assert_eq!(ui.hover(40.0, 70.0), Some(Effect::Redraw));
        assert_eq!(ui.ghost_cell(), Some((1, 2)));
    }

    #[test]
    fn drag_accumulates_unbounded_offset() {
        let mut ui = UiState::new();
        ui.pointer_down(100.0, 100.0);
        assert_eq!(ui.drag_move(90.0, 120.0), Some(Effect::Redraw));
        assert_eq!(ui.drag_move(-5000.0, 130.0), Some(Effect::Redraw));
        assert_eq!(ui.camera(), (-5100.0, 30.0));
        ui.pointer_up();
        assert_eq!(ui.drag_move(0.0, 0.0), None);
        assert_eq!(ui.camera(), (-5100.0, 30.0));
    }

    #[test]
    fn ghost_suppressed_while_dragging() {
        let mut ui = UiState::new();
        ui.toggle_selection("BasicPlant");
        ui.hover(10.0, 10.0);
        ui.pointer_down(10.0, 10.0);
        assert_eq!(ui.hover(12.0, 12.0), None);
        assert_eq!(ui.ghost_cell(), None);
        assert_eq!(ui.leave(), None);
        ui.pointer_up();
        assert_eq!(ui.hover(12.0, 12.0), Some(Effect::Redraw));
        assert!(ui.ghost_cell().is_some());
    }

    #[test]
    fn leave_clears_pointer_and_blocks_commit() {
        let mut ui = UiState::new();
        ui.toggle_selection("BasicPlant");
        ui.hover(10.0, 10.0);
        assert_eq!(ui.leave(), Some(Effect::Redraw));
        assert_eq!(ui.ghost_cell(), None);
        assert_eq!(ui.commit(), None);
    }

    #[test]
    fn commit_uses_panned_cell() {
        let mut ui = UiState::new();
        ui.pointer_down(0.0, 0.0);
        ui.drag_move(64.0, 0.0);
        ui.pointer_up();
        ui.toggle_selection("BasicPlant");
        ui.hover(10.0, 40.0);
        let req = ui.commit().unwrap();
        assert_eq!(req, PlaceRequest { entity_type: "BasicPlant".into(), x: -2, y: 1 });
    }

    #[test]
    fn commit_needs_selection() {
        let mut ui = UiState::new();
        ui.hover(10.0, 10.0);
        assert_eq!(ui.commit(), None);
    }

    #[test]
    fn successful_placement_clears_selection_once() {
        let mut ui = UiState::new();
        ui.toggle_selection("BasicPlant");
        ui.hover(10.0, 10.0);
        let effects = ui.placement_result(Ok(PlaceResponse { success: true, message: "placed".into() }));
        assert_eq!(ui.selected(), None);
        assert_eq!(count(&effects, &Effect::Redraw), 1);
        assert_eq!(count(&effects, &Effect::RefreshResources), 1);
        assert_eq!(count(&effects, &Effect::ClearSelectionStyle), 1);
        assert_eq!(count(&effects, &Effect::PlaySound(PLACE_EFFECT)), 1);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Alert(_))));
    }

    #[test]
    fn rejected_placement_alerts_once_and_keeps_selection() {
        let mut ui = UiState::new();
        ui.toggle_selection("TeslaCoilPlant");
        let effects = ui.placement_result(Ok(PlaceResponse { success: false, message: "Insufficient resources.".into() }));
        assert_eq!(effects, vec![Effect::Alert("Insufficient resources.".into())]);
        assert_eq!(ui.selected(), Some("TeslaCoilPlant"));
    }

    #[test]
    fn transport_failure_alerts_generic_message() {
        let mut ui = UiState::new();
        ui.toggle_selection("BasicPlant");
        let err = ClientError::Transport { path: "/place_entity".into(), message: "offline".into() };
        let effects = ui.placement_result(Err(err));
        let alerts: Vec<_> = effects.iter().filter(|e| matches!(e, Effect::Alert(_))).collect();
        assert_eq!(alerts, vec![&Effect::Alert(PLACE_FAILED_ALERT.to_string())]);
        assert_eq!(count(&effects, &Effect::Redraw), 0);
        assert_eq!(ui.selected(), Some("BasicPlant"));
    }
}
