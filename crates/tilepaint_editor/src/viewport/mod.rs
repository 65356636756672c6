//! Viewport transform and pointer gestures
//!
//! The [`Viewport`] maps screen points to world points with
//! `screen = world * zoom + translation`, zooms anchored on the cursor and
//! turns raw pointer input into [`ViewportEvent`]s: paint intents, selection
//! changes, selection drags, cursor moves and right clicks. It never touches
//! the project; [`input::apply_viewport_events`] does that.

pub mod input;

use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use tilepaint_core::{Cell, GridSize};

/// Zoom bounds and step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomSettings {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            min: 0.25,
            max: 4.0,
            step: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// How the viewport treats the area it shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportMode {
    /// Grid-addressed map; input outside the map bounds is ignored and a
    /// drag paints each cell once
    #[default]
    Tilemap,
    /// Unbounded surface; every drag move paints
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// A selection in world units.
///
/// `(x1, y1)` is where the drag started, so the corners are not ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl SelectionRect {
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x1.min(self.x2), self.y1.min(self.y2))
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x1.max(self.x2), self.y1.max(self.y2))
    }

    pub fn size(&self) -> Vec2 {
        self.max() - self.min()
    }

    /// Whether `point` lies inside, whichever way the rectangle was dragged
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x1: self.x1 + delta.x,
            y1: self.y1 + delta.y,
            x2: self.x2 + delta.x,
            y2: self.y2 + delta.y,
        }
    }

    /// Cells covered by the rectangle, row-major
    pub fn cells(&self, tile_size: f32) -> Vec<Cell> {
        let (min, max) = (self.min(), self.max());
        let first = Cell::from_world(min.x, min.y, tile_size);
        let rows = ((max.y - min.y) / tile_size).round() as i32;
        let cols = ((max.x - min.x) / tile_size).round() as i32;
        (0..rows)
            .flat_map(|r| (0..cols).map(move |c| Cell::new(first.row + r, first.col + c)))
            .collect()
    }
}

/// Snap a dragged rectangle outward to whole cells.
///
/// Along each axis the start is floored and the end ceiled when the drag
/// goes forward, and the other way round when it goes backward.
pub fn selection_rect(start: Vec2, end: Vec2, tile_size: f32) -> SelectionRect {
    let snap = |s: f32, e: f32| {
        if s <= e {
            (
                (s / tile_size).floor() * tile_size,
                (e / tile_size).ceil() * tile_size,
            )
        } else {
            (
                (s / tile_size).ceil() * tile_size,
                (e / tile_size).floor() * tile_size,
            )
        }
    };
    let (x1, x2) = snap(start.x, end.x);
    let (y1, y2) = snap(start.y, end.y);
    SelectionRect { x1, y1, x2, y2 }
}

/// Round to three decimals so repeated zoom steps do not drift
fn round_zoom(zoom: f32) -> f32 {
    (zoom * 1000.0).round() / 1000.0
}

/// Notifications produced by pointer gestures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    /// Paint at a world position; `cell` is the grid cell under it
    Paint { cell: Cell, world: Vec2 },
    /// The selection was replaced or cleared
    SelectionChanged(Option<SelectionRect>),
    /// The selection moved by the realized drag delta
    SelectionDragged(Vec2),
    /// The cursor is over this world position
    MouseWorld(Vec2),
    RightClick(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct SelectionDrag {
    last: Vec2,
    /// Movement since the last realized step on each axis
    pending: Vec2,
}

/// Camera state and gesture tracking for the map view
#[derive(Debug, Clone, Resource)]
pub struct Viewport {
    pub zoom: f32,
    pub translation: Vec2,
    pub zoom_settings: ZoomSettings,
    pub tile_size: f32,
    pub mode: ViewportMode,
    /// Map size for [`ViewportMode::Tilemap`]; `None` leaves it unbounded
    pub bounds: Option<GridSize>,
    /// Whether pointer drags select instead of painting
    pub selection_enabled: bool,

    selection: Option<SelectionRect>,
    selection_start: Option<Vec2>,
    drag: Option<SelectionDrag>,
    button: Option<PointerButton>,
    pan_key_down: bool,
    pan_from: Option<Vec2>,
    last_paint: Option<Cell>,
    events: Vec<ViewportEvent>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl Viewport {
    pub fn new(tile_size: f32) -> Self {
        Self {
            zoom: 1.0,
            translation: Vec2::ZERO,
            zoom_settings: ZoomSettings::default(),
            tile_size,
            mode: ViewportMode::Tilemap,
            bounds: None,
            selection_enabled: false,
            selection: None,
            selection_start: None,
            drag: None,
            button: None,
            pan_key_down: false,
            pan_from: None,
            last_paint: None,
            events: Vec::new(),
        }
    }

    pub fn with_bounds(mut self, bounds: GridSize) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_mode(mut self, mode: ViewportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.translation) / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.zoom + self.translation
    }

    /// Change zoom by one step keeping the world point under `screen` fixed.
    ///
    /// Returns false when the zoom is already at the bound in that direction.
    pub fn zoom_at(&mut self, screen: Vec2, direction: ZoomDirection) -> bool {
        let ZoomSettings { min, max, step } = self.zoom_settings;
        let zoom = match direction {
            ZoomDirection::In if self.zoom < max => round_zoom(self.zoom + step).min(max),
            ZoomDirection::Out if self.zoom > min => round_zoom(self.zoom - step).max(min),
            _ => return false,
        };
        let anchor = self.screen_to_world(screen);
        self.zoom = zoom;
        self.translation = screen - anchor * zoom;
        true
    }

    /// Zoom from a wheel movement; positive `delta` scrolls up and zooms in
    pub fn wheel(&mut self, screen: Vec2, delta: f32) -> bool {
        if delta > 0.0 {
            self.zoom_at(screen, ZoomDirection::In)
        } else if delta < 0.0 {
            self.zoom_at(screen, ZoomDirection::Out)
        } else {
            false
        }
    }

    pub fn selection(&self) -> Option<SelectionRect> {
        self.selection
    }

    /// Snap a rectangle between two world points to this viewport's tile size
    pub fn selection_rect(&self, start: Vec2, end: Vec2) -> SelectionRect {
        selection_rect(start, end, self.tile_size)
    }

    /// Start a new selection at `world`
    pub fn begin_selection(&mut self, world: Vec2) {
        self.selection_start = Some(world);
        self.selection = Some(self.selection_rect(world, world));
    }

    /// Grow the selection started by [`Viewport::begin_selection`] to `world`
    pub fn update_selection(&mut self, world: Vec2) {
        if let Some(start) = self.selection_start {
            self.selection = Some(self.selection_rect(start, world));
        }
    }

    /// Move the selection by accumulated drag movement.
    ///
    /// Movement accumulates per axis. Once an axis has moved at least one
    /// tile size the selection moves by the whole accumulated amount on that
    /// axis and its accumulator starts over. Returns the realized delta, or
    /// `None` while both axes are below a tile.
    pub fn drag_selection(&mut self, delta: Vec2) -> Option<Vec2> {
        let selection = self.selection?;
        let tile = self.tile_size;
        let drag = self.drag.get_or_insert_with(SelectionDrag::default);
        drag.pending += delta;

        let mut realized = Vec2::ZERO;
        if drag.pending.x.abs() >= tile {
            realized.x = drag.pending.x;
            drag.pending.x = 0.0;
        }
        if drag.pending.y.abs() >= tile {
            realized.y = drag.pending.y;
            drag.pending.y = 0.0;
        }
        if realized == Vec2::ZERO {
            return None;
        }
        self.selection = Some(selection.translated(realized));
        Some(realized)
    }

    /// Drop the selection, announcing it if there was one
    pub fn clear_selection(&mut self) {
        self.selection_start = None;
        self.drag = None;
        if self.selection.take().is_some() {
            self.events.push(ViewportEvent::SelectionChanged(None));
        }
    }

    /// Hold or release the pan modifier key
    pub fn set_pan_key(&mut self, down: bool) {
        self.pan_key_down = down;
        if !down {
            self.pan_from = None;
        }
    }

    pub fn is_panning(&self) -> bool {
        self.pan_from.is_some()
    }

    fn in_bounds(&self, world: Vec2) -> bool {
        match (self.mode, self.bounds) {
            (ViewportMode::Tilemap, Some(bounds)) => {
                bounds.contains(Cell::from_world(world.x, world.y, self.tile_size))
            }
            _ => true,
        }
    }

    fn paint(&mut self, world: Vec2) {
        let cell = Cell::from_world(world.x, world.y, self.tile_size);
        if self.mode == ViewportMode::Tilemap && self.last_paint == Some(cell) {
            return;
        }
        self.last_paint = Some(cell);
        self.events.push(ViewportEvent::Paint { cell, world });
    }

    pub fn pointer_down(&mut self, screen: Vec2, button: PointerButton) {
        self.button = Some(button);
        if self.pan_key_down || button == PointerButton::Middle {
            self.pan_from = Some(screen);
            return;
        }

        let world = self.screen_to_world(screen);
        if !self.in_bounds(world) {
            return;
        }
        if self.selection_enabled {
            match self.selection {
                Some(selection) if selection.contains(world) => {
                    self.drag = Some(SelectionDrag {
                        last: world,
                        pending: Vec2::ZERO,
                    });
                }
                _ => {
                    self.events.push(ViewportEvent::SelectionChanged(None));
                    self.begin_selection(world);
                }
            }
        } else if button == PointerButton::Left {
            self.last_paint = None;
            self.paint(world);
        }
    }

    pub fn pointer_move(&mut self, screen: Vec2) {
        let world = self.screen_to_world(screen);
        self.events.push(ViewportEvent::MouseWorld(world));
        if self.button.is_none() {
            return;
        }

        if let Some(from) = self.pan_from {
            self.translation += screen - from;
            self.pan_from = Some(screen);
            return;
        }
        if !self.in_bounds(world) {
            return;
        }
        if self.selection_enabled {
            if let Some(drag) = self.drag {
                let delta = world - drag.last;
                if let Some(drag) = self.drag.as_mut() {
                    drag.last = world;
                }
                if let Some(step) = self.drag_selection(delta) {
                    self.events.push(ViewportEvent::SelectionDragged(step));
                }
            } else {
                self.update_selection(world);
            }
        } else if self.button == Some(PointerButton::Left) {
            self.paint(world);
        }
    }

    /// End the gesture; a selection that exists is announced
    pub fn pointer_up(&mut self) {
        self.button = None;
        self.pan_from = None;
        self.drag = None;
        self.selection_start = None;
        self.last_paint = None;
        if self.selection_enabled {
            if let Some(selection) = self.selection {
                self.events
                    .push(ViewportEvent::SelectionChanged(Some(selection)));
            }
        }
    }

    pub fn right_click(&mut self, screen: Vec2) {
        let world = self.screen_to_world(screen);
        self.events.push(ViewportEvent::RightClick(world));
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<ViewportEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec_eq(a: Vec2, b: Vec2) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-3);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-3);
    }

    #[test]
    fn test_screen_world_inverse() {
        let mut viewport = Viewport::new(16.0);
        viewport.zoom = 1.7;
        viewport.translation = Vec2::new(-35.5, 120.25);
        for p in [Vec2::ZERO, Vec2::new(13.0, -7.5), Vec2::new(1024.0, 768.0)] {
            assert_vec_eq(viewport.screen_to_world(viewport.world_to_screen(p)), p);
            assert_vec_eq(viewport.world_to_screen(viewport.screen_to_world(p)), p);
        }
    }

    #[test]
    fn test_zoom_keeps_cursor_anchor() {
        let mut viewport = Viewport::new(16.0);
        viewport.translation = Vec2::new(10.0, 20.0);
        let cursor = Vec2::new(300.0, 200.0);
        let before = viewport.screen_to_world(cursor);

        assert!(viewport.zoom_at(cursor, ZoomDirection::In));
        assert_relative_eq!(viewport.zoom, 1.1);
        assert_vec_eq(viewport.screen_to_world(cursor), before);

        assert!(viewport.zoom_at(cursor, ZoomDirection::Out));
        assert!(viewport.zoom_at(cursor, ZoomDirection::Out));
        assert_relative_eq!(viewport.zoom, 0.9);
        assert_vec_eq(viewport.screen_to_world(cursor), before);
    }

    #[test]
    fn test_zoom_bounds_are_silent() {
        let mut viewport = Viewport::new(16.0);
        viewport.zoom = 4.0;
        let translation = viewport.translation;
        assert!(!viewport.zoom_at(Vec2::new(5.0, 5.0), ZoomDirection::In));
        assert_eq!(viewport.zoom, 4.0);
        assert_eq!(viewport.translation, translation);

        viewport.zoom = 0.3;
        assert!(viewport.wheel(Vec2::ZERO, -1.0));
        assert_relative_eq!(viewport.zoom, 0.25);
        assert!(!viewport.wheel(Vec2::ZERO, -1.0));
        assert!(!viewport.wheel(Vec2::ZERO, 0.0));
    }

    #[test]
    fn test_selection_snaps_to_tiles() {
        let forward = selection_rect(Vec2::new(5.0, 17.0), Vec2::new(40.0, 33.0), 16.0);
        assert_eq!(
            forward,
            SelectionRect {
                x1: 0.0,
                y1: 16.0,
                x2: 48.0,
                y2: 48.0
            }
        );

        let backward = selection_rect(Vec2::new(40.0, 33.0), Vec2::new(5.0, 17.0), 16.0);
        assert_eq!(
            backward,
            SelectionRect {
                x1: 48.0,
                y1: 48.0,
                x2: 0.0,
                y2: 16.0
            }
        );
        assert!(backward.contains(Vec2::new(20.0, 20.0)));
        assert_eq!(backward.cells(16.0).len(), 6);
    }

    #[test]
    fn test_drag_moves_by_accumulated_delta() {
        let mut viewport = Viewport::new(16.0);
        viewport.begin_selection(Vec2::new(1.0, 1.0));
        viewport.update_selection(Vec2::new(30.0, 30.0));

        assert_eq!(viewport.drag_selection(Vec2::new(10.0, 0.0)), None);
        assert_eq!(
            viewport.drag_selection(Vec2::new(10.0, -20.0)),
            Some(Vec2::new(20.0, -20.0))
        );
        // Both axes start over after moving
        assert_eq!(viewport.drag_selection(Vec2::new(12.0, 0.0)), None);
        assert_eq!(
            viewport.drag_selection(Vec2::new(4.0, 0.0)),
            Some(Vec2::new(16.0, 0.0))
        );
        let selection = viewport.selection().unwrap();
        assert_eq!(selection.min(), Vec2::new(36.0, -20.0));
        assert_eq!(selection.size(), Vec2::new(32.0, 32.0));
    }

    #[test]
    fn test_partial_drag_after_move_waits_for_a_tile() {
        let mut viewport = Viewport::new(16.0);
        viewport.begin_selection(Vec2::new(0.0, 0.0));
        viewport.update_selection(Vec2::new(16.0, 16.0));
        let start = viewport.selection().unwrap();

        assert_eq!(
            viewport.drag_selection(Vec2::new(20.0, 0.0)),
            Some(Vec2::new(20.0, 0.0))
        );
        assert_eq!(viewport.drag_selection(Vec2::new(12.0, 0.0)), None);
        assert_eq!(viewport.selection(), Some(start.translated(Vec2::new(20.0, 0.0))));

        // Only one axis crossing a tile moves only that axis
        assert_eq!(
            viewport.drag_selection(Vec2::new(-3.0, -17.0)),
            Some(Vec2::new(0.0, -17.0))
        );
    }

    #[test]
    fn test_paint_gesture_once_per_cell() {
        let mut viewport = Viewport::new(16.0).with_bounds(GridSize::new(4, 4));
        viewport.pointer_down(Vec2::new(3.0, 3.0), PointerButton::Left);
        viewport.pointer_move(Vec2::new(10.0, 4.0));
        viewport.pointer_move(Vec2::new(20.0, 4.0));
        viewport.pointer_move(Vec2::new(200.0, 4.0));
        viewport.pointer_up();
        viewport.pointer_move(Vec2::new(40.0, 4.0));

        let paints: Vec<Cell> = viewport
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                ViewportEvent::Paint { cell, .. } => Some(cell),
                _ => None,
            })
            .collect();
        assert_eq!(paints, vec![Cell::new(0, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn test_canvas_paints_every_move() {
        let mut viewport = Viewport::new(16.0).with_mode(ViewportMode::Canvas);
        viewport.pointer_down(Vec2::new(-50.0, 3.0), PointerButton::Left);
        viewport.pointer_move(Vec2::new(-49.0, 3.0));
        let paints = viewport
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, ViewportEvent::Paint { .. }))
            .count();
        assert_eq!(paints, 2);
    }

    #[test]
    fn test_pan_moves_translation() {
        let mut viewport = Viewport::new(16.0);
        viewport.set_pan_key(true);
        viewport.pointer_down(Vec2::new(100.0, 100.0), PointerButton::Left);
        viewport.pointer_move(Vec2::new(130.0, 90.0));
        assert_eq!(viewport.translation, Vec2::new(30.0, -10.0));
        assert!(viewport
            .drain_events()
            .iter()
            .all(|e| !matches!(e, ViewportEvent::Paint { .. })));
        viewport.pointer_up();
        assert!(!viewport.is_panning());
    }

    #[test]
    fn test_selection_gesture() {
        let mut viewport = Viewport::new(16.0);
        viewport.selection_enabled = true;
        viewport.pointer_down(Vec2::new(2.0, 2.0), PointerButton::Left);
        viewport.pointer_move(Vec2::new(20.0, 20.0));
        viewport.pointer_up();

        let rect = SelectionRect {
            x1: 0.0,
            y1: 0.0,
            x2: 32.0,
            y2: 32.0,
        };
        let events = viewport.drain_events();
        assert_eq!(events[0], ViewportEvent::SelectionChanged(None));
        assert_eq!(
            events.last(),
            Some(&ViewportEvent::SelectionChanged(Some(rect)))
        );

        // Dragging from inside moves it once the pointer has covered a tile
        viewport.pointer_down(Vec2::new(10.0, 10.0), PointerButton::Left);
        viewport.pointer_move(Vec2::new(20.0, 10.0));
        viewport.pointer_move(Vec2::new(27.0, 10.0));
        viewport.pointer_up();
        let events = viewport.drain_events();
        let drags: Vec<&ViewportEvent> = events
            .iter()
            .filter(|e| matches!(e, ViewportEvent::SelectionDragged(_)))
            .collect();
        assert_eq!(drags, vec![&ViewportEvent::SelectionDragged(Vec2::new(17.0, 0.0))]);
        assert_eq!(viewport.selection(), Some(rect.translated(Vec2::new(17.0, 0.0))));

        viewport.clear_selection();
        assert_eq!(
            viewport.drain_events(),
            vec![ViewportEvent::SelectionChanged(None)]
        );
    }

    #[test]
    fn test_right_click_reports_world() {
        let mut viewport = Viewport::new(16.0);
        viewport.zoom = 2.0;
        viewport.right_click(Vec2::new(40.0, 20.0));
        assert_eq!(
            viewport.drain_events(),
            vec![ViewportEvent::RightClick(Vec2::new(20.0, 10.0))]
        );
    }
}
