//! Ordered waypoint storage.
//!
//! The order of the sequence is the path topology: segment `i` joins
//! waypoint `i` and waypoint `i + 1`. Ids come from a counter that only
//! moves forward, so a deleted id is never handed out again. Once the
//! counter reaches `WaypointId::MAX` further placements are refused.

use tracing::debug;
use vexroute_core::{normalize_degrees, Direction, FieldPoint, WaypointError};

use crate::transform::CoordinateTransform;
use crate::waypoint::{Waypoint, WaypointDefaults, WaypointId};

type StoreResult<T> = std::result::Result<T, WaypointError>;

/// The ordered waypoint sequence with unique ids.
#[derive(Debug, Clone, Default)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
    next_id: WaypointId,
    defaults: WaypointDefaults,
}

impl WaypointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: WaypointDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn defaults(&self) -> &WaypointDefaults {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: WaypointDefaults) {
        self.defaults = defaults;
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    /// The id the next placed waypoint will receive.
    pub fn next_id(&self) -> WaypointId {
        self.next_id
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id() == id)
    }

    pub fn at(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn index_of(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.iter().position(|w| w.id() == id)
    }

    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// Appends a waypoint at the given field position.
    pub fn push(
        &mut self,
        field: FieldPoint,
        transform: &CoordinateTransform,
    ) -> StoreResult<WaypointId> {
        let id = self.allocate_id()?;
        let waypoint = Waypoint::new(id, field, transform, &self.defaults);
        debug!(id, position = %waypoint.field(), "waypoint placed");
        self.waypoints.push(waypoint);
        Ok(id)
    }

    /// Inserts a waypoint before `index`; `index == len` appends.
    pub fn insert(
        &mut self,
        index: usize,
        field: FieldPoint,
        transform: &CoordinateTransform,
    ) -> StoreResult<WaypointId> {
        if index > self.waypoints.len() {
            return Err(WaypointError::IndexOutOfRange {
                index,
                len: self.waypoints.len(),
            });
        }
        let id = self.allocate_id()?;
        let waypoint = Waypoint::new(id, field, transform, &self.defaults);
        debug!(id, index, position = %waypoint.field(), "waypoint inserted");
        self.waypoints.insert(index, waypoint);
        Ok(id)
    }

    /// Moves a waypoint; the position is clamped onto the field.
    pub fn move_to(
        &mut self,
        id: WaypointId,
        field: FieldPoint,
        transform: &CoordinateTransform,
    ) -> StoreResult<()> {
        let waypoint = self.get_mut(id)?;
        waypoint.set_field(field, transform);
        debug!(id, position = %waypoint.field(), "waypoint moved");
        Ok(())
    }

    pub fn set_heading(&mut self, id: WaypointId, degrees: f64) -> StoreResult<()> {
        self.get_mut(id)?.set_heading(degrees);
        debug!(id, degrees, "waypoint heading set");
        Ok(())
    }

    /// Sets the travel budget; negative input clamps to zero.
    pub fn set_timeout(&mut self, id: WaypointId, timeout_ms: i64) -> StoreResult<()> {
        self.get_mut(id)?.set_timeout(timeout_ms);
        debug!(id, timeout_ms, "waypoint timeout set");
        Ok(())
    }

    /// Sets the speed; input outside `[1, 127]` clamps to the nearest bound.
    pub fn set_speed(&mut self, id: WaypointId, speed: i64) -> StoreResult<()> {
        self.get_mut(id)?.set_speed(speed);
        debug!(id, speed, "waypoint speed set");
        Ok(())
    }

    pub fn set_direction(&mut self, id: WaypointId, direction: Direction) -> StoreResult<()> {
        self.get_mut(id)?.set_direction(direction);
        debug!(id, %direction, "waypoint direction set");
        Ok(())
    }

    /// Removes a single waypoint. Neighbours are left untouched.
    pub fn remove(&mut self, id: WaypointId) -> StoreResult<Waypoint> {
        let index = self.index_of(id).ok_or(WaypointError::UnknownId { id })?;
        debug!(id, index, "waypoint deleted");
        Ok(self.waypoints.remove(index))
    }

    /// Reflects every waypoint across the field's X axis.
    ///
    /// Y positions are negated and stored headings become `180 - heading`,
    /// so applying it twice restores the original positions exactly.
    pub fn mirror_x(&mut self, transform: &CoordinateTransform) {
        for waypoint in &mut self.waypoints {
            let mirrored = waypoint.field().mirrored_x();
            waypoint.set_field(mirrored, transform);
            waypoint.set_heading(normalize_degrees(180.0 - waypoint.heading()));
        }
        debug!(count = self.waypoints.len(), "route mirrored across X axis");
    }

    /// Reflects every waypoint across the field's Y axis.
    ///
    /// X positions are negated and stored headings become `360 - heading`.
    pub fn mirror_y(&mut self, transform: &CoordinateTransform) {
        for waypoint in &mut self.waypoints {
            let mirrored = waypoint.field().mirrored_y();
            waypoint.set_field(mirrored, transform);
            waypoint.set_heading(normalize_degrees(-waypoint.heading()));
        }
        debug!(count = self.waypoints.len(), "route mirrored across Y axis");
    }

    /// Recomputes every cached screen position (after the transform changed).
    pub fn resync(&mut self, transform: &CoordinateTransform) {
        for waypoint in &mut self.waypoints {
            waypoint.resync(transform);
        }
    }

    /// Removes every waypoint. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    /// Replaces the whole sequence with already-validated waypoints.
    ///
    /// The id counter is re-derived as `max(id) + 1`, or 0 when empty.
    /// Import refuses `WaypointId::MAX`, so the successor always exists.
    pub(crate) fn replace_all(&mut self, waypoints: Vec<Waypoint>) {
        self.next_id = waypoints
            .iter()
            .map(|w| w.id())
            .max()
            .map_or(0, |max| max.checked_add(1).unwrap_or(WaypointId::MAX));
        self.waypoints = waypoints;
        debug!(
            count = self.waypoints.len(),
            next_id = self.next_id,
            "route replaced"
        );
    }

    /// `WaypointId::MAX` is never handed out; it marks an exhausted counter.
    fn allocate_id(&mut self) -> StoreResult<WaypointId> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(WaypointError::IdsExhausted)?;
        Ok(id)
    }

    fn get_mut(&mut self, id: WaypointId) -> StoreResult<&mut Waypoint> {
        self.waypoints
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or(WaypointError::UnknownId { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> CoordinateTransform {
        CoordinateTransform::with_image(720.0, 720.0, 12.0)
    }

    #[test]
    fn test_push_assigns_sequential_ids() {
        let t = transform();
        let mut store = WaypointStore::new();
        assert_eq!(store.push(FieldPoint::new(0.0, 0.0), &t), Ok(0));
        assert_eq!(store.push(FieldPoint::new(1.0, 0.0), &t), Ok(1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let t = transform();
        let mut store = WaypointStore::new();
        store.push(FieldPoint::ZERO, &t).unwrap();
        let b = store.push(FieldPoint::ZERO, &t).unwrap();
        store.remove(b).unwrap();
        let c = store.push(FieldPoint::ZERO, &t).unwrap();
        assert_eq!(c, 2);
    }

    #[test]
    fn test_insert_in_middle() {
        let t = transform();
        let mut store = WaypointStore::new();
        let a = store.push(FieldPoint::new(0.0, 0.0), &t).unwrap();
        let b = store.push(FieldPoint::new(20.0, 0.0), &t).unwrap();
        let c = store.insert(1, FieldPoint::new(10.0, 0.0), &t).unwrap();
        let order: Vec<_> = store.iter().map(|w| w.id()).collect();
        assert_eq!(order, vec![a, c, b]);
    }

    #[test]
    fn test_insert_past_end_is_rejected() {
        let t = transform();
        let mut store = WaypointStore::new();
        let err = store.insert(1, FieldPoint::ZERO, &t).unwrap_err();
        assert_eq!(err, WaypointError::IndexOutOfRange { index: 1, len: 0 });
        assert!(store.is_empty());
    }

    #[test]
    fn test_move_keeps_screen_in_sync() {
        let t = transform();
        let mut store = WaypointStore::new();
        let id = store.push(FieldPoint::ZERO, &t).unwrap();
        store.move_to(id, FieldPoint::new(24.0, -24.0), &t).unwrap();
        let wp = store.get(id).unwrap();
        assert_eq!(wp.screen(), t.to_screen(FieldPoint::new(24.0, -24.0)));
    }

    #[test]
    fn test_edit_unknown_id() {
        let t = transform();
        let mut store = WaypointStore::new();
        assert_eq!(
            store.move_to(9, FieldPoint::ZERO, &t),
            Err(WaypointError::UnknownId { id: 9 })
        );
        assert_eq!(
            store.set_speed(9, 10),
            Err(WaypointError::UnknownId { id: 9 })
        );
    }

    #[test]
    fn test_setters_clamp() {
        let t = transform();
        let mut store = WaypointStore::new();
        let id = store.push(FieldPoint::ZERO, &t).unwrap();
        store.set_speed(id, 300).unwrap();
        store.set_timeout(id, -5).unwrap();
        store.set_heading(id, 370.0).unwrap();
        let wp = store.get(id).unwrap();
        assert_eq!(wp.speed(), 127);
        assert_eq!(wp.timeout_ms(), 0);
        assert!((wp.heading() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_mirror_x_twice_restores_positions() {
        let t = transform();
        let mut store = WaypointStore::new();
        store.push(FieldPoint::new(12.3, -45.6), &t).unwrap();
        store.push(FieldPoint::new(-70.1, 33.3), &t).unwrap();
        let before: Vec<_> = store.iter().map(|w| w.field()).collect();

        store.mirror_x(&t);
        assert_eq!(store.at(0).unwrap().field(), FieldPoint::new(12.3, 45.6));
        store.mirror_x(&t);

        let after: Vec<_> = store.iter().map(|w| w.field()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_mirror_y_flips_heading() {
        let t = transform();
        let mut store = WaypointStore::new();
        let id = store.push(FieldPoint::new(10.0, 5.0), &t).unwrap();
        store.set_heading(id, 90.0).unwrap();
        store.mirror_y(&t);
        let wp = store.get(id).unwrap();
        assert_eq!(wp.field(), FieldPoint::new(-10.0, 5.0));
        assert_eq!(wp.heading(), 270.0);
        assert_eq!(wp.screen(), t.to_screen(wp.field()));
    }

    #[test]
    fn test_resync_after_transform_change() {
        let mut t = CoordinateTransform::default();
        let mut store = WaypointStore::new();
        let id = store.push(FieldPoint::new(10.0, 10.0), &t).unwrap();
        assert_eq!(store.get(id).unwrap().screen(), vexroute_core::ScreenPoint::ZERO);

        t.set_image(Some(crate::transform::FieldImage::new(720.0, 720.0)));
        store.resync(&t);
        assert_eq!(
            store.get(id).unwrap().screen(),
            t.to_screen(FieldPoint::new(10.0, 10.0))
        );
    }

    #[test]
    fn test_replace_all_rederives_next_id() {
        let t = transform();
        let mut store = WaypointStore::new();
        let defaults = WaypointDefaults::default();
        store.replace_all(vec![
            Waypoint::new(4, FieldPoint::ZERO, &t, &defaults),
            Waypoint::new(11, FieldPoint::ZERO, &t, &defaults),
        ]);
        assert_eq!(store.next_id(), 12);

        store.replace_all(Vec::new());
        assert_eq!(store.next_id(), 0);
    }

    #[test]
    fn test_exhausted_counter_refuses_new_ids() {
        let t = transform();
        let mut store = WaypointStore::new();
        let defaults = WaypointDefaults::default();
        store.replace_all(vec![Waypoint::new(
            WaypointId::MAX - 2,
            FieldPoint::ZERO,
            &t,
            &defaults,
        )]);

        let last = store.push(FieldPoint::new(10.0, 0.0), &t).unwrap();
        assert_eq!(last, WaypointId::MAX - 1);
        assert_eq!(
            store.push(FieldPoint::new(20.0, 0.0), &t),
            Err(WaypointError::IdsExhausted)
        );
        assert_eq!(
            store.insert(0, FieldPoint::ZERO, &t),
            Err(WaypointError::IdsExhausted)
        );

        let ids: Vec<_> = store.iter().map(|w| w.id()).collect();
        assert_eq!(ids, vec![WaypointId::MAX - 2, WaypointId::MAX - 1]);
    }
}
