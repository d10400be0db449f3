use super::constants::COLOR_POOL;
use super::math::distance;
use super::types::{Food, FoodId, Point, Viewport};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FOOD_ID: AtomicU64 = AtomicU64::new(1);

fn next_food_id() -> FoodId {
    FoodId(NEXT_FOOD_ID.fetch_add(1, Ordering::Relaxed))
}

/// Membership changes since the last `take_changes`, for the render sink.
#[derive(Debug, Default, Clone)]
pub struct FoodChanges {
    pub added: Vec<FoodId>,
    pub removed: Vec<FoodId>,
}

#[derive(Debug, Default)]
pub struct FoodField {
    items: Vec<Food>,
    changes: FoodChanges,
}

impl FoodField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Food> {
        self.items.iter()
    }

    pub fn get(&self, id: FoodId) -> Option<&Food> {
        self.items.iter().find(|food| food.id == id)
    }

    pub fn contains(&self, id: FoodId) -> bool {
        self.get(id).is_some()
    }

    pub fn position_of(&self, id: FoodId) -> Option<Point> {
        self.get(id).map(|food| food.position)
    }

    pub fn spawn_bulk<R: Rng + ?Sized>(
        &mut self,
        center: Point,
        view: &Viewport,
        spread: f64,
        count: usize,
        rng: &mut R,
    ) {
        self.items.reserve(count);
        for _ in 0..count {
            self.respawn_one(center, view, spread, rng);
        }
    }

    /// Places one item at a uniform offset within `spread` of the visible span.
    pub fn respawn_one<R: Rng + ?Sized>(
        &mut self,
        center: Point,
        view: &Viewport,
        spread: f64,
        rng: &mut R,
    ) -> FoodId {
        let position = Point {
            lat: center.lat + (rng.gen::<f64>() - 0.5) * view.lat_span() * spread,
            lng: center.lng + (rng.gen::<f64>() - 0.5) * view.lng_span() * spread,
        };
        self.insert_at(position, rng)
    }

    pub fn insert_at<R: Rng + ?Sized>(&mut self, position: Point, rng: &mut R) -> FoodId {
        let id = next_food_id();
        let color = COLOR_POOL[rng.gen_range(0..COLOR_POOL.len())];
        self.items.push(Food {
            id,
            position,
            color,
        });
        self.changes.added.push(id);
        id
    }

    /// Removes by id. A second call for the same id is a no-op returning false.
    pub fn consume(&mut self, id: FoodId) -> bool {
        let Some(index) = self.items.iter().position(|food| food.id == id) else {
            return false;
        };
        self.items.swap_remove(index);
        self.changes.removed.push(id);
        true
    }

    /// Closest item to `point`, with its distance.
    pub fn nearest(&self, point: Point) -> Option<(FoodId, f64)> {
        let mut nearest: Option<(FoodId, f64)> = None;
        for food in &self.items {
            let dist = distance(point, food.position);
            match nearest {
                Some((_, best)) if dist >= best => {}
                _ => nearest = Some((food.id, dist)),
            }
        }
        nearest
    }

    /// Closest item strictly within `epsilon` of `point`.
    pub fn nearest_within(&self, point: Point, epsilon: f64) -> Option<FoodId> {
        self.nearest(point)
            .filter(|(_, dist)| *dist < epsilon)
            .map(|(id, _)| id)
    }

    pub fn clear(&mut self) {
        self.changes
            .removed
            .extend(self.items.iter().map(|food| food.id));
        self.items.clear();
    }

    pub fn take_changes(&mut self) -> FoodChanges {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn view() -> Viewport {
        Viewport::around(Point::new(0.0, 0.0), 0.004, 0.002)
    }

    #[test]
    fn spawn_bulk_stays_inside_spread_of_view() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = FoodField::new();
        let center = Point::new(10.0, 20.0);
        field.spawn_bulk(center, &view(), 0.8, 200, &mut rng);
        assert_eq!(field.len(), 200);
        for food in field.iter() {
            assert!((food.position.lat - center.lat).abs() <= 0.004 * 0.4);
            assert!((food.position.lng - center.lng).abs() <= 0.002 * 0.4);
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = FoodField::new();
        field.spawn_bulk(Point::new(0.0, 0.0), &view(), 0.8, 500, &mut rng);
        let mut ids: Vec<FoodId> = field.iter().map(|food| food.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn consume_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = FoodField::new();
        let id = field.insert_at(Point::new(1.0, 1.0), &mut rng);
        assert!(field.consume(id));
        assert!(!field.consume(id));
        assert!(field.is_empty());
    }

    #[test]
    fn consuming_all_with_respawn_keeps_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = FoodField::new();
        let center = Point::new(0.0, 0.0);
        field.spawn_bulk(center, &view(), 0.8, 50, &mut rng);
        let spawned: Vec<FoodId> = field.iter().map(|food| food.id).collect();
        for id in spawned {
            assert!(field.consume(id));
            field.respawn_one(center, &view(), 0.8, &mut rng);
        }
        assert_eq!(field.len(), 50);
    }

    #[test]
    fn nearest_within_respects_epsilon() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = FoodField::new();
        let near = field.insert_at(Point::new(0.0, 0.0001), &mut rng);
        field.insert_at(Point::new(0.0, 0.01), &mut rng);
        assert_eq!(field.nearest_within(Point::new(0.0, 0.0), 0.00015), Some(near));
        assert_eq!(field.nearest_within(Point::new(0.0, 0.0), 0.00005), None);
    }

    #[test]
    fn changes_are_drained() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = FoodField::new();
        let id = field.insert_at(Point::new(0.0, 0.0), &mut rng);
        field.consume(id);
        let changes = field.take_changes();
        assert_eq!(changes.added, vec![id]);
        assert_eq!(changes.removed, vec![id]);
        assert!(field.take_changes().added.is_empty());
    }
}
