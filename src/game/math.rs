use super::types::Point;
use rand::Rng;

/// Offset from `from` to `to`, as a vector in (lat, lng) space.
pub fn delta(from: Point, to: Point) -> Point {
    Point {
        lat: to.lat - from.lat,
        lng: to.lng - from.lng,
    }
}

pub fn length(vector: Point) -> f64 {
    (vector.lat * vector.lat + vector.lng * vector.lng).sqrt()
}

pub fn distance(a: Point, b: Point) -> f64 {
    length(delta(a, b))
}

pub fn within(a: Point, b: Point, epsilon: f64) -> bool {
    distance(a, b) < epsilon
}

pub fn normalize(vector: Point) -> Point {
    let len = length(vector);
    if !len.is_finite() || len == 0.0 {
        return Point { lat: 0.0, lng: 0.0 };
    }
    Point {
        lat: vector.lat / len,
        lng: vector.lng / len,
    }
}

pub fn dot(a: Point, b: Point) -> f64 {
    a.lat * b.lat + a.lng * b.lng
}

pub fn offset(origin: Point, direction: Point, amount: f64) -> Point {
    Point {
        lat: origin.lat + direction.lat * amount,
        lng: origin.lng + direction.lng * amount,
    }
}

/// Direction from `from` to `to`, or `None` when the two coincide.
pub fn direction(from: Point, to: Point) -> Option<Point> {
    let d = delta(from, to);
    let len = length(d);
    if !len.is_finite() || len == 0.0 {
        return None;
    }
    Some(Point {
        lat: d.lat / len,
        lng: d.lng / len,
    })
}

/// Perpendicular of a direction, rotated a quarter turn counter-clockwise.
pub fn perpendicular(vector: Point) -> Point {
    Point {
        lat: vector.lng,
        lng: -vector.lat,
    }
}

pub fn angle_between(a: Point, b: Point) -> f64 {
    let value = clamp(dot(normalize(a), normalize(b)), -1.0, 1.0);
    value.acos()
}

pub fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Point {
    let angle = rng.gen::<f64>() * std::f64::consts::PI * 2.0;
    Point {
        lat: angle.sin(),
        lng: angle.cos(),
    }
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
