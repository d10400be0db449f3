use serde::{Deserialize, Serialize};

/// Flat-earth coordinate. `lat` is treated as the y axis and `lng` as x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FoodId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BotId(pub u64);

#[derive(Debug, Clone, Serialize)]
pub struct Food {
    pub id: FoodId,
    pub position: Point,
    pub color: &'static str,
}

/// What a bot is steering toward. Food is held by id only and resolved
/// against the live field on every use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Food(FoodId),
    Waypoint(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotMode {
    #[default]
    SeekingFood,
    Wandering,
}

#[derive(Debug, Clone)]
pub struct Bot {
    pub id: BotId,
    pub name: String,
    pub color: &'static str,
    pub snake: Vec<Point>,
    pub mode: BotMode,
    pub target: Option<Target>,
    /// Unit vector in (lat, lng) space; zero until the first steering pass.
    pub heading: Point,
    pub score: u32,
}

impl Bot {
    pub fn head(&self) -> Option<Point> {
        self.snake.first().copied()
    }
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub name: String,
    pub color: &'static str,
    pub snake: Vec<Point>,
    pub target: Option<Point>,
    pub alive: bool,
    pub score: u32,
}

impl PlayerState {
    pub fn head(&self) -> Option<Point> {
        self.snake.first().copied()
    }
}

/// Visible map region as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Viewport {
    pub fn around(center: Point, span_lat: f64, span_lng: f64) -> Self {
        Self {
            north: center.lat + span_lat / 2.0,
            south: center.lat - span_lat / 2.0,
            east: center.lng + span_lng / 2.0,
            west: center.lng - span_lng / 2.0,
        }
    }

    /// Rejects non-finite or inverted bounds.
    pub fn parse(north: f64, south: f64, east: f64, west: f64) -> Option<Self> {
        let finite = [north, south, east, west].iter().all(|value| value.is_finite());
        if !finite || north <= south || east <= west {
            return None;
        }
        Some(Self {
            north,
            south,
            east,
            west,
        })
    }

    pub fn center(&self) -> Point {
        Point {
            lat: (self.north + self.south) / 2.0,
            lng: (self.east + self.west) / 2.0,
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn contains_padded(&self, point: Point, padding: f64) -> bool {
        point.lat <= self.north + padding
            && point.lat >= self.south - padding
            && point.lng <= self.east + padding
            && point.lng >= self.west - padding
    }
}
