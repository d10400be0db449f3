use super::types::Point;
use std::collections::VecDeque;
use std::fmt;

/// Failure reported by the device position source. Codes follow the W3C
/// geolocation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    PermissionDenied,
    Unavailable,
    Timeout,
    Unknown,
}

impl PositionError {
    pub fn from_code(code: Option<u16>) -> Self {
        match code {
            Some(1) => Self::PermissionDenied,
            Some(2) => Self::Unavailable,
            Some(3) => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unable to get location: ")?;
        match self {
            Self::PermissionDenied => {
                f.write_str("Permission denied. Please allow location access.")
            }
            Self::Unavailable => f.write_str("Location information unavailable."),
            Self::Timeout => f.write_str("Request timeout."),
            Self::Unknown => f.write_str("Unknown error occurred."),
        }
    }
}

impl std::error::Error for PositionError {}

/// Arithmetic mean over the last `window` readings.
#[derive(Debug, Clone)]
pub struct PositionFilter {
    window: usize,
    readings: VecDeque<Point>,
}

impl PositionFilter {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            readings: VecDeque::with_capacity(window),
        }
    }

    pub fn push(&mut self, reading: Point) -> Point {
        self.readings.push_back(reading);
        while self.readings.len() > self.window {
            self.readings.pop_front();
        }
        let count = self.readings.len() as f64;
        let (lat_sum, lng_sum) = self
            .readings
            .iter()
            .fold((0.0, 0.0), |(lat, lng), point| (lat + point.lat, lng + point.lng));
        Point {
            lat: lat_sum / count,
            lng: lng_sum / count,
        }
    }
}

/// Rejects readings the map could never show.
pub fn parse_reading(lat: f64, lng: f64, accuracy: Option<f64>) -> Option<(Point, f64)> {
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    let accuracy = accuracy
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(0.0);
    Some((Point { lat, lng }, accuracy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_averages_last_window() {
        let mut filter = PositionFilter::new(2);
        filter.push(Point::new(0.0, 0.0));
        filter.push(Point::new(2.0, 4.0));
        let smoothed = filter.push(Point::new(4.0, 8.0));
        assert_eq!(smoothed, Point::new(3.0, 6.0));
    }

    #[test]
    fn first_reading_passes_through() {
        let mut filter = PositionFilter::new(5);
        assert_eq!(filter.push(Point::new(1.5, -2.5)), Point::new(1.5, -2.5));
    }

    #[test]
    fn error_codes_map_to_advisories() {
        assert_eq!(PositionError::from_code(Some(1)), PositionError::PermissionDenied);
        assert_eq!(PositionError::from_code(Some(9)), PositionError::Unknown);
        assert_eq!(
            PositionError::Timeout.to_string(),
            "Unable to get location: Request timeout."
        );
    }

    #[test]
    fn parse_reading_rejects_out_of_range() {
        assert!(parse_reading(91.0, 0.0, None).is_none());
        assert!(parse_reading(f64::NAN, 0.0, None).is_none());
        assert_eq!(
            parse_reading(10.0, 20.0, Some(f64::INFINITY)),
            Some((Point::new(10.0, 20.0), 0.0))
        );
    }
}
