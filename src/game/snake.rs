use super::math::{delta, direction, distance, length, offset};
use super::types::Point;

/// Straight snake with its head at `head`, tail trailing south.
pub fn create_snake(head: Point, length: usize, spacing: f64) -> Vec<Point> {
    (0..length.max(1))
        .map(|index| Point {
            lat: head.lat - index as f64 * spacing,
            lng: head.lng,
        })
        .collect()
}

/// Pulls every segment to sit exactly `spacing` behind its leader.
pub fn relax_segments(snake: &mut [Point], spacing: f64) {
    for index in 1..snake.len() {
        let previous = snake[index - 1];
        let current = snake[index];
        let gap = delta(current, previous);
        let gap_len = length(gap);
        if gap_len == 0.0 || !gap_len.is_finite() {
            continue;
        }
        let ratio = spacing / gap_len;
        snake[index] = Point {
            lat: previous.lat - gap.lat * ratio,
            lng: previous.lng - gap.lng * ratio,
        };
    }
}

/// Prepends a head `speed` along `heading` and drags the body after it.
pub fn advance_along(snake: &mut Vec<Point>, heading: Point, speed: f64, spacing: f64) -> bool {
    let Some(head) = snake.first().copied() else { return false };
    let new_head = offset(head, heading, speed);
    if !new_head.is_finite() {
        return false;
    }
    snake.insert(0, new_head);
    relax_segments(snake, spacing);
    true
}

/// Fixed-speed step toward `target`. Returns whether the head moved.
pub fn advance_toward(
    snake: &mut Vec<Point>,
    target: Option<Point>,
    speed: f64,
    dead_zone: f64,
    spacing: f64,
) -> bool {
    let (Some(head), Some(target)) = (snake.first().copied(), target) else { return false };
    if distance(head, target) <= dead_zone {
        return false;
    }
    let Some(heading) = direction(head, target) else { return false };
    advance_along(snake, heading, speed, spacing)
}

/// Moves the head a fixed fraction of the remaining distance to `target`.
pub fn approach_fraction(
    snake: &mut Vec<Point>,
    target: Option<Point>,
    fraction: f64,
    dead_zone: f64,
    spacing: f64,
) -> bool {
    let (Some(head), Some(target)) = (snake.first().copied(), target) else { return false };
    let remaining = distance(head, target);
    if remaining <= dead_zone {
        return false;
    }
    let Some(heading) = direction(head, target) else { return false };
    advance_along(snake, heading, remaining * fraction, spacing)
}

/// Drops one tail segment when the snake is longer than `cap`.
pub fn trim_to_cap(snake: &mut Vec<Point>, cap: usize) -> bool {
    if snake.len() <= cap.max(1) {
        return false;
    }
    snake.pop();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_snake_spaces_segments_south_of_head() {
        let snake = create_snake(Point::new(1.0, 2.0), 5, 0.5);
        assert_eq!(snake.len(), 5);
        assert_eq!(snake[4], Point::new(-1.0, 2.0));
    }

    #[test]
    fn create_snake_never_returns_empty() {
        assert_eq!(create_snake(Point::new(0.0, 0.0), 0, 1.0).len(), 1);
    }

    #[test]
    fn advance_toward_prepends_head_and_keeps_spacing() {
        let spacing = 0.000005;
        let mut snake = create_snake(Point::new(0.0, 0.0), 5, spacing);
        let moved = advance_toward(
            &mut snake,
            Some(Point::new(0.0, 0.001)),
            0.000008,
            0.00001,
            spacing,
        );
        assert!(moved);
        assert_eq!(snake.len(), 6);
        assert!((snake[0].lng - 0.000008).abs() < 1e-15);
        for pair in snake.windows(2) {
            assert!((distance(pair[0], pair[1]) - spacing).abs() < 1e-12);
        }
    }

    #[test]
    fn advance_toward_without_target_does_not_move() {
        let mut snake = create_snake(Point::new(0.0, 0.0), 3, 1.0);
        let before = snake.clone();
        assert!(!advance_toward(&mut snake, None, 1.0, 0.1, 1.0));
        assert_eq!(snake, before);
    }

    #[test]
    fn relax_skips_coincident_segments() {
        let mut snake = vec![Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        relax_segments(&mut snake, 0.5);
        assert_eq!(snake[1], Point::new(0.0, 0.0));
        assert!((snake[2].lat - 0.5).abs() < 1e-12);
    }

    #[test]
    fn approach_fraction_closes_share_of_gap() {
        let mut snake = vec![Point::new(0.0, 0.0)];
        assert!(approach_fraction(
            &mut snake,
            Some(Point::new(0.0, 1.0)),
            0.25,
            0.01,
            0.1,
        ));
        assert!((snake[0].lng - 0.25).abs() < 1e-12);
    }

    #[test]
    fn trim_only_pops_past_cap() {
        let mut snake = create_snake(Point::new(0.0, 0.0), 4, 1.0);
        assert!(!trim_to_cap(&mut snake, 4));
        assert!(trim_to_cap(&mut snake, 3));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn trim_never_empties_snake() {
        let mut snake = vec![Point::new(0.0, 0.0)];
        assert!(!trim_to_cap(&mut snake, 0));
        assert_eq!(snake.len(), 1);
    }
}
