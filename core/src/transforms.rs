//! Route transformations
//!
//! Each transform takes a route and an index and returns a new route, leaving
//! the input untouched. Bend and flatten are inverses of each other; flip is
//! its own inverse.

use tracing::trace;

use crate::error::{MazeError, Result};
use crate::geometry::{Chirality, Direction, Point, Route, STEP};
use crate::rng::RandomSource;
use crate::validation::{is_valid_route, subroute_flattenable, subroute_flippable};

/// One of the three local route edits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    Bend(Chirality),
    Flip,
    Flatten,
}

impl Transform {
    /// Relative odds used by [`randomly_transform_once`]
    pub const WEIGHTED: [(Transform, u32); 4] = [
        (Transform::Bend(Chirality::Left), 1),
        (Transform::Bend(Chirality::Right), 1),
        (Transform::Flip, 2),
        (Transform::Flatten, 2),
    ];

    pub fn apply(self, route: &[Point], start: usize) -> Result<Route> {
        match self {
            Transform::Bend(chirality) => bender(route, start, chirality),
            Transform::Flip => flipper(route, start),
            Transform::Flatten => flattener(route, start),
        }
    }
}

fn scaled(dx: i32, dy: i32) -> Point {
    Point::new(dx * STEP, dy * STEP)
}

/// Offsets from the pivot of the two points a bend inserts
fn bend_offsets(direction: Direction, chirality: Chirality) -> Option<[Point; 2]> {
    let offsets = match (chirality, direction) {
        (Chirality::Right, Direction::North) => [scaled(1, 0), scaled(1, 1)],
        (Chirality::Right, Direction::South) => [scaled(-1, 0), scaled(-1, -1)],
        (Chirality::Right, Direction::East) => [scaled(0, -1), scaled(1, -1)],
        (Chirality::Right, Direction::West) => [scaled(0, 1), scaled(-1, 1)],
        (Chirality::Left, Direction::North) => [scaled(-1, 0), scaled(-1, 1)],
        (Chirality::Left, Direction::South) => [scaled(1, 0), scaled(1, -1)],
        (Chirality::Left, Direction::East) => [scaled(0, 1), scaled(1, 1)],
        (Chirality::Left, Direction::West) => [scaled(0, -1), scaled(-1, -1)],
        _ => return None,
    };
    Some(offsets)
}

/// Replacement offset (from the window's first point) for a flipped middle point
fn flip_offset(diagonal: Direction, middle_shares_x: bool) -> Option<Point> {
    let offset = match (diagonal, middle_shares_x) {
        (Direction::NorthEast, true) => scaled(1, 0),
        (Direction::NorthEast, false) => scaled(0, 1),
        (Direction::NorthWest, true) => scaled(-1, 0),
        (Direction::NorthWest, false) => scaled(0, 1),
        (Direction::SouthEast, true) => scaled(1, 0),
        (Direction::SouthEast, false) => scaled(0, -1),
        (Direction::SouthWest, true) => scaled(-1, 0),
        (Direction::SouthWest, false) => scaled(0, -1),
        _ => return None,
    };
    Some(offset)
}

/// Bend the step `route[start] -> route[start + 1]` sideways.
///
/// Two points are inserted after `start`, turning a straight "-" into a "U"
/// on the `chirality` side. The route grows by two points.
pub fn bender(route: &[Point], start: usize, chirality: Chirality) -> Result<Route> {
    if start + 1 >= route.len() {
        return Err(MazeError::InvalidGeometry(format!(
            "bend at {start} needs a following point in a route of {}",
            route.len()
        )));
    }

    let pivot = route[start];
    let next = route[start + 1];
    let [a, b] = Direction::between(pivot, next)
        .and_then(|dir| bend_offsets(dir, chirality))
        .ok_or_else(|| {
            MazeError::InvalidGeometry(format!("{pivot} and {next} are not neighbours"))
        })?;

    let mut bent = Vec::with_capacity(route.len() + 2);
    bent.extend_from_slice(&route[..=start]);
    bent.push(pivot + a);
    bent.push(pivot + b);
    bent.extend_from_slice(&route[start + 1..]);
    Ok(bent)
}

/// Mirror the middle point of the diagonal jog `route[start..start + 3]`.
///
/// Endpoints and length stay the same: an "L" becomes a "7".
pub fn flipper(route: &[Point], start: usize) -> Result<Route> {
    let window = route.get(start..start + 3).ok_or_else(|| {
        MazeError::InvalidGeometry(format!(
            "flip at {start} runs past the end of a route of {}",
            route.len()
        ))
    })?;
    if !subroute_flippable(window)? {
        return Err(MazeError::InvalidGeometry(format!(
            "window at {start} is not a diagonal jog"
        )));
    }

    let (first, middle, last) = (window[0], window[1], window[2]);
    let offset = Direction::between(first, last)
        .and_then(|diag| flip_offset(diag, middle.x == first.x))
        .ok_or_else(|| MazeError::InvalidGeometry(format!("cannot flip {first}..{last}")))?;

    let mut flipped = route.to_vec();
    flipped[start + 1] = first + offset;
    Ok(flipped)
}

/// Remove the detour `route[start + 1]`, `route[start + 2]`: a "U" becomes an "I"
pub fn flattener(route: &[Point], start: usize) -> Result<Route> {
    let window = route.get(start..start + 4).ok_or_else(|| {
        MazeError::InvalidGeometry(format!(
            "flatten at {start} runs past the end of a route of {}",
            route.len()
        ))
    })?;
    if !subroute_flattenable(window)? {
        return Err(MazeError::InvalidGeometry(format!(
            "window at {start} is not a detour"
        )));
    }

    let mut flat = Vec::with_capacity(route.len() - 2);
    flat.extend_from_slice(&route[..=start]);
    flat.extend_from_slice(&route[start + 3..]);
    Ok(flat)
}

/// Apply one randomly chosen transform that keeps the route valid.
///
/// Up to `retries` (transform, index) pairs are drawn; attempts that fail a
/// precondition or leave an invalid route are discarded.
pub fn randomly_transform_once<R: RandomSource>(
    route: &[Point],
    rng: &mut R,
    retries: usize,
) -> Result<Route> {
    if route.len() < 2 {
        return Err(MazeError::InvalidGeometry(format!(
            "a route of {} points cannot be transformed",
            route.len()
        )));
    }

    let weights = Transform::WEIGHTED.map(|(_, w)| w);
    for _ in 0..retries {
        let transform = Transform::WEIGHTED[rng.weighted_index(&weights)].0;
        let start = rng.choice_index(route.len());

        match transform.apply(route, start) {
            Ok(candidate) if is_valid_route(&candidate) => return Ok(candidate),
            Ok(_) => trace!(?transform, start, "transform left an invalid route"),
            Err(e) => trace!(?transform, start, "transform precondition failed: {}", e),
        }
    }

    Err(MazeError::RetryExhausted(retries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleLCG;

    fn route(points: &[(i32, i32)]) -> Vec<Point> {
        points.iter().map(|&p| Point::from(p)).collect()
    }

    fn two_point_routes() -> Vec<Route> {
        vec![
            route(&[(0, 0), (2, 0)]),
            route(&[(0, 0), (0, 2)]),
            route(&[(0, 0), (-2, 0)]),
            route(&[(0, 0), (0, -2)]),
            route(&[(11, 5), (11, 3)]),
        ]
    }

    fn three_point_routes() -> Vec<Route> {
        vec![
            route(&[(0, 0), (0, 2), (2, 2)]),
            route(&[(0, 0), (0, 2), (-2, 2)]),
            route(&[(0, 0), (2, 0), (2, 2)]),
            route(&[(0, 0), (2, 0), (2, -2)]),
            route(&[(0, 0), (0, -2), (2, -2)]),
            route(&[(0, 0), (0, -2), (-2, -2)]),
            route(&[(0, 0), (-2, 0), (-2, 2)]),
            route(&[(0, 0), (-2, 0), (-2, -2)]),
            route(&[(7, 15), (9, 15), (9, 17)]),
        ]
    }

    #[test]
    fn test_bend_inserts_detour() {
        let bent = bender(&route(&[(1, 1), (1, 3)]), 0, Chirality::Right).unwrap();
        assert_eq!(bent, route(&[(1, 1), (3, 1), (3, 3), (1, 3)]));

        let bent = bender(&route(&[(1, 1), (1, 3)]), 0, Chirality::Left).unwrap();
        assert_eq!(bent, route(&[(1, 1), (-1, 1), (-1, 3), (1, 3)]));
    }

    #[test]
    fn test_bend_rejects_non_neighbours() {
        let err = bender(&route(&[(1, 1), (3, 3)]), 0, Chirality::Left).unwrap_err();
        assert!(matches!(err, MazeError::InvalidGeometry(_)));
        assert!(bender(&route(&[(1, 1), (1, 3)]), 1, Chirality::Left).is_err());
    }

    #[test]
    fn test_bend_and_flatten_is_identity() {
        for r in two_point_routes() {
            for chirality in [Chirality::Left, Chirality::Right] {
                let bent = bender(&r, 0, chirality).unwrap();
                assert_eq!(bent.len(), r.len() + 2);
                assert_eq!(flattener(&bent, 0).unwrap(), r);
            }
        }
    }

    #[test]
    fn test_flipper_twice_is_identity() {
        for r in three_point_routes() {
            let once = flipper(&r, 0).unwrap();
            assert_ne!(once, r);
            assert_eq!(once[0], r[0]);
            assert_eq!(once[2], r[2]);
            assert_eq!(flipper(&once, 0).unwrap(), r);
        }
    }

    #[test]
    fn test_flip_rejects_straight_window() {
        let err = flipper(&route(&[(1, 1), (1, 3), (1, 5)]), 0).unwrap_err();
        assert!(matches!(err, MazeError::InvalidGeometry(_)));
        assert!(flipper(&route(&[(1, 1), (1, 3)]), 0).is_err());
    }

    #[test]
    fn test_flatten_rejects_non_detour() {
        let r = route(&[(1, 1), (1, 3), (1, 5), (1, 7)]);
        assert!(matches!(
            flattener(&r, 0).unwrap_err(),
            MazeError::InvalidGeometry(_)
        ));
        assert!(flattener(&r, 1).is_err());
    }

    #[test]
    fn test_random_transform_keeps_route_valid() {
        let mut rng = SimpleLCG::new(4242);
        let mut r = route(&[(1, 1), (3, 1), (5, 1), (7, 1), (7, 3), (7, 5), (7, 7)]);
        let mut applied = 0;
        for _ in 0..200 {
            match randomly_transform_once(&r, &mut rng, 200) {
                Ok(next) => {
                    r = next;
                    applied += 1;
                }
                Err(e) => assert!(matches!(e, MazeError::RetryExhausted(200))),
            }
            assert!(is_valid_route(&r));
            assert_eq!(r.first(), Some(&Point::new(1, 1)));
            assert_eq!(r.last(), Some(&Point::new(7, 7)));
        }
        assert!(applied > 100);
    }

    #[test]
    fn test_random_transform_fails_explicitly() {
        // A straight corridor has nothing that stays inside its own span
        let mut rng = SimpleLCG::new(1);
        let r = route(&[(1, 1), (1, 3), (1, 5)]);
        let err = randomly_transform_once(&r, &mut rng, 50).unwrap_err();
        assert!(matches!(err, MazeError::RetryExhausted(50)));
    }
}
