//! Route validation rules
//!
//! Every rule returns `true` when the route passes. These are the acceptance
//! gate for every transform applied to a route.

use std::collections::HashSet;

use crate::error::{MazeError, Result};
use crate::geometry::{dist_l1, Point, STEP};

/// No point appears twice
pub fn all_points_unique(route: &[Point]) -> bool {
    let mut seen = HashSet::with_capacity(route.len());
    route.iter().all(|p| seen.insert(*p))
}

/// Every consecutive pair is exactly one grid step apart
pub fn all_points_consecutive(route: &[Point]) -> bool {
    route.windows(2).all(|w| w[0].is_neighbour(w[1]))
}

/// Every point lies in the region spanned by the route's first and last point.
///
/// A point `p` passes when `|p - start| + |p - end| <= |end - start|`, which on
/// the lattice is the bounding rectangle of the two endpoints.
pub fn all_points_inside(route: &[Point]) -> bool {
    let (Some(&start), Some(&end)) = (route.first(), route.last()) else {
        return true;
    };
    let span = dist_l1(start, end);
    route
        .iter()
        .all(|&p| dist_l1(p, start) + dist_l1(p, end) <= span)
}

/// All three route rules at once
pub fn is_valid_route(route: &[Point]) -> bool {
    all_points_unique(route) && all_points_consecutive(route) && all_points_inside(route)
}

/// A three point window can be flipped when its ends form a diagonal jog
pub fn subroute_flippable(subroute: &[Point]) -> Result<bool> {
    let [first, _, last] = subroute else {
        return Err(MazeError::InvalidGeometry(format!(
            "flip window must be 3 points long, got {}",
            subroute.len()
        )));
    };
    Ok((first.x - last.x).abs() == STEP && (first.y - last.y).abs() == STEP)
}

/// A four point window can be flattened when its ends are neighbours
pub fn subroute_flattenable(subroute: &[Point]) -> Result<bool> {
    let [first, _, _, last] = subroute else {
        return Err(MazeError::InvalidGeometry(format!(
            "flatten window must be 4 points long, got {}",
            subroute.len()
        )));
    };
    Ok(dist_l1(*first, *last) == STEP)
}
