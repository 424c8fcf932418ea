//! The corridor spanning tree
//!
//! A [`Trails`] node owns one unbranched corridor (`main`) and the sub-trees
//! sprouting from it. A branch's first point is its attachment point on the
//! parent's `main`; every other point of the branch is new to the tree.
//!
//! Sibling branches are kept in canonical order: by where they attach along
//! the parent corridor, then by turn side at that point (left before
//! straight before right). Two trees with the same geometry therefore compare
//! equal and serialize identically, however their branches were added.

use serde::{Deserialize, Serialize};

use crate::codec::TrailsRecord;
use crate::error::{MazeError, Result};
use crate::geometry::{Direction, Point, Route};
use crate::validation::{all_points_consecutive, all_points_unique};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TrailsRecord", try_from = "TrailsRecord")]
pub struct Trails {
    main: Route,
    branches: Vec<Trails>,
}

impl Trails {
    /// A tree with a single corridor and no branches
    pub fn new(main: Route) -> Self {
        Self {
            main,
            branches: Vec::new(),
        }
    }

    pub fn main(&self) -> &[Point] {
        &self.main
    }

    pub fn branches(&self) -> &[Trails] {
        &self.branches
    }

    /// Whether any corridor in the tree passes through `point`
    pub fn point_in_trails(&self, point: Point) -> bool {
        self.main.contains(&point) || self.branches.iter().any(|b| b.point_in_trails(point))
    }

    /// The node whose own `main` holds `point`.
    ///
    /// Attachment points are owned by the parent, so the search is pre-order.
    pub fn get_subtrail_by_point(&self, point: Point) -> Result<&Trails> {
        self.find_owner(point).ok_or(MazeError::PointNotFound(point))
    }

    pub fn get_subtrail_by_point_mut(&mut self, point: Point) -> Result<&mut Trails> {
        self.find_owner_mut(point).ok_or(MazeError::PointNotFound(point))
    }

    fn find_owner(&self, point: Point) -> Option<&Trails> {
        if self.main.contains(&point) {
            return Some(self);
        }
        self.branches.iter().find_map(|b| b.find_owner(point))
    }

    fn find_owner_mut(&mut self, point: Point) -> Option<&mut Trails> {
        if self.main.contains(&point) {
            return Some(self);
        }
        self.branches
            .iter_mut()
            .find_map(|b| b.find_owner_mut(point))
    }

    /// Every corridor in the tree, parent before children
    pub fn all_routes(&self) -> Vec<&Route> {
        let mut routes = Vec::new();
        self.collect_routes(&mut routes);
        routes
    }

    fn collect_routes<'a>(&'a self, out: &mut Vec<&'a Route>) {
        out.push(&self.main);
        for branch in &self.branches {
            branch.collect_routes(out);
        }
    }

    /// Every point of every corridor, pre-order. Attachment points appear twice.
    pub fn points(&self) -> Vec<Point> {
        self.all_routes()
            .into_iter()
            .flat_map(|r| r.iter().copied())
            .collect()
    }

    pub fn route_count(&self) -> usize {
        1 + self.branches.iter().map(Trails::route_count).sum::<usize>()
    }

    /// Number of distinct points covered by the tree
    pub fn point_count(&self) -> usize {
        // every branch shares exactly its first point with its parent
        self.main.len()
            + self
                .branches
                .iter()
                .map(|b| b.point_count() - 1)
                .sum::<usize>()
    }

    /// Attach `branch` to this node and restore canonical order.
    ///
    /// The branch must start on this node's `main`, be a simple walk of at least
    /// two points, and not touch anything already in this subtree besides its
    /// attachment point.
    pub fn add_branch(&mut self, branch: Trails) -> Result<()> {
        let route = &branch.main;
        if route.len() < 2 {
            return Err(MazeError::InvalidGeometry(format!(
                "branch needs at least 2 points, got {}",
                route.len()
            )));
        }
        if !all_points_unique(route) || !all_points_consecutive(route) {
            return Err(MazeError::InvalidGeometry(
                "branch is not a simple walk of grid steps".to_string(),
            ));
        }

        let anchor = route[0];
        if !self.main.contains(&anchor) {
            return Err(MazeError::PointNotFound(anchor));
        }
        if let Some(p) = branch
            .points()
            .into_iter()
            .filter(|&p| p != anchor)
            .find(|&p| self.point_in_trails(p))
        {
            return Err(MazeError::InvalidGeometry(format!(
                "branch from {anchor} revisits {p}"
            )));
        }

        self.branches.push(branch);
        self.branches.sort_by_key(|b| branch_key(&self.main, b));
        Ok(())
    }

    /// Attach `route` to whichever node owns its first point.
    pub fn graft(&mut self, route: Route) -> Result<()> {
        let anchor = *route.first().ok_or_else(|| {
            MazeError::InvalidGeometry("cannot graft an empty route".to_string())
        })?;
        if let Some(p) = route[1..].iter().find(|&&p| self.point_in_trails(p)) {
            return Err(MazeError::InvalidGeometry(format!(
                "branch from {anchor} revisits {p}"
            )));
        }
        self.get_subtrail_by_point_mut(anchor)?
            .add_branch(Trails::new(route))
    }
}

/// Sort key of a branch under a parent corridor: (attachment index, turn rank)
fn branch_key(main: &[Point], branch: &Trails) -> (usize, u8) {
    let anchor = branch.main[0];
    let Some(pos) = main.iter().position(|&p| p == anchor) else {
        return (usize::MAX, u8::MAX);
    };
    let Some(heading) = branch.main.get(1).map(|&p| p - anchor) else {
        return (pos, u8::MAX);
    };

    // incoming heading where there is one, otherwise the outgoing heading
    let reference = if pos > 0 {
        Some(main[pos] - main[pos - 1])
    } else {
        main.get(1).map(|&next| next - main[0])
    };

    let rank = match reference {
        Some(r) => turn_rank(r, heading),
        None => compass_rank(heading),
    };
    (pos, rank)
}

/// left = 0, straight = 1, right = 2, back = 3
fn turn_rank(reference: Point, heading: Point) -> u8 {
    let cross = reference.x * heading.y - reference.y * heading.x;
    let dot = reference.x * heading.x + reference.y * heading.y;
    if cross > 0 {
        0
    } else if cross == 0 && dot > 0 {
        1
    } else if cross < 0 {
        2
    } else {
        3
    }
}

fn compass_rank(heading: Point) -> u8 {
    Direction::CARDINALS
        .iter()
        .position(|d| d.offset() == heading)
        .map_or(u8::MAX, |i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(points: &[(i32, i32)]) -> Route {
        points.iter().map(|&p| Point::from(p)).collect()
    }

    /// A horizontal corridor heading east through (3, 3)
    fn corridor() -> Trails {
        Trails::new(route(&[(1, 3), (3, 3), (5, 3)]))
    }

    #[test]
    fn test_membership() {
        let mut trails = corridor();
        trails.graft(route(&[(3, 3), (3, 5), (5, 5)])).unwrap();

        assert!(trails.point_in_trails(Point::new(5, 5)));
        assert!(trails.point_in_trails(Point::new(1, 3)));
        assert!(!trails.point_in_trails(Point::new(1, 1)));
    }

    #[test]
    fn test_subtrail_lookup() {
        let mut trails = corridor();
        trails.graft(route(&[(3, 3), (3, 5), (5, 5)])).unwrap();

        let owner = trails.get_subtrail_by_point(Point::new(5, 5)).unwrap();
        assert_eq!(owner.main()[0], Point::new(3, 3));
        // the attachment point belongs to the parent
        let owner = trails.get_subtrail_by_point(Point::new(3, 3)).unwrap();
        assert_eq!(owner.main(), trails.main());

        let err = trails.get_subtrail_by_point(Point::new(9, 9)).unwrap_err();
        assert!(matches!(err, MazeError::PointNotFound(p) if p == Point::new(9, 9)));
    }

    #[test]
    fn test_all_routes_is_pre_order() {
        let mut trails = corridor();
        trails.graft(route(&[(3, 3), (3, 5)])).unwrap();
        trails.graft(route(&[(3, 5), (5, 5)])).unwrap();
        trails.graft(route(&[(5, 3), (5, 1)])).unwrap();

        let routes = trails.all_routes();
        assert_eq!(routes.len(), 4);
        assert_eq!(routes[0], &route(&[(1, 3), (3, 3), (5, 3)]));
        assert_eq!(routes[1], &route(&[(3, 3), (3, 5)]));
        assert_eq!(routes[2], &route(&[(3, 5), (5, 5)]));
        assert_eq!(routes[3], &route(&[(5, 3), (5, 1)]));
        assert_eq!(trails.route_count(), 4);
        assert_eq!(trails.point_count(), 6);
    }

    #[test]
    fn test_canonical_order_is_insertion_independent() {
        let north = route(&[(3, 3), (3, 5)]);
        let south = route(&[(3, 3), (3, 1)]);
        let tail = route(&[(5, 3), (5, 5)]);

        let mut a = corridor();
        a.graft(tail.clone()).unwrap();
        a.graft(south.clone()).unwrap();
        a.graft(north.clone()).unwrap();

        let mut b = corridor();
        b.graft(north.clone()).unwrap();
        b.graft(south.clone()).unwrap();
        b.graft(tail.clone()).unwrap();

        assert_eq!(a, b);
        // heading east, north is the left turn
        let order: Vec<&[Point]> = a.branches().iter().map(Trails::main).collect();
        assert_eq!(order, vec![&north[..], &south[..], &tail[..]]);
    }

    #[test]
    fn test_left_before_straight_at_a_turn() {
        // main comes in heading north and turns east at (3, 3)
        let mut trails = Trails::new(route(&[(3, 1), (3, 3), (5, 3)]));
        let straight = route(&[(3, 3), (3, 5)]);
        let left = route(&[(3, 3), (1, 3)]);
        trails.graft(straight.clone()).unwrap();
        trails.graft(left.clone()).unwrap();

        assert_eq!(trails.branches()[0].main(), &left[..]);
        assert_eq!(trails.branches()[1].main(), &straight[..]);
    }

    #[test]
    fn test_single_point_main_uses_compass_order() {
        let mut trails = Trails::new(route(&[(3, 3)]));
        trails.graft(route(&[(3, 3), (1, 3)])).unwrap();
        trails.graft(route(&[(3, 3), (3, 5)])).unwrap();
        trails.graft(route(&[(3, 3), (5, 3)])).unwrap();

        let firsts: Vec<Point> = trails.branches().iter().map(|b| b.main()[1]).collect();
        assert_eq!(
            firsts,
            vec![Point::new(3, 5), Point::new(5, 3), Point::new(1, 3)]
        );
    }

    #[test]
    fn test_add_branch_rejects_bad_branches() {
        let mut trails = corridor();

        // too short
        assert!(trails.add_branch(Trails::new(route(&[(3, 3)]))).is_err());
        // does not start on main
        assert!(matches!(
            trails.add_branch(Trails::new(route(&[(7, 7), (7, 9)]))),
            Err(MazeError::PointNotFound(_))
        ));
        // revisits the corridor
        assert!(matches!(
            trails.add_branch(Trails::new(route(&[(3, 3), (3, 5), (5, 5), (5, 3)]))),
            Err(MazeError::InvalidGeometry(_))
        ));
        // not a walk of grid steps
        assert!(trails
            .add_branch(Trails::new(route(&[(3, 3), (3, 7)])))
            .is_err());
        assert!(trails.branches().is_empty());
    }

    #[test]
    fn test_graft_rejects_points_owned_elsewhere() {
        let mut trails = corridor();
        trails.graft(route(&[(3, 3), (3, 5), (5, 5)])).unwrap();

        // starts on main but runs into the first branch
        let err = trails.graft(route(&[(5, 3), (5, 5)])).unwrap_err();
        assert!(matches!(err, MazeError::InvalidGeometry(_)));
        assert!(trails.graft(Vec::new()).is_err());
    }
}
