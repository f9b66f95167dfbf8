//! Agent and route-point registries with proximity queries.

use std::cmp::Ordering;

use glam::DVec3;

use curfew_core::types::{GuardId, RoutePointId};

use crate::error::SpatialError;

/// An immutable labeled patrol waypoint. Many guards may reference the
/// same point; the directory owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePoint {
    pub id: RoutePointId,
    pub label: String,
    pub position: DVec3,
}

#[derive(Debug, Clone)]
struct AgentEntry {
    id: GuardId,
    position: DVec3,
}

/// Registry of agents and route points, in registration order.
///
/// Registration order is the tie-break for every query, which keeps
/// results deterministic across runs.
#[derive(Debug, Default)]
pub struct SpatialDirectory {
    agents: Vec<AgentEntry>,
    route_points: Vec<RoutePoint>,
}

impl SpatialDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. Position is refreshed via [`update_agent`].
    ///
    /// [`update_agent`]: SpatialDirectory::update_agent
    pub fn register_agent(&mut self, id: GuardId, position: DVec3) {
        self.agents.push(AgentEntry { id, position });
    }

    /// Refresh a registered agent's position. Unknown ids are ignored.
    pub fn update_agent(&mut self, id: GuardId, position: DVec3) {
        if let Some(entry) = self.agents.iter_mut().find(|e| e.id == id) {
            entry.position = position;
        }
    }

    /// Register a route point and return its id.
    pub fn register_route_point(&mut self, label: impl Into<String>, position: DVec3) -> RoutePointId {
        let id = RoutePointId(self.route_points.len() as u32);
        self.route_points.push(RoutePoint {
            id,
            label: label.into(),
            position,
        });
        id
    }

    /// Look up a registered route point.
    pub fn route_point(&self, id: RoutePointId) -> Option<&RoutePoint> {
        self.route_points.get(id.0 as usize)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn route_point_count(&self) -> usize {
        self.route_points.len()
    }

    /// The agent nearest to `point` by squared Euclidean distance.
    /// Ties go to the first registered agent.
    pub fn nearest_agent(&self, point: DVec3) -> Result<GuardId, SpatialError> {
        let mut best: Option<(f64, GuardId)> = None;
        for entry in &self.agents {
            let d = entry.position.distance_squared(point);
            match best {
                Some((best_d, _)) if d >= best_d => {}
                _ => best = Some((d, entry.id)),
            }
        }
        best.map(|(_, id)| id).ok_or(SpatialError::EmptyRegistry)
    }

    /// The `k` route points nearest to `point`, in non-decreasing
    /// distance order, ties broken by registration order.
    ///
    /// `k == 0` yields an empty vector; `k` beyond the population
    /// yields the full sorted population. Never an error.
    pub fn k_nearest_route_points(&self, point: DVec3, k: usize) -> Vec<&RoutePoint> {
        if k == 0 || self.route_points.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(f64, usize)> = self
            .route_points
            .iter()
            .enumerate()
            .map(|(order, rp)| (rp.position.distance_squared(point), order))
            .collect();
        ranked.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        ranked
            .into_iter()
            .take(k)
            .map(|(_, order)| &self.route_points[order])
            .collect()
    }
}
