//! Service center ranking and selection
//!
//! Ranks the backend-supplied center list by distance from the user and
//! holds the single selected-center id that the map and list views share.
//! Without a user position, ranking degrades to backend order; that is a
//! documented degraded mode, not an error.

use crate::api::ServiceCenter;
use crate::error::{Error, Result};
use crate::geo::{self, Coordinates};
use serde::Serialize;

/// Sort centers ascending by distance from the user
///
/// With no position the input order is returned unchanged. The sort is
/// stable: centers at equal distance keep their backend-supplied relative
/// order.
pub fn rank(centers: &[ServiceCenter], user_pos: Option<Coordinates>) -> Vec<ServiceCenter> {
    let mut ranked = centers.to_vec();
    if let Some(pos) = user_pos {
        ranked.sort_by(|a, b| {
            geo::distance_km(pos, a.location).total_cmp(&geo::distance_km(pos, b.location))
        });
    }
    ranked
}

/// A center annotated with its distance from the user, for presentation
#[derive(Debug, Clone, Serialize)]
pub struct RankedCenter {
    #[serde(flatten)]
    pub center: ServiceCenter,
    /// Kilometers from the user; absent in the unranked degraded mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub selected: bool,
}

/// Selection state over the loaded center set
///
/// Holds exactly one optional selected id. The map view and the list view
/// are both projections of this state, so they can never disagree about
/// which center is selected. Re-ranking (a position update or a reload that
/// keeps the selected center) changes presentation order only.
#[derive(Debug, Default)]
pub struct CenterSelection {
    centers: Vec<ServiceCenter>,
    selected: Option<i64>,
    user_pos: Option<Coordinates>,
}

impl CenterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn centers(&self) -> &[ServiceCenter] {
        &self.centers
    }

    pub fn user_pos(&self) -> Option<Coordinates> {
        self.user_pos
    }

    /// Replace the loaded center set
    ///
    /// The current selection survives when the selected id is still present
    /// in the new set, and is dropped otherwise.
    pub fn load(&mut self, centers: Vec<ServiceCenter>) {
        if let Some(id) = self.selected {
            if !centers.iter().any(|c| c.id == id) {
                self.selected = None;
            }
        }
        self.centers = centers;
    }

    /// Update the user position; affects ordering, never the selection
    pub fn set_user_pos(&mut self, user_pos: Option<Coordinates>) {
        self.user_pos = user_pos;
    }

    /// Select a center by id
    ///
    /// Fails when the id is not in the currently loaded set; a selection
    /// must always reference a loaded center.
    pub fn select(&mut self, id: i64) -> Result<()> {
        if !self.centers.iter().any(|c| c.id == id) {
            return Err(Error::UnknownCenter(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected
    }

    pub fn selected(&self) -> Option<&ServiceCenter> {
        let id = self.selected?;
        self.centers.iter().find(|c| c.id == id)
    }

    /// Centers in presentation order, annotated with distance and selection
    ///
    /// This single projection backs both the list view and the map view.
    pub fn ranked(&self) -> Vec<RankedCenter> {
        rank(&self.centers, self.user_pos)
            .into_iter()
            .map(|center| RankedCenter {
                distance_km: self.user_pos.map(|pos| geo::distance_km(pos, center.location)),
                selected: self.selected == Some(center.id),
                center,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(id: i64, name: &str, lat: f64, lng: f64) -> ServiceCenter {
        ServiceCenter {
            id,
            name: name.to_string(),
            address: format!("{} street", name),
            location: Coordinates::new(lat, lng),
        }
    }

    fn sample_centers() -> Vec<ServiceCenter> {
        vec![
            center(1, "North", 45.10, 41.97),
            center(2, "Downtown", 45.043, 41.97),
            center(3, "South", 44.95, 41.97),
        ]
    }

    #[test]
    fn test_rank_without_position_is_identity() {
        let centers = sample_centers();
        let ranked = rank(&centers, None);
        let ids: Vec<i64> = ranked.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_rank_orders_by_distance() {
        let centers = sample_centers();
        let user = Coordinates::new(45.043, 41.97);

        let ranked = rank(&centers, Some(user));
        let ids: Vec<i64> = ranked.iter().map(|c| c.id).collect();
        // Downtown is at the user's position; North is closer than South
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_rank_is_a_permutation_with_nondecreasing_distance() {
        let centers = sample_centers();
        let user = Coordinates::new(44.90, 42.10);

        let ranked = rank(&centers, Some(user));
        assert_eq!(ranked.len(), centers.len());
        for c in &centers {
            assert!(ranked.iter().any(|r| r.id == c.id));
        }

        let distances: Vec<f64> = ranked
            .iter()
            .map(|c| geo::distance_km(user, c.location))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_rank_ties_keep_backend_order() {
        // Two centers at the same location, user elsewhere
        let centers = vec![
            center(7, "Twin A", 45.0, 41.0),
            center(8, "Twin B", 45.0, 41.0),
            center(9, "Far", 50.0, 41.0),
        ];
        let user = Coordinates::new(45.5, 41.0);

        let ranked = rank(&centers, Some(user));
        let ids: Vec<i64> = ranked.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn test_select_requires_loaded_center() {
        let mut selection = CenterSelection::new();
        selection.load(sample_centers());

        assert!(selection.select(2).is_ok());
        assert_eq!(selection.selected_id(), Some(2));

        let err = selection.select(99).unwrap_err();
        assert!(matches!(err, Error::UnknownCenter(99)));
        // Failed select leaves the previous selection in place
        assert_eq!(selection.selected_id(), Some(2));

        selection.clear_selection();
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_reranking_preserves_selection() {
        let mut selection = CenterSelection::new();
        selection.load(sample_centers());
        selection.select(3).unwrap();

        selection.set_user_pos(Some(Coordinates::new(45.10, 41.97)));

        let ranked = selection.ranked();
        assert_eq!(ranked[0].center.id, 1);
        assert_eq!(selection.selected_id(), Some(3));
        let selected_row = ranked.iter().find(|r| r.selected).unwrap();
        assert_eq!(selected_row.center.id, 3);
    }

    #[test]
    fn test_reload_drops_selection_of_vanished_center() {
        let mut selection = CenterSelection::new();
        selection.load(sample_centers());
        selection.select(3).unwrap();

        selection.load(vec![center(1, "North", 45.10, 41.97)]);
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_reload_keeps_selection_of_surviving_center() {
        let mut selection = CenterSelection::new();
        selection.load(sample_centers());
        selection.select(2).unwrap();

        selection.load(sample_centers());
        assert_eq!(selection.selected_id(), Some(2));
    }

    #[test]
    fn test_ranked_annotations() {
        let mut selection = CenterSelection::new();
        selection.load(sample_centers());
        selection.select(1).unwrap();

        // Unranked: no distances
        let unranked = selection.ranked();
        assert!(unranked.iter().all(|r| r.distance_km.is_none()));

        selection.set_user_pos(Some(Coordinates::new(45.043, 41.97)));
        let ranked = selection.ranked();
        assert!(ranked.iter().all(|r| r.distance_km.is_some()));
        assert!(ranked[0].distance_km.unwrap() < 0.01);
    }
}
