//! Deep links into third-party map apps.
//!
//! Coordinates are interpolated with `f64`'s `Display`, which prints the
//! shortest decimal that round-trips (`37.5125`, `126.746`), never exponent
//! notation for WGS84 ranges. The label is inserted verbatim; mobile map apps
//! accept the raw UTF-8 path segment.

use serde::{Deserialize, Serialize};

use crate::venue::Coordinate;

pub const TAXI_STAND_LABEL: &str = "택시승강장";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavLinks {
    pub naver: String,
    pub kakao: String,
}

impl NavLinks {
    /// Walking directions from the user's position to the given taxi stand.
    pub fn for_taxi_stand(taxi: Coordinate) -> Self {
        Self {
            naver: naver_walk_url(taxi),
            kakao: kakao_route_url(taxi),
        }
    }
}

pub fn naver_walk_url(to: Coordinate) -> String {
    format!(
        "https://map.naver.com/v5/directions/-/-/{},{},{}/-/walk",
        to.lng, to.lat, TAXI_STAND_LABEL
    )
}

pub fn kakao_route_url(to: Coordinate) -> String {
    format!(
        "https://map.kakao.com/link/to/{},{},{}",
        TAXI_STAND_LABEL, to.lat, to.lng
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::VenueTable;

    #[test]
    fn coex_links_are_bit_exact() {
        let links = NavLinks::for_taxi_stand(Coordinate::new(37.5125, 127.0588));
        assert_eq!(
            links.naver,
            "https://map.naver.com/v5/directions/-/-/127.0588,37.5125,택시승강장/-/walk"
        );
        assert_eq!(
            links.kakao,
            "https://map.kakao.com/link/to/택시승강장,37.5125,127.0588"
        );
    }

    #[test]
    fn trailing_zeros_are_dropped() {
        let links = NavLinks::for_taxi_stand(Coordinate::new(37.6640, 126.7405));
        assert_eq!(
            links.kakao,
            "https://map.kakao.com/link/to/택시승강장,37.664,126.7405"
        );
    }

    #[test]
    fn every_venue_links_to_its_taxi_stand() {
        for venue in VenueTable::builtin().venues() {
            let links = NavLinks::for_taxi_stand(venue.taxi);
            let lat = venue.taxi.lat.to_string();
            let lng = venue.taxi.lng.to_string();
            assert!(links.naver.contains(&format!("/{lng},{lat},")));
            assert!(links.kakao.ends_with(&format!(",{lat},{lng}")));
        }
    }
}
