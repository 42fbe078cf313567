use serde::{Deserialize, Serialize};

use crate::links::NavLinks;
use crate::ExpoError;

/// Zoom level handed to the map collaborator for a venue view.
pub const DEFAULT_ZOOM: u8 = 17;

/// WGS84 position. Serialized as a `[lat, lng]` pair.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance in meters.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.lat, value.lng)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Venue {
    pub key: String,
    pub name: String,
    pub center: Coordinate,
    pub taxi: Coordinate,
    #[serde(alias = "desc")]
    pub description: String,
}

impl Venue {
    fn matches(&self, ident: &str) -> bool {
        let ident = ident.trim();
        self.key.eq_ignore_ascii_case(ident) || self.name == ident
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Blue,
    Red,
}

impl MarkerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Blue => "blue",
            MarkerColor::Red => "red",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapMarker {
    pub position: Coordinate,
    pub label: String,
    pub color: MarkerColor,
    pub icon: String,
}

/// Everything a front end needs to show one venue.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VenueSelection {
    pub name: String,
    pub description: String,
    pub center: Coordinate,
    pub taxi: Coordinate,
    pub zoom: u8,
    pub markers: [MapMarker; 2],
    pub links: NavLinks,
    pub walk_distance_m: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct VenueTable {
    venues: Vec<Venue>,
}

const BUILTIN: [(&str, &str, (f64, f64), (f64, f64), &str); 4] = [
    (
        "coex",
        "COEX (서울 삼성동)",
        (37.5118, 127.0593),
        (37.5125, 127.0588),
        "코엑스 동문 앞 대로변",
    ),
    (
        "kintex1",
        "KINTEX 제1전시장 (일산)",
        (37.6690, 126.7460),
        (37.6695, 126.7475),
        "제1전시장 3번 게이트 앞",
    ),
    (
        "kintex2",
        "KINTEX 제2전시장 (일산)",
        (37.6645, 126.7410),
        (37.6640, 126.7405),
        "제2전시장 7번 게이트 앞",
    ),
    (
        "bexco",
        "BEXCO (부산)",
        (35.1691, 129.1360),
        (35.1695, 129.1365),
        "제1전시장 정문 앞 광장",
    ),
];

impl Default for VenueTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VenueTable {
    /// The fixed set of exhibition centres shipped with the app.
    pub fn builtin() -> Self {
        let venues = BUILTIN
            .iter()
            .map(|&(key, name, center, taxi, description)| Venue {
                key: key.to_string(),
                name: name.to_string(),
                center: center.into(),
                taxi: taxi.into(),
                description: description.to_string(),
            })
            .collect();
        Self { venues }
    }

    /// Parse a replacement table from a JSON array of venue records.
    pub fn from_json(text: &str) -> Result<Self, ExpoError> {
        let venues: Vec<Venue> =
            serde_json::from_str(text).map_err(|e| ExpoError::InvalidVenueTable(e.to_string()))?;
        Self::from_venues(venues)
    }

    pub fn from_venues(venues: Vec<Venue>) -> Result<Self, ExpoError> {
        if venues.is_empty() {
            return Err(ExpoError::InvalidVenueTable("table has no venues".into()));
        }
        for (idx, venue) in venues.iter().enumerate() {
            if venue.key.trim().is_empty() {
                return Err(ExpoError::InvalidVenueTable(format!(
                    "venue #{} has an empty key",
                    idx + 1
                )));
            }
            if !venue.center.is_valid() || !venue.taxi.is_valid() {
                return Err(ExpoError::InvalidVenueTable(format!(
                    "venue '{}' has an out-of-range coordinate",
                    venue.key
                )));
            }
            if venues[..idx]
                .iter()
                .any(|prev| prev.key.eq_ignore_ascii_case(&venue.key))
            {
                return Err(ExpoError::InvalidVenueTable(format!(
                    "duplicate venue key '{}'",
                    venue.key
                )));
            }
        }
        Ok(Self { venues })
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.venues.iter().map(|v| v.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    /// Look up a venue by its key (case-insensitive) or exact display name.
    pub fn get(&self, ident: &str) -> Option<&Venue> {
        self.venues.iter().find(|v| v.matches(ident))
    }

    pub fn select(&self, ident: &str) -> Result<VenueSelection, ExpoError> {
        self.get(ident)
            .map(select_venue)
            .ok_or_else(|| ExpoError::UnknownVenue(ident.to_string()))
    }
}

/// Popup text on the taxi-stand marker.
pub const TAXI_MARKER_LABEL: &str = "택시 승강장";

/// Build the display data for one venue: markers, links and walking distance.
pub fn select_venue(venue: &Venue) -> VenueSelection {
    let markers = [
        MapMarker {
            position: venue.center,
            label: venue.name.clone(),
            color: MarkerColor::Blue,
            icon: "info-sign".to_string(),
        },
        MapMarker {
            position: venue.taxi,
            label: TAXI_MARKER_LABEL.to_string(),
            color: MarkerColor::Red,
            icon: "taxi".to_string(),
        },
    ];
    VenueSelection {
        name: venue.name.clone(),
        description: venue.description.clone(),
        center: venue.center,
        taxi: venue.taxi,
        zoom: DEFAULT_ZOOM,
        markers,
        links: NavLinks::for_taxi_stand(venue.taxi),
        walk_distance_m: venue.center.distance_m(&venue.taxi),
    }
}

fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let r = 6_371_000.0_f64;
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    r * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_selection_matches_table() {
        let table = VenueTable::builtin();
        assert_eq!(table.len(), 4);
        for &(key, name, center, taxi, desc) in BUILTIN.iter() {
            for ident in [key, name] {
                let sel = table.select(ident).unwrap();
                assert_eq!(sel.name, name);
                assert_eq!(sel.description, desc);
                assert_eq!(sel.center, Coordinate::from(center));
                assert_eq!(sel.taxi, Coordinate::from(taxi));
                assert_eq!(sel.zoom, DEFAULT_ZOOM);
            }
        }
    }

    #[test]
    fn names_keep_display_order() {
        let table = VenueTable::builtin();
        let names: Vec<&str> = table.names().collect();
        assert_eq!(
            names,
            vec![
                "COEX (서울 삼성동)",
                "KINTEX 제1전시장 (일산)",
                "KINTEX 제2전시장 (일산)",
                "BEXCO (부산)",
            ]
        );
    }

    #[test]
    fn markers_are_center_blue_and_taxi_red() {
        let sel = VenueTable::builtin().select("coex").unwrap();
        let [center, taxi] = &sel.markers;
        assert_eq!(center.color, MarkerColor::Blue);
        assert_eq!(center.label, "COEX (서울 삼성동)");
        assert_eq!(center.position, Coordinate::new(37.5118, 127.0593));
        assert_eq!(taxi.color, MarkerColor::Red);
        assert_eq!(taxi.label, "택시 승강장");
        assert_eq!(taxi.icon, "taxi");
        assert_eq!(taxi.position, Coordinate::new(37.5125, 127.0588));
    }

    #[test]
    fn key_lookup_is_case_insensitive() {
        let table = VenueTable::builtin();
        assert_eq!(table.get("BEXCO").unwrap().key, "bexco");
        assert_eq!(table.get(" kintex2 ").unwrap().key, "kintex2");
    }

    #[test]
    fn unknown_venue_is_an_error() {
        let err = VenueTable::builtin().select("eurasia").unwrap_err();
        assert!(matches!(err, ExpoError::UnknownVenue(ref v) if v == "eurasia"));
    }

    #[test]
    fn walk_distance_is_short() {
        let sel = VenueTable::builtin().select("coex").unwrap();
        assert!(sel.walk_distance_m > 50.0 && sel.walk_distance_m < 150.0);
    }

    #[test]
    fn haversine_one_degree_at_equator() {
        let dist = haversine_distance(0.0, 0.0, 0.0, 1.0);
        assert!((dist - 111_195.0).abs() < 200.0);
    }

    #[test]
    fn json_table_accepts_pair_coordinates_and_desc_alias() {
        let text = r#"[
            {"key": "setec", "name": "SETEC", "center": [37.4946, 127.0713],
             "taxi": [37.4950, 127.0720], "desc": "정문 앞"}
        ]"#;
        let table = VenueTable::from_json(text).unwrap();
        let sel = table.select("setec").unwrap();
        assert_eq!(sel.description, "정문 앞");
        assert_eq!(sel.taxi, Coordinate::new(37.4950, 127.0720));
    }

    #[test]
    fn json_table_rejects_bad_rows() {
        assert!(matches!(
            VenueTable::from_json("[]"),
            Err(ExpoError::InvalidVenueTable(_))
        ));
        let bad_coord = r#"[{"key": "x", "name": "X", "center": [91.0, 0.0],
            "taxi": [0.0, 0.0], "description": "d"}]"#;
        assert!(matches!(
            VenueTable::from_json(bad_coord),
            Err(ExpoError::InvalidVenueTable(_))
        ));
        let dup = r#"[
            {"key": "a", "name": "A", "center": [0, 0], "taxi": [0, 0], "description": ""},
            {"key": "A", "name": "B", "center": [0, 0], "taxi": [0, 0], "description": ""}
        ]"#;
        assert!(matches!(
            VenueTable::from_json(dup),
            Err(ExpoError::InvalidVenueTable(_))
        ));
    }

    #[test]
    fn builtin_round_trips_through_json() {
        let table = VenueTable::builtin();
        let text = serde_json::to_string(&table).unwrap();
        assert!(text.contains("[37.5125,127.0588]"));
        assert_eq!(VenueTable::from_json(&text).unwrap(), table);
    }
}
