//! Domain data structures for municipalities, locations, and parcels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schedule::{ScheduleError, parse_day_name};

const MAP_EMBED_URL: &str = "https://www.openstreetmap.org/export/embed.html";

/// Built-in municipalities supported by the application.
pub enum Municipalities {
    /// Kansas City, Missouri.
    KansasCity,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a municipality known to trashday.
pub struct MunicipalityId(pub String);

impl fmt::Display for Municipalities {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Municipalities::KansasCity => "kansas-city",
        };
        write!(formatter, "{slug}")
    }
}

impl From<Municipalities> for MunicipalityId {
    fn from(municipality: Municipalities) -> Self {
        MunicipalityId(municipality.to_string())
    }
}

impl fmt::Display for MunicipalityId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// A position in decimal degrees.
pub struct Coordinates {
    /// Latitude, positive north.
    pub latitude: f64,
    /// Longitude, positive east.
    pub longitude: f64,
}

impl Coordinates {
    /// Half width of the embedded map in degrees longitude.
    const MAP_HALF_WIDTH: f64 = 0.0005;
    /// Half height of the embedded map in degrees latitude.
    const MAP_HALF_HEIGHT: f64 = 0.000_375;

    /// Construct coordinates from latitude and longitude.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// OpenStreetMap embed URL centered on these coordinates with a marker.
    #[must_use]
    pub fn map_embed_url(&self) -> String {
        let east = self.longitude + Self::MAP_HALF_WIDTH;
        let west = self.longitude - Self::MAP_HALF_WIDTH;
        let north = self.latitude + Self::MAP_HALF_HEIGHT;
        let south = self.latitude - Self::MAP_HALF_HEIGHT;

        format!(
            "{MAP_EMBED_URL}?bbox={west}%2C{south}%2C{east}%2C{north}&layer=mapnik&marker={},{}",
            self.latitude, self.longitude
        )
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Bounding box a municipality serves.
pub struct ServiceArea {
    /// Northern latitude limit.
    pub north: f64,
    /// Southern latitude limit.
    pub south: f64,
    /// Eastern longitude limit.
    pub east: f64,
    /// Western longitude limit.
    pub west: f64,
}

impl ServiceArea {
    /// Whether the coordinates fall inside the box, edges included.
    #[must_use]
    pub fn contains(&self, coordinates: Coordinates) -> bool {
        (self.south..=self.north).contains(&coordinates.latitude)
            && (self.west..=self.east).contains(&coordinates.longitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a municipality and its service area.
pub struct MunicipalityMeta {
    /// Unique identifier.
    pub id: MunicipalityId,
    /// Display name.
    pub name: String,
    /// Area in which locations are resolved by this municipality.
    pub area: ServiceArea,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a land-record parcel.
pub struct ParcelId(pub String);

impl fmt::Display for ParcelId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Nominal pick-up day of a parcel as reported by the municipality.
pub struct TrashSchedule {
    /// Parcel the schedule belongs to.
    pub parcel: ParcelId,
    /// Weekday name as delivered by the provider, e.g. `"Thursday"`.
    pub base_day_name: String,
}

impl TrashSchedule {
    /// Resolve the base day name to a weekday.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::UnresolvedBaseDay`] when the name is not a weekday.
    pub fn base_day(&self) -> Result<chrono::Weekday, ScheduleError> {
        parse_day_name(&self.base_day_name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;

    const KANSAS_CITY: ServiceArea = ServiceArea {
        north: 39.37,
        south: 38.82,
        east: -94.37,
        west: -94.77,
    };

    #[test]
    fn service_area_contains_downtown() {
        assert!(
            KANSAS_CITY.contains(Coordinates::new(39.0997, -94.5786)),
            "downtown Kansas City is inside the box"
        );
    }

    #[test]
    fn service_area_rejects_outside_points() {
        assert!(
            !KANSAS_CITY.contains(Coordinates::new(38.6270, -90.1994)),
            "St. Louis is outside the box"
        );
        assert!(
            !KANSAS_CITY.contains(Coordinates::new(39.5, -94.5)),
            "north of the box is outside"
        );
    }

    #[test]
    fn map_embed_url_centers_marker() {
        let url = Coordinates::new(39.0, -94.5).map_embed_url();
        assert!(
            url.starts_with("https://www.openstreetmap.org/export/embed.html?bbox="),
            "unexpected url {url}"
        );
        assert!(
            url.ends_with("&layer=mapnik&marker=39,-94.5"),
            "unexpected url {url}"
        );
    }

    #[test]
    fn municipality_id_from_builtin() {
        let id = MunicipalityId::from(Municipalities::KansasCity);
        assert_eq!(id.0, "kansas-city", "slug should be kebab case");
    }

    #[test]
    fn trash_schedule_resolves_base_day() {
        let schedule = TrashSchedule {
            parcel: ParcelId("123".to_owned()),
            base_day_name: "Thursday".to_owned(),
        };
        assert_eq!(
            schedule.base_day(),
            Ok(Weekday::Thu),
            "Thursday should resolve"
        );

        let unknown = TrashSchedule {
            parcel: ParcelId("123".to_owned()),
            base_day_name: "Someday".to_owned(),
        };
        assert!(
            unknown.base_day().is_err(),
            "unknown names must not resolve"
        );
    }
}
