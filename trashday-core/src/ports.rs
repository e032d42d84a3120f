//! Traits describing provider capabilities and shared helper types.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{Coordinates, MunicipalityMeta, ParcelId, TrashSchedule};
use crate::schedule::ScheduleError;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while resolving a pick-up day.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Pick-up day could not be computed.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    /// No registered municipality serves the location.
    #[error("Your location is not in a supported service area")]
    OutsideServiceArea,
    /// Location or query did not resolve to an address.
    #[error("Could not find your address")]
    AddressNotFound,
    /// Address is not a known parcel.
    #[error("No parcel found for {0}")]
    ParcelNotFound(String),
    /// Parcel has no trash day on record.
    #[error("No trash day on record for parcel {0}")]
    TrashDayNotFound(ParcelId),
    /// The municipality has no registered plugin.
    #[error("Unsupported municipality")]
    UnsupportedMunicipality,
    /// Geocoding requires an API key that was not configured.
    #[error("Geocoding API key is not configured")]
    MissingApiKey,
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone)]
/// Free-text street address to resolve to a parcel.
pub struct AddressQuery {
    /// Address as typed or as returned by reverse geocoding, e.g. `"414 E 12th St"`.
    pub address: String,
}

impl AddressQuery {
    /// Construct a new query.
    #[must_use]
    pub fn new<S: Into<String>>(address: S) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// Check if the query is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.address.trim().is_empty()
    }

    /// Trimmed, upper-case address with inner whitespace collapsed.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.address
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }
}

#[async_trait]
/// Trait for reverse geocoding backends.
pub trait GeocodePort: Send + Sync {
    /// Metadata describing the municipality handled by this port.
    fn municipality(&self) -> &MunicipalityMeta;

    /// Street address at the coordinates, `None` when nothing is found.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>, PortError>;
}

#[async_trait]
/// Trait for municipality parcel and trash-day backends.
pub trait ParcelPort: Send + Sync {
    /// Metadata describing the municipality handled by this port.
    fn municipality(&self) -> &MunicipalityMeta;

    /// Parcel matching the address, `None` when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn parcel_id(&self, query: &AddressQuery) -> Result<Option<ParcelId>, PortError>;

    /// Nominal pick-up day of the parcel, `None` when none is on record.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn trash_schedule(&self, parcel: &ParcelId) -> Result<Option<TrashSchedule>, PortError>;
}
