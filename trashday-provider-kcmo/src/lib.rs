//! Provider implementation for Kansas City, Missouri using the KCMO GIS services.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use trashday_core::{
    model::{Coordinates, MunicipalityId, MunicipalityMeta, ParcelId, ServiceArea, TrashSchedule},
    plugin::MunicipalityPlugin,
    ports::{AddressQuery, GeocodePort, ParcelPort, PortError},
};

const GEOCODE_URL: &str = "https://app.geocodeapi.io/api/v1/reverse";
const PARCEL_ID_URL: &str =
    "https://maps5.kcmo.org/kcgis/rest/services/DataLayers/MapServer/39/query";
const PARCEL_DATA_URL: &str =
    "https://maps5.kcmo.org/kcgis/rest/services/ParcelGeocodes/MapServer/1/query";

const SERVICE_AREA: ServiceArea = ServiceArea {
    north: 39.37,
    south: 38.82,
    east: -94.37,
    west: -94.77,
};

/// Response from the reverse geocoding endpoint
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    properties: GeocodeProperties,
}

#[derive(Debug, Deserialize)]
struct GeocodeProperties {
    // Street line, e.g. "414 E 12th St"
    name: String,
}

/// `ArcGIS` `query` response, generic over the requested attributes
#[derive(Debug, Deserialize)]
struct QueryResponse<A> {
    #[serde(default = "Vec::new")]
    features: Vec<QueryFeature<A>>,
    // ArcGIS reports query errors with a 200 status
    error: Option<QueryError>,
}

#[derive(Debug, Deserialize)]
struct QueryFeature<A> {
    attributes: A,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    code: i64,
    message: String,
}

/// Attribute values come back as strings or numbers depending on the layer
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Number(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => formatter.write_str(text.trim()),
            FieldValue::Number(number) => write!(formatter, "{number}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PinAttributes {
    #[serde(rename = "PIN")]
    pin: Option<FieldValue>,
}

#[derive(Debug, Deserialize)]
struct TrashDayAttributes {
    #[serde(rename = "TRASHDAY")]
    trash_day: Option<String>,
}

impl<A> QueryResponse<A> {
    /// Attributes of the first feature, failing on `ArcGIS` error payloads.
    fn first(self) -> Result<Option<A>, PortError> {
        if let Some(error) = self.error {
            return Err(PortError::Internal(format!(
                "KCMO GIS error {}: {}",
                error.code, error.message
            )));
        }
        Ok(self
            .features
            .into_iter()
            .next()
            .map(|feature| feature.attributes))
    }
}

/// Reverse geocoding through geocodeapi.io.
pub struct GeocodeApiPort {
    client: Client,
    meta: MunicipalityMeta,
    api_key: Option<String>,
}

impl GeocodeApiPort {
    /// Create a new geocoding port bound to the given HTTP client and API key.
    #[must_use]
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            meta: municipality_meta(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }
}

#[async_trait]
impl GeocodePort for GeocodeApiPort {
    fn municipality(&self) -> &MunicipalityMeta {
        &self.meta
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>, PortError> {
        let api_key = self.api_key.as_deref().ok_or(PortError::MissingApiKey)?;

        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();
        let req = self.client.get(GEOCODE_URL).query(&[
            ("point.lat", latitude.as_str()),
            ("point.lon", longitude.as_str()),
            ("apikey", api_key),
        ]);

        let resp = fetch_json::<GeocodeResponse>(req).await?;
        debug!(features = resp.features.len(), "reverse geocoding response");

        Ok(first_address(resp))
    }
}

fn first_address(resp: GeocodeResponse) -> Option<String> {
    resp.features
        .into_iter()
        .map(|feature| feature.properties.name)
        .find(|name| !name.trim().is_empty())
}

/// Parcel and trash-day lookups for Kansas City.
pub struct KcmoParcelPort {
    client: Client,
    meta: MunicipalityMeta,
}

impl KcmoParcelPort {
    /// Create a new parcel port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            meta: municipality_meta(),
        }
    }
}

#[async_trait]
impl ParcelPort for KcmoParcelPort {
    fn municipality(&self) -> &MunicipalityMeta {
        &self.meta
    }

    async fn parcel_id(&self, query: &AddressQuery) -> Result<Option<ParcelId>, PortError> {
        if query.is_empty() {
            return Ok(None);
        }

        let where_clause = address_where_clause(query);
        let req = self.client.get(PARCEL_ID_URL).query(&[
            ("f", "JSON"),
            ("outFields", "PIN"),
            ("where", where_clause.as_str()),
        ]);

        let resp = fetch_json::<QueryResponse<PinAttributes>>(req).await?;
        parcel_from(resp)
    }

    async fn trash_schedule(&self, parcel: &ParcelId) -> Result<Option<TrashSchedule>, PortError> {
        let where_clause = parcel_where_clause(parcel);
        let req = self.client.get(PARCEL_DATA_URL).query(&[
            ("f", "JSON"),
            ("outFields", "TRASHDAY"),
            ("where", where_clause.as_str()),
        ]);

        let resp = fetch_json::<QueryResponse<TrashDayAttributes>>(req).await?;
        trash_schedule_from(parcel, resp)
    }
}

fn parcel_from(resp: QueryResponse<PinAttributes>) -> Result<Option<ParcelId>, PortError> {
    Ok(resp
        .first()?
        .and_then(|attributes| attributes.pin)
        .map(|pin| ParcelId(pin.to_string()))
        .filter(|parcel| !parcel.0.is_empty()))
}

fn trash_schedule_from(
    parcel: &ParcelId,
    resp: QueryResponse<TrashDayAttributes>,
) -> Result<Option<TrashSchedule>, PortError> {
    Ok(resp
        .first()?
        .and_then(|attributes| attributes.trash_day)
        .filter(|day| !day.trim().is_empty())
        .map(|base_day_name| TrashSchedule {
            parcel: parcel.clone(),
            base_day_name,
        }))
}

/// `ADDRESS LIKE '<ADDRESS>'` with quotes escaped for the `ArcGIS` SQL dialect.
fn address_where_clause(query: &AddressQuery) -> String {
    format!("ADDRESS LIKE '{}'", escape_sql(&query.normalized()))
}

fn parcel_where_clause(parcel: &ParcelId) -> String {
    format!("KIVA_PIN='{}'", escape_sql(&parcel.0))
}

fn escape_sql(value: &str) -> String {
    value.replace('\'', "''")
}

/// Build the plugin bundle for the Kansas City provider.
#[must_use]
pub fn plugin(client: Client, geocode_api_key: Option<String>) -> MunicipalityPlugin {
    let geocode_port = Arc::new(GeocodeApiPort::new(client.clone(), geocode_api_key));
    let parcel_port = Arc::new(KcmoParcelPort::new(client));

    MunicipalityPlugin {
        meta: municipality_meta(),
        geocode_port,
        parcel_port,
    }
}

fn municipality_meta() -> MunicipalityMeta {
    MunicipalityMeta {
        id: MunicipalityId(String::from("kansas-city")),
        name: String::from("Kansas City, MO"),
        area: SERVICE_AREA,
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
