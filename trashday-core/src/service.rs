//! High-level service facade running the pick-up day lookup.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::holiday::{HolidaySet, WeeklyHoliday, find_weekly_holiday};
use crate::model::{Coordinates, MunicipalityId, ParcelId, TrashSchedule};
use crate::plugin::{MunicipalityPlugin, PluginRegistry};
use crate::ports::{AddressQuery, PortError};
use crate::schedule::{AdjustedSchedule, adjust_schedule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Outcome of a pick-up day lookup.
pub struct TrashDayReport {
    /// Municipality that resolved the address.
    pub municipality: MunicipalityId,
    /// Address the parcel was looked up with.
    pub address: String,
    /// Parcel the address belongs to.
    pub parcel: ParcelId,
    /// Location the lookup started from, if it started from a location.
    pub coordinates: Option<Coordinates>,
    /// Date the lookup was made for, the week around it is the one adjusted.
    pub today: NaiveDate,
    /// Holiday in the current week, if any.
    pub weekly_holiday: Option<WeeklyHoliday>,
    /// Pick-up day after holiday adjustment.
    pub schedule: AdjustedSchedule,
}

/// Public entry point for resolving trash pick-up days.
pub struct TrashDayService {
    registry: Arc<PluginRegistry>,
}

impl TrashDayService {
    /// Create a new service bound to the provided registry.
    #[must_use]
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// List all available municipalities and their display names.
    #[must_use]
    pub fn municipalities(&self) -> Vec<(MunicipalityId, String)> {
        self.registry
            .municipalities()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Resolve the pick-up day at a location.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the location is outside every service area, any lookup
    /// comes back empty or fails, or the parcel's trash day is not a weekday.
    pub async fn trash_day_at(
        &self,
        coordinates: Coordinates,
        today: NaiveDate,
    ) -> Result<TrashDayReport, PortError> {
        let plugin = self.registry.locate(coordinates)?;
        debug!(%coordinates, municipality = %plugin.meta.id, "located municipality");

        let Some(address) = plugin.geocode_port.reverse(coordinates).await? else {
            warn!(%coordinates, "reverse geocoding found no address");
            return Err(PortError::AddressNotFound);
        };
        debug!(%address, "reverse geocoded address");

        let mut report = resolve(plugin, AddressQuery::new(address), today).await?;
        report.coordinates = Some(coordinates);
        Ok(report)
    }

    /// Resolve the pick-up day for a typed address.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the municipality is unsupported, the query is empty, any
    /// lookup comes back empty or fails, or the parcel's trash day is not a weekday.
    pub async fn trash_day_for_address(
        &self,
        municipality: &MunicipalityId,
        query: AddressQuery,
        today: NaiveDate,
    ) -> Result<TrashDayReport, PortError> {
        if query.is_empty() {
            return Err(PortError::AddressNotFound);
        }
        let plugin = self.registry.plugin(municipality)?;
        resolve(plugin, query, today).await
    }
}

async fn resolve(
    plugin: &MunicipalityPlugin,
    query: AddressQuery,
    today: NaiveDate,
) -> Result<TrashDayReport, PortError> {
    let Some(parcel) = plugin.parcel_port.parcel_id(&query).await? else {
        warn!(address = %query.address, "no parcel for address");
        return Err(PortError::ParcelNotFound(query.address));
    };
    debug!(%parcel, "resolved parcel");

    let Some(trash_schedule) = plugin.parcel_port.trash_schedule(&parcel).await? else {
        warn!(%parcel, "no trash day on record");
        return Err(PortError::TrashDayNotFound(parcel));
    };

    let (weekly_holiday, schedule) = holiday_adjusted(&trash_schedule, today)?;
    info!(
        %parcel,
        base_day = %trash_schedule.base_day_name,
        effective_day = ?schedule.effective_day,
        shifted = schedule.is_shifted,
        "resolved pick-up day"
    );

    Ok(TrashDayReport {
        municipality: plugin.meta.id.clone(),
        address: query.address,
        parcel,
        coordinates: None,
        today,
        weekly_holiday,
        schedule,
    })
}

/// Adjust the parcel's base day for the holiday of the week containing `today`.
///
/// # Errors
///
/// Returns [`PortError::Schedule`] when the base day is not a weekday name or the
/// holiday calendar cannot be built for `today`.
pub fn holiday_adjusted(
    trash_schedule: &TrashSchedule,
    today: NaiveDate,
) -> Result<(Option<WeeklyHoliday>, AdjustedSchedule), PortError> {
    let base_day = trash_schedule.base_day()?;
    let holidays = HolidaySet::for_year(today.year())?;
    let weekly_holiday = find_weekly_holiday(today, &holidays);
    let schedule = adjust_schedule(base_day, weekly_holiday.as_ref())?;
    Ok((weekly_holiday, schedule))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Weekday;

    use super::*;
    use crate::model::{MunicipalityMeta, ServiceArea};
    use crate::ports::{GeocodePort, ParcelPort};
    use crate::schedule::ScheduleError;

    fn meta() -> MunicipalityMeta {
        MunicipalityMeta {
            id: MunicipalityId("test-city".to_owned()),
            name: "Test City".to_owned(),
            area: ServiceArea {
                north: 40.0,
                south: 39.0,
                east: -94.0,
                west: -95.0,
            },
        }
    }

    struct FakeGeocode {
        meta: MunicipalityMeta,
        address: Option<String>,
    }

    #[async_trait]
    impl GeocodePort for FakeGeocode {
        fn municipality(&self) -> &MunicipalityMeta {
            &self.meta
        }

        async fn reverse(&self, _coordinates: Coordinates) -> Result<Option<String>, PortError> {
            Ok(self.address.clone())
        }
    }

    struct FakeParcels {
        meta: MunicipalityMeta,
        parcel: Option<ParcelId>,
        trash_day: Option<String>,
        schedule_calls: AtomicUsize,
    }

    #[async_trait]
    impl ParcelPort for FakeParcels {
        fn municipality(&self) -> &MunicipalityMeta {
            &self.meta
        }

        async fn parcel_id(&self, query: &AddressQuery) -> Result<Option<ParcelId>, PortError> {
            Ok(self.parcel.clone().filter(|_| !query.is_empty()))
        }

        async fn trash_schedule(
            &self,
            parcel: &ParcelId,
        ) -> Result<Option<TrashSchedule>, PortError> {
            self.schedule_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.trash_day.clone().map(|base_day_name| TrashSchedule {
                parcel: parcel.clone(),
                base_day_name,
            }))
        }
    }

    fn service_with(
        address: Option<&str>,
        parcel: Option<&str>,
        trash_day: Option<&str>,
    ) -> (TrashDayService, Arc<FakeParcels>) {
        let parcels = Arc::new(FakeParcels {
            meta: meta(),
            parcel: parcel.map(|id| ParcelId(id.to_owned())),
            trash_day: trash_day.map(str::to_owned),
            schedule_calls: AtomicUsize::new(0),
        });
        let plugin = MunicipalityPlugin {
            meta: meta(),
            geocode_port: Arc::new(FakeGeocode {
                meta: meta(),
                address: address.map(str::to_owned),
            }),
            parcel_port: Arc::<FakeParcels>::clone(&parcels),
        };
        let registry = Arc::new(PluginRegistry::new(vec![plugin]));
        (TrashDayService::new(registry), parcels)
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    const INSIDE: Coordinates = Coordinates {
        latitude: 39.1,
        longitude: -94.5,
    };

    #[tokio::test]
    async fn location_lookup_adjusts_for_holiday() {
        let (service, _) = service_with(Some("414 E 12th St"), Some("KC-1"), Some("Thursday"));
        let report = service
            .trash_day_at(INSIDE, date(2024, 7, 2))
            .await
            .expect("lookup succeeds");

        assert_eq!(report.address, "414 E 12th St", "geocoded address");
        assert_eq!(report.parcel, ParcelId("KC-1".to_owned()), "parcel");
        assert_eq!(report.coordinates, Some(INSIDE), "location kept");
        assert_eq!(report.today, date(2024, 7, 2), "lookup date kept");
        assert_eq!(
            report.weekly_holiday.as_ref().map(WeeklyHoliday::holiday_name),
            Some("Independence Day"),
            "holiday week"
        );
        assert_eq!(report.schedule.effective_day, Weekday::Fri, "friday");
        assert!(report.schedule.is_shifted, "shifted");
    }

    #[tokio::test]
    async fn address_lookup_in_quiet_week() {
        let (service, _) = service_with(None, Some("KC-2"), Some("Monday"));
        let report = service
            .trash_day_for_address(
                &MunicipalityId("test-city".to_owned()),
                AddressQuery::new("1 Main St"),
                date(2024, 3, 13),
            )
            .await
            .expect("lookup succeeds");

        assert_eq!(report.coordinates, None, "no location for typed addresses");
        assert_eq!(report.today, date(2024, 3, 13), "lookup date kept");
        assert_eq!(report.weekly_holiday, None, "no holiday in mid march");
        assert_eq!(report.schedule.effective_day, Weekday::Mon, "normal day");
        assert_eq!(report.municipality.0, "test-city", "municipality");
    }

    #[tokio::test]
    async fn location_outside_service_area_is_rejected() {
        let (service, _) = service_with(Some("1 Main St"), Some("KC-1"), Some("Monday"));
        let result = service
            .trash_day_at(Coordinates::new(38.6, -90.2), date(2024, 7, 2))
            .await;
        assert!(
            matches!(result, Err(PortError::OutsideServiceArea)),
            "outside the box: {result:?}"
        );
    }

    #[tokio::test]
    async fn missing_address_short_circuits() {
        let (service, parcels) = service_with(None, Some("KC-1"), Some("Monday"));
        let result = service.trash_day_at(INSIDE, date(2024, 7, 2)).await;
        assert!(
            matches!(result, Err(PortError::AddressNotFound)),
            "no address: {result:?}"
        );
        let schedule_calls = parcels.schedule_calls.load(Ordering::SeqCst);
        assert_eq!(schedule_calls, 0, "no parcel lookups");
    }

    #[tokio::test]
    async fn missing_parcel_short_circuits() {
        let (service, parcels) = service_with(Some("1 Main St"), None, Some("Monday"));
        let result = service.trash_day_at(INSIDE, date(2024, 7, 2)).await;
        assert!(
            matches!(result, Err(PortError::ParcelNotFound(ref address)) if address == "1 Main St"),
            "no parcel: {result:?}"
        );
        let schedule_calls = parcels.schedule_calls.load(Ordering::SeqCst);
        assert_eq!(schedule_calls, 0, "no schedule lookups");
    }

    #[tokio::test]
    async fn missing_trash_day_is_reported() {
        let (service, _) = service_with(Some("1 Main St"), Some("KC-1"), None);
        let result = service.trash_day_at(INSIDE, date(2024, 7, 2)).await;
        assert!(
            matches!(result, Err(PortError::TrashDayNotFound(_))),
            "no trash day: {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_trash_day_name_is_an_error() {
        let (service, _) = service_with(Some("1 Main St"), Some("KC-1"), Some("Someday"));
        let result = service.trash_day_at(INSIDE, date(2024, 7, 2)).await;
        assert!(
            matches!(
                result,
                Err(PortError::Schedule(ScheduleError::UnresolvedBaseDay(_)))
            ),
            "unresolved day: {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_municipality_and_blank_query_fail() {
        let (service, _) = service_with(None, Some("KC-1"), Some("Monday"));
        let unknown = service
            .trash_day_for_address(
                &MunicipalityId("elsewhere".to_owned()),
                AddressQuery::new("1 Main St"),
                date(2024, 7, 2),
            )
            .await;
        assert!(
            matches!(unknown, Err(PortError::UnsupportedMunicipality)),
            "unknown municipality: {unknown:?}"
        );

        let blank = service
            .trash_day_for_address(
                &MunicipalityId("test-city".to_owned()),
                AddressQuery::new("   "),
                date(2024, 7, 2),
            )
            .await;
        assert!(
            matches!(blank, Err(PortError::AddressNotFound)),
            "blank query: {blank:?}"
        );
    }

    #[test]
    fn lists_municipalities() {
        let (service, _) = service_with(None, None, None);
        let id = MunicipalityId("test-city".to_owned());
        assert_eq!(
            service.municipalities(),
            vec![(id, "Test City".to_owned())],
            "single registered municipality"
        );
    }

    #[test]
    fn holiday_adjusted_reports_later_holiday() {
        let trash_schedule = TrashSchedule {
            parcel: ParcelId("KC-3".to_owned()),
            base_day_name: "Tuesday".to_owned(),
        };
        let (weekly_holiday, schedule) =
            holiday_adjusted(&trash_schedule, date(2024, 11, 25)).expect("valid schedule");
        assert_eq!(
            weekly_holiday.map(|holiday| holiday.date),
            Some(date(2024, 11, 28)),
            "thanksgiving week"
        );
        assert!(!schedule.is_shifted, "tuesday is before thursday");
        assert_eq!(
            schedule.holiday_name.as_deref(),
            Some("Thanksgiving Day"),
            "reason kept"
        );
    }
}
