use std::sync::Arc;

use chrono::{Local, NaiveDate};
use trashday_core::{
    model::{Coordinates, Municipalities, MunicipalityId},
    ports::{AddressQuery, PortError},
    service::{TrashDayReport, TrashDayService},
};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Screen {
    AddressEntry,
    Report,
}

#[derive(Debug, Clone)]
pub(crate) enum Lookup {
    Location(Coordinates),
    Address(String),
}

pub(crate) struct App {
    pub service: Arc<TrashDayService>,

    pub screen: Screen,
    pub municipality: MunicipalityId,
    pub municipality_name: String,
    pub pinned_today: Option<NaiveDate>,
    pub coordinates: Option<Coordinates>,

    pub address_input: String,
    pub report: Option<TrashDayReport>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(
        service: Arc<TrashDayService>,
        pinned_today: Option<NaiveDate>,
        coordinates: Option<Coordinates>,
    ) -> Self {
        let municipality = MunicipalityId::from(Municipalities::KansasCity);
        let municipality_name = service
            .municipalities()
            .into_iter()
            .find(|(id, _)| *id == municipality)
            .map_or_else(|| municipality.to_string(), |(_, name)| name);
        Self {
            service,
            screen: Screen::AddressEntry,
            municipality,
            municipality_name,
            pinned_today,
            coordinates,
            address_input: String::new(),
            report: None,
            is_loading: false,
            error_message: None,
        }
    }

    /// The pinned date, or the local date at the time of asking.
    pub(crate) fn today(&self) -> NaiveDate {
        self.pinned_today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub(crate) async fn lookup(&self, lookup: Lookup) -> Result<TrashDayReport, PortError> {
        let today = self.today();
        match lookup {
            Lookup::Location(coordinates) => self.service.trash_day_at(coordinates, today).await,
            Lookup::Address(address) => {
                self.service
                    .trash_day_for_address(&self.municipality, AddressQuery::new(address), today)
                    .await
            }
        }
    }

    pub(crate) fn apply(&mut self, result: Result<TrashDayReport, PortError>) {
        self.is_loading = false;
        match result {
            Ok(report) => {
                self.error_message = None;
                self.report = Some(report);
                self.screen = Screen::Report;
            }
            Err(err) => {
                self.report = None;
                self.error_message = Some(error_text(&err));
                self.screen = Screen::AddressEntry;
            }
        }
    }
}

/// Sentence shown above the report, phrased for how the lookup started.
pub(crate) fn headline(report: &TrashDayReport) -> String {
    if report.coordinates.is_some() {
        format!("Based on your current location shown below, {}", report.schedule)
    } else {
        format!("For {}, {}", report.address, report.schedule)
    }
}

pub(crate) fn error_text(err: &PortError) -> String {
    match err {
        PortError::MissingApiKey => {
            "This app is misconfigured: set GEOCODE_API_KEY to look up your location".to_owned()
        }
        other => other.to_string(),
    }
}
