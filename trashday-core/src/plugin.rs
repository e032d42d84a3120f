//! Registry for all municipality plugins and their ports.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::model::{Coordinates, MunicipalityId, MunicipalityMeta};
use crate::ports::{GeocodePort, ParcelPort, PortError};

/// Collection of ports implementing a provider for a single municipality.
pub struct MunicipalityPlugin {
    /// Static metadata describing the municipality.
    pub meta: MunicipalityMeta,
    /// Implementation for turning coordinates into an address.
    pub geocode_port: Arc<dyn GeocodePort>,
    /// Implementation for parcel and trash-day lookups.
    pub parcel_port: Arc<dyn ParcelPort>,
}

/// Registry that resolves plugins by municipality identifier or location.
pub struct PluginRegistry {
    plugins: HashMap<MunicipalityId, MunicipalityPlugin>,
}

impl PluginRegistry {
    /// Build a registry from the provided plugin list.
    ///
    /// Plugins whose ports serve a different municipality than their metadata are skipped.
    #[must_use]
    pub fn new(plugins: Vec<MunicipalityPlugin>) -> Self {
        let plugins_map = plugins
            .into_iter()
            .filter(ports_match_meta)
            .map(|plugin| (plugin.meta.id.clone(), plugin))
            .collect();
        Self {
            plugins: plugins_map,
        }
    }

    /// Return metadata for all registered municipalities.
    #[must_use]
    pub fn municipalities(&self) -> Vec<MunicipalityMeta> {
        self.plugins
            .values()
            .map(|plugin| plugin.meta.clone())
            .collect()
    }

    /// Look up a plugin for the given municipality.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::UnsupportedMunicipality`] when no plugin is registered.
    pub fn plugin(&self, municipality: &MunicipalityId) -> Result<&MunicipalityPlugin, PortError> {
        self.plugins
            .get(municipality)
            .ok_or(PortError::UnsupportedMunicipality)
    }

    /// Find the plugin whose service area contains the coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::OutsideServiceArea`] when no municipality covers the location.
    pub fn locate(&self, coordinates: Coordinates) -> Result<&MunicipalityPlugin, PortError> {
        self.plugins
            .values()
            .find(|plugin| plugin.meta.area.contains(coordinates))
            .ok_or(PortError::OutsideServiceArea)
    }
}

fn ports_match_meta(plugin: &MunicipalityPlugin) -> bool {
    let geocode = &plugin.geocode_port.municipality().id;
    let parcel = &plugin.parcel_port.municipality().id;
    if *geocode == plugin.meta.id && *parcel == plugin.meta.id {
        return true;
    }
    warn!(
        municipality = %plugin.meta.id,
        %geocode,
        %parcel,
        "ports serve another municipality, skipping plugin"
    );
    false
}
