//! Building specification: the high-level description applied to a template.
//!
//! Every section is optional. A missing section leaves that aspect of the
//! template as it is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Building-type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    /// Data center.
    #[default]
    DataCenter,
    /// Manufacturing facility.
    Manufacturing,
    /// Warehouse.
    Warehouse,
    /// Office.
    Office,
}

impl BuildingType {
    /// Tag as used in template metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingType::DataCenter => "data_center",
            BuildingType::Manufacturing => "manufacturing",
            BuildingType::Warehouse => "warehouse",
            BuildingType::Office => "office",
        }
    }

    /// Preferred template for this type, if one is designated.
    pub fn preferred_template(&self) -> Option<&'static str> {
        match self {
            BuildingType::DataCenter => Some("DataCenter_SingleZone"),
            BuildingType::Manufacturing | BuildingType::Warehouse => {
                Some("Manufacturing_Warehouse")
            }
            BuildingType::Office => None,
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete building specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingSpecification {
    /// Caller's project identifier.
    pub project_id: Option<String>,
    /// Human-readable project name.
    pub project_name: Option<String>,
    /// Building type; [`BuildingType::DataCenter`] when absent.
    pub building_type: Option<BuildingType>,
    /// Site location.
    pub location: Option<Location>,
    /// Footprint, height and orientation.
    pub geometry: Option<Geometry>,
    /// Parameters used when the building type is `data_center`.
    pub data_center: Option<DataCenterParams>,
    /// Parameters used when the building type is `manufacturing`.
    pub manufacturing: Option<ManufacturingParams>,
    /// Thermostat setpoints.
    pub setpoints: Option<Setpoints>,
    /// Simulation control flags.
    pub simulation_options: Option<SimulationOptions>,
}

/// Site location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees (east positive).
    pub longitude: Option<f64>,
    /// Elevation in meters.
    pub elevation_m: Option<f64>,
    /// Site name written into the model.
    pub site_name: Option<String>,
}

/// Building geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Length along X in meters.
    pub length_m: Option<f64>,
    /// Width along Y in meters.
    pub width_m: Option<f64>,
    /// Height along Z in meters.
    pub height_m: Option<f64>,
    /// Rotation from true north in degrees.
    pub orientation_deg: Option<f64>,
}

/// Data center parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataCenterParams {
    /// Total IT load in kW.
    pub it_load_kw: Option<f64>,
    /// Number of server racks.
    pub rack_count: Option<u32>,
    /// Average power per rack in W.
    pub watts_per_rack: Option<f64>,
}

/// Manufacturing parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingParams {
    /// Process equipment load in kW.
    pub process_load_kw: Option<f64>,
    /// Fraction of the process load emitted as radiant heat (0..=1).
    pub process_heat_fraction: Option<f64>,
    /// Number of occupants.
    pub occupancy_count: Option<u32>,
}

/// Thermostat setpoints in °C.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Setpoints {
    /// Cooling setpoint.
    pub cooling_setpoint_c: Option<f64>,
    /// Heating setpoint.
    pub heating_setpoint_c: Option<f64>,
}

/// Simulation control flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Run the weather-file (annual) run periods.
    #[serde(default)]
    pub run_annual: bool,
    /// Run the design-day sizing periods.
    #[serde(default = "default_true")]
    pub run_design_days: bool,
    /// Turn zone and system sizing calculations on or off. Left alone when absent.
    pub sizing_run: Option<bool>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            run_annual: false,
            run_design_days: true,
            sizing_run: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Type-specific section selected by the building type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeParams<'a> {
    /// Data center parameters.
    DataCenter(&'a DataCenterParams),
    /// Manufacturing parameters.
    Manufacturing(&'a ManufacturingParams),
}

impl BuildingSpecification {
    /// Declared building type, or the default.
    pub fn building_type(&self) -> BuildingType {
        self.building_type.unwrap_or_default()
    }

    /// The section matching the building type, if present.
    pub fn type_params(&self) -> Option<TypeParams<'_>> {
        match self.building_type() {
            BuildingType::DataCenter => self.data_center.as_ref().map(TypeParams::DataCenter),
            BuildingType::Manufacturing => {
                self.manufacturing.as_ref().map(TypeParams::Manufacturing)
            }
            BuildingType::Warehouse | BuildingType::Office => None,
        }
    }

    /// Parse a specification from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
