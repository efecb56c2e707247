use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// A single telemetry sample: a timestamp plus seven numeric channels.
///
/// The field order matches the recorded dataset header:
///
/// ```text
/// Timestamp, Solar_Generation_kW, Home_Load_kW, Tesla_Charger_kW,
/// Battery_Charge_kWh, Battery_Discharge_kW, Grid_Import_kW, Grid_Export_kW
/// ```
///
/// Rows are parsed once and immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub timestamp: String,
    pub solar_generation_kw: f64,
    pub home_load_kw: f64,
    pub tesla_charger_kw: f64,
    pub battery_charge_kwh: f64,
    pub battery_discharge_kw: f64,
    pub grid_import_kw: f64,
    pub grid_export_kw: f64,
}

impl Row {
    /// Parses a single data line.
    ///
    /// Numeric cells that fail to parse (or are missing entirely) default to
    /// `0.0` instead of discarding the row.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut cells = line.split(',');
        let timestamp = cells.next().unwrap_or_default().trim().to_owned();

        let mut channel = |name: &str| -> f64 {
            let cell = cells.next().map(str::trim).unwrap_or_default();
            cell.parse().unwrap_or_else(|_| {
                trace!(name, cell, "Unparseable numeric cell. Defaulting to 0.");
                0.0
            })
        };

        Self {
            timestamp,
            solar_generation_kw: channel("solar_generation_kw"),
            home_load_kw: channel("home_load_kw"),
            tesla_charger_kw: channel("tesla_charger_kw"),
            battery_charge_kwh: channel("battery_charge_kwh"),
            battery_discharge_kw: channel("battery_discharge_kw"),
            grid_import_kw: channel("grid_import_kw"),
            grid_export_kw: channel("grid_export_kw"),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  solar={:.2}kW load={:.2}kW charger={:.2}kW battery={:.2}kWh \
             discharge={:.2}kW import={:.2}kW export={:.2}kW",
            self.timestamp,
            self.solar_generation_kw,
            self.home_load_kw,
            self.tesla_charger_kw,
            self.battery_charge_kwh,
            self.battery_discharge_kw,
            self.grid_import_kw,
            self.grid_export_kw,
        )
    }
}
