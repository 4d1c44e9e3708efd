//! Vehicle/garage envelope compatibility
//!
//! Pure checks, no I/O: every rule is evaluated independently and every
//! failing rule contributes one issue. A dimension that is not recorded on
//! the vehicle is unconstrained and can never produce an issue.

use serde::{Deserialize, Serialize};

use crate::models::{GarageKind, PrimitiveGarage, PrimitiveVehicle};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
	pub compatible: bool,
	pub issues:     Vec<String>,
}

/// Display meters the way the clients expect: always with a decimal part
fn fmt_meters(value: f64) -> String {
	let repr = value.to_string();

	if repr.contains('.') { repr } else { format!("{repr}.0") }
}

/// Compare a vehicle's physical envelope and constraints against a garage
#[must_use]
pub fn check_compatibility(
	vehicle: &PrimitiveVehicle,
	garage: &PrimitiveGarage,
) -> CompatibilityReport {
	let mut issues = vec![];

	if let Some(height) = vehicle.height
		&& height > garage.height
	{
		issues.push(format!(
			"Altura del vehículo ({}m) excede la del garage ({}m)",
			fmt_meters(height),
			fmt_meters(garage.height),
		));
	}

	if let Some(width) = vehicle.width
		&& width > garage.width
	{
		issues.push(format!(
			"Ancho del vehículo ({}m) excede el del garage ({}m)",
			fmt_meters(width),
			fmt_meters(garage.width),
		));
	}

	if let Some(length) = vehicle.length
		&& length > garage.length
	{
		issues.push(format!(
			"Largo del vehículo ({}m) excede el del garage ({}m)",
			fmt_meters(length),
			fmt_meters(garage.length),
		));
	}

	if vehicle.covered_only && garage.kind != GarageKind::Covered {
		issues.push("El vehículo requiere un garage cubierto".to_string());
	}

	if let Some(min_clearance) = vehicle.min_clearance
		&& garage.height < min_clearance
	{
		issues.push(format!(
			"Altura del garage ({}m) es menor a la altura libre requerida \
			 ({}m)",
			fmt_meters(garage.height),
			fmt_meters(min_clearance),
		));
	}

	CompatibilityReport { compatible: issues.is_empty(), issues }
}
