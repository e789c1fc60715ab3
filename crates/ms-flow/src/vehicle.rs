//! Vehicle type definitions declared at the top of every routes file.

use ms_core::TravelMode;

/// Physical and emission attributes of one vehicle type.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleType {
    pub id:             String,
    pub length:         f64,
    pub min_gap:        f64,
    pub max_speed:      f64,
    pub emission_class: String,
    pub gui_shape:      String,
    pub color:          String,
    pub accel:          f64,
    pub decel:          f64,
    pub sigma:          f64,
}

impl VehicleType {
    /// Passenger car used by private flows.
    pub fn car() -> Self {
        Self {
            id:             TravelMode::Private.default_vehicle_type().to_owned(),
            length:         4.5,
            min_gap:        2.5,
            max_speed:      13.9,
            emission_class: "HBEFA3/PC_G_EU6".to_owned(),
            gui_shape:      "passenger".to_owned(),
            color:          "red".to_owned(),
            accel:          2.6,
            decel:          4.5,
            sigma:          0.5,
        }
    }

    /// Bus used by public flows.
    pub fn bus() -> Self {
        Self {
            id:             TravelMode::Public.default_vehicle_type().to_owned(),
            length:         7.5,
            min_gap:        2.5,
            max_speed:      10.0,
            emission_class: "HBEFA3/PC_G_EU6".to_owned(),
            gui_shape:      "bus".to_owned(),
            color:          "blue".to_owned(),
            accel:          2.6,
            decel:          4.5,
            sigma:          0.5,
        }
    }

    /// `[car, bus]`.
    pub fn defaults() -> Vec<VehicleType> {
        vec![Self::car(), Self::bus()]
    }
}
