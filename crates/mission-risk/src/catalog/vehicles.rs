use serde::{Deserialize, Serialize};

/// Immutable catalog entry for a launch vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub crew_capacity: u32,
    /// Payload to low Earth orbit, kg.
    pub payload_capacity: f64,
    /// Maximum reachable distance, million km.
    pub max_distance: f64,
    pub reliability: f64,
    pub fuel_efficiency: f64,
    /// Launch cost, million USD.
    pub cost: f64,
    pub description: String,
}

impl Vehicle {
    pub fn is_crewed(&self) -> bool {
        self.crew_capacity > 0
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    name: &str,
    payload_capacity: f64,
    max_distance: f64,
    fuel_efficiency: f64,
    reliability: f64,
    cost: f64,
    crew_capacity: u32,
    description: &str,
) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        name: name.to_string(),
        crew_capacity,
        payload_capacity,
        max_distance,
        reliability,
        fuel_efficiency,
        cost,
        description: description.to_string(),
    }
}

pub(crate) fn standard_vehicles() -> Vec<Vehicle> {
    vec![
        entry(
            "falcon_9",
            "SpaceX Falcon 9",
            22_800.0,
            1_000.0,
            0.85,
            0.98,
            67.0,
            7,
            "Reusable rocket, excellent for Earth orbit and lunar missions",
        ),
        entry(
            "falcon_heavy",
            "SpaceX Falcon Heavy",
            63_800.0,
            2_000.0,
            0.80,
            0.95,
            97.0,
            7,
            "Most powerful operational rocket, suitable for Mars missions",
        ),
        entry(
            "starship",
            "SpaceX Starship",
            100_000.0,
            10_000.0,
            0.90,
            0.85,
            10.0,
            100,
            "Next-generation spacecraft for interplanetary travel",
        ),
        entry(
            "sls",
            "NASA SLS",
            95_000.0,
            5_000.0,
            0.75,
            0.90,
            2_000.0,
            4,
            "NASA's heavy-lift rocket for deep space exploration",
        ),
        entry(
            "new_glenn",
            "Blue Origin New Glenn",
            45_000.0,
            1_500.0,
            0.82,
            0.92,
            120.0,
            7,
            "Reusable rocket for orbital and lunar missions",
        ),
        entry(
            "electron",
            "Rocket Lab Electron",
            300.0,
            100.0,
            0.88,
            0.96,
            7.0,
            0,
            "Small satellite launcher, not suitable for crewed missions",
        ),
    ]
}
