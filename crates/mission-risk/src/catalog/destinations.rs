use serde::{Deserialize, Serialize};

/// Million kilometres per astronomical unit.
pub const AU_TO_MILLION_KM: f64 = 149.6;

/// Radiation exposure tier at a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RadiationLevel {
    None,
    Low,
    Moderate,
    High,
    Extreme,
}

impl RadiationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RadiationLevel::None => "None",
            RadiationLevel::Low => "Low",
            RadiationLevel::Moderate => "Moderate",
            RadiationLevel::High => "High",
            RadiationLevel::Extreme => "Extreme",
        }
    }
}

/// Heliocentric position in astronomical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean separation in million km.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt() * AU_TO_MILLION_KM
    }
}

/// Immutable catalog entry describing a reachable destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    /// Distance from Earth along the default route, million km.
    pub distance: f64,
    /// Surface gravity in multiples of g.
    pub gravity: f64,
    pub atmosphere: String,
    pub temperature: String,
    pub radiation: RadiationLevel,
    pub complexity_label: String,
    pub position: Position,
    pub description: String,
}

impl Destination {
    pub fn lacks_atmosphere(&self) -> bool {
        self.atmosphere.trim().eq_ignore_ascii_case("none")
    }

    pub fn has_co2_atmosphere(&self) -> bool {
        self.atmosphere.contains("CO2")
    }

    /// True when the temperature descriptor is flagged as extreme.
    pub fn has_extreme_temperature(&self) -> bool {
        self.temperature.to_ascii_lowercase().contains("extreme")
    }

    /// Lowest Celsius figure quoted in the temperature descriptor.
    pub fn coldest_celsius(&self) -> Option<f64> {
        signed_numbers(&self.temperature)
            .into_iter()
            .reduce(f64::min)
    }

    pub fn is_cryogenic(&self) -> bool {
        self.coldest_celsius()
            .map(|celsius| celsius <= -200.0)
            .unwrap_or(false)
    }

    pub fn is_deep_cold(&self) -> bool {
        self.coldest_celsius()
            .map(|celsius| celsius <= -100.0)
            .unwrap_or(false)
    }

    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

fn signed_numbers(text: &str) -> Vec<f64> {
    let mut values = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_ascii_digit() || ch == '.' || (ch == '-' && current.is_empty()) {
            current.push(ch);
        } else {
            flush_number(&mut current, &mut values);
        }
    }
    flush_number(&mut current, &mut values);

    values
}

fn flush_number(current: &mut String, values: &mut Vec<f64>) {
    if let Ok(value) = current.parse::<f64>() {
        values.push(value);
    }
    current.clear();
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    name: &str,
    distance: f64,
    gravity: f64,
    atmosphere: &str,
    temperature: &str,
    radiation: RadiationLevel,
    complexity_label: &str,
    orbit_au: f64,
    description: &str,
) -> Destination {
    Destination {
        id: id.to_string(),
        name: name.to_string(),
        distance,
        gravity,
        atmosphere: atmosphere.to_string(),
        temperature: temperature.to_string(),
        radiation,
        complexity_label: complexity_label.to_string(),
        position: Position::new(0.0, 0.0, orbit_au),
        description: description.to_string(),
    }
}

pub(crate) fn standard_destinations() -> Vec<Destination> {
    use RadiationLevel::*;

    vec![
        entry(
            "mercury",
            "Mercury",
            77.3,
            0.38,
            "None",
            "Extreme (-180°C to 430°C)",
            High,
            "Very High",
            0.39,
            "Closest planet to the Sun, extreme temperature variations",
        ),
        entry(
            "venus",
            "Venus",
            38.2,
            0.91,
            "Dense CO2",
            "460°C",
            High,
            "Very High",
            0.72,
            "Hottest planet, thick atmosphere, sulfuric acid clouds",
        ),
        entry(
            "mars",
            "Mars",
            54.6,
            0.38,
            "Thin CO2",
            "-140°C to 20°C",
            High,
            "High",
            1.52,
            "Red planet, potential for human colonization",
        ),
        entry(
            "jupiter",
            "Jupiter",
            588.5,
            2.34,
            "Hydrogen/Helium",
            "-110°C",
            Extreme,
            "Extreme",
            5.20,
            "Largest planet, gas giant with intense radiation",
        ),
        entry(
            "saturn",
            "Saturn",
            1200.0,
            0.93,
            "Hydrogen/Helium",
            "-140°C",
            High,
            "Extreme",
            9.58,
            "Ringed planet, beautiful but challenging destination",
        ),
        entry(
            "uranus",
            "Uranus",
            2581.9,
            0.89,
            "Hydrogen/Helium/Methane",
            "-195°C",
            Moderate,
            "Extreme",
            19.18,
            "Ice giant, tilted on its side",
        ),
        entry(
            "neptune",
            "Neptune",
            4305.9,
            1.12,
            "Hydrogen/Helium/Methane",
            "-200°C",
            Moderate,
            "Extreme",
            30.07,
            "Farthest planet, strong winds and storms",
        ),
        entry(
            "moon",
            "Moon",
            0.384,
            0.17,
            "None",
            "-173°C to 127°C",
            High,
            "Medium",
            0.00257,
            "Earth's natural satellite, closest celestial body",
        ),
        entry(
            "europa",
            "Europa (Jupiter's Moon)",
            588.5,
            0.13,
            "Thin Oxygen",
            "-160°C",
            Extreme,
            "Very High",
            5.20,
            "Icy moon with potential subsurface ocean",
        ),
        entry(
            "titan",
            "Titan (Saturn's Moon)",
            1200.0,
            0.14,
            "Nitrogen/Methane",
            "-179°C",
            High,
            "Very High",
            9.58,
            "Largest moon of Saturn, thick atmosphere",
        ),
        entry(
            "iss",
            "International Space Station",
            0.000408,
            0.0,
            "Controlled",
            "Controlled",
            Moderate,
            "Low",
            0.000408,
            "Low Earth orbit space station",
        ),
        entry(
            "asteroid_belt",
            "Asteroid Belt",
            329.0,
            0.0,
            "None",
            "-73°C",
            High,
            "High",
            2.2,
            "Region between Mars and Jupiter with numerous asteroids",
        ),
        entry(
            "pluto",
            "Pluto",
            5900.0,
            0.06,
            "Thin Nitrogen",
            "-230°C",
            Low,
            "Extreme",
            39.48,
            "Dwarf planet in the Kuiper Belt",
        ),
    ]
}
