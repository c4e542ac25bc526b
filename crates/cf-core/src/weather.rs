use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::species::Element;

/// Daily weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    /// Clear skies.
    #[default]
    Sunny,
    /// Overcast.
    Cloudy,
    /// Steady rain.
    Rain,
    /// Thunderstorm.
    Storm,
    /// Extreme heat.
    Heatwave,
}

/// Cumulative percentages used for the daily roll.
const WEATHER_TABLE: [(Weather, u32); 5] = [
    (Weather::Sunny, 40),
    (Weather::Cloudy, 25),
    (Weather::Rain, 20),
    (Weather::Storm, 8),
    (Weather::Heatwave, 7),
];

impl Weather {
    /// Roll the weather for a new day.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Weather {
        let mut pick = rng.random_range(0..100);
        for (weather, weight) in WEATHER_TABLE {
            if pick < weight {
                return weather;
            }
            pick -= weight;
        }
        Weather::Sunny
    }

    /// Whether crops count as watered all day.
    pub fn waters_crops(self) -> bool {
        matches!(self, Self::Rain | Self::Storm)
    }

    /// Happiness change for a creature of `element` under this weather.
    pub fn effect_on(self, element: Element) -> f64 {
        match (self, element) {
            (Self::Rain | Self::Storm, Element::Water) => 5.0,
            (Self::Rain | Self::Storm, Element::Fire) => -5.0,
            (Self::Sunny, Element::Grass) => 4.0,
            (Self::Sunny, Element::Fire) => 3.0,
            (Self::Heatwave, Element::Fire) => 5.0,
            (Self::Heatwave, Element::Water | Element::Grass) => -3.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
            Self::Storm => "storm",
            Self::Heatwave => "heatwave",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn weights_sum_to_one_hundred() {
        assert_eq!(WEATHER_TABLE.iter().map(|(_, w)| w).sum::<u32>(), 100);
    }

    #[test]
    fn sunny_is_most_common() {
        let mut rng = StdRng::seed_from_u64(11);
        let sunny = (0..5_000)
            .filter(|_| Weather::roll(&mut rng) == Weather::Sunny)
            .count();
        assert!((1_700..2_300).contains(&sunny), "sunny {sunny}");
    }

    #[test]
    fn cloudy_has_no_effect() {
        assert_eq!(Weather::Cloudy.effect_on(Element::Fire), 0.0);
        assert_eq!(Weather::Storm.effect_on(Element::Water), 5.0);
        assert!(Weather::Rain.waters_crops());
        assert!(!Weather::Heatwave.waters_crops());
    }
}
