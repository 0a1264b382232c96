use serde::{Deserialize, Serialize};

use super::domain::{Airport, DistanceBand};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Inclusive upper bounds of the short and medium bands, in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceThresholds {
    pub short_max_km: f64,
    pub medium_max_km: f64,
}

impl Default for DistanceThresholds {
    fn default() -> Self {
        Self {
            short_max_km: 1500.0,
            medium_max_km: 3500.0,
        }
    }
}

/// Band assignment together with the distance it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceClassification {
    pub distance_km: f64,
    pub band: DistanceBand,
}

/// Maps an airport pair onto a regulation distance band.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceClassifier {
    thresholds: DistanceThresholds,
}

impl DistanceClassifier {
    pub fn new(thresholds: DistanceThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> DistanceThresholds {
        self.thresholds
    }

    pub fn classify(&self, origin: &Airport, destination: &Airport) -> DistanceBand {
        self.measure(origin, destination).band
    }

    pub fn measure(&self, origin: &Airport, destination: &Airport) -> DistanceClassification {
        let distance_km = great_circle_km(origin, destination);
        DistanceClassification {
            distance_km,
            band: self.band_for(distance_km),
        }
    }

    pub fn band_for(&self, distance_km: f64) -> DistanceBand {
        if distance_km <= self.thresholds.short_max_km {
            DistanceBand::Short
        } else if distance_km <= self.thresholds.medium_max_km {
            DistanceBand::Medium
        } else {
            DistanceBand::Long
        }
    }
}

/// Haversine distance between two airports.
pub fn great_circle_km(a: &Airport, b: &Airport) -> f64 {
    haversine_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
