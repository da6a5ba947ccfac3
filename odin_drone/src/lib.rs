/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! reconstruction of persistent drone tracks from anonymous point sightings.
//! Sightings arrive in batches without stable ids, so we correlate them by proximity with the
//! tracks we already know, keep a bounded trail per track and classify each track by its registration.
//! The resulting state is published as GeoJSON views (positions, heading vectors, trails)

use std::{fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize};

pub mod errors;
use errors::{parse_error, Result};

pub mod geo;
pub mod policy;
pub mod store;
pub mod correlator;
pub mod ingest;
pub mod views;

pub mod tracker;
pub use tracker::{DroneTracker, SharedDroneTracker, LastUpdate};

/// tracker configuration, normally loaded from `configs/odin_drone.ron`
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct DroneConfig {
    pub match_max_km: f64,           // max distance of a sighting from the last trail point of the track it continues
    pub max_trail: usize,            // max number of trail points to keep per track
    pub vector_length: f64,          // length of heading vectors in degrees
    pub default_name: String,        // display name for sightings without one
    pub drop_after: Option<Duration>, // duration after which unseen tracks get dropped (None: keep forever)
    pub report_interval: Duration,   // how often monitors report the current state
}

impl Default for DroneConfig {
    fn default()->Self {
        DroneConfig {
            match_max_km: correlator::MATCH_MAX_KM,
            max_trail: 800,
            vector_length: views::VECTOR_LENGTH,
            default_name: ingest::DEFAULT_NAME.to_string(),
            drop_after: None,
            report_interval: Duration::from_secs(5),
        }
    }
}

impl DroneConfig {
    pub fn from_ron_str (s: &str)->Result<Self> {
        let config: DroneConfig = ron::from_str(s)?;
        config.check()?;
        Ok(config)
    }

    fn check (&self)->Result<()> {
        if self.match_max_km.is_nan() || self.match_max_km < 0.0 { return Err( parse_error!("invalid match_max_km: {}", self.match_max_km)) }
        if self.max_trail == 0 { return Err( parse_error!("max_trail has to be positive")) }
        if !self.vector_length.is_finite() { return Err( parse_error!("invalid vector_length: {}", self.vector_length)) }
        if self.report_interval.is_zero() { return Err( parse_error!("report_interval has to be positive")) }
        Ok(())
    }
}

pub fn load_config (path: impl AsRef<Path>)->Result<DroneConfig> {
    let s = fs::read_to_string( path)?;
    DroneConfig::from_ron_str( &s)
}

/// human readable duration such as "1h 2m 3s", "2m 3s" or "3s" (negative durations count as 0)
pub fn format_duration (millis: i64)->String {
    let total_secs = millis.max(0) / 1000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;

    if h > 0 { format!("{h}h {m}m {s}s") }
    else if m > 0 { format!("{m}m {s}s") }
    else { format!("{s}s") }
}
