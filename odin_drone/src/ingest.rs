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

//! batch ingestion of drone sightings. Batches are GeoJSON-like FeatureCollections that are processed
//! best-effort: records without a valid point geometry are skipped and unparsable numeric properties
//! default to 0. We deliberately work on `serde_json::Value` instead of typed GeoJSON so that one bad
//! record does not reject the whole batch

use std::fmt;
use chrono::{DateTime,Utc};
use serde_json::{Map, Value};
use uom::si::{f64::Length, length::meter};
use tracing::debug;

use crate::{
    correlator::Correlator, errors::Result,
    geo::{lon_lat, normalize_360, GeoCoord}, store::{Observation, TrackStore}
};

pub const DEFAULT_NAME: &str = "Drone";

/// what happened to the records of one batch
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct BatchStats {
    pub records: usize,
    pub skipped: usize,
    pub matched: usize,
    pub created: usize,
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "records: {}, skipped: {}, matched: {}, created: {}", self.records, self.skipped, self.matched, self.created)
    }
}

/// parse raw batch text as received from the transport
pub fn parse_batch (s: &str)->Result<Value> {
    Ok( serde_json::from_str(s)?)
}

/// normalizes raw records and drives correlator and store for each of them, in batch order.
/// Records later in the batch see the effects of earlier ones
#[derive(Debug,Clone)]
pub struct IngestPipeline {
    pub correlator: Correlator,
    pub default_name: String,
}

impl Default for IngestPipeline {
    fn default()->Self {
        IngestPipeline { correlator: Correlator::default(), default_name: DEFAULT_NAME.to_string() }
    }
}

impl IngestPipeline {
    pub fn new (correlator: Correlator, default_name: impl ToString)->Self {
        IngestPipeline { correlator, default_name: default_name.to_string() }
    }

    pub fn ingest (&self, store: &mut TrackStore, batch: &Value, now: DateTime<Utc>)->BatchStats {
        let mut stats = BatchStats::default();

        let Some(features) = batch.get("features").and_then(Value::as_array) else {
            debug!("batch without features ignored");
            return stats
        };

        for feature in features {
            stats.records += 1;

            match self.parse_observation( feature) {
                Some(obs) => {
                    let pos = obs.position;
                    let correlation = self.correlator.correlate( store, &pos);
                    debug!("drone at [{:.4},{:.4}] {}", pos.x, pos.y, correlation);

                    if correlation.is_created() { stats.created += 1 } else { stats.matched += 1 }
                    store.upsert( correlation.track_id(), obs, now);
                }
                None => {
                    debug!("skipping record without valid point geometry");
                    stats.skipped += 1;
                }
            }
        }

        stats
    }

    /// turn a raw feature into a normalized observation. Returns None if it has no usable point geometry
    pub fn parse_observation (&self, feature: &Value)->Option<Observation> {
        let position = point_coordinates( feature.get("geometry")?)?;

        let empty = Map::new();
        let props = feature.get("properties").and_then(Value::as_object).unwrap_or(&empty);

        let name = string_property( props, "Name");
        let name = if name.is_empty() { self.default_name.clone() } else { name };

        Some( Observation {
            position,
            registration: string_property( props, "registration"),
            yaw: normalize_360( numeric_property( props, "yaw")),
            altitude: Length::new::<meter>( numeric_property( props, "altitude").max(0.0)),
            name,
            pilot: string_property( props, "pilot"),
            organization: string_property( props, "organization"),
        })
    }
}

fn point_coordinates (geometry: &Value)->Option<GeoCoord> {
    if geometry.get("type")?.as_str()? != "Point" { return None }

    let coords = geometry.get("coordinates")?.as_array()?;
    let lon = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;

    if lon.is_finite() && lat.is_finite() { Some( lon_lat( lon, lat)) } else { None }
}

/// numbers and numeric strings are accepted, everything else is 0
fn numeric_property (props: &Map<String,Value>, key: &str)->f64 {
    let v = match props.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None
    };
    v.filter( |x| x.is_finite()).unwrap_or(0.0)
}

fn string_property (props: &Map<String,Value>, key: &str)->String {
    match props.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new()
    }
}
