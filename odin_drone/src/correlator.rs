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

//! observations carry no stable identity across batches, so we associate them with tracks by
//! proximity: greedy nearest neighbor against the last trail point of each track.
//! This is meant for a few slow movers that are sampled frequently, it is not an optimal assignment

use std::fmt;
use crate::{geo::{haversine_km, GeoCoord}, store::{TrackId, TrackStore}};

/// default max distance between an observation and the last point of a track it continues
pub const MATCH_MAX_KM: f64 = 5.0;

#[derive(Debug,Clone,PartialEq)]
pub enum Correlation {
    Matched(TrackId),
    Created(TrackId),
}

impl Correlation {
    pub fn track_id (&self)->&TrackId {
        match self {
            Correlation::Matched(id) => id,
            Correlation::Created(id) => id,
        }
    }

    pub fn is_created (&self)->bool { matches!( self, Correlation::Created(_)) }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Matched(id) => write!( f, "matched {id}"),
            Correlation::Created(id) => write!( f, "created {id}"),
        }
    }
}

/// find the track whose last trail point is closest to `pos`. Returns the track id and the distance in km.
/// Tracks without trail points are not eligible. Ties go to the track that was created first
pub fn nearest_track<'a> (store: &'a TrackStore, pos: &GeoCoord)->Option<(&'a TrackId, f64)> {
    let mut best: Option<(&TrackId,f64)> = None;

    for (id,trail) in store.trails() {
        if let Some(last) = trail.last() {
            let d = haversine_km( last, pos);
            if best.is_none_or( |(_,best_d)| d < best_d) {
                best = Some((id,d));
            }
        }
    }
    best
}

#[derive(Debug,Clone)]
pub struct Correlator {
    pub match_max_km: f64,
}

impl Default for Correlator {
    fn default()->Self { Correlator { match_max_km: MATCH_MAX_KM } }
}

impl Correlator {
    pub fn new (match_max_km: f64)->Self { Correlator { match_max_km } }

    /// decide which track `pos` belongs to. If there is none within range this allocates a new id
    /// from the store but does not create the track yet - that is up to the following upsert
    pub fn correlate (&self, store: &mut TrackStore, pos: &GeoCoord)->Correlation {
        let nearest = nearest_track( store, pos).map( |(id,d)| (id.clone(), d));

        match nearest {
            Some((id,d)) if d <= self.match_max_km => Correlation::Matched( id),
            _ => Correlation::Created( store.allocate_id())
        }
    }
}
