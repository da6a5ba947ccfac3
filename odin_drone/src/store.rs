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

use std::{collections::{HashMap,VecDeque}, fmt, sync::Arc, time::Duration};
use chrono::{DateTime,Utc};
use uom::si::{f64::Length, length::meter};
use tracing::info;

use crate::{geo::GeoCoord, policy::is_permitted};

/// engine assigned track identifier ("TRACK-001", "TRACK-002",..).
/// Ordering is lexicographic on the label. We keep the label in an Arc so that clones don't allocate
#[derive(Debug,Clone,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct TrackId(Arc<str>);

impl TrackId {
    fn from_counter (n: u64)->Self { TrackId( Arc::from( format!("TRACK-{n:03}"))) }

    pub fn as_str (&self)->&str { &self.0 }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.0)
    }
}

/// the normalized content of one point observation, as produced by the ingest pipeline
#[derive(Debug,Clone,PartialEq)]
pub struct Observation {
    pub position: GeoCoord,
    pub registration: String,
    pub yaw: f64,          // degrees in [0,360)
    pub altitude: Length,  // >= 0
    pub name: String,
    pub pilot: String,
    pub organization: String,
}

/// the reconstructed, persistent state of one drone
#[derive(Debug,Clone,PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub registration: String,
    pub yaw: f64,
    pub altitude: Length,
    pub name: String,
    pub pilot: String,
    pub organization: String,
    pub position: GeoCoord,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub permitted: bool,
}

impl Track {
    fn new (id: TrackId, obs: Observation, now: DateTime<Utc>)->Self {
        let permitted = is_permitted( &obs.registration);
        Track {
            id,
            registration: obs.registration,
            yaw: obs.yaw,
            altitude: obs.altitude,
            name: obs.name,
            pilot: obs.pilot,
            organization: obs.organization,
            position: obs.position,
            first_seen: now,
            last_seen: now,
            permitted,
        }
    }

    /// overwrite everything but id and first_seen
    fn update (&mut self, obs: Observation, now: DateTime<Utc>) {
        self.permitted = is_permitted( &obs.registration);
        self.registration = obs.registration;
        self.yaw = obs.yaw;
        self.altitude = obs.altitude;
        self.name = obs.name;
        self.pilot = obs.pilot;
        self.organization = obs.organization;
        self.position = obs.position;
        if now > self.last_seen { self.last_seen = now }
    }

    /// time between first and last sighting
    pub fn duration_ms (&self)->i64 {
        (self.last_seen - self.first_seen).num_milliseconds()
    }

    /// time since first sighting, i.e. how long the drone has been up if it is still flying
    pub fn age_ms (&self, now: DateTime<Utc>)->i64 {
        (now - self.first_seen).num_milliseconds().max(0)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Track( id: {}", self.id)?;
        if !self.registration.is_empty() { write!( f, ", reg: \"{}\"", self.registration)?; }
        write!( f, ", name: \"{}\"", self.name)?;
        write!( f, ", pos: [{:.5},{:.5}]", self.position.x, self.position.y)?;
        write!( f, ", alt: {:.0}", self.altitude.get::<meter>())?;
        write!( f, ", yaw: {:.0}", self.yaw)?;
        write!( f, ", permitted: {}", self.permitted)?;
        write!( f, ", seen: {}s)", self.duration_ms() / 1000)
    }
}

/// bounded position history of a track, oldest first
#[derive(Debug,Clone,PartialEq)]
pub struct Trail {
    points: VecDeque<GeoCoord>,
    max_len: usize,
}

impl Trail {
    fn new (max_len: usize)->Self {
        Trail { points: VecDeque::with_capacity(max_len.min(64)), max_len: max_len.max(1) }
    }

    /// append unless `p` equals the current last point. Evicts the oldest point(s) once we exceed max_len
    fn push (&mut self, p: GeoCoord)->bool {
        if self.points.back() == Some(&p) { return false }

        self.points.push_back(p);
        while self.points.len() > self.max_len {
            self.points.pop_front();
        }
        true
    }

    pub fn last (&self)->Option<&GeoCoord> { self.points.back() }
    pub fn len (&self)->usize { self.points.len() }
    pub fn is_empty (&self)->bool { self.points.is_empty() }
    pub fn max_len (&self)->usize { self.max_len }
    pub fn iter (&self)->impl Iterator<Item=&GeoCoord> { self.points.iter() }
    pub fn to_vec (&self)->Vec<GeoCoord> { self.points.iter().copied().collect() }
}

struct TrackEntry {
    track: Track,
    trail: Trail,
}

/// the single owner of all tracks and their trails. Each track has exactly one trail, which is
/// why both are kept in the same entry. Iteration order is track creation order
pub struct TrackStore {
    entries: HashMap<TrackId,TrackEntry>,
    order: Vec<TrackId>,
    counter: u64,
    max_trail: usize,
}

impl TrackStore {
    pub fn new (max_trail: usize)->Self {
        TrackStore { entries: HashMap::new(), order: Vec::new(), counter: 0, max_trail }
    }

    /// issue the next sequential id. Ids are never re-issued, even after their track got dropped
    pub fn allocate_id (&mut self)->TrackId {
        self.counter += 1;
        TrackId::from_counter( self.counter)
    }

    /// create or update the track for `id` and extend its trail.
    /// Returns true if the trail got a new point
    pub fn upsert (&mut self, id: &TrackId, obs: Observation, now: DateTime<Utc>)->bool {
        let pos = obs.position;

        if let Some(e) = self.entries.get_mut(id) {
            e.track.update( obs, now);
            e.trail.push( pos)

        } else {
            let mut trail = Trail::new( self.max_trail);
            trail.push( pos);
            let track = Track::new( id.clone(), obs, now);
            self.entries.insert( id.clone(), TrackEntry{ track, trail });
            self.order.push( id.clone());
            true
        }
    }

    pub fn len (&self)->usize { self.order.len() }
    pub fn is_empty (&self)->bool { self.order.is_empty() }
    pub fn contains (&self, id: &TrackId)->bool { self.entries.contains_key(id) }

    pub fn get (&self, id: &TrackId)->Option<&Track> { self.entries.get(id).map( |e| &e.track) }
    pub fn trail (&self, id: &TrackId)->Option<&Trail> { self.entries.get(id).map( |e| &e.trail) }

    /// all tracks in creation order
    pub fn tracks (&self)->impl Iterator<Item=&Track> {
        self.order.iter().filter_map( |id| self.entries.get(id)).map( |e| &e.track)
    }

    /// all (track,trail) pairs in creation order
    pub fn tracks_with_trails (&self)->impl Iterator<Item=(&Track,&Trail)> {
        self.order.iter().filter_map( |id| self.entries.get(id)).map( |e| (&e.track, &e.trail))
    }

    /// all trails keyed by their track id, in creation order
    pub fn trails (&self)->impl Iterator<Item=(&TrackId,&Trail)> {
        self.order.iter().filter_map( |id| self.entries.get(id).map( |e| (id, &e.trail)))
    }

    /// cloned snapshot of all tracks, in creation order
    pub fn snapshot (&self)->Vec<Track> {
        self.tracks().cloned().collect()
    }

    /// remove all tracks that have not been seen within `drop_after`. Returns the dropped ids
    pub fn drop_stale (&mut self, drop_after: Duration, now: DateTime<Utc>)->Vec<TrackId> {
        let max_age = chrono::Duration::from_std(drop_after).unwrap_or( chrono::Duration::MAX);

        let dropped: Vec<TrackId> = self.tracks()
            .filter( |t| now.signed_duration_since( t.last_seen) > max_age)
            .map( |t| t.id.clone())
            .collect();

        if !dropped.is_empty() {
            for id in &dropped {
                self.entries.remove(id);
            }
            self.order.retain( |id| self.entries.contains_key(id));
            info!("dropped {} stale tracks", dropped.len());
        }
        dropped
    }
}
