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

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use chrono::{DateTime,Utc};
use geojson::FeatureCollection;
use serde_json::Value;
use tracing::info;

use crate::{
    DroneConfig, correlator::Correlator, errors::{op_failed, Result},
    ingest::{parse_batch, BatchStats, IngestPipeline},
    store::{Track, TrackId, TrackStore}, views::{self, TrackCounts}
};

/// change marker that consumers can poll to find out if they need to refresh.
/// `version` is bumped once per processed batch
#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord)]
pub struct LastUpdate {
    pub version: u64,
    pub date: DateTime<Utc>,
}

/// the drone tracking engine: exclusive owner of the track store, plus the query interface for UI clients
pub struct DroneTracker {
    config: DroneConfig,
    pipeline: IngestPipeline,
    store: TrackStore,
    selected: Option<TrackId>,
    last_update: LastUpdate,
}

impl DroneTracker {
    pub fn new (config: DroneConfig)->Self {
        let pipeline = IngestPipeline::new( Correlator::new( config.match_max_km), &config.default_name);
        let store = TrackStore::new( config.max_trail);
        let last_update = LastUpdate { version: 0, date: DateTime::<Utc>::default() };

        DroneTracker { config, pipeline, store, selected: None, last_update }
    }

    pub fn config (&self)->&DroneConfig { &self.config }
    pub fn store (&self)->&TrackStore { &self.store }
    pub fn last_update (&self)->LastUpdate { self.last_update }

    pub fn ingest (&mut self, batch: &Value)->BatchStats {
        self.ingest_at( batch, Utc::now())
    }

    /// process one complete batch with an explicit clock value
    pub fn ingest_at (&mut self, batch: &Value, now: DateTime<Utc>)->BatchStats {
        let stats = self.pipeline.ingest( &mut self.store, batch, now);

        if let Some(drop_after) = self.config.drop_after {
            let dropped = self.store.drop_stale( drop_after, now);
            if let Some(sel) = &self.selected && dropped.contains(sel) {
                self.selected = None;
            }
        }

        self.last_update = LastUpdate { version: self.last_update.version + 1, date: now };
        info!("batch {} ({}) -> {} tracks", self.last_update.version, stats, self.store.len());
        stats
    }

    /// parse and process raw batch text. Unparsable text leaves the store untouched
    pub fn ingest_str (&mut self, s: &str)->Result<BatchStats> {
        let batch = parse_batch(s)?;
        Ok( self.ingest( &batch))
    }

    /// set (or clear) the selected track. Returns the track if it exists
    pub fn select_track (&mut self, id: Option<&str>)->Option<&Track> {
        self.selected = id.and_then( |id| self.find_id(id));
        self.selected()
    }

    pub fn selected (&self)->Option<&Track> {
        self.selected.as_ref().and_then( |id| self.store.get(id))
    }

    pub fn get_track (&self, id: &str)->Option<&Track> {
        self.find_id(id).and_then( |id| self.store.get(&id))
    }

    pub fn counts (&self)->TrackCounts { views::counts( &self.store) }
    pub fn sorted_list (&self)->Vec<&Track> { views::sorted_list( &self.store) }
    pub fn points_view (&self)->FeatureCollection { views::points_view( &self.store) }
    pub fn vectors_view (&self)->FeatureCollection { views::vectors_view( &self.store, self.config.vector_length) }
    pub fn trails_view (&self)->FeatureCollection { views::trails_view( &self.store) }

    fn find_id (&self, id: &str)->Option<TrackId> {
        self.store.tracks().find( |t| t.id.as_str() == id).map( |t| t.id.clone())
    }
}

/// cloneable handle for hosts that read from other threads than the one that ingests.
/// Batches hold the write lock for their whole duration so readers only see completed batches
#[derive(Clone)]
pub struct SharedDroneTracker(Arc<RwLock<DroneTracker>>);

impl SharedDroneTracker {
    pub fn new (tracker: DroneTracker)->Self { SharedDroneTracker( Arc::new( RwLock::new( tracker))) }

    pub fn read (&self)->Result<RwLockReadGuard<'_,DroneTracker>> {
        self.0.read().map_err( |_| op_failed!("drone tracker lock poisoned"))
    }

    pub fn write (&self)->Result<RwLockWriteGuard<'_,DroneTracker>> {
        self.0.write().map_err( |_| op_failed!("drone tracker lock poisoned"))
    }

    pub fn ingest (&self, batch: &Value)->Result<BatchStats> {
        Ok( self.write()?.ingest( batch))
    }

    pub fn ingest_str (&self, s: &str)->Result<BatchStats> {
        let batch = parse_batch(s)?; // parse outside of the lock
        self.ingest( &batch)
    }

    /// run `f` against a consistent post-batch state
    pub fn with_tracker<F,R> (&self, f: F)->Result<R> where F: FnOnce(&DroneTracker)->R {
        Ok( f( &*self.read()?))
    }
}
