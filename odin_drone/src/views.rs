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

//! read-only GeoJSON projections of the track store for rendering clients.
//! All functions are side effect free and iterate in track creation order, i.e. two projections
//! without an intervening batch serialize identically

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use geo_types::LineString;
use serde::{Serialize,Deserialize};
use uom::si::length::meter;

use crate::{geo::heading_end_point, store::{Track, TrackStore}};

/// default length of heading vectors in degrees (roughly 1km)
pub const VECTOR_LENGTH: f64 = 0.01;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct TrackCounts {
    pub permitted: usize,
    pub forbidden: usize,
    pub total: usize,
}

/// one Point feature per track with all display attributes
pub fn points_view (store: &TrackStore)->FeatureCollection {
    let features = store.tracks().map( |t| {
        let mut props = JsonObject::new();
        props.insert( "id".into(), t.id.as_str().into());
        props.insert( "registration".into(), t.registration.as_str().into());
        props.insert( "altitude".into(), t.altitude.get::<meter>().into());
        props.insert( "yaw".into(), t.yaw.into());
        props.insert( "name".into(), t.name.as_str().into());
        props.insert( "pilot".into(), t.pilot.as_str().into());
        props.insert( "organization".into(), t.organization.as_str().into());
        props.insert( "permitted".into(), permitted_flag(t));
        props.insert( "firstSeen".into(), t.first_seen.timestamp_millis().into());
        props.insert( "lastSeen".into(), t.last_seen.timestamp_millis().into());

        feature( Value::Point( vec![t.position.x, t.position.y]), props)
    }).collect();

    feature_collection( features)
}

/// one 2-point LineString per track that points into the `yaw` direction
pub fn vectors_view (store: &TrackStore, vector_length: f64)->FeatureCollection {
    let features = store.tracks().map( |t| {
        let end = heading_end_point( &t.position, t.yaw, vector_length);

        let mut props = JsonObject::new();
        props.insert( "id".into(), t.id.as_str().into());
        props.insert( "permitted".into(), permitted_flag(t));
        props.insert( "isVector".into(), true.into());

        feature( Value::LineString( vec![ vec![t.position.x, t.position.y], vec![end.x, end.y] ]), props)
    }).collect();

    feature_collection( features)
}

/// one LineString per track that has at least 2 trail points
pub fn trails_view (store: &TrackStore)->FeatureCollection {
    let features = store.tracks_with_trails()
        .filter( |(_,trail)| trail.len() >= 2)
        .map( |(t,trail)| {
            let line: LineString<f64> = LineString::new( trail.to_vec());

            let mut props = JsonObject::new();
            props.insert( "id".into(), t.id.as_str().into());
            props.insert( "permitted".into(), permitted_flag(t));

            feature( Value::from( &line), props)
        }).collect();

    feature_collection( features)
}

pub fn counts (store: &TrackStore)->TrackCounts {
    let total = store.len();
    let permitted = store.tracks().filter( |t| t.permitted).count();
    TrackCounts { permitted, forbidden: total - permitted, total }
}

/// all tracks ordered by ascending (lexicographic) id
pub fn sorted_list (store: &TrackStore)->Vec<&Track> {
    let mut list: Vec<&Track> = store.tracks().collect();
    list.sort_by( |a,b| a.id.cmp( &b.id));
    list
}

// rendering clients use numeric flags for data driven styling
fn permitted_flag (t: &Track)->JsonValue {
    JsonValue::from( if t.permitted { 1 } else { 0 })
}

fn feature (value: Value, props: JsonObject)->Feature {
    Feature {
        bbox: None,
        geometry: Some( Geometry::new( value)),
        id: None,
        properties: Some( props),
        foreign_members: None,
    }
}

fn feature_collection (features: Vec<Feature>)->FeatureCollection {
    FeatureCollection { bbox: None, features, foreign_members: None }
}
