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

//! geodetic helpers for drone tracks. Positions are plain `geo_types` coordinates in degrees
//! with `x` = longitude and `y` = latitude, which is also the GeoJSON axis order

use geo_types::Coord;
use uom::si::f64::Length;
use uom::si::length::kilometer;

pub type GeoCoord = Coord<f64>;

/// mean earth radius in kilometers used for all track correlation
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0;

#[inline]
pub fn lon_lat (lon: f64, lat: f64)->GeoCoord { Coord { x: lon, y: lat } }

/// great circle distance in km between two lon/lat degree coordinates (haversine formula).
/// There is no range check - out-of-range inputs give a defined but meaningless result
pub fn haversine_km (p1: &GeoCoord, p2: &GeoCoord)->f64 {
    let lat1 = p1.y.to_radians();
    let lat2 = p2.y.to_radians();
    let dlat = (p2.y - p1.y).to_radians();
    let dlon = (p2.x - p1.x).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_KM * a.sqrt().asin()
}

pub fn haversine_distance (p1: &GeoCoord, p2: &GeoCoord)->Length {
    Length::new::<kilometer>( haversine_km( p1, p2))
}

/// normalize heading degrees into [0,360)
#[inline]
pub fn normalize_360 (d: f64)->f64 {
    if !d.is_finite() { return 0.0 }

    let x = d % 360.0;
    let x = if x < 0.0 { 360.0 + x } else { x };
    if x >= 360.0 { 0.0 } else { x } // -1e-20 % 360 + 360 rounds to 360
}

/// end point of a short heading marker starting at `pos`. This is a planar approximation in degree
/// space (yaw 0 points east, 90 north) and distorts with latitude
pub fn heading_end_point (pos: &GeoCoord, yaw_deg: f64, length_deg: f64)->GeoCoord {
    let yaw = yaw_deg.to_radians();
    lon_lat( pos.x + length_deg * yaw.cos(), pos.y + length_deg * yaw.sin())
}
