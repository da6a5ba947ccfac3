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
#![allow(unused)]

use std::f64::consts::PI;
use uom::si::length::{kilometer, meter};
use odin_drone::{format_duration, geo::*, policy::is_permitted};

// run with "cargo test --test test_geo_policy -- --nocapture"

#[test]
fn test_haversine () {
    let p0 = lon_lat( 0.0, 0.0);
    let p1 = lon_lat( 0.0, 1.0);
    let d = haversine_km( &p0, &p1);
    println!("1deg latitude: {d} km");
    assert!( (d - MEAN_EARTH_RADIUS_KM * PI / 180.0).abs() < 1e-9);

    assert_eq!( 0.0, haversine_km( &p1, &p1));
    assert!( (haversine_km( &p0, &p1) - haversine_km( &p1, &p0)).abs() < 1e-12);

    let a = lon_lat( 35.930, 31.950);
    let b = lon_lat( 35.9305, 31.9505);
    let c = lon_lat( 36.200, 32.100);
    let d_ab = haversine_km( &a, &b);
    let d_ac = haversine_km( &a, &c);
    println!("a-b: {d_ab} km, a-c: {d_ac} km");
    assert!( d_ab < 0.1);
    assert!( d_ac > 25.0 && d_ac < 35.0);

    let len = haversine_distance( &a, &c);
    assert!( (len.get::<kilometer>() - d_ac).abs() < 1e-9);
    assert!( (len.get::<meter>() - d_ac * 1000.0).abs() < 1e-6);
}

#[test]
fn test_normalize_yaw () {
    assert_eq!( 0.0, normalize_360( 0.0));
    assert_eq!( 0.0, normalize_360( 360.0));
    assert_eq!( 270.0, normalize_360( -90.0));
    assert_eq!( 90.0, normalize_360( 450.0));
    assert_eq!( 0.0, normalize_360( f64::NAN));

    let y = normalize_360( -1e-20);
    assert!( y >= 0.0 && y < 360.0);
}

#[test]
fn test_heading_end_point () {
    let p = lon_lat( 10.0, 20.0);

    let east = heading_end_point( &p, 0.0, 0.01);
    assert!( (east.x - 10.01).abs() < 1e-12);
    assert!( (east.y - 20.0).abs() < 1e-12);

    let north = heading_end_point( &p, 90.0, 0.01);
    println!("yaw 90 -> {north:?}");
    assert!( (north.x - 10.0).abs() < 1e-12);
    assert!( (north.y - 20.01).abs() < 1e-12);
}

#[test]
fn test_classification () {
    assert!( is_permitted("SG-BA001"));
    assert!( !is_permitted("SG-AX200"));
    assert!( !is_permitted(""));
    assert!( is_permitted("B12345"));   // no dash -> whole string
    assert!( !is_permitted("A12345"));
    assert!( !is_permitted("SG-ba001")); // case sensitive
    assert!( !is_permitted("SG-"));
    assert!( is_permitted("X-B-C"));     // only the 2nd segment counts
    assert!( !is_permitted("B-X"));

    // pure function
    for _ in 0..3 { assert!( is_permitted("SG-BA01")) }
}

#[test]
fn test_format_duration () {
    assert_eq!( "0s", format_duration(0));
    assert_eq!( "59s", format_duration(59_999));
    assert_eq!( "2m 3s", format_duration(123_000));
    assert_eq!( "1h 2m 3s", format_duration(3_723_000));
    assert_eq!( "1h 0m 0s", format_duration(3_600_000));
    assert_eq!( "0s", format_duration(-5000));
}
