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

/// flight permission rule for drone registrations such as "SG-BA001".
/// The segment after the first '-' (or the whole registration if there is no '-') has to start
/// with an uppercase 'B'. This is a string prefix rule, not a registry lookup
pub fn is_permitted (registration: &str)->bool {
    let mut parts = registration.split('-');
    let head = parts.next().unwrap_or("");
    let tail = parts.next().unwrap_or(head);

    tail.starts_with('B')
}
