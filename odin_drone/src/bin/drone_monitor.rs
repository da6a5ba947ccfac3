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

use tokio::{self, fs::File, net::TcpStream, io::{AsyncBufRead, AsyncBufReadExt, BufReader}, time::{interval_at, Instant}};
use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use odin_drone::{load_config, format_duration, DroneConfig, DroneTracker, SharedDroneTracker};

/// replay or monitor newline delimited drone sighting batches (one GeoJSON FeatureCollection per line)
#[derive(Parser,Debug)]
#[command(about="drone track monitoring tool")]
struct Args {
    /// path of RON config file (defaults are used if not set)
    #[arg(long, short)]
    config: Option<String>,

    /// host:port of a socket from which to read batches
    #[arg(long, short, conflicts_with="path")]
    url: Option<String>,

    /// dump points, vectors and trails views as JSON once input is exhausted
    #[arg(long)]
    views: bool,

    /// file with batches, one per line
    path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config( path)?,
        None => DroneConfig::default()
    };

    if let Some(url) = &args.url {
        let stream = TcpStream::connect( url).await?;
        run( BufReader::with_capacity( 8192, stream), config, args.views).await

    } else if let Some(path) = &args.path {
        let file = File::open( path).await?;
        run( BufReader::with_capacity( 8192, file), config, args.views).await

    } else {
        Err( anyhow!("no input, need either a batch file path or a --url"))
    }
}

async fn run<R> (reader: R, config: DroneConfig, dump_views: bool) -> Result<()> where R: AsyncBufRead + Unpin {
    let tracker = SharedDroneTracker::new( DroneTracker::new( config));

    // first report after one full period, not before we got any input
    let period = tracker.with_tracker( |t| t.config().report_interval)?;
    let mut timer = interval_at( Instant::now() + period, period);
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if line.trim().is_empty() { continue }
                        if let Err(e) = tracker.ingest_str( &line) {
                            warn!("ignoring invalid batch: {e}");
                        }
                    }
                    None => break
                }
            }
            _ = timer.tick() => { report( &tracker)?; }
        }
    }

    report( &tracker)?;

    if dump_views {
        tracker.with_tracker( |t| {
            println!("{}", t.points_view());
            println!("{}", t.vectors_view());
            println!("{}", t.trails_view());
        })?;
    }
    Ok(())
}

fn report (tracker: &SharedDroneTracker) -> Result<()> {
    tracker.with_tracker( |t| {
        let counts = t.counts();
        println!("--- update {}: {} tracks ({} permitted, {} forbidden)",
                 t.last_update().version, counts.total, counts.permitted, counts.forbidden);

        let now = Utc::now();
        for track in t.sorted_list() {
            println!("  {track} [up {}]", format_duration( track.age_ms( now)));
        }
    })?;
    Ok(())
}
