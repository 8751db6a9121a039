//! track-replay: run a recorded GPS track through a headless skydrop session.
//!
//! Usage:
//!   track-replay --track jump.csv [--config session.json] [--speed 4] [--portal 41.2,-112.0,1340]

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use csv::{ReaderBuilder, StringRecord, Trim};
use miette::{bail, miette, IntoDiagnostic, WrapErr};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skydrop_core::config::SessionConfig;
use skydrop_core::constants::FRAME_RATE;
use skydrop_core::types::{Fix, GeodeticPosition, LocalOffset, Velocity};
use skydrop_session::commands::SessionCommand;
use skydrop_session::scene::RecordingScene;
use skydrop_session::{FixSlot, FrameSnapshot, SessionEngine};

/// Frames to keep running after the last fix so a pending swap can finish.
const TAIL_MILLIS: u64 = 15_000;

struct Options {
    track: PathBuf,
    config: Option<PathBuf>,
    speed: f64,
    portal: Option<GeodeticPosition>,
    select: Option<String>,
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let Some(options) = parse_options(&args) else {
        print_usage();
        process::exit(1);
    };

    run(options)
}

fn print_usage() {
    eprintln!(
        "track-replay: replay a recorded track through a skydrop session\n\
         \n\
           --track <path>            CSV: time_ms,lat,lon,alt,ground_speed[,vel_e,vel_n,vel_u]\n\
           --config <path>           Session config JSON (optional, default: built-in)\n\
           --speed <x>               Playback speed multiplier (default: 1)\n\
           --portal <lat,lon,alt>    Place a portal (overrides config)\n\
           --select <name>           Manually select a dropzone\n\
         \n\
         Set RUST_LOG=debug for per-fix detail.\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_position(value: &str) -> Option<GeodeticPosition> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [lat, lon] => Some(GeodeticPosition::new(*lat, *lon, 0.0)),
        [lat, lon, alt] => Some(GeodeticPosition::new(*lat, *lon, *alt)),
        _ => None,
    }
}

fn parse_options(args: &[String]) -> Option<Options> {
    let track = PathBuf::from(flag_value(args, "--track")?);
    let speed = match flag_value(args, "--speed") {
        Some(s) => s.parse::<f64>().ok().filter(|v| *v > 0.0)?,
        None => 1.0,
    };
    let portal = match flag_value(args, "--portal") {
        Some(p) => Some(parse_position(p)?),
        None => None,
    };
    Some(Options {
        track,
        config: flag_value(args, "--config").map(PathBuf::from),
        speed,
        portal,
        select: flag_value(args, "--select").map(str::to_string),
    })
}

/// One CSV row: `time_ms,lat,lon,alt,ground_speed[,vel_e,vel_n,vel_u]`.
#[derive(Debug, Deserialize)]
struct TrackRow {
    time_ms: u64,
    lat: f64,
    lon: f64,
    alt: f64,
    ground_speed: f64,
    vel_e: Option<f64>,
    vel_n: Option<f64>,
    vel_u: Option<f64>,
}

impl TrackRow {
    fn into_fix(self) -> miette::Result<Fix> {
        let fix = Fix::new(
            GeodeticPosition::new(self.lat, self.lon, self.alt),
            self.ground_speed,
            self.time_ms,
        );
        match (self.vel_e, self.vel_n, self.vel_u) {
            (None, None, None) => Ok(fix),
            (Some(e), Some(n), Some(u)) => Ok(fix.with_velocity(Velocity::new(e, n, u))),
            _ => Err(miette!("velocity needs all of vel_e, vel_n, vel_u")),
        }
    }
}

/// A leading row whose first field is not a number is taken as the header.
fn is_header(record: &StringRecord) -> bool {
    record.get(0).is_some_and(|f| f.parse::<f64>().is_err())
}

/// Read fixes in time order. Comments (`#`) and blank rows are skipped;
/// malformed rows are skipped with a warning.
fn read_track<R: Read>(input: R) -> Vec<Fix> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(input);

    let mut fixes = Vec::new();
    for (n, record) in reader.records().enumerate() {
        let row = n + 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(row, "skipping row: {e}");
                continue;
            }
        };
        if record.iter().all(str::is_empty) || (n == 0 && is_header(&record)) {
            continue;
        }
        let fix = record
            .deserialize::<TrackRow>(None)
            .into_diagnostic()
            .and_then(TrackRow::into_fix);
        match fix {
            Ok(fix) => fixes.push(fix),
            Err(e) => warn!(row, "skipping row: {e}"),
        }
    }
    fixes.sort_by_key(|f| f.timestamp_millis);
    fixes
}

fn load_track(path: &Path) -> miette::Result<Vec<Fix>> {
    let file = File::open(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to open track {}", path.display()))?;
    let fixes = read_track(file);
    if fixes.is_empty() {
        bail!("{}: no fixes", path.display());
    }
    Ok(fixes)
}

fn run(options: Options) -> miette::Result<()> {
    let mut config = match &options.config {
        Some(path) => SessionConfig::load(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if options.portal.is_some() {
        config.transition.portal_location = options.portal;
    }

    let fixes = load_track(&options.track)?;
    let start_millis = fixes[0].timestamp_millis;
    let end_millis = fixes[fixes.len() - 1].timestamp_millis + TAIL_MILLIS;
    info!(
        fixes = fixes.len(),
        duration_s = end_millis.saturating_sub(start_millis) as f64 / 1000.0,
        speed = options.speed,
        "replaying track"
    );

    let slot = FixSlot::new();
    let mut engine = SessionEngine::new(config, slot.clone()).into_diagnostic()?;
    if let Some(name) = options.select {
        engine.queue_command(SessionCommand::SelectPointOfInterest { name });
    }

    let wall_start = Instant::now();
    let speed = options.speed;
    let session_now = move || start_millis + (wall_start.elapsed().as_secs_f64() * speed * 1000.0) as u64;

    // Ingestion side: publish each fix when its recorded time comes up.
    let (done_tx, done_rx) = mpsc::channel::<()>();
    let producer = {
        let slot = slot.clone();
        thread::spawn(move || {
            for fix in fixes {
                let now = session_now();
                if fix.timestamp_millis > now {
                    let wait = (fix.timestamp_millis - now) as f64 / speed;
                    thread::sleep(Duration::from_secs_f64(wait / 1000.0));
                }
                slot.publish(fix, session_now());
            }
            done_tx.send(()).ok();
        })
    };

    let frame = Duration::from_secs_f64(1.0 / FRAME_RATE as f64);
    let mut scene = RecordingScene::default();
    let mut last_hud = 0u64;
    let mut producer_done = false;

    loop {
        let tick_start = Instant::now();
        let now = session_now();
        let snapshot = engine.tick_with_scene(now, &mut scene);

        for command in &snapshot.scene_commands {
            info!(?command, "scene");
        }
        if now >= last_hud + 1000 {
            println!("{}", hud_line(&snapshot, start_millis));
            last_hud = now;
        }

        producer_done = producer_done || done_rx.try_recv().is_ok();
        if producer_done && now >= end_millis {
            break;
        }

        let elapsed = tick_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }

    producer
        .join()
        .map_err(|_| miette!("producer thread panicked"))?;
    info!(
        preloads = scene.preloads.len(),
        environment = ?scene.environment,
        state = engine.transition_state().label(),
        "replay finished"
    );
    Ok(())
}

fn hud_line(snapshot: &FrameSnapshot, start_millis: u64) -> String {
    let fmt = |v: Option<f64>| v.map_or_else(|| "--".to_string(), |v| format!("{v:.0}"));
    let distance = snapshot
        .subject
        .zip(snapshot.destination)
        .map(|(s, d)| LocalOffset::new(d.x - s.x, d.z - s.z, d.y - s.y).horizontal_length());
    format!(
        "t={:>7.1}s poi={:<10} alt={:>6}m spd={:>4}m/s dist={:>6}m fix={:?} portal={}",
        snapshot.now_millis.saturating_sub(start_millis) as f64 / 1000.0,
        snapshot.active_poi.as_deref().unwrap_or("-"),
        fmt(snapshot.altitude.value),
        fmt(snapshot.speed.value),
        fmt(distance),
        snapshot.freshness,
        snapshot.transition.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use skydrop_core::enums::{ActivePointOfInterest, FreshnessLevel, TransitionState};
    use skydrop_core::types::LocalPosition;
    use skydrop_session::freshness::ReadoutView;

    #[test]
    fn test_read_track_rows() {
        let csv = "time_ms,lat,lon,alt,ground_speed\n\
                   1000,41.2,-112.0,4000,55.5\n\
                   2000, 41.2, -112.0, 3900, 50, 1, 2, -50\n";
        let fixes = read_track(csv.as_bytes());
        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[0].timestamp_millis, 1000);
        assert_eq!(fixes[0].position.altitude_m, 4000.0);
        assert!(fixes[0].velocity.is_none());
        assert_eq!(fixes[1].velocity, Some(Velocity::new(1.0, 2.0, -50.0)));
    }

    #[test]
    fn test_read_track_skips_bad_rows() {
        let csv = "# exit at 13500ft\n\
                   1000,41.2,-112.0\n\
                   1500,abc,-112.0,1,1\n\
                   1800,41.2,-112.0,1,1,3.0\n\
                   \n\
                   2000,41.2,-112.0,1,1\n";
        let fixes = read_track(csv.as_bytes());
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].timestamp_millis, 2000);
    }

    #[test]
    fn test_read_track_sorts_by_time() {
        let csv = "3000,41.2,-112.0,1,1\n1000,41.2,-112.0,1,1\n2000,41.2,-112.0,1,1\n";
        let times: Vec<u64> = read_track(csv.as_bytes())
            .iter()
            .map(|f| f.timestamp_millis)
            .collect();
        assert_eq!(times, vec![1000, 2000, 3000]);
    }

    #[test]
    fn test_hud_line_uses_horizontal_distance() {
        let snapshot = FrameSnapshot {
            now_millis: 5_000,
            origin: None,
            subject: Some(LocalPosition::new(0.0, 3000.0, 0.0)),
            destination: Some(LocalPosition::new(30.0, 0.0, 40.0)),
            portal: None,
            active_poi: Some("Ogden".to_string()),
            selection: ActivePointOfInterest::Auto,
            transition: TransitionState::Dormant,
            millis_since_fix: Some(100),
            freshness: FreshnessLevel::Fresh,
            freshness_color: [255, 255, 255],
            speed: ReadoutView {
                value: Some(50.0),
                level: FreshnessLevel::Fresh,
            },
            altitude: ReadoutView {
                value: Some(3000.0),
                level: FreshnessLevel::Fresh,
            },
            scene_commands: Vec::new(),
        };
        let line = hud_line(&snapshot, 1_000);
        assert!(line.contains("dist=    50m"), "{line}");
        assert!(line.contains("poi=Ogden"), "{line}");
    }

    #[test]
    fn test_parse_options() {
        let args: Vec<String> = ["--track", "a.csv", "--speed", "4", "--portal", "41.2,-112.0,1340"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let options = parse_options(&args).expect("options");
        assert_eq!(options.speed, 4.0);
        assert_eq!(
            options.portal,
            Some(GeodeticPosition::new(41.2, -112.0, 1340.0))
        );
        assert!(options.config.is_none());

        let bad: Vec<String> = ["--speed", "0"].iter().map(|s| s.to_string()).collect();
        assert!(parse_options(&bad).is_none());
    }
}
