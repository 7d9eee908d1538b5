use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use foundation::math::{LatLng, OrthographicCamera};
use globe::GlobeSession;
use layers::{ClusterBuilder, ClusterMode, ScreenProjector};
use serde::Serialize;
use tools::replay::{parse_script, replay};
use tools::view::{DEFAULT_VIEWPORT_PX, StandInRenderer};
use tools::{ToolError, load_config, load_places, read_text};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect globe clustering for a place list")]
struct Cli {
    /// Globe config JSON (defaults to $GLOBE_CONFIG, then built-in values)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Copy)]
struct CameraArgs {
    /// Latitude the camera looks at
    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude the camera looks at
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    lng: f64,

    /// Camera altitude in globe radii
    #[arg(long, default_value_t = globe::DEFAULT_ZOOM)]
    altitude: f64,

    #[arg(long, default_value_t = DEFAULT_VIEWPORT_PX[0])]
    width: f64,

    #[arg(long, default_value_t = DEFAULT_VIEWPORT_PX[1])]
    height: f64,
}

impl CameraArgs {
    fn camera(self) -> OrthographicCamera {
        OrthographicCamera::new(
            LatLng::new(self.lat, self.lng),
            self.altitude,
            [self.width, self.height],
        )
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ModeArg {
    Continent,
    Country,
    City,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the labels for a place list as JSON
    Clusters {
        /// JSON array of places
        places: PathBuf,

        #[command(flatten)]
        camera: CameraArgs,

        #[arg(long, value_enum, default_value_t = ModeArg::Country)]
        mode: ModeArg,

        /// Country expanded in city mode (e.g. JP)
        #[arg(long)]
        country: Option<String>,

        /// Behave as if the renderer had no camera yet
        #[arg(long)]
        no_projection: bool,
    },

    /// Feed a scripted input log to a globe session and print every step
    Replay {
        /// JSON array of places
        places: PathBuf,

        /// JSON array of steps
        script: PathBuf,

        #[command(flatten)]
        camera: CameraArgs,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClustersOutput {
    projection_fallback: bool,
    unprojected: usize,
    clusters: Vec<layers::Cluster>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), ToolError> {
    let args = Cli::parse();
    let config_path = args
        .config
        .or_else(|| env::var_os("GLOBE_CONFIG").map(PathBuf::from));
    let config = load_config(config_path.as_deref())?;

    match args.command {
        Command::Clusters {
            places,
            camera,
            mode,
            country,
            no_projection,
        } => {
            let catalog = load_places(&places)?;
            let mode = match (mode, country.as_deref()) {
                (ModeArg::Continent, _) => ClusterMode::Continent,
                (ModeArg::Country, _) => ClusterMode::Country,
                (ModeArg::City, Some(country_id)) => ClusterMode::City { country_id },
                (ModeArg::City, None) => {
                    return Err(ToolError::Usage("--mode city requires --country".to_string()));
                }
            };
            let camera = camera.camera();
            let projector = (!no_projection).then_some(&camera as &dyn ScreenProjector);
            let builder = ClusterBuilder::new(config.clusters.clone());
            let (clusters, report) =
                builder.build_with_report(catalog.places(), camera.altitude, mode, projector);
            info!(
                clusters = clusters.len(),
                continents = report.continent_clusters,
                "clustered {} places",
                catalog.len()
            );
            print_json(&ClustersOutput {
                projection_fallback: report.projection_fallback,
                unprojected: report.unprojected,
                clusters,
            })
        }
        Command::Replay {
            places,
            script,
            camera,
        } => {
            let catalog = load_places(&places)?;
            let steps = parse_script(&read_text(&script)?)?;
            let mut session = GlobeSession::from_catalog(catalog, config);
            let mut renderer = StandInRenderer::new(camera.camera());
            let records = replay(&mut session, &mut renderer, &steps)?;
            info!(steps = records.len(), "replay finished");
            print_json(&records)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ToolError> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clusters_command_takes_camera_and_mode() {
        let cli = Cli::try_parse_from([
            "atlas",
            "clusters",
            "places.json",
            "--lat",
            "-33.9",
            "--lng",
            "151.2",
            "--mode",
            "city",
            "--country",
            "AU",
        ])
        .unwrap();
        let Command::Clusters {
            camera,
            mode,
            country,
            no_projection,
            ..
        } = cli.command
        else {
            panic!("expected clusters");
        };
        assert_eq!(camera.lat, -33.9);
        assert_eq!(camera.altitude, globe::DEFAULT_ZOOM);
        assert_eq!(mode, ModeArg::City);
        assert_eq!(country.as_deref(), Some("AU"));
        assert!(!no_projection);
    }

    #[test]
    fn replay_needs_a_script() {
        assert!(Cli::try_parse_from(["atlas", "replay", "places.json"]).is_err());
        let cli = Cli::try_parse_from([
            "atlas", "--config", "globe.json", "replay", "places.json", "script.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("globe.json")));
    }
}
