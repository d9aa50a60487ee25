#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the ranch map dashboard.
//!
//! Serves the herd poll (`/get_cattle`), the ranch analysis
//! (`/analyze_ranch`) and a few `/api` helpers, plus the static dashboard
//! build. County boundaries are read once at startup; if they are missing
//! the server still runs and every animal reports as unknown.

mod handlers;
pub mod interactive;
pub mod profile;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use chrono::Utc;
use clap::Args;
use rand::{Rng as _, SeedableRng};
use rand::rngs::StdRng;
use ranch_map_census::classify;
use ranch_map_geography::regions::load_catalog_or_empty;
use ranch_map_herd::{Herd, HerdError};
use ranch_map_server_models::{ApiAlert, CattleResponse, HeatmapPoint};
use ranch_map_spatial::RegionIndex;
use ranch_map_weather::open_meteo::OpenMeteoClient;
use ranch_map_weather::{WeatherError, WeatherProvider};
use thiserror::Error;

use crate::profile::{ProfileError, RanchProfile};

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested profile is unknown or malformed.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// The profile's herd parameters are invalid.
    #[error(transparent)]
    Herd(#[from] HerdError),

    /// The weather client could not be built.
    #[error(transparent)]
    Weather(#[from] WeatherError),
}

/// Runtime options, from flags or environment.
#[derive(Debug, Clone, Args)]
pub struct ServerOptions {
    /// Address to bind.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
    pub bind_addr: String,
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    /// Deployment profile id.
    #[arg(long, env = "RANCH_PROFILE", default_value = profile::DEFAULT_PROFILE)]
    pub profile: String,
    /// County boundary `GeoJSON` file.
    #[arg(
        long,
        env = "REGIONS_PATH",
        default_value = "static/montana_counties.geojson"
    )]
    pub regions_path: PathBuf,
    /// Directory holding the dashboard build.
    #[arg(long, env = "RANCH_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
    /// Seed for the herd simulation (random when unset).
    #[arg(long, env = "HERD_SEED")]
    pub herd_seed: Option<u64>,
}

/// The herd and the random source that drives it.
///
/// Kept together so a single lock covers the whole poll.
pub struct HerdState {
    /// Tracked animals.
    pub herd: Herd,
    /// Random walk source.
    pub rng: StdRng,
}

/// Shared application state.
pub struct AppState {
    /// Active deployment profile.
    pub profile: RanchProfile,
    /// Herd simulation. Perturb and classify run under one lock so
    /// concurrent polls never see a half-moved herd.
    pub herd: Mutex<HerdState>,
    /// County index, immutable after startup.
    pub regions: RegionIndex,
    /// Weather source for ranch analysis.
    pub weather: Arc<dyn WeatherProvider>,
    /// Parent source for per-request NDVI draws. Seeded from the herd seed
    /// so analysis responses replay too.
    pub analysis_rng: Mutex<StdRng>,
}

impl AppState {
    /// Builds state for a profile, scattering a fresh herd.
    ///
    /// With a `seed`, both the herd walk and the analysis draws are
    /// reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Herd`] if the profile's herd is invalid.
    pub fn new(
        profile: RanchProfile,
        regions: RegionIndex,
        weather: Arc<dyn WeatherProvider>,
        seed: Option<u64>,
    ) -> Result<Self, ServerError> {
        let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let analysis_rng = StdRng::seed_from_u64(rng.r#gen());
        let herd = Herd::initialize(&profile.herd, &mut rng)?;

        Ok(Self {
            profile,
            herd: Mutex::new(HerdState { herd, rng }),
            regions,
            weather,
            analysis_rng: Mutex::new(analysis_rng),
        })
    }

    /// A fresh random source for one analysis request.
    ///
    /// Derived from the shared analysis source so the lock is released
    /// before the weather call is awaited.
    #[must_use]
    pub fn request_rng(&self) -> StdRng {
        let mut parent = self
            .analysis_rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        StdRng::seed_from_u64(parent.r#gen())
    }

    /// Moves the herd one step, classifies it and snapshots the result.
    ///
    /// A poisoned lock is recovered: every mutation leaves the herd in a
    /// valid state, so there is nothing to roll back.
    pub fn poll(&self) -> CattleResponse {
        let herd_config = &self.profile.herd;
        let alert_threshold = self.profile.census.alert_threshold;

        let mut guard = self.herd.lock().unwrap_or_else(PoisonError::into_inner);
        let HerdState { herd, rng } = &mut *guard;

        herd.perturb(herd_config.step, herd_config.bounds.as_ref(), rng);
        let census = classify(herd.positions_mut(), &self.regions, alert_threshold);
        let cattle = herd.positions().to_vec();
        drop(guard);

        let heatmap = self.profile.heatmap.map(|settings| {
            cattle
                .iter()
                .map(|p| HeatmapPoint::at(p, settings.intensity))
                .collect()
        });
        let alerts = alert_threshold
            .map(|_| census.alerts.into_iter().map(ApiAlert::from).collect());

        CattleResponse {
            cattle,
            counts: census.tally,
            alerts,
            heatmap,
            polled_at: Utc::now(),
        }
    }
}

/// Registers the API routes and the JSON error handler.
///
/// The static dashboard is mounted separately by [`run_server`] because it
/// must come last.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error))
        .route("/get_cattle", web::get().to(handlers::get_cattle))
        .route("/analyze_ranch", web::post().to(handlers::analyze_ranch))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/info", web::get().to(handlers::info)),
        );
}

/// Starts the ranch map API server.
///
/// Loads the profile, the county boundaries (falling back to none), builds
/// the weather client and herd, and starts the Actix-Web HTTP server. The
/// caller provides the async runtime and initializes logging.
///
/// # Errors
///
/// Returns [`ServerError`] if the profile is unknown, the herd or weather
/// client cannot be built, or the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server(options: ServerOptions) -> Result<(), ServerError> {
    let profile = profile::load_profile(&options.profile)?;
    log::info!(
        "Using profile '{}' ({}): {} head",
        profile.id,
        profile.name,
        profile.herd.count
    );

    log::info!("Loading regions from {}...", options.regions_path.display());
    let regions = RegionIndex::build(load_catalog_or_empty(&options.regions_path));
    if regions.is_empty() {
        log::warn!("No regions loaded; every animal will classify as unknown");
    }

    let weather = OpenMeteoClient::new(&profile.weather)?;

    let state = web::Data::new(AppState::new(
        profile,
        regions,
        Arc::new(weather),
        options.herd_seed,
    )?);

    let static_dir = options.static_dir.clone();
    let serve_static = static_dir.is_dir();
    if !serve_static {
        log::warn!(
            "Static directory {} not found; dashboard will not be served",
            static_dir.display()
        );
    }

    log::info!("Starting server on {}:{}", options.bind_addr, options.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();
        let static_dir = static_dir.clone();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            .configure(move |cfg| {
                if serve_static {
                    cfg.service(Files::new("/", static_dir).index_file("index.html"));
                }
            })
    })
    .bind((options.bind_addr.as_str(), options.port))?
    .run()
    .await?;

    Ok(())
}
