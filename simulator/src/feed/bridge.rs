use crate::feed::model::CountsIngest;
use crate::generator::crowd::{gate_counts, rotate_images, CrowdConfig};
use crate::workflow::runner::Runner;
use anyhow::Result;
use crowdcore::flow_interface::LiveDataResponse;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn feed_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

/// Window index for the camera rotation; advances every two seconds so
/// consecutive polls inside a window see the same frame and counts.
fn rotation_window() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() / 2)
        .unwrap_or(0)
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Bridge that hosts the live-data HTTP endpoint and republishes payloads.
///
/// `GET /live-data` regenerates the current window on every request; the
/// ingest routes override counts or swap the crowd scenario.
pub struct FeedBridge {
    state: Arc<RwLock<LiveDataResponse>>,
}

impl FeedBridge {
    pub fn new(runner: Arc<Runner>, crowd: CrowdConfig) -> Self {
        let state = Arc::new(RwLock::new(LiveDataResponse::default()));
        let crowd = Arc::new(RwLock::new(crowd));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());
        let crowd_for_filter = crowd.clone();
        let crowd_filter = warp::any().map(move || crowd_for_filter.clone());

        let live_route = warp::path("live-data")
            .and(warp::get())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and(crowd_filter.clone())
            .map(
                |state: Arc<RwLock<LiveDataResponse>>,
                 runner: Arc<Runner>,
                 crowd: Arc<RwLock<CrowdConfig>>| {
                    let started = Instant::now();
                    let config = crowd.read().unwrap().clone();
                    let window = rotation_window();
                    let counts = gate_counts(&config, window);
                    let images = rotate_images(&config, window);
                    match runner.execute(&counts, &images) {
                        Ok(mut response) => {
                            response.metadata.latency_ms = started.elapsed().as_millis() as u64;
                            let mut guard = state.write().unwrap();
                            *guard = response;
                            warp::reply::json(&*guard)
                        }
                        Err(err) => {
                            eprintln!("live-data error: {}", err);
                            warp::reply::json(&*state.read().unwrap())
                        }
                    }
                },
            );

        let counts_route = warp::path("ingest-counts")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |ingest: CountsIngest,
                 state: Arc<RwLock<LiveDataResponse>>,
                 runner: Arc<Runner>| async move {
                    let started = Instant::now();
                    match runner.execute(&ingest.counts, &ingest.images) {
                        Ok(mut response) => {
                            response.metadata.latency_ms = started.elapsed().as_millis() as u64;
                            let total = response.metadata.total_people;
                            *state.write().unwrap() = response;
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({"status": "ok", "total_people": total})),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest-counts error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let scenario_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and(crowd_filter)
            .and_then(
                |config: CrowdConfig,
                 state: Arc<RwLock<LiveDataResponse>>,
                 runner: Arc<Runner>,
                 crowd: Arc<RwLock<CrowdConfig>>| async move {
                    let started = Instant::now();
                    let window = rotation_window();
                    let counts = gate_counts(&config, window);
                    let images = rotate_images(&config, window);
                    match runner.execute(&counts, &images) {
                        Ok(mut response) => {
                            response.metadata.latency_ms = started.elapsed().as_millis() as u64;
                            let total = response.metadata.total_people;
                            *state.write().unwrap() = response;
                            if let Some(name) = config.scenario.as_ref() {
                                println!("[FEED] Scenario {} -> {} people", name, total);
                            }
                            let description = config.description.clone().unwrap_or_default();
                            *crowd.write().unwrap() = config;
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "total_people": total,
                                    "description": description
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest-config error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = live_route.or(counts_route).or(scenario_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(feed_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, response: &LiveDataResponse) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = response.clone();
        println!(
            "[FEED] screens: {}, people: {}",
            guard.screens.len(),
            guard.metadata.total_people
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[FEED] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> LiveDataResponse {
        self.state.read().unwrap().clone()
    }
}
