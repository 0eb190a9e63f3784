use crowdcore::flow_interface::{
    FlowMetadata, FlowSnapshot, LiveDataResponse, ScreenId, ScreenReport,
};
use crowdcore::layout::{DisplayMode, PositionStore};
use crowdcore::routing::Direction;
use crowdcore::telemetry::{LogManager, RefreshRecorder};
use iced::{
    time,
    widget::{button, column, row, scrollable, text, text_input, Canvas, Column, Container},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use map::{FlowMap, MapEvent};
use serde::Serialize;
use std::{path::PathBuf, time::Duration};

mod map;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/live-data";
const POLL_INTERVAL: Duration = Duration::from_secs(3);

fn main() -> iced::Result {
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "Stadium Crowd-Flow Dashboard".into()
}

fn application_subscription(dashboard: &Dashboard) -> Subscription<Message> {
    if dashboard.live {
        time::every(POLL_INTERVAL).map(|_| Message::Tick)
    } else {
        Subscription::none()
    }
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Dashboard {
    store: PositionStore,
    store_path: PathBuf,
    mode: DisplayMode,
    snapshot: Option<FlowSnapshot>,
    live: bool,
    endpoint: String,
    scenario: ScenarioForm,
    status: String,
    history: Vec<String>,
    recorder: RefreshRecorder,
    logger: LogManager,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    AnalyzeOnce,
    PayloadFetched(Result<LiveDataResponse, String>),
    ToggleLive,
    LoadMock,
    Reset,
    ToggleFullscreen,
    EndpointChanged(String),
    ScenarioFieldChanged(ScenarioField, String),
    SubmitScenario,
    ScenarioSubmitted(Result<String, String>),
    Map(MapEvent),
}

#[derive(Debug, Clone, Copy)]
enum ScenarioField {
    Peak,
    Jitter,
    Seed,
    Description,
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        let store_path = PathBuf::from("tools/data/marker_positions.json");
        let store = PositionStore::load(&store_path).unwrap_or_else(|_| PositionStore::seeded());
        (
            Dashboard {
                store,
                store_path,
                mode: DisplayMode::Normal,
                snapshot: None,
                live: false,
                endpoint: DEFAULT_ENDPOINT.into(),
                scenario: ScenarioForm::default(),
                status: "Waiting for analysis...".into(),
                history: Vec::new(),
                recorder: RefreshRecorder::new(),
                logger: LogManager::new("dashboard"),
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick | Message::AnalyzeOnce => {
                Task::perform(fetch_live_data(state.endpoint.clone()), Message::PayloadFetched)
            }
            Message::PayloadFetched(Ok(response)) => {
                state.absorb(&response);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.recorder.record_failed();
                state.status = format!("Refresh failed: {err}");
                state.logger.record(&format!("refresh failed: {err}"));
                state.push_history(format!("Refresh failed: {err}"));
                Task::none()
            }
            Message::ToggleLive => {
                state.live = !state.live;
                let note = if state.live {
                    "Live feed started (3 s interval)"
                } else {
                    "Live feed stopped"
                };
                state.status = note.into();
                state.push_history(note.into());
                Task::none()
            }
            Message::LoadMock => {
                state.absorb(&mock_live_data());
                state.status = "Mock payload loaded".into();
                state.push_history("Mock payload loaded".into());
                Task::none()
            }
            Message::Reset => {
                state.snapshot = None;
                state.status = "Overlay cleared".into();
                state.push_history("Overlay cleared".into());
                Task::none()
            }
            Message::ToggleFullscreen => {
                state.mode = match state.mode {
                    DisplayMode::Normal => DisplayMode::Fullscreen,
                    DisplayMode::Fullscreen => DisplayMode::Normal,
                };
                state.push_history(match state.mode {
                    DisplayMode::Fullscreen => "Entered fullscreen layout".into(),
                    DisplayMode::Normal => "Back to normal layout".into(),
                });
                Task::none()
            }
            Message::EndpointChanged(value) => {
                state.endpoint = value;
                Task::none()
            }
            Message::ScenarioFieldChanged(field, value) => {
                state.scenario.update_field(field, value);
                Task::none()
            }
            Message::SubmitScenario => {
                let payload = state.scenario.to_payload();
                Task::perform(
                    post_scenario(ingest_endpoint(&state.endpoint), payload),
                    Message::ScenarioSubmitted,
                )
            }
            Message::ScenarioSubmitted(Ok(message)) => {
                state.status = message.clone();
                state.push_history(message);
                Task::none()
            }
            Message::ScenarioSubmitted(Err(err)) => {
                state.status = format!("Scenario error: {err}");
                state.push_history(format!("Scenario error: {err}"));
                Task::none()
            }
            Message::Map(MapEvent::Moved { kind, id, point }) => {
                state.store.set_position(kind, state.mode, &id, point);
                Task::none()
            }
            Message::Map(MapEvent::Dropped) => {
                match state.store.save(&state.store_path) {
                    Ok(()) => state.push_history("Marker layout saved".into()),
                    Err(err) => {
                        state.status = format!("Layout save failed: {err}");
                        state.logger.record(&format!("layout save failed: {err}"));
                    }
                }
                Task::none()
            }
        }
    }

    /// Replace the whole overlay in one step; gateway and corridor data
    /// always come from the same refresh cycle.
    fn absorb(&mut self, response: &LiveDataResponse) {
        let snapshot = FlowSnapshot::from_response(response);
        self.recorder.record_completed(snapshot.metadata.total_people);
        self.status = format!(
            "Live data: {} people across {} gates ({} ms)",
            snapshot.metadata.total_people,
            snapshot.gateways.len(),
            snapshot.metadata.latency_ms
        );
        self.push_history(format!(
            "Refresh: {} people / {} screens",
            snapshot.metadata.total_people,
            snapshot.corridors.len()
        ));
        self.snapshot = Some(snapshot);
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let snapshot = state.snapshot.clone().unwrap_or_default();
        let flow_map = FlowMap::new(&state.store, state.mode, &snapshot);
        let map_canvas: Element<'_, MapEvent> = Canvas::new(flow_map)
            .width(Length::Fill)
            .height(Length::Fill)
            .into();
        let map_canvas = map_canvas.map(Message::Map);

        if state.mode == DisplayMode::Fullscreen {
            let exit_bar = row![
                text(&state.status).size(14),
                button("Exit fullscreen")
                    .on_press(Message::ToggleFullscreen)
                    .padding(6),
            ]
            .spacing(12)
            .align_y(Alignment::Center)
            .padding(8);

            return Container::new(column![exit_bar, map_canvas])
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }

        let (completed, failed, last_total) = state.recorder.snapshot();

        let control_column = column![
            text("Crowd Flow Control").size(26),
            text_input("Live-data endpoint", &state.endpoint)
                .on_input(Message::EndpointChanged)
                .padding(6),
            row![
                button("Analyze once")
                    .on_press(Message::AnalyzeOnce)
                    .padding(8),
                button(if state.live {
                    "Stop live feed"
                } else {
                    "Start live feed"
                })
                .on_press(Message::ToggleLive)
                .padding(8),
            ]
            .spacing(8),
            row![
                button("Mock data").on_press(Message::LoadMock).padding(8),
                button("Reset").on_press(Message::Reset).padding(8),
                button("Fullscreen")
                    .on_press(Message::ToggleFullscreen)
                    .padding(8),
            ]
            .spacing(8),
            text(&state.status).size(14),
            text(format!(
                "Cycles: {completed} ok / {failed} failed, last total {last_total}"
            ))
            .size(12),
            text("Scenario").size(18),
            text_input("Peak count", &state.scenario.peak)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::Peak, value))
                .padding(6),
            text_input("Jitter", &state.scenario.jitter)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::Jitter, value))
                .padding(6),
            text_input("Seed", &state.scenario.seed)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::Seed, value))
                .padding(6),
            text_input("Description", &state.scenario.description)
                .on_input(|value| {
                    Message::ScenarioFieldChanged(ScenarioField::Description, value)
                })
                .padding(6),
            button("POST scenario")
                .on_press(Message::SubmitScenario)
                .padding(8),
            text("Drag markers to reposition; the layout is saved on drop.").size(12),
            text("Activity log").size(16),
            Container::new(scrollable(history_list(&state.history)).height(Length::Fixed(140.0)))
                .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(340.0));

        let map_column = column![
            text("Stadium Map").size(26),
            map_canvas,
            overlay_summary(state),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![control_column, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn history_list(history: &[String]) -> Column<'_, Message> {
    if history.is_empty() {
        Column::new().push(text("No activity yet").size(12))
    } else {
        history
            .iter()
            .rev()
            .fold(Column::new().spacing(4), |col, entry| {
                col.push(text(entry.clone()).size(12))
            })
    }
}

fn overlay_summary(state: &Dashboard) -> Element<'_, Message> {
    let line = match &state.snapshot {
        Some(snapshot) => format!(
            "{} gateways, {} corridor screens, capacity {} per gate",
            snapshot.gateways.len(),
            snapshot.corridors.len(),
            snapshot.metadata.max_capacity_per_gate
        ),
        None => "No analysis yet - markers show layout only".into(),
    };
    text(line).size(14).into()
}

fn ingest_endpoint(endpoint: &str) -> String {
    let base = endpoint
        .trim_end_matches('/')
        .trim_end_matches("live-data")
        .trim_end_matches('/');
    format!("{base}/ingest-config")
}

async fn fetch_live_data(endpoint: String) -> Result<LiveDataResponse, String> {
    let response = reqwest::get(&endpoint).await.map_err(|e| e.to_string())?;
    let response = response.error_for_status().map_err(|e| e.to_string())?;
    response
        .json::<LiveDataResponse>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_scenario(endpoint: String, config: ScenarioConfig) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(&endpoint)
        .json(&config)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Scenario submitted".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone)]
struct ScenarioForm {
    peak: String,
    jitter: String,
    seed: String,
    description: String,
}

impl Default for ScenarioForm {
    fn default() -> Self {
        Self {
            peak: "150".into(),
            jitter: "3".into(),
            seed: "0".into(),
            description: "Dashboard scenario".into(),
        }
    }
}

impl ScenarioForm {
    fn update_field(&mut self, field: ScenarioField, value: String) {
        match field {
            ScenarioField::Peak => self.peak = value,
            ScenarioField::Jitter => self.jitter = value,
            ScenarioField::Seed => self.seed = value,
            ScenarioField::Description => self.description = value,
        }
    }

    fn to_payload(&self) -> ScenarioConfig {
        ScenarioConfig {
            peak: self.peak.parse().ok(),
            jitter: self.jitter.parse().ok(),
            seed: self.seed.parse().ok(),
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ScenarioConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    peak: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jitter: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// The hardcoded demo payload, shaped exactly like a feed response so it
/// flows through the same mapping as a real refresh.
fn mock_live_data() -> LiveDataResponse {
    let gates: [(u32, u32, u32, Direction); 6] = [
        (1, 45, 1, Direction::Straight),
        (2, 120, 1, Direction::Left),
        (3, 15, 3, Direction::Straight),
        (4, 85, 6, Direction::Right),
        (5, 150, 6, Direction::Right),
        (6, 30, 6, Direction::Straight),
    ];

    let mut screens = Vec::with_capacity(gates.len() * 3);
    for (gate, count, recommended, direction) in gates {
        let report = |screen_id: ScreenId| ScreenReport {
            screen_id,
            assigned_gate: gate,
            recommended_gate: recommended,
            people_count: count,
            direction: Some(direction),
            image_url: None,
        };
        screens.push(report(ScreenId::Lower { gate }));
        for panel in 1..=2 {
            screens.push(report(ScreenId::Upper { gate, panel }));
        }
    }

    let total_people = gates.iter().map(|(_, count, _, _)| count).sum();
    LiveDataResponse {
        screens,
        metadata: FlowMetadata {
            total_people,
            max_capacity_per_gate: 50,
            num_gates: 6,
            latency_ms: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowdcore::layout::{MarkerKind, PercentPoint};

    fn dashboard() -> Dashboard {
        Dashboard::boot().0
    }

    #[test]
    fn mock_payload_populates_both_result_sets() {
        let mut state = dashboard();
        let _ = Dashboard::update(&mut state, Message::LoadMock);
        let snapshot = state.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.gateways.len(), 6);
        assert_eq!(snapshot.corridors.len(), 12);
        assert_eq!(snapshot.gateway(2).unwrap().status, Direction::Left);
    }

    #[test]
    fn failed_refresh_retains_previous_results() {
        let mut state = dashboard();
        let _ = Dashboard::update(&mut state, Message::LoadMock);
        let before = state.snapshot.clone();
        let _ = Dashboard::update(
            &mut state,
            Message::PayloadFetched(Err("connection refused".into())),
        );
        assert_eq!(state.snapshot, before);
        assert!(state.status.contains("Refresh failed"));
    }

    #[test]
    fn reset_clears_the_overlay() {
        let mut state = dashboard();
        let _ = Dashboard::update(&mut state, Message::LoadMock);
        let _ = Dashboard::update(&mut state, Message::Reset);
        assert!(state.snapshot.is_none());
    }

    #[test]
    fn drags_touch_only_the_active_display_mode() {
        let mut state = dashboard();
        let moved = PercentPoint::new(33.0, 44.0);
        let _ = Dashboard::update(
            &mut state,
            Message::Map(MapEvent::Moved {
                kind: MarkerKind::Gateway,
                id: "1".into(),
                point: moved,
            }),
        );
        let normal = state
            .store
            .position(MarkerKind::Gateway, DisplayMode::Normal, "1")
            .unwrap();
        let fullscreen = state
            .store
            .position(MarkerKind::Gateway, DisplayMode::Fullscreen, "1")
            .unwrap();
        assert_eq!(normal.top.value(), 33.0);
        assert_ne!(fullscreen.top.value(), 33.0);
    }

    #[test]
    fn ingest_endpoint_is_derived_from_the_live_endpoint() {
        assert_eq!(
            ingest_endpoint("http://127.0.0.1:8000/live-data"),
            "http://127.0.0.1:8000/ingest-config"
        );
        assert_eq!(
            ingest_endpoint("http://127.0.0.1:8000/live-data/"),
            "http://127.0.0.1:8000/ingest-config"
        );
    }
}
