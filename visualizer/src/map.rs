use crowdcore::flow_interface::FlowSnapshot;
use crowdcore::layout::{DisplayMode, DragTracker, MarkerKind, PercentPoint, PositionStore};
use crowdcore::routing::Direction;
use iced::{
    mouse,
    widget::canvas::{self, Action, Frame, Geometry, Path, Stroke, Text},
    Color, Event, Pixels, Point, Rectangle, Renderer, Size, Theme,
};

const GATEWAY_RADIUS: f32 = 16.0;
const CORRIDOR_RADIUS: f32 = 11.0;
const HIT_SLACK: f32 = 4.0;

/// Events the map surface publishes back to the application.
#[derive(Debug, Clone)]
pub enum MapEvent {
    Moved {
        kind: MarkerKind,
        id: String,
        point: PercentPoint,
    },
    Dropped,
}

/// Stadium map surface: background bowl, gateway and corridor markers at
/// their stored percentage coordinates, badges from the current snapshot,
/// and the drag gesture that repositions markers.
#[derive(Clone)]
pub struct FlowMap {
    gateways: Vec<(String, PercentPoint)>,
    corridors: Vec<(String, PercentPoint)>,
    snapshot: FlowSnapshot,
    max_capacity: u32,
}

#[derive(Debug, Default)]
pub struct DragState {
    active: Option<ActiveDrag>,
}

#[derive(Debug)]
struct ActiveDrag {
    kind: MarkerKind,
    id: String,
    tracker: DragTracker,
}

impl FlowMap {
    pub fn new(store: &PositionStore, mode: DisplayMode, snapshot: &FlowSnapshot) -> Self {
        let collect = |kind: MarkerKind| {
            store
                .positions(kind, mode)
                .iter()
                .map(|record| (record.id.clone(), record.point))
                .collect::<Vec<_>>()
        };
        let max_capacity = if snapshot.metadata.max_capacity_per_gate > 0 {
            snapshot.metadata.max_capacity_per_gate
        } else {
            50
        };
        Self {
            gateways: collect(MarkerKind::Gateway),
            corridors: collect(MarkerKind::Corridor),
            snapshot: snapshot.clone(),
            max_capacity,
        }
    }

    fn marker_center(point: PercentPoint, size: Size) -> Point {
        Point::new(
            point.left.to_pixels(size.width),
            point.top.to_pixels(size.height),
        )
    }

    /// Topmost marker under the pointer; corridors draw above gateways.
    fn hit_test(&self, position: Point, size: Size) -> Option<(MarkerKind, String, PercentPoint)> {
        let within = |point: PercentPoint, radius: f32| {
            let center = Self::marker_center(point, size);
            let dx = position.x - center.x;
            let dy = position.y - center.y;
            (dx * dx + dy * dy).sqrt() <= radius + HIT_SLACK
        };
        for (id, point) in &self.corridors {
            if within(*point, CORRIDOR_RADIUS) {
                return Some((MarkerKind::Corridor, id.clone(), *point));
            }
        }
        for (id, point) in &self.gateways {
            if within(*point, GATEWAY_RADIUS) {
                return Some((MarkerKind::Gateway, id.clone(), *point));
            }
        }
        None
    }

    fn gateway_color(&self, id: &str) -> Color {
        let summary = id
            .parse::<u32>()
            .ok()
            .and_then(|gate| self.snapshot.gateway(gate));
        match summary {
            Some(summary) if summary.count >= self.max_capacity => {
                Color::from_rgb(0.86, 0.28, 0.22)
            }
            Some(_) => Color::from_rgb(0.22, 0.66, 0.35),
            None => Color::from_rgb(0.35, 0.42, 0.38),
        }
    }

    fn draw_background(&self, frame: &mut Frame, bounds: Rectangle) {
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.03, 0.05, 0.04),
        );

        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = bounds.width.min(bounds.height) / 2.0 - 12.0;

        for ring in 1..=2 {
            let ring_radius = radius * (0.55 + ring as f32 * 0.2);
            let ring_path = Path::new(|builder| builder.circle(center, ring_radius));
            frame.stroke(
                &ring_path,
                Stroke::default().with_color(Color::from_rgb(0.18, 0.24, 0.2)),
            );
        }

        let pitch_size = Size::new(bounds.width * 0.34, bounds.height * 0.22);
        let pitch_origin = Point::new(
            center.x - pitch_size.width / 2.0,
            center.y - pitch_size.height / 2.0,
        );
        let pitch = Path::rectangle(pitch_origin, pitch_size);
        frame.fill(&pitch, Color::from_rgb(0.09, 0.32, 0.16));
        frame.stroke(
            &pitch,
            Stroke::default()
                .with_color(Color::from_rgb(0.75, 0.85, 0.78))
                .with_width(1.5),
        );

        let halfway = Path::new(|builder| {
            builder.move_to(Point::new(center.x, pitch_origin.y));
            builder.line_to(Point::new(center.x, pitch_origin.y + pitch_size.height));
        });
        frame.stroke(
            &halfway,
            Stroke::default().with_color(Color::from_rgb(0.75, 0.85, 0.78)),
        );
    }

    fn draw_arrow(&self, frame: &mut Frame, center: Point, direction: Direction, color: Color) {
        let half = 7.0;
        let arrow = Path::new(|builder| match direction {
            Direction::Straight => {
                builder.move_to(Point::new(center.x, center.y + half));
                builder.line_to(Point::new(center.x, center.y - half));
                builder.move_to(Point::new(center.x - half * 0.6, center.y - half * 0.3));
                builder.line_to(Point::new(center.x, center.y - half));
                builder.line_to(Point::new(center.x + half * 0.6, center.y - half * 0.3));
            }
            Direction::Left => {
                builder.move_to(Point::new(center.x + half, center.y));
                builder.line_to(Point::new(center.x - half, center.y));
                builder.move_to(Point::new(center.x - half * 0.3, center.y - half * 0.6));
                builder.line_to(Point::new(center.x - half, center.y));
                builder.line_to(Point::new(center.x - half * 0.3, center.y + half * 0.6));
            }
            Direction::Right => {
                builder.move_to(Point::new(center.x - half, center.y));
                builder.line_to(Point::new(center.x + half, center.y));
                builder.move_to(Point::new(center.x + half * 0.3, center.y - half * 0.6));
                builder.line_to(Point::new(center.x + half, center.y));
                builder.line_to(Point::new(center.x + half * 0.3, center.y + half * 0.6));
            }
        });
        frame.stroke(&arrow, Stroke::default().with_color(color).with_width(2.0));
    }

    fn label(&self, frame: &mut Frame, content: String, position: Point, size: f32, color: Color) {
        frame.fill_text(Text {
            content,
            position,
            color,
            size: Pixels(size),
            ..Text::default()
        });
    }

    fn draw_gateways(&self, frame: &mut Frame, bounds: Rectangle) {
        for (id, point) in &self.gateways {
            let center = Self::marker_center(*point, bounds.size());
            let body = Path::new(|builder| builder.circle(center, GATEWAY_RADIUS));
            frame.fill(&body, self.gateway_color(id));
            frame.stroke(
                &body,
                Stroke::default()
                    .with_color(Color::from_rgb(0.9, 0.95, 0.9))
                    .with_width(1.5),
            );
            self.label(
                frame,
                format!("G{id}"),
                Point::new(center.x - 8.0, center.y - GATEWAY_RADIUS - 16.0),
                13.0,
                Color::from_rgb(0.92, 0.96, 0.92),
            );

            let summary = id
                .parse::<u32>()
                .ok()
                .and_then(|gate| self.snapshot.gateway(gate));
            if let Some(summary) = summary {
                self.label(
                    frame,
                    summary.count.to_string(),
                    Point::new(center.x - 8.0, center.y + GATEWAY_RADIUS + 4.0),
                    12.0,
                    Color::from_rgb(0.95, 0.9, 0.75),
                );
                self.draw_arrow(
                    frame,
                    Point::new(center.x + GATEWAY_RADIUS + 12.0, center.y),
                    summary.status,
                    Color::from_rgb(0.95, 0.9, 0.75),
                );
            }
        }
    }

    fn draw_corridors(&self, frame: &mut Frame, bounds: Rectangle) {
        for (id, point) in &self.corridors {
            let center = Self::marker_center(*point, bounds.size());
            let origin = Point::new(center.x - CORRIDOR_RADIUS, center.y - CORRIDOR_RADIUS);
            let body = Path::rectangle(
                origin,
                Size::new(CORRIDOR_RADIUS * 2.0, CORRIDOR_RADIUS * 2.0),
            );
            frame.fill(&body, Color::from_rgb(0.2, 0.42, 0.78));
            frame.stroke(
                &body,
                Stroke::default()
                    .with_color(Color::from_rgb(0.85, 0.9, 0.98))
                    .with_width(1.0),
            );

            let summary = self.snapshot.corridor(id);
            let portal = summary
                .and_then(|corridor| corridor.id.portal_label())
                .unwrap_or_else(|| id.clone());
            self.label(
                frame,
                portal,
                Point::new(center.x - 10.0, center.y + CORRIDOR_RADIUS + 4.0),
                11.0,
                Color::from_rgb(0.85, 0.9, 0.98),
            );

            if let Some(corridor) = summary {
                self.label(
                    frame,
                    format!("G{}", corridor.target_gateway_id),
                    Point::new(center.x - 8.0, center.y - CORRIDOR_RADIUS - 16.0),
                    12.0,
                    Color::from_rgb(0.98, 0.72, 0.6),
                );
                self.draw_arrow(frame, center, corridor.direction, Color::WHITE);
            }
        }
    }

    fn draw_hover_panel(&self, frame: &mut Frame, bounds: Rectangle, cursor: mouse::Cursor) {
        let Some(position) = cursor.position_in(bounds) else {
            return;
        };
        let Some((kind, id, point)) = self.hit_test(position, bounds.size()) else {
            return;
        };

        let lines: Vec<String> = match kind {
            MarkerKind::Gateway => {
                let summary = id
                    .parse::<u32>()
                    .ok()
                    .and_then(|gate| self.snapshot.gateway(gate));
                match summary {
                    Some(summary) => vec![
                        format!("Gateway {}", summary.id),
                        format!("People: {}", summary.count),
                        format!("Recommended: G{}", summary.recommended_gate),
                        format!("Status: {}", summary.status),
                    ],
                    None => vec![format!("Gateway {id}"), "No analysis yet".into()],
                }
            }
            MarkerKind::Corridor => match self.snapshot.corridor(&id) {
                Some(corridor) => vec![
                    corridor.id.portal_label().unwrap_or_else(|| id.clone()),
                    format!("Route to: G{}", corridor.target_gateway_id),
                    format!("Turn: {}", corridor.direction),
                    format!("People: {}", corridor.people_count),
                ],
                None => vec![id.clone(), "No analysis yet".into()],
            },
        };

        let center = Self::marker_center(point, bounds.size());
        let panel_size = Size::new(150.0, 16.0 * lines.len() as f32 + 12.0);
        let panel_origin = Point::new(
            (center.x + 20.0).min(bounds.width - panel_size.width - 4.0),
            (center.y - panel_size.height / 2.0)
                .clamp(4.0, (bounds.height - panel_size.height - 4.0).max(4.0)),
        );
        let panel = Path::rectangle(panel_origin, panel_size);
        frame.fill(&panel, Color::from_rgba(0.05, 0.08, 0.1, 0.92));
        frame.stroke(
            &panel,
            Stroke::default().with_color(Color::from_rgb(0.4, 0.5, 0.55)),
        );
        for (index, line) in lines.iter().enumerate() {
            self.label(
                frame,
                line.clone(),
                Point::new(
                    panel_origin.x + 8.0,
                    panel_origin.y + 6.0 + index as f32 * 16.0,
                ),
                12.0,
                Color::from_rgb(0.92, 0.94, 0.95),
            );
        }
    }
}

impl canvas::Program<MapEvent> for FlowMap {
    type State = DragState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<MapEvent>> {
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                let (kind, id, point) = self.hit_test(position, bounds.size())?;
                let tracker =
                    DragTracker::grab(position.x, position.y, point, bounds.width, bounds.height);
                state.active = Some(ActiveDrag { kind, id, tracker });
                Some(Action::request_redraw().and_capture())
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let drag = state.active.as_ref()?;
                let position = cursor.position()?;
                let local = Point::new(position.x - bounds.x, position.y - bounds.y);
                let point = drag
                    .tracker
                    .track(local.x, local.y, bounds.width, bounds.height);
                Some(
                    Action::publish(MapEvent::Moved {
                        kind: drag.kind,
                        id: drag.id.clone(),
                        point,
                    })
                    .and_capture(),
                )
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.active.take()?;
                Some(Action::publish(MapEvent::Dropped).and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        self.draw_background(&mut frame, bounds);
        self.draw_gateways(&mut frame, bounds);
        self.draw_corridors(&mut frame, bounds);
        self.draw_hover_panel(&mut frame, bounds, cursor);
        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.active.is_some() {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_in(bounds) {
            Some(position) if self.hit_test(position, bounds.size()).is_some() => {
                mouse::Interaction::Grab
            }
            _ => mouse::Interaction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> FlowMap {
        FlowMap::new(
            &PositionStore::seeded(),
            DisplayMode::Normal,
            &FlowSnapshot::default(),
        )
    }

    #[test]
    fn hit_test_finds_the_seeded_gateway() {
        let size = Size::new(1000.0, 800.0);
        // Gateway 1 sits at top 10% / left 20% -> (200, 80).
        let hit = map().hit_test(Point::new(204.0, 84.0), size).unwrap();
        assert_eq!(hit.0, MarkerKind::Gateway);
        assert_eq!(hit.1, "1");
    }

    #[test]
    fn hit_test_misses_open_ground() {
        let size = Size::new(1000.0, 800.0);
        assert!(map().hit_test(Point::new(520.0, 410.0), size).is_none());
    }

    #[test]
    fn corridors_sit_above_gateways() {
        let mut store = PositionStore::seeded();
        store.set_position(
            MarkerKind::Corridor,
            DisplayMode::Normal,
            "Upper_Gate_1_1",
            PercentPoint::new(10.0, 20.0),
        );
        let map = FlowMap::new(&store, DisplayMode::Normal, &FlowSnapshot::default());
        let hit = map
            .hit_test(Point::new(200.0, 80.0), Size::new(1000.0, 800.0))
            .unwrap();
        assert_eq!(hit.0, MarkerKind::Corridor);
        assert_eq!(hit.1, "Upper_Gate_1_1");
    }
}
