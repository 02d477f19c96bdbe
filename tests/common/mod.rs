#![allow(dead_code)]

use std::time::{Duration, Instant};

use tracemap::math::Point3;
use tracemap::{Command, Event, MapperConfig, PolylineId, Session, TriangleMesh};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn p(x: f64, y: f64) -> Point3 {
    Point3::new(x, y, 0.0)
}

/// Flat `n × n` grid on z = 0 spanning `[0, size]²`.
pub fn flat_mesh(n: u32, size: f64) -> TriangleMesh {
    let row = n + 1;
    let vertices = (0..=n)
        .flat_map(|j| {
            (0..=n).map(move |i| {
                Point3::new(
                    size * f64::from(i) / f64::from(n),
                    size * f64::from(j) / f64::from(n),
                    0.0,
                )
            })
        })
        .collect();
    let indices = (0..n)
        .flat_map(|j| {
            (0..n).flat_map(move |i| {
                let v0 = j * row + i;
                let v2 = v0 + row;
                [[v0, v0 + 1, v2 + 1], [v0, v2 + 1, v2]]
            })
        })
        .collect();
    TriangleMesh::new(vertices, indices)
}

/// Session over a 100 × 100 flat surface with default thresholds.
///
/// The diagonal is 100√2, so selection and join radii are about 1.13, the
/// deletion radius about 0.42 and the endpoint pick radius about 2.83.
pub fn session() -> Session<TriangleMesh> {
    init_tracing();
    Session::new(flat_mesh(10, 100.0), MapperConfig::default())
}

/// Hands out pick timestamps far enough apart to never form a double-click.
pub struct Clock {
    now: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> Instant {
        self.now += Duration::from_secs(2);
        self.now
    }

    /// A timestamp shortly after the previous one.
    pub fn soon(&mut self) -> Instant {
        self.now += Duration::from_millis(100);
        self.now
    }
}

pub fn pick(session: &mut Session<TriangleMesh>, clock: &mut Clock, point: Point3) -> Vec<Command> {
    session.handle(Event::Pick {
        point,
        at: clock.tick(),
    })
}

/// Digitizes one polyline from Select mode and returns to Select.
pub fn digitize(
    session: &mut Session<TriangleMesh>,
    clock: &mut Clock,
    points: &[Point3],
) -> PolylineId {
    session.handle(Event::ToggleDigitize);
    for &point in points {
        pick(session, clock, point);
    }
    session.handle(Event::Finish);
    session.handle(Event::ToggleDigitize);
    let ids = session.store().ids();
    ids[ids.len() - 1]
}
