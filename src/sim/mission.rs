//! Per-wave side objectives (rescue / fetch / defend)

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{EventQueue, SimEvent};
use super::score::ScoreManager;

/// Player must be this close to the marker
pub const PROXIMITY: f32 = 2.5;
/// Hold progress lost per second while away, as a fraction of real time
const HOLD_DECAY: f32 = 0.5;

/// Yards where markers may appear (the road band is excluded)
const AREA_HALF_X: f32 = 40.0;
const AREA_HALF_Z: f32 = 30.0;
const ROAD_HALF_WIDTH: f32 = 8.0;
const ROAD_PUSH: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionKind {
    Rescue,
    Fetch,
    Defend,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionTemplate {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: MissionKind,
    pub points: u64,
    /// Seconds to stand at the marker; 0 completes on arrival
    pub hold_secs: f32,
}

pub const TEMPLATES: [MissionTemplate; 8] = [
    MissionTemplate {
        id: "rescue_cat",
        label: "RESCUE THE CAT",
        kind: MissionKind::Rescue,
        points: 500,
        hold_secs: 0.0,
    },
    MissionTemplate {
        id: "rescue_neighbor",
        label: "SAVE THE NEIGHBOR",
        kind: MissionKind::Rescue,
        points: 750,
        hold_secs: 3.0,
    },
    MissionTemplate {
        id: "fetch_package",
        label: "GRAB THE PACKAGE",
        kind: MissionKind::Fetch,
        points: 500,
        hold_secs: 0.0,
    },
    MissionTemplate {
        id: "fetch_toolbox",
        label: "FIND THE TOOLBOX",
        kind: MissionKind::Fetch,
        points: 600,
        hold_secs: 0.0,
    },
    MissionTemplate {
        id: "defend_grill",
        label: "DEFEND THE GRILL",
        kind: MissionKind::Defend,
        points: 1000,
        hold_secs: 5.0,
    },
    MissionTemplate {
        id: "rescue_dog",
        label: "RESCUE THE DOG",
        kind: MissionKind::Rescue,
        points: 500,
        hold_secs: 0.0,
    },
    MissionTemplate {
        id: "fetch_keys",
        label: "FIND THE KEYS",
        kind: MissionKind::Fetch,
        points: 400,
        hold_secs: 0.0,
    },
    MissionTemplate {
        id: "defend_car",
        label: "DEFEND THE CAR",
        kind: MissionKind::Defend,
        points: 900,
        hold_secs: 4.0,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub template: usize,
    pub pos: Vec2,
    /// Seconds held so far (hold templates only)
    pub held: f32,
    pub complete: bool,
}

impl Mission {
    pub fn template(&self) -> &'static MissionTemplate {
        &TEMPLATES[self.template]
    }

    /// 0..1 hold progress; instant missions report 0 until done
    pub fn progress(&self) -> f32 {
        let hold = self.template().hold_secs;
        if self.complete {
            1.0
        } else if hold > 0.0 {
            (self.held / hold).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct MissionBoard {
    current: Option<Mission>,
    last_template: Option<usize>,
    completed: u32,
    rng: Pcg32,
}

impl MissionBoard {
    pub fn new(rng: Pcg32) -> Self {
        Self {
            current: None,
            last_template: None,
            completed: 0,
            rng,
        }
    }

    /// The objective still to be done, if any
    pub fn active(&self) -> Option<&Mission> {
        self.current.as_ref().filter(|m| !m.complete)
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    fn random_spot(&mut self) -> Vec2 {
        let x = self.rng.random_range(-AREA_HALF_X..AREA_HALF_X);
        let mut z = self.rng.random_range(-AREA_HALF_Z..AREA_HALF_Z);
        if z.abs() < ROAD_HALF_WIDTH {
            z += if z > 0.0 { ROAD_PUSH } else { -ROAD_PUSH };
        }
        Vec2::new(x, z)
    }

    /// Replace the current objective with a fresh one (never the same
    /// template twice in a row)
    pub fn start(&mut self, events: &mut EventQueue) -> &Mission {
        let mut template = self.rng.random_range(0..TEMPLATES.len());
        if Some(template) == self.last_template {
            // Skip over the previous pick uniformly among the rest
            template = (template + self.rng.random_range(1..TEMPLATES.len())) % TEMPLATES.len();
        }
        self.last_template = Some(template);

        let pos = self.random_spot();
        events.push(SimEvent::MissionStarted {
            label: TEMPLATES[template].label.to_string(),
            pos,
        });
        self.current.insert(Mission {
            template,
            pos,
            held: 0.0,
            complete: false,
        })
    }

    pub fn update(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        score: &mut ScoreManager,
        events: &mut EventQueue,
    ) {
        let Some(mission) = self.current.as_mut().filter(|m| !m.complete) else {
            return;
        };
        let template = mission.template();

        if player_pos.distance(mission.pos) >= PROXIMITY {
            mission.held = (mission.held - dt * HOLD_DECAY).max(0.0);
            return;
        }

        if template.hold_secs > 0.0 {
            mission.held += dt;
            if mission.held < template.hold_secs {
                return;
            }
        }

        mission.complete = true;
        self.completed += 1;
        score.add_score(template.points);
        log::info!("Mission complete: {} (+{})", template.label, template.points);
        events.push(SimEvent::MissionComplete {
            label: template.label.to_string(),
            points: template.points,
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
