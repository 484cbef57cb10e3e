//! Scripted teleport scenarios: named pointers, a rig, and a list of input
//! and render steps replayed through a `TeleportHub`.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::{Vec2, Vec3};
use mrkit_common::PointerId;
use mrkit_input::InputEvent;
use mrkit_teleport::{
    HotSpot, ParabolicArc, PlayspaceRig, PointerBinding, PointerTransition, RaycastResult,
    TargetId, TeleportConfig, TeleportConfigError, TeleportHub, TeleportPointer,
    TeleportValidationResult, ValidationProvider,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("step {step} names unknown pointer '{name}'")]
    UnknownPointer { step: usize, name: String },
    #[error("pointer '{name}': {source}")]
    Config {
        name: String,
        source: TeleportConfigError,
    },
}

/// Read a YAML or JSON document, picked by file extension.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, ScenarioError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(serde_yaml::from_str(&text)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RigSpec {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
}

fn default_eye_height() -> f32 {
    1.6
}

impl Default for RigSpec {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            eye_height: default_eye_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointerSpec {
    pub name: String,
    pub binding: PointerBinding,
    #[serde(default)]
    pub config: TeleportConfig,
}

/// One scripted tick.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Thumbstick sample on the pointer's teleport action.
    Stick { pointer: String, x: f32, y: f32 },
    /// Digital press or release on the pointer's teleport action.
    Button { pointer: String, pressed: bool },
    /// Single-axis sample on the pointer's teleport action.
    Trigger { pointer: String, value: f32 },
    /// Digital press on the pointer's cancel action.
    Cancel { pointer: String },
    /// Render tick where the arc hits `point`, classified as `validation`.
    Hit {
        pointer: String,
        point: Vec3,
        validation: TeleportValidationResult,
        #[serde(default)]
        hot_spot: Option<HotSpot>,
    },
    /// Render tick where the arc hits nothing.
    Miss { pointer: String },
    /// The pointer's input source disappeared.
    SourceLost { pointer: String },
}

impl Step {
    fn pointer(&self) -> &str {
        match self {
            Step::Stick { pointer, .. }
            | Step::Button { pointer, .. }
            | Step::Trigger { pointer, .. }
            | Step::Cancel { pointer }
            | Step::Hit { pointer, .. }
            | Step::Miss { pointer }
            | Step::SourceLost { pointer } => pointer,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub rig: RigSpec,
    pub pointers: Vec<PointerSpec>,
    pub steps: Vec<Step>,
}

/// Everything a scenario run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Broadcast events, as `"<kind> <pointer name>"`.
    pub events: Vec<String>,
    /// Pointer transitions, as `(step, pointer name, transition)`.
    pub transitions: Vec<(usize, String, PointerTransition)>,
    pub camera_position: Vec3,
    pub camera_yaw: f32,
}

const ARC_SPEED: f32 = 7.0;
const ARC_DURATION: f32 = 1.5;

pub fn run(scenario: &Scenario) -> Result<Report, ScenarioError> {
    let rig = PlayspaceRig::standing(scenario.rig.position, scenario.rig.eye_height);
    let mut hub = TeleportHub::new().with_camera_rig(Box::new(rig));

    // The scripted classification for the next render tick.
    let verdict = Rc::new(Cell::new(TeleportValidationResult::None));
    let provider: Rc<dyn ValidationProvider> = {
        let verdict = Rc::clone(&verdict);
        Rc::new(move |_: &RaycastResult, _: Option<&HotSpot>| verdict.get())
    };

    let mut ids: BTreeMap<String, PointerId> = BTreeMap::new();
    for spec in &scenario.pointers {
        let pointer = TeleportPointer::new(
            spec.binding,
            spec.config.clone(),
            Some(Rc::clone(&provider)),
        )
        .map_err(|source| ScenarioError::Config {
            name: spec.name.clone(),
            source,
        })?;
        ids.insert(spec.name.clone(), hub.add_pointer(pointer));
    }
    let names: BTreeMap<PointerId, String> =
        ids.iter().map(|(name, id)| (*id, name.clone())).collect();

    let mut transitions = Vec::new();
    for (index, step) in scenario.steps.iter().enumerate() {
        let name = step.pointer();
        let id = *ids.get(name).ok_or_else(|| ScenarioError::UnknownPointer {
            step: index,
            name: name.to_string(),
        })?;
        let Some(binding) = hub.pointer(id).map(|p| *p.binding()) else {
            continue;
        };
        tracing::debug!(step = index, pointer = name, "scenario step");

        let input = match step {
            Step::Stick { x, y, .. } => Some(InputEvent::dual_axis(
                binding.source,
                binding.handedness,
                binding.teleport_action,
                Vec2::new(*x, *y),
            )),
            Step::Button { pressed, .. } => Some(InputEvent::digital(
                binding.source,
                binding.handedness,
                binding.teleport_action,
                *pressed,
            )),
            Step::Trigger { value, .. } => Some(InputEvent::single_axis(
                binding.source,
                binding.handedness,
                binding.teleport_action,
                *value,
            )),
            Step::Cancel { .. } => Some(InputEvent::digital(
                binding.source,
                binding.handedness,
                binding.cancel_action,
                true,
            )),
            Step::Hit {
                point,
                validation,
                hot_spot,
                ..
            } => {
                verdict.set(*validation);
                let arc = aim(&hub);
                let hit = hub.pointer_mut(id).map(|p| {
                    let steps = p.pre_raycast(&arc);
                    let last = steps.len().saturating_sub(1);
                    let hit = RaycastResult::hit(TargetId(1), steps, last, *point);
                    match hot_spot {
                        Some(hs) => hit.with_hot_spot(*hs),
                        None => hit,
                    }
                });
                hub.render_tick(id, hit.as_ref());
                None
            }
            Step::Miss { .. } => {
                verdict.set(TeleportValidationResult::None);
                let arc = aim(&hub);
                if let Some(p) = hub.pointer_mut(id) {
                    p.pre_raycast(&arc);
                }
                hub.render_tick(id, None);
                None
            }
            Step::SourceLost { .. } => {
                hub.source_lost(binding.source);
                None
            }
        };

        if let Some(input) = input {
            for (pointer, transition) in hub.handle_input(&input) {
                let name = names.get(&pointer).cloned().unwrap_or_default();
                transitions.push((index, name, transition));
            }
        }
    }

    let events = hub
        .events()
        .iter()
        .map(|event| {
            let name = names.get(&event.pointer()).map(String::as_str).unwrap_or("?");
            format!("{} {}", event.kind(), name)
        })
        .collect();
    let (camera_position, camera_yaw) = hub
        .camera_rig()
        .map(|rig| (rig.camera_position(), rig.camera_yaw()))
        .unwrap_or_default();

    Ok(Report {
        events,
        transitions,
        camera_position,
        camera_yaw,
    })
}

fn aim(hub: &TeleportHub) -> ParabolicArc {
    let (origin, forward) = hub
        .camera_rig()
        .map(|rig| (rig.camera_position(), rig.camera_forward()))
        .unwrap_or((Vec3::ZERO, Vec3::NEG_Z));
    ParabolicArc::new(origin, forward, ARC_SPEED, ARC_DURATION)
}
