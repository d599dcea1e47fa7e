//! Scripting
//!
//! Hosts the rhai engine. Scripts attached to entities expose `on_init`
//! (once per entity) and `on_update` (every frame); both receive an
//! entity handle whose methods queue commands instead of mutating the
//! scene directly. Commands are applied after all scripts have run, so
//! a faulting script cannot leave the scene half-written and physics
//! sees every script-driven move made this frame.
//!
//! Script errors never unwind into the frame loop: compile errors are
//! recorded on the script runtime, call errors become a subsystem fault
//! for the frame, and the remaining entities and subsystems still run.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::math::Vec3;
use rhai::{Engine, EvalAltResult, Scope};

use crate::defs::{format_uuid, Uuid};
use crate::runtime::{AssetCaches, AssetRuntime, SceneRuntime};

use super::{ComponentError, Time};

/// A mutation requested by a script, applied after the script pass
#[derive(Debug, Clone)]
pub enum ScriptCommand {
    Translate { entity: Uuid, delta: Vec3 },
    SetPosition { entity: Uuid, position: Vec3 },
    Rotate { entity: Uuid, delta: Vec3 },
    PlayAudio { entity: Uuid },
    StopAudio { entity: Uuid },
    Log { entity: Uuid, message: String },
}

type CommandSink = Rc<RefCell<Vec<ScriptCommand>>>;

/// The handle scripts receive; every method queues a command.
#[derive(Clone)]
pub struct ScriptEntity {
    uuid: Uuid,
    sink: CommandSink,
}

impl ScriptEntity {
    fn push(&self, command: ScriptCommand) {
        self.sink.borrow_mut().push(command);
    }

    fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.push(ScriptCommand::Translate {
            entity: self.uuid,
            delta: Vec3::new(x as f32, y as f32, z as f32),
        });
    }

    fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.push(ScriptCommand::SetPosition {
            entity: self.uuid,
            position: Vec3::new(x as f32, y as f32, z as f32),
        });
    }

    fn rotate(&mut self, x: f64, y: f64, z: f64) {
        self.push(ScriptCommand::Rotate {
            entity: self.uuid,
            delta: Vec3::new(x as f32, y as f32, z as f32),
        });
    }

    fn play_audio(&mut self) {
        self.push(ScriptCommand::PlayAudio { entity: self.uuid });
    }

    fn stop_audio(&mut self) {
        self.push(ScriptCommand::StopAudio { entity: self.uuid });
    }

    fn log(&mut self, message: &str) {
        self.push(ScriptCommand::Log {
            entity: self.uuid,
            message: message.to_string(),
        });
    }
}

/// The scripting subsystem: one engine, shared by all script runtimes.
pub struct ScriptingComponent {
    engine: Engine,
    sink: CommandSink,
}

impl ScriptingComponent {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.set_fast_operators(true);
        engine.on_print(|message| log::info!("script: {}", message));
        engine
            .register_type_with_name::<ScriptEntity>("Entity")
            .register_fn("translate", ScriptEntity::translate)
            .register_fn("set_position", ScriptEntity::set_position)
            .register_fn("rotate", ScriptEntity::rotate)
            .register_fn("play_audio", ScriptEntity::play_audio)
            .register_fn("stop_audio", ScriptEntity::stop_audio)
            .register_fn("log", ScriptEntity::log);
        Self {
            engine,
            sink: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn update(
        &mut self,
        scene: &mut SceneRuntime,
        caches: &mut AssetCaches,
        time: &Time,
    ) -> Result<(), ComponentError> {
        self.sink.borrow_mut().clear();
        let dt = time.delta() as f64;
        let mut first_fault: Option<String> = None;

        let script_refs: Vec<(Uuid, Uuid)> = scene
            .entities()
            .filter_map(|entity| entity.script().map(|script| (entity.uuid(), script)))
            .collect();

        for (entity_uuid, script_uuid) in script_refs {
            let Some(script) = caches.scripts.get_mut_by_uuid(script_uuid) else {
                continue;
            };
            if script.shared().load_error() {
                continue;
            }

            if !script.has_ast() {
                match self.engine.compile(script.source()) {
                    Ok(ast) => script.set_ast(ast),
                    Err(e) => {
                        let message = format!("compile: {}", e);
                        script.shared_mut().mark_failed(message.clone());
                        record_fault(&mut first_fault, &message);
                        continue;
                    }
                }
            }

            let api = ScriptEntity {
                uuid: entity_uuid,
                sink: self.sink.clone(),
            };

            if !script.is_initialized(entity_uuid) {
                let outcome = {
                    let Some(ast) = script.ast() else { continue };
                    self.engine
                        .call_fn::<()>(&mut Scope::new(), ast, "on_init", (api.clone(),))
                };
                match outcome {
                    Ok(()) => script.mark_initialized(entity_uuid),
                    Err(e) if is_function_missing(&e) => script.mark_initialized(entity_uuid),
                    Err(e) => {
                        record_fault(
                            &mut first_fault,
                            &format!("on_init ({}): {}", format_uuid(entity_uuid), e),
                        );
                        continue;
                    }
                }
            }

            let outcome = {
                let Some(ast) = script.ast() else { continue };
                self.engine
                    .call_fn::<()>(&mut Scope::new(), ast, "on_update", (api, dt))
            };
            match outcome {
                Ok(()) => {}
                Err(e) if is_function_missing(&e) => {}
                Err(e) => record_fault(
                    &mut first_fault,
                    &format!("on_update ({}): {}", format_uuid(entity_uuid), e),
                ),
            }
        }

        let commands: Vec<ScriptCommand> = self.sink.borrow_mut().drain(..).collect();
        apply_commands(scene, caches, commands);

        match first_fault {
            Some(message) => Err(ComponentError::new(message)),
            None => Ok(()),
        }
    }
}

impl Default for ScriptingComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn is_function_missing(error: &EvalAltResult) -> bool {
    matches!(error, EvalAltResult::ErrorFunctionNotFound(..))
}

fn record_fault(first_fault: &mut Option<String>, message: &str) {
    log::error!("scripting: {}", message);
    if first_fault.is_none() {
        *first_fault = Some(message.to_string());
    }
}

fn apply_commands(scene: &mut SceneRuntime, caches: &mut AssetCaches, commands: Vec<ScriptCommand>) {
    for command in commands {
        match command {
            ScriptCommand::Translate { entity, delta } => {
                if let Some(entity) = scene.entity_mut(entity) {
                    entity.transform.translate(delta);
                    entity.shift_base_position(delta);
                }
            }
            ScriptCommand::SetPosition { entity, position } => {
                if let Some(entity) = scene.entity_mut(entity) {
                    entity.transform.position = position;
                    entity.set_base_position(position);
                }
            }
            ScriptCommand::Rotate { entity, delta } => {
                if let Some(entity) = scene.entity_mut(entity) {
                    entity.transform.rotation += delta;
                }
            }
            ScriptCommand::PlayAudio { entity } => {
                if let Some(audio) = scene
                    .entity(entity)
                    .and_then(|e| e.audio())
                    .and_then(|uuid| caches.audio.get_mut_by_uuid(uuid))
                {
                    audio.mark_to_play();
                }
            }
            ScriptCommand::StopAudio { entity } => {
                if let Some(audio) = scene
                    .entity(entity)
                    .and_then(|e| e.audio())
                    .and_then(|uuid| caches.audio.get_mut_by_uuid(uuid))
                {
                    audio.mark_to_stop();
                }
            }
            ScriptCommand::Log { entity, message } => {
                log::info!("script[{}]: {}", format_uuid(entity), message);
            }
        }
    }
}
