use super::input::{ActionStates, InputAction};
use super::rendering::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// Input as seen by one simulation tick: which actions are held right now plus every discrete
/// press that arrived since the previous tick, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    pressed: Vec<InputAction>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(actions: ActionStates, pressed: Vec<InputAction>) -> Self {
        Self { actions, pressed }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn pressed_actions(&self) -> &[InputAction] {
        &self.pressed
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_pressed(mut self, action: InputAction) -> Self {
        self.pressed.push(action);
        self
    }

    /// Signed direction from the held movement actions, each component in {-1, 0, 1}.
    pub fn held_direction(&self) -> (i32, i32) {
        let axis = |negative: InputAction, positive: InputAction| {
            i32::from(self.is_down(positive)) - i32::from(self.is_down(negative))
        };
        (
            axis(InputAction::MoveLeft, InputAction::MoveRight),
            axis(InputAction::MoveUp, InputAction::MoveDown),
        )
    }
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&self, canvas: &mut Canvas<'_>);
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
}

pub(crate) struct SceneRuntime {
    scene: Box<dyn Scene>,
    is_loaded: bool,
}

impl SceneRuntime {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load();
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if !self.is_loaded {
            return SceneCommand::None;
        }
        self.scene.update(fixed_dt_seconds, input)
    }

    pub(crate) fn scene(&self) -> &dyn Scene {
        self.scene.as_ref()
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title()
    }

    pub(crate) fn shutdown(&mut self) {
        if self.is_loaded {
            self.scene.unload();
            self.is_loaded = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct Calls {
        loads: u32,
        updates: u32,
        unloads: u32,
    }

    struct RecordingScene {
        calls: Rc<RefCell<Calls>>,
    }

    impl Scene for RecordingScene {
        fn load(&mut self) {
            self.calls.borrow_mut().loads += 1;
        }

        fn update(&mut self, _fixed_dt_seconds: f32, _input: &InputSnapshot) -> SceneCommand {
            self.calls.borrow_mut().updates += 1;
            SceneCommand::None
        }

        fn render(&self, _canvas: &mut Canvas<'_>) {}

        fn unload(&mut self) {
            self.calls.borrow_mut().unloads += 1;
        }
    }

    fn runtime_with_calls() -> (SceneRuntime, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let scene = RecordingScene {
            calls: Rc::clone(&calls),
        };
        (SceneRuntime::new(Box::new(scene)), calls)
    }

    #[test]
    fn load_runs_once_and_shutdown_unloads_once() {
        let (mut runtime, calls) = runtime_with_calls();

        runtime.load();
        runtime.load();
        runtime.shutdown();
        runtime.shutdown();

        assert_eq!(calls.borrow().loads, 1);
        assert_eq!(calls.borrow().unloads, 1);
    }

    #[test]
    fn update_is_skipped_until_loaded() {
        let (mut runtime, calls) = runtime_with_calls();
        let input = InputSnapshot::empty();

        runtime.update(1.0 / 60.0, &input);
        runtime.load();
        runtime.update(1.0 / 60.0, &input);

        assert_eq!(calls.borrow().updates, 1);
    }

    #[test]
    fn held_direction_cancels_opposing_keys() {
        let input = InputSnapshot::empty()
            .with_action_down(InputAction::MoveLeft, true)
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::MoveDown, true);

        assert_eq!(input.held_direction(), (0, 1));
    }

    #[test]
    fn pressed_actions_keep_arrival_order() {
        let input = InputSnapshot::empty()
            .with_pressed(InputAction::MoveDown)
            .with_pressed(InputAction::Confirm);

        assert_eq!(
            input.pressed_actions(),
            &[InputAction::MoveDown, InputAction::Confirm]
        );
    }
}
