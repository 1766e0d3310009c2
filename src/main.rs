//! Example game demonstrating engine features
//!
//! Loads a title scene from the JSON bundle under `assets/` and drives it
//! headlessly: entities drift under the movement system, sprites become
//! draw commands, and a simulated Escape press pops the scene.

use stagecraft::prelude::*;

/// Backend stand-in that just counts presented commands
struct HeadlessBackend {
    presented: usize,
}

impl RenderBackend for HeadlessBackend {
    fn present(&mut self, queue: &RenderQueue) {
        self.presented += queue.len();
    }
}

/// The demo's only scene
struct TitleScene {
    name: String,
}

impl TitleScene {
    fn build(loaded: LoadedScene) -> Box<dyn Scene> {
        let name = loaded
            .metadata
            .name
            .clone()
            .unwrap_or_else(|| String::from("untitled"));
        log::info!(
            "scene `{name}` loaded with {} entities",
            loaded.entities.len()
        );
        Box::new(Self { name })
    }
}

impl Scene for TitleScene {
    fn draw(&self, world: &World, queue: &mut RenderQueue) {
        for (_, (position, sprite)) in world.query::<(&Position, &Sprite)>().iter() {
            queue.submit(DrawCommand::new(
                sprite.texture.clone(),
                position.vec(),
                Vec2::new(sprite.w, sprite.h),
            ));
        }
    }

    fn update(&mut self, world: &mut World, _time: &Time) -> Transition {
        Movement.run(world);
        Transition::None
    }

    fn interact(&mut self, _world: &mut World, input: &Input) -> Transition {
        if input.just_pressed(Key::Escape) {
            log::info!("`{}` dismissed", self.name);
            return Transition::Pop;
        }
        Transition::None
    }
}

fn main() {
    env_logger::init();

    let mut registry = SchemaRegistry::new();
    registry.register_builtin();

    let mut driver = Driver::new(registry);
    driver.boot(PushRequest::new(
        "assets/scenes/title.json",
        TitleScene::build,
    ));

    let mut input = Input::new();
    let mut queue = RenderQueue::new();
    let mut backend = HeadlessBackend { presented: 0 };

    // Host frame loop; a windowed host would pump real events here.
    loop {
        let outcome = driver.frame(&input, &mut queue);
        backend.present(&queue);
        queue.clear();
        input.end_frame();

        if outcome == FrameOutcome::Exit {
            break;
        }
        if driver.time().frame_count() == 180 {
            input.press(Key::Escape);
        }
        std::thread::sleep(std::time::Duration::from_millis(16));
    }

    if let Some(error) = driver.take_load_error() {
        log::error!("{}", error.chain());
    }
    log::info!(
        "presented {} draw commands over {} frames",
        backend.presented,
        driver.time().frame_count()
    );
}
