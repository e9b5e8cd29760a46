//! Headless frame player: steps through a directory of frame files against
//! the in-memory scene and logs what each frame builds.

use std::path::Path;

use molviz::options::Options;
use molviz::scene::MemoryScene;
use molviz::viz::{FrameController, Transition};

fn load_options(path: Option<String>) -> Result<Options, String> {
    match path {
        Some(p) => Options::load(Path::new(&p))
            .map_err(|e| format!("Failed to load options: {e}")),
        None => Ok(Options::default()),
    }
}

fn play(dir: &str, options: Options) -> Result<(), String> {
    let mut controller = FrameController::new(MemoryScene::new(), options);
    controller
        .set_directory(Path::new(dir))
        .map_err(|e| e.to_string())?;

    let index = controller.index();
    log::info!(
        "Playing frames {}..={} step {} from {}",
        index.start(),
        index.stop(),
        index.step(),
        index.dir().display()
    );

    let (start, stop) = (index.start(), index.stop());

    let mut failed = 0usize;
    let mut transition = controller.seek(start as i64);
    loop {
        match &transition {
            Transition::Loaded { index, species } => {
                log::info!(
                    "[{index}] {}: {species} species",
                    controller.current_file_name().unwrap_or_default()
                );
            }
            Transition::Failed { .. } => failed += 1,
            Transition::Hidden(_) => {}
            Transition::NoFrames | Transition::Unchanged(_) => break,
        }
        if controller.index().current() >= stop {
            break;
        }
        transition = controller.step_next();
    }

    let scene = controller.scene();
    log::info!(
        "Done: {} failed frames, {} objects and {} meshes in scene, {:?}",
        failed,
        scene.object_names().len(),
        scene.mesh_count(),
        scene.calls()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(dir) = args.next() else {
        log::error!("Usage: molviz <frame directory> [options.toml]");
        std::process::exit(1);
    };

    let result = load_options(args.next()).and_then(|opts| play(&dir, opts));
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
