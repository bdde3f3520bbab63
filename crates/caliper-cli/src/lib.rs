//! CLI logic for the Caliper annotation renderer.
//!
//! The CLI loads a scene file, runs one render pass over it and exports the
//! resulting overlay as SVG.

mod args;
mod config;
mod scene;

pub use args::Args;
pub use scene::{AnnotationSpec, Scene};

use std::fs;

use log::info;

use caliper::{CaliperError, Overlay};

/// Run the Caliper CLI application
///
/// Measurements of every annotation are logged at info level.
///
/// # Errors
///
/// Returns `CaliperError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed scenes
/// - Broken contour ownership
pub fn run(args: &Args) -> Result<(), CaliperError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing annotation scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;
    let scene = Scene::parse(&source)?;

    let mut overlay = Overlay::new(app_config)?;
    let (viewport_id, ids) = scene.populate(&mut overlay)?;
    let status = overlay.render(&viewport_id)?;
    info!(drawn = status.drawn, aborted = status.aborted; "Render pass finished");

    for id in &ids {
        let Some(annotation) = overlay.annotation(id) else {
            continue;
        };
        for value in annotation.metadata().measurement_values() {
            info!(
                annotation_id = id.as_str(),
                tool:% = annotation.kind(),
                name = value.name(),
                value:? = value.value(),
                unit = value.unit();
                "Measurement"
            );
        }
    }

    let svg = overlay.to_svg(&viewport_id)?;
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
