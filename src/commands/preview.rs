use cutout::{CutoutResult, ExportOptions};

use crate::cli::{GlobalOptions, PreviewCommand};

use super::utils::{build_cutout, derive_variant_path};

/// The main function to run the preview command.
pub fn run(global: &GlobalOptions, cmd: PreviewCommand) -> CutoutResult<()> {
    let cutout = build_cutout(global, &cmd.removal, ExportOptions::default());
    let session = cutout.for_image(&cmd.input)?;
    if let Some(warning) = session.fallback_warning() {
        eprintln!("warning: {warning}");
    }

    let projection = session.projection(cmd.viewport_width, cmd.viewport_height);
    let preview = session.preview(cmd.viewport_width, cmd.viewport_height);

    let output_path = cmd
        .output
        .unwrap_or_else(|| derive_variant_path(&cmd.input, "preview", "png"));
    preview.save(&output_path)?;
    println!(
        "Preview ({}x{} at {:.3}x) saved to {}",
        projection.display_width,
        projection.display_height,
        projection.scale,
        output_path.display()
    );

    Ok(())
}
