use cutout::{CutoutResult, ExportOptions, RemovalMethod};

use crate::cli::{CutCommand, FormatArg, GlobalOptions, MethodArg};

use super::utils::{build_cutout, derive_variant_path, report_outcome};

/// The main function to run the cut command.
pub fn run(global: &GlobalOptions, cmd: CutCommand) -> CutoutResult<()> {
    let export = ExportOptions::default()
        .with_jpeg_quality(cmd.quality)
        .with_tiff_compression(cmd.compression.into());
    let cutout = build_cutout(global, &cmd.removal, export);
    if cmd.removal.remove_background
        && matches!(cmd.removal.method, MethodArg::Ai)
        && !cutout.backend_available()
    {
        eprintln!("warning: no AI backend is built in; threshold removal will be used");
    }

    let mut session = cutout.for_image(&cmd.input)?;
    if let Some(warning) = session.fallback_warning() {
        eprintln!("warning: {warning}");
    }
    if cmd.no_lock_aspect {
        session.set_lock_aspect(false);
    }

    if let Some(scale) = cmd.scale {
        report_outcome(&session.set_scale(scale)?);
    }
    if let Some(width) = cmd.width_inches {
        report_outcome(&session.set_width_inches(width)?);
    }
    if let Some(height) = cmd.height_inches {
        report_outcome(&session.set_height_inches(height)?);
    }

    let (source_width, source_height) = session.dimensions().original_size();
    println!("Source: {}x{}px", source_width, source_height);
    if session.removal().enabled {
        match session.removal().method {
            RemovalMethod::Threshold => println!(
                "Background removal: threshold (cutoff {})",
                session.removal().threshold
            ),
            RemovalMethod::Ai => println!("Background removal: ai"),
        }
    }

    let (target_width, target_height) = session.dimensions().target_pixels();
    println!(
        "Output size: {}x{}px ({} x {} in at {} dpi)",
        target_width,
        target_height,
        session.dimensions().width_inches(),
        session.dimensions().height_inches(),
        session.dimensions().dpi()
    );

    let single_output = matches!(cmd.format, FormatArg::Jpeg | FormatArg::Tiff);
    for &format in cmd.format.formats() {
        let path = match (&cmd.output, single_output) {
            (Some(path), true) => path.clone(),
            _ => derive_variant_path(&cmd.input, "processed", format.extension()),
        };
        session.export_to(&path, format)?;
        println!("{} saved to {}", format.extension().to_uppercase(), path.display());
    }

    Ok(())
}
