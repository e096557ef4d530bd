use cutout::{CutoutResult, FillOutcome, wand::flood_fill_transparent};

use crate::cli::WandCommand;

use super::utils::derive_variant_path;

/// The main function to run the wand command.
pub fn run(cmd: WandCommand) -> CutoutResult<()> {
    let mut image = image::open(&cmd.input)?.to_rgba8();

    match flood_fill_transparent(&mut image, cmd.x, cmd.y, cmd.tolerance)? {
        FillOutcome::Removed { pixels } => println!("Removed {pixels} pixels"),
        FillOutcome::AlreadyTransparent => println!("Area is already transparent"),
    }

    let output_path = cmd
        .output
        .unwrap_or_else(|| derive_variant_path(&cmd.input, "wand", "png"));
    image.save(&output_path)?;
    println!("PNG saved to {}", output_path.display());

    Ok(())
}
