use cutout::{CutoutResult, PrintDimensions};

use crate::cli::{GlobalOptions, InfoCommand};

/// The main function to run the info command.
pub fn run(global: &GlobalOptions, cmd: InfoCommand) -> CutoutResult<()> {
    let image = image::open(&cmd.input)?;
    let (width, height) = (image.width(), image.height());
    let dimensions = PrintDimensions::new(width, height, global.dpi)?;

    println!("{}", cmd.input.display());
    println!("  Pixels: {}x{}", width, height);
    println!("  Color: {:?}", image.color());
    println!(
        "  Physical size at {} dpi: {} x {} in",
        global.dpi,
        dimensions.width_inches(),
        dimensions.height_inches()
    );

    Ok(())
}
