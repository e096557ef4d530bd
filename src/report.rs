use cutout::CutoutError;

pub fn report_error(err: &CutoutError) {
    match err {
        CutoutError::InvalidInput { field, reason } => {
            eprintln!("Invalid {field}: {reason}");
            eprintln!("The previous value is kept; re-run with a corrected value.");
        }
        CutoutError::OutOfBounds {
            x,
            y,
            width,
            height,
        } => {
            eprintln!("Point ({x}, {y}) lies outside the {width}x{height} image.");
            eprintln!("Coordinates are zero-based pixel positions in the input image.");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
