use std::path::{Path, PathBuf};

use cutout::{Cutout, ExportOptions, RemovalOptions, ReprocessOutcome};

use crate::cli::{GlobalOptions, RemovalArgs};

/// The convenience function to build a Cutout with the input global and
/// removal options.
pub fn build_cutout(global: &GlobalOptions, removal_args: &RemovalArgs, export: ExportOptions) -> Cutout {
    let removal: RemovalOptions = removal_args.into();
    Cutout::new()
        .with_dpi(global.dpi)
        .with_removal(removal)
        .with_export(export)
}

/// Print the fallback warning carried by a reprocess outcome, if any.
pub fn report_outcome(outcome: &ReprocessOutcome) {
    match outcome {
        ReprocessOutcome::Completed {
            fallback_warning: Some(warning),
        } => eprintln!("warning: {warning}"),
        ReprocessOutcome::Completed { .. } => {}
        ReprocessOutcome::Dropped => eprintln!("warning: reprocess request dropped"),
    }
}

/// Derive a variant file path by appending a suffix before the extension.
pub fn derive_variant_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut derived = input.to_path_buf();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| suffix.to_string());
    let filename = format!("{}-{}.{}", stem, suffix, extension);
    derived.set_file_name(filename);
    derived
}
