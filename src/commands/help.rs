//! Help command implementation for sunpredict.
//!
//! Shows command-specific help or general help based on the argument given.

use crate::constants::MAXIMUM_PREDICTION_DAYS;

/// Run the help command.
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) {
    match command {
        None => crate::args::display_help(),
        Some("predict") => display_predict_help(),
        Some("terrain") => display_terrain_help(),
        Some("help") => display_help_help(),
        Some(unknown) => {
            log_pipe!();
            log_warning!("Unknown help topic: {}", unknown);
            crate::args::display_help();
        }
    }
}

fn display_predict_help() {
    log_version!();
    log_block_start!("predict - Report sunrise, sunset and direct sunlight (default action)");
    log_block_start!("Usage: sunpredict [OPTIONS] [LATITUDE LONGITUDE ELEVATION]");
    log_block_start!("Location:");
    log_indented!("Coordinates on the command line override [location] in sunpredict.toml.");
    log_indented!("Negative values mean south and west: 35.1264 -106.6055 1600");
    log_block_start!("Days:");
    log_indented!("Each day runs from local midnight to local midnight in the display timezone.");
    log_indented!("--days predicts up to {MAXIMUM_PREDICTION_DAYS} consecutive days from --date.");
    log_block_start!("Examples:");
    log_indented!("# Today at a configured location");
    log_indented!("sunpredict");
    log_pipe!();
    log_indented!("# A week in Albuquerque with terrain, as JSON");
    log_indented!("sunpredict --date 2026-02-18 --days 7 --terrain ridge.json --json 35.1264 -106.6055 1600");
    log_end!();
}

fn display_terrain_help() {
    log_version!();
    log_block_start!("terrain - Terrain profile files");
    log_block_start!("Format:");
    log_indented!("{{ \"elevations\": {{ \"<azimuth>\": <angle>, ... }}, \"reference_elevation\": <m> }}");
    log_indented!("Azimuths are degrees clockwise from north, angles degrees above the horizon.");
    log_indented!("Between samples the silhouette is interpolated linearly around the circle.");
    log_block_start!("Configuration:");
    log_indented!("[prediction] include_terrain = true, terrain_file = \"terrain.json\"");
    log_indented!("[search] interpolation = \"legacy\" reproduces profiles from older releases");
    log_end!();
}

fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: sunpredict help [TOPIC]");
    log_block_start!("Topics:");
    log_indented!("predict  Computing visibility windows");
    log_indented!("terrain  Terrain profile files and options");
    log_end!();
}
