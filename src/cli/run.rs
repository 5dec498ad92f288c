//! Run command implementation.

use super::output::{format_text, JsonGameResult};
use super::{resolve_seed, CliError, MatchArgs, OutputFormat};
use hexreign::persistence;
use hexreign::tournament::play_match;
use std::path::PathBuf;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the match cannot be set up or the save fails.
pub(crate) fn execute(
    args: &MatchArgs,
    seed: Option<u64>,
    format: OutputFormat,
    save: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = args.resolve()?;
    let seed = resolve_seed(seed);

    if !quiet && format == OutputFormat::Text {
        let names: Vec<&str> = config.players.iter().map(|p| p.name.as_str()).collect();
        println!("Running game with seed {seed}...");
        println!("Players: {}", names.join(", "));
        println!();
    }

    let (result, state) = play_match(seed, &config)?;

    if let Some(save_path) = save {
        persistence::save(&state, &save_path)?;
        if !quiet && format == OutputFormat::Text {
            println!("Final state saved to: {}", save_path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonGameResult::from_game_result(&result))?;
            println!("{json}");
        }
    }

    Ok(())
}
