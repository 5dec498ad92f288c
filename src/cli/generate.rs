//! Generate command implementation.

use super::{resolve_seed, CliError, MatchArgs};
use hexreign::game::{generate, kingdom_income};
use hexreign::persistence;
use std::path::PathBuf;

/// Execute the generate command.
///
/// Writes the starting position as a save file, or prints it when no
/// output path is given.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, generation fails, or
/// the file cannot be written.
pub(crate) fn execute(
    args: &MatchArgs,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = args.resolve()?;
    let seed = resolve_seed(seed);
    let state = generate(config.build_players(), &config.map, config.rules, seed)?;

    match output {
        Some(path) => {
            persistence::save(&state, &path)?;
            println!("Seed {seed}: {} tiles, {} kingdoms", state.total_land(), state.kingdom_count());
            for player in &state.players {
                let income: i32 = state
                    .kingdoms_of(player.id)
                    .map(|k| kingdom_income(&state, k.id))
                    .sum();
                println!(
                    "  Player {} ({}): {} kingdoms, income {income}",
                    player.id,
                    player.name,
                    state.kingdoms_of(player.id).count()
                );
            }
            println!("Saved to: {}", path.display());
        }
        None => println!("{}", persistence::to_json(&state)?),
    }
    Ok(())
}
