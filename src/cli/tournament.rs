//! Tournament command implementation.

use super::output::{format_tournament_csv, format_tournament_text, JsonTournamentResult, TournamentStats};
use super::{resolve_seed, CliError, MatchArgs, TournamentFormat};
use hexreign::tournament::run_game;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub(crate) fn execute(
    args: &MatchArgs,
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = args.resolve()?;
    let names: Vec<String> = config.players.iter().map(|p| p.name.clone()).collect();

    // Surface setup errors once instead of per game.
    if let Some(seat) = config.players.iter().position(|p| p.intelligence.is_none()) {
        return Err(CliError::new(format!(
            "seat {seat} ({}) is not a bot",
            config.players[seat].name
        )));
    }

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("progress bar template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each worker folds into its own stats; the partials are merged at the end.
    let stats = (0..games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(&names),
            |mut local, i| {
                let game_seed = base_seed.wrapping_add(i);
                match run_game(game_seed, &config) {
                    Ok(result) => local.add_result(&result),
                    Err(e) => tracing::warn!(seed = game_seed, error = %e, "tournament.game_failed"),
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local
            },
        )
        .reduce(
            || TournamentStats::new(&names),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats));
            println!();
            println!("Base seed: {base_seed}");
            println!("Duration: {:.2}s ({games_per_sec:.0} games/sec)", duration.as_secs_f64());
        }
        TournamentFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonTournamentResult::from_stats(&stats))?;
            println!("{json}");
        }
        TournamentFormat::Csv => print!("{}", format_tournament_csv(&stats)),
    }

    Ok(())
}
