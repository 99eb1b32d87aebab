use roa::Replay;
use std::fs::File;
use std::path::PathBuf;
use structopt::StructOpt;

/// Print out every token of every player's action stream, next to its classification.
#[derive(StructOpt)]
struct Cli {
    /// Path to the replay file.
    filename: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let Cli { filename } = Cli::from_args();

    let file = File::open(filename)?;
    let replay = Replay::read_from(file)?;
    for player in replay.players() {
        println!("{} ({})", player.name(), player.character());
        for (token, action) in player.tokens().zip(player.actions()) {
            let token = token?;
            println!(
                "  @{:<5} {:>6} {:<6} {:?}",
                token.offset,
                token.frame,
                token.code_str(),
                action.action_type
            );
        }
    }

    Ok(())
}
