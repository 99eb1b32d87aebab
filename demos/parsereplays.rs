//! Parses Rivals of Aether replays into text reports and per-player frame arrays.

use anyhow::Context;
use roa::{find_replays, read_replays, ActionTable, Replay, ReportMode};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

/// Parse Rivals of Aether replay files.
#[derive(Debug, StructOpt)]
#[structopt(name = "parsereplays")]
struct Cli {
    /// Replay files to parse.
    #[structopt(short = "f", long = "file", parse(from_os_str))]
    files: Vec<PathBuf>,

    /// Directories to parse all .roa files from.
    #[structopt(short = "d", long = "dir", parse(from_os_str))]
    dirs: Vec<PathBuf>,

    /// Write a text report for every replay to the output directory.
    #[structopt(short = "o", long = "text")]
    text: bool,

    /// Write every player's aggregated frames as a JSON array to the output directory.
    #[structopt(long = "json")]
    json: bool,

    /// Print text reports to the console.
    #[structopt(short = "p", long = "print")]
    print: bool,

    /// Print a table of action counts per player.
    #[structopt(short = "s", long = "summary")]
    summary: bool,

    /// What to write per action in text reports.
    ///
    /// One of "actions" or "vectors".
    #[structopt(long = "mode", default_value = "actions")]
    mode: ReportMode,

    /// Where text reports and JSON arrays are written.
    #[structopt(long = "output", default_value = "output", parse(from_os_str))]
    output: PathBuf,

    /// JSON file mapping action codes to action types, replacing the built-in table.
    #[structopt(long = "action-table", parse(from_os_str))]
    action_table: Option<PathBuf>,
}

fn init_logger() {
    let log_level = std::env::var("LOG")
        .ok()
        .and_then(|value| match value.as_str() {
            "info" => Some(LevelFilter::Info),
            "debug" => Some(LevelFilter::Debug),
            "trace" => Some(LevelFilter::Trace),
            _ => None,
        })
        .unwrap_or(LevelFilter::Warn);

    // only fails if a logger is already installed
    let _ = TermLogger::init(
        log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}

fn replay_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "replay".to_string())
}

/// Replace everything but letters, digits, `-` and `_`, so a player name stays one path component.
fn file_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_text(replay: &Replay, path: &Path, args: &Cli) -> anyhow::Result<()> {
    fs::create_dir_all(&args.output)?;
    let out_path = args.output.join(format!("{}_parsed.txt", replay_stem(path)));
    println!("\t{} =txt=> {}", path.display(), out_path.display());
    let mut out = BufWriter::new(File::create(&out_path)?);
    replay.write_report(&mut out, args.mode)?;
    out.flush()?;
    Ok(())
}

fn write_json(replay: &Replay, path: &Path, args: &Cli) -> anyhow::Result<()> {
    let dir = args.output.join(replay_stem(path));
    fs::create_dir_all(&dir)?;
    for (index, player) in replay.players().iter().enumerate() {
        let out_path = dir.join(format!("{}_{}.json", index, file_safe_name(player.name())));
        println!("\t{} =json=> {}", path.display(), out_path.display());
        let frames = player.frames().collect::<Vec<_>>();
        let out = BufWriter::new(File::create(&out_path)?);
        serde_json::to_writer(out, &frames)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::from_args();

    let table = match &args.action_table {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("could not open action table {}", path.display()))?;
            ActionTable::from_json_reader(io::BufReader::new(f))
                .with_context(|| format!("invalid action table {}", path.display()))?
        }
        None => ActionTable::default(),
    };

    let mut paths = args.files.clone();
    for dir in &args.dirs {
        println!("Parsing files from {}:", dir.display());
        paths.extend(
            find_replays(dir).with_context(|| format!("could not list {}", dir.display()))?,
        );
    }

    if paths.is_empty() {
        let mut app = Cli::clap();
        app.print_help()?;
        println!();
        return Ok(());
    }

    let mut parsed = 0;
    let mut failed = 0;
    for (path, result) in read_replays(paths, &table) {
        let replay = match result {
            Ok(replay) => replay,
            Err(err) => {
                eprintln!("\t{}: {}", path.display(), err);
                failed += 1;
                continue;
            }
        };
        parsed += 1;

        let outputs = || -> anyhow::Result<()> {
            if args.text {
                write_text(&replay, &path, &args)?;
            }
            if args.json {
                write_json(&replay, &path, &args)?;
            }
            if args.print {
                println!("{}", path.display());
                let stdout = io::stdout();
                replay.write_report(&mut stdout.lock(), args.mode)?;
            }
            if args.summary {
                println!("{} ({:.1}s)", path.display(), replay.duration().as_secs_f64());
                println!("{}", replay.summary_table());
            }
            Ok(())
        };
        if let Err(err) = outputs() {
            eprintln!("\t{}: {:#}", path.display(), err);
            failed += 1;
        }
    }

    println!("Program finished!");
    println!("Processed {} replays, {} failed.", parsed, failed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::file_safe_name;

    #[test]
    fn names_stay_inside_the_output_directory() {
        assert_eq!(file_safe_name("../../etc/passwd"), "______etc_passwd");
        assert_eq!(file_safe_name("a/b\\c"), "a_b_c");
        assert_eq!(file_safe_name("Matt"), "Matt");
        assert_eq!(file_safe_name("lazer zes"), "lazer_zes");
    }
}
