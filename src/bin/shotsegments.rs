use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use ffmpeg_next::util::log::Level as LogLevel;
use indicatif::{ProgressBar, ProgressStyle};
use shotsegments::{
    DEFAULT_MIN_DURATION, DEFAULT_THRESHOLD, FrameScore, ReportFormat, ReportOptions, ScanOptions,
    ScanProgress, SegmentReporter, VideoSource,
};

const CLI_AFTER_HELP: &str = "Examples:\n  shotsegments --in input.mp4\n  shotsegments --in input.mp4 --threshold 40 --min-duration 250 --ffmpeg > split.sh\n  shotsegments --in input.mp4 --save-images --image-dir shots --verbose=2\n  shotsegments --completions zsh > _shotsegments";

/// Frames between two trace lines at verbosity level 1.
const VERBOSE_INTERVAL: u64 = 1000;

#[derive(Debug, Parser)]
#[command(
    name = "shotsegments",
    version,
    about = "Detect shot boundaries in a video and list the segments between them",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input video file.
    #[arg(short = 'i', long = "in", value_name = "VIDEO")]
    input: Option<PathBuf>,

    /// Save the first and last frame of every segment as JPEG images.
    #[arg(short = 's', long)]
    save_images: bool,

    /// Directory saved images are written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    image_dir: PathBuf,

    /// Cut threshold (0 or unparsable selects the default of 50).
    #[arg(short = 't', long, value_name = "T", allow_hyphen_values = true)]
    threshold: Option<String>,

    /// Minimum segment length in frames (0 or unparsable selects the default of 1000).
    #[arg(short = 'm', long, value_name = "D", allow_hyphen_values = true)]
    min_duration: Option<String>,

    /// Print an ffmpeg extraction command per segment.
    #[arg(short = 'f', long)]
    ffmpeg: bool,

    /// Print segments as JSON (ignored with --ffmpeg).
    #[arg(long)]
    json: bool,

    /// Print frame scores: level 1 every 1000th frame, level 2 every frame.
    #[arg(
        short = 'v',
        long,
        value_name = "LEVEL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "1"
    )]
    verbose: Option<String>,

    /// Show a progress bar on stderr.
    #[arg(long)]
    progress: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Read a leading integer the way C's `atoi` does: optional whitespace and
/// sign, then digits up to the first non-digit. Anything unparsable is 0.
fn parse_leading_int(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |number| sign * number)
}

/// A positive numeric option, or `default` when absent, zero, negative or
/// unparsable.
fn positive_or_default(value: Option<&str>, default: u64) -> u64 {
    match value.map(parse_leading_int) {
        Some(number) if number > 0 => number as u64,
        _ => default,
    }
}

fn threshold_option(value: Option<&str>) -> u32 {
    let threshold = positive_or_default(value, u64::from(DEFAULT_THRESHOLD));
    u32::try_from(threshold).unwrap_or(u32::MAX)
}

fn verbose_level(value: Option<&str>) -> u32 {
    value
        .map(parse_leading_int)
        .map_or(0, |level| level.clamp(0, i64::from(u32::MAX)) as u32)
}

fn report_format(cli: &Cli) -> ReportFormat {
    if cli.ffmpeg {
        ReportFormat::Ffmpeg
    } else if cli.json {
        ReportFormat::Json
    } else {
        ReportFormat::Plain
    }
}

struct TerminalProgress {
    verbose: u32,
    bar: Option<ProgressBar>,
}

impl TerminalProgress {
    fn new(verbose: u32, bar: Option<ProgressBar>) -> Self {
        Self { verbose, bar }
    }
}

impl ScanProgress for TerminalProgress {
    fn on_frame(&self, frame: &FrameScore) {
        let trace = self.verbose > 1
            || (self.verbose == 1 && frame.frame_number % VERBOSE_INTERVAL == 0);
        if trace {
            let line = format!(
                "Frame={} Score={} Diff={}",
                frame.frame_number, frame.score, frame.delta
            );
            match &self.bar {
                Some(bar) => bar.suspend(|| println!("{line}")),
                None => println!("{line}"),
            }
        }

        if let Some(bar) = &self.bar {
            bar.set_position(frame.frame_number + 1);
        }
    }
}

fn progress_bar(frame_count: u64) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    if frame_count == 0 {
        return Ok(ProgressBar::new_spinner());
    }
    let bar = ProgressBar::new(frame_count);
    let style =
        ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
    bar.set_style(style.progress_chars("##-"));
    Ok(bar)
}

/// Exit status for a failed argument parse: help and version requests
/// succeed, every usage error exits with 1 like any other failure.
fn usage_exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() { 1 } else { 0 }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::args_os().len() < 2 {
        Cli::command().print_help()?;
        return Ok(());
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            error.print()?;
            match usage_exit_code(&error) {
                0 => return Ok(()),
                code => std::process::exit(code),
            }
        }
    };

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "shotsegments", &mut io::stdout());
        return Ok(());
    }

    let Some(input) = cli.input.as_deref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let threshold = threshold_option(cli.threshold.as_deref());
    let min_duration = positive_or_default(cli.min_duration.as_deref(), DEFAULT_MIN_DURATION);
    let verbose = verbose_level(cli.verbose.as_deref());

    if verbose < 2 {
        ffmpeg_next::util::log::set_level(LogLevel::Error);
    }

    let mut source = VideoSource::open(input)?;
    let frames_per_second = source.frames_per_second();
    if verbose > 0 {
        println!("FPS={frames_per_second}");
    }

    if cli.save_images {
        fs::create_dir_all(&cli.image_dir)?;
    }

    let bar = if cli.progress {
        Some(progress_bar(source.metadata().frame_count)?)
    } else {
        None
    };

    let mut options = ScanOptions::new()
        .with_threshold(threshold)
        .with_save_images(cli.save_images)
        .with_image_directory(&cli.image_dir);
    if verbose > 0 || bar.is_some() {
        options = options.with_progress(Arc::new(TerminalProgress::new(verbose, bar.clone())));
    }

    let scan = source.detect_boundaries(&options);
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }
    let boundaries = scan?;

    if boundaries.failed_image_writes > 0 {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!(
                "{} boundary image(s) could not be written to {}",
                boundaries.failed_image_writes,
                cli.image_dir.display()
            )
            .yellow()
        );
    }

    let report_options = ReportOptions::new()
        .with_min_duration(min_duration)
        .with_format(report_format(&cli));
    let reporter = SegmentReporter::new(input, frames_per_second, report_options);

    let mut stdout = io::stdout().lock();
    reporter.write_report(&mut stdout, &boundaries.markers)?;
    stdout.flush()?;

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_int_reads_like_atoi() {
        assert_eq!(parse_leading_int("42"), 42);
        assert_eq!(parse_leading_int("  17"), 17);
        assert_eq!(parse_leading_int("+8"), 8);
        assert_eq!(parse_leading_int("-5"), -5);
        assert_eq!(parse_leading_int("30fps"), 30);
        assert_eq!(parse_leading_int("abc"), 0);
        assert_eq!(parse_leading_int(""), 0);
        assert_eq!(parse_leading_int("99999999999999999999999"), 0);
    }

    #[test]
    fn zero_or_garbage_selects_default() {
        assert_eq!(threshold_option(None), DEFAULT_THRESHOLD);
        assert_eq!(threshold_option(Some("0")), DEFAULT_THRESHOLD);
        assert_eq!(threshold_option(Some("nope")), DEFAULT_THRESHOLD);
        assert_eq!(threshold_option(Some("-3")), DEFAULT_THRESHOLD);
        assert_eq!(threshold_option(Some("75")), 75);

        assert_eq!(positive_or_default(Some("0"), DEFAULT_MIN_DURATION), 1000);
        assert_eq!(positive_or_default(Some("250"), DEFAULT_MIN_DURATION), 250);
    }

    #[test]
    fn verbose_flag_forms() {
        let cli = Cli::try_parse_from(["shotsegments", "--in", "a.mp4", "--verbose"]).unwrap();
        assert_eq!(verbose_level(cli.verbose.as_deref()), 1);

        let cli = Cli::try_parse_from(["shotsegments", "--in", "a.mp4", "--verbose=2"]).unwrap();
        assert_eq!(verbose_level(cli.verbose.as_deref()), 2);

        let cli = Cli::try_parse_from(["shotsegments", "--in", "a.mp4"]).unwrap();
        assert_eq!(verbose_level(cli.verbose.as_deref()), 0);
    }

    #[test]
    fn ffmpeg_wins_over_json() {
        let cli =
            Cli::try_parse_from(["shotsegments", "-i", "a.mp4", "--json", "--ffmpeg"]).unwrap();
        assert_eq!(report_format(&cli), ReportFormat::Ffmpeg);

        let cli = Cli::try_parse_from(["shotsegments", "-i", "a.mp4", "--json"]).unwrap();
        assert_eq!(report_format(&cli), ReportFormat::Json);
    }

    #[test]
    fn usage_errors_exit_with_one() {
        let error = Cli::try_parse_from(["shotsegments", "--bogus"]).unwrap_err();
        assert_eq!(usage_exit_code(&error), 1);

        let error = Cli::try_parse_from(["shotsegments", "--in"]).unwrap_err();
        assert_eq!(usage_exit_code(&error), 1);

        let error = Cli::try_parse_from(["shotsegments", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&error), 0);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
