use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use drill_core::model::{CheckState, LevelId, Problem, UserAnswer};
use services::{PracticeConfig, PracticeLoopService, PracticeProgress};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLevel { raw: String },
    MissingLevel { command: &'static str },
    InvalidLogFilter { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevel { raw } => {
                write!(f, "invalid --level value: {raw} (expected 1-6)")
            }
            ArgsError::MissingLevel { command } => write!(f, "{command} requires --level"),
            ArgsError::InvalidLogFilter { raw } => write!(f, "invalid log filter: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_level(raw: String) -> Result<LevelId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidLevel { raw })
}

struct DesktopApp {
    initial_level: Option<LevelId>,
    config: PracticeConfig,
    practice_loop: Arc<PracticeLoopService>,
}

impl UiApp for DesktopApp {
    fn initial_level(&self) -> Option<LevelId> {
        self.initial_level
    }

    fn config(&self) -> PracticeConfig {
        self.config
    }

    fn practice_loop(&self) -> Arc<PracticeLoopService> {
        Arc::clone(&self.practice_loop)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--level <1-6>] [--log <filter>]");
    eprintln!("  cargo run -p app -- print  --level <1-6>  [--json] [--log <filter>]");
    eprintln!("  cargo run -p app -- quiz   --level <1-6>  [--log <filter>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  ui opens the level grid; --log info");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FRACTIONS_LEVEL, FRACTIONS_LOG (then RUST_LOG)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Print,
    Quiz,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "print" => Some(Self::Print),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Ui => "ui",
            Self::Print => "print",
            Self::Quiz => "quiz",
        }
    }
}

/// Values read from the environment before parsing flags.
#[derive(Debug, Default)]
struct EnvDefaults {
    level: Option<String>,
    log: Option<String>,
}

impl EnvDefaults {
    fn from_env() -> Self {
        Self {
            level: std::env::var("FRACTIONS_LEVEL").ok(),
            log: std::env::var("FRACTIONS_LOG")
                .ok()
                .or_else(|| std::env::var("RUST_LOG").ok()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    level: Option<LevelId>,
    log: Option<String>,
    json: bool,
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
        env: EnvDefaults,
    ) -> Result<Self, ArgsError> {
        let mut level = env.level.map(parse_level).transpose()?;
        let mut log = env.log;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--level" => {
                    let value = require_value(args, "--level")?;
                    level = Some(parse_level(value)?);
                }
                "--log" => log = Some(require_value(args, "--log")?),
                "--json" if cmd == Command::Print => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if level.is_none() && cmd != Command::Ui {
            return Err(ArgsError::MissingLevel {
                command: cmd.name(),
            });
        }

        Ok(Self { level, log, json })
    }
}

fn init_tracing(filter: Option<&str>) -> Result<(), ArgsError> {
    let raw = filter.unwrap_or("info");
    let filter = EnvFilter::try_new(raw).map_err(|_| ArgsError::InvalidLogFilter {
        raw: raw.to_string(),
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn format_batch(problems: &[Problem]) -> String {
    problems
        .iter()
        .enumerate()
        .map(|(i, problem)| {
            format!("{}. {}  =>  {}\n", i + 1, problem.expression(), problem.answer())
        })
        .collect()
}

/// Terminal drill: one answer line per problem, then the score.
fn run_quiz(
    practice_loop: &PracticeLoopService,
    level: LevelId,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<PracticeProgress, Box<dyn std::error::Error>> {
    let mut session = practice_loop.start(level)?;
    writeln!(out, "{}", level.info().title)?;

    for index in 0..session.len() {
        let expression = session.problems()[index].expression().to_string();
        write!(out, "第 {} 題  {expression}\n> ", index + 1)?;
        out.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let answer = line.parse::<UserAnswer>().unwrap_or_default();
        session.set_answer(index, answer)?;
    }

    let progress = session.check_all();
    for item in session.items() {
        match item.check {
            CheckState::Correct => writeln!(out, "第 {} 題 ✔", item.index + 1)?,
            _ => writeln!(
                out,
                "第 {} 題 ✘  正確答案: {}",
                item.index + 1,
                item.problem.answer()
            )?,
        }
    }
    writeln!(out, "答對 {} / {} 題", progress.correct, progress.total)?;
    Ok(progress)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter, EnvDefaults::from_env()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing(parsed.log.as_deref())?;

    let practice_loop = Arc::new(PracticeLoopService::new());

    match cmd {
        Command::Ui => {
            info!(level = ?parsed.level, "launching desktop ui");
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                initial_level: parsed.level,
                config: PracticeConfig::default(),
                practice_loop,
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("分數練習達人")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Print => {
            let level = parsed.level.ok_or(ArgsError::MissingLevel { command: "print" })?;
            let session = practice_loop.start(level)?;
            if parsed.json {
                println!("{}", serde_json::to_string_pretty(session.problems())?);
            } else {
                print!("{}", format_batch(session.problems()));
            }
            Ok(())
        }
        Command::Quiz => {
            let level = parsed.level.ok_or(ArgsError::MissingLevel { command: "quiz" })?;
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            run_quiz(&practice_loop, level, &mut stdin.lock(), &mut stdout.lock())?;
            Ok(())
        }
    }
}

// No async runtime here: the desktop launcher starts its own.
fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
