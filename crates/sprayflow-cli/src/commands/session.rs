use clap::{Args, Subcommand};
use sprayflow_core::format::format_clock;
use sprayflow_core::{
    Category, CategorySet, Event, MonotonicTime, SessionEngine, SessionPlan, SessionState,
    SessionStats, Settings,
};
use std::io::BufRead;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::output::TerminalOutput;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a session in the foreground.
    ///
    /// While running, type a letter and press Enter:
    /// p pause, r resume, s skip, q stop. An empty line toggles pause.
    Run(RunArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Seconds between cues (overrides settings for this run)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    interval: Option<u32>,
    /// Session length in minutes (overrides settings for this run)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    duration: Option<u32>,
    /// Read --duration as seconds instead of minutes
    #[arg(long, requires = "duration")]
    seconds: bool,
    /// Enabled category; repeat for several (overrides settings for this run)
    #[arg(long = "category", short = 'c')]
    categories: Vec<Category>,
    /// Speak each movement
    #[arg(long, conflicts_with = "no_voice")]
    voice: bool,
    /// Do not speak movements
    #[arg(long)]
    no_voice: bool,
    /// Ring the terminal bell on each cue
    #[arg(long, conflicts_with = "no_beep")]
    beep: bool,
    /// No bell
    #[arg(long)]
    no_beep: bool,
    /// Seed the movement picker for a repeatable sequence
    #[arg(long)]
    seed: Option<u64>,
    /// Print every event as a JSON line
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    /// Stored settings with this run's overrides applied. Not persisted.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(interval) = self.interval {
            settings.interval = interval;
        }
        if let Some(duration) = self.duration {
            settings.duration = duration;
        }
        if !self.categories.is_empty() {
            settings.enabled_categories = self.categories.iter().copied().collect();
        }
        if self.voice || self.no_voice {
            settings.use_voice = self.voice;
        }
        if self.beep || self.no_beep {
            settings.use_beep = self.beep;
        }
        settings
    }

    fn plan(&self, settings: &Settings) -> Result<SessionPlan, Box<dyn std::error::Error>> {
        let plan = if self.seconds {
            let categories: CategorySet = settings.enabled_categories.clone();
            SessionPlan::new(
                settings.interval as u64,
                settings.duration as u64,
                categories,
            )?
            .with_voice(settings.use_voice)
            .with_beep(settings.use_beep)
        } else {
            SessionPlan::from_settings(settings)?
        };
        Ok(plan)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Pause,
    Resume,
    Toggle,
    Skip,
    Stop,
    Help,
}

impl Intent {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" => Some(Intent::Toggle),
            "p" | "pause" => Some(Intent::Pause),
            "r" | "resume" => Some(Intent::Resume),
            "s" | "n" | "skip" | "next" => Some(Intent::Skip),
            "q" | "stop" | "quit" => Some(Intent::Stop),
            "?" | "h" | "help" => Some(Intent::Help),
            _ => None,
        }
    }
}

const HELP: &str = "p pause | r resume | s skip | q stop | <enter> pause/resume";

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run(args) => {
            let settings = args.apply(Settings::load_or_default());
            let plan = args.plan(&settings)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(drive(plan, args.seed, args.json))
        }
    }
}

async fn drive(
    mut plan: SessionPlan,
    seed: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = TerminalOutput::new();
    if plan.use_voice() && !output.has_speech() {
        tracing::warn!("no text-to-speech program found; voice prompts disabled");
        plan = plan.with_voice(false);
    }

    let time = MonotonicTime::new();
    let mut engine = match seed {
        Some(seed) => SessionEngine::with_seed(output, time, seed),
        None => SessionEngine::new(output, time),
    };
    let mut view = View::new(json);

    if !json {
        println!("{HELP}");
    }
    for event in engine.start_plan(plan)? {
        view.render(&event)?;
    }

    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;

    loop {
        let deadline = engine
            .next_deadline()
            .map(|offset| Instant::from_std(engine.time().instant_at(offset)));

        // Paused with nobody left to resume.
        if deadline.is_none() && !stdin_open {
            if let Some(event) = engine.stop() {
                view.render(&event)?;
            }
            break;
        }

        tokio::select! {
            _ = wait_until(deadline) => {
                for event in engine.tick() {
                    view.render(&event)?;
                }
            }
            line = lines.recv(), if stdin_open => {
                match line {
                    Some(line) => match Intent::parse(&line) {
                        Some(intent) => {
                            if let Some(event) = apply_intent(&mut engine, intent) {
                                view.render(&event)?;
                            }
                        }
                        None => eprintln!("unknown command '{}'; {HELP}", line.trim()),
                    },
                    None => stdin_open = false,
                }
            }
        }

        match engine.state() {
            SessionState::Completed => {
                engine.acknowledge_completion();
                break;
            }
            SessionState::Idle => break,
            SessionState::Running | SessionState::Paused => {}
        }
    }
    Ok(())
}

fn apply_intent(
    engine: &mut SessionEngine<TerminalOutput, MonotonicTime>,
    intent: Intent,
) -> Option<Event> {
    match intent {
        Intent::Pause => engine.pause(),
        Intent::Resume => engine.resume(),
        Intent::Toggle => engine.pause().or_else(|| engine.resume()),
        Intent::Skip => engine.skip(),
        Intent::Stop => engine.stop(),
        Intent::Help => {
            eprintln!("{HELP}");
            None
        }
    }
}

/// Forward stdin lines from a plain thread. A blocking read cannot be
/// cancelled, so the thread is left behind when the session ends and dies
/// with the process. The channel closes on EOF or a read error.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Renders events as text lines or JSON lines.
struct View {
    json: bool,
    remaining_secs: u64,
}

impl View {
    fn new(json: bool) -> Self {
        Self {
            json,
            remaining_secs: 0,
        }
    }

    fn render(&mut self, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
            return Ok(());
        }

        match event {
            Event::SessionStarted { duration_secs, interval_secs, .. } => {
                self.remaining_secs = *duration_secs;
                println!(
                    "Session started: {} total, a cue every {interval_secs}s",
                    format_clock(*duration_secs)
                );
            }
            Event::CueEmitted { movement, cue_number, skipped, .. } => {
                println!(
                    "[{}] #{cue_number:<3} {:<22} {}{}",
                    format_clock(self.remaining_secs),
                    movement.name,
                    movement.category.label(),
                    if *skipped { "  (skipped)" } else { "" }
                );
            }
            Event::CountdownTick { remaining_secs, .. } => {
                self.remaining_secs = *remaining_secs;
            }
            Event::SessionPaused { remaining_secs, .. } => {
                println!("Paused with {} left", format_clock(*remaining_secs));
            }
            Event::SessionResumed { remaining_secs, .. } => {
                println!("Resumed with {} left", format_clock(*remaining_secs));
            }
            Event::SessionStopped { stats, remaining_secs, .. } => {
                println!("Stopped with {} left", format_clock(*remaining_secs));
                print_summary(stats);
            }
            Event::SessionCompleted { stats, .. } => {
                println!("Session complete");
                print_summary(stats);
            }
            Event::SessionReset { .. } | Event::StateSnapshot { .. } => {}
        }
        Ok(())
    }
}

fn print_summary(stats: &SessionStats) {
    println!("{} cues", stats.total_cues);
    for share in stats.summary() {
        println!(
            "  {:<15} {:>4}  {:>5.1}%",
            share.label, share.count, share.percent
        );
    }
    if let Some(top) = stats.most_frequent_category() {
        println!("Most practiced: {}", top.label());
    }
}
