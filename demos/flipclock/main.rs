use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, Program};
use clap::Parser;
use crossterm::event::{KeyCode, KeyModifiers};
use flipclock_widgets::prelude::*;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Flip clock countdown")]
struct Cli {
    /// Seconds to count down from now.
    #[arg(short, long, default_value_t = 90)]
    seconds: u64,

    /// Units to show, largest first, e.g. `h,m,s` or `s,ms`.
    #[arg(short, long, value_delimiter = ',')]
    units: Vec<UnitKind>,

    /// One label per unit.
    #[arg(short, long, value_delimiter = ',')]
    labels: Vec<String>,

    #[arg(long)]
    no_labels: bool,

    #[arg(long)]
    no_separators: bool,

    /// Tick interval in milliseconds.
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Flip duration in seconds.
    #[arg(long, default_value_t = 0.7)]
    flip_duration: f64,
}

static CLI: OnceLock<Cli> = OnceLock::new();

fn config(cli: &Cli) -> CountdownConfig {
    let mut config = CountdownConfig::from_now(Duration::from_secs(cli.seconds))
        .with_interval(Duration::from_millis(cli.interval_ms))
        .with_flip_duration(cli.flip_duration)
        .with_show_labels(!cli.no_labels)
        .with_show_separators(!cli.no_separators)
        .with_hide_on_complete(true);
    if !cli.units.is_empty() {
        config = config.with_units(cli.units.clone());
    }
    if !cli.labels.is_empty() {
        config = config.with_labels(cli.labels.clone());
    }
    config
}

struct App {
    clock: FlipClock,
    done: bool,
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let cli = CLI.get_or_init(Cli::parse);
        let clock = match flipclock_new(config(cli)) {
            Ok(clock) => clock,
            Err(err) => {
                eprintln!("invalid configuration: {err}");
                std::process::exit(2);
            }
        };
        let clock = clock.with_completed_view("Time's up!");
        let cmd = clock.init();
        (Self { clock, done: false }, Some(cmd))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            match key.key {
                KeyCode::Char('q') | KeyCode::Esc => return Some(quit()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Some(quit())
                }
                _ => {}
            }
        }
        if let Some(completed) = msg.downcast_ref::<FlipClockCompletedMsg>() {
            if completed.id == self.clock.id() {
                self.done = true;
            }
        }
        self.clock.update(msg)
    }

    fn view(&self) -> String {
        let help = Style::new()
            .foreground(lipgloss::Color::from("#626262"))
            .render(if self.done {
                "q: quit"
            } else {
                "l: labels • s: separators • q: quit"
            });
        format!("\n{}\n\n{}\n", self.clock.view(), help)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    CLI.get_or_init(Cli::parse);

    let program = Program::<App>::builder().alt_screen(true).build()?;
    program.run().await?;
    Ok(())
}
