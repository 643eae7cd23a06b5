use std::io::Write;

use pomoloop_core::display::{cycle_preview, phase_label, status_line, window_title};
use pomoloop_core::time::format_time;
use pomoloop_core::{Settings, StoreSnapshot, TimerStore};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::open_store;

const HELP: &str = "commands: s start, p pause, k skip, r reset, q quit";

pub fn status(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(settings)?;
    let snapshot = store.snapshot();
    let json = serde_json::json!({
        "timer": snapshot.timer,
        "title": window_title(&snapshot.timer),
        "sections": snapshot.config.sections.len(),
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

pub fn preview(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(settings)?;
    let config = store.config();
    let total = config.sections.len();
    for step in cycle_preview(&config) {
        println!(
            "{:>2}/{total}  {:<10}  {}",
            step.section_index + 1,
            phase_label(step.phase),
            format_time(step.duration_sec),
        );
    }
    let loop_sec = u32::try_from(config.loop_duration_sec()).unwrap_or(u32::MAX);
    println!("loop total: {}", format_time(loop_sec));
    Ok(())
}

/// Run the timer on a single-threaded runtime until `q` or Ctrl-C.
pub fn run_live(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(settings)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(live(store))
}

fn render(snapshot: &StoreSnapshot) {
    let line = status_line(&snapshot.timer, snapshot.config.sections.len());
    let mut out = std::io::stdout().lock();
    // \r + clear line keeps a single updating row
    let _ = write!(out, "\r\x1b[2K{line}");
    let _ = out.flush();
}

async fn live(store: TimerStore) -> Result<(), Box<dyn std::error::Error>> {
    let mut updates = store.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    eprintln!("{HELP}");
    store.start();
    render(&updates.borrow_and_update());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&updates.borrow_and_update());
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    None => stdin_open = false,
                    Some(cmd) => match cmd.trim() {
                        "s" => store.start(),
                        "p" => store.pause(),
                        "k" => store.skip(),
                        "r" => store.reset(),
                        "q" => break,
                        "" => {}
                        other => eprintln!("\nunknown command '{other}'; {HELP}"),
                    },
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    store.pause();
    println!();
    Ok(())
}
