//! Interactive terminal front for the fragment cutter.
//!
//! Commands are read line-by-line from stdin on a reader thread and merged
//! with engine notifications, export outcomes, and the position ticker in a
//! single select loop, so every state mutation happens on this thread. The
//! export invocation itself runs on a worker thread and reports back over a
//! channel, keeping the tick loop live during multi-second encodes.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, select, unbounded};

use frag_cut_core::config::AppOptions;
use frag_cut_core::coordinator::{Coordinator, UiSnapshot};
use frag_cut_core::export::{self, ExportOutcome};
use frag_cut_core::media_types::{is_video_extension, normalize_path_input};
use frag_cut_core::player::{self, MediaSession, PlayerEvent};

enum Command {
    Open(PathBuf),
    Play,
    Stop,
    Seek(u64),
    Start,
    End,
    Loop,
    Export,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };
    match word {
        "open" | "o" => match normalize_path_input(rest) {
            Some(path) => Ok(Command::Open(path)),
            None => Err("usage: open <path>".to_string()),
        },
        "play" | "p" => Ok(Command::Play),
        "stop" => Ok(Command::Stop),
        "seek" => rest
            .parse::<u64>()
            .map(Command::Seek)
            .map_err(|_| "usage: seek <0-1000>".to_string()),
        "start" | "s" => Ok(Command::Start),
        "end" | "e" => Ok(Command::End),
        "loop" | "l" => Ok(Command::Loop),
        "export" | "x" => Ok(Command::Export),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command: {} (try help)", other)),
    }
}

fn print_help() {
    println!(
        "commands:\n  \
         open <path>   load a video (quotes and whitespace are stripped)\n  \
         play          toggle play/pause\n  \
         stop          stop and rewind\n  \
         seek <step>   jump to a timeline step (0-1000)\n  \
         start         mark fragment start at the current position\n  \
         end           mark fragment end at the current position\n  \
         loop          toggle fragment loop preview\n  \
         export        cut the fragment losslessly next to the source\n  \
         quit          exit"
    );
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

fn load_options() -> AppOptions {
    match std::env::var("FRAGCUT_OPTIONS") {
        Ok(path) => match AppOptions::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::warn!(target: "frag_cut::bin", "ignoring options file: {}", e);
                AppOptions::default()
            }
        },
        Err(_) => AppOptions::default(),
    }
}

fn open(coordinator: &mut Coordinator, path: &Path) {
    if !is_video_extension(path) {
        log::warn!(
            target: "frag_cut::bin",
            "{} has no recognized video extension, loading anyway",
            path.display()
        );
    }
    // The status line carries both the success and the failure message.
    let _ = coordinator.load(path);
}

fn render(snapshot: &UiSnapshot, last: &mut Option<UiSnapshot>) {
    if last.as_ref() == Some(snapshot) {
        return;
    }
    let transport = if snapshot.playing { ">" } else { "|" };
    let loop_marker = if snapshot.loop_enabled { " [loop]" } else { "" };
    print!(
        "\r\x1b[2K{} {} / {} ({:4}){}  {}",
        transport,
        snapshot.position_label,
        snapshot.duration_label,
        snapshot.slider,
        loop_marker,
        snapshot.status
    );
    let _ = io::stdout().flush();
    *last = Some(snapshot.clone());
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = load_options();

    let (player_tx, player_rx) = unbounded::<PlayerEvent>();
    let engine = match player::create_engine(player_tx) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("fatal: {}", e);
            return ExitCode::from(2);
        }
    };
    let mut coordinator = Coordinator::new(MediaSession::new(engine), &options);

    let (export_tx, export_rx) = unbounded::<ExportOutcome>();
    let commands = spawn_stdin_reader();
    let ticker = crossbeam_channel::tick(Duration::from_millis(
        options.effective_tick_interval_ms(),
    ));

    print_help();
    if let Some(arg) = std::env::args().nth(1) {
        if let Some(path) = normalize_path_input(&arg) {
            open(&mut coordinator, &path);
        }
    }

    let mut last_rendered: Option<UiSnapshot> = None;
    loop {
        select! {
            recv(ticker) -> _ => {
                let snapshot = coordinator.tick();
                render(&snapshot, &mut last_rendered);
            }
            recv(player_rx) -> event => {
                if let Ok(event) = event {
                    coordinator.handle_player_event(event);
                }
            }
            recv(export_rx) -> outcome => {
                if let Ok(outcome) = outcome {
                    coordinator.handle_export_outcome(&outcome);
                    render(&coordinator.snapshot(), &mut last_rendered);
                }
            }
            recv(commands) -> line => {
                let Ok(line) = line else {
                    break; // stdin closed
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Open(path)) => open(&mut coordinator, &path),
                    Ok(Command::Play) => coordinator.toggle_play(),
                    Ok(Command::Stop) => coordinator.stop(),
                    Ok(Command::Seek(step)) => coordinator.seek_slider(step),
                    Ok(Command::Start) => coordinator.set_selection_start(),
                    Ok(Command::End) => coordinator.set_selection_end(),
                    Ok(Command::Loop) => {
                        let _ = coordinator.toggle_fragment_loop();
                    }
                    Ok(Command::Export) => {
                        if let Ok(request) = coordinator.begin_export() {
                            export::spawn_export(request, export_tx.clone());
                        }
                    }
                    Ok(Command::Help) => {
                        println!();
                        print_help();
                    }
                    Ok(Command::Quit) => break,
                    Err(usage) => {
                        println!("\n{}", usage);
                    }
                }
                render(&coordinator.snapshot(), &mut last_rendered);
            }
        }
    }

    println!();
    ExitCode::SUCCESS
}
