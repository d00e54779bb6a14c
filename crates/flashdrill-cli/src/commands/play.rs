//! The `flashdrill play` command.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};

use flashdrill_adapters::config::load_config_from;
use flashdrill_adapters::{create_store, LogFeedback, TranscriptVoice};
use flashdrill_core::clock::SystemClock;
use flashdrill_core::engine::{GameEngine, Phase};
use flashdrill_core::events::{SessionEvent, SessionObserver};
use flashdrill_core::model::{GameMode, InputMethod, ProblemSet};
use flashdrill_core::report::{format_elapsed, GameResult};
use flashdrill_core::scoring::format_money;
use flashdrill_core::traits::VoiceInput;

pub struct PlayArgs {
    pub mode: Option<ProblemSet>,
    pub input: Option<InputMethod>,
    pub deck_size: Option<usize>,
    pub seed: Option<u64>,
    pub save_result: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Prints session events to stdout.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Started { mode, deck_len } => {
                println!("Starting {mode}: {deck_len} questions. h = hint, s = skip, q = quit");
            }
            SessionEvent::QuestionPresented {
                index,
                problem,
                options,
            } => {
                if options.is_empty() {
                    println!("\n#{} {} = ?", index + 1, problem.question());
                } else {
                    let choices: Vec<String> = options.iter().map(i64::to_string).collect();
                    println!(
                        "\n#{} {} = ?   [{}]",
                        index + 1,
                        problem.question(),
                        choices.join(" | ")
                    );
                }
            }
            SessionEvent::AnsweredCorrectly { reward, streak, .. } => {
                println!("Correct! +{} (streak {streak})", format_money(*reward));
            }
            SessionEvent::AnsweredIncorrectly { correct, .. } => {
                println!("Not quite. The answer is {correct}.");
            }
            SessionEvent::HintRevealed { prefix } => println!("Hint: {prefix}?"),
            SessionEvent::Skipped { .. } => println!("Skipped."),
            SessionEvent::Resurfaced { problem, .. } => {
                println!("Back in the deck: {}", problem.question());
            }
            SessionEvent::BalanceChanged { balance } => {
                tracing::debug!(balance = %format_money(*balance), "balance");
            }
            SessionEvent::Completed { new_high_score, .. } => {
                if *new_high_score {
                    println!("\nNew high score!");
                }
            }
            SessionEvent::Reset => println!("Session abandoned."),
            SessionEvent::AvatarChanged { .. } => {}
        }
    }
}

pub async fn execute(args: PlayArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let mode = GameMode::new(
        args.mode.unwrap_or(config.default_mode),
        args.input.unwrap_or(config.default_input),
    );

    let mut engine_config = config.engine_config(args.seed);
    if let Some(deck_size) = args.deck_size {
        engine_config.deck_size = deck_size;
    }

    let store = create_store(&config.store)?;
    let mut engine = GameEngine::new(
        engine_config,
        Arc::new(SystemClock::new()),
        store,
        Arc::new(LogFeedback),
    )?;
    engine.subscribe(Arc::new(ConsoleObserver));

    let profile = engine.profile();
    println!(
        "Hi {} the {}! Best balance so far: {}",
        profile.avatar.display_name,
        profile.avatar.character_kind,
        format_money(profile.high_balance)
    );

    let voice = TranscriptVoice::new(config.voice_timeout());
    let mut lines = spawn_stdin_reader();
    let mut heard: Option<oneshot::Receiver<i64>> = None;
    let mut input_closed = false;
    let mut ticker = tokio::time::interval(engine.config().tick_interval);

    engine.start(mode);

    while engine.is_running() {
        if mode.input == InputMethod::Voice && engine.phase() == Phase::Running && heard.is_none()
        {
            heard = listen(&voice);
        }

        tokio::select! {
            _ = ticker.tick() => engine.tick(),
            line = lines.recv(), if !input_closed => match line {
                Some(line) => {
                    if !handle_line(&mut engine, &voice, mode.input, line.trim()) {
                        engine.reset();
                        break;
                    }
                    // A typed transcript is final, so its number is already in the channel.
                    if let Some(n) = heard.as_mut().and_then(|rx| rx.try_recv().ok()) {
                        heard = None;
                        engine.submit_answer(n);
                    }
                }
                None => input_closed = true,
            },
            number = next_heard(&mut heard) => {
                heard = None;
                match number {
                    Ok(n) => {
                        engine.submit_answer(n);
                    }
                    Err(_) => {
                        if let Some(status) = voice.status_message() {
                            println!("({status})");
                        }
                        voice.clear();
                    }
                }
            }
        }

        // Nothing left to answer with once stdin is gone.
        if input_closed && engine.phase() == Phase::Running {
            tracing::info!("input closed; abandoning session");
            engine.reset();
            break;
        }
    }
    voice.stop_listening();

    let Some(result) = engine.result().cloned() else {
        return Ok(());
    };
    print_summary(&result);

    if let Some(path) = args.save_result {
        result
            .save_json(&path)
            .with_context(|| format!("failed to save result to {}", path.display()))?;
        println!("Result saved to {}", path.display());
    }

    Ok(())
}

/// Apply one line of input. Returns `false` when the player quits.
fn handle_line(
    engine: &mut GameEngine,
    voice: &TranscriptVoice,
    input: InputMethod,
    line: &str,
) -> bool {
    match line.to_lowercase().as_str() {
        "" => {}
        "q" | "quit" => return false,
        "h" | "hint" => {
            if engine.buy_hint().is_none() {
                println!("No hint available (needs $2.00 and a two-digit answer).");
            }
        }
        "s" | "skip" => {
            if !engine.skip_current_card() {
                println!("Skipping costs $2.00.");
            }
        }
        text => match input {
            InputMethod::Voice => voice.hear(text, true),
            InputMethod::Display => match text.parse::<i64>() {
                Ok(n) => {
                    engine.submit_answer(n);
                }
                Err(_) => println!("Type a number, h, s, or q."),
            },
        },
    }
    true
}

fn listen(voice: &TranscriptVoice) -> Option<oneshot::Receiver<i64>> {
    let (tx, rx) = oneshot::channel();
    match voice.start_listening(tx) {
        Ok(()) => Some(rx),
        Err(e) => {
            tracing::warn!("voice input unavailable: {e}");
            None
        }
    }
}

async fn next_heard(
    heard: &mut Option<oneshot::Receiver<i64>>,
) -> Result<i64, oneshot::error::RecvError> {
    match heard {
        Some(rx) => rx.await,
        None => std::future::pending().await,
    }
}

/// Forward stdin lines from a plain thread so a pending read never blocks shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_summary(result: &GameResult) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Mode",
        "Grade",
        "Accuracy",
        "Correct",
        "Balance",
        "Best streak",
        "Time",
    ]);
    table.add_row(vec![
        Cell::new(result.mode),
        Cell::new(format!(
            "{} ({})",
            result.grade,
            if result.passed { "pass" } else { "fail" }
        )),
        Cell::new(format!("{:.1}%", result.accuracy_percent)),
        Cell::new(format!("{}/{}", result.correct_count, result.questions_answered)),
        Cell::new(format_money(result.final_balance)),
        Cell::new(result.max_streak),
        Cell::new(format_elapsed(result.elapsed())),
    ]);

    println!("\n{table}");
}
