//! CUI player mode for running scripts
//!
//! Plays a script in the terminal: Enter advances, a number picks a choice
//! and `q` quits.

use crate::{
    cli::media::ConsoleMediaBackend,
    config::PlayerConfig,
    resolve::BasicResolver,
    runtime::Interpreter,
    types::{
        output::{Progress, RenderSnapshot},
        script::ScriptDocument,
        state::Termination,
    },
};
use std::io::{self, BufRead, Write};

/// Run the player mode on stdin/stdout
pub fn run_play(script: ScriptDocument, config: &PlayerConfig) -> anyhow::Result<Termination> {
    let backend = ConsoleMediaBackend::new(Box::new(BasicResolver::new(&config.asset_root)));
    let mut interpreter = Interpreter::new(script, backend);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    play_session(&mut interpreter, &mut input, &mut output, config.debug)
}

/// Drive `interpreter` with lines from `input` until the script ends
///
/// End of input counts as quitting.
pub fn play_session<R: BufRead, W: Write>(
    interpreter: &mut Interpreter<ConsoleMediaBackend>,
    input: &mut R,
    out: &mut W,
    debug: bool,
) -> anyhow::Result<Termination> {
    writeln!(out, "=== shiori Event Player ===")?;
    writeln!(out)?;
    writeln!(out, "Controls:")?;
    writeln!(out, "  Enter: next")?;
    writeln!(out, "  1-9:   select choice")?;
    writeln!(out, "  q:     quit")?;
    writeln!(out)?;

    let progress = interpreter.start()?;
    report(interpreter, &progress, out)?;

    while !interpreter.is_terminated() {
        if let Some(snapshot) = interpreter.snapshot() {
            show_snapshot(&snapshot, out)?;
        }
        if debug {
            show_debug_info(interpreter, out)?;
        }

        let waiting_choice = interpreter.state().is_waiting_for_choice();
        let prompt = if waiting_choice { "Select (1-9):" } else { ">" };
        let Some(line) = get_input(input, out, prompt)? else {
            interpreter.cancel()?;
            break;
        };

        let result = match line.as_str() {
            "q" => interpreter.cancel(),
            "" if !waiting_choice => interpreter.advance(),
            choice if waiting_choice => match choice.parse::<usize>() {
                Ok(n) if (1..=9).contains(&n) => interpreter.select_choice_index(n - 1),
                _ => {
                    writeln!(out, "Invalid choice. Enter 1-9.")?;
                    continue;
                }
            },
            _ => {
                writeln!(out, "Press Enter to continue, or 'q' to quit.")?;
                continue;
            }
        };

        match result {
            Ok(progress) => report(interpreter, &progress, out)?,
            Err(err) => writeln!(out, "{err}")?,
        }
    }

    let termination = interpreter.termination().unwrap_or(Termination::Cancelled);
    writeln!(out)?;
    match termination {
        Termination::Completed => writeln!(out, "== THE END ==")?,
        Termination::Cancelled => writeln!(out, "Goodbye!")?,
        Termination::ScriptError => writeln!(out, "== STOPPED: script error ==")?,
    }
    Ok(termination)
}

/// Print media changes and diagnostics produced by the last signal
fn report<W: Write>(
    interpreter: &mut Interpreter<ConsoleMediaBackend>,
    progress: &Progress,
    out: &mut W,
) -> io::Result<()> {
    for message in interpreter.backend_mut().drain_messages() {
        writeln!(out, "{message}")?;
    }
    for diagnostic in &progress.diagnostics {
        writeln!(out, "[!] {diagnostic}")?;
    }
    Ok(())
}

fn show_snapshot<W: Write>(snapshot: &RenderSnapshot, out: &mut W) -> io::Result<()> {
    if snapshot.has_choices() {
        writeln!(out, "--- Choice ---")?;
        if let Some(prompt) = snapshot.prompt.as_deref().filter(|p| !p.is_empty()) {
            writeln!(out, "{prompt}")?;
        }
        for (i, choice) in snapshot.choices.iter().flatten().enumerate() {
            writeln!(out, "{}. {}", i + 1, choice.text)?;
        }
    } else {
        writeln!(out, "{}:", snapshot.speaker)?;
        writeln!(out, "{}", snapshot.line)?;
    }
    writeln!(out)
}

/// Display debug information (only when --debug is set)
fn show_debug_info<W: Write>(
    interpreter: &Interpreter<ConsoleMediaBackend>,
    out: &mut W,
) -> io::Result<()> {
    let state =
        serde_json::to_string(interpreter.state()).unwrap_or_else(|_| "{}".to_string());
    let assets = interpreter.assets();

    writeln!(out, "[debug]")?;
    writeln!(out, "state={state}")?;
    if let Some(node) = interpreter
        .state()
        .event_key()
        .and_then(|key| interpreter.script().get(key))
    {
        writeln!(out, "kind={}", node.kind_name())?;
    }
    writeln!(
        out,
        "background={} left={} right={}",
        assets.bound_background().unwrap_or("-"),
        assets.bound_left().unwrap_or("-"),
        assets.bound_right().unwrap_or("-"),
    )?;
    match assets.bound_audio() {
        Some(audio) => writeln!(out, "bgm={} loop={}", audio.path, audio.looped)?,
        None => writeln!(out, "bgm=-")?,
    }
    writeln!(out)
}

/// Read one trimmed line; `None` at end of input
fn get_input<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(out, "{prompt} ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
