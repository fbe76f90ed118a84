use std::{fs::File, io::BufReader, path::PathBuf, time::Instant};

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use pose_reps::{
    ExerciseKind, ExerciseSession, MemoryStore, SessionStore, replay, tracker::Observation,
};

const USAGE: &str = "usage: pose-reps <squat|jumping-jack> <frames.jsonl> [username]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let exercise: ExerciseKind = args.next().ok_or_else(|| anyhow!(USAGE))?.parse()?;
    let path = PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?);
    let username = args.next().unwrap_or_else(|| "guest".to_string());

    let file = File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
    let frames = replay::read_frames(BufReader::new(file))
        .with_context(|| format!("failed to read pose log {}", path.display()))?;
    let Some(last) = frames.last() else {
        anyhow::bail!("{} contains no pose frames", path.display());
    };
    let end_offset = last.offset;

    println!("How to perform a {}:", exercise.display_name().to_lowercase());
    for (idx, step) in exercise.instructions().iter().enumerate() {
        println!("  {}. {step}", idx + 1);
    }

    let origin = Instant::now();
    let mut session = ExerciseSession::new(exercise);
    session.start_at(origin);

    let progress = create_progress_bar(frames.len() as u64)?;
    for timed in &frames {
        let now = origin + timed.offset;
        if let Some(outcome) = session.process_frame(&timed.frame) {
            if let Observation::Transitioned { from, to, counted } = outcome.observation {
                progress.println(format!(
                    "[{}] {from} -> {to}{}",
                    session.readout_at(now).elapsed_text(),
                    if counted { "" } else { " (not counted)" }
                ));
            }
        }
        progress.set_message(session.readout_at(now).display_text());
        progress.inc(1);
    }
    progress.finish_with_message(session.readout_at(origin + end_offset).display_text());

    let mut store = MemoryStore::signed_in(username);
    let finished = session
        .finalize_at(&mut store, origin + end_offset)
        .context("failed to save the replayed session")?;
    let user = store.user_data()?;

    println!(
        "{}: {} reps in {} (+{} points, {} now has {})",
        finished.summary.exercise.display_name(),
        finished.summary.reps,
        finished.summary.duration_text(),
        finished.points,
        user.username,
        user.total_points
    );

    Ok(())
}

fn create_progress_bar(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} frames {msg}",
    )?
    .progress_chars("=>-");
    pb.set_style(style);
    Ok(pb)
}
