use std::thread;

use crossbeam_channel::{Receiver, Sender, never, select};

use crate::{
    error::SessionError,
    persistence::SessionStore,
    session::{ExerciseSession, FinishedSession},
    tracker::Observation,
    types::{Label, LiveReadout, PoseFrame},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Camera enabled.
    Start,
    Pause,
    Resume,
    Finish,
    /// Camera disabled or navigated away without finishing.
    Abandon,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Readout(LiveReadout),
    Transition {
        from: Label,
        to: Label,
        counted: bool,
        reps: u32,
    },
    Finished(FinishedSession),
    FinishFailed(SessionError),
    Abandoned,
}

/// Spawns the thread that owns `session` and `store` for their whole life.
///
/// The thread exits once `command_rx` disconnects and hands the store back
/// through the join handle.
pub fn start_session_worker<S>(
    session: ExerciseSession,
    store: S,
    frame_rx: Receiver<PoseFrame>,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
) -> thread::JoinHandle<S>
where
    S: SessionStore + Send + 'static,
{
    log::info!("starting {} session worker", session.exercise());
    thread::spawn(move || run_session_loop(session, store, frame_rx, command_rx, event_tx))
}

/// Processes frames in arrival order and applies commands between them.
pub fn run_session_loop<S: SessionStore>(
    mut session: ExerciseSession,
    mut store: S,
    frame_rx: Receiver<PoseFrame>,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
) -> S {
    let closed = never();
    let mut frames_open = true;

    loop {
        let frames = if frames_open { &frame_rx } else { &closed };
        select! {
            recv(command_rx) -> command => match command {
                Ok(command) => handle_command(&mut session, &mut store, command, &event_tx),
                Err(_) => break,
            },
            recv(frames) -> frame => match frame {
                Ok(frame) => handle_frame(&mut session, &frame, &event_tx),
                Err(_) => {
                    log::debug!("pose frame source closed");
                    frames_open = false;
                }
            },
        }
    }

    if session.reps() > 0 {
        log::info!(
            "session worker stopped with {} unsaved reps",
            session.reps()
        );
    }
    store
}

fn handle_frame(session: &mut ExerciseSession, frame: &PoseFrame, event_tx: &Sender<SessionEvent>) {
    let Some(outcome) = session.process_frame(frame) else {
        return;
    };

    if let Observation::Transitioned { from, to, counted } = outcome.observation {
        publish(
            event_tx,
            SessionEvent::Transition {
                from,
                to,
                counted,
                reps: session.reps(),
            },
        );
    }
    publish(event_tx, SessionEvent::Readout(session.readout()));
}

fn handle_command<S: SessionStore>(
    session: &mut ExerciseSession,
    store: &mut S,
    command: SessionCommand,
    event_tx: &Sender<SessionEvent>,
) {
    match command {
        SessionCommand::Start => session.start(),
        SessionCommand::Pause => session.pause(),
        SessionCommand::Resume => session.resume(),
        SessionCommand::Finish => {
            let event = match session.finalize(store) {
                Ok(finished) => SessionEvent::Finished(finished),
                Err(err) => SessionEvent::FinishFailed(err),
            };
            deliver(event_tx, event);
            return;
        }
        SessionCommand::Abandon => {
            session.abandon();
            deliver(event_tx, SessionEvent::Abandoned);
            return;
        }
    }
    publish(event_tx, SessionEvent::Readout(session.readout()));
}

// Live updates are dropped when the consumer lags behind.
fn publish(event_tx: &Sender<SessionEvent>, event: SessionEvent) {
    let _ = event_tx.try_send(event);
}

fn deliver(event_tx: &Sender<SessionEvent>, event: SessionEvent) {
    if event_tx.send(event).is_err() {
        log::warn!("session event receiver dropped");
    }
}
