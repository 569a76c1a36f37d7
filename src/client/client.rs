//! Event loop driving one quiz attempt in the terminal.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::api::{QuestionSource, QuizApiClient, ScoreSubmitter};
use crate::session::{QuestionTimer, QuizSession, SessionPhase, TickOutcome, TimerTick};

use super::state::ClientApp;
use super::ui;

/// Shared client app state.
type SharedApp = Arc<Mutex<ClientApp>>;

/// Owns the countdown timer for the currently displayed question.
///
/// Every question change cancels the old timer and starts a fresh one with a
/// new epoch, so a tick that was already in flight when the question changed
/// is recognized as stale and dropped.
struct CountdownDriver {
    tx: mpsc::UnboundedSender<TimerTick>,
    timer: Option<QuestionTimer>,
    next_epoch: u64,
}

impl CountdownDriver {
    fn new(tx: mpsc::UnboundedSender<TimerTick>) -> Self {
        Self {
            tx,
            timer: None,
            next_epoch: 0,
        }
    }

    /// Cancel the running timer and start a fresh one.
    fn restart(&mut self) {
        self.cancel();
        self.next_epoch += 1;
        self.timer = Some(QuestionTimer::start(self.next_epoch, self.tx.clone()));
    }

    /// Cancel the running timer, if any.
    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Whether a tick came from the timer that is currently running.
    fn is_current(&self, tick: TimerTick) -> bool {
        self.timer.as_ref().is_some_and(|t| t.epoch() == tick.epoch)
    }

    fn ever_started(&self) -> bool {
        self.next_epoch > 0
    }
}

/// Run one quiz attempt against the API at `server`.
pub async fn run(
    server: String,
    quiz_id: u64,
    user_id: u64,
    question_seconds: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = Arc::new(QuizApiClient::new(server));
    let session = QuizSession::new(quiz_id, user_id, question_seconds);
    let app = Arc::new(Mutex::new(ClientApp::new(session)));

    let source: Arc<dyn QuestionSource> = api.clone();
    let load_task = spawn_load(Arc::clone(&app), source, quiz_id);

    let result = run_tui(Arc::clone(&app), api).await;

    // a late response must not land on a torn-down session
    load_task.abort();

    result
}

/// Fetch the questions in the background and apply the outcome.
fn spawn_load(app: SharedApp, source: Arc<dyn QuestionSource>, quiz_id: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = source.load_questions(quiz_id).await;

        let mut app = app.lock().await;
        match result {
            Ok(questions) => {
                app.session.questions_loaded(questions);
                app.sync_selection();
            }
            Err(e) => app.session.load_failed(e.to_string()),
        }
    })
}

/// Submit the attempt in the background and apply the outcome.
///
/// The in-flight guard in [`QuizSession::begin_submit`] makes a duplicate
/// spawn a no-op.
fn spawn_submit(app: SharedApp, submitter: Arc<dyn ScoreSubmitter>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let request = {
            let mut app = app.lock().await;
            app.session.begin_submit()
        };
        let Some(request) = request else { return };

        let result = submitter
            .submit_attempt(request.quiz_id, request.user_id, &request.answers)
            .await;

        let mut app = app.lock().await;
        match result {
            Ok(score) => app.session.submit_succeeded(score),
            Err(e) => app.session.submit_failed(e.to_string()),
        }
    })
}

/// Run the attempt UI until the user quits.
async fn run_tui(
    app: SharedApp,
    api: Arc<QuizApiClient>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = ratatui::init();

    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<TimerTick>();
    let mut countdown = CountdownDriver::new(tick_tx);
    let mut submit_task: Option<JoinHandle<()>> = None;

    let result = loop {
        {
            let app = app.lock().await;
            if app.should_quit {
                break Ok(());
            }
        }

        // the first timer starts once the questions have arrived; no timer
        // may keep running on a terminal screen
        {
            let app = app.lock().await;
            if app.session.is_terminal() {
                countdown.cancel();
            } else if !countdown.ever_started() && app.session.is_in_progress() {
                countdown.restart();
            }
        }

        while let Ok(tick) = tick_rx.try_recv() {
            handle_tick(&app, &api, tick, &mut countdown, &mut submit_task).await;
        }

        {
            let app = app.lock().await;
            if let Err(e) = terminal.draw(|frame| ui::render(frame, &app)) {
                break Err(e.into());
            }
        }

        match event::poll(Duration::from_millis(50)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(&app, &api, key.code, &mut countdown, &mut submit_task).await;
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }
    };

    countdown.cancel();
    if let Some(task) = submit_task.take() {
        task.abort();
    }
    ratatui::restore();

    result
}

/// Apply one countdown tick to the session.
async fn handle_tick(
    app: &SharedApp,
    api: &Arc<QuizApiClient>,
    tick: TimerTick,
    countdown: &mut CountdownDriver,
    submit_task: &mut Option<JoinHandle<()>>,
) {
    // ticks from a cancelled timer must never touch the current question
    if !countdown.is_current(tick) {
        return;
    }

    let outcome = {
        let mut app = app.lock().await;
        let outcome = app.session.tick();
        if outcome == TickOutcome::Advanced {
            app.sync_selection();
        }
        outcome
    };

    match outcome {
        TickOutcome::Counting => {}
        TickOutcome::Advanced => countdown.restart(),
        TickOutcome::SubmitDue => {
            countdown.cancel();
            let submitter: Arc<dyn ScoreSubmitter> = api.clone();
            *submit_task = Some(spawn_submit(Arc::clone(app), submitter));
        }
    }
}

/// Apply a key press for the current phase.
async fn handle_input(
    app: &SharedApp,
    api: &Arc<QuizApiClient>,
    key: KeyCode,
    countdown: &mut CountdownDriver,
    submit_task: &mut Option<JoinHandle<()>>,
) {
    let mut app_guard = app.lock().await;
    let phase = app_guard.session.phase().clone();

    match phase {
        SessionPhase::Loading => {
            if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
                app_guard.should_quit = true;
            }
        }
        SessionPhase::LoadFailed { .. } => {
            if matches!(
                key,
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc | KeyCode::Enter
            ) {
                app_guard.should_quit = true;
            }
        }
        SessionPhase::InProgress => match key {
            KeyCode::Up | KeyCode::Char('k') => app_guard.select_previous_option(),
            KeyCode::Down | KeyCode::Char('j') => app_guard.select_next_option(),
            KeyCode::Enter | KeyCode::Char(' ') => app_guard.choose_selected(),
            KeyCode::Right | KeyCode::Char('n') => {
                if app_guard.session.next_question() {
                    app_guard.sync_selection();
                    countdown.restart();
                }
            }
            KeyCode::Left | KeyCode::Char('p') => {
                if app_guard.session.previous_question() {
                    app_guard.sync_selection();
                    countdown.restart();
                }
            }
            KeyCode::Char('s') => {
                // the submit control lives on the last question
                if app_guard.session.is_last_question() && !app_guard.session.submit_in_flight() {
                    drop(app_guard);
                    countdown.cancel();
                    let submitter: Arc<dyn ScoreSubmitter> = api.clone();
                    *submit_task = Some(spawn_submit(Arc::clone(app), submitter));
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => app_guard.should_quit = true,
            _ => {}
        },
        SessionPhase::Submitted { .. } => match key {
            KeyCode::Down | KeyCode::Char('j') => app_guard.scroll_results_down(),
            KeyCode::Up | KeyCode::Char('k') => app_guard.scroll_results_up(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                app_guard.should_quit = true;
            }
            _ => {}
        },
    }
}
