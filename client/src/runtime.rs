use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::api::GameApi;
use crate::clock::Clock;
use crate::engine::{Command, Event, GameEngine};
use crate::ports::GameView;
use crate::scheduler::{Scheduler, TokioScheduler};

/// Drives a [`GameEngine`] on tokio: events are applied one at a time on the
/// calling task, commands run as spawned requests whose completions come back
/// through the same channel.
pub struct GameRuntime<A> {
    api: A,
    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
}

impl<A: GameApi> GameRuntime<A> {
    pub fn new(api: A) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            events_tx,
            events_rx,
        }
    }

    /// Handle for input sources. Sending [`Event::Shutdown`] ends [`GameRuntime::run`].
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.events_tx.clone()
    }

    pub fn scheduler(&self) -> TokioScheduler {
        TokioScheduler::new(self.events_tx.clone())
    }

    pub async fn run<V, S, C>(&mut self, engine: &mut GameEngine<V, S, C>)
    where
        V: GameView,
        S: Scheduler,
        C: Clock,
    {
        let mut running = engine.handle(Event::Start);
        self.dispatch(engine.take_commands());

        while running {
            let Some(event) = self.events_rx.recv().await else {
                break;
            };
            running = engine.handle(event);
            self.dispatch(engine.take_commands());
        }
        info!("game loop stopped");
    }

    fn dispatch(&self, commands: Vec<Command>) {
        for command in commands {
            debug!(?command, "dispatching");
            let api = self.api.clone();
            let events = self.events_tx.clone();
            tokio::spawn(async move {
                let event = execute(&api, command).await;
                // Receiver is gone once the loop has stopped
                let _ = events.send(event);
            });
        }
    }
}

async fn execute<A: GameApi>(api: &A, command: Command) -> Event {
    match command {
        Command::FetchLevels => Event::LevelsLoaded(api.fetch_levels().await),
        Command::FetchState { request_id, full } => Event::StateLoaded {
            request_id,
            full,
            result: api.fetch_state(full).await,
        },
        Command::FetchLevelState { level } => Event::LevelStateLoaded {
            level,
            result: api.fetch_level_state(level).await,
        },
        Command::SubmitGuess(request) => {
            let result = api.submit_guess(request.clone()).await;
            Event::GuessCompleted { request, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;
    use crate::engine::EngineSettings;
    use crate::error::ApiError;
    use crate::keyboard::Key;
    use crate::ports::DialogKind;
    use crate::testing::RecordingView;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use zeronight_shared::shared_word_game::{
        BotProgress, GuessRequest, GuessResponse, LetterStatus, LevelDescriptor, LevelStateResponse,
        LevelsResponse, PlayerProgress, StateResponse,
    };

    #[derive(Clone, Default)]
    struct FakeApi {
        guesses: Arc<Mutex<Vec<GuessRequest>>>,
        solved: Arc<Mutex<Vec<u32>>>,
        state_fetches: Arc<Mutex<usize>>,
    }

    fn levels() -> Vec<LevelDescriptor> {
        (1..=3)
            .map(|level| LevelDescriptor { level, length: 5, max_attempts: 6 })
            .collect()
    }

    impl GameApi for FakeApi {
        async fn fetch_levels(&self) -> Result<LevelsResponse, ApiError> {
            Ok(LevelsResponse { total: Some(3), levels: levels() })
        }

        async fn fetch_state(&self, full: bool) -> Result<StateResponse, ApiError> {
            *self.state_fetches.lock().unwrap() += 1;
            Ok(StateResponse {
                levels: full.then(levels),
                total: Some(3),
                bot: BotProgress { solved: 0, total: 3, seconds_left: Some(600), finished: false },
                player: PlayerProgress {
                    solved_levels: self.solved.lock().unwrap().clone(),
                },
            })
        }

        async fn fetch_level_state(&self, _level: u32) -> Result<LevelStateResponse, ApiError> {
            Ok(LevelStateResponse::default())
        }

        async fn submit_guess(&self, request: GuessRequest) -> Result<GuessResponse, ApiError> {
            self.guesses.lock().unwrap().push(request.clone());
            self.solved.lock().unwrap().push(request.level);
            Ok(GuessResponse {
                level: Some(request.level),
                guess: Some(request.guess),
                result: vec![LetterStatus::Correct; 5],
                is_correct: true,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_solves_a_level_end_to_end() {
        let api = FakeApi::default();
        let mut runtime = GameRuntime::new(api.clone());
        let mut engine = GameEngine::new(
            RecordingView::default(),
            runtime.scheduler(),
            TokioClock,
            EngineSettings::default(),
        );

        let input = runtime.sender();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            for ch in "CRANE".chars() {
                input.send(Event::Key(Key::Letter(ch))).unwrap();
            }
            input.send(Event::Key(Key::Enter)).unwrap();
            // Long enough for two state polls
            tokio::time::sleep(Duration::from_secs(11)).await;
            input.send(Event::Shutdown).unwrap();
        });

        runtime.run(&mut engine).await;

        assert_eq!(
            *api.guesses.lock().unwrap(),
            vec![GuessRequest { level: 1, guess: "CRANE".into() }]
        );
        assert!(engine.session().is_solved(1));
        assert_eq!(engine.view().dialogs.last().map(|d| d.kind), Some(DialogKind::Win));
        assert!(*api.state_fetches.lock().unwrap() >= 3);
    }
}
