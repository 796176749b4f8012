use std::time::{Duration, Instant};

use reqwest::StatusCode;
use tracing::{debug, info, warn};
use zeronight_shared::constants::{
    need_letters_notice, AI_FINISHED_NOTICE, ALREADY_SOLVED_NOTICE, DETAIL_AI_FINISHED, DETAIL_ALREADY_SOLVED,
    DETAIL_LOCKED_LEVEL, DETAIL_NO_ATTEMPTS_LEFT, INVALID_GUESS_NOTICE, LOCKED_GUESS_NOTICE, NETWORK_ERROR,
    TRY_AGAIN_NOTICE,
};
use zeronight_shared::rate_limit::remaining_seconds;
use zeronight_shared::shared_word_game::{ErrorDetail, GuessRequest, GuessResponse, LetterStatus, LevelDescriptor};
use zeronight_shared::validation::validate_guess;

use super::reconciler::AfterSync;
use super::{Command, GameEngine};
use crate::catalog::LevelCatalog;
use crate::clock::Clock;
use crate::cooldown::CooldownManager;
use crate::error::ApiError;
use crate::ports::{GameView, ResultDialog};
use crate::scheduler::Scheduler;
use crate::session::SessionState;

/// `Idle -> Validating -> InFlight -> Accepted | Rejected`. A new submission
/// starts again from whichever terminal phase the previous one reached.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    InFlight(GuessRequest),
    Accepted,
    Rejected,
}

/// Local precondition failures; none of these reach the network.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    InputLocked,
    Cooldown { remaining: Duration },
    BotFinished,
    AlreadySolved,
    WrongLength { need: usize },
}

/// Server answer to a submitted guess, reduced to what the engine reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    Scored { result: Vec<LetterStatus>, is_correct: bool },
    AiFinished,
    LockedLevel,
    NoAttemptsLeft,
    AlreadySolved,
    Cooldown { retry_after: Duration },
    Rejected { message: String },
    Network,
}

impl GuessOutcome {
    pub fn classify(result: Result<GuessResponse, ApiError>) -> Self {
        let (status, detail) = match result {
            Ok(response) => {
                return GuessOutcome::Scored {
                    result: response.result,
                    is_correct: response.is_correct,
                }
            }
            Err(ApiError::Rejected { status, detail }) => (status, detail),
            Err(ApiError::Network(_)) | Err(ApiError::Decode(_)) => return GuessOutcome::Network,
        };

        let message = detail.as_ref().and_then(ErrorDetail::message);
        if status == StatusCode::FORBIDDEN {
            match message {
                Some(DETAIL_AI_FINISHED) => return GuessOutcome::AiFinished,
                Some(DETAIL_LOCKED_LEVEL) => return GuessOutcome::LockedLevel,
                Some(DETAIL_NO_ATTEMPTS_LEFT) => return GuessOutcome::NoAttemptsLeft,
                _ => {}
            }
        }
        if status == StatusCode::CONFLICT && message == Some(DETAIL_ALREADY_SOLVED) {
            return GuessOutcome::AlreadySolved;
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(cooldown) = detail.as_ref().and_then(ErrorDetail::cooldown) {
                return GuessOutcome::Cooldown {
                    retry_after: cooldown.retry_after(),
                };
            }
        }

        GuessOutcome::Rejected {
            message: message.unwrap_or(INVALID_GUESS_NOTICE).to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct GuessPipeline {
    phase: SubmitPhase,
}

impl GuessPipeline {
    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    pub fn in_flight(&self) -> Option<&GuessRequest> {
        match &self.phase {
            SubmitPhase::InFlight(request) => Some(request),
            _ => None,
        }
    }

    /// Runs the preconditions in order. On success input is locked and the
    /// returned request is the only one allowed in flight.
    pub fn validate(
        &mut self,
        session: &mut SessionState,
        catalog: &LevelCatalog,
        descriptor: &LevelDescriptor,
        cooldown: &CooldownManager,
        now: Instant,
    ) -> Result<GuessRequest, Rejection> {
        if session.input_locked() {
            return Err(Rejection::InputLocked);
        }
        self.phase = SubmitPhase::Validating;

        let level = session.current_level();
        let rejection = if cooldown.is_active(now) {
            Some(Rejection::Cooldown {
                remaining: cooldown.remaining(now),
            })
        } else if session.locked_out(catalog) {
            session.lock_input();
            Some(Rejection::BotFinished)
        } else if session.is_solved(level) {
            Some(Rejection::AlreadySolved)
        } else if validate_guess(session.buffer().as_str(), descriptor.length).is_err() {
            Some(Rejection::WrongLength {
                need: descriptor.length,
            })
        } else {
            None
        };

        if let Some(rejection) = rejection {
            self.phase = SubmitPhase::Rejected;
            return Err(rejection);
        }

        session.lock_input();
        let request = GuessRequest {
            level,
            guess: session.buffer().as_str().to_string(),
        };
        self.phase = SubmitPhase::InFlight(request.clone());
        Ok(request)
    }

    /// Classifies the response to the in-flight request. Responses to anything
    /// else are stale and yield `None`.
    pub fn resolve(&mut self, request: &GuessRequest, result: Result<GuessResponse, ApiError>) -> Option<GuessOutcome> {
        match &self.phase {
            SubmitPhase::InFlight(pending) if pending == request => {}
            _ => return None,
        }

        let outcome = GuessOutcome::classify(result);
        self.phase = match outcome {
            GuessOutcome::Scored { .. } => SubmitPhase::Accepted,
            _ => SubmitPhase::Rejected,
        };
        Some(outcome)
    }
}

impl<V, S, C> GameEngine<V, S, C>
where
    V: GameView,
    S: Scheduler,
    C: Clock,
{
    pub fn submit_guess(&mut self) {
        let now = self.clock.now();
        let descriptor = self.current_descriptor();

        match self
            .pipeline
            .validate(&mut self.session, &self.catalog, &descriptor, &self.cooldown, now)
        {
            Ok(request) => {
                debug!(level = request.level, "submitting guess");
                self.commands.push(Command::SubmitGuess(request));
            }
            Err(Rejection::InputLocked) => {}
            Err(Rejection::Cooldown { .. }) => {
                let text = self.cooldown.countdown_text(now);
                self.view.render_cooldown(&text);
            }
            Err(Rejection::BotFinished) => {
                self.session.set_ai_loss_announced(true);
                self.post_notice(AI_FINISHED_NOTICE, false);
            }
            Err(Rejection::AlreadySolved) => self.post_notice(ALREADY_SOLVED_NOTICE, true),
            Err(Rejection::WrongLength { need }) => self.post_notice(&need_letters_notice(need), true),
        }
    }

    pub(super) fn on_guess_completed(&mut self, request: GuessRequest, result: Result<GuessResponse, ApiError>) {
        let Some(outcome) = self.pipeline.resolve(&request, result) else {
            debug!(level = request.level, "dropping response for a guess that is no longer in flight");
            return;
        };
        let level = request.level;

        match outcome {
            GuessOutcome::Scored { result, is_correct } => {
                self.start_cooldown(self.settings.guess_cooldown);

                let row = self.session.current_row();
                self.board.set_attempt(row, &request.guess, &result);
                for (letter, status) in request.guess.chars().zip(result.iter()) {
                    self.hints.merge(letter, *status);
                }
                self.view.render_keyboard_hints(&self.hints);

                if is_correct {
                    info!(level, "level solved");
                    self.session.mark_solved(level);
                    self.session.lock_input();
                    self.view.render_board(&self.board);
                    self.render_tracks();
                    self.view.show_result_dialog(&ResultDialog::win());
                    return;
                }

                let next_row = self.session.advance_row();
                self.session.buffer_mut().clear();
                self.view.render_board(&self.board);

                if next_row >= self.current_descriptor().max_attempts {
                    info!(level, "out of attempts");
                    self.session.lock_input();
                    self.view.show_result_dialog(&ResultDialog::lose());
                } else {
                    self.post_notice(TRY_AGAIN_NOTICE, true);
                    self.reopen_input();
                }
            }
            GuessOutcome::AiFinished => {
                info!(level, "bot finished before the guess landed");
                self.session.mark_bot_finished();
                self.session.lock_input();
                self.session.set_ai_loss_announced(true);
                self.render_tracks();
                self.view.show_result_dialog(&ResultDialog::ai());
            }
            GuessOutcome::LockedLevel => {
                self.post_notice(LOCKED_GUESS_NOTICE, true);
                self.request_state(false, Some(AfterSync::RepointToUnlock));
            }
            GuessOutcome::NoAttemptsLeft => {
                self.session.lock_input();
                self.view.show_result_dialog(&ResultDialog::lose());
            }
            GuessOutcome::AlreadySolved => {
                self.request_state(false, Some(AfterSync::AlreadySolved));
            }
            GuessOutcome::Cooldown { retry_after } => {
                self.start_cooldown(retry_after);
                let notice = format!("Cooldown: {}s", remaining_seconds(retry_after));
                self.post_notice(&notice, true);
                self.reopen_input();
            }
            GuessOutcome::Rejected { message } => {
                warn!(level, %message, "guess rejected");
                self.post_notice(&message, true);
                self.reopen_input();
            }
            GuessOutcome::Network => {
                self.post_notice(NETWORK_ERROR, true);
                self.reopen_input();
            }
        }
    }
}
