//! Puzzle session lifecycle.
//!
//! A session moves from `Active` to `Finished` exactly once. The start time
//! is recorded server-side so elapsed time can be measured on finish.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::config::Difficulty;
use super::scoring::score_session;
use crate::domain::Player;

/// Lifecycle state of a stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Finished,
}

/// Result recorded when a session finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCompletion {
    pub finished_at: DateTime<Utc>,
    pub time_taken_sec: u32,
    pub move_count: u32,
    pub score: u32,
}

/// Errors raised by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionTransitionError {
    #[error("puzzle session {session_id} has already finished")]
    AlreadyFinished { session_id: Uuid },
}

/// Client-reported outcome of a play-through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportedOutcome {
    pub time_taken_sec: Option<u32>,
    pub move_count: Option<u32>,
}

/// One player's play-through of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleSession {
    id: Uuid,
    game_id: Uuid,
    player: Player,
    difficulty: Difficulty,
    started_at: DateTime<Utc>,
    completion: Option<SessionCompletion>,
}

impl PuzzleSession {
    /// Open a new active session.
    pub fn start(
        id: Uuid,
        game_id: Uuid,
        player: Player,
        difficulty: Difficulty,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            game_id,
            player,
            difficulty,
            started_at,
            completion: None,
        }
    }

    /// Rehydrate a session from storage.
    pub fn restore(
        id: Uuid,
        game_id: Uuid,
        player: Player,
        difficulty: Difficulty,
        started_at: DateTime<Utc>,
        completion: Option<SessionCompletion>,
    ) -> Self {
        Self {
            id,
            game_id,
            player,
            difficulty,
            started_at,
            completion,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completion(&self) -> Option<&SessionCompletion> {
        self.completion.as_ref()
    }

    pub fn state(&self) -> SessionState {
        if self.completion.is_some() {
            SessionState::Finished
        } else {
            SessionState::Active
        }
    }

    /// Whether `player` started this session.
    pub fn is_owned_by(&self, player: &Player) -> bool {
        &self.player == player
    }

    /// Seconds between start and `finished_at`, clamped at zero.
    pub fn elapsed_sec(&self, finished_at: DateTime<Utc>) -> u32 {
        let elapsed = (finished_at - self.started_at).num_seconds().max(0);
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }

    /// Compute the completion for this session.
    ///
    /// Elapsed time is measured from the stored start. A reported time is
    /// accepted only when it does not exceed the measured time.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, Utc};
    /// use games_backend::domain::{Difficulty, Player, PuzzleSession, ReportedOutcome};
    /// use uuid::Uuid;
    ///
    /// let started = Utc::now();
    /// let session = PuzzleSession::start(
    ///     Uuid::new_v4(),
    ///     Uuid::new_v4(),
    ///     Player::Anonymous,
    ///     Difficulty::Easy,
    ///     started,
    /// );
    /// let completion = session
    ///     .complete(
    ///         started + Duration::seconds(90),
    ///         ReportedOutcome { time_taken_sec: Some(80), move_count: Some(10) },
    ///     )
    ///     .expect("active session");
    /// assert_eq!(completion.time_taken_sec, 80);
    /// assert_eq!(completion.score, 1000 - 80 - 20);
    /// ```
    pub fn complete(
        &self,
        finished_at: DateTime<Utc>,
        reported: ReportedOutcome,
    ) -> Result<SessionCompletion, SessionTransitionError> {
        if self.completion.is_some() {
            return Err(SessionTransitionError::AlreadyFinished {
                session_id: self.id,
            });
        }

        let measured = self.elapsed_sec(finished_at);
        let time_taken_sec = match reported.time_taken_sec {
            Some(reported_sec) if reported_sec <= measured => reported_sec,
            _ => measured,
        };
        let move_count = reported.move_count.unwrap_or(0);
        let time_limit_sec = super::config::time_limit_for_difficulty(Some(self.difficulty));

        Ok(SessionCompletion {
            finished_at,
            time_taken_sec,
            move_count,
            score: score_session(time_taken_sec, move_count, time_limit_sec),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::UserId;

    #[fixture]
    fn started_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    #[fixture]
    fn active(started_at: DateTime<Utc>) -> PuzzleSession {
        PuzzleSession::start(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Player::Identified(UserId::random()),
            Difficulty::Medium,
            started_at,
        )
    }

    #[rstest]
    fn owner_matches_regardless_of_uuid_spelling(started_at: DateTime<Utc>) {
        let uuid = Uuid::new_v4();
        let session = PuzzleSession::start(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Player::Identified(UserId::from_uuid(uuid)),
            Difficulty::Easy,
            started_at,
        );
        let upper = UserId::new(uuid.to_string().to_uppercase()).expect("valid id");

        assert!(session.is_owned_by(&Player::Identified(upper)));
        assert!(!session.is_owned_by(&Player::Anonymous));
    }

    #[rstest]
    fn new_session_is_active(active: PuzzleSession) {
        assert_eq!(active.state(), SessionState::Active);
        assert!(active.completion().is_none());
    }

    #[rstest]
    #[case(Some(100), 100)]
    #[case(Some(120), 120)]
    #[case(Some(500), 120)]
    #[case(None, 120)]
    fn reported_time_cannot_exceed_measured(
        active: PuzzleSession,
        started_at: DateTime<Utc>,
        #[case] reported: Option<u32>,
        #[case] expected: u32,
    ) {
        let completion = active
            .complete(
                started_at + Duration::seconds(120),
                ReportedOutcome {
                    time_taken_sec: reported,
                    move_count: None,
                },
            )
            .expect("active session");

        assert_eq!(completion.time_taken_sec, expected);
        assert_eq!(completion.move_count, 0);
    }

    #[rstest]
    fn clock_skew_clamps_elapsed_to_zero(active: PuzzleSession, started_at: DateTime<Utc>) {
        assert_eq!(active.elapsed_sec(started_at - Duration::seconds(5)), 0);
    }

    #[rstest]
    fn finished_session_is_terminal(active: PuzzleSession, started_at: DateTime<Utc>) {
        let finished_at = started_at + Duration::seconds(30);
        let completion = active
            .complete(finished_at, ReportedOutcome::default())
            .expect("first finish");
        let finished = PuzzleSession::restore(
            active.id(),
            active.game_id(),
            active.player().clone(),
            active.difficulty(),
            active.started_at(),
            Some(completion),
        );

        assert_eq!(finished.state(), SessionState::Finished);
        let err = finished
            .complete(finished_at, ReportedOutcome::default())
            .expect_err("second finish rejected");
        assert_eq!(
            err,
            SessionTransitionError::AlreadyFinished {
                session_id: active.id()
            }
        );
    }

    #[rstest]
    fn ownership_distinguishes_players(active: PuzzleSession) {
        assert!(active.is_owned_by(&active.player().clone()));
        assert!(!active.is_owned_by(&Player::Anonymous));
        assert!(!active.is_owned_by(&Player::Identified(UserId::random())));
    }
}
