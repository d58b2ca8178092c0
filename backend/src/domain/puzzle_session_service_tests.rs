//! Tests for the puzzle session service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use futures::future::join_all;
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{
    GameRepositoryError, MockGameRepository, MockPuzzleSessionRepository,
    PuzzleSessionRepositoryError,
};
use crate::domain::{
    ErrorCode, Game, GameTemplate, PUZZLE_TEMPLATE_SLUG, Player, SessionCompletion, UserId,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 8, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        now()
    }
}

type Service = PuzzleSessionService<MockGameRepository, MockPuzzleSessionRepository>;

struct Mocks {
    games: MockGameRepository,
    sessions: MockPuzzleSessionRepository,
}

impl Mocks {
    fn new() -> Self {
        Self {
            games: MockGameRepository::new(),
            sessions: MockPuzzleSessionRepository::new(),
        }
    }

    fn with_game(mut self, game: &Game) -> Self {
        let game = game.clone();
        self.games
            .expect_find_by_id()
            .returning(move |_| Ok(Some(game.clone())));
        self
    }

    fn with_session(mut self, session: &PuzzleSession) -> Self {
        let session = session.clone();
        self.sessions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(session.clone())));
        self
    }

    fn build(self) -> Service {
        PuzzleSessionService::new(
            Arc::new(self.games),
            Arc::new(self.sessions),
            Arc::new(FixtureClock),
        )
    }
}

#[fixture]
fn game() -> Game {
    Game {
        id: Uuid::new_v4(),
        name: "Harbour".to_owned(),
        description: None,
        thumbnail_image: Some("puzzle/g/thumb.png".to_owned()),
        template: GameTemplate {
            id: Uuid::new_v4(),
            slug: PUZZLE_TEMPLATE_SLUG.to_owned(),
        },
        creator_id: UserId::random(),
        is_published: true,
        total_played: 41,
        game_json: json!({
            "title": "Harbour",
            "imageUrl": "puzzle/g/one.png",
            "thumbnail": "puzzle/g/thumb.png",
            "rows": 8,
            "cols": 6,
            "difficulty": "medium",
            "timeLimitSec": 600
        }),
        created_at: now() - Duration::days(3),
    }
}

#[fixture]
fn player() -> Player {
    Player::Identified(UserId::random())
}

fn active_session(game: &Game, player: &Player, difficulty: Difficulty) -> PuzzleSession {
    PuzzleSession::start(
        Uuid::new_v4(),
        game.id,
        player.clone(),
        difficulty,
        now() - Duration::seconds(120),
    )
}

fn finish_request(session: &PuzzleSession, player: Player) -> FinishPuzzleRequest {
    FinishPuzzleRequest {
        player,
        session_id: session.id(),
        game_id: session.game_id(),
        time_taken_sec: Some(100),
        move_count: Some(10),
    }
}

#[rstest]
#[case(None, 3, 300)]
#[case(Some(Difficulty::Easy), 3, 300)]
#[case(Some(Difficulty::Medium), 4, 600)]
#[case(Some(Difficulty::Hard), 5, 900)]
#[tokio::test]
async fn start_derives_grid_from_difficulty(
    game: Game,
    player: Player,
    #[case] difficulty: Option<Difficulty>,
    #[case] side: u8,
    #[case] time_limit: u32,
) {
    let mut mocks = Mocks::new().with_game(&game);
    mocks
        .games
        .expect_increment_total_played()
        .times(1)
        .returning(|_| Ok(true));
    mocks.sessions.expect_create().times(1).returning(|_| Ok(()));
    let service = mocks.build();

    let response = service
        .start_puzzle(StartPuzzleRequest {
            player,
            game_id: game.id,
            difficulty,
        })
        .await
        .expect("start succeeds");

    assert_eq!(response.game_id, game.id);
    assert_eq!(response.started_at, now());
    assert_eq!((response.config.rows, response.config.cols), (side, side));
    assert_eq!(response.config.time_limit_sec, time_limit);
    assert_eq!(response.config.image_url, "puzzle/g/one.png");
}

#[rstest]
#[tokio::test]
async fn start_on_unpublished_puzzle_is_forbidden(mut game: Game, player: Player) {
    game.is_published = false;
    let mut mocks = Mocks::new().with_game(&game);
    mocks.games.expect_increment_total_played().never();
    mocks.sessions.expect_create().never();
    let service = mocks.build();

    let err = service
        .start_puzzle(StartPuzzleRequest {
            player,
            game_id: game.id,
            difficulty: None,
        })
        .await
        .expect_err("unpublished");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn start_on_missing_game_is_not_found(player: Player) {
    let mut mocks = Mocks::new();
    mocks.games.expect_find_by_id().returning(|_| Ok(None));
    let service = mocks.build();

    let err = service
        .start_puzzle(StartPuzzleRequest {
            player,
            game_id: Uuid::new_v4(),
            difficulty: None,
        })
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn failed_session_insert_does_not_count_a_play(game: Game, player: Player) {
    let mut mocks = Mocks::new().with_game(&game);
    mocks
        .sessions
        .expect_create()
        .times(1)
        .returning(|_| Err(PuzzleSessionRepositoryError::connection("pool exhausted")));
    mocks.games.expect_increment_total_played().never();
    let service = mocks.build();

    let err = service
        .start_puzzle(StartPuzzleRequest {
            player,
            game_id: game.id,
            difficulty: None,
        })
        .await
        .expect_err("session not recorded");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn start_surfaces_counter_failures(game: Game, player: Player) {
    let mut mocks = Mocks::new().with_game(&game);
    mocks.sessions.expect_create().times(1).returning(|_| Ok(()));
    mocks
        .games
        .expect_increment_total_played()
        .times(1)
        .returning(|_| Err(GameRepositoryError::connection("pool exhausted")));
    let service = mocks.build();

    let err = service
        .start_puzzle(StartPuzzleRequest {
            player,
            game_id: game.id,
            difficulty: None,
        })
        .await
        .expect_err("counter unavailable");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn concurrent_starts_issue_one_increment_each(game: Game) {
    const STARTS: usize = 8;
    let mut mocks = Mocks::new().with_game(&game);
    mocks
        .games
        .expect_increment_total_played()
        .times(STARTS)
        .returning(|_| Ok(true));
    mocks.games.expect_update().never();
    mocks
        .sessions
        .expect_create()
        .times(STARTS)
        .returning(|_| Ok(()));
    let service = mocks.build();

    let results = join_all((0..STARTS).map(|_| {
        service.start_puzzle(StartPuzzleRequest {
            player: Player::Anonymous,
            game_id: game.id,
            difficulty: None,
        })
    }))
    .await;

    let mut session_ids: Vec<_> = results
        .into_iter()
        .map(|result| result.expect("start succeeds").session_id)
        .collect();
    session_ids.sort();
    session_ids.dedup();
    assert_eq!(session_ids.len(), STARTS);
}

#[rstest]
#[tokio::test]
async fn identified_finish_records_one_entry(game: Game, player: Player) {
    let session = active_session(&game, &player, Difficulty::Easy);
    let expected_user = player.user_id().cloned().expect("identified player");
    let mut mocks = Mocks::new().with_game(&game).with_session(&session);
    mocks
        .sessions
        .expect_record_finish()
        .withf(move |_, completion: &SessionCompletion, award: &Option<LeaderboardEntry>| {
            completion.score == 880
                && award.as_ref().is_some_and(|entry| {
                    entry.user_id == expected_user
                        && entry.score == 880
                        && entry.time_taken_sec == 100
                        && entry.difficulty == Difficulty::Easy
                        && entry.created_at == now()
                })
        })
        .times(1)
        .returning(|_, _, _| Ok(true));
    let service = mocks.build();

    let response = service
        .finish_puzzle(finish_request(&session, player))
        .await
        .expect("finish succeeds");

    assert_eq!(response.score, 1000 - 100 - 10 * 2);
    assert_eq!(response.time_taken_sec, 100);
    assert_eq!(response.move_count, 10);
    assert_eq!(response.finished_at, now());
    assert_eq!(response.game_name, "Harbour");
    assert_eq!(response.thumbnail.as_deref(), Some("puzzle/g/thumb.png"));
    assert!(response.leaderboard_entry_id.is_some());
}

#[rstest]
#[tokio::test]
async fn anonymous_finish_is_not_recorded(game: Game) {
    let session = active_session(&game, &Player::Anonymous, Difficulty::Medium);
    let mut mocks = Mocks::new().with_game(&game).with_session(&session);
    mocks
        .sessions
        .expect_record_finish()
        .withf(|_, _, award| award.is_none())
        .times(1)
        .returning(|_, _, _| Ok(true));
    let service = mocks.build();

    let response = service
        .finish_puzzle(finish_request(&session, Player::Anonymous))
        .await
        .expect("finish succeeds");

    assert!(response.leaderboard_entry_id.is_none());
}

#[rstest]
#[tokio::test]
async fn reported_time_beyond_elapsed_is_replaced(game: Game, player: Player) {
    let session = active_session(&game, &player, Difficulty::Hard);
    let mut mocks = Mocks::new().with_game(&game).with_session(&session);
    mocks
        .sessions
        .expect_record_finish()
        .returning(|_, _, _| Ok(true));
    let service = mocks.build();
    let mut request = finish_request(&session, player);
    request.time_taken_sec = Some(5_000);
    request.move_count = None;

    let response = service
        .finish_puzzle(request)
        .await
        .expect("finish succeeds");

    assert_eq!(response.time_taken_sec, 120);
    assert_eq!(response.move_count, 0);
    assert_eq!(response.score, 880);
}

#[rstest]
#[tokio::test]
async fn finishing_another_players_session_is_forbidden(game: Game, player: Player) {
    let session = active_session(&game, &player, Difficulty::Easy);
    let mut mocks = Mocks::new().with_game(&game).with_session(&session);
    mocks.sessions.expect_record_finish().never();
    let service = mocks.build();

    let err = service
        .finish_puzzle(finish_request(
            &session,
            Player::Identified(UserId::random()),
        ))
        .await
        .expect_err("not the owner");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn session_for_another_game_is_not_found(game: Game, player: Player) {
    let session = active_session(&game, &player, Difficulty::Easy);
    let mut other_game = game.clone();
    other_game.id = Uuid::new_v4();
    let mocks = Mocks::new().with_game(&other_game).with_session(&session);
    let service = mocks.build();
    let mut request = finish_request(&session, player);
    request.game_id = other_game.id;

    let err = service
        .finish_puzzle(request)
        .await
        .expect_err("game mismatch");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn finished_session_cannot_finish_again(game: Game, player: Player) {
    let active = active_session(&game, &player, Difficulty::Easy);
    let completion = active
        .complete(now(), ReportedOutcome::default())
        .expect("first completion");
    let finished = PuzzleSession::restore(
        active.id(),
        active.game_id(),
        active.player().clone(),
        active.difficulty(),
        active.started_at(),
        Some(completion),
    );
    let mut mocks = Mocks::new().with_game(&game).with_session(&finished);
    mocks.sessions.expect_record_finish().never();
    let service = mocks.build();

    let err = service
        .finish_puzzle(finish_request(&finished, player))
        .await
        .expect_err("already finished");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn losing_the_finish_race_is_a_conflict(game: Game, player: Player) {
    let session = active_session(&game, &player, Difficulty::Easy);
    let mut mocks = Mocks::new().with_game(&game).with_session(&session);
    mocks
        .sessions
        .expect_record_finish()
        .times(1)
        .returning(|_, _, _| Ok(false));
    let service = mocks.build();

    let err = service
        .finish_puzzle(finish_request(&session, player))
        .await
        .expect_err("concurrent finish won");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn failed_finish_write_reports_no_entry(game: Game, player: Player) {
    let session = active_session(&game, &player, Difficulty::Easy);
    let mut mocks = Mocks::new().with_game(&game).with_session(&session);
    mocks
        .sessions
        .expect_record_finish()
        .withf(|_, _, award| award.is_some())
        .times(1)
        .returning(|_, _, _| Err(PuzzleSessionRepositoryError::connection("pool exhausted")));
    let service = mocks.build();

    let err = service
        .finish_puzzle(finish_request(&session, player))
        .await
        .expect_err("finish not stored");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn finish_on_missing_game_is_not_found(game: Game, player: Player) {
    let session = active_session(&game, &player, Difficulty::Easy);
    let mut mocks = Mocks::new();
    mocks.games.expect_find_by_id().returning(|_| Ok(None));
    mocks.sessions.expect_find_by_id().never();
    let service = mocks.build();

    let err = service
        .finish_puzzle(finish_request(&session, player))
        .await
        .expect_err("missing game");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
