//! Leaderboard query service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    GameRepository, LeaderboardQuery, LeaderboardRepository, LeaderboardRepositoryError,
    LeaderboardRequest, LeaderboardResponse, RankedEntry,
};
use crate::domain::puzzle_games::load_puzzle_game;
use crate::domain::{Error, LeaderboardLimit, rank};

fn map_repository_error(error: LeaderboardRepositoryError) -> Error {
    match error {
        LeaderboardRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("leaderboard repository unavailable: {message}"))
        }
        LeaderboardRepositoryError::Query { message } => {
            Error::internal(format!("leaderboard repository error: {message}"))
        }
    }
}

/// Leaderboard service implementing the leaderboard driving port.
#[derive(Clone)]
pub struct LeaderboardService<G, L> {
    games: Arc<G>,
    leaderboard: Arc<L>,
}

impl<G, L> LeaderboardService<G, L> {
    pub fn new(games: Arc<G>, leaderboard: Arc<L>) -> Self {
        Self { games, leaderboard }
    }
}

#[async_trait]
impl<G, L> LeaderboardQuery for LeaderboardService<G, L>
where
    G: GameRepository,
    L: LeaderboardRepository,
{
    async fn top(&self, request: LeaderboardRequest) -> Result<LeaderboardResponse, Error> {
        let game = load_puzzle_game(self.games.as_ref(), request.game_id).await?;
        let limit = LeaderboardLimit::from_requested(request.limit);

        let entries = self
            .leaderboard
            .top_for_game(&game.id, limit)
            .await
            .map_err(map_repository_error)?;

        let entries = rank(game.id, entries, limit)
            .into_iter()
            .zip(1..)
            .map(|(entry, position)| RankedEntry::new(position, entry))
            .collect();

        Ok(LeaderboardResponse {
            game_id: game.id,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::{MockGameRepository, MockLeaderboardRepository};
    use crate::domain::{
        Difficulty, ErrorCode, Game, GameTemplate, LeaderboardEntry, PUZZLE_TEMPLATE_SLUG,
        UserId,
    };

    #[fixture]
    fn game() -> Game {
        Game {
            id: Uuid::new_v4(),
            name: "Harbour".to_owned(),
            description: None,
            thumbnail_image: None,
            template: GameTemplate {
                id: Uuid::new_v4(),
                slug: PUZZLE_TEMPLATE_SLUG.to_owned(),
            },
            creator_id: UserId::random(),
            is_published: true,
            total_played: 0,
            game_json: json!({ "imageUrl": "a.png", "rows": 3, "cols": 3 }),
            created_at: Utc::now(),
        }
    }

    fn entries_for(game_id: Uuid, scores: &[u32]) -> Vec<LeaderboardEntry> {
        let base = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        scores
            .iter()
            .enumerate()
            .map(|(idx, score)| LeaderboardEntry {
                id: Uuid::new_v4(),
                user_id: UserId::random(),
                game_id,
                score: *score,
                difficulty: Difficulty::Easy,
                time_taken_sec: 30,
                created_at: base + Duration::minutes(idx as i64),
            })
            .collect()
    }

    fn games_returning(game: &Game) -> MockGameRepository {
        let game = game.clone();
        let mut games = MockGameRepository::new();
        games
            .expect_find_by_id()
            .returning(move |_| Ok(Some(game.clone())));
        games
    }

    #[rstest]
    #[tokio::test]
    async fn top_ten_is_ranked_and_bounded(game: Game) {
        let scores = [
            500, 870, 870, 120, 990, 640, 640, 640, 310, 455, 700, 880, 100, 910, 505,
        ];
        let stored = entries_for(game.id, &scores);
        let mut leaderboard = MockLeaderboardRepository::new();
        leaderboard
            .expect_top_for_game()
            .withf(|_, limit| limit.get() == 10)
            .return_once(move |_, _| Ok(stored));
        let service = LeaderboardService::new(Arc::new(games_returning(&game)), Arc::new(leaderboard));

        let response = service
            .top(LeaderboardRequest {
                game_id: game.id,
                limit: None,
            })
            .await
            .expect("query succeeds");

        assert_eq!(response.entries.len(), 10);
        assert!(
            response
                .entries
                .windows(2)
                .all(|pair| pair[0].score >= pair[1].score)
        );
        let ranks: Vec<_> = response.entries.iter().map(|entry| entry.rank).collect();
        assert_eq!(ranks, (1..=10).collect::<Vec<_>>());
        assert_eq!(response.entries[0].score, 990);
    }

    #[rstest]
    #[tokio::test]
    async fn oversized_limit_is_clamped(game: Game) {
        let mut leaderboard = MockLeaderboardRepository::new();
        leaderboard
            .expect_top_for_game()
            .withf(|_, limit| limit.get() == 100)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let service = LeaderboardService::new(Arc::new(games_returning(&game)), Arc::new(leaderboard));

        let response = service
            .top(LeaderboardRequest {
                game_id: game.id,
                limit: Some(10_000),
            })
            .await
            .expect("query succeeds");

        assert!(response.entries.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn non_puzzle_game_is_not_found(mut game: Game) {
        game.template.slug = "quiz".to_owned();
        let mut leaderboard = MockLeaderboardRepository::new();
        leaderboard.expect_top_for_game().never();
        let service = LeaderboardService::new(Arc::new(games_returning(&game)), Arc::new(leaderboard));

        let err = service
            .top(LeaderboardRequest {
                game_id: game.id,
                limit: None,
            })
            .await
            .expect_err("quiz has no puzzle board");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
