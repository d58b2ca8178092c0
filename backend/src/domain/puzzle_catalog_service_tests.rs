//! Tests for the puzzle catalogue service.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    GameRepositoryError, MockAssetCleanupQueue, MockAssetStore, MockGameRepository,
};
use crate::domain::{
    CleanupReason, ErrorCode, GameTemplate, MAX_IMAGE_BYTES, PUZZLE_TEMPLATE_SLUG, UserId,
    UserRole,
};

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, 8, 15, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

type Service = PuzzleCatalogService<MockGameRepository, MockAssetStore>;

/// Cleanup tasks recorded by a mocked queue.
type Recorded = Arc<Mutex<Vec<AssetCleanup>>>;

fn recording_queue() -> (MockAssetCleanupQueue, Recorded) {
    let recorded: Recorded = Arc::default();
    let sink = Arc::clone(&recorded);
    let mut queue = MockAssetCleanupQueue::new();
    queue.expect_enqueue().returning(move |cleanup| {
        sink.lock().expect("cleanup sink").push(cleanup);
    });
    (queue, recorded)
}

fn make_service(games: MockGameRepository, assets: MockAssetStore) -> (Service, Recorded) {
    let (queue, recorded) = recording_queue();
    let service =
        PuzzleCatalogService::new(Arc::new(games), Arc::new(assets), Arc::new(queue), Arc::new(FixtureClock));
    (service, recorded)
}

fn echo_uploads(assets: &mut MockAssetStore) {
    assets
        .expect_upload()
        .returning(|prefix, file| Ok(format!("{prefix}/{}", file.file_name)));
}

fn paths(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

#[fixture]
fn template() -> GameTemplate {
    GameTemplate {
        id: Uuid::new_v4(),
        slug: PUZZLE_TEMPLATE_SLUG.to_owned(),
    }
}

#[fixture]
fn creator() -> UserId {
    UserId::random()
}

#[fixture]
fn stored_game(template: GameTemplate, creator: UserId) -> Game {
    Game {
        id: Uuid::new_v4(),
        name: "Harbour".to_owned(),
        description: Some("Boats at rest".to_owned()),
        thumbnail_image: Some("puzzle/g/thumb.png".to_owned()),
        template,
        creator_id: creator,
        is_published: true,
        total_played: 12,
        game_json: json!({
            "title": "Harbour",
            "imageUrl": "puzzle/g/one.png",
            "images": ["puzzle/g/one.png", "puzzle/g/two.png"],
            "thumbnail": "puzzle/g/thumb.png",
            "rows": 4,
            "cols": 4,
            "difficulty": "easy",
            "timeLimitSec": 300
        }),
        created_at: FixtureClock.utc(),
    }
}

fn png(name: &str) -> UploadFile {
    UploadFile::new(name, vec![0x89, b'P', b'N', b'G']).with_content_type("image/png")
}

fn create_request(actor: Actor) -> CreatePuzzleRequest {
    CreatePuzzleRequest {
        actor,
        name: "  Lighthouse ".to_owned(),
        description: None,
        rows: None,
        cols: None,
        difficulty: None,
        is_published: None,
        thumbnail: Some(png("thumb.png")),
        puzzle_images: vec![png("a.png"), png("b.png")],
    }
}

fn admin() -> Actor {
    Actor::new(UserId::random(), UserRole::Admin)
}

fn expect_game(games: &mut MockGameRepository, game: &Game) {
    let game = game.clone();
    games
        .expect_find_by_id()
        .returning(move |_| Ok(Some(game.clone())));
}

#[rstest]
#[tokio::test]
async fn list_skips_undecodable_and_other_templates(template: GameTemplate, stored_game: Game) {
    let mut corrupt = stored_game.clone();
    corrupt.id = Uuid::new_v4();
    corrupt.game_json = json!({ "rows": 3 });
    let mut quiz = stored_game.clone();
    quiz.id = Uuid::new_v4();
    quiz.template.slug = "quiz".to_owned();

    let mut games = MockGameRepository::new();
    let found = template.clone();
    games
        .expect_find_template()
        .returning(move |_| Ok(Some(found.clone())));
    let listed = vec![stored_game.clone(), corrupt, quiz];
    games
        .expect_list_by_template()
        .withf(move |id, include| *id == template.id && !*include)
        .return_once(move |_, _| Ok(listed));
    let (service, _) = make_service(games, MockAssetStore::new());

    let response = service
        .list_puzzles(ListPuzzlesRequest::default())
        .await
        .expect("list succeeds");

    assert_eq!(response.puzzles.len(), 1);
    let summary = &response.puzzles[0];
    assert_eq!(summary.id, stored_game.id);
    assert_eq!(summary.difficulty, Difficulty::Easy);
    assert_eq!((summary.rows, summary.cols), (4, 4));
    assert_eq!(summary.total_played, 12);
}

#[rstest]
#[tokio::test]
async fn list_without_template_is_empty() {
    let mut games = MockGameRepository::new();
    games.expect_find_template().returning(|_| Ok(None));
    games.expect_list_by_template().never();
    let (service, _) = make_service(games, MockAssetStore::new());

    let response = service
        .list_puzzles(ListPuzzlesRequest {
            include_unpublished: true,
        })
        .await
        .expect("list succeeds");

    assert!(response.puzzles.is_empty());
}

#[rstest]
#[tokio::test]
async fn get_rejects_non_puzzle_games(mut stored_game: Game) {
    stored_game.template.slug = "quiz".to_owned();
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    let (service, _) = make_service(games, MockAssetStore::new());

    let err = service
        .get_puzzle(GetPuzzleRequest {
            game_id: stored_game.id,
        })
        .await
        .expect_err("quiz is not a puzzle");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn get_maps_connection_failures_to_unavailable() {
    let mut games = MockGameRepository::new();
    games
        .expect_find_by_id()
        .returning(|_| Err(GameRepositoryError::connection("pool exhausted")));
    let (service, _) = make_service(games, MockAssetStore::new());

    let err = service
        .get_puzzle(GetPuzzleRequest {
            game_id: Uuid::new_v4(),
        })
        .await
        .expect_err("connection failure");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(UserRole::User, false, false)]
#[case(UserRole::User, true, true)]
#[case(UserRole::Admin, false, true)]
#[case(UserRole::SuperAdmin, false, true)]
#[tokio::test]
async fn edit_view_requires_editor_or_creator(
    stored_game: Game,
    #[case] role: UserRole,
    #[case] is_creator: bool,
    #[case] allowed: bool,
) {
    let user_id = if is_creator {
        stored_game.creator_id.clone()
    } else {
        UserId::random()
    };
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    let (service, _) = make_service(games, MockAssetStore::new());

    let result = service
        .get_puzzle_for_edit(GetPuzzleForEditRequest {
            actor: Actor::new(user_id, role),
            game_id: stored_game.id,
        })
        .await;

    match result {
        Ok(response) => {
            assert!(allowed);
            assert_eq!(response.puzzle.creator_id, stored_game.creator_id);
        }
        Err(err) => {
            assert!(!allowed);
            assert_eq!(err.code(), ErrorCode::Forbidden);
        }
    }
}

#[rstest]
#[tokio::test]
async fn create_rejects_duplicate_names_before_uploading(template: GameTemplate, stored_game: Game) {
    let mut games = MockGameRepository::new();
    games
        .expect_find_template()
        .returning(move |_| Ok(Some(template.clone())));
    games
        .expect_find_by_name()
        .withf(|_, name| name == "Lighthouse")
        .return_once(move |_, _| Ok(Some(stored_game)));
    games.expect_insert().never();
    let mut assets = MockAssetStore::new();
    assets.expect_upload().never();
    let (service, _) = make_service(games, assets);

    let err = service
        .create_puzzle(create_request(admin()))
        .await
        .expect_err("duplicate name");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().expect("details")["code"], "duplicate");
}

#[rstest]
#[tokio::test]
async fn create_requires_puzzle_template() {
    let mut games = MockGameRepository::new();
    games.expect_find_template().returning(|_| Ok(None));
    let (service, _) = make_service(games, MockAssetStore::new());

    let err = service
        .create_puzzle(create_request(admin()))
        .await
        .expect_err("template missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn create_uploads_images_and_persists_defaults(template: GameTemplate) {
    let template_id = template.id;
    let mut games = MockGameRepository::new();
    games
        .expect_find_template()
        .returning(move |_| Ok(Some(template.clone())));
    games.expect_find_by_name().returning(|_, _| Ok(None));
    let inserted: Arc<Mutex<Option<Game>>> = Arc::default();
    let sink = Arc::clone(&inserted);
    games.expect_insert().times(1).returning(move |game| {
        *sink.lock().expect("insert sink") = Some(game.clone());
        Ok(())
    });
    let mut assets = MockAssetStore::new();
    assets
        .expect_upload()
        .times(3)
        .returning(|prefix, file| Ok(format!("{prefix}/{}", file.file_name)));
    let (service, recorded) = make_service(games, assets);
    let actor = admin();

    let response = service
        .create_puzzle(create_request(actor.clone()))
        .await
        .expect("create succeeds");

    let game = inserted
        .lock()
        .expect("insert sink")
        .clone()
        .expect("game inserted");
    let prefix = format!("puzzle/{}", response.game_id);
    assert_eq!(game.id, response.game_id);
    assert_eq!(game.name, "Lighthouse");
    assert_eq!(game.template.id, template_id);
    assert_eq!(game.creator_id, actor.user_id);
    assert!(!game.is_published);
    assert_eq!(game.total_played, 0);
    assert_eq!(game.created_at, FixtureClock.utc());
    assert_eq!(game.thumbnail_image, Some(format!("{prefix}/thumb.png")));
    assert_eq!(game.game_json["difficulty"], "medium");
    assert_eq!(game.game_json["timeLimitSec"], 600);
    assert_eq!(game.game_json["rows"], 3);
    assert_eq!(game.game_json["cols"], 3);
    assert_eq!(game.game_json["imageUrl"], Value::from(format!("{prefix}/a.png")));
    assert_eq!(
        game.game_json["images"],
        json!([format!("{prefix}/a.png"), format!("{prefix}/b.png")])
    );
    assert!(recorded.lock().expect("cleanup sink").is_empty());
}

#[rstest]
#[tokio::test]
async fn create_discards_uploads_when_insert_fails(template: GameTemplate) {
    let mut games = MockGameRepository::new();
    games
        .expect_find_template()
        .returning(move |_| Ok(Some(template.clone())));
    games.expect_find_by_name().returning(|_, _| Ok(None));
    games
        .expect_insert()
        .returning(|_| Err(GameRepositoryError::duplicate_name("Lighthouse")));
    let mut assets = MockAssetStore::new();
    echo_uploads(&mut assets);
    let (service, recorded) = make_service(games, assets);

    let err = service
        .create_puzzle(create_request(admin()))
        .await
        .expect_err("insert race lost");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let recorded = recorded.lock().expect("cleanup sink");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].reason(), CleanupReason::Abandoned);
    assert_eq!(recorded[0].paths().len(), 3);
}

#[rstest]
#[case(Some(1), None)]
#[case(None, Some(11))]
#[tokio::test]
async fn create_validates_grid_bounds(#[case] rows: Option<u8>, #[case] cols: Option<u8>) {
    let mut games = MockGameRepository::new();
    games.expect_find_template().never();
    let (service, _) = make_service(games, MockAssetStore::new());
    let mut request = create_request(admin());
    request.rows = rows;
    request.cols = cols;

    let err = service
        .create_puzzle(request)
        .await
        .expect_err("grid out of range");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn create_requires_a_thumbnail() {
    let (service, _) = make_service(MockGameRepository::new(), MockAssetStore::new());
    let mut request = create_request(admin());
    request.thumbnail = None;

    let err = service
        .create_puzzle(request)
        .await
        .expect_err("thumbnail missing");

    assert_eq!(err.details().expect("details")["field"], "thumbnail");
}

#[rstest]
#[tokio::test]
async fn update_rejects_renaming_onto_another_puzzle(stored_game: Game) {
    let mut other = stored_game.clone();
    other.id = Uuid::new_v4();
    other.name = "Lighthouse".to_owned();
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    games
        .expect_find_by_name()
        .return_once(move |_, _| Ok(Some(other)));
    games.expect_update().never();
    let (service, _) = make_service(games, MockAssetStore::new());
    let mut request = UpdatePuzzleRequest::empty(admin(), stored_game.id);
    request.name = Some("Lighthouse".to_owned());

    let err = service
        .update_puzzle(request)
        .await
        .expect_err("name taken");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn update_keeping_own_name_succeeds(stored_game: Game) {
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    games.expect_find_by_name().never();
    games
        .expect_update()
        .withf(|game, _| game.name == "Harbour" && !game.is_published)
        .times(1)
        .returning(|_, _| Ok(true));
    let (service, recorded) = make_service(games, MockAssetStore::new());
    let mut request = UpdatePuzzleRequest::empty(admin(), stored_game.id);
    request.name = Some(" Harbour ".to_owned());
    request.is_published = Some(false);

    let response = service.update_puzzle(request).await.expect("update succeeds");

    assert_eq!(response.game_id, stored_game.id);
    assert!(recorded.lock().expect("cleanup sink").is_empty());
}

#[rstest]
#[tokio::test]
async fn update_is_stamped_by_the_service_clock(stored_game: Game) {
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    games
        .expect_update()
        .withf(|_, updated_at| *updated_at == FixtureClock.utc())
        .times(1)
        .returning(|_, _| Ok(true));
    let (service, _) = make_service(games, MockAssetStore::new());
    let mut request = UpdatePuzzleRequest::empty(admin(), stored_game.id);
    request.description = Some("Boats at dawn".to_owned());

    service.update_puzzle(request).await.expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_recomputes_time_limit_for_new_difficulty(stored_game: Game) {
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    games
        .expect_update()
        .withf(|game, _| {
            game.game_json["difficulty"] == "hard" && game.game_json["timeLimitSec"] == 900
        })
        .times(1)
        .returning(|_, _| Ok(true));
    let (service, _) = make_service(games, MockAssetStore::new());
    let mut request = UpdatePuzzleRequest::empty(admin(), stored_game.id);
    request.difficulty = Some(Difficulty::Hard);

    service.update_puzzle(request).await.expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_schedules_removal_of_replaced_images(stored_game: Game) {
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    games.expect_update().returning(|_, _| Ok(true));
    let mut assets = MockAssetStore::new();
    echo_uploads(&mut assets);
    let (service, recorded) = make_service(games, assets);
    let mut request = UpdatePuzzleRequest::empty(admin(), stored_game.id);
    request.puzzle_images = Some(vec![png("fresh.png")]);

    service.update_puzzle(request).await.expect("update succeeds");

    let recorded = recorded.lock().expect("cleanup sink");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].reason(), CleanupReason::Replaced);
    assert_eq!(
        recorded[0].paths(),
        &paths(&["puzzle/g/one.png", "puzzle/g/two.png"])
    );
}

#[rstest]
#[case(Err(GameRepositoryError::connection("pool exhausted")), ErrorCode::ServiceUnavailable)]
#[case(Ok(false), ErrorCode::NotFound)]
#[tokio::test]
async fn failed_update_keeps_images_the_record_still_uses(
    stored_game: Game,
    #[case] outcome: Result<bool, GameRepositoryError>,
    #[case] expected: ErrorCode,
) {
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    games
        .expect_update()
        .times(1)
        .return_once(move |_, _| outcome);
    let mut assets = MockAssetStore::new();
    // Identical bytes resolve to the path the record already holds.
    assets
        .expect_upload()
        .returning(|_, file| Ok(format!("puzzle/g/{}", file.file_name)));
    let (service, recorded) = make_service(games, assets);
    let mut request = UpdatePuzzleRequest::empty(admin(), stored_game.id);
    request.thumbnail = Some(png("thumb.png"));
    request.puzzle_images = Some(vec![png("one.png"), png("fresh.png")]);

    let err = service
        .update_puzzle(request)
        .await
        .expect_err("update not persisted");

    assert_eq!(err.code(), expected);
    let recorded = recorded.lock().expect("cleanup sink");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].reason(), CleanupReason::Abandoned);
    assert_eq!(recorded[0].paths(), &paths(&["puzzle/g/fresh.png"]));
}

#[rstest]
#[tokio::test]
async fn failed_update_reusing_only_stored_images_schedules_nothing(stored_game: Game) {
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    games
        .expect_update()
        .returning(|_, _| Err(GameRepositoryError::connection("pool exhausted")));
    let mut assets = MockAssetStore::new();
    assets
        .expect_upload()
        .returning(|_, _| Ok("puzzle/g/thumb.png".to_owned()));
    let (service, recorded) = make_service(games, assets);
    let mut request = UpdatePuzzleRequest::empty(admin(), stored_game.id);
    request.thumbnail = Some(png("thumb.png"));

    service
        .update_puzzle(request)
        .await
        .expect_err("update not persisted");

    assert!(recorded.lock().expect("cleanup sink").is_empty());
}

#[rstest]
#[tokio::test]
async fn update_by_stranger_is_forbidden(stored_game: Game) {
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    games.expect_update().never();
    let (service, _) = make_service(games, MockAssetStore::new());
    let stranger = Actor::new(UserId::random(), UserRole::User);

    let err = service
        .update_puzzle(UpdatePuzzleRequest::empty(stranger, stored_game.id))
        .await
        .expect_err("not the creator");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn delete_removes_every_distinct_path(stored_game: Game) {
    let game_id = stored_game.id;
    let mut games = MockGameRepository::new();
    expect_game(&mut games, &stored_game);
    games
        .expect_delete()
        .withf(move |id| *id == game_id)
        .times(1)
        .returning(|_| Ok(true));
    let (service, recorded) = make_service(games, MockAssetStore::new());

    let response = service
        .delete_puzzle(DeletePuzzleRequest {
            actor: Actor::new(stored_game.creator_id.clone(), UserRole::User),
            game_id,
        })
        .await
        .expect("delete succeeds");

    assert_eq!(response.game_id, game_id);
    let recorded = recorded.lock().expect("cleanup sink");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].reason(), CleanupReason::Deleted);
    assert_eq!(
        recorded[0].paths(),
        &paths(&["puzzle/g/one.png", "puzzle/g/thumb.png", "puzzle/g/two.png"])
    );
}

#[rstest]
#[tokio::test]
async fn delete_missing_puzzle_is_not_found() {
    let mut games = MockGameRepository::new();
    games.expect_find_by_id().returning(|_| Ok(None));
    games.expect_delete().never();
    let (service, recorded) = make_service(games, MockAssetStore::new());

    let err = service
        .delete_puzzle(DeletePuzzleRequest {
            actor: admin(),
            game_id: Uuid::new_v4(),
        })
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(recorded.lock().expect("cleanup sink").is_empty());
}

#[rstest]
#[tokio::test]
async fn upload_image_uses_uploader_namespace() {
    let mut assets = MockAssetStore::new();
    assets
        .expect_upload()
        .withf(|prefix, _| prefix.as_str() == "puzzle/uploads/anonymous")
        .returning(|prefix, file| Ok(format!("{prefix}/{}", file.file_name)));
    let (service, _) = make_service(MockGameRepository::new(), assets);

    let response = service
        .upload_image(UploadPuzzleImageRequest {
            player: crate::domain::Player::Anonymous,
            file: png("piece.png"),
        })
        .await
        .expect("upload succeeds");

    assert_eq!(response.path, "puzzle/uploads/anonymous/piece.png");
}

#[rstest]
#[tokio::test]
async fn upload_image_rejects_oversized_files() {
    let mut assets = MockAssetStore::new();
    assets.expect_upload().never();
    let (service, _) = make_service(MockGameRepository::new(), assets);

    let err = service
        .upload_image(UploadPuzzleImageRequest {
            player: crate::domain::Player::Anonymous,
            file: UploadFile::new("huge.png", vec![0; MAX_IMAGE_BYTES + 1]),
        })
        .await
        .expect_err("too large");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
