//! Score computation for finished puzzle sessions.

/// Score awarded for an instant, move-free solve.
pub const MAX_SCORE: u32 = 1000;
/// Lowest score a finished session can receive.
pub const MIN_SCORE: u32 = 100;
/// Points deducted per move.
pub const MOVE_PENALTY: u32 = 2;

/// Score a finished session.
///
/// The time penalty is capped at `time_limit_sec`, so overtime play stops
/// costing points once the limit is reached. The result never drops below
/// [`MIN_SCORE`].
///
/// # Examples
/// ```
/// use games_backend::domain::score_session;
///
/// assert_eq!(score_session(0, 0, 600), 1000);
/// assert_eq!(score_session(1_600, 0, 600), 400);
/// assert_eq!(score_session(0, 1_000, 600), 100);
/// ```
pub fn score_session(time_taken_sec: u32, move_count: u32, time_limit_sec: u32) -> u32 {
    let time_penalty = time_taken_sec.min(time_limit_sec);
    let move_penalty = move_count.saturating_mul(MOVE_PENALTY);
    MAX_SCORE
        .saturating_sub(time_penalty)
        .saturating_sub(move_penalty)
        .max(MIN_SCORE)
}
