//! Background worker that finishes games whose end time has passed.

use std::time::Duration;

use sqlx::PgPool;
use tokio::time::sleep;

use crate::cache;
use crate::config::Settings;
use crate::db::game_repo;

/// Spawn the infinite due-game sweep as a Tokio task.
pub fn start(db: PgPool, settings: Settings) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tick(&db).await {
                log::error!("due-game sweep failed: {e:?}");
            }
            sleep(Duration::from_secs(settings.sweep_interval_secs)).await;
        }
    });
}

/// One sweep: finish every active game past its end date.
async fn tick(db: &PgPool) -> crate::error::Result<()> {
    for game_id in game_repo::due_games(db).await? {
        match game_repo::finish_game(db, game_id).await {
            Ok(Some(winner)) => log::info!("game {game_id} finished, winner {winner}"),
            Ok(None) => log::debug!("game {game_id} already terminal or had no territories"),
            Err(e) => log::warn!("could not finish game {game_id}: {e}"),
        }
        cache::invalidate(game_id);
    }
    Ok(())
}
