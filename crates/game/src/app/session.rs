use std::io;
use std::path::PathBuf;

use tracing::info;

use super::persistence::SaveWorker;
use super::profile::{load_profile, PlayerProfile, ProfileError};

/// Everything a screen may read or mutate beyond its own state. Passed by reference into the
/// controller and every sub-view instead of living in globals.
pub(crate) struct SessionContext {
    pub(crate) profile: PlayerProfile,
    saver: SaveWorker,
    saves_requested: u64,
}

impl SessionContext {
    pub(crate) fn new(save_path: PathBuf) -> io::Result<Self> {
        Ok(Self {
            profile: PlayerProfile::new_game(),
            saver: SaveWorker::spawn(save_path)?,
            saves_requested: 0,
        })
    }

    /// Snapshots the in-memory profile and hands it to the save worker. The profile is already
    /// up to date when this returns; the disk write lands later.
    pub(crate) fn persist(&mut self) {
        self.saves_requested += 1;
        self.saver.request_save(self.profile.clone());
    }

    pub(crate) fn start_new_game(&mut self) {
        self.profile = PlayerProfile::new_game();
        info!(coins = self.profile.coins, "new_game_started");
        self.persist();
    }

    /// On failure the current in-memory profile is kept untouched.
    pub(crate) fn load_saved_game(&mut self) -> Result<(), ProfileError> {
        let profile = load_profile(self.saver.path())?;
        info!(
            coins = profile.coins,
            hats = profile.unlocked_hats.len(),
            mini_games = profile.owned_mini_games.len(),
            "profile_loaded"
        );
        self.profile = profile;
        Ok(())
    }

    pub(crate) fn saves_requested(&self) -> u64 {
        self.saves_requested
    }

    pub(crate) fn shutdown(&mut self, drain_pending_saves: bool) {
        self.saver.shutdown(drain_pending_saves);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::SessionContext;

    /// A session saving into a throwaway directory; keep the guard alive for the test's length.
    pub(crate) fn test_session() -> (tempfile::TempDir, SessionContext) {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = SessionContext::new(dir.path().join("save.json")).expect("session");
        (dir, session)
    }
}
