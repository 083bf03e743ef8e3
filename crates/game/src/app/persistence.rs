use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use super::profile::{save_profile, PlayerProfile};

const SAVER_THREAD_NAME: &str = "profile-saver";

/// Dedicated persistence thread. The frame loop hands it profile snapshots by value and never
/// waits for the write; when several snapshots are queued only the newest one is written.
///
/// Writes still queued when the process dies are lost. `shutdown(true)` narrows that window
/// for a normal exit by joining the worker after the queue is closed.
pub(crate) struct SaveWorker {
    path: PathBuf,
    sender: Option<Sender<PlayerProfile>>,
    handle: Option<JoinHandle<()>>,
    abandon: Arc<AtomicBool>,
}

impl SaveWorker {
    pub(crate) fn spawn(path: PathBuf) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let abandon = Arc::new(AtomicBool::new(false));
        let handle = thread::Builder::new()
            .name(SAVER_THREAD_NAME.to_string())
            .spawn({
                let path = path.clone();
                let abandon = Arc::clone(&abandon);
                move || run_saver(&path, &receiver, &abandon)
            })?;
        Ok(Self {
            path,
            sender: Some(sender),
            handle: Some(handle),
            abandon,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn request_save(&self, snapshot: PlayerProfile) {
        let Some(sender) = &self.sender else {
            warn!("profile_save_after_shutdown_ignored");
            return;
        };
        if sender.send(snapshot).is_err() {
            warn!(path = %self.path.display(), "profile_saver_gone_save_dropped");
        }
    }

    /// Closes the queue. With `drain` the call blocks until every queued snapshot is on disk;
    /// without it the worker is detached and skips whatever is still queued.
    pub(crate) fn shutdown(&mut self, drain: bool) {
        self.sender = None;
        let Some(handle) = self.handle.take() else {
            return;
        };
        if drain {
            if handle.join().is_err() {
                warn!("profile_saver_panicked");
            }
            info!(path = %self.path.display(), "profile_saver_drained");
        } else {
            self.abandon.store(true, Ordering::Relaxed);
            info!("profile_saver_detached");
        }
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        self.shutdown(false);
    }
}

fn run_saver(path: &Path, receiver: &Receiver<PlayerProfile>, abandon: &AtomicBool) {
    while let Ok(mut snapshot) = receiver.recv() {
        let mut coalesced = 0u32;
        while let Ok(newer) = receiver.try_recv() {
            snapshot = newer;
            coalesced += 1;
        }
        if abandon.load(Ordering::Relaxed) {
            return;
        }
        match save_profile(path, &snapshot) {
            Ok(()) => debug!(
                path = %path.display(),
                coins = snapshot.coins,
                coalesced,
                "profile_saved"
            ),
            Err(error) => warn!(error = %error, "profile_save_failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::profile::load_profile;

    #[test]
    fn drained_shutdown_leaves_latest_snapshot_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("save.json");
        let mut worker = SaveWorker::spawn(path.clone()).expect("spawn saver");

        for coins in [10, 20, 30] {
            let mut snapshot = PlayerProfile::new_game();
            snapshot.coins = coins;
            worker.request_save(snapshot);
        }
        worker.shutdown(true);

        assert_eq!(load_profile(&path).expect("load").coins, 30);
    }

    #[test]
    fn request_after_shutdown_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("save.json");
        let mut worker = SaveWorker::spawn(path.clone()).expect("spawn saver");
        worker.shutdown(true);

        worker.request_save(PlayerProfile::new_game());

        assert!(!path.exists());
    }

    #[test]
    fn unwritable_target_is_logged_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").expect("blocker file");
        let mut worker = SaveWorker::spawn(blocker.join("save.json")).expect("spawn saver");

        worker.request_save(PlayerProfile::new_game());
        worker.shutdown(true);

        assert!(blocker.is_file());
    }
}
