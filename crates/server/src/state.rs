use kereta::{
    clock::RecurringClock,
    feed::{self, Config},
    prelude::{FeedReader, Tracker},
};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub struct AppState {
    pub feed_path: PathBuf,
    pub clock: RecurringClock,
    pub tracker: RwLock<Tracker>,
}

impl AppState {
    pub fn load(feed_path: PathBuf, clock: RecurringClock) -> Result<Self, feed::Error> {
        let tracker = load_tracker(&feed_path, clock)?;
        Ok(Self {
            feed_path,
            clock,
            tracker: RwLock::new(tracker),
        })
    }
}

pub fn load_tracker(feed_path: &Path, clock: RecurringClock) -> Result<Tracker, feed::Error> {
    let reader = FeedReader::new(Config::default()).from_path(feed_path.to_path_buf());
    Tracker::from_feed(reader, clock)
}
