use std::path::PathBuf;

use kereta::clock::{RecurringClock, WIB_UTC_OFFSET_HOURS};

const DEFAULT_PORT: u16 = 3000;

pub struct Config {
    pub feed_path: PathBuf,
    pub port: u16,
    pub clock: RecurringClock,
}

impl Config {
    /// Feed path from the first argument, everything else from
    /// `KERETA_PORT` and `KERETA_UTC_OFFSET_HOURS`.
    pub fn from_env() -> Result<Self, String> {
        let feed_path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .ok_or("Missing feed path")?;
        let feed_path = feed_path
            .canonicalize()
            .map_err(|err| format!("Invalid feed path {}: {err}", feed_path.display()))?;

        let port = match std::env::var("KERETA_PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| format!("Invalid KERETA_PORT {value:?}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let offset = match std::env::var("KERETA_UTC_OFFSET_HOURS") {
            Ok(value) => value
                .parse()
                .map_err(|_| format!("Invalid KERETA_UTC_OFFSET_HOURS {value:?}"))?,
            Err(_) => WIB_UTC_OFFSET_HOURS,
        };
        let clock = RecurringClock::from_utc_offset_hours(offset)
            .ok_or(format!("UTC offset {offset} is out of range"))?;

        Ok(Self {
            feed_path,
            port,
            clock,
        })
    }
}
