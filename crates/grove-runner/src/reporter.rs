//! A [`Reporter`] that writes to the log.

use grove_world::{Reporter, Snapshot, WeatherState};
use tracing::{debug, info};

/// Logs every tick at debug level, and changes of weather, time of day
/// and viability at info level.
#[derive(Debug, Default)]
pub struct LogReporter {
    last_weather: Option<WeatherState>,
    last_time_of_day: Option<&'static str>,
    last_viable: Option<bool>,
    reports: u64,
}

impl LogReporter {
    pub fn reports(&self) -> u64 {
        self.reports
    }
}

impl Reporter for LogReporter {
    fn report(&mut self, snapshot: &Snapshot<'_>) {
        self.reports += 1;

        debug!(
            event = "tick",
            step = snapshot.step,
            time_of_day = snapshot.time_of_day,
            weather = snapshot.weather_label(),
            river = snapshot.river,
            viable = snapshot.viable,
            "Tick"
        );

        if self.last_weather != Some(snapshot.weather) {
            info!(
                event = "weather",
                step = snapshot.step,
                weather = snapshot.weather_label(),
                "Weather is now {}",
                snapshot.weather
            );
            self.last_weather = Some(snapshot.weather);
        }
        if self.last_time_of_day != Some(snapshot.time_of_day) {
            debug!(
                event = "time_of_day",
                step = snapshot.step,
                time_of_day = snapshot.time_of_day,
                "{} begins",
                snapshot.time_of_day
            );
            self.last_time_of_day = Some(snapshot.time_of_day);
        }
        if self.last_viable == Some(true) && !snapshot.viable {
            info!(
                event = "collapse",
                step = snapshot.step,
                stats = %snapshot.stats(),
                "Fewer than two species remain"
            );
        }
        self.last_viable = Some(snapshot.viable);
    }
}
