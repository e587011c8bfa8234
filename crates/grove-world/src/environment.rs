//! Day/night cycle and weather.
//!
//! The clock starts at day and flips every `day_length` steps. Weather is
//! three sticky flags (rain, snow, sun) that the driver toggles at random;
//! what the agents see is the [`WeatherState`] those flags resolve to:
//!
//! | rain | snow | sun | state          |
//! |------|------|-----|----------------|
//! | yes  | no   | no  | DrabRain       |
//! | no   | yes  | no  | NicelySnowing  |
//! | yes  | yes  | any | TotallyFrozen  |
//! | no   | no   | yes | ExceedinglyHot |
//! | other combinations | | | ClearDay  |
//!
//! The weather decides whether an agent whose time of day it is gets to act.

use grove_core::EnvironmentConfig;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day/night state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    is_day: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self { is_day: true }
    }
}

impl Clock {
    pub fn is_day(&self) -> bool {
        self.is_day
    }

    pub fn toggle(&mut self) {
        self.is_day = !self.is_day;
    }

    pub fn label(&self) -> &'static str {
        if self.is_day {
            "Day"
        } else {
            "Night"
        }
    }
}

/// A weather flag flipped by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherEvent {
    Rain,
    Snow,
    Sun,
}

/// What the weather flags add up to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherState {
    ClearDay,
    DrabRain,
    NicelySnowing,
    TotallyFrozen,
    ExceedinglyHot,
}

impl WeatherState {
    pub fn label(&self) -> &'static str {
        match self {
            WeatherState::ClearDay => "Clear Day",
            WeatherState::DrabRain => "Drab Rain",
            WeatherState::NicelySnowing => "Nicely Snowing",
            WeatherState::TotallyFrozen => "Totally Frozen",
            WeatherState::ExceedinglyHot => "Exceedingly Hot",
        }
    }
}

impl fmt::Display for WeatherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three sticky weather flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    raining: bool,
    snowing: bool,
    sunny: bool,
}

impl Weather {
    pub fn toggle(&mut self, event: WeatherEvent) {
        match event {
            WeatherEvent::Rain => self.raining = !self.raining,
            WeatherEvent::Snow => self.snowing = !self.snowing,
            WeatherEvent::Sun => self.sunny = !self.sunny,
        }
    }

    pub fn state(&self) -> WeatherState {
        match (self.raining, self.snowing, self.sunny) {
            (true, false, false) => WeatherState::DrabRain,
            (false, true, false) => WeatherState::NicelySnowing,
            (true, true, _) => WeatherState::TotallyFrozen,
            (false, false, true) => WeatherState::ExceedinglyHot,
            _ => WeatherState::ClearDay,
        }
    }
}

/// Outcome of the activity gate for one agent on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Does nothing this tick
    Idle,
    Act,
    /// Acts, then risks dying of the heat
    ActExposed,
}

/// Clock, weather and the rules that combine them
#[derive(Debug, Clone)]
pub struct Environment {
    clock: Clock,
    weather: Weather,
    config: EnvironmentConfig,
}

impl Environment {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            clock: Clock::default(),
            weather: Weather::default(),
            config,
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn state(&self) -> WeatherState {
        self.weather.state()
    }

    /// Back to day with no weather flags set
    pub fn reset(&mut self) {
        self.clock = Clock::default();
        self.weather = Weather::default();
    }

    /// Advance to `step`: maybe flip day/night, then roll rain, snow and
    /// sun in that order, stopping at the first flag that toggles.
    pub fn advance(&mut self, step: u64, rng: &mut ChaCha8Rng) -> Option<WeatherEvent> {
        if step % self.config.day_length == 0 {
            self.clock.toggle();
        }

        let event = if rng.gen_bool(self.config.rain_probability) {
            Some(WeatherEvent::Rain)
        } else if rng.gen_bool(self.config.snow_probability) {
            Some(WeatherEvent::Snow)
        } else if rng.gen_bool(self.config.sun_probability) {
            Some(WeatherEvent::Sun)
        } else {
            None
        };
        if let Some(event) = event {
            self.weather.toggle(event);
        }
        event
    }

    /// Whether an agent may act this tick. Agents only act in their own time
    /// of day; rain and snow let them act with some chance, frost never.
    /// Only agents in their own time of day consume a roll.
    pub fn activity(&self, nocturnal: bool, rng: &mut ChaCha8Rng) -> Activity {
        if nocturnal == self.clock.is_day() {
            return Activity::Idle;
        }
        match self.weather.state() {
            WeatherState::ClearDay => Activity::Act,
            WeatherState::ExceedinglyHot => Activity::ActExposed,
            WeatherState::NicelySnowing => {
                if rng.gen_bool(self.config.snow_act_chance) {
                    Activity::Act
                } else {
                    Activity::Idle
                }
            }
            WeatherState::DrabRain => {
                if rng.gen_bool(self.config.rain_act_chance) {
                    Activity::Act
                } else {
                    Activity::Idle
                }
            }
            WeatherState::TotallyFrozen => Activity::Idle,
        }
    }

    /// Roll for death after acting in extreme heat
    pub fn heat_strikes(&self, rng: &mut ChaCha8Rng) -> bool {
        rng.gen_bool(self.config.heat_death_chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn weather_with(events: &[WeatherEvent]) -> Weather {
        let mut weather = Weather::default();
        for event in events {
            weather.toggle(*event);
        }
        weather
    }

    fn calm() -> EnvironmentConfig {
        EnvironmentConfig {
            rain_probability: 0.0,
            snow_probability: 0.0,
            sun_probability: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_clock_labels() {
        let mut clock = Clock::default();
        assert_eq!(clock.label(), "Day");
        clock.toggle();
        assert_eq!(clock.label(), "Night");
    }

    #[test]
    fn test_weather_state_priority() {
        use WeatherEvent::*;

        assert_eq!(weather_with(&[]).state(), WeatherState::ClearDay);
        assert_eq!(weather_with(&[Rain]).state(), WeatherState::DrabRain);
        assert_eq!(weather_with(&[Snow]).state(), WeatherState::NicelySnowing);
        assert_eq!(weather_with(&[Sun]).state(), WeatherState::ExceedinglyHot);
        assert_eq!(weather_with(&[Rain, Snow]).state(), WeatherState::TotallyFrozen);
        assert_eq!(weather_with(&[Rain, Snow, Sun]).state(), WeatherState::TotallyFrozen);
        // Sun only counts when it is the only flag
        assert_eq!(weather_with(&[Rain, Sun]).state(), WeatherState::ClearDay);
        assert_eq!(weather_with(&[Snow, Sun]).state(), WeatherState::ClearDay);
    }

    #[test]
    fn test_toggles_are_sticky_flips() {
        let mut weather = weather_with(&[WeatherEvent::Rain]);
        assert_eq!(weather.state(), WeatherState::DrabRain);
        weather.toggle(WeatherEvent::Rain);
        assert_eq!(weather.state(), WeatherState::ClearDay);
        assert_eq!(weather, Weather::default());
    }

    #[test]
    fn test_labels() {
        assert_eq!(WeatherState::DrabRain.to_string(), "Drab Rain");
        assert_eq!(WeatherState::TotallyFrozen.label(), "Totally Frozen");
    }

    #[test]
    fn test_day_night_flips_every_two_steps() {
        let mut env = Environment::new(calm());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let days: Vec<bool> = (1..=6)
            .map(|step| {
                env.advance(step, &mut rng);
                env.clock().is_day()
            })
            .collect();
        assert_eq!(days, vec![true, false, false, true, true, false]);
    }

    #[test]
    fn test_rain_takes_precedence_over_other_rolls() {
        let mut env = Environment::new(EnvironmentConfig {
            rain_probability: 1.0,
            snow_probability: 1.0,
            sun_probability: 1.0,
            ..Default::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(env.advance(1, &mut rng), Some(WeatherEvent::Rain));
        assert_eq!(env.state(), WeatherState::DrabRain);
        assert_eq!(env.advance(2, &mut rng), Some(WeatherEvent::Rain));
        assert_eq!(env.state(), WeatherState::ClearDay);
    }

    #[test]
    fn test_activity_follows_time_of_day() {
        let mut env = Environment::new(calm());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(env.activity(false, &mut rng), Activity::Act);
        assert_eq!(env.activity(true, &mut rng), Activity::Idle);

        env.clock.toggle();
        assert_eq!(env.activity(false, &mut rng), Activity::Idle);
        assert_eq!(env.activity(true, &mut rng), Activity::Act);
    }

    #[test]
    fn test_activity_under_weather() {
        let mut env = Environment::new(EnvironmentConfig {
            rain_act_chance: 0.0,
            snow_act_chance: 1.0,
            ..calm()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        env.weather.toggle(WeatherEvent::Rain);
        assert_eq!(env.activity(false, &mut rng), Activity::Idle);

        env.weather.toggle(WeatherEvent::Snow);
        assert_eq!(env.activity(false, &mut rng), Activity::Idle);

        env.weather.toggle(WeatherEvent::Rain);
        assert_eq!(env.activity(false, &mut rng), Activity::Act);

        env.weather = weather_with(&[WeatherEvent::Sun]);
        assert_eq!(env.activity(false, &mut rng), Activity::ActExposed);
    }

    #[test]
    fn test_reset_restores_day_and_clear_weather() {
        let mut env = Environment::new(calm());
        env.clock.toggle();
        env.weather.toggle(WeatherEvent::Snow);
        env.reset();
        assert!(env.clock().is_day());
        assert_eq!(env.state(), WeatherState::ClearDay);
    }
}
