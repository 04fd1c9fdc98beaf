//! Run settings read from `CITY_*` environment variables.

use std::fs;
use std::path::PathBuf;

use bevy::log::{info, warn};

use cityscape::{CityError, ContributionCalendar, GlyphSet, SceneConfig, Week, WindowRng};

pub const DEFAULT_OUTPUT: &str = "contribution-city.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    Sample,
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub preset: String,
    pub config_path: Option<PathBuf>,
    pub calendar_path: Option<PathBuf>,
    pub output: PathBuf,
    pub seed: Option<u64>,
    pub glyph_dir: Option<PathBuf>,
    pub fallback: FallbackKind,
}

impl Settings {
    pub fn from_env() -> Result<Self, CityError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset and empty values are the same.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CityError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let seed = match get("CITY_SEED") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| CityError::Config(format!("CITY_SEED '{raw}': {e}")))?,
            ),
            None => None,
        };
        let fallback = match get("CITY_FALLBACK").as_deref().map(str::trim) {
            None | Some("sample") => FallbackKind::Sample,
            Some("random") => FallbackKind::Random,
            Some(other) => {
                return Err(CityError::Config(format!(
                    "CITY_FALLBACK '{other}' is neither 'sample' nor 'random'"
                )))
            }
        };

        Ok(Self {
            preset: get("CITY_PRESET").unwrap_or_else(|| "classic".to_string()),
            config_path: get("CITY_CONFIG").map(PathBuf::from),
            calendar_path: get("CITY_CALENDAR").map(PathBuf::from),
            output: get("CITY_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            seed,
            glyph_dir: get("CITY_GLYPH_DIR").map(PathBuf::from),
            fallback,
        })
    }

    /// The config file if one is given, else the named preset. `CITY_SEED`
    /// overrides the config's seed.
    pub fn scene_config(&self) -> Result<SceneConfig, CityError> {
        let mut config = match &self.config_path {
            Some(path) => {
                info!("Loading scene config from {}", path.display());
                SceneConfig::from_json(&fs::read_to_string(path)?)?
            }
            None => SceneConfig::preset(&self.preset)?,
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }

    /// The newest `days` days of the saved calendar. Every failure to obtain
    /// one is `DataUnavailable`, except days that violate the contract.
    pub fn fetched_week(&self, days: usize) -> Result<Week, CityError> {
        let path = self.calendar_path.as_ref().ok_or_else(|| {
            CityError::DataUnavailable("CITY_CALENDAR is not set".to_string())
        })?;
        let text = fs::read_to_string(path).map_err(|e| {
            CityError::DataUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        ContributionCalendar::from_json(&text)?.last_days(days)
    }

    /// Week used when the calendar is unavailable, ending today.
    pub fn fallback_week(&self, days: usize, rng: &mut WindowRng) -> Week {
        let today = chrono::Local::now().date_naive();
        match self.fallback {
            FallbackKind::Sample => Week::sample(today, days),
            FallbackKind::Random => Week::random(today, days, &mut rng.0),
        }
    }

    /// Glyph fragments, if a directory is configured and readable.
    pub fn glyphs(&self) -> Option<GlyphSet> {
        let dir = self.glyph_dir.as_ref()?;
        match GlyphSet::load_dir(dir) {
            Ok(set) => Some(set),
            Err(e) => {
                warn!("Glyph directory {} unusable: {e}", dir.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, CityError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).expect("defaults");
        assert_eq!(s.preset, "classic");
        assert_eq!(s.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(s.fallback, FallbackKind::Sample);
        assert_eq!(s.seed, None);
        assert!(s.calendar_path.is_none());
    }

    #[test]
    fn test_seed_and_fallback_parse() {
        let s = settings(&[("CITY_SEED", " 77 "), ("CITY_FALLBACK", "random")]).expect("valid");
        assert_eq!(s.seed, Some(77));
        assert_eq!(s.fallback, FallbackKind::Random);
    }

    #[test]
    fn test_bad_seed_is_config_error() {
        assert!(matches!(
            settings(&[("CITY_SEED", "soon")]),
            Err(CityError::Config(_))
        ));
        assert!(matches!(
            settings(&[("CITY_FALLBACK", "zero")]),
            Err(CityError::Config(_))
        ));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let s = settings(&[("CITY_OUTPUT", ""), ("CITY_PRESET", "  ")]).expect("valid");
        assert_eq!(s.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(s.preset, "classic");
    }

    #[test]
    fn test_seed_overrides_preset() {
        let s = settings(&[("CITY_PRESET", "compact"), ("CITY_SEED", "5")]).expect("valid");
        let config = s.scene_config().expect("config");
        assert_eq!(config.days, 6);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_missing_calendar_is_unavailable() {
        let s = settings(&[]).expect("defaults");
        assert!(matches!(
            s.fetched_week(7),
            Err(CityError::DataUnavailable(_))
        ));
        let s = settings(&[("CITY_CALENDAR", "/no/such/calendar.json")]).expect("valid");
        assert!(matches!(
            s.fetched_week(7),
            Err(CityError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_fallback_week_has_requested_days() {
        let mut rng = WindowRng::from_seed_u64(3);
        let sample = settings(&[]).expect("defaults").fallback_week(6, &mut rng);
        assert_eq!(sample.len(), 6);
        let random = settings(&[("CITY_FALLBACK", "random")])
            .expect("valid")
            .fallback_week(7, &mut rng);
        assert_eq!(random.len(), 7);
    }
}
