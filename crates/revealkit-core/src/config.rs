use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::motion::Easing;
use crate::viewport::Anchor;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub smooth_scroll: SmoothScrollConfig,
    #[serde(default)]
    pub slider: SliderConfig,
    #[serde(default)]
    pub hero: HeroConfig,
    #[serde(default)]
    pub intro: IntroConfig,
    #[serde(default)]
    pub trust: TrustConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub about: AboutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Inertial page scrolling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothScrollConfig {
    /// Enable smooth scrolling; when off, input jumps immediately
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds to reach a new scroll target
    #[serde(default = "default_smooth_duration")]
    pub duration_secs: f64,
    #[serde(default = "default_smooth_easing")]
    pub easing: Easing,
    #[serde(default = "default_wheel_multiplier")]
    pub wheel_multiplier: f64,
    #[serde(default = "default_touch_multiplier")]
    pub touch_multiplier: f64,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            duration_secs: default_smooth_duration(),
            easing: default_smooth_easing(),
            wheel_multiplier: default_wheel_multiplier(),
            touch_multiplier: default_touch_multiplier(),
        }
    }
}

/// Hero background slideshow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderConfig {
    /// Time each slide stays active
    #[serde(default = "default_slide_interval")]
    pub interval_ms: u64,
    /// Delay between the old slide leaving and the new one activating
    #[serde(default = "default_slide_enter_delay")]
    pub enter_delay_ms: u64,
    /// How long the `exiting` class stays on the old slide
    #[serde(default = "default_slide_exit")]
    pub exit_ms: u64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_slide_interval(),
            enter_delay_ms: default_slide_enter_delay(),
            exit_ms: default_slide_exit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroConfig {
    /// Wait before the entrance timeline starts
    #[serde(default = "default_hero_delay")]
    pub delay_secs: f64,
    #[serde(default = "default_power3_out")]
    pub ease: Easing,
    /// Overlap between the three service labels
    #[serde(default = "default_hero_service_overlap")]
    pub service_overlap_secs: f64,
    #[serde(default = "default_hero_title_overlap")]
    pub title_overlap_secs: f64,
    #[serde(default = "default_hero_ctas_overlap")]
    pub ctas_overlap_secs: f64,
    /// Seconds the parallax takes to catch up with the scroll position
    #[serde(default = "default_scrub_lag")]
    pub scrub_lag_secs: f64,
    #[serde(default = "default_hero_title_shift")]
    pub title_shift: f64,
    #[serde(default = "default_hero_title_scale")]
    pub title_scale: f64,
    #[serde(default = "default_hero_services_shift")]
    pub services_shift: f64,
    #[serde(default = "default_hero_ctas_shift")]
    pub ctas_shift: f64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_hero_delay(),
            ease: default_power3_out(),
            service_overlap_secs: default_hero_service_overlap(),
            title_overlap_secs: default_hero_title_overlap(),
            ctas_overlap_secs: default_hero_ctas_overlap(),
            scrub_lag_secs: default_scrub_lag(),
            title_shift: default_hero_title_shift(),
            title_scale: default_hero_title_scale(),
            services_shift: default_hero_services_shift(),
            ctas_shift: default_hero_ctas_shift(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroConfig {
    /// Visible fraction of the section that starts the word reveal
    #[serde(default = "default_intro_threshold")]
    pub threshold: f64,
    /// Scroll distance allotted to each word while pinned
    #[serde(default = "default_intro_px_per_word")]
    pub px_per_word: f64,
    #[serde(default = "default_intro_word_duration")]
    pub word_duration_secs: f64,
    #[serde(default = "default_power2_out")]
    pub ease: Easing,
    #[serde(default = "default_intro_image_duration")]
    pub image_duration_secs: f64,
    /// Fractions of the word count at which each image appears
    #[serde(default = "default_intro_image_marks")]
    pub image_marks: Vec<f64>,
    #[serde(default = "default_scrub_lag")]
    pub scrub_lag_secs: f64,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            threshold: default_intro_threshold(),
            px_per_word: default_intro_px_per_word(),
            word_duration_secs: default_intro_word_duration(),
            ease: default_power2_out(),
            image_duration_secs: default_intro_image_duration(),
            image_marks: default_intro_image_marks(),
            scrub_lag_secs: default_scrub_lag(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Scroll anchor that reveals the figures, e.g. "top 80%"
    #[serde(default = "default_trust_start")]
    pub start: String,
    /// Vertical distance the figures rise from
    #[serde(default = "default_trust_rise")]
    pub rise: f64,
    #[serde(default = "default_trust_duration")]
    pub duration_secs: f64,
    #[serde(default = "default_trust_stagger")]
    pub stagger_secs: f64,
    #[serde(default = "default_power3_out")]
    pub ease: Easing,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            start: default_trust_start(),
            rise: default_trust_rise(),
            duration_secs: default_trust_duration(),
            stagger_secs: default_trust_stagger(),
            ease: default_power3_out(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_services_threshold")]
    pub threshold: f64,
    #[serde(default = "default_scrub_lag")]
    pub scrub_lag_secs: f64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            threshold: default_services_threshold(),
            scrub_lag_secs: default_scrub_lag(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutConfig {
    /// Start delays for title, intro and image
    #[serde(default = "default_about_delays")]
    pub delays_secs: Vec<f64>,
    #[serde(default = "default_about_duration")]
    pub duration_secs: f64,
    #[serde(default = "default_power3_out")]
    pub ease: Easing,
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            delays_secs: default_about_delays(),
            duration_secs: default_about_duration(),
            ease: default_power3_out(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_smooth_duration() -> f64 {
    1.2
}

fn default_smooth_easing() -> Easing {
    Easing::Lenis
}

fn default_wheel_multiplier() -> f64 {
    1.0
}

fn default_touch_multiplier() -> f64 {
    2.0
}

fn default_slide_interval() -> u64 {
    3000
}

fn default_slide_enter_delay() -> u64 {
    50
}

fn default_slide_exit() -> u64 {
    3000
}

fn default_power2_out() -> Easing {
    Easing::POWER2_OUT
}

fn default_power3_out() -> Easing {
    Easing::POWER3_OUT
}

fn default_scrub_lag() -> f64 {
    1.0
}

fn default_hero_delay() -> f64 {
    0.5
}

fn default_hero_service_overlap() -> f64 {
    0.8
}

fn default_hero_title_overlap() -> f64 {
    0.5
}

fn default_hero_ctas_overlap() -> f64 {
    0.6
}

fn default_hero_title_shift() -> f64 {
    -280.0
}

fn default_hero_title_scale() -> f64 {
    0.95
}

fn default_hero_services_shift() -> f64 {
    -450.0
}

fn default_hero_ctas_shift() -> f64 {
    -150.0
}

fn default_intro_threshold() -> f64 {
    0.3
}

fn default_intro_px_per_word() -> f64 {
    100.0
}

fn default_intro_word_duration() -> f64 {
    0.5
}

fn default_intro_image_duration() -> f64 {
    2.0
}

fn default_intro_image_marks() -> Vec<f64> {
    vec![0.1, 0.3, 0.5, 0.7]
}

fn default_trust_start() -> String {
    "top 80%".to_string()
}

fn default_trust_rise() -> f64 {
    30.0
}

fn default_trust_duration() -> f64 {
    1.0
}

fn default_trust_stagger() -> f64 {
    0.15
}

fn default_services_threshold() -> f64 {
    0.1
}

fn default_about_delays() -> Vec<f64> {
    vec![0.5, 0.8, 1.1]
}

fn default_about_duration() -> f64 {
    0.8
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<PathBuf> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(config_path)
    }

    /// Get the configuration file path
    /// Always uses ~/.config/revealkit/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("revealkit")
            .join("config.toml")
    }

    /// Reject values the controllers cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        self.trust_start()?;

        for (name, threshold) in [
            ("intro.threshold", self.intro.threshold),
            ("services.threshold", self.services.threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(crate::Error::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    name, threshold
                )));
            }
        }

        if self.smooth_scroll.duration_secs < 0.0 {
            return Err(crate::Error::Config(
                "smooth_scroll.duration_secs must not be negative".to_string(),
            ));
        }
        if self.slider.interval_ms == 0 {
            return Err(crate::Error::Config(
                "slider.interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed trust reveal anchor
    pub fn trust_start(&self) -> crate::Result<Anchor> {
        self.trust.start.parse()
    }
}
