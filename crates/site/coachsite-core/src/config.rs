//! Tunable constants for every controller.
//!
//! Hosts may pass a partial JSON object; anything left out keeps the value
//! the live site ships with.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::notify::ToastKind;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub breakpoints: Breakpoints,
    pub gallery: GalleryConfig,
    pub references: ReferencesConfig,
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub toast: ToastConfig,
    pub nav: NavConfig,
    pub effects: EffectsConfig,
    pub modal: ModalConfig,
    pub messages: Messages,
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Viewport widths (inclusive upper bounds) that pick the gallery's items-per-view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub phone_max: f64,
    pub tablet_max: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            phone_max: 480.0,
            tablet_max: 768.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Used when the track's computed gap is missing or zero.
    pub fallback_gap_px: f64,
    pub resize_debounce_ms: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            fallback_gap_px: 24.0,
            resize_debounce_ms: 250,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    /// Horizontal travel a touch must exceed to count as a swipe.
    pub swipe_threshold_px: f64,
    pub drag_multiplier: f64,
    pub slide_transition: String,
    pub resize_debounce_ms: u32,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: 50.0,
            drag_multiplier: 2.0,
            slide_transition: "transform 0.6s cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
            resize_debounce_ms: 250,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub element_threshold: f64,
    pub element_bottom_margin_px: f64,
    pub section_threshold: f64,
    pub section_bottom_margin_px: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            element_threshold: 0.1,
            element_bottom_margin_px: 50.0,
            section_threshold: 0.15,
            section_bottom_margin_px: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub duration_ms: u32,
    pub steps: u32,
    pub threshold: f64,
}

impl CounterConfig {
    pub fn step_ms(&self) -> u32 {
        self.duration_ms / self.steps.max(1)
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            steps: 100,
            threshold: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub enter_delay_ms: u32,
    pub display_ms: u32,
    pub exit_ms: u32,
    pub success_color: String,
    pub error_color: String,
    pub info_color: String,
    pub warning_color: String,
}

impl ToastConfig {
    pub fn color(&self, kind: ToastKind) -> &str {
        match kind {
            ToastKind::Success => &self.success_color,
            ToastKind::Error => &self.error_color,
            ToastKind::Info => &self.info_color,
            ToastKind::Warning => &self.warning_color,
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: 100,
            display_ms: 5000,
            exit_ms: 300,
            success_color: "#10b981".to_string(),
            error_color: "#ef4444".to_string(),
            info_color: "#3b82f6".to_string(),
            warning_color: "#f59e0b".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub scrolled_offset_px: f64,
    pub active_section_offset_px: f64,
    /// Height of the fixed navbar subtracted from anchor targets.
    pub anchor_offset_px: f64,
    pub scroll_throttle_ms: u32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scrolled_offset_px: 50.0,
            active_section_offset_px: 200.0,
            anchor_offset_px: 70.0,
            scroll_throttle_ms: 16,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub parallax_speed: f64,
    pub ripple_ms: u32,
    pub loading_stagger_ms: u32,
    pub reflow_debounce_ms: u32,
    pub reflow_restore_ms: u32,
    pub hover_transition: String,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            parallax_speed: 0.5,
            ripple_ms: 600,
            loading_stagger_ms: 200,
            reflow_debounce_ms: 250,
            reflow_restore_ms: 10,
            hover_transition: "all 0.3s ease-in-out".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    pub fade_ms: u32,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self { fade_ms: 300 }
    }
}

/// User-facing toast texts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub missing_fields: String,
    pub invalid_email: String,
    pub submitted: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            missing_fields: "Lütfen tüm gerekli alanları doldurun.".to_string(),
            invalid_email: "Lütfen geçerli bir e-posta adresi girin.".to_string(),
            submitted: "Mesajınız başarıyla gönderildi! En kısa sürede size dönüş yapacağım."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SiteConfig::from_json(r#"{ "gallery": { "fallback_gap_px": 16 } }"#).unwrap();
        assert_eq!(cfg.gallery.fallback_gap_px, 16.0);
        assert_eq!(cfg.gallery.resize_debounce_ms, 250);
        assert_eq!(cfg.breakpoints, Breakpoints::default());
        assert_eq!(cfg.counter.step_ms(), 20);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SiteConfig::from_json("{ \"nav\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toast_colors_are_distinct() {
        let t = ToastConfig::default();
        let colors = [
            t.color(ToastKind::Success),
            t.color(ToastKind::Error),
            t.color(ToastKind::Info),
            t.color(ToastKind::Warning),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
