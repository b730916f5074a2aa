use serde::{Deserialize, Serialize};

/// Visual fidelity presets for the terminal skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Potato,
    Low,
    Medium,
    High,
}

impl PerformanceTier {
    pub const ALL: [PerformanceTier; 4] = [
        PerformanceTier::High,
        PerformanceTier::Medium,
        PerformanceTier::Low,
        PerformanceTier::Potato,
    ];

    fn from_score(score: i32) -> Self {
        match score {
            s if s >= 5 => PerformanceTier::High,
            s if s >= 3 => PerformanceTier::Medium,
            s if s >= 1 => PerformanceTier::Low,
            _ => PerformanceTier::Potato,
        }
    }
}

/// What the browser reports about the device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    /// `navigator.deviceMemory`, in GB.
    pub device_memory_gb: Option<f64>,
    /// `navigator.hardwareConcurrency`.
    pub hardware_concurrency: Option<u32>,
    #[serde(default)]
    pub is_mobile: bool,
    #[serde(default)]
    pub prefers_reduced_motion: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectSettings {
    pub matrix_rain: bool,
    pub particle_count: u32,
    pub glitch_text: bool,
    pub typewriter: bool,
    pub scroll_animations: bool,
    pub crt_scanlines: bool,
    pub blur_filters: bool,
    pub target_fps: u32,
}

impl EffectSettings {
    pub fn for_tier(tier: PerformanceTier) -> Self {
        match tier {
            PerformanceTier::High => EffectSettings {
                matrix_rain: true,
                particle_count: 150,
                glitch_text: true,
                typewriter: true,
                scroll_animations: true,
                crt_scanlines: true,
                blur_filters: true,
                target_fps: 60,
            },
            PerformanceTier::Medium => EffectSettings {
                matrix_rain: true,
                particle_count: 80,
                glitch_text: true,
                typewriter: true,
                scroll_animations: true,
                crt_scanlines: true,
                blur_filters: false,
                target_fps: 60,
            },
            PerformanceTier::Low => EffectSettings {
                matrix_rain: false,
                particle_count: 30,
                glitch_text: false,
                typewriter: true,
                scroll_animations: true,
                crt_scanlines: true,
                blur_filters: false,
                target_fps: 30,
            },
            PerformanceTier::Potato => EffectSettings {
                matrix_rain: false,
                particle_count: 0,
                glitch_text: false,
                typewriter: true,
                scroll_animations: false,
                crt_scanlines: false,
                blur_filters: false,
                target_fps: 30,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TierPreset {
    pub tier: PerformanceTier,
    pub settings: EffectSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerformanceRequest {
    #[serde(flatten)]
    pub capabilities: DeviceCapabilities,
    /// A tier the visitor picked by hand.
    pub override_tier: Option<PerformanceTier>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceRecommendation {
    pub tier: PerformanceTier,
    pub detected_tier: PerformanceTier,
    pub score: i32,
    pub overridden: bool,
    pub settings: EffectSettings,
}

fn memory_points(memory_gb: Option<f64>) -> i32 {
    match memory_gb {
        None => 1,
        Some(m) if m >= 8.0 => 3,
        Some(m) if m >= 4.0 => 2,
        Some(m) if m >= 2.0 => 1,
        Some(_) => 0,
    }
}

fn core_points(cores: Option<u32>) -> i32 {
    match cores {
        None => 1,
        Some(c) if c >= 8 => 3,
        Some(c) if c >= 4 => 2,
        Some(c) if c >= 2 => 1,
        Some(_) => 0,
    }
}

/// Heuristic device score in `-1..=6`.
pub fn score_capabilities(caps: &DeviceCapabilities) -> i32 {
    let mobile_penalty = if caps.is_mobile { 1 } else { 0 };
    memory_points(caps.device_memory_gb) + core_points(caps.hardware_concurrency) - mobile_penalty
}

/// Reduced-motion visitors never get more than `Low`.
pub fn detect_tier(caps: &DeviceCapabilities) -> PerformanceTier {
    let tier = PerformanceTier::from_score(score_capabilities(caps));
    if caps.prefers_reduced_motion {
        tier.min(PerformanceTier::Low)
    } else {
        tier
    }
}

pub fn recommend(request: &PerformanceRequest) -> PerformanceRecommendation {
    let detected_tier = detect_tier(&request.capabilities);
    let tier = request.override_tier.unwrap_or(detected_tier);

    PerformanceRecommendation {
        tier,
        detected_tier,
        score: score_capabilities(&request.capabilities),
        overridden: request.override_tier.is_some(),
        settings: EffectSettings::for_tier(tier),
    }
}

pub fn tier_presets() -> Vec<TierPreset> {
    PerformanceTier::ALL
        .iter()
        .map(|&tier| TierPreset { tier, settings: EffectSettings::for_tier(tier) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(memory: Option<f64>, cores: Option<u32>, mobile: bool) -> DeviceCapabilities {
        DeviceCapabilities {
            device_memory_gb: memory,
            hardware_concurrency: cores,
            is_mobile: mobile,
            prefers_reduced_motion: false,
        }
    }

    #[test]
    fn desktop_workstation_is_high() {
        assert_eq!(detect_tier(&caps(Some(16.0), Some(12), false)), PerformanceTier::High);
    }

    #[test]
    fn mid_range_phone_is_medium() {
        // 2 + 2 - 1
        assert_eq!(detect_tier(&caps(Some(4.0), Some(4), true)), PerformanceTier::Medium);
    }

    #[test]
    fn budget_phone_is_potato() {
        assert_eq!(score_capabilities(&caps(Some(1.0), Some(2), true)), 0);
        assert_eq!(detect_tier(&caps(Some(1.0), Some(2), true)), PerformanceTier::Potato);
    }

    #[test]
    fn unknown_hardware_lands_on_low() {
        assert_eq!(detect_tier(&caps(None, None, true)), PerformanceTier::Low);
        assert_eq!(detect_tier(&DeviceCapabilities::default()), PerformanceTier::Low);
    }

    #[test]
    fn reduced_motion_caps_tier() {
        let mut strong = caps(Some(16.0), Some(16), false);
        strong.prefers_reduced_motion = true;
        assert_eq!(detect_tier(&strong), PerformanceTier::Low);
    }

    #[test]
    fn override_wins_but_detection_is_reported() {
        let request = PerformanceRequest {
            capabilities: caps(Some(16.0), Some(12), false),
            override_tier: Some(PerformanceTier::Potato),
        };

        let rec = recommend(&request);
        assert_eq!(rec.tier, PerformanceTier::Potato);
        assert_eq!(rec.detected_tier, PerformanceTier::High);
        assert!(rec.overridden);
        assert_eq!(rec.settings.particle_count, 0);
    }

    #[test]
    fn presets_get_cheaper_down_the_tiers() {
        let presets = tier_presets();
        assert_eq!(presets.len(), 4);
        assert!(presets.windows(2).all(|w| w[0].settings.particle_count >= w[1].settings.particle_count));
    }
}
