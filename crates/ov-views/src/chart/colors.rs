//! Medal-tier bubble palette

use egui::Color32;

use ov_core::Season;

/// Countries with no medals this edition.
pub const NO_MEDAL: Color32 = Color32::from_rgb(0xb4, 0xb4, 0xb4);

/// Screen background behind the chart.
pub const SCREEN_BG: Color32 = Color32::from_rgb(0xe5, 0xe5, 0xe5);

/// Axis lines and secondary labels.
pub const LABEL_AND_LINE: Color32 = Color32::from_rgb(0x5a, 0x5a, 0x5a);

/// Slider anchor and hovered controls.
pub const ACCENT: Color32 = Color32::from_rgb(0xff, 0x55, 0x5f);

/// Quartile tiers from lowest to highest medal share, warm palette for
/// Summer editions.
pub const SUMMER_TIERS: [Color32; 4] = [
    Color32::from_rgb(0xff, 0x55, 0x5f),
    Color32::from_rgb(0xff, 0x83, 0x3a),
    Color32::from_rgb(0xff, 0xb1, 0x14),
    Color32::from_rgb(0xff, 0xce, 0x19),
];

/// Cool palette for Winter editions, same tier ordering.
pub const WINTER_TIERS: [Color32; 4] = [
    Color32::from_rgb(0x00, 0x78, 0xd0),
    Color32::from_rgb(0x00, 0xe2, 0xde),
    Color32::from_rgb(0x00, 0xdd, 0x81),
    Color32::from_rgb(0x80, 0xd2, 0x37),
];

/// Tier colour for a medal value against the edition maximum: quartile
/// buckets of `value / max` pick from the season palette, non-positive
/// values read as no medal.
pub fn tier_color(value: f64, max: f64, season: Season) -> Color32 {
    if value <= 0.0 || max <= 0.0 {
        return NO_MEDAL;
    }
    let tiers = match season {
        Season::Summer => &SUMMER_TIERS,
        Season::Winter => &WINTER_TIERS,
    };
    let p = value / max;
    if p <= 0.25 {
        tiers[0]
    } else if p <= 0.50 {
        tiers[1]
    } else if p <= 0.75 {
        tiers[2]
    } else {
        tiers[3]
    }
}

/// Half-transparent variant used for every bubble except the selected one.
pub fn dimmed(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 127)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_missing_values_are_grey() {
        assert_eq!(tier_color(0.0, 50.0, Season::Summer), NO_MEDAL);
        assert_eq!(tier_color(-1.0, 50.0, Season::Winter), NO_MEDAL);
        assert_eq!(tier_color(10.0, 0.0, Season::Summer), NO_MEDAL);
    }

    #[test]
    fn quartiles_pick_increasing_tiers() {
        let max = 100.0;
        assert_eq!(tier_color(10.0, max, Season::Summer), SUMMER_TIERS[0]);
        assert_eq!(tier_color(25.0, max, Season::Summer), SUMMER_TIERS[0]);
        assert_eq!(tier_color(40.0, max, Season::Summer), SUMMER_TIERS[1]);
        assert_eq!(tier_color(75.0, max, Season::Summer), SUMMER_TIERS[2]);
        assert_eq!(tier_color(76.0, max, Season::Summer), SUMMER_TIERS[3]);
        assert_eq!(tier_color(100.0, max, Season::Summer), SUMMER_TIERS[3]);
    }

    #[test]
    fn seasons_use_disjoint_palettes() {
        for value in [10.0, 40.0, 60.0, 90.0] {
            let summer = tier_color(value, 100.0, Season::Summer);
            let winter = tier_color(value, 100.0, Season::Winter);
            assert_ne!(summer, winter);
        }
    }
}
