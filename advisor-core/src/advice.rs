//! Advisory engine: turns a current-conditions snapshot plus a short forecast
//! window into ranked clothing/precaution cards and day-planning insights.
//!
//! Pure and stateless. Every numeric field is finiteness-checked before use:
//! missing data withdraws a card's eligibility instead of being coerced to
//! zero, and no input shape makes these functions fail.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::conditions::{mentions_rain, mentions_snow};
use crate::model::{CurrentConditions, ForecastPoint, Units};

/// UI-fit caps; card/chip lists are never longer than these.
pub const MAX_ADVICE_CARDS: usize = 4;
pub const MAX_ADVICE_CHIPS: usize = 6;
pub const MAX_FORECAST_CARDS: usize = 2;
pub const MAX_TIPS_CARDS: usize = 3;

/// Forecast prefix sizes at 3-hour sampling: ~12h for advice, ~24h for insights.
const ADVICE_WINDOW: usize = 4;
const INSIGHT_WINDOW: usize = 8;

/// Max probability-of-precipitation at which precipitation counts as likely.
const PRECIP_LIKELY_POP: f64 = 0.4;
/// Lower pop bound used only for the black-ice warning.
const ICE_RISK_POP: f64 = 0.3;
/// Near-freezing band (inclusive) where moisture means possible black ice.
const ICE_TEMP_MIN: f64 = -1.0;
const ICE_TEMP_MAX: f64 = 2.0;

/// Walk-slot score weights: `temp - pop * POP_SCORE_WEIGHT - wind_penalty`.
const POP_SCORE_WEIGHT: f64 = 14.0;
const WIND_PENALTY_WEIGHT: f64 = 0.9;

/// Feels-like above this reads as hot in the comfort bucket.
const HEAT_COMFORT_MIN: f64 = 30.0;

const PLACEHOLDER: &str = "—";

/// One clothing/precaution recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceCard {
    pub icon: String,
    pub title: String,
    pub body: String,
}

/// Output of [`compute_advice`]: a badge, up to four ranked cards and up to
/// six deduplicated chips in first-appearance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub badge: String,
    pub items: Vec<AdviceCard>,
    pub chips: Vec<String>,
}

/// One planning insight with short meta chips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightCard {
    pub icon: String,
    pub title: String,
    pub body: String,
    pub chips: Vec<String>,
}

/// Output of [`compute_insights`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insights {
    pub forecast_cards: Vec<InsightCard>,
    pub tips_cards: Vec<InsightCard>,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn round_i64(value: f64) -> i64 {
    value.round() as i64
}

fn pop_percent(pop: f64) -> i64 {
    round_i64(pop * 100.0)
}

fn lower_desc(desc: Option<&str>) -> String {
    desc.unwrap_or("").to_lowercase()
}

fn fmt_time_utc(unix: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix, 0) {
        Some(dt) => format!("{} UTC", dt.format("%H:%M")),
        None => PLACEHOLDER.to_string(),
    }
}

fn card(icon: &str, title: &str, body: String) -> AdviceCard {
    AdviceCard {
        icon: icon.to_string(),
        title: title.to_string(),
        body,
    }
}

/// Single pass over a forecast prefix: highest finite pop seen, first
/// non-empty description (lowercased), and whether any description in the
/// window mentions rain or snow.
struct WindowScan {
    max_pop: f64,
    first_desc: String,
    any_rain: bool,
    any_snow: bool,
}

fn scan_window(window: &[ForecastPoint]) -> WindowScan {
    let mut scan = WindowScan {
        max_pop: 0.0,
        first_desc: String::new(),
        any_rain: false,
        any_snow: false,
    };

    for point in window {
        if let Some(pop) = finite(point.pop) {
            scan.max_pop = scan.max_pop.max(pop);
        }
        let desc = lower_desc(point.desc.as_deref());
        if desc.is_empty() {
            continue;
        }
        if scan.first_desc.is_empty() {
            scan.first_desc = desc.clone();
        }
        scan.any_rain |= mentions_rain(&desc);
        scan.any_snow |= mentions_snow(&desc);
    }

    scan
}

/// Clothing advice: the reference temperature falls into exactly one of six
/// ascending bands, each with a fixed icon, wording and chips.
fn clothing_card(t: f64) -> (AdviceCard, &'static [&'static str]) {
    if t <= -15.0 {
        (
            card(
                "🧥",
                "Очень холодно",
                "Пуховик, шапка, шарф, перчатки. Лучше закрытая обувь.".to_string(),
            ),
            &["Пуховик", "Шапка", "Перчатки"],
        )
    } else if t <= -5.0 {
        (
            card(
                "🧣",
                "Холодно",
                "Тёплая куртка, шапка и перчатки будут кстати.".to_string(),
            ),
            &["Тёплая куртка", "Шапка"],
        )
    } else if t <= 5.0 {
        (
            card(
                "🧤",
                "Прохладно",
                "Куртка/пальто и закрытая обувь. Можно лёгкие перчатки.".to_string(),
            ),
            &["Куртка", "Закрытая обувь"],
        )
    } else if t <= 15.0 {
        (
            card(
                "🧢",
                "Комфортно",
                "Лёгкая куртка/ветровка или толстовка.".to_string(),
            ),
            &["Ветровка"],
        )
    } else if t <= 25.0 {
        (
            card(
                "👕",
                "Тепло",
                "Лёгкая одежда. На вечер можно взять тонкую кофту.".to_string(),
            ),
            &["Лёгкая одежда"],
        )
    } else {
        (
            card(
                "🕶️",
                "Жарко",
                "Лёгкая одежда, вода и головной убор.".to_string(),
            ),
            &["Вода", "Кепка"],
        )
    }
}

/// Compute clothing/precaution advice from current conditions and the next
/// ~12 hours of forecast.
///
/// Cards are emitted in priority order (clothing, wind, precipitation,
/// black-ice) and capped at [`MAX_ADVICE_CARDS`]; chips are deduplicated in
/// first-appearance order and capped at [`MAX_ADVICE_CHIPS`]. Inputs are
/// never mutated and no input shape panics.
pub fn compute_advice(current: &CurrentConditions, forecast: &[ForecastPoint], units: Units) -> Advice {
    // Reference temperature for clothing: feels-like when available.
    let t = finite(current.feels_like.or(current.temp));
    let wind = finite(current.wind_speed);
    let desc = lower_desc(current.desc.as_deref());

    let window = &forecast[..forecast.len().min(ADVICE_WINDOW)];
    let scan = scan_window(window);

    // Precipitation kind comes from the combined current + upcoming wording.
    let wet_text = format!("{} {}", desc, scan.first_desc);
    let is_rain = mentions_rain(&wet_text);
    let is_snow = mentions_snow(&wet_text);
    let precip_likely = scan.max_pop >= PRECIP_LIKELY_POP;

    let mut items = Vec::new();
    let mut chips: Vec<String> = Vec::new();

    if let Some(t) = t {
        let (item, band_chips) = clothing_card(t);
        items.push(item);
        chips.extend(band_chips.iter().map(|c| (*c).to_string()));
    }

    if let Some(wind) = wind {
        if wind >= units.windy_threshold() {
            items.push(card(
                "💨",
                "Ветрено",
                format!("Ветер {} {}. Лучше капюшон/ветровка.", wind, units.wind_label()),
            ));
            chips.push("Капюшон".to_string());
        }
    }

    if precip_likely {
        let kind = if is_snow {
            "снег"
        } else if is_rain {
            "дождь"
        } else {
            "осадки"
        };
        items.push(card(
            "☔",
            "Возможны осадки",
            format!(
                "Вероятность до {}%. Возьмите зонт ({kind}).",
                pop_percent(scan.max_pop)
            ),
        ));
        chips.push("Зонт".to_string());
    }

    if let Some(t) = t {
        if (ICE_TEMP_MIN..=ICE_TEMP_MAX).contains(&t) && (precip_likely || is_rain || is_snow) {
            items.push(card(
                "🧊",
                "Осторожно",
                "Температура около нуля — возможна гололедица. Выбирайте обувь с хорошей подошвой."
                    .to_string(),
            ));
            chips.push("Обувь с протектором".to_string());
        }
    }

    let badge = match t {
        Some(t) => format!("{}{}", round_i64(t), units.temp_symbol()),
        None => PLACEHOLDER.to_string(),
    };

    items.truncate(MAX_ADVICE_CARDS);

    let mut unique_chips: Vec<String> = Vec::new();
    for chip in chips {
        if !unique_chips.contains(&chip) {
            unique_chips.push(chip);
        }
    }
    unique_chips.truncate(MAX_ADVICE_CHIPS);

    Advice {
        badge,
        items,
        chips: unique_chips,
    }
}

struct WalkSlot<'a> {
    point: &'a ForecastPoint,
    score: f64,
    temp: f64,
    pop: f64,
    wind: Option<f64>,
}

/// Pick the forecast point that scores best for being outside: warm, dry,
/// not too windy. Strict `>` keeps the earliest point on score ties.
fn best_walk_slot<'a>(window: &'a [ForecastPoint], units: Units) -> Option<WalkSlot<'a>> {
    let mut best: Option<WalkSlot<'a>> = None;

    for point in window {
        let Some(temp) = finite(point.temp) else {
            continue;
        };
        let pop = finite(point.pop).unwrap_or(0.0);
        let wind = finite(point.wind_speed);
        let penalty = wind
            .map(|w| (w - units.stroll_wind_threshold()).max(0.0) * WIND_PENALTY_WEIGHT)
            .unwrap_or(0.0);
        let score = temp - pop * POP_SCORE_WEIGHT - penalty;

        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(WalkSlot {
                point,
                score,
                temp,
                pop,
                wind,
            });
        }
    }

    best
}

/// Compute day-planning insights from current conditions and the next
/// ~24 hours of forecast.
///
/// Forecast cards: best time to go out (when a scored winner with a
/// timestamp exists) and a precipitation outlook. Tips cards: a comfort
/// reading plus exactly one safety/plan card chosen by priority
/// black-ice, then wind, then a generic day plan.
pub fn compute_insights(
    current: &CurrentConditions,
    forecast: &[ForecastPoint],
    units: Units,
) -> Insights {
    let sym = units.temp_symbol();
    let t = finite(current.temp);
    let feels = finite(current.feels_like.or(current.temp));
    let wind = finite(current.wind_speed);
    let humidity = finite(current.humidity);
    let clouds = finite(current.clouds);
    let desc = lower_desc(current.desc.as_deref());

    let window = &forecast[..forecast.len().min(INSIGHT_WINDOW)];
    let scan = scan_window(window);
    let has_rain_snow = scan.any_rain || scan.any_snow;
    let precip_likely = scan.max_pop >= PRECIP_LIKELY_POP;

    let mut forecast_cards = Vec::new();

    if let Some(best) = best_walk_slot(window, units) {
        if let Some(dt) = best.point.dt {
            let when = fmt_time_utc(dt);
            let temp_str = format!("{}{}", round_i64(best.temp), sym);
            let pop_str = format!("{}%", pop_percent(best.pop));
            let wind_str = match best.wind {
                Some(w) => format!("{} {}", w, units.wind_label()),
                None => PLACEHOLDER.to_string(),
            };
            forecast_cards.push(InsightCard {
                icon: "🚶".to_string(),
                title: "Лучшее время выйти".to_string(),
                body: format!(
                    "Окно на ближайшие часы: {when}. Ожидается около {temp_str} (осадки {pop_str})."
                ),
                chips: vec![format!("💨 {wind_str}"), format!("☔ {pop_str}")],
            });
        }
    }

    if !window.is_empty() {
        let pop_str = format!("{}%", pop_percent(scan.max_pop));
        let kind = if mentions_snow(&desc) || scan.any_snow {
            "снег"
        } else if mentions_rain(&desc) {
            "дождь"
        } else {
            "осадки"
        };
        let (icon, body) = if precip_likely {
            (
                "☔",
                format!("В ближайшие 24 часа возможны {kind}. Вероятность до {pop_str}."),
            )
        } else {
            (
                "🌤️",
                format!("Существенных осадков не ожидается (до {pop_str})."),
            )
        };
        let clouds_str = match clouds {
            Some(c) => format!("{c}%"),
            None => PLACEHOLDER.to_string(),
        };
        forecast_cards.push(InsightCard {
            icon: icon.to_string(),
            title: "Осадки".to_string(),
            body,
            chips: vec![format!("☁ {clouds_str}")],
        });
    }

    let mut tips_cards = Vec::new();

    if let Some(feels) = feels {
        let (level, icon) = if feels <= -15.0 {
            ("Очень холодно", "🥶")
        } else if feels <= -5.0 {
            ("Холодно", "🧣")
        } else if feels <= 5.0 {
            ("Прохладно", "🧥")
        } else if feels >= HEAT_COMFORT_MIN {
            ("Жарко", "🥵")
        } else {
            ("Комфортно", "🙂")
        };
        let mut chips = Vec::new();
        if let Some(h) = humidity {
            chips.push(format!("💧 {h}%"));
        }
        if let Some(w) = wind {
            chips.push(format!("💨 {} {}", w, units.wind_label()));
        }
        tips_cards.push(InsightCard {
            icon: icon.to_string(),
            title: "Комфорт".to_string(),
            body: format!("{level}. Ощущается как {}{sym}.", round_i64(feels)),
            chips,
        });
    }

    let near_zero = t.is_some_and(|t| (ICE_TEMP_MIN..=ICE_TEMP_MAX).contains(&t));
    let windy = wind.is_some_and(|w| w >= units.windy_threshold());
    let wet_signal = scan.max_pop >= ICE_RISK_POP
        || has_rain_snow
        || mentions_rain(&desc)
        || mentions_snow(&desc);

    if near_zero && wet_signal {
        tips_cards.push(InsightCard {
            icon: "🧊".to_string(),
            title: "Осторожно на улице".to_string(),
            body: "Температура около нуля и возможны осадки — вероятность гололёда. \
                   Выбирайте обувь с хорошей подошвой."
                .to_string(),
            chips: vec!["⚠️ Гололёд".to_string()],
        });
    } else if windy {
        let chips = match wind {
            Some(w) => vec![format!("💨 {} {}", w, units.wind_label())],
            None => Vec::new(),
        };
        tips_cards.push(InsightCard {
            icon: "💨".to_string(),
            title: "Порывы ветра".to_string(),
            body: "Ветрено: на открытых местах может быть ощутимо холоднее. Капюшон/ветровка помогут."
                .to_string(),
            chips,
        });
    } else {
        let (body, chip) = if precip_likely {
            ("Лучше иметь запасной вариант (зонт/капюшон).", "☔ Зонт")
        } else {
            ("Можно планировать прогулку/дела без сюрпризов.", "🌤️ Ок")
        };
        tips_cards.push(InsightCard {
            icon: "✅".to_string(),
            title: "План на день".to_string(),
            body: body.to_string(),
            chips: vec![chip.to_string()],
        });
    }

    forecast_cards.truncate(MAX_FORECAST_CARDS);
    tips_cards.truncate(MAX_TIPS_CARDS);

    Insights {
        forecast_cards,
        tips_cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(temp: Option<f64>, feels: Option<f64>, wind: Option<f64>) -> CurrentConditions {
        CurrentConditions {
            temp,
            feels_like: feels,
            wind_speed: wind,
            ..CurrentConditions::default()
        }
    }

    fn point(temp: Option<f64>, pop: Option<f64>, dt: Option<i64>, desc: &str) -> ForecastPoint {
        ForecastPoint {
            temp,
            pop,
            dt,
            desc: if desc.is_empty() {
                None
            } else {
                Some(desc.to_string())
            },
            ..ForecastPoint::default()
        }
    }

    fn titles(advice: &Advice) -> Vec<&str> {
        advice.items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn caps_hold_for_busy_input() {
        // Near-zero feels-like, strong wind and a wet window fire all four cards.
        let cur = conditions(Some(1.0), Some(1.0), Some(9.0));
        let forecast = vec![
            point(Some(1.0), Some(0.9), Some(1_700_000_000), "дождь"),
            point(Some(0.0), Some(0.8), Some(1_700_010_800), "снег"),
        ];
        let advice = compute_advice(&cur, &forecast, Units::Metric);

        assert_eq!(advice.items.len(), MAX_ADVICE_CARDS);
        assert!(advice.chips.len() <= MAX_ADVICE_CHIPS);

        let mut sorted = advice.chips.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), advice.chips.len(), "chips must be unique");
    }

    #[test]
    fn clothing_bands_are_total_and_exclusive() {
        let expectations = [
            (-100.0, "Очень холодно"),
            (-15.0, "Очень холодно"),
            (-14.9, "Холодно"),
            (-5.0, "Холодно"),
            (-4.9, "Прохладно"),
            (5.0, "Прохладно"),
            (5.1, "Комфортно"),
            (15.0, "Комфортно"),
            (15.1, "Тепло"),
            (25.0, "Тепло"),
            (25.1, "Жарко"),
            (100.0, "Жарко"),
        ];

        for (temp, title) in expectations {
            let advice = compute_advice(&conditions(None, Some(temp), None), &[], Units::Metric);
            assert_eq!(advice.items.len(), 1, "exactly one band fires for {temp}");
            assert_eq!(advice.items[0].title, title, "band for {temp}");
        }
    }

    #[test]
    fn wind_threshold_is_unit_aware() {
        let breezy = conditions(None, None, Some(8.0));

        let metric = compute_advice(&breezy, &[], Units::Metric);
        assert!(titles(&metric).contains(&"Ветрено"));

        let imperial = compute_advice(&breezy, &[], Units::Imperial);
        assert!(!titles(&imperial).contains(&"Ветрено"));

        let gusty = conditions(None, None, Some(20.0));
        let imperial = compute_advice(&gusty, &[], Units::Imperial);
        assert!(titles(&imperial).contains(&"Ветрено"));
    }

    #[test]
    fn wind_card_quotes_speed_and_unit_label() {
        let advice = compute_advice(&conditions(None, None, Some(8.5)), &[], Units::Metric);
        let wind_card = advice
            .items
            .iter()
            .find(|i| i.title == "Ветрено")
            .expect("wind card present");
        assert!(wind_card.body.contains("8.5 м/с"));
    }

    #[test]
    fn badge_is_placeholder_iff_reference_temp_missing() {
        let advice = compute_advice(&CurrentConditions::default(), &[], Units::Metric);
        assert_eq!(advice.badge, "—");

        let advice = compute_advice(&conditions(None, Some(f64::NAN), None), &[], Units::Metric);
        assert_eq!(advice.badge, "—");

        let advice = compute_advice(&conditions(None, Some(-20.0), None), &[], Units::Metric);
        assert_eq!(advice.badge, "-20°C");

        // Feels-like missing falls back to the raw temperature.
        let advice = compute_advice(&conditions(Some(21.4), None, None), &[], Units::Standard);
        assert_eq!(advice.badge, "21K");
    }

    #[test]
    fn ice_hazard_fires_only_inside_the_near_zero_band() {
        let wet = vec![point(None, Some(0.5), None, "дождь")];

        for temp in [-1.0, 0.0, 2.0] {
            let advice = compute_advice(&conditions(None, Some(temp), None), &wet, Units::Metric);
            assert!(titles(&advice).contains(&"Осторожно"), "hazard at {temp}");
        }

        for temp in [-1.01, 2.01] {
            let advice = compute_advice(&conditions(None, Some(temp), None), &wet, Units::Metric);
            assert!(!titles(&advice).contains(&"Осторожно"), "no hazard at {temp}");
        }
    }

    #[test]
    fn ice_hazard_needs_a_moisture_signal() {
        let dry = vec![point(None, Some(0.1), None, "ясно")];
        let advice = compute_advice(&conditions(None, Some(0.0), None), &dry, Units::Metric);
        assert!(!titles(&advice).contains(&"Осторожно"));
    }

    #[test]
    fn scenario_very_cold_and_windy() {
        let cur = conditions(None, Some(-20.0), Some(25.0));
        let advice = compute_advice(&cur, &[], Units::Metric);

        assert!(titles(&advice).contains(&"Очень холодно"));
        assert!(titles(&advice).contains(&"Ветрено"));
        assert_eq!(advice.badge, "-20°C");
    }

    #[test]
    fn scenario_rain_likely_in_window() {
        let cur = conditions(Some(10.0), Some(8.0), None);
        let forecast = vec![
            point(Some(9.0), Some(0.5), Some(1_700_000_000), "дождь"),
            point(Some(9.0), Some(0.2), Some(1_700_010_800), ""),
        ];
        let advice = compute_advice(&cur, &forecast, Units::Metric);

        let precip = advice
            .items
            .iter()
            .find(|i| i.title == "Возможны осадки")
            .expect("precipitation card present");
        assert!(precip.body.contains("50%"));
        assert!(precip.body.contains("дождь"));
        assert!(advice.chips.iter().any(|c| c == "Зонт"));
        assert!(!titles(&advice).contains(&"Осторожно"), "8°C is not near zero");
    }

    #[test]
    fn pop_beyond_the_advice_window_is_ignored() {
        // Fifth point carries the only high pop; the ~12h window stops at four.
        let forecast = vec![
            point(Some(5.0), Some(0.1), None, ""),
            point(Some(5.0), Some(0.1), None, ""),
            point(Some(5.0), Some(0.1), None, ""),
            point(Some(5.0), Some(0.1), None, ""),
            point(Some(5.0), Some(0.9), None, "ливень"),
        ];
        let advice = compute_advice(&CurrentConditions::default(), &forecast, Units::Metric);
        assert!(!titles(&advice).contains(&"Возможны осадки"));
    }

    #[test]
    fn empty_inputs_degrade_without_failing() {
        let advice = compute_advice(&CurrentConditions::default(), &[], Units::Metric);
        assert_eq!(advice.badge, "—");
        assert!(advice.items.is_empty());
        assert!(advice.chips.is_empty());

        let insights = compute_insights(&CurrentConditions::default(), &[], Units::Metric);
        assert!(insights.forecast_cards.is_empty());
        // Calm, dry, no temperature: the generic plan card still applies.
        assert_eq!(insights.tips_cards.len(), 1);
        assert_eq!(insights.tips_cards[0].title, "План на день");
    }

    #[test]
    fn missing_wind_is_not_treated_as_calm_zero() {
        // No wind reading must not produce a wind card in any unit system.
        for units in Units::all() {
            let advice = compute_advice(&conditions(Some(10.0), None, None), &[], *units);
            assert!(!titles(&advice).contains(&"Ветрено"));
        }
    }

    #[test]
    fn walk_slot_tie_keeps_the_earliest_point() {
        // 1_700_000_000 is 22:13 UTC; 1_700_010_800 is 01:13 UTC next day.
        let forecast = vec![
            point(Some(10.0), None, Some(1_700_000_000), ""),
            point(Some(10.0), None, Some(1_700_010_800), ""),
        ];
        let insights = compute_insights(&CurrentConditions::default(), &forecast, Units::Metric);
        let walk = &insights.forecast_cards[0];
        assert_eq!(walk.title, "Лучшее время выйти");
        assert!(walk.body.contains("22:13 UTC"));
    }

    #[test]
    fn walk_slot_penalizes_rain_and_wind() {
        // 12° with pop 0.9 scores 12 - 12.6 = -0.6; dry 5° scores 5.
        let rain_vs_dry = vec![
            point(Some(12.0), Some(0.9), Some(1_700_000_000), ""),
            point(Some(5.0), Some(0.0), Some(1_700_010_800), ""),
        ];
        let insights = compute_insights(&CurrentConditions::default(), &rain_vs_dry, Units::Metric);
        assert!(insights.forecast_cards[0].body.contains("около 5°C"));

        // 10° at 17 м/с scores 10 - 9 = 1; calm 8° scores 8.
        let windy = ForecastPoint {
            temp: Some(10.0),
            wind_speed: Some(17.0),
            dt: Some(1_700_000_000),
            ..ForecastPoint::default()
        };
        let calm = point(Some(8.0), None, Some(1_700_010_800), "");
        let insights =
            compute_insights(&CurrentConditions::default(), &[windy, calm], Units::Metric);
        assert!(insights.forecast_cards[0].body.contains("около 8°C"));
    }

    #[test]
    fn walk_slot_requires_a_timestamp() {
        let forecast = vec![point(Some(10.0), None, None, "")];
        let insights = compute_insights(&CurrentConditions::default(), &forecast, Units::Metric);
        assert!(
            insights
                .forecast_cards
                .iter()
                .all(|c| c.title != "Лучшее время выйти")
        );
    }

    #[test]
    fn outlook_warns_or_reassures_at_the_pop_threshold() {
        let wet = vec![point(Some(0.0), Some(0.6), None, "снег")];
        let insights = compute_insights(&CurrentConditions::default(), &wet, Units::Metric);
        let outlook = insights
            .forecast_cards
            .iter()
            .find(|c| c.title == "Осадки")
            .expect("outlook present");
        assert_eq!(outlook.icon, "☔");
        assert!(outlook.body.contains("снег"));
        assert!(outlook.body.contains("60%"));

        let dry = vec![point(Some(0.0), Some(0.1), None, "")];
        let insights = compute_insights(&CurrentConditions::default(), &dry, Units::Metric);
        let outlook = insights
            .forecast_cards
            .iter()
            .find(|c| c.title == "Осадки")
            .expect("outlook present");
        assert_eq!(outlook.icon, "🌤️");
        assert!(outlook.body.contains("Существенных осадков не ожидается"));
    }

    #[test]
    fn comfort_buckets_and_chips() {
        let mut cur = conditions(None, Some(-20.0), Some(3.0));
        cur.humidity = Some(55.0);

        let insights = compute_insights(&cur, &[], Units::Metric);
        let comfort = &insights.tips_cards[0];
        assert_eq!(comfort.title, "Комфорт");
        assert_eq!(comfort.icon, "🥶");
        assert!(comfort.body.contains("Очень холодно"));
        assert!(comfort.body.contains("-20°C"));
        assert!(comfort.chips.contains(&"💧 55%".to_string()));
        assert!(comfort.chips.contains(&"💨 3 м/с".to_string()));

        let hot = compute_insights(&conditions(None, Some(35.0), None), &[], Units::Metric);
        assert_eq!(hot.tips_cards[0].icon, "🥵");

        let mild = compute_insights(&conditions(None, Some(20.0), None), &[], Units::Metric);
        assert!(mild.tips_cards[0].body.contains("Комфортно"));
    }

    #[test]
    fn safety_card_priority_ice_then_wind_then_plan() {
        // Near-zero and wet beats windy.
        let cur = conditions(Some(0.0), Some(0.0), Some(20.0));
        let wet = vec![point(Some(0.0), Some(0.5), None, "")];
        let insights = compute_insights(&cur, &wet, Units::Metric);
        let safety_titles: Vec<&str> =
            insights.tips_cards.iter().map(|c| c.title.as_str()).collect();
        assert!(safety_titles.contains(&"Осторожно на улице"));
        assert!(!safety_titles.contains(&"Порывы ветра"));

        // Windy but warm: gusts card.
        let cur = conditions(Some(10.0), Some(8.0), Some(9.0));
        let insights = compute_insights(&cur, &[], Units::Metric);
        let safety_titles: Vec<&str> =
            insights.tips_cards.iter().map(|c| c.title.as_str()).collect();
        assert!(safety_titles.contains(&"Порывы ветра"));

        // Calm and dry: generic plan.
        let cur = conditions(Some(10.0), Some(8.0), Some(2.0));
        let insights = compute_insights(&cur, &[], Units::Metric);
        let safety_titles: Vec<&str> =
            insights.tips_cards.iter().map(|c| c.title.as_str()).collect();
        assert!(safety_titles.contains(&"План на день"));
    }

    #[test]
    fn plan_card_wording_follows_the_outlook() {
        let cur = conditions(Some(10.0), Some(10.0), None);

        let wet = vec![point(Some(10.0), Some(0.7), None, "")];
        let insights = compute_insights(&cur, &wet, Units::Metric);
        let plan = insights
            .tips_cards
            .iter()
            .find(|c| c.title == "План на день")
            .expect("plan card present");
        assert!(plan.body.contains("запасной вариант"));
        assert!(plan.chips.contains(&"☔ Зонт".to_string()));

        let insights = compute_insights(&cur, &[], Units::Metric);
        let plan = insights
            .tips_cards
            .iter()
            .find(|c| c.title == "План на день")
            .expect("plan card present");
        assert!(plan.chips.contains(&"🌤️ Ок".to_string()));
    }

    #[test]
    fn insight_caps_hold() {
        let mut cur = conditions(Some(0.0), Some(0.0), Some(25.0));
        cur.humidity = Some(80.0);
        cur.desc = Some("снег".to_string());

        let forecast: Vec<ForecastPoint> = (0..12)
            .map(|i| point(Some(1.0), Some(0.9), Some(1_700_000_000 + i * 10_800), "снег"))
            .collect();

        let insights = compute_insights(&cur, &forecast, Units::Metric);
        assert!(insights.forecast_cards.len() <= MAX_FORECAST_CARDS);
        assert!(insights.tips_cards.len() <= MAX_TIPS_CARDS);
    }

    #[test]
    fn nan_pop_does_not_poison_the_window_scan() {
        let forecast = vec![
            point(Some(5.0), Some(f64::NAN), None, ""),
            point(Some(5.0), Some(0.2), None, ""),
        ];
        let advice = compute_advice(&CurrentConditions::default(), &forecast, Units::Metric);
        assert!(!titles(&advice).contains(&"Возможны осадки"));
    }
}
