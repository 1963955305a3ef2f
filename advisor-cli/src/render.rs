//! Terminal renderer: lays out a weather report and the advisory engine's
//! cards as plain text. All decisions (which cards, which wording) are made
//! by the engine; this module only formats.

use std::fmt::Write as _;

use advisor_core::conditions::classify;
use advisor_core::{Advice, ForecastPoint, InsightCard, Insights, Units, WeatherReport};
use chrono::{DateTime, Utc};

const PLACEHOLDER: &str = "—";

fn fmt_temp(value: Option<f64>, units: Units) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}{}", v.round() as i64, units.temp_symbol()),
        None => PLACEHOLDER.to_string(),
    }
}

fn fmt_wind(value: Option<f64>, units: Units) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{} {}", v, units.wind_label()),
        None => PLACEHOLDER.to_string(),
    }
}

fn fmt_percent(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v}%"),
        None => PLACEHOLDER.to_string(),
    }
}

fn fmt_time(unix: Option<i64>) -> String {
    unix.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .map(|dt| format!("{} UTC", dt.format("%H:%M")))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn fmt_time_short(unix: Option<i64>) -> String {
    unix.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .map(|dt| format!("{} UTC", dt.format("%d.%m %H:%M")))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn units_chip(units: Units) -> &'static str {
    match units {
        Units::Metric => "Metric (°C)",
        Units::Imperial => "Imperial (°F)",
        Units::Standard => "Standard (K)",
    }
}

fn forecast_line(point: &ForecastPoint, units: Units) -> String {
    let sky = classify(point.icon.as_deref(), point.desc.as_deref().unwrap_or(""));
    let pop = point
        .pop
        .filter(|p| p.is_finite())
        .map(|p| format!("☔ {}%", (p * 100.0).round() as i64));
    let wind = point
        .wind_speed
        .filter(|w| w.is_finite())
        .map(|w| format!("💨 {} {}", w, units.wind_label()));

    let mut meta = Vec::new();
    if let Some(w) = wind {
        meta.push(w);
    }
    if let Some(p) = pop {
        meta.push(p);
    }

    format!(
        "  {}  {}  {:>5}  {}{}",
        fmt_time_short(point.dt),
        sky.glyph(),
        fmt_temp(point.temp, units),
        point.desc.as_deref().unwrap_or(""),
        if meta.is_empty() {
            String::new()
        } else {
            format!("  [{}]", meta.join("  "))
        },
    )
}

fn write_insight_block(out: &mut String, kicker: &str, cards: &[InsightCard]) {
    if cards.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{kicker}");
    for card in cards {
        let _ = writeln!(out, "  {} {} — {}", card.icon, card.title, card.body);
        if !card.chips.is_empty() {
            let _ = writeln!(out, "     {}", card.chips.join("  "));
        }
    }
}

/// Render the full report: current conditions, forecast strip, advice and
/// insight cards.
pub fn render(report: &WeatherReport, advice: &Advice, insights: &Insights) -> String {
    let units = report.units;
    let cur = &report.current;
    let sky = classify(cur.icon.as_deref(), cur.desc.as_deref().unwrap_or(""));

    let mut out = String::new();

    let _ = writeln!(out, "{}  [{}]", report.location.label(), units_chip(units));
    let _ = writeln!(
        out,
        "{} {}  {}  (ощущается как {})",
        sky.glyph(),
        cur.desc.as_deref().unwrap_or(PLACEHOLDER),
        fmt_temp(cur.temp, units),
        fmt_temp(cur.feels_like, units),
    );
    let _ = writeln!(
        out,
        "Влажность: {}  Ветер: {}  Давление: {}  Облачность: {}",
        fmt_percent(cur.humidity),
        fmt_wind(cur.wind_speed, units),
        match cur.pressure.filter(|p| p.is_finite()) {
            Some(p) => format!("{p} hPa"),
            None => PLACEHOLDER.to_string(),
        },
        fmt_percent(cur.clouds),
    );
    let _ = writeln!(
        out,
        "Восход: {}  Закат: {}",
        fmt_time(cur.sunrise),
        fmt_time(cur.sunset),
    );
    if let Some(generated) = report.generated_at {
        let _ = writeln!(out, "Обновлено: {}", fmt_time(Some(generated)));
    }

    if report.forecast.is_empty() {
        let _ = writeln!(out, "\nПрогноз\n  Нет данных прогноза");
    } else {
        let _ = writeln!(out, "\nПрогноз");
        for point in &report.forecast {
            let _ = writeln!(out, "{}", forecast_line(point, units));
        }
    }

    let _ = writeln!(out, "\nРекомендации  [{}]", advice.badge);
    if advice.items.is_empty() {
        let _ = writeln!(out, "  Нет данных для рекомендаций");
    } else {
        for item in &advice.items {
            let _ = writeln!(out, "  {} {} — {}", item.icon, item.title, item.body);
        }
    }
    if !advice.chips.is_empty() {
        let _ = writeln!(out, "  {}", advice.chips.join(" · "));
    }

    write_insight_block(&mut out, "Инсайты", &insights.forecast_cards);
    write_insight_block(&mut out, "Сегодня", &insights.tips_cards);

    out
}
