//! Widget data sources and the payload shaping the chart widgets apply.
//!
//! Each widget kind pulls one JSON payload from a [`DataSource`]. Which
//! source is used is a configuration choice ([`SourceMode`]); the layout
//! model never depends on it, and a failing source only affects the widget
//! that asked.

use crate::registry::WidgetKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use web_time::{SystemTime, UNIX_EPOCH};

/// Data source errors. These stay local to the widget that fetched.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("No data available for {0:?}")]
    Unavailable(WidgetKind),
    #[error("Unexpected payload shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

/// Provides the raw payload a widget renders from.
pub trait DataSource {
    fn fetch(&self, kind: WidgetKind) -> Result<Value, SourceError>;
}

/// Which source widgets read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Built-in deterministic payloads.
    #[default]
    Fixture,
    /// A caller-supplied source, typically backed by the public APIs.
    Remote,
}

/// Pick the source for `mode`. Falls back to fixtures when remote is
/// requested but no remote source was supplied.
pub fn select_source(mode: SourceMode, remote: Option<Box<dyn DataSource>>) -> Box<dyn DataSource> {
    match (mode, remote) {
        (SourceMode::Remote, Some(remote)) => remote,
        (SourceMode::Remote, None) => {
            log::warn!("Remote data source requested but none configured, using fixtures");
            Box::new(FixtureSource::current())
        }
        (SourceMode::Fixture, _) => Box::new(FixtureSource::current()),
    }
}

/// Deterministic payloads shaped like the public APIs the widgets use.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    /// Year the holiday calendar is generated for.
    pub year: i32,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self { year: 2025 }
    }
}

impl FixtureSource {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    /// Fixtures for the current calendar year, so the holiday list has
    /// upcoming entries.
    pub fn current() -> Self {
        Self::new(civil_date(days_since_epoch()).0)
    }

    fn holidays(&self) -> Value {
        let y = self.year;
        let entries = [
            ("New Year's Day", "01-01", true),
            ("Martin Luther King Jr. Day", "01-17", true),
            ("Valentine's Day", "02-14", false),
            ("Presidents' Day", "02-21", true),
            ("Memorial Day", "05-30", true),
            ("Independence Day", "07-04", true),
            ("Labor Day", "09-05", true),
            ("Halloween", "10-31", false),
            ("Veterans Day", "11-11", true),
            ("Thanksgiving Day", "11-24", true),
            ("Christmas Day", "12-25", true),
        ];
        let holidays: Vec<Value> = entries
            .iter()
            .map(|(name, day, public)| {
                let date = format!("{y}-{day}");
                json!({ "name": name, "date": date, "observed": date, "public": public })
            })
            .collect();
        json!({ "holidays": holidays })
    }
}

impl DataSource for FixtureSource {
    fn fetch(&self, kind: WidgetKind) -> Result<Value, SourceError> {
        let payload = match kind {
            WidgetKind::LineChart => json!({
                "prices": [
                    [1_735_689_600_000_i64, 93_429.2],
                    [1_735_776_000_000_i64, 94_419.8],
                    [1_735_862_400_000_i64, 96_886.9],
                    [1_735_948_800_000_i64, 98_107.4],
                    [1_736_035_200_000_i64, 98_236.2]
                ]
            }),
            WidgetKind::BarChart => json!([
                { "name": { "common": "Germany" }, "population": 83_240_525 },
                { "name": { "common": "France" }, "population": 67_391_582 },
                { "name": { "common": "United Kingdom" }, "population": 67_215_293 },
                { "name": { "common": "Italy" }, "population": 59_554_023 },
                { "name": { "common": "Spain" }, "population": 47_351_567 },
                { "name": { "common": "Ukraine" }, "population": 44_134_693 },
                { "name": { "common": "Poland" }, "population": 37_950_802 },
                { "name": { "common": "Romania" }, "population": 19_286_123 },
                { "name": { "common": "Netherlands" }, "population": 16_655_799 },
                { "name": { "common": "Belgium" }, "population": 11_555_997 },
                { "name": { "common": "Czechia" }, "population": 10_698_896 },
                { "name": { "common": "Luxembourg" }, "population": 632_275 }
            ]),
            WidgetKind::PieChart => json!({
                "list": [
                    { "name": "London", "main": { "temp": 11.2 } },
                    { "name": "Paris", "main": { "temp": 13.8 } },
                    { "name": "Berlin", "main": { "temp": 9.4 } },
                    { "name": "Madrid", "main": { "temp": 18.1 } },
                    { "name": "Rome", "main": { "temp": 17.3 } }
                ]
            }),
            WidgetKind::DataTable => json!([
                { "id": 1, "userId": 1, "title": "sunt aut facere repellat" },
                { "id": 2, "userId": 1, "title": "qui est esse" },
                { "id": 3, "userId": 2, "title": "ea molestias quasi exercitationem" }
            ]),
            WidgetKind::ProfileCard => json!({
                "results": [{
                    "name": { "first": "Ada", "last": "Lovelace" },
                    "email": "ada@example.com",
                    "location": { "city": "London", "country": "United Kingdom" }
                }]
            }),
            WidgetKind::Metrics => json!({
                "data": {
                    "active_cryptocurrencies": 10_412,
                    "markets": 1_187,
                    "market_cap_change_percentage_24h_usd": -1.42
                }
            }),
            WidgetKind::Calendar => self.holidays(),
            WidgetKind::Notifications => json!([
                { "id": 1, "name": "id labore ex et quam laborum", "email": "eliseo@example.com" },
                { "id": 2, "name": "quo vero reiciendis velit", "email": "jayne@example.com" }
            ]),
            WidgetKind::Weather => json!({
                "name": "Lisbon",
                "main": { "temp": 19.6, "humidity": 64 },
                "weather": [{ "description": "few clouds" }]
            }),
            WidgetKind::StockMarket => json!([
                { "symbol": "AAPL", "price": 145.86, "change": 0.41, "changePercent": 0.28 },
                { "symbol": "MSFT", "price": 258.35, "change": -0.67, "changePercent": -0.26 },
                { "symbol": "GOOGL", "price": 2290.98, "change": 14.96, "changePercent": 0.66 },
                { "symbol": "AMZN", "price": 3161.0, "change": -23.0, "changePercent": -0.72 },
                { "symbol": "META", "price": 335.94, "change": 3.14, "changePercent": 0.94 }
            ]),
        };
        Ok(payload)
    }
}

#[derive(Deserialize)]
struct Country {
    name: CountryName,
    population: u64,
}

#[derive(Deserialize)]
struct CountryName {
    common: String,
}

/// Countries sorted by population, largest first, limited to `n`.
pub fn top_countries_by_population(payload: &Value, n: usize) -> Result<Vec<(String, u64)>, SourceError> {
    let mut countries: Vec<Country> = serde_json::from_value(payload.clone())?;
    countries.sort_by(|a, b| b.population.cmp(&a.population));
    Ok(countries
        .into_iter()
        .take(n)
        .map(|c| (c.name.common, c.population))
        .collect())
}

#[derive(Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

/// One point of a price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    pub price: f64,
}

/// `[timestamp, price]` pairs from a market chart payload.
pub fn price_series(payload: &Value) -> Result<Vec<PricePoint>, SourceError> {
    let chart: MarketChart = serde_json::from_value(payload.clone())?;
    Ok(chart
        .prices
        .into_iter()
        .map(|(ts, price)| PricePoint {
            timestamp_ms: ts as i64,
            price,
        })
        .collect())
}

/// A public or observed holiday.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Holiday {
    pub name: String,
    /// ISO `YYYY-MM-DD` date.
    pub date: String,
    pub public: bool,
}

#[derive(Deserialize)]
struct HolidayList {
    holidays: Vec<Holiday>,
}

/// Holidays on or after `today` (ISO date), first `limit` in payload order.
pub fn upcoming_holidays(payload: &Value, today: &str, limit: usize) -> Result<Vec<Holiday>, SourceError> {
    let list: HolidayList = serde_json::from_value(payload.clone())?;
    Ok(list
        .holidays
        .into_iter()
        .filter(|h| h.date.as_str() >= today)
        .take(limit)
        .collect())
}

#[derive(Deserialize)]
struct CityTemp {
    name: String,
    main: Temperature,
}

#[derive(Deserialize)]
struct Temperature {
    temp: f64,
}

#[derive(Deserialize)]
struct CityList {
    list: Vec<CityTemp>,
}

#[derive(Deserialize)]
struct ProfileResults {
    results: Vec<Profile>,
}

#[derive(Deserialize)]
struct Profile {
    name: ProfileName,
    location: ProfileLocation,
}

#[derive(Deserialize)]
struct ProfileName {
    first: String,
    last: String,
}

#[derive(Deserialize)]
struct ProfileLocation {
    city: String,
    country: String,
}

#[derive(Deserialize)]
struct GlobalMetrics {
    data: MarketTotals,
}

#[derive(Deserialize)]
struct MarketTotals {
    active_cryptocurrencies: u64,
    markets: u64,
    market_cap_change_percentage_24h_usd: f64,
}

#[derive(Deserialize)]
struct CurrentWeather {
    name: String,
    main: WeatherMain,
    weather: Vec<WeatherDescription>,
}

#[derive(Deserialize)]
struct WeatherMain {
    temp: f64,
    humidity: u32,
}

#[derive(Deserialize)]
struct WeatherDescription {
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Quote {
    symbol: String,
    price: f64,
    change_percent: f64,
}

/// One-line text rendering of a widget's payload.
///
/// `today` is an ISO date and only matters for the calendar.
pub fn summarize(kind: WidgetKind, payload: &Value, today: &str) -> Result<String, SourceError> {
    let line = match kind {
        WidgetKind::LineChart => {
            let series = price_series(payload)?;
            let (Some(first), Some(last)) = (series.first(), series.last()) else {
                return Err(SourceError::Unavailable(kind));
            };
            let change = if first.price == 0.0 {
                0.0
            } else {
                (last.price - first.price) / first.price * 100.0
            };
            format!("Last {:.2} ({:+.2}% over {} points)", last.price, change, series.len())
        }
        WidgetKind::BarChart => {
            let top = top_countries_by_population(payload, 10)?;
            let Some((name, population)) = top.first() else {
                return Err(SourceError::Unavailable(kind));
            };
            format!(
                "{} leads {} countries with {:.1}M",
                name,
                top.len(),
                *population as f64 / 1_000_000.0
            )
        }
        WidgetKind::PieChart => {
            let cities: CityList = serde_json::from_value(payload.clone())?;
            let Some(warmest) = cities
                .list
                .iter()
                .max_by(|a, b| a.main.temp.total_cmp(&b.main.temp))
            else {
                return Err(SourceError::Unavailable(kind));
            };
            format!(
                "Warmest of {}: {} {:.1}°C",
                cities.list.len(),
                warmest.name,
                warmest.main.temp
            )
        }
        WidgetKind::DataTable => {
            let rows: Vec<Value> = serde_json::from_value(payload.clone())?;
            format!("{} rows", rows.len())
        }
        WidgetKind::ProfileCard => {
            let profiles: ProfileResults = serde_json::from_value(payload.clone())?;
            let Some(profile) = profiles.results.first() else {
                return Err(SourceError::Unavailable(kind));
            };
            format!(
                "{} {}, {}, {}",
                profile.name.first, profile.name.last, profile.location.city, profile.location.country
            )
        }
        WidgetKind::Metrics => {
            let metrics: GlobalMetrics = serde_json::from_value(payload.clone())?;
            let totals = metrics.data;
            format!(
                "{} coins on {} markets, {:+.2}% 24h",
                totals.active_cryptocurrencies,
                totals.markets,
                totals.market_cap_change_percentage_24h_usd
            )
        }
        WidgetKind::Calendar => match upcoming_holidays(payload, today, 5)?.first() {
            Some(next) => format!("Next: {} on {}", next.name, next.date),
            None => "No upcoming holidays".to_string(),
        },
        WidgetKind::Notifications => {
            let items: Vec<Value> = serde_json::from_value(payload.clone())?;
            format!("{} notifications", items.len())
        }
        WidgetKind::Weather => {
            let weather: CurrentWeather = serde_json::from_value(payload.clone())?;
            let description = weather
                .weather
                .first()
                .map(|w| w.description.as_str())
                .unwrap_or("n/a");
            format!(
                "{} {:.1}°C, {}, {}% humidity",
                weather.name, weather.main.temp, description, weather.main.humidity
            )
        }
        WidgetKind::StockMarket => {
            let quotes: Vec<Quote> = serde_json::from_value(payload.clone())?;
            let Some(mover) = quotes
                .iter()
                .max_by(|a, b| a.change_percent.abs().total_cmp(&b.change_percent.abs()))
            else {
                return Err(SourceError::Unavailable(kind));
            };
            format!(
                "{} quotes, top mover {} {:.2} ({:+.2}%)",
                quotes.len(),
                mover.symbol,
                mover.price,
                mover.change_percent
            )
        }
    };
    Ok(line)
}

fn days_since_epoch() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => (elapsed.as_secs() / 86_400) as i64,
        Err(_) => 0,
    }
}

/// `(year, month, day)` of the proleptic Gregorian date `days` after 1970-01-01.
pub fn civil_date(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}

/// Today's UTC date as `YYYY-MM-DD`.
pub fn today() -> String {
    let (year, month, day) = civil_date(days_since_epoch());
    format!("{year:04}-{month:02}-{day:02}")
}
