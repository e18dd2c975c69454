//! Deterministic mock analysis data.
//!
//! Every field except `id` and `timestamp` is a pure function of the input
//! URL: the URL is hashed into a seed, the seed drives a linear congruential
//! generator, and fields are drawn from it in a fixed order. Changing the
//! draw order or any range changes the output for every URL.

use chrono::{DateTime, Duration, Utc};

use crate::analysis::{new_id, AnalysisResult, AnalysisStatus, CustomerMetrics, Firmographics, HistoryItem};

pub const INDUSTRIES: [&str; 10] = [
  "Software & Technology",
  "Financial Services",
  "Healthcare",
  "E-commerce",
  "Education",
  "Manufacturing",
  "Real Estate",
  "Telecommunications",
  "Media & Entertainment",
  "Professional Services",
];

pub const EMPLOYEE_RANGES: [&str; 8] =
  ["1-10", "11-50", "51-200", "201-500", "501-1000", "1001-5000", "5001-10000", "10000+"];

pub const REVENUE_RANGES: [&str; 7] =
  ["$1M-$5M", "$5M-$10M", "$10M-$50M", "$50M-$100M", "$100M-$500M", "$500M-$1B", "$1B+"];

pub const CITIES: [&str; 10] = [
  "San Francisco, CA",
  "New York, NY",
  "Austin, TX",
  "Seattle, WA",
  "Boston, MA",
  "Los Angeles, CA",
  "Chicago, IL",
  "Denver, CO",
  "Portland, OR",
  "Atlanta, GA",
];

/// URLs used to pre-populate an empty history, most recent first
pub const SEED_URLS: [&str; 8] = [
  "https://salesforce.com",
  "https://slack.com",
  "https://notion.so",
  "https://figma.com",
  "https://stripe.com",
  "https://zoom.us",
  "https://asana.com",
  "https://dropbox.com",
];

// Inclusive ranges, listed in draw order.
pub const YOY_GROWTH_RANGE: (i64, i64) = (5, 150);
pub const NRR_RANGE: (i64, i64) = (85, 130);
pub const DAU_RANGE: (i64, i64) = (100, 50_000);
pub const CSAT_RANGE: (i64, i64) = (60, 95);
pub const NPS_RANGE: (i64, i64) = (-10, 70);
pub const CUSTOMERS_RANGE: (i64, i64) = (50, 10_000);
pub const FOUNDED_RANGE: (i64, i64) = (1990, 2023);

const LCG_MULTIPLIER: u64 = 1_664_525;
const LCG_INCREMENT: u64 = 1_013_904_223;
const LCG_MODULUS: u64 = 1 << 32;

/// Rolling `hash * 31 + unit` over UTF-16 code units, wrapped to i32 each step.
///
/// Stable across platforms for the exact same string. Not case-insensitive
/// and not collision resistant.
pub fn hash_url(url: &str) -> u32 {
  let hash = url.encode_utf16().fold(0i32, |hash, unit| {
    hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(i32::from(unit))
  });
  hash.unsigned_abs()
}

/// Linear congruential generator yielding values in `[0, 1)`
#[derive(Debug, Clone)]
pub struct SeededRandom {
  state: u64,
}

impl SeededRandom {
  pub fn new(seed: u32) -> Self {
    Self { state: u64::from(seed) }
  }

  pub fn next_f64(&mut self) -> f64 {
    self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
    self.state as f64 / LCG_MODULUS as f64
  }

  /// Integer in `[min, max]` inclusive
  pub fn range(&mut self, min: i64, max: i64) -> i64 {
    (self.next_f64() * (max - min + 1) as f64).floor() as i64 + min
  }

  pub fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
    let index = self.range(0, items.len() as i64 - 1);
    items[index as usize]
  }

  fn range_of(&mut self, bounds: (i64, i64)) -> i64 {
    self.range(bounds.0, bounds.1)
  }
}

/// Host label used as the company name: `https://www.stripe.com/x` -> `Stripe`
pub fn company_name(url: &str) -> String {
  let host = url::Url::parse(url)
    .ok()
    .and_then(|parsed| parsed.host_str().map(str::to_string))
    .unwrap_or_else(|| url.to_string());

  let domain = host.strip_prefix("www.").unwrap_or(&host);
  let label = domain.split('.').next().unwrap_or_default();

  let mut chars = label.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Build the mock analysis for an already-normalized URL. Never fails.
pub fn generate_analysis(url: &str) -> AnalysisResult {
  let mut random = SeededRandom::new(hash_url(url));

  let metrics = CustomerMetrics {
    yoy_growth: random.range_of(YOY_GROWTH_RANGE),
    nrr: random.range_of(NRR_RANGE),
    dau: random.range_of(DAU_RANGE),
    csat: random.range_of(CSAT_RANGE),
    nps: random.range_of(NPS_RANGE),
    current_customers: random.range_of(CUSTOMERS_RANGE),
  };

  let industry = random.pick(&INDUSTRIES).to_string();
  let employee_count = random.pick(&EMPLOYEE_RANGES).to_string();
  let founded_year = random.range_of(FOUNDED_RANGE);
  let headquarters = random.pick(&CITIES).to_string();
  let revenue = random.pick(&REVENUE_RANGES).to_string();

  AnalysisResult {
    id: new_id(),
    url: url.to_string(),
    timestamp: Utc::now(),
    status: AnalysisStatus::Success,
    metrics,
    firmographics: Firmographics {
      company_name: company_name(url),
      industry,
      employee_count,
      founded_year,
      headquarters,
      revenue,
      website: url.to_string(),
    },
    error_message: None,
  }
}

/// Demo history shown to first-time users, one day apart starting at `now`
pub fn initial_history(now: DateTime<Utc>) -> Vec<HistoryItem> {
  SEED_URLS
    .iter()
    .enumerate()
    .map(|(days_ago, url)| {
      let mut item = generate_analysis(url).to_history_item();
      item.timestamp = now - Duration::days(days_ago as i64);
      item
    })
    .collect()
}
