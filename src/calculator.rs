//! Per-listing flip calculation.
//!
//! The pipeline only depends on the `DealCalculator` trait and reads two
//! flags from the result; `FlipCalculator` is the default model.

use crate::error::{PropperError, Result};
use crate::types::PropertyRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static DOLLAR_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*(k|m|mil|million)?\b").unwrap()
});
static BARE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*$").unwrap());
static AREA_SQM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9][0-9,]*(?:\.[0-9]+)?)\s*(?:m²|m2|sqm|sq\.?\s*m)").unwrap()
});

/// Tunables for the default flip model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub renovation_cost_per_sqm: f64,
    /// Used when the listing has no usable floor area
    pub renovation_cost_flat: f64,
    /// Agent, legal and holding costs as a share of the purchase price
    pub transaction_cost_rate: f64,
    /// Expected resale premium over the purchase price after renovation
    pub resale_uplift: f64,
    pub good_deal_margin: f64,
    pub stress_keywords: Vec<String>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            renovation_cost_per_sqm: 1_500.0,
            renovation_cost_flat: 60_000.0,
            transaction_cost_rate: 0.06,
            resale_uplift: 0.25,
            good_deal_margin: 0.15,
            stress_keywords: [
                "mortgagee",
                "must sell",
                "urgent sale",
                "deceased estate",
                "motivated vendor",
                "price reduced",
                "below cv",
                "as is where is",
                "relocating",
                "vendor must sell",
                "liquidation",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Outcome of scoring one listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub property_address: String,
    pub property_title: String,
    pub property_link: String,
    pub agency_name: String,
    pub listing_date: String,
    pub price_text: String,
    pub purchase_price: Option<f64>,
    pub floor_area_sqm: Option<f64>,
    pub renovation_cost: f64,
    pub transaction_costs: f64,
    pub estimated_resale: Option<f64>,
    pub projected_profit: Option<f64>,
    pub profit_margin: Option<f64>,
    pub is_good_deal: bool,
    pub has_stress_keywords: bool,
    pub stress_keywords: Vec<String>,
}

/// The calculation collaborator seam used by the pipeline
pub trait DealCalculator: Send + Sync {
    fn calculate(&self, record: &PropertyRecord) -> CalculationResult;
}

pub struct FlipCalculator {
    config: CalculatorConfig,
    keyword_patterns: Vec<(String, Regex)>,
}

impl FlipCalculator {
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        let keyword_patterns = config
            .stress_keywords
            .iter()
            .map(|keyword| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword.trim()));
                Regex::new(&pattern)
                    .map(|re| (keyword.trim().to_string(), re))
                    .map_err(|e| {
                        PropperError::Config(format!("Invalid stress keyword '{}': {}", keyword, e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            keyword_patterns,
        })
    }

    fn matched_keywords(&self, record: &PropertyRecord) -> Vec<String> {
        let haystack = format!("{} {}", record.property_title, record.price);
        self.keyword_patterns
            .iter()
            .filter(|(_, re)| re.is_match(&haystack))
            .map(|(keyword, _)| keyword.clone())
            .collect()
    }
}

impl DealCalculator for FlipCalculator {
    fn calculate(&self, record: &PropertyRecord) -> CalculationResult {
        let purchase_price = parse_price(&record.price);
        let floor_area_sqm = parse_area(&record.area);
        let renovation_cost = match floor_area_sqm {
            Some(area) => area * self.config.renovation_cost_per_sqm,
            None => self.config.renovation_cost_flat,
        };

        let transaction_costs = purchase_price
            .map(|p| p * self.config.transaction_cost_rate)
            .unwrap_or(0.0);
        let estimated_resale = purchase_price.map(|p| p * (1.0 + self.config.resale_uplift));
        let projected_profit = purchase_price
            .zip(estimated_resale)
            .map(|(price, resale)| resale - price - renovation_cost - transaction_costs);
        let profit_margin = purchase_price
            .zip(projected_profit)
            .map(|(price, profit)| profit / price);
        let is_good_deal = profit_margin.is_some_and(|m| m >= self.config.good_deal_margin);

        let stress_keywords = self.matched_keywords(record);
        debug!(
            address = %record.property_address,
            ?purchase_price,
            ?profit_margin,
            is_good_deal,
            stress = stress_keywords.len(),
            "Scored listing"
        );

        CalculationResult {
            property_address: record.property_address.clone(),
            property_title: record.property_title.clone(),
            property_link: record.property_link.clone(),
            agency_name: record.agency_name.clone(),
            listing_date: record.listing_date.clone(),
            price_text: record.price.clone(),
            purchase_price,
            floor_area_sqm,
            renovation_cost,
            transaction_costs,
            estimated_resale,
            projected_profit,
            profit_margin,
            is_good_deal,
            has_stress_keywords: !stress_keywords.is_empty(),
            stress_keywords,
        }
    }
}

/// Pull a dollar figure out of free-form price text.
///
/// Returns `None` for "By negotiation", "Auction" and similar. A bare number
/// is accepted only when it is the whole cell.
pub fn parse_price(text: &str) -> Option<f64> {
    if let Some(caps) = DOLLAR_AMOUNT.captures(text) {
        let amount = parse_number(&caps[1])?;
        let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
            Some(ref s) if s == "k" => 1_000.0,
            Some(_) => 1_000_000.0,
            None => 1.0,
        };
        return Some(amount * multiplier).filter(|p| *p > 0.0);
    }
    BARE_AMOUNT
        .captures(text)
        .and_then(|caps| parse_number(&caps[1]))
        .filter(|p| *p > 0.0)
}

/// Floor area in square metres from text like "120m²" or a bare number
pub fn parse_area(text: &str) -> Option<f64> {
    AREA_SQM
        .captures(text)
        .or_else(|| BARE_AMOUNT.captures(text))
        .and_then(|caps| parse_number(&caps[1]))
        .filter(|a| *a > 0.0)
}

fn parse_number(digits: &str) -> Option<f64> {
    digits.replace(',', "").parse::<f64>().ok()
}
