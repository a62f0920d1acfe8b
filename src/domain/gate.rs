//! Four-gate eligibility filter.
//!
//! A. Trend: price >= EMA100 >= EMA200
//! B. Proximity: price >= 75% of the 52-week high (equality passes)
//! C. Consistency: up-day percentage over 6 months > 40 (40 itself fails)
//! D. Performance: selected one-year return >= 6.5 (equality passes)
//!
//! Undefined inputs fail their gate.

use crate::domain::error::ScreenerError;
use crate::domain::indicator::{IndicatorRecord, Indicators};
use std::fmt;
use std::str::FromStr;

pub const UP_DAYS_PCT_THRESHOLD: f64 = 40.0;
pub const ONE_YEAR_RETURN_THRESHOLD: f64 = 6.5;

/// Which one-year return feeds gate D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnFormula {
    /// `(price / price_12m_ago - 1) * 100`
    Standard,
    /// `price / (price_12m_ago - 1) * 100`
    #[default]
    Unconventional,
}

impl ReturnFormula {
    pub fn from_standard_flag(use_standard: bool) -> Self {
        if use_standard {
            ReturnFormula::Standard
        } else {
            ReturnFormula::Unconventional
        }
    }

    /// Name of the record field this formula reads.
    pub fn field_name(self) -> &'static str {
        match self {
            ReturnFormula::Standard => "one_year_return_standard",
            ReturnFormula::Unconventional => "one_year_return_unconventional",
        }
    }

    pub fn select(self, metrics: &Indicators) -> Option<f64> {
        match self {
            ReturnFormula::Standard => metrics.one_year_return_standard,
            ReturnFormula::Unconventional => metrics.one_year_return_unconventional,
        }
    }
}

impl fmt::Display for ReturnFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnFormula::Standard => write!(f, "standard"),
            ReturnFormula::Unconventional => write!(f, "unconventional"),
        }
    }
}

impl FromStr for ReturnFormula {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(ReturnFormula::Standard),
            "unconventional" => Ok(ReturnFormula::Unconventional),
            _ => Err(ScreenerError::UnknownReturnFormula(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateFlags {
    pub trend: bool,
    pub proximity: bool,
    pub consistency: bool,
    pub performance: bool,
}

impl GateFlags {
    pub fn all(&self) -> bool {
        self.trend && self.proximity && self.consistency && self.performance
    }
}

/// An indicator record after gating. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GateResult {
    pub record: IndicatorRecord,
    pub gates: GateFlags,
    pub gate_pass: bool,
    pub rejection_reasons: String,
}

impl GateResult {
    pub fn symbol(&self) -> &str {
        &self.record.symbol
    }

    pub fn metrics(&self) -> Option<&Indicators> {
        self.record.metrics.as_ref()
    }

    pub fn data_sufficient(&self) -> bool {
        self.record.data_sufficient()
    }

    pub fn return_6m(&self) -> Option<f64> {
        self.metrics().and_then(|m| m.return_6m)
    }

    pub fn return_9m(&self) -> Option<f64> {
        self.metrics().and_then(|m| m.return_9m)
    }

    pub fn return_12m(&self) -> Option<f64> {
        self.metrics().and_then(|m| m.return_12m)
    }
}

/// Failure counts per gate across rejected, sufficient records, plus the
/// number rejected for lack of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RejectionBreakdown {
    pub insufficient_data: usize,
    pub failed_trend: usize,
    pub failed_proximity: usize,
    pub failed_consistency: usize,
    pub failed_performance: usize,
}

impl RejectionBreakdown {
    fn tally(&mut self, result: &GateResult) {
        if !result.data_sufficient() {
            self.insufficient_data += 1;
            return;
        }
        self.failed_trend += usize::from(!result.gates.trend);
        self.failed_proximity += usize::from(!result.gates.proximity);
        self.failed_consistency += usize::from(!result.gates.consistency);
        self.failed_performance += usize::from(!result.gates.performance);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GateOutcome {
    pub passing: Vec<GateResult>,
    pub failing: Vec<GateResult>,
    pub breakdown: RejectionBreakdown,
}

pub fn trend_gate(m: &Indicators) -> bool {
    m.current_price >= m.ema100 && m.ema100 >= m.ema200
}

pub fn proximity_gate(m: &Indicators) -> bool {
    m.proximity_flag
}

pub fn consistency_gate(m: &Indicators) -> bool {
    m.up_days_pct_6m.is_some_and(|v| v > UP_DAYS_PCT_THRESHOLD)
}

pub fn performance_gate(m: &Indicators, formula: ReturnFormula) -> bool {
    formula
        .select(m)
        .is_some_and(|v| v >= ONE_YEAR_RETURN_THRESHOLD)
}

fn fmt_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}%"),
        None => "n/a".to_string(),
    }
}

fn rejection_clauses(m: &Indicators, gates: &GateFlags, formula: ReturnFormula) -> Vec<String> {
    let mut clauses = Vec::new();

    if !gates.trend {
        clauses.push(format!(
            "Failed Trend Alignment (price={:.2}, EMA100={:.2}, EMA200={:.2})",
            m.current_price, m.ema100, m.ema200
        ));
    }
    if !gates.proximity {
        clauses.push(format!(
            "Failed Proximity to High (price={:.2} < 75% of 52w high {:.2})",
            m.current_price, m.high_52w
        ));
    }
    if !gates.consistency {
        clauses.push(format!(
            "Failed Consistency (up_days={} <= 40%)",
            fmt_value(m.up_days_pct_6m, 1)
        ));
    }
    if !gates.performance {
        clauses.push(format!(
            "Failed Performance ({}={} < 6.5%)",
            formula.field_name(),
            fmt_value(formula.select(m), 2)
        ));
    }

    clauses
}

/// Gate one record. Records without metrics pass through with every flag
/// false and their reason untouched.
pub fn evaluate_gates(record: &IndicatorRecord, formula: ReturnFormula) -> GateResult {
    let Some(m) = record.metrics.as_ref() else {
        return GateResult {
            record: record.clone(),
            gates: GateFlags::default(),
            gate_pass: false,
            rejection_reasons: record.rejection_reasons.clone(),
        };
    };

    let gates = GateFlags {
        trend: trend_gate(m),
        proximity: proximity_gate(m),
        consistency: consistency_gate(m),
        performance: performance_gate(m, formula),
    };
    let gate_pass = gates.all();

    GateResult {
        record: record.clone(),
        gates,
        gate_pass,
        rejection_reasons: rejection_clauses(m, &gates, formula).join("; "),
    }
}

/// Gate every record and split into passing and failing sets, each in input
/// order.
pub fn apply_gatekeeper(records: &[IndicatorRecord], formula: ReturnFormula) -> GateOutcome {
    let mut outcome = GateOutcome::default();

    for record in records {
        let result = evaluate_gates(record, formula);
        if result.gate_pass {
            outcome.passing.push(result);
        } else {
            outcome.breakdown.tally(&result);
            outcome.failing.push(result);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::INSUFFICIENT_DATA_REASON;
    use proptest::prelude::*;

    fn metrics() -> Indicators {
        Indicators {
            current_price: 180.0,
            ema100: 160.0,
            ema200: 140.0,
            high_52w: 185.0,
            proximity_flag: true,
            up_days_pct_6m: Some(55.0),
            price_6m_ago: Some(150.0),
            price_9m_ago: Some(120.0),
            price_12m_ago: Some(100.0),
            return_6m: Some(20.0),
            return_9m: Some(50.0),
            return_12m: Some(80.0),
            one_year_return_standard: Some(80.0),
            one_year_return_unconventional: Some(180.0 / 99.0 * 100.0),
        }
    }

    fn record(symbol: &str, m: Indicators) -> IndicatorRecord {
        IndicatorRecord {
            symbol: symbol.to_string(),
            trading_days: 400,
            metrics: Some(m),
            rejection_reasons: String::new(),
        }
    }

    fn insufficient(symbol: &str) -> IndicatorRecord {
        IndicatorRecord {
            symbol: symbol.to_string(),
            trading_days: 120,
            metrics: None,
            rejection_reasons: INSUFFICIENT_DATA_REASON.to_string(),
        }
    }

    #[test]
    fn strong_symbol_passes_standard() {
        let result = evaluate_gates(&record("STRONG", metrics()), ReturnFormula::Standard);
        assert!(result.gate_pass);
        assert!(result.gates.all());
        assert_eq!(result.rejection_reasons, "");
    }

    #[test]
    fn insufficient_record_passes_through() {
        let result = evaluate_gates(&insufficient("THIN"), ReturnFormula::Standard);
        assert!(!result.gate_pass);
        assert_eq!(result.gates, GateFlags::default());
        assert_eq!(result.rejection_reasons, INSUFFICIENT_DATA_REASON);
    }

    #[test]
    fn error_reason_retained_unchanged() {
        let mut rec = insufficient("BROKEN");
        rec.rejection_reasons = "Error: dates not strictly increasing".into();
        let result = evaluate_gates(&rec, ReturnFormula::Unconventional);
        assert_eq!(result.rejection_reasons, "Error: dates not strictly increasing");
    }

    #[test]
    fn trend_gate_requires_both_orderings() {
        let below_ema = Indicators {
            current_price: 150.0,
            ..metrics()
        };
        assert!(!trend_gate(&below_ema));

        let inverted = Indicators {
            ema100: 130.0,
            ..metrics()
        };
        assert!(!trend_gate(&inverted));

        let equal = Indicators {
            current_price: 160.0,
            ema100: 160.0,
            ema200: 160.0,
            ..metrics()
        };
        assert!(trend_gate(&equal));
    }

    #[test]
    fn proximity_gate_reads_flag_not_prices() {
        // The price comparison lives in the indicator engine.
        let flagged = Indicators {
            current_price: 10.0,
            high_52w: 200.0,
            proximity_flag: true,
            ..metrics()
        };
        assert!(proximity_gate(&flagged));

        let unflagged = Indicators {
            current_price: 200.0,
            high_52w: 200.0,
            proximity_flag: false,
            ..metrics()
        };
        assert!(!proximity_gate(&unflagged));
    }

    #[test]
    fn consistency_boundary_fails_at_40() {
        let at = Indicators {
            up_days_pct_6m: Some(40.0),
            ..metrics()
        };
        assert!(!consistency_gate(&at));

        let above = Indicators {
            up_days_pct_6m: Some(40.000001),
            ..metrics()
        };
        assert!(consistency_gate(&above));

        let missing = Indicators {
            up_days_pct_6m: None,
            ..metrics()
        };
        assert!(!consistency_gate(&missing));
    }

    #[test]
    fn performance_boundary_passes_at_6_5() {
        let m = Indicators {
            one_year_return_standard: Some(6.5),
            ..metrics()
        };
        assert!(performance_gate(&m, ReturnFormula::Standard));

        let below = Indicators {
            one_year_return_standard: Some(6.49),
            ..metrics()
        };
        assert!(!performance_gate(&below, ReturnFormula::Standard));
    }

    #[test]
    fn formula_selector_changes_gate_d() {
        // Year-ago price below 1: the unconventional formula goes negative.
        let m = Indicators {
            price_12m_ago: Some(0.5),
            one_year_return_standard: Some(35900.0),
            one_year_return_unconventional: Some(-36000.0),
            ..metrics()
        };
        assert!(performance_gate(&m, ReturnFormula::Standard));
        assert!(!performance_gate(&m, ReturnFormula::Unconventional));
    }

    #[test]
    fn reasons_listed_in_gate_order() {
        let m = Indicators {
            current_price: 100.0,
            proximity_flag: false,
            up_days_pct_6m: Some(38.4),
            one_year_return_standard: Some(3.21),
            ..metrics()
        };
        let result = evaluate_gates(&record("WEAK", m), ReturnFormula::Standard);
        assert!(!result.gate_pass);
        assert_eq!(
            result.rejection_reasons,
            "Failed Trend Alignment (price=100.00, EMA100=160.00, EMA200=140.00); \
             Failed Proximity to High (price=100.00 < 75% of 52w high 185.00); \
             Failed Consistency (up_days=38.4% <= 40%); \
             Failed Performance (one_year_return_standard=3.21% < 6.5%)"
        );
    }

    #[test]
    fn undefined_return_reason_says_na() {
        let m = Indicators {
            one_year_return_unconventional: None,
            ..metrics()
        };
        let result = evaluate_gates(&record("ONE", m), ReturnFormula::Unconventional);
        assert_eq!(
            result.rejection_reasons,
            "Failed Performance (one_year_return_unconventional=n/a < 6.5%)"
        );
    }

    #[test]
    fn apply_gatekeeper_partitions_and_counts() {
        let records = vec![
            record("AAA", metrics()),
            insufficient("BBB"),
            record(
                "CCC",
                Indicators {
                    up_days_pct_6m: Some(30.0),
                    ..metrics()
                },
            ),
            record("DDD", metrics()),
        ];
        let outcome = apply_gatekeeper(&records, ReturnFormula::Standard);

        let passing: Vec<_> = outcome.passing.iter().map(|r| r.symbol()).collect();
        let failing: Vec<_> = outcome.failing.iter().map(|r| r.symbol()).collect();
        assert_eq!(passing, vec!["AAA", "DDD"]);
        assert_eq!(failing, vec!["BBB", "CCC"]);
        assert_eq!(
            outcome.breakdown,
            RejectionBreakdown {
                insufficient_data: 1,
                failed_consistency: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn apply_gatekeeper_is_repeatable() {
        let records = vec![
            record("AAA", metrics()),
            insufficient("BBB"),
            record(
                "CCC",
                Indicators {
                    current_price: 90.0,
                    ..metrics()
                },
            ),
        ];
        let first = apply_gatekeeper(&records, ReturnFormula::Unconventional);
        let second = apply_gatekeeper(&records, ReturnFormula::Unconventional);
        assert_eq!(first, second);
    }

    #[test]
    fn formula_parses_case_insensitively() {
        assert_eq!("Standard".parse::<ReturnFormula>().unwrap(), ReturnFormula::Standard);
        assert_eq!(
            " unconventional ".parse::<ReturnFormula>().unwrap(),
            ReturnFormula::Unconventional
        );
        assert!(matches!(
            "log".parse::<ReturnFormula>(),
            Err(ScreenerError::UnknownReturnFormula(s)) if s == "log"
        ));
    }

    #[test]
    fn formula_from_flag() {
        assert_eq!(ReturnFormula::from_standard_flag(true), ReturnFormula::Standard);
        assert_eq!(
            ReturnFormula::from_standard_flag(false),
            ReturnFormula::Unconventional
        );
        assert_eq!(ReturnFormula::default(), ReturnFormula::Unconventional);
    }

    fn arb_metrics() -> impl Strategy<Value = Indicators> {
        (
            1.0f64..500.0,
            1.0f64..500.0,
            1.0f64..500.0,
            1.0f64..600.0,
            prop::option::of(0.0f64..100.0),
            prop::option::of(-90.0f64..300.0),
            prop::option::of(-1000.0f64..1000.0),
        )
            .prop_map(|(price, e100, e200, high, up, std, unconv)| {
                let high = high.max(price);
                Indicators {
                    current_price: price,
                    ema100: e100,
                    ema200: e200,
                    high_52w: high,
                    proximity_flag: price >= 0.75 * high,
                    up_days_pct_6m: up,
                    one_year_return_standard: std,
                    one_year_return_unconventional: unconv,
                    ..metrics()
                }
            })
    }

    proptest! {
        #[test]
        fn passing_records_satisfy_every_threshold(m in arb_metrics(), standard in any::<bool>()) {
            let formula = ReturnFormula::from_standard_flag(standard);
            let result = evaluate_gates(&record("P", m.clone()), formula);
            if result.gate_pass {
                prop_assert!(m.current_price >= m.ema100);
                prop_assert!(m.ema100 >= m.ema200);
                prop_assert!(m.current_price >= 0.75 * m.high_52w);
                prop_assert!(m.up_days_pct_6m.unwrap() > 40.0);
                prop_assert!(formula.select(&m).unwrap() >= 6.5);
                prop_assert!(result.rejection_reasons.is_empty());
            } else {
                prop_assert!(!result.rejection_reasons.is_empty());
            }
        }

        #[test]
        fn gate_pass_is_conjunction(m in arb_metrics()) {
            let result = evaluate_gates(&record("P", m), ReturnFormula::Standard);
            prop_assert_eq!(result.gate_pass, result.gates.all());
        }
    }
}
