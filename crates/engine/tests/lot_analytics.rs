use analytics::{AnalyticsError, HarvestReadiness};
use chrono::NaiveDate;
use configuration::AnalyticsSettings;
use core_types::{AllocationPolicy, Biometry, BiometrySample, CostComponent, Harvest, Lot, LotStatus};
use engine::error::EngineError;
use engine::{Collaborators, LotAnalyticsEngine};
use providers::{CostEntry, FeedApplication, InMemoryFarmStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn lot(id: i64, days: i64, harvest: Option<Harvest>) -> Lot {
    Lot {
        id,
        code: format!("L-{id:02}"),
        pond_id: id,
        stocking_date: date(2025, 1, 1),
        stocking_quantity: 100_000,
        stocking_cost: dec!(5000.00),
        status: if harvest.is_some() { LotStatus::Finalized } else { LotStatus::Active },
        cultivation_days_elapsed: Some(days),
        harvest,
    }
}

fn cost(lot_id: i64, amount: Decimal) -> CostEntry {
    CostEntry {
        lot_id,
        date: date(2025, 2, 1),
        cost: amount,
        description: None,
    }
}

fn recorded_biometry(lot_id: i64, on: NaiveDate, weight: Decimal, gain: Decimal, biomass: Decimal) -> Biometry {
    Biometry {
        id: None,
        lot_id,
        measurement_date: on,
        cultivation_day: (on - date(2025, 1, 1)).num_days(),
        average_weight: weight,
        sampled_count: 100,
        sampled_total_weight: None,
        daily_weight_gain: Some(gain),
        estimated_biomass_kg: Some(biomass),
        estimated_survival_pct: Some(dec!(80.00)),
        feed_conversion_ratio: None,
    }
}

/// Lot 1: active, costs 32000.00, three biometries growing 0.2 g/day.
/// Lot 2: harvested. Lot 3: active, no records at all.
fn engine() -> LotAnalyticsEngine {
    let harvest = Harvest {
        harvest_date: date(2025, 4, 11),
        total_weight_kg: dec!(1600),
        count_harvested: 100_000,
        survival_rate: Some(dec!(80)),
        unit_price: dec!(25.00),
        total_revenue: dec!(40000.00),
        harvest_cost: dec!(300.00),
    };

    let store = InMemoryFarmStore::new()
        .with_lot(lot(1, 60, None))
        .with_lot(lot(2, 100, Some(harvest)))
        .with_lot(lot(3, 20, None))
        .with_feed(FeedApplication {
            lot_id: 1,
            applied_on: date(2025, 1, 15),
            quantity_kg: dec!(1000),
            cost: dec!(20000.00),
        })
        .with_feed(FeedApplication {
            lot_id: 2,
            applied_on: date(2025, 1, 15),
            quantity_kg: dec!(2400),
            cost: dec!(20000.00),
        })
        .with_nutrient(cost(1, dec!(3000.00)))
        .with_fertilization(cost(1, dec!(1500.00)))
        .with_variable_cost(cost(1, dec!(2000.00)))
        .with_variable_cost(cost(1, dec!(500.00)))
        .with_nutrient(cost(2, dec!(3000.00)))
        .with_fertilization(cost(2, dec!(1500.00)))
        .with_variable_cost(cost(2, dec!(2500.00)))
        .with_biometry(recorded_biometry(1, date(2025, 3, 2), dec!(9.0), dec!(0.3), dec!(720.00)))
        .with_biometry(recorded_biometry(1, date(2025, 2, 10), dec!(5.0), dec!(0.1), dec!(400.00)))
        .with_biometry(recorded_biometry(1, date(2025, 2, 20), dec!(7.0), dec!(0.2), dec!(560.00)));

    LotAnalyticsEngine::new(
        AnalyticsSettings::default(),
        Collaborators::from_store(Arc::new(store)),
    )
}

#[test]
fn breakdown_total_is_the_exact_sum() {
    let breakdown = engine().cost_breakdown(1).unwrap();

    assert_eq!(breakdown.stocking, dec!(5000.00));
    assert_eq!(breakdown.feed, dec!(20000.00));
    assert_eq!(breakdown.nutrient, dec!(3000.00));
    assert_eq!(breakdown.fertilization, dec!(1500.00));
    assert_eq!(breakdown.variable, dec!(2500.00));
    assert_eq!(breakdown.total, dec!(32000.00));
}

#[test]
fn lot_without_records_costs_only_its_stocking() {
    let engine = engine();
    let breakdown = engine.cost_breakdown(3).unwrap();
    assert_eq!(breakdown.total, dec!(5000.00));

    let shares = engine.cost_percentages(3).unwrap();
    assert_eq!(shares[&CostComponent::Stocking], dec!(100.00));
    assert_eq!(shares[&CostComponent::Feed], Decimal::ZERO);
}

#[test]
fn per_unit_costs_are_zero_before_harvest() {
    let engine = engine();
    assert_eq!(engine.cost_per_kg(1).unwrap(), Decimal::ZERO);
    assert_eq!(engine.cost_per_shrimp(1).unwrap(), Decimal::ZERO);
    assert!(engine.roi(1).unwrap().is_none());
    // 32000 / 60 days
    assert_eq!(engine.average_daily_cost(1).unwrap(), dec!(533.33));
}

#[test]
fn harvested_lot_reports_unit_costs_and_roi() {
    let engine = engine();

    assert_eq!(engine.cost_per_kg(2).unwrap(), dec!(20.00));
    assert_eq!(engine.cost_per_shrimp(2).unwrap(), dec!(0.3200));

    let roi = engine.roi(2).unwrap().unwrap();
    assert_eq!(roi.profit, roi.revenue - roi.total_cost);
    assert_eq!(roi.profit, dec!(8000.00));
    assert_eq!(roi.roi_pct, dec!(25.00));
    assert_eq!(roi.margin_pct, dec!(20.00));

    let performance = engine.harvest_performance(2).unwrap().unwrap();
    assert_eq!(performance.survival_pct, Some(dec!(100.00)));
    assert_eq!(performance.final_fca, Some(dec!(1.500)));
}

#[test]
fn new_biometry_gets_its_indicators() {
    let sample = BiometrySample {
        measurement_date: date(2025, 1, 31),
        average_weight: dec!(12.500),
        sampled_count: 120,
        sampled_total_weight: Some(dec!(1500)),
    };

    let biometry = engine().create_biometry(1, &sample).unwrap();

    assert_eq!(biometry.cultivation_day, 30);
    assert_eq!(biometry.estimated_biomass_kg, Some(dec!(1000.00)));
    assert_eq!(biometry.estimated_survival_pct, Some(dec!(80.00)));
    // 1000 kg of feed over 1000 kg of biomass.
    assert_eq!(biometry.feed_conversion_ratio, Some(dec!(1.000)));
}

#[test]
fn fca_is_unset_without_recorded_feed() {
    let sample = BiometrySample {
        measurement_date: date(2025, 1, 21),
        average_weight: dec!(2.0),
        sampled_count: 50,
        sampled_total_weight: None,
    };

    let biometry = engine().create_biometry(3, &sample).unwrap();
    assert_eq!(biometry.feed_conversion_ratio, None);
    assert_eq!(biometry.daily_weight_gain, Some(dec!(0.1000)));
}

#[test]
fn finalized_lot_rejects_biometry() {
    let sample = BiometrySample {
        measurement_date: date(2025, 4, 20),
        average_weight: dec!(16),
        sampled_count: 50,
        sampled_total_weight: None,
    };

    let err = engine().create_biometry(2, &sample).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Analytics(AnalyticsError::LotNotAccepting { status: LotStatus::Finalized })
    ));
    assert_eq!(err.status_code(), 422);
}

#[test]
fn updated_biometry_is_recalculated() {
    let engine = engine();
    let mut existing = engine
        .create_biometry(
            1,
            &BiometrySample {
                measurement_date: date(2025, 1, 31),
                average_weight: dec!(12.5),
                sampled_count: 100,
                sampled_total_weight: None,
            },
        )
        .unwrap();
    existing.average_weight = dec!(10.0);

    let updated = engine.update_biometry(&existing).unwrap();
    assert_eq!(updated.estimated_biomass_kg, Some(dec!(800.00)));
    assert_eq!(updated.daily_weight_gain, Some(dec!(0.3333)));
}

#[test]
fn unknown_lot_is_not_found() {
    let err = engine().cost_breakdown(99).unwrap_err();
    assert!(matches!(err, EngineError::NotFound { entity: "Lot", id: 99 }));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn projections_follow_the_recent_growth_rate() {
    let engine = engine();

    let first = engine.project_average_weight(1, date(2025, 3, 12)).unwrap();
    let second = engine.project_average_weight(1, date(2025, 3, 12)).unwrap();
    assert_eq!(first, dec!(11.00));
    assert_eq!(first, second);

    assert_eq!(engine.project_biomass_at_harvest(1, date(2025, 3, 12)).unwrap(), dec!(880.00));
    assert_eq!(
        engine.project_revenue_at_harvest(1, date(2025, 3, 12), dec!(25)).unwrap(),
        dec!(22000.00)
    );

    let profit = engine.project_profit_at_harvest(1, date(2025, 3, 12), dec!(25)).unwrap();
    assert_eq!(profit.cost_to_date, dec!(32000.00));
    assert_eq!(profit.projected_profit, dec!(-10000.00));
    assert_eq!(profit.roi_pct, Some(dec!(-31.25)));
}

#[test]
fn harvest_date_lands_in_the_window() {
    let suggestion = engine().suggest_harvest_date(1, date(2025, 3, 5)).unwrap();

    assert_eq!(suggestion.status, HarvestReadiness::Ideal);
    assert_eq!(suggestion.days_needed, 30);
    assert_eq!(suggestion.suggested_date, date(2025, 4, 1));
    assert_eq!(suggestion.current_weight_g, dec!(9.0));
    assert_eq!(suggestion.average_daily_gain, dec!(0.2000));
}

#[test]
fn projections_need_two_biometries() {
    let err = engine().suggest_harvest_date(3, date(2025, 3, 5)).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Analytics(AnalyticsError::NotEnoughBiometries { required: 2, found: 0 })
    ));
    assert_eq!(err.status_code(), 422);
}

#[test]
fn growth_curve_spans_consecutive_biometries() {
    let curve = engine().growth_curve(1).unwrap();
    assert_eq!(curve.len(), 2);
    assert_eq!(curve[0].daily_gain, dec!(0.2000));
    assert_eq!(curve[1].daily_gain, dec!(0.2000));
}

#[test]
fn shared_cost_split_sums_to_the_total() {
    let engine = engine();

    let equal = engine
        .allocate_shared_cost(dec!(900.00), &[1, 2, 3], AllocationPolicy::Equal)
        .unwrap();
    let amounts: Vec<Decimal> = equal.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![dec!(300.00), dec!(300.00), dec!(300.00)]);

    // 60 / 100 / 20 days of 180 in total.
    let by_days = engine
        .allocate_shared_cost(dec!(100.00), &[1, 2, 3], AllocationPolicy::ByCultivationDays)
        .unwrap();
    let amounts: Vec<Decimal> = by_days.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![dec!(33.34), dec!(55.55), dec!(11.11)]);
    assert_eq!(amounts.iter().sum::<Decimal>(), dec!(100.00));

    // Only lot 1 has a biometry with biomass.
    let by_biomass = engine
        .allocate_shared_cost(dec!(50.00), &[1, 3], AllocationPolicy::ByBiomass)
        .unwrap();
    assert_eq!(by_biomass[0].amount, dec!(50.00));
    assert_eq!(by_biomass[1].amount, Decimal::ZERO);
}

#[test]
fn shared_cost_split_of_unknown_lot_is_not_found() {
    let err = engine()
        .allocate_shared_cost(dec!(10), &[1, 42], AllocationPolicy::Equal)
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}
