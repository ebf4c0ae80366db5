//! Integration tests for model-core
//!
//! Drives the services with synthetic diurnal datasets.

use chrono::NaiveDate;
use dataset_core::{synthesize, MetricGroup, SynthesisConfig, Table};
use model_core::{
    Metric, ModelError, ModelRegistry, ModelService, SeasonalForecaster, ShortHorizonFitter,
    TimeOfDay,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;

fn synthetic(group: MetricGroup, seed: u64) -> Table {
    let config = SynthesisConfig::new(group, 1, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    synthesize(&config, &mut StdRng::seed_from_u64(seed)).unwrap()
}

// ============================================================================
// Short-horizon path
// ============================================================================

#[test]
fn test_fit_and_predict_follow_daily_shape() {
    let service = ModelService::default();
    let report = service.fit_table(&synthetic(MetricGroup::Resource, 1)).unwrap();
    assert_eq!(report.metrics(), vec![Metric::Cpu, Metric::Memory]);

    let afternoon = service
        .predict(Some("resource"), Some("2024-06-01 16:00:00"))
        .unwrap();
    let night = service
        .predict(Some("resource"), Some("2024-06-01 04:00:00"))
        .unwrap();

    assert!(afternoon.get(Metric::Cpu).unwrap() > night.get(Metric::Cpu).unwrap());
    assert!(afternoon.get(Metric::Memory).unwrap() > night.get(Metric::Memory).unwrap());
}

#[test]
fn test_prediction_within_residual_error_of_training_point() {
    let service = ModelService::default();
    service.fit_table(&synthetic(MetricGroup::Requests, 2)).unwrap();
    let summary = &service.model_summaries()[0];

    // Noise is ±10 around the curve; the fit should explain most variance
    assert!(summary.r_squared > 0.9, "r² {}", summary.r_squared);
    let noon = service
        .predict(Some("requests"), Some("2024-01-03T12:00:00"))
        .unwrap()
        .get(Metric::Requests)
        .unwrap() as f64;
    // Noise-free curve at 12:00
    let expected = 50.0 + 950.0 * ((2.0 * std::f64::consts::PI * 120.0 / 1440.0).sin() + 1.0) / 2.0;
    assert!((noon - expected).abs() < 4.0 * summary.rmse + 1.0);
}

#[test]
fn test_requests_fit_leaves_resource_models_alone() {
    let service = ModelService::default();
    service.fit_table(&synthetic(MetricGroup::Resource, 3)).unwrap();
    let cpu_before = service.registry().get(Metric::Cpu).unwrap();

    service.fit_table(&synthetic(MetricGroup::Requests, 4)).unwrap();

    let cpu_after = service.registry().get(Metric::Cpu).unwrap();
    assert!(Arc::ptr_eq(&cpu_before, &cpu_after));
    assert_eq!(
        service.registry().fitted_metrics(),
        vec![Metric::Cpu, Metric::Memory, Metric::Requests]
    );
}

#[test]
fn test_predict_before_fit_is_model_not_loaded() {
    let service = ModelService::default();
    for kind in ["resource", "requests"] {
        assert!(matches!(
            service.predict(Some(kind), Some("2024-01-01T10:00:00")),
            Err(ModelError::ModelNotLoaded(_))
        ));
    }
}

// ============================================================================
// Registry concurrency
// ============================================================================

#[test]
fn test_concurrent_puts_on_different_metrics() {
    let registry = Arc::new(ModelRegistry::new());
    let features: Vec<TimeOfDay> = (0..24).map(|h| TimeOfDay::new(h * 60).unwrap()).collect();

    let handles: Vec<_> = [Metric::Cpu, Metric::Requests]
        .into_iter()
        .map(|metric| {
            let registry = Arc::clone(&registry);
            let features = features.clone();
            thread::spawn(move || {
                let fitter = ShortHorizonFitter::default();
                for round in 0..20 {
                    let level = match metric {
                        Metric::Cpu => 100.0,
                        _ => 5000.0,
                    } + round as f64;
                    let model = fitter.fit(metric, &features, &vec![level; 24]).unwrap();
                    registry.put(model);

                    let current = registry.get(metric).unwrap();
                    assert_eq!(current.metric, metric);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let noon = TimeOfDay::new(720).unwrap();
    let cpu = registry.get(Metric::Cpu).unwrap().predict(noon).unwrap();
    let requests = registry.get(Metric::Requests).unwrap().predict(noon).unwrap();
    assert!((cpu - 119.0).abs() < 1e-6);
    assert!((requests - 5019.0).abs() < 1e-6);
}

// ============================================================================
// Seasonal path
// ============================================================================

#[test]
fn test_forecast_synthetic_week() {
    let service = ModelService::default();
    let result = service
        .forecast_table(&synthetic(MetricGroup::Resource, 5))
        .unwrap();

    // Last sample of the week is Sunday 23:45
    assert_eq!(result.formatted_timestamp(), "2024-01-08 00:00:00");
    for metric in [Metric::Cpu, Metric::Memory] {
        let value = result.get(metric).unwrap();
        assert!(value.is_finite());
        assert!((-100.0..=400.0).contains(&value), "{} forecast {}", metric, value);
    }
    // Forecasting never touches the registry
    assert!(service.registry().is_empty());
}

#[test]
fn test_forecast_rejects_hourly_series_in_strict_mode() {
    let hourly: Vec<String> = (0..48)
        .map(|h| format!("2024-01-{:02} {:02}:00:00", 1 + h / 24, h % 24))
        .collect();
    let table = Table::from_rows(
        vec!["timestamp".to_string(), "requests".to_string()],
        hourly
            .iter()
            .enumerate()
            .map(|(i, t)| {
                vec![
                    dataset_core::Cell::Text(t.clone()),
                    dataset_core::Cell::Number(100.0 + (i % 4) as f64),
                ]
            })
            .collect(),
    );

    let strict = ModelService::default();
    assert!(matches!(
        strict.forecast_table(&table),
        Err(ModelError::IncompatibleSamplingInterval { observed_minutes: 60, .. })
    ));

    let lenient = ModelService::new(
        ShortHorizonFitter::default(),
        SeasonalForecaster::default().with_strict_interval(false),
        Arc::new(ModelRegistry::new()),
    );
    let result = lenient.forecast_table(&table).unwrap();
    assert_eq!(result.formatted_timestamp(), "2024-01-02 23:15:00");
}
