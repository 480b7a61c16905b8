use transparency_core::{
    generate_insights, DashboardConfig, Dataset, FactRow, InsightKind, Period, Selection,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn row(bank: &str, yyyymm: i64, amount: Option<f64>) -> FactRow {
    FactRow {
        bank_code: bank.to_string(),
        metric_label: "Original Exposure - Corporates".to_string(),
        period: Period::from_yyyymm(yyyymm).unwrap(),
        category: "Credit Risk_STA".to_string(),
        amount,
    }
}

fn config() -> DashboardConfig {
    DashboardConfig::default_eba()
}

fn titles(insights: &[transparency_core::Insight]) -> Vec<&str> {
    insights.iter().map(|i| i.title.as_str()).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The highest-exposure insight names the leading bank with its display name.
#[test]
fn highest_exposure_names_the_leader() {
    let dataset = Dataset::from_rows(vec![
        row("DE", 202306, Some(100.0)),
        row("FR", 202306, Some(40.0)),
    ]);
    let insights = generate_insights(&dataset, &Selection::new(), &config());
    let highest = insights
        .iter()
        .find(|i| i.title == "Highest Exposure")
        .expect("highest-exposure insight present");
    assert_eq!(highest.kind, InsightKind::Info);
    assert!(highest.message.contains("Germany (DE)"), "{}", highest.message);
}

/// Trend wording and kind follow the direction of the change.
#[test]
fn period_trend_direction() {
    let rising = Dataset::from_rows(vec![
        row("DE", 202212, Some(100.0)),
        row("DE", 202306, Some(150.0)),
    ]);
    let insights = generate_insights(&rising, &Selection::new(), &config());
    let trend = insights.iter().find(|i| i.title == "Period Trend").unwrap();
    assert_eq!(trend.kind, InsightKind::Success);
    assert!(trend.message.contains("increased by 50.00%"), "{}", trend.message);
    assert!(trend.message.contains("Dec 2022"));
    assert!(trend.message.contains("Jun 2023"));

    let falling = Dataset::from_rows(vec![
        row("DE", 202212, Some(100.0)),
        row("DE", 202306, Some(50.0)),
    ]);
    let insights = generate_insights(&falling, &Selection::new(), &config());
    let trend = insights.iter().find(|i| i.title == "Period Trend").unwrap();
    assert_eq!(trend.kind, InsightKind::Warning);
    assert!(trend.message.contains("decreased by 50.00%"), "{}", trend.message);
}

/// Trend needs two periods and a nonzero previous total; otherwise it
/// contributes nothing — no placeholder.
#[test]
fn period_trend_preconditions() {
    let one_period = Dataset::from_rows(vec![row("DE", 202306, Some(100.0))]);
    let insights = generate_insights(&one_period, &Selection::new(), &config());
    assert!(!titles(&insights).contains(&"Period Trend"));

    let zero_base = Dataset::from_rows(vec![
        row("DE", 202212, Some(0.0)),
        row("DE", 202306, Some(100.0)),
    ]);
    let insights = generate_insights(&zero_base, &Selection::new(), &config());
    assert!(!titles(&insights).contains(&"Period Trend"));
}

/// The regional leader requires at least two selected banks.
#[test]
fn regional_leader_needs_multiple_selected_banks() {
    let dataset = Dataset::from_rows(vec![
        row("DE", 202306, Some(100.0)),
        row("IT", 202306, Some(10.0)),
    ]);

    let unselected = generate_insights(&dataset, &Selection::new(), &config());
    assert!(!titles(&unselected).contains(&"Regional Leader"));

    let selection = Selection::new().with_banks(["DE", "IT"]);
    let selected = generate_insights(&dataset, &selection, &config());
    let leader = selected
        .iter()
        .find(|i| i.title == "Regional Leader")
        .expect("leader insight with two banks selected");
    assert!(
        leader.message.contains("Western Europe"),
        "{}",
        leader.message
    );
}

/// Missing values trigger the data-quality warning with count and share.
#[test]
fn data_quality_reports_missing_share() {
    let dataset = Dataset::from_rows(vec![
        row("DE", 202306, Some(1.0)),
        row("DE", 202306, None),
        row("FR", 202306, Some(2.0)),
        row("FR", 202306, None),
    ]);
    let insights = generate_insights(&dataset, &Selection::new(), &config());
    let quality = insights.iter().find(|i| i.title == "Data Quality").unwrap();
    assert_eq!(quality.kind, InsightKind::Warning);
    assert!(quality.message.contains("2 missing values"), "{}", quality.message);
    assert!(quality.message.contains("50.0%"), "{}", quality.message);
}

/// Outlier insight needs more than ten rows and at least one fence breach.
#[test]
fn outlier_insight_preconditions() {
    let mut rows: Vec<FactRow> = (0..11).map(|_| row("DE", 202306, Some(10.0))).collect();
    rows.push(row("FR", 202306, Some(100000.0)));
    let dataset = Dataset::from_rows(rows);
    let insights = generate_insights(&dataset, &Selection::new(), &config());
    let outliers = insights
        .iter()
        .find(|i| i.title == "Outliers Detected")
        .expect("outlier insight over 12 rows with one extreme value");
    assert!(outliers.message.contains("1 outlier"), "{}", outliers.message);

    let few = Dataset::from_rows(vec![row("DE", 202306, Some(1.0)); 5]);
    let insights = generate_insights(&few, &Selection::new(), &config());
    assert!(!titles(&insights).contains(&"Outliers Detected"));
}

/// An empty selection result produces no insights and no errors.
#[test]
fn empty_selection_produces_nothing() {
    let dataset = Dataset::from_rows(vec![row("DE", 202306, Some(1.0))]);
    let selection = Selection::new().with_banks(["ZZ"]);
    let insights = generate_insights(&dataset, &selection, &config());
    assert!(insights.is_empty());
}

/// Rules fire in a fixed order: exposure, trend, leader, quality, outliers.
#[test]
fn insight_order_is_stable() {
    let mut rows = vec![
        row("DE", 202212, Some(100.0)),
        row("DE", 202306, Some(150.0)),
        row("IT", 202212, Some(10.0)),
        row("IT", 202306, None),
    ];
    for _ in 0..10 {
        rows.push(row("FR", 202306, Some(12.0)));
    }
    rows.push(row("FR", 202306, Some(90000.0)));
    let dataset = Dataset::from_rows(rows);
    let selection = Selection::new().with_banks(["DE", "IT", "FR"]);
    let insights = generate_insights(&dataset, &selection, &config());
    assert_eq!(
        titles(&insights),
        vec![
            "Highest Exposure",
            "Period Trend",
            "Regional Leader",
            "Data Quality",
            "Outliers Detected",
        ]
    );
}
