//! Integration tests for goal dependency checks and credit risk scoring.

use retina_engine::credit::{Partner, PartnerSet, RiskLevel, compute_credit_risk_score};
use retina_engine::graph::{
    DependencyGraph, GoalDependency, get_affected_goals, get_topological_order,
    validate_dependencies, would_create_cycle,
};
use retina_engine::ErrorCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const NONE: &[&str] = &[];

/// Goals as a wizard would persist them, loaded from JSON.
fn roadmap() -> Vec<GoalDependency> {
    serde_json::from_str(
        r#"[
            {"goalId": "hire-team", "dependsOn": ["raise-seed"], "enables": ["build-mvp"]},
            {"goalId": "raise-seed", "dependsOn": []},
            {"goalId": "build-mvp", "dependsOn": ["hire-team"], "enables": ["launch"]},
            {"goalId": "launch", "dependsOn": ["build-mvp", "legal-review"]},
            {"goalId": "legal-review"}
        ]"#,
    )
    .unwrap()
}

#[test]
fn test_roadmap_is_acyclic_and_ordered() {
    let goals = roadmap();
    let order = get_topological_order(&goals).unwrap();

    assert_eq!(order.len(), 5);
    let pos = |id: &str| order.iter().position(|g| g == id).unwrap();
    assert!(pos("raise-seed") < pos("hire-team"));
    assert!(pos("hire-team") < pos("build-mvp"));
    assert!(pos("build-mvp") < pos("launch"));
    assert!(pos("legal-review") < pos("launch"));
}

#[test]
fn test_wizard_blocks_cycle_and_shows_path() {
    let goals = roadmap();

    // Making fundraising wait on the launch closes a loop through the roadmap
    let result = validate_dependencies("raise-seed", &["launch"], NONE, &goals);

    assert!(!result.is_valid);
    assert_eq!(result.code, Some(ErrorCode::CycleDetected));
    let cycle = result.cycle.unwrap();
    assert_eq!(cycle.first(), cycle.last());
    assert_eq!(cycle.first().map(String::as_str), Some("raise-seed"));
    assert!(cycle.iter().any(|g| g == "launch"));
    assert!(cycle.iter().any(|g| g == "build-mvp"));
}

#[test]
fn test_wizard_accepts_new_leaf_goal() {
    let goals = roadmap();
    let result = validate_dependencies("press-release", &["launch"], NONE, &goals);
    assert!(result.is_valid);
    assert!(result.error.is_none());
}

#[test]
fn test_cycle_check_matches_topological_order() {
    let mut goals = roadmap();
    let check = would_create_cycle(&goals, "legal-review", &["launch"], NONE);
    assert!(check.has_cycle);

    goals.retain(|g| g.goal_id != "legal-review");
    goals.push(GoalDependency::new("legal-review", &["launch"], NONE));
    assert_eq!(get_topological_order(&goals), None);
}

#[test]
fn test_affected_goals_of_roadmap() {
    let affected = get_affected_goals("build-mvp", &roadmap());

    assert_eq!(affected.upstream, vec!["hire-team", "raise-seed"]);
    assert_eq!(affected.downstream, vec!["launch"]);
}

#[test]
fn test_graph_reused_for_queries() {
    let graph = DependencyGraph::from_dependencies(&roadmap());

    assert_eq!(graph.node_count(), 5);
    assert!(graph.find_cycle_from(&[]).is_none());
    let seed = graph.index_of("raise-seed").unwrap();
    assert_eq!(graph.reachable_from(seed).len(), 3);
}

#[test]
fn test_cycle_result_serializes_camel_case() {
    let existing = vec![GoalDependency::new("A", &["B"], NONE)];
    let result = would_create_cycle(&existing, "B", &["A"], NONE);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["hasCycle"], true);
    assert_eq!(json["cycle"].as_array().map(Vec::len), Some(3));
}

fn option_partners(pairs: &[(Decimal, Decimal)]) -> Vec<Partner> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, (exposure, dependency))| Partner::new(format!("p{i}"), *exposure, *dependency))
        .collect()
}

#[test]
fn test_credit_scores_across_options() {
    let expand = option_partners(&[(dec!(500000), dec!(0.8)), (dec!(120000), dec!(0.5))]);
    let hold = option_partners(&[(dec!(80000), dec!(0.3))]);
    let outsource = option_partners(&[(dec!(300000), dec!(0.9))]);

    let comparison = vec![
        PartnerSet::from(expand.clone()),
        PartnerSet::from(hold.clone()),
        PartnerSet::from(outsource.clone()),
        PartnerSet::default(),
    ];

    let expand_score = compute_credit_risk_score(&expand, &comparison).unwrap();
    let hold_score = compute_credit_risk_score(&hold, &comparison).unwrap();
    let outsource_score = compute_credit_risk_score(&outsource, &comparison).unwrap();
    let none_score = compute_credit_risk_score(&[], &comparison).unwrap();

    // expand: 400000 + 60000 = 460000 is the ceiling
    assert_eq!(expand_score.score, dec!(100));
    assert_eq!(expand_score.level, RiskLevel::High);
    assert_eq!(expand_score.total_exposure, dec!(620000));

    // hold: 24000 / 460000
    assert_eq!(hold_score.score, dec!(5.22));
    assert_eq!(hold_score.level, RiskLevel::Low);

    // outsource: 270000 / 460000
    assert_eq!(outsource_score.score, dec!(58.70));
    assert_eq!(outsource_score.level, RiskLevel::Medium);

    assert_eq!(none_score.score, Decimal::ZERO);
    assert_eq!(none_score.level, RiskLevel::Low);
}

#[test]
fn test_credit_partners_from_json_numbers() {
    let set: PartnerSet = serde_json::from_str(
        r#"{"partners": [{"id": "bank", "creditExposure": 1000, "dependencyScore": 0.25}]}"#,
    )
    .unwrap();

    let result = compute_credit_risk_score(&set.partners, &[set.clone()]).unwrap();
    assert_eq!(result.raw_score, dec!(250));
    assert_eq!(result.score, dec!(100));
    assert_eq!(result.partner_count, 1);
}
