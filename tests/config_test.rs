// ==========================================
// 配置驱动的装炉分配测试
// ==========================================
// 测试范围: ConfigManager（SQLite config_kv）→ AllocationOrchestrator
// ==========================================

mod helpers;

use furnace_aps::config::{config_keys, AllocationConfig, AllocationConfigReader, ConfigManager};
use furnace_aps::domain::types::PreAdmissionScope;
use furnace_aps::engine::{AllocationError, AllocationOrchestrator, ValueBasis};
use helpers::test_data_builder::*;
use std::sync::Arc;
use tempfile::TempDir;

fn create_manager(dir: &TempDir) -> ConfigManager {
    let db_path = dir.path().join("config.db");
    ConfigManager::new(db_path.to_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_min_fill_threshold_is_configurable() {
    let dir = TempDir::new().unwrap();
    let manager = create_manager(&dir);

    let items = numbered(vec![
        ItemBuilder::new("A").heat("H1").weight(10000.0).rank(1.0).build(),
        ItemBuilder::new("B").heat("H1").weight(5000.0).rank(2.0).build(),
    ]);

    let orchestrator = AllocationOrchestrator::new(Arc::new(manager));
    let err = orchestrator
        .allocate(&items, "ST01", Some(today()))
        .await
        .unwrap_err();
    assert!(matches!(err, AllocationError::NoFeasibleGroup { min_fill_t, .. } if min_fill_t == 20000.0));

    // 覆写 ST01 最低装炉量
    let manager = create_manager(&dir);
    let mut config = AllocationConfig::default();
    if let Some(f) = config.furnaces.iter_mut().find(|f| f.furnace_id == "ST01") {
        f.min_fill_t = 15000.0;
    }
    manager.save_allocation_config(&config).unwrap();

    let orchestrator = AllocationOrchestrator::new(Arc::new(manager));
    let result = orchestrator
        .allocate(&items, "ST01", Some(today()))
        .await
        .unwrap();
    assert_eq!(result.summary.total_weight, 15000.0);
}

#[tokio::test]
async fn test_invalid_config_surfaces_as_error() {
    let dir = TempDir::new().unwrap();
    let manager = create_manager(&dir);
    manager
        .set_config_value(config_keys::FURNACES, "not json")
        .unwrap();

    let orchestrator = AllocationOrchestrator::new(Arc::new(manager));
    let items = numbered(vec![ItemBuilder::new("A").build()]);
    let err = orchestrator.allocate(&items, "ST01", None).await.unwrap_err();
    assert!(matches!(err, AllocationError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_reference_date_and_scope_round_trip() {
    let dir = TempDir::new().unwrap();
    let manager = create_manager(&dir);

    let mut config = AllocationConfig::default();
    config.reference_date = Some(today());
    config.pre_admission_scope = PreAdmissionScope::WholeHeat;
    config.solver_time_budget_ms = 2_000;
    manager.save_allocation_config(&config).unwrap();

    let loaded = manager.load_allocation_config().await.unwrap();
    assert_eq!(loaded, config);

    // 快照恢复到新库
    let snapshot = manager.get_config_snapshot().unwrap();
    let other_dir = TempDir::new().unwrap();
    let other = create_manager(&other_dir);
    let restored = other.restore_config_from_snapshot(&snapshot).unwrap();
    assert!(restored >= 6);
    assert_eq!(other.load_allocation_config().await.unwrap(), config);
}

#[tokio::test]
async fn test_solve_exact_across_configured_furnaces() {
    let dir = TempDir::new().unwrap();
    let orchestrator = AllocationOrchestrator::new(Arc::new(create_manager(&dir)));

    // ST06 禁止名单品番只能进入 ST01
    let items = numbered(vec![
        ItemBuilder::new("NDA06981").weight(8000.0).build(),
        ItemBuilder::new("HDA07464").weight(8000.0).build(),
    ]);
    let solution = orchestrator
        .solve_exact(&items, &["ST01".to_string(), "ST06".to_string()], ValueBasis::Weight)
        .await
        .unwrap();

    assert_eq!(solution.total_weight, 16000.0);
    for assignment in &solution.assignments {
        match assignment.bin_id.as_str() {
            "ST01" => assert_eq!(assignment.item_ids, vec!["NDA06981"]),
            "ST06" => assert_eq!(assignment.item_ids, vec!["HDA07464"]),
            other => panic!("unexpected bin: {}", other),
        }
    }
}
