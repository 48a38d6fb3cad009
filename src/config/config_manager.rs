// ==========================================
// 热处理炉装炉排产系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::allocation_config::{
    AllocationConfig, FurnaceRestriction, DEFAULT_FAR_DEADLINE_BUSINESS_DAYS,
    DEFAULT_SOLVER_TIME_BUDGET_MS,
};
use crate::config::allocation_config_reader::{AllocationConfigReader, ConfigResult};
use crate::db::{init_config_schema, open_sqlite_connection};
use crate::domain::furnace::Furnace;
use crate::domain::types::PreAdmissionScope;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（config_kv 不存在时自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并确保建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            init_config_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 删除 global scope 的配置值（恢复默认）
    pub fn remove_config_value(&self, key: &str) -> ConfigResult<bool> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(affected > 0)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 将完整配置写入 config_kv（覆盖同名键）
    pub fn save_allocation_config(&self, config: &AllocationConfig) -> ConfigResult<()> {
        self.set_config_value(config_keys::FURNACES, &serde_json::to_string(&config.furnaces)?)?;
        self.set_config_value(
            config_keys::FURNACE_RESTRICTIONS,
            &serde_json::to_string(&config.restrictions)?,
        )?;
        self.set_config_value(config_keys::PREFERRED_PARTS, &config.preferred_parts.join(","))?;
        self.set_config_value(
            config_keys::FAR_DEADLINE_BUSINESS_DAYS,
            &config.far_deadline_business_days.to_string(),
        )?;
        self.set_config_value(
            config_keys::PRE_ADMISSION_SCOPE,
            &config.pre_admission_scope.to_string(),
        )?;
        self.set_config_value(
            config_keys::SOLVER_TIME_BUDGET_MS,
            &config.solver_time_budget_ms.to_string(),
        )?;
        match config.reference_date {
            Some(date) => self.set_config_value(
                config_keys::REFERENCE_DATE,
                &date.format("%Y-%m-%d").to_string(),
            )?,
            None => {
                self.remove_config_value(config_keys::REFERENCE_DATE)?;
            }
        }
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 记录一次装炉计算所使用的配置,便于复现
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖现有的同名 global 配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// AllocationConfigReader Trait 实现
// ==========================================
#[async_trait]
impl AllocationConfigReader for ConfigManager {
    // ===== 炉配置 =====

    async fn get_furnaces(&self) -> ConfigResult<Vec<Furnace>> {
        match self.get_config_value(config_keys::FURNACES)? {
            Some(raw) => {
                let furnaces: Vec<Furnace> = serde_json::from_str(&raw).map_err(|e| {
                    format!("炉表配置格式错误 (key: {}): {}", config_keys::FURNACES, e)
                })?;
                Ok(furnaces)
            }
            None => Ok(AllocationConfig::default().furnaces),
        }
    }

    async fn get_restrictions(&self) -> ConfigResult<Vec<FurnaceRestriction>> {
        match self.get_config_value(config_keys::FURNACE_RESTRICTIONS)? {
            Some(raw) => {
                let restrictions: Vec<FurnaceRestriction> =
                    serde_json::from_str(&raw).map_err(|e| {
                        format!(
                            "限定名单配置格式错误 (key: {}): {}",
                            config_keys::FURNACE_RESTRICTIONS,
                            e
                        )
                    })?;
                Ok(restrictions)
            }
            None => Ok(AllocationConfig::default().restrictions),
        }
    }

    // ===== 品番规则 =====

    async fn get_preferred_parts(&self) -> ConfigResult<Vec<String>> {
        match self.get_config_value(config_keys::PREFERRED_PARTS)? {
            Some(raw) => Ok(raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()),
            None => Ok(AllocationConfig::default().preferred_parts),
        }
    }

    async fn get_far_deadline_business_days(&self) -> ConfigResult<i64> {
        let value = self.get_config_or_default(
            config_keys::FAR_DEADLINE_BUSINESS_DAYS,
            &DEFAULT_FAR_DEADLINE_BUSINESS_DAYS.to_string(),
        )?;
        match value.trim().parse::<i64>() {
            Ok(days) => Ok(days),
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::FAR_DEADLINE_BUSINESS_DAYS,
                    raw_value = %value,
                    "远期交期截止营业日格式错误，使用默认值"
                );
                Ok(DEFAULT_FAR_DEADLINE_BUSINESS_DAYS)
            }
        }
    }

    async fn get_pre_admission_scope(&self) -> ConfigResult<PreAdmissionScope> {
        let value = self.get_config_or_default(config_keys::PRE_ADMISSION_SCOPE, "TIER_ITEMS_ONLY")?;
        match value.trim().parse::<PreAdmissionScope>() {
            Ok(scope) => Ok(scope),
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::PRE_ADMISSION_SCOPE,
                    raw_value = %value,
                    "预投入范围取值无效，使用默认值"
                );
                Ok(PreAdmissionScope::default())
            }
        }
    }

    // ===== 运行参数 =====

    async fn get_solver_time_budget_ms(&self) -> ConfigResult<u64> {
        let value = self.get_config_or_default(
            config_keys::SOLVER_TIME_BUDGET_MS,
            &DEFAULT_SOLVER_TIME_BUDGET_MS.to_string(),
        )?;
        match value.trim().parse::<u64>() {
            Ok(budget_ms) => Ok(budget_ms),
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::SOLVER_TIME_BUDGET_MS,
                    raw_value = %value,
                    "求解时限格式错误，使用默认值"
                );
                Ok(DEFAULT_SOLVER_TIME_BUDGET_MS)
            }
        }
    }

    async fn get_reference_date(&self) -> ConfigResult<Option<NaiveDate>> {
        match self.get_config_value(config_keys::REFERENCE_DATE)? {
            Some(raw) if !raw.trim().is_empty() => {
                let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                    format!(
                        "基准日格式错误 (key: {}): 期望 YYYY-MM-DD，实际 {}",
                        config_keys::REFERENCE_DATE,
                        raw
                    )
                })?;
                Ok(Some(date))
            }
            _ => Ok(None),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 炉配置（JSON）
    pub const FURNACES: &str = "furnaces";
    pub const FURNACE_RESTRICTIONS: &str = "furnace_restrictions";

    // 品番规则
    pub const PREFERRED_PARTS: &str = "preferred_parts"; // 逗号分隔
    pub const FAR_DEADLINE_BUSINESS_DAYS: &str = "far_deadline_business_days";
    pub const PRE_ADMISSION_SCOPE: &str = "pre_admission_scope";

    // 运行参数
    pub const SOLVER_TIME_BUDGET_MS: &str = "solver_time_budget_ms";
    pub const REFERENCE_DATE: &str = "reference_date";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_manager() -> (NamedTempFile, ConfigManager) {
        let temp_file = NamedTempFile::new().unwrap();
        let manager = ConfigManager::new(temp_file.path().to_str().unwrap()).unwrap();
        (temp_file, manager)
    }

    #[tokio::test]
    async fn test_defaults_when_table_empty() {
        let (_file, manager) = create_manager();

        let config = manager.load_allocation_config().await.unwrap();
        assert_eq!(config, AllocationConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_reload_round_trip() {
        let (_file, manager) = create_manager();

        let mut config = AllocationConfig::default();
        config.furnaces[0].min_fill_t = 19500.0;
        config.preferred_parts = vec!["NDA07024".to_string()];
        config.reference_date = NaiveDate::from_ymd_opt(2026, 2, 2);
        config.pre_admission_scope = PreAdmissionScope::WholeHeat;
        manager.save_allocation_config(&config).unwrap();

        let loaded = manager.load_allocation_config().await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_invalid_far_deadline_falls_back() {
        let (_file, manager) = create_manager();
        manager
            .set_config_value(config_keys::FAR_DEADLINE_BUSINESS_DAYS, "abc")
            .unwrap();

        let days = manager.get_far_deadline_business_days().await.unwrap();
        assert_eq!(days, DEFAULT_FAR_DEADLINE_BUSINESS_DAYS);
    }

    #[tokio::test]
    async fn test_invalid_scope_and_budget_fall_back() {
        let (_file, manager) = create_manager();
        manager
            .set_config_value(config_keys::PRE_ADMISSION_SCOPE, "EVERYTHING")
            .unwrap();
        manager
            .set_config_value(config_keys::SOLVER_TIME_BUDGET_MS, "-1")
            .unwrap();

        assert_eq!(
            manager.get_pre_admission_scope().await.unwrap(),
            PreAdmissionScope::TierItemsOnly
        );
        assert_eq!(
            manager.get_solver_time_budget_ms().await.unwrap(),
            DEFAULT_SOLVER_TIME_BUDGET_MS
        );

        manager
            .set_config_value(config_keys::PRE_ADMISSION_SCOPE, " whole_heat ")
            .unwrap();
        assert_eq!(
            manager.get_pre_admission_scope().await.unwrap(),
            PreAdmissionScope::WholeHeat
        );
    }

    #[tokio::test]
    async fn test_malformed_furnace_json_is_error() {
        let (_file, manager) = create_manager();
        manager.set_config_value(config_keys::FURNACES, "{not json").unwrap();

        assert!(manager.get_furnaces().await.is_err());
    }

    #[test]
    fn test_snapshot_restore() {
        let (_file, source) = create_manager();
        source.set_config_value(config_keys::PREFERRED_PARTS, "A,B").unwrap();
        source
            .set_config_value(config_keys::SOLVER_TIME_BUDGET_MS, "500")
            .unwrap();
        let snapshot = source.get_config_snapshot().unwrap();

        let (_file2, target) = create_manager();
        let restored = target.restore_config_from_snapshot(&snapshot).unwrap();
        assert_eq!(restored, 2);
        assert_eq!(
            target
                .get_config_value(config_keys::PREFERRED_PARTS)
                .unwrap(),
            Some("A,B".to_string())
        );
    }
}
