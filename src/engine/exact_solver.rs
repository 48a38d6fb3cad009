// ==========================================
// 热处理炉装炉排产系统 - 多炉精确分配（0/1 整数规划）
// ==========================================
// 模型:
//   变量   x[i][b] ∈ {0,1}        品番 i 是否投入炉 b
//   约束   Σ_b x[i][b] ≤ 1         每个品番至多投入一个炉
//          Σ_i w[i]·x[i][b] ≤ C[b]  每个炉不超容量
//   目标   max Σ v[i]·x[i][b]
// 红线: 每次调用新建模型,不共享求解器实例；无可行解必须显式报错
// 时限: 交给 microlp 的 time_limit,到时求解本身停止
// ==========================================

use crate::domain::item::Item;
use crate::engine::error::{AllocationError, EngineResult};
use good_lp::{
    constraint, microlp, variable, variables, Expression, ResolutionError, Solution,
    SolutionStatus, SolverModel, Variable, WithTimeLimit,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

// ==========================================
// 输入/输出结构
// ==========================================

/// 价值口径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueBasis {
    /// 价值 = 重量（装炉量最大化）
    #[default]
    Weight,
    /// 价值 = 批内最大优先等级 + 1 - 优先等级（越紧急价值越高,恒 ≥ 1）
    InvertedPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackItem {
    pub item_id: String,
    pub weight: f64,
    pub value: f64,
}

impl KnapsackItem {
    /// 由材料构造
    ///
    /// # 参数
    /// - `rank_ceiling`: InvertedPriority 口径下的批内最大优先等级
    pub fn from_item(item: &Item, basis: ValueBasis, rank_ceiling: f64) -> Self {
        let value = match basis {
            ValueBasis::Weight => item.weight,
            ValueBasis::InvertedPriority => rank_ceiling + 1.0 - item.priority_rank,
        };
        Self {
            item_id: item.item_id.clone(),
            weight: item.weight,
            value,
        }
    }

    /// 批量构造（自动取批内最大优先等级）
    pub fn from_items(items: &[Item], basis: ValueBasis) -> Vec<Self> {
        let rank_ceiling = items
            .iter()
            .map(|i| i.priority_rank)
            .fold(0.0_f64, f64::max);
        items
            .iter()
            .map(|item| Self::from_item(item, basis, rank_ceiling))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub bin_id: String,
    pub capacity: f64,
    /// 禁止投入本炉的品番（对应变量固定为 0）
    #[serde(default)]
    pub excluded_items: Vec<String>,
}

impl Bin {
    pub fn new(bin_id: impl Into<String>, capacity: f64) -> Self {
        Self {
            bin_id: bin_id.into(),
            capacity,
            excluded_items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinAssignment {
    pub bin_id: String,
    pub item_ids: Vec<String>,
    pub total_weight: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBinSolution {
    /// 与输入 bins 顺序一致
    pub assignments: Vec<BinAssignment>,
    pub total_weight: f64,
    pub total_value: f64,
}

impl MultiBinSolution {
    /// 未投入任何炉的品番
    pub fn unassigned<'a>(&self, items: &'a [KnapsackItem]) -> Vec<&'a str> {
        items
            .iter()
            .filter(|item| {
                !self
                    .assignments
                    .iter()
                    .any(|a| a.item_ids.contains(&item.item_id))
            })
            .map(|item| item.item_id.as_str())
            .collect()
    }
}

// ==========================================
// MultiBinSolver - 精确求解器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiBinSolver;

impl MultiBinSolver {
    pub fn new() -> Self {
        Self
    }

    /// 同步求解（阻塞当前线程）
    ///
    /// # 错误
    /// - InvalidItem: 重量/价值非有限数,或重量为负
    /// - Infeasible: 存在容量为负的炉（空集亦不满足）或求解器判定无可行解
    /// - Solver: 其他求解器错误
    pub fn solve(&self, items: &[KnapsackItem], bins: &[Bin]) -> EngineResult<MultiBinSolution> {
        self.solve_inner(items, bins, None)
    }

    /// 限时同步求解
    ///
    /// 时限到达时求解器停止搜索并返回 SolverTimeout（即使已有可行解,
    /// 未证明最优的结果也不返回）
    pub fn solve_within(
        &self,
        items: &[KnapsackItem],
        bins: &[Bin],
        budget: Duration,
    ) -> EngineResult<MultiBinSolution> {
        self.solve_inner(items, bins, Some(budget))
    }

    #[instrument(skip(self, items, bins), fields(items = items.len(), bins = bins.len()))]
    fn solve_inner(
        &self,
        items: &[KnapsackItem],
        bins: &[Bin],
        budget: Option<Duration>,
    ) -> EngineResult<MultiBinSolution> {
        validate_inputs(items, bins)?;

        if items.is_empty() || bins.is_empty() {
            return Ok(empty_solution(bins));
        }

        // 每次调用新建变量集与模型
        let mut vars = variables!();
        let mut x: Vec<Vec<Variable>> = Vec::with_capacity(items.len());
        for _ in items {
            let row = bins.iter().map(|_| vars.add(variable().binary())).collect();
            x.push(row);
        }

        let objective: Expression = items
            .iter()
            .zip(&x)
            .flat_map(|(item, row)| row.iter().map(move |v| item.value * *v))
            .sum();

        let mut model = vars.maximise(objective).using(microlp);

        for row in &x {
            let assigned: Expression = row.iter().copied().map(Expression::from).sum();
            model = model.with(constraint!(assigned <= 1.0));
        }

        for (b, bin) in bins.iter().enumerate() {
            let load: Expression = items
                .iter()
                .zip(&x)
                .map(|(item, row)| item.weight * row[b])
                .sum();
            model = model.with(constraint!(load <= bin.capacity));

            for (item, row) in items.iter().zip(&x) {
                if bin.excluded_items.contains(&item.item_id) {
                    model = model.with(constraint!(row[b] <= 0.0));
                }
            }
        }

        if let Some(budget) = budget {
            model = model.with_time_limit(budget.as_secs_f64());
        }

        let started = Instant::now();
        let timed_out = |started: Instant| budget.is_some_and(|b| started.elapsed() >= b);
        let solution = model.solve().map_err(|e| match e {
            ResolutionError::Infeasible => {
                AllocationError::Infeasible(format!("items={}, bins={}", items.len(), bins.len()))
            }
            // 时限内未找到可行解
            _ if timed_out(started) => timeout_error(budget),
            other => AllocationError::Solver(other.to_string()),
        })?;
        if matches!(solution.status(), SolutionStatus::TimeLimit) {
            return Err(timeout_error(budget));
        }

        let mut assignments = Vec::with_capacity(bins.len());
        for (b, bin) in bins.iter().enumerate() {
            let mut assignment = BinAssignment {
                bin_id: bin.bin_id.clone(),
                item_ids: Vec::new(),
                total_weight: 0.0,
                total_value: 0.0,
            };
            for (item, row) in items.iter().zip(&x) {
                if solution.value(row[b]) > 0.5 {
                    assignment.item_ids.push(item.item_id.clone());
                    assignment.total_weight += item.weight;
                    assignment.total_value += item.value;
                }
            }
            assignments.push(assignment);
        }

        let total_weight = assignments.iter().map(|a| a.total_weight).sum();
        let total_value = assignments.iter().map(|a| a.total_value).sum();

        let solution = MultiBinSolution {
            assignments,
            total_weight,
            total_value,
        };
        info!(
            total_weight,
            total_value,
            unassigned = solution.unassigned(items).len(),
            "精确求解完成"
        );
        Ok(solution)
    }

    /// 限时求解（异步入口）
    ///
    /// 在阻塞线程池中调用 solve_within；时限由求解器内部执行,
    /// 返回 SolverTimeout 时后台已无残留求解
    pub async fn solve_with_budget(
        &self,
        items: Vec<KnapsackItem>,
        bins: Vec<Bin>,
        budget: Duration,
    ) -> EngineResult<MultiBinSolution> {
        let solver = *self;
        let handle = tokio::task::spawn_blocking(move || solver.solve_within(&items, &bins, budget));

        match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(AllocationError::Solver(format!(
                "求解线程异常: {}",
                join_err
            ))),
        }
    }
}

fn timeout_error(budget: Option<Duration>) -> AllocationError {
    let budget_ms = budget.map(|b| b.as_millis() as u64).unwrap_or(0);
    warn!(budget_ms, "精确求解超时,求解已停止");
    AllocationError::SolverTimeout { budget_ms }
}

fn validate_inputs(items: &[KnapsackItem], bins: &[Bin]) -> EngineResult<()> {
    for (index, item) in items.iter().enumerate() {
        if !item.weight.is_finite() || item.weight < 0.0 || !item.value.is_finite() {
            return Err(AllocationError::InvalidItem {
                row: index + 1,
                item_id: Some(item.item_id.clone()),
                reason: format!("weight={}, value={}", item.weight, item.value),
            });
        }
    }

    for bin in bins {
        if !bin.capacity.is_finite() {
            return Err(AllocationError::InvalidConfig(format!(
                "炉容量非法: bin={}, capacity={}",
                bin.bin_id, bin.capacity
            )));
        }
        if bin.capacity < 0.0 {
            return Err(AllocationError::Infeasible(format!(
                "bin={} capacity={} < 0",
                bin.bin_id, bin.capacity
            )));
        }
    }

    Ok(())
}

fn empty_solution(bins: &[Bin]) -> MultiBinSolution {
    MultiBinSolution {
        assignments: bins
            .iter()
            .map(|bin| BinAssignment {
                bin_id: bin.bin_id.clone(),
                item_ids: Vec::new(),
                total_weight: 0.0,
                total_value: 0.0,
            })
            .collect(),
        total_weight: 0.0,
        total_value: 0.0,
    }
}
