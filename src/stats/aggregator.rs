use crate::database::entities::{ExpenseCategory, ExpenseRecord};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

/// Maximum number of months reported in the monthly breakdown
pub const MONTHLY_BREAKDOWN_LIMIT: usize = 12;

/// Overall totals for the matching expenses
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SummaryTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: u64,
    /// `total / count`, zero when there are no expenses
    #[serde(with = "rust_decimal::serde::float")]
    pub average: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryBreakdown {
    pub category: ExpenseCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyBreakdown {
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: u64,
}

/// Statistics over one user's expenses
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub summary: SummaryTotals,
    /// Categories with at least one expense, largest total first
    pub by_category: Vec<CategoryBreakdown>,
    /// Most recent months with at least one expense, newest first
    pub monthly_breakdown: Vec<MonthlyBreakdown>,
}

impl StatsSummary {
    pub fn empty() -> Self {
        Self {
            summary: SummaryTotals {
                total: Decimal::ZERO,
                count: 0,
                average: Decimal::ZERO,
            },
            by_category: Vec::new(),
            monthly_breakdown: Vec::new(),
        }
    }
}

/// Running sum and count for one group
#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    total: Decimal,
    count: u64,
}

impl Bucket {
    fn add(&mut self, amount: Decimal) {
        self.total += amount;
        self.count += 1;
    }
}

/// Groups an already-filtered expense set into a `StatsSummary`
pub struct StatsAggregator;

impl StatsAggregator {
    pub fn aggregate(records: &[ExpenseRecord]) -> StatsSummary {
        if records.is_empty() {
            return StatsSummary::empty();
        }

        StatsSummary {
            summary: Self::totals(records),
            by_category: Self::by_category(records),
            monthly_breakdown: Self::monthly_breakdown(records),
        }
    }

    fn totals(records: &[ExpenseRecord]) -> SummaryTotals {
        let mut bucket = Bucket::default();
        for record in records {
            bucket.add(record.amount);
        }

        let average = if bucket.count > 0 {
            bucket.total / Decimal::from(bucket.count)
        } else {
            Decimal::ZERO
        };

        SummaryTotals {
            total: bucket.total,
            count: bucket.count,
            average,
        }
    }

    fn by_category(records: &[ExpenseRecord]) -> Vec<CategoryBreakdown> {
        let mut groups: HashMap<ExpenseCategory, Bucket> = HashMap::new();
        for record in records {
            groups.entry(record.category).or_default().add(record.amount);
        }

        let mut breakdown: Vec<CategoryBreakdown> = groups
            .into_iter()
            .map(|(category, bucket)| CategoryBreakdown {
                category,
                total: bucket.total,
                count: bucket.count,
            })
            .collect();

        // Equal totals fall back to category name so the order is deterministic
        breakdown.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.as_str().cmp(b.category.as_str()))
        });

        breakdown
    }

    fn monthly_breakdown(records: &[ExpenseRecord]) -> Vec<MonthlyBreakdown> {
        let mut groups: BTreeMap<(i32, u32), Bucket> = BTreeMap::new();
        for record in records {
            groups
                .entry((record.date.year(), record.date.month()))
                .or_default()
                .add(record.amount);
        }

        groups
            .into_iter()
            .rev()
            .take(MONTHLY_BREAKDOWN_LIMIT)
            .map(|((year, month), bucket)| MonthlyBreakdown {
                year,
                month,
                total: bucket.total,
                count: bucket.count,
            })
            .collect()
    }
}
