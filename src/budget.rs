//! 50/30/20 budget planner
//!
//! Monthly income is split into needs (50%), wants (30%) and savings (20%).
//! Line items are tallied per bucket and compared against those targets.

use crate::error::InvestedError;
use crate::profile::UserStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Slack allowed before a bucket counts as over target
const OVER_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Needs,
    Wants,
    Savings,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Needs, Bucket::Wants, Bucket::Savings];

    /// Share of income this bucket should take
    pub fn share(&self) -> f64 {
        match self {
            Bucket::Needs => 0.5,
            Bucket::Wants => 0.3,
            Bucket::Savings => 0.2,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::Needs => "Needs",
            Bucket::Wants => "Wants",
            Bucket::Savings => "Savings",
        };
        f.write_str(name)
    }
}

impl FromStr for Bucket {
    type Err = InvestedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "needs" | "need" => Ok(Bucket::Needs),
            "wants" | "want" => Ok(Bucket::Wants),
            "savings" | "saving" => Ok(Bucket::Savings),
            _ => Err(InvestedError::unknown("bucket", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub bucket: Bucket,
}

/// Partial edit of an item; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub bucket: Option<Bucket>,
}

/// Per-bucket amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketTotals {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

impl BucketTotals {
    pub fn get(&self, bucket: Bucket) -> f64 {
        match bucket {
            Bucket::Needs => self.needs,
            Bucket::Wants => self.wants,
            Bucket::Savings => self.savings,
        }
    }

    fn add(&mut self, bucket: Bucket, amount: f64) {
        match bucket {
            Bucket::Needs => self.needs += amount,
            Bucket::Wants => self.wants += amount,
            Bucket::Savings => self.savings += amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overage {
    pub bucket: Bucket,
    pub over_by: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPlanner {
    income: f64,
    items: Vec<BudgetItem>,
    #[serde(skip)]
    next_id: u64,
}

impl BudgetPlanner {
    /// Planner seeded with the default line items for `income`
    pub fn new(income: f64) -> Self {
        let income = if income.is_finite() { income.max(0.0) } else { 0.0 };
        Self {
            income,
            items: default_items(income),
            next_id: 0,
        }
    }

    /// Planner with no line items
    pub fn empty(income: f64) -> Self {
        let mut planner = Self::new(income);
        planner.items.clear();
        planner
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn items(&self) -> &[BudgetItem] {
        &self.items
    }

    pub fn targets(&self) -> BucketTotals {
        BucketTotals {
            needs: self.income * Bucket::Needs.share(),
            wants: self.income * Bucket::Wants.share(),
            savings: self.income * Bucket::Savings.share(),
        }
    }

    /// Add an item; the amount is rounded to whole dollars. Returns the new id.
    pub fn add_item(&mut self, name: &str, amount: f64, bucket: Bucket) -> String {
        self.next_id += 1;
        let id = format!("{}-{}", slugify(name), self.next_id);
        self.items.push(BudgetItem {
            id: id.clone(),
            name: name.to_string(),
            amount: amount.round(),
            bucket,
        });
        id
    }

    /// Apply `patch` to the item with `id`; false if there is no such item
    pub fn update_item(&mut self, id: &str, patch: ItemPatch) -> bool {
        let Some(item) = self.items.iter_mut().find(|it| it.id == id) else {
            return false;
        };
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(amount) = patch.amount {
            item.amount = amount;
        }
        if let Some(bucket) = patch.bucket {
            item.bucket = bucket;
        }
        true
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|it| it.id != id);
        self.items.len() != before
    }

    pub fn totals(&self) -> BucketTotals {
        let mut totals = BucketTotals::default();
        for item in &self.items {
            let amount = if item.amount.is_finite() { item.amount } else { 0.0 };
            totals.add(item.bucket, amount);
        }
        totals
    }

    pub fn is_over(&self, bucket: Bucket) -> bool {
        self.totals().get(bucket) > self.targets().get(bucket) + OVER_TOLERANCE
    }

    /// Buckets strictly over target, in needs/wants/savings order
    pub fn overages(&self) -> Vec<Overage> {
        let totals = self.totals();
        let targets = self.targets();
        Bucket::ALL
            .iter()
            .map(|&bucket| Overage {
                bucket,
                over_by: totals.get(bucket) - targets.get(bucket),
            })
            .filter(|o| o.over_by > 0.0)
            .collect()
    }

    /// Fold the budget into existing profile stats
    ///
    /// Expenses become needs plus wants and savings the savings bucket; other
    /// fields are kept.
    pub fn to_profile_stats(&self, existing: Option<&UserStats>) -> UserStats {
        let totals = self.totals();
        let mut stats = existing.cloned().unwrap_or_default();
        stats.income = Some(self.income);
        stats.expenses = Some(totals.needs + totals.wants);
        stats.savings = Some(totals.savings);
        stats
    }
}

fn default_items(income: f64) -> Vec<BudgetItem> {
    if income <= 0.0 {
        return Vec::new();
    }

    [
        ("housing", "Housing", 0.30, Bucket::Needs),
        ("food", "Food", 0.10, Bucket::Needs),
        ("transport", "Transport", 0.05, Bucket::Needs),
        ("utilities", "Utilities", 0.05, Bucket::Needs),
        ("entertainment", "Entertainment", 0.15, Bucket::Wants),
        ("subscriptions", "Subscriptions", 0.05, Bucket::Wants),
        ("shopping", "Shopping", 0.10, Bucket::Wants),
        ("emergency", "Emergency savings", 0.15, Bucket::Savings),
        ("investing", "Investing", 0.05, Bucket::Savings),
    ]
    .into_iter()
    .map(|(id, name, share, bucket)| BudgetItem {
        id: id.to_string(),
        name: name.to_string(),
        amount: (income * share).round(),
        bucket,
    })
    .collect()
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        let planner = BudgetPlanner::new(4_000.0);
        let targets = planner.targets();
        assert_eq!(targets.needs, 2_000.0);
        assert_eq!(targets.wants, 1_200.0);
        assert_eq!(targets.savings, 800.0);
    }

    #[test]
    fn test_default_items_meet_targets() {
        let planner = BudgetPlanner::new(4_000.0);
        assert_eq!(planner.items().len(), 9);

        let totals = planner.totals();
        assert_eq!(totals.needs, 2_000.0);
        assert_eq!(totals.wants, 1_200.0);
        assert_eq!(totals.savings, 800.0);
        assert!(planner.overages().is_empty());
        for bucket in Bucket::ALL {
            assert!(!planner.is_over(bucket));
        }
    }

    #[test]
    fn test_default_amounts_are_rounded() {
        let planner = BudgetPlanner::new(1_234.0);
        let housing = &planner.items()[0];
        assert_eq!(housing.id, "housing");
        // 370.2 -> 370
        assert_eq!(housing.amount, 370.0);
    }

    #[test]
    fn test_zero_income_has_no_defaults() {
        let planner = BudgetPlanner::new(0.0);
        assert!(planner.items().is_empty());
        assert_eq!(planner.targets(), BucketTotals::default());
    }

    #[test]
    fn test_add_update_remove() {
        let mut planner = BudgetPlanner::new(4_000.0);
        let id = planner.add_item("Gym Membership", 49.6, Bucket::Wants);
        assert_eq!(id, "gym-membership-1");
        assert_eq!(planner.items().last().unwrap().amount, 50.0);
        assert!(planner.is_over(Bucket::Wants));

        let overages = planner.overages();
        assert_eq!(overages.len(), 1);
        assert_eq!(overages[0].bucket, Bucket::Wants);
        assert_eq!(overages[0].over_by, 50.0);

        assert!(planner.update_item(
            &id,
            ItemPatch {
                bucket: Some(Bucket::Needs),
                ..Default::default()
            }
        ));
        assert!(planner.is_over(Bucket::Needs));
        assert!(!planner.is_over(Bucket::Wants));

        assert!(planner.remove_item(&id));
        assert!(!planner.remove_item(&id));
        assert!(!planner.update_item(&id, ItemPatch::default()));
        assert!(planner.overages().is_empty());
    }

    #[test]
    fn test_ids_stay_unique() {
        let mut planner = BudgetPlanner::empty(1_000.0);
        let a = planner.add_item("Rent", 100.0, Bucket::Needs);
        let b = planner.add_item("Rent", 100.0, Bucket::Needs);
        assert_ne!(a, b);
    }

    #[test]
    fn test_tolerance() {
        let mut planner = BudgetPlanner::empty(1_000.0);
        planner.add_item("Rent", 500.0, Bucket::Needs);
        // Exactly on target is not over
        assert!(!planner.is_over(Bucket::Needs));
    }

    #[test]
    fn test_to_profile_stats() {
        let planner = BudgetPlanner::new(4_000.0);
        let existing = UserStats {
            income: Some(1.0),
            invested: Some(12_000.0),
            debt: Some(300.0),
            ..Default::default()
        };
        let stats = planner.to_profile_stats(Some(&existing));
        assert_eq!(stats.income, Some(4_000.0));
        assert_eq!(stats.expenses, Some(3_200.0));
        assert_eq!(stats.savings, Some(800.0));
        assert_eq!(stats.invested, Some(12_000.0));
        assert_eq!(stats.debt, Some(300.0));
    }

    #[test]
    fn test_bucket_parse() {
        assert_eq!("Needs".parse::<Bucket>().unwrap(), Bucket::Needs);
        assert_eq!(" savings ".parse::<Bucket>().unwrap(), Bucket::Savings);
        assert!("luxuries".parse::<Bucket>().is_err());
    }
}
