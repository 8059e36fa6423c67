//! Test observation aggregator
//!
//! Walks a project's plan -> run -> test hierarchy and collapses every
//! observation of a case down to the most recent one. Case titles are
//! fetched once per case id and memoized for the duration of a single run.

use std::collections::HashMap;
use std::fmt;

use crate::core::dates::epoch_to_date;
use crate::core::status::StatusMap;
use crate::entities::TestCase;
use crate::sources::testrail::{TestObservation, TestRailApi};
use crate::sources::{SourceError, TestCaseSource};

/// Which part of the hierarchy a partial-data warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataScope {
    Plan(u64),
    Run(u64),
    Case(u64),
}

impl fmt::Display for DataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataScope::Plan(id) => write!(f, "plan {}", id),
            DataScope::Run(id) => write!(f, "run {}", id),
            DataScope::Case(id) => write!(f, "case {}", id),
        }
    }
}

/// A fetch that failed without aborting the aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialDataWarning {
    pub scope: DataScope,
    pub message: String,
}

impl fmt::Display for PartialDataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped {}: {}", self.scope, self.message)
    }
}

/// Result of one aggregation run
#[derive(Debug, Clone, Default)]
pub struct AggregationReport {
    /// One entry per case id, in order of first encounter
    pub cases: Vec<TestCase>,
    pub warnings: Vec<PartialDataWarning>,
    pub plans_seen: usize,
    pub runs_seen: usize,
    pub observations: usize,
}

impl AggregationReport {
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// What was skipped, e.g. "1 plan, 2 runs, 1 case title"; `None` when complete
    pub fn partial_summary(&self) -> Option<String> {
        if !self.is_partial() {
            return None;
        }
        let count = |f: fn(&DataScope) -> bool| self.warnings.iter().filter(|w| f(&w.scope)).count();
        let parts: Vec<String> = [
            (count(|s| matches!(s, DataScope::Plan(_))), "plan"),
            (count(|s| matches!(s, DataScope::Run(_))), "run"),
            (count(|s| matches!(s, DataScope::Case(_))), "case title"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, noun)| format!("{} {}{}", n, noun, if n == 1 { "" } else { "s" }))
        .collect();
        Some(parts.join(", "))
    }
}

#[derive(Debug)]
struct Latest {
    status: String,
    updated_on: i64,
}

/// Aggregates observations for one project through a [`TestRailApi`]
pub struct Aggregator<'a, A: TestRailApi + ?Sized> {
    api: &'a A,
    statuses: &'a StatusMap,
}

impl<'a, A: TestRailApi + ?Sized> Aggregator<'a, A> {
    pub fn new(api: &'a A, statuses: &'a StatusMap) -> Self {
        Self { api, statuses }
    }

    /// Fetch and collapse every observation in the project
    ///
    /// Failing to list the project's plans is fatal. Failing to load a plan
    /// or a run's tests skips it and records a [`PartialDataWarning`].
    pub fn run(&self, project_id: u64) -> Result<AggregationReport, SourceError> {
        let plans = self.api.get_plans(project_id)?;
        tracing::info!(project_id, plans = plans.len(), "aggregating test plans");

        let mut report = AggregationReport {
            plans_seen: plans.len(),
            ..Default::default()
        };
        let mut order: Vec<u64> = Vec::new();
        let mut latest: HashMap<u64, Latest> = HashMap::new();
        let mut titles: HashMap<u64, String> = HashMap::new();

        for plan in &plans {
            let detail = match self.api.get_plan(plan.id) {
                Ok(detail) => detail,
                Err(e) => {
                    warn(&mut report, DataScope::Plan(plan.id), &e);
                    continue;
                }
            };

            for run_id in detail.run_ids() {
                report.runs_seen += 1;
                let tests = match self.api.get_tests(run_id) {
                    Ok(tests) => tests,
                    Err(e) => {
                        warn(&mut report, DataScope::Run(run_id), &e);
                        continue;
                    }
                };

                for test in &tests {
                    report.observations += 1;
                    self.observe(test, &mut order, &mut latest, &mut titles, &mut report);
                }
            }
        }

        report.cases = order
            .into_iter()
            .filter_map(|case_id| {
                latest.remove(&case_id).map(|obs| TestCase {
                    id: case_id.to_string(),
                    title: titles.remove(&case_id).unwrap_or_default(),
                    status: obs.status,
                    tested_on: epoch_to_date(obs.updated_on),
                })
            })
            .collect();

        tracing::info!(
            cases = report.cases.len(),
            observations = report.observations,
            warnings = report.warnings.len(),
            "aggregation finished"
        );
        Ok(report)
    }

    fn observe(
        &self,
        test: &TestObservation,
        order: &mut Vec<u64>,
        latest: &mut HashMap<u64, Latest>,
        titles: &mut HashMap<u64, String>,
        report: &mut AggregationReport,
    ) {
        let Some(case_id) = test.case_id else {
            tracing::debug!("test without case_id ignored");
            return;
        };

        if !titles.contains_key(&case_id) {
            let title = match self.api.get_case(case_id) {
                Ok(case) => case.title,
                Err(e) => {
                    warn(report, DataScope::Case(case_id), &e);
                    String::new()
                }
            };
            titles.insert(case_id, title);
        }

        let updated_on = test.updated_on.unwrap_or(0);
        let status = self.statuses.label_for(test.status_id);
        match latest.get_mut(&case_id) {
            Some(current) => {
                if updated_on > current.updated_on {
                    *current = Latest { status, updated_on };
                }
            }
            None => {
                order.push(case_id);
                latest.insert(case_id, Latest { status, updated_on });
            }
        }
    }
}

fn warn(report: &mut AggregationReport, scope: DataScope, err: &SourceError) {
    tracing::warn!(%scope, error = %err, "partial data: skipping");
    report.warnings.push(PartialDataWarning {
        scope,
        message: err.to_string(),
    });
}

/// A project in a test-management backend, viewed as a test-case table
pub struct TestRailSource<A: TestRailApi> {
    api: A,
    project_id: u64,
    statuses: StatusMap,
}

impl<A: TestRailApi> TestRailSource<A> {
    pub fn new(api: A, project_id: u64, statuses: StatusMap) -> Self {
        Self {
            api,
            project_id,
            statuses,
        }
    }

    pub fn aggregate(&self) -> Result<AggregationReport, SourceError> {
        Aggregator::new(&self.api, &self.statuses).run(self.project_id)
    }
}

impl<A: TestRailApi> TestCaseSource for TestRailSource<A> {
    fn test_cases(&self) -> Result<Vec<TestCase>, SourceError> {
        let report = self.aggregate()?;
        if let Some(skipped) = report.partial_summary() {
            tracing::warn!(
                %skipped,
                "test data is partial; some plans, runs or case titles could not be read"
            );
        }
        Ok(report.cases)
    }
}
