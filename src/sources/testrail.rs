//! TestRail API v2 client
//!
//! Only the four read endpoints the aggregator walks are modelled:
//! `get_plans`, `get_plan`, `get_tests` and `get_case`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::http::ApiClient;
use super::SourceError;

const SERVICE: &str = "TestRail";

/// Entry in a project's plan list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanSummary {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Full plan as returned by `get_plan`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlanDetail {
    #[serde(default)]
    pub entries: Vec<PlanEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlanEntry {
    #[serde(default)]
    pub runs: Vec<RunRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunRef {
    pub id: u64,
}

impl PlanDetail {
    /// Ids of every run nested under the plan's entries
    pub fn run_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries
            .iter()
            .flat_map(|entry| entry.runs.iter().map(|run| run.id))
    }
}

/// One execution of a case inside a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TestObservation {
    #[serde(default)]
    pub case_id: Option<u64>,
    #[serde(default)]
    pub status_id: Option<i64>,
    /// Epoch seconds of the last change to this test
    #[serde(default)]
    pub updated_on: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CaseDetail {
    #[serde(default)]
    pub title: String,
}

/// The read-only TestRail calls the aggregator depends on
pub trait TestRailApi {
    fn get_plans(&self, project_id: u64) -> Result<Vec<PlanSummary>, SourceError>;
    fn get_plan(&self, plan_id: u64) -> Result<PlanDetail, SourceError>;
    fn get_tests(&self, run_id: u64) -> Result<Vec<TestObservation>, SourceError>;
    fn get_case(&self, case_id: u64) -> Result<CaseDetail, SourceError>;
}

/// Blocking HTTP implementation of [`TestRailApi`]
#[derive(Debug, Clone)]
pub struct HttpTestRail {
    api: ApiClient,
    base_url: String,
}

impl HttpTestRail {
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            api: ApiClient::new(SERVICE, user, api_key, timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, name: &str, id: u64) -> String {
        format!("{}/index.php?/api/v2/{}/{}", self.base_url, name, id)
    }

    fn get<T: DeserializeOwned>(&self, name: &str, id: u64) -> Result<T, SourceError> {
        let context = format!("{name}/{id}");
        let body = self.api.get_json(&self.endpoint(name, id), &[], &context)?;
        decode(body, &context)
    }

    fn get_list<T: DeserializeOwned>(
        &self,
        name: &str,
        id: u64,
        key: &str,
    ) -> Result<Vec<T>, SourceError> {
        let context = format!("{name}/{id}");
        let body = self.api.get_json(&self.endpoint(name, id), &[], &context)?;
        decode(unwrap_listing(body, key), &context)
    }
}

impl TestRailApi for HttpTestRail {
    fn get_plans(&self, project_id: u64) -> Result<Vec<PlanSummary>, SourceError> {
        self.get_list("get_plans", project_id, "plans")
    }

    fn get_plan(&self, plan_id: u64) -> Result<PlanDetail, SourceError> {
        self.get("get_plan", plan_id)
    }

    fn get_tests(&self, run_id: u64) -> Result<Vec<TestObservation>, SourceError> {
        self.get_list("get_tests", run_id, "tests")
    }

    fn get_case(&self, case_id: u64) -> Result<CaseDetail, SourceError> {
        self.get("get_case", case_id)
    }
}

/// Accept both list shapes TestRail has used
///
/// Older instances answer a bare array; since 6.7 list endpoints wrap the
/// array in an object with paging links (`{"offset":0,..,"plans":[...]}`).
pub fn unwrap_listing(body: Value, key: &str) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

fn decode<T: DeserializeOwned>(body: Value, context: &str) -> Result<T, SourceError> {
    serde_json::from_value(body).map_err(|e| SourceError::Decode {
        service: SERVICE,
        message: e.to_string(),
        context: context.to_string(),
    })
}
