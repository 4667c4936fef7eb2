// Raw filter form values → normalized list filters
//
// Form values arrive untrimmed, may carry the "all" sentinel, and date ranges
// are calendar days in the operator's zone.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use console_domain::{normalize_optional_text, MerchantStatus, QueryParams, TaskStatus};
use serde::Serialize;

pub const ALL_SENTINEL: &str = "all";

/// Trims, and drops blank values and the "all" sentinel.
pub fn normalize_choice(value: Option<String>) -> Option<String> {
    normalize_optional_text(value).filter(|value| !value.eq_ignore_ascii_case(ALL_SENTINEL))
}

pub fn executor_for_task_type(task_type: &str) -> Option<&'static str> {
    match task_type {
        "data_collection" => Some("fastmoss"),
        "review_task" => Some("tiktok"),
        _ => None,
    }
}

fn iso_millis(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Start of `day` in `tz`, as an ISO-8601 UTC string.
pub fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Option<String> {
    tz.from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| iso_millis(dt.with_timezone(&Utc)))
}

/// Last millisecond of `day` in `tz`, as an ISO-8601 UTC string.
pub fn end_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Option<String> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
    tz.from_local_datetime(&day.and_time(last))
        .latest()
        .map(|dt| iso_millis(dt.with_timezone(&Utc)))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDefinitionFilterForm {
    pub task_definition_id: Option<String>,
    pub task_type: Option<String>,
    pub status: Option<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinitionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_definition_id: Option<String>,
    #[serde(rename = "excutor", skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl TaskDefinitionFilter {
    pub fn from_form(form: TaskDefinitionFilterForm) -> Self {
        Self::from_form_in(form, &Local)
    }

    pub fn from_form_in<Tz: TimeZone>(form: TaskDefinitionFilterForm, tz: &Tz) -> Self {
        let (start_time, end_time) = match form.date_range {
            Some((start, end)) => (start_of_day(start, tz), end_of_day(end, tz)),
            None => (None, None),
        };
        Self {
            task_definition_id: normalize_optional_text(form.task_definition_id),
            executor: normalize_choice(form.task_type)
                .and_then(|task_type| executor_for_task_type(&task_type).map(str::to_string)),
            status: normalize_choice(form.status).map(|status| status.to_lowercase()),
            start_time,
            end_time,
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MerchantFilter {
    pub status: Option<MerchantStatus>,
}

impl MerchantFilter {
    /// Unknown status values are dropped rather than sent.
    pub fn from_form(status: Option<String>) -> Self {
        Self {
            status: normalize_choice(status).and_then(|status| MerchantStatus::parse(&status)),
        }
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new().with("status", self.status.as_ref().map(|s| s.as_str().to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopFilterForm {
    pub platform: Option<String>,
    pub status: Option<String>,
    pub site_code: Option<String>,
    pub name: Option<String>,
    pub auth_expired_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopFilter {
    pub platform: Option<String>,
    pub status: Option<String>,
    pub site_code: Option<String>,
    pub name: Option<String>,
    pub auth_expired_status: Option<String>,
}

impl ShopFilter {
    pub fn from_form(form: ShopFilterForm) -> Self {
        Self {
            platform: normalize_choice(form.platform).map(|p| p.to_uppercase()),
            status: normalize_choice(form.status).map(|s| s.to_uppercase()),
            site_code: normalize_choice(form.site_code).map(|s| s.to_uppercase()),
            name: normalize_optional_text(form.name),
            auth_expired_status: normalize_choice(form.auth_expired_status).map(|s| s.to_uppercase()),
        }
    }

    pub fn to_params(&self, page: u32, page_size: u32) -> QueryParams {
        QueryParams::new()
            .with("page", Some(page))
            .with("pageSize", Some(page_size))
            .with("platform", self.platform.as_deref())
            .with("status", self.status.as_deref())
            .with("siteCode", self.site_code.as_deref())
            .with("name", self.name.as_deref())
            .with("authExpiredStatus", self.auth_expired_status.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubTaskFilter {
    pub status: Option<TaskStatus>,
}

impl SubTaskFilter {
    pub fn from_form(status: Option<String>) -> Self {
        Self {
            status: normalize_choice(status).map(|status| TaskStatus::from(status.as_str())),
        }
    }

    pub fn matches(&self, status: &TaskStatus) -> bool {
        self.status.as_ref().map(|wanted| wanted == status).unwrap_or(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub keyword: String,
}

impl SearchFilter {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.trim().to_string(),
        }
    }
}
