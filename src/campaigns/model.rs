use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bus::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CampaignStatus {
    Inactive,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CampaignDateStatus {
    Active,
    Hidden,
}

/// A registration campaign: a named event with dates and seats per department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub organizer: String,
    pub status: CampaignStatus,
    #[serde(default)]
    pub dates: Vec<CampaignDate>,
    pub reserved_ratio_for_girls: Option<f64>,
    pub purge_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDate {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: CampaignDateStatus,
    #[serde(default)]
    pub department_assignments: Vec<DepartmentAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAssignment {
    pub department_name: String,
    pub number_of_seats: i16,
    pub reserved_ratio_for_girls: Option<f64>,
}

/// Client-supplied campaign fields, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInput {
    /// Missing values read as empty and are rejected by validation.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub dates: Vec<DateInput>,
    #[serde(default)]
    pub reserved_ratio_for_girls: Option<f64>,
    #[serde(default)]
    pub purge_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub department_assignments: Vec<DepartmentAssignmentInput>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAssignmentInput {
    pub department_name: String,
    pub number_of_seats: i16,
    #[serde(default)]
    pub reserved_ratio_for_girls: Option<f64>,
}

impl Campaign {
    /// A new campaign. Campaigns start inactive; their dates start active.
    pub fn create(id: Uuid, input: CampaignInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            organizer: input.organizer,
            status: CampaignStatus::Inactive,
            dates: input.dates.into_iter().map(CampaignDate::from).collect(),
            reserved_ratio_for_girls: input.reserved_ratio_for_girls,
            purge_date: input.purge_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the client-editable fields. Status and creation time are kept.
    pub fn apply(&mut self, input: CampaignInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.organizer = input.organizer;
        self.dates = input.dates.into_iter().map(CampaignDate::from).collect();
        self.reserved_ratio_for_girls = input.reserved_ratio_for_girls;
        self.purge_date = input.purge_date;
        self.updated_at = now;
    }

    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }
}

impl From<DateInput> for CampaignDate {
    fn from(input: DateInput) -> Self {
        Self {
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            status: CampaignDateStatus::Active,
            department_assignments: input
                .department_assignments
                .into_iter()
                .map(|assignment| DepartmentAssignment {
                    department_name: assignment.department_name,
                    number_of_seats: assignment.number_of_seats,
                    reserved_ratio_for_girls: assignment.reserved_ratio_for_girls,
                })
                .collect(),
        }
    }
}

/// Published after every successful change to a campaign.
///
/// Serializes as the bare campaign id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignChanged {
    pub campaign_id: Uuid,
}

impl CampaignChanged {
    pub fn new(campaign_id: Uuid) -> Self {
        Self { campaign_id }
    }
}

impl Notification for CampaignChanged {}
