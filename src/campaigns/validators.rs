//! Campaign input validation.
//!
//! Two independent validators so the validation behavior can run them
//! concurrently: one checks the campaign's own fields, the other its
//! schedule (dates and department assignments).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::model::CampaignInput;
use super::{CreateCampaign, UpdateCampaign};
use crate::mediator::{rules, Request, Validator};
use crate::outcome::ValidationFailure;

pub const MAX_NAME_LEN: usize = 200;

/// Requests that carry a [`CampaignInput`].
pub trait WithCampaignInput {
    fn campaign_input(&self) -> &CampaignInput;
}

impl WithCampaignInput for CreateCampaign {
    fn campaign_input(&self) -> &CampaignInput {
        &self.input
    }
}

impl WithCampaignInput for UpdateCampaign {
    fn campaign_input(&self) -> &CampaignInput {
        &self.input
    }
}

/// Name, organizer and the campaign-wide reserved ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignFieldsValidator;

#[async_trait]
impl<Q> Validator<Q> for CampaignFieldsValidator
where
    Q: Request + WithCampaignInput,
{
    async fn validate(&self, request: &Q, _: &CancellationToken) -> Vec<ValidationFailure> {
        let input = request.campaign_input();
        let mut failures = Vec::new();

        failures.extend(rules::not_blank("name", &input.name));
        failures.extend(rules::max_len("name", &input.name, MAX_NAME_LEN));
        failures.extend(rules::not_blank("organizer", &input.organizer));
        failures.extend(rules::max_len("organizer", &input.organizer, MAX_NAME_LEN));
        if let Some(ratio) = input.reserved_ratio_for_girls {
            failures.extend(rules::in_range("reservedRatioForGirls", ratio, 0.0, 1.0));
        }

        failures
    }
}

/// Dates, time windows and department seats.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignScheduleValidator;

#[async_trait]
impl<Q> Validator<Q> for CampaignScheduleValidator
where
    Q: Request + WithCampaignInput,
{
    async fn validate(&self, request: &Q, _: &CancellationToken) -> Vec<ValidationFailure> {
        let input = request.campaign_input();
        let mut failures = Vec::new();

        for (i, date) in input.dates.iter().enumerate() {
            if let (Some(start), Some(end)) = (date.start_time, date.end_time) {
                if start >= end {
                    failures.push(ValidationFailure::new(
                        format!("dates[{i}].endTime"),
                        "must be after startTime",
                    ));
                }
            }

            for (j, assignment) in date.department_assignments.iter().enumerate() {
                let field = |name: &str| format!("dates[{i}].departmentAssignments[{j}].{name}");
                failures.extend(rules::not_blank(
                    &field("departmentName"),
                    &assignment.department_name,
                ));
                failures.extend(rules::positive(
                    &field("numberOfSeats"),
                    assignment.number_of_seats,
                ));
                if let Some(ratio) = assignment.reserved_ratio_for_girls {
                    failures.extend(rules::in_range(
                        &field("reservedRatioForGirls"),
                        ratio,
                        0.0,
                        1.0,
                    ));
                }
            }
        }

        failures
    }
}
