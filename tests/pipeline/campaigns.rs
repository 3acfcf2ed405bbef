use std::sync::Arc;

use mediator_rust::bus::Notifications;
use mediator_rust::campaigns::{self, Campaign, CampaignInput, CreateCampaign, GetCampaign};
use mediator_rust::store::{JsonFileStore, Store};
use mediator_rust::transport::ResultMapper;
use serde_json::json;

fn input(name: &str) -> CampaignInput {
    serde_json::from_value(json!({
        "name": name,
        "organizer": "HTL Leonding",
        "reservedRatioForGirls": 0.4,
        "dates": [{
            "date": "2026-01-23",
            "startTime": "08:00:00",
            "endTime": "13:00:00",
            "departmentAssignments": [
                { "departmentName": "IT", "numberOfSeats": 40 },
                { "departmentName": "Media", "numberOfSeats": 20, "reservedRatioForGirls": 0.5 }
            ]
        }]
    }))
    .unwrap()
}

#[tokio::test]
async fn create_persists_and_returns_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).await.unwrap();
    let mediator = campaigns::mediator(Arc::new(store.clone()), Notifications::new()).unwrap();

    let created = mediator
        .send(CreateCampaign::new(input("Open day")))
        .await
        .unwrap()
        .unwrap();

    assert!(dir.path().join(format!("{}.json", created.id)).is_file());
    let stored: Campaign = store.get(created.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Open day");
    assert_eq!(stored.dates[0].department_assignments.len(), 2);

    let fetched = mediator
        .send(GetCampaign::new(created.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, stored);
}

#[tokio::test]
async fn empty_name_fails_validation_and_maps_to_422() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).await.unwrap();
    let mediator = campaigns::mediator(Arc::new(store), Notifications::new()).unwrap();

    let outcome = mediator.send(CreateCampaign::new(input(""))).await.unwrap();
    assert!(outcome.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let response = ResultMapper::default().map(&outcome, "/campaigns");
    assert_eq!(response.status(), 422);
    assert_eq!(
        response.body()["errors"],
        json!({ "name": ["must not be empty"] })
    );
}

#[tokio::test]
async fn missing_name_reaches_validation() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).await.unwrap();
    let mediator = campaigns::mediator(Arc::new(store), Notifications::new()).unwrap();
    let input: CampaignInput = serde_json::from_value(json!({ "organizer": "HTL" })).unwrap();

    let outcome = mediator.send(CreateCampaign::new(input)).await.unwrap();

    let response = ResultMapper::default().map(&outcome, "/campaigns");
    assert_eq!(response.status(), 422);
    assert_eq!(
        response.body()["errors"],
        json!({ "name": ["must not be empty"] })
    );
}
