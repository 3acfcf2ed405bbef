use mediator_rust::mediator::DispatchError;
use mediator_rust::outcome::{fail, DomainError, Failure, Outcome, ValidationErrors, ValidationFailure};
use mediator_rust::transport::{MapperConfig, ResultMapper, PROBLEM_JSON};
use serde_json::json;

#[test]
fn validation_problem_body() {
    let mapper = ResultMapper::new(MapperConfig {
        problem_type_prefix: "https://registration.test/problems".into(),
        map_extended_kinds: false,
    });
    let outcome: Outcome<()> = fail(ValidationErrors::new(vec![
        ValidationFailure::new("organizer", "must not be empty"),
        ValidationFailure::new("dates[0].endTime", "must be after startTime"),
    ]));

    let response = mapper.map(&outcome, "/campaigns");

    assert_eq!(response.status(), 422);
    assert_eq!(response.content_type(), PROBLEM_JSON);
    assert_eq!(
        response.body(),
        &json!({
            "type": "https://registration.test/problems/validation-error",
            "title": "One or more validation errors occurred",
            "status": 422,
            "instance": "/campaigns",
            "errors": {
                "dates[0].endTime": ["must be after startTime"],
                "organizer": ["must not be empty"],
            },
        })
    );
}

#[test]
fn status_depends_only_on_first_error() {
    let mapper = ResultMapper::default();

    let validation_first: Outcome<()> = Err(Failure::new(ValidationErrors::single("a", "b"))
        .with(DomainError::Internal("later".into())));
    let internal_first: Outcome<()> = Err(Failure::new(DomainError::Internal("first".into()))
        .with(ValidationErrors::single("a", "b")));

    assert_eq!(mapper.map(&validation_first, "/").status(), 422);
    assert_eq!(mapper.map(&internal_first, "/").status(), 500);
}

#[test]
fn repeated_mapping_is_identical() {
    let mapper = ResultMapper::new(MapperConfig {
        map_extended_kinds: true,
        ..MapperConfig::default()
    });
    let outcomes: Vec<Outcome<u32>> = vec![
        Ok(7),
        fail(ValidationErrors::single("n", "bad")),
        fail(DomainError::NotFound("n".into())),
        fail(DomainError::Internal("n".into())),
    ];

    for outcome in &outcomes {
        assert_eq!(mapper.map(outcome, "/n"), mapper.map(outcome, "/n"));
    }
}

#[test]
fn raised_and_typed_validation_share_a_body() {
    let mapper = ResultMapper::default();
    let errors = ValidationErrors::single("text", "too quiet");

    let typed = mapper.map::<()>(&fail(errors.clone()), "/shout");
    let raised = mapper.map_dispatch_error(&DispatchError::Validation(errors), "/shout");

    assert_eq!(typed, raised);
}
