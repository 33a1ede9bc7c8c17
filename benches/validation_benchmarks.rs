use criterion::{Criterion, criterion_group, criterion_main};
use restifier::{HttpRequest, RequestHandler};
use restifier::validation::*;
use serde_json::{Value, json};
use std::hint::black_box;
use std::sync::Arc;

fn profile_schema() -> Arc<MessageSchema> {
    let education = MessageSchema::builder("EducationMessage")
        .property(Property::string("school"))
        .property(Property::string("degree").validator(regex("(MS|PHD|BS)").unwrap()))
        .build()
        .unwrap();

    MessageSchema::builder("ProfileMessage")
        .property(Property::string("name").validator(required()))
        .property(Property::integer("age").validator(bounds(Some(0.0), Some(150.0))))
        .property(Property::structured("education", education).repeated())
        .property(Property::float("ratio"))
        .property(Property::date("final_year"))
        .property(Property::datetime("created_at"))
        .build()
        .unwrap()
}

fn payload() -> Value {
    json!({
        "name": "Blah",
        "age": 42,
        "education": [
            {"school": "Yale", "degree": "MS"},
            {"school": "NCSU", "degree": "BS"}
        ],
        "ratio": 1.231232,
        "final_year": "2012-12-01",
        "created_at": 1406650720
    })
}

fn bench_validators(c: &mut Criterion) {
    let mut group = c.benchmark_group("validators");

    let bounded = BoundsValidator::range(1, 100);
    let value = FieldValue::Integer(50);
    group.bench_function("bounds", |b| b.iter(|| bounded.check(black_box(Some(&value)))));

    let pattern = RegexValidator::new("^[0-9]+[a-z]{0,2}[0-9]$").unwrap();
    let text = FieldValue::from("00000aa9");
    group.bench_function("regex", |b| b.iter(|| pattern.check(black_box(Some(&text)))));

    group.finish();
}

fn bench_message_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("message");
    let schema = profile_schema();
    let valid = payload();
    let mut invalid = payload();
    invalid["education"][1]["degree"] = json!("none");
    invalid["age"] = json!("old");

    group.bench_function("check_valid", |b| {
        b.iter(|| schema.check_value(black_box(&valid)))
    });

    group.bench_function("check_invalid", |b| {
        b.iter(|| schema.check_value(black_box(&invalid)))
    });

    let message = schema.check_value(&valid).unwrap();
    group.bench_function("to_json", |b| b.iter(|| black_box(&message).to_json()));
    group.bench_function("to_xml", |b| b.iter(|| black_box(&message).to_xml()));

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let schema = profile_schema();
    let endpoint = api(Arc::clone(&schema), schema, |message| Ok(message.into()));
    let body = payload().to_string();

    c.bench_function("api_round_trip", |b| {
        b.iter(|| {
            let request = HttpRequest::new("POST", "/profiles").with_body(body.clone());
            endpoint.handle(black_box(request))
        })
    });
}

criterion_group!(benches, bench_validators, bench_message_check, bench_pipeline);
criterion_main!(benches);
