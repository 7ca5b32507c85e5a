//! Tests for the slash-addressed result store and the in-process job
//! runner

use serde_json::{Value, json};

use crate::runner::{CallableRunner, JobRunner, TaggedOutput, format_tagged, parse_tagged};
use crate::store::{STORE_VERSION, ResultStore};

#[test]
fn test_store_header() {
    let store = ResultStore::new("montecarlo");
    assert_eq!(store.get("version"), Some(&Value::from(STORE_VERSION)));
    assert_eq!(store.get("uqtype"), Some(&Value::from("montecarlo")));
    assert!(store.contains("date"));
}

#[test]
fn test_store_nested_paths() {
    let mut store = ResultStore::default();
    store.set("output/jobs/0/stdout", Value::from("hello"));
    store.set("output/jobs/1/stdout", Value::from("world"));
    assert_eq!(store.get("output/jobs/0/stdout"), Some(&Value::from("hello")));
    assert_eq!(store.get("output/jobs/1/stdout"), Some(&Value::from("world")));
    assert!(store.contains("output/jobs"));
    assert_eq!(store.get("output/jobs/2/stdout"), None);
    assert_eq!(store.get("missing/entirely"), None);
}

#[test]
fn test_store_overwrite_and_leaf_promotion() {
    let mut store = ResultStore::default();
    store.set("a", Value::from(1));
    store.set("a", Value::from(2));
    assert_eq!(store.get("a"), Some(&Value::from(2)));

    // Writing below an existing leaf turns it into an object
    store.set("a/b", Value::from(3));
    assert_eq!(store.get("a/b"), Some(&Value::from(3)));
}

#[test]
fn test_store_typed_round_trip() {
    let mut store = ResultStore::default();
    store.set_json("lhs/total/mean", &12.5f64).unwrap();
    store
        .set_json("lhs/total/samples", &vec![1.0, 2.0, 3.0])
        .unwrap();
    let mean: Option<f64> = store.get_json("lhs/total/mean").unwrap();
    assert_eq!(mean, Some(12.5));
    let samples: Option<Vec<f64>> = store.get_json("lhs/total/samples").unwrap();
    assert_eq!(samples, Some(vec![1.0, 2.0, 3.0]));
    let absent: Option<f64> = store.get_json("lhs/total/rmse").unwrap();
    assert_eq!(absent, None);
}

#[test]
fn test_store_string_round_trip() {
    let mut store = ResultStore::new("smolyak");
    store.set("input/param_array", json!([[1.0, 2.0], [3.0, 4.0]]));
    let text = store.to_string_pretty().unwrap();
    let back = ResultStore::from_str(&text).unwrap();
    assert_eq!(back, store);
}

#[test]
fn test_tagged_output_round_trip() {
    let out = TaggedOutput {
        name: "total".to_string(),
        desc: "model output".to_string(),
        value: 110.25,
    };
    let line = format_tagged(&out).unwrap();
    assert!(line.starts_with("UQS:"));
    assert!(line.ends_with(":SQU"));
    let parsed = parse_tagged(&line);
    assert_eq!(parsed, vec![out]);
}

#[test]
fn test_parse_tagged_filters_noise() {
    let stdout = "\
starting model
UQS:{\"name\":\"a\",\"value\":1.5}:SQU
some progress line
UQS:{\"name\":\"b\",\"desc\":\"second\",\"value\":-2.0}:SQU
UQS:{not json}:SQU
UQS:{\"name\":\"trailing\",\"value\":3.0}
done
";
    let parsed = parse_tagged(stdout);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].name, "a");
    assert_eq!(parsed[0].value, 1.5);
    assert_eq!(parsed[0].desc, "");
    assert_eq!(parsed[1].name, "b");
    assert_eq!(parsed[1].desc, "second");
}

#[test]
fn test_callable_runner_lifecycle() {
    let mut runner = CallableRunner::new(|args: &[(String, f64)]| {
        let x = args.iter().find(|(n, _)| n == "x").map(|(_, v)| *v).unwrap_or(0.0);
        if x < 0.0 {
            return Err("negative input".to_string());
        }
        Ok(vec![("double".to_string(), 2.0 * x)])
    });

    runner.add_job("model --x=1.5", ".", 1, "job_0.out");
    runner.add_job("model --x=-1", ".", 1, "job_1.out");
    runner.add_job("model --x=4", ".", 1, "job_2.out");
    assert!(runner.run());

    let (finished, all_done) = runner.status();
    assert!(all_done);
    assert_eq!(finished, vec![0, 2]);

    let mut store = ResultStore::default();
    let collected = runner.collect(&mut store);
    assert_eq!(collected, vec![0, 2]);

    let stdout: String = store.get_json("output/jobs/0/stdout").unwrap().unwrap();
    let outputs = parse_tagged(&stdout);
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].name, "double");
    assert_eq!(outputs[0].value, 3.0);

    let stderr: String = store.get_json("output/jobs/1/stderr").unwrap().unwrap();
    assert_eq!(stderr, "negative input");
}

#[test]
fn test_callable_runner_parses_negative_flags() {
    let mut runner = CallableRunner::new(|args: &[(String, f64)]| {
        Ok(vec![("sum".to_string(), args.iter().map(|(_, v)| v).sum())])
    });
    runner.add_job("model --a=-2.5 --b=0.5", ".", 1, "job_0.out");
    assert!(runner.run());

    let mut store = ResultStore::default();
    runner.collect(&mut store);
    let stdout: String = store.get_json("output/jobs/0/stdout").unwrap().unwrap();
    assert_eq!(parse_tagged(&stdout)[0].value, -2.0);
}
