// JSON and CSV artifacts describe the same result.

use u_aps::{export, DecisionEngine, EngineConfig, Machine, RulePolicy, Scenario, WorkOrder};

fn result() -> u_aps::ScheduleResult {
    let s = Scenario::new("export")
        .with_machine(Machine::new("M2"))
        .with_machine(Machine::new("M1"))
        .with_order(
            WorkOrder::new("O1")
                .with_processing(30)
                .with_due(20)
                .with_item("A")
                .with_machine("M2"),
        )
        .with_order(
            WorkOrder::new("O2")
                .with_processing(45)
                .with_due(100)
                .with_item("A")
                .with_machine("M1"),
        )
        .with_order(
            WorkOrder::new("O3")
                .with_processing(10)
                .with_due(200)
                .with_item("B")
                .with_machine("M1"),
        );
    let mut engine =
        DecisionEngine::new(s, Box::new(RulePolicy::edd()), EngineConfig::default()).unwrap();
    engine.run().unwrap()
}

#[test]
fn test_export_writes_synchronized_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("nested").join("run-1");
    let result = result();

    let paths = export(&result, &base).unwrap();
    assert_eq!(paths.json, dir.path().join("nested").join("run-1.json"));
    assert_eq!(paths.csv, dir.path().join("nested").join("run-1.csv"));
    assert!(!dir.path().join("nested").join("run-1.json.tmp").exists());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    let entries = json["entries"].as_array().unwrap();

    let mut reader = csv::Reader::from_path(&paths.csv).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[1], "order_id");
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), entries.len());
    assert_eq!(rows.len(), 3);
    for (row, entry) in rows.iter().zip(entries) {
        assert_eq!(&row[0], "export");
        assert_eq!(&row[1], entry["order_id"].as_str().unwrap());
        assert_eq!(&row[2], entry["machine_id"].as_str().unwrap());
        assert_eq!(row[4].parse::<i64>().unwrap(), entry["start"].as_i64().unwrap());
        assert_eq!(row[9].parse::<i64>().unwrap(), entry["tardiness"].as_i64().unwrap());
    }

    // sorted by machine, then start
    let order: Vec<&str> = rows.iter().map(|r| &r[1]).collect();
    assert_eq!(order, vec!["O2", "O3", "O1"]);
    assert_eq!(json["kpi"]["total_tardiness"], 10);
    assert_eq!(json["status"], "completed");
}

#[test]
fn test_export_overwrites_previous_run() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run");
    let result = result();

    export(&result, &base).unwrap();
    let first = std::fs::read_to_string(dir.path().join("run.csv")).unwrap();
    export(&result, &base).unwrap();
    let second = std::fs::read_to_string(dir.path().join("run.csv")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_export_into_missing_root_fails() {
    let result = result();
    let err = export(&result, std::path::Path::new("/proc/definitely/not/here/run"));
    assert!(err.is_err());
}
