//! End-to-end scenarios: records in, result records out.

use std::io::Write;

use sleuth_core::graph::EdgeMode;
use sleuth_engine::{DetectionParams, ReportFilter, RiskLevel, SuspicionEngine, analyze};
use sleuth_service::{export_suspects, run_file};
use sleuth_tests::helpers::*;

const T0: i64 = 1_700_000_000_000;

#[test]
fn fan_out_hub_and_recipients() {
    let records = fan_out("A", &["B", "C", "D", "E", "F"], 100.0, &[T0; 5]);
    let reports = analyze(&records);

    assert_eq!(reports.len(), 6);
    let a = find(&reports, "A");
    assert!(a.fan_out && !a.fan_in && !a.peeling_chain);
    assert_eq!(a.score, 10.0);

    for w in ["B", "C", "D", "E", "F"] {
        let r = find(&reports, w);
        assert!(!r.fan_out && !r.fan_in && !r.peeling_chain);
        assert_eq!(r.score, 4.29);
    }
}

#[test]
fn fan_out_window_boundary_end_to_end() {
    let recipients = ["r1", "r2", "r3", "r4", "r5"];
    let inside = analyze(&fan_out("hub", &recipients, 1.0, &[0, 0, 0, 0, 3_600_000]));
    assert!(find(&inside, "hub").fan_out);

    let outside = analyze(&fan_out("hub", &recipients, 1.0, &[0, 0, 0, 0, 3_600_001]));
    assert!(!find(&outside, "hub").fan_out);
    // Nothing flagged and no seeds: every score is zero.
    assert!(outside.iter().all(|r| r.score == 0.0));
}

#[test]
fn peeling_hop_scores_two() {
    let records = vec![tx("src", "mid", 100.0, T0), tx("mid", "dst", 95.0, T0 + 60_000)];
    let analysis = SuspicionEngine::default().analyze(&records);

    let mid = analysis.get("mid").unwrap();
    assert!(mid.peeling());
    assert_eq!(mid.raw_score, 2);
    assert_eq!(mid.normalized_score, 10.0);
    assert_eq!(analysis.get("src").unwrap().normalized_score, 0.0);
}

#[test]
fn peeling_chain_flags_interior_wallets() {
    let reports = analyze(&peel_chain("p", 5, 1_000.0, 0.95));
    let flagged: Vec<&str> = reports
        .iter()
        .filter(|r| r.peeling_chain)
        .map(|r| r.wallet.as_str())
        .collect();
    assert_eq!(flagged, vec!["p1", "p2", "p3", "p4"]);
}

#[test]
fn fan_in_collector() {
    let senders = ["s1", "s2", "s3", "s4", "s5", "s6"];
    let reports = analyze(&fan_in(&senders, "sink", 10.0, &[0, 60_000, 120_000, 180_000, 240_000, 300_000]));
    let sink = find(&reports, "sink");
    assert!(sink.fan_in);
    assert_eq!(sink.score, 10.0);
    assert!(senders.iter().all(|s| find(&reports, s).score == 0.0));
}

#[test]
fn propagation_reaches_three_hops_only() {
    let mut records = fan_out("A", &["B", "C", "D", "E", "F"], 100.0, &[T0; 5]);
    records.push(tx("B", "h2", 10.0, T0));
    records.push(tx("h2", "h3", 1.0, T0));
    records.push(tx("h3", "h4", 1.0, T0));

    let analysis = SuspicionEngine::default().analyze(&records);
    let proximity = |w: &str| analysis.get(w).unwrap().proximity();
    assert_eq!(proximity("A"), 4);
    assert_eq!(proximity("B"), 3);
    assert_eq!(proximity("h2"), 2);
    assert_eq!(proximity("h3"), 1);
    assert_eq!(proximity("h4"), 0);
}

#[test]
fn only_first_three_fan_out_wallets_seed() {
    let mut records = Vec::new();
    for hub in ["h1", "h2", "h3", "h4"] {
        let recipients: Vec<String> = (0..5).map(|i| format!("{hub}-r{i}")).collect();
        let names: Vec<&str> = recipients.iter().map(String::as_str).collect();
        records.extend(fan_out(hub, &names, 1.0, &[0; 5]));
    }

    let analysis = SuspicionEngine::default().analyze(&records);
    let seeds: Vec<&str> = analysis.seeds().map(|w| w.as_str()).collect();
    assert_eq!(seeds, vec!["h1", "h2", "h3"]);

    // h4 is flagged but not a seed: 3 of max 7.
    let h4 = analysis.get("h4").unwrap();
    assert!(h4.fan_out());
    assert_eq!(h4.proximity(), 0);
    assert_eq!(h4.raw_score, 3);
    assert_eq!(analysis.get("h4-r0").unwrap().raw_score, 0);
    assert_eq!(analysis.get("h1-r0").unwrap().raw_score, 3);
}

#[test]
fn duplicate_pairs_do_not_inflate_degree() {
    let mut records = fan_out("A", &["B", "C", "D", "E"], 1.0, &[0; 4]);
    records.extend(fan_out("A", &["B", "C"], 1.0, &[10_000, 20_000]));
    let per_pair = analyze(&records);
    assert!(!find(&per_pair, "A").fan_out);

    let engine = SuspicionEngine::new(DetectionParams {
        edge_mode: EdgeMode::PerTransaction,
        ..DetectionParams::default()
    })
    .unwrap();
    let per_tx = engine.analyze(&records).reports();
    assert!(find(&per_tx, "A").fan_out);
}

#[test]
fn self_loops_and_isolated_pairs_are_harmless() {
    let records = vec![tx("a", "a", 5.0, 0), tx("b", "c", 5.0, 0)];
    let reports = analyze(&records);
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.score == 0.0 && !r.fan_out && !r.fan_in && !r.peeling_chain));
}

#[test]
fn empty_ledger() {
    assert!(analyze(&[]).is_empty());
}

#[test]
fn csv_to_reports() {
    let mut records = fan_out("A", &["B", "C", "D", "E", "F"], 100.0, &[T0; 5]);
    records.push(tx("X", "Y", 100.0, T0));
    records.push(tx("Y", "Z", 95.0, T0 + 10_000));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(to_csv(&records).as_bytes()).unwrap();
    writeln!(file, "99,Q,R,0,1700000000").unwrap();

    let out = run_file(file.path(), &SuspicionEngine::default()).unwrap();
    assert_eq!(out.ingest.dropped_non_positive, 1);
    assert_eq!(out.analysis.reports(), analyze(&records));

    let high = ReportFilter {
        risk: Some(RiskLevel::High),
        ..ReportFilter::default()
    }
    .apply(&out.analysis.reports());
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].wallet.as_str(), "A");
}

#[test]
fn fractional_timestamps_decide_fan_window() {
    let ledger = |last: &str| {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sender,receiver,amount,timestamp").unwrap();
        for to in ["B", "C", "D", "E"] {
            writeln!(file, "A,{to},10,0.5").unwrap();
        }
        writeln!(file, "A,F,10,{last}").unwrap();
        file
    };

    // 3600.4 s between first and last transfer.
    let wide = ledger("3600.9");
    let out = run_file(wide.path(), &SuspicionEngine::default()).unwrap();
    assert!(!out.analysis.get("A").unwrap().fan_out());

    // Exactly one hour.
    let exact = ledger("3600.5");
    let out = run_file(exact.path(), &SuspicionEngine::default()).unwrap();
    assert!(out.analysis.get("A").unwrap().fan_out());
}

#[test]
fn csv_round_trip_keeps_millis() {
    let records = fan_out("A", &["B", "C", "D", "E", "F"], 5.0, &[250, 250, 250, 250, 3_600_251]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(to_csv(&records).as_bytes()).unwrap();

    let out = run_file(file.path(), &SuspicionEngine::default()).unwrap();
    assert!(!out.analysis.get("A").unwrap().fan_out());
    assert_eq!(out.analysis.reports(), analyze(&records));
}

#[test]
fn reports_serialize_to_expected_json() {
    let reports = analyze(&[tx("src", "mid", 100.0, 0), tx("mid", "dst", 95.0, 1)]);
    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(
        json[1],
        serde_json::json!({
            "wallet": "mid",
            "score": 10.0,
            "fan_out": false,
            "fan_in": false,
            "peeling_chain": true,
        })
    );
}

#[test]
fn export_writes_suspicious_wallets() {
    let mut records = fan_out("A", &["B", "C", "D", "E", "F"], 100.0, &[T0; 5]);
    records.push(tx("X", "Y", 100.0, T0));
    records.push(tx("Y", "Z", 95.0, T0 + 10_000));
    let reports = analyze(&records);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("suspicious_wallets.csv");
    assert_eq!(export_suspects(&path, &reports).unwrap(), 6);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "wallet,suspicion_score,fan_out,fan_in,peeling_chain");
    assert_eq!(lines[1], "A,10.0,true,false,false");
    assert_eq!(lines[2], "B,4.29,false,false,false");
    // Y peels but scores 2.86, below the export cut.
    assert!(lines.iter().all(|l| !l.starts_with("Y,")));
}

#[test]
fn suspect_subgraph_spans_one_hop() {
    let mut records = fan_out("A", &["B", "C", "D", "E", "F"], 100.0, &[T0; 5]);
    records.push(tx("B", "G", 10.0, T0));
    records.push(tx("H", "C", 10.0, T0));
    records.push(tx("G", "far", 1.0, T0));

    let analysis = SuspicionEngine::default().analyze(&records);
    let subgraph = analysis.suspect_subgraph();
    let wallets: Vec<&str> = subgraph.wallets.iter().map(|w| w.as_str()).collect();
    assert_eq!(wallets, vec!["A", "B", "C", "D", "E", "F", "G", "H"]);
    // A's five legs, B -> G and H -> C; G -> far leaves the subgraph.
    assert_eq!(subgraph.edges, 7);
}

#[test]
fn pattern_examples_show_first_hubs() {
    let mut records = fan_in(&["s1", "s2", "s3", "s4", "s5"], "sink", 1.0, &[0; 5]);
    records.extend(fan_out("hub", &["r1", "r2", "r3", "r4", "r5"], 1.0, &[0; 5]));
    let analysis = SuspicionEngine::default().analyze(&records);

    let fan_in_example = analysis.fan_in_example().unwrap();
    assert_eq!(fan_in_example.wallet.as_str(), "sink");
    assert_eq!(fan_in_example.predecessors.len(), 5);

    let fan_out_example = analysis.fan_out_example().unwrap();
    assert_eq!(fan_out_example.wallet.as_str(), "hub");
    assert_eq!(fan_out_example.successors.len(), 5);
}
