use neighborhood_hulls::{
    output::{parse_record, RecordSink},
    pipeline::{run, RunOptions},
    point::{ClusterId, Point},
    HullsError,
};
use std::fs;
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("neighborhood-hulls-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_input(dir: &PathBuf, contents: &str) -> PathBuf {
    let path = dir.join("input.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn prefix_in(dir: &PathBuf) -> String {
    dir.join("out").to_string_lossy().into_owned()
}

#[test]
fn clustered_square_drops_interior_point() {
    let dir = scratch("square");
    let prefix = prefix_in(&dir);
    let options = RunOptions {
        input: write_input(&dir, "lat,lng,neighborhood\n0,0,0\n0,2,0\n2,2,0\n2,0,0\n1,1,0\n"),
        cluster_prefix: Some(prefix.clone()),
        ..Default::default()
    };

    let summary = run(&options).unwrap();
    let polygon = &summary.polygons[&ClusterId::Int(0)];
    assert_eq!(polygon.len(), 5);
    assert!(!polygon.points().contains(&Point::new(1.0, 1.0)));

    let written = fs::read_to_string(RecordSink::prefix_path(&prefix)).unwrap();
    let record = parse_record(written.lines().next().unwrap()).unwrap();
    assert_eq!(record.prefix, Some(prefix));
    assert_eq!(record.id, ClusterId::Int(0));
    assert_eq!(record.points, polygon.points());
}

#[test]
fn unclustered_groups_become_triangles() {
    let dir = scratch("kmeans");
    let options = RunOptions {
        input: write_input(
            &dir,
            "lat,lng\n37.70,-122.50\n37.90,-122.10\n37.71,-122.49\n37.91,-122.09\n37.70,-122.48\n37.90,-122.08\n",
        ),
        num_clusters: Some(2),
        cluster_prefix: Some(prefix_in(&dir)),
        ..Default::default()
    };

    let summary = run(&options).unwrap();
    assert_eq!(summary.polygons.len(), 2);
    for polygon in summary.polygons.values() {
        assert_eq!(polygon.len(), 4);
        assert_eq!(polygon.points()[0], polygon.points()[3]);
    }
}

#[test]
fn too_many_clusters_is_rejected_before_output() {
    let dir = scratch("bad-k");
    let prefix = prefix_in(&dir);
    let options = RunOptions {
        input: write_input(&dir, "lat,lng\n1,1\n2,2\n3,1\n"),
        num_clusters: Some(4),
        cluster_prefix: Some(prefix.clone()),
        ..Default::default()
    };

    let err = run(&options).unwrap_err();
    assert!(matches!(err, HullsError::ClusterParameter { k: 4, distinct_points: 3 }));
    assert!(!RecordSink::prefix_path(&prefix).exists());
}

#[test]
fn degenerate_cluster_aborts_by_default() {
    let dir = scratch("degenerate");
    let prefix = prefix_in(&dir);
    let input = "lat,lng,id\n0,0,1\n0,1,1\n1,0,1\n5,5,2\n5,5,2\n5,5,2\n";
    let options = RunOptions {
        input: write_input(&dir, input),
        cluster_prefix: Some(prefix.clone()),
        ..Default::default()
    };

    let err = run(&options).unwrap_err();
    assert!(err.is_degenerate());
    match err {
        HullsError::InCluster { cluster, .. } => assert_eq!(cluster, ClusterId::Int(2)),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!RecordSink::prefix_path(&prefix).exists());
}

#[test]
fn degenerate_cluster_can_be_skipped() {
    let dir = scratch("skip");
    let input = "lat,lng,id\n0,0,1\n0,1,1\n1,0,1\n5,5,2\n6,6,2\n7,7,2\n";
    let options = RunOptions {
        input: write_input(&dir, input),
        cluster_prefix: Some(prefix_in(&dir)),
        skip_degenerate: true,
        ..Default::default()
    };

    let summary = run(&options).unwrap();
    assert_eq!(summary.skipped, vec![ClusterId::Int(2)]);
    assert_eq!(summary.polygons.len(), 1);
    assert!(summary.polygons.contains_key(&ClusterId::Int(1)));
}

#[test]
fn malformed_row_writes_nothing() {
    let dir = scratch("malformed");
    let prefix = prefix_in(&dir);
    let options = RunOptions {
        input: write_input(&dir, "lat,lng,id\n0,0,1\n0,1\n"),
        cluster_prefix: Some(prefix.clone()),
        ..Default::default()
    };

    assert!(matches!(
        run(&options).unwrap_err(),
        HullsError::MalformedRow { row: 3, .. }
    ));
    assert!(!RecordSink::prefix_path(&prefix).exists());
}

#[test]
fn html_map_carries_bounds() {
    let dir = scratch("html");
    let html = dir.join("map.html");
    let input = "lat,lng,id\n10,-122,a\n12,-121.5,a\n11,-121.8,a\n18,-121.2,b\n20,-121,b\n19,-121.9,b\n";
    let options = RunOptions {
        input: write_input(&dir, input),
        output_html: Some(html.clone()),
        cluster_prefix: Some(prefix_in(&dir)),
        ..Default::default()
    };

    run(&options).unwrap();
    let page = fs::read_to_string(&html).unwrap();
    let start = page.find("var data = ").unwrap() + "var data = ".len();
    let end = start + page[start..].find(";\n").unwrap();
    let data: serde_json::Value = serde_json::from_str(&page[start..end]).unwrap();

    assert_eq!(data["bounds"]["SW"]["lat"], 10.0);
    assert_eq!(data["bounds"]["SW"]["lng"], -122.0);
    assert_eq!(data["bounds"]["NE"]["lat"], 20.0);
    assert_eq!(data["bounds"]["NE"]["lng"], -121.0);
    assert_eq!(data["neighborhoods"].as_array().unwrap().len(), 2);
}

#[test]
fn unwritable_record_file_leaves_no_html() {
    let dir = scratch("no-html");
    let html = dir.join("map.html");
    let prefix = dir.join("missing").join("out").to_string_lossy().into_owned();
    let options = RunOptions {
        input: write_input(&dir, "lat,lng,id\n0,0,1\n0,1,1\n1,0,1\n"),
        output_html: Some(html.clone()),
        cluster_prefix: Some(prefix),
        ..Default::default()
    };

    assert!(matches!(run(&options).unwrap_err(), HullsError::Io(_)));
    assert!(!html.exists());
}

#[test]
fn greenwich_points_keep_every_corner() {
    let dir = scratch("greenwich");
    let options = RunOptions {
        input: write_input(&dir, "lat,lng,id\n1,-0.0,0\n0,0,0\n2,0,0\n1,1,0\n"),
        cluster_prefix: Some(prefix_in(&dir)),
        ..Default::default()
    };

    let summary = run(&options).unwrap();
    let polygon = &summary.polygons[&ClusterId::Int(0)];
    assert_eq!(polygon.vertices().len(), 3);
    assert!(polygon.vertices().contains(&Point::new(0.0, 0.0)));
    assert!(polygon.vertices().contains(&Point::new(2.0, 0.0)));
}
